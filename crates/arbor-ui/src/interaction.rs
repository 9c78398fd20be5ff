//! # Interaction state machines
//!
//! Every interactive widget installs exactly one [`Interactive`] callback on
//! its interaction root. The callback owns a small state record behind
//! `Rc<RefCell<_>>` and a [`Behavior`] that turns events into state changes
//! and in-place primitive edits. Nothing here rebuilds the tree.
//!
//! The pointer lifecycle shared by all widgets lives in [`advance`]:
//!
//! - `PointerDown` inside bounds presses and captures the pointer. Drag
//!   widgets take a value from the press position immediately.
//! - `PointerMove`/`PointerDrag` from the captured pointer either recompute
//!   the value (drag widgets) or track whether the pointer is still inside
//!   (press widgets).
//! - `PointerUp` commits: always for drag widgets, only when released
//!   inside for press widgets.
//! - `PointerCancel`, or `PointerLeave` while pressed, restores the state
//!   from before the press and commits nothing.

use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;

/// Per-widget interaction record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub hovered: bool,
    pub pressed: bool,
    /// A drag widget is following the pointer.
    pub dragging: bool,
    /// Pointer is inside bounds while pressed.
    pub inside: bool,
    pub pointer: Option<PointerId>,
    /// Continuous value in `[0, 1]`, or 0/1 for two-state widgets.
    pub value: f32,
    pub value_at_press: f32,
    pub hovered_at_press: bool,
    pub selection: Option<usize>,
}

impl InteractionState {
    pub fn with_value(value: f32) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Pressed and still over the widget.
    pub fn is_armed(&self) -> bool {
        self.pressed && self.inside
    }

    fn owns(&self, ev: &InputEvent) -> bool {
        self.pressed && self.pointer == Some(ev.pointer)
    }

    fn revert(&mut self) {
        self.pressed = false;
        self.dragging = false;
        self.inside = false;
        self.pointer = None;
        self.value = self.value_at_press;
        self.hovered = self.hovered_at_press;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressModel {
    /// Buttons, checkboxes, toggles: activate on release inside.
    Press,
    /// Sliders, seekable progress: value follows the pointer.
    Drag,
}

/// Outcome of one [`advance`] step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Not for this widget; let it bubble.
    Ignored,
    /// Hover/press visuals changed.
    Visual,
    /// Drag value moved (not committed).
    Value,
    /// Press released inside bounds.
    Activate,
    /// Drag released.
    Commit,
    /// Gesture abandoned, state reverted.
    Cancelled,
    Key(Key),
    Scroll(Vec2),
}

impl Step {
    pub fn consumed(self) -> bool {
        !matches!(self, Step::Ignored)
    }
}

/// Apply the shared pointer lifecycle to `st`.
pub fn advance(st: &mut InteractionState, ev: &InputEvent, model: PressModel) -> Step {
    match ev.kind {
        EventKind::PointerEnter => {
            st.hovered = true;
            Step::Visual
        }
        EventKind::PointerLeave => {
            let cancelled = st.pressed;
            if cancelled {
                st.revert();
            }
            st.hovered = false;
            if cancelled {
                Step::Cancelled
            } else {
                Step::Visual
            }
        }
        EventKind::PointerDown => {
            if !ev.is_inside() || (st.pressed && !st.owns(ev)) {
                return Step::Ignored;
            }
            if !st.pressed {
                st.hovered_at_press = st.hovered;
            }
            st.pressed = true;
            st.inside = true;
            st.hovered = true;
            st.pointer = Some(ev.pointer);
            st.value_at_press = st.value;
            match model {
                PressModel::Press => Step::Visual,
                PressModel::Drag => {
                    st.dragging = true;
                    st.value = ev.fraction_x();
                    Step::Value
                }
            }
        }
        EventKind::PointerMove | EventKind::PointerDrag => {
            if !st.owns(ev) {
                let inside = ev.is_inside();
                if inside == st.hovered {
                    return Step::Ignored;
                }
                st.hovered = inside;
                return Step::Visual;
            }
            match model {
                PressModel::Press => {
                    st.inside = ev.is_inside();
                    Step::Visual
                }
                PressModel::Drag => {
                    st.value = ev.fraction_x();
                    Step::Value
                }
            }
        }
        EventKind::PointerUp => {
            if !st.owns(ev) {
                return Step::Ignored;
            }
            let inside = ev.is_inside();
            st.pressed = false;
            st.dragging = false;
            st.inside = false;
            st.pointer = None;
            match model {
                PressModel::Press if inside => Step::Activate,
                PressModel::Press => Step::Visual,
                PressModel::Drag => Step::Commit,
            }
        }
        EventKind::PointerCancel => {
            if st.pressed {
                st.revert();
                Step::Cancelled
            } else {
                Step::Ignored
            }
        }
        EventKind::PointerScroll => Step::Scroll(ev.scroll),
        EventKind::KeyDown => match ev.key {
            Some(k) => Step::Key(k),
            None => Step::Ignored,
        },
    }
}

/// What a behavior reports back to [`Interactive`].
pub struct Response<N> {
    pub consumed: bool,
    /// Delivered to [`Behavior::notify`] after the state borrow is released.
    pub notice: Option<N>,
}

impl<N> Response<N> {
    pub fn ignored() -> Self {
        Self {
            consumed: false,
            notice: None,
        }
    }
    pub fn consumed() -> Self {
        Self {
            consumed: true,
            notice: None,
        }
    }
    pub fn notify(notice: N) -> Self {
        Self {
            consumed: true,
            notice: Some(notice),
        }
    }
    pub fn from_step(step: Step) -> Self {
        Self {
            consumed: step.consumed(),
            notice: None,
        }
    }
}

/// Widget-specific half of an interaction callback.
pub trait Behavior: 'static {
    type State: 'static;
    /// Payload for caller callbacks.
    type Notice: 'static;

    fn handle(
        &self,
        st: &mut Self::State,
        graph: &mut dyn SceneGraph,
        node: NodeId,
        ev: &InputEvent,
    ) -> Response<Self::Notice>;

    /// Run caller callbacks. No state borrow is held.
    fn notify(&self, notice: Self::Notice);

    fn focus_changed(
        &self,
        _st: &mut Self::State,
        _graph: &mut dyn SceneGraph,
        _node: NodeId,
        _focused: bool,
    ) {
    }
}

/// [`NodeCallback`] wrapper: state record, behavior and reentrancy guard.
pub struct Interactive<B: Behavior> {
    behavior: B,
    state: Rc<RefCell<B::State>>,
    guard: ReentrancyGuard,
}

impl<B: Behavior> Interactive<B> {
    pub fn new(behavior: B, state: Rc<RefCell<B::State>>) -> Rc<Self> {
        Rc::new(Self {
            behavior,
            state,
            guard: ReentrancyGuard::new(),
        })
    }

    pub fn state(&self) -> &Rc<RefCell<B::State>> {
        &self.state
    }
}

impl<B: Behavior> NodeCallback for Interactive<B> {
    fn on_event(
        &self,
        graph: &mut dyn SceneGraph,
        node: NodeId,
        ev: &InputEvent,
    ) -> Result<bool, DispatchError> {
        let Some(_running) = self.guard.enter() else {
            log::warn!("suppressed re-entrant {:?} on {node:?}", ev.kind);
            return Err(DispatchError::Reentrant { node });
        };
        let resp = {
            let mut st = self.state.borrow_mut();
            self.behavior.handle(&mut st, graph, node, ev)
        };
        if let Some(n) = resp.notice {
            self.behavior.notify(n);
        }
        Ok(resp.consumed)
    }

    fn on_focus(&self, graph: &mut dyn SceneGraph, node: NodeId) {
        if let Ok(mut st) = self.state.try_borrow_mut() {
            self.behavior.focus_changed(&mut st, graph, node, true);
        }
    }

    fn on_blur(&self, graph: &mut dyn SceneGraph, node: NodeId) {
        if let Ok(mut st) = self.state.try_borrow_mut() {
            self.behavior.focus_changed(&mut st, graph, node, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: EventKind, x: f32) -> InputEvent {
        InputEvent::pointer(kind, Vec2::new(x, 5.0), Size::new(100.0, 10.0))
    }

    #[test]
    fn press_release_inside_activates() {
        let mut st = InteractionState::default();
        assert_eq!(advance(&mut st, &ev(EventKind::PointerDown, 10.0), PressModel::Press), Step::Visual);
        assert!(st.is_armed());
        assert_eq!(advance(&mut st, &ev(EventKind::PointerUp, 12.0), PressModel::Press), Step::Activate);
        assert!(!st.pressed);
    }

    #[test]
    fn release_outside_does_not_activate() {
        let mut st = InteractionState::default();
        advance(&mut st, &ev(EventKind::PointerDown, 10.0), PressModel::Press);
        advance(&mut st, &ev(EventKind::PointerDrag, 150.0), PressModel::Press);
        assert!(st.pressed && !st.inside);
        assert_eq!(advance(&mut st, &ev(EventKind::PointerUp, 150.0), PressModel::Press), Step::Visual);
    }

    #[test]
    fn press_outside_is_ignored() {
        let mut st = InteractionState::default();
        assert_eq!(advance(&mut st, &ev(EventKind::PointerDown, -1.0), PressModel::Press), Step::Ignored);
        assert!(!st.pressed);
    }

    #[test]
    fn drag_value_tracks_and_clamps() {
        let mut st = InteractionState::with_value(0.2);
        assert_eq!(advance(&mut st, &ev(EventKind::PointerDown, 50.0), PressModel::Drag), Step::Value);
        assert_eq!(st.value, 0.5);
        advance(&mut st, &ev(EventKind::PointerDrag, 250.0), PressModel::Drag);
        assert_eq!(st.value, 1.0);
        advance(&mut st, &ev(EventKind::PointerDrag, -20.0), PressModel::Drag);
        assert_eq!(st.value, 0.0);
        assert_eq!(advance(&mut st, &ev(EventKind::PointerUp, -20.0), PressModel::Drag), Step::Commit);
    }

    #[test]
    fn cancel_and_leave_restore_pre_press_value() {
        for end in [EventKind::PointerCancel, EventKind::PointerLeave] {
            let mut st = InteractionState::with_value(0.2);
            advance(&mut st, &ev(EventKind::PointerDown, 90.0), PressModel::Drag);
            assert_eq!(st.value, 0.9);
            assert_eq!(advance(&mut st, &ev(end, 90.0), PressModel::Drag), Step::Cancelled);
            assert_eq!(st.value, 0.2);
            assert!(!st.pressed && !st.dragging);
        }
    }

    #[test]
    fn cancel_restores_hover_from_before_the_press() {
        let mut st = InteractionState::default();
        advance(&mut st, &ev(EventKind::PointerDown, 10.0), PressModel::Press);
        assert!(st.hovered);
        assert_eq!(advance(&mut st, &ev(EventKind::PointerCancel, 10.0), PressModel::Press), Step::Cancelled);
        assert!(!st.hovered && !st.pressed);

        advance(&mut st, &ev(EventKind::PointerEnter, 10.0), PressModel::Press);
        advance(&mut st, &ev(EventKind::PointerDown, 10.0), PressModel::Press);
        advance(&mut st, &ev(EventKind::PointerCancel, 10.0), PressModel::Press);
        assert!(st.hovered);

        advance(&mut st, &ev(EventKind::PointerDown, 10.0), PressModel::Press);
        advance(&mut st, &ev(EventKind::PointerLeave, 10.0), PressModel::Press);
        assert!(!st.hovered);
    }

    #[test]
    fn other_pointers_do_not_steal_capture() {
        let mut st = InteractionState::default();
        advance(&mut st, &ev(EventKind::PointerDown, 10.0), PressModel::Drag);
        let other = ev(EventKind::PointerUp, 10.0).with_pointer(PointerId(9));
        assert_eq!(advance(&mut st, &other, PressModel::Drag), Step::Ignored);
        assert!(st.pressed);
    }

    #[test]
    fn up_without_press_is_ignored() {
        let mut st = InteractionState::default();
        assert_eq!(advance(&mut st, &ev(EventKind::PointerUp, 10.0), PressModel::Press), Step::Ignored);
        assert_eq!(advance(&mut st, &ev(EventKind::PointerCancel, 10.0), PressModel::Press), Step::Ignored);
    }
}
