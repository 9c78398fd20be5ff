use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;

use super::{Common, centered, common_builders, focus_ring, interactive_root};
use crate::interaction::{Behavior, InteractionState, Interactive, PressModel, Response, Step, advance};
use crate::sizing::{SizeRules, infer};
use crate::{BuildCx, WidgetHandle};

const DEFAULT_W: f32 = 200.0;
const DEFAULT_H: f32 = 28.0;
const TRACK_H: f32 = 4.0;
const THUMB: f32 = 16.0;
/// PageUp/PageDown move this many keyboard steps.
const PAGE_STEPS: f32 = 10.0;

pub(crate) fn norm(value: f32, min: f32, max: f32) -> f32 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub(crate) fn denorm(t: f32, min: f32, max: f32) -> f32 {
    min + t * (max - min)
}

pub(crate) fn snap_step(v: f32, step: Option<f32>, min: f32, max: f32) -> f32 {
    let hi = max.max(min);
    match step {
        Some(s) if s > 0.0 => {
            let k = ((v - min) / s).round();
            (min + k * s).clamp(min, hi)
        }
        _ => v.clamp(min, hi),
    }
}

pub struct SliderSpec {
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub step: Option<f32>,
    /// Committed changes: pointer release and keyboard.
    pub on_change: Option<Rc<dyn Fn(f32)>>,
    /// Every value the slider shows while a drag is in progress, including
    /// the restored value when the drag is cancelled.
    pub on_input: Option<Rc<dyn Fn(f32)>>,
    pub common: Common,
}

impl SliderSpec {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            min: 0.0,
            max: 1.0,
            step: None,
            on_change: None,
            on_input: None,
            common: Common::default(),
        }
    }

    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Snap every reported value to `min + k * step`. Without a step the
    /// slider reports the raw pointer fraction, so a drag to 90% of the
    /// track reports 0.9 rather than the nearest step.
    pub fn step(mut self, step: f32) -> Self {
        self.step = Some(step);
        self
    }

    pub fn on_change(mut self, f: impl Fn(f32) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn on_input(mut self, f: impl Fn(f32) + 'static) -> Self {
        self.on_input = Some(Rc::new(f));
        self
    }
}

common_builders!(SliderSpec);

/// Slider plus its live state; `value()` reads the in-progress value.
#[derive(Clone)]
pub struct SliderHandle {
    pub handle: WidgetHandle,
    state: Rc<RefCell<InteractionState>>,
    min: f32,
    max: f32,
}

impl SliderHandle {
    pub fn value(&self) -> f32 {
        denorm(self.state.borrow().value, self.min, self.max)
    }
    pub fn is_dragging(&self) -> bool {
        self.state.borrow().dragging
    }
}

/// Fill/thumb pair shared with seekable progress bars.
pub(crate) struct TrackVisual {
    pub fill: PrimitiveId,
    pub thumb: Option<PrimitiveId>,
    pub track_y: f32,
    pub track_h: f32,
}

impl TrackVisual {
    pub fn paint(&self, graph: &mut dyn SceneGraph, t: f32, width: f32, active: bool) {
        let w = width.max(0.0);
        graph.set_bounds(self.fill, Rect::new(0.0, self.track_y, w * t, self.track_h));
        if let Some(thumb) = self.thumb {
            let cy = self.track_y + self.track_h * 0.5;
            graph.set_bounds(thumb, Rect::new(w * t - THUMB * 0.5, cy - THUMB * 0.5, THUMB, THUMB));
            graph.set_style(
                thumb,
                if active {
                    StyleToken::SliderThumbActive
                } else {
                    StyleToken::SliderThumb
                },
            );
        }
    }
}

pub(crate) enum ValueNotice {
    Input(f32),
    Change(f32),
    Both(f32),
}

/// Drag model plus keyboard/wheel stepping over `[min, max]`.
pub(crate) struct RangeBehavior {
    pub visual: TrackVisual,
    pub ring: Option<PrimitiveId>,
    pub min: f32,
    pub max: f32,
    pub step: Option<f32>,
    pub key_step: f32,
    pub on_change: Option<Rc<dyn Fn(f32)>>,
    pub on_input: Option<Rc<dyn Fn(f32)>>,
}

impl RangeBehavior {
    fn snapped_fraction(&self, t: f32) -> f32 {
        norm(snap_step(denorm(t, self.min, self.max), self.step, self.min, self.max), self.min, self.max)
    }

    fn key_delta(&self) -> f32 {
        match self.step {
            Some(s) if s > 0.0 => s,
            _ => (self.max - self.min) * self.key_step,
        }
    }

    fn nudge(&self, st: &mut InteractionState, by: f32) -> f32 {
        let v = denorm(st.value, self.min, self.max) + by;
        st.value = norm(snap_step(v, self.step, self.min, self.max), self.min, self.max);
        denorm(st.value, self.min, self.max)
    }
}

impl Behavior for RangeBehavior {
    type State = InteractionState;
    type Notice = ValueNotice;

    fn handle(
        &self,
        st: &mut InteractionState,
        graph: &mut dyn SceneGraph,
        _node: NodeId,
        ev: &InputEvent,
    ) -> Response<ValueNotice> {
        let before = st.value;
        let step = advance(st, ev, PressModel::Drag);
        let resp = match step {
            Step::Value => {
                st.value = self.snapped_fraction(st.value);
                if st.value == before {
                    Response::consumed()
                } else {
                    Response::notify(ValueNotice::Input(denorm(st.value, self.min, self.max)))
                }
            }
            Step::Commit => Response::notify(ValueNotice::Change(denorm(st.value, self.min, self.max))),
            Step::Cancelled => Response::notify(ValueNotice::Input(denorm(st.value, self.min, self.max))),
            Step::Key(k) => {
                let d = self.key_delta();
                let v = match k {
                    Key::ArrowLeft | Key::ArrowDown => Some(self.nudge(st, -d)),
                    Key::ArrowRight | Key::ArrowUp => Some(self.nudge(st, d)),
                    Key::PageDown => Some(self.nudge(st, -d * PAGE_STEPS)),
                    Key::PageUp => Some(self.nudge(st, d * PAGE_STEPS)),
                    Key::Home => Some(self.nudge(st, f32::NEG_INFINITY)),
                    Key::End => Some(self.nudge(st, f32::INFINITY)),
                    _ => None,
                };
                match v {
                    Some(v) => Response::notify(ValueNotice::Both(v)),
                    None => Response::ignored(),
                }
            }
            Step::Scroll(d) if d.y != 0.0 => {
                // wheel up (negative y) increases
                let dir = if d.y.is_sign_negative() { 1.0 } else { -1.0 };
                Response::notify(ValueNotice::Both(self.nudge(st, dir * self.key_delta())))
            }
            Step::Scroll(_) => Response::ignored(),
            other => Response::from_step(other),
        };
        self.visual.paint(graph, st.value, ev.size.width, st.dragging);
        resp
    }

    fn notify(&self, notice: ValueNotice) {
        let (input, change) = match notice {
            ValueNotice::Input(v) => (Some(v), None),
            ValueNotice::Change(v) => (None, Some(v)),
            ValueNotice::Both(v) => (Some(v), Some(v)),
        };
        if let (Some(v), Some(f)) = (input, &self.on_input) {
            f(v);
        }
        if let (Some(v), Some(f)) = (change, &self.on_change) {
            f(v);
        }
    }

    fn focus_changed(&self, _st: &mut InteractionState, graph: &mut dyn SceneGraph, _node: NodeId, focused: bool) {
        if let Some(ring) = self.ring {
            graph.set_primitive_visible(ring, focused);
        }
    }
}

/// Horizontal slider. The value follows the pointer from the press on;
/// `on_change` fires on release and on keyboard/wheel steps.
pub fn Slider(cx: &mut BuildCx, spec: SliderSpec) -> SliderHandle {
    let inferred = infer(
        cx.metrics.as_ref(),
        &spec.common.size,
        None,
        SizeRules::default().default_size(DEFAULT_W, DEFAULT_H),
    );
    let t = norm(snap_step(spec.value, spec.step, spec.min, spec.max), spec.min, spec.max);
    let state = Rc::new(RefCell::new(InteractionState::with_value(t)));
    let node = interactive_root(cx, &spec.common, inferred.apply(spec.common.size));
    let handle = SliderHandle {
        handle: WidgetHandle::new(node),
        state: state.clone(),
        min: spec.min,
        max: spec.max,
    };
    if !node.is_valid() {
        return handle;
    }
    let size = inferred.or_fallback(Size::new(DEFAULT_W, DEFAULT_H));
    let track_y = centered(size.height, TRACK_H);

    let ring = focus_ring(cx, node, size);
    cx.graph.add_primitive(
        node,
        Primitive::rect(Rect::new(0.0, track_y, size.width, TRACK_H), StyleToken::SliderTrack),
    );
    let fill = cx.graph.add_primitive(node, Primitive::rect(Rect::ZERO, StyleToken::SliderFill));
    let thumb = cx.graph.add_primitive(node, Primitive::rect(Rect::ZERO, StyleToken::SliderThumb));

    let behavior = RangeBehavior {
        visual: TrackVisual {
            fill,
            thumb: Some(thumb),
            track_y,
            track_h: TRACK_H,
        },
        ring: Some(ring),
        min: spec.min,
        max: spec.max,
        step: spec.step,
        key_step: cx.config.key_step,
        on_change: spec.on_change,
        on_input: spec.on_input,
    };
    behavior.visual.paint(cx.graph, t, size.width, false);
    if spec.common.interactive() {
        cx.attach(node, Interactive::new(behavior, state));
    }
    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_rounds_to_nearest_step() {
        assert_eq!(snap_step(0.9, Some(0.25), 0.0, 1.0), 1.0);
        assert_eq!(snap_step(0.6, Some(0.25), 0.0, 1.0), 0.5);
        assert_eq!(snap_step(0.9, None, 0.0, 1.0), 0.9);
        assert_eq!(snap_step(7.0, Some(2.0), 1.0, 6.0), 6.0);
        assert_eq!(snap_step(-3.0, None, 0.0, 1.0), 0.0);
    }

    #[test]
    fn degenerate_range_maps_to_zero() {
        assert_eq!(norm(5.0, 1.0, 1.0), 0.0);
        assert_eq!(norm(5.0, 0.0, 10.0), 0.5);
        assert_eq!(denorm(0.5, 0.0, 10.0), 5.0);
    }
}
