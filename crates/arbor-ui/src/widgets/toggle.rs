use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;

use super::{Common, centered, common_builders, focus_ring, interactive_root};
use crate::interaction::{Behavior, InteractionState, Interactive, PressModel, Response, Step, advance};
use crate::sizing::{SizeRules, TextContent, infer};
use crate::{BuildCx, WidgetHandle};

const TRACK_W: f32 = 40.0;
const TRACK_H: f32 = 20.0;
const KNOB_INSET: f32 = 2.0;
const GAP: f32 = 8.0;

pub struct ToggleSpec {
    pub on: bool,
    pub label: String,
    pub on_change: Option<Rc<dyn Fn(bool)>>,
    pub common: Common,
}

impl ToggleSpec {
    pub fn new(on: bool) -> Self {
        Self {
            on,
            label: String::new(),
            on_change: None,
            common: Common::default(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
}

common_builders!(ToggleSpec);

fn knob_rect(on: bool, track_y: f32) -> Rect {
    let d = TRACK_H - KNOB_INSET * 2.0;
    let x = if on { TRACK_W - KNOB_INSET - d } else { KNOB_INSET };
    Rect::new(x, track_y + KNOB_INSET, d, d)
}

struct ToggleBehavior {
    track: PrimitiveId,
    knob: PrimitiveId,
    ring: PrimitiveId,
    track_y: f32,
    on_change: Option<Rc<dyn Fn(bool)>>,
}

impl ToggleBehavior {
    fn paint(&self, on: bool, graph: &mut dyn SceneGraph) {
        graph.set_style(
            self.track,
            if on {
                StyleToken::ToggleTrackOn
            } else {
                StyleToken::ToggleTrackOff
            },
        );
        graph.set_bounds(self.knob, knob_rect(on, self.track_y));
    }
}

impl Behavior for ToggleBehavior {
    type State = InteractionState;
    type Notice = bool;

    fn handle(
        &self,
        st: &mut InteractionState,
        graph: &mut dyn SceneGraph,
        _node: NodeId,
        ev: &InputEvent,
    ) -> Response<bool> {
        let flip = match advance(st, ev, PressModel::Press) {
            Step::Activate => true,
            Step::Key(k) => k.is_activation(),
            Step::Scroll(_) => false,
            other => return Response::from_step(other),
        };
        if !flip {
            return Response::ignored();
        }
        st.value = if st.value > 0.5 { 0.0 } else { 1.0 };
        let on = st.value > 0.5;
        self.paint(on, graph);
        Response::notify(on)
    }

    fn notify(&self, on: bool) {
        if let Some(f) = &self.on_change {
            f(on);
        }
    }

    fn focus_changed(&self, _st: &mut InteractionState, graph: &mut dyn SceneGraph, _node: NodeId, focused: bool) {
        graph.set_primitive_visible(self.ring, focused);
    }
}

/// On/off switch. The track defaults to 40×20 when nothing else sizes it.
pub fn Toggle(cx: &mut BuildCx, spec: ToggleSpec) -> WidgetHandle {
    let style = cx.text_style(StyleToken::Text);
    let has_label = !spec.label.is_empty();
    let inferred = infer(
        cx.metrics.as_ref(),
        &spec.common.size,
        has_label.then(|| TextContent::new(&spec.label, style)),
        SizeRules {
            padding: Size::new(TRACK_W + GAP, 0.0),
            minimum: Size::new(TRACK_W, TRACK_H),
            default: Some(Size::new(TRACK_W, TRACK_H)),
        },
    );
    let node = interactive_root(cx, &spec.common, inferred.apply(spec.common.size));
    if !node.is_valid() {
        return WidgetHandle::invalid();
    }
    let size = inferred.or_fallback(Size::new(TRACK_W, TRACK_H));
    let track_y = centered(size.height, TRACK_H);

    let ring = focus_ring(cx, node, size);
    let track = cx.graph.add_primitive(
        node,
        Primitive::rect(Rect::new(0.0, track_y, TRACK_W, TRACK_H), StyleToken::ToggleTrackOff),
    );
    let knob = cx.graph.add_primitive(
        node,
        Primitive::rect(knob_rect(false, track_y), StyleToken::ToggleKnob),
    );
    if has_label {
        let line_h = cx.metrics.line_height(&style);
        cx.graph.add_primitive(
            node,
            TextPrimitive::new(
                Rect::new(TRACK_W + GAP, centered(size.height, line_h), inferred.content.width, line_h),
                spec.label.as_str(),
                StyleToken::Text,
            )
            .into(),
        );
    }

    let behavior = ToggleBehavior {
        track,
        knob,
        ring,
        track_y,
        on_change: spec.on_change,
    };
    behavior.paint(spec.on, cx.graph);
    if spec.common.interactive() {
        let state = InteractionState::with_value(if spec.on { 1.0 } else { 0.0 });
        cx.attach(node, Interactive::new(behavior, Rc::new(RefCell::new(state))));
    }
    WidgetHandle::new(node)
}
