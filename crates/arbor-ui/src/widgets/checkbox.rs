use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;

use super::{Common, centered, common_builders, focus_ring, interactive_root};
use crate::interaction::{Behavior, InteractionState, Interactive, PressModel, Response, Step, advance};
use crate::sizing::{SizeRules, TextContent, infer};
use crate::{BuildCx, WidgetHandle};

const BOX: f32 = 18.0;
const MARK_INSET: f32 = 4.0;
const GAP: f32 = 8.0;

pub struct CheckboxSpec {
    pub checked: bool,
    pub label: String,
    pub on_change: Option<Rc<dyn Fn(bool)>>,
    pub common: Common,
}

impl CheckboxSpec {
    pub fn new(checked: bool, label: impl Into<String>) -> Self {
        Self {
            checked,
            label: label.into(),
            on_change: None,
            common: Common::default(),
        }
    }

    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
}

common_builders!(CheckboxSpec);

struct CheckboxBehavior {
    frame: PrimitiveId,
    mark: PrimitiveId,
    ring: PrimitiveId,
    on_change: Option<Rc<dyn Fn(bool)>>,
}

impl Behavior for CheckboxBehavior {
    type State = InteractionState;
    type Notice = bool;

    fn handle(
        &self,
        st: &mut InteractionState,
        graph: &mut dyn SceneGraph,
        _node: NodeId,
        ev: &InputEvent,
    ) -> Response<bool> {
        let activate = match advance(st, ev, PressModel::Press) {
            Step::Activate => true,
            Step::Key(k) => k.is_activation(),
            Step::Scroll(_) => return Response::ignored(),
            other => {
                graph.set_style(
                    self.frame,
                    if st.hovered {
                        StyleToken::CheckboxBoxHover
                    } else {
                        StyleToken::CheckboxBox
                    },
                );
                return Response::from_step(other);
            }
        };
        if !activate {
            return Response::ignored();
        }
        st.value = if st.value > 0.5 { 0.0 } else { 1.0 };
        let checked = st.value > 0.5;
        graph.set_primitive_visible(self.mark, checked);
        Response::notify(checked)
    }

    fn notify(&self, checked: bool) {
        if let Some(f) = &self.on_change {
            f(checked);
        }
    }

    fn focus_changed(&self, _st: &mut InteractionState, graph: &mut dyn SceneGraph, _node: NodeId, focused: bool) {
        graph.set_primitive_visible(self.ring, focused);
    }
}

/// Box plus label; the whole widget is the hit target.
pub fn Checkbox(cx: &mut BuildCx, spec: CheckboxSpec) -> WidgetHandle {
    let style = cx.text_style(StyleToken::CheckboxLabel);
    let has_label = !spec.label.is_empty();
    let label_pad = if has_label { BOX + GAP } else { BOX };
    let inferred = infer(
        cx.metrics.as_ref(),
        &spec.common.size,
        has_label.then(|| TextContent::new(&spec.label, style)),
        SizeRules {
            padding: Size::new(label_pad, 0.0),
            minimum: Size::new(BOX, BOX),
            default: Some(Size::new(BOX, BOX)),
        },
    );
    let node = interactive_root(cx, &spec.common, inferred.apply(spec.common.size));
    if !node.is_valid() {
        return WidgetHandle::invalid();
    }
    let size = inferred.or_fallback(Size::new(BOX, BOX));
    let box_y = centered(size.height, BOX);

    let ring = focus_ring(cx, node, Size::new(BOX, BOX));
    if let Some(Primitive::Rect(r)) = cx.graph.primitive_mut(ring) {
        r.rect.y += box_y;
    }
    let frame = cx.graph.add_primitive(
        node,
        Primitive::rect(Rect::new(0.0, box_y, BOX, BOX), StyleToken::CheckboxBox),
    );
    let mark = cx.graph.add_primitive(
        node,
        Primitive::rect(
            Rect::new(MARK_INSET, box_y + MARK_INSET, BOX - MARK_INSET * 2.0, BOX - MARK_INSET * 2.0),
            StyleToken::CheckboxMark,
        ),
    );
    cx.graph.set_primitive_visible(mark, spec.checked);

    if has_label {
        let line_h = cx.metrics.line_height(&style);
        cx.graph.add_primitive(
            node,
            TextPrimitive::new(
                Rect::new(BOX + GAP, centered(size.height, line_h), inferred.content.width, line_h),
                spec.label.as_str(),
                StyleToken::CheckboxLabel,
            )
            .into(),
        );
    }

    if spec.common.interactive() {
        let behavior = CheckboxBehavior {
            frame,
            mark,
            ring,
            on_change: spec.on_change,
        };
        let state = InteractionState::with_value(if spec.checked { 1.0 } else { 0.0 });
        cx.attach(node, Interactive::new(behavior, Rc::new(RefCell::new(state))));
    }
    WidgetHandle::new(node)
}
