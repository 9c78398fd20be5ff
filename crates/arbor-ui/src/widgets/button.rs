use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;

use super::{Common, centered, common_builders, focus_ring, interactive_root};
use crate::interaction::{Behavior, InteractionState, Interactive, PressModel, Response, Step, advance};
use crate::sizing::{SizeRules, TextContent, infer};
use crate::{BuildCx, WidgetHandle};

const PAD_X: f32 = 16.0;
const PAD_Y: f32 = 8.0;
const MIN_W: f32 = 64.0;
const MIN_H: f32 = 32.0;

pub struct ButtonSpec {
    pub label: String,
    pub on_click: Option<Rc<dyn Fn()>>,
    pub common: Common,
}

impl ButtonSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on_click: None,
            common: Common::default(),
        }
    }

    pub fn on_click(mut self, f: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }
}

common_builders!(ButtonSpec);

struct ButtonBehavior {
    background: PrimitiveId,
    ring: PrimitiveId,
    on_click: Option<Rc<dyn Fn()>>,
}

impl ButtonBehavior {
    fn paint(&self, st: &InteractionState, graph: &mut dyn SceneGraph) {
        let token = if st.is_armed() {
            StyleToken::ButtonPressed
        } else if st.hovered {
            StyleToken::ButtonHover
        } else {
            StyleToken::Button
        };
        graph.set_style(self.background, token);
    }
}

impl Behavior for ButtonBehavior {
    type State = InteractionState;
    type Notice = ();

    fn handle(
        &self,
        st: &mut InteractionState,
        graph: &mut dyn SceneGraph,
        _node: NodeId,
        ev: &InputEvent,
    ) -> Response<()> {
        let step = advance(st, ev, PressModel::Press);
        let resp = match step {
            Step::Activate => Response::notify(()),
            Step::Key(k) if k.is_activation() => Response::notify(()),
            Step::Key(_) | Step::Scroll(_) => Response::ignored(),
            other => Response::from_step(other),
        };
        self.paint(st, graph);
        resp
    }

    fn notify(&self, _: ()) {
        if let Some(f) = &self.on_click {
            f();
        }
    }

    fn focus_changed(&self, _st: &mut InteractionState, graph: &mut dyn SceneGraph, _node: NodeId, focused: bool) {
        graph.set_primitive_visible(self.ring, focused);
    }
}

/// Push button.
///
/// Click fires on release inside the button, or on Enter/Space while
/// focused. A cancelled press restores the resting style and fires nothing.
pub fn Button(cx: &mut BuildCx, spec: ButtonSpec) -> WidgetHandle {
    let style = cx.text_style(StyleToken::ButtonLabel);
    let inferred = infer(
        cx.metrics.as_ref(),
        &spec.common.size,
        Some(TextContent::new(&spec.label, style)),
        SizeRules::padded(PAD_X, PAD_Y).minimum(MIN_W, MIN_H),
    );
    let node = interactive_root(cx, &spec.common, inferred.apply(spec.common.size));
    if !node.is_valid() {
        return WidgetHandle::invalid();
    }
    let size = inferred.or_fallback(Size::new(MIN_W, MIN_H));

    let ring = focus_ring(cx, node, size);
    let base = if spec.common.enabled {
        StyleToken::Button
    } else {
        StyleToken::ButtonDisabled
    };
    let background = cx.graph.add_primitive(node, Primitive::rect(Rect::from_size(size), base));
    let label_h = cx.metrics.line_height(&style);
    let label_w = inferred.content.width;
    cx.graph.add_primitive(
        node,
        TextPrimitive::new(
            Rect::new(
                centered(size.width, label_w),
                centered(size.height, label_h),
                label_w,
                label_h,
            ),
            spec.label.as_str(),
            StyleToken::ButtonLabel,
        )
        .align(TextAlign::Center)
        .into(),
    );

    if spec.common.interactive() {
        let behavior = ButtonBehavior {
            background,
            ring,
            on_click: spec.on_click,
        };
        cx.attach(node, Interactive::new(behavior, Rc::new(RefCell::new(InteractionState::default()))));
    }
    WidgetHandle::new(node)
}
