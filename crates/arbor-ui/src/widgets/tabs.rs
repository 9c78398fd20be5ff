use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;

use super::{Common, common_builders, focus_ring, interactive_root};
use crate::interaction::{Behavior, InteractionState, Interactive, PressModel, Response, Step, advance};
use crate::sizing::{SizeRules, infer};
use crate::{BuildCx, WidgetHandle};

const PAD_X: f32 = 14.0;
const PAD_Y: f32 = 8.0;
const INDICATOR_H: f32 = 2.0;

pub struct TabsSpec {
    pub labels: Vec<String>,
    pub selected: usize,
    pub on_change: Option<Rc<dyn Fn(usize)>>,
    pub common: Common,
}

impl TabsSpec {
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            selected: 0,
            on_change: None,
            common: Common::default(),
        }
    }
    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }
    pub fn on_change(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
}

common_builders!(TabsSpec);

struct TabVisual {
    background: PrimitiveId,
    x: f32,
    w: f32,
}

struct TabsBehavior {
    tabs: Vec<TabVisual>,
    indicator: PrimitiveId,
    ring: PrimitiveId,
    height: f32,
    on_change: Option<Rc<dyn Fn(usize)>>,
}

impl TabsBehavior {
    fn tab_at(&self, x: f32) -> Option<usize> {
        self.tabs.iter().position(|t| x >= t.x && x < t.x + t.w)
    }

    fn token(st: &InteractionState, hovered: Option<usize>, i: usize) -> StyleToken {
        if st.selection == Some(i) {
            StyleToken::TabSelected
        } else if hovered == Some(i) {
            StyleToken::TabHover
        } else {
            StyleToken::Tab
        }
    }

    fn repaint(&self, st: &InteractionState, graph: &mut dyn SceneGraph, hovered: Option<usize>, touched: &[Option<usize>]) {
        for i in touched.iter().flatten() {
            if let Some(t) = self.tabs.get(*i) {
                graph.set_style(t.background, Self::token(st, hovered, *i));
            }
        }
        if let Some(t) = st.selection.and_then(|i| self.tabs.get(i)) {
            graph.set_bounds(self.indicator, Rect::new(t.x, self.height - INDICATOR_H, t.w, INDICATOR_H));
        }
    }

    fn select(&self, st: &mut InteractionState, graph: &mut dyn SceneGraph, i: usize, hovered: Option<usize>) -> Response<usize> {
        let old = st.selection;
        if old == Some(i) {
            return Response::consumed();
        }
        st.selection = Some(i);
        self.repaint(st, graph, hovered, &[old, Some(i)]);
        Response::notify(i)
    }
}

#[derive(Default)]
struct TabsState {
    base: InteractionState,
    hovered: Option<usize>,
    pressed_tab: Option<usize>,
}

impl Behavior for TabsBehavior {
    type State = TabsState;
    type Notice = usize;

    fn handle(&self, st: &mut TabsState, graph: &mut dyn SceneGraph, _node: NodeId, ev: &InputEvent) -> Response<usize> {
        let step = advance(&mut st.base, ev, PressModel::Press);
        let under = if ev.is_inside() { self.tab_at(ev.local.x) } else { None };
        if ev.kind.is_pointer() && under != st.hovered {
            let old = std::mem::replace(&mut st.hovered, under);
            self.repaint(&st.base, graph, st.hovered, &[old, under]);
        }
        match step {
            Step::Visual if ev.kind == EventKind::PointerDown => {
                st.pressed_tab = under;
                Response::consumed()
            }
            Step::Activate => match (st.pressed_tab.take(), under) {
                (Some(p), Some(u)) if p == u => self.select(&mut st.base, graph, u, st.hovered),
                _ => Response::consumed(),
            },
            Step::Cancelled => {
                st.pressed_tab = None;
                Response::consumed()
            }
            Step::Key(k) => {
                let n = self.tabs.len();
                let cur = st.base.selection.unwrap_or(0);
                let target = match k {
                    Key::ArrowLeft => cur.saturating_sub(1),
                    Key::ArrowRight => (cur + 1).min(n - 1),
                    Key::Home => 0,
                    Key::End => n - 1,
                    _ => return Response::ignored(),
                };
                self.select(&mut st.base, graph, target, st.hovered)
            }
            Step::Scroll(_) => Response::ignored(),
            other => Response::from_step(other),
        }
    }

    fn notify(&self, index: usize) {
        if let Some(f) = &self.on_change {
            f(index);
        }
    }

    fn focus_changed(&self, _st: &mut TabsState, graph: &mut dyn SceneGraph, _node: NodeId, focused: bool) {
        graph.set_primitive_visible(self.ring, focused);
    }
}

/// Horizontal tab strip; each tab is as wide as its label plus padding.
/// Left/Right/Home/End move the selection while focused.
pub fn Tabs(cx: &mut BuildCx, spec: TabsSpec) -> WidgetHandle {
    let style = cx.text_style(StyleToken::TabLabel);
    let line_h = cx.metrics.line_height(&style);
    let widths: Vec<f32> = spec
        .labels
        .iter()
        .map(|l| cx.metrics.measure_width(&style, l) + PAD_X * 2.0)
        .collect();
    let content_w: f32 = widths.iter().sum();
    let content_h = line_h + PAD_Y * 2.0 + INDICATOR_H;

    let mut inferred = infer(cx.metrics.as_ref(), &spec.common.size, None, SizeRules::default());
    if spec.common.size.is_width_unresolved() {
        inferred.width = Some(content_w);
    }
    if spec.common.size.is_height_unresolved() {
        inferred.height = Some(content_h);
    }

    let mut common = spec.common.clone();
    if spec.labels.is_empty() {
        common.enabled = false;
    }
    let node = interactive_root(cx, &common, inferred.apply(spec.common.size));
    if !node.is_valid() {
        return WidgetHandle::invalid();
    }
    let size = inferred.or_fallback(Size::new(content_w, content_h));
    let ring = focus_ring(cx, node, size);
    let selected = (spec.selected < spec.labels.len()).then_some(spec.selected);

    let mut tabs = Vec::with_capacity(spec.labels.len());
    let mut x = 0.0;
    for (i, (label, w)) in spec.labels.iter().zip(&widths).enumerate() {
        let tab = cx.create_child(node);
        cx.configure(tab, |n| {
            n.position = Vec2::new(x, 0.0);
            n.size = SizeSpec::fixed(*w, size.height);
            n.measured = Size::new(*w, size.height);
        });
        let token = if selected == Some(i) { StyleToken::TabSelected } else { StyleToken::Tab };
        let background = cx.graph.add_primitive(tab, Primitive::rect(Rect::new(0.0, 0.0, *w, size.height), token));
        cx.graph.add_primitive(
            tab,
            TextPrimitive::new(Rect::new(PAD_X, PAD_Y, *w - PAD_X * 2.0, line_h), label.as_str(), StyleToken::TabLabel)
                .align(TextAlign::Center)
                .into(),
        );
        tabs.push(TabVisual { background, x, w: *w });
        x += *w;
    }
    cx.configure(node, |n| n.layout = LayoutMode::Absolute);

    let indicator = cx.graph.add_primitive(node, Primitive::rect(Rect::ZERO, StyleToken::TabIndicator));
    let behavior = TabsBehavior {
        tabs,
        indicator,
        ring,
        height: size.height,
        on_change: spec.on_change,
    };
    let state = TabsState {
        base: InteractionState {
            selection: selected,
            ..InteractionState::default()
        },
        ..TabsState::default()
    };
    behavior.repaint(&state.base, cx.graph, None, &[]);
    if selected.is_none() {
        cx.graph.set_primitive_visible(indicator, false);
    }
    if common.interactive() {
        cx.attach(node, Interactive::new(behavior, Rc::new(RefCell::new(state))));
    }
    WidgetHandle::new(node)
}
