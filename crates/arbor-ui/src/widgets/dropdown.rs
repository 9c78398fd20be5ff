use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;

use super::{Common, centered, common_builders, focus_ring, interactive_root};
use crate::interaction::{Behavior, InteractionState, Interactive, PressModel, Response, Step, advance};
use crate::sizing::{SizeRules, infer};
use crate::{BuildCx, WidgetHandle};

const PAD_X: f32 = 10.0;
const PAD_Y: f32 = 6.0;
const CARET_W: f32 = 16.0;
const MIN_W: f32 = 120.0;
const MIN_H: f32 = 32.0;

pub struct DropdownSpec {
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub placeholder: String,
    pub on_change: Option<Rc<dyn Fn(usize)>>,
    pub common: Common,
}

impl DropdownSpec {
    pub fn new(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            selected: None,
            placeholder: String::from("Select…"),
            on_change: None,
            common: Common::default(),
        }
    }
    pub fn selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }
    pub fn on_change(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
}

common_builders!(DropdownSpec);

#[derive(Debug, Default)]
pub struct DropdownState {
    pub base: InteractionState,
    pub open: bool,
    pub highlighted: Option<usize>,
    pub selected: Option<usize>,
    /// Option under the pointer at press time.
    pressed_option: Option<usize>,
}

struct OptionVisual {
    background: PrimitiveId,
}

struct DropdownBehavior {
    background: PrimitiveId,
    label: PrimitiveId,
    ring: PrimitiveId,
    list: NodeId,
    options: Vec<OptionVisual>,
    labels: Vec<String>,
    trigger_h: f32,
    option_h: f32,
    on_change: Option<Rc<dyn Fn(usize)>>,
}

impl DropdownBehavior {
    fn option_at(&self, ev: &InputEvent) -> Option<usize> {
        let y = ev.local.y - self.trigger_h;
        if y < 0.0 || ev.local.x < 0.0 || ev.local.x > ev.size.width || self.option_h <= 0.0 {
            return None;
        }
        let i = (y / self.option_h).floor() as usize;
        (i < self.options.len()).then_some(i)
    }

    fn option_token(st: &DropdownState, i: usize) -> StyleToken {
        if st.selected == Some(i) {
            StyleToken::DropdownOptionSelected
        } else if st.highlighted == Some(i) {
            StyleToken::DropdownOptionHover
        } else {
            StyleToken::DropdownOption
        }
    }

    fn highlight(&self, st: &mut DropdownState, graph: &mut dyn SceneGraph, to: Option<usize>) {
        let old = std::mem::replace(&mut st.highlighted, to);
        for i in [old, to].into_iter().flatten() {
            if let Some(o) = self.options.get(i) {
                graph.set_style(o.background, Self::option_token(st, i));
            }
        }
    }

    fn set_open(&self, st: &mut DropdownState, graph: &mut dyn SceneGraph, open: bool) {
        st.open = open;
        graph.set_visible(self.list, open);
        if open {
            let h = st.selected;
            self.highlight(st, graph, h);
        }
    }

    fn choose(&self, st: &mut DropdownState, graph: &mut dyn SceneGraph, i: usize) -> Response<usize> {
        let old = st.selected.replace(i);
        for j in [old, Some(i)].into_iter().flatten() {
            if let Some(o) = self.options.get(j) {
                graph.set_style(o.background, Self::option_token(st, j));
            }
        }
        if let Some(text) = self.labels.get(i) {
            graph.set_text(self.label, text);
            graph.set_style(self.label, StyleToken::DropdownText);
        }
        self.set_open(st, graph, false);
        if old == Some(i) {
            Response::consumed()
        } else {
            Response::notify(i)
        }
    }

    fn handle_list(&self, st: &mut DropdownState, graph: &mut dyn SceneGraph, ev: &InputEvent, i: usize) -> Response<usize> {
        match ev.kind {
            EventKind::PointerDown => {
                st.pressed_option = Some(i);
                self.highlight(st, graph, Some(i));
                Response::consumed()
            }
            EventKind::PointerUp => {
                if st.pressed_option.take() == Some(i) {
                    self.choose(st, graph, i)
                } else {
                    Response::consumed()
                }
            }
            EventKind::PointerEnter | EventKind::PointerMove | EventKind::PointerDrag => {
                self.highlight(st, graph, Some(i));
                Response::consumed()
            }
            EventKind::PointerCancel => {
                st.pressed_option = None;
                Response::consumed()
            }
            _ => Response::ignored(),
        }
    }

    fn handle_key(&self, st: &mut DropdownState, graph: &mut dyn SceneGraph, key: Key) -> Response<usize> {
        let n = self.options.len();
        if !st.open {
            return match key {
                k if k.is_activation() || k == Key::ArrowDown => {
                    self.set_open(st, graph, true);
                    Response::consumed()
                }
                _ => Response::ignored(),
            };
        }
        let cur = st.highlighted;
        let target = match key {
            Key::ArrowDown => Some(cur.map_or(0, |c| (c + 1).min(n - 1))),
            Key::ArrowUp => Some(cur.map_or(n - 1, |c| c.saturating_sub(1))),
            Key::Home => Some(0),
            Key::End => Some(n - 1),
            Key::Escape => {
                self.set_open(st, graph, false);
                return Response::consumed();
            }
            k if k.is_activation() => {
                return match cur {
                    Some(i) => self.choose(st, graph, i),
                    None => {
                        self.set_open(st, graph, false);
                        Response::consumed()
                    }
                };
            }
            _ => return Response::ignored(),
        };
        self.highlight(st, graph, target);
        Response::consumed()
    }
}

impl Behavior for DropdownBehavior {
    type State = DropdownState;
    type Notice = usize;

    fn handle(
        &self,
        st: &mut DropdownState,
        graph: &mut dyn SceneGraph,
        _node: NodeId,
        ev: &InputEvent,
    ) -> Response<usize> {
        if st.open
            && ev.kind.is_pointer()
            && let Some(i) = self.option_at(ev)
        {
            return self.handle_list(st, graph, ev, i);
        }

        let resp = match advance(&mut st.base, ev, PressModel::Press) {
            Step::Activate => {
                let open = !st.open;
                self.set_open(st, graph, open);
                Response::consumed()
            }
            Step::Key(k) => self.handle_key(st, graph, k),
            Step::Scroll(_) => Response::ignored(),
            other => Response::from_step(other),
        };
        graph.set_style(
            self.background,
            if st.base.hovered || st.open {
                StyleToken::DropdownHover
            } else {
                StyleToken::Dropdown
            },
        );
        resp
    }

    fn notify(&self, index: usize) {
        if let Some(f) = &self.on_change {
            f(index);
        }
    }

    fn focus_changed(&self, st: &mut DropdownState, graph: &mut dyn SceneGraph, _node: NodeId, focused: bool) {
        graph.set_primitive_visible(self.ring, focused);
        if !focused && st.open {
            self.set_open(st, graph, false);
        }
    }
}

/// Single-choice dropdown. The option list is a hidden child shown below
/// the trigger; clicks on it bubble to the trigger's callback.
///
/// An empty option list builds the placeholder only, with no callback.
pub fn Dropdown(cx: &mut BuildCx, spec: DropdownSpec) -> WidgetHandle {
    let style = cx.text_style(StyleToken::DropdownText);
    let widest = spec
        .options
        .iter()
        .chain(std::iter::once(&spec.placeholder))
        .map(|o| cx.metrics.measure_width(&style, o))
        .fold(0.0f32, f32::max);
    let line_h = cx.metrics.line_height(&style);
    let mut rules = SizeRules::padded(PAD_X, PAD_Y).minimum(MIN_W, MIN_H);
    rules.padding.width += CARET_W;
    let mut inferred = infer(cx.metrics.as_ref(), &spec.common.size, None, rules);
    if spec.common.size.is_width_unresolved() {
        inferred.width = Some((widest + rules.padding.width).max(MIN_W));
    }
    if spec.common.size.is_height_unresolved() {
        inferred.height = Some((line_h + rules.padding.height).max(MIN_H));
    }

    let mut common = spec.common.clone();
    let selected = spec.selected.filter(|i| *i < spec.options.len());
    if spec.options.is_empty() {
        common.enabled = false;
    }
    let node = interactive_root(cx, &common, inferred.apply(spec.common.size));
    if !node.is_valid() {
        return WidgetHandle::invalid();
    }
    let size = inferred.or_fallback(Size::new(MIN_W, MIN_H));

    let ring = focus_ring(cx, node, size);
    let background = cx.graph.add_primitive(node, Primitive::rect(Rect::from_size(size), StyleToken::Dropdown));
    let (text, token) = match selected {
        Some(i) => (spec.options[i].as_str(), StyleToken::DropdownText),
        None => (spec.placeholder.as_str(), StyleToken::TextMuted),
    };
    let text_y = centered(size.height, line_h);
    let label = cx.graph.add_primitive(
        node,
        TextPrimitive::new(
            Rect::new(PAD_X, text_y, (size.width - PAD_X * 2.0 - CARET_W).max(0.0), line_h),
            text,
            token,
        )
        .into(),
    );
    cx.graph.add_primitive(
        node,
        TextPrimitive::new(
            Rect::new(size.width - PAD_X - CARET_W, text_y, CARET_W, line_h),
            "▾",
            StyleToken::TextMuted,
        )
        .align(TextAlign::Center)
        .into(),
    );

    if spec.options.is_empty() {
        return WidgetHandle::new(node);
    }

    let option_h = line_h + PAD_Y * 2.0;
    let list = cx.create_child(node);
    cx.configure(list, |n| {
        n.layout = LayoutMode::Absolute;
        n.position = Vec2::new(0.0, size.height);
        n.size = SizeSpec::fixed(size.width, option_h * spec.options.len() as f32);
        n.measured = Size::new(size.width, option_h * spec.options.len() as f32);
        n.flags.remove(NodeFlags::VISIBLE);
    });
    cx.graph.add_primitive(
        list,
        Primitive::rect(
            Rect::new(0.0, 0.0, size.width, option_h * spec.options.len() as f32),
            StyleToken::DropdownList,
        ),
    );

    let mut options = Vec::with_capacity(spec.options.len());
    for (i, text) in spec.options.iter().enumerate() {
        let row = cx.create_child(list);
        cx.configure(row, |n| {
            n.position = Vec2::new(0.0, option_h * i as f32);
            n.size = SizeSpec::fixed(size.width, option_h);
            n.measured = Size::new(size.width, option_h);
            n.flags |= NodeFlags::HIT_TEST;
        });
        let token = if selected == Some(i) {
            StyleToken::DropdownOptionSelected
        } else {
            StyleToken::DropdownOption
        };
        let background = cx.graph.add_primitive(row, Primitive::rect(Rect::new(0.0, 0.0, size.width, option_h), token));
        cx.graph.add_primitive(
            row,
            TextPrimitive::new(
                Rect::new(PAD_X, PAD_Y, (size.width - PAD_X * 2.0).max(0.0), line_h),
                text.as_str(),
                StyleToken::DropdownText,
            )
            .into(),
        );
        options.push(OptionVisual { background });
    }

    if common.interactive() {
        let behavior = DropdownBehavior {
            background,
            label,
            ring,
            list,
            options,
            labels: spec.options,
            trigger_h: size.height,
            option_h,
            on_change: spec.on_change,
        };
        let state = DropdownState {
            selected,
            ..DropdownState::default()
        };
        cx.attach(node, Interactive::new(behavior, Rc::new(RefCell::new(state))));
    }
    WidgetHandle::new(node)
}
