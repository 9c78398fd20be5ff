use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;
use arbor_text::{TextMetrics, TextStyle};
use unicode_segmentation::UnicodeSegmentation;

use crate::interaction::{Behavior, InteractionState, Interactive, PressModel, Response, Step, advance};
use crate::sizing::{SizeRules, TextContent, infer};
use crate::widgets::{Common, centered, common_builders, focus_ring, interactive_root};
use crate::{BuildCx, WidgetHandle};

pub const TF_PADDING_X: f32 = 8.0;
pub const TF_PADDING_Y: f32 = 6.0;
const CARET_W: f32 = 1.5;
const MIN_W: f32 = 160.0;

/// Byte offset of the grapheme boundary before `byte`.
fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i >= byte {
            break;
        }
        last = i;
    }
    last
}

/// Byte offset of the grapheme boundary after `byte`.
fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    for (i, _) in text.grapheme_indices(true) {
        if i > byte {
            return i;
        }
    }
    text.len()
}

/// Nearest grapheme boundary to `x` (content coordinates).
fn index_for_x(metrics: &dyn TextMetrics, style: &TextStyle, text: &str, x: f32) -> usize {
    let mut best = 0usize;
    let mut best_d = x.abs();
    for (i, g) in text.grapheme_indices(true) {
        let end = i + g.len();
        let d = (metrics.measure_width(style, &text[..end]) - x).abs();
        if d < best_d {
            best_d = d;
            best = end;
        }
    }
    best
}

/// Single-line edit buffer. `caret` is a byte offset on a grapheme boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextFieldState {
    pub text: String,
    pub caret: usize,
    pub focused: bool,
    pub base: InteractionState,
}

impl TextFieldState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            caret: text.len(),
            text,
            ..Self::default()
        }
    }

    pub fn insert_text(&mut self, s: &str) {
        let at = self.caret.min(self.text.len());
        self.text.insert_str(at, s);
        self.caret = at + s.len();
    }

    /// Remove the grapheme before the caret. `false` at the start.
    pub fn delete_backward(&mut self) -> bool {
        let pos = self.caret.min(self.text.len());
        if pos == 0 {
            return false;
        }
        let prev = prev_grapheme_boundary(&self.text, pos);
        self.text.replace_range(prev..pos, "");
        self.caret = prev;
        true
    }

    /// Remove the grapheme after the caret. `false` at the end.
    pub fn delete_forward(&mut self) -> bool {
        let pos = self.caret.min(self.text.len());
        if pos >= self.text.len() {
            return false;
        }
        let next = next_grapheme_boundary(&self.text, pos);
        self.text.replace_range(pos..next, "");
        true
    }

    pub fn move_left(&mut self) {
        self.caret = prev_grapheme_boundary(&self.text, self.caret.min(self.text.len()));
    }

    pub fn move_right(&mut self) {
        self.caret = next_grapheme_boundary(&self.text, self.caret.min(self.text.len()));
    }
}

pub struct TextFieldSpec {
    pub text: String,
    pub placeholder: String,
    pub on_change: Option<Rc<dyn Fn(&str)>>,
    pub on_submit: Option<Rc<dyn Fn(&str)>>,
    pub common: Common,
}

impl TextFieldSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            placeholder: String::new(),
            on_change: None,
            on_submit: None,
            common: Common::default(),
        }
    }
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }
    pub fn on_change(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
    pub fn on_submit(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_submit = Some(Rc::new(f));
        self
    }
}

common_builders!(TextFieldSpec);

pub enum FieldNotice {
    Changed(String),
    Submitted(String),
}

struct TextFieldBehavior {
    metrics: Rc<dyn TextMetrics>,
    style: TextStyle,
    background: PrimitiveId,
    text: PrimitiveId,
    placeholder: PrimitiveId,
    caret: PrimitiveId,
    ring: PrimitiveId,
    text_y: f32,
    line_h: f32,
    on_change: Option<Rc<dyn Fn(&str)>>,
    on_submit: Option<Rc<dyn Fn(&str)>>,
}

impl TextFieldBehavior {
    fn paint(&self, st: &TextFieldState, graph: &mut dyn SceneGraph) {
        graph.set_text(self.text, &st.text);
        graph.set_primitive_visible(self.placeholder, st.text.is_empty());
        let upto = &st.text[..st.caret.min(st.text.len())];
        let x = TF_PADDING_X + self.metrics.measure_width(&self.style, upto);
        graph.set_bounds(self.caret, Rect::new(x, self.text_y, CARET_W, self.line_h));
        graph.set_primitive_visible(self.caret, st.focused);
        graph.set_style(
            self.background,
            if st.focused {
                StyleToken::FieldFocused
            } else {
                StyleToken::Field
            },
        );
    }

    fn edit(&self, st: &mut TextFieldState, key: Key) -> Option<FieldNotice> {
        let changed = match key {
            Key::Character(c) if !c.is_control() => {
                let mut buf = [0u8; 4];
                st.insert_text(c.encode_utf8(&mut buf));
                true
            }
            Key::Space => {
                st.insert_text(" ");
                true
            }
            Key::Backspace => st.delete_backward(),
            Key::Delete => st.delete_forward(),
            Key::ArrowLeft => {
                st.move_left();
                false
            }
            Key::ArrowRight => {
                st.move_right();
                false
            }
            Key::Home => {
                st.caret = 0;
                false
            }
            Key::End => {
                st.caret = st.text.len();
                false
            }
            Key::Enter => return Some(FieldNotice::Submitted(st.text.clone())),
            _ => return None,
        };
        changed.then(|| FieldNotice::Changed(st.text.clone()))
    }
}

impl Behavior for TextFieldBehavior {
    type State = TextFieldState;
    type Notice = FieldNotice;

    fn handle(&self, st: &mut TextFieldState, graph: &mut dyn SceneGraph, _node: NodeId, ev: &InputEvent) -> Response<FieldNotice> {
        let resp = match advance(&mut st.base, ev, PressModel::Press) {
            Step::Visual if ev.kind == EventKind::PointerDown => {
                let x = ev.local.x - TF_PADDING_X;
                st.caret = index_for_x(self.metrics.as_ref(), &self.style, &st.text, x);
                Response::consumed()
            }
            Step::Key(k) => {
                let known = matches!(
                    k,
                    Key::Character(_)
                        | Key::Space
                        | Key::Backspace
                        | Key::Delete
                        | Key::ArrowLeft
                        | Key::ArrowRight
                        | Key::Home
                        | Key::End
                        | Key::Enter
                );
                match self.edit(st, k) {
                    Some(n) => Response::notify(n),
                    None if known => Response::consumed(),
                    None => Response::ignored(),
                }
            }
            Step::Scroll(_) => Response::ignored(),
            other => Response::from_step(other),
        };
        self.paint(st, graph);
        resp
    }

    fn notify(&self, notice: FieldNotice) {
        match notice {
            FieldNotice::Changed(t) => {
                if let Some(f) = &self.on_change {
                    f(&t);
                }
            }
            FieldNotice::Submitted(t) => {
                if let Some(f) = &self.on_submit {
                    f(&t);
                }
            }
        }
    }

    fn focus_changed(&self, st: &mut TextFieldState, graph: &mut dyn SceneGraph, _node: NodeId, focused: bool) {
        st.focused = focused;
        graph.set_primitive_visible(self.ring, focused);
        self.paint(st, graph);
    }
}

/// Text field plus its live edit buffer.
#[derive(Clone)]
pub struct TextFieldHandle {
    pub handle: WidgetHandle,
    state: Rc<RefCell<TextFieldState>>,
}

impl TextFieldHandle {
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }
}

/// Single-line text input. Editing keys apply while focused; Enter submits.
pub fn TextField(cx: &mut BuildCx, spec: TextFieldSpec) -> TextFieldHandle {
    let style = cx.text_style(StyleToken::FieldText);
    let sample = if spec.text.is_empty() { &spec.placeholder } else { &spec.text };
    let inferred = infer(
        cx.metrics.as_ref(),
        &spec.common.size,
        Some(TextContent::new(sample, style)),
        SizeRules::padded(TF_PADDING_X, TF_PADDING_Y).minimum(MIN_W, 0.0),
    );
    let state = Rc::new(RefCell::new(TextFieldState::new(spec.text.clone())));
    let node = interactive_root(cx, &spec.common, inferred.apply(spec.common.size));
    let handle = TextFieldHandle {
        handle: WidgetHandle::new(node),
        state: state.clone(),
    };
    if !node.is_valid() {
        return handle;
    }
    let line_h = cx.metrics.line_height(&style);
    let size = inferred.or_fallback(Size::new(MIN_W, line_h + TF_PADDING_Y * 2.0));
    let text_y = centered(size.height, line_h);
    let inner = Rect::new(TF_PADDING_X, text_y, (size.width - TF_PADDING_X * 2.0).max(0.0), line_h);

    cx.configure(node, |n| n.flags |= NodeFlags::CLIP);
    let ring = focus_ring(cx, node, size);
    let background = cx.graph.add_primitive(node, Primitive::rect(Rect::from_size(size), StyleToken::Field));
    let placeholder = cx.graph.add_primitive(
        node,
        TextPrimitive::new(inner, spec.placeholder.as_str(), StyleToken::FieldPlaceholder).into(),
    );
    let text = cx.graph.add_primitive(node, TextPrimitive::new(inner, spec.text.as_str(), StyleToken::FieldText).into());
    let caret = cx.graph.add_primitive(node, Primitive::rect(Rect::ZERO, StyleToken::FieldCaret));

    let behavior = TextFieldBehavior {
        metrics: cx.metrics.clone(),
        style,
        background,
        text,
        placeholder,
        caret,
        ring,
        text_y,
        line_h,
        on_change: spec.on_change,
        on_submit: spec.on_submit,
    };
    behavior.paint(&state.borrow(), cx.graph);
    if spec.common.interactive() {
        cx.attach(node, Interactive::new(behavior, state));
    }
    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backspace_removes_whole_grapheme_cluster() {
        let mut st = TextFieldState::new("ae\u{301}");
        assert!(st.delete_backward());
        assert_eq!(st.text, "a");
        assert_eq!(st.caret, 1);
        assert!(st.delete_backward());
        assert!(!st.delete_backward());
        assert_eq!(st.text, "");
    }

    #[test]
    fn caret_moves_by_grapheme() {
        let mut st = TextFieldState::new("a👍🏽b");
        st.move_left();
        assert_eq!(&st.text[st.caret..], "b");
        st.move_left();
        assert_eq!(&st.text[st.caret..], "👍🏽b");
        st.insert_text("x");
        assert_eq!(st.text, "ax👍🏽b");
        assert!(st.delete_forward());
        assert_eq!(st.text, "axb");
    }
}
