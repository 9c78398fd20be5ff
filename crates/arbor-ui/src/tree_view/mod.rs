//! # Tree view
//!
//! A hierarchy rendered as a scrolling list of rows. Each build flattens the
//! expanded part of the tree ([`flatten`]), creates one node per row with its
//! primitives cached in a [`RowVisual`], and installs a single callback on
//! the viewport that drives:
//!
//! - hover and selection, repainting only the rows that changed,
//! - scrolling by wheel, thumb drag and "keep the selection visible",
//! - keyboard navigation (arrows, Home/End, PageUp/PageDown, Enter),
//! - double-click detection against the runtime [`Clock`],
//! - expand/collapse, which records the new state in [`TreeViewState`] and
//!   requests a rebuild.
//!
//! Row visuals belong to one build. State that must outlive a rebuild
//! (expansion, selection, scroll offset, the last click) lives in
//! [`TreeViewState`], shared through an `Rc`.

mod connectors;
mod flatten;
mod visuals;

pub use connectors::{RowGeometry, Segment, connector_segments};
pub use flatten::{FlatRow, RowPath, dump, find_row, flatten, last_child};
pub use visuals::{RowVisual, glyph};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use arbor_core::*;
use web_time::Instant;

use crate::config::Clock;
use crate::context::RebuildFlag;
use crate::interaction::{Behavior, Interactive, Response};
use crate::scroll::{ScrollMetrics, Scrollbar, ThumbDrag};
use crate::sizing::{SizeRules, infer};
use crate::widgets::{Common, common_builders, focus_ring, interactive_root};
use crate::{BuildCx, WidgetHandle};

const CONNECTOR_WIDTH: f32 = 1.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
    /// Initial expansion; user toggles are kept in [`TreeViewState`].
    pub expanded: bool,
}

impl TreeNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn branch(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            children,
            expanded: false,
        }
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

/// Passed to tree callbacks.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeRowInfo {
    pub row: usize,
    pub path: RowPath,
    pub label: String,
    pub depth: usize,
    pub has_children: bool,
    /// For toggles, the state after the toggle.
    pub expanded: bool,
}

#[derive(Debug, Default)]
struct Memo {
    expansion: HashMap<RowPath, bool>,
    selected: Option<RowPath>,
    offset: f32,
    last_click: Option<(RowPath, Instant)>,
}

/// Tree view state that survives rebuilds.
#[derive(Debug, Default)]
pub struct TreeViewState {
    memo: RefCell<Memo>,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded expansion for `path`, else `default`.
    pub fn is_expanded(&self, path: &[usize], default: bool) -> bool {
        self.memo
            .borrow()
            .expansion
            .get(path)
            .copied()
            .unwrap_or(default)
    }

    pub fn set_expanded(&self, path: &[usize], expanded: bool) {
        self.memo
            .borrow_mut()
            .expansion
            .insert(RowPath::from_slice(path), expanded);
    }

    pub fn selected(&self) -> Option<RowPath> {
        self.memo.borrow().selected.clone()
    }

    pub fn select(&self, path: Option<&[usize]>) {
        self.memo.borrow_mut().selected = path.map(RowPath::from_slice);
    }

    pub fn offset(&self) -> f32 {
        self.memo.borrow().offset
    }

    fn set_offset(&self, offset: f32) {
        self.memo.borrow_mut().offset = offset;
    }

    /// Record a press on `path`. True when it completes a double click, in
    /// which case the record is cleared.
    fn press(&self, path: &[usize], now: Instant, window: Duration) -> bool {
        let mut memo = self.memo.borrow_mut();
        let double = matches!(
            &memo.last_click,
            Some((p, at)) if p.as_slice() == path && now.saturating_duration_since(*at) <= window
        );
        memo.last_click = if double {
            None
        } else {
            Some((RowPath::from_slice(path), now))
        };
        double
    }
}

pub struct TreeViewSpec {
    pub items: Vec<TreeNode>,
    /// Selection used until the user picks a row.
    pub selected: Option<RowPath>,
    pub state: Option<Rc<TreeViewState>>,
    pub connectors: bool,
    pub accent: bool,
    pub on_select: Option<Rc<dyn Fn(&TreeRowInfo)>>,
    pub on_activate: Option<Rc<dyn Fn(&TreeRowInfo)>>,
    pub on_toggle: Option<Rc<dyn Fn(&TreeRowInfo)>>,
    pub common: Common,
}

impl TreeViewSpec {
    pub fn new(items: Vec<TreeNode>) -> Self {
        Self {
            items,
            selected: None,
            state: None,
            connectors: true,
            accent: true,
            on_select: None,
            on_activate: None,
            on_toggle: None,
            common: Common::default(),
        }
    }
    pub fn selected(mut self, path: &[usize]) -> Self {
        self.selected = Some(RowPath::from_slice(path));
        self
    }
    /// Share state with earlier builds. Without it, a keyed tree remembers
    /// its state under the key; an unkeyed one starts fresh every build.
    pub fn state(mut self, state: Rc<TreeViewState>) -> Self {
        self.state = Some(state);
        self
    }
    pub fn connectors(mut self, on: bool) -> Self {
        self.connectors = on;
        self
    }
    pub fn accent(mut self, on: bool) -> Self {
        self.accent = on;
        self
    }
    pub fn on_select(mut self, f: impl Fn(&TreeRowInfo) + 'static) -> Self {
        self.on_select = Some(Rc::new(f));
        self
    }
    pub fn on_activate(mut self, f: impl Fn(&TreeRowInfo) + 'static) -> Self {
        self.on_activate = Some(Rc::new(f));
        self
    }
    pub fn on_toggle(mut self, f: impl Fn(&TreeRowInfo) + 'static) -> Self {
        self.on_toggle = Some(Rc::new(f));
        self
    }
}

common_builders!(TreeViewSpec);

pub struct TreeViewHandle {
    /// `root` is the viewport, `content` holds the rows.
    pub handle: WidgetHandle,
    pub state: Rc<TreeViewState>,
    pub rows: Vec<FlatRow>,
    pub visuals: Vec<RowVisual>,
    pub geometry: RowGeometry,
}

#[derive(Debug, Default)]
struct TreeState {
    hovered: Option<usize>,
    selected: Option<usize>,
    scroll: ScrollMetrics,
    drag: Option<ThumbDrag>,
}

enum TreeNotice {
    Select(TreeRowInfo),
    Activate(TreeRowInfo),
    Toggle(TreeRowInfo),
}

struct TreeBehavior {
    rows: Vec<FlatRow>,
    visuals: Vec<RowVisual>,
    geo: RowGeometry,
    size: Size,
    bar: Scrollbar,
    ring: PrimitiveId,
    memo: Rc<TreeViewState>,
    clock: Rc<dyn Clock>,
    double_click: Duration,
    wheel: f32,
    rebuild: RebuildFlag,
    on_select: Option<Rc<dyn Fn(&TreeRowInfo)>>,
    on_activate: Option<Rc<dyn Fn(&TreeRowInfo)>>,
    on_toggle: Option<Rc<dyn Fn(&TreeRowInfo)>>,
}

impl TreeBehavior {
    fn info(&self, i: usize, expanded: bool) -> Option<TreeRowInfo> {
        let r = self.rows.get(i)?;
        Some(TreeRowInfo {
            row: i,
            path: r.path.clone(),
            label: r.label.clone(),
            depth: r.depth,
            has_children: r.has_children,
            expanded,
        })
    }

    /// Current expansion of row `i`, including toggles since this build.
    fn is_expanded(&self, i: usize) -> bool {
        self.rows
            .get(i)
            .is_some_and(|r| r.has_children && self.memo.is_expanded(&r.path, r.expanded))
    }

    fn viewport(&self, ev: &InputEvent) -> Size {
        if ev.size.width > 0.0 && ev.size.height > 0.0 {
            ev.size
        } else {
            self.size
        }
    }

    fn row_at(&self, st: &TreeState, ev: &InputEvent) -> Option<usize> {
        if !ev.is_inside() || self.bar.hits_bar(ev, &st.scroll) || self.geo.pitch <= 0.0 {
            return None;
        }
        let y = ev.local.y + st.scroll.offset();
        let i = (y / self.geo.pitch).floor();
        (i >= 0.0 && (i as usize) < self.rows.len()).then_some(i as usize)
    }

    fn on_glyph(&self, i: usize, x: f32) -> bool {
        self.rows.get(i).is_some_and(|r| {
            let x0 = self.geo.glyph_x(r.depth);
            r.has_children && x >= x0 && x < x0 + self.geo.indent
        })
    }

    fn repaint(&self, st: &TreeState, graph: &mut dyn SceneGraph, i: Option<usize>) {
        if let Some(i) = i
            && let Some(v) = self.visuals.get(i)
        {
            v.paint(graph, st.hovered == Some(i), st.selected == Some(i));
        }
    }

    fn hover(&self, st: &mut TreeState, graph: &mut dyn SceneGraph, row: Option<usize>) -> bool {
        if st.hovered == row {
            return false;
        }
        let old = std::mem::replace(&mut st.hovered, row);
        self.repaint(st, graph, old);
        self.repaint(st, graph, row);
        true
    }

    fn apply_scroll(&self, st: &TreeState, graph: &mut dyn SceneGraph, size: Size) {
        self.memo.set_offset(st.scroll.offset());
        self.bar.apply(graph, &st.scroll, size, st.drag.is_some());
    }

    fn select(&self, st: &mut TreeState, graph: &mut dyn SceneGraph, i: usize, size: Size) -> Response<TreeNotice> {
        let Some(row) = self.rows.get(i) else {
            return Response::ignored();
        };
        let top = self.geo.top(i);
        if st.scroll.ensure_visible(top, top + self.geo.pitch) {
            self.apply_scroll(st, graph, size);
        }
        if st.selected == Some(i) {
            return Response::consumed();
        }
        let old = st.selected.replace(i);
        self.repaint(st, graph, old);
        self.repaint(st, graph, Some(i));
        self.memo.select(Some(&row.path));
        match self.info(i, self.is_expanded(i)) {
            Some(info) => Response::notify(TreeNotice::Select(info)),
            None => Response::consumed(),
        }
    }

    fn toggle(&self, graph: &mut dyn SceneGraph, i: usize) -> Response<TreeNotice> {
        let Some(row) = self.rows.get(i).filter(|r| r.has_children) else {
            return Response::ignored();
        };
        let expanded = !self.is_expanded(i);
        self.memo.set_expanded(&row.path, expanded);
        if let Some(v) = self.visuals.get(i) {
            graph.set_text(v.glyph, glyph(true, expanded));
        }
        self.rebuild.request();
        log::debug!("tree row {i} {:?} expanded={expanded}, rebuild requested", row.label);
        match self.info(i, expanded) {
            Some(info) => Response::notify(TreeNotice::Toggle(info)),
            None => Response::consumed(),
        }
    }

    fn activate_or_toggle(&self, graph: &mut dyn SceneGraph, i: usize) -> Response<TreeNotice> {
        match self.rows.get(i) {
            Some(r) if r.has_children => self.toggle(graph, i),
            Some(_) => match self.info(i, false) {
                Some(info) => Response::notify(TreeNotice::Activate(info)),
                None => Response::consumed(),
            },
            None => Response::ignored(),
        }
    }

    fn key(&self, st: &mut TreeState, graph: &mut dyn SceneGraph, key: Key, size: Size) -> Response<TreeNotice> {
        let n = self.rows.len();
        if n == 0 || self.geo.pitch <= 0.0 {
            return Response::ignored();
        }
        let page = (st.scroll.viewport() / self.geo.pitch).floor().max(1.0) as usize;
        let cur = st.selected;
        let target = match (key, cur) {
            (Key::ArrowUp, None) | (Key::End, _) => n - 1,
            (Key::ArrowDown, None) | (Key::Home, _) => 0,
            (Key::ArrowUp, Some(c)) => c.saturating_sub(1),
            (Key::ArrowDown, Some(c)) => c.saturating_add(1).min(n - 1),
            (Key::PageUp, c) => c.unwrap_or(0).saturating_sub(page),
            (Key::PageDown, c) => c.unwrap_or(0).saturating_add(page).min(n - 1),
            (Key::ArrowLeft, Some(c)) => {
                if self.is_expanded(c) {
                    return self.toggle(graph, c);
                }
                match self.rows[c].parent {
                    Some(p) => p,
                    None => return Response::consumed(),
                }
            }
            (Key::ArrowRight, Some(c)) => {
                if self.rows[c].has_children && !self.is_expanded(c) {
                    return self.toggle(graph, c);
                }
                match last_child(&self.rows, c) {
                    Some(j) if self.is_expanded(c) => j,
                    _ => return Response::consumed(),
                }
            }
            (Key::Enter, Some(c)) => return self.activate_or_toggle(graph, c),
            _ => return Response::ignored(),
        };
        self.select(st, graph, target, size)
    }

    fn end_drag(&self, st: &mut TreeState, graph: &mut dyn SceneGraph, size: Size, revert: bool) -> bool {
        let Some(d) = st.drag.take() else {
            return false;
        };
        if revert {
            st.scroll.set_offset(d.start_offset);
        }
        self.apply_scroll(st, graph, size);
        true
    }
}

impl Behavior for TreeBehavior {
    type State = TreeState;
    type Notice = TreeNotice;

    fn handle(&self, st: &mut TreeState, graph: &mut dyn SceneGraph, _node: NodeId, ev: &InputEvent) -> Response<TreeNotice> {
        let size = self.viewport(ev);
        if (size.height - st.scroll.viewport()).abs() > f32::EPSILON {
            st.scroll.set_viewport(size.height);
            self.apply_scroll(st, graph, size);
        }

        match ev.kind {
            EventKind::PointerScroll => {
                let want = ev.scroll.y * self.wheel;
                if st.scroll.scroll_by(want) == want {
                    return Response::ignored();
                }
                self.apply_scroll(st, graph, size);
                let under = self.row_at(st, ev);
                self.hover(st, graph, under);
                Response::consumed()
            }
            EventKind::PointerDown => {
                if !ev.is_inside() {
                    return Response::ignored();
                }
                if self.bar.hits_bar(ev, &st.scroll) {
                    if let Some(t) = st.scroll.thumb(size.height, self.bar.min_thumb) {
                        let on_thumb = ev.local.y >= t.pos && ev.local.y <= t.pos + t.len;
                        let travel = (size.height - t.len).max(0.0);
                        if !on_thumb && travel > 0.0 {
                            let pos = (ev.local.y - t.len * 0.5).clamp(0.0, travel);
                            let max = st.scroll.max_offset();
                            st.scroll.set_offset(pos / travel * max);
                        }
                    }
                    st.drag = Some(ThumbDrag {
                        pointer: ev.pointer,
                        start_y: ev.local.y,
                        start_offset: st.scroll.offset(),
                    });
                    self.apply_scroll(st, graph, size);
                    return Response::consumed();
                }
                let Some(i) = self.row_at(st, ev) else {
                    return Response::consumed();
                };
                if self.on_glyph(i, ev.local.x) {
                    return self.toggle(graph, i);
                }
                if self.memo.press(&self.rows[i].path, self.clock.now(), self.double_click) {
                    return self.activate_or_toggle(graph, i);
                }
                self.select(st, graph, i, size)
            }
            EventKind::PointerMove | EventKind::PointerDrag => match st.drag {
                Some(d) if d.pointer == ev.pointer => {
                    let off = st.scroll.offset_for_thumb_drag(
                        d.start_offset,
                        ev.local.y - d.start_y,
                        size.height,
                        self.bar.min_thumb,
                    );
                    st.scroll.set_offset(off);
                    self.apply_scroll(st, graph, size);
                    Response::consumed()
                }
                _ => {
                    let under = self.row_at(st, ev);
                    if self.hover(st, graph, under) {
                        Response::consumed()
                    } else {
                        Response::ignored()
                    }
                }
            },
            EventKind::PointerUp => {
                if self.end_drag(st, graph, size, false) {
                    Response::consumed()
                } else {
                    Response::ignored()
                }
            }
            EventKind::PointerCancel => {
                if self.end_drag(st, graph, size, true) {
                    Response::consumed()
                } else {
                    Response::ignored()
                }
            }
            EventKind::PointerLeave => {
                let dragged = self.end_drag(st, graph, size, true);
                let hovered = self.hover(st, graph, None);
                if dragged || hovered {
                    Response::consumed()
                } else {
                    Response::ignored()
                }
            }
            EventKind::PointerEnter => {
                let under = self.row_at(st, ev);
                self.hover(st, graph, under);
                Response::consumed()
            }
            EventKind::KeyDown => match ev.key {
                Some(k) => self.key(st, graph, k, size),
                None => Response::ignored(),
            },
        }
    }

    fn notify(&self, notice: TreeNotice) {
        let (cb, info) = match notice {
            TreeNotice::Select(info) => (&self.on_select, info),
            TreeNotice::Activate(info) => (&self.on_activate, info),
            TreeNotice::Toggle(info) => (&self.on_toggle, info),
        };
        if let Some(f) = cb {
            f(&info);
        }
    }

    fn focus_changed(&self, _st: &mut TreeState, graph: &mut dyn SceneGraph, _node: NodeId, focused: bool) {
        graph.set_primitive_visible(self.ring, focused);
    }
}

/// Build a tree view under the current parent.
///
/// With no height given the viewport shows every row; a fixed height makes
/// the rows scroll.
pub fn TreeView(cx: &mut BuildCx, spec: TreeViewSpec) -> TreeViewHandle {
    let memo = match (&spec.state, &spec.common.key) {
        (Some(s), _) => s.clone(),
        (None, Some(k)) => cx.remember(&format!("tree_view/{k:?}"), TreeViewState::new),
        (None, None) => Rc::new(TreeViewState::new()),
    };
    if memo.selected().is_none()
        && let Some(p) = &spec.selected
    {
        memo.select(Some(p));
    }

    let selected_path = memo.selected();
    let rows = flatten(
        &spec.items,
        |p, n| memo.is_expanded(p, n.expanded),
        selected_path.as_deref(),
    );
    let selected = rows.iter().position(|r| r.selected);

    let label_style = cx.text_style(StyleToken::TreeLabel);
    let glyph_style = cx.text_style(StyleToken::TreeGlyph);
    let line_h = cx.metrics.line_height(&label_style);
    let geo = RowGeometry {
        pitch: line_h + cx.config.tree_row_padding * 2.0,
        indent: cx.config.tree_indent,
        padding: cx.config.tree_row_padding,
        line: CONNECTOR_WIDTH,
    };

    let content_w = rows
        .iter()
        .map(|r| geo.label_x(r.depth) + cx.metrics.measure_width(&label_style, &r.label) + geo.padding)
        .fold(0.0f32, f32::max)
        + cx.config.scrollbar_thickness;
    let content_h = geo.pitch * rows.len() as f32;

    let inferred = infer(
        cx.metrics.as_ref(),
        &spec.common.size,
        None,
        SizeRules::default().default_size(content_w, content_h),
    );
    let size = inferred.or_fallback(Size::new(content_w, content_h));

    let root = interactive_root(cx, &spec.common, inferred.apply(spec.common.size));
    let mut handle = TreeViewHandle {
        handle: WidgetHandle::invalid(),
        state: memo.clone(),
        rows: Vec::new(),
        visuals: Vec::new(),
        geometry: geo,
    };
    if !root.is_valid() {
        return handle;
    }
    cx.configure(root, |n| {
        n.flags |= NodeFlags::CLIP;
        n.layout = LayoutMode::Absolute;
    });
    let ring = focus_ring(cx, root, size);

    let content = cx.create_child(root);
    cx.set_size(content, SizeSpec::fixed(size.width, content_h));
    cx.configure(content, |n| n.layout = LayoutMode::Absolute);

    let mut visuals = Vec::with_capacity(rows.len());
    for (i, r) in rows.iter().enumerate() {
        let node = cx.create_child(content);
        cx.set_size(node, SizeSpec::fixed(size.width, geo.pitch));
        cx.configure(node, |n| {
            n.position = Vec2::new(0.0, geo.top(i));
            n.flags |= NodeFlags::HIT_TEST;
        });

        let is_sel = selected == Some(i);
        let base = StyleToken::TreeRow;
        let background = cx.graph.add_primitive(
            node,
            Primitive::rect(
                Rect::new(0.0, 0.0, size.width, geo.pitch),
                if is_sel { StyleToken::TreeRowSelected } else { base },
            ),
        );
        let indent_mask = (r.depth > 0).then(|| {
            let m = cx.graph.add_primitive(
                node,
                Primitive::rect(Rect::new(0.0, 0.0, geo.glyph_x(r.depth), geo.pitch), base),
            );
            cx.graph.set_primitive_visible(m, is_sel);
            m
        });
        let accent = spec.accent.then(|| {
            let a = cx.graph.add_primitive(
                node,
                Primitive::rect(
                    Rect::new(0.0, 0.0, cx.config.tree_accent_width, geo.pitch),
                    StyleToken::TreeAccent,
                ),
            );
            cx.graph.set_primitive_visible(a, is_sel);
            a
        });
        let glyph_h = cx.metrics.line_height(&glyph_style);
        let glyph_prim = cx.graph.add_primitive(
            node,
            TextPrimitive::new(
                Rect::new(geo.glyph_x(r.depth), (geo.pitch - glyph_h) * 0.5, geo.indent, glyph_h),
                glyph(r.has_children, r.expanded),
                StyleToken::TreeGlyph,
            )
            .align(TextAlign::Center)
            .into(),
        );
        let label_x = geo.label_x(r.depth);
        let label = cx.graph.add_primitive(
            node,
            TextPrimitive::new(
                Rect::new(label_x, geo.padding, (size.width - label_x - geo.padding).max(0.0), line_h),
                r.label.as_str(),
                if is_sel {
                    StyleToken::TreeLabelSelected
                } else {
                    StyleToken::TreeLabel
                },
            )
            .into(),
        );
        visuals.push(RowVisual {
            node,
            background,
            accent,
            indent_mask,
            glyph: glyph_prim,
            label,
            base,
            hover: StyleToken::TreeRowHover,
            selected: StyleToken::TreeRowSelected,
        });
    }

    // drawn over the row backgrounds
    if spec.connectors {
        let lines = cx.create_child(content);
        cx.set_size(lines, SizeSpec::fixed(size.width, content_h));
        cx.configure(lines, |n| n.flags.remove(NodeFlags::HIT_TEST));
        for seg in connector_segments(&rows, &geo) {
            cx.graph
                .add_primitive(lines, Primitive::rect(seg.rect, StyleToken::TreeConnector));
        }
    }

    let bar = Scrollbar::add(cx, root);
    let scroll = ScrollMetrics::new(size.height, content_h, memo.offset());
    bar.apply(cx.graph, &scroll, size, false);
    memo.set_offset(scroll.offset());

    handle.handle = WidgetHandle { root, content };
    handle.rows = rows.clone();
    handle.visuals = visuals.clone();

    if spec.common.interactive() {
        let behavior = TreeBehavior {
            rows,
            visuals,
            geo,
            size,
            bar,
            ring,
            memo,
            clock: cx.clock.clone(),
            double_click: cx.config.double_click(),
            wheel: cx.config.wheel_multiplier,
            rebuild: cx.rebuild.clone(),
            on_select: spec.on_select,
            on_activate: spec.on_activate,
            on_toggle: spec.on_toggle,
        };
        let state = TreeState {
            selected,
            scroll,
            ..TreeState::default()
        };
        cx.attach(root, Interactive::new(behavior, Rc::new(RefCell::new(state))));
    }
    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TreeNode> {
        vec![
            TreeNode::branch(
                "src",
                vec![
                    TreeNode::branch("widgets", vec![TreeNode::leaf("button.rs"), TreeNode::leaf("slider.rs")])
                        .expanded(true),
                    TreeNode::leaf("lib.rs"),
                ],
            )
            .expanded(true),
            TreeNode::branch("tests", vec![TreeNode::leaf("tree.rs")]),
        ]
    }

    fn rows(items: &[TreeNode]) -> Vec<FlatRow> {
        flatten(items, |_, n| n.expanded, None)
    }

    #[test]
    fn flatten_records_depth_parent_and_ancestors() {
        let rows = rows(&sample());
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["src", "widgets", "button.rs", "slider.rs", "lib.rs", "tests"]);
        assert_eq!(rows[2].depth, 2);
        assert_eq!(rows[2].parent, Some(1));
        assert_eq!(rows[2].ancestors.as_slice(), &[0, 1]);
        assert_eq!(rows[4].path.as_slice(), &[0, 1]);
        assert!(rows[5].has_children && !rows[5].expanded);
        assert!(rows.iter().all(|r| r.ancestors.len() == r.depth));
    }

    #[test]
    fn collapsing_removes_only_descendants() {
        let items = sample();
        let open = rows(&items);
        let closed = flatten(&items, |p, n| if p == [0, 0] { false } else { n.expanded }, None);
        assert_eq!(closed.len(), open.len() - 2);
        let kept: Vec<&str> = open
            .iter()
            .filter(|r| r.parent != Some(1))
            .map(|r| r.label.as_str())
            .collect();
        let now: Vec<&str> = closed.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(kept, now);
    }

    #[test]
    fn last_child_is_direct_child() {
        let rows = rows(&sample());
        assert_eq!(last_child(&rows, 0), Some(4));
        assert_eq!(last_child(&rows, 1), Some(3));
        assert_eq!(last_child(&rows, 5), None);
        assert_eq!(last_child(&rows, 99), None);
    }

    #[test]
    fn connectors_span_parent_to_last_child() {
        let rows = rows(&sample());
        let geo = RowGeometry {
            pitch: 20.0,
            indent: 16.0,
            padding: 4.0,
            line: 1.0,
        };
        let segs = connector_segments(&rows, &geo);
        let vertical: Vec<&Segment> = segs.iter().filter(|s| s.rect.w == 1.0 && s.rect.h > 1.0).collect();
        // "src" and "widgets" are expanded
        assert_eq!(vertical.len(), 2);
        assert_eq!(vertical[0].owner, 0);
        assert_eq!(vertical[0].rect.y, 10.0);
        assert_eq!(vertical[0].rect.bottom(), geo.center_y(4));
        // one elbow per direct child
        assert_eq!(segs.iter().filter(|s| s.owner == 0).count(), 3);
        assert_eq!(segs.iter().filter(|s| s.owner == 1).count(), 3);
    }

    #[test]
    fn double_click_window() {
        let st = TreeViewState::new();
        let t0 = Instant::now();
        let window = Duration::from_millis(400);
        assert!(!st.press(&[1], t0, window));
        assert!(st.press(&[1], t0 + Duration::from_millis(300), window));
        // a third press starts over
        assert!(!st.press(&[1], t0 + Duration::from_millis(350), window));
        assert!(!st.press(&[2], t0 + Duration::from_millis(360), window));
        assert!(!st.press(&[2], t0 + Duration::from_millis(900), window));
    }
}
