//! # Scroll model
//!
//! [`ScrollMetrics`] is the single-axis scroll state shared by
//! [`ScrollView`] and the tree view: viewport, content and an offset that
//! always satisfies `0 <= offset <= max(0, content - viewport)`.
//!
//! Scrollbar geometry follows the track:
//!
//! - thumb length = `track * clamp(viewport / content, 0, 1)`, floored at
//!   the configured minimum,
//! - thumb position maps linearly onto `[0, max_offset]`,
//! - dragging the thumb by `d` moves the offset by
//!   `d * max_offset / (track - thumb)`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use arbor_core::*;

use crate::interaction::{Behavior, Interactive, Response};
use crate::sizing::{SizeRules, infer};
use crate::{BuildCx, WidgetHandle};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    viewport: f32,
    content: f32,
    offset: f32,
}

/// Thumb placement along the track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thumb {
    pub pos: f32,
    pub len: f32,
}

impl ScrollMetrics {
    pub fn new(viewport: f32, content: f32, offset: f32) -> Self {
        let mut m = Self {
            viewport: viewport.max(0.0),
            content: content.max(0.0),
            offset: 0.0,
        };
        m.set_offset(offset);
        m
    }

    pub fn viewport(&self) -> f32 {
        self.viewport
    }
    pub fn content(&self) -> f32 {
        self.content
    }
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        (self.content - self.viewport).max(0.0)
    }

    pub fn is_scrollable(&self) -> bool {
        self.max_offset() > 0.0
    }

    pub fn set_viewport(&mut self, h: f32) {
        self.viewport = h.max(0.0);
        self.clamp_offset();
    }

    pub fn set_content(&mut self, h: f32) {
        self.content = h.max(0.0);
        self.clamp_offset();
    }

    /// Clamp and store. Returns whether the offset moved.
    pub fn set_offset(&mut self, off: f32) -> bool {
        let off = if off.is_nan() { 0.0 } else { off };
        let next = off.clamp(0.0, self.max_offset());
        let moved = next != self.offset;
        self.offset = next;
        moved
    }

    fn clamp_offset(&mut self) {
        let o = self.offset;
        self.set_offset(o);
    }

    /// Consume `d`, return the part that hit a bound.
    pub fn scroll_by(&mut self, d: f32) -> f32 {
        let before = self.offset;
        self.set_offset(before + d);
        d - (self.offset - before)
    }

    /// Minimum move that brings `[top, bottom]` into view. A span taller
    /// than the viewport aligns its top.
    pub fn ensure_visible(&mut self, top: f32, bottom: f32) -> bool {
        if top < self.offset {
            self.set_offset(top)
        } else if bottom > self.offset + self.viewport {
            let target = (bottom - self.viewport).min(top);
            self.set_offset(target)
        } else {
            false
        }
    }

    /// `None` when there is nothing to scroll.
    pub fn thumb(&self, track: f32, min_thumb: f32) -> Option<Thumb> {
        if !self.is_scrollable() || track <= 0.0 || self.content <= 0.0 {
            return None;
        }
        let ratio = (self.viewport / self.content).clamp(0.0, 1.0);
        let len = (track * ratio).max(min_thumb.max(0.0)).min(track);
        let max_pos = (track - len).max(0.0);
        let pos = (self.offset / self.max_offset()) * max_pos;
        Some(Thumb { pos, len })
    }

    /// Offset after dragging the thumb `delta` from where it was when the
    /// offset was `start`.
    pub fn offset_for_thumb_drag(&self, start: f32, delta: f32, track: f32, min_thumb: f32) -> f32 {
        let Some(thumb) = self.thumb(track, min_thumb) else {
            return 0.0;
        };
        let travel = track - thumb.len;
        if travel <= 0.0 {
            return start;
        }
        (start + delta * self.max_offset() / travel).clamp(0.0, self.max_offset())
    }
}

/// Scroll position that survives rebuilds.
#[derive(Debug, Default)]
pub struct ScrollViewState {
    metrics: Cell<ScrollMetrics>,
}

impl ScrollViewState {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn offset(&self) -> f32 {
        self.metrics.get().offset()
    }
    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics.get()
    }
    pub fn set_offset(&self, off: f32) {
        let mut m = self.metrics.get();
        m.set_offset(off);
        self.metrics.set(m);
    }
    fn store(&self, m: ScrollMetrics) {
        self.metrics.set(m);
    }
}

/// Remembered [`ScrollViewState`] keyed by `key`.
pub fn remember_scroll_state(cx: &mut BuildCx, key: &str) -> Rc<ScrollViewState> {
    cx.remember(key, ScrollViewState::new)
}

/// Scrollbar primitives plus the node whose content they scroll.
pub(crate) struct Scrollbar {
    pub viewport_node: NodeId,
    pub track: PrimitiveId,
    pub thumb: PrimitiveId,
    pub thickness: f32,
    pub min_thumb: f32,
}

impl Scrollbar {
    pub fn add(cx: &mut BuildCx, node: NodeId) -> Self {
        let track = cx.graph.add_primitive(node, Primitive::rect(Rect::ZERO, StyleToken::ScrollbarTrack));
        let thumb = cx.graph.add_primitive(node, Primitive::rect(Rect::ZERO, StyleToken::ScrollbarThumb));
        Self {
            viewport_node: node,
            track,
            thumb,
            thickness: cx.config.scrollbar_thickness,
            min_thumb: cx.config.min_thumb,
        }
    }

    /// Apply `m` to the viewport node and place the bar for a `size` viewport.
    pub fn apply(&self, graph: &mut dyn SceneGraph, m: &ScrollMetrics, size: Size, active: bool) {
        if let Some(n) = graph.node_mut(self.viewport_node) {
            n.scroll_offset.y = m.offset();
        }
        let x = (size.width - self.thickness).max(0.0);
        match m.thumb(size.height, self.min_thumb) {
            Some(t) => {
                graph.set_bounds(self.track, Rect::new(x, 0.0, self.thickness, size.height));
                graph.set_bounds(self.thumb, Rect::new(x, t.pos, self.thickness, t.len));
                graph.set_primitive_visible(self.track, true);
                graph.set_primitive_visible(self.thumb, true);
                graph.set_style(
                    self.thumb,
                    if active {
                        StyleToken::ScrollbarThumbActive
                    } else {
                        StyleToken::ScrollbarThumb
                    },
                );
            }
            None => {
                graph.set_primitive_visible(self.track, false);
                graph.set_primitive_visible(self.thumb, false);
            }
        }
    }

    pub fn hits_bar(&self, ev: &InputEvent, m: &ScrollMetrics) -> bool {
        m.is_scrollable() && ev.local.x >= ev.size.width - self.thickness && ev.is_inside()
    }
}

/// In-flight thumb drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ThumbDrag {
    pub pointer: PointerId,
    pub start_y: f32,
    pub start_offset: f32,
}

pub struct ScrollViewSpec {
    pub size: SizeSpec,
    /// Defaults to the summed heights of the content's children.
    pub content_height: Option<f32>,
    pub state: Option<Rc<ScrollViewState>>,
}

impl Default for ScrollViewSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollViewSpec {
    pub fn new() -> Self {
        Self {
            size: SizeSpec::default(),
            content_height: None,
            state: None,
        }
    }
    pub fn size(mut self, size: SizeSpec) -> Self {
        self.size = size;
        self
    }
    pub fn content_height(mut self, h: f32) -> Self {
        self.content_height = Some(h.max(0.0));
        self
    }
    pub fn state(mut self, state: Rc<ScrollViewState>) -> Self {
        self.state = Some(state);
        self
    }
}

#[derive(Clone)]
pub struct ScrollViewHandle {
    /// `root` is the viewport, `content` the scrolled column.
    pub handle: WidgetHandle,
    pub state: Rc<ScrollViewState>,
}

struct ScrollBehavior {
    bar: Scrollbar,
    state: Rc<ScrollViewState>,
    wheel: f32,
}

impl Behavior for ScrollBehavior {
    type State = Option<ThumbDrag>;
    type Notice = ();

    fn handle(&self, drag: &mut Option<ThumbDrag>, graph: &mut dyn SceneGraph, _node: NodeId, ev: &InputEvent) -> Response<()> {
        let mut m = self.state.metrics();
        if ev.size.height > 0.0 {
            m.set_viewport(ev.size.height);
        }
        let resp = match ev.kind {
            EventKind::PointerScroll => {
                let left = m.scroll_by(ev.scroll.y * self.wheel);
                if left == ev.scroll.y * self.wheel {
                    Response::ignored()
                } else {
                    Response::consumed()
                }
            }
            EventKind::PointerDown if self.bar.hits_bar(ev, &m) => {
                let on_thumb = m
                    .thumb(ev.size.height, self.bar.min_thumb)
                    .is_some_and(|t| ev.local.y >= t.pos && ev.local.y <= t.pos + t.len);
                if !on_thumb && let Some(t) = m.thumb(ev.size.height, self.bar.min_thumb) {
                    // jump so the thumb centers on the press
                    let travel = (ev.size.height - t.len).max(0.0);
                    if travel > 0.0 {
                        let pos = (ev.local.y - t.len * 0.5).clamp(0.0, travel);
                        m.set_offset(pos / travel * m.max_offset());
                    }
                }
                *drag = Some(ThumbDrag {
                    pointer: ev.pointer,
                    start_y: ev.local.y,
                    start_offset: m.offset(),
                });
                Response::consumed()
            }
            EventKind::PointerDrag | EventKind::PointerMove => match *drag {
                Some(d) if d.pointer == ev.pointer => {
                    let off = m.offset_for_thumb_drag(
                        d.start_offset,
                        ev.local.y - d.start_y,
                        ev.size.height,
                        self.bar.min_thumb,
                    );
                    m.set_offset(off);
                    Response::consumed()
                }
                _ => Response::ignored(),
            },
            EventKind::PointerUp => match drag.take() {
                Some(_) => Response::consumed(),
                None => Response::ignored(),
            },
            EventKind::PointerCancel | EventKind::PointerLeave => match drag.take() {
                Some(d) => {
                    m.set_offset(d.start_offset);
                    Response::consumed()
                }
                None => Response::ignored(),
            },
            _ => Response::ignored(),
        };
        self.state.store(m);
        self.bar.apply(graph, &m, ev.size, drag.is_some());
        resp
    }

    fn notify(&self, _: ()) {}
}

fn children_height(graph: &dyn SceneGraph, node: NodeId) -> f32 {
    graph
        .children(node)
        .iter()
        .filter_map(|c| graph.node(*c))
        .filter(|n| n.is_visible())
        .map(|n| n.size.height.unwrap_or(n.measured.height))
        .sum()
}

/// Vertical scroll container. `content` builds into an inner column whose
/// offset is driven by the wheel and by dragging the scrollbar thumb.
pub fn ScrollView(cx: &mut BuildCx, spec: ScrollViewSpec, content: impl FnOnce(&mut BuildCx)) -> ScrollViewHandle {
    let state = spec.state.unwrap_or_else(|| Rc::new(ScrollViewState::new()));
    let viewport = cx.create_node();
    if !viewport.is_valid() {
        return ScrollViewHandle {
            handle: WidgetHandle::invalid(),
            state,
        };
    }
    cx.configure(viewport, |n| {
        n.flags |= NodeFlags::CLIP | NodeFlags::HIT_TEST;
        n.layout = LayoutMode::Stack;
    });
    let inner = cx.create_child(viewport);
    cx.configure(inner, |n| n.layout = LayoutMode::Column);
    cx.within(inner, content);

    let content_h = spec
        .content_height
        .unwrap_or_else(|| children_height(cx.graph, inner));
    let content_w = cx
        .graph
        .children(inner)
        .iter()
        .filter_map(|c| cx.graph.node(*c))
        .map(|n| n.size.width.unwrap_or(n.measured.width))
        .fold(0.0f32, f32::max);
    cx.configure(inner, |n| {
        n.size = SizeSpec::new().height(content_h).fill_width();
        n.measured.height = content_h;
    });

    let inferred = infer(
        cx.metrics.as_ref(),
        &spec.size,
        None,
        SizeRules::default().default_size(content_w + cx.config.scrollbar_thickness, content_h),
    );
    cx.set_size(viewport, inferred.apply(spec.size));
    let size = inferred.or_fallback(Size::new(content_w, content_h));

    let bar = Scrollbar::add(cx, viewport);
    let mut m = state.metrics();
    m.set_viewport(size.height);
    m.set_content(content_h);
    state.store(m);
    bar.apply(cx.graph, &m, size, false);

    let behavior = ScrollBehavior {
        bar,
        state: state.clone(),
        wheel: cx.config.wheel_multiplier,
    };
    cx.attach(viewport, Interactive::new(behavior, Rc::new(RefCell::new(None))));
    ScrollViewHandle {
        handle: WidgetHandle {
            root: viewport,
            content: inner,
        },
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stays_in_bounds() {
        let mut m = ScrollMetrics::new(100.0, 250.0, 500.0);
        assert_eq!(m.offset(), 150.0);
        assert_eq!(m.scroll_by(-400.0), -250.0);
        assert_eq!(m.offset(), 0.0);
        m.set_content(50.0);
        assert_eq!(m.max_offset(), 0.0);
        assert!(!m.set_offset(10.0));
        assert_eq!(m.offset(), 0.0);
    }

    #[test]
    fn shrinking_content_reclamps() {
        let mut m = ScrollMetrics::new(100.0, 400.0, 300.0);
        m.set_content(250.0);
        assert_eq!(m.offset(), 150.0);
        m.set_viewport(300.0);
        assert_eq!(m.offset(), 0.0);
    }

    #[test]
    fn ensure_visible_moves_minimum() {
        let mut m = ScrollMetrics::new(100.0, 1000.0, 0.0);
        assert!(!m.ensure_visible(20.0, 60.0));
        assert!(m.ensure_visible(120.0, 160.0));
        assert_eq!(m.offset(), 60.0);
        assert!(m.ensure_visible(10.0, 50.0));
        assert_eq!(m.offset(), 10.0);
    }

    #[test]
    fn thumb_geometry() {
        // ratio 0.25 of a 200 track
        let m = ScrollMetrics::new(100.0, 400.0, 150.0);
        let t = m.thumb(200.0, 16.0).unwrap();
        assert_eq!(t.len, 50.0);
        assert_eq!(t.pos, 75.0);

        // floor at the minimum
        let m = ScrollMetrics::new(10.0, 10_000.0, 0.0);
        assert_eq!(m.thumb(100.0, 16.0).unwrap().len, 16.0);

        assert!(ScrollMetrics::new(100.0, 80.0, 0.0).thumb(100.0, 16.0).is_none());
    }

    #[test]
    fn thumb_drag_inverse_maps() {
        // max 300, travel 200 - 50 = 150: 1px of drag = 2 of offset
        let m = ScrollMetrics::new(100.0, 400.0, 0.0);
        assert_eq!(m.offset_for_thumb_drag(0.0, 30.0, 200.0, 16.0), 60.0);
        assert_eq!(m.offset_for_thumb_drag(100.0, -500.0, 200.0, 16.0), 0.0);
        assert_eq!(m.offset_for_thumb_drag(0.0, 1000.0, 200.0, 16.0), 300.0);
    }
}
