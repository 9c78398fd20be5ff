//! The scene-graph contract widgets build against.
//!
//! The graph is retained: nodes and primitives live until their subtree is
//! removed. Widgets only see [`SceneGraph`]; [`crate::NodeStore`] is the
//! in-memory implementation.

use std::rc::Rc;

use arbor_text::WrapMode;
use bitflags::bitflags;
use slotmap::{Key, new_key_type};
use smallvec::SmallVec;

use crate::{Color, DispatchError, InputEvent, Rect, Size, SizeSpec, StyleToken, Vec2};

new_key_type! {
    /// Handle to a graph node. The null key is the invalid handle.
    pub struct NodeId;
    /// Handle to a drawable attached to a node.
    pub struct PrimitiveId;
}

impl NodeId {
    /// `false` for the null handle returned by failed operations.
    pub fn is_valid(self) -> bool {
        !self.is_null()
    }
}

impl PrimitiveId {
    pub fn is_valid(self) -> bool {
        !self.is_null()
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        const VISIBLE   = 1 << 0;
        const HIT_TEST  = 1 << 1;
        const FOCUSABLE = 1 << 2;
        const CLIP      = 1 << 3;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::VISIBLE
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Children overlap at the origin.
    #[default]
    Stack,
    Row,
    Column,
    /// Children keep their own `position`.
    Absolute,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

/// Per-primitive values that win over the resolved style.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StyleOverride {
    pub fill: Option<Color>,
    pub foreground: Option<Color>,
    pub opacity: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RectPrimitive {
    pub rect: Rect,
    pub style: StyleToken,
    pub over: StyleOverride,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextPrimitive {
    pub rect: Rect,
    pub text: String,
    pub style: StyleToken,
    pub over: StyleOverride,
    pub wrap: WrapMode,
    pub align: TextAlign,
    pub max_width: Option<f32>,
    pub visible: bool,
}

impl TextPrimitive {
    pub fn new(rect: Rect, text: impl Into<String>, style: StyleToken) -> Self {
        Self {
            rect,
            text: text.into(),
            style,
            over: StyleOverride::default(),
            wrap: WrapMode::None,
            align: TextAlign::Start,
            max_width: None,
            visible: true,
        }
    }
    pub fn wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
    pub fn max_width(mut self, max_width: Option<f32>) -> Self {
        self.max_width = max_width;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rect(RectPrimitive),
    Text(TextPrimitive),
}

impl From<TextPrimitive> for Primitive {
    fn from(t: TextPrimitive) -> Self {
        Primitive::Text(t)
    }
}

impl Primitive {
    pub fn rect(rect: Rect, style: StyleToken) -> Self {
        Primitive::Rect(RectPrimitive {
            rect,
            style,
            over: StyleOverride::default(),
            visible: true,
        })
    }

    pub fn style(&self) -> StyleToken {
        match self {
            Primitive::Rect(r) => r.style,
            Primitive::Text(t) => t.style,
        }
    }
    pub fn set_style(&mut self, token: StyleToken) {
        match self {
            Primitive::Rect(r) => r.style = token,
            Primitive::Text(t) => t.style = token,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Primitive::Rect(r) => r.rect,
            Primitive::Text(t) => t.rect,
        }
    }
    pub fn set_bounds(&mut self, rect: Rect) {
        match self {
            Primitive::Rect(r) => r.rect = rect,
            Primitive::Text(t) => t.rect = rect,
        }
    }

    pub fn style_override(&self) -> &StyleOverride {
        match self {
            Primitive::Rect(r) => &r.over,
            Primitive::Text(t) => &t.over,
        }
    }
    pub fn style_override_mut(&mut self) -> &mut StyleOverride {
        match self {
            Primitive::Rect(r) => &mut r.over,
            Primitive::Text(t) => &mut t.over,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Primitive::Rect(r) => r.visible,
            Primitive::Text(t) => t.visible,
        }
    }
    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Primitive::Rect(r) => r.visible = visible,
            Primitive::Text(t) => t.visible = visible,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Primitive::Text(t) => Some(&t.text),
            Primitive::Rect(_) => None,
        }
    }
}

/// Event sink attached to an interaction root.
///
/// `on_event` returns `Ok(true)` when the event was consumed; unconsumed
/// events bubble to ancestors.
pub trait NodeCallback {
    fn on_event(
        &self,
        graph: &mut dyn SceneGraph,
        node: NodeId,
        ev: &InputEvent,
    ) -> Result<bool, DispatchError>;

    fn on_focus(&self, _graph: &mut dyn SceneGraph, _node: NodeId) {}

    fn on_blur(&self, _graph: &mut dyn SceneGraph, _node: NodeId) {}
}

pub struct Node {
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 4]>,
    /// Offset inside the parent, written by layout.
    pub position: Vec2,
    /// Measured size, written by layout.
    pub measured: Size,
    pub size: SizeSpec,
    pub layout: LayoutMode,
    pub flags: NodeFlags,
    pub tab_index: i32,
    pub opacity: f32,
    /// Content scroll for viewport nodes.
    pub scroll_offset: Vec2,
    pub primitives: SmallVec<[PrimitiveId; 4]>,
    pub callback: Option<Rc<dyn NodeCallback>>,
    /// Creation ordinal; breaks tab-index ties.
    pub order: u64,
}

impl Node {
    pub fn new(parent: Option<NodeId>, order: u64) -> Self {
        Self {
            parent,
            children: SmallVec::new(),
            position: Vec2::ZERO,
            measured: Size::ZERO,
            size: SizeSpec::default(),
            layout: LayoutMode::default(),
            flags: NodeFlags::default(),
            tab_index: 0,
            opacity: 1.0,
            scroll_offset: Vec2::ZERO,
            primitives: SmallVec::new(),
            callback: None,
            order,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    pub fn is_focusable(&self) -> bool {
        self.flags.contains(NodeFlags::FOCUSABLE | NodeFlags::VISIBLE)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("layout", &self.layout)
            .field("flags", &self.flags)
            .field("size", &self.size)
            .field("primitives", &self.primitives)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Operations the widget layer needs from a retained scene graph.
///
/// Lookups against a removed id return `None`; creation under a removed
/// parent returns the null id. Neither panics.
pub trait SceneGraph {
    /// `None` creates a root.
    fn create_node(&mut self, parent: Option<NodeId>) -> NodeId;
    fn node(&self, id: NodeId) -> Option<&Node>;
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node>;

    fn add_primitive(&mut self, node: NodeId, prim: Primitive) -> PrimitiveId;
    fn primitive(&self, id: PrimitiveId) -> Option<&Primitive>;
    fn primitive_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive>;

    /// Drop the node, its descendants and all their primitives.
    fn remove_subtree(&mut self, id: NodeId);

    fn roots(&self) -> Vec<NodeId>;
    /// Every live node in creation order.
    fn node_ids(&self) -> Vec<NodeId>;

    fn set_callback(&mut self, id: NodeId, cb: Option<Rc<dyn NodeCallback>>) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.callback = cb;
                true
            }
            None => false,
        }
    }

    fn callback(&self, id: NodeId) -> Option<Rc<dyn NodeCallback>> {
        self.node(id).and_then(|n| n.callback.clone())
    }

    fn children(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        self.node(id).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.node_mut(id) {
            n.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    fn set_style(&mut self, prim: PrimitiveId, token: StyleToken) {
        if let Some(p) = self.primitive_mut(prim) {
            p.set_style(token);
        }
    }

    fn set_bounds(&mut self, prim: PrimitiveId, rect: Rect) {
        if let Some(p) = self.primitive_mut(prim) {
            p.set_bounds(rect);
        }
    }

    fn set_primitive_visible(&mut self, prim: PrimitiveId, visible: bool) {
        if let Some(p) = self.primitive_mut(prim) {
            p.set_visible(visible);
        }
    }

    fn set_text(&mut self, prim: PrimitiveId, text: &str) {
        if let Some(Primitive::Text(t)) = self.primitive_mut(prim) {
            if t.text != text {
                t.text.clear();
                t.text.push_str(text);
            }
        }
    }
}
