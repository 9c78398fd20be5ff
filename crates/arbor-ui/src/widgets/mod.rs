//! Widget constructors.
//!
//! Each constructor creates its nodes and primitives under the current
//! parent of the [`BuildCx`](crate::BuildCx), installs at most one
//! interaction callback on its root, and returns a handle. Disabled or
//! hidden widgets get no callback.

mod button;
mod checkbox;
mod containers;
mod dropdown;
mod progress;
mod slider;
mod table;
mod tabs;
mod text;
mod toggle;

pub use button::*;
pub use checkbox::*;
pub use containers::*;
pub use dropdown::*;
pub use progress::*;
pub use slider::*;
pub use table::*;
pub use tabs::*;
pub use text::*;
pub use toggle::*;

use arbor_core::*;

use crate::BuildCx;

const FOCUS_RING_WIDTH: f32 = 2.0;

/// Fields every interactive widget accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct Common {
    pub size: SizeSpec,
    pub enabled: bool,
    pub visible: bool,
    pub tab_index: i32,
    pub key: Option<WidgetKey>,
}

impl Default for Common {
    fn default() -> Self {
        Self {
            size: SizeSpec::default(),
            enabled: true,
            visible: true,
            tab_index: 0,
            key: None,
        }
    }
}

impl Common {
    /// Whether the widget takes part in interaction at all.
    pub fn interactive(&self) -> bool {
        self.enabled && self.visible
    }
}

macro_rules! common_builders {
    ($ty:ty) => {
        impl $ty {
            pub fn size(mut self, size: arbor_core::SizeSpec) -> Self {
                self.common.size = size;
                self
            }
            pub fn enabled(mut self, enabled: bool) -> Self {
                self.common.enabled = enabled;
                self
            }
            pub fn visible(mut self, visible: bool) -> Self {
                self.common.visible = visible;
                self
            }
            pub fn tab_index(mut self, tab_index: i32) -> Self {
                self.common.tab_index = tab_index;
                self
            }
            pub fn key(mut self, key: impl Into<arbor_core::WidgetKey>) -> Self {
                self.common.key = Some(key.into());
                self
            }
        }
    };
}
pub(crate) use common_builders;

/// Create the interaction root for a widget: sized, flagged and identified.
pub(crate) fn interactive_root(cx: &mut BuildCx, common: &Common, size: SizeSpec) -> NodeId {
    let node = cx.create_node();
    if !node.is_valid() {
        return node;
    }
    cx.set_size(node, size);
    let interactive = common.interactive();
    cx.configure(node, |n| {
        n.flags.set(NodeFlags::VISIBLE, common.visible);
        n.flags.set(NodeFlags::HIT_TEST, interactive);
        n.flags.set(NodeFlags::FOCUSABLE, interactive);
        n.tab_index = common.tab_index;
    });
    if interactive {
        cx.identify(common.key.clone(), node);
    }
    node
}

/// Hidden ring drawn around a focused widget.
pub(crate) fn focus_ring(cx: &mut BuildCx, node: NodeId, size: Size) -> PrimitiveId {
    let w = FOCUS_RING_WIDTH;
    let ring = cx.graph.add_primitive(
        node,
        Primitive::rect(
            Rect::new(-w, -w, size.width + w * 2.0, size.height + w * 2.0),
            StyleToken::FocusRing,
        ),
    );
    cx.graph.set_primitive_visible(ring, false);
    ring
}

/// Y that vertically centers a box of `inner` height in `outer`.
pub(crate) fn centered(outer: f32, inner: f32) -> f32 {
    ((outer - inner) * 0.5).max(0.0)
}
