use arbor_core::*;

use crate::{BuildCx, WidgetHandle};

fn container(
    cx: &mut BuildCx,
    layout: LayoutMode,
    size: SizeSpec,
    content: impl FnOnce(&mut BuildCx),
) -> WidgetHandle {
    let node = cx.create_node();
    if !node.is_valid() {
        return WidgetHandle::invalid();
    }
    cx.set_size(node, size);
    cx.configure(node, |n| n.layout = layout);
    cx.within(node, content);
    WidgetHandle::new(node)
}

/// Children stacked top to bottom.
pub fn Column(cx: &mut BuildCx, size: SizeSpec, content: impl FnOnce(&mut BuildCx)) -> WidgetHandle {
    container(cx, LayoutMode::Column, size, content)
}

/// Children left to right.
pub fn Row(cx: &mut BuildCx, size: SizeSpec, content: impl FnOnce(&mut BuildCx)) -> WidgetHandle {
    container(cx, LayoutMode::Row, size, content)
}

/// Children overlapping at the origin.
pub fn Stack(cx: &mut BuildCx, size: SizeSpec, content: impl FnOnce(&mut BuildCx)) -> WidgetHandle {
    container(cx, LayoutMode::Stack, size, content)
}

/// Children at their own `position`.
pub fn Absolute(cx: &mut BuildCx, size: SizeSpec, content: impl FnOnce(&mut BuildCx)) -> WidgetHandle {
    container(cx, LayoutMode::Absolute, size, content)
}
