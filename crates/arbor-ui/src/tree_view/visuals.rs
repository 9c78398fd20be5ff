use arbor_core::*;

/// Cached primitive handles for one row of one build.
#[derive(Clone, Debug, PartialEq)]
pub struct RowVisual {
    pub node: NodeId,
    pub background: PrimitiveId,
    pub accent: Option<PrimitiveId>,
    pub indent_mask: Option<PrimitiveId>,
    pub glyph: PrimitiveId,
    pub label: PrimitiveId,
    pub base: StyleToken,
    pub hover: StyleToken,
    pub selected: StyleToken,
}

impl RowVisual {
    pub fn token(&self, hovered: bool, selected: bool) -> StyleToken {
        if selected {
            self.selected
        } else if hovered {
            self.hover
        } else {
            self.base
        }
    }

    pub fn paint(&self, graph: &mut dyn SceneGraph, hovered: bool, selected: bool) {
        graph.set_style(self.background, self.token(hovered, selected));
        graph.set_style(
            self.label,
            if selected {
                StyleToken::TreeLabelSelected
            } else {
                StyleToken::TreeLabel
            },
        );
        if let Some(a) = self.accent {
            graph.set_primitive_visible(a, selected);
        }
        // highlight starts at the glyph column
        if let Some(m) = self.indent_mask {
            graph.set_primitive_visible(m, hovered || selected);
        }
    }
}

pub const GLYPH_EXPANDED: &str = "▾";
pub const GLYPH_COLLAPSED: &str = "▸";
pub const GLYPH_LEAF: &str = "•";

pub fn glyph(has_children: bool, expanded: bool) -> &'static str {
    match (has_children, expanded) {
        (true, true) => GLYPH_EXPANDED,
        (true, false) => GLYPH_COLLAPSED,
        (false, _) => GLYPH_LEAF,
    }
}
