use arbor_core::*;

use crate::sizing::{SizeRules, TextContent, infer};
use crate::{BuildCx, WidgetHandle};

pub struct TextSpec {
    pub text: String,
    pub style: StyleToken,
    pub wrap: WrapMode,
    pub align: TextAlign,
    pub max_width: Option<f32>,
    pub size: SizeSpec,
    pub visible: bool,
}

impl TextSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleToken::Text,
            wrap: WrapMode::None,
            align: TextAlign::Start,
            max_width: None,
            size: SizeSpec::default(),
            visible: true,
        }
    }
    pub fn style(mut self, style: StyleToken) -> Self {
        self.style = style;
        self
    }
    pub fn wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
    pub fn max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width.max(0.0));
        self
    }
    pub fn size(mut self, size: SizeSpec) -> Self {
        self.size = size;
        self
    }
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Static text block. Unset dimensions come from the measured, wrapped text.
pub fn Text(cx: &mut BuildCx, spec: TextSpec) -> WidgetHandle {
    let style = cx.text_style(spec.style);
    let content = TextContent {
        text: &spec.text,
        style,
        wrap: spec.wrap,
        max_width: spec.max_width,
    };
    let inferred = infer(cx.metrics.as_ref(), &spec.size, Some(content), SizeRules::default());

    let node = cx.create_node();
    if !node.is_valid() {
        return WidgetHandle::invalid();
    }
    cx.set_size(node, inferred.apply(spec.size));
    cx.graph.set_visible(node, spec.visible);

    let size = inferred.or_fallback(inferred.content);
    cx.graph.add_primitive(
        node,
        TextPrimitive::new(Rect::from_size(size), spec.text, spec.style)
            .wrap(spec.wrap)
            .align(spec.align)
            .max_width(spec.max_width)
            .into(),
    );
    WidgetHandle::new(node)
}
