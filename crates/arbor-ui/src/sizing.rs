//! Content-driven size inference.
//!
//! Per axis, first match wins:
//!
//! 1. an explicit preferred value,
//! 2. a stretch factor (the layout solver decides; nothing inferred),
//! 3. a min/max anchor (likewise left to the solver),
//! 4. measured content, raised to the widget's minimum,
//! 5. the widget's default,
//! 6. zero.

use arbor_core::{Size, SizeSpec};
use arbor_text::{TextMetrics, TextStyle, WrapMode};

/// Text that drives a widget's content size.
#[derive(Clone, Copy, Debug)]
pub struct TextContent<'a> {
    pub text: &'a str,
    pub style: TextStyle,
    pub wrap: WrapMode,
    /// Caps the inferred width and is the wrap limit when no width is set.
    pub max_width: Option<f32>,
}

impl<'a> TextContent<'a> {
    pub fn new(text: &'a str, style: TextStyle) -> Self {
        Self {
            text,
            style,
            wrap: WrapMode::None,
            max_width: None,
        }
    }
}

/// Widget-specific fallbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeRules {
    /// Total horizontal/vertical padding around the content.
    pub padding: Size,
    /// Floor applied to content-derived values.
    pub minimum: Size,
    /// Used when there is no content at all.
    pub default: Option<Size>,
}

impl SizeRules {
    pub fn padded(x: f32, y: f32) -> Self {
        Self {
            padding: Size::new(x * 2.0, y * 2.0),
            ..Self::default()
        }
    }
    pub fn minimum(mut self, w: f32, h: f32) -> Self {
        self.minimum = Size::new(w, h);
        self
    }
    pub fn default_size(mut self, w: f32, h: f32) -> Self {
        self.default = Some(Size::new(w, h));
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inferred {
    /// `None` when the axis is left to the layout solver.
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Wrapped lines of the content text.
    pub lines: Vec<String>,
    /// Unpadded content block.
    pub content: Size,
}

impl Inferred {
    /// `spec` with inferred axes filled in.
    pub fn apply(&self, mut spec: SizeSpec) -> SizeSpec {
        if spec.width.is_none() {
            spec.width = self.width;
        }
        if spec.height.is_none() {
            spec.height = self.height;
        }
        spec
    }

    /// Best known extent for drawing primitives before layout runs.
    pub fn or_fallback(&self, fallback: Size) -> Size {
        Size::new(
            self.width.unwrap_or(fallback.width),
            self.height.unwrap_or(fallback.height),
        )
    }
}

/// Resolve one axis.
pub fn resolve_axis(
    preferred: Option<f32>,
    stretch: f32,
    anchored: bool,
    content: Option<f32>,
    minimum: f32,
    default: Option<f32>,
) -> Option<f32> {
    if let Some(p) = preferred {
        return Some(p.max(0.0));
    }
    if stretch > 0.0 || anchored {
        return None;
    }
    if let Some(c) = content {
        return Some(c.max(minimum).max(0.0));
    }
    Some(default.unwrap_or(0.0).max(0.0))
}

/// Infer the unresolved axes of `spec` from `content` and `rules`.
pub fn infer(
    metrics: &dyn TextMetrics,
    spec: &SizeSpec,
    content: Option<TextContent<'_>>,
    rules: SizeRules,
) -> Inferred {
    let (lines, block) = match content {
        Some(c) => {
            let limit = spec
                .width
                .map(|w| (w - rules.padding.width).max(0.0))
                .or(c.max_width);
            let b = metrics.measure_block(&c.style, c.text, limit, c.wrap);
            let width = match c.max_width {
                Some(m) => b.width.min(m.max(0.0)),
                None => b.width,
            };
            (b.lines, Some(Size::new(width, b.height)))
        }
        None => (Vec::new(), None),
    };

    let padded = block.map(|b| {
        Size::new(
            b.width + rules.padding.width,
            b.height + rules.padding.height,
        )
    });

    let width = resolve_axis(
        spec.width,
        spec.stretch_x,
        spec.min_width.is_some() || spec.max_width.is_some(),
        padded.map(|s| s.width),
        rules.minimum.width,
        rules.default.map(|d| d.width),
    );
    let height = resolve_axis(
        spec.height,
        spec.stretch_y,
        spec.min_height.is_some() || spec.max_height.is_some(),
        padded.map(|s| s.height),
        rules.minimum.height,
        rules.default.map(|d| d.height),
    );

    Inferred {
        width,
        height,
        lines,
        content: block.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_text::ApproxMetrics;

    fn text(t: &str) -> TextContent<'_> {
        TextContent::new(t, TextStyle::sized(10.0))
    }

    #[test]
    fn precedence_preferred_beats_everything() {
        assert_eq!(resolve_axis(Some(5.0), 1.0, true, Some(50.0), 80.0, Some(9.0)), Some(5.0));
        assert_eq!(resolve_axis(None, 1.0, false, Some(50.0), 0.0, None), None);
        assert_eq!(resolve_axis(None, 0.0, true, Some(50.0), 0.0, None), None);
        assert_eq!(resolve_axis(None, 0.0, false, Some(50.0), 80.0, Some(9.0)), Some(80.0));
        assert_eq!(resolve_axis(None, 0.0, false, None, 80.0, Some(9.0)), Some(9.0));
        assert_eq!(resolve_axis(None, 0.0, false, None, 80.0, None), Some(0.0));
    }

    #[test]
    fn longer_or_heavier_text_never_shrinks() {
        let m = ApproxMetrics::default();
        let spec = SizeSpec::new();
        let mut last = 0.0;
        for t in ["a", "ab", "abc d", "abc def"] {
            let w = infer(&m, &spec, Some(text(t)), SizeRules::default()).width.unwrap();
            assert!(w >= last);
            last = w;
        }
        let regular = infer(&m, &spec, Some(text("Label")), SizeRules::default()).width;
        let mut bold = text("Label");
        bold.style = bold.style.weight(800);
        let bold = infer(&m, &spec, Some(bold), SizeRules::default()).width;
        assert!(bold >= regular);
    }

    #[test]
    fn max_width_caps_and_wraps() {
        let m = ApproxMetrics::default();
        let mut c = text("one two three four five six");
        c.wrap = WrapMode::Word;
        let free = infer(&m, &SizeSpec::new(), Some(c), SizeRules::default());
        c.max_width = Some(40.0);
        let capped = infer(&m, &SizeSpec::new(), Some(c), SizeRules::default());

        assert!(capped.width.unwrap() <= 40.0);
        assert!(capped.lines.len() > free.lines.len());
        assert!(capped.height.unwrap() > free.height.unwrap());
    }

    #[test]
    fn height_is_line_height_times_lines() {
        let m = ApproxMetrics::default();
        let mut c = text("aa bb cc");
        c.wrap = WrapMode::Word;
        // 6 units per glyph at size 10: "aa bb" = 30, adding " cc" = 48
        let got = infer(&m, &SizeSpec::new().width(30.0), Some(c), SizeRules::default());
        assert_eq!(got.lines, vec!["aa bb", "cc"]);
        assert_eq!(got.width, Some(30.0));
        assert!((got.height.unwrap() - 26.0).abs() < 1e-3);
    }

    #[test]
    fn empty_text_is_one_line_tall() {
        let m = ApproxMetrics::default();
        let got = infer(&m, &SizeSpec::new(), Some(text("")), SizeRules::default());
        assert_eq!(got.width, Some(0.0));
        assert!((got.height.unwrap() - 13.0).abs() < 1e-3);
    }

    #[test]
    fn stretch_skips_inference() {
        let m = ApproxMetrics::default();
        let got = infer(&m, &SizeSpec::new().fill_width(), Some(text("hello")), SizeRules::default());
        assert_eq!(got.width, None);
        assert!(got.height.is_some());
        assert_eq!(got.apply(SizeSpec::new().fill_width()).width, None);
    }

    #[test]
    fn minimum_and_default_apply() {
        let m = ApproxMetrics::default();
        let rules = SizeRules::padded(4.0, 2.0).minimum(64.0, 20.0);
        let got = infer(&m, &SizeSpec::new(), Some(text("ok")), rules);
        assert_eq!(got.width, Some(64.0));

        let toggle = SizeRules::default().default_size(40.0, 20.0);
        let got = infer(&m, &SizeSpec::new(), None, toggle);
        assert_eq!((got.width, got.height), (Some(40.0), Some(20.0)));
    }
}
