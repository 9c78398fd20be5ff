use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{TextMetrics, TextStyle};

/// Font-free metrics: every grapheme advances `cells * size * advance_ratio`,
/// scaled up slightly for heavier weights. Wide (CJK) graphemes count two
/// cells, combining marks zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxMetrics {
    pub advance_ratio: f32,
}

impl Default for ApproxMetrics {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl ApproxMetrics {
    fn weight_factor(weight: u16) -> f32 {
        1.0 + weight.saturating_sub(400) as f32 / 4000.0
    }

    fn cells(grapheme: &str) -> usize {
        grapheme.width().min(2)
    }
}

impl TextMetrics for ApproxMetrics {
    fn measure_width(&self, style: &TextStyle, text: &str) -> f32 {
        if text.is_empty() || style.size <= 0.0 {
            return 0.0;
        }
        let em = style.size * self.advance_ratio * Self::weight_factor(style.weight);
        let mut cells = 0usize;
        let mut glyphs = 0usize;
        for g in text.graphemes(true) {
            cells += Self::cells(g);
            glyphs += 1;
        }
        let tracking = style.tracking.max(0.0) * glyphs.saturating_sub(1) as f32;
        cells as f32 * em + tracking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WrapMode;

    #[test]
    fn width_grows_with_length_and_weight() {
        let m = ApproxMetrics::default();
        let regular = TextStyle::default();
        let bold = TextStyle::default().weight(700);

        let short = m.measure_width(&regular, "Save");
        let long = m.measure_width(&regular, "Save as");
        assert!(long > short);
        assert!(m.measure_width(&bold, "Save") >= short);
    }

    #[test]
    fn wide_graphemes_count_double() {
        let m = ApproxMetrics::default();
        let s = TextStyle::sized(10.0);
        assert_eq!(m.measure_width(&s, "ab"), 12.0);
        assert_eq!(m.measure_width(&s, "漢"), 12.0);
    }

    #[test]
    fn block_height_counts_at_least_one_line() {
        let m = ApproxMetrics::default();
        let s = TextStyle::sized(10.0);
        let block = m.measure_block(&s, "", None, WrapMode::Word);
        assert!(block.lines.is_empty());
        assert!((block.height - 13.0).abs() < 1e-4);
    }

    #[test]
    fn wrapping_is_repeatable() {
        let m = ApproxMetrics::default();
        let s = TextStyle::default();
        let a = m.wrap(&s, "one two three four five", 70.0, WrapMode::Word);
        let b = m.wrap(&s, "one two three four five", 70.0, WrapMode::Word);
        assert_eq!(a, b);
        assert!(a.len() > 1);
    }
}
