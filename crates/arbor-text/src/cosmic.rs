use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping, Weight};
use parking_lot::Mutex;
use unicode_segmentation::UnicodeSegmentation;

use crate::{TextMetrics, TextStyle};

/// Shaped metrics backed by `cosmic-text`.
///
/// The font system is owned by this value rather than a process-wide
/// singleton; its glyph caches never change measured widths.
pub struct CosmicMetrics {
    fs: Mutex<FontSystem>,
}

impl Default for CosmicMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicMetrics {
    pub fn new() -> Self {
        Self {
            fs: Mutex::new(FontSystem::new()),
        }
    }
}

impl TextMetrics for CosmicMetrics {
    fn measure_width(&self, style: &TextStyle, text: &str) -> f32 {
        if text.is_empty() || style.size <= 0.0 {
            return 0.0;
        }
        let mut guard = self.fs.lock();
        let fs = &mut *guard;

        let line_h = style.line_height_px().max(1.0);
        let mut buf = Buffer::new(fs, Metrics::new(style.size, line_h));
        {
            let mut b = buf.borrow_with(fs);
            b.set_size(None, None);
            let attrs = Attrs::new().weight(Weight(style.weight));
            b.set_text(text, &attrs, Shaping::Advanced, None);
            b.shape_until_scroll(true);
        }

        let shaped = buf
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0f32, f32::max);
        let glyphs = text.graphemes(true).count();
        let tracking = style.tracking.max(0.0) * glyphs.saturating_sub(1) as f32;
        log::trace!("cosmic width {:?} -> {}", text, shaped + tracking);
        shaped + tracking
    }
}
