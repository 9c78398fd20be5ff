//! # Text metrics and wrapping
//!
//! Widgets never talk to a font backend directly. They ask a [`TextMetrics`]
//! implementation three questions:
//!
//! - how wide is this run of text under a style (`measure_width`),
//! - how tall is one line under a style (`line_height`),
//! - how does the text break into lines for a width (`wrap`).
//!
//! All three are pure functions of their inputs. Two backends ship here:
//!
//! - [`ApproxMetrics`]: deterministic, font-free estimate based on grapheme
//!   cell widths. Used by tests and headless builds.
//! - `CosmicMetrics` (feature `cosmic`): shaped widths from `cosmic-text`.
//!
//! ```rust
//! use arbor_text::*;
//!
//! let m = ApproxMetrics::default();
//! let style = TextStyle::default();
//! let lines = m.wrap(&style, "the quick brown fox", 60.0, WrapMode::Word);
//! assert!(lines.len() > 1);
//! ```

mod approx;
#[cfg(feature = "cosmic")]
mod cosmic;
pub mod wrap;

pub use approx::ApproxMetrics;
#[cfg(feature = "cosmic")]
pub use cosmic::CosmicMetrics;

/// Resolved typography for a run of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in layout units.
    pub size: f32,
    /// Line height as a multiple of `size`.
    pub line_height: f32,
    /// CSS-style weight (100..=900).
    pub weight: u16,
    /// Extra advance added between glyphs.
    pub tracking: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            line_height: 1.3,
            weight: 400,
            tracking: 0.0,
        }
    }
}

impl TextStyle {
    pub fn sized(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
    pub fn weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }
    pub fn tracking(mut self, tracking: f32) -> Self {
        self.tracking = tracking;
        self
    }
    /// Absolute line height. Degenerate sizes collapse to zero.
    pub fn line_height_px(&self) -> f32 {
        (self.size.max(0.0) * self.line_height.max(0.0)).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Break only on explicit `\n`.
    #[default]
    None,
    /// Greedy line fill on spaces.
    Word,
    /// Break between any two graphemes (scripts without spaces).
    Character,
}

/// Measured block of wrapped text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    /// Widest line.
    pub width: f32,
    /// `line_height * max(1, lines.len())`.
    pub height: f32,
}

pub trait TextMetrics {
    fn measure_width(&self, style: &TextStyle, text: &str) -> f32;

    fn line_height(&self, style: &TextStyle) -> f32 {
        style.line_height_px()
    }

    fn wrap(&self, style: &TextStyle, text: &str, max_width: f32, mode: WrapMode) -> Vec<String> {
        wrap::wrap_with(
            |s| self.measure_width(style, s),
            text,
            max_width,
            mode,
        )
    }

    /// Wrap and measure in one step. `max_width = None` means unconstrained.
    fn measure_block(
        &self,
        style: &TextStyle,
        text: &str,
        max_width: Option<f32>,
        mode: WrapMode,
    ) -> TextBlock {
        let limit = max_width.unwrap_or(0.0);
        let lines = self.wrap(style, text, limit, mode);
        let width = lines
            .iter()
            .map(|l| self.measure_width(style, l))
            .fold(0.0f32, f32::max);
        let height = self.line_height(style) * lines.len().max(1) as f32;
        TextBlock {
            lines,
            width,
            height,
        }
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for std::rc::Rc<T> {
    fn measure_width(&self, style: &TextStyle, text: &str) -> f32 {
        (**self).measure_width(style, text)
    }
    fn line_height(&self, style: &TextStyle) -> f32 {
        (**self).line_height(style)
    }
    fn wrap(&self, style: &TextStyle, text: &str, max_width: f32, mode: WrapMode) -> Vec<String> {
        (**self).wrap(style, text, max_width, mode)
    }
}
