//! Line breaking.
//!
//! Explicit newlines always break. `Word` fills lines greedily with
//! space-separated words; a word wider than the line sits alone on its own
//! line. `Character` breaks between graphemes. A non-positive (or non-finite)
//! width degrades every mode to `None`.

use unicode_segmentation::UnicodeSegmentation;

use crate::WrapMode;

/// Wrap `text` using `width_of` to measure runs.
///
/// Returns an empty `Vec` for empty input.
pub fn wrap_with(
    width_of: impl Fn(&str) -> f32,
    text: &str,
    max_width: f32,
    mode: WrapMode,
) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }
    let mode = if max_width > 0.0 && max_width.is_finite() {
        mode
    } else {
        WrapMode::None
    };

    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        match mode {
            WrapMode::None => lines.push(raw.to_string()),
            WrapMode::Word => wrap_words(&width_of, raw, max_width, &mut lines),
            WrapMode::Character => wrap_graphemes(&width_of, raw, max_width, &mut lines),
        }
    }
    lines
}

fn wrap_words(width_of: &impl Fn(&str) -> f32, line: &str, max: f32, out: &mut Vec<String>) {
    let space_w = width_of(" ");
    let mut current = String::new();
    let mut current_w = 0.0f32;

    for word in line.split(' ').filter(|w| !w.is_empty()) {
        let word_w = width_of(word);
        if current.is_empty() {
            current.push_str(word);
            current_w = word_w;
        } else if current_w + space_w + word_w <= max {
            current.push(' ');
            current.push_str(word);
            current_w += space_w + word_w;
        } else {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
            current_w = word_w;
        }
    }
    out.push(current);
}

fn wrap_graphemes(width_of: &impl Fn(&str) -> f32, line: &str, max: f32, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_w = 0.0f32;

    for g in line.graphemes(true) {
        let gw = width_of(g);
        if !current.is_empty() && current_w + gw > max {
            out.push(std::mem::take(&mut current));
            current_w = 0.0;
        }
        current.push_str(g);
        current_w += gw;
    }
    out.push(current);
}

/// Count wrapped lines without keeping them.
pub fn line_count(
    width_of: impl Fn(&str) -> f32,
    text: &str,
    max_width: f32,
    mode: WrapMode,
) -> usize {
    wrap_with(width_of, text, max_width, mode).len()
}
