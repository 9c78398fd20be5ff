//! Table column widths.
//!
//! Fixed columns keep their width. When auto columns exist and the space
//! left after dividers exceeds the fixed total, the remainder is split
//! evenly between auto columns regardless of their content. Otherwise each
//! auto column falls back to its own content width. With no auto columns,
//! an overflow is taken out of the last column alone.

use arbor_text::{TextMetrics, TextStyle};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnWidth {
    Fixed(f32),
    Auto,
}

/// Per-column pixel widths.
///
/// `content` holds each column's content width (header and cells, padding
/// included); it is only read for auto columns when space is tight.
pub fn distribute(columns: &[ColumnWidth], available: f32, divider: f32, content: &[f32]) -> Vec<f32> {
    let n = columns.len();
    if n == 0 {
        return Vec::new();
    }
    let dividers = divider.max(0.0) * (n - 1) as f32;
    let room = available.max(0.0) - dividers;

    let mut widths: Vec<f32> = columns
        .iter()
        .map(|c| match c {
            ColumnWidth::Fixed(w) => w.max(0.0),
            ColumnWidth::Auto => 0.0,
        })
        .collect();
    let fixed: f32 = widths.iter().sum();
    let auto_count = columns.iter().filter(|c| **c == ColumnWidth::Auto).count();

    if auto_count > 0 {
        if room > fixed {
            let each = (room - fixed) / auto_count as f32;
            for (w, c) in widths.iter_mut().zip(columns) {
                if *c == ColumnWidth::Auto {
                    *w = each;
                }
            }
        } else {
            for (i, (w, c)) in widths.iter_mut().zip(columns).enumerate() {
                if *c == ColumnWidth::Auto {
                    *w = content.get(i).copied().unwrap_or(0.0).max(0.0);
                }
            }
        }
    } else if fixed > room
        && let Some(last) = widths.last_mut()
    {
        let overflow = fixed - room;
        *last = (*last - overflow).max(0.0);
    }

    log::trace!("columns {columns:?} in {available} -> {widths:?}");
    widths
}

/// Content width per column: widest of the header and every cell, plus
/// `padding` on both sides.
pub fn content_widths(
    metrics: &dyn TextMetrics,
    header_style: &TextStyle,
    cell_style: &TextStyle,
    headers: &[String],
    rows: &[Vec<String>],
    padding: f32,
) -> Vec<f32> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let cells = rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| metrics.measure_width(cell_style, c))
                .fold(0.0f32, f32::max);
            metrics.measure_width(header_style, h).max(cells) + padding * 2.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::ColumnWidth::*;
    use super::*;

    #[test]
    fn auto_columns_split_the_remainder_evenly() {
        // room = 400 - 2*2 = 396, fixed 100 -> 296 / 2
        let w = distribute(&[Fixed(100.0), Auto, Auto], 400.0, 2.0, &[0.0, 10.0, 300.0]);
        assert_eq!(w, vec![100.0, 148.0, 148.0]);
    }

    #[test]
    fn equal_content_gets_equal_width() {
        let w = distribute(&[Auto, Auto, Auto], 100.0, 0.0, &[5.0, 5.0, 5.0]);
        assert_eq!(w[0], w[1]);
        assert_eq!(w[1], w[2]);
        assert!((w.iter().sum::<f32>() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn tight_space_falls_back_to_content() {
        // room 96 == fixed 96: not strictly greater
        let w = distribute(&[Fixed(96.0), Auto], 100.0, 4.0, &[0.0, 37.0]);
        assert_eq!(w, vec![96.0, 37.0]);
    }

    #[test]
    fn overflow_comes_out_of_last_column_only() {
        let w = distribute(&[Fixed(60.0), Fixed(60.0), Fixed(60.0)], 150.0, 0.0, &[]);
        assert_eq!(w, vec![60.0, 60.0, 30.0]);

        let w = distribute(&[Fixed(100.0), Fixed(20.0)], 50.0, 0.0, &[]);
        assert_eq!(w, vec![100.0, 0.0]);
        assert!(w.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn degenerate_inputs() {
        assert!(distribute(&[], 100.0, 1.0, &[]).is_empty());
        assert_eq!(distribute(&[Fixed(-5.0)], 10.0, 1.0, &[]), vec![0.0]);
        assert_eq!(distribute(&[Auto], -10.0, 0.0, &[12.0]), vec![12.0]);
    }
}
