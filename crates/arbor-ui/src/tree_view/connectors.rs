//! Connector lines between an expanded row and its children.
//!
//! For every expanded row with visible children there is one vertical
//! segment through the parent's glyph column, from the parent's vertical
//! center to its last direct child's center, and one horizontal elbow per
//! direct child reaching that child's glyph.

use arbor_core::Rect;

use super::flatten::FlatRow;

/// Row placement along both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowGeometry {
    pub pitch: f32,
    pub indent: f32,
    pub padding: f32,
    pub line: f32,
}

impl RowGeometry {
    pub fn top(&self, row: usize) -> f32 {
        row as f32 * self.pitch
    }
    pub fn center_y(&self, row: usize) -> f32 {
        self.top(row) + self.pitch * 0.5
    }
    /// Left edge of the disclosure glyph at `depth`.
    pub fn glyph_x(&self, depth: usize) -> f32 {
        self.padding + depth as f32 * self.indent
    }
    pub fn glyph_center_x(&self, depth: usize) -> f32 {
        self.glyph_x(depth) + self.indent * 0.5
    }
    pub fn label_x(&self, depth: usize) -> f32 {
        self.glyph_x(depth) + self.indent + self.padding
    }
}

/// One line segment, in content coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Expanded row the segment belongs to.
    pub owner: usize,
    pub rect: Rect,
}

pub fn connector_segments(rows: &[FlatRow], geo: &RowGeometry) -> Vec<Segment> {
    let mut last = vec![None; rows.len()];
    for (j, r) in rows.iter().enumerate() {
        if let Some(p) = r.parent {
            last[p] = Some(j);
        }
    }

    let half = geo.line * 0.5;
    let mut out = Vec::new();
    for (i, r) in rows.iter().enumerate() {
        let Some(end) = last[i] else {
            continue;
        };
        if !r.expanded {
            continue;
        }
        let x = geo.glyph_center_x(r.depth) - half;
        let y0 = geo.center_y(i);
        out.push(Segment {
            owner: i,
            rect: Rect::new(x, y0, geo.line, geo.center_y(end) - y0),
        });
        for (j, c) in rows.iter().enumerate().take(end + 1).skip(i + 1) {
            if c.parent != Some(i) {
                continue;
            }
            let reach = (geo.glyph_x(c.depth) - x).max(0.0);
            out.push(Segment {
                owner: i,
                rect: Rect::new(x, geo.center_y(j) - half, reach, geo.line),
            });
        }
    }
    out
}
