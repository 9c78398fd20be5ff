//! Depth-first flattening of a [`TreeNode`] hierarchy into rows.

use std::fmt::Write;

use smallvec::SmallVec;

use super::TreeNode;

/// Child indices from the top level down to a node.
pub type RowPath = SmallVec<[usize; 8]>;

/// One visible row. Rebuilt wholesale on every build.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatRow {
    pub label: String,
    /// Top-level rows are depth 0.
    pub depth: usize,
    /// Row index of the parent row.
    pub parent: Option<usize>,
    /// Row indices of every ancestor, outermost first; `len() == depth`.
    pub ancestors: SmallVec<[usize; 8]>,
    pub path: RowPath,
    pub has_children: bool,
    pub expanded: bool,
    pub selected: bool,
}

/// Flatten `roots`, descending only into expanded nodes.
///
/// `is_expanded` decides expansion per node (overrides layered over
/// [`TreeNode::expanded`]); `selected` marks at most one row.
pub fn flatten(
    roots: &[TreeNode],
    is_expanded: impl Fn(&[usize], &TreeNode) -> bool,
    selected: Option<&[usize]>,
) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    let mut path = RowPath::new();
    let mut ancestors = SmallVec::new();
    walk(roots, &is_expanded, selected, &mut path, &mut ancestors, &mut rows);
    rows
}

fn walk(
    nodes: &[TreeNode],
    is_expanded: &impl Fn(&[usize], &TreeNode) -> bool,
    selected: Option<&[usize]>,
    path: &mut RowPath,
    ancestors: &mut SmallVec<[usize; 8]>,
    rows: &mut Vec<FlatRow>,
) {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        let has_children = !node.children.is_empty();
        let expanded = has_children && is_expanded(path, node);
        let index = rows.len();
        rows.push(FlatRow {
            label: node.label.clone(),
            depth: ancestors.len(),
            parent: ancestors.last().copied(),
            ancestors: ancestors.clone(),
            path: path.clone(),
            has_children,
            expanded,
            selected: selected == Some(path.as_slice()),
        });
        if expanded {
            ancestors.push(index);
            walk(&node.children, is_expanded, selected, path, ancestors, rows);
            ancestors.pop();
        }
        path.pop();
    }
}

/// Index of the row whose path is `path`.
pub fn find_row(rows: &[FlatRow], path: &[usize]) -> Option<usize> {
    rows.iter().position(|r| r.path.as_slice() == path)
}

/// Last direct child of row `i`, if it is expanded and has visible children.
pub fn last_child(rows: &[FlatRow], i: usize) -> Option<usize> {
    let depth = rows.get(i)?.depth;
    rows.iter()
        .enumerate()
        .skip(i + 1)
        .take_while(|(_, r)| r.depth > depth)
        .filter(|(_, r)| r.parent == Some(i))
        .map(|(j, _)| j)
        .last()
}

/// One line per row: indentation, disclosure marker, label, `*` if selected.
pub fn dump(rows: &[FlatRow]) -> String {
    let mut out = String::new();
    for r in rows {
        let marker = match (r.has_children, r.expanded) {
            (true, true) => '-',
            (true, false) => '+',
            (false, _) => '.',
        };
        let _ = writeln!(
            out,
            "{}{} {}{}",
            "  ".repeat(r.depth),
            marker,
            r.label,
            if r.selected { " *" } else { "" }
        );
    }
    out
}
