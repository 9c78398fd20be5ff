use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::*;

use super::{Common, common_builders, focus_ring, interactive_root};
use crate::columns::{ColumnWidth, content_widths, distribute};
use crate::interaction::{Behavior, InteractionState, Interactive, PressModel, Response, Step, advance};
use crate::sizing::{SizeRules, infer};
use crate::{BuildCx, WidgetHandle};

const CELL_PAD_X: f32 = 8.0;
const CELL_PAD_Y: f32 = 6.0;
const DIVIDER: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub title: String,
    pub width: ColumnWidth,
}

impl ColumnSpec {
    pub fn fixed(title: impl Into<String>, width: f32) -> Self {
        Self {
            title: title.into(),
            width: ColumnWidth::Fixed(width),
        }
    }
    pub fn auto(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: ColumnWidth::Auto,
        }
    }
}

/// Passed to row callbacks.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRowInfo {
    pub row: usize,
    /// Column under the pointer; `None` for keyboard selection.
    pub column: Option<usize>,
    pub cells: Vec<String>,
}

pub struct TableSpec {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<String>>,
    pub selected: Option<usize>,
    pub on_select: Option<Rc<dyn Fn(&TableRowInfo)>>,
    pub common: Common,
}

impl TableSpec {
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            selected: None,
            on_select: None,
            common: Common::default(),
        }
    }
    pub fn selected(mut self, row: usize) -> Self {
        self.selected = Some(row);
        self
    }
    pub fn on_select(mut self, f: impl Fn(&TableRowInfo) + 'static) -> Self {
        self.on_select = Some(Rc::new(f));
        self
    }
}

common_builders!(TableSpec);

/// Table plus the column widths it was laid out with.
pub struct TableHandle {
    pub handle: WidgetHandle,
    pub column_widths: Vec<f32>,
    pub row_height: f32,
    pub header_height: f32,
}

struct TableBehavior {
    rows: Vec<PrimitiveId>,
    cells: Vec<Vec<String>>,
    column_x: Vec<(f32, f32)>,
    header_h: f32,
    row_h: f32,
    ring: PrimitiveId,
    on_select: Option<Rc<dyn Fn(&TableRowInfo)>>,
}

#[derive(Default)]
struct TableState {
    base: InteractionState,
    hovered: Option<usize>,
    pressed_row: Option<usize>,
}

impl TableBehavior {
    fn row_at(&self, ev: &InputEvent) -> Option<usize> {
        if !ev.is_inside() || self.row_h <= 0.0 {
            return None;
        }
        let y = ev.local.y - self.header_h;
        if y < 0.0 {
            return None;
        }
        let i = (y / self.row_h).floor() as usize;
        (i < self.rows.len()).then_some(i)
    }

    fn column_at(&self, x: f32) -> Option<usize> {
        self.column_x.iter().position(|(x0, w)| x >= *x0 && x < x0 + w)
    }

    fn token(st: &TableState, i: usize) -> StyleToken {
        if st.base.selection == Some(i) {
            StyleToken::TableRowSelected
        } else if st.hovered == Some(i) {
            StyleToken::TableRowHover
        } else if i % 2 == 1 {
            StyleToken::TableRowAlt
        } else {
            StyleToken::TableRow
        }
    }

    fn repaint(&self, st: &TableState, graph: &mut dyn SceneGraph, rows: [Option<usize>; 2]) {
        for i in rows.into_iter().flatten() {
            if let Some(p) = self.rows.get(i) {
                graph.set_style(*p, Self::token(st, i));
            }
        }
    }

    fn select(&self, st: &mut TableState, graph: &mut dyn SceneGraph, row: usize, column: Option<usize>) -> Response<TableRowInfo> {
        let old = st.base.selection.replace(row);
        self.repaint(st, graph, [old, Some(row)]);
        Response::notify(TableRowInfo {
            row,
            column,
            cells: self.cells.get(row).cloned().unwrap_or_default(),
        })
    }
}

impl Behavior for TableBehavior {
    type State = TableState;
    type Notice = TableRowInfo;

    fn handle(&self, st: &mut TableState, graph: &mut dyn SceneGraph, _node: NodeId, ev: &InputEvent) -> Response<TableRowInfo> {
        let step = advance(&mut st.base, ev, PressModel::Press);
        let under = self.row_at(ev);
        if ev.kind.is_pointer() && under != st.hovered {
            let old = std::mem::replace(&mut st.hovered, under);
            self.repaint(st, graph, [old, under]);
        }
        match step {
            Step::Visual if ev.kind == EventKind::PointerDown => {
                st.pressed_row = under;
                Response::consumed()
            }
            Step::Activate => match (st.pressed_row.take(), under) {
                (Some(p), Some(u)) if p == u => self.select(st, graph, u, self.column_at(ev.local.x)),
                _ => Response::consumed(),
            },
            Step::Cancelled => {
                st.pressed_row = None;
                Response::consumed()
            }
            Step::Key(k) => {
                let n = self.rows.len();
                if n == 0 {
                    return Response::ignored();
                }
                let cur = st.base.selection;
                let target = match k {
                    Key::ArrowUp => cur.map_or(n - 1, |c| c.saturating_sub(1)),
                    Key::ArrowDown => cur.map_or(0, |c| (c + 1).min(n - 1)),
                    Key::Home => 0,
                    Key::End => n - 1,
                    _ => return Response::ignored(),
                };
                if cur == Some(target) {
                    return Response::consumed();
                }
                self.select(st, graph, target, None)
            }
            Step::Scroll(_) => Response::ignored(),
            other => Response::from_step(other),
        }
    }

    fn notify(&self, info: TableRowInfo) {
        if let Some(f) = &self.on_select {
            f(&info);
        }
    }

    fn focus_changed(&self, _st: &mut TableState, graph: &mut dyn SceneGraph, _node: NodeId, focused: bool) {
        graph.set_primitive_visible(self.ring, focused);
    }
}

/// Header plus rows. Column widths come from [`distribute`] over the
/// table's width; with no width given, the table is as wide as its content.
pub fn Table(cx: &mut BuildCx, spec: TableSpec) -> TableHandle {
    let header_style = cx.text_style(StyleToken::TableHeaderText);
    let cell_style = cx.text_style(StyleToken::TableCell);
    let titles: Vec<String> = spec.columns.iter().map(|c| c.title.clone()).collect();
    let content = content_widths(cx.metrics.as_ref(), &header_style, &cell_style, &titles, &spec.rows, CELL_PAD_X);
    let kinds: Vec<ColumnWidth> = spec.columns.iter().map(|c| c.width).collect();

    let header_h = cx.metrics.line_height(&header_style) + CELL_PAD_Y * 2.0;
    let row_h = cx.metrics.line_height(&cell_style) + CELL_PAD_Y * 2.0;
    let n_div = kinds.len().saturating_sub(1) as f32;
    let natural_w: f32 = kinds
        .iter()
        .zip(&content)
        .map(|(k, c)| match k {
            ColumnWidth::Fixed(w) => w.max(0.0),
            ColumnWidth::Auto => *c,
        })
        .sum::<f32>()
        + DIVIDER * n_div;
    let natural_h = header_h + row_h * spec.rows.len() as f32;

    let mut inferred = infer(cx.metrics.as_ref(), &spec.common.size, None, SizeRules::default());
    if spec.common.size.is_width_unresolved() {
        inferred.width = Some(natural_w);
    }
    if spec.common.size.is_height_unresolved() {
        inferred.height = Some(natural_h);
    }
    let size = inferred.or_fallback(Size::new(natural_w, natural_h));
    let widths = distribute(&kinds, size.width, DIVIDER, &content);

    let mut column_x = Vec::with_capacity(widths.len());
    let mut x = 0.0;
    for w in &widths {
        column_x.push((x, *w));
        x += w + DIVIDER;
    }

    let node = interactive_root(cx, &spec.common, inferred.apply(spec.common.size));
    let mut handle = TableHandle {
        handle: WidgetHandle::new(node),
        column_widths: widths,
        row_height: row_h,
        header_height: header_h,
    };
    if !node.is_valid() {
        handle.handle = WidgetHandle::invalid();
        return handle;
    }
    cx.configure(node, |n| n.layout = LayoutMode::Absolute);
    let ring = focus_ring(cx, node, size);

    let header = cx.create_child(node);
    cx.set_size(header, SizeSpec::fixed(size.width, header_h));
    cx.graph.add_primitive(header, Primitive::rect(Rect::new(0.0, 0.0, size.width, header_h), StyleToken::TableHeader));
    for ((x0, w), title) in column_x.iter().zip(&titles) {
        cx.graph.add_primitive(
            header,
            TextPrimitive::new(
                Rect::new(x0 + CELL_PAD_X, CELL_PAD_Y, (w - CELL_PAD_X * 2.0).max(0.0), header_h - CELL_PAD_Y * 2.0),
                title.as_str(),
                StyleToken::TableHeaderText,
            )
            .into(),
        );
    }

    let selected = spec.selected.filter(|r| *r < spec.rows.len());
    let mut rows = Vec::with_capacity(spec.rows.len());
    for (i, cells) in spec.rows.iter().enumerate() {
        let row = cx.create_child(node);
        cx.set_size(row, SizeSpec::fixed(size.width, row_h));
        cx.configure(row, |n| n.position = Vec2::new(0.0, header_h + row_h * i as f32));
        let token = match (selected == Some(i), i % 2 == 1) {
            (true, _) => StyleToken::TableRowSelected,
            (false, true) => StyleToken::TableRowAlt,
            (false, false) => StyleToken::TableRow,
        };
        rows.push(cx.graph.add_primitive(row, Primitive::rect(Rect::new(0.0, 0.0, size.width, row_h), token)));
        for ((x0, w), text) in column_x.iter().zip(cells) {
            cx.graph.add_primitive(
                row,
                TextPrimitive::new(
                    Rect::new(x0 + CELL_PAD_X, CELL_PAD_Y, (w - CELL_PAD_X * 2.0).max(0.0), row_h - CELL_PAD_Y * 2.0),
                    text.as_str(),
                    StyleToken::TableCell,
                )
                .into(),
            );
        }
    }

    for (x0, w) in column_x.iter().take(column_x.len().saturating_sub(1)) {
        cx.graph.add_primitive(
            node,
            Primitive::rect(Rect::new(x0 + w, 0.0, DIVIDER, size.height), StyleToken::TableDivider),
        );
    }

    if spec.common.interactive() {
        let behavior = TableBehavior {
            rows,
            cells: spec.rows,
            column_x,
            header_h,
            row_h,
            ring,
            on_select: spec.on_select,
        };
        let state = TableState {
            base: InteractionState {
                selection: selected,
                ..InteractionState::default()
            },
            ..TableState::default()
        };
        cx.attach(node, Interactive::new(behavior, Rc::new(RefCell::new(state))));
    }
    handle
}
