//! Semantic view of a table, ready for painting.
//!
//! The view is what a renderer (or a test) relies on: one marker per row,
//! an empty-state marker, the header tri-state, and the page controls.
//! Building it is also where a misconfigured column is detected.

use super::error::TableError;
use super::model::{display_value, Cell, Column, Fixed, Row};
use super::pagination::PageControls;
use super::selection::HeadState;
use super::sort::Order;
use super::state::TableState;

/// Header cell of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub field_name: String,
    pub title: String,
    pub width: u16,
    pub fixed: Option<Fixed>,
    pub sortable: bool,
    /// Direction indicator when this column is the active sort column.
    pub sorted: Option<Order>,
}

/// One displayed row.
#[derive(Debug, Clone)]
pub struct RowView {
    pub id: String,
    pub index: usize,
    /// Checkbox state; `None` when the table is not selectable.
    pub selected: Option<bool>,
    pub cells: Vec<Cell>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct TableView {
    /// Header checkbox; `None` when the table is not selectable.
    pub head_checkbox: Option<HeadState>,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub loading: bool,
    pub pagination: Option<PageControls>,
}

impl TableView {
    /// Whether the empty-state marker is shown.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(crate) fn build<R: Row>(
    state: &TableState<R>,
    columns: &[Column<R>],
    selectable: bool,
    pagination: Option<PageControls>,
) -> Result<TableView, TableError> {
    let column_views = columns
        .iter()
        .map(|column| ColumnView {
            field_name: column.field_name.clone(),
            title: column.title.clone(),
            width: column.width,
            fixed: column.fixed,
            sortable: column.sortable,
            sorted: (column.sortable && column.field_name == state.sort_by_column())
                .then_some(state.order_by()),
        })
        .collect();

    let rows = state
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let cells = columns
                .iter()
                .map(|column| cell_for(column, row, index))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RowView {
                id: row.id().to_owned(),
                index,
                selected: selectable.then(|| state.is_selected(row.id())),
                cells,
            })
        })
        .collect::<Result<Vec<_>, TableError>>()?;

    Ok(TableView {
        head_checkbox: selectable.then_some(state.head()),
        columns: column_views,
        rows,
        loading: state.is_loading(),
        pagination,
    })
}

fn cell_for<R: Row>(column: &Column<R>, row: &R, index: usize) -> Result<Cell, TableError> {
    if let Some(render) = &column.render {
        return Ok(render(row, index));
    }
    match row.field(&column.field_name) {
        Some(value) => Ok(Cell::new(display_value(&value))),
        None => Err(TableError::Configuration {
            column: column.field_name.clone(),
            row_id: row.id().to_owned(),
        }),
    }
}
