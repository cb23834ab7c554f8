//! The table widget core.
//!
//! State lives in [`TableState`] and changes only through [`reduce`]. A
//! [`TableStore`] owns one table: it takes caller props, runs the gated
//! reconciliation effects, turns user interactions into actions and reports
//! back through [`TableCallbacks`]. [`TableStore::view`] produces the
//! [`TableView`] that the terminal renderer paints.

mod error;
mod model;
mod pagination;
mod selection;
mod sort;
mod state;
mod store;
mod view;

pub use error::TableError;
pub use model::{
    display_value, Cell, CellControl, Column, Comparator, Fixed, JsonRow, Renderer, Row,
};
pub use pagination::{page_count, PageControls, PageMarker, PageNav, Pagination};
pub use selection::{HeadClick, HeadState, SelectedIds};
pub use sort::{
    default_compare, exact_compare, named_comparator, next_sort, numeric_compare, sort_rows, Order,
};
pub use state::{reduce, Action, TableState};
pub use store::{ClickOutcome, TableCallbacks, TableProps, TableStore};
pub use view::{ColumnView, RowView, TableView};
