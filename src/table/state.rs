//! Table state and its transition function.
//!
//! [`reduce`] is the only place a [`TableState`] changes. Everything else,
//! including [`TableStore`](super::TableStore), goes through it by
//! dispatching an [`Action`].

use super::model::Row;
use super::selection::{self, HeadState, SelectedIds};
use super::sort::Order;

/// State of one table instance.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState<R> {
    rows: Vec<R>,
    sort_by_column: String,
    order_by: Order,
    selected_row_ids: SelectedIds,
    row_selected_count: usize,
    head: HeadState,
    is_loading: bool,
}

impl<R> TableState<R> {
    /// Initial state: no rows, loading.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            sort_by_column: String::new(),
            order_by: Order::Ascending,
            selected_row_ids: SelectedIds::new(),
            row_selected_count: 0,
            head: HeadState::Unchecked,
            is_loading: true,
        }
    }

    /// Displayed rows in the active sort order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Field of the active sort column; empty when unsorted.
    pub fn sort_by_column(&self) -> &str {
        &self.sort_by_column
    }

    pub fn order_by(&self) -> Order {
        self.order_by
    }

    /// Every selected id, including ids from pages not currently shown.
    pub fn selected_row_ids(&self) -> &SelectedIds {
        &self.selected_row_ids
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_row_ids.contains(id)
    }

    /// Selected rows among the displayed ones.
    pub fn row_selected_count(&self) -> usize {
        self.row_selected_count
    }

    pub fn head(&self) -> HeadState {
        self.head
    }

    pub fn head_checked(&self) -> bool {
        self.head.is_checked()
    }

    pub fn head_indeterminate(&self) -> bool {
        self.head.is_indeterminate()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}

impl<R: Row> TableState<R> {
    fn refresh_selection(&mut self) {
        self.row_selected_count = selection::count_on_page(&self.selected_row_ids, &self.rows);
        self.head = HeadState::derive(self.row_selected_count, self.rows.len());
    }
}

impl<R> Default for TableState<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// A named state transition.
#[derive(Debug, Clone)]
pub enum Action<R> {
    /// Show or hide the loading overlay.
    SetLoading(bool),
    /// Activate a sort column with rows already ordered by it.
    SetSortColumn {
        column: String,
        order: Order,
        rows: Vec<R>,
    },
    /// Select every displayed row.
    SelectAll,
    /// Deselect every displayed row.
    DeselectAll,
    /// Flip the selection of one row.
    ToggleRow(String),
    /// A new page arrived: replace rows and take the caller's selection.
    ReplaceRows {
        rows: Vec<R>,
        selected_keys: Vec<String>,
    },
    /// The caller changed its selected keys without sending new rows.
    SyncSelection(Vec<String>),
}

impl<R> Action<R> {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetLoading(_) => "set_loading",
            Action::SetSortColumn { .. } => "set_sort_column",
            Action::SelectAll => "select_all",
            Action::DeselectAll => "deselect_all",
            Action::ToggleRow(_) => "toggle_row",
            Action::ReplaceRows { .. } => "replace_rows",
            Action::SyncSelection(_) => "sync_selection",
        }
    }
}

/// Apply `action` to `state` and return the next state.
pub fn reduce<R: Row>(mut state: TableState<R>, action: Action<R>) -> TableState<R> {
    match action {
        Action::SetLoading(is_loading) => {
            state.is_loading = is_loading;
        }
        Action::SetSortColumn {
            column,
            order,
            rows,
        } => {
            state.sort_by_column = column;
            state.order_by = order;
            state.rows = rows;
            state.refresh_selection();
        }
        Action::SelectAll => {
            selection::select_all(&mut state.selected_row_ids, &state.rows);
            state.refresh_selection();
        }
        Action::DeselectAll => {
            selection::deselect_all(&mut state.selected_row_ids, &state.rows);
            state.refresh_selection();
        }
        Action::ToggleRow(id) => {
            selection::toggle(&mut state.selected_row_ids, &id);
            state.refresh_selection();
        }
        Action::ReplaceRows {
            rows,
            selected_keys,
        } => {
            let (selected, count) = selection::reconcile(&rows, &selected_keys);
            state.head = HeadState::derive(count, rows.len());
            state.rows = rows;
            state.selected_row_ids = selected;
            state.row_selected_count = count;
            state.is_loading = false;
        }
        Action::SyncSelection(keys) => {
            state.selected_row_ids = keys.into_iter().collect();
            state.refresh_selection();
        }
    }
    state
}
