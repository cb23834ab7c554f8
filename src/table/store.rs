//! The table store: dispatch boundary, caller props and callbacks.
//!
//! The caller re-supplies [`TableProps`] whenever it redraws. The store
//! compares them with what it saw last and fires each reconciliation only
//! when its own trigger changed:
//!
//! - a new `data` allocation (compared by `Arc` identity) replaces the rows,
//! - a new `show_loading` value sets the loading flag,
//! - a new `selected_row_keys` list that disagrees with the current selection
//!   replaces the selection,
//! - a new selected-id count notifies `on_selection_change`.

use std::sync::Arc;

use tracing::{debug, trace};

use super::error::TableError;
use super::model::{Column, Row};
use super::pagination::{PageControls, PageNav, Pagination};
use super::selection::HeadClick;
use super::sort::{next_sort, sort_rows};
use super::state::{reduce, Action, TableState};
use super::view::{self, TableView};

/// Caller-controlled inputs.
pub struct TableProps<R> {
    pub columns: Vec<Column<R>>,
    pub data: Arc<Vec<R>>,
    pub is_selectable: bool,
    pub selected_row_keys: Vec<String>,
    pub pagination: Option<Pagination>,
    pub show_loading: bool,
}

impl<R> TableProps<R> {
    pub fn new(columns: Vec<Column<R>>, data: Arc<Vec<R>>) -> Self {
        Self {
            columns,
            data,
            is_selectable: false,
            selected_row_keys: Vec::new(),
            pagination: None,
            show_loading: false,
        }
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.is_selectable = selectable;
        self
    }

    pub fn selected_row_keys(mut self, keys: Vec<String>) -> Self {
        self.selected_row_keys = keys;
        self
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn show_loading(mut self, show_loading: bool) -> Self {
        self.show_loading = show_loading;
        self
    }
}

impl<R> Clone for TableProps<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            data: Arc::clone(&self.data),
            is_selectable: self.is_selectable,
            selected_row_keys: self.selected_row_keys.clone(),
            pagination: self.pagination,
            show_loading: self.show_loading,
        }
    }
}

/// Outbound notifications. All are optional and fire-and-forget.
pub struct TableCallbacks<R> {
    on_page_change: Option<Box<dyn FnMut(u32)>>,
    on_selection_change: Option<Box<dyn FnMut(&[String])>>,
    on_row_click: Option<Box<dyn FnMut(&R)>>,
}

impl<R> Default for TableCallbacks<R> {
    fn default() -> Self {
        Self {
            on_page_change: None,
            on_selection_change: None,
            on_row_click: None,
        }
    }
}

impl<R> TableCallbacks<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page_change<F: FnMut(u32) + 'static>(mut self, f: F) -> Self {
        self.on_page_change = Some(Box::new(f));
        self
    }

    pub fn on_selection_change<F: FnMut(&[String]) + 'static>(mut self, f: F) -> Self {
        self.on_selection_change = Some(Box::new(f));
        self
    }

    pub fn on_row_click<F: FnMut(&R) + 'static>(mut self, f: F) -> Self {
        self.on_row_click = Some(Box::new(f));
        self
    }
}

/// Result of a click inside a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The row-click callback ran.
    Row,
    /// An embedded control handled the click; the row was not clicked.
    Control,
    /// Nothing was under the click.
    Ignored,
}

/// Owns one table's state and mediates every change to it.
pub struct TableStore<R: Row> {
    state: TableState<R>,
    props: TableProps<R>,
    callbacks: TableCallbacks<R>,
    last_data: Option<Arc<Vec<R>>>,
    last_show_loading: Option<bool>,
    last_selected_keys: Option<Vec<String>>,
    last_selected_count: Option<usize>,
}

impl<R: Row> TableStore<R> {
    /// Mount a table with its first props.
    pub fn new(props: TableProps<R>, callbacks: TableCallbacks<R>) -> Self {
        let mut store = Self {
            state: TableState::new(),
            props,
            callbacks,
            last_data: None,
            last_show_loading: None,
            last_selected_keys: None,
            last_selected_count: None,
        };
        store.reconcile_props();
        store
    }

    pub fn state(&self) -> &TableState<R> {
        &self.state
    }

    pub fn props(&self) -> &TableProps<R> {
        &self.props
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.props.columns
    }

    /// Supply the next props, as on every redraw.
    pub fn set_props(&mut self, props: TableProps<R>) {
        self.props = props;
        self.reconcile_props();
    }

    /// Apply an action through the transition function.
    pub fn dispatch(&mut self, action: Action<R>) {
        debug!(action = action.name(), "dispatch");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    fn reconcile_props(&mut self) {
        let data_changed = !matches!(
            &self.last_data,
            Some(previous) if Arc::ptr_eq(previous, &self.props.data)
        );
        if data_changed {
            self.last_data = Some(Arc::clone(&self.props.data));
            self.last_selected_keys = Some(self.props.selected_row_keys.clone());
            let rows = self.ordered(&self.props.data);
            let selected_keys = self.props.selected_row_keys.clone();
            self.dispatch(Action::ReplaceRows {
                rows,
                selected_keys,
            });
        } else if self.last_selected_keys.as_ref() != Some(&self.props.selected_row_keys) {
            self.last_selected_keys = Some(self.props.selected_row_keys.clone());
            if !self.matches_selection(&self.props.selected_row_keys) {
                let keys = self.props.selected_row_keys.clone();
                self.dispatch(Action::SyncSelection(keys));
            }
        }

        if self.last_show_loading != Some(self.props.show_loading) {
            self.last_show_loading = Some(self.props.show_loading);
            self.dispatch(Action::SetLoading(self.props.show_loading));
        }

        self.notify_selection();
    }

    fn matches_selection(&self, keys: &[String]) -> bool {
        let selected = self.state.selected_row_ids();
        keys.len() == selected.len() && keys.iter().all(|k| selected.contains(k))
    }

    /// Rows in the active sort order, so a new page keeps the current sort.
    fn ordered(&self, data: &[R]) -> Vec<R> {
        let active = self.state.sort_by_column();
        let column = self
            .props
            .columns
            .iter()
            .find(|c| c.sortable && !active.is_empty() && c.field_name == active);
        match column {
            Some(column) => sort_rows(
                data,
                &column.field_name,
                self.state.order_by(),
                column.sort_func.as_ref(),
            ),
            None => data.to_vec(),
        }
    }

    fn notify_selection(&mut self) {
        let count = self.state.selected_row_ids().len();
        if self.last_selected_count == Some(count) {
            return;
        }
        self.last_selected_count = Some(count);
        if self.props.data.is_empty() {
            return;
        }
        if let Some(callback) = self.callbacks.on_selection_change.as_mut() {
            let ids: Vec<String> = self.state.selected_row_ids().iter().cloned().collect();
            debug!(count, "selection changed");
            callback(&ids);
        }
    }

    /// Click on the header checkbox.
    pub fn click_head_checkbox(&mut self) {
        if !self.props.is_selectable {
            return;
        }
        let action = match self.state.head().click() {
            HeadClick::SelectAll => Action::SelectAll,
            HeadClick::DeselectAll => Action::DeselectAll,
        };
        self.dispatch(action);
        self.notify_selection();
    }

    /// Click on a row's checkbox. Never counts as a row click.
    pub fn toggle_row(&mut self, id: &str) {
        if !self.props.is_selectable {
            return;
        }
        self.dispatch(Action::ToggleRow(id.to_owned()));
        self.notify_selection();
    }

    /// Toggle the row displayed at `index`.
    pub fn toggle_row_at(&mut self, index: usize) {
        if let Some(id) = self.state.rows().get(index).map(|r| r.id().to_owned()) {
            self.toggle_row(&id);
        }
    }

    /// Click on a column header. Returns whether the sort changed.
    pub fn sort_by(&mut self, column_index: usize) -> bool {
        let Some(column) = self.props.columns.get(column_index) else {
            return false;
        };
        let Some(order) = next_sort(self.state.sort_by_column(), self.state.order_by(), column)
        else {
            return false;
        };
        let rows = sort_rows(
            self.state.rows(),
            &column.field_name,
            order,
            column.sort_func.as_ref(),
        );
        let column = column.field_name.clone();
        self.dispatch(Action::SetSortColumn {
            column,
            order,
            rows,
        });
        true
    }

    /// Click on the body of the row displayed at `index`.
    pub fn click_row(&mut self, index: usize) -> ClickOutcome {
        let Some(row) = self.state.rows().get(index) else {
            return ClickOutcome::Ignored;
        };
        if let Some(callback) = self.callbacks.on_row_click.as_mut() {
            trace!(id = row.id(), "row click");
            callback(row);
        }
        ClickOutcome::Row
    }

    /// Click on one cell. Embedded controls swallow the click.
    pub fn click_cell(&mut self, row_index: usize, column_index: usize) -> ClickOutcome {
        let (Some(row), Some(column)) = (
            self.state.rows().get(row_index),
            self.props.columns.get(column_index),
        ) else {
            return ClickOutcome::Ignored;
        };
        if let Some(render) = &column.render {
            if let Some(control) = render(row, row_index).control {
                trace!(id = row.id(), control = %control.label, "control click");
                (control.on_activate)();
                return ClickOutcome::Control;
            }
        }
        self.click_row(row_index)
    }

    /// Activate the first embedded control in a row, if it has one.
    pub fn activate_control(&mut self, row_index: usize) -> ClickOutcome {
        let control_column = self.state.rows().get(row_index).and_then(|row| {
            self.props.columns.iter().position(|column| {
                column
                    .render
                    .as_ref()
                    .is_some_and(|render| render(row, row_index).control.is_some())
            })
        });
        match control_column {
            Some(column_index) => self.click_cell(row_index, column_index),
            None => ClickOutcome::Ignored,
        }
    }

    /// Ask the caller for another page.
    ///
    /// Requests for the current page, for pages out of range, or without a
    /// page-change callback are ignored. Returns whether the caller was asked.
    pub fn request_page(&mut self, page: u32) -> bool {
        let Some(pagination) = self.props.pagination else {
            return false;
        };
        if self.callbacks.on_page_change.is_none() {
            return false;
        }
        let Some(target) = pagination.resolve(page) else {
            return false;
        };
        self.dispatch(Action::SetLoading(true));
        if let Some(callback) = self.callbacks.on_page_change.as_mut() {
            debug!(page = target, "page change requested");
            callback(target);
        }
        true
    }

    /// Follow a page-control intent (arrow or page number).
    pub fn navigate(&mut self, nav: PageNav) -> bool {
        match self.props.pagination.and_then(|p| p.target(nav)) {
            Some(page) => self.request_page(page),
            None => false,
        }
    }

    /// Page controls, when pagination applies to this frame.
    pub fn page_controls(&self) -> Option<PageControls> {
        if self.callbacks.on_page_change.is_none() || self.state.rows().is_empty() {
            return None;
        }
        self.props
            .pagination
            .as_ref()
            .and_then(PageControls::from_pagination)
    }

    /// Build the frame's view.
    ///
    /// Fails with [`TableError::Configuration`] when a column has neither a
    /// render function nor a matching field in some row.
    pub fn view(&self) -> Result<TableView, TableError> {
        view::build(
            &self.state,
            &self.props.columns,
            self.props.is_selectable,
            self.page_controls(),
        )
    }
}
