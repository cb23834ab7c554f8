//! Application state: the caller side of the table.
//!
//! The app owns everything the table does not: the data source, the
//! current page, the externally-controlled selection and the loading prop.
//! Table callbacks are turned into [`TableEvent`]s on a channel and handled
//! on the next [`App::drain_events`].

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{ControlHandler, TableConfig};
use crate::source::{Page, PageSource};
use crate::table::{
    Column, HeadState, JsonRow, PageNav, Pagination, TableCallbacks, TableError, TableProps,
    TableStore, TableView,
};
use crate::ui::{Cursor, HitMap, Theme};

/// Notifications raised by the table on behalf of the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    PageChange(u32),
    SelectionChange(Vec<String>),
    RowClick(JsonRow),
    Control { label: String, row_id: String },
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    /// Row shown in the detail overlay.
    pub detail_row: Option<JsonRow>,

    // Caller state fed to the table as props
    source: Box<dyn PageSource>,
    pub config: TableConfig,
    columns: Vec<Column<JsonRow>>,
    pub data: Arc<Vec<JsonRow>>,
    pub pagination: Option<Pagination>,
    pub selected_keys: Vec<String>,
    pub show_loading: bool,
    pub store: TableStore<JsonRow>,

    events_tx: mpsc::UnboundedSender<TableEvent>,
    events_rx: mpsc::UnboundedReceiver<TableEvent>,

    // Navigation
    pub cursor: Cursor,
    pub hit_map: HitMap,

    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app and ask the source for the first page.
    ///
    /// Fails when the configured columns are invalid.
    pub fn new(source: Box<dyn PageSource>, config: TableConfig) -> Result<Self> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let columns = config
            .build_columns(None, control_handler(&events_tx))
            .context("invalid column configuration")?;
        let data = Arc::new(Vec::new());

        let store = TableStore::new(
            TableProps::new(columns.clone(), Arc::clone(&data)).selectable(config.selectable),
            callbacks(&events_tx),
        );

        let mut app = Self {
            running: true,
            show_help: false,
            detail_row: None,
            source,
            config,
            columns,
            data,
            pagination: None,
            selected_keys: Vec::new(),
            show_loading: true,
            store,
            events_tx,
            events_rx,
            cursor: Cursor::default(),
            hit_map: HitMap::new(),
            load_error: None,
            last_updated: None,
            theme: Theme::dark(),
            status_message: None,
        };
        app.request_page(1);
        app.sync_props();
        Ok(app)
    }

    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    fn current_page(&self) -> u32 {
        self.pagination.map(|p| p.current_page).unwrap_or(1)
    }

    fn request_page(&mut self, page: u32) {
        debug!(page, limit = self.config.page_limit, "requesting page");
        self.source.request(page, self.config.page_limit);
    }

    /// Hand the current caller state to the table.
    pub fn sync_props(&mut self) {
        if self.columns.is_empty() {
            if let Some(first) = self.data.first() {
                match self
                    .config
                    .build_columns(Some(first), control_handler(&self.events_tx))
                {
                    Ok(columns) => self.columns = columns,
                    Err(e) => self.load_error = Some(e.to_string()),
                }
            }
        }

        let mut props = TableProps::new(self.columns.clone(), Arc::clone(&self.data))
            .selectable(self.config.selectable)
            .selected_row_keys(self.selected_keys.clone())
            .show_loading(self.show_loading);
        if let Some(pagination) = self.pagination {
            props = props.pagination(pagination);
        }
        self.store.set_props(props);
    }

    /// Poll the source, apply any page that arrived and handle table events.
    ///
    /// Returns whether a new page was applied.
    pub fn tick(&mut self) -> bool {
        let page = self.source.poll();
        let error = self.source.error().map(str::to_string);
        if error.is_some() && error != self.load_error {
            warn!(source = self.source.description(), error = ?error, "source error");
        }
        self.load_error = error;
        let applied = match page {
            Some(page) => {
                self.apply_page(page);
                true
            }
            None => false,
        };
        self.drain_events();
        applied
    }

    fn apply_page(&mut self, page: Page) {
        info!(
            page = page.number,
            rows = page.rows.len(),
            total = page.total_count,
            "page arrived"
        );
        self.pagination = Some(Pagination::new(
            page.number,
            page.total_count,
            self.config.page_limit,
        ));
        self.data = Arc::new(page.rows);
        self.show_loading = false;
        self.last_updated = Some(Instant::now());
        self.cursor.row = self.cursor.row.min(self.data.len().saturating_sub(1));
        self.sync_props();
    }

    /// Handle every event the table raised since the last call.
    pub fn drain_events(&mut self) {
        let mut changed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                TableEvent::PageChange(page) => {
                    self.request_page(page);
                }
                TableEvent::SelectionChange(ids) => {
                    debug!(count = ids.len(), "selection changed");
                    self.selected_keys = ids;
                    changed = true;
                }
                TableEvent::RowClick(row) => {
                    self.detail_row = Some(row);
                }
                TableEvent::Control { label, row_id } => {
                    info!(%label, %row_id, "control activated");
                    self.set_status_message(format!("{}: {}", label, row_id));
                }
            }
        }
        if changed {
            self.sync_props();
        }
    }

    /// Re-request the current page with the loading prop raised.
    pub fn reload(&mut self) {
        self.show_loading = true;
        self.sync_props();
        let page = self.current_page();
        self.request_page(page);
    }

    /// Build this frame's view of the table.
    pub fn view(&self) -> Result<TableView, TableError> {
        self.store.view()
    }

    pub fn row_count(&self) -> usize {
        self.store.state().rows().len()
    }

    pub fn column_count(&self) -> usize {
        self.store.columns().len()
    }

    // Navigation

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count().saturating_sub(1);
        self.cursor.row = (self.cursor.row + n).min(max);
    }

    pub fn select_prev_n(&mut self, n: usize) {
        self.cursor.row = self.cursor.row.saturating_sub(n);
    }

    pub fn select_first(&mut self) {
        self.cursor.row = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor.row = self.row_count().saturating_sub(1);
    }

    pub fn column_next(&mut self) {
        let max = self.column_count().saturating_sub(1);
        self.cursor.column = (self.cursor.column + 1).min(max);
    }

    pub fn column_prev(&mut self) {
        self.cursor.column = self.cursor.column.saturating_sub(1);
    }

    // Table interactions

    /// Row click on the cursor row.
    pub fn click_cursor_row(&mut self) {
        self.store.click_row(self.cursor.row);
        self.drain_events();
    }

    pub fn toggle_cursor_row(&mut self) {
        self.store.toggle_row_at(self.cursor.row);
        self.drain_events();
    }

    pub fn click_head_checkbox(&mut self) {
        self.store.click_head_checkbox();
        self.drain_events();
    }

    /// Sort by the column under the column cursor.
    pub fn sort_cursor_column(&mut self) {
        let column = self.cursor.column;
        if !self.store.sort_by(column) {
            self.set_status_message("Column is not sortable".to_string());
        }
    }

    pub fn activate_cursor_control(&mut self) {
        self.store.activate_control(self.cursor.row);
        self.drain_events();
    }

    pub fn go_to_page(&mut self, page: u32) {
        self.store.request_page(page);
        self.drain_events();
    }

    pub fn navigate(&mut self, nav: PageNav) {
        self.store.navigate(nav);
        self.drain_events();
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.detail_row = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the selection state of the table to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let state = self.store.state();
        let head = match state.head() {
            HeadState::Unchecked => "unchecked",
            HeadState::Indeterminate => "indeterminate",
            HeadState::Checked => "checked",
        };
        let export = json!({
            "page": self.pagination.map(|p| p.current_page),
            "total_count": self.pagination.map(|p| p.total_count),
            "sort": {
                "column": state.sort_by_column(),
                "order": format!("{:?}", state.order_by()),
            },
            "head": head,
            "row_selected_count": state.row_selected_count(),
            "selected_row_ids": state.selected_row_ids().iter().collect::<Vec<_>>(),
            "displayed_row_ids": state.rows().iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        });

        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

fn callbacks(events: &mpsc::UnboundedSender<TableEvent>) -> TableCallbacks<JsonRow> {
    let pages = events.clone();
    let selection = events.clone();
    let clicks = events.clone();
    TableCallbacks::new()
        .on_page_change(move |page| {
            let _ = pages.send(TableEvent::PageChange(page));
        })
        .on_selection_change(move |ids: &[String]| {
            let _ = selection.send(TableEvent::SelectionChange(ids.to_vec()));
        })
        .on_row_click(move |row: &JsonRow| {
            let _ = clicks.send(TableEvent::RowClick(row.clone()));
        })
}

fn control_handler(events: &mpsc::UnboundedSender<TableEvent>) -> ControlHandler {
    let events = events.clone();
    Arc::new(move |label: &str, row_id: &str| {
        let _ = events.send(TableEvent::Control {
            label: label.to_string(),
            row_id: row_id.to_string(),
        });
    })
}
