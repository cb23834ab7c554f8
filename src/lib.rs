//! # gridline
//!
//! A stateful table widget for terminal UIs, with row selection, column
//! sorting and caller-driven pagination.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Caller (app)                        │
//! │   source ──▶ data, pagination, selected keys, show_loading   │
//! │                              │ props                         │
//! │                              ▼                               │
//! │  ┌────────────────────── table ───────────────────────┐      │
//! │  │ TableStore ──▶ reduce(state, action) ──▶ TableView │──▶ ui│
//! │  └───────────────────────┬────────────────────────────┘      │
//! │                          │ callbacks                         │
//! │                          ▼                                   │
//! │        on_page_change / on_selection_change / on_row_click   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`table`]**: the widget core. Row and column contracts, the sort and
//!   selection engines, the pagination bridge, the state transition function
//!   and the [`TableStore`] that ties them to caller props and callbacks
//! - **[`source`]**: page sources a caller can fetch from ([`PageSource`])
//! - **[`config`]**: table configuration and column building
//! - **[`ui`]**: ratatui rendering of a [`TableView`], with mouse hit-testing
//! - **[`app`]** / **[`events`]**: the demo caller behind the `gridline` binary
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use gridline::{Column, JsonRow, Pagination, TableCallbacks, TableProps, TableStore};
//!
//! let columns = vec![
//!     Column::new("name", "Name").sortable(true),
//!     Column::new("email", "Email"),
//! ];
//! let data = Arc::new(vec![
//!     JsonRow::new("1").with("name", "Ada").with("email", "ada@example.com"),
//!     JsonRow::new("2").with("name", "Brian").with("email", "brian@example.com"),
//! ]);
//!
//! let props = TableProps::new(columns, data)
//!     .selectable(true)
//!     .pagination(Pagination::new(1, 20, 2));
//! let callbacks = TableCallbacks::new()
//!     .on_page_change(|page| println!("fetch page {page}"))
//!     .on_selection_change(|ids: &[String]| println!("{} selected", ids.len()));
//!
//! let mut table = TableStore::new(props, callbacks);
//! table.toggle_row("2");
//! table.sort_by(0);
//! assert!(table.request_page(2));
//!
//! let view = table.view().unwrap();
//! assert_eq!(view.rows.len(), 2);
//! ```

pub mod app;
pub mod config;
pub mod events;
pub mod source;
pub mod table;
pub mod ui;

pub use app::{App, TableEvent};
pub use config::{ColumnConfig, TableConfig};
pub use source::{ChannelSource, Dataset, FileSource, Page, PageRequest, PageSource};
pub use table::{
    Action, Cell, Column, HeadState, JsonRow, Order, PageControls, PageNav, Pagination, Row,
    TableCallbacks, TableError, TableProps, TableState, TableStore, TableView,
};
