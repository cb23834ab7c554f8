//! Terminal rendering.

pub mod common;
pub mod detail;
mod hit;
pub mod pagination;
pub mod table;
mod theme;

pub use hit::{HitMap, HitTarget};
pub use table::Cursor;
pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::table::TableView;

/// Minimum terminal size for a usable display.
pub const MIN_WIDTH: u16 = 50;
pub const MIN_HEIGHT: u16 = 10;

/// Draw one full frame and return the clickable regions it produced.
pub fn render(frame: &mut Frame, app: &App, view: &TableView) -> HitMap {
    let mut hits = HitMap::new();
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(
            0,
            area.height.saturating_sub(5) / 2,
            area.width,
            5.min(area.height),
        );
        frame.render_widget(paragraph, centered);
        return hits;
    }

    let pager_height = u16::from(view.pagination.is_some());
    let chunks = Layout::vertical([
        Constraint::Length(1),            // Header bar
        Constraint::Min(4),               // Table
        Constraint::Length(pager_height), // Page controls
        Constraint::Length(1),            // Status bar
    ])
    .split(area);

    common::render_header(frame, app, view, chunks[0]);
    table::render(
        frame,
        view,
        app.cursor,
        &app.theme,
        " Records ",
        chunks[1],
        &mut hits,
    );
    if let Some(controls) = &view.pagination {
        pagination::render(frame, controls, &app.theme, chunks[2], &mut hits);
    }
    common::render_status_bar(frame, app, chunks[3]);

    if let Some(row) = &app.detail_row {
        detail::render_overlay(frame, app, row, area);
    }
    if app.show_help {
        common::render_help(frame, app, area);
    }

    hits
}
