use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;
use crate::table::PageNav;
use crate::ui::HitTarget;

/// File written by the export key.
pub const EXPORT_PATH: &str = "gridline_selection.json";

/// Wait up to `timeout` for the next terminal event.
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Apply a key press. Open overlays take every key until they close.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.detail_row.is_some() {
        let closes = matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q')
        );
        if closes {
            app.close_overlay();
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // Row and column cursor
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.column_prev(),
        KeyCode::Right | KeyCode::Char('l') => app.column_next(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Table interactions
        KeyCode::Enter => app.click_cursor_row(),
        KeyCode::Char(' ') => app.toggle_cursor_row(),
        KeyCode::Char('a') => app.click_head_checkbox(),
        KeyCode::Char('s') => app.sort_cursor_column(),
        KeyCode::Char('e') => app.activate_cursor_control(),

        // Paging
        KeyCode::Char('n') | KeyCode::PageDown => app.navigate(PageNav::Next),
        KeyCode::Char('p') | KeyCode::PageUp => app.navigate(PageNav::Previous),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(page) = c.to_digit(10) {
                app.go_to_page(page);
            }
        }

        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('x') => export_selection(app),

        _ => {}
    }
}

/// Write the selection state to [`EXPORT_PATH`] and report the outcome.
fn export_selection(app: &mut App) {
    let path = Path::new(EXPORT_PATH);
    let message = match app.export_state(path) {
        Ok(()) => format!("Selection written to {}", path.display()),
        Err(e) => format!("Export failed: {:#}", e),
    };
    app.set_status_message(message);
}

/// Handle mouse events using the regions recorded by the last frame.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_help {
                app.show_help = false;
                return;
            }
            if app.detail_row.is_some() {
                app.close_overlay();
                return;
            }
            let Some(target) = app.hit_map.hit(mouse.column, mouse.row) else {
                return;
            };
            handle_click(app, target);
        }

        // Right-click closes overlays
        MouseEventKind::Down(MouseButton::Right) => {
            app.show_help = false;
            app.close_overlay();
        }

        _ => {}
    }
}

fn handle_click(app: &mut App, target: HitTarget) {
    match target {
        HitTarget::HeadCheckbox => app.click_head_checkbox(),
        HitTarget::Header(column) => {
            app.cursor.column = column;
            app.sort_cursor_column();
        }
        HitTarget::RowCheckbox(row) => {
            app.cursor.row = row;
            app.toggle_cursor_row();
        }
        HitTarget::Row(row) => {
            app.cursor.row = row;
            app.click_cursor_row();
        }
        HitTarget::Cell { row, column } => {
            app.cursor.row = row;
            app.cursor.column = column;
            app.store.click_cell(row, column);
            app.drain_events();
        }
        HitTarget::PageArrow(nav) => app.navigate(nav),
        HitTarget::Page(page) => app.go_to_page(page),
    }
}
