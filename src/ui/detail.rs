//! Row detail overlay.
//!
//! Shows every field of the clicked row, including fields no column displays.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Row, Table},
    Frame,
};

use crate::app::App;
use crate::table::{display_value, JsonRow};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 40;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 6;

/// Field/value pairs shown for `row`, id first.
pub fn detail_lines(row: &JsonRow) -> Vec<(String, String)> {
    std::iter::once(("id".to_string(), row.id.clone()))
        .chain(
            row.fields
                .iter()
                .map(|(name, value)| (name.clone(), display_value(value))),
        )
        .collect()
}

/// Render the row detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, row: &JsonRow, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let lines = detail_lines(row);
    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (lines.len() as u16 + 3).clamp(MIN_OVERLAY_HEIGHT, area.height);
    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let name_width = lines
        .iter()
        .map(|(name, _)| name.chars().count() as u16)
        .max()
        .unwrap_or(0)
        .max(5);
    let rows: Vec<Row> = lines
        .into_iter()
        .map(|(name, value)| {
            Row::new(vec![
                Cell::from(name).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(value),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Row {} ", row.id))
        .title_bottom(" Esc:close ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let table = Table::new(rows, [Constraint::Length(name_width), Constraint::Fill(1)])
        .header(Row::new(vec!["Field", "Value"]).style(app.theme.header))
        .column_spacing(2)
        .block(block);
    frame.render_widget(table, overlay_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_lines_start_with_id() {
        let row = JsonRow::new("7")
            .with("name", "Ada")
            .with("note", serde_json::Value::Null);
        let lines = detail_lines(&row);
        assert_eq!(lines[0], ("id".to_string(), "7".to_string()));
        assert!(lines.contains(&("name".to_string(), "Ada".to_string())));
        assert!(lines.contains(&("note".to_string(), String::new())));
    }
}
