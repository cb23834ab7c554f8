//! Table rendering.
//!
//! Paints a [`TableView`] with a ratatui [`Table`] and records where each
//! checkbox, header and cell landed so mouse clicks can be routed back.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Rect},
    style::Style,
    text::Line,
    widgets::{
        Block, Borders, Cell as TuiCell, Clear, HighlightSpacing, Paragraph, Row as TuiRow, Table,
        TableState as TuiTableState,
    },
    Frame,
};

use super::{HitMap, HitTarget, Theme};
use crate::table::{Cell, ColumnView, Fixed, RowView, TableView};

const HIGHLIGHT_SYMBOL: &str = "▶ ";
const HIGHLIGHT_WIDTH: u16 = 2;
const CHECKBOX_WIDTH: u16 = 3;
const COLUMN_SPACING: u16 = 1;

/// Keyboard cursor position: a displayed row and a column index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub column: usize,
}

/// Columns to show in `width` cells, in display order.
///
/// Left-pinned columns come first and right-pinned columns last; both are
/// always shown. The rest scroll so the focused column stays visible.
pub fn visible_columns(columns: &[ColumnView], width: u16, focus: usize) -> Vec<usize> {
    let span = |i: usize| columns[i].width.saturating_add(COLUMN_SPACING);
    let pinned = |edge: Fixed| -> Vec<usize> {
        (0..columns.len())
            .filter(|&i| columns[i].fixed == Some(edge))
            .collect()
    };
    let left = pinned(Fixed::Left);
    let right = pinned(Fixed::Right);
    let middle: Vec<usize> = (0..columns.len())
        .filter(|&i| columns[i].fixed.is_none())
        .collect();

    let total = |ids: &[usize]| ids.iter().fold(0u16, |acc, &i| acc.saturating_add(span(i)));
    let used = total(&left).saturating_add(total(&right));
    let remaining = width.saturating_sub(used);

    let mut start = 0;
    if let Some(focus_at) = middle.iter().position(|&i| i == focus) {
        let fits = |from: usize| -> bool { total(&middle[from..=focus_at]) <= remaining };
        while start < focus_at && !fits(start) {
            start += 1;
        }
    }

    let mut shown = left;
    let mut budget = remaining;
    for &i in &middle[start..] {
        if span(i) > budget {
            break;
        }
        budget -= span(i);
        shown.push(i);
    }
    shown.extend(right);
    shown
}

/// Render the table into `area` and record its clickable regions.
pub fn render(
    frame: &mut Frame,
    view: &TableView,
    cursor: Cursor,
    theme: &Theme,
    title: &str,
    area: Rect,
    hits: &mut HitMap,
) {
    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));
    if view.loading {
        block = block.title(Line::from(" loading… ").right_aligned());
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width <= HIGHLIGHT_WIDTH {
        return;
    }

    let selectable = view.head_checkbox.is_some();
    let checkbox_span = if selectable {
        CHECKBOX_WIDTH + COLUMN_SPACING
    } else {
        0
    };
    let columns_width = inner.width.saturating_sub(HIGHLIGHT_WIDTH + checkbox_span);
    let shown = visible_columns(&view.columns, columns_width, cursor.column);

    let mut widths = Vec::with_capacity(shown.len() + 1);
    if selectable {
        widths.push(Constraint::Length(CHECKBOX_WIDTH));
    }
    widths.extend(shown.iter().map(|&i| Constraint::Length(view.columns[i].width)));

    let mut header_cells = Vec::with_capacity(widths.len());
    if let Some(head) = view.head_checkbox {
        header_cells.push(TuiCell::from(head.symbol()));
    }
    for &i in &shown {
        let column = &view.columns[i];
        let text = match column.sorted {
            Some(order) => format!("{} {}", column.title, order.arrow()),
            None => column.title.clone(),
        };
        let style = if i == cursor.column {
            theme.header_focus
        } else {
            theme.header
        };
        header_cells.push(TuiCell::from(text).style(style));
    }
    let header = TuiRow::new(header_cells).height(1).style(theme.header);

    // Mirror the table's column layout for hit-testing.
    let checkbox_x = inner.x + HIGHLIGHT_WIDTH;
    let mut x = checkbox_x + checkbox_span;
    let mut column_spans = Vec::with_capacity(shown.len());
    for &i in &shown {
        let width = view.columns[i].width.min(inner.right().saturating_sub(x));
        column_spans.push((i, x, width));
        x = x.saturating_add(view.columns[i].width.saturating_add(COLUMN_SPACING));
    }
    if selectable {
        hits.push(
            Rect::new(checkbox_x, inner.y, CHECKBOX_WIDTH, 1),
            HitTarget::HeadCheckbox,
        );
    }
    for &(i, x, width) in &column_spans {
        hits.push(Rect::new(x, inner.y, width, 1), HitTarget::Header(i));
    }

    let body = Rect {
        y: inner.y + 1,
        height: inner.height - 1,
        ..inner
    };
    let table = Table::default()
        .widths(widths)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .flex(Flex::Start)
        .highlight_spacing(HighlightSpacing::Always)
        .highlight_symbol(HIGHLIGHT_SYMBOL)
        .row_highlight_style(theme.cursor);

    if view.is_empty() {
        frame.render_widget(table, inner);
        let message = if view.loading {
            "Loading…"
        } else {
            "No records"
        };
        let line = Rect {
            y: body.y + body.height / 2,
            height: 1,
            ..body
        };
        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(theme.disabled),
            line,
        );
        return;
    }

    let visible = body.height as usize;
    let selected = cursor.row.min(view.rows.len() - 1);
    let offset = selected.saturating_sub(visible.saturating_sub(1));

    let rows: Vec<TuiRow> = view
        .rows
        .iter()
        .map(|row| table_row(row, &shown, theme))
        .collect();

    for (slot, row) in view.rows.iter().skip(offset).take(visible).enumerate() {
        let y = body.y + slot as u16;
        hits.push(Rect::new(inner.x, y, inner.width, 1), HitTarget::Row(row.index));
        if selectable {
            hits.push(
                Rect::new(checkbox_x, y, CHECKBOX_WIDTH, 1),
                HitTarget::RowCheckbox(row.index),
            );
        }
        for &(i, x, width) in &column_spans {
            hits.push(
                Rect::new(x, y, width, 1),
                HitTarget::Cell {
                    row: row.index,
                    column: i,
                },
            );
        }
    }

    let mut state = TuiTableState::default()
        .with_offset(offset)
        .with_selected(Some(selected));
    frame.render_stateful_widget(table.rows(rows), inner, &mut state);

    if view.loading {
        render_loading_overlay(frame, theme, body);
    }
}

fn table_row<'a>(row: &'a RowView, shown: &[usize], theme: &Theme) -> TuiRow<'a> {
    let mut cells = Vec::with_capacity(shown.len() + 1);
    if let Some(selected) = row.selected {
        cells.push(TuiCell::from(if selected { "[x]" } else { "[ ]" }));
    }
    cells.extend(shown.iter().map(|&i| table_cell(&row.cells[i], theme)));

    let style = if row.selected == Some(true) {
        theme.checked
    } else {
        Style::default()
    };
    TuiRow::new(cells).style(style)
}

fn table_cell<'a>(cell: &'a Cell, theme: &Theme) -> TuiCell<'a> {
    let alignment = match cell.props.get("align").map(String::as_str) {
        Some("right") => Alignment::Right,
        Some("center") => Alignment::Center,
        _ => Alignment::Left,
    };
    let style = if cell.control.is_some() {
        theme.control
    } else {
        theme.cell_style(cell.props.get("fg").map(String::as_str))
    };
    TuiCell::from(Line::from(cell.value.as_str()).alignment(alignment)).style(style)
}

fn render_loading_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let width = 14u16.min(area.width);
    let height = 3u16.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    let overlay = Rect::new(x, y, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight));
    frame.render_widget(Clear, overlay);
    frame.render_widget(
        Paragraph::new("Loading…")
            .alignment(Alignment::Center)
            .block(block),
        overlay,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, JsonRow, TableCallbacks, TableProps, TableStore};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn store(selected: Vec<String>) -> TableStore<JsonRow> {
        let columns = vec![
            Column::new("name", "Name").width(10).sortable(true),
            Column::new("email", "Email").width(14).sortable(true),
        ];
        let data = Arc::new(vec![
            JsonRow::new("1").with("name", "a").with("email", "a@a.a"),
            JsonRow::new("2").with("name", "b").with("email", "b@b.b"),
        ]);
        TableStore::new(
            TableProps::new(columns, data)
                .selectable(true)
                .selected_row_keys(selected),
            TableCallbacks::new(),
        )
    }

    fn draw(view: &TableView) -> (String, HitMap) {
        let mut terminal = Terminal::new(TestBackend::new(50, 8)).unwrap();
        let mut hits = HitMap::new();
        terminal
            .draw(|frame| {
                render(
                    frame,
                    view,
                    Cursor::default(),
                    &Theme::dark(),
                    " Records ",
                    frame.area(),
                    &mut hits,
                )
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        (text, hits)
    }

    #[test]
    fn test_renders_header_rows_and_checkboxes() {
        let view = store(vec!["2".into()]).view().unwrap();
        let (text, _) = draw(&view);
        assert!(text.contains("[-]"));
        assert!(text.contains("Name"));
        assert!(text.contains("a@a.a"));
        assert!(text.contains("[x]"));
        assert!(text.contains("▶"));
    }

    #[test]
    fn test_sort_arrow_in_header() {
        let mut store = store(vec![]);
        store.sort_by(0);
        store.sort_by(0);
        let (text, _) = draw(&store.view().unwrap());
        assert!(text.contains("Name ↓"));
    }

    #[test]
    fn test_hit_regions() {
        let view = store(vec![]).view().unwrap();
        let (_, hits) = draw(&view);

        // Border (1) + highlight column (2) puts the checkboxes at x = 3.
        assert_eq!(hits.hit(3, 1), Some(HitTarget::HeadCheckbox));
        assert_eq!(hits.hit(7, 1), Some(HitTarget::Header(0)));
        assert_eq!(hits.hit(18, 1), Some(HitTarget::Header(1)));
        assert_eq!(hits.hit(4, 2), Some(HitTarget::RowCheckbox(0)));
        assert_eq!(hits.hit(8, 3), Some(HitTarget::Cell { row: 1, column: 0 }));
        assert_eq!(hits.hit(1, 2), Some(HitTarget::Row(0)));
        assert_eq!(hits.hit(8, 5), None);
    }

    #[test]
    fn test_empty_state_marker() {
        let store = TableStore::new(
            TableProps::new(vec![Column::<JsonRow>::new("name", "Name")], Arc::new(vec![])),
            TableCallbacks::new(),
        );
        let (text, hits) = draw(&store.view().unwrap());
        assert!(text.contains("No records"));
        assert!(hits.hit(8, 3).is_none());
    }

    #[test]
    fn test_loading_overlay() {
        let mut store = store(vec![]);
        store.dispatch(crate::table::Action::SetLoading(true));
        let (text, _) = draw(&store.view().unwrap());
        assert!(text.contains("loading…"));
        assert!(text.contains("Loading…"));
    }

    fn column(field: &str, fixed: Option<Fixed>) -> ColumnView {
        ColumnView {
            field_name: field.into(),
            title: field.into(),
            width: 10,
            fixed,
            sortable: false,
            sorted: None,
        }
    }

    #[test]
    fn test_visible_columns_scroll_to_focus() {
        let columns: Vec<ColumnView> = ["a", "b", "c", "d"]
            .iter()
            .map(|f| column(f, None))
            .collect();
        assert_eq!(visible_columns(&columns, 25, 0), vec![0, 1]);
        assert_eq!(visible_columns(&columns, 25, 3), vec![2, 3]);
        assert_eq!(visible_columns(&columns, 100, 3), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_visible_columns_keep_pinned() {
        let columns = vec![
            column("a", Some(Fixed::Left)),
            column("b", None),
            column("c", None),
            column("d", Some(Fixed::Right)),
        ];
        assert_eq!(visible_columns(&columns, 35, 2), vec![0, 2, 3]);
        assert_eq!(visible_columns(&columns, 35, 1), vec![0, 1, 3]);
    }

    #[test]
    fn test_visible_columns_with_oversized_pinned_widths() {
        let mut left = column("a", Some(Fixed::Left));
        left.width = 40_000;
        let mut right = column("d", Some(Fixed::Right));
        right.width = 40_000;
        let columns = vec![left, column("b", None), column("c", None), right];
        assert_eq!(visible_columns(&columns, 80, 0), vec![0, 3]);
        assert_eq!(visible_columns(&columns, 80, 1), vec![0, 3]);
        assert_eq!(visible_columns(&columns, u16::MAX, 2), vec![0, 3]);
    }

    #[test]
    fn test_renders_oversized_pinned_columns() {
        let columns = vec![
            Column::new("name", "Name").width(40_000).fixed(Fixed::Left),
            Column::new("email", "Email"),
            Column::new("id", "Id").width(u16::MAX).fixed(Fixed::Right),
        ];
        let data = Arc::new(vec![JsonRow::new("1").with("name", "a").with("email", "a@a.a")]);
        let store = TableStore::new(
            TableProps::new(columns, data).selectable(true),
            TableCallbacks::new(),
        );
        let (text, hits) = draw(&store.view().unwrap());
        assert!(text.contains("Records"));
        assert_eq!(hits.hit(7, 1), Some(HitTarget::Header(0)));
        assert_eq!(hits.hit(48, 1), Some(HitTarget::Header(0)));
        assert_eq!(hits.hit(4, 2), Some(HitTarget::RowCheckbox(0)));
    }
}
