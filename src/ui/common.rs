//! Header bar, status bar and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::table::TableView;

/// Render the header bar: source, page position and selection summary.
pub fn render_header(frame: &mut Frame, app: &App, view: &TableView, area: Rect) {
    let state = app.store.state();

    let mut spans = vec![
        Span::styled(" GRIDLINE ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(app.source_description().to_string()),
    ];

    if let Some(pagination) = app.pagination {
        spans.push(Span::raw(" │ page "));
        spans.push(Span::styled(
            pagination.current_page.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("/{}", pagination.page_count())));
    }

    if view.head_checkbox.is_some() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{}", state.row_selected_count()),
            Style::default().fg(app.theme.highlight),
        ));
        spans.push(Span::raw(format!(
            " of {} on page, {} selected",
            view.rows.len(),
            state.selected_row_ids().len()
        )));
    }

    if !state.sort_by_column().is_empty() {
        spans.push(Span::raw(format!(
            " │ sort {} {}",
            state.sort_by_column(),
            state.order_by().arrow()
        )));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key hints shown when nothing more urgent is on the status line.
const HINTS: &str = "space:toggle a:all s:sort n/p:page Enter:open ?:help q:quit";

/// One-line status: a fresh message, else the source error, else key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let Some(message) = app.get_status_message() {
        (format!(" {message}"), Style::default().fg(app.theme.highlight))
    } else if let Some(error) = &app.load_error {
        (
            format!(" Error: {error} | r:retry q:quit"),
            Style::default().fg(app.theme.error),
        )
    } else {
        let freshness = app.last_updated.map_or_else(
            || "Loading...".to_string(),
            |at| format!("Updated {:.1}s ago", at.elapsed().as_secs_f64()),
        );
        (
            format!(" {freshness} | {HINTS}"),
            Style::default().add_modifier(Modifier::DIM),
        )
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

const KEYS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("↑/↓ j/k", "Move row cursor"),
            ("←/→ h/l", "Move column cursor"),
            ("Home/End", "First/last row"),
            ("Enter", "Open row"),
            ("Esc", "Close overlay"),
        ],
    ),
    (
        "Table",
        &[
            ("Space", "Toggle row"),
            ("a", "Select/deselect page"),
            ("s", "Sort by column"),
            ("e", "Row control"),
            ("n/p", "Next/previous page"),
            ("1-9", "Jump to page"),
        ],
    ),
    (
        "General",
        &[("r", "Reload page"), ("x", "Export selection"), ("q", "Quit")],
    ),
];

/// Centered key reference; any key closes it.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::styled("Keys", app.theme.header)];
    for (section, keys) in KEYS {
        lines.push(Line::default());
        lines.push(Line::styled(format!(" {section}"), bold));
        lines.extend(
            keys.iter()
                .map(|(key, action)| Line::from(format!("  {key:<10}  {action}"))),
        );
    }
    lines.push(Line::default());
    lines.push(Line::styled(
        "any key closes",
        Style::default().add_modifier(Modifier::DIM),
    ));

    let width = 40u16.min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
