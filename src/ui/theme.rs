//! Colors and styles, in a dark and a light variant.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Styles shared by every part of the table screen.
///
/// [`Theme::auto_detect`] picks a variant from the terminal background.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent for overlays, counters and status messages.
    pub highlight: Color,
    pub error: Color,
    pub border: Color,
    pub header: Style,
    /// Style for the header cell under the column cursor.
    pub header_focus: Style,
    /// Style for the row under the cursor.
    pub cursor: Style,
    /// Style for rows whose checkbox is ticked.
    pub checked: Style,
    /// Style for embedded cell controls.
    pub control: Style,
    /// Style for disabled page arrows.
    pub disabled: Style,
    /// Style for the current page marker.
    pub current_page: Style,
    pub border_type: BorderType,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            error: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            header_focus: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            cursor: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            checked: Style::default().fg(Color::Green),
            control: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            disabled: Style::default().add_modifier(Modifier::DIM),
            current_page: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            error: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            header_focus: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            cursor: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            checked: Style::default().fg(Color::Green),
            control: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            disabled: Style::default().add_modifier(Modifier::DIM),
            current_page: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Light variant on a bright terminal background, dark otherwise
    /// (including when the background can't be queried).
    pub fn auto_detect() -> Self {
        let bright = terminal_light::luma().is_ok_and(|luma| luma > 0.5);
        if bright {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Style for a cell's `fg` color hint, if it names a known color.
    pub fn cell_style(&self, fg: Option<&str>) -> Style {
        match fg.and_then(|name| name.parse::<Color>().ok()) {
            Some(color) => Style::default().fg(color),
            None => Style::default(),
        }
    }
}
