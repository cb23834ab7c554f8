//! Page control rendering.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{HitMap, HitTarget, Theme};
use crate::table::{PageControls, PageNav};

/// Most page numbers shown at once; the window follows the current page.
const MAX_MARKERS: u32 = 9;

/// Render `‹ 1 2 [3] 4 ›  Showing A to B of N records` on one line.
pub fn render(
    frame: &mut Frame,
    controls: &PageControls,
    theme: &Theme,
    area: Rect,
    hits: &mut HitMap,
) {
    let mut spans = Vec::new();
    let mut x = area.x;
    let mut place = |text: String,
                     style: Style,
                     target: Option<HitTarget>,
                     spans: &mut Vec<Span<'static>>| {
        let width = text.chars().count() as u16;
        if let Some(target) = target {
            let clipped = width.min(area.right().saturating_sub(x));
            hits.push(Rect::new(x, area.y, clipped, 1), target);
        }
        x = x.saturating_add(width);
        spans.push(Span::styled(text, style));
    };

    let arrow = |disabled: bool, nav: PageNav| {
        if disabled {
            (theme.disabled, None)
        } else {
            (Style::default(), Some(HitTarget::PageArrow(nav)))
        }
    };

    let (style, target) = arrow(controls.left_disabled, PageNav::Previous);
    place(" ‹ ".to_string(), style, target, &mut spans);

    let window = controls.window(MAX_MARKERS);
    if window.first().is_some_and(|p| p.number > 1) {
        place("… ".to_string(), theme.disabled, None, &mut spans);
    }
    for marker in &window {
        let style = if marker.current {
            theme.current_page
        } else {
            Style::default()
        };
        place(
            format!(" {} ", marker.number),
            style,
            Some(HitTarget::Page(marker.number)),
            &mut spans,
        );
    }
    if window.last().is_some_and(|p| p.number < controls.page_count) {
        place(" …".to_string(), theme.disabled, None, &mut spans);
    }

    let (style, target) = arrow(controls.right_disabled, PageNav::Next);
    place(" › ".to_string(), style, target, &mut spans);
    place(format!("  {}", controls.info), theme.disabled, None, &mut spans);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Pagination;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(controls: &PageControls) -> (String, HitMap) {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        let mut hits = HitMap::new();
        terminal
            .draw(|frame| render(frame, controls, &Theme::dark(), frame.area(), &mut hits))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text = (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol())
            .collect::<String>();
        (text, hits)
    }

    #[test]
    fn test_renders_markers_and_info() {
        let controls = PageControls::from_pagination(&Pagination::new(2, 50, 10)).unwrap();
        let (text, hits) = draw(&controls);
        assert!(text.contains(" 1  2  3  4  5 "));
        assert!(text.contains("Showing 11 to 20 of 50 records"));

        // " ‹ " occupies 0..3, then each marker is three cells wide.
        assert_eq!(hits.hit(1, 0), Some(HitTarget::PageArrow(PageNav::Previous)));
        assert_eq!(hits.hit(4, 0), Some(HitTarget::Page(1)));
        assert_eq!(hits.hit(7, 0), Some(HitTarget::Page(2)));
        assert_eq!(hits.hit(19, 0), Some(HitTarget::PageArrow(PageNav::Next)));
    }

    #[test]
    fn test_disabled_arrow_is_not_clickable() {
        let controls = PageControls::from_pagination(&Pagination::new(1, 20, 10)).unwrap();
        let (_, hits) = draw(&controls);
        assert_eq!(hits.hit(1, 0), None);
        assert_eq!(hits.hit(10, 0), Some(HitTarget::PageArrow(PageNav::Next)));
    }

    #[test]
    fn test_ellipses_around_window() {
        let controls = PageControls::from_pagination(&Pagination::new(15, 200, 10)).unwrap();
        let (text, hits) = draw(&controls);
        assert!(text.starts_with(" ‹ …  11 "));
        assert!(text.contains(" 19  …"));
        // " ‹ " then "… " puts the first marker at x = 5.
        assert_eq!(hits.hit(6, 0), Some(HitTarget::Page(11)));
    }
}
