//! Mouse hit-testing for the last rendered frame.

use ratatui::layout::{Position, Rect};

use crate::table::PageNav;

/// What sits under a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    HeadCheckbox,
    /// Header of the column with this index.
    Header(usize),
    /// Checkbox of the displayed row with this index.
    RowCheckbox(usize),
    /// Body of a row, outside any cell.
    Row(usize),
    Cell { row: usize, column: usize },
    PageArrow(PageNav),
    Page(u32),
}

/// Clickable regions recorded while rendering.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, area: Rect, target: HitTarget) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    /// Target at `(column, row)`; later regions win where they overlap.
    pub fn hit(&self, column: u16, row: u16) -> Option<HitTarget> {
        let position = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, target)| *target)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
