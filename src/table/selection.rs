//! Selection engine.
//!
//! Selection is tracked as a set of row ids. The header checkbox is never
//! stored on its own: it is derived from how many of the displayed rows are
//! selected.
//!
//! Counting is scoped to the displayed page. Ids selected on other pages stay
//! in the set but never contribute to the header state of this page.

use indexmap::IndexSet;

use super::model::Row;

/// Selected row ids, in the order they were selected.
pub type SelectedIds = IndexSet<String>;

/// Tri-state of the "select all" header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadState {
    #[default]
    Unchecked,
    Indeterminate,
    Checked,
}

/// What a click on the header checkbox does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadClick {
    SelectAll,
    DeselectAll,
}

impl HeadState {
    /// Derive the header state from the selected count on a page of `total` rows.
    pub fn derive(selected: usize, total: usize) -> Self {
        if selected == 0 {
            HeadState::Unchecked
        } else if selected >= total {
            HeadState::Checked
        } else {
            HeadState::Indeterminate
        }
    }

    pub fn is_checked(self) -> bool {
        self == HeadState::Checked
    }

    pub fn is_indeterminate(self) -> bool {
        self == HeadState::Indeterminate
    }

    /// Indeterminate resolves to select-all, never to deselect-all.
    pub fn click(self) -> HeadClick {
        match self {
            HeadState::Checked => HeadClick::DeselectAll,
            HeadState::Unchecked | HeadState::Indeterminate => HeadClick::SelectAll,
        }
    }

    /// Checkbox glyph.
    pub fn symbol(self) -> &'static str {
        match self {
            HeadState::Unchecked => "[ ]",
            HeadState::Indeterminate => "[-]",
            HeadState::Checked => "[x]",
        }
    }
}

/// Number of displayed rows whose id is selected.
pub fn count_on_page<R: Row>(selected: &SelectedIds, rows: &[R]) -> usize {
    rows.iter().filter(|row| selected.contains(row.id())).count()
}

/// Flip the selection of `id`. Returns whether it is selected afterwards.
pub fn toggle(selected: &mut SelectedIds, id: &str) -> bool {
    if selected.shift_remove(id) {
        false
    } else {
        selected.insert(id.to_owned());
        true
    }
}

/// Add every displayed row to the selection.
pub fn select_all<R: Row>(selected: &mut SelectedIds, rows: &[R]) {
    for row in rows {
        selected.insert(row.id().to_owned());
    }
}

/// Remove every displayed row from the selection, keeping other pages' ids.
pub fn deselect_all<R: Row>(selected: &mut SelectedIds, rows: &[R]) {
    for row in rows {
        selected.shift_remove(row.id());
    }
}

/// Replace the selection with caller-supplied keys and count them against `rows`.
pub fn reconcile<R: Row>(rows: &[R], keys: &[String]) -> (SelectedIds, usize) {
    let selected: SelectedIds = keys.iter().cloned().collect();
    let count = count_on_page(&selected, rows);
    (selected, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::model::JsonRow;

    fn page(ids: &[&str]) -> Vec<JsonRow> {
        ids.iter().map(|id| JsonRow::new(*id)).collect()
    }

    fn keys(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_derive_head_state() {
        assert_eq!(HeadState::derive(0, 0), HeadState::Unchecked);
        assert_eq!(HeadState::derive(0, 3), HeadState::Unchecked);
        assert_eq!(HeadState::derive(1, 3), HeadState::Indeterminate);
        assert_eq!(HeadState::derive(3, 3), HeadState::Checked);
    }

    #[test]
    fn test_checked_and_indeterminate_are_exclusive() {
        for state in [
            HeadState::Unchecked,
            HeadState::Indeterminate,
            HeadState::Checked,
        ] {
            assert!(!(state.is_checked() && state.is_indeterminate()));
        }
    }

    #[test]
    fn test_head_click_resolution() {
        assert_eq!(HeadState::Unchecked.click(), HeadClick::SelectAll);
        assert_eq!(HeadState::Indeterminate.click(), HeadClick::SelectAll);
        assert_eq!(HeadState::Checked.click(), HeadClick::DeselectAll);
    }

    #[test]
    fn test_toggle_inserts_then_removes() {
        let mut selected = SelectedIds::new();
        assert!(toggle(&mut selected, "a"));
        assert!(selected.contains("a"));
        assert!(!toggle(&mut selected, "a"));
        assert!(selected.is_empty());
    }

    #[test]
    fn test_deselect_all_keeps_other_pages() {
        let rows = page(&["1", "2"]);
        let mut selected: SelectedIds = keys(&["9", "1", "2"]).into_iter().collect();
        deselect_all(&mut selected, &rows);
        assert_eq!(selected.iter().collect::<Vec<_>>(), vec!["9"]);
    }

    #[test]
    fn test_select_all_unions_without_duplicates() {
        let rows = page(&["1", "2"]);
        let mut selected: SelectedIds = keys(&["2", "7"]).into_iter().collect();
        select_all(&mut selected, &rows);
        assert_eq!(selected.len(), 3);
        assert_eq!(count_on_page(&selected, &rows), 2);
    }

    #[test]
    fn test_reconcile_counts_only_displayed_rows() {
        let rows = page(&["1", "2"]);
        let (selected, count) = reconcile(&rows, &keys(&["1", "5"]));
        assert_eq!(selected.len(), 2);
        assert_eq!(count, 1);
    }
}
