//! Sort engine.
//!
//! Sorting produces a reordered copy of the rows; it never touches the
//! input slice. The sort is stable, so flipping the direction of the active
//! column reverses distinct keys while tied rows keep their relative order.

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::Value;

use super::model::{display_value, Column, Comparator, Row};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    /// The opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Order::Ascending => Order::Descending,
            Order::Descending => Order::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Order::Ascending => ordering,
            Order::Descending => ordering.reverse(),
        }
    }

    /// Header indicator for this direction.
    pub fn arrow(self) -> &'static str {
        match self {
            Order::Ascending => "↑",
            Order::Descending => "↓",
        }
    }
}

/// Compare two values as uppercased text.
pub fn default_compare(a: &Value, b: &Value) -> Ordering {
    display_value(a)
        .to_uppercase()
        .cmp(&display_value(b).to_uppercase())
}

/// Compare two values as numbers; values that don't parse sort after numbers.
pub fn numeric_compare(a: &Value, b: &Value) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => default_compare(a, b),
    }
}

/// Compare two values as case-sensitive text.
pub fn exact_compare(a: &Value, b: &Value) -> Ordering {
    display_value(a).cmp(&display_value(b))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Look up a built-in comparator by name (`text`, `numeric`, `exact`).
pub fn named_comparator(name: &str) -> Option<Comparator> {
    match name {
        "text" => Some(Arc::new(default_compare)),
        "numeric" => Some(Arc::new(numeric_compare)),
        "exact" => Some(Arc::new(exact_compare)),
        _ => None,
    }
}

/// Return a copy of `rows` ordered by `field`.
///
/// A custom comparator receives the two field values (absent fields are
/// passed as null) and its result is reversed for descending order.
pub fn sort_rows<R: Row>(
    rows: &[R],
    field: &str,
    order: Order,
    comparator: Option<&Comparator>,
) -> Vec<R> {
    let mut keyed: Vec<(Value, &R)> = rows
        .iter()
        .map(|row| (row.field(field).unwrap_or(Value::Null), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = match comparator {
            Some(compare) => compare(a, b),
            None => default_compare(a, b),
        };
        order.apply(ordering)
    });

    keyed.into_iter().map(|(_, row)| row.clone()).collect()
}

/// Direction that results from clicking a column's sort control.
///
/// Returns `None` for columns that are not sortable. Clicking the active
/// column flips its direction; any other column starts ascending.
pub fn next_sort<R>(active: &str, current: Order, column: &Column<R>) -> Option<Order> {
    if !column.sortable {
        return None;
    }
    if column.field_name == active {
        Some(current.flip())
    } else {
        Some(Order::Ascending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::model::JsonRow;

    fn rows(names: &[(&str, &str)]) -> Vec<JsonRow> {
        names
            .iter()
            .map(|(id, name)| JsonRow::new(*id).with("name", *name))
            .collect()
    }

    fn ids(rows: &[JsonRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_case_insensitive() {
        let input = rows(&[("1", "banana"), ("2", "Apple"), ("3", "cherry")]);
        let sorted = sort_rows(&input, "name", Order::Ascending, None);
        assert_eq!(ids(&sorted), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_descending_reverses_distinct_keys() {
        let input = rows(&[("1", "b"), ("2", "a"), ("3", "d"), ("4", "c")]);
        let asc = sort_rows(&input, "name", Order::Ascending, None);
        let desc = sort_rows(&asc, "name", Order::Descending, None);

        let mut reversed = ids(&asc);
        reversed.reverse();
        assert_eq!(ids(&desc), reversed);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let input = rows(&[("1", "x"), ("2", "a"), ("3", "X"), ("4", "x")]);
        let asc = sort_rows(&input, "name", Order::Ascending, None);
        assert_eq!(ids(&asc), vec!["2", "1", "3", "4"]);

        let desc = sort_rows(&asc, "name", Order::Descending, None);
        assert_eq!(ids(&desc), vec!["1", "3", "4", "2"]);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let input = rows(&[("1", "b"), ("2", "a")]);
        let _ = sort_rows(&input, "name", Order::Ascending, None);
        assert_eq!(ids(&input), vec!["1", "2"]);
    }

    #[test]
    fn test_custom_comparator_is_negated_for_descending() {
        let input: Vec<JsonRow> = [("1", 10), ("2", 9), ("3", 100)]
            .iter()
            .map(|(id, n)| JsonRow::new(*id).with("size", *n))
            .collect();
        let compare: Comparator = Arc::new(numeric_compare);

        let asc = sort_rows(&input, "size", Order::Ascending, Some(&compare));
        assert_eq!(ids(&asc), vec!["2", "1", "3"]);

        let desc = sort_rows(&input, "size", Order::Descending, Some(&compare));
        assert_eq!(ids(&desc), vec!["3", "1", "2"]);

        // Text ordering would put "100" before "9".
        let text = sort_rows(&input, "size", Order::Ascending, None);
        assert_eq!(ids(&text), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_missing_field_sorts_as_empty() {
        let input = vec![
            JsonRow::new("1").with("name", "b"),
            JsonRow::new("2"),
            JsonRow::new("3").with("name", "a"),
        ];
        let sorted = sort_rows(&input, "name", Order::Ascending, None);
        assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_numeric_compare_puts_text_last() {
        assert_eq!(
            numeric_compare(&Value::from("3"), &Value::from(20)),
            Ordering::Less
        );
        assert_eq!(
            numeric_compare(&Value::from("n/a"), &Value::from(1)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_named_comparators() {
        assert!(named_comparator("text").is_some());
        assert!(named_comparator("numeric").is_some());
        assert!(named_comparator("exact").is_some());
        assert!(named_comparator("fuzzy").is_none());
    }

    #[test]
    fn test_next_sort_toggle_rules() {
        let name: Column<JsonRow> = Column::new("name", "Name").sortable(true);
        let email: Column<JsonRow> = Column::new("email", "Email").sortable(true);
        let plain: Column<JsonRow> = Column::new("note", "Note");

        assert_eq!(next_sort("", Order::Ascending, &name), Some(Order::Ascending));
        assert_eq!(
            next_sort("name", Order::Ascending, &name),
            Some(Order::Descending)
        );
        assert_eq!(
            next_sort("name", Order::Descending, &name),
            Some(Order::Ascending)
        );
        assert_eq!(
            next_sort("name", Order::Descending, &email),
            Some(Order::Ascending)
        );
        assert_eq!(next_sort("name", Order::Ascending, &plain), None);
    }
}
