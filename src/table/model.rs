//! Row, column and cell contracts.
//!
//! These types carry no behaviour of their own. The sort engine, the
//! selection engine and the view builder all read them, and callers build
//! them to describe what the table shows.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A displayable record with a mandatory identifier.
///
/// `id` must be unique within a page. Any other field is looked up by name;
/// `None` means the field is absent from this row (as opposed to present
/// with a null value).
pub trait Row: Clone {
    /// Identifier used for selection bookkeeping.
    fn id(&self) -> &str;

    /// Value of the named field, if the row has one.
    fn field(&self, name: &str) -> Option<Value>;
}

/// Three-way comparison over two field values.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Produces the cell for a row at a given display index.
pub type Renderer<R> = Arc<dyn Fn(&R, usize) -> Cell + Send + Sync>;

/// Edge a column is pinned to while scrolling horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fixed {
    Left,
    Right,
}

/// Column definition.
pub struct Column<R> {
    /// Row field shown (and sorted on) by this column.
    pub field_name: String,
    /// Header text.
    pub title: String,
    /// Preferred width in terminal cells.
    pub width: u16,
    /// Pinned edge; affects layout only.
    pub fixed: Option<Fixed>,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Custom comparator; the default text comparator is used when absent.
    pub sort_func: Option<Comparator>,
    /// Custom cell renderer; the field's text is shown when absent.
    pub render: Option<Renderer<R>>,
}

impl<R> Column<R> {
    /// Create a plain text column for `field_name`.
    pub fn new(field_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            title: title.into(),
            width: 12,
            fixed: None,
            sortable: false,
            sort_func: None,
            render: None,
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn fixed(mut self, fixed: Fixed) -> Self {
        self.fixed = Some(fixed);
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Use a custom comparator. Does not by itself make the column sortable.
    pub fn sort_func<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        self.sort_func = Some(Arc::new(f));
        self
    }

    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&R, usize) -> Cell + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(f));
        self
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            field_name: self.field_name.clone(),
            title: self.title.clone(),
            width: self.width,
            fixed: self.fixed,
            sortable: self.sortable,
            sort_func: self.sort_func.clone(),
            render: self.render.clone(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field_name", &self.field_name)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("fixed", &self.fixed)
            .field("sortable", &self.sortable)
            .field("sort_func", &self.sort_func.is_some())
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// An interactive control embedded in a cell, such as an "edit" link.
///
/// Activating it must not count as a click on the surrounding row.
#[derive(Clone)]
pub struct CellControl {
    pub label: String,
    pub on_activate: Arc<dyn Fn() + Send + Sync>,
}

impl fmt::Debug for CellControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellControl").field("label", &self.label).finish()
    }
}

/// Render-time cell contents.
///
/// `props` are presentation hints interpreted by the renderer
/// (`align` = `left|center|right`, `fg` = a color name).
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub value: String,
    pub props: BTreeMap<String, String>,
    pub control: Option<CellControl>,
}

impl Cell {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// A cell holding a single activatable control.
    pub fn control<F>(label: impl Into<String>, on_activate: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let label = label.into();
        Self {
            value: format!("[{}]", label),
            props: BTreeMap::new(),
            control: Some(CellControl {
                label,
                on_activate: Arc::new(on_activate),
            }),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// Text form of a field value as shown in a plain cell.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A row backed by a JSON object.
///
/// The `id` may be given as a string or a number in the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRow {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl JsonRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

impl Row for JsonRow {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<Value> {
        if name == "id" {
            return Some(Value::String(self.id.clone()));
        }
        self.fields.get(name).cloned()
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "row id must be a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_row_accepts_numeric_id() {
        let row: JsonRow = serde_json::from_str(r#"{"id": 7, "name": "a"}"#).unwrap();
        assert_eq!(row.id(), "7");
        assert_eq!(row.field("name"), Some(Value::from("a")));
        assert_eq!(row.field("id"), Some(Value::from("7")));
        assert_eq!(row.field("missing"), None);
    }

    #[test]
    fn test_json_row_rejects_object_id() {
        let result: Result<JsonRow, _> = serde_json::from_str(r#"{"id": {"x": 1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_field_is_present() {
        let row = JsonRow::new("1").with("note", Value::Null);
        assert_eq!(row.field("note"), Some(Value::Null));
        assert_eq!(display_value(&Value::Null), "");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&Value::from("x")), "x");
        assert_eq!(display_value(&Value::from(12)), "12");
        assert_eq!(display_value(&Value::from(true)), "true");
    }

    #[test]
    fn test_control_cell_label() {
        let cell = Cell::control("edit", || {});
        assert_eq!(cell.value, "[edit]");
        assert_eq!(cell.control.unwrap().label, "edit");
    }
}
