//! Table configuration.
//!
//! Loaded from an optional TOML file plus `GRIDLINE_*` environment
//! overrides, then turned into column definitions for [`JsonRow`] tables.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::table::{display_value, named_comparator, Cell, Column, Fixed, JsonRow, Row, TableError};

/// Invoked with `(control label, row id)` when an embedded control is activated.
pub type ControlHandler = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Show row checkboxes and the header checkbox.
    pub selectable: bool,
    /// Rows per page.
    pub page_limit: u32,
    /// Simulated latency of the built-in page server, in milliseconds.
    pub latency_ms: u64,
    /// Column definitions; inferred from the data when empty.
    pub columns: Vec<ColumnConfig>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            selectable: true,
            page_limit: 10,
            latency_ms: 300,
            columns: Vec::new(),
        }
    }
}

/// One configured column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub field: String,
    pub title: Option<String>,
    pub width: Option<u16>,
    pub fixed: Option<Fixed>,
    pub sortable: bool,
    /// Built-in comparator name: `text`, `numeric` or `exact`.
    pub comparator: Option<String>,
    /// Cell text with `{field}` placeholders filled from the row.
    pub template: Option<String>,
    /// Replacement text keyed by the field's display value.
    pub labels: BTreeMap<String, String>,
    /// `left`, `center` or `right`.
    pub align: Option<String>,
    /// Label of an embedded control; the column shows a button instead of data.
    pub control: Option<String>,
}

impl TableConfig {
    /// Load configuration from `path` (if any) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix("GRIDLINE").try_parsing(true))
            .build()
            .context("failed to load configuration")?;
        config
            .try_deserialize()
            .context("invalid table configuration")
    }

    /// Build the table columns.
    ///
    /// When no columns are configured they are inferred from `sample`.
    pub fn build_columns(
        &self,
        sample: Option<&JsonRow>,
        on_control: ControlHandler,
    ) -> Result<Vec<Column<JsonRow>>, TableError> {
        if self.columns.is_empty() {
            return Ok(sample.map(infer_columns).unwrap_or_default());
        }
        self.columns
            .iter()
            .map(|column| column.build(Arc::clone(&on_control)))
            .collect()
    }
}

impl ColumnConfig {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    fn invalid(&self, reason: &str) -> TableError {
        TableError::InvalidColumn {
            column: self.field.clone(),
            reason: reason.to_string(),
        }
    }

    /// Turn this entry into a column definition.
    pub fn build(&self, on_control: ControlHandler) -> Result<Column<JsonRow>, TableError> {
        if self.field.is_empty() {
            return Err(self.invalid("field name is empty"));
        }
        if self.control.is_some() && (self.template.is_some() || !self.labels.is_empty()) {
            return Err(self.invalid("a control column cannot also have a template or labels"));
        }

        let title = self.title.clone().unwrap_or_else(|| title_case(&self.field));
        let mut column = Column::new(self.field.clone(), title).sortable(self.sortable);
        if let Some(width) = self.width {
            column = column.width(width);
        }
        if let Some(fixed) = self.fixed {
            column = column.fixed(fixed);
        }

        if let Some(name) = &self.comparator {
            if !self.sortable {
                return Err(self.invalid("comparator given but the column is not sortable"));
            }
            let comparator =
                named_comparator(name).ok_or_else(|| TableError::UnknownComparator {
                    column: self.field.clone(),
                    name: name.clone(),
                })?;
            column.sort_func = Some(comparator);
        }

        if let Some(label) = self.control.clone() {
            return Ok(column.render(move |row: &JsonRow, _| {
                let on_control = Arc::clone(&on_control);
                let label_for_handler = label.clone();
                let row_id = row.id().to_owned();
                Cell::control(label.clone(), move || on_control(&label_for_handler, &row_id))
            }));
        }

        if self.template.is_some() || !self.labels.is_empty() || self.align.is_some() {
            let field = self.field.clone();
            let template = self.template.clone();
            let labels = self.labels.clone();
            let align = self.align.clone();
            column = column.render(move |row: &JsonRow, _| {
                let text = match &template {
                    Some(template) => fill_template(template, row),
                    None => row.field(&field).map(|v| display_value(&v)).unwrap_or_default(),
                };
                let text = labels.get(&text).cloned().unwrap_or(text);
                let cell = Cell::new(text);
                match &align {
                    Some(align) => cell.prop("align", align.clone()),
                    None => cell,
                }
            });
        }

        Ok(column)
    }
}

/// Replace each `{name}` in `template` with the row's value for `name`.
///
/// Unknown fields become empty text. An unclosed `{` is kept literally.
pub fn fill_template(template: &str, row: &JsonRow) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if let Some(value) = row.field(name) {
                    out.push_str(&display_value(&value));
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// One sortable text column per field of `row`.
pub fn infer_columns(row: &JsonRow) -> Vec<Column<JsonRow>> {
    row.fields
        .keys()
        .map(|field| {
            let title = title_case(field);
            let width = (title.len() as u16).max(16);
            Column::new(field.clone(), title).width(width).sortable(true)
        })
        .collect()
}

/// `createDate` -> `Create date`, `first_name` -> `First name`.
fn title_case(field: &str) -> String {
    let mut title = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i == 0 {
            title.extend(c.to_uppercase());
        } else if c == '_' || c == '-' {
            title.push(' ');
        } else if c.is_uppercase() {
            title.push(' ');
            title.extend(c.to_lowercase());
        } else {
            title.push(c);
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    fn noop() -> ControlHandler {
        Arc::new(|_, _| {})
    }

    fn row() -> JsonRow {
        JsonRow::new("7")
            .with("name", "Ada")
            .with("status", true)
            .with("createDate", 1_700_000_000_000u64)
    }

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert!(config.selectable);
        assert_eq!(config.page_limit, 10);
        assert!(config.columns.is_empty());
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
page_limit = 5
selectable = false

[[columns]]
field = "name"
sortable = true
width = 20

[[columns]]
field = "createDate"
sortable = true
comparator = "numeric"

[[columns]]
field = "edit"
control = "edit"
"#
        )
        .unwrap();

        let config = TableConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.page_limit, 5);
        assert!(!config.selectable);
        assert_eq!(config.latency_ms, 300);
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.columns[1].comparator.as_deref(), Some("numeric"));
        assert_eq!(config.columns[2].control.as_deref(), Some("edit"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(TableConfig::load(Some(Path::new("/nonexistent/table.toml"))).is_err());
    }

    #[test]
    fn test_build_columns_infers_from_sample() {
        let columns = TableConfig::default()
            .build_columns(Some(&row()), noop())
            .unwrap();
        let mut fields: Vec<&str> = columns.iter().map(|c| c.field_name.as_str()).collect();
        fields.sort();
        assert_eq!(fields, vec!["createDate", "name", "status"]);
        let date = columns.iter().find(|c| c.field_name == "createDate").unwrap();
        assert_eq!(date.title, "Create date");
        assert!(columns.iter().all(|c| c.sortable));

        assert!(TableConfig::default()
            .build_columns(None, noop())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unknown_comparator() {
        let mut column = ColumnConfig::new("size");
        column.sortable = true;
        column.comparator = Some("fuzzy".into());
        assert_eq!(
            column.build(noop()).unwrap_err(),
            TableError::UnknownComparator {
                column: "size".into(),
                name: "fuzzy".into()
            }
        );
    }

    #[test]
    fn test_invalid_columns() {
        let mut unsortable = ColumnConfig::new("size");
        unsortable.comparator = Some("numeric".into());
        assert!(matches!(
            unsortable.build(noop()),
            Err(TableError::InvalidColumn { .. })
        ));

        let mut mixed = ColumnConfig::new("edit");
        mixed.control = Some("edit".into());
        mixed.template = Some("{name}".into());
        assert!(matches!(
            mixed.build(noop()),
            Err(TableError::InvalidColumn { .. })
        ));

        assert!(matches!(
            ColumnConfig::new("").build(noop()),
            Err(TableError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn test_labels_and_align() {
        let mut column = ColumnConfig::new("status");
        column.labels.insert("true".into(), "Active".into());
        column.labels.insert("false".into(), "Inactive".into());
        column.align = Some("center".into());
        let column = column.build(noop()).unwrap();

        let render = column.render.unwrap();
        let cell = render(&row(), 0);
        assert_eq!(cell.value, "Active");
        assert_eq!(cell.props.get("align").map(String::as_str), Some("center"));
    }

    #[test]
    fn test_template() {
        assert_eq!(fill_template("{name} (#{id})", &row()), "Ada (#7)");
        assert_eq!(fill_template("{missing}!", &row()), "!");
        assert_eq!(fill_template("open {name", &row()), "open {name");
    }

    #[test]
    fn test_control_column_reports_label_and_row() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let handler: ControlHandler = Arc::new(move |label, id| {
            log.lock().unwrap().push(format!("{}:{}", label, id));
        });

        let mut column = ColumnConfig::new("edit");
        column.control = Some("edit".into());
        let column = column.build(handler).unwrap();

        let cell = (column.render.unwrap())(&row(), 0);
        assert_eq!(cell.value, "[edit]");
        (cell.control.unwrap().on_activate)();
        assert_eq!(*seen.lock().unwrap(), vec!["edit:7".to_string()]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("createDate"), "Create date");
        assert_eq!(title_case("first_name"), "First name");
        assert_eq!(title_case("email"), "Email");
    }
}
