//! In-memory dataset and page slicing.

use serde::{Deserialize, Serialize};

use crate::table::JsonRow;

/// One page of rows as delivered to the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: u32,
    pub rows: Vec<JsonRow>,
    pub total_count: u64,
}

/// Accepted layouts of a dataset file: a bare array, or an object with a
/// `rows` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Rows(Vec<JsonRow>),
    Wrapped { rows: Vec<JsonRow> },
}

/// The full record set a source pages through.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub rows: Vec<JsonRow>,
}

impl Dataset {
    pub fn new(rows: Vec<JsonRow>) -> Self {
        Self { rows }
    }

    /// Parse a dataset document.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let rows = match serde_json::from_str(content)? {
            DatasetFile::Rows(rows) => rows,
            DatasetFile::Wrapped { rows } => rows,
        };
        Ok(Self { rows })
    }

    /// A generated dataset of `count` user accounts.
    pub fn sample(count: usize) -> Self {
        const NAMES: [&str; 10] = [
            "Ada", "Brian", "Chloe", "Dmitri", "Esther", "Farid", "Grace", "Hiro", "Ines", "Jonas",
        ];
        const DAY_MS: u64 = 86_400_000;
        let epoch_2024: u64 = 1_704_067_200_000;

        let rows = (0..count)
            .map(|i| {
                let first = NAMES[i % NAMES.len()];
                let name = format!("{} {}", first, (b'A' + (i * 7 % 26) as u8) as char);
                JsonRow::new(format!("user-{:03}", i + 1))
                    .with("name", name)
                    .with(
                        "email",
                        format!("{}{}@example.com", first.to_lowercase(), i + 1),
                    )
                    .with("createDate", epoch_2024 + (i as u64 * 37 % 365) * DAY_MS)
                    .with("status", i % 3 != 0)
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Slice out page `number` (1-based). Pages past the end are empty.
    pub fn page(&self, number: u32, page_limit: u32) -> Page {
        let limit = page_limit as usize;
        let start = (number.max(1) as usize - 1).saturating_mul(limit);
        let rows = self
            .rows
            .iter()
            .skip(start)
            .take(limit)
            .cloned()
            .collect();
        Page {
            number,
            rows,
            total_count: self.rows.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    #[test]
    fn test_parse_bare_array() {
        let dataset = Dataset::from_json(r#"[{"id": 1, "name": "a"}, {"id": "b"}]"#).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows[0].id(), "1");
    }

    #[test]
    fn test_parse_wrapped_rows() {
        let dataset = Dataset::from_json(r#"{"rows": [{"id": "x"}]}"#).unwrap();
        assert_eq!(dataset.rows[0].id(), "x");
    }

    #[test]
    fn test_parse_rejects_rows_without_id() {
        assert!(Dataset::from_json(r#"[{"name": "a"}]"#).is_err());
    }

    #[test]
    fn test_page_slicing() {
        let dataset = Dataset::sample(15);
        let first = dataset.page(1, 10);
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.total_count, 15);
        assert_eq!(first.rows[0].id(), "user-001");

        let second = dataset.page(2, 10);
        assert_eq!(second.rows.len(), 5);
        assert_eq!(second.rows[0].id(), "user-011");

        assert!(dataset.page(3, 10).rows.is_empty());
        assert!(dataset.page(1, 0).rows.is_empty());
    }

    #[test]
    fn test_sample_ids_are_unique() {
        let dataset = Dataset::sample(50);
        let mut ids: Vec<&str> = dataset.rows.iter().map(|r| r.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }
}
