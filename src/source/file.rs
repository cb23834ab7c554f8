//! Dataset file source.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::{Dataset, Page, PageSource};

/// Serves pages sliced out of a JSON dataset file.
///
/// The file is loaded lazily on the first poll and again whenever its
/// modification time moves forward. A reload re-delivers the page last
/// asked for, so edits show up without a new request.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    label: String,
    dataset: Option<Dataset>,
    loaded_at: Option<SystemTime>,
    error: Option<String>,
    /// Last request as (page number, page limit).
    wanted: Option<(u32, u32)>,
    answered: bool,
}

fn load(path: &Path) -> Result<Dataset> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    Dataset::from_json(&content).context("invalid dataset")
}

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = format!("file: {}", path.display());
        Self {
            path,
            label,
            dataset: None,
            loaded_at: None,
            error: None,
            wanted: None,
            answered: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file when it is new or newer. Returns whether the dataset changed.
    fn reload_if_stale(&mut self) -> bool {
        let modified = mtime(&self.path);
        let stale = match (self.loaded_at, modified) {
            (None, _) => true,
            (Some(loaded), Some(modified)) => modified > loaded,
            (Some(_), None) => false,
        };
        if !stale {
            return false;
        }

        match load(&self.path) {
            Ok(dataset) => {
                info!(path = %self.path.display(), rows = dataset.len(), "dataset loaded");
                self.dataset = Some(dataset);
                self.loaded_at = modified;
                self.error = None;
                true
            }
            Err(e) => {
                let message = format!("{:#}", e);
                if self.error.as_deref() != Some(message.as_str()) {
                    warn!(path = %self.path.display(), error = %message, "dataset load failed");
                }
                self.error = Some(message);
                false
            }
        }
    }
}

impl PageSource for FileSource {
    fn request(&mut self, number: u32, page_limit: u32) {
        self.wanted = Some((number, page_limit));
        self.answered = false;
    }

    fn poll(&mut self) -> Option<Page> {
        let changed = self.reload_if_stale();
        let (number, page_limit) = self.wanted?;
        if self.answered && !changed {
            return None;
        }
        let page = self.dataset.as_ref()?.page(number, page_limit);
        self.answered = true;
        Some(page)
    }

    fn description(&self) -> &str {
        &self.label
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    const THREE_ROWS: &str = r#"{"rows": [
        {"id": "1", "name": "Ada"},
        {"id": "2", "name": "Brian"},
        {"id": "3", "name": "Chloe"}
    ]}"#;

    fn dataset_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_label_and_path() {
        let source = FileSource::new("/tmp/rows.json");
        assert_eq!(source.path(), Path::new("/tmp/rows.json"));
        assert_eq!(source.description(), "file: /tmp/rows.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_no_page_until_requested() {
        let file = dataset_file(THREE_ROWS);
        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_each_request_answered_once() {
        let file = dataset_file(THREE_ROWS);
        let mut source = FileSource::new(file.path());

        source.request(1, 2);
        let page = source.poll().unwrap();
        assert_eq!((page.number, page.total_count, page.rows.len()), (1, 3, 2));
        assert!(source.poll().is_none());

        source.request(2, 2);
        let page = source.poll().unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id(), "3");
    }

    #[test]
    fn test_edit_redelivers_current_page() {
        let mut file = dataset_file(THREE_ROWS);
        let mut source = FileSource::new(file.path());
        source.request(1, 10);
        assert!(source.poll().is_some());

        std::thread::sleep(std::time::Duration::from_millis(10));
        file.as_file().set_len(0).unwrap();
        file.rewind().unwrap();
        file.write_all(br#"[{"id": "9", "name": "Zed"}]"#).unwrap();
        file.flush().unwrap();

        // Coarse mtime resolution can hide the edit; only check what we get.
        if let Some(page) = source.poll() {
            assert_eq!(page.number, 1);
            assert_eq!(page.rows[0].id(), "9");
        }
    }

    #[test]
    fn test_missing_file_reports_error() {
        let mut source = FileSource::new("/nonexistent/path/rows.json");
        source.request(1, 10);
        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("cannot read"));
    }

    #[test]
    fn test_bad_json_reports_error() {
        let file = dataset_file("{ not json");
        let mut source = FileSource::new(file.path());
        source.request(1, 10);
        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("invalid dataset"));
    }
}
