//! Page sources for the demo caller.
//!
//! The table never fetches. The caller asks a [`PageSource`] for a page when
//! the table reports a page change, and later feeds whatever arrives back in
//! as new props.

mod channel;
mod dataset;
mod file;

pub use channel::{ChannelSource, PageRequest};
pub use dataset::{Dataset, Page};
pub use file::FileSource;

use std::fmt::Debug;

/// Trait for serving pages of rows from some backend.
///
/// # Example
///
/// ```
/// use gridline::{FileSource, PageSource};
///
/// let mut source = FileSource::new("rows.json");
/// source.request(1, 10);
/// if let Some(page) = source.poll() {
///     println!("page {} has {} rows", page.number, page.rows.len());
/// }
/// ```
pub trait PageSource: Send + Debug {
    /// Ask for page `number` holding up to `page_limit` rows.
    ///
    /// The answer arrives later through [`PageSource::poll`]. A newer request
    /// supersedes any request still in flight.
    fn request(&mut self, number: u32, page_limit: u32);

    /// Take the latest answered page, if one arrived since the last poll.
    ///
    /// Never blocks.
    fn poll(&mut self) -> Option<Page>;

    /// Human-readable description, shown in the status bar.
    fn description(&self) -> &str;

    /// The last error the source ran into, if any.
    fn error(&self) -> Option<&str>;
}
