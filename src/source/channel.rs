//! Channel-based page source.
//!
//! Page requests go out over one tokio channel and answers come back over
//! another, so the UI loop never waits on the producer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::debug;

use super::{Dataset, Page, PageSource};

/// A request for one page, as seen by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub page_limit: u32,
}

/// A page source fed through channels.
///
/// Answers to superseded requests are dropped, so a slow page never
/// overwrites a newer one.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gridline::{ChannelSource, Dataset, PageSource};
///
/// # tokio_test::block_on(async {
/// let mut source = ChannelSource::spawn(Dataset::sample(50), Duration::from_millis(200), "demo");
/// source.request(1, 10);
/// # });
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    requests: mpsc::UnboundedSender<PageRequest>,
    pages: mpsc::UnboundedReceiver<Page>,
    description: String,
    wanted: Option<u32>,
    last_error: Option<String>,
}

impl ChannelSource {
    /// Wrap an existing pair of channels.
    ///
    /// Whatever sits on the other end must answer each [`PageRequest`] with a
    /// [`Page`] of the same number.
    pub fn new(
        requests: mpsc::UnboundedSender<PageRequest>,
        pages: mpsc::UnboundedReceiver<Page>,
        source_description: &str,
    ) -> Self {
        Self {
            requests,
            pages,
            description: format!("channel: {}", source_description),
            wanted: None,
            last_error: None,
        }
    }

    /// Serve `dataset` from a background task, answering each request after
    /// `latency`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(dataset: Dataset, latency: Duration, source_description: &str) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<PageRequest>();
        let (page_tx, page_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                tokio::time::sleep(latency).await;
                let page = dataset.page(request.number, request.page_limit);
                debug!(page = page.number, rows = page.rows.len(), "page served");
                if page_tx.send(page).is_err() {
                    break;
                }
            }
            debug!("page server stopped");
        });

        Self::new(request_tx, page_rx, source_description)
    }
}

impl PageSource for ChannelSource {
    fn request(&mut self, number: u32, page_limit: u32) {
        self.wanted = Some(number);
        if self
            .requests
            .send(PageRequest { number, page_limit })
            .is_err()
        {
            self.last_error = Some("page server is gone".to_string());
        }
    }

    fn poll(&mut self) -> Option<Page> {
        let mut latest = None;
        loop {
            match self.pages.try_recv() {
                Ok(page) if Some(page.number) == self.wanted => latest = Some(page),
                Ok(page) => debug!(page = page.number, "dropping stale page"),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.last_error = Some("page server is gone".to_string());
                    break;
                }
            }
        }
        latest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    async fn next_page(source: &mut ChannelSource) -> Option<Page> {
        for _ in 0..200 {
            if let Some(page) = source.poll() {
                return Some(page);
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        None
    }

    #[tokio::test]
    async fn test_channel_source_serves_pages() {
        let mut source = ChannelSource::spawn(Dataset::sample(25), Duration::ZERO, "test");
        assert_eq!(source.description(), "channel: test");
        assert!(source.poll().is_none());

        source.request(3, 10);
        let page = next_page(&mut source).await.unwrap();
        assert_eq!(page.number, 3);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[0].id(), "user-021");
        assert!(source.error().is_none());
    }

    #[tokio::test]
    async fn test_stale_pages_are_dropped() {
        let mut source =
            ChannelSource::spawn(Dataset::sample(30), Duration::from_millis(10), "test");
        source.request(1, 10);
        source.request(2, 10);

        let page = next_page(&mut source).await.unwrap();
        assert_eq!(page.number, 2);
    }

    #[tokio::test]
    async fn test_manual_channels() {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel();
        let (page_tx, page_rx) = mpsc::unbounded_channel();
        let mut source = ChannelSource::new(request_tx, page_rx, "bus");

        source.request(2, 5);
        assert_eq!(
            request_rx.recv().await,
            Some(PageRequest {
                number: 2,
                page_limit: 5
            })
        );

        page_tx.send(Dataset::sample(8).page(2, 5)).unwrap();
        let page = source.poll().unwrap();
        assert_eq!(page.rows.len(), 3);

        drop(page_tx);
        assert!(source.poll().is_none());
        assert!(source.error().is_some());
    }
}
