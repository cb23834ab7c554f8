//! Pagination bridge.
//!
//! The table never owns paging. It validates a requested page against the
//! caller's [`Pagination`] and hands the request back to the caller; new rows
//! arrive later through the normal props path.

/// Caller-supplied paging position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page currently displayed.
    pub current_page: u32,
    pub total_count: u64,
    pub page_limit: u32,
}

/// A navigation intent from the page controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    Previous,
    Next,
    Page(u32),
}

/// Number of pages needed for `total_count` records.
///
/// A zero `page_limit` yields no pages.
pub fn page_count(total_count: u64, page_limit: u32) -> u32 {
    if page_limit == 0 {
        return 0;
    }
    let limit = u64::from(page_limit);
    let pages = total_count / limit + u64::from(total_count % limit != 0);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

impl Pagination {
    pub fn new(current_page: u32, total_count: u64, page_limit: u32) -> Self {
        Self {
            current_page,
            total_count,
            page_limit,
        }
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total_count, self.page_limit)
    }

    /// Whether the leftmost boundary control is disabled.
    pub fn at_first(&self) -> bool {
        self.current_page == 1
    }

    /// Whether the rightmost boundary control is disabled.
    pub fn at_last(&self) -> bool {
        self.current_page == self.page_count()
    }

    /// Validate a page request.
    ///
    /// Returns `None` for the current page and for pages outside
    /// `1..=page_count`.
    pub fn resolve(&self, requested: u32) -> Option<u32> {
        if requested == self.current_page || requested == 0 || requested > self.page_count() {
            return None;
        }
        Some(requested)
    }

    /// Page targeted by a navigation intent, if any.
    pub fn target(&self, nav: PageNav) -> Option<u32> {
        match nav {
            PageNav::Previous if self.current_page > 1 => self.resolve(self.current_page - 1),
            PageNav::Next if self.current_page < self.page_count() => {
                self.resolve(self.current_page + 1)
            }
            PageNav::Page(n) => self.resolve(n),
            _ => None,
        }
    }

    /// 1-based record range shown on the current page, clamped to the total.
    pub fn record_range(&self) -> (u64, u64) {
        let limit = u64::from(self.page_limit);
        let page = u64::from(self.current_page.max(1));
        let first = (page - 1) * limit + 1;
        let last = (page * limit).min(self.total_count);
        (first.min(self.total_count), last)
    }
}

/// A page-number marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMarker {
    pub number: u32,
    pub current: bool,
}

/// What the page control shows, as semantic markers.
///
/// There is one page marker per page. Markers are produced on demand, so a
/// huge page count costs nothing until a renderer asks for a window of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub current_page: u32,
    pub page_count: u32,
    pub left_disabled: bool,
    pub right_disabled: bool,
    pub info: String,
}

impl PageControls {
    /// Build the controls; `None` when there is nothing to page through.
    pub fn from_pagination(pagination: &Pagination) -> Option<Self> {
        if pagination.total_count == 0 {
            return None;
        }
        let (first, last) = pagination.record_range();

        Some(Self {
            current_page: pagination.current_page,
            page_count: pagination.page_count(),
            left_disabled: pagination.at_first(),
            right_disabled: pagination.at_last(),
            info: format!(
                "Showing {} to {} of {} records",
                first, last, pagination.total_count
            ),
        })
    }

    fn marker(&self, number: u32) -> PageMarker {
        PageMarker {
            number,
            current: number == self.current_page,
        }
    }

    /// Every page marker, in page order.
    pub fn markers(&self) -> impl Iterator<Item = PageMarker> + '_ {
        (1..=self.page_count).map(move |number| self.marker(number))
    }

    /// At most `max` consecutive markers, centered on the current page where
    /// the page range allows.
    pub fn window(&self, max: u32) -> Vec<PageMarker> {
        if self.page_count <= max {
            return self.markers().collect();
        }
        let start = self
            .current_page
            .saturating_sub(max / 2)
            .clamp(1, self.page_count - max + 1);
        (start..start + max).map(|number| self.marker(number)).collect()
    }

    /// Number of boundary controls currently disabled.
    pub fn disabled_markers(&self) -> usize {
        usize::from(self.left_disabled) + usize::from(self.right_disabled)
    }
}
