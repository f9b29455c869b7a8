//! Page normalisation and page results.
//!
//! Raw `page`/`page_size` inputs come straight from the query string and
//! may be missing, zero, or negative. [`PageBounds::normalize`] turns them
//! into a [`PageRequest`] that is always safe to hand to a store.

use serde::Serialize;

use super::QueryError;

/// Default and maximum page sizes for one use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    default_page_size: i64,
    max_page_size: i64,
}

impl PageBounds {
    /// Ten items per page by default, at most one hundred.
    pub const STANDARD: Self = Self {
        default_page_size: 10,
        max_page_size: 100,
    };

    /// Creates bounds, rejecting a non-positive default or a maximum below
    /// the default.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidBounds`] when the pair is unusable.
    pub fn new(default_page_size: i64, max_page_size: i64) -> Result<Self, QueryError> {
        if default_page_size < 1 || max_page_size < default_page_size {
            return Err(QueryError::InvalidBounds {
                default: default_page_size,
                max: max_page_size,
            });
        }
        Ok(Self {
            default_page_size,
            max_page_size,
        })
    }

    /// Page size used when the caller gives none.
    #[must_use]
    pub const fn default_page_size(&self) -> i64 {
        self.default_page_size
    }

    /// Upper clamp for any requested page size.
    #[must_use]
    pub const fn max_page_size(&self) -> i64 {
        self.max_page_size
    }

    /// Normalises raw paging input.
    ///
    /// A missing or non-positive `page_size` becomes the default, one above
    /// the maximum is clamped to it. A missing page or one below 1 becomes 1.
    #[must_use]
    pub fn normalize(&self, page: Option<i64>, page_size: Option<i64>) -> PageRequest {
        let mut size = page_size.unwrap_or(0);
        if size <= 0 {
            size = self.default_page_size;
        }
        if size > self.max_page_size {
            size = self.max_page_size;
        }
        PageRequest {
            page: page.unwrap_or(1).max(1),
            page_size: size,
        }
    }
}

impl Default for PageBounds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A normalised page window: `page ≥ 1`, `page_size ≥ 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    /// The first row only. Used for "latest" lookups.
    pub const FIRST: Self = Self {
        page: 1,
        page_size: 1,
    };

    /// 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Row limit for the store query.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.page_size
    }

    /// Rows skipped before this page: `(page - 1) * page_size`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Rows on this page, at most `page_size` of them.
    pub items: Vec<T>,
    /// Rows matching the criteria, ignoring paging.
    pub total: u64,
    /// Echoed page number.
    pub page: i64,
    /// Echoed page size after clamping.
    pub page_size: i64,
}

impl<T> Page<T> {
    /// Assembles a page from a store result.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }

    /// Converts every item, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Number of pages needed for `total` rows.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        let size = u64::try_from(self.page_size).unwrap_or(1).max(1);
        self.total.div_ceil(size)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_size_uses_default() {
        let bounds = PageBounds::STANDARD;
        for raw in [0, -1, -500, i64::MIN] {
            assert_eq!(bounds.normalize(Some(1), Some(raw)).page_size(), 10);
        }
        assert_eq!(bounds.normalize(Some(1), None).page_size(), 10);
    }

    #[test]
    fn oversized_page_is_clamped() {
        let bounds = PageBounds::STANDARD;
        for raw in [101, 500, i64::MAX] {
            assert_eq!(bounds.normalize(Some(1), Some(raw)).page_size(), 100);
        }
    }

    #[test]
    fn in_range_size_is_unchanged() {
        let bounds = PageBounds::STANDARD;
        for raw in [1, 25, 99, 100] {
            assert_eq!(bounds.normalize(Some(1), Some(raw)).page_size(), raw);
        }
    }

    #[test]
    fn default_and_max_scenario() {
        let Ok(bounds) = PageBounds::new(10, 100) else {
            panic!("valid bounds");
        };
        assert_eq!(bounds.normalize(None, Some(0)).page_size(), 10);
        assert_eq!(bounds.normalize(None, Some(500)).page_size(), 100);
        assert_eq!(bounds.normalize(None, Some(25)).page_size(), 25);
    }

    #[test]
    fn page_below_one_is_clamped() {
        let bounds = PageBounds::STANDARD;
        assert_eq!(bounds.normalize(Some(0), Some(10)).page(), 1);
        assert_eq!(bounds.normalize(Some(-7), Some(10)).page(), 1);
        assert_eq!(bounds.normalize(None, Some(10)).offset(), 0);
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let bounds = PageBounds::STANDARD;
        for (page, size) in [(None, None), (Some(-3), Some(0)), (Some(4), Some(250)), (Some(2), Some(7))] {
            let once = bounds.normalize(page, size);
            let twice = bounds.normalize(Some(once.page()), Some(once.page_size()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn offset_is_page_minus_one_times_size() {
        let bounds = PageBounds::STANDARD;
        let req = bounds.normalize(Some(3), Some(20));
        assert_eq!(req.offset(), 40);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn huge_page_offset_saturates() {
        let bounds = PageBounds::STANDARD;
        let req = bounds.normalize(Some(i64::MAX), Some(100));
        assert_eq!(req.offset(), i64::MAX);
    }

    #[test]
    fn bounds_validation() {
        assert!(PageBounds::new(0, 10).is_err());
        assert!(PageBounds::new(20, 10).is_err());
        assert!(PageBounds::new(10, 10).is_ok());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 21, PageBounds::STANDARD.normalize(None, None));
        assert_eq!(page.total_pages(), 3);
        let empty: Page<u8> = Page::new(vec![], 0, PageRequest::FIRST);
        assert_eq!(empty.total_pages(), 0);
    }
}
