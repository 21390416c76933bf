//! Two kinds of list pagination exist and they are not interchangeable.
//!
//! Cursor backed lists only know the opaque `before`/`after` tokens returned
//! next to the entries, so they can offer prev/next and nothing else. Numeric
//! lists take `page` and `page_size` and can show a window of page numbers.

use serde::Serialize;
use tracing::debug;

use crate::query::{Cursor, ListQuery};
use crate::{ExplorerError, ExplorerResult, PageMetadata, Redirect};

/// Prev/next targets of a cursor backed list. `None` means disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorLinks {
    /// newer entries
    pub prev: Option<Redirect>,
    /// older entries
    pub next: Option<Redirect>,
}

impl CursorLinks {
    /// Links for the list at `path` currently shown with `query`.
    ///
    /// An empty list has nowhere to go. Otherwise each direction is enabled
    /// exactly when the backend returned a token for it.
    pub fn new(path: &str, query: &ListQuery, metadata: &PageMetadata) -> Self {
        let link = |token: &Option<String>, cursor: fn(String) -> Cursor| {
            token
                .as_ref()
                .filter(|_| metadata.total_count > 0)
                .map(|token| query.with_cursor(cursor(token.clone())).href(path))
        };
        Self {
            prev: link(&metadata.before, Cursor::Before),
            next: link(&metadata.after, Cursor::After),
        }
    }
}

/// Limits applied to numeric pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationRules {
    /// size used when the query does not name one
    pub default_page_size: u64,
    /// sizes a query may ask for
    pub allowed_page_sizes: Vec<u64>,
    /// how many page numbers to show around the current one
    pub window: u64,
}

impl Default for PaginationRules {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            allowed_page_sizes: vec![10, 20, 50, 100],
            window: 5,
        }
    }
}

/// A validated `page`/`page_size` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// one based page number
    pub page: u64,
    /// entries per page
    pub page_size: u64,
}

impl PageRequest {
    /// Validate the paging part of `query`. The size is checked first, so a
    /// request with both wrong is corrected one redirect at a time.
    pub fn from_query(
        path: &str,
        query: &ListQuery,
        rules: &PaginationRules,
    ) -> ExplorerResult<Self> {
        let page_size = match query.page_size.as_deref() {
            None => rules.default_page_size,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(size) if rules.allowed_page_sizes.contains(&size) => size,
                _ => {
                    debug!(size = raw, "Rejecting page size");
                    return Err(ExplorerError::PageSize {
                        size: raw.to_owned(),
                        redirect: query.with_page_size(rules.default_page_size).href(path),
                    });
                }
            },
        };

        let page = match query.page.as_deref() {
            None => 1,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(page) if page > 0 => page as u64,
                _ => {
                    debug!(page = raw, "Rejecting page number");
                    return Err(ExplorerError::PageNonPositive {
                        page: raw.to_owned(),
                        redirect: query.with_page(1).href(path),
                    });
                }
            },
        };

        Ok(Self { page, page_size })
    }

    /// Number of the last page holding `total` entries. An empty list still
    /// has page 1.
    pub fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size.max(1)).max(1)
    }

    /// Reject a page past the end once the total is known.
    pub fn check_overflow(&self, path: &str, query: &ListQuery, total: u64) -> ExplorerResult<()> {
        let last = self.last_page(total);
        if self.page > last {
            return Err(ExplorerError::PageOverflow {
                page: self.page,
                last,
                redirect: query.with_page(last).href(path),
            });
        }
        Ok(())
    }

    /// Zero based offset of the first entry on this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One cell of the page-number strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageItem {
    /// a numbered link
    Page {
        /// page number
        number: u64,
        /// link to it
        href: Redirect,
        /// whether this is the page on screen
        current: bool,
    },
    /// skipped page numbers
    Gap,
}

/// Numeric pagination of a list whose total is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericPagination {
    /// page being shown
    pub current: u64,
    /// last page, at least 1
    pub last: u64,
    /// previous page, `None` on the first
    pub prev: Option<Redirect>,
    /// next page, `None` on the last
    pub next: Option<Redirect>,
    /// the page-number strip
    pub items: Vec<PageItem>,
}

impl NumericPagination {
    /// Build the page strip for `request` over `total` entries.
    ///
    /// The first and last pages are always listed; around the current page
    /// at most `window` numbers are shown, with a gap wherever numbers are
    /// skipped. Callers should run [`PageRequest::check_overflow`] first, a
    /// page past the end is clamped here.
    pub fn new(
        path: &str,
        query: &ListQuery,
        request: PageRequest,
        total: u64,
        window: u64,
    ) -> Self {
        let last = request.last_page(total);
        let current = request.page.clamp(1, last);
        let href = |page: u64| query.with_page(page).href(path);

        let prev = (total > 0 && current > 1).then(|| href(current - 1));
        let next = (total > 0 && current < last).then(|| href(current + 1));

        let window = window.max(1);
        let end = current
            .saturating_sub(window / 2)
            .max(1)
            .saturating_add(window - 1)
            .min(last);
        let start = end.saturating_sub(window - 1).max(1);

        let page = |number: u64| PageItem::Page {
            number,
            href: href(number),
            current: number == current,
        };
        let mut items = Vec::new();
        if start > 1 {
            items.push(page(1));
            if start > 2 {
                items.push(PageItem::Gap);
            }
        }
        items.extend((start..=end).map(page));
        if end < last {
            if end + 1 < last {
                items.push(PageItem::Gap);
            }
            items.push(page(last));
        }

        Self {
            current,
            last,
            prev,
            next,
            items,
        }
    }

    /// Page numbers in the strip, gaps as `None`.
    pub fn numbers(&self) -> Vec<Option<u64>> {
        self.items
            .iter()
            .map(|item| match item {
                PageItem::Page { number, .. } => Some(*number),
                PageItem::Gap => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(total_count: u64, before: Option<&str>, after: Option<&str>) -> PageMetadata {
        PageMetadata {
            total_count,
            before: before.map(Into::into),
            after: after.map(Into::into),
            ..Default::default()
        }
    }

    fn request(path: &str, query: &ListQuery) -> ExplorerResult<PageRequest> {
        PageRequest::from_query(path, query, &PaginationRules::default())
    }

    /// Page numbers of the strip with gaps as 0.
    fn strip(pagination: &NumericPagination) -> Vec<u64> {
        pagination
            .numbers()
            .into_iter()
            .map(|number| number.unwrap_or(0))
            .collect()
    }

    #[test]
    fn empty_list_disables_both_cursors() {
        let metadata = metadata(0, Some("b"), Some("a"));
        let links = CursorLinks::new("/txs", &ListQuery::default(), &metadata);
        assert_eq!(links.prev, None);
        assert_eq!(links.next, None);
    }

    #[test]
    fn first_cursor_page_only_goes_forward() {
        let query = ListQuery::parse("address_from=0xaa");
        let links = CursorLinks::new("/txs", &query, &metadata(45, None, Some("tok")));
        assert_eq!(links.prev, None);
        assert_eq!(
            links.next.unwrap().href(),
            "/txs?address_from=0xaa&after=tok"
        );
    }

    #[test]
    fn empty_numeric_list_disables_both() {
        let query = ListQuery::default();
        let request = request("/blocks", &query).unwrap();
        let pagination = NumericPagination::new("/blocks", &query, request, 0, 5);
        assert_eq!(pagination.last, 1);
        assert_eq!(pagination.prev, None);
        assert_eq!(pagination.next, None);
        assert_eq!(pagination.numbers(), vec![Some(1)]);
    }

    #[test]
    fn first_numeric_page_only_goes_forward() {
        let query = ListQuery::parse("page=1&page_size=10");
        let request = request("/blocks", &query).unwrap();
        let pagination = NumericPagination::new("/blocks", &query, request, 25, 5);
        assert_eq!(pagination.last, 3);
        assert_eq!(pagination.prev, None);
        assert_eq!(
            pagination.next.unwrap().href(),
            "/blocks?page=2&page_size=10"
        );
    }

    #[test]
    fn window_with_gaps() {
        let query = ListQuery::default();
        let request = PageRequest {
            page: 10,
            page_size: 10,
        };
        let pagination = NumericPagination::new("/blocks", &query, request, 200, 5);
        assert_eq!(strip(&pagination), [1, 0, 8, 9, 10, 11, 12, 0, 20]);

        let request = PageRequest {
            page: 2,
            page_size: 10,
        };
        let pagination = NumericPagination::new("/blocks", &query, request, 60, 5);
        assert_eq!(strip(&pagination), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn invalid_page_redirects_to_first() {
        let query = ListQuery::parse("page=-3&sort=asc");
        let err = request("/txs", &query).unwrap_err();
        assert!(matches!(err, ExplorerError::PageNonPositive { .. }));
        assert_eq!(err.redirect().href(), "/txs?sort=asc&page=1");

        let query = ListQuery::parse("page=abc");
        let err = request("/txs", &query).unwrap_err();
        assert!(matches!(err, ExplorerError::PageNonPositive { .. }));
    }

    #[test]
    fn disallowed_size_redirects_to_default() {
        let query = ListQuery::parse("page=2&page_size=7");
        let err = request("/txs", &query).unwrap_err();
        assert!(matches!(err, ExplorerError::PageSize { .. }));
        assert_eq!(err.redirect().href(), "/txs?page=2&page_size=20");
    }

    #[test]
    fn overflow_redirects_to_last() {
        let query = ListQuery::parse("page=9&page_size=10");
        let request = request("/txs", &query).unwrap();
        assert_eq!(request.offset(), 80);
        let err = request.check_overflow("/txs", &query, 31).unwrap_err();
        match &err {
            ExplorerError::PageOverflow { page, last, .. } => assert_eq!((*page, *last), (9, 4)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.redirect().href(), "/txs?page=4&page_size=10");
        assert!(request.check_overflow("/txs", &query, 90).is_ok());
    }

    #[test]
    fn window_near_the_largest_page() {
        let max = u64::MAX;
        let request = PageRequest {
            page: max - 1,
            page_size: 1,
        };
        let pagination = NumericPagination::new("/txs", &ListQuery::default(), request, max, 5);
        assert_eq!(pagination.last, max);
        assert_eq!(
            strip(&pagination),
            [1, 0, max - 4, max - 3, max - 2, max - 1, max]
        );
        assert!(pagination.next.is_some());
    }
}
