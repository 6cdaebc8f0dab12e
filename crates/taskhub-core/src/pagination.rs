//! Pagination envelope and the uniform list result.

use serde::{Deserialize, Serialize};

/// Server-reported pagination for one list response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number of this response.
    #[serde(alias = "page")]
    pub current_page: u32,
    /// Number of pages available for the current filter.
    #[serde(alias = "pages")]
    pub total_pages: u32,
    /// Number of items matching the current filter.
    #[serde(alias = "total")]
    pub total_items: u64,
    /// Page size used by the server.
    #[serde(alias = "limit")]
    pub items_per_page: u32,
}

impl Pagination {
    /// Derive pagination for a list held entirely on the client.
    ///
    /// Always reports at least one page; `page` is clamped into range and a
    /// zero `limit` is treated as one.
    #[must_use]
    pub fn local(total_items: usize, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let total = u64::try_from(total_items).unwrap_or(u64::MAX);
        let pages = total.div_ceil(u64::from(limit)).max(1);
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
        Self {
            current_page: page.clamp(1, total_pages),
            total_pages,
            total_items: total,
            items_per_page: limit,
        }
    }

    /// Zero-based index of the first item on the current page.
    #[must_use]
    pub fn offset(&self) -> usize {
        let page = usize::try_from(self.current_page.saturating_sub(1)).unwrap_or(usize::MAX);
        let per_page = usize::try_from(self.items_per_page).unwrap_or(usize::MAX);
        page.saturating_mul(per_page)
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// One list response, normalized: items plus optional server pagination.
///
/// `pagination` is `None` when the server returned a bare array; callers then
/// fall back to client-side slicing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Server pagination, if reported.
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// A page with server pagination.
    pub fn paginated(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            items,
            pagination: Some(pagination),
        }
    }

    /// A full, unpaginated list.
    pub fn unpaged(items: Vec<T>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::unpaged(Vec::new())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case() {
        let p: Pagination = serde_json::from_value(json!({
            "currentPage": 2, "totalPages": 5, "totalItems": 27, "itemsPerPage": 6
        }))
        .unwrap();
        assert_eq!(p.current_page, 2);
        assert_eq!(p.total_pages, 5);
        assert_eq!(p.total_items, 27);
        assert_eq!(p.items_per_page, 6);
    }

    #[test]
    fn decodes_short_aliases() {
        let p: Pagination =
            serde_json::from_value(json!({"page": 1, "pages": 3, "total": 12, "limit": 5}))
                .unwrap();
        assert_eq!(p, Pagination::local(12, 1, 5));
    }

    #[test]
    fn local_rounds_pages_up() {
        let p = Pagination::local(13, 1, 6);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.total_items, 13);
    }

    #[test]
    fn local_empty_list_has_one_page() {
        let p = Pagination::local(0, 4, 6);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.current_page, 1);
        assert!(!p.has_next());
        assert!(!p.has_previous());
    }

    #[test]
    fn local_zero_limit_is_one() {
        let p = Pagination::local(3, 1, 0);
        assert_eq!(p.items_per_page, 1);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn offset_for_page() {
        let p = Pagination::local(20, 3, 6);
        assert_eq!(p.offset(), 12);
        assert!(p.has_next());
        assert!(p.has_previous());
    }
}
