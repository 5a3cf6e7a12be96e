//! Ordering and pagination primitives for media listings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::{MediaKind, MediaRecord};

/// Closed set of listing orders. Each variant maps to one fixed ORDER BY fragment in
/// the store; caller input never reaches SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderKey {
    /// Owner-defined rank, ascending
    #[serde(rename = "sort_order")]
    SortRank,
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
    FilenameAsc,
    FilenameDesc,
    SizeAsc,
    SizeDesc,
}

impl OrderKey {
    const TABLE: [(&'static str, OrderKey); 7] = [
        ("sort_order", OrderKey::SortRank),
        ("created_at_desc", OrderKey::CreatedAtDesc),
        ("created_at_asc", OrderKey::CreatedAtAsc),
        ("filename_asc", OrderKey::FilenameAsc),
        ("filename_desc", OrderKey::FilenameDesc),
        ("size_asc", OrderKey::SizeAsc),
        ("size_desc", OrderKey::SizeDesc),
    ];

    /// Case-insensitive lookup. Unrecognized input falls back to `CreatedAtDesc`
    /// rather than failing the request.
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::TABLE
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, key)| *key)
            .unwrap_or_default()
    }

    /// Resolve the `order_by` query parameter. An absent parameter means the owner's
    /// own arrangement; a present one goes through [`OrderKey::parse_lenient`].
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            None => OrderKey::SortRank,
            Some(value) => Self::parse_lenient(value),
        }
    }

    pub fn as_str(&self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, key)| key == self)
            .map(|(name, _)| *name)
            .unwrap_or("created_at_desc")
    }
}

/// Whose media a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Only media uploaded by this user
    Owner(i64),
    /// Every user's media, read-only
    Public,
}

/// Normalized listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
    pub kind: Option<MediaKind>,
    pub order: OrderKey,
}

impl PageRequest {
    /// Coerces `page` to at least 1; a `page_size` outside `1..=100` becomes 20.
    pub fn new(page: i64, page_size: i64, kind: Option<MediaKind>, order: OrderKey) -> Self {
        let page = page.max(1);
        let page_size = if (1..=MAX_PAGE_SIZE).contains(&page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self {
            page,
            page_size,
            kind,
            order,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE, None, OrderKey::default())
    }
}

/// One page of a listing plus the counters a client needs to paginate.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageResult {
    pub data: Vec<MediaRecord>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl PageResult {
    pub fn new(data: Vec<MediaRecord>, total: i64, request: &PageRequest) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            (total + request.page_size - 1) / request.page_size
        };
        Self {
            data,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_key_parse_is_case_insensitive() {
        assert_eq!(OrderKey::parse_lenient("SIZE_DESC"), OrderKey::SizeDesc);
        assert_eq!(OrderKey::parse_lenient("Sort_Order"), OrderKey::SortRank);
        assert_eq!(
            OrderKey::parse_lenient("filename_asc"),
            OrderKey::FilenameAsc
        );
    }

    #[test]
    fn test_unknown_order_key_falls_back_to_newest_first() {
        assert_eq!(OrderKey::parse_lenient("random"), OrderKey::CreatedAtDesc);
        assert_eq!(
            OrderKey::parse_lenient("id; DROP TABLE media"),
            OrderKey::CreatedAtDesc
        );
        assert_eq!(OrderKey::from_query(Some("")), OrderKey::CreatedAtDesc);
    }

    #[test]
    fn test_absent_order_key_uses_rank() {
        assert_eq!(OrderKey::from_query(None), OrderKey::SortRank);
    }

    #[test]
    fn test_order_key_names_round_trip_through_table() {
        for (name, key) in OrderKey::TABLE {
            assert_eq!(key.as_str(), name);
        }
    }

    #[test]
    fn test_page_request_coercion() {
        let req = PageRequest::new(0, 0, None, OrderKey::SortRank);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 20);

        let req = PageRequest::new(-5, 101, None, OrderKey::SortRank);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 20);

        let req = PageRequest::new(3, 100, None, OrderKey::SortRank);
        assert_eq!(req.page, 3);
        assert_eq!(req.page_size, 100);
        assert_eq!(req.offset(), 200);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let req = PageRequest::new(2, 10, None, OrderKey::SortRank);
        assert_eq!(PageResult::new(Vec::new(), 25, &req).total_pages, 3);
        assert_eq!(PageResult::new(Vec::new(), 20, &req).total_pages, 2);
        assert_eq!(PageResult::new(Vec::new(), 0, &req).total_pages, 0);
    }
}
