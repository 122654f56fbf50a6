//! Page request and page result models.
//!
//! # Invariants
//! - Page numbers are 1-based; anything below 1 is normalized to 1.
//! - Page sizes below 1 are normalized to `DEFAULT_PAGE_SIZE`.
//! - `total_pages == ceil(total_count / page_size)`, or 0 when `page_size` is 0.

use crate::store::{Filter, SortOrder};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

pub const DEFAULT_PAGE_NUMBER: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Parameters for one paged query.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Requested 1-based page number, before normalization.
    pub page_number: i64,
    /// Requested page size, before normalization.
    pub page_size: i64,
    pub filter: Option<Filter>,
    /// Field path used for ordering; `None` keeps ascending id order.
    pub order_by: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER as i64,
            page_size: DEFAULT_PAGE_SIZE as i64,
            filter: None,
            order_by: None,
            sort_order: SortOrder::Ascending,
        }
    }
}

impl PageRequest {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number,
            page_size,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn ordered_by(mut self, field: impl Into<String>, sort_order: SortOrder) -> Self {
        self.order_by = Some(field.into());
        self.sort_order = sort_order;
        self
    }

    /// Page number after normalization.
    pub fn normalized_page_number(&self) -> u64 {
        u64::try_from(self.page_number)
            .ok()
            .filter(|value| *value >= 1)
            .unwrap_or(DEFAULT_PAGE_NUMBER)
    }

    /// Page size after normalization.
    pub fn normalized_page_size(&self) -> u64 {
        u64::try_from(self.page_size)
            .ok()
            .filter(|value| *value >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Number of matching documents before the requested page.
    pub fn skip(&self) -> u64 {
        (self.normalized_page_number() - 1).saturating_mul(self.normalized_page_size())
    }
}

/// One page of a filtered, ordered result set.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Documents matching the filter, ignoring pagination.
    pub total_count: u64,
    pub page_number: u64,
    pub page_size: u64,
}

impl<T> PagedResult<T> {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }
}

impl<T: Serialize> Serialize for PagedResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut page = serializer.serialize_struct("PagedResult", 7)?;
        page.serialize_field("items", &self.items)?;
        page.serialize_field("total_count", &self.total_count)?;
        page.serialize_field("page_number", &self.page_number)?;
        page.serialize_field("page_size", &self.page_size)?;
        page.serialize_field("total_pages", &self.total_pages())?;
        page.serialize_field("has_next_page", &self.has_next_page())?;
        page.serialize_field("has_previous_page", &self.has_previous_page())?;
        page.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{PageRequest, PagedResult};

    fn page(total_count: u64, page_number: u64, page_size: u64) -> PagedResult<u8> {
        PagedResult {
            items: Vec::new(),
            total_count,
            page_number,
            page_size,
        }
    }

    #[test]
    fn normalizes_out_of_range_page_parameters() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.normalized_page_number(), 1);
        assert_eq!(request.normalized_page_size(), 10);

        let request = PageRequest::new(-4, -1);
        assert_eq!(request.normalized_page_number(), 1);
        assert_eq!(request.normalized_page_size(), 10);

        let request = PageRequest::new(3, 1);
        assert_eq!(request.normalized_page_number(), 3);
        assert_eq!(request.normalized_page_size(), 1);
    }

    #[test]
    fn skip_uses_normalized_values_and_saturates() {
        assert_eq!(PageRequest::new(3, 10).skip(), 20);
        assert_eq!(PageRequest::new(0, 0).skip(), 0);
        assert_eq!(PageRequest::new(i64::MAX, i64::MAX).skip(), u64::MAX);
    }

    #[test]
    fn total_pages_is_ceiling_of_count_over_size() {
        for page_size in 1..=12u64 {
            for total_count in 0..=40u64 {
                let expected = (total_count + page_size - 1) / page_size;
                assert_eq!(page(total_count, 1, page_size).total_pages(), expected);
            }
        }
        assert_eq!(page(25, 1, 0).total_pages(), 0);
    }

    #[test]
    fn navigation_flags_follow_page_position() {
        assert!(page(25, 1, 10).has_next_page());
        assert!(!page(25, 1, 10).has_previous_page());
        assert!(!page(25, 3, 10).has_next_page());
        assert!(page(25, 3, 10).has_previous_page());
        assert!(!page(0, 1, 10).has_next_page());
    }

    #[test]
    fn serializes_derived_total_pages() {
        let result = PagedResult {
            items: vec![1u8, 2, 3],
            total_count: 23,
            page_number: 1,
            page_size: 3,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_pages"], 8);
        assert_eq!(json["has_next_page"], true);
        assert_eq!(json["has_previous_page"], false);
        assert_eq!(json["items"].as_array().map(Vec::len), Some(3));
    }
}
