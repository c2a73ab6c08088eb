//! Offset-based pagination over an owner's records.

use serde::Serialize;

use crate::error::DomainError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Larger requested limits are clamped to this.
pub const MAX_LIMIT: u64 = 100;
/// Offsets past this cannot be bound as a signed SQL integer.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a window from raw query values.
    ///
    /// Missing values take the defaults. `page < 1` and `limit < 1` are
    /// rejected; `limit` above [`MAX_LIMIT`] is clamped.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, DomainError> {
        let page = match page {
            None => DEFAULT_PAGE,
            Some(p) if p >= 1 => p as u64,
            Some(_) => return Err(DomainError::validation("page must be a positive integer")),
        };
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(l) if l >= 1 => (l as u64).min(MAX_LIMIT),
            Some(_) => return Err(DomainError::validation("limit must be a positive integer")),
        };

        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Rows to skip, capped at [`MAX_OFFSET`]. A capped window is simply empty.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_OFFSET)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One window of results plus the total under the same filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::new(None, None).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest::new(Some(3), Some(20)).unwrap();
        assert_eq!(request.offset(), 40);
    }

    #[test]
    fn test_non_positive_values_rejected() {
        assert!(PageRequest::new(Some(0), None).is_err());
        assert!(PageRequest::new(Some(-2), None).is_err());
        assert!(PageRequest::new(None, Some(0)).is_err());
        assert!(PageRequest::new(None, Some(-10)).is_err());
    }

    #[test]
    fn test_limit_clamped() {
        let request = PageRequest::new(Some(1), Some(5_000)).unwrap();
        assert_eq!(request.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_huge_page_offset_fits_signed_range() {
        let request = PageRequest::new(Some(i64::MAX), Some(100)).unwrap();
        assert_eq!(request.page(), i64::MAX as u64);
        assert_eq!(request.offset(), MAX_OFFSET);
        assert!(i64::try_from(request.offset()).is_ok());
    }
}
