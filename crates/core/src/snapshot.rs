//! Snapshot reasons and listing pagination.

use crate::error::CoreError;

/// Reason recorded when the caller does not supply one.
pub const DEFAULT_REASON: &str = "manual_snapshot";

/// Maximum length of a snapshot reason, in characters.
pub const MAX_REASON_LENGTH: usize = 200;

/// Default page size for snapshot listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Normalise a caller-supplied reason: trimmed, defaulted when blank.
pub fn normalize_reason(reason: Option<&str>) -> Result<String, CoreError> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    match reason {
        None => Ok(DEFAULT_REASON.to_string()),
        Some(r) if r.chars().count() > MAX_REASON_LENGTH => Err(CoreError::Validation(
            format!("Snapshot reason must be at most {MAX_REASON_LENGTH} characters"),
        )),
        Some(r) => Ok(r.to_string()),
    }
}

/// Resolved 1-based page window for a snapshot listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
}

impl PageWindow {
    /// Clamp raw query values: page >= 1, page size within 1..=[`MAX_PAGE_SIZE`].
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Self { page, page_size }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}
