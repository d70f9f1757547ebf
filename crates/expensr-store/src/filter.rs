//! Transaction listing filters and pagination.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Filters for the transaction listing query. All filters are optional and
/// combined with AND; name filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxFilter {
    /// Inclusive lower bound on the effective date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the effective date.
    pub to: Option<NaiveDate>,
    /// Substring of the category name.
    pub category: Option<String>,
    /// Substring of the vendor name.
    pub vendor: Option<String>,
}

/// Pagination window. Out-of-range values are clamped, not rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }.clamped()
    }

    /// Clamp the limit to [1, 100]. Offset is unsigned, so already ≥ 0.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, Self::MAX_LIMIT),
            offset: self.offset,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
