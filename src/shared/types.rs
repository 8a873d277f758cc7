use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body returned by delete endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub result: String,
}

impl DeleteResponse {
    pub fn success() -> Self {
        Self {
            result: "success".to_string(),
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Offset/limit query parameters for list endpoints.
///
/// Both values are taken as raw strings so that garbage input falls back to
/// the defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Number of items to return (1-10, default: 10)
    #[param(value_type = Option<i64>, minimum = 1, maximum = 10)]
    pub count: Option<String>,

    /// Number of items to skip (default: 0)
    #[param(value_type = Option<i64>, minimum = 0)]
    pub start: Option<String>,
}

impl PaginationQuery {
    /// Build from raw query pairs; the first occurrence of a key wins
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        Self {
            count: first("count"),
            start: first("start"),
        }
    }

    /// Requested count, or the default when missing, unparsable or out of range
    pub fn limit(&self) -> i64 {
        self.count
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| (1..=MAX_PAGE_SIZE).contains(n))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Requested start, never negative
    pub fn offset(&self) -> i64 {
        self.start
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0)
            .max(0)
    }
}
