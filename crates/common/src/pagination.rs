//! Pagination utilities shared by list operations.
//!
//! Offset based: `skip` rows are dropped, at most `take` rows are returned,
//! ordered by identifier.

use serde::Deserialize;

/// Default page size when the caller does not provide `take`.
pub const DEFAULT_TAKE: u64 = 20;
/// Upper bound for a single page.
pub const MAX_TAKE: u64 = 100;
/// Largest offset SQL backends accept (signed 64-bit).
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Ordering by identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Pagination parameters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// rows to skip from the start
    #[serde(default)]
    pub skip: u64,
    /// rows per page
    #[serde(default)]
    pub take: Option<u64>,
    #[serde(default, alias = "sort")]
    pub order: SortOrder,
}

impl Pagination {
    pub fn new(skip: u64, take: u64, order: SortOrder) -> Self {
        Self { skip, take: Some(take), order }
    }

    /// Clamp to sane defaults, returning `(skip, take)`.
    pub fn normalize(self) -> (u64, u64) {
        let take = self.take.unwrap_or(DEFAULT_TAKE).clamp(1, MAX_TAKE);
        (self.skip.min(MAX_SKIP), take)
    }
}

#[cfg(test)]
mod tests {
    use super::{Pagination, SortOrder, DEFAULT_TAKE, MAX_SKIP};

    #[test]
    fn normalize_clamps_zero_take() {
        let (skip, take) = Pagination::new(0, 0, SortOrder::Asc).normalize();
        assert_eq!(skip, 0);
        assert_eq!(take, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (skip, take) = Pagination::new(40, 1000, SortOrder::Desc).normalize();
        assert_eq!(skip, 40);
        assert_eq!(take, 100);
    }

    #[test]
    fn normalize_caps_skip_to_signed_range() {
        let (skip, take) = Pagination::new(u64::MAX, 1, SortOrder::Asc).normalize();
        assert_eq!(skip, i64::MAX as u64);
        assert_eq!(skip, MAX_SKIP);
        assert_eq!(take, 1);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.normalize(), (0, DEFAULT_TAKE));
        assert_eq!(d.order, SortOrder::Asc);
    }

    #[test]
    fn deserializes_sort_alias() {
        let p: Pagination = serde_json::from_str(r#"{"skip":2,"take":1,"sort":"desc"}"#).unwrap();
        assert_eq!(p, Pagination::new(2, 1, SortOrder::Desc));
    }
}
