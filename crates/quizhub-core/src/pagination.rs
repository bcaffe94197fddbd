//! Pagination for list endpoints.
//!
//! Clients send `limit` plus either `page` (1-indexed) or `offset`. When both
//! are present, `page` wins. Empty query values count as missing.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Metadata returned alongside a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct PaginationParams {
    /// Items per page (1-100, default 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Items to skip, ignored when `page` is set
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// 1-indexed page number
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1).saturating_mul(self.limit()),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }

    /// Builds the response metadata once the total row count is known.
    #[must_use]
    pub fn meta(&self, total: i64) -> PaginationMeta {
        let limit = self.limit();
        let offset = self.offset();
        PaginationMeta {
            total,
            limit,
            offset,
            page: self.page(),
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), None);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(params(Some(0), None, None).limit(), 1);
        assert_eq!(params(Some(-3), None, None).limit(), 1);
        assert_eq!(params(Some(500), None, None).limit(), MAX_LIMIT);
        assert_eq!(params(Some(35), None, None).limit(), 35);
    }

    #[test]
    fn page_takes_precedence_over_offset() {
        let p = params(Some(10), Some(7), Some(3));
        assert_eq!(p.offset(), 20);
        assert_eq!(p.page(), Some(3));
    }

    #[test]
    fn negative_offset_and_page_are_floored() {
        assert_eq!(params(Some(10), Some(-5), None).offset(), 0);
        assert_eq!(params(Some(10), None, Some(-2)).offset(), 0);
    }

    #[test]
    fn meta_reports_remaining_rows() {
        let p = params(Some(10), None, Some(2));
        let meta = p.meta(25);
        assert_eq!(meta.offset, 10);
        assert!(meta.has_more);

        let meta = params(Some(10), None, Some(3)).meta(25);
        assert!(!meta.has_more);
    }

    #[test]
    fn huge_page_and_offset_saturate() {
        let p = params(Some(100), None, Some(i64::MAX));
        assert_eq!(p.offset(), i64::MAX);
        assert!(!p.meta(10).has_more);

        let meta = params(Some(10), Some(i64::MAX), None).meta(10);
        assert_eq!(meta.offset, i64::MAX);
        assert!(!meta.has_more);
    }

    #[test]
    fn empty_query_values_are_ignored() {
        let p: PaginationParams = serde_json::from_str(r#"{"limit":"","page":" "}"#).unwrap();
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.page(), None);

        let p: PaginationParams = serde_json::from_str(r#"{"limit":"5","offset":"15"}"#).unwrap();
        assert_eq!(p.limit(), 5);
        assert_eq!(p.offset(), 15);
    }
}
