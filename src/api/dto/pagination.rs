//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

pub const DEFAULT_LIMIT: i64 = 25;
pub const MAX_LIMIT: i64 = 1000;

/// `?limit=&offset=` for link listing.
///
/// Uses `serde_with` to parse numbers from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Validates the parameters and returns `(limit, offset)`.
    ///
    /// # Defaults
    ///
    /// - `limit`: 25
    /// - `offset`: 0
    ///
    /// # Validation
    ///
    /// - Limit must be between 1 and 1000
    /// - Offset must not be negative
    pub fn validate_and_get_limit_offset(&self) -> Result<(i64, i64), String> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = self.offset.unwrap_or(0);

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(format!("Limit must be between 1 and {MAX_LIMIT}"));
        }

        if offset < 0 {
            return Err("Offset must not be negative".to_string());
        }

        Ok((limit, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>) -> PaginationParams {
        PaginationParams { limit, offset }
    }

    #[test]
    fn test_defaults() {
        let (limit, offset) = params(None, None).validate_and_get_limit_offset().unwrap();
        assert_eq!(limit, 25);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_custom_values() {
        let (limit, offset) = params(Some(5), Some(10))
            .validate_and_get_limit_offset()
            .unwrap();
        assert_eq!(limit, 5);
        assert_eq!(offset, 10);
    }

    #[test]
    fn test_limit_bounds() {
        assert!(params(Some(0), None).validate_and_get_limit_offset().is_err());
        assert!(params(Some(1), None).validate_and_get_limit_offset().is_ok());
        assert!(params(Some(1000), None).validate_and_get_limit_offset().is_ok());
        assert!(params(Some(1001), None).validate_and_get_limit_offset().is_err());
    }

    #[test]
    fn test_negative_offset_is_error() {
        assert!(params(None, Some(-1)).validate_and_get_limit_offset().is_err());
    }

    #[test]
    fn test_parses_from_strings() {
        let p: PaginationParams = serde_json::from_str(r#"{"limit": "3", "offset": "6"}"#).unwrap();
        assert_eq!(p.limit, Some(3));
        assert_eq!(p.offset, Some(6));

        assert!(serde_json::from_str::<PaginationParams>(r#"{"limit": "abc"}"#).is_err());
    }
}
