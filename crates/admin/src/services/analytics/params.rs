//! Analytics request parameters and the order filter built from them.
//!
//! Query-string values arrive as raw key/value pairs and are coerced here
//! rather than rejected: an unknown date range means all time, an unknown
//! status matches nothing, a malformed page or limit falls back to its
//! default, and a repeated key keeps its first value.

use chrono::{DateTime, Utc};

use tally_core::RangeToken;

use crate::models::{OrderFilter, PageWindow};

/// Date range used when the request does not name one.
pub const DEFAULT_DATE_RANGE: &str = "7days";
/// Status value meaning "no status constraint".
pub const ALL_STATUSES: &str = "all";
/// First page number.
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when the request does not name one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw query-string parameters shared by the analytics endpoints.
///
/// Built from the decoded key/value pairs with [`FromIterator`]; unknown
/// keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsQuery {
    /// `today`, `7days`, or anything else for all time.
    pub date_range: Option<String>,
    /// Exact status text, or `all`.
    pub status: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
}

impl FromIterator<(String, String)> for AnalyticsQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "dateRange" => &mut query.date_range,
                "status" => &mut query.status,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Validated analytics parameters.
///
/// Defaults: `{dateRange: "7days", status: "all", page: 1, limit: 10}`.
///
/// `page` and `limit` hold the coerced values, and those are what
/// `pagination` echoes: `page=0` or `page=-2` comes back as `currentPage: 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsParams {
    pub date_range: RangeToken,
    /// `None` when every status is included.
    pub status: Option<String>,
    /// Always at least 1.
    pub page: i64,
    /// Always at least 1.
    pub limit: i64,
}

impl Default for AnalyticsParams {
    fn default() -> Self {
        Self {
            date_range: RangeToken::parse(DEFAULT_DATE_RANGE),
            status: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl From<AnalyticsQuery> for AnalyticsParams {
    fn from(query: AnalyticsQuery) -> Self {
        let defaults = Self::default();

        let date_range = query
            .date_range
            .as_deref()
            .map_or(defaults.date_range, RangeToken::parse);

        let status = query
            .status
            .filter(|status| !status.is_empty() && status != ALL_STATUSES);

        Self {
            date_range,
            status,
            page: coerce_positive(query.page.as_deref(), defaults.page),
            limit: coerce_positive(query.limit.as_deref(), defaults.limit),
        }
    }
}

impl AnalyticsParams {
    /// Build the order filter: created at or after `since`, plus the status
    /// constraint if one was requested.
    #[must_use]
    pub fn order_filter(&self, since: DateTime<Utc>) -> OrderFilter {
        OrderFilter {
            since,
            status: self.status.clone(),
        }
    }

    /// Offset/limit window for the requested page.
    #[must_use]
    pub const fn page_window(&self) -> PageWindow {
        PageWindow {
            skip: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }
}

/// Parse a page or limit value, falling back to `default` when there is no
/// leading integer and raising anything below 1 to 1.
fn coerce_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(parse_leading_int).unwrap_or(default).max(1)
}

/// Parse the integer prefix of a string: `"12"`, `" 3rd"` and `"2.5"` give
/// 12, 3 and 2. Returns `None` when there are no leading digits or the value
/// does not fit in an `i64`.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits.get(..end)?.parse().ok()?;

    Some(if negative { -value } else { value })
}
