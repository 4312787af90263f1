pub mod deployments;
pub mod health;
pub mod metrics;
pub mod tokens;
pub mod transfers;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Timeframe;

/// Response envelope for the dashboard data endpoints.
///
/// A failed or empty fetch degrades to empty `data` plus a `warning` the
/// dashboard shows as a banner — provider failures never surface as
/// error statuses.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            warning: None,
        }
    }

    pub fn warn(data: T, warning: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            warning: Some(warning.into()),
        }
    }

    pub fn with_warning(data: T, warning: Option<String>) -> Self {
        match warning {
            Some(w) => Self::warn(data, w),
            None => Self::ok(data),
        }
    }
}

/// Fold a provider result into the fetch contract: errors and empty
/// results become empty data plus a user-visible warning.
pub(crate) fn unwrap_or_warn<T, E: std::fmt::Display>(
    result: Result<Vec<T>, E>,
    what: &str,
) -> (Vec<T>, Option<String>) {
    match result {
        Ok(items) if items.is_empty() => {
            (Vec::new(), Some(format!("No data for {what} in the selected range")))
        }
        Ok(items) => (items, None),
        Err(e) => {
            tracing::warn!(error = %e, source = what, "Fetch failed");
            ::metrics::counter!("upstream_failures_total").increment(1);
            (Vec::new(), Some(format!("Data fetch failed for {what}; showing empty results")))
        }
    }
}

/// Merge per-source warnings into one banner message.
pub(crate) fn join_warnings(warnings: Vec<String>) -> Option<String> {
    if warnings.is_empty() {
        None
    } else {
        Some(warnings.join("; "))
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Date range + timeframe shared by the contract-level endpoints.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub timeframe: Option<String>,
    pub limit: Option<i64>,
}

/// Date range + timeframe + the token symbol the page is filtered to.
#[derive(Debug, Deserialize)]
pub struct TokenParams {
    pub symbol: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub timeframe: Option<String>,
    pub limit: Option<i64>,
}

/// A validated range: inclusive calendar dates plus the bucket size.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub timeframe: Timeframe,
}

impl RangeParams {
    pub fn resolve(&self) -> Result<ResolvedRange, AppError> {
        resolve_range(self.from, self.to, self.timeframe.as_deref())
    }
}

impl TokenParams {
    pub fn resolve(&self) -> Result<ResolvedRange, AppError> {
        resolve_range(self.from, self.to, self.timeframe.as_deref())
    }
}

/// Defaults match the dashboard: the 30 days ending yesterday, bucketed
/// by day.
fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    timeframe: Option<&str>,
) -> Result<ResolvedRange, AppError> {
    let today = Utc::now().date_naive();
    let to = to.unwrap_or(today - Duration::days(1));
    let from = from.unwrap_or(to - Duration::days(29));
    if from > to {
        return Err(AppError::BadRequest(format!(
            "invalid date range: {from} is after {to}"
        )));
    }

    let timeframe = match timeframe {
        Some(s) => Timeframe::from_api_str(s)
            .ok_or_else(|| AppError::BadRequest(format!("unknown timeframe: {s}")))?,
        None => Timeframe::Day,
    };

    Ok(ResolvedRange {
        from,
        to,
        timeframe,
    })
}

impl ResolvedRange {
    /// Unix-second bounds: 00:00:00 of `from` through 23:59:59 of `to`.
    pub fn unix_bounds(&self) -> (i64, i64) {
        let from_time = self.from.and_time(NaiveTime::MIN).and_utc().timestamp();
        let to_time = (self.to + Duration::days(1))
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp()
            - 1;
        (from_time, to_time)
    }

    pub fn cache_args(&self) -> [String; 3] {
        [
            self.from.to_string(),
            self.to.to_string(),
            self.timeframe.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_bounds_cover_full_days() {
        let range = ResolvedRange {
            from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            timeframe: Timeframe::Day,
        };
        let (from_time, to_time) = range.unix_bounds();
        assert_eq!(to_time - from_time, 86_399);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let result = resolve_range(
            NaiveDate::from_ymd_opt(2025, 2, 1),
            NaiveDate::from_ymd_opt(2025, 1, 1),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_timeframe_rejected() {
        let result = resolve_range(None, None, Some("fortnight"));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_fetch_warns() {
        let (items, warning) = unwrap_or_warn(Ok::<_, String>(Vec::<u64>::new()), "GMPChart");
        assert!(items.is_empty());
        assert!(warning.is_some());

        let (items, warning) = unwrap_or_warn(Err::<Vec<u64>, _>("boom".to_string()), "GMPChart");
        assert!(items.is_empty());
        assert!(warning.unwrap().contains("GMPChart"));
    }
}
