use serde::Deserialize;
use uuid::Uuid;

use crate::{
    errors::{SubscriptionError, SubscriptionResult},
    value_objects::month_year::MonthYear,
};

pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Raw `GET /subscriptions` query string. Every field is kept as text so a
/// malformed `limit` falls back to the default instead of rejecting the call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSubscriptionsQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSubscriptionsFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ListSubscriptionsFilter {
    /// Non-positive limits become [`DEFAULT_LIST_LIMIT`], negative offsets
    /// become 0. There is no upper bound on `limit`.
    pub fn new(
        user_id: Option<Uuid>,
        service_name: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Self {
        Self {
            user_id,
            service_name,
            limit: if limit <= 0 { DEFAULT_LIST_LIMIT } else { limit },
            offset: offset.max(0),
        }
    }
}

impl TryFrom<ListSubscriptionsQuery> for ListSubscriptionsFilter {
    type Error = SubscriptionError;

    fn try_from(value: ListSubscriptionsQuery) -> SubscriptionResult<Self> {
        let user_id = parse_user_id(value.user_id.as_deref())?;
        let limit = parse_count(value.limit.as_deref());
        let offset = parse_count(value.offset.as_deref());

        Ok(Self::new(
            user_id,
            non_empty(value.service_name),
            limit,
            offset,
        ))
    }
}

/// Match criteria plus the closed month range `[from, to]` for a cost total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub from: MonthYear,
    pub to: MonthYear,
}

impl TryFrom<SummaryQuery> for SummaryFilter {
    type Error = SubscriptionError;

    fn try_from(value: SummaryQuery) -> SubscriptionResult<Self> {
        let (Some(from), Some(to)) = (non_empty(value.from), non_empty(value.to)) else {
            return Err(SubscriptionError::MissingPeriod);
        };

        Ok(Self {
            from: parse_bound("from", &from)?,
            to: parse_bound("to", &to)?,
            user_id: parse_user_id(value.user_id.as_deref())?,
            service_name: non_empty(value.service_name),
        })
    }
}

fn parse_bound(bound: &'static str, raw: &str) -> SubscriptionResult<MonthYear> {
    MonthYear::parse(raw).map_err(|_| SubscriptionError::InvalidPeriodBound {
        bound,
        value: raw.to_string(),
    })
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.is_empty())
}

fn parse_user_id(raw: Option<&str>) -> SubscriptionResult<Option<Uuid>> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| SubscriptionError::InvalidIdentifier("user_id")),
    }
}

// Unparseable counts read as 0 and are then defaulted by `new`.
fn parse_count(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_defaults_apply_to_non_positive_values() {
        let filter = ListSubscriptionsFilter::new(None, None, 0, -1);
        assert_eq!(filter.limit, DEFAULT_LIST_LIMIT);
        assert_eq!(filter.offset, 0);

        let filter = ListSubscriptionsFilter::new(None, None, -7, 3);
        assert_eq!(filter.limit, DEFAULT_LIST_LIMIT);
        assert_eq!(filter.offset, 3);
    }

    #[test]
    fn large_limits_pass_through() {
        let filter = ListSubscriptionsFilter::new(None, None, 10_000, 0);
        assert_eq!(filter.limit, 10_000);
    }

    #[test]
    fn list_query_is_normalized() {
        let user_id = Uuid::new_v4();
        let filter = ListSubscriptionsFilter::try_from(ListSubscriptionsQuery {
            user_id: Some(user_id.to_string()),
            service_name: Some("Yandex".to_string()),
            limit: Some("5".to_string()),
            offset: Some("10".to_string()),
        })
        .unwrap();

        assert_eq!(filter.user_id, Some(user_id));
        assert_eq!(filter.service_name.as_deref(), Some("Yandex"));
        assert_eq!(filter.limit, 5);
        assert_eq!(filter.offset, 10);
    }

    #[test]
    fn absent_or_garbage_counts_fall_back_to_defaults() {
        let filter = ListSubscriptionsFilter::try_from(ListSubscriptionsQuery {
            limit: Some("abc".to_string()),
            offset: Some("-4".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.limit, DEFAULT_LIST_LIMIT);
        assert_eq!(filter.offset, 0);

        let filter = ListSubscriptionsFilter::try_from(ListSubscriptionsQuery::default()).unwrap();
        assert_eq!(filter, ListSubscriptionsFilter::new(None, None, 20, 0));
    }

    #[test]
    fn empty_filters_mean_match_all() {
        let filter = ListSubscriptionsFilter::try_from(ListSubscriptionsQuery {
            user_id: Some(String::new()),
            service_name: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.user_id, None);
        assert_eq!(filter.service_name, None);
    }

    #[test]
    fn malformed_user_id_is_rejected() {
        let err = ListSubscriptionsFilter::try_from(ListSubscriptionsQuery {
            user_id: Some("not-a-uuid".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, SubscriptionError::InvalidIdentifier("user_id")));
    }

    #[test]
    fn summary_requires_both_bounds() {
        for (from, to) in [(None, Some("01-2025")), (Some("01-2025"), None), (Some(""), Some("01-2025"))] {
            let err = SummaryFilter::try_from(SummaryQuery {
                from: from.map(str::to_string),
                to: to.map(str::to_string),
                ..Default::default()
            })
            .unwrap_err();
            assert!(matches!(err, SubscriptionError::MissingPeriod), "got: {err}");
        }
    }

    #[test]
    fn summary_rejects_malformed_bounds() {
        let err = SummaryFilter::try_from(SummaryQuery {
            from: Some("2025-01".to_string()),
            to: Some("03-2025".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SubscriptionError::InvalidPeriodBound { bound: "from", .. }
        ));

        let err = SummaryFilter::try_from(SummaryQuery {
            from: Some("01-2025".to_string()),
            to: Some("13-2025".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid to date: \"13-2025\", expected MM-YYYY"
        );
    }

    #[test]
    fn summary_query_is_parsed() {
        let user_id = Uuid::new_v4();
        let filter = SummaryFilter::try_from(SummaryQuery {
            from: Some("01-2025".to_string()),
            to: Some("03-2025".to_string()),
            user_id: Some(user_id.to_string()),
            service_name: None,
        })
        .unwrap();

        assert_eq!(filter.from, MonthYear::new(2025, 1).unwrap());
        assert_eq!(filter.to, MonthYear::new(2025, 3).unwrap());
        assert_eq!(filter.user_id, Some(user_id));
        assert_eq!(filter.service_name, None);
    }
}
