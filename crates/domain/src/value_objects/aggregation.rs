use uuid::Uuid;

use crate::value_objects::{
    filters::{ListSubscriptionsFilter, SummaryFilter},
    month_year::MonthYear,
    subscriptions::SubscriptionModel,
};

/// A subscription is active during `[from, to]` when it starts no later than
/// `to` and has either no end or an end no earlier than `from`.
pub fn overlaps(
    start: MonthYear,
    end: Option<MonthYear>,
    from: MonthYear,
    to: MonthYear,
) -> bool {
    start <= to && end.is_none_or(|end| end >= from)
}

fn matches_owner(
    user_id: Option<Uuid>,
    service_name: Option<&str>,
    subscription: &SubscriptionModel,
) -> bool {
    user_id.is_none_or(|user_id| subscription.user_id == user_id)
        && service_name.is_none_or(|name| subscription.service_name == name)
}

impl ListSubscriptionsFilter {
    pub fn matches(&self, subscription: &SubscriptionModel) -> bool {
        matches_owner(self.user_id, self.service_name.as_deref(), subscription)
    }
}

impl SummaryFilter {
    pub fn matches(&self, subscription: &SubscriptionModel) -> bool {
        matches_owner(self.user_id, self.service_name.as_deref(), subscription)
            && overlaps(
                subscription.start_date,
                subscription.end_date,
                self.from,
                self.to,
            )
    }
}

/// Sum of prices over every subscription that matches the filter and overlaps
/// its range. Accumulates in `i64`; an empty match set totals 0.
pub fn total_cost<'a, I>(subscriptions: I, filter: &SummaryFilter) -> i64
where
    I: IntoIterator<Item = &'a SubscriptionModel>,
{
    subscriptions
        .into_iter()
        .filter(|subscription| filter.matches(subscription))
        .map(|subscription| i64::from(subscription.price))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn month(raw: &str) -> MonthYear {
        MonthYear::parse(raw).unwrap()
    }

    fn subscription(
        user_id: Uuid,
        service_name: &str,
        price: i32,
        start: &str,
        end: Option<&str>,
    ) -> SubscriptionModel {
        let now = Utc::now();
        SubscriptionModel {
            id: Uuid::new_v4(),
            user_id,
            service_name: service_name.to_string(),
            price,
            start_date: month(start),
            end_date: end.map(month),
            created_at: now,
            updated_at: now,
        }
    }

    fn summary(user_id: Option<Uuid>, from: &str, to: &str) -> SummaryFilter {
        SummaryFilter {
            user_id,
            service_name: None,
            from: month(from),
            to: month(to),
        }
    }

    #[test]
    fn overlap_boundaries_are_inclusive() {
        let jan = month("01-2025");
        let mar = month("03-2025");

        assert!(overlaps(jan, None, jan, jan));
        assert!(overlaps(mar, None, jan, mar));
        assert!(overlaps(month("06-2024"), Some(jan), jan, mar));
        assert!(!overlaps(month("04-2025"), None, jan, mar));
        assert!(!overlaps(month("06-2024"), Some(month("12-2024")), jan, mar));
    }

    #[test]
    fn open_ended_subscriptions_stay_active() {
        assert!(overlaps(
            month("01-2020"),
            None,
            month("01-2030"),
            month("12-2030")
        ));
    }

    #[test]
    fn totals_overlapping_subscriptions_for_a_user() {
        let user1 = Uuid::new_v4();
        let user2 = Uuid::new_v4();
        let subscriptions = vec![
            subscription(user1, "Yandex", 300, "01-2025", None),
            subscription(user1, "Netflix", 200, "02-2025", None),
            subscription(user2, "Yandex", 999, "01-2025", None),
        ];

        assert_eq!(
            total_cost(&subscriptions, &summary(Some(user1), "01-2025", "03-2025")),
            500
        );
        assert_eq!(
            total_cost(&subscriptions, &summary(Some(user1), "01-2025", "01-2025")),
            300
        );
        assert_eq!(
            total_cost(&subscriptions, &summary(None, "01-2025", "01-2025")),
            1299
        );
    }

    #[test]
    fn service_name_narrows_exactly() {
        let user = Uuid::new_v4();
        let subscriptions = vec![
            subscription(user, "Yandex", 300, "01-2025", None),
            subscription(user, "yandex", 50, "01-2025", None),
            subscription(user, "Yandex Plus", 70, "01-2025", None),
        ];

        let filter = SummaryFilter {
            service_name: Some("Yandex".to_string()),
            ..summary(Some(user), "01-2025", "12-2025")
        };
        assert_eq!(total_cost(&subscriptions, &filter), 300);
    }

    #[test]
    fn empty_match_set_totals_zero() {
        let subscriptions: Vec<SubscriptionModel> = Vec::new();
        assert_eq!(
            total_cost(&subscriptions, &summary(None, "01-2025", "12-2025")),
            0
        );
    }

    #[test]
    fn totals_do_not_overflow_i32() {
        let user = Uuid::new_v4();
        let subscriptions = vec![
            subscription(user, "Big", i32::MAX, "01-2025", None),
            subscription(user, "Big", i32::MAX, "01-2025", None),
        ];
        assert_eq!(
            total_cost(&subscriptions, &summary(Some(user), "01-2025", "01-2025")),
            2 * i64::from(i32::MAX)
        );
    }
}
