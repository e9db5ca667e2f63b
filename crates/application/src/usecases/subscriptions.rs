use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::{
    errors::{SubscriptionError, SubscriptionResult},
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        filters::{ListSubscriptionsFilter, SummaryFilter},
        subscriptions::{SubscriptionDraft, SubscriptionModel},
    },
};

/// Rules every create and update must satisfy before storage is touched.
pub fn check_business_rules(draft: &SubscriptionDraft) -> SubscriptionResult<()> {
    if draft.price < 0 {
        return Err(SubscriptionError::InvalidPrice);
    }

    if let Some(end_date) = draft.end_date {
        if end_date < draft.start_date {
            return Err(SubscriptionError::InvalidDateRange);
        }
    }

    Ok(())
}

/// A backwards range never reaches storage.
pub fn check_period(filter: &SummaryFilter) -> SubscriptionResult<()> {
    if filter.from > filter.to {
        return Err(SubscriptionError::InvalidPeriod);
    }
    Ok(())
}

pub struct SubscriptionUseCase<T>
where
    T: SubscriptionRepository + Send + Sync,
{
    subscription_repository: Arc<T>,
}

impl<T> SubscriptionUseCase<T>
where
    T: SubscriptionRepository + Send + Sync,
{
    pub fn new(subscription_repository: Arc<T>) -> Self {
        Self {
            subscription_repository,
        }
    }

    pub async fn create(&self, draft: SubscriptionDraft) -> SubscriptionResult<SubscriptionModel> {
        info!(
            user_id = %draft.user_id,
            service_name = %draft.service_name,
            "subscriptions: create requested"
        );

        check_business_rules(&draft).map_err(|err| {
            warn!(user_id = %draft.user_id, error = %err, "subscriptions: create rejected");
            err
        })?;

        let created = self
            .subscription_repository
            .create(draft.to_insert_entity())
            .await
            .map_err(|err| {
                error!(
                    user_id = %draft.user_id,
                    db_error = ?err,
                    "subscriptions: failed to insert subscription"
                );
                SubscriptionError::Storage(err)
            })?;

        info!(subscription_id = %created.id, "subscriptions: subscription created");
        Ok(created.into())
    }

    pub async fn get(&self, subscription_id: Uuid) -> SubscriptionResult<SubscriptionModel> {
        info!(%subscription_id, "subscriptions: get requested");

        let subscription = self
            .subscription_repository
            .find_by_id(subscription_id)
            .await
            .map_err(|err| {
                error!(
                    %subscription_id,
                    db_error = ?err,
                    "subscriptions: failed to load subscription"
                );
                SubscriptionError::Storage(err)
            })?
            .ok_or_else(|| {
                warn!(%subscription_id, "subscriptions: subscription not found");
                SubscriptionError::NotFound
            })?;

        Ok(subscription.into())
    }

    pub async fn update(
        &self,
        subscription_id: Uuid,
        draft: SubscriptionDraft,
    ) -> SubscriptionResult<SubscriptionModel> {
        info!(%subscription_id, "subscriptions: update requested");

        check_business_rules(&draft).map_err(|err| {
            warn!(%subscription_id, error = %err, "subscriptions: update rejected");
            err
        })?;

        let updated = self
            .subscription_repository
            .update(subscription_id, draft.to_update_entity(Utc::now()))
            .await
            .map_err(|err| {
                error!(
                    %subscription_id,
                    db_error = ?err,
                    "subscriptions: failed to update subscription"
                );
                SubscriptionError::Storage(err)
            })?
            .ok_or_else(|| {
                warn!(%subscription_id, "subscriptions: subscription not found for update");
                SubscriptionError::NotFound
            })?;

        info!(%subscription_id, "subscriptions: subscription updated");
        Ok(updated.into())
    }

    pub async fn delete(&self, subscription_id: Uuid) -> SubscriptionResult<()> {
        info!(%subscription_id, "subscriptions: delete requested");

        let deleted = self
            .subscription_repository
            .delete(subscription_id)
            .await
            .map_err(|err| {
                error!(
                    %subscription_id,
                    db_error = ?err,
                    "subscriptions: failed to delete subscription"
                );
                SubscriptionError::Storage(err)
            })?;

        if deleted == 0 {
            warn!(%subscription_id, "subscriptions: subscription not found for delete");
            return Err(SubscriptionError::NotFound);
        }

        info!(%subscription_id, "subscriptions: subscription deleted");
        Ok(())
    }

    /// Expects a filter built through `ListSubscriptionsFilter::new` or its
    /// query conversion, so paging is already normalized.
    pub async fn list(
        &self,
        filter: ListSubscriptionsFilter,
    ) -> SubscriptionResult<Vec<SubscriptionModel>> {
        info!(
            user_id = ?filter.user_id,
            service_name = ?filter.service_name,
            limit = filter.limit,
            offset = filter.offset,
            "subscriptions: list requested"
        );

        let subscriptions = self
            .subscription_repository
            .list(&filter)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to list subscriptions");
                SubscriptionError::Storage(err)
            })?;

        Ok(subscriptions.into_iter().map(SubscriptionModel::from).collect())
    }

    pub async fn summary(&self, filter: SummaryFilter) -> SubscriptionResult<i64> {
        info!(
            user_id = ?filter.user_id,
            service_name = ?filter.service_name,
            from = %filter.from,
            to = %filter.to,
            "subscriptions: summary requested"
        );

        check_period(&filter).map_err(|err| {
            warn!(
                from = %filter.from,
                to = %filter.to,
                error = %err,
                "subscriptions: summary rejected"
            );
            err
        })?;

        let total = self
            .subscription_repository
            .aggregate_cost(&filter)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to aggregate cost");
                SubscriptionError::Storage(err)
            })?;

        info!(total, "subscriptions: summary computed");
        Ok(total)
    }
}
