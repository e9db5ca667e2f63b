use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::subscriptions::{
    InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
};
use crate::value_objects::filters::{ListSubscriptionsFilter, SummaryFilter};

/// Storage contract for subscription rows. Misses are reported as `None` or
/// a zero row count, never as an error; every `Err` is a storage failure.
#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn create(&self, insert_entity: InsertSubscriptionEntity) -> Result<SubscriptionEntity>;

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    /// Overwrites the mutable columns of one row in a single statement.
    async fn update(
        &self,
        subscription_id: Uuid,
        update_entity: UpdateSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>>;

    /// Returns the number of rows removed.
    async fn delete(&self, subscription_id: Uuid) -> Result<usize>;

    /// Newest first, bounded by the filter's limit/offset.
    async fn list(&self, filter: &ListSubscriptionsFilter) -> Result<Vec<SubscriptionEntity>>;

    async fn aggregate_cost(&self, filter: &SummaryFilter) -> Result<i64>;
}
