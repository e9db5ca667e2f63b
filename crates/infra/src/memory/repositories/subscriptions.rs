use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use domain::{
    entities::subscriptions::{
        InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
    },
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        aggregation::total_cost,
        filters::{ListSubscriptionsFilter, SummaryFilter},
        subscriptions::SubscriptionModel,
    },
};

/// Process-local storage with the same contract as the Postgres repository.
/// Rows are kept in insertion order.
#[derive(Debug, Default)]
pub struct SubscriptionInMemory {
    rows: RwLock<Vec<SubscriptionEntity>>,
}

impl SubscriptionInMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionInMemory {
    async fn create(&self, insert_entity: InsertSubscriptionEntity) -> Result<SubscriptionEntity> {
        let now = Utc::now();
        let entity = SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id: insert_entity.user_id,
            service_name: insert_entity.service_name,
            price: insert_entity.price,
            start_date: insert_entity.start_date,
            end_date: insert_entity.end_date,
            created_at: now,
            updated_at: now,
        };

        self.rows.write().await.push(entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id == subscription_id).cloned())
    }

    async fn update(
        &self,
        subscription_id: Uuid,
        update_entity: UpdateSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|row| row.id == subscription_id) else {
            return Ok(None);
        };

        row.service_name = update_entity.service_name;
        row.price = update_entity.price;
        row.start_date = update_entity.start_date;
        row.end_date = update_entity.end_date;
        row.updated_at = update_entity.updated_at;

        Ok(Some(row.clone()))
    }

    async fn delete(&self, subscription_id: Uuid) -> Result<usize> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id != subscription_id);
        Ok(before - rows.len())
    }

    async fn list(&self, filter: &ListSubscriptionsFilter) -> Result<Vec<SubscriptionEntity>> {
        let rows = self.rows.read().await;

        // Newest first; equal timestamps keep reverse insertion order.
        let mut matched: Vec<SubscriptionEntity> = rows
            .iter()
            .rev()
            .filter(|row| filter.matches(&SubscriptionModel::from((*row).clone())))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = usize::try_from(filter.offset).unwrap_or(0);
        let limit = usize::try_from(filter.limit).unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }

    async fn aggregate_cost(&self, filter: &SummaryFilter) -> Result<i64> {
        let rows = self.rows.read().await;
        let models: Vec<SubscriptionModel> =
            rows.iter().cloned().map(SubscriptionModel::from).collect();

        Ok(total_cost(&models, filter))
    }
}
