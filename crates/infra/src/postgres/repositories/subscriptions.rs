use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::sum, insert_into, prelude::*, update};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::subscriptions::{
        InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
    },
    repositories::subscriptions::SubscriptionRepository,
    schema::subscriptions,
    value_objects::filters::{ListSubscriptionsFilter, SummaryFilter},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

// Diesel is synchronous; every query runs on the blocking threadpool.
#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create(&self, insert_entity: InsertSubscriptionEntity) -> Result<SubscriptionEntity> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<SubscriptionEntity> {
            let mut conn = db_pool.get()?;

            let result = insert_into(subscriptions::table)
                .values(&insert_entity)
                .returning(SubscriptionEntity::as_returning())
                .get_result::<SubscriptionEntity>(&mut conn)?;

            Ok(result)
        })
        .await?
    }

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<SubscriptionEntity>> {
            let mut conn = db_pool.get()?;

            let result = subscriptions::table
                .find(subscription_id)
                .select(SubscriptionEntity::as_select())
                .first::<SubscriptionEntity>(&mut conn)
                .optional()?;

            Ok(result)
        })
        .await?
    }

    async fn update(
        &self,
        subscription_id: Uuid,
        update_entity: UpdateSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<SubscriptionEntity>> {
            let mut conn = db_pool.get()?;

            let result = update(subscriptions::table.find(subscription_id))
                .set(&update_entity)
                .returning(SubscriptionEntity::as_returning())
                .get_result::<SubscriptionEntity>(&mut conn)
                .optional()?;

            Ok(result)
        })
        .await?
    }

    async fn delete(&self, subscription_id: Uuid) -> Result<usize> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<usize> {
            let mut conn = db_pool.get()?;

            let deleted = diesel::delete(subscriptions::table.find(subscription_id))
                .execute(&mut conn)?;

            Ok(deleted)
        })
        .await?
    }

    async fn list(&self, filter: &ListSubscriptionsFilter) -> Result<Vec<SubscriptionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);
        let filter = filter.clone();

        task::spawn_blocking(move || -> Result<Vec<SubscriptionEntity>> {
            let mut conn = db_pool.get()?;

            let mut query = subscriptions::table
                .select(SubscriptionEntity::as_select())
                .into_boxed();

            if let Some(user_id) = filter.user_id {
                query = query.filter(subscriptions::user_id.eq(user_id));
            }

            if let Some(service_name) = filter.service_name {
                query = query.filter(subscriptions::service_name.eq(service_name));
            }

            let results = query
                .order(subscriptions::created_at.desc())
                .limit(filter.limit)
                .offset(filter.offset)
                .load::<SubscriptionEntity>(&mut conn)?;

            Ok(results)
        })
        .await?
    }

    async fn aggregate_cost(&self, filter: &SummaryFilter) -> Result<i64> {
        let db_pool = Arc::clone(&self.db_pool);
        let filter = filter.clone();

        task::spawn_blocking(move || -> Result<i64> {
            let mut conn = db_pool.get()?;
            let from = filter.from.first_day();
            let to = filter.to.first_day();

            let mut query = subscriptions::table
                .select(sum(subscriptions::price))
                .filter(subscriptions::start_date.le(to))
                .filter(
                    subscriptions::end_date
                        .is_null()
                        .or(subscriptions::end_date.ge(from)),
                )
                .into_boxed();

            if let Some(user_id) = filter.user_id {
                query = query.filter(subscriptions::user_id.eq(user_id));
            }

            if let Some(service_name) = filter.service_name {
                query = query.filter(subscriptions::service_name.eq(service_name));
            }

            // SUM over int4 comes back as bigint, NULL when nothing matched.
            let total = query.get_result::<Option<i64>>(&mut conn)?;

            Ok(total.unwrap_or(0))
        })
        .await?
    }
}
