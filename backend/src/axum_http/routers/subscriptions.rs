use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;

use crate::axum_http::error_responses::AppError;
use application::usecases::subscriptions::SubscriptionUseCase;
use domain::{
    errors::{SubscriptionError, SubscriptionResult},
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        filters::{ListSubscriptionsFilter, ListSubscriptionsQuery, SummaryFilter, SummaryQuery},
        subscriptions::{
            CreateSubscriptionRequest, SubscriptionDraft, SubscriptionResponse, SummaryResponse,
        },
    },
};
use infra::postgres::{
    postgres_connection::PgPoolSquad, repositories::subscriptions::SubscriptionPostgres,
};
use tracing::warn;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subscriptions_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let subscriptions_usecase = SubscriptionUseCase::new(Arc::new(subscriptions_repository));

    router(Arc::new(subscriptions_usecase))
}

/// Subscription routes over any repository.
pub fn router<T>(subscriptions_usecase: Arc<SubscriptionUseCase<T>>) -> Router
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list::<T>).post(create::<T>))
        .route("/summary", get(summary::<T>))
        .route(
            "/:id",
            get(get_by_id::<T>).put(update::<T>).delete(delete::<T>),
        )
        .with_state(subscriptions_usecase)
}

pub async fn create<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Response
where
    T: SubscriptionRepository + Send + Sync,
{
    let draft = match read_draft(payload) {
        Ok(draft) => draft,
        Err(err) => return AppError(err).into_response(),
    };

    match subscriptions_usecase.create(draft).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(SubscriptionResponse::from(created)),
        )
            .into_response(),
        Err(err) => AppError(err).into_response(),
    }
}

pub async fn get_by_id<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    T: SubscriptionRepository + Send + Sync,
{
    let subscription_id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return AppError(err).into_response(),
    };

    match subscriptions_usecase.get(subscription_id).await {
        Ok(subscription) => Json(SubscriptionResponse::from(subscription)).into_response(),
        Err(err) => AppError(err).into_response(),
    }
}

pub async fn update<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Response
where
    T: SubscriptionRepository + Send + Sync,
{
    let subscription_id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return AppError(err).into_response(),
    };
    let draft = match read_draft(payload) {
        Ok(draft) => draft,
        Err(err) => return AppError(err).into_response(),
    };

    match subscriptions_usecase.update(subscription_id, draft).await {
        Ok(updated) => Json(SubscriptionResponse::from(updated)).into_response(),
        Err(err) => AppError(err).into_response(),
    }
}

pub async fn delete<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    T: SubscriptionRepository + Send + Sync,
{
    let subscription_id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return AppError(err).into_response(),
    };

    match subscriptions_usecase.delete(subscription_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => AppError(err).into_response(),
    }
}

pub async fn list<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    query: Result<Query<ListSubscriptionsQuery>, QueryRejection>,
) -> Response
where
    T: SubscriptionRepository + Send + Sync,
{
    let filter: ListSubscriptionsFilter = match read_query(query) {
        Ok(filter) => filter,
        Err(err) => return AppError(err).into_response(),
    };

    match subscriptions_usecase.list(filter).await {
        Ok(subscriptions) => Json(
            subscriptions
                .into_iter()
                .map(SubscriptionResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => AppError(err).into_response(),
    }
}

pub async fn summary<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response
where
    T: SubscriptionRepository + Send + Sync,
{
    let filter: SummaryFilter = match read_query(query) {
        Ok(filter) => filter,
        Err(err) => return AppError(err).into_response(),
    };

    match subscriptions_usecase.summary(filter).await {
        Ok(total) => Json(SummaryResponse { total }).into_response(),
        Err(err) => AppError(err).into_response(),
    }
}

fn parse_id(raw_id: &str) -> SubscriptionResult<Uuid> {
    Uuid::parse_str(raw_id).map_err(|_| SubscriptionError::InvalidIdentifier("id"))
}

fn read_query<Q, F>(query: Result<Query<Q>, QueryRejection>) -> SubscriptionResult<F>
where
    F: TryFrom<Q, Error = SubscriptionError>,
{
    let Query(raw) = query.map_err(|rejection| {
        warn!(rejection = %rejection.body_text(), "subscriptions: unreadable query string");
        SubscriptionError::InvalidQuery
    })?;

    F::try_from(raw)
}

fn read_draft(
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> SubscriptionResult<SubscriptionDraft> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(rejection = %rejection.body_text(), "subscriptions: unreadable request body");
        SubscriptionError::InvalidBody
    })?;

    request.check()?;
    request.to_draft()
}
