use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    entities::subscriptions::{
        InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
    },
    errors::{SubscriptionError, SubscriptionResult},
    value_objects::month_year::MonthYear,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(value: SubscriptionEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            service_name: value.service_name,
            price: value.price,
            start_date: MonthYear::from(value.start_date),
            end_date: value.end_date.map(MonthYear::from),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Parsed create/update payload: the mutable fields of a subscription plus
/// its owner, before any business rule has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionDraft {
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
}

impl SubscriptionDraft {
    pub fn to_insert_entity(&self) -> InsertSubscriptionEntity {
        InsertSubscriptionEntity {
            user_id: self.user_id,
            service_name: self.service_name.clone(),
            price: self.price,
            start_date: self.start_date.first_day(),
            end_date: self.end_date.map(|end| end.first_day()),
        }
    }

    pub fn to_update_entity(&self, updated_at: DateTime<Utc>) -> UpdateSubscriptionEntity {
        UpdateSubscriptionEntity {
            service_name: self.service_name.clone(),
            price: self.price,
            start_date: self.start_date.first_day(),
            end_date: self.end_date.map(|end| end.first_day()),
            updated_at,
        }
    }
}

/// Wire shape for both `POST /subscriptions` and `PUT /subscriptions/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub service_name: String,
    #[validate(required(message = "is required"), range(min = 0, message = "must be >= 0"))]
    pub price: Option<i32>,
    #[validate(required(message = "is required"))]
    pub user_id: Option<Uuid>,
    #[validate(
        required(message = "is required"),
        custom(function = "validate_month_year")
    )]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_month_year"))]
    pub end_date: Option<String>,
}

fn validate_month_year(value: &str) -> Result<(), ValidationError> {
    MonthYear::parse(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("month_year");
        err.message = Some("must be in MM-YYYY format".into());
        err
    })
}

// Fields sorted by name so the message is stable across runs.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .map(|(field, field_errors)| {
            let reasons = field_errors
                .iter()
                .map(|err| match err.message.as_deref() {
                    Some(message) => message.to_string(),
                    None => err.code.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{field}: {reasons}")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl CreateSubscriptionRequest {
    /// Runs every field rule and folds the failures into one error.
    pub fn check(&self) -> SubscriptionResult<()> {
        self.validate()
            .map_err(|errors| SubscriptionError::ValidationFailed(describe(&errors)))
    }

    /// Translates the wire strings into calendar months. Date failures are
    /// reported as `InvalidDateFormat`, separate from field validation.
    pub fn to_draft(&self) -> SubscriptionResult<SubscriptionDraft> {
        let user_id = self
            .user_id
            .ok_or_else(|| SubscriptionError::ValidationFailed("user_id: is required".into()))?;
        let price = self
            .price
            .ok_or_else(|| SubscriptionError::ValidationFailed("price: is required".into()))?;
        let start_date = self
            .start_date
            .as_deref()
            .ok_or_else(|| SubscriptionError::InvalidDateFormat(String::new()))
            .and_then(MonthYear::parse)?;
        let end_date = self.end_date.as_deref().map(MonthYear::parse).transpose()?;

        Ok(SubscriptionDraft {
            user_id,
            service_name: self.service_name.clone(),
            price,
            start_date,
            end_date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl From<SubscriptionModel> for SubscriptionResponse {
    fn from(value: SubscriptionModel) -> Self {
        Self {
            id: value.id,
            service_name: value.service_name,
            price: value.price,
            user_id: value.user_id,
            start_date: value.start_date.to_string(),
            end_date: value.end_date.map(|end| end.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total: i64,
}
