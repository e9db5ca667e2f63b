use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    ValidationFailed(String),
    #[error("invalid date format: {0:?}, expected MM-YYYY")]
    InvalidDateFormat(String),
    #[error("price must be >= 0")]
    InvalidPrice,
    #[error("end_date cannot be before start_date")]
    InvalidDateRange,
    #[error("invalid aggregation period")]
    InvalidPeriod,
    #[error("from and to are required")]
    MissingPeriod,
    #[error("invalid {bound} date: {value:?}, expected MM-YYYY")]
    InvalidPeriodBound { bound: &'static str, value: String },
    #[error("invalid {0}")]
    InvalidIdentifier(&'static str),
    #[error("invalid request body")]
    InvalidBody,
    #[error("invalid query parameters")]
    InvalidQuery,
    #[error("subscription not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl SubscriptionError {
    /// True for everything detected before storage is touched.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::NotFound | Self::Storage(_))
    }
}

pub type SubscriptionResult<T> = std::result::Result<T, SubscriptionError>;
