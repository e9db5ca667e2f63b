pub mod aggregation;
pub mod filters;
pub mod month_year;
pub mod subscriptions;
