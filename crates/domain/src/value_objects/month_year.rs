use chrono::{Datelike, NaiveDate};
use std::fmt::Display;

use crate::errors::SubscriptionError;

/// A calendar month. Always stored as the first day of that month so that
/// parse/format round-trips stay exact at month granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Parses the strict `MM-YYYY` form: two-digit month 01-12, a dash, a
    /// four-digit year. Anything else, ISO dates included, is rejected.
    pub fn parse(raw: &str) -> Result<Self, SubscriptionError> {
        let invalid = || SubscriptionError::InvalidDateFormat(raw.to_string());

        let bytes = raw.as_bytes();
        if bytes.len() != 7 || bytes[2] != b'-' {
            return Err(invalid());
        }
        if !bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let month: u32 = raw[..2].parse().map_err(|_| invalid())?;
        let year: i32 = raw[3..].parse().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(value: NaiveDate) -> Self {
        Self(value.with_day(1).unwrap_or(value))
    }
}

impl Display for MonthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:04}", self.0.month(), self.0.year())
    }
}
