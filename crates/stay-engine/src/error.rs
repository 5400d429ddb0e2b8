//! Error types for stay-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::booking::{ApartmentId, BookingId, BookingStatus};
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Guest count {requested} exceeds the maximum of {max}")]
    GuestCountExceeded { requested: u32, max: u32 },

    #[error("A booking needs at least one guest")]
    NoGuests,

    #[error("Requested dates conflict with {} existing booking(s)", .conflicting.len())]
    DateConflict { conflicting: Vec<BookingId> },

    #[error("Cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    #[error("Apartment not found: {0}")]
    ApartmentNotFound(ApartmentId),

    #[error("Invalid guest details: {0}")]
    InvalidGuestInfo(String),

    #[error("Stay starts on {start}, before {today}")]
    StartInPast { start: NaiveDate, today: NaiveDate },

    #[error("Invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl EngineError {
    /// Stable machine-readable code, for callers that localize messages themselves.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidRange { .. } => "invalid_range",
            EngineError::GuestCountExceeded { .. } => "guest_count_exceeded",
            EngineError::NoGuests => "no_guests",
            EngineError::DateConflict { .. } => "date_conflict",
            EngineError::InvalidTransition { .. } => "invalid_transition",
            EngineError::BookingNotFound(_) => "booking_not_found",
            EngineError::ApartmentNotFound(_) => "apartment_not_found",
            EngineError::InvalidGuestInfo(_) => "invalid_guest_info",
            EngineError::StartInPast { .. } => "start_in_past",
            EngineError::InvalidMonth { .. } => "invalid_month",
            EngineError::InvalidQuote(_) => "invalid_quote",
            EngineError::Persistence(_) => "persistence_failure",
        }
    }

    /// Message suitable for showing to a guest or administrator.
    ///
    /// Persistence failures are deliberately generic; the underlying error is
    /// logged where it happens.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::InvalidRange { .. } => "Select valid dates".to_string(),
            EngineError::GuestCountExceeded { max, .. } => {
                format!("The maximum number of guests is {}", max)
            }
            EngineError::DateConflict { .. } => {
                "The selected dates are not available".to_string()
            }
            EngineError::Persistence(_) => {
                "Something went wrong saving your request, please try again".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
