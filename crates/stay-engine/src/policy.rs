//! Conflict policy: which bookings occupy the calendar, and whether a
//! checkout day may be another guest's check-in day.

use serde::{Deserialize, Serialize};

use crate::booking::BookingStatus;

/// How shared endpoint days are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Any shared day is a clash, including checkout day == check-in day.
    #[default]
    Inclusive,
    /// A stay may begin on the day another ends (and end on the day another begins).
    SameDayTurnover,
}

/// Which booking statuses occupy the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyPolicy {
    #[default]
    ConfirmedOnly,
    /// Pending requests hold their dates too.
    ConfirmedAndPending,
}

impl OccupancyPolicy {
    pub fn qualifying_statuses(self) -> &'static [BookingStatus] {
        match self {
            OccupancyPolicy::ConfirmedOnly => &[BookingStatus::Confirmed],
            OccupancyPolicy::ConfirmedAndPending => {
                &[BookingStatus::Confirmed, BookingStatus::Pending]
            }
        }
    }

    pub fn qualifies(self, status: BookingStatus) -> bool {
        self.qualifying_statuses().contains(&status)
    }
}

/// The full policy handed to every availability operation.
///
/// Deserializes from configuration with every field optional:
///
/// ```toml
/// boundary = "same_day_turnover"
/// occupancy = "confirmed_and_pending"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityPolicy {
    pub boundary: BoundaryPolicy,
    pub occupancy: OccupancyPolicy,
}

impl AvailabilityPolicy {
    pub fn new(boundary: BoundaryPolicy, occupancy: OccupancyPolicy) -> Self {
        Self {
            boundary,
            occupancy,
        }
    }
}
