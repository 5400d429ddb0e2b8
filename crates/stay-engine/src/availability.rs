//! Blocked-date expansion and guest-count checks.
//!
//! The blocked-date set is what a date picker disables: every day of every
//! qualifying booking, start and end included. It is recomputed from the
//! booking list on every call and never stored.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::booking::Booking;
use crate::error::{EngineError, Result};
use crate::policy::AvailabilityPolicy;

/// Expand qualifying bookings into the set of individual blocked days.
///
/// Overlapping bookings collapse into one set. The result does not depend on
/// the order of `bookings`.
pub fn expand_blocked_dates(
    bookings: &[Booking],
    policy: &AvailabilityPolicy,
) -> BTreeSet<NaiveDate> {
    bookings
        .iter()
        .filter(|b| policy.occupancy.qualifies(b.status))
        .flat_map(|b| b.range.iter_days())
        .collect()
}

/// Check a requested party size against an apartment's capacity.
///
/// # Errors
/// Returns [`EngineError::NoGuests`] for zero guests and
/// [`EngineError::GuestCountExceeded`] when `requested > max`.
pub fn validate_guest_count(requested: u32, max: u32) -> Result<()> {
    if requested == 0 {
        return Err(EngineError::NoGuests);
    }
    if requested > max {
        return Err(EngineError::GuestCountExceeded { requested, max });
    }
    Ok(())
}
