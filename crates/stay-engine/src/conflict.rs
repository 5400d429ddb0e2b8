//! Detect clashes between a candidate stay and existing bookings.
//!
//! A candidate conflicts with an existing booking when its first day falls
//! inside the booking, its last day falls inside the booking, or it swallows
//! the booking whole. Under [`BoundaryPolicy::SameDayTurnover`] the candidate
//! may start on the booking's last day or end on its first day.

use crate::booking::Booking;
use crate::policy::{AvailabilityPolicy, BoundaryPolicy};
use crate::range::DateRange;

/// A detected clash between the candidate and one existing booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub booking: Booking,
    /// Days the two ranges share, counting both ends.
    pub overlap_days: i64,
}

/// Whether `candidate` clashes with `existing` under `boundary`.
///
/// Bookings are not filtered by status here; see [`find_conflicts`].
pub fn ranges_conflict(
    candidate: &DateRange,
    existing: &DateRange,
    boundary: BoundaryPolicy,
) -> bool {
    let (c_start, c_end) = (candidate.start(), candidate.end());
    let (e_start, e_end) = (existing.start(), existing.end());

    let inclusive = (e_start <= c_start && c_start <= e_end)
        || (e_start <= c_end && c_end <= e_end)
        || (c_start <= e_start && c_end >= e_end);

    match boundary {
        BoundaryPolicy::Inclusive => inclusive,
        // Touching at a single turnover day is fine; any deeper overlap is not.
        BoundaryPolicy::SameDayTurnover => inclusive && c_start < e_end && e_start < c_end,
    }
}

/// Find every qualifying booking that `candidate` clashes with.
///
/// Bookings whose status does not occupy the calendar under `policy` are
/// skipped. Results keep the order of `existing`.
pub fn find_conflicts(
    candidate: &DateRange,
    existing: &[Booking],
    policy: &AvailabilityPolicy,
) -> Vec<Conflict> {
    existing
        .iter()
        .filter(|b| policy.occupancy.qualifies(b.status))
        .filter(|b| ranges_conflict(candidate, &b.range, policy.boundary))
        .map(|b| Conflict {
            booking: b.clone(),
            overlap_days: candidate
                .intersection(&b.range)
                .map(|shared| shared.days())
                .unwrap_or(0),
        })
        .collect()
}

/// True if `candidate` clashes with any qualifying booking in `existing`.
pub fn has_conflict(
    candidate: &DateRange,
    existing: &[Booking],
    policy: &AvailabilityPolicy,
) -> bool {
    existing.iter().any(|b| {
        policy.occupancy.qualifies(b.status)
            && ranges_conflict(candidate, &b.range, policy.boundary)
    })
}
