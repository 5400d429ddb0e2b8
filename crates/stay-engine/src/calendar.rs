//! Calendar views over a booking list.
//!
//! Sorts qualifying bookings, merges their ranges into non-overlapping blocked
//! spans, and derives the free windows and per-day occupancy an admin calendar
//! renders. Everything here works at day granularity.

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use crate::booking::{Booking, BookingId};
use crate::error::{EngineError, Result};
use crate::policy::AvailabilityPolicy;
use crate::range::DateRange;

/// One day of a month view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Qualifying bookings covering this day, in input order.
    pub bookings: Vec<BookingId>,
}

impl CalendarDay {
    pub fn is_booked(&self) -> bool {
        !self.bookings.is_empty()
    }
}

/// A booking covering a selected day, labelled for the admin list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBooking {
    pub booking: Booking,
    pub apartment_name: String,
}

/// Every day of one calendar month with its bookings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthView {
    pub fn booked_days(&self) -> usize {
        self.days.iter().filter(|d| d.is_booked()).count()
    }
}

/// True if any qualifying booking covers `date`.
pub fn is_booked(date: NaiveDate, bookings: &[Booking], policy: &AvailabilityPolicy) -> bool {
    bookings
        .iter()
        .any(|b| policy.occupancy.qualifies(b.status) && b.range.contains(date))
}

/// Qualifying bookings covering `date`, in input order.
pub fn bookings_on(
    date: NaiveDate,
    bookings: &[Booking],
    policy: &AvailabilityPolicy,
) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|b| policy.occupancy.qualifies(b.status) && b.range.contains(date))
        .cloned()
        .collect()
}

/// Build the occupancy view for `year`-`month`.
///
/// # Errors
/// Returns [`EngineError::InvalidMonth`] if the month does not exist.
pub fn month_view(
    year: i32,
    month: u32,
    bookings: &[Booking],
    policy: &AvailabilityPolicy,
) -> Result<MonthView> {
    let range = month_range(year, month)?;

    let days = range
        .iter_days()
        .map(|date| CalendarDay {
            date,
            bookings: bookings
                .iter()
                .filter(|b| policy.occupancy.qualifies(b.status) && b.range.contains(date))
                .map(|b| b.id.clone())
                .collect(),
        })
        .collect();

    Ok(MonthView { year, month, days })
}

/// The first-to-last-day range of a calendar month.
pub fn month_range(year: i32, month: u32) -> Result<DateRange> {
    let invalid = || EngineError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = first
        .checked_add_months(Months::new(1))
        .ok_or_else(invalid)?;
    let last = next_first
        .checked_sub_days(Days::new(1))
        .ok_or_else(invalid)?;
    DateRange::new(first, last)
}

/// Merge qualifying bookings into sorted, non-overlapping blocked ranges.
///
/// Ranges that overlap or sit on consecutive days join into one.
pub fn merge_blocked_ranges(bookings: &[Booking], policy: &AvailabilityPolicy) -> Vec<DateRange> {
    let mut ranges: Vec<DateRange> = bookings
        .iter()
        .filter(|b| policy.occupancy.qualifies(b.status))
        .map(|b| b.range)
        .collect();

    ranges.sort();

    let mut merged: Vec<DateRange> = Vec::new();
    for range in ranges {
        if let Some(last) = merged.last_mut() {
            let touches = match last.day_after() {
                Some(next) => range.start() <= next,
                None => true,
            };
            if touches {
                *last = last.span(&range);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}

/// Days inside `window` not covered by any qualifying booking, as ranges.
pub fn free_windows(
    bookings: &[Booking],
    window: &DateRange,
    policy: &AvailabilityPolicy,
) -> Vec<DateRange> {
    let mut free = Vec::new();
    let mut cursor = Some(window.start());

    for blocked in merge_blocked_ranges(bookings, policy)
        .iter()
        .filter_map(|r| r.intersection(window))
    {
        let Some(from) = cursor else { break };
        if from < blocked.start() {
            if let Some(until) = blocked.start().pred_opt() {
                if let Ok(gap) = DateRange::new(from, until) {
                    free.push(gap);
                }
            }
        }
        if from <= blocked.end() {
            cursor = blocked.day_after();
        }
    }

    // Trailing window after the last blocked span.
    if let Some(from) = cursor {
        if let Ok(gap) = DateRange::new(from, window.end()) {
            free.push(gap);
        }
    }

    free
}
