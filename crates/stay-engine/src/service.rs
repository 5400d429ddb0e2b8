//! Booking workflow: guest requests and administrator status changes.
//!
//! [`BookingService`] composes the pure availability checks with a
//! [`BookingStore`]. Every precondition runs before the store is written to,
//! and the first failing one short-circuits the request.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::availability::{expand_blocked_dates, validate_guest_count};
use crate::booking::{
    Apartment, ApartmentId, Booking, BookingId, BookingStatus, GuestInfo, NewBooking,
};
use crate::calendar::{self, DayBooking, MonthView};
use crate::conflict::{find_conflicts, Conflict};
use crate::error::{EngineError, Result};
use crate::policy::AvailabilityPolicy;
use crate::pricing::{self, Quote};
use crate::range::DateRange;
use crate::store::{BookingStore, StoreError};

/// A guest's booking request, before it is checked or stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub apartment_id: ApartmentId,
    pub guest: GuestInfo,
    pub range: DateRange,
    pub guests: u32,
}

impl BookingRequest {
    /// Build a request from raw check-in and check-out dates.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidRange`] if `start > end`.
    pub fn new(
        apartment_id: ApartmentId,
        guest: GuestInfo,
        start: NaiveDate,
        end: NaiveDate,
        guests: u32,
    ) -> Result<Self> {
        Ok(Self {
            apartment_id,
            guest,
            range: DateRange::new(start, end)?,
            guests,
        })
    }
}

/// Booking workflow over a store.
#[derive(Debug)]
pub struct BookingService<S> {
    store: S,
    policy: AvailabilityPolicy,
    today: Option<NaiveDate>,
}

impl<S: BookingStore> BookingService<S> {
    pub fn new(store: S, policy: AvailabilityPolicy) -> Self {
        Self {
            store,
            policy,
            today: None,
        }
    }

    /// Reject requests that start before `today`.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn policy(&self) -> &AvailabilityPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Check and persist a guest's request as a pending booking.
    ///
    /// # Errors
    /// In evaluation order: [`EngineError::InvalidGuestInfo`],
    /// [`EngineError::StartInPast`], [`EngineError::ApartmentNotFound`],
    /// [`EngineError::NoGuests`] / [`EngineError::GuestCountExceeded`],
    /// [`EngineError::DateConflict`], then [`EngineError::Persistence`] from the
    /// insert itself.
    pub fn create_booking_request(&mut self, request: &BookingRequest) -> Result<BookingId> {
        debug!(
            apartment = %request.apartment_id,
            range = %request.range,
            guests = request.guests,
            "evaluating booking request"
        );

        let outcome = self.check_request(request);
        let existing = match outcome {
            Ok(existing) => existing,
            Err(err) => {
                warn!(
                    apartment = %request.apartment_id,
                    code = err.code(),
                    "booking request rejected: {}",
                    err
                );
                return Err(err);
            }
        };

        let conflicts = find_conflicts(&request.range, &existing, &self.policy);
        if !conflicts.is_empty() {
            let err = EngineError::DateConflict {
                conflicting: conflicts.into_iter().map(|c| c.booking.id).collect(),
            };
            warn!(
                apartment = %request.apartment_id,
                range = %request.range,
                "booking request rejected: {}",
                err
            );
            return Err(err);
        }

        let id = persist(
            "insert booking",
            self.store.insert_booking(NewBooking {
                apartment_id: request.apartment_id.clone(),
                guest: request.guest.clone(),
                range: request.range,
                num_guests: request.guests,
                status: BookingStatus::Pending,
            }),
        )?;

        info!(
            booking = %id,
            apartment = %request.apartment_id,
            range = %request.range,
            "booking request stored"
        );
        Ok(id)
    }

    /// Run every precondition that does not need the conflict scan and return
    /// the occupying bookings to scan against.
    fn check_request(&self, request: &BookingRequest) -> Result<Vec<Booking>> {
        request.guest.validate()?;

        if let Some(today) = self.today {
            if request.range.start() < today {
                return Err(EngineError::StartInPast {
                    start: request.range.start(),
                    today,
                });
            }
        }

        let apartment = self.apartment(&request.apartment_id)?;
        validate_guest_count(request.guests, apartment.max_guests)?;

        self.occupying_bookings(&request.apartment_id)
    }

    /// Move a booking to `new_status`.
    ///
    /// Confirming re-checks the stay against the apartment's other occupying
    /// bookings, since the request was only checked against the calendar as it
    /// stood at submission.
    ///
    /// # Errors
    /// [`EngineError::BookingNotFound`], [`EngineError::InvalidTransition`],
    /// [`EngineError::DateConflict`] or [`EngineError::Persistence`].
    pub fn transition_booking_status(
        &mut self,
        id: &BookingId,
        new_status: BookingStatus,
    ) -> Result<()> {
        let booking = persist("fetch booking", self.store.fetch_booking(id))?
            .ok_or_else(|| EngineError::BookingNotFound(id.clone()))?;

        if let Err(err) = booking.status.transition_to(new_status) {
            warn!(booking = %id, "status change rejected: {}", err);
            return Err(err);
        }

        if new_status == BookingStatus::Confirmed {
            let others: Vec<Booking> = self
                .occupying_bookings(&booking.apartment_id)?
                .into_iter()
                .filter(|b| b.id != booking.id)
                .collect();
            let conflicts = find_conflicts(&booking.range, &others, &self.policy);
            if !conflicts.is_empty() {
                let err = EngineError::DateConflict {
                    conflicting: conflicts.into_iter().map(|c| c.booking.id).collect(),
                };
                warn!(booking = %id, "confirmation rejected: {}", err);
                return Err(err);
            }
        }

        persist(
            "update booking status",
            self.store.update_booking_status(id, new_status),
        )?;
        info!(booking = %id, from = %booking.status, to = %new_status, "booking status changed");
        Ok(())
    }

    pub fn confirm(&mut self, id: &BookingId) -> Result<()> {
        self.transition_booking_status(id, BookingStatus::Confirmed)
    }

    pub fn cancel(&mut self, id: &BookingId) -> Result<()> {
        self.transition_booking_status(id, BookingStatus::Cancelled)
    }

    /// All bookings, newest first.
    pub fn list_bookings(&self) -> Result<Vec<Booking>> {
        persist("list bookings", self.store.list_bookings())
    }

    /// Days a date picker for `apartment` must disable.
    pub fn blocked_dates(&self, apartment: &ApartmentId) -> Result<BTreeSet<NaiveDate>> {
        self.apartment(apartment)?;
        let bookings = self.occupying_bookings(apartment)?;
        Ok(expand_blocked_dates(&bookings, &self.policy))
    }

    /// Occupying bookings that `range` would clash with. Empty means available.
    pub fn check_availability(
        &self,
        apartment: &ApartmentId,
        range: &DateRange,
    ) -> Result<Vec<Conflict>> {
        self.apartment(apartment)?;
        let bookings = self.occupying_bookings(apartment)?;
        Ok(find_conflicts(range, &bookings, &self.policy))
    }

    pub fn month_view(&self, apartment: &ApartmentId, year: i32, month: u32) -> Result<MonthView> {
        self.apartment(apartment)?;
        let bookings = self.occupying_bookings(apartment)?;
        calendar::month_view(year, month, &bookings, &self.policy)
    }

    /// Month view across every apartment, for the admin calendar.
    pub fn overview_month(&self, year: i32, month: u32) -> Result<MonthView> {
        let bookings = self.all_occupying_bookings()?;
        calendar::month_view(year, month, &bookings, &self.policy)
    }

    /// Occupying bookings of any apartment that cover `date`, oldest first.
    pub fn bookings_on(&self, date: NaiveDate) -> Result<Vec<DayBooking>> {
        let bookings = self.all_occupying_bookings()?;
        calendar::bookings_on(date, &bookings, &self.policy)
            .into_iter()
            .map(|booking| {
                let apartment = self.store.fetch_apartment(&booking.apartment_id);
                let apartment_name = persist("fetch apartment", apartment)?
                    .map(|a| a.name)
                    .unwrap_or_else(|| booking.apartment_id.to_string());
                Ok(DayBooking {
                    booking,
                    apartment_name,
                })
            })
            .collect()
    }

    pub fn quote(&self, apartment: &ApartmentId, range: &DateRange, guests: u32) -> Result<Quote> {
        let apartment = self.apartment(apartment)?;
        pricing::quote(&apartment, range, guests)
    }

    fn apartment(&self, id: &ApartmentId) -> Result<Apartment> {
        persist("fetch apartment", self.store.fetch_apartment(id))?
            .ok_or_else(|| EngineError::ApartmentNotFound(id.clone()))
    }

    /// Occupying bookings of every apartment, oldest first.
    fn all_occupying_bookings(&self) -> Result<Vec<Booking>> {
        let mut bookings = persist("list bookings", self.store.list_bookings())?;
        bookings.retain(|b| self.policy.occupancy.qualifies(b.status));
        bookings.reverse();
        Ok(bookings)
    }

    fn occupying_bookings(&self, apartment: &ApartmentId) -> Result<Vec<Booking>> {
        persist(
            "fetch bookings",
            self.store
                .fetch_bookings(apartment, self.policy.occupancy.qualifying_statuses()),
        )
    }
}

/// Log a store failure and lift it into [`EngineError::Persistence`].
fn persist<T>(operation: &str, result: std::result::Result<T, StoreError>) -> Result<T> {
    result.map_err(|err| {
        error!(operation, "store failure: {}", err);
        EngineError::Persistence(err)
    })
}
