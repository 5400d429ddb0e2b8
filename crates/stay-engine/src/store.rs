//! Persistence boundary.
//!
//! The engine never owns booking data. [`BookingStore`] is the contract a
//! backend must meet; [`MemoryStore`] is a complete in-process implementation
//! used by the CLI (serialized to a JSON file) and by tests.
//!
//! Two concurrent requests for overlapping dates can both pass the engine's
//! conflict check against the same snapshot. A store must therefore refuse to
//! persist overlapping occupying bookings for one apartment itself, the way a
//! database exclusion constraint over (apartment, date range) would.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::booking::{Apartment, ApartmentId, Booking, BookingId, BookingStatus, NewBooking};
use crate::conflict::ranges_conflict;
use crate::policy::AvailabilityPolicy;

/// Errors reported by a storage backend. Passed through the engine as
/// [`crate::EngineError::Persistence`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The write would break the store's exclusion constraint.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// What the booking workflow needs from persistence.
pub trait BookingStore {
    /// Bookings for `apartment` whose status is one of `statuses`.
    fn fetch_bookings(
        &self,
        apartment: &ApartmentId,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError>;

    fn fetch_booking(&self, id: &BookingId) -> Result<Option<Booking>, StoreError>;

    /// Every booking, newest first.
    fn list_bookings(&self) -> Result<Vec<Booking>, StoreError>;

    fn fetch_apartment(&self, id: &ApartmentId) -> Result<Option<Apartment>, StoreError>;

    fn insert_booking(&mut self, booking: NewBooking) -> Result<BookingId, StoreError>;

    fn update_booking_status(
        &mut self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<(), StoreError>;
}

/// In-memory store with an exclusion constraint on occupying bookings.
///
/// Bookings are kept in insertion order; ids are sequential (`bk-000001`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    apartments: Vec<Apartment>,
    #[serde(default)]
    bookings: Vec<Booking>,
    #[serde(default)]
    next_id: u64,
    /// Statuses and boundary the exclusion constraint enforces.
    #[serde(skip)]
    exclusion: AvailabilityPolicy,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce the exclusion constraint with `policy` instead of the default.
    pub fn with_exclusion(mut self, policy: AvailabilityPolicy) -> Self {
        self.exclusion = policy;
        self
    }

    pub fn set_exclusion(&mut self, policy: AvailabilityPolicy) {
        self.exclusion = policy;
    }

    pub fn add_apartment(&mut self, apartment: Apartment) {
        self.apartments.retain(|a| a.id != apartment.id);
        self.apartments.push(apartment);
    }

    pub fn apartments(&self) -> &[Apartment] {
        &self.apartments
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Load a snapshot. A missing or stale `next_id` is raised past every
    /// stored sequential id.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let mut store: Self =
            serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let highest = store
            .bookings
            .iter()
            .filter_map(|b| sequence_number(&b.id))
            .max()
            .unwrap_or(0);
        store.next_id = store.next_id.max(highest);
        Ok(store)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Next sequential id not held by any stored booking.
    fn fresh_id(&self) -> (u64, BookingId) {
        let mut n = self.next_id + 1;
        loop {
            let id = BookingId(format!("bk-{:06}", n));
            if !self.bookings.iter().any(|b| b.id == id) {
                return (n, id);
            }
            n += 1;
        }
    }

    /// Reject `candidate` if it would overlap another occupying booking.
    fn check_exclusion(&self, candidate: &Booking) -> Result<(), StoreError> {
        if !self.exclusion.occupancy.qualifies(candidate.status) {
            return Ok(());
        }
        let clash = self.bookings.iter().find(|b| {
            b.id != candidate.id
                && b.apartment_id == candidate.apartment_id
                && self.exclusion.occupancy.qualifies(b.status)
                && ranges_conflict(&candidate.range, &b.range, self.exclusion.boundary)
        });
        match clash {
            Some(existing) => Err(StoreError::Constraint(format!(
                "{} overlaps booking {} ({}) for apartment {}",
                candidate.range, existing.id, existing.range, candidate.apartment_id
            ))),
            None => Ok(()),
        }
    }
}

impl BookingStore for MemoryStore {
    fn fetch_bookings(
        &self,
        apartment: &ApartmentId,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| &b.apartment_id == apartment && statuses.contains(&b.status))
            .cloned()
            .collect())
    }

    fn fetch_booking(&self, id: &BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.iter().find(|b| &b.id == id).cloned())
    }

    fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.bookings.iter().rev().cloned().collect())
    }

    fn fetch_apartment(&self, id: &ApartmentId) -> Result<Option<Apartment>, StoreError> {
        Ok(self.apartments.iter().find(|a| &a.id == id).cloned())
    }

    fn insert_booking(&mut self, booking: NewBooking) -> Result<BookingId, StoreError> {
        if !self.apartments.iter().any(|a| a.id == booking.apartment_id) {
            return Err(StoreError::NotFound(format!(
                "apartment {}",
                booking.apartment_id
            )));
        }

        let (n, id) = self.fresh_id();
        let booking = booking.into_booking(id.clone());
        self.check_exclusion(&booking)?;

        self.next_id = n;
        self.bookings.push(booking);
        Ok(id)
    }

    fn update_booking_status(
        &mut self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<(), StoreError> {
        let index = self
            .bookings
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("booking {}", id)))?;

        let mut updated = self.bookings[index].clone();
        updated.status = status;
        self.check_exclusion(&updated)?;

        self.bookings[index] = updated;
        Ok(())
    }
}

/// Numeric part of a `bk-NNNNNN` id.
fn sequence_number(id: &BookingId) -> Option<u64> {
    id.0.strip_prefix("bk-")?.parse().ok()
}
