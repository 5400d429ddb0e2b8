//! # stay-engine
//!
//! Availability and booking workflow core for a short-stay rental admin.
//!
//! Guests submit booking requests for an apartment; administrators confirm or
//! cancel them. The engine decides whether a requested stay collides with the
//! bookings already on the calendar, expands bookings into the individual days
//! a date picker must disable, and drives the booking status state machine.
//! Persistence is reached through the [`store::BookingStore`] trait.
//!
//! ## Modules
//!
//! - [`range`] — Inclusive calendar date ranges
//! - [`booking`] — Bookings, apartments, guest details and the status machine
//! - [`policy`] — Boundary and occupancy policy (what counts as a clash)
//! - [`conflict`] — Detect overlaps between a candidate stay and existing bookings
//! - [`availability`] — Blocked-date expansion and guest-count checks
//! - [`calendar`] — Month views, per-day listings, merged blocked ranges and free windows
//! - [`pricing`] — Stay quotes
//! - [`store`] — Persistence trait and an in-memory store
//! - [`service`] — Booking request and status transition workflow
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod conflict;
pub mod error;
pub mod policy;
pub mod pricing;
pub mod range;
pub mod service;
pub mod store;

pub use availability::{expand_blocked_dates, validate_guest_count};
pub use booking::{Apartment, ApartmentId, Booking, BookingId, BookingStatus, GuestInfo};
pub use calendar::{DayBooking, MonthView};
pub use conflict::{find_conflicts, has_conflict, Conflict};
pub use error::{EngineError, Result};
pub use policy::{AvailabilityPolicy, BoundaryPolicy, OccupancyPolicy};
pub use range::DateRange;
pub use service::{BookingRequest, BookingService};
pub use store::{BookingStore, MemoryStore, StoreError};
