//! Stay quotes.

use serde::Serialize;

use crate::availability::validate_guest_count;
use crate::booking::Apartment;
use crate::error::{EngineError, Result};
use crate::range::DateRange;

/// Price breakdown for a stay, in the apartment's minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub nights: u64,
    pub price_per_night: u64,
    pub total: u64,
}

/// Quote a stay at `apartment` for `guests` people.
///
/// A same-day range is charged as one night.
pub fn quote(apartment: &Apartment, range: &DateRange, guests: u32) -> Result<Quote> {
    validate_guest_count(guests, apartment.max_guests)?;

    let nights = u64::try_from(range.nights().max(1))
        .map_err(|_| EngineError::InvalidQuote(format!("bad night count for {}", range)))?;
    let total = nights
        .checked_mul(apartment.price_per_night)
        .ok_or_else(|| EngineError::InvalidQuote("total price overflows".to_string()))?;

    Ok(Quote {
        nights,
        price_per_night: apartment.price_per_night,
        total,
    })
}
