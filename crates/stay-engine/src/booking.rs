//! Bookings, apartments and the booking status machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::range::DateRange;

/// Opaque booking identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub String);

/// Opaque apartment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApartmentId(pub String);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ApartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for ApartmentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle of a booking.
///
/// ```text
/// pending ──► confirmed ──► cancelled
///    └──────────────────────────▲
/// ```
///
/// Every booking starts `Pending`. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
    ];

    /// Statuses reachable in one step from `self`.
    pub fn allowed_transitions(self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed => &[BookingStatus::Cancelled],
            BookingStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Validate a move to `next`, failing with [`EngineError::InvalidTransition`].
    pub fn transition_to(self, next: BookingStatus) -> Result<BookingStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(EngineError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status: '{}'", other)),
        }
    }
}

/// Contact details a guest supplies with a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl GuestInfo {
    /// Trim and validate guest details. All three fields are required.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self> {
        let info = Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            phone: phone.into().trim().to_string(),
        };
        info.validate()?;
        Ok(info)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidGuestInfo("name is required".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(EngineError::InvalidGuestInfo("email is required".to_string()));
        }
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => {
                return Err(EngineError::InvalidGuestInfo(format!(
                    "'{}' is not an email address",
                    self.email
                )))
            }
        }
        if self.phone.trim().is_empty() {
            return Err(EngineError::InvalidGuestInfo("phone is required".to_string()));
        }
        Ok(())
    }
}

/// A rentable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: ApartmentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Nightly rate in minor currency units.
    pub price_per_night: u64,
    pub max_guests: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub apartment_id: ApartmentId,
    pub guest: GuestInfo,
    #[serde(flatten)]
    pub range: DateRange,
    pub num_guests: u32,
    pub status: BookingStatus,
}

/// The fields of a booking before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub apartment_id: ApartmentId,
    pub guest: GuestInfo,
    pub range: DateRange,
    pub num_guests: u32,
    pub status: BookingStatus,
}

impl NewBooking {
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            apartment_id: self.apartment_id,
            guest: self.guest,
            range: self.range,
            num_guests: self.num_guests,
            status: self.status,
        }
    }
}
