//! Shared domain models.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned to a reservation when it is booked.
pub type BookingId = u64;

/// Physical room number as printed on the door.
pub type RoomNumber = u32;

/// Closed set of room categories offered by the hotel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomCategory {
    /// Entry tier.
    Standard,
    /// Mid tier.
    Deluxe,
    /// Top tier.
    Suite,
}

impl RoomCategory {
    /// Every category in display order.
    pub const ALL: [RoomCategory; 3] = [
        RoomCategory::Standard,
        RoomCategory::Deluxe,
        RoomCategory::Suite,
    ];

    /// Canonical label used in listings and in the persisted file.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomCategory::Standard => "Standard",
            RoomCategory::Deluxe => "Deluxe",
            RoomCategory::Suite => "Suite",
        }
    }

    /// Case-insensitive comparison against user input. Surrounding
    /// whitespace is not ignored.
    pub fn matches(&self, query: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(query)
    }

    /// Fixed price charged when a room of this category is booked.
    pub fn price(&self) -> f64 {
        tier_price(self.as_str())
    }
}

impl fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown room category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for RoomCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomCategory::ALL
            .into_iter()
            .find(|category| category.matches(s.trim()))
            .ok_or_else(|| UnknownCategory(s.trim().to_string()))
    }
}

/// Price tier lookup by category label, case-sensitive. Deluxe and Suite
/// carry a premium, everything else is charged the base rate.
pub fn tier_price(label: &str) -> f64 {
    match label {
        "Deluxe" => 150.0,
        "Suite" => 250.0,
        _ => 100.0,
    }
}

/// A bookable room in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    number: RoomNumber,
    category: RoomCategory,
    /// Whether the room is free to book.
    pub available: bool,
}

impl Room {
    /// Create a room that starts out available.
    pub fn new(number: RoomNumber, category: RoomCategory) -> Self {
        Self {
            number,
            category,
            available: true,
        }
    }

    /// Room number; fixed for the lifetime of the room.
    pub fn number(&self) -> RoomNumber {
        self.number
    }

    /// Category of the room.
    pub fn category(&self) -> RoomCategory {
        self.category
    }
}

/// Link from a reservation to the room backing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomRef {
    /// Room present in the registry; details are resolved on demand.
    Registered(RoomNumber),
    /// Room number read from a file that the registry does not know about.
    /// The category text is kept so the record survives the next save.
    Missing {
        /// Room number as read from the file.
        number: RoomNumber,
        /// Category text as read from the file.
        category: String,
    },
}

impl RoomRef {
    /// Room number carried by the link, resolved or not.
    pub fn number(&self) -> RoomNumber {
        match self {
            RoomRef::Registered(number) => *number,
            RoomRef::Missing { number, .. } => *number,
        }
    }

    /// Whether the link points at a registered room.
    pub fn is_registered(&self) -> bool {
        matches!(self, RoomRef::Registered(_))
    }
}

/// An active booking held by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique identifier.
    pub booking_id: BookingId,
    /// Name of the guest holding the booking.
    pub guest_name: String,
    /// Room backing the booking.
    pub room: RoomRef,
    /// Amount charged at booking time.
    pub amount_paid: f64,
}

impl Reservation {
    /// Room number backing the booking.
    pub fn room_number(&self) -> RoomNumber {
        self.room.number()
    }
}

/// Render an amount the way the persisted file and listings expect:
/// whole values keep one decimal place (`100.0`).
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.is_finite() {
        format!("{amount:.1}")
    } else {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parsing_ignores_case_and_padding() {
        assert_eq!("deluxe".parse::<RoomCategory>(), Ok(RoomCategory::Deluxe));
        assert_eq!(" SUITE ".parse::<RoomCategory>(), Ok(RoomCategory::Suite));
        assert_eq!(
            "Penthouse".parse::<RoomCategory>(),
            Err(UnknownCategory("Penthouse".to_string()))
        );
    }

    #[test]
    fn matching_ignores_case_but_not_padding() {
        assert!(RoomCategory::Deluxe.matches("dElUxE"));
        assert!(!RoomCategory::Deluxe.matches(" Deluxe "));
    }

    #[test]
    fn price_tiers() {
        assert_eq!(RoomCategory::Standard.price(), 100.0);
        assert_eq!(RoomCategory::Deluxe.price(), 150.0);
        assert_eq!(RoomCategory::Suite.price(), 250.0);
        assert_eq!(tier_price("Penthouse"), 100.0);
        assert_eq!(tier_price("deluxe"), 100.0);
    }

    #[test]
    fn amounts_keep_a_decimal_place() {
        assert_eq!(format_amount(100.0), "100.0");
        assert_eq!(format_amount(99.5), "99.5");
        assert_eq!(format_amount(0.0), "0.0");
    }
}
