//! Booking service: the hotel context and the operations that mutate it.

use std::fmt;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::{
    error::HotelError,
    ledger::ReservationLedger,
    models::{format_amount, tier_price, BookingId, Reservation, Room, RoomNumber, RoomRef},
    registry::RoomRegistry,
};

/// Room inventory plus active reservations. Every booking operation goes
/// through this value; a room is unavailable exactly when a reservation in the
/// ledger holds it.
#[derive(Debug, Clone)]
pub struct Hotel {
    registry: RoomRegistry,
    ledger: ReservationLedger,
    next_booking_id: BookingId,
}

impl Default for Hotel {
    fn default() -> Self {
        Self::from_registry(RoomRegistry::default())
    }
}

impl Hotel {
    /// Hotel seeded with the default rooms and no reservations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hotel built over a custom room list.
    pub fn with_rooms(rooms: Vec<Room>) -> Result<Self> {
        Ok(Self::from_registry(RoomRegistry::from_rooms(rooms)?))
    }

    fn from_registry(registry: RoomRegistry) -> Self {
        Self {
            registry,
            ledger: ReservationLedger::default(),
            next_booking_id: 1,
        }
    }

    /// Read access to the room inventory.
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Read access to the reservation ledger.
    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    /// Id the next successful booking will receive.
    pub fn next_booking_id(&self) -> BookingId {
        self.next_booking_id
    }

    /// Numbers of the available rooms matching `category`, in registration
    /// order. An empty result is not an error.
    pub fn search_rooms(&self, category: &str) -> Vec<RoomNumber> {
        let found: Vec<_> = self
            .registry
            .available_matching(category)
            .map(Room::number)
            .collect();
        debug!(category, matches = found.len(), "Room search");
        found
    }

    /// Book the earliest-registered available room in `category`. The price
    /// follows the requested label, so only exact `Deluxe` and `Suite` carry
    /// a premium.
    pub fn book_room(
        &mut self,
        guest_name: &str,
        category: &str,
    ) -> Result<Reservation, HotelError> {
        let guest_name = guest_name.trim();
        if guest_name.is_empty() {
            return Err(HotelError::InvalidGuestName);
        }

        let following_id = self
            .next_booking_id
            .checked_add(1)
            .ok_or(HotelError::IdsExhausted)?;

        let room = self
            .registry
            .find_first_available_mut(category)
            .ok_or_else(|| HotelError::NoAvailability {
                category: category.to_string(),
            })?;
        room.available = false;

        let reservation = Reservation {
            booking_id: self.next_booking_id,
            guest_name: guest_name.to_string(),
            room: RoomRef::Registered(room.number()),
            amount_paid: tier_price(category),
        };
        self.next_booking_id = following_id;

        info!(
            booking_id = reservation.booking_id,
            guest = %reservation.guest_name,
            room = room.number(),
            paid = reservation.amount_paid,
            "Room booked"
        );
        self.ledger.push(reservation.clone());
        Ok(reservation)
    }

    /// Cancel the first reservation carrying `booking_id`, releasing its room.
    pub fn cancel_reservation(&mut self, booking_id: BookingId) -> Result<Reservation, HotelError> {
        let reservation = self
            .ledger
            .remove(booking_id)
            .ok_or(HotelError::BookingNotFound(booking_id))?;

        match &reservation.room {
            RoomRef::Registered(number) => {
                if let Some(room) = self.registry.find_by_number_mut(*number) {
                    room.available = true;
                }
            }
            RoomRef::Missing { number, .. } => {
                warn!(booking_id, room = number, "Cancelled booking had no registered room");
            }
        }

        info!(booking_id, room = reservation.room_number(), "Reservation cancelled");
        Ok(reservation)
    }

    /// Active reservations in insertion order.
    pub fn list_reservations(&self) -> &[Reservation] {
        self.ledger.entries()
    }

    /// Resolve the room backing a reservation.
    pub fn room_for(&self, reservation: &Reservation) -> Option<&Room> {
        match reservation.room {
            RoomRef::Registered(number) => self.registry.find_by_number(number),
            RoomRef::Missing { .. } => None,
        }
    }

    /// Display adapter combining a reservation with its resolved room.
    pub fn summary<'a>(&'a self, reservation: &'a Reservation) -> ReservationSummary<'a> {
        ReservationSummary {
            reservation,
            room: self.room_for(reservation),
        }
    }

    /// Whether availability flags agree with the ledger: each unavailable room
    /// is held by exactly one reservation and each held room is unavailable.
    pub fn is_consistent(&self) -> bool {
        self.registry.rooms().iter().all(|room| {
            let holders = self
                .ledger
                .entries()
                .iter()
                .filter(|entry| {
                    entry.room.is_registered() && entry.room_number() == room.number()
                })
                .count();
            if room.available {
                holders == 0
            } else {
                holders == 1
            }
        })
    }

    /// Swap in a freshly loaded set of reservations. Availability is rebuilt
    /// from scratch and the id counter is raised past every loaded id.
    pub(crate) fn replace_reservations(&mut self, reservations: Vec<Reservation>) {
        self.registry.release_all();
        for reservation in &reservations {
            if let RoomRef::Registered(number) = reservation.room {
                if let Some(room) = self.registry.find_by_number_mut(number) {
                    room.available = false;
                }
            }
        }
        self.ledger.replace(reservations);
        if let Some(following_id) = self
            .ledger
            .max_booking_id()
            .and_then(|max_id| max_id.checked_add(1))
        {
            self.next_booking_id = self.next_booking_id.max(following_id);
        }
    }
}

/// Human-readable line describing one reservation.
pub struct ReservationSummary<'a> {
    reservation: &'a Reservation,
    room: Option<&'a Room>,
}

impl fmt::Display for ReservationSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Booking ID: {}, Guest: {}, ",
            self.reservation.booking_id, self.reservation.guest_name
        )?;
        match (self.room, &self.reservation.room) {
            (Some(room), _) => write!(f, "Room: {} ({})", room.number(), room.category())?,
            (None, RoomRef::Missing { number, category }) => {
                write!(f, "Room: - (missing {number} {category})")?
            }
            (None, RoomRef::Registered(number)) => write!(f, "Room: - (missing {number})")?,
        }
        write!(f, ", Paid: ${}", format_amount(self.reservation.amount_paid))
    }
}
