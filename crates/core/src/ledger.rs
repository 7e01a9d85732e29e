//! Ordered collection of active reservations.

use crate::models::{BookingId, Reservation, RoomNumber};

/// Active reservations in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ReservationLedger {
    entries: Vec<Reservation>,
}

impl ReservationLedger {
    /// Entries in insertion order.
    pub fn entries(&self) -> &[Reservation] {
        &self.entries
    }

    /// Number of active reservations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger holds no reservations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, reservation: Reservation) {
        self.entries.push(reservation);
    }

    /// Remove the first entry carrying `booking_id`.
    pub(crate) fn remove(&mut self, booking_id: BookingId) -> Option<Reservation> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.booking_id == booking_id)?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn replace(&mut self, entries: Vec<Reservation>) {
        self.entries = entries;
    }

    /// First reservation with the given id.
    pub fn find(&self, booking_id: BookingId) -> Option<&Reservation> {
        self.entries
            .iter()
            .find(|entry| entry.booking_id == booking_id)
    }

    /// Reservation backed by the given room, if any.
    pub fn holding_room(&self, number: RoomNumber) -> Option<&Reservation> {
        self.entries
            .iter()
            .find(|entry| entry.room.is_registered() && entry.room_number() == number)
    }

    /// Highest booking id currently held.
    pub fn max_booking_id(&self) -> Option<BookingId> {
        self.entries.iter().map(|entry| entry.booking_id).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoomRef;

    fn reservation(id: BookingId, room: RoomNumber) -> Reservation {
        Reservation {
            booking_id: id,
            guest_name: format!("guest-{id}"),
            room: RoomRef::Registered(room),
            amount_paid: 100.0,
        }
    }

    #[test]
    fn removal_keeps_insertion_order() {
        let mut ledger = ReservationLedger::default();
        ledger.push(reservation(1, 101));
        ledger.push(reservation(2, 102));
        ledger.push(reservation(3, 201));

        let removed = ledger.remove(2).expect("entry 2");
        assert_eq!(removed.room_number(), 102);
        let ids: Vec<_> = ledger.entries().iter().map(|r| r.booking_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(ledger.remove(2).is_none());
        assert_eq!(ledger.max_booking_id(), Some(3));
    }

    #[test]
    fn holding_room_ignores_missing_links() {
        let mut ledger = ReservationLedger::default();
        ledger.push(Reservation {
            booking_id: 7,
            guest_name: "Ghost".to_string(),
            room: RoomRef::Missing {
                number: 999,
                category: "Suite".to_string(),
            },
            amount_paid: 250.0,
        });
        assert!(ledger.holding_room(999).is_none());
        ledger.push(reservation(8, 301));
        assert_eq!(ledger.holding_room(301).map(|r| r.booking_id), Some(8));
    }
}
