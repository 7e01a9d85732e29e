//! Fixed room inventory.

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::models::{Room, RoomCategory, RoomNumber};

/// Rooms every hotel starts with, in registration order.
pub const DEFAULT_ROOMS: [(RoomNumber, RoomCategory); 5] = [
    (101, RoomCategory::Standard),
    (102, RoomCategory::Standard),
    (201, RoomCategory::Deluxe),
    (202, RoomCategory::Deluxe),
    (301, RoomCategory::Suite),
];

/// Ordered list of rooms with their live availability flag.
#[derive(Debug, Clone)]
pub struct RoomRegistry {
    rooms: Vec<Room>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self {
            rooms: DEFAULT_ROOMS
                .iter()
                .map(|&(number, category)| Room::new(number, category))
                .collect(),
        }
    }
}

impl RoomRegistry {
    /// Build a registry from an explicit room list. Room numbers must be
    /// unique; registration order is the order given.
    pub fn from_rooms(rooms: Vec<Room>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rooms.len());
        for room in &rooms {
            if !seen.insert(room.number()) {
                bail!("room {} registered twice", room.number());
            }
        }
        Ok(Self { rooms })
    }

    /// All rooms in registration order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Linear lookup by room number.
    pub fn find_by_number(&self, number: RoomNumber) -> Option<&Room> {
        self.rooms.iter().find(|room| room.number() == number)
    }

    /// Mutable variant of [`Self::find_by_number`].
    pub fn find_by_number_mut(&mut self, number: RoomNumber) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|room| room.number() == number)
    }

    /// Earliest-registered room that is available and whose category matches
    /// `category` case-insensitively.
    pub fn find_first_available(&self, category: &str) -> Option<&Room> {
        self.rooms
            .iter()
            .find(|room| room.available && room.category().matches(category))
    }

    /// Mutable variant of [`Self::find_first_available`].
    pub fn find_first_available_mut(&mut self, category: &str) -> Option<&mut Room> {
        self.rooms
            .iter_mut()
            .find(|room| room.available && room.category().matches(category))
    }

    /// Available rooms matching `category`, in registration order.
    pub fn available_matching<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Room> + 'a {
        self.rooms
            .iter()
            .filter(move |room| room.available && room.category().matches(category))
    }

    pub(crate) fn release_all(&mut self) {
        for room in &mut self.rooms {
            room.available = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rooms_are_registered_in_order() {
        let registry = RoomRegistry::default();
        let numbers: Vec<_> = registry.rooms().iter().map(Room::number).collect();
        assert_eq!(numbers, vec![101, 102, 201, 202, 301]);
        assert!(registry.rooms().iter().all(|room| room.available));
    }

    #[test]
    fn first_available_skips_taken_rooms() {
        let mut registry = RoomRegistry::default();
        assert_eq!(registry.find_first_available("standard").map(Room::number), Some(101));

        registry.find_by_number_mut(101).expect("room 101").available = false;
        assert_eq!(registry.find_first_available("STANDARD").map(Room::number), Some(102));

        registry.find_by_number_mut(102).expect("room 102").available = false;
        assert!(registry.find_first_available("Standard").is_none());
        assert!(registry.find_first_available("Penthouse").is_none());
    }

    #[test]
    fn duplicate_room_numbers_are_rejected() {
        let rooms = vec![
            Room::new(1, RoomCategory::Suite),
            Room::new(1, RoomCategory::Deluxe),
        ];
        assert!(RoomRegistry::from_rooms(rooms).is_err());
    }
}
