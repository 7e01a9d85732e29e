use std::fs;

use anyhow::Result;
use hotelres_core::{Hotel, HotelError, RecordFormat, ReservationStore, RoomCategory};
use tempfile::tempdir;

#[test]
fn every_category_books_its_earliest_free_room() -> Result<()> {
    let mut hotel = Hotel::new();
    for category in RoomCategory::ALL {
        let expected: Vec<_> = hotel
            .registry()
            .rooms()
            .iter()
            .filter(|room| room.category() == category)
            .map(|room| room.number())
            .collect();

        for number in expected {
            let booking = hotel.book_room("Guest", category.as_str())?;
            assert_eq!(booking.room_number(), number);
            let room = hotel.room_for(&booking).expect("registered room");
            assert_eq!(room.category(), category);
            assert_eq!(booking.amount_paid, category.price());
        }
        assert!(matches!(
            hotel.book_room("Guest", category.as_str()),
            Err(HotelError::NoAvailability { .. })
        ));
    }
    assert!(hotel.is_consistent());
    Ok(())
}

#[test]
fn save_then_load_into_fresh_hotel_reproduces_state() -> Result<()> {
    let dir = tempdir()?;
    let store = ReservationStore::new(dir.path().join("reservations.txt"), RecordFormat::Comma);

    let mut hotel = Hotel::new();
    hotel.book_room("Alice", "Standard")?;
    let bob = hotel.book_room("Bob", "Deluxe")?;
    hotel.book_room("Carol", "Suite")?;
    hotel.cancel_reservation(bob.booking_id)?;
    hotel.book_room("Dan", "deluxe")?;
    store.save(&hotel)?;

    let mut restored = Hotel::new();
    store.load(&mut restored)?;

    assert_eq!(restored.list_reservations(), hotel.list_reservations());
    for category in RoomCategory::ALL {
        assert_eq!(
            restored.search_rooms(category.as_str()),
            hotel.search_rooms(category.as_str())
        );
    }
    assert!(restored.next_booking_id() > 4);
    assert!(restored.is_consistent());

    let lines: Vec<String> = fs::read_to_string(store.path())?
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(
        lines,
        vec![
            "1,Alice,101,Standard,100.0",
            "3,Carol,301,Suite,250.0",
            "4,Dan,201,Deluxe,100.0",
        ]
    );
    Ok(())
}

#[test]
fn bookings_after_load_continue_past_loaded_ids() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("reservations.txt");
    fs::write(&path, "41,Alice,102,Standard,100.0\n")?;

    let mut hotel = Hotel::new();
    ReservationStore::new(&path, RecordFormat::Comma).load(&mut hotel)?;

    let booking = hotel.book_room("Bob", "Standard")?;
    assert_eq!(booking.booking_id, 42);
    assert_eq!(booking.room_number(), 101);
    assert!(hotel.search_rooms("Standard").is_empty());
    Ok(())
}
