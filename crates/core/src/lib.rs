#![warn(clippy::all, missing_docs)]

//! Core domain logic for the hotel reservation console.
//!
//! This crate hosts the room registry, the reservation ledger, the booking
//! operations that keep the two in step, configuration handling and the
//! flat-file persistence used by the terminal UI.

pub mod booking;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod persistence;
pub mod registry;

pub use booking::{Hotel, ReservationSummary};
pub use config::AppConfig;
pub use error::HotelError;
pub use models::{BookingId, Reservation, Room, RoomCategory, RoomNumber, RoomRef};
pub use persistence::{RecordFormat, ReservationStore};
