//! Flat-file persistence for the reservation ledger.

/// Line codecs used by the reservation file.
pub mod codec;

use std::{
    collections::HashSet,
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    booking::Hotel,
    error::HotelError,
    models::{Reservation, RoomRef},
    registry::RoomRegistry,
};

pub use codec::{CommaCodec, JsonLinesCodec, RecordCodec, ReservationRecord};

/// Default file name used for saving and loading.
pub const DEFAULT_DATA_FILE: &str = "reservations.txt";

/// On-disk line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordFormat {
    /// Unescaped comma-separated fields.
    #[default]
    Comma,
    /// One JSON object per line.
    JsonLines,
}

impl RecordFormat {
    /// Codec implementing this format.
    pub fn codec(&self) -> Box<dyn RecordCodec> {
        match self {
            RecordFormat::Comma => Box::new(CommaCodec),
            RecordFormat::JsonLines => Box::new(JsonLinesCodec),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFormat::Comma => f.write_str("comma"),
            RecordFormat::JsonLines => f.write_str("json-lines"),
        }
    }
}

impl FromStr for RecordFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comma" | "csv" => Ok(RecordFormat::Comma),
            "json-lines" | "jsonl" => Ok(RecordFormat::JsonLines),
            other => Err(anyhow::anyhow!("unknown record format '{other}'")),
        }
    }
}

/// Reads and writes the reservation ledger of a [`Hotel`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ReservationStore {
    path: PathBuf,
    format: RecordFormat,
}

impl ReservationStore {
    /// Create a store for `path` using the given line format.
    pub fn new(path: impl Into<PathBuf>, format: RecordFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Line format in use.
    pub fn format(&self) -> RecordFormat {
        self.format
    }

    /// Whether the target file currently exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Overwrite the target with every reservation in the ledger. Returns the
    /// number of records written.
    pub fn save(&self, hotel: &Hotel) -> Result<usize, HotelError> {
        let codec = self.format.codec();
        let mut contents = String::new();
        for reservation in hotel.list_reservations() {
            let record = record_for(hotel, reservation);
            if self.format == RecordFormat::Comma && record.guest_name.contains(',') {
                warn!(
                    booking_id = record.booking_id,
                    "Guest name contains a comma; the saved line will not load back"
                );
            }
            let line = codec.encode(&record).map_err(|err| {
                HotelError::io(
                    &self.path,
                    io::Error::new(io::ErrorKind::InvalidData, format!("{err:#}")),
                )
            })?;
            contents.push_str(&line);
            contents.push('\n');
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| HotelError::io(parent, err))?;
        }
        fs::write(&self.path, contents).map_err(|err| HotelError::io(&self.path, err))?;

        let count = hotel.list_reservations().len();
        info!(path = %self.path.display(), count, format = %self.format, "Reservations saved");
        Ok(count)
    }

    /// Replace the hotel's ledger with the file contents. The file is parsed in
    /// full before anything changes; on error the hotel is left untouched.
    /// Returns the number of reservations loaded.
    pub fn load(&self, hotel: &mut Hotel) -> Result<usize, HotelError> {
        let contents =
            fs::read_to_string(&self.path).map_err(|err| HotelError::io(&self.path, err))?;
        let codec = self.format.codec();
        let reservations = decode_reservations(hotel.registry(), codec.as_ref(), &contents)?;

        let count = reservations.len();
        hotel.replace_reservations(reservations);
        info!(
            path = %self.path.display(),
            count,
            next_booking_id = hotel.next_booking_id(),
            "Reservations loaded"
        );
        Ok(count)
    }
}

fn record_for(hotel: &Hotel, reservation: &Reservation) -> ReservationRecord {
    let category = match (&reservation.room, hotel.room_for(reservation)) {
        (_, Some(room)) => room.category().as_str().to_string(),
        (RoomRef::Missing { category, .. }, None) => category.clone(),
        (RoomRef::Registered(_), None) => String::new(),
    };
    ReservationRecord {
        booking_id: reservation.booking_id,
        guest_name: reservation.guest_name.clone(),
        room_number: reservation.room_number(),
        category,
        amount_paid: reservation.amount_paid,
    }
}

fn decode_reservations(
    registry: &RoomRegistry,
    codec: &dyn RecordCodec,
    contents: &str,
) -> Result<Vec<Reservation>, HotelError> {
    let mut reservations = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut claimed_rooms = HashSet::new();

    for (index, line) in contents.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let record = codec
            .decode(line)
            .map_err(|err| HotelError::malformed(line_no, format!("{err:#}")))?;

        if !seen_ids.insert(record.booking_id) {
            return Err(HotelError::DuplicateBookingId {
                line: line_no,
                id: record.booking_id,
            });
        }

        let room = match registry.find_by_number(record.room_number) {
            Some(room) => {
                if !claimed_rooms.insert(room.number()) {
                    return Err(HotelError::RoomConflict {
                        line: line_no,
                        room: room.number(),
                    });
                }
                if !room.category().matches(&record.category) {
                    warn!(
                        line = line_no,
                        room = room.number(),
                        file_category = %record.category,
                        registered = %room.category(),
                        "Category mismatch; keeping registered category"
                    );
                }
                RoomRef::Registered(room.number())
            }
            None => {
                warn!(
                    line = line_no,
                    booking_id = record.booking_id,
                    room = record.room_number,
                    "Reservation refers to an unknown room"
                );
                RoomRef::Missing {
                    number: record.room_number,
                    category: record.category,
                }
            }
        };

        reservations.push(Reservation {
            booking_id: record.booking_id,
            guest_name: record.guest_name,
            room,
            amount_paid: record.amount_paid,
        });
    }

    Ok(reservations)
}
