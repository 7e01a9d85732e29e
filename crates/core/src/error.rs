//! Error type shared by the booking service and the persistence layer.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::models::{BookingId, RoomNumber};

/// Failures reported by hotel operations. All of them are recoverable by the
/// caller; none leave the registry and ledger out of step.
#[derive(Debug, Error)]
pub enum HotelError {
    /// No free room matches the requested category.
    #[error("no {category} rooms available")]
    NoAvailability {
        /// Category as requested.
        category: String,
    },

    /// Cancel was given an id the ledger does not hold.
    #[error("booking id {0} not found")]
    BookingNotFound(BookingId),

    /// Guest name is blank.
    #[error("guest name must not be empty")]
    InvalidGuestName,

    /// The booking id counter cannot advance any further.
    #[error("booking ids exhausted")]
    IdsExhausted,

    /// File could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A persisted line does not parse into a valid record.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// A booking id appears twice in one file.
    #[error("booking id {id} repeated on line {line}")]
    DuplicateBookingId {
        /// 1-based line number of the repeat.
        line: usize,
        /// Repeated id.
        id: BookingId,
    },

    /// Two records in one file hold the same registered room.
    #[error("room {room} claimed twice (line {line})")]
    RoomConflict {
        /// 1-based line number of the second claim.
        line: usize,
        /// Contested room.
        room: RoomNumber,
    },
}

impl HotelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HotelError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        HotelError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}
