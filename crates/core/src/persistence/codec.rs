//! Line codecs for the reservation file.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{format_amount, BookingId, RoomNumber};

/// One persisted reservation, exactly as it appears in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRecord {
    /// Booking id, preserved across save and load.
    pub booking_id: BookingId,
    /// Guest name.
    pub guest_name: String,
    /// Room number the booking refers to.
    pub room_number: RoomNumber,
    /// Category label of that room.
    pub category: String,
    /// Amount charged.
    pub amount_paid: f64,
}

impl ReservationRecord {
    fn validate(self) -> Result<Self> {
        if self.booking_id == 0 {
            bail!("booking id must be positive");
        }
        if self.booking_id == BookingId::MAX {
            bail!("booking id {} leaves no id for the next booking", self.booking_id);
        }
        if self.guest_name.trim().is_empty() {
            bail!("guest name is empty");
        }
        if !self.amount_paid.is_finite() || self.amount_paid < 0.0 {
            bail!("amount {} is not a non-negative number", self.amount_paid);
        }
        Ok(self)
    }
}

/// Converts records to and from single lines of text.
pub trait RecordCodec {
    /// Render one record as a line, without the trailing newline.
    fn encode(&self, record: &ReservationRecord) -> Result<String>;

    /// Parse one line back into a record.
    fn decode(&self, line: &str) -> Result<ReservationRecord>;
}

/// `id,guest,room,category,amount` with every field written verbatim.
/// Guest names containing commas cannot be read back.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommaCodec;

impl CommaCodec {
    const FIELDS: usize = 5;
}

impl RecordCodec for CommaCodec {
    fn encode(&self, record: &ReservationRecord) -> Result<String> {
        Ok(format!(
            "{},{},{},{},{}",
            record.booking_id,
            record.guest_name,
            record.room_number,
            record.category,
            format_amount(record.amount_paid)
        ))
    }

    fn decode(&self, line: &str) -> Result<ReservationRecord> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != Self::FIELDS {
            bail!(
                "expected {} comma-separated fields, found {}",
                Self::FIELDS,
                fields.len()
            );
        }

        let booking_id = fields[0]
            .trim()
            .parse::<BookingId>()
            .with_context(|| format!("invalid booking id '{}'", fields[0]))?;
        let room_number = fields[2]
            .trim()
            .parse::<RoomNumber>()
            .with_context(|| format!("invalid room number '{}'", fields[2]))?;
        let amount_paid = fields[4]
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid amount '{}'", fields[4]))?;

        ReservationRecord {
            booking_id,
            guest_name: fields[1].to_string(),
            room_number,
            category: fields[3].to_string(),
            amount_paid,
        }
        .validate()
    }
}

/// One JSON object per line; any guest name survives the round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesCodec;

impl RecordCodec for JsonLinesCodec {
    fn encode(&self, record: &ReservationRecord) -> Result<String> {
        serde_json::to_string(record).context("failed to serialize reservation record")
    }

    fn decode(&self, line: &str) -> Result<ReservationRecord> {
        let record: ReservationRecord =
            serde_json::from_str(line).context("invalid reservation JSON")?;
        record.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> ReservationRecord {
        ReservationRecord {
            booking_id: 1,
            guest_name: "Alice".to_string(),
            room_number: 101,
            category: "Standard".to_string(),
            amount_paid: 100.0,
        }
    }

    #[test]
    fn comma_codec_matches_file_format() -> Result<()> {
        let line = CommaCodec.encode(&alice())?;
        assert_eq!(line, "1,Alice,101,Standard,100.0");
        assert_eq!(CommaCodec.decode(&line)?, alice());
        Ok(())
    }

    #[test]
    fn comma_codec_rejects_bad_lines() {
        let cases = [
            "1,Alice,101,Standard",
            "1,Al,ice,101,Standard,100.0",
            "x,Alice,101,Standard,100.0",
            "1,Alice,room,Standard,100.0",
            "1,Alice,101,Standard,free",
            "0,Alice,101,Standard,100.0",
            "-3,Alice,101,Standard,100.0",
            "1,,101,Standard,100.0",
            "1,Alice,101,Standard,-5",
            "",
        ];
        for line in cases {
            assert!(CommaCodec.decode(line).is_err(), "accepted {line:?}");
        }
    }

    #[test]
    fn json_codec_keeps_commas_in_names() -> Result<()> {
        let record = ReservationRecord {
            guest_name: "Doe, Jane".to_string(),
            ..alice()
        };
        let line = JsonLinesCodec.encode(&record)?;
        assert!(!line.contains('\n'));
        assert_eq!(JsonLinesCodec.decode(&line)?, record);
        Ok(())
    }
}
