//! Ticket record and the 36-bit payload it packs into.
//!
//! Field order, most significant first:
//!
//! | Field | Bits |
//! |---|---|
//! | affiliation | 11 |
//! | relationship | 3 |
//! | type | 4 |
//! | performance | 5 |
//! | schedule | 6 |
//! | year | 3 |
//! | serial | 4 |

use crate::affiliation::{AFFILIATION_BITS, decode_affiliation, encode_affiliation};
use crate::error::{CodecError, Field, Result};
use serde::{Deserialize, Serialize};

/// Width of the packed payload.
pub const PAYLOAD_BITS: u32 = 36;

const RELATIONSHIP_BITS: u32 = 3;
const TYPE_BITS: u32 = 4;
const PERFORMANCE_BITS: u32 = 5;
const SCHEDULE_BITS: u32 = 6;
const YEAR_BITS: u32 = 3;
const SERIAL_BITS: u32 = 4;

const fn mask(bits: u32) -> u64 {
    (1 << bits) - 1
}

/// The plaintext content of a ticket.
///
/// `year` is kept modulo 8: any calendar year may be supplied when issuing,
/// a decoded record always carries `year % 8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketRecord {
    /// 4-digit affiliation (grade, class, number), e.g. `2714`.
    pub affiliation: u16,

    /// Ticket-holder relationship category (0–7).
    pub relationship: u8,

    /// Ticket type (0–15).
    #[serde(rename = "type")]
    pub ticket_type: u8,

    /// Performance id (0–31), 0 means "not applicable".
    pub performance: u8,

    /// Schedule id (0–63), 0 means "not applicable".
    pub schedule: u8,

    /// Year marker, stored modulo 8.
    pub year: u16,

    /// Sequence number within one group (0–15).
    pub serial: u8,
}

impl TicketRecord {
    /// Returns `true` for an admission-only ticket, not tied to any session.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ticket_codec_core::TicketRecord;
    /// let record = TicketRecord {
    ///     affiliation: 1101, relationship: 1, ticket_type: 2,
    ///     performance: 0, schedule: 0, year: 2025, serial: 0,
    /// };
    /// assert!(record.is_admission_only());
    /// ```
    #[must_use]
    pub const fn is_admission_only(&self) -> bool {
        self.performance == 0 && self.schedule == 0
    }

    /// Affiliation as a zero-padded 4-digit label.
    #[must_use]
    pub fn affiliation_label(&self) -> String {
        format!("{:04}", self.affiliation)
    }

    /// Year marker as a zero-padded 2-digit label.
    #[must_use]
    pub fn year_label(&self) -> String {
        format!("{:02}", self.year)
    }

    /// Check every field against its declared width.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldOutOfRange`] for the first offending field.
    pub fn validate(&self) -> Result<()> {
        pack(self).map(|_| ())
    }
}

/// A packed 36-bit ticket payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Payload(pub(crate) u64);

impl Payload {
    /// Wrap raw bits, rejecting anything wider than 36 bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Option<Self> {
        if bits > mask(PAYLOAD_BITS) {
            None
        } else {
            Some(Self(bits))
        }
    }

    /// Raw payload bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }
}

/// Shift `value` into the accumulator after checking it fits `bits`.
fn push(acc: u64, field: Field, value: u32, bits: u32) -> Result<u64> {
    let max = mask(bits);
    if u64::from(value) > max {
        return Err(CodecError::FieldOutOfRange {
            field,
            value,
            min: 0,
            max: u32::try_from(max).unwrap_or(u32::MAX),
        });
    }
    Ok((acc << bits) | u64::from(value))
}

/// Pack a record into its 36-bit payload.
///
/// # Errors
///
/// Returns [`CodecError::FieldOutOfRange`] if any field does not fit; values
/// are never truncated.
pub fn pack(record: &TicketRecord) -> Result<Payload> {
    let affiliation = encode_affiliation(record.affiliation)?;

    let mut acc = u64::from(affiliation);
    acc = push(acc, Field::Relationship, u32::from(record.relationship), RELATIONSHIP_BITS)?;
    acc = push(acc, Field::TicketType, u32::from(record.ticket_type), TYPE_BITS)?;
    acc = push(acc, Field::Performance, u32::from(record.performance), PERFORMANCE_BITS)?;
    acc = push(acc, Field::Schedule, u32::from(record.schedule), SCHEDULE_BITS)?;
    acc = (acc << YEAR_BITS) | (u64::from(record.year) & mask(YEAR_BITS));
    acc = push(acc, Field::Serial, u32::from(record.serial), SERIAL_BITS)?;

    Ok(Payload(acc))
}

/// Unpack a payload into a record. Exact inverse of [`pack`].
#[must_use]
#[allow(clippy::cast_possible_truncation)] // every extracted field is masked to its width
pub const fn unpack(payload: Payload) -> TicketRecord {
    let mut bits = payload.0;

    let serial = (bits & mask(SERIAL_BITS)) as u8;
    bits >>= SERIAL_BITS;
    let year = (bits & mask(YEAR_BITS)) as u16;
    bits >>= YEAR_BITS;
    let schedule = (bits & mask(SCHEDULE_BITS)) as u8;
    bits >>= SCHEDULE_BITS;
    let performance = (bits & mask(PERFORMANCE_BITS)) as u8;
    bits >>= PERFORMANCE_BITS;
    let ticket_type = (bits & mask(TYPE_BITS)) as u8;
    bits >>= TYPE_BITS;
    let relationship = (bits & mask(RELATIONSHIP_BITS)) as u8;
    bits >>= RELATIONSHIP_BITS;
    let affiliation = decode_affiliation((bits & mask(AFFILIATION_BITS)) as u16);

    TicketRecord {
        affiliation,
        relationship,
        ticket_type,
        performance,
        schedule,
        year,
        serial,
    }
}
