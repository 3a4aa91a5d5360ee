//! Affiliation field codec.
//!
//! An affiliation is written by people as a 4-digit number `GCNN`
//! (grade, class, two-digit number), e.g. `2714` is grade 2, class 7,
//! number 14. It is stored in 11 bits as three zero-based components:
//!
//! ```text
//!  10  9   8  7  6   5  4  3  2  1  0
//! ┌─────┬─────────┬──────────────────┐
//! │grade│  class  │      number      │
//! │ 0-3 │   0-7   │       0-63       │
//! └─────┴─────────┴──────────────────┘
//! ```
//!
//! Each component is stored offset by one, so the human ranges are
//! grade 1–4, class 1–8 and number 1–64.

use crate::error::{CodecError, Field, Result};

/// Width of an encoded affiliation.
pub const AFFILIATION_BITS: u32 = 11;

const GRADE_BITS: u32 = 2;
const CLASS_BITS: u32 = 3;
const NUMBER_BITS: u32 = 6;

const GRADE_RANGE: (u16, u16) = (1, 1 << GRADE_BITS);
const CLASS_RANGE: (u16, u16) = (1, 1 << CLASS_BITS);
const NUMBER_RANGE: (u16, u16) = (1, 1 << NUMBER_BITS);

/// Smallest valid affiliation (`1101`).
pub const MIN_AFFILIATION: u16 = 1101;

/// Largest valid affiliation (`4864`).
pub const MAX_AFFILIATION: u16 = 4864;

fn component(field: Field, value: u16, (min, max): (u16, u16)) -> Result<u16> {
    if value < min || value > max {
        return Err(CodecError::FieldOutOfRange {
            field,
            value: u32::from(value),
            min: u32::from(min),
            max: u32::from(max),
        });
    }
    Ok(value - min)
}

/// Encode a 4-digit affiliation into its 11-bit form.
///
/// # Errors
///
/// Returns [`CodecError::FieldOutOfRange`] naming the grade, class or number
/// component that falls outside its range.
///
/// # Examples
///
/// ```
/// use ticket_codec_core::affiliation::{decode_affiliation, encode_affiliation};
///
/// let bits = encode_affiliation(2714).unwrap();
/// assert_eq!(bits, (1 << 9) | (6 << 6) | 13);
/// assert_eq!(decode_affiliation(bits), 2714);
/// assert!(encode_affiliation(1901).is_err());
/// ```
pub fn encode_affiliation(affiliation: u16) -> Result<u16> {
    let grade = component(Field::Grade, affiliation / 1000, GRADE_RANGE)?;
    let class = component(Field::Class, affiliation / 100 % 10, CLASS_RANGE)?;
    let number = component(Field::Number, affiliation % 100, NUMBER_RANGE)?;

    Ok((grade << (CLASS_BITS + NUMBER_BITS)) | (class << NUMBER_BITS) | number)
}

/// Decode 11 affiliation bits back into the 4-digit form.
///
/// Bits above the low 11 are ignored.
#[must_use]
pub const fn decode_affiliation(bits: u16) -> u16 {
    let grade = (bits >> (CLASS_BITS + NUMBER_BITS)) & ((1 << GRADE_BITS) - 1);
    let class = (bits >> NUMBER_BITS) & ((1 << CLASS_BITS) - 1);
    let number = bits & ((1 << NUMBER_BITS) - 1);

    (grade + GRADE_RANGE.0) * 1000 + (class + CLASS_RANGE.0) * 100 + number + NUMBER_RANGE.0
}
