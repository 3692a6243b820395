//! Packed-decimal (BCD) fields used for coordinates, depth and magnitude.
//!
//! Each nibble is a decimal digit, the decimal-shift sentinel `0xE`, or (in
//! the leading position of a signed field only) the sign nibble `0xD`.
//! Every sentinel after
//! the leading position shortens the digit run by one and moves the decimal
//! point one place to the right.

use crate::{KnetError, Result};

const SIGN_NEGATIVE: u8 = 0xD;
const DECIMAL_SHIFT: u8 = 0xE;

/// Digit layout of a packed-decimal header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcdField {
    /// Nibbles covered by the field.
    pub total_digits: usize,
    /// Digits after the decimal point before any shift.
    pub significant_digits: u32,
    /// Whether a leading `0xD` sign nibble is allowed.
    pub signed: bool,
}

impl BcdField {
    pub const LATITUDE: Self = Self::new(8, 5);
    pub const LONGITUDE: Self = Self::new(8, 5);
    pub const ELEVATION: Self = Self::new(8, 2).signed();
    pub const DEPTH: Self = Self::new(8, 3).signed();
    pub const MAGNITUDE: Self = Self::new(2, 1).signed();

    /// An unsigned field.
    pub const fn new(total_digits: usize, significant_digits: u32) -> Self {
        Self {
            total_digits,
            significant_digits,
            signed: false,
        }
    }

    /// Allow a leading sign nibble.
    pub const fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    /// Decode `bytes`. An unsigned field with a leading `0xD` is
    /// [`KnetError::InvalidBcd`].
    pub fn decode(self, bytes: &[u8]) -> Result<f64> {
        if !self.signed && bytes.first().is_some_and(|&b| b >> 4 == SIGN_NEGATIVE) {
            return Err(KnetError::InvalidBcd {
                digits: hex_string(bytes),
            });
        }
        decode_bcd(bytes, self.total_digits, self.significant_digits)
    }
}

/// Decode a packed-decimal field into a signed float.
///
/// The result is rounded to `significant_digits - shifts` decimal places.
/// A field of all zeros decodes to `0.0`.
pub fn decode_bcd(bytes: &[u8], total_digits: usize, significant_digits: u32) -> Result<f64> {
    let nibbles = unpack_nibbles(bytes);
    let invalid = || KnetError::InvalidBcd {
        digits: hex_string(bytes),
    };

    for (i, &n) in nibbles.iter().enumerate() {
        let allowed = n <= 9 || n == DECIMAL_SHIFT || (i == 0 && n == SIGN_NEGATIVE);
        if !allowed {
            return Err(invalid());
        }
    }

    let reduction = nibbles
        .iter()
        .skip(1)
        .filter(|&&n| n == DECIMAL_SHIFT)
        .count();

    let (sign, first) = match nibbles.first() {
        Some(&SIGN_NEGATIVE) => (-1.0, 1),
        _ => (1.0, 0),
    };
    let start = first + nibbles[first..].iter().take_while(|&&n| n == 0).count();
    let end = total_digits.saturating_sub(reduction).min(nibbles.len());

    let mut integer: u64 = 0;
    for &digit in nibbles.get(start..end).unwrap_or(&[]) {
        if digit > 9 {
            return Err(invalid());
        }
        integer = integer
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit as u64))
            .ok_or_else(invalid)?;
    }

    let places = significant_digits as i32 - reduction as i32;
    let value = sign * integer as f64 * 10f64.powi(-places);
    Ok(round_to(value, places))
}

fn round_to(value: f64, places: i32) -> f64 {
    if places <= 0 {
        return value.round();
    }
    let p = 10f64.powi(places);
    (value * p).round() / p
}

pub(crate) fn unpack_nibbles(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().flat_map(|&b| [b >> 4, b & 0x0F]).collect()
}

pub(crate) fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
