//! Forward-only cursor over a WIN32 byte buffer.
//!
//! Every field in the container is located by the exact number of bytes
//! consumed before it, so all parsing goes through [`ByteReader`].

use crate::{KnetError, Result};

/// Big-endian byte cursor. Reads past the end fail with
/// [`KnetError::TruncatedInput`].
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a reader positioned at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(KnetError::TruncatedInput {
                offset: self.offset,
                needed: n,
                available,
            });
        }
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Check a fixed 4-byte marker, failing with [`KnetError::Format`].
    pub fn expect_magic(&mut self, expected: [u8; 4]) -> Result<()> {
        let offset = self.offset;
        let found = self.read_array::<4>()?;
        if found != expected {
            return Err(KnetError::Format {
                offset,
                expected,
                found,
            });
        }
        Ok(())
    }
}

/// Big-endian 3-byte two's-complement value, sign-extended to 32 bits.
pub(crate) fn i24_from_be_bytes(bytes: [u8; 3]) -> i32 {
    let raw = ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32;
    sign_extend(raw, 24)
}

/// Sign-extend the low `bits` bits of `value`.
pub(crate) fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    (value as i32).wrapping_shl(shift).wrapping_shr(shift)
}
