//! Primitive codecs: fixed-width big-endian integers and booleans.

use std::fmt;

use crate::{
    errors::{DecodeError, EncodeError},
    uint::{U256, U256_BYTES},
};

/// Bit widths accepted after `u`/`i` in a schema.
pub const INTEGER_BITS: [u16; 6] = [8, 16, 32, 64, 128, 256];

/// Fixed-width integer codec (`u8`..`u256`, `i8`..`i256`).
///
/// Values are always unsigned magnitudes. The `signed` flag is kept from the
/// schema token and reported back, but it does not change the encoding:
/// `i8` accepts `0..=255` exactly like `u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerCodec {
    signed: bool,
    width_bytes: usize,
}

impl IntegerCodec {
    /// Codec used for every vector, string and bytes length prefix.
    pub const U32: IntegerCodec = IntegerCodec {
        signed: false,
        width_bytes: 4,
    };

    pub const U8: IntegerCodec = IntegerCodec {
        signed: false,
        width_bytes: 1,
    };

    /// Returns `None` unless `bits` is one of [INTEGER_BITS].
    pub fn new(signed: bool, bits: u16) -> Option<Self> {
        INTEGER_BITS.contains(&bits).then_some(IntegerCodec {
            signed,
            width_bytes: bits as usize / 8,
        })
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub const fn width_bytes(&self) -> usize {
        self.width_bytes
    }

    pub fn bits(&self) -> u16 {
        self.width_bytes as u16 * 8
    }

    /// `2^(8 * width_bytes) - 1`.
    pub fn max_value(&self) -> U256 {
        let mut bytes = [0u8; U256_BYTES];
        bytes[U256_BYTES - self.width_bytes..].fill(0xff);
        U256::from_be_bytes(bytes)
    }

    pub fn encode(&self, value: &U256) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::with_capacity(self.width_bytes);
        self.encode_into(value, &mut out)?;
        Ok(out)
    }

    /// Appends exactly `width_bytes` big-endian bytes.
    pub fn encode_into(&self, value: &U256, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        if !value.fits_in_bytes(self.width_bytes) {
            return Err(EncodeError::Overflow {
                value: *value,
                bits: self.bits(),
            });
        }

        out.extend_from_slice(&value.as_be_bytes()[U256_BYTES - self.width_bytes..]);
        Ok(())
    }

    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<(U256, &'a [u8]), DecodeError> {
        if data.len() < self.width_bytes {
            return Err(DecodeError::NotEnoughBytes {
                expected: self.width_bytes,
                actual: data.len(),
            });
        }

        let (head, rest) = data.split_at(self.width_bytes);
        let value = U256::from_be_slice(head).ok_or(DecodeError::NotEnoughBytes {
            expected: self.width_bytes,
            actual: data.len(),
        })?;

        Ok((value, rest))
    }
}

impl fmt::Display for IntegerCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.signed { 'i' } else { 'u' };
        write!(f, "{sign}{}", self.bits())
    }
}

/// One byte, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoolCodec;

impl BoolCodec {
    pub fn encode_into(&self, value: bool, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        IntegerCodec::U8.encode_into(&U256::from(value as u8), out)
    }

    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<(bool, &'a [u8]), DecodeError> {
        let (value, rest) = IntegerCodec::U8.decode(data)?;

        if value == U256::ZERO {
            Ok((false, rest))
        } else if value == U256::ONE {
            Ok((true, rest))
        } else {
            Err(DecodeError::InvalidBool { value })
        }
    }
}

impl fmt::Display for BoolCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("bool")
    }
}
