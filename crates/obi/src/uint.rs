//! Fixed 256-bit unsigned integer used for every integer width in a schema.
//!
//! Stored as 32 big-endian bytes, which is exactly the wire order, so the
//! integer codec only ever copies the low `width` bytes in or out.

use std::{fmt, str::FromStr};

/// Width of [U256] in bytes.
pub const U256_BYTES: usize = 32;

/// Errors produced when converting to or from [U256].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UintError {
    #[error("cannot parse integer from empty string")]
    Empty,
    #[error("invalid digit {0:?} in integer")]
    InvalidDigit(char),
    #[error("integer does not fit the target width")]
    Overflow,
}

/// Unsigned 256-bit integer. Ordering follows numeric order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U256([u8; U256_BYTES]);

impl U256 {
    pub const ZERO: U256 = U256([0; U256_BYTES]);
    pub const MAX: U256 = U256([0xff; U256_BYTES]);
    pub const ONE: U256 = {
        let mut bytes = [0; U256_BYTES];
        bytes[U256_BYTES - 1] = 1;
        U256(bytes)
    };

    /// Builds a value from up to 32 big-endian bytes. Returns `None` for longer input.
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > U256_BYTES {
            return None;
        }

        let mut out = [0u8; U256_BYTES];
        out[U256_BYTES - bytes.len()..].copy_from_slice(bytes);
        Some(U256(out))
    }

    pub const fn from_be_bytes(bytes: [u8; U256_BYTES]) -> Self {
        U256(bytes)
    }

    pub fn to_be_bytes(&self) -> [u8; U256_BYTES] {
        self.0
    }

    pub fn as_be_bytes(&self) -> &[u8; U256_BYTES] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Number of significant bits (0 for zero).
    pub fn bits(&self) -> u32 {
        match self.0.iter().position(|b| *b != 0) {
            Some(i) => (U256_BYTES - i) as u32 * 8 - self.0[i].leading_zeros(),
            None => 0,
        }
    }

    /// True if the value is at most `2^(8 * n) - 1`.
    pub fn fits_in_bytes(&self, n: usize) -> bool {
        n >= U256_BYTES || self.0[..U256_BYTES - n].iter().all(|b| *b == 0)
    }

    /// `self * mul + add`, or `None` on overflow.
    fn checked_mul_add(&self, mul: u32, add: u32) -> Option<Self> {
        let mut out = self.0;
        let mut carry = add;

        for byte in out.iter_mut().rev() {
            let cur = *byte as u32 * mul + carry;
            *byte = (cur & 0xff) as u8;
            carry = cur >> 8;
        }

        (carry == 0).then_some(U256(out))
    }

    /// Divides in place by a small divisor, returning the remainder.
    fn div_rem_small(&mut self, div: u32) -> u32 {
        let mut rem = 0u32;

        for byte in self.0.iter_mut() {
            let cur = (rem << 8) | *byte as u32;
            *byte = (cur / div) as u8;
            rem = cur % div;
        }

        rem
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.pad("0");
        }

        // 2^256 has 78 decimal digits.
        let mut digits = Vec::with_capacity(78);
        let mut rest = *self;
        while !rest.is_zero() {
            digits.push(b'0' + rest.div_rem_small(10) as u8);
        }
        digits.reverse();

        f.pad(std::str::from_utf8(&digits).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({self})")
    }
}

impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.0.iter().position(|b| *b != 0).unwrap_or(U256_BYTES - 1);
        let mut out = format!("{:x}", self.0[start]);
        for byte in &self.0[start + 1..] {
            out.push_str(&format!("{byte:02x}"));
        }

        f.pad_integral(true, "0x", &out)
    }
}

/// Parses decimal, or hex with a `0x` prefix.
impl FromStr for U256 {
    type Err = UintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => (hex, 16),
            None => (s, 10),
        };

        if digits.is_empty() {
            return Err(UintError::Empty);
        }

        let mut value = U256::ZERO;
        for ch in digits.chars() {
            let digit = ch.to_digit(radix).ok_or(UintError::InvalidDigit(ch))?;
            value = value
                .checked_mul_add(radix, digit)
                .ok_or(UintError::Overflow)?;
        }

        Ok(value)
    }
}

macro_rules! impl_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for U256 {
                fn from(value: $t) -> Self {
                    let bytes = value.to_be_bytes();
                    let mut out = [0u8; U256_BYTES];
                    out[U256_BYTES - bytes.len()..].copy_from_slice(&bytes);
                    U256(out)
                }
            }

            impl TryFrom<U256> for $t {
                type Error = UintError;

                fn try_from(value: U256) -> Result<Self, Self::Error> {
                    const N: usize = std::mem::size_of::<$t>();
                    if !value.fits_in_bytes(N) {
                        return Err(UintError::Overflow);
                    }

                    let mut bytes = [0u8; N];
                    bytes.copy_from_slice(&value.0[U256_BYTES - N..]);
                    Ok(<$t>::from_be_bytes(bytes))
                }
            }
        )*
    };
}

impl_primitive!(u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_POW_128: &str = "340282366920938463463374607431768211456";
    const U256_MAX: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";

    #[test]
    fn test_from_primitive() {
        let value = U256::from(0x0102u16);
        let bytes = value.to_be_bytes();
        assert_eq!(&bytes[30..], &[0x01, 0x02]);
        assert!(bytes[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_try_into_primitive() {
        assert_eq!(u8::try_from(U256::from(255u32)), Ok(255));
        assert_eq!(u8::try_from(U256::from(256u32)), Err(UintError::Overflow));
        assert_eq!(u128::try_from(U256::from(u128::MAX)), Ok(u128::MAX));
    }

    #[test]
    fn test_display() {
        assert_eq!(U256::ZERO.to_string(), "0");
        assert_eq!(U256::from(1234567890u64).to_string(), "1234567890");
        assert_eq!(U256::MAX.to_string(), U256_MAX);
        assert_eq!(format!("{:>5}", U256::from(42u8)), "   42");
    }

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!("0".parse::<U256>(), Ok(U256::ZERO));
        assert_eq!("255".parse::<U256>(), Ok(U256::from(255u8)));
        assert_eq!("0xff".parse::<U256>(), Ok(U256::from(255u8)));
        assert_eq!(U256_MAX.parse::<U256>(), Ok(U256::MAX));

        let two_pow_128: U256 = TWO_POW_128.parse().unwrap();
        assert_eq!(two_pow_128.bits(), 129);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<U256>(), Err(UintError::Empty));
        assert_eq!("0x".parse::<U256>(), Err(UintError::Empty));
        assert_eq!("12a".parse::<U256>(), Err(UintError::InvalidDigit('a')));
        assert_eq!("-1".parse::<U256>(), Err(UintError::InvalidDigit('-')));

        let too_big = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(too_big.parse::<U256>(), Err(UintError::Overflow));
    }

    #[test]
    fn test_bits_and_fits() {
        assert_eq!(U256::ZERO.bits(), 0);
        assert_eq!(U256::ONE.bits(), 1);
        assert_eq!(U256::from(255u8).bits(), 8);
        assert_eq!(U256::from(256u16).bits(), 9);
        assert_eq!(U256::MAX.bits(), 256);

        assert!(U256::from(255u8).fits_in_bytes(1));
        assert!(!U256::from(256u16).fits_in_bytes(1));
        assert!(U256::MAX.fits_in_bytes(32));
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(U256::from(256u16) > U256::from(255u8));
        assert!(U256::MAX > U256::from(u128::MAX));
    }

    #[test]
    fn test_lower_hex() {
        assert_eq!(format!("{:x}", U256::from(0x0abcu16)), "abc");
        assert_eq!(format!("{:#x}", U256::from(0x0abcu16)), "0xabc");
        assert_eq!(format!("{:x}", U256::ZERO), "0");
    }

    #[test]
    fn test_from_be_slice() {
        assert_eq!(U256::from_be_slice(&[1, 0]), Some(U256::from(256u16)));
        assert_eq!(U256::from_be_slice(&[0; 33]), None);
    }
}
