//! Pin representation: exactly 4 distinct decimal digits.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of digits in a pin.
pub const PIN_LEN: usize = 4;

/// Size of the digit alphabet (0..=9).
pub const NUM_DIGITS: u8 = 10;

/// A lock pin. Digits are stored as values `0..=9`, never as ASCII.
///
/// The derived ordering is lexicographic over the digits, which equals the
/// numeric order of the 4-digit decimal rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pin([u8; PIN_LEN]);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PinError {
    #[error("pin must have {PIN_LEN} digits, got {0}")]
    Length(usize),
    #[error("invalid digit: {0:#04x}")]
    BadDigit(u8),
    #[error("digit {0} appears more than once")]
    Repeated(u8),
}

impl Pin {
    /// Build a pin from digit values, rejecting out-of-range or repeated digits.
    pub fn new(digits: [u8; PIN_LEN]) -> Result<Self, PinError> {
        let mut seen = 0u16;
        for &d in &digits {
            if d >= NUM_DIGITS {
                return Err(PinError::BadDigit(d));
            }
            let bit = 1u16 << d;
            if seen & bit != 0 {
                return Err(PinError::Repeated(d));
            }
            seen |= bit;
        }
        Ok(Pin(digits))
    }

    /// Build a pin from a digit slice of any length (length checked).
    pub fn from_digits(digits: &[u8]) -> Result<Self, PinError> {
        let arr: [u8; PIN_LEN] = digits
            .try_into()
            .map_err(|_| PinError::Length(digits.len()))?;
        Self::new(arr)
    }

    pub fn digits(&self) -> &[u8; PIN_LEN] {
        &self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// ASCII rendering, e.g. `b"0123"`.
    pub fn to_ascii(&self) -> [u8; PIN_LEN] {
        let mut out = [0u8; PIN_LEN];
        for (o, &d) in out.iter_mut().zip(self.0.iter()) {
            *o = b'0' + d;
        }
        out
    }

    /// Numeric value of the decimal rendering ("0123" -> 123).
    pub fn value(&self) -> u16 {
        self.0.iter().fold(0u16, |acc, &d| acc * 10 + d as u16)
    }

    /// Bitmask of the digits present (bit d set for digit d).
    pub fn digit_mask(&self) -> u16 {
        self.0.iter().fold(0u16, |acc, &d| acc | (1u16 << d))
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &d in &self.0 {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl FromStr for Pin {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != PIN_LEN {
            return Err(PinError::Length(bytes.len()));
        }
        let mut digits = [0u8; PIN_LEN];
        for (o, &b) in digits.iter_mut().zip(bytes.iter()) {
            if !b.is_ascii_digit() {
                return Err(PinError::BadDigit(b));
            }
            *o = b - b'0';
        }
        Pin::new(digits)
    }
}
