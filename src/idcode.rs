// Copyright 2023-2024 The Regents of the University of California
// Copyright 2024-2025 Cornell University
// released under BSD 3-Clause License

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Error for id tokens that cannot be represented as an [`IdCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidIdCode {
    #[error("id code must not be empty")]
    Empty,
    #[error("id code contains a character outside of '!'..='~'")]
    InvalidChar,
    #[error("id code is too long to pack into 64 bits")]
    TooLong,
}

/// Opaque identity of a signal's value-change stream.
///
/// VCD files identify signals by short tokens of printable ASCII characters
/// (`!` through `~`). Several variable declarations may carry the same id
/// code; they are aliases and observe the same timeline. The token is packed
/// into a `u64` so that the code is a cheap `Copy` hash-map key, and
/// [`Display`] reproduces the exact token that was parsed: no normalization,
/// case folding or trimming is ever applied.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct IdCode(u64);

const ID_CHAR_MIN: u8 = b'!';
const ID_CHAR_MAX: u8 = b'~';
const NUM_ID_CHARS: u64 = (ID_CHAR_MAX - ID_CHAR_MIN + 1) as u64;

impl IdCode {
    fn pack(token: &[u8]) -> Result<Self, InvalidIdCode> {
        if token.is_empty() {
            return Err(InvalidIdCode::Empty);
        }
        let mut value = 0u64;
        for &byte in token.iter().rev() {
            if !(ID_CHAR_MIN..=ID_CHAR_MAX).contains(&byte) {
                return Err(InvalidIdCode::InvalidChar);
            }
            let digit = (byte - ID_CHAR_MIN) as u64 + 1;
            value = value
                .checked_mul(NUM_ID_CHARS)
                .and_then(|v| v.checked_add(digit))
                .ok_or(InvalidIdCode::TooLong)?;
        }
        Ok(IdCode(value - 1))
    }

    /// The id code with the shortest representation (`"!"`).
    pub const FIRST: IdCode = IdCode(0);

    /// The id code following this one, for producers that allocate their own codes.
    #[inline]
    pub fn next(&self) -> IdCode {
        IdCode(self.0 + 1)
    }
}

impl FromStr for IdCode {
    type Err = InvalidIdCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdCode::pack(s.as_bytes())
    }
}

impl From<u32> for IdCode {
    fn from(value: u32) -> Self {
        IdCode(value as u64)
    }
}

impl From<u64> for IdCode {
    fn from(value: u64) -> Self {
        IdCode(value)
    }
}

impl Display for IdCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        loop {
            let digit = value % NUM_ID_CHARS;
            write!(f, "{}", (digit as u8 + ID_CHAR_MIN) as char)?;
            if value < NUM_ID_CHARS {
                return Ok(());
            }
            value = value / NUM_ID_CHARS - 1;
        }
    }
}
