use std::fmt::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Number of bytes in a (SHA-1) object ID.
pub const ID_LEN: usize = 20;

/// Number of hex digits in the text form of an object ID.
pub const HEX_LEN: usize = ID_LEN * 2;

/// An error which can be returned when parsing a git object ID.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ParseIdError {
    /// Value being parsed is empty.
    #[error("cannot parse object ID from empty string")]
    Empty,

    /// Contains an invalid digit.
    #[error("value contains invalid digit `{0}`")]
    InvalidDigit(char),

    /// Too many bytes or digits.
    #[error("value is more than 40 digits long")]
    Overflow,

    /// Too few bytes or digits.
    #[error("value is less than 40 digits long")]
    Underflow,
}

/// An object ID is a string that identifies an object within a repository.
/// It is stored as a 20-byte signature, but can also be represented as 40 hex digits.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id {
    id: [u8; ID_LEN],
}

impl Id {
    /// Create a new ID from a 20-byte slice.
    ///
    /// It is an error if the slice contains anything other than 20 bytes.
    pub fn new(id: &[u8]) -> Result<Id, ParseIdError> {
        match id.len() {
            ID_LEN => {
                let mut bytes = [0u8; ID_LEN];
                bytes.copy_from_slice(id);
                Ok(Id { id: bytes })
            }
            0 => Err(ParseIdError::Empty),
            n if n < ID_LEN => Err(ParseIdError::Underflow),
            _ => Err(ParseIdError::Overflow),
        }
    }

    /// Create an ID from exactly 20 raw bytes.
    pub fn from_bytes(id: [u8; ID_LEN]) -> Id {
        Id { id }
    }

    /// Returns the special all-null object ID, often used to stand in for no object.
    pub fn zero() -> Id {
        Id { id: [0; ID_LEN] }
    }

    /// Returns true if this is the all-null object ID.
    pub fn is_zero(&self) -> bool {
        self.id.iter().all(|b| *b == 0)
    }

    /// Convert a 40-character hex ID to an object ID.
    ///
    /// Either case is accepted for the hex digits. It is an error if the ID
    /// contains anything other than 40 hex digits.
    pub fn from_hex<T: AsRef<[u8]>>(id: T) -> Result<Id, ParseIdError> {
        let hex = id.as_ref();

        match hex.len() {
            HEX_LEN => {
                let mut bytes = [0u8; ID_LEN];
                for (byte, pair) in bytes.iter_mut().zip(hex.chunks(2)) {
                    *byte = digit_value(pair[0])? << 4 | digit_value(pair[1])?;
                }
                Ok(Id { id: bytes })
            }
            0 => Err(ParseIdError::Empty),
            n if n < HEX_LEN => Err(ParseIdError::Underflow),
            _ => Err(ParseIdError::Overflow),
        }
    }

    /// Returns the raw 20-byte form of the ID.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.id
    }

    /// Returns the path of the loose object file for this ID, relative to
    /// the `objects` directory: `xx/yyyy...` where `xx` is the first two hex
    /// digits.
    pub fn loose_path(&self) -> PathBuf {
        let hex = self.to_string();
        let mut path = PathBuf::from(&hex[..2]);
        path.push(&hex[2..]);
        path
    }
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::from_hex(s.as_bytes())
    }
}

static CHARS: &[u8] = b"0123456789abcdef";

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.id.iter() {
            f.write_char(CHARS[(byte >> 4) as usize].into())?;
            f.write_char(CHARS[(byte & 0xf) as usize].into())?;
        }

        Ok(())
    }
}

fn digit_value(c: u8) -> Result<u8, ParseIdError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(ParseIdError::InvalidDigit(c as char)),
    }
}
