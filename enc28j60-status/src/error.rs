use std::{error::Error, fmt::Display};

use crate::protocol::VectorKind;

#[cfg(feature = "tokio")]
use std::io;

/// Errors that may occur when decoding a status vector.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DecodeError {
    /// The normalized input is neither 8 (receive) nor 14 (transmit) hex digits long.
    /// Carries the number of hex digits that were found.
    InvalidLength(usize),
    /// A character at the given position of the normalized input is not a hex digit.
    InvalidCharacter { position: usize, character: char },
    /// The vector decoded fine, but is not of the kind that was asked for.
    KindMismatch {
        expected: VectorKind,
        found: VectorKind,
    },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidLength(len) => write!(
                f,
                "Not a valid status vector: expected 8 (receive) or 14 (transmit) hex digits, got {}. Single-digit bytes need a leading zero",
                len
            ),
            DecodeError::InvalidCharacter {
                position,
                character,
            } => write!(
                f,
                "Invalid hex digit {:?} at position {}",
                character, position
            ),
            DecodeError::KindMismatch { expected, found } => {
                write!(f, "Expected a {}, but got a {}", expected, found)
            }
        }
    }
}

impl Error for DecodeError {}

/// Errors that may occur when scanning a debug log stream.
#[cfg(feature = "tokio")]
#[derive(Debug)]
pub enum StreamError {
    IoError(io::Error),
    LineTooLong { max: usize, got: usize },
}

#[cfg(feature = "tokio")]
impl From<io::Error> for StreamError {
    fn from(value: io::Error) -> Self {
        StreamError::IoError(value)
    }
}

#[cfg(feature = "tokio")]
impl Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::IoError(error) => write!(f, "{}", error),
            StreamError::LineTooLong { max, got } => {
                write!(f, "Log line too long! Maximum is {}, but got {}", max, got)
            }
        }
    }
}

#[cfg(feature = "tokio")]
impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamError::IoError(error) => Some(error),
            StreamError::LineTooLong { .. } => None,
        }
    }
}

#[test]
fn invalid_length_mentions_leading_zero() {
    let msg = DecodeError::InvalidLength(7).to_string();
    assert!(msg.contains("got 7"));
    assert!(msg.contains("leading zero"));
}
