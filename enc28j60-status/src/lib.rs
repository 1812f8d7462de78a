//! # ENC28J60 Status Vector Decoder
//!
//! This crate decodes the status vectors reported by the Microchip ENC28J60 Ethernet
//! controller into named, classified fields.
//!
//! ## Overview
//!
//! The controller describes every frame it handles with a small status word:
//!
//! - **Receive Status Vector (RSV)**: 4 bytes stored in front of every received frame
//! - **Transmit Status Vector (TSV)**: 7 bytes written behind every transmitted frame
//!
//! When debugging a driver, these words usually show up as hex dumps in a serial log
//! or a register read-out. This library turns such a dump into one [FieldResult] per
//! field of the vector, each carrying the extracted value and a [Classification]:
//!
//! - **Healthy**: the value is what a successfully handled frame reports
//! - **Error**: the value indicates a problem (CRC error, late collision, oversized frame, ...)
//! - **Neutral**: informational only (broadcast, VLAN tagged, ...)
//!
//! ## Basic Usage
//!
//! ### Decoding a Receive Status Vector
//!
//! ```
//! use enc28j60_status::{Classification, VectorKind, decode};
//!
//! // 60 bytes, received OK, broadcast
//! let vector = decode("0x3c 0x00 0x80 0x02").expect("Vector should decode");
//! assert_eq!(vector.kind(), VectorKind::Receive);
//! assert!(vector.is_healthy());
//!
//! let count = vector.field("Received Byte Count").unwrap();
//! assert_eq!(count.value(), 60);
//! assert_eq!(count.classification(), Classification::Healthy);
//! ```
//!
//! ### Decoding a Transmit Status Vector
//!
//! ```
//! use enc28j60_status::{StatusVector, VectorKind};
//!
//! let vector = StatusVector::from_bytes(&[0x40, 0x00, 0x80, 0x00, 0x40, 0x00, 0x00])
//!     .expect("Seven bytes are a transmit status vector");
//! assert_eq!(vector.kind(), VectorKind::Transmit);
//! for field in vector.fields() {
//!     println!("{:<32} {:>5} {}", field.name(), field.formatted_value(), field.classification());
//! }
//! ```
//!
//! ## Input Format
//!
//! Every `0x` and all whitespace are removed before decoding, so `3c008002`,
//! `3C 00 80 02` and `0x3c 0x00 0x80 0x02` are equivalent. What remains must be exactly
//! 8 (receive) or 14 (transmit) hex digits. Byte 0 holds bits 0-7 of the vector,
//! multi-byte counts are little-endian.
//!
//! ## Error Handling
//!
//! Decoding returns a [DecodeOutcome], which fails with a [error::DecodeError] when the
//! length or a character of the input is invalid. No fields are produced in that case.
//!
//! ## Features
//!
//! - `serde`: `Serialize` implementations for decoded vectors
//! - `tokio`: [stream::DebugLogCodec], a `tokio_util` decoder that picks dumped
//!   vectors out of firmware debug logs, and the blocking [stream::LogScanner]
//!
//! ## Thread Safety
//!
//! Decoding is a pure function over static field tables. All types in this library are
//! `Send` and `Sync` and can be used from any number of threads without coordination.

pub mod protocol;
pub use protocol::*;
pub mod codec;
pub use codec::{decode, decode_as, normalize};
pub mod error;
pub mod fields;
#[cfg(feature = "serde")]
mod serde;
#[cfg(feature = "tokio")]
pub mod stream;
