//! Text and byte decoding of status vectors
use std::{fmt::Write, str::FromStr};

use crate::{
    error::DecodeError,
    fields::{Extract, FieldDefinition},
    protocol::{DecodeOutcome, FieldResult, StatusVector, VectorKind},
};

const HEX_PREFIX: &str = "0x";

/// Removes every `0x` and all whitespace from a hex dump.
///
/// Nothing else is touched: case and order of the remaining characters are kept.
pub fn normalize(raw: &str) -> String {
    raw.replace(HEX_PREFIX, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Indexed access to the bytes of a vector whose length has been validated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ByteReader {
    kind: VectorKind,
    bytes: Box<[u8]>,
}

impl ByteReader {
    /// Reads a normalized hex string, see [normalize].
    ///
    /// The length decides the kind of the vector and is checked before the characters.
    pub fn new(hex: &str) -> Result<ByteReader, DecodeError> {
        let len = hex.chars().count();
        let kind = VectorKind::from_hex_len(len).ok_or(DecodeError::InvalidLength(len))?;

        let mut digits = Vec::with_capacity(len);
        for (position, character) in hex.chars().enumerate() {
            let digit = character
                .to_digit(16)
                .ok_or(DecodeError::InvalidCharacter {
                    position,
                    character,
                })?;
            digits.push(digit as u8);
        }

        let bytes = digits
            .chunks_exact(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect();
        Ok(ByteReader { kind, bytes })
    }

    /// Wraps bytes exactly as they are read from the controller's buffer memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<ByteReader, DecodeError> {
        let len = bytes.len() * 2;
        let kind = VectorKind::from_hex_len(len).ok_or(DecodeError::InvalidLength(len))?;
        Ok(ByteReader {
            kind,
            bytes: bytes.into(),
        })
    }

    pub fn kind(&self) -> VectorKind {
        self.kind
    }

    /// Byte `index`, holding bits `8 * index` to `8 * index + 7`.
    pub fn byte(&self, index: usize) -> u8 {
        self.bytes[index]
    }

    /// The hex digit at `digit` of the textual vector.
    pub fn nibble(&self, digit: usize) -> u8 {
        let byte = self.byte(digit / 2);
        if digit % 2 == 0 { byte >> 4 } else { byte & 0x0F }
    }

    /// A little-endian 16 bit value starting at byte `low`.
    pub fn le_u16(&self, low: usize) -> u16 {
        u16::from_le_bytes([self.byte(low), self.byte(low + 1)])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Extract {
    pub fn read(&self, reader: &ByteReader) -> u16 {
        match *self {
            Extract::ByteCount { low } => reader.le_u16(low),
            Extract::Flag { digit, mask } => (reader.nibble(digit) & mask) as u16,
            Extract::Nibble { digit } => reader.nibble(digit) as u16,
        }
    }
}

impl FieldDefinition {
    /// Reads and classifies this field.
    pub fn evaluate(&'static self, reader: &ByteReader) -> FieldResult {
        let value = self.extract().read(reader);
        FieldResult::new(self, value, self.rule().classify(value))
    }
}

impl StatusVector {
    /// Decodes a hex dump such as `"0x3c 0x00 0x80 0x00"` or `"3c008000"`.
    pub fn from_hex(raw: &str) -> DecodeOutcome {
        let hex = normalize(raw);
        let reader = ByteReader::new(&hex)?;
        log::trace!("Decoding {} from {:?}", reader.kind(), hex);
        Ok(StatusVector::from_reader(reader))
    }

    /// Decodes the 4 or 7 raw bytes of a status vector.
    pub fn from_bytes(bytes: &[u8]) -> DecodeOutcome {
        let reader = ByteReader::from_bytes(bytes)?;
        log::trace!("Decoding {} from {:02x?}", reader.kind(), bytes);
        Ok(StatusVector::from_reader(reader))
    }

    fn from_reader(reader: ByteReader) -> StatusVector {
        let kind = reader.kind();
        let fields = kind
            .fields()
            .iter()
            .map(|field| field.evaluate(&reader))
            .collect();
        StatusVector::new(kind, reader.bytes, fields)
    }

    /// The canonical lowercase hex form, as accepted by [StatusVector::from_hex].
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(self.bytes().len() * 2);
        for byte in self.bytes() {
            // Writing to a String cannot fail
            let _ = write!(out, "{:02x}", byte);
        }
        out
    }
}

impl FromStr for StatusVector {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusVector::from_hex(s)
    }
}

/// Decodes a textual receive or transmit status vector.
///
/// The kind is detected from the number of hex digits left after [normalize].
pub fn decode(raw: &str) -> DecodeOutcome {
    StatusVector::from_hex(raw)
}

/// Like [decode], but the vector must be of the given kind.
pub fn decode_as(kind: VectorKind, raw: &str) -> DecodeOutcome {
    let vector = decode(raw)?;
    if vector.kind() != kind {
        return Err(DecodeError::KindMismatch {
            expected: kind,
            found: vector.kind(),
        });
    }
    Ok(vector)
}

#[test]
fn normalize_strips_prefix_and_whitespace() {
    assert_eq!(normalize("0x00 00 08 08 00 00 00"), "00000808000000");
    assert_eq!(normalize("0x3c 0x00\t0x80\n0x00"), "3c008000");
    assert_eq!(normalize("AbCd"), "AbCd");
    assert_eq!(normalize(""), "");
}

#[test]
fn normalize_only_removes_literal_prefix() {
    // Prefix removal happens before whitespace removal
    assert_eq!(normalize("0 x12"), "0x12");
    assert_eq!(normalize("0X12"), "0X12");
}

#[test]
fn reader_bytes_and_nibbles() {
    let reader = ByteReader::new("3c00a5ff").unwrap();
    assert_eq!(reader.kind(), VectorKind::Receive);
    assert_eq!(reader.as_bytes(), &[0x3c, 0x00, 0xa5, 0xff]);
    assert_eq!(reader.nibble(4), 0xa);
    assert_eq!(reader.nibble(5), 0x5);
    assert_eq!(reader.le_u16(0), 0x003c);
}

#[test]
fn reader_accepts_mixed_case() {
    let lower = ByteReader::new("abcdef01").unwrap();
    let upper = ByteReader::new("ABCDEF01").unwrap();
    assert_eq!(lower, upper);
}

#[test]
fn reader_from_bytes() {
    let reader = ByteReader::from_bytes(&[0x40, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00]).unwrap();
    assert_eq!(reader.kind(), VectorKind::Transmit);
    assert_eq!(
        ByteReader::from_bytes(&[0x00; 5]),
        Err(DecodeError::InvalidLength(10))
    );
}
