use std::{fmt::Display, ops::RangeInclusive};

use crate::{
    error::DecodeError,
    fields::{Extract, FieldDefinition, RECEIVE_FIELDS, TRANSMIT_FIELDS},
};

/// The two status vectors the controller reports.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VectorKind {
    /// The 32 bit Receive Status Vector (RSV) preceding every received frame.
    Receive,
    /// The 56 bit Transmit Status Vector (TSV) written after every transmitted frame.
    Transmit,
}

impl VectorKind {
    /// Number of bytes in a vector of this kind
    pub const fn byte_len(self) -> usize {
        match self {
            VectorKind::Receive => 4,
            VectorKind::Transmit => 7,
        }
    }

    /// Number of hex digits in the textual form of a vector of this kind
    pub const fn hex_len(self) -> usize {
        self.byte_len() * 2
    }

    /// Detects the kind of a vector from the number of hex digits.
    pub fn from_hex_len(len: usize) -> Option<VectorKind> {
        match len {
            8 => Some(VectorKind::Receive),
            14 => Some(VectorKind::Transmit),
            _ => None,
        }
    }

    /// The ordered field table for this kind, lowest bit first.
    pub fn fields(self) -> &'static [FieldDefinition] {
        match self {
            VectorKind::Receive => &RECEIVE_FIELDS,
            VectorKind::Transmit => &TRANSMIT_FIELDS,
        }
    }

    /// Short name, as the firmware prints it in front of a dumped vector
    pub fn name(self) -> &'static str {
        match self {
            VectorKind::Receive => "Receive",
            VectorKind::Transmit => "Transmit",
        }
    }
}

impl Display for VectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Status Vector", self.name())
    }
}

/// Health verdict attached to every decoded field.
///
/// The presentation layer decides how to show it (e.g. green for healthy, red for errors).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Classification {
    /// The value is what a successfully handled frame reports.
    Healthy,
    /// The value indicates a problem with the frame or the controller.
    Error,
    /// Informational only.
    Neutral,
}

impl Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Classification::Healthy => "healthy",
            Classification::Error => "error",
            Classification::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// A single decoded field of a status vector.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldResult {
    definition: &'static FieldDefinition,
    value: u16,
    classification: Classification,
}

impl FieldResult {
    pub(crate) fn new(
        definition: &'static FieldDefinition,
        value: u16,
        classification: Classification,
    ) -> FieldResult {
        FieldResult {
            definition,
            value,
            classification,
        }
    }

    pub fn name(&self) -> &'static str {
        self.definition.name()
    }

    pub fn description(&self) -> &'static str {
        self.definition.description()
    }

    /// The extracted value. Flags keep their mask applied, so a set flag is not necessarily `1`.
    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Bits of the status vector this field was read from
    pub fn bits(&self) -> RangeInclusive<u8> {
        self.definition.extract().bits()
    }

    /// Whether this field is a yes/no flag rather than a count
    pub fn is_flag(&self) -> bool {
        matches!(self.definition.extract(), Extract::Flag { .. })
    }

    /// The value as shown to humans: `Yes`/`No` for flags, the decimal number otherwise.
    pub fn formatted_value(&self) -> String {
        if self.is_flag() {
            let text = if self.value != 0 { "Yes" } else { "No" };
            text.to_string()
        } else {
            self.value.to_string()
        }
    }

    pub fn definition(&self) -> &'static FieldDefinition {
        self.definition
    }
}

impl Display for FieldResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name(), self.formatted_value())
    }
}

/// A decoded status vector: the raw bytes and one [FieldResult] per field of its kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusVector {
    kind: VectorKind,
    bytes: Box<[u8]>,
    fields: Vec<FieldResult>,
}

impl StatusVector {
    pub(crate) fn new(kind: VectorKind, bytes: Box<[u8]>, fields: Vec<FieldResult>) -> Self {
        StatusVector {
            kind,
            bytes,
            fields,
        }
    }

    pub fn kind(&self) -> VectorKind {
        self.kind
    }

    /// The raw bytes, byte 0 holding bits 0-7.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// All fields in table order
    pub fn fields(&self) -> &[FieldResult] {
        &self.fields
    }

    /// Looks up a field by its name.
    pub fn field(&self, name: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Fields classified as [Classification::Error]
    pub fn errors(&self) -> impl Iterator<Item = &FieldResult> {
        self.fields
            .iter()
            .filter(|field| field.classification() == Classification::Error)
    }

    /// `true` if no field is classified as an error.
    pub fn is_healthy(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Outcome of decoding a single textual status vector
pub type DecodeOutcome = Result<StatusVector, DecodeError>;

#[test]
fn kind_lengths() {
    assert_eq!(VectorKind::Receive.hex_len(), 8);
    assert_eq!(VectorKind::Transmit.hex_len(), 14);
    assert_eq!(VectorKind::from_hex_len(8), Some(VectorKind::Receive));
    assert_eq!(VectorKind::from_hex_len(14), Some(VectorKind::Transmit));
    assert_eq!(VectorKind::from_hex_len(7), None);
    assert_eq!(VectorKind::from_hex_len(0), None);
}

#[test]
fn kind_display() {
    assert_eq!(VectorKind::Receive.to_string(), "Receive Status Vector");
    assert_eq!(VectorKind::Transmit.to_string(), "Transmit Status Vector");
}

#[test]
fn status_types_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StatusVector>();
    assert_send_sync::<FieldResult>();
    assert_send_sync::<DecodeError>();
}
