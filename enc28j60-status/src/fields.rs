//! Field tables of the receive and transmit status vectors.
//!
//! Positions are given in hex digits of the textual vector, which is how the
//! controller's datasheet groups the flags: digit `2n` is the high nibble and
//! digit `2n + 1` the low nibble of byte `n`.
use std::ops::RangeInclusive;

use crate::protocol::Classification;

/// Largest Ethernet frame (including CRC) the byte count fields accept as healthy.
pub const MAX_FRAME_LEN: u16 = 1518;

/// How the value of a field is read from the vector.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Extract {
    /// A 16 bit little-endian count made of byte `low` and byte `low + 1`.
    ByteCount { low: usize },
    /// The hex digit at `digit`, masked with `mask`.
    Flag { digit: usize, mask: u8 },
    /// The complete hex digit at `digit`.
    Nibble { digit: usize },
}

impl Extract {
    /// Bits of the status word covered by this extraction
    pub fn bits(&self) -> RangeInclusive<u8> {
        match *self {
            Extract::ByteCount { low } => {
                let start = (low * 8) as u8;
                start..=start + 15
            }
            Extract::Flag { digit, mask } => {
                let base = nibble_base(digit);
                let first = mask.trailing_zeros() as u8;
                let last = 7 - mask.leading_zeros() as u8;
                base + first..=base + last
            }
            Extract::Nibble { digit } => {
                let base = nibble_base(digit);
                base..=base + 3
            }
        }
    }

    /// The highest hex digit this extraction touches
    pub fn last_digit(&self) -> usize {
        match *self {
            Extract::ByteCount { low } => low * 2 + 3,
            Extract::Flag { digit, .. } | Extract::Nibble { digit } => digit,
        }
    }
}

fn nibble_base(digit: usize) -> u8 {
    let byte = (digit / 2) as u8;
    if digit % 2 == 0 { byte * 8 + 4 } else { byte * 8 }
}

/// How an extracted value is classified.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Rule {
    /// Informational, never healthy or erroneous.
    Neutral,
    /// Healthy up to and including the limit, an error above.
    AtMost(u16),
    /// Healthy when zero (a clear flag or an empty count), an error otherwise.
    Zero,
    /// Healthy when non-zero (a set flag), an error otherwise.
    NonZero,
}

impl Rule {
    pub fn classify(&self, value: u16) -> Classification {
        let healthy = match *self {
            Rule::Neutral => return Classification::Neutral,
            Rule::AtMost(limit) => value <= limit,
            Rule::Zero => value == 0,
            Rule::NonZero => value != 0,
        };
        if healthy {
            Classification::Healthy
        } else {
            Classification::Error
        }
    }
}

/// Static description of one field of a status vector.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDefinition {
    name: &'static str,
    description: &'static str,
    extract: Extract,
    rule: Rule,
}

impl FieldDefinition {
    const fn byte_count(name: &'static str, low: usize, description: &'static str) -> Self {
        FieldDefinition {
            name,
            description,
            extract: Extract::ByteCount { low },
            rule: Rule::AtMost(MAX_FRAME_LEN),
        }
    }

    const fn flag(
        name: &'static str,
        digit: usize,
        mask: u8,
        rule: Rule,
        description: &'static str,
    ) -> Self {
        FieldDefinition {
            name,
            description,
            extract: Extract::Flag { digit, mask },
            rule,
        }
    }

    const fn nibble(name: &'static str, digit: usize, description: &'static str) -> Self {
        FieldDefinition {
            name,
            description,
            extract: Extract::Nibble { digit },
            rule: Rule::Zero,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn extract(&self) -> Extract {
        self.extract
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }
}

use Rule::{Neutral, NonZero, Zero};

/// Receive Status Vector fields, lowest bit first. Bits 17 and 19 are reserved and not listed.
pub static RECEIVE_FIELDS: [FieldDefinition; 15] = [
    FieldDefinition::byte_count(
        "Received Byte Count",
        0,
        "Indicates length of the received frame. This includes the destination address, source address, type/length, data, padding and CRC fields. This field is stored in little-endian format.",
    ),
    FieldDefinition::flag(
        "Long Event/Drop Event",
        5,
        0x01,
        Zero,
        "Indicates a packet over 50,000 bit times occurred or that a packet was dropped since the last receive.",
    ),
    FieldDefinition::flag(
        "Carrier Event Previously Seen",
        5,
        0x04,
        Neutral,
        "Indicates that at some time since the last receive, a carrier event was detected. The carrier event is not associated with this packet. A carrier event is activity on the receive channel that does not result in a packet receive attempt being made.",
    ),
    FieldDefinition::flag(
        "CRC Error",
        4,
        0x01,
        Zero,
        "Indicates that frame CRC field value does not match the CRC calculated by the MAC.",
    ),
    FieldDefinition::flag(
        "Length Check Error",
        4,
        0x02,
        Zero,
        "Indicates that frame length field value in the packet does not match the actual data byte length and specifies a valid length.",
    ),
    FieldDefinition::flag(
        "Length Out of Range",
        4,
        0x04,
        Neutral,
        "Indicates that frame type/length field was larger than 1500 bytes (type field).",
    ),
    FieldDefinition::flag(
        "Received OK",
        4,
        0x08,
        NonZero,
        "Indicates that the packet had a valid CRC and no symbol errors.",
    ),
    FieldDefinition::flag(
        "Receive Multicast Packet",
        7,
        0x01,
        Neutral,
        "Indicates packet received had a valid Multicast address.",
    ),
    FieldDefinition::flag(
        "Receive Broadcast Packet",
        7,
        0x02,
        Neutral,
        "Indicates packet received had a valid Broadcast address.",
    ),
    FieldDefinition::flag(
        "Dribble Nibble",
        7,
        0x04,
        Zero,
        "Indicates that after the end of this packet, an additional 1 to 7 bits were received. The extra bits were thrown away.",
    ),
    FieldDefinition::flag(
        "Receive Control Frame",
        7,
        0x08,
        Neutral,
        "Current frame was recognized as a control frame for having a valid type/length designating it as a control frame.",
    ),
    FieldDefinition::flag(
        "Receive Pause Control Frame",
        6,
        0x01,
        Neutral,
        "Current frame was recognized as a control frame containing a valid pause frame opcode and a valid destination address.",
    ),
    FieldDefinition::flag(
        "Receive Unknown Opcode",
        6,
        0x02,
        Neutral,
        "Current frame was recognized as a control frame but it contained an unknown opcode.",
    ),
    FieldDefinition::flag(
        "Receive VLAN Type Detected",
        6,
        0x04,
        Neutral,
        "Current frame was recognized as a VLAN tagged frame.",
    ),
    FieldDefinition::flag(
        "Reserved",
        6,
        0x08,
        Zero,
        "Reserved. This bit will always be '0'.",
    ),
];

/// Transmit Status Vector fields, lowest bit first.
pub static TRANSMIT_FIELDS: [FieldDefinition; 20] = [
    FieldDefinition::byte_count(
        "Transmit Byte Count",
        0,
        "Total bytes in frame not counting collided bytes.",
    ),
    FieldDefinition::nibble(
        "Transmit Collision Count",
        5,
        "Number of collisions the current packet incurred during transmission attempts. It applies to successfully transmitted packets and as such, will not show the possible maximum count of 16 collisions.",
    ),
    FieldDefinition::flag(
        "Transmit CRC Error",
        4,
        0x01,
        Zero,
        "The attached CRC in the packet did not match the internally generated CRC.",
    ),
    FieldDefinition::flag(
        "Transmit Length Check Error",
        4,
        0x02,
        Zero,
        "Indicates that frame length field value in the packet does not match the actual data byte length and is not a type field. MACON3.FRMLNEN must be set to get this error.",
    ),
    FieldDefinition::flag(
        "Transmit Length Out of Range",
        4,
        0x04,
        Neutral,
        "Indicates that frame type/length field was larger than 1500 bytes (type field).",
    ),
    FieldDefinition::flag(
        "Transmit Done",
        4,
        0x08,
        NonZero,
        "Transmission of the packet was completed.",
    ),
    FieldDefinition::flag(
        "Transmit Multicast",
        7,
        0x01,
        Neutral,
        "Packet's destination address was a Multicast address.",
    ),
    FieldDefinition::flag(
        "Transmit Broadcast",
        7,
        0x02,
        Neutral,
        "Packet's destination address was a Broadcast address.",
    ),
    FieldDefinition::flag(
        "Transmit Packet Defer",
        7,
        0x04,
        Neutral,
        "Packet was deferred for at least one attempt but less than an excessive defer.",
    ),
    FieldDefinition::flag(
        "Transmit Excessive Defer",
        7,
        0x08,
        Neutral,
        "Packet was deferred in excess of 24287 bit times (2.4287 ms).",
    ),
    FieldDefinition::flag(
        "Transmit Excessive Collision",
        6,
        0x01,
        Zero,
        "Packet was aborted after the number of collisions exceeded the retransmission maximum (MACLCON1).",
    ),
    FieldDefinition::flag(
        "Transmit Late Collision",
        6,
        0x02,
        Zero,
        "Collision occurred beyond the collision window (MACLCON2).",
    ),
    FieldDefinition::flag(
        "Transmit Giant",
        6,
        0x04,
        Neutral,
        "Byte count for frame was greater than MAMXFL.",
    ),
    FieldDefinition::flag(
        "Transmit Underrun",
        6,
        0x08,
        Zero,
        "Reserved. This bit will always be '0'.",
    ),
    FieldDefinition::byte_count(
        "Total Bytes Transmitted on Wire",
        4,
        "Total bytes transmitted on the wire for the current packet, including all bytes from collided attempts.",
    ),
    FieldDefinition::flag(
        "Transmit Control Frame",
        13,
        0x01,
        Neutral,
        "The frame transmitted was a control frame.",
    ),
    FieldDefinition::flag(
        "Transmit Pause Control Frame",
        13,
        0x02,
        Neutral,
        "The frame transmitted was a control frame with a valid pause opcode.",
    ),
    // Bit 50 on the datasheet, but dumps have always been read with this mask.
    FieldDefinition::flag(
        "Backpressure Applied",
        13,
        0x03,
        Neutral,
        "Carrier sense method backpressure was previously applied.",
    ),
    // Bit 51 on the datasheet, shifted down by one like Backpressure Applied.
    FieldDefinition::flag(
        "Transmit VLAN Frame",
        13,
        0x04,
        Neutral,
        "Frame's length/type field contained 8100h which is the VLAN protocol identifier.",
    ),
    FieldDefinition::nibble("Reserved", 12, "Reserved. These bits will always be '0'."),
];

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::VectorKind;

    #[test]
    fn offsets_stay_inside_vector() {
        for kind in [VectorKind::Receive, VectorKind::Transmit] {
            for field in kind.fields() {
                assert!(
                    field.extract().last_digit() < kind.hex_len(),
                    "{} reads past the end of a {}",
                    field.name(),
                    kind
                );
            }
        }
    }

    #[test]
    fn table_sizes() {
        assert_eq!(RECEIVE_FIELDS.len(), 15);
        assert_eq!(TRANSMIT_FIELDS.len(), 20);
    }

    #[test]
    fn flag_masks_are_nibble_sized() {
        for field in RECEIVE_FIELDS.iter().chain(TRANSMIT_FIELDS.iter()) {
            if let Extract::Flag { mask, .. } = field.extract() {
                assert!(mask != 0 && mask <= 0x0F, "{}", field.name());
            }
        }
    }

    #[test]
    fn bit_positions() {
        fn bits(fields: &[FieldDefinition], name: &str) -> RangeInclusive<u8> {
            fields
                .iter()
                .find(|f| f.name() == name)
                .map(|f| f.extract().bits())
                .unwrap()
        }
        assert_eq!(bits(&RECEIVE_FIELDS, "Received Byte Count"), 0..=15);
        assert_eq!(bits(&RECEIVE_FIELDS, "Long Event/Drop Event"), 16..=16);
        assert_eq!(bits(&RECEIVE_FIELDS, "Carrier Event Previously Seen"), 18..=18);
        assert_eq!(bits(&RECEIVE_FIELDS, "Received OK"), 23..=23);
        assert_eq!(bits(&RECEIVE_FIELDS, "Receive Multicast Packet"), 24..=24);
        assert_eq!(bits(&RECEIVE_FIELDS, "Reserved"), 31..=31);
        assert_eq!(bits(&TRANSMIT_FIELDS, "Transmit Collision Count"), 16..=19);
        assert_eq!(bits(&TRANSMIT_FIELDS, "Total Bytes Transmitted on Wire"), 32..=47);
        assert_eq!(bits(&TRANSMIT_FIELDS, "Transmit VLAN Frame"), 50..=50);
        assert_eq!(bits(&TRANSMIT_FIELDS, "Backpressure Applied"), 48..=49);
        assert_eq!(bits(&TRANSMIT_FIELDS, "Reserved"), 52..=55);
    }

    #[test]
    fn rules() {
        assert_eq!(Rule::AtMost(1518).classify(1518), Classification::Healthy);
        assert_eq!(Rule::AtMost(1518).classify(1519), Classification::Error);
        assert_eq!(Rule::Zero.classify(0), Classification::Healthy);
        assert_eq!(Rule::Zero.classify(4), Classification::Error);
        assert_eq!(Rule::NonZero.classify(8), Classification::Healthy);
        assert_eq!(Rule::NonZero.classify(0), Classification::Error);
        assert_eq!(Rule::Neutral.classify(1), Classification::Neutral);
        assert_eq!(Rule::Neutral.classify(0), Classification::Neutral);
    }
}
