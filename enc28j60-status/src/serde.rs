//! Serialization of decoded vectors.
//!
//! Only [Serialize] is provided. Field results refer to static field tables and are
//! rebuilt by decoding the `hex` of a serialized vector.
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::protocol::{FieldResult, StatusVector};

impl Serialize for FieldResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bits = self.bits();
        let mut state = serializer.serialize_struct("FieldResult", 7)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("first_bit", bits.start())?;
        state.serialize_field("last_bit", bits.end())?;
        state.serialize_field("value", &self.value())?;
        state.serialize_field("display", &self.formatted_value())?;
        state.serialize_field("classification", &self.classification())?;
        state.serialize_field("description", self.description())?;
        state.end()
    }
}

impl Serialize for StatusVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("StatusVector", 4)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("hex", &self.to_hex())?;
        state.serialize_field("healthy", &self.is_healthy())?;
        state.serialize_field("fields", self.fields())?;
        state.end()
    }
}
