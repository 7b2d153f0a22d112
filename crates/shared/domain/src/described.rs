//! The self-describing envelope produced by serialization.

use crate::kinds::SerializationFormat;
use crate::representation::{SerializerRepresentation, TypeRepresentation};
use serde::{Deserialize, Serialize};

/// The serialized payload. Exactly one shape exists per value, so the format can never disagree
/// with the stored data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "format", content = "payload")]
pub enum SerializedPayload {
    Null,
    String(String),
    Binary(Vec<u8>),
    /// A persisted envelope whose format tag is unknown to this build.
    #[serde(other)]
    Unsupported,
}

impl SerializedPayload {
    #[must_use]
    pub const fn format(&self) -> SerializationFormat {
        match self {
            Self::Null => SerializationFormat::Null,
            Self::String(_) => SerializationFormat::String,
            Self::Binary(_) => SerializationFormat::Binary,
            Self::Unsupported => SerializationFormat::Invalid,
        }
    }
}

/// Payload plus everything required to turn it back into an object.
///
/// Immutable once built. Carries the serializer identity by value, never a live serializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DescribedSerialization {
    payload_type_representation: TypeRepresentation,
    #[serde(flatten)]
    payload: SerializedPayload,
    serializer_representation: SerializerRepresentation,
}

impl DescribedSerialization {
    #[must_use]
    pub const fn new(
        payload_type_representation: TypeRepresentation,
        payload: SerializedPayload,
        serializer_representation: SerializerRepresentation,
    ) -> Self {
        Self { payload_type_representation, payload, serializer_representation }
    }

    #[must_use]
    pub const fn payload_type_representation(&self) -> &TypeRepresentation {
        &self.payload_type_representation
    }

    #[must_use]
    pub const fn payload(&self) -> &SerializedPayload {
        &self.payload
    }

    #[must_use]
    pub const fn serializer_representation(&self) -> &SerializerRepresentation {
        &self.serializer_representation
    }

    #[must_use]
    pub const fn format(&self) -> SerializationFormat {
        self.payload.format()
    }

    /// The string payload, if this envelope carries one.
    #[must_use]
    pub fn payload_string(&self) -> Option<&str> {
        match &self.payload {
            SerializedPayload::String(s) => Some(s),
            _ => None,
        }
    }

    /// The binary payload, if this envelope carries one.
    #[must_use]
    pub fn payload_binary(&self) -> Option<&[u8]> {
        match &self.payload {
            SerializedPayload::Binary(b) => Some(b),
            _ => None,
        }
    }
}
