//! Format families. Each codec turns a value into a string or byte payload and back.

mod document;
mod json;
mod property_bag;

pub use document::DocumentCodec;
pub use json::JsonCodec;
pub use property_bag::PropertyBagCodec;

use crate::error::SerializerError;
use dser_domain::{FormatOptions, SerializationKind};
use dser_registry::Shape;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Payload string written for an absent value, unless a family configures its own.
pub const NULL_STRING: &str = "null";

/// Encoding and decoding of one serialization family.
pub trait FormatCodec: fmt::Debug + Send + Sync {
    fn kind(&self) -> SerializationKind;

    /// String payload standing for an absent value.
    fn null_string(&self) -> &str {
        NULL_STRING
    }

    /// # Errors
    /// Returns the codec's error when `value` cannot be represented in this family.
    fn encode_string<T: Serialize + Shape>(&self, value: &T) -> Result<String, SerializerError>;

    /// # Errors
    /// Returns the codec's error when `value` cannot be represented in this family.
    fn encode_bytes<T: Serialize + Shape>(&self, value: &T) -> Result<Vec<u8>, SerializerError>;

    /// # Errors
    /// Returns the codec's error when `payload` is malformed or does not fit `T`.
    fn decode_string<T: DeserializeOwned>(&self, payload: &str) -> Result<T, SerializerError>;

    /// # Errors
    /// Returns the codec's error when `payload` is malformed or does not fit `T`.
    fn decode_bytes<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, SerializerError>;
}

/// The codec of a resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codec {
    Json(JsonCodec),
    Document(DocumentCodec),
    PropertyBag(PropertyBagCodec),
}

impl Codec {
    /// Builds the codec of `kind` from the format options of a configuration.
    ///
    /// # Errors
    /// Returns [`SerializerError::UnsupportedFormat`] for [`SerializationKind::Invalid`] and
    /// [`SerializerError::ArgumentOutOfRange`] for unusable property-bag delimiters.
    pub fn for_configuration(
        kind: SerializationKind,
        options: &FormatOptions,
    ) -> Result<Self, SerializerError> {
        match kind {
            SerializationKind::Json => Ok(Self::Json(JsonCodec::new(options.json_formatting))),
            SerializationKind::Document => Ok(Self::Document(DocumentCodec)),
            SerializationKind::PropertyBag => {
                PropertyBagCodec::new(options.property_bag.clone()).map(Self::PropertyBag)
            },
            SerializationKind::Invalid => Err(SerializerError::UnsupportedFormat {
                message: "serialization kind is invalid".into(),
                context: None,
            }),
        }
    }
}

impl FormatCodec for Codec {
    fn kind(&self) -> SerializationKind {
        match self {
            Self::Json(codec) => codec.kind(),
            Self::Document(codec) => codec.kind(),
            Self::PropertyBag(codec) => codec.kind(),
        }
    }

    fn null_string(&self) -> &str {
        match self {
            Self::Json(codec) => codec.null_string(),
            Self::Document(codec) => codec.null_string(),
            Self::PropertyBag(codec) => codec.null_string(),
        }
    }

    fn encode_string<T: Serialize + Shape>(&self, value: &T) -> Result<String, SerializerError> {
        match self {
            Self::Json(codec) => codec.encode_string(value),
            Self::Document(codec) => codec.encode_string(value),
            Self::PropertyBag(codec) => codec.encode_string(value),
        }
    }

    fn encode_bytes<T: Serialize + Shape>(&self, value: &T) -> Result<Vec<u8>, SerializerError> {
        match self {
            Self::Json(codec) => codec.encode_bytes(value),
            Self::Document(codec) => codec.encode_bytes(value),
            Self::PropertyBag(codec) => codec.encode_bytes(value),
        }
    }

    fn decode_string<T: DeserializeOwned>(&self, payload: &str) -> Result<T, SerializerError> {
        match self {
            Self::Json(codec) => codec.decode_string(payload),
            Self::Document(codec) => codec.decode_string(payload),
            Self::PropertyBag(codec) => codec.decode_string(payload),
        }
    }

    fn decode_bytes<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, SerializerError> {
        match self {
            Self::Json(codec) => codec.decode_bytes(payload),
            Self::Document(codec) => codec.decode_bytes(payload),
            Self::PropertyBag(codec) => codec.decode_bytes(payload),
        }
    }
}
