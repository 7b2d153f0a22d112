mod minimal;

use super::FormatCodec;
use crate::error::{SerializerError, SerializerErrorExt};
use dser_domain::{JsonFormattingKind, SerializationKind};
use dser_registry::Shape;
use serde::Serialize;
use serde::de::DeserializeOwned;
use minimal::SkipNoneFields;

/// Textual JSON through `serde_json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    formatting: JsonFormattingKind,
}

impl JsonCodec {
    #[must_use]
    pub const fn new(formatting: JsonFormattingKind) -> Self {
        Self { formatting }
    }

    #[must_use]
    pub const fn formatting(&self) -> JsonFormattingKind {
        self.formatting
    }
}

impl FormatCodec for JsonCodec {
    fn kind(&self) -> SerializationKind {
        SerializationKind::Json
    }

    fn encode_string<T: Serialize + Shape>(&self, value: &T) -> Result<String, SerializerError> {
        match self.formatting {
            JsonFormattingKind::Minimal => {
                serde_json::to_string(&SkipNoneFields(value)).context("JSON encoding failed")
            },
            JsonFormattingKind::Compact => {
                serde_json::to_string(value).context("JSON encoding failed")
            },
            JsonFormattingKind::Concise => {
                serde_json::to_string_pretty(value).context("JSON encoding failed")
            },
        }
    }

    fn encode_bytes<T: Serialize + Shape>(&self, value: &T) -> Result<Vec<u8>, SerializerError> {
        self.encode_string(value).map(String::into_bytes)
    }

    fn decode_string<T: DeserializeOwned>(&self, payload: &str) -> Result<T, SerializerError> {
        serde_json::from_str(payload).context("JSON decoding failed")
    }

    fn decode_bytes<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, SerializerError> {
        serde_json::from_slice(payload).context("JSON decoding failed")
    }
}
