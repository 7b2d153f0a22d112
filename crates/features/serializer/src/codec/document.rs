use super::FormatCodec;
use crate::error::{SerializerError, SerializerErrorExt};
use base64::{Engine as _, engine::general_purpose};
use dser_domain::SerializationKind;
use dser_registry::Shape;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Compact binary documents through `postcard`. The string form is standard base64.
///
/// The format is not self-describing: payloads decode only into the exact type layout that
/// wrote them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentCodec;

impl FormatCodec for DocumentCodec {
    fn kind(&self) -> SerializationKind {
        SerializationKind::Document
    }

    fn encode_string<T: Serialize + Shape>(&self, value: &T) -> Result<String, SerializerError> {
        self.encode_bytes(value).map(|bytes| general_purpose::STANDARD.encode(bytes))
    }

    fn encode_bytes<T: Serialize + Shape>(&self, value: &T) -> Result<Vec<u8>, SerializerError> {
        postcard::to_stdvec(value).context("Postcard encoding failed")
    }

    fn decode_string<T: DeserializeOwned>(&self, payload: &str) -> Result<T, SerializerError> {
        let bytes =
            general_purpose::STANDARD.decode(payload).context("Document payload is not base64")?;
        self.decode_bytes(&bytes)
    }

    fn decode_bytes<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, SerializerError> {
        postcard::from_bytes(payload).context("Postcard decoding failed")
    }
}
