use crate::codec::{Codec, FormatCodec};
use crate::error::SerializerError;
use dser_compression::Compressor;
use dser_domain::{CompressionKind, SerializationKind, SerializerRepresentation};
use dser_registry::{ResolvedConfiguration, Shape};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A codec and compressor bound to one resolved configuration.
///
/// Every operation first applies the configuration's unregistered-type policy to the payload
/// type. Compression applies to byte payloads only.
#[derive(Debug)]
pub struct ObjectSerializer {
    representation: SerializerRepresentation,
    configuration: Arc<ResolvedConfiguration>,
    codec: Codec,
    compressor: Arc<dyn Compressor>,
}

impl ObjectSerializer {
    pub(crate) fn new(
        representation: SerializerRepresentation,
        configuration: Arc<ResolvedConfiguration>,
        codec: Codec,
        compressor: Arc<dyn Compressor>,
    ) -> Self {
        Self { representation, configuration, codec, compressor }
    }

    #[must_use]
    pub const fn representation(&self) -> &SerializerRepresentation {
        &self.representation
    }

    #[must_use]
    pub fn configuration(&self) -> &Arc<ResolvedConfiguration> {
        &self.configuration
    }

    #[must_use]
    pub const fn codec(&self) -> &Codec {
        &self.codec
    }

    #[must_use]
    pub fn kind(&self) -> SerializationKind {
        self.codec.kind()
    }

    /// String payload written for an absent value.
    #[must_use]
    pub fn null_string(&self) -> &str {
        self.codec.null_string()
    }

    /// # Errors
    /// Returns [`SerializerError::UnsupportedOperation`] when compression is configured,
    /// [`SerializerError::Registry`] when `T` is rejected as unregistered, or the codec error.
    pub fn serialize_to_string<T>(&self, value: &T) -> Result<String, SerializerError>
    where
        T: Serialize + Shape,
    {
        self.ensure_uncompressed()?;
        self.configuration.check_registered(&T::shape())?;
        self.codec.encode_string(value)
    }

    /// # Errors
    /// Returns [`SerializerError::Registry`] when `T` is rejected as unregistered, or the codec
    /// error.
    pub fn serialize_to_bytes<T>(&self, value: &T) -> Result<Vec<u8>, SerializerError>
    where
        T: Serialize + Shape,
    {
        self.configuration.check_registered(&T::shape())?;
        let bytes = self.codec.encode_bytes(value)?;
        Ok(self.compressor.compress(&bytes))
    }

    /// # Errors
    /// Same as [`Self::serialize_to_string`], with decoding failures in place of encoding ones.
    pub fn deserialize_from_string<T>(&self, payload: &str) -> Result<T, SerializerError>
    where
        T: DeserializeOwned + Shape,
    {
        self.ensure_uncompressed()?;
        self.configuration.check_registered(&T::shape())?;
        self.codec.decode_string(payload)
    }

    /// # Errors
    /// Returns [`SerializerError::Compression`] for corrupt compressed payloads, plus the
    /// failures of [`Self::serialize_to_bytes`].
    pub fn deserialize_from_bytes<T>(&self, payload: &[u8]) -> Result<T, SerializerError>
    where
        T: DeserializeOwned + Shape,
    {
        self.configuration.check_registered(&T::shape())?;
        let bytes = self.compressor.decompress(payload)?;
        self.codec.decode_bytes(&bytes)
    }

    fn ensure_uncompressed(&self) -> Result<(), SerializerError> {
        match self.representation.compression_kind {
            CompressionKind::None => Ok(()),
            compression => Err(SerializerError::unsupported_operation(format!(
                "string payloads cannot be compressed with `{compression}`"
            ))),
        }
    }
}
