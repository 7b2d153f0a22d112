//! Conversion between values and [`DescribedSerialization`] envelopes.

use crate::error::SerializerError;
use crate::factory::SerializerFactory;
use dser_domain::{
    CompressionKind, DescribedSerialization, MultiplicityStrategy, SerializationFormat,
    SerializedPayload, SerializerRepresentation, TypeMatchStrategy,
    UnregisteredTypeEncounteredStrategy,
};
use dser_registry::Shape;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serializes `value` into an envelope carrying its type and the serializer that wrote it.
///
/// An absent value becomes a [`SerializedPayload::Null`] in binary format and the serializer's
/// null string in string format.
///
/// # Errors
/// * [`SerializerError::UnsupportedOperation`] for formats other than string and binary, and
///   for compressed string payloads.
/// * Any failure of [`SerializerFactory::build_serializer`] or of the codec.
pub fn to_described_serialization<T>(
    factory: &SerializerFactory,
    value: Option<&T>,
    representation: &SerializerRepresentation,
    format: SerializationFormat,
    match_strategy: TypeMatchStrategy,
) -> Result<DescribedSerialization, SerializerError>
where
    T: Serialize + Shape,
{
    let compressed = representation.compression_kind != CompressionKind::None;
    match format {
        SerializationFormat::String if compressed => {
            return Err(SerializerError::unsupported_operation(format!(
                "`{}` compression cannot produce a string payload",
                representation.compression_kind
            )));
        },
        SerializationFormat::String | SerializationFormat::Binary => {},
        other => {
            return Err(SerializerError::unsupported_operation(format!(
                "cannot serialize into `{other}` format"
            )));
        },
    }

    let settings = factory.settings();
    let serializer = factory.build_serializer(
        representation,
        match_strategy,
        settings.multiplicity_strategy,
        settings.unregistered_type_strategy,
    )?;

    let payload = match (value, format) {
        (None, SerializationFormat::Binary) => SerializedPayload::Null,
        (None, _) => SerializedPayload::String(serializer.null_string().to_owned()),
        (Some(value), SerializationFormat::Binary) => {
            SerializedPayload::Binary(serializer.serialize_to_bytes(value)?)
        },
        (Some(value), _) => SerializedPayload::String(serializer.serialize_to_string(value)?),
    };

    Ok(DescribedSerialization::new(
        T::shape().representation().clone(),
        payload,
        representation.clone(),
    ))
}

/// Restores the value of an envelope.
///
/// Returns `None` for null payloads and for string payloads equal to the serializer's null
/// string.
///
/// # Errors
/// * [`SerializerError::TypeMismatch`] when the envelope does not describe `T` under
///   `match_strategy`.
/// * [`SerializerError::NotSupported`] for payload formats this build cannot read.
/// * Any failure of [`SerializerFactory::build_serializer`] or of the codec.
pub fn deserialize_payload<T>(
    factory: &SerializerFactory,
    envelope: &DescribedSerialization,
    match_strategy: TypeMatchStrategy,
    multiplicity: MultiplicityStrategy,
    strategy_override: Option<UnregisteredTypeEncounteredStrategy>,
) -> Result<Option<T>, SerializerError>
where
    T: DeserializeOwned + Shape,
{
    let shape = T::shape();
    let described = envelope.payload_type_representation();
    if !described.matches(shape.representation(), match_strategy) {
        return Err(SerializerError::TypeMismatch {
            expected: shape.to_string(),
            actual: described.to_string(),
            context: None,
        });
    }

    if matches!(envelope.payload(), SerializedPayload::Unsupported) {
        return Err(SerializerError::NotSupported {
            message: format!("payload format of `{described}` is not supported").into(),
            context: None,
        });
    }

    let serializer = factory.build_serializer(
        envelope.serializer_representation(),
        match_strategy,
        multiplicity,
        strategy_override,
    )?;

    match envelope.payload() {
        SerializedPayload::Null | SerializedPayload::Unsupported => Ok(None),
        SerializedPayload::String(text) if text == serializer.null_string() => Ok(None),
        SerializedPayload::String(text) => serializer.deserialize_from_string(text).map(Some),
        SerializedPayload::Binary(bytes) => serializer.deserialize_from_bytes(bytes).map(Some),
    }
}

/// Envelope conversions on serializable values.
///
/// Implemented for every `Serialize + Shape` type; uses the factory's default strategies.
pub trait DescribedSerializationExt: Serialize + Shape + Sized {
    /// # Errors
    /// See [`to_described_serialization`].
    fn to_described_serialization(
        &self,
        factory: &SerializerFactory,
        representation: &SerializerRepresentation,
        format: SerializationFormat,
    ) -> Result<DescribedSerialization, SerializerError> {
        to_described_serialization(
            factory,
            Some(self),
            representation,
            format,
            factory.settings().type_match_strategy,
        )
    }

    /// Restores a value of this type from `envelope`.
    ///
    /// # Errors
    /// See [`deserialize_payload`].
    fn from_described_serialization(
        factory: &SerializerFactory,
        envelope: &DescribedSerialization,
    ) -> Result<Option<Self>, SerializerError>
    where
        Self: DeserializeOwned,
    {
        let settings = factory.settings();
        deserialize_payload(
            factory,
            envelope,
            settings.type_match_strategy,
            settings.multiplicity_strategy,
            settings.unregistered_type_strategy,
        )
    }
}

impl<T: Serialize + Shape> DescribedSerializationExt for T {}
