//! Everything needed to declare configurations and round-trip envelopes.

pub use crate::Facade;
pub use dser_domain::{
    CompressionKind, DescribedSerialization, FormatOptions, JsonFormattingKind,
    MultiplicityStrategy, PropertyBagOptions, RelatedTypes, SerializationFormat,
    SerializationKind, SerializedPayload, SerializerRepresentation, TypeMatchStrategy,
    TypeRepresentation, UnregisteredTypeEncounteredStrategy,
};
pub use dser_registry::{
    ConfigurationId, ConfigurationNode, RegistryError, Shape, TypeRegistration, TypeShape,
    canned,
};
pub use dser_serializer::{DescribedSerializationExt, SerializerError, SerializerFactory};
