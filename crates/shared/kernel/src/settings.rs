//! Settings model of the façade.

use dser_domain::{
    CompressionKind, MultiplicityStrategy, SerializationFormat, SerializationKind,
    TypeMatchStrategy, UnregisteredTypeEncounteredStrategy,
};
pub use dser_logger::LoggerSettings;
use serde::{Deserialize, Serialize};

/// Top-level settings document. Every section is optional.
///
/// ```toml
/// [serializer]
/// serialization_kind = "Json"
/// type_match_strategy = "name_only"
///
/// [logger]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeSettings {
    pub serializer: SerializerSettings,
    pub logger: LoggerSettings,
}

/// Defaults applied by the serializer factory when a caller does not state them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerSettings {
    pub serialization_kind: SerializationKind,
    pub compression_kind: CompressionKind,
    pub serialization_format: SerializationFormat,
    pub type_match_strategy: TypeMatchStrategy,
    pub multiplicity_strategy: MultiplicityStrategy,
    /// Wraps every resolved configuration in the matching canned strategy override.
    pub unregistered_type_strategy: Option<UnregisteredTypeEncounteredStrategy>,
}

impl Default for SerializerSettings {
    fn default() -> Self {
        Self {
            serialization_kind: SerializationKind::Json,
            compression_kind: CompressionKind::None,
            serialization_format: SerializationFormat::String,
            type_match_strategy: TypeMatchStrategy::NamespaceAndName,
            multiplicity_strategy: MultiplicityStrategy::ThrowOnMultiple,
            unregistered_type_strategy: None,
        }
    }
}
