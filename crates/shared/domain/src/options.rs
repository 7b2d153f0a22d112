//! Behavioral knobs carried by configuration nodes.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Policy applied when a type absent from the effective registry is serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnregisteredTypeEncounteredStrategy {
    /// `Throw` if the declaring node registers any types itself, otherwise `Attempt`.
    #[default]
    Default,
    /// Serialize anyway.
    Attempt,
    /// Fail with an unregistered-type error.
    Throw,
}

impl UnregisteredTypeEncounteredStrategy {
    /// Collapses [`Self::Default`] into a concrete policy.
    #[must_use]
    pub const fn resolve(self, declares_registrations: bool) -> Self {
        match self {
            Self::Default if declares_registrations => Self::Throw,
            Self::Default => Self::Attempt,
            other => other,
        }
    }
}

/// Output layout of the JSON family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonFormattingKind {
    /// Single line, object members holding `null` are omitted.
    Minimal,
    /// Single line.
    #[default]
    Compact,
    /// Indented, one member per line.
    Concise,
}

/// Knobs of the flat key/value family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyBagOptions {
    pub key_value_delimiter: String,
    pub line_delimiter: String,
    /// Literal written for absent values, including an absent top-level object.
    pub null_value_encoding: String,
    /// Emits a `$type` line with the versionless qualified name of the payload type.
    pub include_versionless_qualified_name_as_property: bool,
}

impl Default for PropertyBagOptions {
    fn default() -> Self {
        Self {
            key_value_delimiter: "=".to_owned(),
            line_delimiter: "\n".to_owned(),
            null_value_encoding: "null".to_owned(),
            include_versionless_qualified_name_as_property: true,
        }
    }
}

/// Format-specific options of a configuration node; each family reads only its own part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub json_formatting: JsonFormattingKind,
    pub property_bag: PropertyBagOptions,
}

bitflags! {
    /// Which types besides the registered one a registration pulls in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct RelatedTypes: u8 {
        /// Declared member types, recursively.
        const MEMBERS = 1 << 0;
        /// Structurally related types (generic arguments, declared relations), one level.
        const RELATED = 1 << 1;

        const ALL = Self::MEMBERS.bits() | Self::RELATED.bits();
    }
}

impl RelatedTypes {
    /// Self only.
    pub const NONE: Self = Self::empty();
}

impl Default for RelatedTypes {
    fn default() -> Self {
        Self::MEMBERS
    }
}

impl Serialize for RelatedTypes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for RelatedTypes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_strategy_depends_on_own_registrations() {
        let strategy = UnregisteredTypeEncounteredStrategy::Default;
        assert_eq!(strategy.resolve(true), UnregisteredTypeEncounteredStrategy::Throw);
        assert_eq!(strategy.resolve(false), UnregisteredTypeEncounteredStrategy::Attempt);
    }

    #[test]
    fn explicit_strategy_is_kept() {
        let strategy = UnregisteredTypeEncounteredStrategy::Attempt;
        assert_eq!(strategy.resolve(true), UnregisteredTypeEncounteredStrategy::Attempt);
    }

    #[test]
    fn related_types_round_trip_as_bits() {
        let json = serde_json::to_string(&RelatedTypes::ALL).unwrap();
        assert_eq!(json, "3");
        let back: RelatedTypes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RelatedTypes::ALL);
    }
}
