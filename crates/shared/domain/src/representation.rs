//! Value identities for types and serializers.

use crate::kinds::{CompressionKind, SerializationKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How two [`TypeRepresentation`]s are compared when resolving a type by its description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeMatchStrategy {
    /// Namespace, name and generic arguments must all match.
    #[default]
    NamespaceAndName,
    /// Namespaces are ignored (recursively, including generic arguments).
    NameOnly,
}

/// What to do when more than one candidate satisfies a [`TypeMatchStrategy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiplicityStrategy {
    /// Fail with an ambiguous-match error.
    #[default]
    ThrowOnMultiple,
    /// Take the candidate that was registered first.
    FirstMatch,
}

/// A language-neutral description of a (possibly generic) type.
///
/// Rendered as `namespace::Name<Arg, ..>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRepresentation {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_arguments: Vec<Self>,
}

impl TypeRepresentation {
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), name: name.into(), generic_arguments: Vec::new() }
    }

    #[must_use]
    pub fn with_generic_arguments(mut self, arguments: impl IntoIterator<Item = Self>) -> Self {
        self.generic_arguments.extend(arguments);
        self
    }

    #[must_use]
    pub const fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    /// Compares two representations under the given strategy.
    #[must_use]
    pub fn matches(&self, other: &Self, strategy: TypeMatchStrategy) -> bool {
        let namespace_ok = match strategy {
            TypeMatchStrategy::NamespaceAndName => self.namespace == other.namespace,
            TypeMatchStrategy::NameOnly => true,
        };

        namespace_ok
            && self.name == other.name
            && self.generic_arguments.len() == other.generic_arguments.len()
            && self
                .generic_arguments
                .iter()
                .zip(&other.generic_arguments)
                .all(|(a, b)| a.matches(b, strategy))
    }

    /// The fully qualified name without any version information, e.g. `billing::Invoice<u64>`.
    #[must_use]
    pub fn versionless_qualified_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)?;
        } else {
            write!(f, "{}::{}", self.namespace, self.name)?;
        }

        if let Some((first, rest)) = self.generic_arguments.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Identity of a serializer: which format family, bound to which configuration, compressed how.
///
/// Two representations are equal iff all three parts match, which makes this a suitable cache
/// key and a self-describing part of every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializerRepresentation {
    pub serialization_kind: SerializationKind,
    pub configuration_type: TypeRepresentation,
    #[serde(default)]
    pub compression_kind: CompressionKind,
}

impl SerializerRepresentation {
    /// Creates an uncompressed representation.
    #[must_use]
    pub const fn new(
        serialization_kind: SerializationKind,
        configuration_type: TypeRepresentation,
    ) -> Self {
        Self { serialization_kind, configuration_type, compression_kind: CompressionKind::None }
    }

    #[must_use]
    pub const fn with_compression(mut self, compression_kind: CompressionKind) -> Self {
        self.compression_kind = compression_kind;
        self
    }
}

impl fmt::Display for SerializerRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}; compression={}]",
            self.serialization_kind, self.configuration_type, self.compression_kind
        )
    }
}
