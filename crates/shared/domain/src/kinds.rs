//! Format, payload and compression kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The serializer family a configuration targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SerializationKind {
    /// Unknown or unset; never dispatchable.
    #[default]
    Invalid,
    /// Binary document format (`postcard`).
    Document,
    /// Textual JSON (`serde_json`).
    Json,
    /// Flat key/value lines.
    PropertyBag,
}

impl SerializationKind {
    /// Short token used when building canned configuration names.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Document => "Document",
            Self::Json => "Json",
            Self::PropertyBag => "PropertyBag",
        }
    }

    /// Whether byte payloads of this family may be compressed.
    #[must_use]
    pub const fn supports_compression(self) -> bool {
        matches!(self, Self::Document | Self::Json)
    }
}

impl fmt::Display for SerializationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Shape of a serialized payload inside an envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerializationFormat {
    #[default]
    Invalid,
    /// No payload; the serialized object was absent.
    Null,
    String,
    Binary,
}

impl fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Invalid => "Invalid",
            Self::Null => "Null",
            Self::String => "String",
            Self::Binary => "Binary",
        };
        f.write_str(s)
    }
}

/// Compression applied to byte payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompressionKind {
    Invalid,
    /// Identity; the default.
    #[default]
    None,
    /// LZ4 block compression with a prepended size header.
    Lz4,
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Invalid => "Invalid",
            Self::None => "None",
            Self::Lz4 => "Lz4",
        };
        f.write_str(s)
    }
}
