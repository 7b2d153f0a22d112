//! # Domain Models
//!
//! Pure value types shared by every crate of the serialization façade: type and serializer
//! representations, format/compression kinds, configuration knobs and the
//! [`DescribedSerialization`](described::DescribedSerialization) envelope.
//!
//! Keep it lean: no I/O, no resolution logic. Only `serde` and `bitflags` are allowed here.

pub mod described;
pub mod kinds;
pub mod options;
pub mod representation;

pub use described::{DescribedSerialization, SerializedPayload};
pub use kinds::{CompressionKind, SerializationFormat, SerializationKind};
pub use options::{
    FormatOptions, JsonFormattingKind, PropertyBagOptions, RelatedTypes,
    UnregisteredTypeEncounteredStrategy,
};
pub use representation::{
    MultiplicityStrategy, SerializerRepresentation, TypeMatchStrategy, TypeRepresentation,
};
