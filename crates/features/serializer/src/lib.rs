//! # Serializer
//!
//! Format-specific serializers bound to resolved configurations, and the
//! [`DescribedSerialization`](dser_domain::DescribedSerialization) envelope operations built on
//! them.
//!
//! * [`codec`]: the JSON, document (`postcard`) and property-bag families.
//! * [`SerializerFactory`]: resolves a
//!   [`SerializerRepresentation`](dser_domain::SerializerRepresentation) into a cached
//!   [`ObjectSerializer`].
//! * [`to_described_serialization`] / [`deserialize_payload`]: envelope round-trips, also
//!   available as methods through [`DescribedSerializationExt`].

pub mod codec;
mod described;
mod error;
mod factory;
mod serializer;

pub use codec::{Codec, FormatCodec};
pub use described::{DescribedSerializationExt, deserialize_payload, to_described_serialization};
pub use error::{SerializerError, SerializerErrorExt};
pub use factory::SerializerFactory;
pub use serializer::ObjectSerializer;
