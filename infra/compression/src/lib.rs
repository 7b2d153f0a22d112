//! Payload compression for serialized envelopes.
//!
//! A [`Compressor`] is selected by [`CompressionKind`] through [`CompressorFactory`]. The
//! identity [`NullCompressor`] is the default; [`Lz4Compressor`] uses LZ4 block compression with
//! the uncompressed size prepended, so payloads are self-contained.
//!
//! ```rust
//! use dser_compression::{CompressorFactory, CompressionError};
//! use dser_domain::CompressionKind;
//!
//! # fn main() -> Result<(), CompressionError> {
//! let lz4 = CompressorFactory::build(CompressionKind::Lz4)?;
//! let packed = lz4.compress(b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
//! assert_eq!(lz4.decompress(&packed)?, b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
//! # Ok(())
//! # }
//! ```

mod compressor;
mod error;

pub use compressor::{Compressor, CompressorFactory, Lz4Compressor, NullCompressor};
pub use dser_domain::CompressionKind;
pub use error::{CompressionError, CompressionErrorExt};
