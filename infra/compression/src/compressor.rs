use crate::error::{CompressionError, CompressionErrorExt};
use dser_domain::CompressionKind;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::trace;

/// Compresses and decompresses byte payloads.
pub trait Compressor: Debug + Send + Sync {
    fn kind(&self) -> CompressionKind;

    #[must_use]
    fn compress(&self, data: &[u8]) -> Vec<u8>;

    /// # Errors
    /// Returns [`CompressionError::Decompress`] if `data` was not produced by [`Self::compress`].
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError>;
}

/// Identity compressor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCompressor;

impl Compressor for NullCompressor {
    fn kind(&self) -> CompressionKind {
        CompressionKind::None
    }

    fn compress(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        Ok(data.to_vec())
    }
}

/// LZ4 block compression, size-prepended.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Compressor;

impl Compressor for Lz4Compressor {
    fn kind(&self) -> CompressionKind {
        CompressionKind::Lz4
    }

    fn compress(&self, data: &[u8]) -> Vec<u8> {
        let packed = lz4_flex::compress_prepend_size(data);
        trace!(raw = data.len(), packed = packed.len(), "lz4 compressed payload");
        packed
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        lz4_flex::decompress_size_prepended(data).context("Lz4 decompression failed")
    }
}

/// Maps a [`CompressionKind`] to a shared compressor instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressorFactory;

impl CompressorFactory {
    /// # Errors
    /// Returns [`CompressionError::ArgumentOutOfRange`] for [`CompressionKind::Invalid`].
    pub fn build(kind: CompressionKind) -> Result<Arc<dyn Compressor>, CompressionError> {
        match kind {
            CompressionKind::None => Ok(Arc::new(NullCompressor)),
            CompressionKind::Lz4 => Ok(Arc::new(Lz4Compressor)),
            CompressionKind::Invalid => Err(CompressionError::ArgumentOutOfRange {
                name: "compression_kind",
                message: "must be `None` or `Lz4`".into(),
                context: None,
            }),
        }
    }
}
