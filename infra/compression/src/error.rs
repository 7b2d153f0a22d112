use std::borrow::Cow;

/// A specialized [`CompressionError`] enum of this crate.
#[dser_derive::dser_error]
pub enum CompressionError {
    #[error("Argument out of range{}: `{name}` {message}", format_context(.context))]
    ArgumentOutOfRange {
        name: &'static str,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Decompression failure{}: {source}", format_context(.context))]
    Decompress { source: lz4_flex::block::DecompressError, context: Option<Cow<'static, str>> },
}
