use dser_compression::CompressionError;
use dser_registry::RegistryError;
use std::borrow::Cow;

/// Failures of serializer construction, encoding and decoding.
#[dser_derive::dser_error]
pub enum SerializerError {
    /// Configuration resolution failed or a type is unregistered under `Throw`.
    #[error("Registry error{}: {source}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },

    #[error("Invalid argument{}: `{name}` {message}", format_context(.context))]
    Argument {
        name: &'static str,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Argument out of range{}: `{name}` {message}", format_context(.context))]
    ArgumentOutOfRange {
        name: &'static str,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unsupported format{}: {message}", format_context(.context))]
    UnsupportedFormat { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unsupported operation{}: {message}", format_context(.context))]
    UnsupportedOperation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The envelope carries a payload format this build cannot read.
    #[error("Not supported{}: {message}", format_context(.context))]
    NotSupported { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error(
        "Type mismatch{}: payload is `{actual}`, requested `{expected}`",
        format_context(.context)
    )]
    TypeMismatch { expected: String, actual: String, context: Option<Cow<'static, str>> },

    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Postcard error{}: {source}", format_context(.context))]
    Postcard { source: postcard::Error, context: Option<Cow<'static, str>> },

    #[error("Base64 error{}: {source}", format_context(.context))]
    Base64 { source: base64::DecodeError, context: Option<Cow<'static, str>> },

    #[error("UTF-8 error{}: {source}", format_context(.context))]
    Utf8 { source: std::str::Utf8Error, context: Option<Cow<'static, str>> },

    #[error("Property bag error{}: {message}", format_context(.context))]
    PropertyBag { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Compression error{}: {source}", format_context(.context))]
    Compression { source: CompressionError, context: Option<Cow<'static, str>> },
}

impl SerializerError {
    pub(crate) fn unsupported_operation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::UnsupportedOperation { message: message.into(), context: None }
    }

    pub(crate) fn property_bag(message: impl Into<Cow<'static, str>>) -> Self {
        Self::PropertyBag { message: message.into(), context: None }
    }
}
