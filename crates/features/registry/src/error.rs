use std::borrow::Cow;

/// A specialized [`RegistryError`] enum of this crate.
///
/// Every variant names the offending type or configuration identity.
#[dser_derive::dser_error]
pub enum RegistryError {
    /// Invalid configuration graph: dependency cycle, invalid registration target, duplicate
    /// registration within one node or a serialization kind mismatch.
    #[error("Configuration error{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Two reachable nodes registered the same type with different metadata.
    #[error(
        "Conflicting registration{} of `{type_name}` by `{first}` and `{second}`: {message}",
        format_context(.context)
    )]
    ConfigurationConflict {
        type_name: String,
        first: String,
        second: String,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Invalid argument{}: `{name}` {message}", format_context(.context))]
    Argument { name: &'static str, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Ambiguous match{}: {message}", format_context(.context))]
    AmbiguousMatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Type not found{}: {message}", format_context(.context))]
    TypeNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Raised by [`crate::ResolvedConfiguration::check_registered`] under the `Throw` strategy.
    #[error(
        "Unregistered type{}: `{type_name}` is not registered in `{configuration}`",
        format_context(.context)
    )]
    UnregisteredType {
        type_name: String,
        configuration: String,
        context: Option<Cow<'static, str>>,
    },
}

impl RegistryError {
    pub(crate) fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Configuration { message: message.into(), context: None }
    }
}
