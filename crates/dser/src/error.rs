use dser_kernel::config::ConfigError;
use std::borrow::Cow;

/// Failures of [`crate::init`].
#[dser_derive::dser_error]
pub enum InitError {
    #[error("Settings error{}: {source}", format_context(.context))]
    Settings { source: ConfigError, context: Option<Cow<'static, str>> },

    #[cfg(feature = "logger")]
    #[error("Logger error{}: {source}", format_context(.context))]
    Logger { source: dser_logger::LoggerError, context: Option<Cow<'static, str>> },
}
