use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides (`DSER__SERIALIZER__TYPE_MATCH_STRATEGY=name_only`).
pub const ENV_PREFIX: &str = "DSER";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_PATH: &str = "dser";

#[dser_derive::dser_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads settings from a file, overlaid with `DSER__`-prefixed environment variables.
///
/// 1. **Base File**: `path`, or `dser` in the working directory when `None`. The format is
///    picked from the extension (`toml`, `json`, `yaml`, ...).
/// 2. **Environment Overrides**: nested keys are separated by double underscores, so
///    `DSER__LOGGER__LEVEL` maps to `logger.level`.
///
/// # Errors
/// Returns [`ConfigError::Config`] when the file is missing or the merged values do not match
/// the structure of `T`.
///
/// # Example
/// ```rust
/// use dser_kernel::config::load_settings;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppSettings {
///     level: String,
/// }
///
/// let settings: AppSettings = load_settings(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_settings<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    build(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .convert_case(config::Case::Snake)
        .try_parsing(true)
}

fn build<T>(path: Option<impl AsRef<Path>>, environment: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_PATH), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(environment);

    info!(path = %effective_path.display(), "loading settings");

    let settings = builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<T>()
        .context("Failed to deserialize settings")?;

    Ok(settings)
}
