//! Kernel utilities shared across the serialization crates.
//! Keep this crate lightweight; it holds the layered settings loader and the settings model.
//!
//! ## Settings loading
//! ```rust,no_run
//! use dser_kernel::config::load_settings;
//! use dser_kernel::settings::FacadeSettings;
//!
//! let settings: FacadeSettings = load_settings(Some("config/dser.toml")).unwrap_or_default();
//! assert!(!settings.logger.name.is_empty());
//! ```
pub mod config;
pub mod settings;

pub use dser_domain as domain;
pub use settings::{FacadeSettings, SerializerSettings};
