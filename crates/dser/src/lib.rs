//! Facade crate of the described serialization stack.
//! Re-exports the domain, registry and serializer crates and wires them together in [`Facade`].
//! Keep this crate thin: it should compose other crates, not implement serialization logic.
//!
//! ## Usage
//!
//! ```rust
//! use dser::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize, Shape)]
//! #[shape(crate = "dser::registry", namespace = "billing")]
//! struct Invoice {
//!     number: u32,
//! }
//!
//! #[derive(Debug, Default, Shape)]
//! #[shape(crate = "dser::registry", namespace = "billing")]
//! struct InvoiceJsonConfiguration;
//!
//! impl ConfigurationNode for InvoiceJsonConfiguration {
//!     fn kind(&self) -> SerializationKind {
//!         SerializationKind::Json
//!     }
//!
//!     fn type_registrations(&self) -> Vec<TypeRegistration> {
//!         vec![TypeRegistration::of::<Invoice>()]
//!     }
//! }
//!
//! # fn main() -> Result<(), SerializerError> {
//! let facade = Facade::default();
//! facade.register_configuration::<InvoiceJsonConfiguration>();
//!
//! let representation = facade.representation_of::<InvoiceJsonConfiguration>();
//! let envelope = facade.serialize(&Invoice { number: 7 }, &representation)?;
//! assert_eq!(envelope.payload_string(), Some("{\"number\":7}"));
//!
//! let restored: Option<Invoice> = facade.deserialize(&envelope)?;
//! assert_eq!(restored, Some(Invoice { number: 7 }));
//! # Ok(())
//! # }
//! ```
//!
//! Applications usually start from [`init`], which loads [`FacadeSettings`] from a file with
//! `DSER__` environment overrides and installs the logger.

mod error;
pub mod prelude;

pub use dser_compression as compression;
pub use dser_domain as domain;
pub use dser_kernel as kernel;
#[cfg(feature = "logger")]
pub use dser_logger as logger;
pub use dser_registry as registry;
pub use dser_serializer as serializer;
pub use error::{InitError, InitErrorExt};

use dser_domain::{CompressionKind, DescribedSerialization, SerializerRepresentation};
use dser_kernel::settings::{FacadeSettings, SerializerSettings};
use dser_registry::{
    ConfigurationCatalog, ConfigurationId, ConfigurationNode, ConfigurationRegistry, Shape,
    TypeCatalog, TypeResolver,
};
use dser_serializer::{DescribedSerializationExt, SerializerError, SerializerFactory};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Type catalog, configuration catalog, registry and serializer factory of one application.
///
/// Catalogs accept registrations at any time; a configuration is resolved on first use and
/// cached from then on.
#[derive(Debug)]
pub struct Facade {
    types: Arc<TypeCatalog>,
    configurations: Arc<ConfigurationCatalog>,
    registry: Arc<ConfigurationRegistry>,
    factory: SerializerFactory,
}

impl Default for Facade {
    fn default() -> Self {
        Self::new(SerializerSettings::default())
    }
}

impl Facade {
    #[must_use]
    pub fn new(settings: SerializerSettings) -> Self {
        let types = Arc::new(TypeCatalog::new());
        let resolver: Arc<dyn TypeResolver> = types.clone();
        let configurations = Arc::new(ConfigurationCatalog::new(resolver));
        let registry = Arc::new(ConfigurationRegistry::new(Arc::clone(&configurations)));
        let factory = SerializerFactory::from_settings(Arc::clone(&registry), settings);
        Self { types, configurations, registry, factory }
    }

    #[must_use]
    pub fn from_settings(settings: &FacadeSettings) -> Self {
        Self::new(settings.serializer.clone())
    }

    #[must_use]
    pub fn types(&self) -> &TypeCatalog {
        &self.types
    }

    #[must_use]
    pub fn configurations(&self) -> &ConfigurationCatalog {
        &self.configurations
    }

    #[must_use]
    pub fn registry(&self) -> &ConfigurationRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn factory(&self) -> &SerializerFactory {
        &self.factory
    }

    /// Makes `T` resolvable by description, e.g. from canned `TypesToRegister` identities.
    pub fn register_type<T: Shape>(&self) -> &Self {
        self.types.register::<T>();
        self
    }

    pub fn register_configuration<C>(&self) -> &Self
    where
        C: ConfigurationNode + Shape + Default,
    {
        self.configurations.register::<C>();
        self
    }

    /// Representation of the configuration `C` in its own family, with the default
    /// compression when the family supports compression.
    #[must_use]
    pub fn representation_of<C>(&self) -> SerializerRepresentation
    where
        C: ConfigurationNode + Shape + Default,
    {
        let kind = C::default().kind();
        let compression = if kind.supports_compression() {
            self.factory.settings().compression_kind
        } else {
            CompressionKind::None
        };
        let configuration = ConfigurationId::of::<C>().into_representation();
        SerializerRepresentation::new(kind, configuration).with_compression(compression)
    }

    /// Serializes `value` in the default serialization format.
    ///
    /// # Errors
    /// See [`dser_serializer::to_described_serialization`].
    pub fn serialize<T>(
        &self,
        value: &T,
        representation: &SerializerRepresentation,
    ) -> Result<DescribedSerialization, SerializerError>
    where
        T: Serialize + Shape,
    {
        let format = self.factory.settings().serialization_format;
        value.to_described_serialization(&self.factory, representation, format)
    }

    /// # Errors
    /// See [`dser_serializer::deserialize_payload`].
    pub fn deserialize<T>(
        &self,
        envelope: &DescribedSerialization,
    ) -> Result<Option<T>, SerializerError>
    where
        T: DeserializeOwned + Shape,
    {
        let settings = self.factory.settings();
        dser_serializer::deserialize_payload(
            &self.factory,
            envelope,
            settings.type_match_strategy,
            settings.multiplicity_strategy,
            settings.unregistered_type_strategy,
        )
    }
}

/// Loads [`FacadeSettings`] from `path` (with `DSER__` environment overrides), installs the
/// logger and builds the [`Facade`].
///
/// The returned [`dser_logger::Logger`] must be kept alive for file output to be flushed.
///
/// # Errors
/// Returns [`InitError::Settings`] when the settings cannot be loaded and
/// [`InitError::Logger`] when the logger cannot be installed.
#[cfg(feature = "logger")]
pub fn init(
    path: Option<impl AsRef<std::path::Path>>,
) -> Result<(Facade, dser_logger::Logger), InitError> {
    let settings: FacadeSettings =
        dser_kernel::config::load_settings(path).context("Failed to load facade settings")?;
    let logger = dser_logger::Logger::from_settings(&settings.logger)?;
    tracing::info!(
        kind = %settings.serializer.serialization_kind,
        format = %settings.serializer.serialization_format,
        "serialization facade initialized"
    );
    Ok((Facade::from_settings(&settings), logger))
}
