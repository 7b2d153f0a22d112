use crate::codec::Codec;
use crate::error::SerializerError;
use crate::serializer::ObjectSerializer;
use dser_compression::CompressorFactory;
use dser_domain::{
    CompressionKind, MultiplicityStrategy, SerializationKind, SerializerRepresentation,
    TypeMatchStrategy, TypeRepresentation, UnregisteredTypeEncounteredStrategy,
};
use dser_kernel::settings::SerializerSettings;
use dser_registry::{ConfigurationRegistry, canned};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SerializerKey {
    representation: SerializerRepresentation,
    match_strategy: TypeMatchStrategy,
    multiplicity: MultiplicityStrategy,
    strategy_override: Option<UnregisteredTypeEncounteredStrategy>,
}

/// Resolves serializer representations into cached [`ObjectSerializer`]s.
///
/// # Example
///
/// ```rust
/// use dser_domain::{
///     MultiplicityStrategy, SerializationKind, SerializerRepresentation, TypeMatchStrategy,
/// };
/// use dser_registry::{canned, ConfigurationCatalog, ConfigurationRegistry, TypeCatalog};
/// use dser_serializer::{SerializerError, SerializerFactory};
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), SerializerError> {
/// let catalog = ConfigurationCatalog::new(Arc::new(TypeCatalog::new()));
/// let factory = SerializerFactory::new(Arc::new(ConfigurationRegistry::new(Arc::new(catalog))));
///
/// let null = canned::null(SerializationKind::Json).into_representation();
/// let representation = SerializerRepresentation::new(SerializationKind::Json, null);
/// let serializer = factory.build_serializer(
///     &representation,
///     TypeMatchStrategy::NamespaceAndName,
///     MultiplicityStrategy::ThrowOnMultiple,
///     None,
/// )?;
/// assert_eq!(serializer.serialize_to_string(&vec![1_u8, 2])?, "[1,2]");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SerializerFactory {
    registry: Arc<ConfigurationRegistry>,
    settings: SerializerSettings,
    cache: Mutex<FxHashMap<SerializerKey, Arc<ObjectSerializer>>>,
}

impl SerializerFactory {
    #[must_use]
    pub fn new(registry: Arc<ConfigurationRegistry>) -> Self {
        Self::from_settings(registry, SerializerSettings::default())
    }

    /// Uses `settings` for the strategies and representation parts callers leave out.
    #[must_use]
    pub fn from_settings(
        registry: Arc<ConfigurationRegistry>,
        settings: SerializerSettings,
    ) -> Self {
        Self { registry, settings, cache: Mutex::default() }
    }

    #[must_use]
    pub fn registry(&self) -> &ConfigurationRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn settings(&self) -> &SerializerSettings {
        &self.settings
    }

    /// Number of cached serializers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Representation of `configuration_type` with the default kind and compression.
    #[must_use]
    pub fn default_representation(
        &self,
        configuration_type: TypeRepresentation,
    ) -> SerializerRepresentation {
        SerializerRepresentation::new(self.settings.serialization_kind, configuration_type)
            .with_compression(self.settings.compression_kind)
    }

    /// [`Self::build_serializer`] with the default strategies.
    ///
    /// # Errors
    /// See [`Self::build_serializer`].
    pub fn serializer_for(
        &self,
        representation: &SerializerRepresentation,
    ) -> Result<Arc<ObjectSerializer>, SerializerError> {
        self.build_serializer(
            representation,
            self.settings.type_match_strategy,
            self.settings.multiplicity_strategy,
            self.settings.unregistered_type_strategy,
        )
    }

    /// Resolves the configuration named by `representation` and binds the codec and compressor
    /// of its family.
    ///
    /// A `strategy_override` wraps the configuration in the matching canned strategy override.
    /// Serializers are cached per representation, strategies and override.
    ///
    /// # Errors
    /// * [`SerializerError::Argument`] when the configuration type has no name, or the resolved
    ///   configuration belongs to another family.
    /// * [`SerializerError::UnsupportedFormat`] for [`SerializationKind::Invalid`].
    /// * [`SerializerError::ArgumentOutOfRange`] naming `compression_kind` when the family
    ///   does not support the requested compression.
    /// * [`SerializerError::Registry`] when the configuration cannot be resolved.
    pub fn build_serializer(
        &self,
        representation: &SerializerRepresentation,
        match_strategy: TypeMatchStrategy,
        multiplicity: MultiplicityStrategy,
        strategy_override: Option<UnregisteredTypeEncounteredStrategy>,
    ) -> Result<Arc<ObjectSerializer>, SerializerError> {
        validate(representation)?;

        let key = SerializerKey {
            representation: representation.clone(),
            match_strategy,
            multiplicity,
            strategy_override,
        };
        let mut cache = self.cache.lock();
        if let Some(hit) = cache.get(&key) {
            trace!(serializer = %representation, "serializer cache hit");
            return Ok(Arc::clone(hit));
        }

        let kind = representation.serialization_kind;
        let mut id = self.registry.catalog().resolve_id(
            &representation.configuration_type,
            match_strategy,
            multiplicity,
        )?;
        if let Some(strategy) = strategy_override {
            id = canned::with_unregistered_strategy(kind, id, strategy);
        }

        let configuration = self.registry.resolve(&id)?;
        if configuration.kind() != kind {
            return Err(SerializerError::Argument {
                name: "serialization_kind",
                message: format!(
                    "`{kind}` requested, but `{id}` is a `{}` configuration",
                    configuration.kind()
                )
                .into(),
                context: None,
            });
        }

        let codec = Codec::for_configuration(kind, configuration.format_options())?;
        let compressor = CompressorFactory::build(representation.compression_kind)?;
        let serializer = Arc::new(ObjectSerializer::new(
            representation.clone(),
            configuration,
            codec,
            compressor,
        ));

        debug!(serializer = %representation, configuration = %id, "serializer built");
        cache.insert(key, Arc::clone(&serializer));
        Ok(serializer)
    }
}

fn validate(representation: &SerializerRepresentation) -> Result<(), SerializerError> {
    if representation.configuration_type.name.trim().is_empty() {
        return Err(SerializerError::Argument {
            name: "configuration_type",
            message: "must name a configuration type".into(),
            context: None,
        });
    }

    let kind = representation.serialization_kind;
    if kind == SerializationKind::Invalid {
        return Err(SerializerError::UnsupportedFormat {
            message: format!("`{representation}` has no serialization kind").into(),
            context: None,
        });
    }

    match representation.compression_kind {
        CompressionKind::None => Ok(()),
        CompressionKind::Invalid => Err(SerializerError::ArgumentOutOfRange {
            name: "compression_kind",
            message: "is invalid".into(),
            context: None,
        }),
        compression if !kind.supports_compression() => Err(SerializerError::ArgumentOutOfRange {
            name: "compression_kind",
            message: format!("`{compression}` is not supported by the `{kind}` family").into(),
            context: None,
        }),
        CompressionKind::Lz4 => Ok(()),
    }
}
