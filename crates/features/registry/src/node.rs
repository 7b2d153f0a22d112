use crate::registration::TypeRegistration;
use crate::shape::Shape;
use dser_domain::{
    FormatOptions, SerializationKind, TypeRepresentation, UnregisteredTypeEncounteredStrategy,
};
use std::fmt;

/// Identity of a configuration node.
///
/// Named configurations use the representation of their own type; canned wrappers use a
/// composite representation whose generic arguments are the wrapped inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationId(TypeRepresentation);

impl ConfigurationId {
    #[must_use]
    pub const fn new(representation: TypeRepresentation) -> Self {
        Self(representation)
    }

    /// Identity of the configuration type `C`.
    #[must_use]
    pub fn of<C: Shape>() -> Self {
        Self(C::shape().representation().clone())
    }

    #[must_use]
    pub const fn representation(&self) -> &TypeRepresentation {
        &self.0
    }

    #[must_use]
    pub fn into_representation(self) -> TypeRepresentation {
        self.0
    }
}

impl From<TypeRepresentation> for ConfigurationId {
    fn from(representation: TypeRepresentation) -> Self {
        Self(representation)
    }
}

impl fmt::Display for ConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One composable unit of serialization configuration.
///
/// Implementations must be deterministic: the engine calls each method once per instance and
/// caches the outcome for the lifetime of the registry.
///
/// # Example
///
/// ```rust
/// use dser_registry::{ConfigurationId, ConfigurationNode, Shape, TypeRegistration};
/// use dser_domain::SerializationKind;
///
/// #[derive(Shape)]
/// #[shape(namespace = "billing")]
/// struct Invoice {
///     id: u64,
/// }
///
/// #[derive(Debug, Default, Shape)]
/// #[shape(namespace = "billing")]
/// struct InvoiceJsonConfiguration;
///
/// impl ConfigurationNode for InvoiceJsonConfiguration {
///     fn kind(&self) -> SerializationKind {
///         SerializationKind::Json
///     }
///
///     fn type_registrations(&self) -> Vec<TypeRegistration> {
///         vec![TypeRegistration::of::<Invoice>()]
///     }
/// }
///
/// assert_eq!(
///     ConfigurationId::of::<InvoiceJsonConfiguration>().to_string(),
///     "billing::InvoiceJsonConfiguration"
/// );
/// ```
pub trait ConfigurationNode: fmt::Debug + Send + Sync + 'static {
    /// The serializer family this node configures.
    fn kind(&self) -> SerializationKind;

    /// Types registered by this node itself.
    fn type_registrations(&self) -> Vec<TypeRegistration> {
        Vec::new()
    }

    /// Nodes this node composes, in order. Duplicates are collapsed.
    fn dependencies(&self) -> Vec<ConfigurationId> {
        Vec::new()
    }

    /// `Default` inherits from [`Self::options_source`] when there is one; otherwise it becomes
    /// `Throw` if this node registers types itself and `Attempt` if it does not.
    fn unregistered_type_strategy(&self) -> UnregisteredTypeEncounteredStrategy {
        UnregisteredTypeEncounteredStrategy::Default
    }

    /// Dependency whose effective options and strategy this node inherits.
    fn options_source(&self) -> Option<ConfigurationId> {
        None
    }

    /// Effective format options. `inherited` holds the options of [`Self::options_source`].
    fn format_options(&self, inherited: Option<&FormatOptions>) -> FormatOptions {
        inherited.cloned().unwrap_or_default()
    }
}
