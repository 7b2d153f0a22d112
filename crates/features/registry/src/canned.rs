//! Canned configuration wrappers.
//!
//! Wrappers compose existing nodes without declaring registrations of their own (with the
//! exception of [`TypesToRegister`]). They need no catalog entry: their identity encodes the
//! wrapper kind and its inputs, and the engine rebuilds the wrapper from that identity.
//!
//! ```rust
//! use dser_registry::{ConfigurationId, canned};
//! use dser_domain::{JsonFormattingKind, SerializationKind, TypeRepresentation};
//!
//! let invoices = TypeRepresentation::new("billing", "InvoiceJsonConfiguration");
//! let invoices = ConfigurationId::from(invoices);
//! let base = canned::dependency_only(SerializationKind::Json, [invoices]);
//! let pretty = canned::formatting_override(base, JsonFormattingKind::Concise);
//! let strict = canned::throw_on_unregistered(SerializationKind::Json, pretty);
//!
//! assert_eq!(
//!     strict.to_string(),
//!     "dser::canned::ThrowOnUnregisteredTypeJsonSerializationConfiguration<\
//!      dser::canned::ConciseFormattingJsonSerializationConfiguration<\
//!      dser::canned::DependencyOnlyJsonSerializationConfiguration<\
//!      billing::InvoiceJsonConfiguration>>>"
//! );
//! ```

use crate::catalog::TypeResolver;
use crate::error::RegistryError;
use crate::node::{ConfigurationId, ConfigurationNode};
use crate::registration::TypeRegistration;
use crate::shape::TypeShape;
use dser_domain::{
    FormatOptions, JsonFormattingKind, MultiplicityStrategy, SerializationKind, TypeMatchStrategy,
    TypeRepresentation, UnregisteredTypeEncounteredStrategy,
};

/// Namespace reserved for canned configuration identities.
pub const CANNED_NAMESPACE: &str = "dser::canned";

const SUFFIX: &str = "SerializationConfiguration";
const KINDS: [SerializationKind; 3] =
    [SerializationKind::Document, SerializationKind::Json, SerializationKind::PropertyBag];
const FORMATTINGS: [JsonFormattingKind; 3] =
    [JsonFormattingKind::Minimal, JsonFormattingKind::Compact, JsonFormattingKind::Concise];

/// Identity of a [`NullConfiguration`].
#[must_use]
pub fn null(kind: SerializationKind) -> ConfigurationId {
    CannedSpec::Null(kind).id()
}

/// Identity of a [`TypesToRegister`] node registering `types` (with their members).
#[must_use]
pub fn types_to_register(
    kind: SerializationKind,
    types: impl IntoIterator<Item = TypeRepresentation>,
) -> ConfigurationId {
    CannedSpec::TypesToRegister(kind, types.into_iter().collect()).id()
}

/// Identity of a [`DependencyOnly`] node over `dependencies`.
#[must_use]
pub fn dependency_only(
    kind: SerializationKind,
    dependencies: impl IntoIterator<Item = ConfigurationId>,
) -> ConfigurationId {
    CannedSpec::DependencyOnly(kind, dependencies.into_iter().collect()).id()
}

/// Identity of a [`FormattingOverride`] of the JSON configuration `source`.
#[must_use]
pub fn formatting_override(
    source: ConfigurationId,
    formatting: JsonFormattingKind,
) -> ConfigurationId {
    CannedSpec::FormattingOverride(formatting, source).id()
}

/// Identity of an [`UnregisteredTypeOverride`] forcing `Throw` on top of `source`.
#[must_use]
pub fn throw_on_unregistered(kind: SerializationKind, source: ConfigurationId) -> ConfigurationId {
    CannedSpec::StrategyOverride(kind, UnregisteredTypeEncounteredStrategy::Throw, source).id()
}

/// Identity of an [`UnregisteredTypeOverride`] forcing `Attempt` on top of `source`.
#[must_use]
pub fn attempt_on_unregistered(
    kind: SerializationKind,
    source: ConfigurationId,
) -> ConfigurationId {
    CannedSpec::StrategyOverride(kind, UnregisteredTypeEncounteredStrategy::Attempt, source).id()
}

/// Wraps `source` so that it uses `strategy`. `Default` leaves the identity unchanged.
#[must_use]
pub fn with_unregistered_strategy(
    kind: SerializationKind,
    source: ConfigurationId,
    strategy: UnregisteredTypeEncounteredStrategy,
) -> ConfigurationId {
    match strategy {
        UnregisteredTypeEncounteredStrategy::Default => source,
        forced => CannedSpec::StrategyOverride(kind, forced, source).id(),
    }
}

/// Decoded form of a canned identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CannedSpec {
    Null(SerializationKind),
    TypesToRegister(SerializationKind, Vec<TypeRepresentation>),
    DependencyOnly(SerializationKind, Vec<ConfigurationId>),
    FormattingOverride(JsonFormattingKind, ConfigurationId),
    StrategyOverride(SerializationKind, UnregisteredTypeEncounteredStrategy, ConfigurationId),
}

impl CannedSpec {
    pub(crate) fn id(&self) -> ConfigurationId {
        let (name, arguments): (String, Vec<TypeRepresentation>) = match self {
            Self::Null(kind) => (format!("Null{kind}{SUFFIX}"), Vec::new()),
            Self::TypesToRegister(kind, types) => {
                (format!("TypesToRegister{kind}{SUFFIX}"), types.clone())
            },
            Self::DependencyOnly(kind, deps) => (
                format!("DependencyOnly{kind}{SUFFIX}"),
                deps.iter().map(|d| d.representation().clone()).collect(),
            ),
            Self::FormattingOverride(formatting, source) => (
                format!("{}FormattingJson{SUFFIX}", formatting_token(*formatting)),
                vec![source.representation().clone()],
            ),
            Self::StrategyOverride(kind, strategy, source) => (
                format!("{}OnUnregisteredType{kind}{SUFFIX}", strategy_token(*strategy)),
                vec![source.representation().clone()],
            ),
        };

        TypeRepresentation::new(CANNED_NAMESPACE, name).with_generic_arguments(arguments).into()
    }

    /// `None` if `id` is not a well-formed canned identity.
    pub(crate) fn parse(id: &ConfigurationId) -> Option<Self> {
        let repr = id.representation();
        if repr.namespace != CANNED_NAMESPACE {
            return None;
        }
        let stem = repr.name.strip_suffix(SUFFIX)?;
        let args = &repr.generic_arguments;
        let single = || (args.len() == 1).then(|| ConfigurationId::from(args[0].clone()));

        if let Some(formatting) = FORMATTINGS
            .into_iter()
            .find(|f| stem == format!("{}FormattingJson", formatting_token(*f)))
        {
            return single().map(|source| Self::FormattingOverride(formatting, source));
        }

        let kind = KINDS.into_iter().find(|k| stem.ends_with(k.token()))?;
        let wrapper = stem.strip_suffix(kind.token())?;
        match wrapper {
            "Null" if args.is_empty() => Some(Self::Null(kind)),
            "TypesToRegister" => Some(Self::TypesToRegister(kind, args.clone())),
            "DependencyOnly" => Some(Self::DependencyOnly(
                kind,
                args.iter().cloned().map(ConfigurationId::from).collect(),
            )),
            "ThrowOnUnregisteredType" => single().map(|source| {
                Self::StrategyOverride(kind, UnregisteredTypeEncounteredStrategy::Throw, source)
            }),
            "AttemptOnUnregisteredType" => single().map(|source| {
                Self::StrategyOverride(kind, UnregisteredTypeEncounteredStrategy::Attempt, source)
            }),
            _ => None,
        }
    }

    /// Identities nested inside this canned identity, in declaration order.
    pub(crate) fn configuration_arguments(&self) -> &[ConfigurationId] {
        match self {
            Self::Null(_) | Self::TypesToRegister(..) => &[],
            Self::DependencyOnly(_, deps) => deps,
            Self::FormattingOverride(_, source) | Self::StrategyOverride(_, _, source) => {
                std::slice::from_ref(source)
            },
        }
    }

    /// Rebuilds the canned identity with its nested identities replaced, in the same order.
    pub(crate) fn with_configuration_arguments(self, mut ids: Vec<ConfigurationId>) -> Self {
        match self {
            Self::DependencyOnly(kind, _) => Self::DependencyOnly(kind, ids),
            Self::FormattingOverride(formatting, source) => {
                Self::FormattingOverride(formatting, ids.pop().unwrap_or(source))
            },
            Self::StrategyOverride(kind, strategy, source) => {
                Self::StrategyOverride(kind, strategy, ids.pop().unwrap_or(source))
            },
            other => other,
        }
    }

    pub(crate) fn instantiate(
        self,
        types: &dyn TypeResolver,
    ) -> Result<Box<dyn ConfigurationNode>, RegistryError> {
        let node: Box<dyn ConfigurationNode> = match self {
            Self::Null(kind) => Box::new(NullConfiguration { kind }),
            Self::TypesToRegister(kind, reprs) => {
                let shapes = reprs
                    .iter()
                    .map(|repr| {
                        types.resolve(
                            repr,
                            TypeMatchStrategy::NamespaceAndName,
                            MultiplicityStrategy::ThrowOnMultiple,
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(TypesToRegister { kind, shapes })
            },
            Self::DependencyOnly(kind, dependencies) => {
                Box::new(DependencyOnly { kind, dependencies })
            },
            Self::FormattingOverride(formatting, source) => {
                Box::new(FormattingOverride { source, formatting })
            },
            Self::StrategyOverride(kind, strategy, source) => {
                Box::new(UnregisteredTypeOverride { kind, source, strategy })
            },
        };
        Ok(node)
    }
}

const fn formatting_token(formatting: JsonFormattingKind) -> &'static str {
    match formatting {
        JsonFormattingKind::Minimal => "Minimal",
        JsonFormattingKind::Compact => "Compact",
        JsonFormattingKind::Concise => "Concise",
    }
}

const fn strategy_token(strategy: UnregisteredTypeEncounteredStrategy) -> &'static str {
    match strategy {
        UnregisteredTypeEncounteredStrategy::Default => "Default",
        UnregisteredTypeEncounteredStrategy::Attempt => "Attempt",
        UnregisteredTypeEncounteredStrategy::Throw => "Throw",
    }
}

/// Registers nothing and serializes anything.
#[derive(Debug, Clone)]
pub struct NullConfiguration {
    pub kind: SerializationKind,
}

impl ConfigurationNode for NullConfiguration {
    fn kind(&self) -> SerializationKind {
        self.kind
    }

    fn unregistered_type_strategy(&self) -> UnregisteredTypeEncounteredStrategy {
        UnregisteredTypeEncounteredStrategy::Attempt
    }
}

/// Registers a fixed list of types together with their members.
#[derive(Debug, Clone)]
pub struct TypesToRegister {
    pub kind: SerializationKind,
    pub shapes: Vec<TypeShape>,
}

impl ConfigurationNode for TypesToRegister {
    fn kind(&self) -> SerializationKind {
        self.kind
    }

    fn type_registrations(&self) -> Vec<TypeRegistration> {
        self.shapes.iter().cloned().map(TypeRegistration::new).collect()
    }
}

/// Composes other nodes without registering anything itself.
#[derive(Debug, Clone)]
pub struct DependencyOnly {
    pub kind: SerializationKind,
    pub dependencies: Vec<ConfigurationId>,
}

impl ConfigurationNode for DependencyOnly {
    fn kind(&self) -> SerializationKind {
        self.kind
    }

    fn dependencies(&self) -> Vec<ConfigurationId> {
        self.dependencies.clone()
    }
}

/// Takes everything from a JSON `source` but the formatting kind.
#[derive(Debug, Clone)]
pub struct FormattingOverride {
    pub source: ConfigurationId,
    pub formatting: JsonFormattingKind,
}

impl ConfigurationNode for FormattingOverride {
    fn kind(&self) -> SerializationKind {
        SerializationKind::Json
    }

    fn dependencies(&self) -> Vec<ConfigurationId> {
        vec![self.source.clone()]
    }

    fn options_source(&self) -> Option<ConfigurationId> {
        Some(self.source.clone())
    }

    fn format_options(&self, inherited: Option<&FormatOptions>) -> FormatOptions {
        let mut options = inherited.cloned().unwrap_or_default();
        options.json_formatting = self.formatting;
        options
    }
}

/// Takes everything from `source` but the unregistered-type strategy.
#[derive(Debug, Clone)]
pub struct UnregisteredTypeOverride {
    pub kind: SerializationKind,
    pub source: ConfigurationId,
    pub strategy: UnregisteredTypeEncounteredStrategy,
}

impl ConfigurationNode for UnregisteredTypeOverride {
    fn kind(&self) -> SerializationKind {
        self.kind
    }

    fn dependencies(&self) -> Vec<ConfigurationId> {
        vec![self.source.clone()]
    }

    fn unregistered_type_strategy(&self) -> UnregisteredTypeEncounteredStrategy {
        self.strategy
    }

    fn options_source(&self) -> Option<ConfigurationId> {
        Some(self.source.clone())
    }
}
