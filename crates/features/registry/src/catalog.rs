//! Lookup of types and configurations by their description.

use crate::canned::{CANNED_NAMESPACE, CannedSpec};
use crate::error::RegistryError;
use crate::node::{ConfigurationId, ConfigurationNode};
use crate::shape::{Shape, TypeShape};
use dser_domain::{MultiplicityStrategy, TypeMatchStrategy, TypeRepresentation};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Maps a serialized type description back to a runtime type.
pub trait TypeResolver: fmt::Debug + Send + Sync {
    /// # Errors
    /// Returns [`RegistryError::TypeNotFound`] when nothing matches, and
    /// [`RegistryError::AmbiguousMatch`] when several candidates match under
    /// [`MultiplicityStrategy::ThrowOnMultiple`].
    fn resolve(
        &self,
        representation: &TypeRepresentation,
        match_strategy: TypeMatchStrategy,
        multiplicity: MultiplicityStrategy,
    ) -> Result<TypeShape, RegistryError>;
}

/// Picks one candidate out of the matches, in registration order.
fn select<T>(
    representation: &TypeRepresentation,
    mut candidates: Vec<T>,
    multiplicity: MultiplicityStrategy,
    describe: impl Fn(&T) -> String,
) -> Result<T, RegistryError> {
    match (candidates.len(), multiplicity) {
        (0, _) => Err(RegistryError::TypeNotFound {
            message: format!("no type matches `{representation}`").into(),
            context: None,
        }),
        (1, _) | (_, MultiplicityStrategy::FirstMatch) => Ok(candidates.swap_remove(0)),
        (_, MultiplicityStrategy::ThrowOnMultiple) => {
            let names: Vec<String> = candidates.iter().map(describe).collect();
            Err(RegistryError::AmbiguousMatch {
                message: format!("`{representation}` matches {}", names.join(", ")).into(),
                context: None,
            })
        },
    }
}

/// Registered shapes, resolvable by representation.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    shapes: RwLock<Vec<TypeShape>>,
}

impl TypeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `T` resolvable. Registering the same type twice is a no-op.
    pub fn register<T: Shape>(&self) -> &Self {
        self.register_shape(T::shape())
    }

    pub fn register_shape(&self, shape: TypeShape) -> &Self {
        let mut shapes = self.shapes.write();
        if !shapes.contains(&shape) {
            trace!(type_name = %shape, "type registered in catalog");
            shapes.push(shape);
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.read().len()
    }
}

impl TypeResolver for TypeCatalog {
    fn resolve(
        &self,
        representation: &TypeRepresentation,
        match_strategy: TypeMatchStrategy,
        multiplicity: MultiplicityStrategy,
    ) -> Result<TypeShape, RegistryError> {
        let candidates: Vec<TypeShape> = self
            .shapes
            .read()
            .iter()
            .filter(|shape| shape.representation().matches(representation, match_strategy))
            .cloned()
            .collect();
        select(representation, candidates, multiplicity, ToString::to_string)
    }
}

type ConfigurationFactory = Arc<dyn Fn() -> Box<dyn ConfigurationNode> + Send + Sync>;

struct CatalogEntry {
    id: ConfigurationId,
    factory: ConfigurationFactory,
}

/// Named configurations, plus the type resolver used by canned wrappers.
///
/// Canned identities (namespace [`CANNED_NAMESPACE`]) are recognized without registration.
pub struct ConfigurationCatalog {
    entries: RwLock<Vec<CatalogEntry>>,
    types: Arc<dyn TypeResolver>,
}

impl fmt::Debug for ConfigurationCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.entries.read().iter().map(|e| e.id.to_string()).collect();
        f.debug_struct("ConfigurationCatalog")
            .field("configurations", &ids)
            .field("types", &self.types)
            .finish()
    }
}

impl ConfigurationCatalog {
    #[must_use]
    pub fn new(types: Arc<dyn TypeResolver>) -> Self {
        Self { entries: RwLock::new(Vec::new()), types }
    }

    #[must_use]
    pub fn types(&self) -> &dyn TypeResolver {
        self.types.as_ref()
    }

    /// Registers the configuration type `C` under [`ConfigurationId::of`].
    pub fn register<C>(&self) -> &Self
    where
        C: ConfigurationNode + Shape + Default,
    {
        self.register_with(ConfigurationId::of::<C>(), || {
            Box::new(C::default()) as Box<dyn ConfigurationNode>
        })
    }

    /// Registers a factory under an explicit identity. A later registration of the same
    /// identity replaces the earlier one.
    pub fn register_with<F>(&self, id: ConfigurationId, factory: F) -> &Self
    where
        F: Fn() -> Box<dyn ConfigurationNode> + Send + Sync + 'static,
    {
        let mut entries = self.entries.write();
        let factory: ConfigurationFactory = Arc::new(factory);
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.factory = factory;
        } else {
            trace!(configuration = %id, "configuration registered in catalog");
            entries.push(CatalogEntry { id, factory });
        }
        self
    }

    #[must_use]
    pub fn contains(&self, id: &ConfigurationId) -> bool {
        CannedSpec::parse(id).is_some() || self.entries.read().iter().any(|e| &e.id == id)
    }

    /// Resolves a configuration description to the exact identity it denotes.
    ///
    /// Canned identities are canonicalized recursively: nested configurations and registered
    /// types are resolved with the same strategies. Under [`TypeMatchStrategy::NameOnly`] a
    /// name is read as a canned identity only when no registered configuration matches it.
    ///
    /// # Errors
    /// Returns [`RegistryError::TypeNotFound`] or [`RegistryError::AmbiguousMatch`].
    pub fn resolve_id(
        &self,
        representation: &TypeRepresentation,
        match_strategy: TypeMatchStrategy,
        multiplicity: MultiplicityStrategy,
    ) -> Result<ConfigurationId, RegistryError> {
        if representation.namespace == CANNED_NAMESPACE
            && let Some(spec) = CannedSpec::parse(&representation.clone().into())
        {
            return self.canonicalize(spec, match_strategy, multiplicity);
        }

        let candidates: Vec<ConfigurationId> = self
            .entries
            .read()
            .iter()
            .filter(|e| e.id.representation().matches(representation, match_strategy))
            .map(|e| e.id.clone())
            .collect();

        if candidates.is_empty() && match_strategy == TypeMatchStrategy::NameOnly {
            let as_canned = TypeRepresentation {
                namespace: CANNED_NAMESPACE.to_owned(),
                ..representation.clone()
            };
            if let Some(spec) = CannedSpec::parse(&as_canned.into()) {
                return self.canonicalize(spec, match_strategy, multiplicity);
            }
        }
        select(representation, candidates, multiplicity, ToString::to_string)
    }

    fn canonicalize(
        &self,
        spec: CannedSpec,
        match_strategy: TypeMatchStrategy,
        multiplicity: MultiplicityStrategy,
    ) -> Result<ConfigurationId, RegistryError> {
        if let CannedSpec::TypesToRegister(kind, types) = &spec {
            let types = types
                .iter()
                .map(|repr| {
                    self.types
                        .resolve(repr, match_strategy, multiplicity)
                        .map(|shape| shape.representation().clone())
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(CannedSpec::TypesToRegister(*kind, types).id());
        }

        let nested = spec
            .configuration_arguments()
            .iter()
            .map(|id| self.resolve_id(id.representation(), match_strategy, multiplicity))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(spec.with_configuration_arguments(nested).id())
    }

    /// Creates a fresh node for an exact identity.
    ///
    /// # Errors
    /// Returns [`RegistryError::TypeNotFound`] for unknown identities, or any error raised while
    /// resolving the types of a canned `TypesToRegister` node.
    pub fn instantiate(
        &self,
        id: &ConfigurationId,
    ) -> Result<Box<dyn ConfigurationNode>, RegistryError> {
        if let Some(spec) = CannedSpec::parse(id) {
            return spec.instantiate(self.types.as_ref());
        }

        let factory = self.entries.read().iter().find(|e| &e.id == id).map(|e| e.factory.clone());
        factory.map(|factory| factory()).ok_or_else(|| RegistryError::TypeNotFound {
            message: format!("configuration `{id}` is not registered").into(),
            context: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canned;
    use crate::shape::ShapeKind;
    use dser_domain::SerializationKind;

    struct BillingLine;
    struct LedgerLine;

    impl Shape for BillingLine {
        fn shape() -> TypeShape {
            TypeShape::builder::<Self>("billing", "Line").build()
        }
    }

    impl Shape for LedgerLine {
        fn shape() -> TypeShape {
            TypeShape::builder::<Self>("ledger", "Line").kind(ShapeKind::Enum).build()
        }
    }

    fn catalog() -> TypeCatalog {
        let catalog = TypeCatalog::new();
        catalog.register::<BillingLine>().register::<LedgerLine>().register::<BillingLine>();
        catalog
    }

    #[test]
    fn namespace_and_name_is_exact() {
        let shape = catalog()
            .resolve(
                &TypeRepresentation::new("ledger", "Line"),
                TypeMatchStrategy::NamespaceAndName,
                MultiplicityStrategy::ThrowOnMultiple,
            )
            .unwrap();
        assert_eq!(shape, TypeShape::of::<LedgerLine>());
    }

    #[test]
    fn name_only_is_ambiguous_unless_first_match() {
        let catalog = catalog();
        let repr = TypeRepresentation::new("", "Line");

        let err = catalog
            .resolve(&repr, TypeMatchStrategy::NameOnly, MultiplicityStrategy::ThrowOnMultiple)
            .unwrap_err();
        assert!(matches!(err, RegistryError::AmbiguousMatch { .. }));
        assert!(err.to_string().contains("billing::Line"));
        assert!(err.to_string().contains("ledger::Line"));

        let first = catalog
            .resolve(&repr, TypeMatchStrategy::NameOnly, MultiplicityStrategy::FirstMatch)
            .unwrap();
        assert_eq!(first, TypeShape::of::<BillingLine>());
    }

    #[test]
    fn missing_types_are_reported() {
        let err = catalog()
            .resolve(
                &TypeRepresentation::new("billing", "Invoice"),
                TypeMatchStrategy::NamespaceAndName,
                MultiplicityStrategy::FirstMatch,
            )
            .unwrap_err();
        assert_eq!(err.variant(), "TypeNotFound");
        assert!(err.to_string().contains("billing::Invoice"));
    }

    #[test]
    fn canned_identities_are_canonicalized() {
        let catalog = ConfigurationCatalog::new(Arc::new(catalog()));
        let sloppy = canned::types_to_register(
            SerializationKind::Json,
            [TypeRepresentation::new("whatever", "Line")],
        );

        let err = catalog
            .resolve_id(
                sloppy.representation(),
                TypeMatchStrategy::NameOnly,
                MultiplicityStrategy::ThrowOnMultiple,
            )
            .unwrap_err();
        assert_eq!(err.variant(), "AmbiguousMatch");

        let id = catalog
            .resolve_id(
                sloppy.representation(),
                TypeMatchStrategy::NameOnly,
                MultiplicityStrategy::FirstMatch,
            )
            .unwrap();
        assert_eq!(
            id,
            canned::types_to_register(
                SerializationKind::Json,
                [TypeRepresentation::new("billing", "Line")]
            )
        );
    }
}
