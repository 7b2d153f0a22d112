//! Configuration resolution engine.
//!
//! [`ConfigurationRegistry`] walks the dependency graph of a configuration depth-first,
//! instantiates every node exactly once, merges all registrations into one
//! [`EffectiveRegistry`] per node and caches the outcome for the lifetime of the registry.

use crate::catalog::ConfigurationCatalog;
use crate::error::{RegistryError, RegistryErrorExt};
use crate::node::{ConfigurationId, ConfigurationNode};
use crate::registration::RegistrationMetadata;
use crate::shape::{ShapeKind, TypeShape};
use dser_domain::{
    FormatOptions, MultiplicityStrategy, SerializationKind, TypeMatchStrategy, TypeRepresentation,
    UnregisteredTypeEncounteredStrategy,
};
use fxhash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace, warn};

/// One type known to an [`EffectiveRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredType {
    pub shape: TypeShape,
    pub metadata: RegistrationMetadata,
    /// The node whose registration produced this entry.
    pub contributed_by: ConfigurationId,
    /// `false` for members and related types pulled in by another registration.
    pub explicit: bool,
}

/// Merged, conflict-checked registrations reachable from one configuration.
#[derive(Debug, Clone, Default)]
pub struct EffectiveRegistry {
    entries: FxHashMap<TypeId, RegisteredType>,
}

impl EffectiveRegistry {
    #[must_use]
    pub fn get(&self, type_id: TypeId) -> Option<&RegisteredType> {
        self.entries.get(&type_id)
    }

    #[must_use]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.entries.contains_key(&type_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredType> {
        self.entries.values()
    }

    /// Explicit registrations win over discovered ones. Two explicit registrations from
    /// different nodes must carry equal metadata.
    fn insert(&mut self, entry: RegisteredType) -> Result<(), RegistryError> {
        let Some(type_id) = entry.shape.type_id() else {
            return Ok(());
        };

        match self.entries.entry(type_id) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
            },
            Entry::Occupied(mut slot) => {
                let existing = slot.get();
                match (existing.explicit, entry.explicit) {
                    (true, true)
                        if existing.contributed_by != entry.contributed_by
                            && existing.metadata != entry.metadata =>
                    {
                        warn!(
                            type_name = %entry.shape,
                            first = %existing.contributed_by,
                            second = %entry.contributed_by,
                            "conflicting type registration"
                        );
                        return Err(RegistryError::ConfigurationConflict {
                            type_name: entry.shape.to_string(),
                            first: existing.contributed_by.to_string(),
                            second: entry.contributed_by.to_string(),
                            message: format!(
                                "registration metadata differs ({:?} vs {:?})",
                                existing.metadata, entry.metadata
                            )
                            .into(),
                            context: None,
                        });
                    },
                    (false, true) => {
                        slot.insert(entry);
                    },
                    _ => {},
                }
            },
        }
        Ok(())
    }

    fn merge(&mut self, other: &Self) -> Result<(), RegistryError> {
        for entry in other.entries.values() {
            self.insert(entry.clone())?;
        }
        Ok(())
    }
}

/// A fully initialized configuration node together with its effective registry.
pub struct ResolvedConfiguration {
    id: ConfigurationId,
    kind: SerializationKind,
    node: Box<dyn ConfigurationNode>,
    dependencies: Vec<Arc<Self>>,
    strategy: UnregisteredTypeEncounteredStrategy,
    format_options: FormatOptions,
    registry: EffectiveRegistry,
}

impl fmt::Debug for ResolvedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dependencies: Vec<String> =
            self.dependencies.iter().map(|d| d.id.to_string()).collect();
        f.debug_struct("ResolvedConfiguration")
            .field("id", &self.id.to_string())
            .field("kind", &self.kind)
            .field("node", &self.node)
            .field("dependencies", &dependencies)
            .field("strategy", &self.strategy)
            .field("format_options", &self.format_options)
            .field("registered", &self.registry.len())
            .finish()
    }
}

impl ResolvedConfiguration {
    #[must_use]
    pub const fn id(&self) -> &ConfigurationId {
        &self.id
    }

    #[must_use]
    pub const fn kind(&self) -> SerializationKind {
        self.kind
    }

    #[must_use]
    pub fn node(&self) -> &dyn ConfigurationNode {
        self.node.as_ref()
    }

    /// Resolved direct dependencies, in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[Arc<Self>] {
        &self.dependencies
    }

    /// The effective strategy; never `Default`.
    #[must_use]
    pub const fn unregistered_type_strategy(&self) -> UnregisteredTypeEncounteredStrategy {
        self.strategy
    }

    #[must_use]
    pub const fn format_options(&self) -> &FormatOptions {
        &self.format_options
    }

    #[must_use]
    pub const fn registry(&self) -> &EffectiveRegistry {
        &self.registry
    }

    /// Primitives are always registered; collections are registered iff their element types are.
    #[must_use]
    pub fn is_registered(&self, shape: &TypeShape) -> bool {
        match shape.kind() {
            ShapeKind::Primitive => true,
            ShapeKind::Collection => shape.related().all(|element| self.is_registered(&element)),
            _ => shape.type_id().is_some_and(|type_id| self.registry.contains(type_id)),
        }
    }

    /// Applies the unregistered-type strategy to `shape`.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnregisteredType`] if `shape` is not registered and the strategy
    /// is `Throw`.
    pub fn check_registered(&self, shape: &TypeShape) -> Result<(), RegistryError> {
        if self.is_registered(shape) {
            return Ok(());
        }

        match self.strategy {
            UnregisteredTypeEncounteredStrategy::Throw => Err(RegistryError::UnregisteredType {
                type_name: shape.to_string(),
                configuration: self.id.to_string(),
                context: None,
            }),
            UnregisteredTypeEncounteredStrategy::Attempt
            | UnregisteredTypeEncounteredStrategy::Default => {
                debug!(
                    type_name = %shape,
                    configuration = %self.id,
                    "unregistered type, attempting anyway"
                );
                Ok(())
            },
        }
    }
}

/// Process-wide cache of resolved configurations.
///
/// Create one at startup and share it by `Arc`. Entries are never evicted.
///
/// # Example
///
/// ```rust
/// use dser_registry::{
///     ConfigurationCatalog, ConfigurationNode, ConfigurationRegistry, ConfigurationId, Shape,
///     TypeCatalog, TypeRegistration,
/// };
/// use dser_domain::SerializationKind;
/// use std::sync::Arc;
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
/// # fn main() -> Result<(), dser_registry::RegistryError> {
/// let catalog = ConfigurationCatalog::new(Arc::new(TypeCatalog::new()));
/// catalog.register::<InvoiceJsonConfiguration>();
/// let registry = ConfigurationRegistry::new(Arc::new(catalog));
///
/// let id = ConfigurationId::of::<InvoiceJsonConfiguration>();
/// let first = registry.resolve(&id)?;
/// let second = registry.resolve(&id)?;
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(first.is_registered(&Invoice::shape()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigurationRegistry {
    catalog: Arc<ConfigurationCatalog>,
    cache: RwLock<FxHashMap<ConfigurationId, Arc<ResolvedConfiguration>>>,
    instantiations: AtomicUsize,
}

impl ConfigurationRegistry {
    #[must_use]
    pub fn new(catalog: Arc<ConfigurationCatalog>) -> Self {
        Self { catalog, cache: RwLock::default(), instantiations: AtomicUsize::new(0) }
    }

    #[must_use]
    pub fn catalog(&self) -> &ConfigurationCatalog {
        &self.catalog
    }

    /// Resolves `id` and everything it depends on.
    ///
    /// The whole build runs under one write lock; nodes created by a failing resolution are
    /// discarded, so the cache never holds a partial graph.
    ///
    /// # Errors
    /// Returns [`RegistryError::Configuration`] for cycles, invalid or duplicate registrations
    /// and kind mismatches, [`RegistryError::ConfigurationConflict`] for incompatible
    /// registrations, and [`RegistryError::TypeNotFound`] for unknown identities.
    pub fn resolve(
        &self,
        id: &ConfigurationId,
    ) -> Result<Arc<ResolvedConfiguration>, RegistryError> {
        if let Some(hit) = self.cache.read().get(id) {
            trace!(configuration = %id, "configuration cache hit");
            return Ok(Arc::clone(hit));
        }

        let mut cache = self.cache.write();
        let mut session = Session {
            catalog: &self.catalog,
            committed: &cache,
            pending: FxHashMap::default(),
            path: Vec::new(),
            instantiations: 0,
        };

        let resolved = match session.resolve(id) {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(configuration = %id, error = %err, "configuration resolution failed");
                return Err(err);
            },
        };

        let Session { pending, instantiations, .. } = session;
        debug!(configuration = %id, new_nodes = pending.len(), "configuration graph committed");
        cache.extend(pending);
        self.instantiations.fetch_add(instantiations, Ordering::Relaxed);
        Ok(resolved)
    }

    /// Resolves a configuration by description, then resolves its graph.
    ///
    /// # Errors
    /// Same as [`Self::resolve`], plus [`RegistryError::AmbiguousMatch`].
    pub fn resolve_representation(
        &self,
        representation: &TypeRepresentation,
        match_strategy: TypeMatchStrategy,
        multiplicity: MultiplicityStrategy,
    ) -> Result<Arc<ResolvedConfiguration>, RegistryError> {
        let id = self.catalog.resolve_id(representation, match_strategy, multiplicity)?;
        self.resolve(&id)
    }

    /// Cached configuration, without resolving.
    #[must_use]
    pub fn get(&self, id: &ConfigurationId) -> Option<Arc<ResolvedConfiguration>> {
        self.cache.read().get(id).cloned()
    }

    /// Number of cached configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Number of node instances committed to the cache so far.
    #[must_use]
    pub fn instantiation_count(&self) -> usize {
        self.instantiations.load(Ordering::Relaxed)
    }
}

struct Session<'a> {
    catalog: &'a ConfigurationCatalog,
    committed: &'a FxHashMap<ConfigurationId, Arc<ResolvedConfiguration>>,
    pending: FxHashMap<ConfigurationId, Arc<ResolvedConfiguration>>,
    path: Vec<ConfigurationId>,
    instantiations: usize,
}

impl Session<'_> {
    fn resolve(
        &mut self,
        id: &ConfigurationId,
    ) -> Result<Arc<ResolvedConfiguration>, RegistryError> {
        if let Some(done) = self.committed.get(id).or_else(|| self.pending.get(id)) {
            return Ok(Arc::clone(done));
        }

        if let Some(start) = self.path.iter().position(|visiting| visiting == id) {
            let cycle: Vec<String> =
                self.path[start..].iter().chain([id]).map(ToString::to_string).collect();
            return Err(RegistryError::configuration(format!(
                "dependency cycle: {}",
                cycle.join(" -> ")
            )));
        }

        self.path.push(id.clone());
        let built = self.build(id);
        self.path.pop();

        let resolved = Arc::new(built?);
        self.pending.insert(id.clone(), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn build(&mut self, id: &ConfigurationId) -> Result<ResolvedConfiguration, RegistryError> {
        let node = self.catalog.instantiate(id)?;
        let kind = node.kind();
        self.instantiations += 1;
        debug!(configuration = %id, kind = %kind, "configuration node instantiated");

        let mut seen = FxHashSet::default();
        let dependency_ids: Vec<ConfigurationId> =
            node.dependencies().into_iter().filter(|dep| seen.insert(dep.clone())).collect();

        let mut dependencies = Vec::with_capacity(dependency_ids.len());
        for dependency_id in &dependency_ids {
            let dependency = self.resolve(dependency_id)?;
            if dependency.kind != kind {
                return Err(RegistryError::configuration(format!(
                    "`{id}` ({kind}) depends on `{dependency_id}` ({})",
                    dependency.kind
                )));
            }
            dependencies.push(dependency);
        }

        let mut registry = EffectiveRegistry::default();
        for dependency in &dependencies {
            registry.merge(&dependency.registry)?;
        }

        let registrations = node.type_registrations();
        let mut explicit = FxHashSet::default();
        for registration in &registrations {
            let expanded = registration.expand().context(format!("registering into `{id}`"))?;
            for entry in expanded {
                if entry.explicit && !explicit.insert(entry.shape.type_id()) {
                    return Err(RegistryError::configuration(format!(
                        "`{}` is registered more than once by `{id}`",
                        entry.shape
                    )));
                }
                registry.insert(RegisteredType {
                    shape: entry.shape,
                    metadata: registration.metadata().clone(),
                    contributed_by: id.clone(),
                    explicit: entry.explicit,
                })?;
            }
        }

        let source = match node.options_source() {
            Some(source_id) => {
                let position = dependency_ids.iter().position(|dep| *dep == source_id);
                let Some(position) = position else {
                    return Err(RegistryError::configuration(format!(
                        "options source `{source_id}` of `{id}` is not one of its dependencies"
                    )));
                };
                Some(Arc::clone(&dependencies[position]))
            },
            None => None,
        };

        let format_options = node.format_options(source.as_ref().map(|s| &s.format_options));
        let strategy = match (node.unregistered_type_strategy(), &source) {
            (UnregisteredTypeEncounteredStrategy::Default, Some(source)) => source.strategy,
            (declared, _) => declared.resolve(!registrations.is_empty()),
        };

        trace!(
            configuration = %id,
            registered = registry.len(),
            strategy = ?strategy,
            "configuration node finalized"
        );

        Ok(ResolvedConfiguration {
            id: id.clone(),
            kind,
            node,
            dependencies,
            strategy,
            format_options,
            registry,
        })
    }
}
