use crate::error::RegistryError;
use crate::shape::{Shape, ShapeKind, TypeShape};
use dser_domain::RelatedTypes;
use fxhash::FxHashSet;
use std::any::TypeId;
use std::collections::BTreeMap;

/// Everything about a registration except the registered type itself.
///
/// Two explicit registrations of the same type are compatible iff their metadata is equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RegistrationMetadata {
    pub related_types: RelatedTypes,
    pub namespace_filter: Option<String>,
    pub hints: BTreeMap<String, String>,
}

/// A request to register one type, plus which of its neighbours to pull in.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistration {
    shape: TypeShape,
    metadata: RegistrationMetadata,
}

/// One entry produced by [`TypeRegistration::expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedType {
    pub shape: TypeShape,
    /// `true` for the registered type itself, `false` for members and related types.
    pub explicit: bool,
}

impl TypeRegistration {
    /// Registers `T` together with its members.
    #[must_use]
    pub fn of<T: Shape>() -> Self {
        Self::new(T::shape())
    }

    #[must_use]
    pub fn new(shape: TypeShape) -> Self {
        Self { shape, metadata: RegistrationMetadata::default() }
    }

    #[must_use]
    pub fn related_types(mut self, related_types: RelatedTypes) -> Self {
        self.metadata.related_types = related_types;
        self
    }

    /// Only discovered types whose namespace starts with `prefix` are registered.
    #[must_use]
    pub fn namespace_filter(mut self, prefix: impl Into<String>) -> Self {
        self.metadata.namespace_filter = Some(prefix.into());
        self
    }

    /// Attaches a free-form serializer hint.
    #[must_use]
    pub fn hint(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.hints.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn shape(&self) -> &TypeShape {
        &self.shape
    }

    #[must_use]
    pub const fn metadata(&self) -> &RegistrationMetadata {
        &self.metadata
    }

    /// Produces the canonical set of types this registration stands for.
    ///
    /// The registered type comes first. Members are followed recursively and through
    /// collections; related types are followed one level. Primitives and collections are
    /// intrinsic and never produce entries themselves; a collection registered directly stands
    /// for its element types.
    ///
    /// # Errors
    /// Returns [`RegistryError::Configuration`] when the registration targets an open generic
    /// definition, or a type that has no serializable structure and no adapter.
    pub fn expand(&self) -> Result<Vec<ExpandedType>, RegistryError> {
        let mut expansion = Expansion {
            metadata: &self.metadata,
            seen: FxHashSet::default(),
            entries: Vec::new(),
        };
        expansion.root(&self.shape)?;
        Ok(expansion.entries)
    }
}

struct Expansion<'a> {
    metadata: &'a RegistrationMetadata,
    seen: FxHashSet<TypeId>,
    entries: Vec<ExpandedType>,
}

impl Expansion<'_> {
    fn root(&mut self, shape: &TypeShape) -> Result<(), RegistryError> {
        let type_id = validate(shape)?;

        match shape.kind() {
            ShapeKind::Primitive => return Ok(()),
            ShapeKind::Collection => {
                for element in shape.related() {
                    self.root(&element)?;
                }
                return Ok(());
            },
            _ => {},
        }

        if !self.seen.insert(type_id) {
            return Ok(());
        }
        self.entries.push(ExpandedType { shape: shape.clone(), explicit: true });

        if self.metadata.related_types.contains(RelatedTypes::MEMBERS) {
            for member in shape.members() {
                self.member(&member)?;
            }
        }
        if self.metadata.related_types.contains(RelatedTypes::RELATED) {
            for related in shape.related() {
                self.related(&related)?;
            }
        }
        Ok(())
    }

    fn member(&mut self, shape: &TypeShape) -> Result<(), RegistryError> {
        match shape.kind() {
            ShapeKind::Primitive => Ok(()),
            ShapeKind::Collection => {
                for element in shape.related() {
                    self.member(&element)?;
                }
                Ok(())
            },
            _ => {
                if !self.discover(shape)? {
                    return Ok(());
                }
                for member in shape.members() {
                    self.member(&member)?;
                }
                Ok(())
            },
        }
    }

    fn related(&mut self, shape: &TypeShape) -> Result<(), RegistryError> {
        match shape.kind() {
            ShapeKind::Primitive => Ok(()),
            ShapeKind::Collection => {
                for element in shape.related().filter(|e| !e.kind().is_intrinsic()) {
                    self.discover(&element)?;
                }
                Ok(())
            },
            _ => self.discover(shape).map(|_| ()),
        }
    }

    /// Records a non-root type. Returns `false` if it was filtered out or already known.
    fn discover(&mut self, shape: &TypeShape) -> Result<bool, RegistryError> {
        if let Some(prefix) = &self.metadata.namespace_filter
            && !shape.representation().namespace.starts_with(prefix.as_str())
        {
            return Ok(false);
        }

        let type_id = validate(shape)?;
        if !self.seen.insert(type_id) {
            return Ok(false);
        }
        self.entries.push(ExpandedType { shape: shape.clone(), explicit: false });
        Ok(true)
    }
}

fn validate(shape: &TypeShape) -> Result<TypeId, RegistryError> {
    let Some(type_id) = shape.type_id() else {
        return Err(RegistryError::configuration(format!(
            "cannot register open generic type definition `{shape}`"
        )));
    };
    if shape.kind() == ShapeKind::Opaque && !shape.has_adapter() {
        return Err(RegistryError::configuration(format!(
            "type `{shape}` has no serializable members and no adapter"
        )));
    }
    Ok(type_id)
}
