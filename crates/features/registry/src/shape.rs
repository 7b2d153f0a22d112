//! Structural type descriptions.
//!
//! Rust has no runtime reflection, so every type that takes part in a serialization
//! configuration describes itself through [`Shape`]. Shapes are cheap to clone and reference
//! their members lazily through plain function pointers, which keeps recursive types finite.

use dser_domain::TypeRepresentation;
use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Lazily produces a [`TypeShape`].
pub type ShapeFn = fn() -> TypeShape;

/// A type that can describe its own structure.
///
/// Usually derived with `#[derive(Shape)]`.
pub trait Shape: 'static {
    fn shape() -> TypeShape;
}

/// Broad structural category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Scalars and strings. Intrinsic: never registered.
    Primitive,
    Struct,
    Enum,
    /// Sequences, maps, options and boxes. Intrinsic: registered through their element types.
    Collection,
    /// No serializable structure of its own; requires an adapter to be registered.
    Opaque,
}

impl ShapeKind {
    #[must_use]
    pub const fn is_intrinsic(self) -> bool {
        matches!(self, Self::Primitive | Self::Collection)
    }
}

#[derive(Debug)]
struct ShapeInner {
    type_id: Option<TypeId>,
    representation: TypeRepresentation,
    kind: ShapeKind,
    members: Vec<ShapeFn>,
    related: Vec<ShapeFn>,
    adapter: bool,
}

/// Runtime description of a type: identity, representation and structure.
#[derive(Clone)]
pub struct TypeShape {
    inner: Arc<ShapeInner>,
}

impl TypeShape {
    /// Shape of `T`.
    #[must_use]
    pub fn of<T: Shape>() -> Self {
        T::shape()
    }

    /// Starts describing the concrete type `T`.
    #[must_use = "The shape is not built until you call .build()"]
    pub fn builder<T: 'static>(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> TypeShapeBuilder {
        TypeShapeBuilder {
            type_id: Some(TypeId::of::<T>()),
            representation: TypeRepresentation::new(namespace, name),
            kind: ShapeKind::Struct,
            members: Vec::new(),
            related: Vec::new(),
            adapter: false,
        }
    }

    /// An open generic type definition (for example `Vec<_>`), which has no runtime identity.
    #[must_use]
    pub fn generic_definition(representation: TypeRepresentation) -> Self {
        Self {
            inner: Arc::new(ShapeInner {
                type_id: None,
                representation,
                kind: ShapeKind::Struct,
                members: Vec::new(),
                related: Vec::new(),
                adapter: false,
            }),
        }
    }

    /// `None` for open generic definitions.
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.inner.type_id
    }

    #[must_use]
    pub fn representation(&self) -> &TypeRepresentation {
        &self.inner.representation
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.inner.kind
    }

    #[must_use]
    pub fn has_adapter(&self) -> bool {
        self.inner.adapter
    }

    #[must_use]
    pub fn is_open_generic(&self) -> bool {
        self.inner.type_id.is_none()
    }

    /// Declared member types, in declaration order.
    pub fn members(&self) -> impl Iterator<Item = Self> + '_ {
        self.inner.members.iter().map(|shape| shape())
    }

    /// Structurally related types: generic arguments, element types and declared relations.
    pub fn related(&self) -> impl Iterator<Item = Self> + '_ {
        self.inner.related.iter().map(|shape| shape())
    }
}

impl PartialEq for TypeShape {
    fn eq(&self, other: &Self) -> bool {
        self.inner.type_id == other.inner.type_id
            && self.inner.representation == other.inner.representation
    }
}

impl Eq for TypeShape {}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeShape")
            .field("representation", &self.inner.representation.to_string())
            .field("kind", &self.inner.kind)
            .field("open_generic", &self.is_open_generic())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.representation.fmt(f)
    }
}

/// Fluent builder returned by [`TypeShape::builder`].
#[derive(Debug)]
pub struct TypeShapeBuilder {
    type_id: Option<TypeId>,
    representation: TypeRepresentation,
    kind: ShapeKind,
    members: Vec<ShapeFn>,
    related: Vec<ShapeFn>,
    adapter: bool,
}

impl TypeShapeBuilder {
    #[must_use]
    pub const fn kind(mut self, kind: ShapeKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn generic_argument(mut self, argument: TypeRepresentation) -> Self {
        self.representation.generic_arguments.push(argument);
        self
    }

    #[must_use]
    pub fn member(mut self, shape: ShapeFn) -> Self {
        self.members.push(shape);
        self
    }

    #[must_use]
    pub fn related(mut self, shape: ShapeFn) -> Self {
        self.related.push(shape);
        self
    }

    #[must_use]
    pub const fn adapter(mut self, adapter: bool) -> Self {
        self.adapter = adapter;
        self
    }

    #[must_use]
    pub fn build(self) -> TypeShape {
        TypeShape {
            inner: Arc::new(ShapeInner {
                type_id: self.type_id,
                representation: self.representation,
                kind: self.kind,
                members: self.members,
                related: self.related,
                adapter: self.adapter,
            }),
        }
    }
}

macro_rules! primitive_shapes {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Shape for $ty {
                fn shape() -> TypeShape {
                    TypeShape::builder::<Self>("", $name).kind(ShapeKind::Primitive).build()
                }
            }
        )*
    };
}

primitive_shapes! {
    () => "unit",
    bool => "bool",
    char => "char",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    f32 => "f32",
    f64 => "f64",
    String => "String",
}

macro_rules! collection_shapes {
    ($($ty:ident<$($param:ident),+> => $name:literal),* $(,)?) => {
        $(
            impl<$($param: Shape),+> Shape for $ty<$($param),+> {
                fn shape() -> TypeShape {
                    TypeShape::builder::<Self>("", $name)
                        .kind(ShapeKind::Collection)
                        $( .generic_argument($param::shape().representation().clone()) )+
                        $( .related(<$param as Shape>::shape) )+
                        .build()
                }
            }
        )*
    };
}

collection_shapes! {
    Vec<T> => "Vec",
    Option<T> => "Option",
    Box<T> => "Box",
    HashSet<T> => "HashSet",
    BTreeSet<T> => "BTreeSet",
    HashMap<K, V> => "HashMap",
    BTreeMap<K, V> => "BTreeMap",
}

macro_rules! tuple_shapes {
    ($(($($param:ident),+)),* $(,)?) => {
        $(
            impl<$($param: Shape),+> Shape for ($($param,)+) {
                fn shape() -> TypeShape {
                    TypeShape::builder::<Self>("", "Tuple")
                        .kind(ShapeKind::Collection)
                        $( .generic_argument($param::shape().representation().clone()) )+
                        $( .related(<$param as Shape>::shape) )+
                        .build()
                }
            }
        )*
    };
}

tuple_shapes! {
    (A, B),
    (A, B, C),
    (A, B, C, D),
}
