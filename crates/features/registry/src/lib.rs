//! Serialization configuration registry.
//!
//! Application code declares, once per object-graph shape, which types a serializer family may
//! handle. This crate turns those declarations into one consistent registry per configuration.
//!
//! # Architectural Overview
//!
//! 1.  **[`Shape`] / [`TypeShape`]**: structural self-description of a type, usually derived.
//! 2.  **[`TypeRegistration`]**: one type to register, plus which members and related types to
//!     pull in.
//! 3.  **[`ConfigurationNode`]**: a composable unit of configuration (registrations,
//!     dependencies, unregistered-type strategy, format options). The [`canned`] module holds
//!     generic wrappers that compose existing nodes.
//! 4.  **[`TypeCatalog`] / [`ConfigurationCatalog`]**: resolve types and configurations by their
//!     description.
//! 5.  **[`ConfigurationRegistry`]**: resolves a configuration graph into
//!     [`ResolvedConfiguration`]s, each instantiated once per identity and cached.

extern crate self as dser_registry;

pub mod canned;
mod catalog;
mod engine;
mod error;
mod node;
mod registration;
mod shape;

pub use catalog::{ConfigurationCatalog, TypeCatalog, TypeResolver};
pub use dser_derive::Shape;
pub use engine::{ConfigurationRegistry, EffectiveRegistry, RegisteredType, ResolvedConfiguration};
pub use error::{RegistryError, RegistryErrorExt};
pub use node::{ConfigurationId, ConfigurationNode};
pub use registration::{ExpandedType, RegistrationMetadata, TypeRegistration};
pub use shape::{Shape, ShapeFn, ShapeKind, TypeShape, TypeShapeBuilder};
