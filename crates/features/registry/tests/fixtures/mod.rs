#![allow(dead_code)]

use dser_domain::{SerializationKind, TypeRepresentation, UnregisteredTypeEncounteredStrategy};
use dser_registry::{
    ConfigurationCatalog, ConfigurationId, ConfigurationNode, ConfigurationRegistry, Shape,
    TypeCatalog, TypeRegistration,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Shape)]
#[shape(namespace = "tests::crm")]
pub struct Address {
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Shape)]
#[shape(namespace = "tests::crm")]
pub struct Customer {
    pub name: String,
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Shape)]
#[shape(namespace = "tests::sales")]
pub struct Order {
    pub customer: Customer,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Shape)]
#[shape(namespace = "tests::sales")]
pub struct Coupon {
    pub code: String,
}

/// Configurable node used to assemble test graphs.
#[derive(Debug, Clone)]
pub struct TestNode {
    pub kind: SerializationKind,
    pub registrations: Vec<TypeRegistration>,
    pub dependencies: Vec<ConfigurationId>,
    pub strategy: UnregisteredTypeEncounteredStrategy,
}

impl TestNode {
    pub fn json() -> Self {
        Self {
            kind: SerializationKind::Json,
            registrations: Vec::new(),
            dependencies: Vec::new(),
            strategy: UnregisteredTypeEncounteredStrategy::Default,
        }
    }

    pub fn kind(mut self, kind: SerializationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn register(mut self, registration: TypeRegistration) -> Self {
        self.registrations.push(registration);
        self
    }

    pub fn depends_on(mut self, name: &str) -> Self {
        self.dependencies.push(id(name));
        self
    }

    pub fn strategy(mut self, strategy: UnregisteredTypeEncounteredStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl ConfigurationNode for TestNode {
    fn kind(&self) -> SerializationKind {
        self.kind
    }

    fn type_registrations(&self) -> Vec<TypeRegistration> {
        self.registrations.clone()
    }

    fn dependencies(&self) -> Vec<ConfigurationId> {
        self.dependencies.clone()
    }

    fn unregistered_type_strategy(&self) -> UnregisteredTypeEncounteredStrategy {
        self.strategy
    }
}

pub fn id(name: &str) -> ConfigurationId {
    TypeRepresentation::new("tests::config", name).into()
}

/// Catalog with the fixture types registered.
pub fn catalog() -> ConfigurationCatalog {
    let types = TypeCatalog::new();
    types.register::<Address>().register::<Customer>().register::<Order>().register::<Coupon>();
    ConfigurationCatalog::new(Arc::new(types))
}

/// Registers `node` under `name`, counting instantiations in `counter`.
pub fn register_counted(
    catalog: &ConfigurationCatalog,
    name: &str,
    node: TestNode,
    counter: &Arc<AtomicUsize>,
) {
    let counter = Arc::clone(counter);
    catalog.register_with(id(name), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Box::new(node.clone()) as Box<dyn ConfigurationNode>
    });
}

pub fn register(catalog: &ConfigurationCatalog, name: &str, node: TestNode) {
    catalog.register_with(id(name), move || Box::new(node.clone()) as Box<dyn ConfigurationNode>);
}

pub fn registry(catalog: ConfigurationCatalog) -> ConfigurationRegistry {
    ConfigurationRegistry::new(Arc::new(catalog))
}
