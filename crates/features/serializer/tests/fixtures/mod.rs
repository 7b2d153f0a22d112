#![allow(dead_code)]

use dser_domain::{
    CompressionKind, FormatOptions, PropertyBagOptions, SerializationKind,
    SerializerRepresentation, UnregisteredTypeEncounteredStrategy,
};
use dser_kernel::settings::SerializerSettings;
use dser_registry::{
    ConfigurationCatalog, ConfigurationId, ConfigurationNode, ConfigurationRegistry, Shape,
    TypeCatalog, TypeRegistration,
};
use dser_serializer::SerializerFactory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Shape)]
#[shape(namespace = "tests::billing")]
pub enum Currency {
    Eur,
    Usd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Shape)]
#[shape(namespace = "tests::billing")]
pub struct Money {
    pub cents: i64,
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Shape)]
#[shape(namespace = "tests::billing")]
pub struct Line {
    pub sku: String,
    pub quantity: u16,
    pub unit_price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Shape)]
#[shape(namespace = "tests::crm")]
pub struct Customer {
    pub name: String,
    pub email: Option<String>,
    pub tier: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Shape)]
#[shape(namespace = "tests::billing")]
pub struct Invoice {
    pub number: u32,
    pub customer: Customer,
    pub lines: Vec<Line>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Shape)]
#[shape(namespace = "tests::marketing")]
pub struct Coupon {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Shape)]
#[shape(namespace = "tests::crm")]
pub enum CustomerEvent {
    Registered { name: String, tier: u8 },
    Renamed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Shape)]
#[shape(namespace = "tests::billing")]
pub struct PriceList {
    pub by_sku: BTreeMap<String, Option<u32>>,
    pub discontinued: Option<String>,
}

#[derive(Debug, Default, Shape)]
#[shape(namespace = "tests::config")]
pub struct InvoiceJsonConfiguration;

impl ConfigurationNode for InvoiceJsonConfiguration {
    fn kind(&self) -> SerializationKind {
        SerializationKind::Json
    }

    fn type_registrations(&self) -> Vec<TypeRegistration> {
        vec![TypeRegistration::of::<Invoice>()]
    }
}

#[derive(Debug, Default, Shape)]
#[shape(namespace = "tests::config")]
pub struct InvoiceDocumentConfiguration;

impl ConfigurationNode for InvoiceDocumentConfiguration {
    fn kind(&self) -> SerializationKind {
        SerializationKind::Document
    }

    fn type_registrations(&self) -> Vec<TypeRegistration> {
        vec![TypeRegistration::of::<Invoice>()]
    }
}

#[derive(Debug, Default, Shape)]
#[shape(namespace = "tests::config")]
pub struct CustomerPropertyBagConfiguration;

impl ConfigurationNode for CustomerPropertyBagConfiguration {
    fn kind(&self) -> SerializationKind {
        SerializationKind::PropertyBag
    }

    fn type_registrations(&self) -> Vec<TypeRegistration> {
        vec![TypeRegistration::of::<Customer>()]
    }

    fn format_options(&self, _inherited: Option<&FormatOptions>) -> FormatOptions {
        FormatOptions {
            property_bag: PropertyBagOptions {
                null_value_encoding: "<none>".to_owned(),
                ..PropertyBagOptions::default()
            },
            ..FormatOptions::default()
        }
    }
}

pub fn invoice() -> Invoice {
    Invoice {
        number: 1042,
        customer: customer(),
        lines: vec![
            Line {
                sku: "PAPER-A4".to_owned(),
                quantity: 3,
                unit_price: Money { cents: 499, currency: Currency::Eur },
            },
            Line {
                sku: "INK-BLK".to_owned(),
                quantity: 1,
                unit_price: Money { cents: 2_999, currency: Currency::Eur },
            },
        ],
        note: None,
    }
}

pub fn customer() -> Customer {
    Customer { name: "Ada Lovelace".to_owned(), email: None, tier: 2 }
}

pub fn catalog() -> ConfigurationCatalog {
    let types = TypeCatalog::new();
    types.register::<Invoice>().register::<Customer>().register::<Coupon>();
    let catalog = ConfigurationCatalog::new(Arc::new(types));
    catalog
        .register::<InvoiceJsonConfiguration>()
        .register::<InvoiceDocumentConfiguration>()
        .register::<CustomerPropertyBagConfiguration>();
    catalog
}

pub fn factory() -> SerializerFactory {
    factory_with(SerializerSettings::default())
}

pub fn factory_with(settings: SerializerSettings) -> SerializerFactory {
    let registry = ConfigurationRegistry::new(Arc::new(catalog()));
    SerializerFactory::from_settings(Arc::new(registry), settings)
}

pub fn lenient_factory() -> SerializerFactory {
    factory_with(SerializerSettings {
        unregistered_type_strategy: Some(UnregisteredTypeEncounteredStrategy::Attempt),
        ..SerializerSettings::default()
    })
}

pub fn representation_of<C: ConfigurationNode + Shape>(
    kind: SerializationKind,
    compression: CompressionKind,
) -> SerializerRepresentation {
    SerializerRepresentation::new(kind, ConfigurationId::of::<C>().into_representation())
        .with_compression(compression)
}

pub fn json() -> SerializerRepresentation {
    representation_of::<InvoiceJsonConfiguration>(SerializationKind::Json, CompressionKind::None)
}

pub fn document(compression: CompressionKind) -> SerializerRepresentation {
    representation_of::<InvoiceDocumentConfiguration>(SerializationKind::Document, compression)
}

pub fn property_bag() -> SerializerRepresentation {
    representation_of::<CustomerPropertyBagConfiguration>(
        SerializationKind::PropertyBag,
        CompressionKind::None,
    )
}
