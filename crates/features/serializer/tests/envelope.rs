pub mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use dser_domain::{
        CompressionKind, DescribedSerialization, JsonFormattingKind, MultiplicityStrategy,
        SerializationFormat, SerializationKind, SerializedPayload, SerializerRepresentation,
        TypeMatchStrategy, TypeRepresentation, UnregisteredTypeEncounteredStrategy,
    };
    use dser_registry::{ConfigurationId, RegistryError, Shape, canned};
    use dser_serializer::{
        DescribedSerializationExt, SerializerError, deserialize_payload,
        to_described_serialization,
    };
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_string_round_trip() {
        let factory = factory();

        let envelope = invoice()
            .to_described_serialization(&factory, &json(), SerializationFormat::String)
            .unwrap();

        assert_eq!(envelope.format(), SerializationFormat::String);
        assert_eq!(envelope.payload_type_representation(), Invoice::shape().representation());
        assert!(envelope.payload_string().unwrap().starts_with("{\"number\":1042"));

        let restored = Invoice::from_described_serialization(&factory, &envelope).unwrap();
        assert_eq!(restored, Some(invoice()));
    }

    #[test]
    fn test_compressed_document_bytes_round_trip() {
        let factory = factory();
        let packed = document(CompressionKind::Lz4);

        let envelope = invoice()
            .to_described_serialization(&factory, &packed, SerializationFormat::Binary)
            .unwrap();
        let plain = invoice()
            .to_described_serialization(
                &factory,
                &document(CompressionKind::None),
                SerializationFormat::Binary,
            )
            .unwrap();

        assert_eq!(envelope.format(), SerializationFormat::Binary);
        assert_ne!(envelope.payload_binary(), plain.payload_binary());
        assert_eq!(
            Invoice::from_described_serialization(&factory, &envelope).unwrap(),
            Some(invoice())
        );
        assert_eq!(
            Invoice::from_described_serialization(&factory, &plain).unwrap(),
            Some(invoice())
        );
    }

    #[test]
    fn test_document_string_is_base64() {
        let factory = factory();
        let envelope = invoice()
            .to_described_serialization(
                &factory,
                &document(CompressionKind::None),
                SerializationFormat::String,
            )
            .unwrap();

        let text = envelope.payload_string().unwrap();
        assert!(text.chars().all(|c| c.is_ascii_alphanumeric() || "+/=".contains(c)));
        assert_eq!(
            Invoice::from_described_serialization(&factory, &envelope).unwrap(),
            Some(invoice())
        );
    }

    #[test]
    fn test_compressed_string_is_unsupported() {
        let err = invoice()
            .to_described_serialization(
                &factory(),
                &document(CompressionKind::Lz4),
                SerializationFormat::String,
            )
            .unwrap_err();
        assert_eq!(err.variant(), "UnsupportedOperation");
    }

    #[test]
    fn test_property_bag_round_trip_uses_configured_null() {
        let factory = factory();
        let envelope = customer()
            .to_described_serialization(&factory, &property_bag(), SerializationFormat::String)
            .unwrap();

        let text = envelope.payload_string().unwrap();
        assert_eq!(text, "$type=tests::crm::Customer\nemail=<none>\nname=Ada Lovelace\ntier=2");
        assert_eq!(
            Customer::from_described_serialization(&factory, &envelope).unwrap(),
            Some(customer())
        );
    }

    #[test]
    fn test_property_bag_rejects_compression() {
        let representation = property_bag().with_compression(CompressionKind::Lz4);
        let err = customer()
            .to_described_serialization(&factory(), &representation, SerializationFormat::Binary)
            .unwrap_err();
        assert!(matches!(
            err,
            SerializerError::ArgumentOutOfRange { name: "compression_kind", .. }
        ));
    }

    #[test]
    fn test_absent_values() {
        let factory = factory();
        let strategy = TypeMatchStrategy::NamespaceAndName;

        let binary = to_described_serialization::<Customer>(
            &factory,
            None,
            &property_bag(),
            SerializationFormat::Binary,
            strategy,
        )
        .unwrap();
        assert_eq!(binary.format(), SerializationFormat::Null);
        assert_eq!(binary.payload(), &SerializedPayload::Null);

        let text = to_described_serialization::<Customer>(
            &factory,
            None,
            &property_bag(),
            SerializationFormat::String,
            strategy,
        )
        .unwrap();
        assert_eq!(text.payload_string(), Some("<none>"));

        for envelope in [binary, text] {
            assert_eq!(Customer::from_described_serialization(&factory, &envelope).unwrap(), None);
        }
    }

    #[test]
    fn test_only_string_and_binary_formats_are_written() {
        for format in [SerializationFormat::Null, SerializationFormat::Invalid] {
            let err =
                invoice().to_described_serialization(&factory(), &json(), format).unwrap_err();
            assert!(matches!(err, SerializerError::UnsupportedOperation { .. }), "{err}");
        }
    }

    #[test]
    fn test_payload_type_must_match() {
        let factory = factory();
        let envelope = invoice()
            .to_described_serialization(&factory, &json(), SerializationFormat::String)
            .unwrap();

        let err = Customer::from_described_serialization(&factory, &envelope).unwrap_err();
        let SerializerError::TypeMismatch { expected, actual, .. } = &err else {
            panic!("expected a type mismatch, got {err}");
        };
        assert_eq!(expected, "tests::crm::Customer");
        assert_eq!(actual, "tests::billing::Invoice");
    }

    #[test]
    fn test_name_only_matching_ignores_namespaces() {
        let factory = factory();
        let envelope = DescribedSerialization::new(
            TypeRepresentation::new("legacy", "Invoice"),
            SerializedPayload::String(serde_json::to_string(&invoice()).unwrap()),
            SerializerRepresentation::new(
                SerializationKind::Json,
                TypeRepresentation::new("", "InvoiceJsonConfiguration"),
            ),
        );

        let strict = Invoice::from_described_serialization(&factory, &envelope).unwrap_err();
        assert_eq!(strict.variant(), "TypeMismatch");

        let restored = deserialize_payload::<Invoice>(
            &factory,
            &envelope,
            TypeMatchStrategy::NameOnly,
            MultiplicityStrategy::ThrowOnMultiple,
            None,
        )
        .unwrap();
        assert_eq!(restored, Some(invoice()));
    }

    #[test]
    fn test_unregistered_type_follows_strategy() {
        let coupon = Coupon { code: "WELCOME".to_owned() };

        let err = coupon
            .to_described_serialization(&factory(), &json(), SerializationFormat::String)
            .unwrap_err();
        let SerializerError::Registry { source, .. } = &err else {
            panic!("expected a registry error, got {err}");
        };
        assert!(matches!(source, RegistryError::UnregisteredType { .. }));

        let lenient = lenient_factory();
        let envelope = coupon
            .to_described_serialization(&lenient, &json(), SerializationFormat::String)
            .unwrap();
        assert_eq!(envelope.payload_string(), Some("{\"code\":\"WELCOME\"}"));

        let restored = deserialize_payload::<Coupon>(
            &factory(),
            &envelope,
            TypeMatchStrategy::NamespaceAndName,
            MultiplicityStrategy::ThrowOnMultiple,
            Some(UnregisteredTypeEncounteredStrategy::Attempt),
        )
        .unwrap();
        assert_eq!(restored, Some(coupon));
    }

    #[test]
    fn test_formatting_override_produces_indented_json() {
        let factory = factory();
        let source = ConfigurationId::of::<InvoiceJsonConfiguration>();
        let pretty = canned::formatting_override(source, JsonFormattingKind::Concise);
        let representation =
            SerializerRepresentation::new(SerializationKind::Json, pretty.into_representation());

        let envelope = invoice()
            .to_described_serialization(&factory, &representation, SerializationFormat::String)
            .unwrap();

        assert!(envelope.payload_string().unwrap().contains("\n  \"number\": 1042"));
        assert_eq!(
            Invoice::from_described_serialization(&factory, &envelope).unwrap(),
            Some(invoice())
        );
    }

    #[test]
    fn test_minimal_json_keeps_absent_map_entries() {
        let factory = factory();
        let minimal = canned::formatting_override(
            canned::null(SerializationKind::Json),
            JsonFormattingKind::Minimal,
        );
        let representation =
            SerializerRepresentation::new(SerializationKind::Json, minimal.into_representation());
        let prices = PriceList {
            by_sku: BTreeMap::from([("a".to_owned(), Some(1)), ("b".to_owned(), None)]),
            discontinued: None,
        };

        let envelope = prices
            .to_described_serialization(&factory, &representation, SerializationFormat::String)
            .unwrap();

        assert_eq!(envelope.payload_string(), Some(r#"{"by_sku":{"a":1,"b":null}}"#));
        assert_eq!(
            PriceList::from_described_serialization(&factory, &envelope).unwrap(),
            Some(prices)
        );
    }

    #[test]
    fn test_property_bag_round_trips_enums_and_numeric_keys() {
        let factory = lenient_factory();
        let event = CustomerEvent::Registered { name: "Ada".to_owned(), tier: 2 };

        let envelope = event
            .to_described_serialization(&factory, &property_bag(), SerializationFormat::String)
            .unwrap();
        assert_eq!(
            envelope.payload_string(),
            Some("$type=tests::crm::CustomerEvent\nRegistered={\"name\":\"Ada\",\"tier\":2}")
        );
        assert_eq!(
            CustomerEvent::from_described_serialization(&factory, &envelope).unwrap(),
            Some(event)
        );

        let seats = BTreeMap::from([(12_u32, "window".to_owned()), (3, "aisle".to_owned())]);
        let envelope = seats
            .to_described_serialization(&factory, &property_bag(), SerializationFormat::Binary)
            .unwrap();
        assert_eq!(
            BTreeMap::<u32, String>::from_described_serialization(&factory, &envelope).unwrap(),
            Some(seats)
        );
    }

    #[test]
    fn test_persisted_envelope_is_restored() {
        let factory = factory();
        let packed = document(CompressionKind::Lz4);
        let envelope = invoice()
            .to_described_serialization(&factory, &packed, SerializationFormat::Binary)
            .unwrap();

        let stored = serde_json::to_string(&envelope).unwrap();
        let loaded: DescribedSerialization = serde_json::from_str(&stored).unwrap();

        assert_eq!(loaded, envelope);
        let restored = Invoice::from_described_serialization(&factory, &loaded).unwrap();
        assert_eq!(restored, Some(invoice()));
    }

    #[test]
    fn test_unknown_payload_format_is_not_supported() {
        let envelope: DescribedSerialization = serde_json::from_value(json!({
            "payload_type_representation": { "namespace": "tests::billing", "name": "Invoice" },
            "format": "Hologram",
            "serializer_representation": {
                "serialization_kind": "Json",
                "configuration_type": {
                    "namespace": "tests::config",
                    "name": "InvoiceJsonConfiguration"
                }
            }
        }))
        .unwrap();

        let err = Invoice::from_described_serialization(&factory(), &envelope).unwrap_err();
        assert_eq!(err.variant(), "NotSupported");
    }

    #[test]
    fn test_unknown_configuration_surfaces_registry_error() {
        let representation = SerializerRepresentation::new(
            SerializationKind::Json,
            TypeRepresentation::new("tests::config", "Missing"),
        );
        let err = invoice()
            .to_described_serialization(&factory(), &representation, SerializationFormat::String)
            .unwrap_err();
        assert!(matches!(
            err,
            SerializerError::Registry { source: RegistryError::TypeNotFound { .. }, .. }
        ));
    }
}
