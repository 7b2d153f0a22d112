pub mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use dser_domain::{
        JsonFormattingKind, MultiplicityStrategy, RelatedTypes, SerializationKind,
        TypeMatchStrategy, TypeRepresentation, UnregisteredTypeEncounteredStrategy,
    };
    use dser_registry::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_same_root_resolves_to_same_instances() {
        let catalog = catalog();
        register(&catalog, "Crm", TestNode::json().register(TypeRegistration::of::<Customer>()));
        register(&catalog, "Sales", TestNode::json().depends_on("Crm"));
        let registry = registry(catalog);

        let first = registry.resolve(&id("Sales")).unwrap();
        let second = registry.resolve(&id("Sales")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first.dependencies()[0], &registry.resolve(&id("Crm")).unwrap()));
        assert_eq!(registry.instantiation_count(), 2);
    }

    #[test]
    fn test_shared_dependency_is_instantiated_once() {
        let catalog = catalog();
        let shared = Arc::new(AtomicUsize::new(0));
        register_counted(
            &catalog,
            "Shared",
            TestNode::json().register(TypeRegistration::of::<Address>()),
            &shared,
        );
        register(&catalog, "Left", TestNode::json().depends_on("Shared"));
        register(&catalog, "Right", TestNode::json().depends_on("Shared"));
        let registry = registry(catalog);

        let root = canned::dependency_only(SerializationKind::Json, [id("Left"), id("Right")]);
        let resolved = registry.resolve(&root).unwrap();

        assert_eq!(shared.load(Ordering::SeqCst), 1);
        assert_eq!(registry.instantiation_count(), 4);
        let left = &resolved.dependencies()[0];
        let right = &resolved.dependencies()[1];
        assert!(Arc::ptr_eq(&left.dependencies()[0], &right.dependencies()[0]));
        assert!(resolved.is_registered(&Address::shape()));
    }

    #[test]
    fn test_cycle_fails_and_caches_nothing() {
        let catalog = catalog();
        register(&catalog, "A", TestNode::json().depends_on("B"));
        register(&catalog, "B", TestNode::json().depends_on("C"));
        register(&catalog, "C", TestNode::json().depends_on("A"));
        register(&catalog, "Leaf", TestNode::json());
        let registry = registry(catalog);

        let err = registry.resolve(&id("A")).unwrap_err();

        assert!(matches!(err, RegistryError::Configuration { .. }));
        let message = err.to_string();
        assert!(message.contains("dependency cycle"), "{message}");
        assert!(message.contains("tests::config::A -> tests::config::B"), "{message}");
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.instantiation_count(), 0);

        registry.resolve(&id("Leaf")).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_identical_registrations_from_two_nodes_are_merged() {
        let catalog = catalog();
        register(&catalog, "A", TestNode::json().register(TypeRegistration::of::<Order>()));
        register(&catalog, "B", TestNode::json().register(TypeRegistration::of::<Order>()));
        let registry = registry(catalog);

        let root = canned::dependency_only(SerializationKind::Json, [id("A"), id("B")]);
        let resolved = registry.resolve(&root).unwrap();

        let order = resolved.registry().get(std::any::TypeId::of::<Order>()).unwrap();
        assert!(order.explicit);
        assert!(resolved.is_registered(&Customer::shape()));
        assert!(resolved.is_registered(&Address::shape()));
    }

    #[test]
    fn test_conflicting_registrations_name_both_nodes() {
        let catalog = catalog();
        register(&catalog, "A", TestNode::json().register(TypeRegistration::of::<Order>()));
        register(
            &catalog,
            "B",
            TestNode::json()
                .register(TypeRegistration::of::<Order>().related_types(RelatedTypes::NONE)),
        );
        let registry = registry(catalog);

        let root = canned::dependency_only(SerializationKind::Json, [id("A"), id("B")]);
        let err = registry.resolve(&root).unwrap_err();

        let RegistryError::ConfigurationConflict { type_name, first, second, .. } = &err else {
            panic!("expected a conflict, got {err}");
        };
        assert_eq!(type_name, "tests::sales::Order");
        assert_eq!(first, "tests::config::A");
        assert_eq!(second, "tests::config::B");
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_discovered_types_never_conflict() {
        let catalog = catalog();
        register(&catalog, "Orders", TestNode::json().register(TypeRegistration::of::<Order>()));
        register(
            &catalog,
            "Customers",
            TestNode::json()
                .register(TypeRegistration::of::<Customer>().namespace_filter("tests::crm")),
        );
        let registry = registry(catalog);

        let root =
            canned::dependency_only(SerializationKind::Json, [id("Orders"), id("Customers")]);
        let resolved = registry.resolve(&root).unwrap();

        let customer = resolved.registry().get(std::any::TypeId::of::<Customer>()).unwrap();
        assert!(customer.explicit);
        assert_eq!(customer.contributed_by, id("Customers"));
    }

    #[test]
    fn test_duplicate_registration_within_one_node_is_rejected() {
        let catalog = catalog();
        register(
            &catalog,
            "Twice",
            TestNode::json()
                .register(TypeRegistration::of::<Coupon>())
                .register(TypeRegistration::of::<Coupon>().hint("format", "short")),
        );
        let registry = registry(catalog);

        let err = registry.resolve(&id("Twice")).unwrap_err();
        assert!(err.to_string().contains("registered more than once"));
        assert!(err.to_string().contains("tests::sales::Coupon"));
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let catalog = catalog();
        register(&catalog, "Binary", TestNode::json().kind(SerializationKind::Document));
        register(&catalog, "Text", TestNode::json().depends_on("Binary"));
        let registry = registry(catalog);

        let err = registry.resolve(&id("Text")).unwrap_err();
        assert_eq!(err.variant(), "Configuration");
        assert!(err.to_string().contains("Document"));
    }

    #[test]
    fn test_unknown_configuration_is_not_found() {
        let registry = registry(catalog());
        let err = registry.resolve(&id("Missing")).unwrap_err();
        assert_eq!(err.variant(), "TypeNotFound");
        assert!(err.to_string().contains("tests::config::Missing"));
    }

    #[test]
    fn test_default_strategy_follows_own_registrations() {
        let catalog = catalog();
        register(&catalog, "Owner", TestNode::json().register(TypeRegistration::of::<Coupon>()));
        register(&catalog, "Composite", TestNode::json().depends_on("Owner"));
        let registry = registry(catalog);

        let owner = registry.resolve(&id("Owner")).unwrap();
        let composite = registry.resolve(&id("Composite")).unwrap();

        assert_eq!(owner.unregistered_type_strategy(), UnregisteredTypeEncounteredStrategy::Throw);
        assert_eq!(
            composite.unregistered_type_strategy(),
            UnregisteredTypeEncounteredStrategy::Attempt
        );

        let err = owner.check_registered(&Order::shape()).unwrap_err();
        assert!(matches!(err, RegistryError::UnregisteredType { .. }));
        assert!(err.to_string().contains("tests::sales::Order"));
        assert!(composite.check_registered(&Order::shape()).is_ok());
        assert!(owner.check_registered(&Vec::<Coupon>::shape()).is_ok());
        assert!(owner.check_registered(&Option::<Order>::shape()).is_err());
    }

    #[test]
    fn test_canned_wrappers_inherit_and_override() {
        let catalog = catalog();
        register(&catalog, "Owner", TestNode::json().register(TypeRegistration::of::<Coupon>()));
        let registry = registry(catalog);

        let pretty = canned::formatting_override(id("Owner"), JsonFormattingKind::Concise);
        let lenient = canned::attempt_on_unregistered(SerializationKind::Json, pretty.clone());

        let pretty = registry.resolve(&pretty).unwrap();
        assert_eq!(pretty.format_options().json_formatting, JsonFormattingKind::Concise);
        assert_eq!(pretty.unregistered_type_strategy(), UnregisteredTypeEncounteredStrategy::Throw);

        let lenient = registry.resolve(&lenient).unwrap();
        assert_eq!(lenient.format_options().json_formatting, JsonFormattingKind::Concise);
        assert_eq!(
            lenient.unregistered_type_strategy(),
            UnregisteredTypeEncounteredStrategy::Attempt
        );
        assert!(lenient.is_registered(&Coupon::shape()));
    }

    #[test]
    fn test_types_to_register_resolves_through_the_type_catalog() {
        let registry = registry(catalog());
        let id = canned::types_to_register(
            SerializationKind::PropertyBag,
            [Customer::shape().representation().clone()],
        );

        let resolved = registry.resolve(&id).unwrap();
        assert_eq!(resolved.kind(), SerializationKind::PropertyBag);
        assert!(resolved.is_registered(&Address::shape()));
        assert_eq!(
            resolved.unregistered_type_strategy(),
            UnregisteredTypeEncounteredStrategy::Throw
        );

        let null = registry.resolve(&canned::null(SerializationKind::PropertyBag)).unwrap();
        assert!(null.registry().is_empty());
        assert!(null.check_registered(&Order::shape()).is_ok());
    }

    #[test]
    fn test_resolve_by_representation_uses_strategies() {
        let catalog = catalog();
        register(&catalog, "Orders", TestNode::json());
        catalog.register_with(TypeRepresentation::new("legacy", "Orders").into(), || {
            Box::new(TestNode::json()) as Box<dyn ConfigurationNode>
        });
        let registry = registry(catalog);
        let loose = TypeRepresentation::new("", "Orders");

        let err = registry
            .resolve_representation(
                &loose,
                TypeMatchStrategy::NameOnly,
                MultiplicityStrategy::ThrowOnMultiple,
            )
            .unwrap_err();
        assert_eq!(err.variant(), "AmbiguousMatch");

        let resolved = registry
            .resolve_representation(
                &loose,
                TypeMatchStrategy::NameOnly,
                MultiplicityStrategy::FirstMatch,
            )
            .unwrap();
        assert_eq!(resolved.id(), &id("Orders"));
    }

    #[test]
    fn test_registered_configurations_shadow_canned_names() {
        let catalog = catalog();
        register(
            &catalog,
            "DependencyOnlyJsonSerializationConfiguration",
            TestNode::json().register(TypeRegistration::of::<Order>()),
        );
        let loose = TypeRepresentation::new("", "DependencyOnlyJsonSerializationConfiguration");

        let own = catalog
            .resolve_id(&loose, TypeMatchStrategy::NameOnly, MultiplicityStrategy::ThrowOnMultiple)
            .unwrap();
        assert_eq!(own, id("DependencyOnlyJsonSerializationConfiguration"));

        let canned_null = canned::null(SerializationKind::Document);
        let by_name = TypeRepresentation::new("", canned_null.representation().name.clone());
        let resolved = catalog
            .resolve_id(&by_name, TypeMatchStrategy::NameOnly, MultiplicityStrategy::FirstMatch)
            .unwrap();
        assert_eq!(resolved, canned_null);

        let exact = canned::dependency_only(SerializationKind::Json, Vec::new());
        let resolved = catalog
            .resolve_id(
                exact.representation(),
                TypeMatchStrategy::NameOnly,
                MultiplicityStrategy::ThrowOnMultiple,
            )
            .unwrap();
        assert_eq!(resolved, exact);
    }

    #[test]
    fn test_concurrent_resolution_yields_one_instance() {
        let catalog = catalog();
        let counter = Arc::new(AtomicUsize::new(0));
        register_counted(
            &catalog,
            "Hot",
            TestNode::json().register(TypeRegistration::of::<Order>()),
            &counter,
        );
        let registry = Arc::new(registry(catalog));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.resolve(&id("Hot")).unwrap())
            })
            .collect();
        let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(resolved.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }
}
