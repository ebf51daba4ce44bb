//! End-to-end engine tests over a small hand-written type registry:
//! a person/address graph with nested composites, lists, defaults,
//! nullability, and every event hook.

use std::rc::Rc;

use indexmap::indexmap;
use serde_json::{json, Value};

use hydrate_core::{
    Arguments, CandidateType, ConstructError, Constructor, EventBus, Instance, ParamMap,
    ParameterMetadata, Slot, TypeDescriptor, TypeMetadataProvider,
};

#[derive(Debug, PartialEq)]
struct Address {
    street: String,
    city: String,
}

#[derive(Debug)]
struct Person {
    name: String,
    age: Option<u64>,
    address: Option<Rc<Address>>,
    friends: Vec<Rc<Person>>,
}

/// A type with one composite-first and one primitive-first parameter,
/// exercising strict candidate-order priority.
#[derive(Debug)]
struct Pin {
    location: Option<Rc<Address>>,
    label: Option<Value>,
}

fn build_address(mut args: Arguments) -> Result<Instance, ConstructError> {
    let street = args.opt_string("street")?.ok_or(ConstructError::Validation {
        parameter: "street".into(),
        message: "is required".into(),
    })?;
    let city = args.opt_string("city")?.ok_or(ConstructError::Validation {
        parameter: "city".into(),
        message: "is required".into(),
    })?;
    Ok(Rc::new(Address { street, city }))
}

fn build_person(mut args: Arguments) -> Result<Instance, ConstructError> {
    let name = args.opt_string("name")?.ok_or(ConstructError::Validation {
        parameter: "name".into(),
        message: "is required".into(),
    })?;
    let age = args.opt_u64("age")?;
    let address = args.opt_instance::<Address>("address")?;
    let friends = args.opt_instance_vec::<Person>("friends")?.unwrap_or_default();
    Ok(Rc::new(Person {
        name,
        age,
        address,
        friends,
    }))
}

fn build_pin(mut args: Arguments) -> Result<Instance, ConstructError> {
    let location = args.opt_instance::<Address>("location")?;
    let label = args.opt_value("label")?;
    Ok(Rc::new(Pin { location, label }))
}

struct TestProvider;

impl TypeMetadataProvider for TestProvider {
    fn describe(&self, type_name: &str) -> Option<Rc<TypeDescriptor>> {
        let descriptor = match type_name {
            "address" => TypeDescriptor::new(
                "address",
                vec![
                    ParameterMetadata::new("street", vec![CandidateType::primitive()]),
                    ParameterMetadata::new("city", vec![CandidateType::primitive()])
                        .with_default(json!("Springfield")),
                ],
                build_address,
                |instance| instance.is::<Address>(),
            ),
            "person" => TypeDescriptor::new(
                "person",
                vec![
                    ParameterMetadata::new("name", vec![CandidateType::primitive()]),
                    ParameterMetadata::new("age", vec![CandidateType::primitive()]).nullable(),
                    ParameterMetadata::new("address", vec![CandidateType::composite("address")])
                        .nullable(),
                    ParameterMetadata::new("friends", vec![CandidateType::list_of("person")])
                        .nullable(),
                ],
                build_person,
                |instance| instance.is::<Person>(),
            ),
            "pin" => TypeDescriptor::new(
                "pin",
                vec![
                    // Composite declared first: maps resolve as addresses.
                    ParameterMetadata::new(
                        "location",
                        vec![CandidateType::composite("address"), CandidateType::primitive()],
                    )
                    .nullable(),
                    // Primitive declared first: maps stay raw.
                    ParameterMetadata::new(
                        "label",
                        vec![CandidateType::primitive(), CandidateType::composite("address")],
                    )
                    .nullable(),
                ],
                build_pin,
                |instance| instance.is::<Pin>(),
            ),
            _ => return None,
        };
        Some(Rc::new(descriptor))
    }
}

fn constructor() -> Constructor {
    Constructor::new(Box::new(TestProvider), EventBus::new())
}

fn params(value: Value) -> ParamMap {
    match value {
        Value::Object(map) => hydrate_core::record_from_object(map),
        _ => panic!("test params must be an object"),
    }
}

fn person(instance: Instance) -> Rc<Person> {
    instance
        .downcast::<Person>()
        .unwrap_or_else(|_| panic!("expected a person"))
}

#[test]
fn test_constructs_nested_composites() {
    let instance = constructor()
        .construct(
            "person",
            params(json!({
                "name": "Ada",
                "age": 36,
                "address": {"street": "Main St 7", "city": "London"}
            })),
        )
        .unwrap();

    let ada = person(instance);
    assert_eq!(ada.name, "Ada");
    assert_eq!(ada.age, Some(36));
    assert_eq!(ada.address.as_ref().unwrap().city, "London");
}

#[test]
fn test_defaults_fill_absent_parameters() {
    let instance = constructor()
        .construct(
            "person",
            params(json!({"name": "Ada", "address": {"street": "Main St 7"}})),
        )
        .unwrap();

    let ada = person(instance);
    assert_eq!(ada.address.as_ref().unwrap().city, "Springfield");
}

#[test]
fn test_nullable_composite_resolves_to_none() {
    let instance = constructor()
        .construct("person", params(json!({"name": "Ada", "address": null})))
        .unwrap();
    assert!(person(instance).address.is_none());
}

#[test]
fn test_list_parameter_constructs_each_element() {
    let instance = constructor()
        .construct(
            "person",
            params(json!({
                "name": "Ada",
                "friends": [
                    {"name": "Grace", "address": {"street": "Elm 1"}},
                    {"name": "Edsger"}
                ]
            })),
        )
        .unwrap();

    let ada = person(instance);
    assert_eq!(ada.friends.len(), 2);
    assert_eq!(ada.friends[0].name, "Grace");
    assert_eq!(ada.friends[1].name, "Edsger");
}

#[test]
fn test_non_list_value_for_list_parameter_fails() {
    let err = constructor()
        .construct("person", params(json!({"name": "Ada", "friends": "Grace"})))
        .unwrap_err();

    match err {
        ConstructError::Instantiation(inner) => {
            assert_eq!(inner.parameter(), "friends");
            assert_eq!(inner.attempts().len(), 1);
        }
        other => panic!("expected an instantiation error, got {other}"),
    }
}

#[test]
fn test_nested_failure_reports_parameter_trail() {
    // The inner address is malformed: street must be a string.
    let err = constructor()
        .construct(
            "person",
            params(json!({
                "name": "Ada",
                "friends": [{"name": "Grace", "address": {"street": 5}}]
            })),
        )
        .unwrap_err();

    match err {
        ConstructError::Instantiation(inner) => {
            assert_eq!(inner.path(), "friends.address");
        }
        other => panic!("expected an instantiation error, got {other}"),
    }
}

#[test]
fn test_prebuilt_instances_pass_through_untouched() {
    let address = Rc::new(Address {
        street: "Kept".into(),
        city: "AsIs".into(),
    });
    let mut raw = params(json!({"name": "Ada"}));
    raw.insert("address".into(), Slot::Instance(address.clone()));

    let instance = constructor().construct("person", raw).unwrap();
    let ada = person(instance);
    assert!(Rc::ptr_eq(ada.address.as_ref().unwrap(), &address));
}

#[test]
fn test_candidate_declaration_order_is_strict_priority() {
    let shape = json!({"street": "Pin Alley", "city": "Dot"});
    let instance = constructor()
        .construct(
            "pin",
            params(json!({"location": shape.clone(), "label": shape})),
        )
        .unwrap();

    let pin = instance
        .downcast::<Pin>()
        .unwrap_or_else(|_| panic!("expected a pin"));
    // Composite-first parameter constructed the map into an address...
    assert_eq!(pin.location.as_ref().unwrap().street, "Pin Alley");
    // ...while the primitive-first parameter kept the identical map raw.
    assert_eq!(pin.label.as_ref().unwrap()["city"], json!("Dot"));
}

#[test]
fn test_unknown_type_is_reported() {
    let err = constructor()
        .construct("martian", ParamMap::new())
        .unwrap_err();
    assert!(matches!(err, ConstructError::UnknownType(name) if name == "martian"));
}

#[test]
fn test_unknown_raw_keys_are_dropped() {
    let instance = constructor()
        .construct("person", params(json!({"name": "Ada", "shoeSize": 36})))
        .unwrap();
    assert_eq!(person(instance).name, "Ada");
}

// ---- event pipeline ----

#[test]
fn test_before_params_can_short_circuit_with_an_instance() {
    let mut bus = EventBus::new();
    bus.on_before_params(|_, event| {
        event.set_instance(Rc::new(Person {
            name: "Injected".into(),
            age: None,
            address: None,
            friends: vec![],
        }));
        Ok(())
    });

    let constructor = Constructor::new(Box::new(TestProvider), bus);
    let instance = constructor.construct("person", ParamMap::new()).unwrap();
    assert_eq!(person(instance).name, "Injected");
}

#[test]
fn test_before_params_can_rewrite_the_map() {
    let mut bus = EventBus::new();
    bus.on_before_params(|_, event| {
        let mut rewritten = event.params().clone();
        rewritten.insert("name".into(), Slot::Value(json!("Renamed")));
        event.set_params(rewritten);
        Ok(())
    });

    let constructor = Constructor::new(Box::new(TestProvider), bus);
    let instance = constructor
        .construct("person", params(json!({"name": "Ada"})))
        .unwrap();
    assert_eq!(person(instance).name, "Renamed");
}

#[test]
fn test_before_param_can_replace_a_value() {
    let mut bus = EventBus::new();
    bus.on_before_param(|_, event| {
        if event.metadata().name() == "address" && event.value().is_null() {
            event.set_value(Slot::Value(json!({"street": "Fallback 1"})));
        }
        Ok(())
    });

    let constructor = Constructor::new(Box::new(TestProvider), bus);
    let instance = constructor
        .construct("person", params(json!({"name": "Ada"})))
        .unwrap();
    assert_eq!(
        person(instance).address.as_ref().unwrap().street,
        "Fallback 1"
    );
}

#[test]
fn test_before_value_sees_the_original_after_replacement() {
    let mut bus = EventBus::new();
    bus.on_before_value(|_, event| {
        event.set_value(Slot::Value(json!({"street": "Replaced"})));
        Ok(())
    });
    bus.on_before_value(|_, event| {
        // A later handler still observes the raw data.
        assert!(matches!(event.original_value(), Slot::Value(Value::Object(_))));
        Ok(())
    });

    let constructor = Constructor::new(Box::new(TestProvider), bus);
    let instance = constructor
        .construct(
            "person",
            params(json!({"name": "Ada", "address": {"street": "Original"}})),
        )
        .unwrap();
    assert_eq!(
        person(instance).address.as_ref().unwrap().street,
        "Replaced"
    );
}

#[test]
fn test_after_params_can_supply_the_final_instance() {
    let mut bus = EventBus::new();
    bus.on_after_params(|_, event| {
        event.set_instance(Rc::new(Person {
            name: "Final".into(),
            age: None,
            address: None,
            friends: vec![],
        }));
        Ok(())
    });

    let constructor = Constructor::new(Box::new(TestProvider), bus);
    let instance = constructor
        .construct("person", params(json!({"name": "Ada"})))
        .unwrap();
    assert_eq!(person(instance).name, "Final");
}

#[test]
fn test_handlers_run_in_subscription_order() {
    let mut bus = EventBus::new();
    bus.on_before_params(|_, event| {
        let mut rewritten = event.params().clone();
        rewritten.insert("name".into(), Slot::Value(json!("first")));
        event.set_params(rewritten);
        Ok(())
    });
    bus.on_before_params(|_, event| {
        let mut rewritten = event.params().clone();
        rewritten.insert("name".into(), Slot::Value(json!("second")));
        event.set_params(rewritten);
        Ok(())
    });

    let constructor = Constructor::new(Box::new(TestProvider), bus);
    let instance = constructor.construct("person", ParamMap::new()).unwrap();
    assert_eq!(person(instance).name, "second");
}

#[test]
fn test_handler_failure_aborts_resolution() {
    let mut bus = EventBus::new();
    bus.on_before_params(|_, _| {
        Err(ConstructError::Validation {
            parameter: "name".into(),
            message: "vetoed".into(),
        })
    });

    let constructor = Constructor::new(Box::new(TestProvider), bus);
    let err = constructor
        .construct("person", params(json!({"name": "Ada"})))
        .unwrap_err();
    assert!(err.to_string().contains("vetoed"));
}

#[test]
fn test_handlers_can_construct_through_the_engine() {
    let mut bus = EventBus::new();
    bus.on_before_param(|constructor, event| {
        if event.metadata().name() == "address" {
            if let Slot::Value(Value::String(city)) = event.value() {
                let built = constructor.construct(
                    "address",
                    indexmap! {
                        "street".into() => Slot::Value(json!("Unnamed")),
                        "city".into() => Slot::Value(json!(city)),
                    },
                )?;
                event.set_value(Slot::Instance(built));
            }
        }
        Ok(())
    });

    let constructor = Constructor::new(Box::new(TestProvider), bus);
    let instance = constructor
        .construct("person", params(json!({"name": "Ada", "address": "Paris"})))
        .unwrap();
    assert_eq!(person(instance).address.as_ref().unwrap().city, "Paris");
}
