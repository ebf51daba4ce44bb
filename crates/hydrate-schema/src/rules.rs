//! # Build Rules — Teaching the Engine JSON Schema
//!
//! The construction engine is domain-blind; these event subscribers are
//! what make it produce correct schema trees. They are registered once
//! per factory, in a fixed order, and communicate exclusively through the
//! event mailboxes — the engine never learns what a schema is.

use std::rc::Rc;

use serde_json::Value;

use hydrate_core::{record_from_object, Container, EventBus, ParamMap, Slot, TypeRef};

use crate::keyword::{normalize_keyword, ConstNull};
use crate::node::Schema;
use crate::registry::SCHEMA_TYPE;

/// Register the schema build rules on a bus, in evaluation order.
pub(crate) fn register(bus: &mut EventBus) {
    // An explicit `const: null` would be indistinguishable from an absent
    // keyword after the defaults merge; swap in the sentinel up front.
    bus.on_before_params(|_, event| {
        let explicit_null = matches!(event.params().get("const"), Some(slot) if slot.is_null());
        if explicit_null {
            let mut params = event.params().clone();
            params.insert("const".into(), Slot::Instance(Rc::new(ConstNull)));
            event.set_params(params);
        }
        Ok(())
    });

    // `$`-prefixed keywords carry names no parameter can bear; rewrite
    // them to the normalized form the descriptor declares.
    bus.on_before_params(|_, event| {
        let has_prefixed = event.params().keys().any(|key| key.starts_with('$'));
        if has_prefixed {
            let params: ParamMap = event
                .params()
                .clone()
                .into_iter()
                .map(|(key, value)| (normalize_keyword(&key), value))
                .collect();
            event.set_params(params);
        }
        Ok(())
    });

    // Raw objects become ordered records before they are matched against
    // parameter types.
    bus.on_before_param(|_, event| {
        let coerced = coerce_object(event.value());
        if let Some(record) = coerced {
            event.set_value(Slot::Record(record));
        }
        Ok(())
    });

    // A parameter accepting both one schema and a list of schemas (only
    // `items`) is ambiguous for map-shaped values: a map is one schema
    // object, so it is constructed as such before the candidate loop
    // could misread it.
    bus.on_before_param(|constructor, event| {
        let ambiguous = event.metadata().accepts(SCHEMA_TYPE, Container::Scalar)
            && event.metadata().accepts(SCHEMA_TYPE, Container::List);
        if !ambiguous {
            return Ok(());
        }

        let record = event.value().clone().into_record();
        if let Some(record) = record {
            let instance = constructor.construct(SCHEMA_TYPE, record)?;
            event.set_value(Slot::Instance(instance));
        }
        Ok(())
    });

    // A bare boolean where a schema is expected is the boolean schema.
    // Keyed off the original raw value, so earlier rewrites cannot mask it.
    bus.on_before_value(|_, event| {
        let for_schema = matches!(
            &event.candidate().target,
            TypeRef::Composite(name) if name == SCHEMA_TYPE
        );
        let boolean = match event.original_value() {
            Slot::Value(Value::Bool(value)) => Some(*value),
            _ => None,
        };

        if let (true, Some(value)) = (for_schema, boolean) {
            event.set_value(Slot::Instance(Rc::new(Schema::boolean(value))));
        }
        Ok(())
    });

    // Record coercion again at candidate level: list and map elements
    // reach the engine as raw objects.
    bus.on_before_value(|_, event| {
        let coerced = coerce_object(event.value());
        if let Some(record) = coerced {
            event.set_value(Slot::Record(record));
        }
        Ok(())
    });
}

fn coerce_object(slot: &Slot) -> Option<ParamMap> {
    match slot {
        Slot::Value(Value::Object(map)) => Some(record_from_object(map.clone())),
        _ => None,
    }
}
