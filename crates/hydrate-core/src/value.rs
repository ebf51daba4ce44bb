//! # Slot Values — Loosely-Typed Data in Flight
//!
//! A [`Slot`] is the value occupying one constructor-parameter slot while
//! resolution is in progress. It starts life as raw decoded data
//! (`serde_json::Value`), may be coerced into an ordered [`Slot::Record`]
//! for recursive construction, and ends up as a constructed [`Instance`]
//! (or a list/map of them) once a candidate type succeeds.
//!
//! Instances are `Rc<dyn Any>`: the engine is single-threaded by design
//! and must pass opaque domain objects through maps that also hold raw
//! data, so slots stay cheaply cloneable across candidate attempts.

use std::any::Any;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

/// A constructed domain object, opaque to the engine.
pub type Instance = Rc<dyn Any>;

/// Ordered map of parameter name to slot value.
pub type ParamMap = IndexMap<String, Slot>;

/// A value bound to a constructor parameter during resolution.
#[derive(Clone)]
pub enum Slot {
    /// Raw decoded data: scalar, list or object.
    Value(Value),
    /// An ordered string-keyed record, ready for recursive construction.
    Record(ParamMap),
    /// A list whose elements may mix raw data and built instances.
    List(Vec<Slot>),
    /// A constructed composite.
    Instance(Instance),
}

impl Slot {
    /// Null slot, used for absent parameters.
    pub fn null() -> Self {
        Slot::Value(Value::Null)
    }

    /// True for a raw JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Slot::Value(Value::Null))
    }

    /// True when the slot is map-shaped: a coerced record or a raw object.
    pub fn is_map(&self) -> bool {
        matches!(self, Slot::Record(_) | Slot::Value(Value::Object(_)))
    }

    /// Coerce a map-shaped slot into an ordered record.
    ///
    /// Raw objects convert entry-by-entry, preserving their decoded
    /// order; records pass through. Returns `None` for any other shape.
    pub fn into_record(self) -> Option<ParamMap> {
        match self {
            Slot::Record(record) => Some(record),
            Slot::Value(Value::Object(map)) => Some(record_from_object(map)),
            _ => None,
        }
    }

    /// Short, human-readable description of the slot's shape, for errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Slot::Value(Value::Null) => "null",
            Slot::Value(Value::Bool(_)) => "a boolean",
            Slot::Value(Value::Number(_)) => "a number",
            Slot::Value(Value::String(_)) => "a string",
            Slot::Value(Value::Array(_)) => "a list",
            Slot::Value(Value::Object(_)) => "a map",
            Slot::Record(_) => "a map",
            Slot::List(_) => "a list",
            Slot::Instance(_) => "an instance",
        }
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Slot::Record(record) => f.debug_tuple("Record").field(&record.keys().collect::<Vec<_>>()).finish(),
            Slot::List(items) => f.debug_tuple("List").field(&items.len()).finish(),
            Slot::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        Slot::Value(value)
    }
}

/// Convert a decoded JSON object into an ordered slot record.
pub fn record_from_object(map: serde_json::Map<String, Value>) -> ParamMap {
    map.into_iter()
        .map(|(key, value)| (key, Slot::Value(value)))
        .collect()
}
