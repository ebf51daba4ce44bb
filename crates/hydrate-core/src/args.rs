//! # Merged Arguments — Typed Extraction at the Construction Boundary
//!
//! After resolution, the engine merges defaults, raw values and resolved
//! composites into one declaration-ordered [`Arguments`] map and hands it
//! to the type's `invoke` function. The extractors here are where loose
//! data becomes typed: each one rejects a wrong shape eagerly with a
//! [`ConstructError::Validation`] naming the offending parameter, instead
//! of letting a malformed value settle into a built instance.

use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::ConstructError;
use crate::value::{ParamMap, Slot};

/// The merged argument map for one `invoke` call.
pub struct Arguments {
    params: ParamMap,
}

impl Arguments {
    pub fn new(params: ParamMap) -> Self {
        Arguments { params }
    }

    /// Remove and return the named slot; absent parameters read as null.
    pub fn take(&mut self, name: &str) -> Slot {
        self.params.shift_remove(name).unwrap_or_else(Slot::null)
    }

    /// An optional free-form JSON value.
    pub fn opt_value(&mut self, name: &str) -> Result<Option<Value>, ConstructError> {
        match self.take(name) {
            Slot::Value(Value::Null) => Ok(None),
            Slot::Value(value) => Ok(Some(value)),
            other => Err(invalid(name, "a JSON value", &other)),
        }
    }

    /// An optional string.
    pub fn opt_string(&mut self, name: &str) -> Result<Option<String>, ConstructError> {
        match self.opt_value(name)? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(invalid(name, "a string", &Slot::Value(other))),
        }
    }

    /// An optional boolean.
    pub fn opt_bool(&mut self, name: &str) -> Result<Option<bool>, ConstructError> {
        match self.opt_value(name)? {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(invalid(name, "a boolean", &Slot::Value(other))),
        }
    }

    /// An optional non-negative integer.
    pub fn opt_u64(&mut self, name: &str) -> Result<Option<u64>, ConstructError> {
        match self.opt_value(name)? {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
                ConstructError::Validation {
                    parameter: name.into(),
                    message: format!("must be a non-negative integer, got {n}"),
                }
            }),
            Some(other) => Err(invalid(name, "a non-negative integer", &Slot::Value(other))),
        }
    }

    /// An optional numeric value (integer or float).
    pub fn opt_number(&mut self, name: &str) -> Result<Option<Number>, ConstructError> {
        match self.opt_value(name)? {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(n)),
            Some(other) => Err(invalid(name, "a number", &Slot::Value(other))),
        }
    }

    /// An optional list of arbitrary JSON values.
    pub fn opt_value_vec(&mut self, name: &str) -> Result<Option<Vec<Value>>, ConstructError> {
        match self.opt_value(name)? {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(invalid(name, "a list", &Slot::Value(other))),
        }
    }

    /// An optional list of strings; every element must be a string.
    pub fn opt_string_vec(&mut self, name: &str) -> Result<Option<Vec<String>>, ConstructError> {
        match self.opt_value_vec(name)? {
            None => Ok(None),
            Some(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(ConstructError::Validation {
                        parameter: name.into(),
                        message: format!("every element must be a string, got {other}"),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
        }
    }

    /// An optional string-keyed map of booleans.
    pub fn opt_bool_map(
        &mut self,
        name: &str,
    ) -> Result<Option<IndexMap<String, bool>>, ConstructError> {
        match self.opt_value(name)? {
            None => Ok(None),
            Some(Value::Object(map)) => map
                .into_iter()
                .map(|(key, value)| match value {
                    Value::Bool(b) => Ok((key, b)),
                    other => Err(ConstructError::Validation {
                        parameter: name.into(),
                        message: format!("entry \"{key}\" must be a boolean, got {other}"),
                    }),
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Some),
            Some(other) => Err(invalid(name, "a map of booleans", &Slot::Value(other))),
        }
    }

    /// An optional string-keyed map of string lists.
    pub fn opt_string_vec_map(
        &mut self,
        name: &str,
    ) -> Result<Option<IndexMap<String, Vec<String>>>, ConstructError> {
        match self.opt_value(name)? {
            None => Ok(None),
            Some(Value::Object(map)) => map
                .into_iter()
                .map(|(key, value)| {
                    let items = match value {
                        Value::Array(items) => items,
                        other => {
                            return Err(ConstructError::Validation {
                                parameter: name.into(),
                                message: format!(
                                    "entry \"{key}\" must be a list of strings, got {other}"
                                ),
                            })
                        }
                    };
                    let strings = items
                        .into_iter()
                        .map(|item| match item {
                            Value::String(s) => Ok(s),
                            other => Err(ConstructError::Validation {
                                parameter: name.into(),
                                message: format!(
                                    "entry \"{key}\" must list strings only, got {other}"
                                ),
                            }),
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok((key, strings))
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Some),
            Some(other) => Err(invalid(name, "a map of string lists", &Slot::Value(other))),
        }
    }

    /// An optional constructed instance of `T`.
    pub fn opt_instance<T: 'static>(
        &mut self,
        name: &str,
    ) -> Result<Option<Rc<T>>, ConstructError> {
        match self.take(name) {
            Slot::Value(Value::Null) => Ok(None),
            Slot::Instance(instance) => downcast(name, instance).map(Some),
            other => Err(invalid(name, "a constructed instance", &other)),
        }
    }

    /// An optional list of constructed instances of `T`.
    pub fn opt_instance_vec<T: 'static>(
        &mut self,
        name: &str,
    ) -> Result<Option<Vec<Rc<T>>>, ConstructError> {
        match self.take(name) {
            Slot::Value(Value::Null) => Ok(None),
            Slot::List(slots) => slots
                .into_iter()
                .map(|slot| match slot {
                    Slot::Instance(instance) => downcast(name, instance),
                    other => Err(invalid(name, "constructed instances", &other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            other => Err(invalid(name, "a list of constructed instances", &other)),
        }
    }

    /// An optional string-keyed map of constructed instances of `T`.
    pub fn opt_instance_map<T: 'static>(
        &mut self,
        name: &str,
    ) -> Result<Option<IndexMap<String, Rc<T>>>, ConstructError> {
        match self.take(name) {
            Slot::Value(Value::Null) => Ok(None),
            Slot::Record(record) => record
                .into_iter()
                .map(|(key, slot)| match slot {
                    Slot::Instance(instance) => downcast(name, instance).map(|rc| (key, rc)),
                    other => Err(invalid(name, "constructed instances", &other)),
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Some),
            other => Err(invalid(name, "a map of constructed instances", &other)),
        }
    }
}

impl From<Arguments> for ParamMap {
    fn from(args: Arguments) -> ParamMap {
        args.params
    }
}

fn invalid(name: &str, expected: &str, got: &Slot) -> ConstructError {
    ConstructError::Validation {
        parameter: name.into(),
        message: format!("expected {expected}, got {}", got.describe()),
    }
}

fn downcast<T: 'static>(name: &str, instance: Rc<dyn std::any::Any>) -> Result<Rc<T>, ConstructError> {
    instance.downcast::<T>().map_err(|_| ConstructError::Validation {
        parameter: name.into(),
        message: "constructed instance has an unexpected type".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;
    use serde_json::json;

    fn arguments(params: ParamMap) -> Arguments {
        Arguments::new(params)
    }

    #[test]
    fn test_absent_reads_as_none() {
        let mut args = arguments(ParamMap::new());
        assert_eq!(args.opt_string("title").unwrap(), None);
        assert_eq!(args.opt_u64("minLength").unwrap(), None);
    }

    #[test]
    fn test_string_extraction() {
        let mut args = arguments(indexmap! {"title".into() => Slot::Value(json!("People"))});
        assert_eq!(args.opt_string("title").unwrap().as_deref(), Some("People"));
    }

    #[test]
    fn test_wrong_shape_names_parameter() {
        let mut args = arguments(indexmap! {"pattern".into() => Slot::Value(json!(11))});
        let err = args.opt_string("pattern").unwrap_err();
        assert!(err.to_string().contains("\"pattern\""));
    }

    #[test]
    fn test_string_vec_rejects_non_strings() {
        let mut args = arguments(indexmap! {"required".into() => Slot::Value(json!(["a", 1]))});
        assert!(args.opt_string_vec("required").is_err());
    }

    #[test]
    fn test_string_vec_rejects_maps() {
        let mut args = arguments(indexmap! {"required".into() => Slot::Value(json!({"a": "b"}))});
        assert!(args.opt_string_vec("required").is_err());
    }

    #[test]
    fn test_u64_rejects_negative_and_float() {
        let mut args = arguments(indexmap! {"minItems".into() => Slot::Value(json!(-3))});
        assert!(args.opt_u64("minItems").is_err());
        let mut args = arguments(indexmap! {"minItems".into() => Slot::Value(json!(1.5))});
        assert!(args.opt_u64("minItems").is_err());
    }

    #[test]
    fn test_instance_roundtrip() {
        let mut args = arguments(indexmap! {"not".into() => Slot::Instance(Rc::new(42u32))});
        let instance = args.opt_instance::<u32>("not").unwrap().unwrap();
        assert_eq!(*instance, 42);
    }

    #[test]
    fn test_instance_wrong_type_rejected() {
        let mut args = arguments(indexmap! {"not".into() => Slot::Instance(Rc::new(42u32))});
        assert!(args.opt_instance::<String>("not").is_err());
    }

    #[test]
    fn test_instance_vec_and_map() {
        let mut args = arguments(indexmap! {
            "allOf".into() => Slot::List(vec![Slot::Instance(Rc::new(1u8)), Slot::Instance(Rc::new(2u8))]),
            "properties".into() => Slot::Record(indexmap! {"x".into() => Slot::Instance(Rc::new(9u8))}),
        });
        let list = args.opt_instance_vec::<u8>("allOf").unwrap().unwrap();
        assert_eq!(list.len(), 2);
        let map = args.opt_instance_map::<u8>("properties").unwrap().unwrap();
        assert_eq!(*map["x"], 9);
    }
}
