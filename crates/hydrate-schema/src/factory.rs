//! # Schema Factory — Composition Root
//!
//! Wires the construction engine, the schema metadata provider, and the
//! build rules into one pipeline, and exposes the decoded-data entry
//! point: a boolean becomes a boolean-schema node, a map runs through the
//! full resolution pipeline, anything else is a usage error.

use serde_json::Value;
use tracing::trace;

use hydrate_core::{record_from_object, Constructor, EventBus};

use crate::error::SchemaError;
use crate::node::Schema;
use crate::registry::{SchemaMetadataProvider, SCHEMA_TYPE};
use crate::rules;

/// Builds [`Schema`] trees from decoded JSON values.
pub struct SchemaFactory {
    constructor: Constructor,
}

impl SchemaFactory {
    pub fn new() -> Self {
        let mut bus = EventBus::new();
        rules::register(&mut bus);
        SchemaFactory {
            constructor: Constructor::new(Box::new(SchemaMetadataProvider), bus),
        }
    }

    /// Materialize a schema document from a decoded value.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Usage`] when the value is neither a boolean nor a
    /// map; [`SchemaError::Construct`] when some keyword value cannot be
    /// resolved.
    pub fn create_from_primitives(&self, primitives: &Value) -> Result<Schema, SchemaError> {
        match primitives {
            Value::Bool(value) => Ok(Schema::boolean(*value)),
            Value::Object(map) if map.is_empty() => Ok(Schema::default()),
            Value::Object(map) => {
                trace!(keywords = map.len(), "building schema document");
                let params = record_from_object(map.clone());
                let instance = self.constructor.construct(SCHEMA_TYPE, params)?;
                let node = instance.downcast::<Schema>().map_err(|_| {
                    SchemaError::Usage("construction produced a foreign instance".into())
                })?;
                Ok((*node).clone())
            }
            other => Err(SchemaError::Usage(format!(
                "a schema document must be a boolean or a map, got {}",
                kind_of(other)
            ))),
        }
    }
}

impl Default for SchemaFactory {
    fn default() -> Self {
        SchemaFactory::new()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

impl Schema {
    /// Build a schema document from a decoded JSON value.
    pub fn from_value(value: &Value) -> Result<Schema, SchemaError> {
        SchemaFactory::new().create_from_primitives(value)
    }

    /// Parse schema text and build the document it describes.
    pub fn from_json(text: &str) -> Result<Schema, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Schema::from_value(&value)
    }
}

impl<'de> serde::Deserialize<'de> for Schema {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Schema, D::Error> {
        let value = <Value as serde::Deserialize>::deserialize(deserializer)?;
        Schema::from_value(&value).map_err(serde::de::Error::custom)
    }
}
