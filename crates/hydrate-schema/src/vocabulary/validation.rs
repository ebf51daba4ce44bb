//! Validation vocabulary: the assertion keywords. The node model stores
//! them without executing them — validating instances against a schema is
//! a different system's job.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::keyword::{ConstKeyword, TypeKeyword};
use crate::node::Schema;

#[derive(Default, Clone)]
pub(crate) struct ValidationVocabulary {
    pub(crate) multiple_of: Option<Number>,
    pub(crate) maximum: Option<Number>,
    pub(crate) exclusive_maximum: Option<Number>,
    pub(crate) minimum: Option<Number>,
    pub(crate) exclusive_minimum: Option<Number>,
    pub(crate) max_length: Option<u64>,
    pub(crate) min_length: Option<u64>,
    pub(crate) pattern: Option<String>,
    pub(crate) min_items: Option<u64>,
    pub(crate) max_items: Option<u64>,
    pub(crate) unique_items: Option<bool>,
    pub(crate) max_contains: Option<u64>,
    pub(crate) min_contains: Option<u64>,
    pub(crate) max_properties: Option<u64>,
    pub(crate) min_properties: Option<u64>,
    pub(crate) required: Option<Vec<String>>,
    pub(crate) dependent_required: Option<IndexMap<String, Vec<String>>>,
    pub(crate) konst: Option<ConstKeyword>,
    pub(crate) enum_values: Option<Vec<Value>>,
    pub(crate) schema_type: Option<TypeKeyword>,
}

impl ValidationVocabulary {
    pub(crate) fn emit(&self, out: &mut Map<String, Value>) {
        let mut put = |name: &str, value: Option<Value>| {
            if let Some(value) = value {
                out.insert(name.into(), value);
            }
        };

        put("multipleOf", self.multiple_of.clone().map(Value::Number));
        put("maximum", self.maximum.clone().map(Value::Number));
        put(
            "exclusiveMaximum",
            self.exclusive_maximum.clone().map(Value::Number),
        );
        put("minimum", self.minimum.clone().map(Value::Number));
        put(
            "exclusiveMinimum",
            self.exclusive_minimum.clone().map(Value::Number),
        );
        put("maxLength", self.max_length.map(Value::from));
        put("minLength", self.min_length.map(Value::from));
        put("pattern", self.pattern.clone().map(Value::String));
        put("minItems", self.min_items.map(Value::from));
        put("maxItems", self.max_items.map(Value::from));
        put("uniqueItems", self.unique_items.map(Value::Bool));
        put("maxContains", self.max_contains.map(Value::from));
        put("minContains", self.min_contains.map(Value::from));
        put("maxProperties", self.max_properties.map(Value::from));
        put("minProperties", self.min_properties.map(Value::from));
        put(
            "required",
            self.required.as_ref().map(|required| {
                Value::Array(required.iter().cloned().map(Value::String).collect())
            }),
        );
        put(
            "dependentRequired",
            self.dependent_required.as_ref().map(|dependent| {
                Value::Object(
                    dependent
                        .iter()
                        .map(|(name, needs)| {
                            (
                                name.clone(),
                                Value::Array(needs.iter().cloned().map(Value::String).collect()),
                            )
                        })
                        .collect(),
                )
            }),
        );
        put("const", self.konst.as_ref().map(ConstKeyword::to_value));
        put(
            "enum",
            self.enum_values.as_ref().map(|values| Value::Array(values.clone())),
        );
        put("type", self.schema_type.as_ref().map(TypeKeyword::to_value));
    }
}

impl Schema {
    pub fn multiple_of(&self) -> Option<Number> {
        self.resolved()
            .and_then(|node| node.inner().validation.multiple_of.clone())
    }

    pub fn has_multiple_of(&self) -> bool {
        self.multiple_of().is_some()
    }

    pub fn maximum(&self) -> Option<Number> {
        self.resolved()
            .and_then(|node| node.inner().validation.maximum.clone())
    }

    pub fn has_maximum(&self) -> bool {
        self.maximum().is_some()
    }

    pub fn exclusive_maximum(&self) -> Option<Number> {
        self.resolved()
            .and_then(|node| node.inner().validation.exclusive_maximum.clone())
    }

    pub fn has_exclusive_maximum(&self) -> bool {
        self.exclusive_maximum().is_some()
    }

    pub fn minimum(&self) -> Option<Number> {
        self.resolved()
            .and_then(|node| node.inner().validation.minimum.clone())
    }

    pub fn has_minimum(&self) -> bool {
        self.minimum().is_some()
    }

    pub fn exclusive_minimum(&self) -> Option<Number> {
        self.resolved()
            .and_then(|node| node.inner().validation.exclusive_minimum.clone())
    }

    pub fn has_exclusive_minimum(&self) -> bool {
        self.exclusive_minimum().is_some()
    }

    pub fn max_length(&self) -> Option<u64> {
        self.resolved().and_then(|node| node.inner().validation.max_length)
    }

    pub fn has_max_length(&self) -> bool {
        self.max_length().is_some()
    }

    pub fn min_length(&self) -> Option<u64> {
        self.resolved().and_then(|node| node.inner().validation.min_length)
    }

    pub fn has_min_length(&self) -> bool {
        self.min_length().is_some()
    }

    pub fn pattern(&self) -> Option<String> {
        self.resolved()
            .and_then(|node| node.inner().validation.pattern.clone())
    }

    pub fn has_pattern(&self) -> bool {
        self.pattern().is_some()
    }

    pub fn min_items(&self) -> Option<u64> {
        self.resolved().and_then(|node| node.inner().validation.min_items)
    }

    pub fn has_min_items(&self) -> bool {
        self.min_items().is_some()
    }

    pub fn max_items(&self) -> Option<u64> {
        self.resolved().and_then(|node| node.inner().validation.max_items)
    }

    pub fn has_max_items(&self) -> bool {
        self.max_items().is_some()
    }

    pub fn unique_items(&self) -> Option<bool> {
        self.resolved().and_then(|node| node.inner().validation.unique_items)
    }

    pub fn has_unique_items(&self) -> bool {
        self.unique_items().is_some()
    }

    pub fn max_contains(&self) -> Option<u64> {
        self.resolved().and_then(|node| node.inner().validation.max_contains)
    }

    pub fn has_max_contains(&self) -> bool {
        self.max_contains().is_some()
    }

    pub fn min_contains(&self) -> Option<u64> {
        self.resolved().and_then(|node| node.inner().validation.min_contains)
    }

    pub fn has_min_contains(&self) -> bool {
        self.min_contains().is_some()
    }

    pub fn max_properties(&self) -> Option<u64> {
        self.resolved()
            .and_then(|node| node.inner().validation.max_properties)
    }

    pub fn has_max_properties(&self) -> bool {
        self.max_properties().is_some()
    }

    pub fn min_properties(&self) -> Option<u64> {
        self.resolved()
            .and_then(|node| node.inner().validation.min_properties)
    }

    pub fn has_min_properties(&self) -> bool {
        self.min_properties().is_some()
    }

    pub fn required(&self) -> Option<Vec<String>> {
        self.resolved()
            .and_then(|node| node.inner().validation.required.clone())
    }

    pub fn has_required(&self) -> bool {
        self.required().is_some()
    }

    pub fn dependent_required(&self) -> Option<IndexMap<String, Vec<String>>> {
        self.resolved()
            .and_then(|node| node.inner().validation.dependent_required.clone())
    }

    pub fn has_dependent_required(&self) -> bool {
        self.dependent_required().is_some()
    }

    /// The `const` value. An explicit `const: null` reads as
    /// `Some(Value::Null)`, distinct from the keyword being absent.
    pub fn const_value(&self) -> Option<Value> {
        self.resolved()
            .and_then(|node| node.inner().validation.konst.as_ref().map(ConstKeyword::to_value))
    }

    pub fn has_const(&self) -> bool {
        self.resolved()
            .map(|node| node.inner().validation.konst.is_some())
            .unwrap_or(false)
    }

    pub fn enum_values(&self) -> Option<Vec<Value>> {
        self.resolved()
            .and_then(|node| node.inner().validation.enum_values.clone())
    }

    pub fn has_enum(&self) -> bool {
        self.enum_values().is_some()
    }

    pub fn schema_type(&self) -> Option<TypeKeyword> {
        self.resolved()
            .and_then(|node| node.inner().validation.schema_type.clone())
    }

    pub fn has_type(&self) -> bool {
        self.schema_type().is_some()
    }
}
