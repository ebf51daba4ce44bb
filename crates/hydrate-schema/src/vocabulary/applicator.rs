//! Applicator vocabulary: the keywords that apply subschemas to parts of
//! an instance. Every field here holds child nodes, so this group is
//! where most parent back-links originate.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::keyword::Items;
use crate::node::Schema;

#[derive(Default, Clone)]
pub(crate) struct ApplicatorVocabulary {
    pub(crate) additional_items: Option<Schema>,
    pub(crate) items: Option<Items>,
    pub(crate) contains: Option<Schema>,
    pub(crate) additional_properties: Option<Schema>,
    pub(crate) properties: Option<IndexMap<String, Schema>>,
    pub(crate) pattern_properties: Option<IndexMap<String, Schema>>,
    pub(crate) dependent_schemas: Option<IndexMap<String, Schema>>,
    pub(crate) property_names: Option<Schema>,
    pub(crate) if_schema: Option<Schema>,
    pub(crate) then_schema: Option<Schema>,
    pub(crate) else_schema: Option<Schema>,
    pub(crate) all_of: Option<Vec<Schema>>,
    pub(crate) any_of: Option<Vec<Schema>>,
    pub(crate) one_of: Option<Vec<Schema>>,
    pub(crate) not: Option<Schema>,
}

fn schema_map_value(map: &IndexMap<String, Schema>) -> Value {
    Value::Object(
        map.iter()
            .map(|(name, schema)| (name.clone(), schema.to_value()))
            .collect(),
    )
}

fn schema_list_value(list: &[Schema]) -> Value {
    Value::Array(list.iter().map(Schema::to_value).collect())
}

impl ApplicatorVocabulary {
    pub(crate) fn emit(&self, out: &mut Map<String, Value>) {
        let mut put = |name: &str, value: Option<Value>| {
            if let Some(value) = value {
                out.insert(name.into(), value);
            }
        };

        put(
            "additionalItems",
            self.additional_items.as_ref().map(Schema::to_value),
        );
        put(
            "items",
            self.items.as_ref().map(|items| match items {
                Items::Single(schema) => schema.to_value(),
                Items::Tuple(schemas) => schema_list_value(schemas),
            }),
        );
        put("contains", self.contains.as_ref().map(Schema::to_value));
        put(
            "additionalProperties",
            self.additional_properties.as_ref().map(Schema::to_value),
        );
        put("properties", self.properties.as_ref().map(schema_map_value));
        put(
            "patternProperties",
            self.pattern_properties.as_ref().map(schema_map_value),
        );
        put(
            "dependentSchemas",
            self.dependent_schemas.as_ref().map(schema_map_value),
        );
        put(
            "propertyNames",
            self.property_names.as_ref().map(Schema::to_value),
        );
        put("if", self.if_schema.as_ref().map(Schema::to_value));
        put("then", self.then_schema.as_ref().map(Schema::to_value));
        put("else", self.else_schema.as_ref().map(Schema::to_value));
        put("allOf", self.all_of.as_deref().map(schema_list_value));
        put("anyOf", self.any_of.as_deref().map(schema_list_value));
        put("oneOf", self.one_of.as_deref().map(schema_list_value));
        put("not", self.not.as_ref().map(Schema::to_value));
    }
}

impl Schema {
    pub fn additional_items(&self) -> Option<Schema> {
        self.resolved()
            .and_then(|node| node.inner().applicator.additional_items.clone())
    }

    pub fn has_additional_items(&self) -> bool {
        self.additional_items().is_some()
    }

    pub fn items(&self) -> Option<Items> {
        self.resolved()
            .and_then(|node| node.inner().applicator.items.clone())
    }

    pub fn has_items(&self) -> bool {
        self.items().is_some()
    }

    /// True when `items` holds a positional tuple rather than one schema.
    pub fn is_tuple(&self) -> bool {
        matches!(self.items(), Some(Items::Tuple(_)))
    }

    pub fn contains(&self) -> Option<Schema> {
        self.resolved()
            .and_then(|node| node.inner().applicator.contains.clone())
    }

    pub fn has_contains(&self) -> bool {
        self.contains().is_some()
    }

    /// The `additionalProperties` schema. A raw boolean becomes the
    /// corresponding boolean-schema node on the way in, so the accessor
    /// surface stays uniform.
    pub fn additional_properties(&self) -> Option<Schema> {
        self.resolved()
            .and_then(|node| node.inner().applicator.additional_properties.clone())
    }

    pub fn has_additional_properties(&self) -> bool {
        self.additional_properties().is_some()
    }

    pub fn properties(&self) -> Option<IndexMap<String, Schema>> {
        self.resolved()
            .and_then(|node| node.inner().applicator.properties.clone())
    }

    pub fn has_properties(&self) -> bool {
        self.properties().is_some()
    }

    /// Convenience lookup of one property schema by name.
    pub fn property(&self, name: &str) -> Option<Schema> {
        self.resolved()
            .and_then(|node| node.inner().applicator.properties.as_ref()?.get(name).cloned())
    }

    pub fn pattern_properties(&self) -> Option<IndexMap<String, Schema>> {
        self.resolved()
            .and_then(|node| node.inner().applicator.pattern_properties.clone())
    }

    pub fn has_pattern_properties(&self) -> bool {
        self.pattern_properties().is_some()
    }

    pub fn dependent_schemas(&self) -> Option<IndexMap<String, Schema>> {
        self.resolved()
            .and_then(|node| node.inner().applicator.dependent_schemas.clone())
    }

    pub fn has_dependent_schemas(&self) -> bool {
        self.dependent_schemas().is_some()
    }

    pub fn property_names(&self) -> Option<Schema> {
        self.resolved()
            .and_then(|node| node.inner().applicator.property_names.clone())
    }

    pub fn has_property_names(&self) -> bool {
        self.property_names().is_some()
    }

    pub fn if_schema(&self) -> Option<Schema> {
        self.resolved()
            .and_then(|node| node.inner().applicator.if_schema.clone())
    }

    pub fn has_if(&self) -> bool {
        self.if_schema().is_some()
    }

    pub fn then_schema(&self) -> Option<Schema> {
        self.resolved()
            .and_then(|node| node.inner().applicator.then_schema.clone())
    }

    pub fn has_then(&self) -> bool {
        self.then_schema().is_some()
    }

    pub fn else_schema(&self) -> Option<Schema> {
        self.resolved()
            .and_then(|node| node.inner().applicator.else_schema.clone())
    }

    pub fn has_else(&self) -> bool {
        self.else_schema().is_some()
    }

    pub fn all_of(&self) -> Option<Vec<Schema>> {
        self.resolved()
            .and_then(|node| node.inner().applicator.all_of.clone())
    }

    pub fn has_all_of(&self) -> bool {
        self.all_of().is_some()
    }

    pub fn any_of(&self) -> Option<Vec<Schema>> {
        self.resolved()
            .and_then(|node| node.inner().applicator.any_of.clone())
    }

    pub fn has_any_of(&self) -> bool {
        self.any_of().is_some()
    }

    pub fn one_of(&self) -> Option<Vec<Schema>> {
        self.resolved()
            .and_then(|node| node.inner().applicator.one_of.clone())
    }

    pub fn has_one_of(&self) -> bool {
        self.one_of().is_some()
    }

    pub fn not_schema(&self) -> Option<Schema> {
        self.resolved()
            .and_then(|node| node.inner().applicator.not.clone())
    }

    pub fn has_not(&self) -> bool {
        self.not_schema().is_some()
    }
}
