//! # Path Navigation — JSON-Pointer-Style Lookup
//!
//! Schema documents are navigated with `/`-separated paths: segments
//! descend uniformly through node keywords, schema maps (numeric-free
//! keys), schema lists (numeric segments) and raw JSON data. An optional
//! leading `#` fragment marker is stripped, and `$`-prefixed segments are
//! normalized before lookup, so `#/$defs/address` and `/$defs/address`
//! name the same node.
//!
//! `$ref` resolution is built on the same walk: the reference string is a
//! path evaluated against the document root.

use indexmap::IndexMap;
use serde_json::Value;

use crate::keyword::{normalize_keyword, ConstKeyword, Items, TypeKeyword};
use crate::node::Schema;

/// A value reached by path navigation.
#[derive(Debug, Clone)]
pub enum PathValue {
    /// A single schema node.
    Node(Schema),
    /// A list of schema nodes (tuple `items`, `allOf`, ...).
    Nodes(Vec<Schema>),
    /// A string-keyed map of schema nodes (`properties`, `$defs`, ...).
    NodeMap(IndexMap<String, Schema>),
    /// Plain data: strings, numbers, booleans, raw lists and maps.
    Data(Value),
}

impl PathValue {
    pub fn as_node(&self) -> Option<&Schema> {
        match self {
            PathValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<Schema> {
        match self {
            PathValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&Value> {
        match self {
            PathValue::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<Value> {
        match self {
            PathValue::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Convenience view of string data.
    pub fn as_str(&self) -> Option<&str> {
        self.as_data().and_then(Value::as_str)
    }
}

/// Split a path into normalized lookup segments.
pub(crate) fn segments(path: &str) -> Vec<String> {
    path.strip_prefix('#')
        .unwrap_or(path)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(normalize_keyword)
        .collect()
}

impl Schema {
    /// Navigate a path starting at this node. Returns `None` as soon as a
    /// segment does not exist.
    pub fn get(&self, path: &str) -> Option<PathValue> {
        let mut current = PathValue::Node(self.clone());
        for segment in segments(path) {
            current = descend(current, &segment)?;
        }
        Some(current)
    }

    /// Navigate a path starting at the document root.
    pub fn find(&self, path: &str) -> Option<PathValue> {
        self.root().get(path)
    }
}

fn descend(current: PathValue, segment: &str) -> Option<PathValue> {
    match current {
        PathValue::Node(node) => node.keyword_value(segment),
        PathValue::Nodes(nodes) => {
            let index: usize = segment.parse().ok()?;
            nodes.get(index).cloned().map(PathValue::Node)
        }
        PathValue::NodeMap(map) => map.get(segment).cloned().map(PathValue::Node),
        PathValue::Data(Value::Array(items)) => {
            let index: usize = segment.parse().ok()?;
            items.get(index).cloned().map(PathValue::Data)
        }
        PathValue::Data(Value::Object(map)) => map.get(segment).cloned().map(PathValue::Data),
        PathValue::Data(_) => None,
    }
}

impl Schema {
    /// Look one keyword up on this node, by its normalized segment name.
    /// Reads through `$ref` indirection like the typed accessors do; the
    /// reference keywords themselves come from the node's own fields.
    fn keyword_value(&self, segment: &str) -> Option<PathValue> {
        if segment == "_ref" {
            return self.ref_path().map(|r| PathValue::Data(Value::String(r)));
        }
        if segment == "_dynamicRef" {
            return self.dynamic_ref().map(|r| PathValue::Data(Value::String(r)));
        }

        let node = self.resolved()?;
        let inner = node.inner();

        let data = |value: Value| Some(PathValue::Data(value));
        match segment {
            // core
            "_id" => data(Value::String(inner.core.id.clone()?)),
            "_schema" => data(Value::String(inner.core.dialect.clone()?)),
            "_anchor" => data(Value::String(inner.core.anchor.clone()?)),
            "_dynamicAnchor" => data(Value::String(inner.core.dynamic_anchor.clone()?)),
            "_vocabulary" => {
                let vocabulary = inner.core.vocabulary.as_ref()?;
                data(Value::Object(
                    vocabulary
                        .iter()
                        .map(|(uri, required)| (uri.clone(), Value::Bool(*required)))
                        .collect(),
                ))
            }
            "_comment" => data(Value::String(inner.core.comment.clone()?)),
            "_defs" => Some(PathValue::NodeMap(inner.core.defs.clone()?)),
            // meta
            "title" => data(Value::String(inner.meta.title.clone()?)),
            "description" => data(Value::String(inner.meta.description.clone()?)),
            "default" => data(inner.meta.default.clone()?),
            "deprecated" => data(Value::Bool(inner.meta.deprecated?)),
            "readOnly" => data(Value::Bool(inner.meta.read_only?)),
            "writeOnly" => data(Value::Bool(inner.meta.write_only?)),
            "examples" => data(Value::Array(inner.meta.examples.clone()?)),
            // format
            "format" => data(Value::String(inner.format.format.clone()?)),
            // validation
            "multipleOf" => data(Value::Number(inner.validation.multiple_of.clone()?)),
            "maximum" => data(Value::Number(inner.validation.maximum.clone()?)),
            "exclusiveMaximum" => data(Value::Number(inner.validation.exclusive_maximum.clone()?)),
            "minimum" => data(Value::Number(inner.validation.minimum.clone()?)),
            "exclusiveMinimum" => data(Value::Number(inner.validation.exclusive_minimum.clone()?)),
            "maxLength" => data(Value::from(inner.validation.max_length?)),
            "minLength" => data(Value::from(inner.validation.min_length?)),
            "pattern" => data(Value::String(inner.validation.pattern.clone()?)),
            "minItems" => data(Value::from(inner.validation.min_items?)),
            "maxItems" => data(Value::from(inner.validation.max_items?)),
            "uniqueItems" => data(Value::Bool(inner.validation.unique_items?)),
            "maxContains" => data(Value::from(inner.validation.max_contains?)),
            "minContains" => data(Value::from(inner.validation.min_contains?)),
            "maxProperties" => data(Value::from(inner.validation.max_properties?)),
            "minProperties" => data(Value::from(inner.validation.min_properties?)),
            "required" => data(Value::Array(
                inner
                    .validation
                    .required
                    .clone()?
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            )),
            "dependentRequired" => {
                let dependent = inner.validation.dependent_required.as_ref()?;
                data(Value::Object(
                    dependent
                        .iter()
                        .map(|(name, needs)| {
                            (
                                name.clone(),
                                Value::Array(needs.iter().cloned().map(Value::String).collect()),
                            )
                        })
                        .collect(),
                ))
            }
            "const" => data(inner.validation.konst.as_ref().map(ConstKeyword::to_value)?),
            "enum" => data(Value::Array(inner.validation.enum_values.clone()?)),
            "type" => data(inner.validation.schema_type.as_ref().map(TypeKeyword::to_value)?),
            // applicator
            "additionalItems" => Some(PathValue::Node(inner.applicator.additional_items.clone()?)),
            "items" => match inner.applicator.items.clone()? {
                Items::Single(schema) => Some(PathValue::Node(schema)),
                Items::Tuple(schemas) => Some(PathValue::Nodes(schemas)),
            },
            "contains" => Some(PathValue::Node(inner.applicator.contains.clone()?)),
            "additionalProperties" => {
                Some(PathValue::Node(inner.applicator.additional_properties.clone()?))
            }
            "properties" => Some(PathValue::NodeMap(inner.applicator.properties.clone()?)),
            "patternProperties" => {
                Some(PathValue::NodeMap(inner.applicator.pattern_properties.clone()?))
            }
            "dependentSchemas" => {
                Some(PathValue::NodeMap(inner.applicator.dependent_schemas.clone()?))
            }
            "propertyNames" => Some(PathValue::Node(inner.applicator.property_names.clone()?)),
            "if" => Some(PathValue::Node(inner.applicator.if_schema.clone()?)),
            "then" => Some(PathValue::Node(inner.applicator.then_schema.clone()?)),
            "else" => Some(PathValue::Node(inner.applicator.else_schema.clone()?)),
            "allOf" => Some(PathValue::Nodes(inner.applicator.all_of.clone()?)),
            "anyOf" => Some(PathValue::Nodes(inner.applicator.any_of.clone()?)),
            "oneOf" => Some(PathValue::Nodes(inner.applicator.one_of.clone()?)),
            "not" => Some(PathValue::Node(inner.applicator.not.clone()?)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segments_strip_fragment_and_normalize() {
        assert_eq!(segments("#/$defs/a"), vec!["_defs", "a"]);
        assert_eq!(segments("/properties/name"), vec!["properties", "name"]);
        assert!(segments("#/").is_empty());
        assert!(segments("#").is_empty());
    }

    #[test]
    fn test_get_descends_through_properties() {
        let schema = Schema::object_type(
            Some(
                [("name".to_string(), Schema::string_type(None, None, None, None))]
                    .into_iter()
                    .collect(),
            ),
            None,
            None,
            None,
            None,
        );

        assert_eq!(schema.get("/type").unwrap().as_str(), Some("object"));
        assert_eq!(
            schema.get("/properties/name/type").unwrap().as_str(),
            Some("string")
        );
        assert!(schema.get("/properties/name").unwrap().as_node().is_some());
        assert!(schema.get("/properties/missing").is_none());
        assert!(schema.get("/nonsense").is_none());
    }

    #[test]
    fn test_numeric_segments_index_tuples() {
        let schema = Schema::array_type(
            Some(Items::Tuple(vec![
                Schema::string_type(None, None, None, None),
                Schema::number_type(None, None, None, None, None),
            ])),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        );

        assert_eq!(schema.get("/items/1/type").unwrap().as_str(), Some("number"));
        assert!(schema.get("/items/2").is_none());
        assert!(schema.get("/items/one").is_none());
    }

    #[test]
    fn test_data_descent() {
        let schema = crate::node::SchemaParts {
            default: Some(json!({"point": {"x": 4}, "list": [1, 2]})),
            ..Default::default()
        }
        .build();

        assert_eq!(
            schema.get("/default/point/x").unwrap().into_data(),
            Some(json!(4))
        );
        assert_eq!(
            schema.get("/default/list/1").unwrap().into_data(),
            Some(json!(2))
        );
        assert!(schema.get("/default/list/x").is_none());
    }

    #[test]
    fn test_empty_path_is_identity() {
        let schema = Schema::default();
        let found = schema.get("#/").unwrap().into_node().unwrap();
        assert!(found.ptr_eq(&schema));
    }
}
