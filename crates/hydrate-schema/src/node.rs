//! # Schema Nodes — The Recursive Document Tree
//!
//! A [`Schema`] is a cheap, cloneable handle (`Rc`) to one node of a
//! JSON Schema 2020-12 document. Node content is immutable after
//! construction; the single mutable field is the non-owning parent
//! back-link, set when a node is attached under a container and used only
//! to walk toward the document root during `$ref` resolution.
//!
//! ## Reference nodes
//!
//! A node with `$ref` set is a reference node: every vocabulary accessor
//! reads through one dereference step, which resolves the target once
//! (never recursively — the target's own raw fields are read, so
//! self-referential documents cannot loop an accessor). An unresolvable
//! reference reads as "no value" rather than failing.
//!
//! ## Boolean schemas
//!
//! `true` and `false` documents become nodes with the `always_valid` /
//! `always_invalid` flag set and no other content, and serialize back to
//! the bare boolean.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::keyword::{ConstKeyword, Items, SchemaType, TypeKeyword};
use crate::path::PathValue;
use crate::vocabulary::{
    ApplicatorVocabulary, CoreVocabulary, FormatVocabulary, MetaVocabulary, ValidationVocabulary,
};

#[derive(Default)]
pub(crate) struct SchemaInner {
    pub(crate) parent: RefCell<Option<Weak<SchemaInner>>>,
    pub(crate) always_valid: bool,
    pub(crate) always_invalid: bool,
    pub(crate) core: CoreVocabulary,
    pub(crate) meta: MetaVocabulary,
    pub(crate) format: FormatVocabulary,
    pub(crate) validation: ValidationVocabulary,
    pub(crate) applicator: ApplicatorVocabulary,
}

/// One node of a schema document.
#[derive(Clone)]
pub struct Schema {
    inner: Rc<SchemaInner>,
}

impl Schema {
    pub(crate) fn inner(&self) -> &SchemaInner {
        &self.inner
    }

    /// The boolean schema `true` (always valid) or `false` (always
    /// invalid). Boolean-schema nodes carry no vocabulary fields.
    pub fn boolean(value: bool) -> Schema {
        let inner = SchemaInner {
            always_valid: value,
            always_invalid: !value,
            ..SchemaInner::default()
        };
        Schema {
            inner: Rc::new(inner),
        }
    }

    pub fn is_always_valid(&self) -> bool {
        self.resolved().map(|node| node.inner.always_valid).unwrap_or(false)
    }

    pub fn is_always_invalid(&self) -> bool {
        self.resolved()
            .map(|node| node.inner.always_invalid)
            .unwrap_or(false)
    }

    /// True when this node carries `$ref` and therefore reads through an
    /// indirection.
    pub fn is_reference(&self) -> bool {
        self.inner.core.reference.is_some()
    }

    /// The node this node's `$ref` points at, if it resolves: the path is
    /// looked up from the document root, reached by walking parent links.
    /// The empty path (`#/` or `#`) denotes the root itself.
    pub fn reference(&self) -> Option<Schema> {
        let pointer = self.inner.core.reference.clone()?;
        match self.find(&pointer)? {
            PathValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// One step of `$ref` indirection: the reference target for reference
    /// nodes, the node itself otherwise. `None` when the reference does
    /// not resolve — accessors then report "no value" instead of failing.
    pub(crate) fn resolved(&self) -> Option<Schema> {
        if self.is_reference() {
            self.reference()
        } else {
            Some(self.clone())
        }
    }

    /// The containing node, when this node is attached under one.
    pub fn parent(&self) -> Option<Schema> {
        let parent = self.inner.parent.borrow();
        parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Schema { inner })
    }

    /// The document root: the first ancestor without a parent.
    pub fn root(&self) -> Schema {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Node identity: whether two handles point at the same node.
    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn set_parent(&self, parent: &Schema) {
        *self.inner.parent.borrow_mut() = Some(Rc::downgrade(&parent.inner));
    }

    /// Serialize this node to its JSON value: the bare boolean for
    /// boolean schemas, otherwise every present keyword under its
    /// serialized (`$`-prefixed where applicable) name. A node with no
    /// keywords serializes to the canonical empty object.
    pub fn to_value(&self) -> Value {
        if self.inner.always_valid {
            return Value::Bool(true);
        }
        if self.inner.always_invalid {
            return Value::Bool(false);
        }

        let mut out = Map::new();
        self.inner.core.emit(&mut out);
        self.inner.meta.emit(&mut out);
        self.inner.format.emit(&mut out);
        self.inner.validation.emit(&mut out);
        self.inner.applicator.emit(&mut out);
        Value::Object(out)
    }

    // ---- typed construction helpers ----

    /// A `type: "string"` schema with its common constraints.
    pub fn string_type(
        min_length: Option<u64>,
        max_length: Option<u64>,
        format: Option<&str>,
        pattern: Option<&str>,
    ) -> Schema {
        SchemaParts {
            format: format.map(str::to_owned),
            max_length,
            min_length,
            pattern: pattern.map(str::to_owned),
            schema_type: Some(SchemaType::String.into()),
            ..SchemaParts::default()
        }
        .build()
    }

    /// A `type: "integer"` schema with its numeric constraints.
    pub fn integer_type(
        multiple_of: Option<Number>,
        minimum: Option<Number>,
        exclusive_minimum: Option<Number>,
        maximum: Option<Number>,
        exclusive_maximum: Option<Number>,
    ) -> Schema {
        Schema::numeric_type(
            SchemaType::Integer,
            multiple_of,
            minimum,
            exclusive_minimum,
            maximum,
            exclusive_maximum,
        )
    }

    /// A `type: "number"` schema with its numeric constraints.
    pub fn number_type(
        multiple_of: Option<Number>,
        minimum: Option<Number>,
        exclusive_minimum: Option<Number>,
        maximum: Option<Number>,
        exclusive_maximum: Option<Number>,
    ) -> Schema {
        Schema::numeric_type(
            SchemaType::Number,
            multiple_of,
            minimum,
            exclusive_minimum,
            maximum,
            exclusive_maximum,
        )
    }

    fn numeric_type(
        ty: SchemaType,
        multiple_of: Option<Number>,
        minimum: Option<Number>,
        exclusive_minimum: Option<Number>,
        maximum: Option<Number>,
        exclusive_maximum: Option<Number>,
    ) -> Schema {
        SchemaParts {
            multiple_of,
            maximum,
            exclusive_maximum,
            minimum,
            exclusive_minimum,
            schema_type: Some(ty.into()),
            ..SchemaParts::default()
        }
        .build()
    }

    /// A `type: "array"` schema.
    #[allow(clippy::too_many_arguments)]
    pub fn array_type(
        items: Option<Items>,
        additional_items: Option<Schema>,
        min_items: Option<u64>,
        max_items: Option<u64>,
        unique_items: Option<bool>,
        contains: Option<Schema>,
        max_contains: Option<u64>,
        min_contains: Option<u64>,
    ) -> Schema {
        SchemaParts {
            min_items,
            max_items,
            unique_items,
            max_contains,
            min_contains,
            schema_type: Some(SchemaType::Array.into()),
            additional_items,
            items,
            contains,
            ..SchemaParts::default()
        }
        .build()
    }

    /// A `type: "object"` schema.
    pub fn object_type(
        properties: Option<IndexMap<String, Schema>>,
        min_properties: Option<u64>,
        max_properties: Option<u64>,
        additional_properties: Option<Schema>,
        required: Option<Vec<String>>,
    ) -> Schema {
        SchemaParts {
            max_properties,
            min_properties,
            required,
            schema_type: Some(SchemaType::Object.into()),
            additional_properties,
            properties,
            ..SchemaParts::default()
        }
        .build()
    }
}

impl Default for Schema {
    /// The empty schema: no keywords, serializes to `{}`.
    fn default() -> Schema {
        SchemaParts::default().build()
    }
}

/// A boolean is the boolean schema, wherever a schema is expected —
/// the `bool | Schema` unions of `additionalProperties` and friends
/// normalize through this.
impl From<bool> for Schema {
    fn from(value: bool) -> Schema {
        Schema::boolean(value)
    }
}

impl PartialEq for Schema {
    /// Structural equality on the serialized document.
    fn eq(&self, other: &Schema) -> bool {
        self.to_value() == other.to_value()
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema({})", self.to_value())
    }
}

impl serde::Serialize for Schema {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_value(), serializer)
    }
}

/// The full keyword set of the general constructor, as plain optional
/// fields. `build()` is the single construction path for non-boolean
/// nodes: it assembles the node and attaches every nested child by
/// setting its parent back-link. The typed helpers and the construction
/// pipeline both go through here.
#[derive(Default)]
pub struct SchemaParts {
    // core
    pub id: Option<String>,
    pub dialect: Option<String>,
    pub anchor: Option<String>,
    pub reference: Option<String>,
    pub dynamic_reference: Option<String>,
    pub dynamic_anchor: Option<String>,
    pub vocabulary: Option<IndexMap<String, bool>>,
    pub comment: Option<String>,
    pub defs: Option<IndexMap<String, Schema>>,
    // meta
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub deprecated: Option<bool>,
    pub read_only: Option<bool>,
    pub write_only: Option<bool>,
    pub examples: Option<Vec<Value>>,
    // format
    pub format: Option<String>,
    // validation
    pub multiple_of: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_maximum: Option<Number>,
    pub minimum: Option<Number>,
    pub exclusive_minimum: Option<Number>,
    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
    pub pattern: Option<String>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
    pub max_contains: Option<u64>,
    pub min_contains: Option<u64>,
    pub max_properties: Option<u64>,
    pub min_properties: Option<u64>,
    pub required: Option<Vec<String>>,
    pub dependent_required: Option<IndexMap<String, Vec<String>>>,
    pub konst: Option<ConstKeyword>,
    pub enum_values: Option<Vec<Value>>,
    pub schema_type: Option<TypeKeyword>,
    // applicator
    pub additional_items: Option<Schema>,
    pub items: Option<Items>,
    pub contains: Option<Schema>,
    pub additional_properties: Option<Schema>,
    pub properties: Option<IndexMap<String, Schema>>,
    pub pattern_properties: Option<IndexMap<String, Schema>>,
    pub dependent_schemas: Option<IndexMap<String, Schema>>,
    pub property_names: Option<Schema>,
    pub if_schema: Option<Schema>,
    pub then_schema: Option<Schema>,
    pub else_schema: Option<Schema>,
    pub all_of: Option<Vec<Schema>>,
    pub any_of: Option<Vec<Schema>>,
    pub one_of: Option<Vec<Schema>>,
    pub not: Option<Schema>,
}

impl SchemaParts {
    /// Assemble the node and wire parent links into every child.
    pub fn build(self) -> Schema {
        let inner = SchemaInner {
            parent: RefCell::new(None),
            always_valid: false,
            always_invalid: false,
            core: CoreVocabulary {
                id: self.id,
                dialect: self.dialect,
                anchor: self.anchor,
                reference: self.reference,
                dynamic_reference: self.dynamic_reference,
                dynamic_anchor: self.dynamic_anchor,
                vocabulary: self.vocabulary,
                comment: self.comment,
                defs: self.defs,
            },
            meta: MetaVocabulary {
                title: self.title,
                description: self.description,
                default: self.default,
                deprecated: self.deprecated,
                read_only: self.read_only,
                write_only: self.write_only,
                examples: self.examples,
            },
            format: FormatVocabulary {
                format: self.format,
            },
            validation: ValidationVocabulary {
                multiple_of: self.multiple_of,
                maximum: self.maximum,
                exclusive_maximum: self.exclusive_maximum,
                minimum: self.minimum,
                exclusive_minimum: self.exclusive_minimum,
                max_length: self.max_length,
                min_length: self.min_length,
                pattern: self.pattern,
                min_items: self.min_items,
                max_items: self.max_items,
                unique_items: self.unique_items,
                max_contains: self.max_contains,
                min_contains: self.min_contains,
                max_properties: self.max_properties,
                min_properties: self.min_properties,
                required: self.required,
                dependent_required: self.dependent_required,
                konst: self.konst,
                enum_values: self.enum_values,
                schema_type: self.schema_type,
            },
            applicator: ApplicatorVocabulary {
                additional_items: self.additional_items,
                items: self.items,
                contains: self.contains,
                additional_properties: self.additional_properties,
                properties: self.properties,
                pattern_properties: self.pattern_properties,
                dependent_schemas: self.dependent_schemas,
                property_names: self.property_names,
                if_schema: self.if_schema,
                then_schema: self.then_schema,
                else_schema: self.else_schema,
                all_of: self.all_of,
                any_of: self.any_of,
                one_of: self.one_of,
                not: self.not,
            },
        };

        let schema = Schema {
            inner: Rc::new(inner),
        };
        for child in schema.children() {
            child.set_parent(&schema);
        }
        schema
    }
}

impl Schema {
    /// Every directly nested child node, across all container keywords.
    fn children(&self) -> Vec<Schema> {
        let mut children = Vec::new();
        let applicator = &self.inner.applicator;

        if let Some(defs) = &self.inner.core.defs {
            children.extend(defs.values().cloned());
        }
        children.extend(applicator.additional_items.clone());
        match &applicator.items {
            Some(Items::Single(schema)) => children.push(schema.clone()),
            Some(Items::Tuple(schemas)) => children.extend(schemas.iter().cloned()),
            None => {}
        }
        children.extend(applicator.contains.clone());
        children.extend(applicator.additional_properties.clone());
        for map in [
            &applicator.properties,
            &applicator.pattern_properties,
            &applicator.dependent_schemas,
        ]
        .into_iter()
        .flatten()
        {
            children.extend(map.values().cloned());
        }
        children.extend(applicator.property_names.clone());
        children.extend(applicator.if_schema.clone());
        children.extend(applicator.then_schema.clone());
        children.extend(applicator.else_schema.clone());
        for list in [&applicator.all_of, &applicator.any_of, &applicator.one_of]
            .into_iter()
            .flatten()
        {
            children.extend(list.iter().cloned());
        }
        children.extend(applicator.not.clone());

        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_schema_serializes_to_empty_object() {
        let schema = Schema::default();
        assert_eq!(schema.to_value(), json!({}));
        assert!(!schema.has_type());
        assert!(!schema.has_ref());
    }

    #[test]
    fn test_boolean_schemas() {
        let valid = Schema::boolean(true);
        assert!(valid.is_always_valid());
        assert!(!valid.is_always_invalid());
        assert_eq!(valid.to_value(), json!(true));

        let invalid = Schema::boolean(false);
        assert!(invalid.is_always_invalid());
        assert_eq!(invalid.to_value(), json!(false));
    }

    #[test]
    fn test_from_bool() {
        assert!(Schema::from(true).is_always_valid());
        assert!(Schema::from(false).is_always_invalid());
    }

    #[test]
    fn test_string_type_helper() {
        let schema = Schema::string_type(Some(8), Some(64), Some("email"), Some("^\\S+@mail.com"));
        assert_eq!(schema.schema_type(), Some(SchemaType::String.into()));
        assert_eq!(schema.min_length(), Some(8));
        assert_eq!(schema.max_length(), Some(64));
        assert_eq!(schema.format().as_deref(), Some("email"));
        assert!(schema.has_pattern());

        let bare = Schema::string_type(None, None, None, None);
        assert_eq!(bare.to_value(), json!({"type": "string"}));
        assert!(!bare.has_min_length());
        assert!(!bare.has_format());
    }

    #[test]
    fn test_numeric_type_helpers() {
        let schema = Schema::integer_type(
            Some(10.into()),
            Some(11.into()),
            Some(10.into()),
            Some(21.into()),
            Some(20.into()),
        );
        assert_eq!(schema.schema_type(), Some(SchemaType::Integer.into()));
        assert_eq!(schema.multiple_of(), Some(10.into()));
        assert_eq!(schema.minimum(), Some(11.into()));
        assert_eq!(schema.exclusive_minimum(), Some(10.into()));
        assert_eq!(schema.maximum(), Some(21.into()));
        assert_eq!(schema.exclusive_maximum(), Some(20.into()));

        let number = Schema::number_type(None, None, None, None, None);
        assert_eq!(number.to_value(), json!({"type": "number"}));
    }

    #[test]
    fn test_object_type_wires_parents() {
        let schema = Schema::object_type(
            Some(
                [
                    ("name".to_string(), Schema::string_type(None, None, None, None)),
                    ("age".to_string(), Schema::number_type(None, None, None, None, None)),
                ]
                .into_iter()
                .collect(),
            ),
            None,
            None,
            None,
            Some(vec!["name".into()]),
        );

        let name = schema.property("name").unwrap();
        assert!(name.parent().unwrap().ptr_eq(&schema));
        assert!(schema.parent().is_none());
        assert_eq!(schema.required(), Some(vec!["name".to_string()]));
    }

    #[test]
    fn test_array_type_tuple_detection() {
        let single = Schema::array_type(
            Some(Items::Single(Schema::string_type(None, None, None, None))),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        );
        assert!(single.has_items());
        assert!(!single.is_tuple());

        let tuple = Schema::array_type(
            Some(Items::Tuple(vec![
                Schema::string_type(None, None, None, None),
                Schema::boolean(true),
            ])),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        );
        assert!(tuple.is_tuple());
        assert_eq!(
            tuple.to_value(),
            json!({"type": "array", "items": [{"type": "string"}, true]})
        );
    }

    #[test]
    fn test_serialization_denormalizes_core_keywords() {
        let schema = SchemaParts {
            id: Some("http://example.com/schema.json".into()),
            comment: Some("[WIP]".into()),
            defs: Some(
                [("inner".to_string(), Schema::default())]
                    .into_iter()
                    .collect(),
            ),
            ..SchemaParts::default()
        }
        .build();

        assert_eq!(
            schema.to_value(),
            json!({
                "$id": "http://example.com/schema.json",
                "$comment": "[WIP]",
                "$defs": {"inner": {}}
            })
        );
    }

    #[test]
    fn test_const_tri_state() {
        let absent = Schema::default();
        assert!(!absent.has_const());
        assert_eq!(absent.const_value(), None);

        let null = SchemaParts {
            konst: Some(ConstKeyword::Null),
            ..SchemaParts::default()
        }
        .build();
        assert!(null.has_const());
        assert_eq!(null.const_value(), Some(Value::Null));
        assert_eq!(null.to_value(), json!({"const": null}));

        let pi = SchemaParts {
            konst: Some(ConstKeyword::Value(json!(3.1415926535))),
            ..SchemaParts::default()
        }
        .build();
        assert!(pi.has_const());
        assert_eq!(pi.const_value(), Some(json!(3.1415926535)));
    }

    #[test]
    fn test_structural_equality() {
        let a = Schema::string_type(Some(1), None, None, None);
        let b = Schema::string_type(Some(1), None, None, None);
        let c = Schema::string_type(Some(2), None, None, None);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
