//! # Schema Type Registry — Metadata for the Construction Engine
//!
//! The hand-written [`TypeMetadataProvider`] for the schema domain: one
//! descriptor listing every keyword of the general schema constructor in
//! declaration order, with its ordered candidate types, and the `invoke`
//! function that turns merged arguments into a [`Schema`] node.
//!
//! `invoke` is also the eager-validation boundary: keyword values whose
//! shape is statically wrong for their keyword (`required` holding a
//! non-string, a `type` value outside the fixed enumeration, a map where
//! a list belongs) are rejected here, before any node is assembled.

use std::rc::Rc;

use indexmap::IndexMap;

use hydrate_core::{
    Arguments, CandidateType, ConstructError, Instance, ParameterMetadata, Slot, TypeDescriptor,
    TypeMetadataProvider,
};
use serde_json::Value;

use crate::keyword::{ConstKeyword, ConstNull, Items, TypeKeyword};
use crate::node::{Schema, SchemaParts};

/// Engine name of the schema node type.
pub const SCHEMA_TYPE: &str = "schema";

/// Provider handing the engine the schema descriptor.
pub struct SchemaMetadataProvider;

impl TypeMetadataProvider for SchemaMetadataProvider {
    fn describe(&self, type_name: &str) -> Option<Rc<TypeDescriptor>> {
        if type_name != SCHEMA_TYPE {
            return None;
        }
        Some(Rc::new(schema_descriptor()))
    }
}

/// The schema constructor's parameter table, in declaration order.
/// Raw keyword names arrive `$`-normalized (`$id` → `_id`) through the
/// build rules, so the parameter names use the normalized form.
fn schema_descriptor() -> TypeDescriptor {
    let primitive = |name: &str| {
        ParameterMetadata::new(name, vec![CandidateType::primitive()]).nullable()
    };
    let node = |name: &str| {
        ParameterMetadata::new(name, vec![CandidateType::composite(SCHEMA_TYPE)]).nullable()
    };
    let node_list = |name: &str| {
        ParameterMetadata::new(name, vec![CandidateType::list_of(SCHEMA_TYPE)]).nullable()
    };
    let node_map = |name: &str| {
        ParameterMetadata::new(name, vec![CandidateType::map_of(SCHEMA_TYPE)]).nullable()
    };

    TypeDescriptor::new(
        SCHEMA_TYPE,
        vec![
            // core
            primitive("_id"),
            primitive("_schema"),
            primitive("_anchor"),
            primitive("_ref"),
            primitive("_dynamicRef"),
            primitive("_dynamicAnchor"),
            primitive("_vocabulary"),
            primitive("_comment"),
            node_map("_defs"),
            // meta
            primitive("title"),
            primitive("description"),
            primitive("default"),
            primitive("deprecated"),
            primitive("readOnly"),
            primitive("writeOnly"),
            primitive("examples"),
            // format
            primitive("format"),
            // validation
            primitive("multipleOf"),
            primitive("maximum"),
            primitive("exclusiveMaximum"),
            primitive("minimum"),
            primitive("exclusiveMinimum"),
            primitive("maxLength"),
            primitive("minLength"),
            primitive("pattern"),
            primitive("minItems"),
            primitive("maxItems"),
            primitive("uniqueItems"),
            primitive("maxContains"),
            primitive("minContains"),
            primitive("maxProperties"),
            primitive("minProperties"),
            primitive("required"),
            primitive("dependentRequired"),
            primitive("const"),
            primitive("enum"),
            primitive("type"),
            // applicator
            node("additionalItems"),
            // A list value must win over the single-schema form; map-shaped
            // values are redirected to the single form by the build rules.
            ParameterMetadata::new(
                "items",
                vec![
                    CandidateType::list_of(SCHEMA_TYPE),
                    CandidateType::composite(SCHEMA_TYPE),
                ],
            )
            .nullable(),
            node("contains"),
            node("additionalProperties"),
            node_map("properties"),
            node_map("patternProperties"),
            node_map("dependentSchemas"),
            node("propertyNames"),
            node("if"),
            node("then"),
            node("else"),
            node_list("allOf"),
            node_list("anyOf"),
            node_list("oneOf"),
            node("not"),
        ],
        build_schema,
        |instance| instance.is::<Schema>(),
    )
}

fn build_schema(mut args: Arguments) -> Result<Instance, ConstructError> {
    let parts = SchemaParts {
        // core
        id: args.opt_string("_id")?,
        dialect: args.opt_string("_schema")?,
        anchor: args.opt_string("_anchor")?,
        reference: args.opt_string("_ref")?,
        dynamic_reference: args.opt_string("_dynamicRef")?,
        dynamic_anchor: args.opt_string("_dynamicAnchor")?,
        vocabulary: args.opt_bool_map("_vocabulary")?,
        comment: args.opt_string("_comment")?,
        defs: node_map(args.opt_instance_map::<Schema>("_defs")?),
        // meta
        title: args.opt_string("title")?,
        description: args.opt_string("description")?,
        default: args.opt_value("default")?,
        deprecated: args.opt_bool("deprecated")?,
        read_only: args.opt_bool("readOnly")?,
        write_only: args.opt_bool("writeOnly")?,
        examples: args.opt_value_vec("examples")?,
        // format
        format: args.opt_string("format")?,
        // validation
        multiple_of: args.opt_number("multipleOf")?,
        maximum: args.opt_number("maximum")?,
        exclusive_maximum: args.opt_number("exclusiveMaximum")?,
        minimum: args.opt_number("minimum")?,
        exclusive_minimum: args.opt_number("exclusiveMinimum")?,
        max_length: args.opt_u64("maxLength")?,
        min_length: args.opt_u64("minLength")?,
        pattern: args.opt_string("pattern")?,
        min_items: args.opt_u64("minItems")?,
        max_items: args.opt_u64("maxItems")?,
        unique_items: args.opt_bool("uniqueItems")?,
        max_contains: args.opt_u64("maxContains")?,
        min_contains: args.opt_u64("minContains")?,
        max_properties: args.opt_u64("maxProperties")?,
        min_properties: args.opt_u64("minProperties")?,
        required: args.opt_string_vec("required")?,
        dependent_required: args.opt_string_vec_map("dependentRequired")?,
        konst: const_keyword(args.take("const"))?,
        enum_values: args.opt_value_vec("enum")?,
        schema_type: type_keyword(args.opt_value("type")?)?,
        // applicator
        additional_items: node_arg(args.opt_instance::<Schema>("additionalItems")?),
        items: items_keyword(args.take("items"))?,
        contains: node_arg(args.opt_instance::<Schema>("contains")?),
        additional_properties: node_arg(args.opt_instance::<Schema>("additionalProperties")?),
        properties: node_map(args.opt_instance_map::<Schema>("properties")?),
        pattern_properties: node_map(args.opt_instance_map::<Schema>("patternProperties")?),
        dependent_schemas: node_map(args.opt_instance_map::<Schema>("dependentSchemas")?),
        property_names: node_arg(args.opt_instance::<Schema>("propertyNames")?),
        if_schema: node_arg(args.opt_instance::<Schema>("if")?),
        then_schema: node_arg(args.opt_instance::<Schema>("then")?),
        else_schema: node_arg(args.opt_instance::<Schema>("else")?),
        all_of: node_vec(args.opt_instance_vec::<Schema>("allOf")?),
        any_of: node_vec(args.opt_instance_vec::<Schema>("anyOf")?),
        one_of: node_vec(args.opt_instance_vec::<Schema>("oneOf")?),
        not: node_arg(args.opt_instance::<Schema>("not")?),
    };

    Ok(Rc::new(parts.build()))
}

fn node_arg(instance: Option<Rc<Schema>>) -> Option<Schema> {
    instance.map(|rc| (*rc).clone())
}

fn node_vec(instances: Option<Vec<Rc<Schema>>>) -> Option<Vec<Schema>> {
    instances.map(|list| list.into_iter().map(|rc| (*rc).clone()).collect())
}

fn node_map(instances: Option<IndexMap<String, Rc<Schema>>>) -> Option<IndexMap<String, Schema>> {
    instances.map(|map| {
        map.into_iter()
            .map(|(name, rc)| (name, (*rc).clone()))
            .collect()
    })
}

/// Unwrap the `const` argument: the `ConstNull` sentinel marks an
/// explicit null, a raw null marks absence, anything else is the value.
fn const_keyword(slot: Slot) -> Result<Option<ConstKeyword>, ConstructError> {
    match slot {
        Slot::Value(Value::Null) => Ok(None),
        Slot::Value(value) => Ok(Some(ConstKeyword::Value(value))),
        Slot::Instance(instance) if instance.is::<ConstNull>() => Ok(Some(ConstKeyword::Null)),
        other => Err(ConstructError::Validation {
            parameter: "const".into(),
            message: format!("expected a JSON value, got {}", other.describe()),
        }),
    }
}

fn type_keyword(value: Option<Value>) -> Result<Option<TypeKeyword>, ConstructError> {
    match value {
        None => Ok(None),
        Some(value) => TypeKeyword::parse(&value)
            .map(Some)
            .map_err(|message| ConstructError::Validation {
                parameter: "type".into(),
                message,
            }),
    }
}

/// The `items` argument: a resolved list is the tuple form, a single
/// schema instance the uniform form.
fn items_keyword(slot: Slot) -> Result<Option<Items>, ConstructError> {
    match slot {
        Slot::Value(Value::Null) => Ok(None),
        Slot::Instance(instance) => match instance.downcast::<Schema>() {
            Ok(schema) => Ok(Some(Items::Single((*schema).clone()))),
            Err(_) => Err(items_error("a schema instance")),
        },
        Slot::List(slots) => {
            let mut schemas = Vec::with_capacity(slots.len());
            for slot in slots {
                match slot {
                    Slot::Instance(instance) => match instance.downcast::<Schema>() {
                        Ok(schema) => schemas.push((*schema).clone()),
                        Err(_) => return Err(items_error("schema instances")),
                    },
                    other => return Err(items_error_found(other.describe())),
                }
            }
            Ok(Some(Items::Tuple(schemas)))
        }
        other => Err(items_error_found(other.describe())),
    }
}

fn items_error(expected: &str) -> ConstructError {
    ConstructError::Validation {
        parameter: "items".into(),
        message: format!("expected {expected}"),
    }
}

fn items_error_found(found: &str) -> ConstructError {
    ConstructError::Validation {
        parameter: "items".into(),
        message: format!("expected a schema or a list of schemas, got {found}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrate_core::Container;

    #[test]
    fn test_descriptor_declares_every_keyword() {
        let descriptor = schema_descriptor();
        assert_eq!(descriptor.parameters().len(), 52);
        assert_eq!(descriptor.parameters()[0].name(), "_id");
        assert_eq!(
            descriptor.parameters().last().map(|p| p.name()),
            Some("not")
        );
    }

    #[test]
    fn test_items_accepts_both_shapes() {
        let descriptor = schema_descriptor();
        let items = descriptor
            .parameters()
            .iter()
            .find(|p| p.name() == "items")
            .unwrap();
        assert!(items.accepts(SCHEMA_TYPE, Container::List));
        assert!(items.accepts(SCHEMA_TYPE, Container::Scalar));
        // List declared first: raw lists must resolve to the tuple form.
        assert!(items.candidates()[0].is(SCHEMA_TYPE, Container::List));
    }

    #[test]
    fn test_provider_only_knows_schema() {
        assert!(SchemaMetadataProvider.describe(SCHEMA_TYPE).is_some());
        assert!(SchemaMetadataProvider.describe("other").is_none());
    }

    #[test]
    fn test_is_instance_probe() {
        let descriptor = schema_descriptor();
        let schema: Instance = Rc::new(Schema::default());
        let other: Instance = Rc::new(17u8);
        assert!(descriptor.is_instance(&schema));
        assert!(!descriptor.is_instance(&other));
    }
}
