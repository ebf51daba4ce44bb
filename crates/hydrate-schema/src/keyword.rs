//! # Keyword Value Types
//!
//! Typed representations for the schema keywords whose JSON shape is not
//! a plain scalar: the fixed `type` enumeration, the single-or-tuple
//! `items` form, and the three-state `const` keyword.
//!
//! ## Name normalization
//!
//! `$`-prefixed keywords (`$id`, `$ref`, `$defs`, ...) cannot serve as
//! internal identifiers, so the leading `$` is rewritten to `_` the
//! moment raw data enters the pipeline and rewritten back at the
//! serialization boundary. [`normalize_keyword`] and
//! [`denormalize_keyword`] are the two halves of that bidirectional map.

use serde_json::Value;

use crate::node::Schema;

/// The fixed set of values the `type` keyword accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    Null,
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    /// Every admissible `type` value, in canonical order.
    pub const ALL: [SchemaType; 7] = [
        SchemaType::Null,
        SchemaType::String,
        SchemaType::Number,
        SchemaType::Integer,
        SchemaType::Boolean,
        SchemaType::Array,
        SchemaType::Object,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }

    pub fn parse(name: &str) -> Option<SchemaType> {
        SchemaType::ALL.iter().copied().find(|ty| ty.as_str() == name)
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` keyword: a single type name or a list of them. The two
/// shapes serialize differently, so the distinction is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKeyword {
    One(SchemaType),
    Many(Vec<SchemaType>),
}

impl TypeKeyword {
    /// Parse the raw keyword value, rejecting anything outside the fixed
    /// enumeration with a message naming every offending value.
    pub fn parse(value: &Value) -> Result<TypeKeyword, String> {
        let names: Vec<&str> = match value {
            Value::String(name) => vec![name.as_str()],
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name.as_str()),
                    other => Err(format!("must be of string|string-list shape, got {other}")),
                })
                .collect::<Result<_, _>>()?,
            other => return Err(format!("must be of string|string-list shape, got {other}")),
        };

        let offending: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| SchemaType::parse(name).is_none())
            .collect();
        if !offending.is_empty() {
            let admissible = SchemaType::ALL
                .iter()
                .map(|ty| format!("\"{ty}\""))
                .collect::<Vec<_>>()
                .join(", ");
            let provided = offending
                .iter()
                .map(|name| format!("\"{name}\""))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(format!(
                "must have one of the following values: {admissible} ({provided} provided)"
            ));
        }

        let types: Vec<SchemaType> = names
            .iter()
            .filter_map(|name| SchemaType::parse(name))
            .collect();
        Ok(match value {
            Value::String(_) => TypeKeyword::One(types[0]),
            _ => TypeKeyword::Many(types),
        })
    }

    /// The declared types, regardless of shape.
    pub fn types(&self) -> Vec<SchemaType> {
        match self {
            TypeKeyword::One(ty) => vec![*ty],
            TypeKeyword::Many(types) => types.clone(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            TypeKeyword::One(ty) => Value::String(ty.as_str().into()),
            TypeKeyword::Many(types) => Value::Array(
                types
                    .iter()
                    .map(|ty| Value::String(ty.as_str().into()))
                    .collect(),
            ),
        }
    }
}

impl From<SchemaType> for TypeKeyword {
    fn from(ty: SchemaType) -> Self {
        TypeKeyword::One(ty)
    }
}

/// The `items` keyword: one schema applied to every element, or a tuple
/// of positional schemas.
#[derive(Debug, Clone)]
pub enum Items {
    Single(Schema),
    Tuple(Vec<Schema>),
}

impl Items {
    pub fn is_tuple(&self) -> bool {
        matches!(self, Items::Tuple(_))
    }
}

/// The `const` keyword, present-null and present-value kept apart.
/// Absence is the enclosing `Option`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstKeyword {
    /// `"const": null` — explicitly constrained to null.
    Null,
    /// `"const": <value>` for any non-null value.
    Value(Value),
}

impl ConstKeyword {
    pub fn to_value(&self) -> Value {
        match self {
            ConstKeyword::Null => Value::Null,
            ConstKeyword::Value(value) => value.clone(),
        }
    }
}

/// Pipeline sentinel for an explicit `const: null`.
///
/// A raw `null` cannot survive the defaults merge without being read as
/// "keyword absent", so the build rules swap it for an instance of this
/// marker before resolution; the schema constructor unwraps it into
/// [`ConstKeyword::Null`].
pub struct ConstNull;

/// Rewrite a `$`-prefixed keyword to its internal identifier form.
pub fn normalize_keyword(name: &str) -> String {
    match name.strip_prefix('$') {
        Some(rest) => format!("_{rest}"),
        None => name.to_string(),
    }
}

/// Rewrite a normalized identifier back to its serialized keyword form.
pub fn denormalize_keyword(name: &str) -> String {
    match name.strip_prefix('_') {
        Some(rest) => format!("${rest}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_parse_single() {
        let parsed = TypeKeyword::parse(&json!("string")).unwrap();
        assert_eq!(parsed, TypeKeyword::One(SchemaType::String));
        assert_eq!(parsed.to_value(), json!("string"));
    }

    #[test]
    fn test_type_parse_list() {
        let parsed = TypeKeyword::parse(&json!(["string", "null"])).unwrap();
        assert_eq!(
            parsed,
            TypeKeyword::Many(vec![SchemaType::String, SchemaType::Null])
        );
        assert_eq!(parsed.to_value(), json!(["string", "null"]));
    }

    #[test]
    fn test_type_parse_rejects_unknown_values() {
        let err = TypeKeyword::parse(&json!("float")).unwrap_err();
        assert!(err.contains("\"float\" provided"));
        assert!(err.contains("\"integer\""));

        let err = TypeKeyword::parse(&json!(["float", "string", "decimal"])).unwrap_err();
        assert!(err.contains("\"float\", \"decimal\" provided"));
    }

    #[test]
    fn test_type_parse_rejects_non_strings() {
        assert!(TypeKeyword::parse(&json!(["string", true])).is_err());
        assert!(TypeKeyword::parse(&json!(17)).is_err());
    }

    #[test]
    fn test_keyword_normalization_roundtrip() {
        assert_eq!(normalize_keyword("$defs"), "_defs");
        assert_eq!(normalize_keyword("title"), "title");
        assert_eq!(denormalize_keyword("_defs"), "$defs");
        assert_eq!(denormalize_keyword("title"), "title");
    }

    #[test]
    fn test_const_keyword_values() {
        assert_eq!(ConstKeyword::Null.to_value(), Value::Null);
        assert_eq!(ConstKeyword::Value(json!(3.5)).to_value(), json!(3.5));
    }
}
