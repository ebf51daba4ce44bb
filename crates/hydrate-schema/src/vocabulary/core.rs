//! Core vocabulary: identity, dialect, anchors, references and embedded
//! definitions. These are the `$`-prefixed keywords; their serialized
//! names come from [`denormalize_keyword`].

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::keyword::denormalize_keyword;
use crate::node::Schema;

#[derive(Default, Clone)]
pub(crate) struct CoreVocabulary {
    pub(crate) id: Option<String>,
    pub(crate) dialect: Option<String>,
    pub(crate) anchor: Option<String>,
    pub(crate) reference: Option<String>,
    pub(crate) dynamic_reference: Option<String>,
    pub(crate) dynamic_anchor: Option<String>,
    pub(crate) vocabulary: Option<IndexMap<String, bool>>,
    pub(crate) comment: Option<String>,
    pub(crate) defs: Option<IndexMap<String, Schema>>,
}

impl CoreVocabulary {
    pub(crate) fn emit(&self, out: &mut Map<String, Value>) {
        let mut put = |name: &str, value: Option<Value>| {
            if let Some(value) = value {
                out.insert(denormalize_keyword(name), value);
            }
        };

        put("_id", self.id.clone().map(Value::String));
        put("_schema", self.dialect.clone().map(Value::String));
        put("_anchor", self.anchor.clone().map(Value::String));
        put("_ref", self.reference.clone().map(Value::String));
        put("_dynamicRef", self.dynamic_reference.clone().map(Value::String));
        put("_dynamicAnchor", self.dynamic_anchor.clone().map(Value::String));
        put(
            "_vocabulary",
            self.vocabulary.as_ref().map(|vocabulary| {
                Value::Object(
                    vocabulary
                        .iter()
                        .map(|(uri, required)| (uri.clone(), Value::Bool(*required)))
                        .collect(),
                )
            }),
        );
        put("_comment", self.comment.clone().map(Value::String));
        put(
            "_defs",
            self.defs.as_ref().map(|defs| {
                Value::Object(
                    defs.iter()
                        .map(|(name, schema)| (name.clone(), schema.to_value()))
                        .collect(),
                )
            }),
        );
    }
}

impl Schema {
    pub fn id(&self) -> Option<String> {
        self.resolved().and_then(|node| node.inner().core.id.clone())
    }

    pub fn has_id(&self) -> bool {
        self.id().is_some()
    }

    /// The `$schema` keyword: the dialect this schema is written in.
    pub fn dialect(&self) -> Option<String> {
        self.resolved().and_then(|node| node.inner().core.dialect.clone())
    }

    pub fn has_dialect(&self) -> bool {
        self.dialect().is_some()
    }

    pub fn anchor(&self) -> Option<String> {
        self.resolved().and_then(|node| node.inner().core.anchor.clone())
    }

    pub fn has_anchor(&self) -> bool {
        self.anchor().is_some()
    }

    /// The `$ref` keyword. Read from this node itself, never through the
    /// indirection it denotes.
    pub fn ref_path(&self) -> Option<String> {
        self.inner().core.reference.clone()
    }

    pub fn has_ref(&self) -> bool {
        self.inner().core.reference.is_some()
    }

    /// The `$dynamicRef` keyword, also read from this node itself.
    pub fn dynamic_ref(&self) -> Option<String> {
        self.inner().core.dynamic_reference.clone()
    }

    pub fn has_dynamic_ref(&self) -> bool {
        self.inner().core.dynamic_reference.is_some()
    }

    pub fn dynamic_anchor(&self) -> Option<String> {
        self.resolved()
            .and_then(|node| node.inner().core.dynamic_anchor.clone())
    }

    pub fn has_dynamic_anchor(&self) -> bool {
        self.dynamic_anchor().is_some()
    }

    pub fn vocabulary(&self) -> Option<IndexMap<String, bool>> {
        self.resolved()
            .and_then(|node| node.inner().core.vocabulary.clone())
    }

    pub fn has_vocabulary(&self) -> bool {
        self.vocabulary().is_some()
    }

    pub fn comment(&self) -> Option<String> {
        self.resolved().and_then(|node| node.inner().core.comment.clone())
    }

    pub fn has_comment(&self) -> bool {
        self.comment().is_some()
    }

    pub fn defs(&self) -> Option<IndexMap<String, Schema>> {
        self.resolved().and_then(|node| node.inner().core.defs.clone())
    }

    pub fn has_defs(&self) -> bool {
        self.defs().is_some()
    }
}
