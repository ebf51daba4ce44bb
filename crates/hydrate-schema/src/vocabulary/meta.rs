//! Meta-data vocabulary: annotations that describe a schema without
//! constraining instances.

use serde_json::{Map, Value};

use crate::node::Schema;

#[derive(Default, Clone)]
pub(crate) struct MetaVocabulary {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) deprecated: Option<bool>,
    pub(crate) read_only: Option<bool>,
    pub(crate) write_only: Option<bool>,
    pub(crate) examples: Option<Vec<Value>>,
}

impl MetaVocabulary {
    pub(crate) fn emit(&self, out: &mut Map<String, Value>) {
        if let Some(title) = &self.title {
            out.insert("title".into(), Value::String(title.clone()));
        }
        if let Some(description) = &self.description {
            out.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(default) = &self.default {
            out.insert("default".into(), default.clone());
        }
        if let Some(deprecated) = self.deprecated {
            out.insert("deprecated".into(), Value::Bool(deprecated));
        }
        if let Some(read_only) = self.read_only {
            out.insert("readOnly".into(), Value::Bool(read_only));
        }
        if let Some(write_only) = self.write_only {
            out.insert("writeOnly".into(), Value::Bool(write_only));
        }
        if let Some(examples) = &self.examples {
            out.insert("examples".into(), Value::Array(examples.clone()));
        }
    }
}

impl Schema {
    pub fn title(&self) -> Option<String> {
        self.resolved().and_then(|node| node.inner().meta.title.clone())
    }

    pub fn has_title(&self) -> bool {
        self.title().is_some()
    }

    pub fn description(&self) -> Option<String> {
        self.resolved()
            .and_then(|node| node.inner().meta.description.clone())
    }

    pub fn has_description(&self) -> bool {
        self.description().is_some()
    }

    pub fn default_value(&self) -> Option<Value> {
        self.resolved().and_then(|node| node.inner().meta.default.clone())
    }

    pub fn has_default(&self) -> bool {
        self.default_value().is_some()
    }

    pub fn deprecated(&self) -> Option<bool> {
        self.resolved().and_then(|node| node.inner().meta.deprecated)
    }

    pub fn has_deprecated(&self) -> bool {
        self.deprecated().is_some()
    }

    /// Whether the schema is deprecated, with the keyword default applied.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated().unwrap_or(false)
    }

    pub fn read_only(&self) -> Option<bool> {
        self.resolved().and_then(|node| node.inner().meta.read_only)
    }

    pub fn has_read_only(&self) -> bool {
        self.read_only().is_some()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only().unwrap_or(false)
    }

    pub fn write_only(&self) -> Option<bool> {
        self.resolved().and_then(|node| node.inner().meta.write_only)
    }

    pub fn has_write_only(&self) -> bool {
        self.write_only().is_some()
    }

    pub fn is_write_only(&self) -> bool {
        self.write_only().unwrap_or(false)
    }

    pub fn examples(&self) -> Option<Vec<Value>> {
        self.resolved().and_then(|node| node.inner().meta.examples.clone())
    }

    pub fn has_examples(&self) -> bool {
        self.examples().is_some()
    }
}
