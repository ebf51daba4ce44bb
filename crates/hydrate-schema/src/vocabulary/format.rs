//! Format vocabulary.

use serde_json::{Map, Value};

use crate::node::Schema;

#[derive(Default, Clone)]
pub(crate) struct FormatVocabulary {
    pub(crate) format: Option<String>,
}

impl FormatVocabulary {
    pub(crate) fn emit(&self, out: &mut Map<String, Value>) {
        if let Some(format) = &self.format {
            out.insert("format".into(), Value::String(format.clone()));
        }
    }
}

impl Schema {
    pub fn format(&self) -> Option<String> {
        self.resolved().and_then(|node| node.inner().format.format.clone())
    }

    pub fn has_format(&self) -> bool {
        self.format().is_some()
    }
}
