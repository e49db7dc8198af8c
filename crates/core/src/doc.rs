//! Documents served by the documents (`total`) endpoint.
//!
//! The documents screen edits whatever fields the server sends, so apart from
//! the id the record is kept as an open JSON object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::DocId;

/// A document row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    pub id: DocId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Doc {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Partial update for a document: the id addresses it, `changes` becomes the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPatch {
    pub id: DocId,
    pub changes: Map<String, Value>,
}

impl DocPatch {
    pub fn new(id: DocId) -> Self {
        Self {
            id,
            changes: Map::new(),
        }
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changes.insert(field.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_unknown_fields() {
        let doc: Doc = serde_json::from_value(serde_json::json!({
            "id": 4,
            "title": "Act 12",
            "signed": false
        }))
        .unwrap();
        assert_eq!(doc.id, DocId::new(4));
        assert_eq!(doc.field("title"), Some(&Value::from("Act 12")));

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["signed"], Value::from(false));
    }

    #[test]
    fn patch_builder_collects_changes() {
        let patch = DocPatch::new(DocId::new(4)).set("signed", true);
        assert_eq!(patch.changes.get("signed"), Some(&Value::from(true)));
    }
}
