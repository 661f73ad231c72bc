use component_graph_protocol::RelationshipType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Component payload supplied by the external registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// Unique component id
    pub id: String,

    /// Display name (e.g., "Dashboard"); also the tag name pattern detection looks for
    pub name: String,

    /// Component type tag (e.g., "component", "layout")
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    /// Serialized component source, only read by pattern detection
    #[serde(default)]
    pub structural_text: String,

    /// Props/attributes the component receives
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,

    /// Relationships declared by the registry itself
    #[serde(default, alias = "explicitRelationshipHints")]
    pub explicit_hints: RelationshipHints,
}

fn default_kind() -> String {
    "component".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipHints {
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children_ids: Vec<String>,
    #[serde(default)]
    pub depends_on_ids: Vec<String>,
    #[serde(default)]
    pub shared_state_keys: Vec<String>,
}

impl ComponentNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: default_kind(),
            structural_text: String::new(),
            attributes: BTreeMap::new(),
            explicit_hints: RelationshipHints::default(),
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn structural_text(mut self, text: impl Into<String>) -> Self {
        self.structural_text = text.into();
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.explicit_hints.parent_id = Some(parent_id.into());
        self
    }

    pub fn child(mut self, child_id: impl Into<String>) -> Self {
        self.explicit_hints.children_ids.push(child_id.into());
        self
    }

    pub fn depends_on(mut self, dependency_id: impl Into<String>) -> Self {
        self.explicit_hints.depends_on_ids.push(dependency_id.into());
        self
    }

    pub fn shared_state(mut self, key: impl Into<String>) -> Self {
        self.explicit_hints.shared_state_keys.push(key.into());
        self
    }
}

/// Open metadata attached to an edge. Re-adding an edge merges this instead of duplicating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipMetadata {
    /// Attribute names involved in a prop or event relationship
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<String>,

    /// Shared state identifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state_keys: Vec<String>,

    /// Context channel identifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,

    /// Event handler names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RelationshipMetadata {
    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Default::default()
        }
    }

    /// Union every list (first occurrence order), newest non-empty note wins,
    /// newer `extra` values overwrite older ones.
    pub fn merge(&mut self, other: RelationshipMetadata) {
        union_into(&mut self.props, other.props);
        union_into(&mut self.state_keys, other.state_keys);
        union_into(&mut self.contexts, other.contexts);
        union_into(&mut self.events, other.events);
        if let Some(note) = other.note.filter(|n| !n.trim().is_empty()) {
            self.note = Some(note);
        }
        self.extra.extend(other.extra);
    }
}

fn union_into(target: &mut Vec<String>, incoming: Vec<String>) {
    for value in incoming {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}

/// Typed, directed, weighted edge between two components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,

    #[serde(rename = "type")]
    pub kind: RelationshipType,

    /// Confidence in [0, 1]; 1.0 for declared relationships
    pub strength: f32,

    #[serde(default)]
    pub metadata: RelationshipMetadata,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationshipType,
        strength: f32,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            strength: strength.clamp(0.0, 1.0),
            metadata: RelationshipMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: RelationshipMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether this edge touches `id` in either direction
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    /// Identity of a stored edge: at most one edge per (source, target, type)
    pub fn key(&self) -> (&str, &str, RelationshipType) {
        (&self.source, &self.target, self.kind)
    }
}

/// Outcome of a successful `add_edge`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeUpsert {
    Inserted,
    Merged,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_unions_lists_without_duplicates() {
        let mut meta = RelationshipMetadata {
            props: vec!["title".to_string(), "size".to_string()],
            note: Some("first".to_string()),
            ..Default::default()
        };
        meta.merge(RelationshipMetadata {
            props: vec!["size".to_string(), "onClose".to_string()],
            note: Some("  ".to_string()),
            ..Default::default()
        });

        assert_eq!(meta.props, vec!["title", "size", "onClose"]);
        assert_eq!(meta.note.as_deref(), Some("first"));
    }

    #[test]
    fn merge_overwrites_extra_values() {
        let mut meta = RelationshipMetadata::default();
        meta.extra.insert("source".to_string(), serde_json::json!("pattern"));
        let mut newer = RelationshipMetadata::note("declared");
        newer.extra.insert("source".to_string(), serde_json::json!("hint"));

        meta.merge(newer);

        assert_eq!(meta.extra["source"], serde_json::json!("hint"));
        assert_eq!(meta.note.as_deref(), Some("declared"));
    }

    #[test]
    fn strength_is_clamped() {
        let rel = Relationship::new("a", "b", RelationshipType::Reference, 1.7);
        assert_eq!(rel.strength, 1.0);
        let rel = Relationship::new("a", "b", RelationshipType::Reference, -0.2);
        assert_eq!(rel.strength, 0.0);
    }

    #[test]
    fn registry_payload_accepts_camel_case_and_hint_alias() {
        let raw = serde_json::json!({
            "id": "card",
            "name": "Card",
            "structuralText": "<Button label={title} />",
            "attributes": {"title": "string"},
            "explicitRelationshipHints": {"parentId": "dashboard", "sharedStateKeys": ["user"]}
        });
        let node: ComponentNode = serde_json::from_value(raw).unwrap();

        assert_eq!(node.kind, "component");
        assert_eq!(node.explicit_hints.parent_id.as_deref(), Some("dashboard"));
        assert_eq!(node.explicit_hints.shared_state_keys, vec!["user"]);
        assert!(node.attributes.contains_key("title"));
    }
}
