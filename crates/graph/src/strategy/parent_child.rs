use super::{others, patterns, DetectionStrategy};
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::types::{ComponentNode, Relationship, RelationshipMetadata};
use component_graph_protocol::RelationshipType;

/// Containment: declared parent/children hints plus `<Child` tags in the parent's text
pub struct ParentChildStrategy {
    explicit_strength: f32,
    containment_strength: f32,
}

impl ParentChildStrategy {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            explicit_strength: config.explicit_strength,
            containment_strength: config.containment_strength,
        }
    }

    fn declared(&self, parent: &str, child: &str) -> Relationship {
        Relationship::new(parent, child, RelationshipType::ParentChild, self.explicit_strength)
            .with_metadata(RelationshipMetadata::note("declared"))
    }

    fn rendered(&self, parent: &ComponentNode, child: &ComponentNode) -> Relationship {
        Relationship::new(
            &parent.id,
            &child.id,
            RelationshipType::ParentChild,
            self.containment_strength,
        )
        .with_metadata(RelationshipMetadata::note(format!(
            "renders <{}>",
            child.name
        )))
    }
}

impl DetectionStrategy for ParentChildStrategy {
    fn name(&self) -> &str {
        "parent-child"
    }

    fn detect(
        &self,
        node: &ComponentNode,
        all_nodes: &[&ComponentNode],
    ) -> Result<Vec<Relationship>> {
        let mut found = Vec::new();
        let hints = &node.explicit_hints;

        if let Some(parent) = hints.parent_id.as_deref().filter(|p| *p != node.id) {
            found.push(self.declared(parent, &node.id));
        }
        for child in hints.children_ids.iter().filter(|c| **c != node.id) {
            found.push(self.declared(&node.id, child));
        }

        let own_tags = patterns::opening_tags(&node.structural_text);
        for other in others(node, all_nodes) {
            let other_hints = &other.explicit_hints;
            if other_hints.parent_id.as_deref() == Some(node.id.as_str()) {
                found.push(self.declared(&node.id, &other.id));
            }
            if other_hints.children_ids.iter().any(|c| *c == node.id) {
                found.push(self.declared(&other.id, &node.id));
            }

            if own_tags.iter().any(|tag| tag.name == other.name) {
                found.push(self.rendered(node, other));
            }
            if patterns::attributes_passed_to(&other.structural_text, &node.name).is_some() {
                found.push(self.rendered(other, node));
            }
        }

        Ok(found)
    }
}
