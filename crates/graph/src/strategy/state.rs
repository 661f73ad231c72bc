use super::{others, patterns, DetectionStrategy};
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::types::{ComponentNode, Relationship, RelationshipMetadata};
use component_graph_protocol::RelationshipType;
use std::collections::BTreeSet;

/// Owner -> reader edges for local state.
///
/// A state identifier declared by one component (`const [user, setUser] = useState()`)
/// that shows up as an attribute of another component links the two. Components
/// declaring the same `sharedStateKeys` hint are linked at full strength; those edges
/// are oriented from the lexicographically smaller id so either side discovers the same edge.
pub struct StateDependencyStrategy {
    explicit_strength: f32,
    state_strength: f32,
}

impl StateDependencyStrategy {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            explicit_strength: config.explicit_strength,
            state_strength: config.state_strength,
        }
    }

    fn correlate(
        &self,
        owner: &ComponentNode,
        owned: &BTreeSet<String>,
        reader: &ComponentNode,
    ) -> Option<Relationship> {
        let state_keys: Vec<String> = owned
            .iter()
            .filter(|key| reader.attributes.contains_key(*key))
            .cloned()
            .collect();
        if state_keys.is_empty() {
            return None;
        }
        Some(
            Relationship::new(
                &owner.id,
                &reader.id,
                RelationshipType::StateDependency,
                self.state_strength,
            )
            .with_metadata(RelationshipMetadata {
                state_keys,
                ..Default::default()
            }),
        )
    }

    fn shared_hint(&self, node: &ComponentNode, other: &ComponentNode) -> Option<Relationship> {
        // Sorted so the edge does not depend on which side ran detection.
        let state_keys: Vec<String> = node
            .explicit_hints
            .shared_state_keys
            .iter()
            .filter(|key| other.explicit_hints.shared_state_keys.contains(*key))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if state_keys.is_empty() {
            return None;
        }
        let (source, target) = if node.id <= other.id {
            (&node.id, &other.id)
        } else {
            (&other.id, &node.id)
        };
        Some(
            Relationship::new(
                source,
                target,
                RelationshipType::StateDependency,
                self.explicit_strength,
            )
            .with_metadata(RelationshipMetadata {
                state_keys,
                note: Some("declared shared state".to_string()),
                ..Default::default()
            }),
        )
    }
}

impl DetectionStrategy for StateDependencyStrategy {
    fn name(&self) -> &str {
        "state-dependency"
    }

    fn detect(
        &self,
        node: &ComponentNode,
        all_nodes: &[&ComponentNode],
    ) -> Result<Vec<Relationship>> {
        let own_state = patterns::state_identifiers(&node.structural_text);
        let mut found = Vec::new();

        for other in others(node, all_nodes) {
            found.extend(self.shared_hint(node, other));
            found.extend(self.correlate(node, &own_state, other));

            let other_state = patterns::state_identifiers(&other.structural_text);
            found.extend(self.correlate(other, &other_state, node));
        }

        Ok(found)
    }
}
