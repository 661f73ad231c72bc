use super::{others, patterns, DetectionStrategy};
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::types::{ComponentNode, Relationship, RelationshipMetadata};
use component_graph_protocol::RelationshipType;

/// Provider -> consumer edges for props.
///
/// Declared `dependsOnIds` hints give full-strength edges. Otherwise a provider that
/// renders `<Consumer attr=...>` for attributes the consumer declares yields a
/// partial-strength edge listing the matched attribute names. Event handler
/// attributes are left to [`super::EventDependencyStrategy`].
pub struct PropDependencyStrategy {
    explicit_strength: f32,
    prop_strength: f32,
}

impl PropDependencyStrategy {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            explicit_strength: config.explicit_strength,
            prop_strength: config.prop_strength,
        }
    }

    fn correlate(&self, provider: &ComponentNode, consumer: &ComponentNode) -> Option<Relationship> {
        let passed = patterns::attributes_passed_to(&provider.structural_text, &consumer.name)?;
        let props: Vec<String> = consumer
            .attributes
            .keys()
            .filter(|key| !patterns::is_event_handler(key) && passed.contains(*key))
            .cloned()
            .collect();
        if props.is_empty() {
            return None;
        }

        Some(
            Relationship::new(
                &provider.id,
                &consumer.id,
                RelationshipType::PropDependency,
                self.prop_strength,
            )
            .with_metadata(RelationshipMetadata {
                props,
                ..Default::default()
            }),
        )
    }

    fn declared(&self, provider: &str, consumer: &str) -> Relationship {
        Relationship::new(
            provider,
            consumer,
            RelationshipType::PropDependency,
            self.explicit_strength,
        )
        .with_metadata(RelationshipMetadata::note("declared dependency"))
    }
}

impl DetectionStrategy for PropDependencyStrategy {
    fn name(&self) -> &str {
        "prop-dependency"
    }

    fn detect(
        &self,
        node: &ComponentNode,
        all_nodes: &[&ComponentNode],
    ) -> Result<Vec<Relationship>> {
        let mut found: Vec<Relationship> = node
            .explicit_hints
            .depends_on_ids
            .iter()
            .filter(|dep| **dep != node.id)
            .map(|dep| self.declared(dep, &node.id))
            .collect();

        for other in others(node, all_nodes) {
            if other.explicit_hints.depends_on_ids.contains(&node.id) {
                found.push(self.declared(&node.id, &other.id));
            }
            found.extend(self.correlate(other, node));
            found.extend(self.correlate(node, other));
        }

        Ok(found)
    }
}
