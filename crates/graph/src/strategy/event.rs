use super::{others, patterns, DetectionStrategy};
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::types::{ComponentNode, Relationship, RelationshipMetadata};
use component_graph_protocol::RelationshipType;

/// Emitter -> listener edges: a parent binding `<Child onSelect={...}>` for a
/// handler the child declares listens to events the child raises.
pub struct EventDependencyStrategy {
    event_strength: f32,
}

impl EventDependencyStrategy {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            event_strength: config.event_strength,
        }
    }

    fn correlate(&self, listener: &ComponentNode, emitter: &ComponentNode) -> Option<Relationship> {
        let bound = patterns::attributes_passed_to(&listener.structural_text, &emitter.name)?;
        let events: Vec<String> = emitter
            .attributes
            .keys()
            .filter(|key| patterns::is_event_handler(key) && bound.contains(*key))
            .cloned()
            .collect();
        if events.is_empty() {
            return None;
        }
        Some(
            Relationship::new(
                &emitter.id,
                &listener.id,
                RelationshipType::EventDependency,
                self.event_strength,
            )
            .with_metadata(RelationshipMetadata {
                events,
                ..Default::default()
            }),
        )
    }
}

impl DetectionStrategy for EventDependencyStrategy {
    fn name(&self) -> &str {
        "event-dependency"
    }

    fn detect(
        &self,
        node: &ComponentNode,
        all_nodes: &[&ComponentNode],
    ) -> Result<Vec<Relationship>> {
        let mut found = Vec::new();
        for other in others(node, all_nodes) {
            found.extend(self.correlate(node, other));
            found.extend(self.correlate(other, node));
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn handler_binding_points_from_emitter_to_listener() {
        let form = ComponentNode::new("form", "Form")
            .structural_text("<Select value={v} onChange={setV} onBlur={touch} />");
        let select = ComponentNode::new("select", "Select")
            .attribute("value", json!("string"))
            .attribute("onChange", json!("fn"))
            .attribute("onBlur", json!("fn"))
            .attribute("onFocus", json!("fn"));

        let found = EventDependencyStrategy::new(&DetectionConfig::default())
            .detect(&select, &[&form, &select])
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, "select");
        assert_eq!(found[0].target, "form");
        assert_eq!(found[0].kind, RelationshipType::EventDependency);
        assert_eq!(found[0].metadata.events, vec!["onBlur", "onChange"]);
    }
}
