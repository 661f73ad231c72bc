use super::{others, patterns, DetectionStrategy};
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::types::{ComponentNode, Relationship, RelationshipMetadata};
use component_graph_protocol::RelationshipType;

/// Provider -> consumer edges over shared context channels
/// (`<ThemeContext.Provider>` on one side, `useContext(ThemeContext)` on the other).
pub struct ContextDependencyStrategy {
    context_strength: f32,
}

impl ContextDependencyStrategy {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            context_strength: config.context_strength,
        }
    }

    fn correlate(&self, provider: &ComponentNode, consumer: &ComponentNode) -> Option<Relationship> {
        let consumed = patterns::consumed_contexts(&consumer.structural_text);
        let contexts: Vec<String> = patterns::provided_contexts(&provider.structural_text)
            .into_iter()
            .filter(|channel| consumed.contains(channel))
            .collect();
        if contexts.is_empty() {
            return None;
        }
        Some(
            Relationship::new(
                &provider.id,
                &consumer.id,
                RelationshipType::ContextDependency,
                self.context_strength,
            )
            .with_metadata(RelationshipMetadata {
                contexts,
                ..Default::default()
            }),
        )
    }
}

impl DetectionStrategy for ContextDependencyStrategy {
    fn name(&self) -> &str {
        "context-dependency"
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

    #[test]
    fn links_provider_to_every_consumer_of_the_channel() {
        let shell = ComponentNode::new("shell", "Shell").structural_text(
            "<ThemeContext.Provider value={theme}><AuthContext.Provider value={auth}>{children}</AuthContext.Provider></ThemeContext.Provider>",
        );
        let button = ComponentNode::new("button", "Button")
            .structural_text("const theme = useContext(ThemeContext);");
        let menu = ComponentNode::new("menu", "Menu").structural_text(
            "const t = useContext(ThemeContext); const a = useContext(AuthContext);",
        );
        let label = ComponentNode::new("label", "Label").structural_text("<span />");
        let all = [&shell, &button, &menu, &label];

        let found = ContextDependencyStrategy::new(&DetectionConfig::default())
            .detect(&shell, &all)
            .unwrap();

        let summary: Vec<(&str, Vec<String>)> = found
            .iter()
            .map(|r| (r.target.as_str(), r.metadata.contexts.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("button", vec!["ThemeContext".to_string()]),
                (
                    "menu",
                    vec!["AuthContext".to_string(), "ThemeContext".to_string()]
                ),
            ]
        );
        assert!(found.iter().all(|r| r.source == "shell" && r.strength == 0.85));
    }
}
