use crate::analyzer::GraphAnalyzer;
use crate::config::GraphConfig;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::exporter::VisualizationExporter;
use crate::manager::RelationshipManager;
use crate::types::ComponentNode;
use component_graph_protocol::ComponentSummary;

/// Manager plus config, handing out analyzer and exporter views over the same store.
///
/// Delegation only: the three collaborators stay constructible on their own.
pub struct ComponentGraph {
    manager: RelationshipManager,
    config: GraphConfig,
}

impl Default for ComponentGraph {
    fn default() -> Self {
        let config = GraphConfig::default();
        Self {
            manager: RelationshipManager::with_default_strategies(&config),
            config,
        }
    }
}

impl ComponentGraph {
    pub fn new(config: GraphConfig) -> Result<Self> {
        Self::with_diagnostics(config, Diagnostics::default())
    }

    pub fn with_diagnostics(config: GraphConfig, diagnostics: Diagnostics) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            manager: RelationshipManager::with_default_strategies(&config)
                .with_diagnostics(diagnostics),
            config,
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn manager(&self) -> &RelationshipManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut RelationshipManager {
        &mut self.manager
    }

    pub fn analyzer(&self) -> GraphAnalyzer<'_> {
        GraphAnalyzer::new(self.manager.store()).with_diagnostics(self.manager.diagnostics().clone())
    }

    pub fn exporter(&self) -> VisualizationExporter<'_> {
        VisualizationExporter::new(self.manager.store())
    }

    /// Register `node` and rebuild its edges from scratch.
    /// `None` when the node limit rejected the registration.
    pub fn register_and_detect(&mut self, node: ComponentNode) -> Option<ComponentSummary> {
        let id = node.id.clone();
        if !self.manager.register_component(node) {
            return None;
        }
        Some(self.manager.detect(&id, true))
    }

    pub fn unregister(&mut self, id: &str) -> Option<ComponentNode> {
        self.manager.unregister_component(id)
    }

    pub fn summary(&self, id: &str) -> ComponentSummary {
        self.manager.compute_summary(id)
    }

    pub fn reset(&mut self) {
        self.manager.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = GraphConfig::default();
        config.detection.prop_strength = 1.5;

        assert!(matches!(
            ComponentGraph::new(config),
            Err(GraphError::InvalidConfig(_))
        ));
    }

    #[test]
    fn views_share_the_managed_store() {
        let mut graph = ComponentGraph::default();
        graph.register_and_detect(ComponentNode::new("page", "Page"));
        graph.register_and_detect(ComponentNode::new("card", "Card").parent("page"));

        assert_eq!(graph.summary("page").children, vec!["card"]);
        assert_eq!(graph.analyzer().shortest_path("card", "page").len(), 2);
        assert_eq!(graph.exporter().export_graph().edges.len(), 1);

        graph.reset();
        assert!(graph.manager().store().is_empty());
    }
}
