//! Pluggable relationship detection.
//!
//! Each strategy inspects one relationship dimension of a component against the
//! full registered set and returns candidate edges. Strategies hold no state
//! beyond their configured strengths and never touch the store; the manager
//! merges their output.

mod context;
mod event;
mod parent_child;
pub mod patterns;
mod prop;
mod state;

pub use context::ContextDependencyStrategy;
pub use event::EventDependencyStrategy;
pub use parent_child::ParentChildStrategy;
pub use prop::PropDependencyStrategy;
pub use state::StateDependencyStrategy;

use crate::config::DetectionConfig;
use crate::error::Result;
use crate::types::{ComponentNode, Relationship};

pub trait DetectionStrategy: Send + Sync {
    /// Stable name used for registration, removal and diagnostics
    fn name(&self) -> &str;

    /// Candidate relationships involving `node`. `all_nodes` includes `node` itself.
    fn detect(&self, node: &ComponentNode, all_nodes: &[&ComponentNode])
        -> Result<Vec<Relationship>>;
}

/// Built-in strategies in their default execution order
pub fn default_strategies(config: &DetectionConfig) -> Vec<Box<dyn DetectionStrategy>> {
    vec![
        Box::new(ParentChildStrategy::new(config)),
        Box::new(PropDependencyStrategy::new(config)),
        Box::new(StateDependencyStrategy::new(config)),
        Box::new(ContextDependencyStrategy::new(config)),
        Box::new(EventDependencyStrategy::new(config)),
    ]
}

/// Every node except `node` itself
fn others<'a>(
    node: &'a ComponentNode,
    all_nodes: &'a [&'a ComponentNode],
) -> impl Iterator<Item = &'a ComponentNode> + 'a {
    all_nodes
        .iter()
        .copied()
        .filter(move |other| other.id != node.id)
}
