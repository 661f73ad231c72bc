use crate::config::{GraphConfig, LimitsConfig};
use crate::diagnostics::Diagnostics;
use crate::error::GraphError;
use crate::store::GraphStore;
use crate::strategy::{default_strategies, DetectionStrategy};
use crate::types::{ComponentNode, EdgeUpsert, Relationship};
use component_graph_protocol::{ComponentSummary, RelationshipChange, RelationshipType};
use std::any::Any;
use std::collections::{HashSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};

/// Receiver of the notification emitted after every detection pass
pub trait ChangeListener: Send + Sync {
    fn relationships_changed(&self, change: &RelationshipChange);
}

impl<F> ChangeListener for F
where
    F: Fn(&RelationshipChange) + Send + Sync,
{
    fn relationships_changed(&self, change: &RelationshipChange) {
        self(change)
    }
}

/// Orchestrates registration, detection and summaries over a [`GraphStore`].
///
/// All structural mutation goes through `&mut self`; hosts that mutate from
/// several call sites wrap the manager in [`crate::SharedComponentGraph`].
pub struct RelationshipManager {
    store: GraphStore,
    strategies: Vec<Box<dyn DetectionStrategy>>,
    listeners: Vec<Box<dyn ChangeListener>>,
    diagnostics: Diagnostics,
    limits: LimitsConfig,
}

impl Default for RelationshipManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationshipManager {
    /// Manager with no strategies registered
    pub fn new() -> Self {
        Self {
            store: GraphStore::new(),
            strategies: Vec::new(),
            listeners: Vec::new(),
            diagnostics: Diagnostics::default(),
            limits: LimitsConfig::default(),
        }
    }

    /// Manager with the built-in strategies and limits from `config`
    pub fn with_default_strategies(config: &GraphConfig) -> Self {
        Self {
            strategies: default_strategies(&config.detection),
            limits: config.limits.clone(),
            ..Self::new()
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Append a strategy; one with the same name is replaced in place
    pub fn register_strategy(&mut self, strategy: Box<dyn DetectionStrategy>) {
        if let Some(slot) = self
            .strategies
            .iter_mut()
            .find(|existing| existing.name() == strategy.name())
        {
            log::debug!("Replacing detection strategy '{}'", strategy.name());
            *slot = strategy;
        } else {
            self.strategies.push(strategy);
        }
    }

    pub fn unregister_strategy(&mut self, name: &str) -> bool {
        let before = self.strategies.len();
        self.strategies.retain(|strategy| strategy.name() != name);
        before != self.strategies.len()
    }

    /// Registered strategy names in execution order
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Insert a component or refresh its cached data. Edges are kept; call
    /// [`Self::detect`] with `force_redetect` to rebuild them.
    /// Returns `false` when the component was rejected by the node limit.
    pub fn register_component(&mut self, node: ComponentNode) -> bool {
        if let Some(limit) = self.limits.max_nodes {
            if !self.store.contains(&node.id) && self.store.node_count() >= limit {
                self.diagnostics
                    .report_error(&GraphError::CapacityExceeded { limit });
                return false;
            }
        }

        let id = node.id.clone();
        if self.store.add_or_update_node(node) {
            log::debug!("Registered component {id}");
        } else {
            log::debug!("Refreshed component {id}");
        }
        true
    }

    /// Remove a component and every edge touching it
    pub fn unregister_component(&mut self, id: &str) -> Option<ComponentNode> {
        self.store.remove_node(id)
    }

    pub fn component(&self, id: &str) -> Option<&ComponentNode> {
        self.store.node(id)
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentNode> + '_ {
        self.store.nodes()
    }

    /// Run every strategy for `id` and merge the results into the store.
    ///
    /// With `force_redetect`, every edge touching `id` is cleared first. A
    /// [`RelationshipChange`] is emitted afterwards whether or not anything changed;
    /// callers that care about changes diff the returned summaries themselves.
    pub fn detect(&mut self, id: &str, force_redetect: bool) -> ComponentSummary {
        if !self.store.contains(id) {
            self.diagnostics
                .report_error(&GraphError::NodeNotFound(id.to_string()));
        } else {
            if force_redetect {
                let cleared = self.store.remove_edges_touching(id);
                log::debug!("Cleared {cleared} edges of {id} before redetection");
            }

            let candidates = self.run_strategies(id);
            let mut inserted = 0usize;
            for relationship in candidates {
                if self.add_relationship(relationship) == Some(EdgeUpsert::Inserted) {
                    inserted += 1;
                }
            }
            log::debug!("Detection for {id} inserted {inserted} new edges");
        }

        let summary = self.compute_summary(id);
        self.notify(id, &summary);
        summary
    }

    /// Detect every registered component in storage order
    pub fn detect_all(&mut self, force_redetect: bool) -> usize {
        let ids: Vec<String> = self
            .store
            .node_ids()
            .into_iter()
            .map(str::to_string)
            .collect();
        for id in &ids {
            self.detect(id, force_redetect);
        }
        ids.len()
    }

    /// Insert or merge one edge. Returns `None` (after reporting) when rejected.
    pub fn add_relationship(&mut self, relationship: Relationship) -> Option<EdgeUpsert> {
        match self.store.add_edge(relationship) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                self.diagnostics.report_error(&err);
                None
            }
        }
    }

    /// Remove `source -> target` edges; `kind = None` removes every type
    pub fn remove_relationship(
        &mut self,
        source: &str,
        target: &str,
        kind: Option<RelationshipType>,
    ) -> usize {
        self.store.remove_edge(source, target, kind)
    }

    /// Every stored edge touching `id`
    pub fn relationships_of(&self, id: &str) -> Vec<&Relationship> {
        self.store.all_edges(id)
    }

    /// Derived view of the edges touching `id`. Every list is deduplicated.
    pub fn compute_summary(&self, id: &str) -> ComponentSummary {
        let mut summary = ComponentSummary::default();

        for edge in self.store.out_edges(id) {
            if edge.target == id {
                continue;
            }
            match edge.kind {
                RelationshipType::ParentChild => push_unique(&mut summary.children, &edge.target),
                kind if kind.is_dependency() => {
                    push_unique(&mut summary.depended_on_by, &edge.target)
                }
                _ => {}
            }
        }

        for edge in self.store.in_edges(id) {
            if edge.source == id {
                continue;
            }
            match edge.kind {
                RelationshipType::ParentChild => {
                    for sibling in self.store.out_edges(&edge.source) {
                        if sibling.kind == RelationshipType::ParentChild && sibling.target != id {
                            push_unique(&mut summary.siblings, &sibling.target);
                        }
                    }
                }
                kind if kind.is_dependency() => push_unique(&mut summary.depends_on, &edge.source),
                _ => {}
            }
        }

        for edge in self.store.all_edges(id) {
            if edge.kind == RelationshipType::StateDependency {
                for key in &edge.metadata.state_keys {
                    push_unique(&mut summary.shared_state_keys, key);
                }
            }
        }

        summary
    }

    /// Components reachable from `id` over edges in either direction, excluding `id`.
    /// Without `recursive` only direct neighbors are returned.
    pub fn affected_components(&self, id: &str, recursive: bool) -> Vec<String> {
        if !recursive {
            return self
                .store
                .neighbors(id)
                .into_iter()
                .map(str::to_string)
                .collect();
        }

        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut queue: VecDeque<&str> = VecDeque::from([id]);
        let mut affected = Vec::new();

        while let Some(current) = queue.pop_front() {
            for neighbor in self.store.neighbors(current) {
                if visited.insert(neighbor) {
                    affected.push(neighbor.to_string());
                    queue.push_back(neighbor);
                }
            }
        }

        affected
    }

    /// Drop every component and edge. Strategies and listeners stay registered.
    pub fn reset(&mut self) {
        self.store.reset();
        log::debug!("Component graph reset");
    }

    fn run_strategies(&self, id: &str) -> Vec<Relationship> {
        let Some(node) = self.store.node(id) else {
            return Vec::new();
        };
        let all_nodes: Vec<&ComponentNode> = self.store.nodes().collect();

        let mut candidates = Vec::new();
        for strategy in &self.strategies {
            let detected = panic::catch_unwind(AssertUnwindSafe(|| {
                strategy.detect(node, &all_nodes)
            }));
            let err = match detected {
                Ok(Ok(found)) => {
                    candidates.extend(found);
                    continue;
                }
                Ok(Err(err @ GraphError::Strategy { .. })) => err,
                Ok(Err(other)) => GraphError::strategy(strategy.name(), id, other.to_string()),
                Err(payload) => GraphError::strategy(
                    strategy.name(),
                    id,
                    format!("panicked: {}", panic_message(payload.as_ref())),
                ),
            };
            self.diagnostics.report_error(&err);
        }
        candidates
    }

    fn notify(&self, id: &str, summary: &ComponentSummary) {
        if self.listeners.is_empty() {
            return;
        }
        let change = RelationshipChange {
            component_id: id.to_string(),
            summary: summary.clone(),
        };
        for listener in &self.listeners {
            listener.relationships_changed(&change);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
