use crate::error::{GraphError, Result};
use crate::types::{ComponentNode, EdgeUpsert, Relationship};
use component_graph_protocol::RelationshipType;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Canonical node cache, edge list and adjacency for the component graph.
///
/// Edges and adjacency live in the same petgraph structure, so an edge can never
/// exist without its adjacency entry. `index` maps component ids to stable node
/// indices; removals never shift the indices of other nodes.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: StableDiGraph<ComponentNode, Relationship>,
    index: HashMap<String, NodeIndex>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node or overwrite the cached data of an existing one in place.
    /// Returns `true` when the node was newly inserted. Edges are untouched.
    pub fn add_or_update_node(&mut self, node: ComponentNode) -> bool {
        if let Some(&idx) = self.index.get(&node.id) {
            if let Some(slot) = self.graph.node_weight_mut(idx) {
                *slot = node;
                return false;
            }
            // Index pointed at a dead slot; drop it and re-insert below.
            log::error!("Node index entry for {} had no backing node", node.id);
            self.index.remove(&node.id);
        }

        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        true
    }

    /// Remove a node and every edge touching it, in both directions
    pub fn remove_node(&mut self, id: &str) -> Option<ComponentNode> {
        let incident = self.all_edges(id).len();
        let idx = self.index.remove(id)?;
        let node = self.graph.remove_node(idx);
        log::debug!("Removed component {id} and {incident} incident edges");
        node
    }

    /// Insert an edge, or merge metadata into the stored edge with the same
    /// (source, target, type). Rejected without any write when an endpoint is missing.
    pub fn add_edge(&mut self, relationship: Relationship) -> Result<EdgeUpsert> {
        let (Some(from), Some(to)) = (
            self.index.get(&relationship.source).copied(),
            self.index.get(&relationship.target).copied(),
        ) else {
            return Err(GraphError::MissingEndpoint {
                from: relationship.source,
                to: relationship.target,
                kind: relationship.kind,
            });
        };

        if let Some(existing) = self.find_edge(from, to, relationship.kind) {
            if let Some(stored) = self.graph.edge_weight_mut(existing) {
                stored.strength = stored.strength.max(relationship.strength);
                stored.metadata.merge(relationship.metadata);
                return Ok(EdgeUpsert::Merged);
            }
        }

        self.graph.add_edge(from, to, relationship);
        Ok(EdgeUpsert::Inserted)
    }

    /// Remove edges `source -> target`; `kind = None` removes every type for the pair.
    /// Returns the number of removed edges.
    pub fn remove_edge(
        &mut self,
        source: &str,
        target: &str,
        kind: Option<RelationshipType>,
    ) -> usize {
        let Some(&from) = self.index.get(source) else {
            return 0;
        };
        let doomed: Vec<EdgeIndex> = self
            .graph
            .edges_directed(from, Direction::Outgoing)
            .filter(|e| e.weight().target == target)
            .filter(|e| kind.map_or(true, |k| e.weight().kind == k))
            .map(|e| e.id())
            .collect();

        doomed
            .into_iter()
            .filter_map(|e| self.graph.remove_edge(e))
            .count()
    }

    /// Remove every edge touching `id` (both directions) while keeping the node
    pub fn remove_edges_touching(&mut self, id: &str) -> usize {
        let Some(&idx) = self.index.get(id) else {
            return 0;
        };
        let doomed: HashSet<EdgeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();

        doomed
            .into_iter()
            .filter_map(|e| self.graph.remove_edge(e))
            .count()
    }

    /// Outgoing edges of `id`, in edge storage order
    pub fn out_edges(&self, id: &str) -> Vec<&Relationship> {
        self.directed_edges(id, Direction::Outgoing)
    }

    /// Incoming edges of `id`, in edge storage order
    pub fn in_edges(&self, id: &str) -> Vec<&Relationship> {
        self.directed_edges(id, Direction::Incoming)
    }

    /// Outgoing ∪ incoming edges; a self-loop is reported once
    pub fn all_edges(&self, id: &str) -> Vec<&Relationship> {
        let mut edges = self.out_edges(id);
        edges.extend(self.in_edges(id).into_iter().filter(|e| e.source != id));
        edges
    }

    /// Undirected neighbor view: outgoing targets and incoming sources, deduplicated,
    /// ordered by the storage slot of the connecting edge. Never contains `id`.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };

        let mut touching: Vec<(EdgeIndex, &str)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.weight().target.as_str()))
            .chain(
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .map(|e| (e.id(), e.weight().source.as_str())),
            )
            .collect();
        touching.sort_by_key(|(edge, _)| *edge);

        let mut seen = HashSet::new();
        touching
            .into_iter()
            .map(|(_, other)| other)
            .filter(|other| *other != id && seen.insert(*other))
            .collect()
    }

    pub fn neighbor_count(&self, id: &str) -> usize {
        self.neighbors(id).len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&ComponentNode> {
        self.index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// All nodes in stable storage order
    pub fn nodes(&self) -> impl Iterator<Item = &ComponentNode> + '_ {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx))
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes().map(|node| node.id.as_str()).collect()
    }

    /// Every stored edge in storage order
    pub fn edges(&self) -> impl Iterator<Item = &Relationship> + '_ {
        self.graph
            .edge_indices()
            .filter_map(move |e| self.graph.edge_weight(e))
    }

    /// Stored edge for (source, target, type), if any
    pub fn edge(&self, source: &str, target: &str, kind: RelationshipType) -> Option<&Relationship> {
        let from = *self.index.get(source)?;
        let to = *self.index.get(target)?;
        self.find_edge(from, to, kind)
            .and_then(|e| self.graph.edge_weight(e))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Drop every node and edge
    pub fn reset(&mut self) {
        self.graph.clear();
        self.index.clear();
    }

    /// Verify internal invariants. A failure indicates a defect in this engine.
    pub fn check_consistency(&self) -> Result<()> {
        if self.index.len() != self.graph.node_count() {
            return Err(GraphError::consistency(format!(
                "index tracks {} ids but graph holds {} nodes",
                self.index.len(),
                self.graph.node_count()
            )));
        }

        for (id, &idx) in &self.index {
            match self.graph.node_weight(idx) {
                Some(node) if node.id == *id => {}
                Some(node) => {
                    return Err(GraphError::consistency(format!(
                        "index entry {id} points at node {}",
                        node.id
                    )))
                }
                None => {
                    return Err(GraphError::consistency(format!(
                        "known node {id} missing from adjacency"
                    )))
                }
            }
        }

        let mut keys = HashSet::new();
        for e in self.graph.edge_indices() {
            let (Some((from, to)), Some(rel)) =
                (self.graph.edge_endpoints(e), self.graph.edge_weight(e))
            else {
                return Err(GraphError::consistency("edge without endpoints"));
            };
            if self.index.get(&rel.source) != Some(&from) || self.index.get(&rel.target) != Some(&to)
            {
                return Err(GraphError::consistency(format!(
                    "edge {} -> {} stored between mismatched endpoints",
                    rel.source, rel.target
                )));
            }
            if !keys.insert(rel.key()) {
                return Err(GraphError::consistency(format!(
                    "duplicate edge {} -> {} ({})",
                    rel.source, rel.target, rel.kind
                )));
            }
        }

        Ok(())
    }

    fn find_edge(&self, from: NodeIndex, to: NodeIndex, kind: RelationshipType) -> Option<EdgeIndex> {
        self.graph
            .edges_directed(from, Direction::Outgoing)
            .find(|e| e.target() == to && e.weight().kind == kind)
            .map(|e| e.id())
    }

    fn directed_edges(&self, id: &str, direction: Direction) -> Vec<&Relationship> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut edges: Vec<(EdgeIndex, &Relationship)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| (e.id(), e.weight()))
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, rel)| rel).collect()
    }
}
