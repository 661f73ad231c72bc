use crate::store::GraphStore;
use crate::types::{ComponentNode, Relationship};
use component_graph_protocol::{
    AdjacencyMatrix, EdgeView, GraphSnapshot, GraphStatistics, HierarchyNode, Legend,
    LegendEntry, NodeView, RelationshipType,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Subtree under construction: finished children are appended to `node` as they pop.
struct HierarchyFrame<'a> {
    node: HierarchyNode,
    children: Vec<&'a ComponentNode>,
    cursor: usize,
}

/// Read-only transforms into the wire shapes consumed by visualization UIs
pub struct VisualizationExporter<'a> {
    store: &'a GraphStore,
}

impl<'a> VisualizationExporter<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    pub fn export_graph(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.store.nodes().map(|node| self.node_view(node)).collect(),
            edges: self.store.edges().map(edge_view).collect(),
        }
    }

    /// `id`, its direct neighbors, and the edges touching `id`
    pub fn export_focused(&self, id: &str) -> GraphSnapshot {
        let Some(center) = self.store.node(id) else {
            return GraphSnapshot::default();
        };

        let mut nodes = vec![self.node_view(center)];
        nodes.extend(
            self.store
                .neighbors(id)
                .into_iter()
                .filter_map(|neighbor| self.store.node(neighbor))
                .map(|node| self.node_view(node)),
        );

        GraphSnapshot {
            nodes,
            edges: self
                .store
                .all_edges(id)
                .into_iter()
                .map(edge_view)
                .collect(),
        }
    }

    /// Tree over parent-child edges rooted at `root_id`. A child already on the
    /// current branch is cut instead of being expanded again.
    pub fn export_hierarchy(&self, root_id: &str) -> Option<HierarchyNode> {
        let root = self.store.node(root_id)?;
        let mut on_branch: HashSet<&str> = HashSet::from([root.id.as_str()]);
        let mut frames = vec![self.hierarchy_frame(root)];

        while let Some(frame) = frames.last_mut() {
            if let Some(&child) = frame.children.get(frame.cursor) {
                frame.cursor += 1;
                if on_branch.insert(child.id.as_str()) {
                    frames.push(self.hierarchy_frame(child));
                }
                continue;
            }

            let finished = frames.pop()?;
            on_branch.remove(finished.node.id.as_str());
            match frames.last_mut() {
                Some(parent) => parent.node.children.push(finished.node),
                None => return Some(finished.node),
            }
        }

        None
    }

    fn hierarchy_frame(&self, node: &'a ComponentNode) -> HierarchyFrame<'a> {
        let children = self
            .store
            .out_edges(&node.id)
            .into_iter()
            .filter(|edge| edge.kind == RelationshipType::ParentChild)
            .filter_map(|edge| self.store.node(&edge.target))
            .collect();

        HierarchyFrame {
            node: HierarchyNode {
                id: node.id.clone(),
                name: node.name.clone(),
                kind: node.kind.clone(),
                children: Vec::new(),
            },
            children,
            cursor: 0,
        }
    }

    /// Square matrix in storage order. A cell holds the strength of the strongest
    /// edge `row -> column` over all relationship types, `0.0` when absent.
    pub fn export_adjacency_matrix(&self) -> AdjacencyMatrix {
        let nodes: Vec<String> = self.store.nodes().map(|node| node.id.clone()).collect();
        let position: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut matrix = vec![vec![0.0_f32; nodes.len()]; nodes.len()];
        for edge in self.store.edges() {
            if let (Some(&row), Some(&col)) = (
                position.get(edge.source.as_str()),
                position.get(edge.target.as_str()),
            ) {
                matrix[row][col] = matrix[row][col].max(edge.strength);
            }
        }

        AdjacencyMatrix { nodes, matrix }
    }

    /// Relationship types present in the graph with their counts
    pub fn export_legend(&self) -> Legend {
        let counts = self.counts_by_type();
        Legend {
            entries: RelationshipType::ALL
                .iter()
                .filter_map(|kind| {
                    counts.get(kind).map(|&count| LegendEntry {
                        kind: *kind,
                        count,
                        description: kind.description().to_string(),
                    })
                })
                .collect(),
        }
    }

    pub fn export_statistics(&self) -> GraphStatistics {
        let node_count = self.store.node_count();
        let edge_count = self.store.edge_count();
        let (average_degree, density) = if node_count == 0 {
            (0.0, 0.0)
        } else {
            let n = node_count as f32;
            let density = if node_count > 1 {
                edge_count as f32 / (n * (n - 1.0))
            } else {
                0.0
            };
            (2.0 * edge_count as f32 / n, density)
        };

        GraphStatistics {
            node_count,
            edge_count,
            edges_by_type: self.counts_by_type(),
            average_degree,
            density,
        }
    }

    fn counts_by_type(&self) -> BTreeMap<RelationshipType, usize> {
        let mut counts = BTreeMap::new();
        for edge in self.store.edges() {
            *counts.entry(edge.kind).or_insert(0) += 1;
        }
        counts
    }

    fn node_view(&self, node: &ComponentNode) -> NodeView {
        NodeView {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind.clone(),
            neighbor_count: self.store.neighbor_count(&node.id),
        }
    }
}

fn edge_view(edge: &Relationship) -> EdgeView {
    EdgeView {
        source: edge.source.clone(),
        target: edge.target.clone(),
        kind: edge.kind,
        strength: edge.strength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> GraphStore {
        let mut store = GraphStore::new();
        for (id, kind) in [("app", "page"), ("nav", "component"), ("item", "component")] {
            store.add_or_update_node(ComponentNode::new(id, id.to_uppercase()).kind(kind));
        }
        let edges = [
            ("app", "nav", RelationshipType::ParentChild, 1.0),
            ("nav", "item", RelationshipType::ParentChild, 0.8),
            ("item", "app", RelationshipType::ParentChild, 0.8),
            ("app", "item", RelationshipType::PropDependency, 0.8),
            ("app", "item", RelationshipType::StateDependency, 0.9),
        ];
        for (source, target, kind, strength) in edges {
            store
                .add_edge(Relationship::new(source, target, kind, strength))
                .unwrap();
        }
        store
    }

    #[test]
    fn graph_snapshot_uses_wire_field_names() {
        let store = sample();
        let snapshot = VisualizationExporter::new(&store).export_graph();
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(
            value["nodes"][0],
            json!({ "id": "app", "name": "APP", "type": "page", "neighborCount": 2 })
        );
        assert_eq!(
            value["edges"][0],
            json!({ "source": "app", "target": "nav", "type": "parent-child", "strength": 1.0 })
        );
        assert_eq!(snapshot.edges.len(), 5);
    }

    #[test]
    fn hierarchy_cuts_reentrant_branches() {
        let store = sample();
        let tree = VisualizationExporter::new(&store)
            .export_hierarchy("app")
            .unwrap();

        assert_eq!(tree.size(), 3);
        assert_eq!(tree.children[0].id, "nav");
        assert_eq!(tree.children[0].children[0].id, "item");
        assert!(tree.children[0].children[0].children.is_empty());
        assert!(VisualizationExporter::new(&store).export_hierarchy("ghost").is_none());
    }

    #[test]
    fn matrix_keeps_strongest_edge_per_pair() {
        let store = sample();
        let matrix = VisualizationExporter::new(&store).export_adjacency_matrix();

        assert_eq!(matrix.nodes, vec!["app", "nav", "item"]);
        assert_eq!(matrix.matrix[0], vec![0.0, 1.0, 0.9]);
        assert_eq!(matrix.matrix[2], vec![0.8, 0.0, 0.0]);
    }

    #[test]
    fn legend_lists_present_types_in_canonical_order() {
        let store = sample();
        let legend = VisualizationExporter::new(&store).export_legend();

        let kinds: Vec<(RelationshipType, usize)> =
            legend.entries.iter().map(|e| (e.kind, e.count)).collect();
        assert_eq!(
            kinds,
            vec![
                (RelationshipType::ParentChild, 3),
                (RelationshipType::PropDependency, 1),
                (RelationshipType::StateDependency, 1),
            ]
        );
        assert!(!legend.entries[0].description.is_empty());
    }

    #[test]
    fn statistics_on_empty_and_populated_graphs() {
        let empty = GraphStore::new();
        let stats = VisualizationExporter::new(&empty).export_statistics();
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.average_degree, 0.0);

        let store = sample();
        let stats = VisualizationExporter::new(&store).export_statistics();
        assert_eq!(stats.edge_count, 5);
        assert_eq!(stats.edges_by_type[&RelationshipType::ParentChild], 3);
        assert!((stats.average_degree - 10.0 / 3.0).abs() < 1e-6);
        assert!((stats.density - 5.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn focused_export_is_limited_to_direct_neighbors() {
        let mut store = sample();
        store.add_or_update_node(ComponentNode::new("far", "Far"));
        store
            .add_edge(Relationship::new(
                "item",
                "far",
                RelationshipType::Reference,
                0.5,
            ))
            .unwrap();

        let focused = VisualizationExporter::new(&store).export_focused("nav");

        let ids: Vec<&str> = focused.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["nav", "app", "item"]);
        assert_eq!(focused.edges.len(), 2);
        assert!(VisualizationExporter::new(&store)
            .export_focused("ghost")
            .nodes
            .is_empty());
    }
}
