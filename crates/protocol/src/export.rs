use crate::RelationshipType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub neighbor_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub strength: f32,
}

/// `{nodes, edges}` snapshot used by full and focused exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

/// Tree over parent-child edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HierarchyNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Number of nodes in this subtree, root included.
    pub fn size(&self) -> usize {
        let mut size = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            size += 1;
            stack.extend(&node.children);
        }
        size
    }
}

// Deep parent-child chains would overflow the stack under the derived recursive drop.
impl Drop for HierarchyNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// `matrix[i][j]` is the strength of the edge `nodes[i] -> nodes[j]`, 0 when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdjacencyMatrix {
    pub nodes: Vec<String>,
    pub matrix: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LegendEntry {
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub count: usize,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub edges_by_type: BTreeMap<RelationshipType, usize>,
    pub average_degree: f32,
    pub density: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_field_names_match_wire_contract() {
        let snapshot = GraphSnapshot {
            nodes: vec![NodeView {
                id: "a".to_string(),
                name: "Header".to_string(),
                kind: "component".to_string(),
                neighbor_count: 2,
            }],
            edges: vec![EdgeView {
                source: "a".to_string(),
                target: "b".to_string(),
                kind: RelationshipType::ParentChild,
                strength: 1.0,
            }],
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "nodes": [{"id": "a", "name": "Header", "type": "component", "neighborCount": 2}],
                "edges": [{"source": "a", "target": "b", "type": "parent-child", "strength": 1.0}],
            })
        );
    }

    #[test]
    fn hierarchy_size_counts_nested_children() {
        let node = |id: &str, children: Vec<HierarchyNode>| HierarchyNode {
            id: id.to_string(),
            name: id.to_string(),
            kind: "component".to_string(),
            children,
        };
        let leaf = |id: &str| node(id, Vec::new());
        let root = node("a", vec![node("b", vec![leaf("c")]), leaf("d")]);
        assert_eq!(root.size(), 4);
    }

    #[test]
    fn statistics_serialize_type_keys_as_tags() {
        let mut edges_by_type = BTreeMap::new();
        edges_by_type.insert(RelationshipType::ContextDependency, 3);
        let stats = GraphStatistics {
            node_count: 4,
            edge_count: 3,
            edges_by_type,
            average_degree: 1.5,
            density: 0.25,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["edgesByType"]["context-dependency"], 3);
        assert_eq!(value["nodeCount"], 4);
    }
}
