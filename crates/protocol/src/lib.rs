//! Wire contract shared by the component graph engine and the UIs that consume it.
//!
//! Field names here are consumed structurally by external visualization and debug
//! panels, so every type keeps its serialized shape stable.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod export;

pub use export::{
    AdjacencyMatrix, EdgeView, GraphSnapshot, GraphStatistics, HierarchyNode, Legend,
    LegendEntry, NodeView,
};

pub const WIRE_SCHEMA_VERSION: u32 = 1;

/// Type tag of a stored relationship.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    /// Source renders / contains target
    ParentChild,
    /// Target receives props provided by source
    PropDependency,
    /// Target reads state owned by source
    StateDependency,
    /// Target consumes a context channel provided by source
    ContextDependency,
    /// Plain reference (only created explicitly)
    Reference,
    /// Source emits events handled by target
    EventDependency,
    /// Host-defined relationship
    Custom,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 7] = [
        RelationshipType::ParentChild,
        RelationshipType::PropDependency,
        RelationshipType::StateDependency,
        RelationshipType::ContextDependency,
        RelationshipType::Reference,
        RelationshipType::EventDependency,
        RelationshipType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParentChild => "parent-child",
            Self::PropDependency => "prop-dependency",
            Self::StateDependency => "state-dependency",
            Self::ContextDependency => "context-dependency",
            Self::Reference => "reference",
            Self::EventDependency => "event-dependency",
            Self::Custom => "custom",
        }
    }

    /// Edge types that make up the `dependsOn` view.
    pub fn is_dependency(&self) -> bool {
        matches!(
            self,
            Self::PropDependency | Self::StateDependency | Self::ContextDependency
        )
    }

    /// Canned legend text for visualization UIs.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ParentChild => "Parent renders or structurally contains the child component",
            Self::PropDependency => "Consumer receives props supplied by the provider",
            Self::StateDependency => "Consumer reads state owned by the provider",
            Self::ContextDependency => "Consumer subscribes to a context channel of the provider",
            Self::Reference => "Component holds a direct reference to another component",
            Self::EventDependency => "Emitter raises events handled by the listening component",
            Self::Custom => "Host-defined relationship",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == raw.trim())
            .ok_or_else(|| format!("unknown relationship type: {raw}"))
    }
}

/// Derived per-component view of the stored edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    pub children: Vec<String>,
    pub siblings: Vec<String>,
    pub depends_on: Vec<String>,
    pub depended_on_by: Vec<String>,
    pub shared_state_keys: Vec<String>,
}

/// Notification emitted after every detection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipChange {
    pub component_id: String,
    pub summary: ComponentSummary,
}

/// JSON schemas for every payload that leaves the engine, keyed by type name.
pub fn wire_schemas() -> Result<serde_json::Value> {
    let mut schemas = serde_json::Map::new();
    schemas.insert(
        "schemaVersion".to_string(),
        serde_json::Value::from(WIRE_SCHEMA_VERSION),
    );
    let entries = [
        ("RelationshipChange", schema_value::<RelationshipChange>()?),
        ("GraphSnapshot", schema_value::<GraphSnapshot>()?),
        ("HierarchyNode", schema_value::<HierarchyNode>()?),
        ("AdjacencyMatrix", schema_value::<AdjacencyMatrix>()?),
        ("Legend", schema_value::<Legend>()?),
        ("GraphStatistics", schema_value::<GraphStatistics>()?),
    ];
    for (name, schema) in entries {
        schemas.insert(name.to_string(), schema);
    }
    Ok(serde_json::Value::Object(schemas))
}

fn schema_value<T: JsonSchema>() -> Result<serde_json::Value> {
    serde_json::to_value(schemars::schema_for!(T)).map_err(Into::into)
}

pub fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).map_err(Into::into)
    } else {
        serde_json::to_string(value).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relationship_type_uses_kebab_case_tags() {
        let raw = serde_json::to_string(&RelationshipType::StateDependency).unwrap();
        assert_eq!(raw, "\"state-dependency\"");

        for kind in RelationshipType::ALL {
            let encoded = serde_json::to_value(kind).unwrap();
            assert_eq!(encoded.as_str(), Some(kind.as_str()));
            assert_eq!(kind.as_str().parse::<RelationshipType>(), Ok(kind));
        }
    }

    #[test]
    fn only_prop_state_context_count_as_dependencies() {
        let deps: Vec<_> = RelationshipType::ALL
            .into_iter()
            .filter(RelationshipType::is_dependency)
            .collect();
        assert_eq!(
            deps,
            vec![
                RelationshipType::PropDependency,
                RelationshipType::StateDependency,
                RelationshipType::ContextDependency,
            ]
        );
    }

    #[test]
    fn change_notification_keeps_camel_case_fields() {
        let change = RelationshipChange {
            component_id: "card".to_string(),
            summary: ComponentSummary {
                depended_on_by: vec!["list".to_string()],
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["componentId"], "card");
        assert_eq!(value["summary"]["dependedOnBy"][0], "list");
        assert!(value["summary"]["sharedStateKeys"].is_array());
    }

    #[test]
    fn wire_schemas_cover_every_export() {
        let schemas = wire_schemas().unwrap();
        for name in [
            "RelationshipChange",
            "GraphSnapshot",
            "HierarchyNode",
            "AdjacencyMatrix",
            "Legend",
            "GraphStatistics",
        ] {
            assert!(schemas.get(name).is_some(), "missing schema for {name}");
        }
    }
}
