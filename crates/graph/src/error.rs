use component_graph_protocol::RelationshipType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// Edge references a node that is not registered
    #[error("Edge {from} -> {to} ({kind}) references a missing component")]
    MissingEndpoint {
        from: String,
        to: String,
        kind: RelationshipType,
    },

    /// A detection strategy failed for one component
    #[error("Strategy '{strategy}' failed on component {component}: {message}")]
    Strategy {
        strategy: String,
        component: String,
        message: String,
    },

    #[error("Cycle detected during {context}: {}", .path.join(" -> "))]
    Cycle { context: String, path: Vec<String> },

    /// Internal invariant violated; a defect in the engine itself
    #[error("Graph consistency error: {0}")]
    Consistency(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Graph capacity exceeded (max_nodes={limit})")]
    CapacityExceeded { limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub fn strategy(
        strategy: impl Into<String>,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Strategy {
            strategy: strategy.into(),
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::Consistency(msg.into())
    }
}
