//! # Component Graph
//!
//! Relationship graph over the UI components of a running application.
//!
//! ## Features
//!
//! - **Graph store** - canonical node cache and typed, weighted edges with merge-on-duplicate
//! - **Detection strategies** - pluggable rules for parent-child, prop, state, context and event links
//! - **Analysis** - shortest paths, cycles, hubs, dependency depth, render order
//! - **Export** - snapshot shapes consumed by visualization and debug UIs
//!
//! ## Architecture
//!
//! ```text
//! Component registry
//!     │
//!     └──> RelationshipManager
//!            ├─ register / unregister components
//!            ├─ run DetectionStrategy[] in registration order
//!            ├─ merge results into the GraphStore
//!            └─ notify listeners with per-component summaries
//!                 │
//!                 ├──> GraphAnalyzer (read-only algorithms)
//!                 └──> VisualizationExporter (wire snapshots)
//! ```

mod analyzer;
mod config;
mod diagnostics;
mod error;
mod exporter;
mod facade;
mod manager;
mod shared;
mod store;
pub mod strategy;
mod types;

pub use analyzer::{DependencyDepth, GraphAnalyzer, Hub};
pub use config::{AnalysisConfig, DetectionConfig, GraphConfig, LimitsConfig};
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSink, Diagnostics, Severity};
pub use error::{GraphError, Result};
pub use exporter::VisualizationExporter;
pub use facade::ComponentGraph;
pub use manager::{ChangeListener, RelationshipManager};
pub use shared::SharedComponentGraph;
pub use store::GraphStore;
pub use strategy::DetectionStrategy;
pub use types::{ComponentNode, EdgeUpsert, Relationship, RelationshipHints, RelationshipMetadata};

pub use component_graph_protocol::{ComponentSummary, RelationshipChange, RelationshipType};
