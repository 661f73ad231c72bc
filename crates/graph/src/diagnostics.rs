use crate::error::GraphError;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCategory {
    Referential,
    Strategy,
    Cycle,
    Consistency,
    Capacity,
    Configuration,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Referential => "referential",
            Self::Strategy => "strategy",
            Self::Cycle => "cycle",
            Self::Consistency => "consistency",
            Self::Capacity => "capacity",
            Self::Configuration => "configuration",
        };
        f.write_str(label)
    }
}

/// Payload handed to the host's logging / error-reporting collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub category: DiagnosticCategory,
    pub metadata: Map<String, Value>,
}

impl From<&GraphError> for Diagnostic {
    fn from(err: &GraphError) -> Self {
        let (severity, category, metadata) = match err {
            GraphError::MissingEndpoint { from, to, kind } => (
                Severity::Warning,
                DiagnosticCategory::Referential,
                json!({ "source": from, "target": to, "type": kind }),
            ),
            GraphError::NodeNotFound(id) => (
                Severity::Warning,
                DiagnosticCategory::Referential,
                json!({ "componentId": id }),
            ),
            GraphError::Strategy {
                strategy,
                component,
                ..
            } => (
                Severity::Error,
                DiagnosticCategory::Strategy,
                json!({ "strategy": strategy, "componentId": component }),
            ),
            GraphError::Cycle { context, path } => (
                Severity::Warning,
                DiagnosticCategory::Cycle,
                json!({ "context": context, "path": path }),
            ),
            GraphError::Consistency(_) => (
                Severity::Error,
                DiagnosticCategory::Consistency,
                json!({}),
            ),
            GraphError::CapacityExceeded { limit } => (
                Severity::Warning,
                DiagnosticCategory::Capacity,
                json!({ "maxNodes": limit }),
            ),
            GraphError::InvalidConfig(_) | GraphError::Config(_) | GraphError::Io(_) => (
                Severity::Error,
                DiagnosticCategory::Configuration,
                json!({}),
            ),
        };

        Self {
            message: err.to_string(),
            severity,
            category,
            metadata: match metadata {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }
}

/// Receiver for diagnostics (host logging / error-reporting layer)
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Logs every diagnostic through `log` and forwards it to an optional sink.
#[derive(Clone, Default)]
pub struct Diagnostics {
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Diagnostics {
    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => {
                log::warn!("[{}] {}", diagnostic.category, diagnostic.message)
            }
            Severity::Error => {
                log::error!("[{}] {}", diagnostic.category, diagnostic.message)
            }
        }
        if let Some(sink) = &self.sink {
            sink.report(&diagnostic);
        }
    }

    pub fn report_error(&self, err: &GraphError) {
        self.emit(Diagnostic::from(err));
    }
}
