use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration, loadable from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub detection: DetectionConfig,
    pub analysis: AnalysisConfig,
    pub limits: LimitsConfig,
}

/// Strengths assigned by the built-in detection strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Relationships declared through explicit hints
    pub explicit_strength: f32,

    /// `<Child` containment cues in structural text
    pub containment_strength: f32,

    pub prop_strength: f32,
    pub state_strength: f32,
    pub context_strength: f32,
    pub event_strength: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            explicit_strength: 1.0,
            containment_strength: 0.8,
            prop_strength: 0.8,
            state_strength: 0.9,
            context_strength: 0.85,
            event_strength: 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum neighbor count for `find_hubs`
    pub hub_threshold: usize,

    /// Maximum neighbor count for `find_isolated`
    pub isolation_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hub_threshold: 3,
            isolation_threshold: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Upper bound on registered components (None = unbounded)
    pub max_nodes: Option<usize>,
}

impl GraphConfig {
    /// Lower confidence for every pattern-derived detection
    pub fn strict() -> Self {
        Self {
            detection: DetectionConfig {
                containment_strength: 0.7,
                prop_strength: 0.7,
                state_strength: 0.7,
                context_strength: 0.7,
                event_strength: 0.7,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: GraphConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let strengths = [
            ("explicit_strength", self.detection.explicit_strength),
            ("containment_strength", self.detection.containment_strength),
            ("prop_strength", self.detection.prop_strength),
            ("state_strength", self.detection.state_strength),
            ("context_strength", self.detection.context_strength),
            ("event_strength", self.detection.event_strength),
        ];
        for (name, value) in strengths {
            if !(0.0..=1.0).contains(&value) {
                return Err(GraphError::InvalidConfig(format!(
                    "detection.{name} must be within [0, 1] (got {value})"
                )));
            }
        }

        if self.limits.max_nodes == Some(0) {
            return Err(GraphError::InvalidConfig(
                "limits.max_nodes must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
