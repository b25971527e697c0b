use crate::error::DiagramError;
use crate::geometry::layout::LayoutConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROBLEM_STATEMENT: &str = "Problem Statement";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagramConfig {
    /// Lookup misses raise `NotFound` instead of being absorbed.
    pub strict: bool,
    /// Seed for ids and generated positions; unseeded when None.
    pub seed: Option<u64>,
    pub default_problem_statement: String,
    pub layout: LayoutConfig,
    pub hover: HoverConfig,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        DiagramConfig {
            strict: false,
            seed: None,
            default_problem_statement: DEFAULT_PROBLEM_STATEMENT.to_string(),
            layout: LayoutConfig::default(),
            hover: HoverConfig::default(),
        }
    }
}

/// Grace periods keeping the node toolbar open across small pointer gaps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoverConfig {
    pub node_grace_ms: f64,
    pub toolbar_grace_ms: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        HoverConfig {
            node_grace_ms: 200.0,
            toolbar_grace_ms: 100.0,
        }
    }
}

impl DiagramConfig {
    pub fn seeded(seed: u64) -> Self {
        DiagramConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, DiagramError> {
        let config: DiagramConfig =
            serde_json::from_str(s).map_err(|e| DiagramError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_value(v: serde_json::Value) -> Result<Self, DiagramError> {
        let config: DiagramConfig =
            serde_json::from_value(v).map_err(|e| DiagramError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DiagramError> {
        self.layout.validate().map_err(DiagramError::InvalidConfig)?;
        let h = &self.hover;
        if !(h.node_grace_ms.is_finite() && h.node_grace_ms >= 0.0)
            || !(h.toolbar_grace_ms.is_finite() && h.toolbar_grace_ms >= 0.0)
        {
            return Err(DiagramError::InvalidConfig(
                "hover grace periods must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
