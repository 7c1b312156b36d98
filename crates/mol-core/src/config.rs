use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-relative location of the engine config file.
pub const CONFIG_RELATIVE_PATH: &str = ".molecule/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub dag: DagConfig,
    #[serde(default)]
    pub advance: AdvanceConfig,
}

/// How the critical path finder picks between equally long chains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Prefer the smallest step id at every branch. Reproducible across stores.
    #[default]
    SmallestId,
    /// Keep the first candidate in stored edge order.
    FirstFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagConfig {
    #[serde(default)]
    pub critical_path_ties: TieBreak,
    #[serde(default = "default_parallel_markers")]
    pub parallel_markers: Vec<String>,
}

impl Default for DagConfig {
    fn default() -> Self {
        Self {
            critical_path_ties: TieBreak::default(),
            parallel_markers: default_parallel_markers(),
        }
    }
}

impl DagConfig {
    /// Whether a step description marks the step as parallel.
    #[must_use]
    pub fn is_parallel(&self, description: &str) -> bool {
        self.parallel_markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .any(|marker| description.contains(marker.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceConfig {
    #[serde(default = "default_true")]
    pub close_step: bool,
}

impl Default for AdvanceConfig {
    fn default() -> Self {
        Self {
            close_step: default_true(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_parallel_markers() -> Vec<String> {
    vec!["parallel: true".to_string(), "parallel=true".to_string()]
}

#[must_use]
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_RELATIVE_PATH)
}

/// Load `.molecule/config.toml` under `project_root`, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_engine_config(project_root: &Path) -> Result<EngineConfig> {
    let path = config_path(project_root);
    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_engine_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse engine config from TOML text.
///
/// # Errors
///
/// Returns an error on invalid TOML or unknown enum values.
pub fn parse_engine_config(content: &str) -> Result<EngineConfig> {
    Ok(toml::from_str::<EngineConfig>(content)?)
}
