//! Service configuration.

use std::path::PathBuf;

use formscore_core::{ExerciseRegistry, ScoringOptions};
use tracing::info;

use crate::error::{ServiceError, ServiceResult};

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding one reference document per exercise
    pub reference_dir: PathBuf,
    /// Optional JSON file with extra exercise definitions
    pub presets_path: Option<PathBuf>,
    /// Score joint/axis pairs in parallel
    pub parallel_joints: bool,
    /// Emit logs as JSON instead of ANSI text
    pub log_json: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            reference_dir: PathBuf::from("./reference_data"),
            presets_path: None,
            parallel_joints: true,
            log_json: false,
        }
    }
}

impl ServiceConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            reference_dir: lookup("FORMSCORE_REFERENCE_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.reference_dir),
            presets_path: lookup("FORMSCORE_PRESETS_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            parallel_joints: lookup("FORMSCORE_PARALLEL_JOINTS")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.parallel_joints),
            log_json: lookup("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
        }
    }

    pub fn scoring_options(&self) -> ScoringOptions {
        ScoringOptions {
            parallel_joints: self.parallel_joints,
        }
    }

    /// Built-in presets, extended by the presets file if one is configured.
    pub fn build_registry(&self) -> ServiceResult<ExerciseRegistry> {
        let registry = ExerciseRegistry::with_presets();

        if let Some(path) = &self.presets_path {
            let json = std::fs::read_to_string(path).map_err(|e| {
                ServiceError::config_error(format!(
                    "Failed to read presets file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let extra = ExerciseRegistry::parse_definitions(&json)?;
            info!(path = %path.display(), count = extra.len(), "Loaded extra exercise presets");
            return Ok(registry.merge(extra)?);
        }

        Ok(registry)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
