use std::path::Path;

use serde_json::Value;

use crate::errors::{PlanError, Result};
use crate::validate::{ValidatedPlan, validate_plan_value};

/// Plan shipped with the crate: an insurance brokerage with seventeen
/// departments.
pub const DEFAULT_PLAN_TOML: &str = include_str!("../plans/axon_broker.toml");

/// On-disk encodings accepted for plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Toml,
    Json,
}

impl PlanFormat {
    /// Pick the encoding from the file extension; anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => PlanFormat::Json,
            _ => PlanFormat::Toml,
        }
    }
}

/// Load and validate a plan file.
pub fn load_plan(path: &Path) -> Result<ValidatedPlan> {
    let contents = std::fs::read_to_string(path)?;
    load_plan_str(&contents, PlanFormat::from_path(path))
}

/// Parse and validate a plan document.
///
/// TOML plans go through the same JSON Schema as JSON plans, so dates and
/// times must be written as strings (`"2026-01-23"`, `"08:00:00"`).
pub fn load_plan_str(contents: &str, format: PlanFormat) -> Result<ValidatedPlan> {
    let value: Value = match format {
        PlanFormat::Toml => toml::from_str(contents)?,
        PlanFormat::Json => serde_json::from_str(contents)?,
    };
    validate_plan_value(&value).map_err(PlanError::Invalid)
}

/// The embedded default plan.
pub fn default_plan() -> Result<ValidatedPlan> {
    load_plan_str(DEFAULT_PLAN_TOML, PlanFormat::Toml)
}
