//! # lorafit-runner
//!
//! Support code for the `lorafit` command line tool: configuration
//! resolution, plan loading and text rendering of recommendations.

use lorafit_model::properties::{PLANNER_SAFETY_MARGIN_DB, RADIO_BANDWIDTH_KHZ};
use lorafit_model::{load_properties, PlannerConfig, Recommendation};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Model error.
    #[error("Model error: {0}")]
    Model(#[from] lorafit_model::ModelError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Command-line values that take precedence over configuration files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerOverrides {
    /// Signal bandwidth in kHz.
    pub bandwidth_khz: Option<u32>,
    /// Required worst-case margin in dB.
    pub safety_margin_db: Option<f64>,
}

/// Resolve the planner configuration: defaults, then files in order, then overrides.
pub fn load_planner_config(
    configs: &[PathBuf],
    overrides: &PlannerOverrides,
) -> Result<PlannerConfig, RunnerError> {
    let paths: Vec<&Path> = configs.iter().map(|p| p.as_path()).collect();
    let mut props = load_properties(&paths)
        .map_err(|e| RunnerError::ConfigError(format!("Failed to load config: {}", e)))?;

    if let Some(bandwidth_khz) = overrides.bandwidth_khz {
        props.set(&RADIO_BANDWIDTH_KHZ, bandwidth_khz);
    }
    if let Some(safety_margin_db) = overrides.safety_margin_db {
        props.set(&PLANNER_SAFETY_MARGIN_DB, safety_margin_db);
    }

    let config = PlannerConfig::from_properties(&props)?;
    debug!("Resolved planner config: {:?}", config);
    Ok(config)
}

/// Read a plan payload file. No path means no plan.
pub fn read_plan_payload(path: Option<&Path>) -> Result<Option<String>, RunnerError> {
    match path {
        Some(path) => {
            let payload = std::fs::read_to_string(path).map_err(|e| {
                RunnerError::ConfigError(format!("Failed to read plan {}: {}", path.display(), e))
            })?;
            Ok(Some(payload))
        }
        None => Ok(None),
    }
}

// ============================================================================
// Text Output
// ============================================================================

/// Write a recommendation as human-readable text.
pub fn write_text<W: Write>(out: &mut W, recommendation: &Recommendation) -> std::io::Result<()> {
    let display = &recommendation.display;

    let title = format!("LoRa Recommendation ({})", recommendation.tier);
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(title.len()))?;
    writeln!(out, "  Frequency:        {:.1} MHz", display.frequency_mhz)?;
    writeln!(out, "  Spreading factor: SF{}", display.spreading_factor)?;
    writeln!(out, "  Bandwidth:        {} kHz", display.signal_bandwidth_khz)?;
    writeln!(out, "  Coding rate:      {}", display.coding_rate)?;
    writeln!(out, "  TX power:         {} dBm", display.tx_power_dbm)?;
    writeln!(out, "  Preamble length:  {}", display.preamble_length)?;
    writeln!(out, "  Sync word:        {}", display.sync_word)?;
    writeln!(out, "  Antenna gain:     {:.2} dBi", display.antenna_gain_dbi)?;
    match display.worst_link_margin_db {
        Some(margin) => writeln!(out, "  Worst margin:     {:.1} dB", margin)?,
        None => writeln!(out, "  Worst margin:     n/a")?,
    }
    if let Some(status) = &display.calculation_status {
        writeln!(out, "  Status:           {}", status)?;
    }

    write_section(out, "Errors", &recommendation.errors)?;
    write_section(out, "Layout tips", &recommendation.layout_tips)?;

    if !recommendation.diagnostics.is_empty() {
        writeln!(out)?;
        writeln!(out, "Diagnostics:")?;
        for line in &recommendation.diagnostics {
            writeln!(out, "  {}", line)?;
        }
    }
    Ok(())
}

fn write_section<W: Write>(out: &mut W, heading: &str, items: &[String]) -> std::io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{}:", heading)?;
    for item in items {
        writeln!(out, "  - {}", item)?;
    }
    Ok(())
}
