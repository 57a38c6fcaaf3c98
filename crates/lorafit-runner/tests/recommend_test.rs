//! Integration tests for `lorafit recommend`.
//!
//! These run the built binary against plan and config files in a temporary
//! directory and inspect the JSON output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use serde::Deserialize;

// ============================================================================
// JSON Deserialization Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecommendationOutput {
    parameters: Parameters,
    display: DisplayParameters,
    layout_tips: Vec<String>,
    errors: Vec<String>,
    diagnostics: Vec<String>,
    tier: String,
}

#[derive(Debug, Deserialize)]
struct Parameters {
    frequency_mhz: f64,
    spreading_factor: u8,
    bandwidth_khz: u32,
    coding_rate_denominator: u8,
    tx_power_dbm: i8,
    sync_word: u8,
    worst_link_margin_db: Option<f64>,
    error_message: Option<String>,
    warning_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DisplayParameters {
    coding_rate: String,
    sync_word: String,
    calculation_status: Option<String>,
}

// ============================================================================
// Helpers
// ============================================================================

fn run_lorafit(args: &[&str]) -> Output {
    // CARGO_BIN_EXE_lorafit is set by cargo when running tests for this crate
    let binary = env!("CARGO_BIN_EXE_lorafit");
    Command::new(binary)
        .args(args)
        .output()
        .expect("Failed to execute lorafit")
}

fn recommend_json(extra: &[&str]) -> RecommendationOutput {
    let mut args = vec!["recommend", "--format", "json"];
    args.extend_from_slice(extra);
    let output = run_lorafit(&args);
    assert!(
        output.status.success(),
        "lorafit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Failed to parse recommendation JSON")
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

const SHORT_LINK_PLAN: &str = r#"{
    "grid": [
        ["empty", "empty", "empty", "empty"],
        ["empty", "empty", "empty", "empty"]
    ],
    "gateway": {"row": 0, "col": 0},
    "sensors": [{"row": 0, "col": 3}]
}"#;

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_short_link_full_plan() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", SHORT_LINK_PLAN);

    let out = recommend_json(&["--plan", path_arg(&plan), "--region", "EU868"]);

    assert_eq!(out.tier, "full_plan");
    assert!(out.errors.is_empty());
    assert_eq!(out.parameters.spreading_factor, 7);
    assert_eq!(out.parameters.tx_power_dbm, 14);
    assert_eq!(out.parameters.frequency_mhz, 868.0);
    assert_eq!(out.parameters.bandwidth_khz, 125);
    assert_eq!(out.parameters.coding_rate_denominator, 5);
    assert_eq!(out.parameters.sync_word, 0x12);
    assert!(out.parameters.worst_link_margin_db.unwrap() >= 5.0);
    assert_eq!(out.display.coding_rate, "4/5");
    assert_eq!(out.display.sync_word, "0x12");
    assert!(out.display.calculation_status.is_none());
    assert!(out.diagnostics[0].starts_with("Initial parameters"));
    assert!(out.diagnostics.iter().any(|l| l.contains("2x4 grid")));
    assert!(!out.layout_tips.is_empty());
}

#[test]
fn test_without_plan_uses_defaults() {
    let out = recommend_json(&["--region", "US915"]);

    assert_eq!(out.tier, "no_plan");
    assert_eq!(out.parameters.spreading_factor, 9);
    assert_eq!(out.parameters.tx_power_dbm, 20);
    assert!(out.parameters.worst_link_margin_db.is_none());
    assert_eq!(
        out.parameters.error_message.as_deref(),
        Some("Fallback due to missing gateway on plan.")
    );
    assert_eq!(out.errors.len(), 1);
    assert!(out.errors[0].starts_with("Floor plan data (grid or gateway position) is missing"));
}

#[test]
fn test_gateway_without_sensors() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(
        &dir,
        "plan.json",
        r#"{"grid": [["empty", "empty"]], "gateway": {"row": 0, "col": 0}, "sensors": []}"#,
    );

    let out = recommend_json(&["--plan", path_arg(&plan)]);

    assert_eq!(out.tier, "no_receivers");
    assert_eq!(out.parameters.spreading_factor, 7);
    assert!(out.parameters.warning_message.is_some());
    assert!(out.parameters.worst_link_margin_db.is_none());
    assert!(out.errors.is_empty());
}

#[test]
fn test_malformed_plan_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", "{\"grid\": [[\"empty\"], [\"empty\", \"brick\"]]}");

    let out = recommend_json(&["--plan", path_arg(&plan)]);

    assert_eq!(out.tier, "fallback");
    assert_eq!(out.parameters.spreading_factor, 9);
    assert_eq!(out.parameters.tx_power_dbm, 14);
    assert_eq!(out.parameters.error_message.as_deref(), Some("Invalid plan data."));
    assert_eq!(out.errors, vec!["Invalid floor plan data format.".to_string()]);
}

#[test]
fn test_unknown_region_reported() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", SHORT_LINK_PLAN);

    let out = recommend_json(&["--plan", path_arg(&plan), "--region", "ZZ000"]);

    assert_eq!(out.tier, "full_plan");
    assert_eq!(out.parameters.frequency_mhz, 868.0);
    assert_eq!(out.errors, vec!["Invalid region: ZZ000".to_string()]);
}

#[test]
fn test_config_file_and_cli_override() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", SHORT_LINK_PLAN);
    let config = write_file(&dir, "strict.yaml", "planner:\n  safety_margin_db: 60.0\n");

    // No spreading factor reaches 60 dB over 3 m.
    let strict = recommend_json(&["--plan", path_arg(&plan), "--config", path_arg(&config)]);
    assert_eq!(strict.parameters.spreading_factor, 12);
    assert!(strict.parameters.warning_message.is_some());
    assert!(strict.display.calculation_status.is_some());

    let relaxed = recommend_json(&[
        "--plan",
        path_arg(&plan),
        "--config",
        path_arg(&config),
        "--safety-margin",
        "5",
    ]);
    assert_eq!(relaxed.parameters.spreading_factor, 7);
    assert!(relaxed.parameters.warning_message.is_none());
}

#[test]
fn test_range_challenge_tip() {
    let out = recommend_json(&["--wall-type", "concrete", "--network-type", "p2p"]);
    assert!(out.layout_tips.iter().any(|t| t.contains("range challenges")));
    assert!(out.layout_tips.iter().any(|t| t.starts_with("For P2P")));
}

#[test]
fn test_identical_runs_identical_output() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", SHORT_LINK_PLAN);
    let args = ["recommend", "--format", "json", "--plan", path_arg(&plan)];

    let first = run_lorafit(&args);
    let second = run_lorafit(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_unknown_config_property_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "bad.yaml", "radio:\n  frequency_hz: 868000000\n");

    let output = run_lorafit(&["recommend", "--config", path_arg(&config)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown property"), "stderr: {}", stderr);
}

#[test]
fn test_out_of_range_config_value_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "radio.yaml", "radio:\n  sync_word: 4096\n");

    let output = run_lorafit(&["recommend", "--config", path_arg(&config)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"), "stderr: {}", stderr);
    assert!(stderr.contains("radio/sync_word"), "stderr: {}", stderr);
}

#[test]
fn test_text_output() {
    let dir = TempDir::new().unwrap();
    let plan = write_file(&dir, "plan.json", SHORT_LINK_PLAN);

    let output = run_lorafit(&["recommend", "--plan", path_arg(&plan)]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Spreading factor: SF7"));
    assert!(stdout.contains("Diagnostics:"));
}

#[test]
fn test_properties_command() {
    let output = run_lorafit(&["properties"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("radio/bandwidth_khz"));
    assert!(stdout.contains("planner/safety_margin_db"));
    assert!(stdout.contains("Range: 5 to 8"));
}
