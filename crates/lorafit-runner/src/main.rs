//! # lorafit
//!
//! Command line entry point for the LoRa parameter planner.

use clap::{Args, Parser, Subcommand, ValueEnum};
use lorafit_common::{EnvironmentDescriptor, REGION_PROFILES};
use lorafit_model::properties::{known_namespaces, properties_by_namespace};
use lorafit_model::{recommend, NetworkType, ParameterAssembler, RecommendationRequest};
use lorafit_runner::{load_planner_config, read_plan_payload, write_text, PlannerOverrides, RunnerError};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// CLI Configuration
// ============================================================================

/// Output format for recommendations.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// JSON for programmatic consumption.
    Json,
}

/// lorafit - LoRa parameter planner for indoor deployments
#[derive(Parser, Debug)]
#[command(name = "lorafit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend LoRa parameters for a floor plan
    Recommend(RecommendConfig),
    /// List all available properties with descriptions and defaults
    Properties,
    /// List supported regions
    Regions,
}

/// Arguments for `lorafit recommend`.
#[derive(Args, Debug)]
pub struct RecommendConfig {
    /// Floor plan JSON file (omit to get an estimate without a plan)
    #[arg(long, value_name = "FILE")]
    pub plan: Option<PathBuf>,
    /// Region code (EU868, US915, AS923, AU915, KR920, IN865, RU864)
    #[arg(long, default_value = "EU868")]
    pub region: String,
    /// YAML configuration file; may be repeated, later files override earlier ones
    #[arg(long = "config", value_name = "FILE")]
    pub configs: Vec<PathBuf>,
    /// Number of floors (used for advice and when no plan is available)
    #[arg(long)]
    pub floors: Option<u32>,
    /// Dominant internal wall type (drywall, brick, concrete)
    #[arg(long)]
    pub wall_type: Option<String>,
    /// Floor area in square meters
    #[arg(long)]
    pub size_sqm: Option<f64>,
    /// Network topology (p2p or multi_node)
    #[arg(long, default_value = "multi_node")]
    pub network_type: NetworkType,
    /// Signal bandwidth in kHz (overrides radio/bandwidth_khz)
    #[arg(long)]
    pub bandwidth_khz: Option<u32>,
    /// Required worst-case margin in dB (overrides planner/safety_margin_db)
    #[arg(long)]
    pub safety_margin: Option<f64>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

fn main() -> Result<(), RunnerError> {
    // Default to "warn" level if RUST_LOG is not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend(config) => {
            recommend_command(config)?;
        }
        Commands::Properties => {
            print_properties_info();
        }
        Commands::Regions => {
            print_regions();
        }
    }

    Ok(())
}

fn recommend_command(config: RecommendConfig) -> Result<(), RunnerError> {
    let overrides = PlannerOverrides {
        bandwidth_khz: config.bandwidth_khz,
        safety_margin_db: config.safety_margin,
    };
    let planner = load_planner_config(&config.configs, &overrides)?;

    let request = RecommendationRequest {
        region: config.region,
        floorplan_data: read_plan_payload(config.plan.as_deref())?,
        environment: EnvironmentDescriptor {
            floors: config.floors,
            wall_type: config.wall_type,
            size_sqm: config.size_sqm,
        },
        network_type: config.network_type,
    };

    let recommendation = recommend(&ParameterAssembler::new(planner), &request);
    info!(
        "Recommended SF{} ({} tier, {} error(s))",
        recommendation.parameters.spreading_factor,
        recommendation.tier,
        recommendation.errors.len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match config.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &recommendation)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_text(&mut out, &recommendation)?,
    }
    Ok(())
}

/// Print information about all available properties
fn print_properties_info() {
    println!("lorafit Available Properties");
    println!("============================\n");

    println!("Properties tune the planner and can be set in YAML files passed with --config.\n");

    println!("## Property Resolution Order\n");
    println!("  1. Built-in code defaults (shown below)");
    println!("  2. YAML configuration files (in order given)");
    println!("  3. Command-line flags (--bandwidth-khz, --safety-margin)\n");

    for namespace in known_namespaces() {
        println!("### {}/\n", namespace);

        for prop in properties_by_namespace(namespace) {
            println!("  {}", prop.name);
            println!("    {}", prop.description);
            print!("    Default: {}", prop.default);
            if let Some(unit) = prop.unit {
                print!(" {}", unit);
            }
            println!();
            if let Some((min, max)) = prop.range {
                println!("    Range: {} to {}", min, max);
            }
            println!();
        }
    }

    println!("## YAML Example\n");
    println!("```yaml");
    println!("wall:");
    println!("  concrete_db: 25.0");
    println!("planner:");
    println!("  safety_margin_db: 8.0");
    println!("```");
}

fn print_regions() {
    println!("{:<8} {:>14} {:>16}", "Region", "Frequency MHz", "TX power dBm");
    for profile in REGION_PROFILES {
        println!(
            "{:<8} {:>14.1} {:>16}",
            profile.code, profile.frequency_mhz, profile.default_tx_power_dbm
        );
    }
}
