//! # lorafit-model
//!
//! Configuration, plan loading and parameter assembly for lorafit.
//!
//! This crate provides:
//! - Property registry for tuning the engine ([`properties`])
//! - YAML configuration loading and [`PlannerConfig`]
//! - Floor plan payload parsing ([`parse_plan_payload`])
//! - The tiered [`ParameterAssembler`]
//! - Layout advice and the combined [`Recommendation`]
//!
//! Properties are resolved in order: built-in → configuration files → CLI.

pub mod assembler;
pub mod config;
pub mod plan;
pub mod properties;
pub mod recommend;

pub use assembler::{ParameterAssembler, PlanOutcome, PlanTier, REQUESTS_METRIC};
pub use config::{
    load_properties, load_properties_from_str, FallbackPolicy, PlannerConfig, RadioDefaults,
};
pub use plan::parse_plan_payload;
pub use properties::{
    get_property_def, is_known_property, Property, PropertyDef, PropertyValue, ResolvedProperties,
    UnresolvedProperties, ALL_PROPERTIES,
};
pub use recommend::{layout_advice, recommend, NetworkType, Recommendation, RecommendationRequest};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    IoError {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
