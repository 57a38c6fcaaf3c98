//! # Planner Properties
//!
//! A type-safe property registry for tuning the recommendation engine.
//!
//! ## Module Organization
//!
//! - [`value`] - Property value types and conversion traits
//! - [`types`] - Property type definitions and metadata
//! - [`definitions`] - All property constant definitions
//! - [`registry`] - Property lookup and resolved/unresolved property sets
//!
//! ## Property Namespaces
//!
//! Properties are organized into namespaces using `/` as a separator:
//! - `radio/bandwidth_khz` - Signal bandwidth
//! - `wall/concrete_db` - Attenuation of a concrete cell
//! - `planner/safety_margin_db` - Required worst-case margin
//!
//! ## Property Resolution
//!
//! Properties are resolved in the following order (later overrides earlier):
//! 1. Built-in code defaults
//! 2. YAML configuration files (in order loaded)
//! 3. Explicit command-line values
//!
//! ## Example YAML
//!
//! ```yaml
//! wall:
//!   concrete_db: 25.0
//! planner:
//!   safety_margin_db: 8.0
//! ```

pub mod definitions;
pub mod registry;
pub mod types;
pub mod value;

pub use value::{FromPropertyValue, PropertyValue, ToPropertyValue};

pub use types::{Property, PropertyBaseType, PropertyDef, PropertyDefault};

pub use definitions::{
    // Fallback
    FALLBACK_NO_RECEIVERS_SPREADING_FACTOR,
    FALLBACK_SPREADING_FACTOR,
    // Floor
    FLOOR_LOSS_DB,
    // Planner
    PLANNER_SAFETY_MARGIN_DB,
    // Radio
    RADIO_ANTENNA_GAIN_DBI,
    RADIO_BANDWIDTH_KHZ,
    RADIO_CODING_RATE,
    RADIO_NOISE_FIGURE_DB,
    RADIO_PREAMBLE_LENGTH,
    RADIO_SNR_THRESHOLD_SF10_DB,
    RADIO_SNR_THRESHOLD_SF11_DB,
    RADIO_SNR_THRESHOLD_SF12_DB,
    RADIO_SNR_THRESHOLD_SF7_DB,
    RADIO_SNR_THRESHOLD_SF8_DB,
    RADIO_SNR_THRESHOLD_SF9_DB,
    RADIO_SYNC_WORD,
    // Wall
    WALL_BRICK_DB,
    WALL_CONCRETE_DB,
    WALL_DRYWALL_DB,
};

pub use registry::{
    get_property_def, is_known_property, known_namespaces, properties_by_namespace,
    PropertySetError, ResolvedProperties, UnresolvedProperties, ALL_PROPERTIES,
};
