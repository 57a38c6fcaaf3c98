//! Planner configuration resolved from properties.

use crate::properties::*;
use crate::ModelError;
use lorafit_common::is_valid_spreading_factor;
use lorafit_lora::{LoraPhyConfig, PropagationModel, SelectionPolicy, WallAttenuation};
use std::path::Path;
use tracing::debug;

/// Coding rate denominators 5-8 stand for 4/5 to 4/8.
const MIN_CODING_RATE: u8 = 5;
const MAX_CODING_RATE: u8 = 8;

// ============================================================================
// Radio Defaults
// ============================================================================

/// Fixed radio settings bundled with every recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioDefaults {
    /// Signal bandwidth in kHz.
    pub bandwidth_khz: u32,
    /// Coding rate denominator.
    pub coding_rate_denominator: u8,
    /// Preamble length in symbols.
    pub preamble_length: u16,
    /// Sync word.
    pub sync_word: u8,
    /// Gain of one antenna in dBi.
    pub antenna_gain_dbi: f64,
}

impl RadioDefaults {
    pub const DEFAULT_BANDWIDTH_KHZ: u32 = 125;
    pub const DEFAULT_CODING_RATE: u8 = 5;
    pub const DEFAULT_PREAMBLE_LENGTH: u16 = 8;
    pub const DEFAULT_SYNC_WORD: u8 = 0x12;
    pub const DEFAULT_ANTENNA_GAIN_DBI: f64 = 2.15;

    /// Create from resolved properties.
    pub fn from_properties(props: &ResolvedProperties) -> Self {
        Self {
            bandwidth_khz: props.get(&RADIO_BANDWIDTH_KHZ),
            coding_rate_denominator: props.get(&RADIO_CODING_RATE),
            preamble_length: props.get(&RADIO_PREAMBLE_LENGTH),
            sync_word: props.get(&RADIO_SYNC_WORD),
            antenna_gain_dbi: props.get(&RADIO_ANTENNA_GAIN_DBI),
        }
    }

    /// Transmitter plus receiver antenna gain.
    pub fn total_antenna_gain_dbi(&self) -> f64 {
        2.0 * self.antenna_gain_dbi
    }
}

impl Default for RadioDefaults {
    fn default() -> Self {
        Self {
            bandwidth_khz: Self::DEFAULT_BANDWIDTH_KHZ,
            coding_rate_denominator: Self::DEFAULT_CODING_RATE,
            preamble_length: Self::DEFAULT_PREAMBLE_LENGTH,
            sync_word: Self::DEFAULT_SYNC_WORD,
            antenna_gain_dbi: Self::DEFAULT_ANTENNA_GAIN_DBI,
        }
    }
}

/// Spreading factors used when no link budget is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Without a usable floor plan.
    pub no_plan_spreading_factor: u8,
    /// With a gateway but no sensors.
    pub no_receivers_spreading_factor: u8,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            no_plan_spreading_factor: 9,
            no_receivers_spreading_factor: 7,
        }
    }
}

// ============================================================================
// Planner Configuration
// ============================================================================

/// Immutable configuration held by a [`crate::ParameterAssembler`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlannerConfig {
    /// Receiver characteristics.
    pub phy: LoraPhyConfig,
    /// Wall and floor attenuation.
    pub propagation: PropagationModel,
    /// Spreading factor search policy.
    pub policy: SelectionPolicy,
    /// Fixed radio settings.
    pub radio: RadioDefaults,
    /// Fallback spreading factors.
    pub fallback: FallbackPolicy,
}

impl PlannerConfig {
    /// Build a configuration from resolved properties.
    ///
    /// Fallback spreading factors outside 7-12 and coding rate denominators
    /// outside 5-8 are rejected.
    pub fn from_properties(props: &ResolvedProperties) -> Result<Self, ModelError> {
        let phy = LoraPhyConfig::new(
            [
                props.get(&RADIO_SNR_THRESHOLD_SF7_DB),
                props.get(&RADIO_SNR_THRESHOLD_SF8_DB),
                props.get(&RADIO_SNR_THRESHOLD_SF9_DB),
                props.get(&RADIO_SNR_THRESHOLD_SF10_DB),
                props.get(&RADIO_SNR_THRESHOLD_SF11_DB),
                props.get(&RADIO_SNR_THRESHOLD_SF12_DB),
            ],
            props.get(&RADIO_NOISE_FIGURE_DB),
        );

        let propagation = PropagationModel::new(
            WallAttenuation {
                drywall_db: props.get(&WALL_DRYWALL_DB),
                brick_db: props.get(&WALL_BRICK_DB),
                concrete_db: props.get(&WALL_CONCRETE_DB),
            },
            props.get(&FLOOR_LOSS_DB),
        );

        let fallback = FallbackPolicy {
            no_plan_spreading_factor: checked_spreading_factor(props, &FALLBACK_SPREADING_FACTOR)?,
            no_receivers_spreading_factor: checked_spreading_factor(
                props,
                &FALLBACK_NO_RECEIVERS_SPREADING_FACTOR,
            )?,
        };

        Ok(Self {
            phy,
            propagation,
            policy: SelectionPolicy::new(props.get(&PLANNER_SAFETY_MARGIN_DB)),
            radio: checked_radio(props)?,
            fallback,
        })
    }
}

fn checked_spreading_factor(props: &ResolvedProperties, prop: &Property<u8>) -> Result<u8, ModelError> {
    let sf = props.get(prop);
    if is_valid_spreading_factor(sf) {
        Ok(sf)
    } else {
        Err(ModelError::InvalidConfig(format!(
            "{} must be between 7 and 12, got {}",
            prop.name(),
            sf
        )))
    }
}

fn checked_radio(props: &ResolvedProperties) -> Result<RadioDefaults, ModelError> {
    let radio = RadioDefaults::from_properties(props);
    if !(MIN_CODING_RATE..=MAX_CODING_RATE).contains(&radio.coding_rate_denominator) {
        return Err(ModelError::InvalidConfig(format!(
            "{} must be between {} and {}, got {}",
            RADIO_CODING_RATE.name(),
            MIN_CODING_RATE,
            MAX_CODING_RATE,
            radio.coding_rate_denominator
        )));
    }
    Ok(radio)
}

// ============================================================================
// Loading
// ============================================================================

/// Parse one YAML configuration document.
///
/// An empty document yields an empty set.
pub fn load_properties_from_str(yaml_str: &str) -> Result<UnresolvedProperties, ModelError> {
    if yaml_str.trim().is_empty() {
        return Ok(UnresolvedProperties::new());
    }
    Ok(serde_yaml::from_str(yaml_str)?)
}

/// Load and merge configuration files over the built-in defaults.
///
/// Later files override earlier ones.
pub fn load_properties(paths: &[&Path]) -> Result<ResolvedProperties, ModelError> {
    let mut resolved = ResolvedProperties::new();
    for path in paths {
        let yaml_str = std::fs::read_to_string(path).map_err(|source| ModelError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        let unresolved = load_properties_from_str(&yaml_str)?;
        debug!(
            "Loaded {} properties from {}",
            unresolved.len(),
            path.display()
        );
        resolved.apply_unresolved(&unresolved);
    }
    Ok(resolved)
}
