//! # lorafit-lora
//!
//! LoRa link budget estimation for lorafit.
//!
//! This crate provides:
//! - Configurable PHY parameters ([`LoraPhyConfig`])
//! - Receiver sensitivity per spreading factor ([`receiver_sensitivity`])
//! - Indoor propagation estimates ([`PropagationModel`])
//! - Link margin arithmetic ([`link_margin`])
//! - Spreading factor search ([`SpreadingFactorSelector`])

mod propagation;
mod selector;

pub use propagation::{
    distance, free_space_path_loss, PathLoss, PropagationModel, WallAttenuation,
    FSPL_CONSTANT_DB, REFERENCE_DISTANCE_M,
};
pub use selector::{
    LinkBudget, LinkReport, Selection, SelectionPolicy, SfEvaluation, SpreadingFactorSelector,
};

use lorafit_common::PlanError;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while evaluating link budgets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinkError {
    /// The selector was invoked without receivers.
    #[error("no receivers to evaluate")]
    NoReceivers,

    /// A radio parameter is outside its physical domain.
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A computation produced NaN or infinity.
    #[error("non-finite {quantity} for receiver {receiver} at SF{spreading_factor}")]
    NonFinite {
        /// Which quantity went non-finite.
        quantity: &'static str,
        /// 1-based receiver index.
        receiver: usize,
        /// Spreading factor being evaluated.
        spreading_factor: u8,
    },
}

impl From<LinkError> for PlanError {
    fn from(err: LinkError) -> Self {
        PlanError::InternalComputationFailure(err.to_string())
    }
}

// ============================================================================
// PHY Configuration
// ============================================================================

/// Thermal noise density at room temperature in dBm/Hz.
pub const THERMAL_NOISE_DBM_PER_HZ: f64 = -174.0;

/// Configuration for receiver sensitivity calculations.
///
/// Defaults match the `radio/snr_threshold_sf*_db` and `radio/noise_figure_db`
/// property defaults in `lorafit_model::properties`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoraPhyConfig {
    /// Required demodulation SNR for spreading factors 7-12, indexed as [SF-7].
    pub snr_thresholds: [f64; 6],
    /// Receiver noise figure in dB.
    pub noise_figure_db: f64,
}

impl LoraPhyConfig {
    /// Default SNR thresholds for SF 7-12.
    pub const DEFAULT_SNR_THRESHOLDS: [f64; 6] = [-7.5, -10.0, -12.5, -15.0, -17.5, -20.0];

    /// Default receiver noise figure.
    pub const DEFAULT_NOISE_FIGURE_DB: f64 = 6.0;

    /// Create a new LoraPhyConfig with explicit values.
    pub fn new(snr_thresholds: [f64; 6], noise_figure_db: f64) -> Self {
        Self {
            snr_thresholds,
            noise_figure_db,
        }
    }

    /// Get the SNR threshold for a given spreading factor.
    ///
    /// Spreading factors outside 7-12 get the SF12 threshold.
    pub fn snr_threshold(&self, spreading_factor: u8) -> f64 {
        match spreading_factor {
            7..=12 => self.snr_thresholds[(spreading_factor - 7) as usize],
            _ => self.snr_thresholds[5],
        }
    }
}

impl Default for LoraPhyConfig {
    fn default() -> Self {
        Self {
            snr_thresholds: Self::DEFAULT_SNR_THRESHOLDS,
            noise_figure_db: Self::DEFAULT_NOISE_FIGURE_DB,
        }
    }
}

// ============================================================================
// Sensitivity and Margin
// ============================================================================

/// Thermal noise floor for a bandwidth given in kHz.
pub fn noise_floor_dbm(bandwidth_khz: f64) -> f64 {
    THERMAL_NOISE_DBM_PER_HZ + 10.0 * (bandwidth_khz * 1000.0).log10()
}

/// Minimum received power needed to demodulate at a spreading factor.
///
/// `noise floor + noise figure + required SNR(sf)`.
pub fn receiver_sensitivity(spreading_factor: u8, bandwidth_khz: f64, config: &LoraPhyConfig) -> f64 {
    let sensitivity =
        noise_floor_dbm(bandwidth_khz) + config.noise_figure_db + config.snr_threshold(spreading_factor);
    debug!(
        "Rx sensitivity for SF{} at {} kHz: {:.2} dBm",
        spreading_factor, bandwidth_khz, sensitivity
    );
    sensitivity
}

/// Received power after path loss.
pub fn received_power(tx_power_dbm: f64, antenna_gain_dbi: f64, path_loss_db: f64) -> f64 {
    tx_power_dbm + antenna_gain_dbi - path_loss_db
}

/// Link margin above receiver sensitivity.
pub fn link_margin(
    tx_power_dbm: f64,
    antenna_gain_dbi: f64,
    path_loss_db: f64,
    sensitivity_dbm: f64,
) -> f64 {
    received_power(tx_power_dbm, antenna_gain_dbi, path_loss_db) - sensitivity_dbm
}
