//! Property constant definitions.
//!
//! The description string is what `lorafit properties` prints, so it should
//! be self-contained: what the value controls, its valid range and unit.
//!
//! ## Property Categories
//!
//! - **Radio** - Fixed LoRa settings and receiver characteristics
//! - **Wall** - Per-obstruction attenuation used by the wall heuristic
//! - **Floor** - Per-floor attenuation
//! - **Planner** - Spreading factor search policy
//! - **Fallback** - Spreading factors used when no link budget can be computed

use super::types::{Property, PropertyDefault};

// ============================================================================
// Radio Properties
// ============================================================================

/// Signal bandwidth in kHz.
pub const RADIO_BANDWIDTH_KHZ: Property<u32> = Property::new(
    "radio/bandwidth_khz",
    "LoRa signal bandwidth in kHz (at least 1) used for every recommendation",
    PropertyDefault::Integer(125),
)
.with_unit("kHz")
.with_range(1, u32::MAX as i64);

/// Coding rate denominator.
pub const RADIO_CODING_RATE: Property<u8> = Property::new(
    "radio/coding_rate",
    "LoRa coding rate denominator (5-8, representing 4/5 to 4/8)",
    PropertyDefault::Integer(5),
)
.with_range(5, 8);

/// Preamble length in symbols.
pub const RADIO_PREAMBLE_LENGTH: Property<u16> = Property::new(
    "radio/preamble_length",
    "Preamble length in symbols",
    PropertyDefault::Integer(8),
)
.with_unit("symbols")
.with_range(0, u16::MAX as i64);

/// Sync word. 0x12 is the private-network value.
pub const RADIO_SYNC_WORD: Property<u8> = Property::new(
    "radio/sync_word",
    "LoRa sync word, 0-255 (0x12 for private networks, 0x34 for public LoRaWAN)",
    PropertyDefault::Integer(0x12),
)
.with_range(0, u8::MAX as i64);

/// Antenna gain of one side of the link.
pub const RADIO_ANTENNA_GAIN_DBI: Property<f64> = Property::new(
    "radio/antenna_gain_dbi",
    "Antenna gain of each endpoint in dBi; the link budget uses the sum of both sides",
    PropertyDefault::Float(2.15),
)
.with_unit("dBi");

/// Receiver noise figure.
pub const RADIO_NOISE_FIGURE_DB: Property<f64> = Property::new(
    "radio/noise_figure_db",
    "Receiver noise figure added to the thermal noise floor",
    PropertyDefault::Float(6.0),
)
.with_unit("dB");

/// SNR demodulation threshold for SF7.
pub const RADIO_SNR_THRESHOLD_SF7_DB: Property<f64> = Property::new(
    "radio/snr_threshold_sf7_db",
    "SNR demodulation threshold for SF7",
    PropertyDefault::Float(-7.5),
)
.with_unit("dB");

/// SNR demodulation threshold for SF8.
pub const RADIO_SNR_THRESHOLD_SF8_DB: Property<f64> = Property::new(
    "radio/snr_threshold_sf8_db",
    "SNR demodulation threshold for SF8",
    PropertyDefault::Float(-10.0),
)
.with_unit("dB");

/// SNR demodulation threshold for SF9.
pub const RADIO_SNR_THRESHOLD_SF9_DB: Property<f64> = Property::new(
    "radio/snr_threshold_sf9_db",
    "SNR demodulation threshold for SF9",
    PropertyDefault::Float(-12.5),
)
.with_unit("dB");

/// SNR demodulation threshold for SF10.
pub const RADIO_SNR_THRESHOLD_SF10_DB: Property<f64> = Property::new(
    "radio/snr_threshold_sf10_db",
    "SNR demodulation threshold for SF10",
    PropertyDefault::Float(-15.0),
)
.with_unit("dB");

/// SNR demodulation threshold for SF11.
pub const RADIO_SNR_THRESHOLD_SF11_DB: Property<f64> = Property::new(
    "radio/snr_threshold_sf11_db",
    "SNR demodulation threshold for SF11",
    PropertyDefault::Float(-17.5),
)
.with_unit("dB");

/// SNR demodulation threshold for SF12.
pub const RADIO_SNR_THRESHOLD_SF12_DB: Property<f64> = Property::new(
    "radio/snr_threshold_sf12_db",
    "SNR demodulation threshold for SF12 (also used for out-of-range spreading factors)",
    PropertyDefault::Float(-20.0),
)
.with_unit("dB");

// ============================================================================
// Wall and Floor Attenuation
// ============================================================================

pub const WALL_DRYWALL_DB: Property<f64> = Property::new(
    "wall/drywall_db",
    "Attenuation of one drywall cell; half of it is applied per scanned cell",
    PropertyDefault::Float(1.0),
)
.with_unit("dB");

pub const WALL_BRICK_DB: Property<f64> = Property::new(
    "wall/brick_db",
    "Attenuation of one brick cell; half of it is applied per scanned cell",
    PropertyDefault::Float(6.0),
)
.with_unit("dB");

pub const WALL_CONCRETE_DB: Property<f64> = Property::new(
    "wall/concrete_db",
    "Attenuation of one concrete cell; half of it is applied per scanned cell",
    PropertyDefault::Float(29.0),
)
.with_unit("dB");

/// Loss for each floor beyond the first.
pub const FLOOR_LOSS_DB: Property<f64> = Property::new(
    "floor/loss_db",
    "Attenuation per floor crossed; a plan with N floors adds (N-1) times this value",
    PropertyDefault::Float(21.0),
)
.with_unit("dB");

// ============================================================================
// Planner Properties
// ============================================================================

/// Minimum worst-case margin for a spreading factor to qualify.
pub const PLANNER_SAFETY_MARGIN_DB: Property<f64> = Property::new(
    "planner/safety_margin_db",
    "Minimum worst-case link margin a spreading factor must reach to be selected",
    PropertyDefault::Float(5.0),
)
.with_unit("dB");

// ============================================================================
// Fallback Properties
// ============================================================================

/// Spreading factor used without a floor plan.
pub const FALLBACK_SPREADING_FACTOR: Property<u8> = Property::new(
    "fallback/spreading_factor",
    "Spreading factor (7-12) recommended when no floor plan or gateway is available",
    PropertyDefault::Integer(9),
)
.with_range(7, 12);

/// Spreading factor used when a plan has a gateway but no sensors.
pub const FALLBACK_NO_RECEIVERS_SPREADING_FACTOR: Property<u8> = Property::new(
    "fallback/no_receivers_spreading_factor",
    "Spreading factor (7-12) recommended when the plan has a gateway but no sensors",
    PropertyDefault::Integer(7),
)
.with_range(7, 12);
