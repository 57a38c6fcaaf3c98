//! Tiered parameter assembly.
//!
//! Input is classified into one of three tiers before any computation:
//!
//! | Tier | Input                              | Result                         |
//! |------|------------------------------------|--------------------------------|
//! | 0    | no grid or no gateway              | default set, SF9, error        |
//! | 1    | gateway, no sensors                | optimistic set, SF7, warning   |
//! | 2    | gateway and at least one sensor    | spreading factor search        |
//!
//! A payload that does not parse, or a failure inside the Tier 2
//! computation, is absorbed into a fixed fallback set (Tier 3). The
//! assembler never returns an error.

use crate::config::{PlannerConfig, RadioDefaults};
use crate::plan::parse_plan_payload;
use lorafit_common::{
    DiagnosticLog, EnvironmentDescriptor, FloorPlan, Grid, LoRaParameterSet, PlanError, Position,
    RegionProfile, DEFAULT_REGION,
};
use lorafit_lora::{free_space_path_loss, LinkBudget, SpreadingFactorSelector, REFERENCE_DISTANCE_M};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

/// Counter incremented once per assembled outcome, labelled by `tier`.
pub const REQUESTS_METRIC: &str = "lorafit.planner.requests";

/// Spreading factor of the Tier 3 fallback set.
pub const SAFE_FALLBACK_SPREADING_FACTOR: u8 = 9;

const MISSING_GATEWAY_STATUS: &str = "Fallback due to missing gateway on plan.";
const INVALID_PLAN_STATUS: &str = "Invalid plan data.";
const CALCULATION_FAILED_STATUS: &str = "Calculation failed.";

// ============================================================================
// Tiers
// ============================================================================

/// Which path produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    /// Tier 0: no usable floor plan.
    NoPlan,
    /// Tier 1: gateway placed, no sensors.
    NoReceivers,
    /// Tier 2: full computation.
    FullPlan,
    /// Tier 3: malformed input or internal failure.
    Fallback,
}

impl PlanTier {
    /// Tier of a floor plan, before any computation.
    ///
    /// Never returns [`PlanTier::Fallback`].
    pub fn classify(plan: Option<&FloorPlan>) -> PlanTier {
        PlanInput::classify(plan).tier()
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            PlanTier::NoPlan => "no_plan",
            PlanTier::NoReceivers => "no_receivers",
            PlanTier::FullPlan => "full_plan",
            PlanTier::Fallback => "fallback",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classified input with the borrowed pieces each tier needs.
enum PlanInput<'a> {
    NoPlan,
    NoReceivers,
    Full {
        grid: &'a Grid,
        transmitter: &'a Position,
        receivers: &'a [Position],
        floors: u32,
    },
}

impl<'a> PlanInput<'a> {
    fn classify(plan: Option<&'a FloorPlan>) -> Self {
        let Some(plan) = plan else {
            return PlanInput::NoPlan;
        };
        let (grid, transmitter) = match (&plan.grid, &plan.transmitter) {
            (Some(grid), Some(transmitter)) if !grid.is_empty() => (grid, transmitter),
            _ => return PlanInput::NoPlan,
        };
        if plan.receivers.is_empty() {
            return PlanInput::NoReceivers;
        }
        PlanInput::Full {
            grid,
            transmitter,
            receivers: &plan.receivers,
            floors: plan.floors(),
        }
    }

    fn tier(&self) -> PlanTier {
        match self {
            PlanInput::NoPlan => PlanTier::NoPlan,
            PlanInput::NoReceivers => PlanTier::NoReceivers,
            PlanInput::Full { .. } => PlanTier::FullPlan,
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Parameters plus the error list and diagnostic trace that explain them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    /// Recommended parameters; always usable.
    pub parameters: LoRaParameterSet,
    /// User-visible error strings.
    pub errors: Vec<String>,
    /// Ordered computation trace.
    pub diagnostics: DiagnosticLog,
    /// Path that produced the parameters.
    pub tier: PlanTier,
}

// ============================================================================
// Assembler
// ============================================================================

/// Turns a region and floor plan into a parameter set.
#[derive(Debug, Clone, Default)]
pub struct ParameterAssembler {
    config: PlannerConfig,
}

impl ParameterAssembler {
    /// Create an assembler with a fixed configuration.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Parse a JSON plan payload and assemble. Parse failures yield the
    /// Tier 3 fallback set.
    pub fn assemble_payload(
        &self,
        region: &str,
        payload: Option<&str>,
        environment: &EnvironmentDescriptor,
    ) -> PlanOutcome {
        match parse_plan_payload(payload) {
            Ok(plan) => self.assemble(region, plan.as_ref(), environment),
            Err(err) => {
                let mut errors = Vec::new();
                let mut diagnostics = DiagnosticLog::new();
                resolve_region(region, &mut errors);
                let parameters = fallback_parameters(&err, &mut errors, &mut diagnostics);
                finish(PlanTier::Fallback, parameters, errors, diagnostics)
            }
        }
    }

    /// Assemble parameters for an already parsed plan.
    pub fn assemble(
        &self,
        region: &str,
        plan: Option<&FloorPlan>,
        environment: &EnvironmentDescriptor,
    ) -> PlanOutcome {
        let mut errors = Vec::new();
        let mut diagnostics = DiagnosticLog::new();
        let profile = resolve_region(region, &mut errors);

        let input = PlanInput::classify(plan);
        let tier = input.tier();
        info!("Assembling parameters for {} ({} tier)", profile.code, tier);

        let result = match input {
            PlanInput::NoPlan => Ok(self.no_plan(&profile, environment, &mut errors, &mut diagnostics)),
            PlanInput::NoReceivers => Ok(self.no_receivers(&profile, environment, &mut diagnostics)),
            PlanInput::Full {
                grid,
                transmitter,
                receivers,
                floors,
            } => self.full_plan(&profile, grid, transmitter, receivers, floors, &mut diagnostics),
        };

        match result {
            Ok(parameters) => finish(tier, parameters, errors, diagnostics),
            Err(err) => {
                error!("Parameter calculation failed: {}", err);
                let parameters = fallback_parameters(&err, &mut errors, &mut diagnostics);
                finish(PlanTier::Fallback, parameters, errors, diagnostics)
            }
        }
    }

    fn no_plan(
        &self,
        profile: &RegionProfile,
        environment: &EnvironmentDescriptor,
        errors: &mut Vec<String>,
        diagnostics: &mut DiagnosticLog,
    ) -> LoRaParameterSet {
        warn!("No usable floor plan; returning default parameters");
        errors.push(PlanError::MissingPlanInput.to_string());
        diagnostics.push("Warning: Floor plan data missing (no gateway placed), using default parameters.");
        diagnostics.push(format!("Environment estimate: {}", environment));

        let mut parameters = base_parameters(
            &self.config.radio,
            profile.frequency_mhz,
            profile.default_tx_power_dbm,
            self.config.fallback.no_plan_spreading_factor,
        );
        parameters.error_message = Some(MISSING_GATEWAY_STATUS.to_string());
        parameters
    }

    fn no_receivers(
        &self,
        profile: &RegionProfile,
        environment: &EnvironmentDescriptor,
        diagnostics: &mut DiagnosticLog,
    ) -> LoRaParameterSet {
        let sf = self.config.fallback.no_receivers_spreading_factor;
        warn!("Floor plan has no sensors; returning optimistic SF{}", sf);
        diagnostics.push(format!("Warning: {}", PlanError::NoReceiversInput));
        diagnostics.push(format!("Environment estimate: {}", environment));

        let mut parameters = base_parameters(
            &self.config.radio,
            profile.frequency_mhz,
            profile.default_tx_power_dbm,
            sf,
        );
        parameters.warning_message = Some(format!(
            "No sensors placed, using optimistic defaults (SF{}).",
            sf
        ));
        parameters
    }

    fn full_plan(
        &self,
        profile: &RegionProfile,
        grid: &Grid,
        transmitter: &Position,
        receivers: &[Position],
        floors: u32,
        diagnostics: &mut DiagnosticLog,
    ) -> Result<LoRaParameterSet, PlanError> {
        let radio = &self.config.radio;
        let budget = LinkBudget {
            frequency_mhz: profile.frequency_mhz,
            bandwidth_khz: f64::from(radio.bandwidth_khz),
            tx_power_dbm: f64::from(profile.default_tx_power_dbm),
            antenna_gain_dbi: radio.total_antenna_gain_dbi(),
            floors,
        };

        diagnostics.push(format!(
            "Initial parameters: region={}, frequency={:.1} MHz, bandwidth={} kHz, tx power={} dBm, antenna gain={:.2} dBi",
            profile.code,
            budget.frequency_mhz,
            radio.bandwidth_khz,
            profile.default_tx_power_dbm,
            budget.antenna_gain_dbi
        ));
        diagnostics.push(format!(
            "Floor plan: {}x{} grid, gateway @ {}, {} receiver(s), {} floor(s)",
            grid.rows(),
            grid.cols(),
            transmitter,
            receivers.len(),
            floors
        ));
        diagnostics.push(format!(
            "Reference path loss (PL0 @ {} m): {:.2} dB",
            REFERENCE_DISTANCE_M,
            free_space_path_loss(REFERENCE_DISTANCE_M, budget.frequency_mhz)
        ));

        let selector = SpreadingFactorSelector::new(
            &self.config.propagation,
            &self.config.phy,
            self.config.policy,
        );
        let selection = selector.select(grid, transmitter, receivers, &budget, diagnostics)?;

        info!(
            "Selected SF{} with worst margin {:.1} dB over {} receiver(s)",
            selection.spreading_factor,
            selection.worst_margin_db,
            receivers.len()
        );
        if let Some(warning) = &selection.warning {
            warn!("{}", warning);
        }

        let mut parameters = base_parameters(
            radio,
            profile.frequency_mhz,
            profile.default_tx_power_dbm,
            selection.spreading_factor,
        );
        parameters.worst_link_margin_db = Some(round_tenth(selection.worst_margin_db));
        parameters.warning_message = selection.warning;
        Ok(parameters)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn resolve_region(region: &str, errors: &mut Vec<String>) -> RegionProfile {
    match RegionProfile::lookup(region) {
        Some(profile) => *profile,
        None => {
            warn!("Unknown region '{}', using {}", region, DEFAULT_REGION.code);
            errors.push(PlanError::InvalidRegion(region.to_string()).to_string());
            DEFAULT_REGION
        }
    }
}

fn base_parameters(
    radio: &RadioDefaults,
    frequency_mhz: f64,
    tx_power_dbm: i8,
    spreading_factor: u8,
) -> LoRaParameterSet {
    LoRaParameterSet {
        frequency_mhz,
        spreading_factor,
        bandwidth_khz: radio.bandwidth_khz,
        coding_rate_denominator: radio.coding_rate_denominator,
        tx_power_dbm,
        preamble_length: radio.preamble_length,
        sync_word: radio.sync_word,
        antenna_gain_dbi: radio.total_antenna_gain_dbi(),
        worst_link_margin_db: None,
        error_message: None,
        warning_message: None,
    }
}

/// Tier 3 set. Independent of configuration and region.
fn fallback_parameters(
    err: &PlanError,
    errors: &mut Vec<String>,
    diagnostics: &mut DiagnosticLog,
) -> LoRaParameterSet {
    let status = match err {
        PlanError::MalformedPlanData(detail) => {
            warn!("Malformed floor plan payload: {}", detail);
            diagnostics.push("Error: Could not parse floor plan data.");
            INVALID_PLAN_STATUS
        }
        other => {
            diagnostics.push(format!("Error: {}", other));
            CALCULATION_FAILED_STATUS
        }
    };
    errors.push(err.to_string());

    let mut parameters = base_parameters(
        &RadioDefaults::default(),
        DEFAULT_REGION.frequency_mhz,
        DEFAULT_REGION.default_tx_power_dbm,
        SAFE_FALLBACK_SPREADING_FACTOR,
    );
    parameters.error_message = Some(status.to_string());
    parameters
}

fn finish(
    tier: PlanTier,
    parameters: LoRaParameterSet,
    errors: Vec<String>,
    diagnostics: DiagnosticLog,
) -> PlanOutcome {
    let labels = vec![("tier", tier.label().to_string())];
    metrics::counter!(REQUESTS_METRIC, &labels).increment(1);

    PlanOutcome {
        parameters,
        errors,
        diagnostics,
        tier,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{ResolvedProperties, RADIO_BANDWIDTH_KHZ};
    use lorafit_common::CellType;
    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn plan(grid: Grid, transmitter: Option<Position>, receivers: Vec<Position>) -> FloorPlan {
        FloorPlan {
            grid: Some(grid),
            transmitter,
            receivers,
            floors: None,
        }
    }

    fn assemble(region: &str, plan: Option<&FloorPlan>) -> PlanOutcome {
        ParameterAssembler::default().assemble(region, plan, &EnvironmentDescriptor::default())
    }

    fn assert_defaults(parameters: &LoRaParameterSet) {
        assert_eq!(parameters.bandwidth_khz, 125);
        assert_eq!(parameters.coding_rate(), "4/5");
        assert_eq!(parameters.preamble_length, 8);
        assert_eq!(parameters.sync_word, 0x12);
        assert!((parameters.antenna_gain_dbi - 4.3).abs() < 1e-12);
    }

    #[test]
    fn test_short_clear_link() {
        let floor_plan = plan(Grid::empty(4, 4), Some(Position::new(0, 0)), vec![Position::new(0, 3)]);
        let outcome = assemble("EU868", Some(&floor_plan));

        assert_eq!(outcome.tier, PlanTier::FullPlan);
        assert!(outcome.errors.is_empty());
        let p = &outcome.parameters;
        assert!(p.spreading_factor == 7 || p.spreading_factor == 8);
        assert_eq!(p.tx_power_dbm, 14);
        assert_eq!(p.frequency_mhz, 868.0);
        assert!(p.worst_link_margin_db.unwrap() >= 5.0);
        assert!(p.error_message.is_none());
        assert!(p.warning_message.is_none());
        assert_defaults(p);
    }

    #[test]
    fn test_concrete_wall_raises_spreading_factor() {
        let open = FloorPlan {
            floors: Some(2),
            ..plan(Grid::empty(6, 6), Some(Position::new(0, 0)), vec![Position::new(5, 5)])
        };
        let walled = FloorPlan {
            grid: Some(Grid::empty(6, 6).with_cell(3, 0, CellType::Concrete)),
            ..open.clone()
        };

        let open_outcome = assemble("EU868", Some(&open));
        let walled_outcome = assemble("EU868", Some(&walled));

        assert!(walled_outcome.parameters.spreading_factor > open_outcome.parameters.spreading_factor);
        assert!(walled_outcome
            .diagnostics
            .iter()
            .any(|line| line.contains("wall=14.5 dB")));
    }

    #[test]
    fn test_missing_gateway_uses_tier0_defaults() {
        let floor_plan = plan(Grid::empty(4, 4), None, vec![Position::new(1, 1)]);
        let outcome = assemble("US915", Some(&floor_plan));

        assert_eq!(outcome.tier, PlanTier::NoPlan);
        let p = &outcome.parameters;
        assert_eq!(p.spreading_factor, 9);
        assert_eq!(p.tx_power_dbm, 20);
        assert_eq!(p.frequency_mhz, 915.0);
        assert!(p.worst_link_margin_db.is_none());
        assert_eq!(p.error_message.as_deref(), Some("Fallback due to missing gateway on plan."));
        assert_defaults(p);
        assert_eq!(outcome.errors, vec![PlanError::MissingPlanInput.to_string()]);
    }

    #[test]
    fn test_absent_or_empty_grid_is_tier0() {
        assert_eq!(assemble("EU868", None).tier, PlanTier::NoPlan);

        let empty = plan(Grid::empty(0, 0), Some(Position::new(0, 0)), vec![Position::new(0, 1)]);
        assert_eq!(assemble("EU868", Some(&empty)).tier, PlanTier::NoPlan);

        let no_grid = FloorPlan {
            grid: None,
            transmitter: Some(Position::new(0, 0)),
            receivers: vec![Position::new(0, 1)],
            floors: None,
        };
        assert_eq!(PlanTier::classify(Some(&no_grid)), PlanTier::NoPlan);
    }

    #[test]
    fn test_no_receivers_is_optimistic() {
        let floor_plan = plan(Grid::empty(4, 4), Some(Position::new(0, 0)), vec![]);
        let outcome = assemble("EU868", Some(&floor_plan));

        assert_eq!(outcome.tier, PlanTier::NoReceivers);
        let p = &outcome.parameters;
        assert_eq!(p.spreading_factor, 7);
        assert!(p.worst_link_margin_db.is_none());
        assert_eq!(
            p.warning_message.as_deref(),
            Some("No sensors placed, using optimistic defaults (SF7).")
        );
        assert!(p.error_message.is_none());
        assert!(outcome.errors.is_empty());
        assert_defaults(p);
    }

    #[test]
    fn test_malformed_payload_is_tier3() {
        let outcome = ParameterAssembler::default().assemble_payload(
            "US915",
            Some("{not json"),
            &EnvironmentDescriptor::default(),
        );

        assert_eq!(outcome.tier, PlanTier::Fallback);
        let p = &outcome.parameters;
        assert_eq!(p.spreading_factor, 9);
        assert_eq!(p.tx_power_dbm, 14);
        assert!(p.worst_link_margin_db.is_none());
        assert_eq!(p.error_message.as_deref(), Some("Invalid plan data."));
        assert_eq!(outcome.errors, vec!["Invalid floor plan data format.".to_string()]);
        assert_defaults(p);
    }

    #[test]
    fn test_internal_failure_is_tier3() {
        let mut props = ResolvedProperties::new();
        props.set(&RADIO_BANDWIDTH_KHZ, 0);
        let config = PlannerConfig::from_properties(&props).unwrap();
        let floor_plan = plan(Grid::empty(4, 4), Some(Position::new(0, 0)), vec![Position::new(0, 3)]);

        let outcome = ParameterAssembler::new(config).assemble(
            "EU868",
            Some(&floor_plan),
            &EnvironmentDescriptor::default(),
        );

        assert_eq!(outcome.tier, PlanTier::Fallback);
        assert_eq!(outcome.parameters.spreading_factor, 9);
        // The fallback set ignores the broken configuration.
        assert_eq!(outcome.parameters.bandwidth_khz, 125);
        assert_eq!(outcome.parameters.error_message.as_deref(), Some("Calculation failed."));
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("Internal error during parameter calculation: "));
    }

    #[test]
    fn test_unknown_region_falls_back_to_eu868() {
        let floor_plan = plan(Grid::empty(4, 4), Some(Position::new(0, 0)), vec![Position::new(0, 3)]);
        let outcome = assemble("XX999", Some(&floor_plan));

        assert_eq!(outcome.tier, PlanTier::FullPlan);
        assert_eq!(outcome.parameters.frequency_mhz, 868.0);
        assert_eq!(outcome.parameters.tx_power_dbm, 14);
        assert_eq!(outcome.errors, vec!["Invalid region: XX999".to_string()]);
    }

    #[test]
    fn test_diagnostic_trace_order() {
        let floor_plan = plan(Grid::empty(4, 4), Some(Position::new(0, 0)), vec![Position::new(0, 3)]);
        let outcome = assemble("EU868", Some(&floor_plan));
        let lines = outcome.diagnostics.entries();

        assert!(lines[0].starts_with("Initial parameters: region=EU868"));
        assert!(lines[1].contains("4x4 grid"));
        assert!(lines[2].starts_with("Reference path loss"));
        assert!(lines[3].starts_with("--- SF7"));
        assert!(lines[lines.len() - 1].starts_with("Selected SF7"));
    }

    #[test]
    fn test_identical_inputs_identical_outcomes() {
        let floor_plan = plan(
            Grid::empty(8, 8)
                .with_cell(2, 0, CellType::Brick)
                .with_cell(7, 4, CellType::Concrete),
            Some(Position::new(0, 0)),
            vec![Position::new(7, 7), Position::new(3, 5)],
        );
        let first = assemble("AS923", Some(&floor_plan));
        let second = assemble("AS923", Some(&floor_plan));
        assert_eq!(first, second);
    }

    #[test]
    fn test_selected_sf_meets_margin_or_warns() {
        for floors in 1..=8 {
            for distance in [1, 5, 20, 60] {
                let floor_plan = FloorPlan {
                    floors: Some(floors),
                    ..plan(
                        Grid::empty(1, distance as usize + 1)
                            .with_cell(0, distance as usize / 2, CellType::Concrete),
                        Some(Position::new(0, 0)),
                        vec![Position::new(0, distance)],
                    )
                };
                let p = assemble("EU868", Some(&floor_plan)).parameters;
                assert!((7..=12).contains(&p.spreading_factor));
                let margin = p.worst_link_margin_db.unwrap();
                assert!(
                    margin >= 5.0 || (p.spreading_factor == 12 && p.warning_message.is_some()),
                    "floors={} distance={} sf={} margin={}",
                    floors,
                    distance,
                    p.spreading_factor,
                    margin
                );
            }
        }
    }

    #[test]
    fn test_margin_rounded_to_tenth() {
        let floor_plan = plan(Grid::empty(4, 4), Some(Position::new(0, 0)), vec![Position::new(0, 3)]);
        let margin = assemble("EU868", Some(&floor_plan))
            .parameters
            .worst_link_margin_db
            .unwrap();
        assert_eq!(margin, round_tenth(margin));
        assert!((margin - 42.1).abs() < 0.051);
    }

    #[test]
    fn test_extreme_coordinates_do_not_panic() {
        let payload = r#"{"grid":[["empty","empty"]],"gateway":{"row":-2147483648,"col":0},"sensors":[{"row":2147483647,"col":0}]}"#;
        let outcome = ParameterAssembler::default().assemble_payload(
            "EU868",
            Some(payload),
            &EnvironmentDescriptor::default(),
        );

        assert_eq!(outcome.tier, PlanTier::FullPlan);
        let p = &outcome.parameters;
        assert_eq!(p.spreading_factor, 12);
        assert!(p.warning_message.is_some());
        assert!(p.worst_link_margin_db.unwrap().is_finite());
    }

    #[test]
    fn test_far_off_grid_receiver() {
        let floor_plan = plan(
            Grid::empty(2, 2),
            Some(Position::new(0, 0)),
            vec![Position::new(400_000_000, 0), Position::new(0, 1)],
        );
        let outcome = assemble("EU868", Some(&floor_plan));

        assert_eq!(outcome.tier, PlanTier::FullPlan);
        assert_eq!(outcome.parameters.spreading_factor, 12);
        assert!(outcome
            .diagnostics
            .iter()
            .any(|line| line.contains("wall=0.0 dB")));
    }

    // ------------------------------------------------------------------------
    // Request counter
    // ------------------------------------------------------------------------

    type Counts = Arc<Mutex<HashMap<String, u64>>>;

    /// Records `REQUESTS_METRIC` increments by tier label.
    #[derive(Default)]
    struct TierRecorder {
        counts: Counts,
    }

    struct TierCounter {
        tier: String,
        counts: Counts,
    }

    impl metrics::CounterFn for TierCounter {
        fn increment(&self, value: u64) {
            *self.counts.lock().unwrap().entry(self.tier.clone()).or_default() += value;
        }

        fn absolute(&self, value: u64) {
            self.counts.lock().unwrap().insert(self.tier.clone(), value);
        }
    }

    impl Recorder for TierRecorder {
        fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

        fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

        fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

        fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
            if key.name() != REQUESTS_METRIC {
                return Counter::noop();
            }
            let tier = key
                .labels()
                .find(|label| label.key() == "tier")
                .map(|label| label.value().to_string())
                .unwrap_or_default();
            Counter::from_arc(Arc::new(TierCounter {
                tier,
                counts: Arc::clone(&self.counts),
            }))
        }

        fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_request_counter_labels_each_tier() {
        let recorder = TierRecorder::default();
        let full = plan(Grid::empty(2, 4), Some(Position::new(0, 0)), vec![Position::new(0, 3)]);
        let lonely = plan(Grid::empty(2, 4), Some(Position::new(0, 0)), Vec::new());

        metrics::with_local_recorder(&recorder, || {
            let assembler = ParameterAssembler::default();
            let env = EnvironmentDescriptor::default();
            assembler.assemble("EU868", None, &env);
            assembler.assemble("EU868", Some(&lonely), &env);
            assembler.assemble("EU868", Some(&full), &env);
            assembler.assemble("EU868", Some(&full), &env);
            assembler.assemble_payload("EU868", Some("{not json"), &env);
        });

        let counts = recorder.counts.lock().unwrap();
        assert_eq!(counts.get("no_plan"), Some(&1));
        assert_eq!(counts.get("no_receivers"), Some(&1));
        assert_eq!(counts.get("full_plan"), Some(&2));
        assert_eq!(counts.get("fallback"), Some(&1));
        assert_eq!(counts.values().sum::<u64>(), 5);
    }
}
