//! Spreading factor search.
//!
//! Candidates are tried in ascending order and the first one whose worst
//! receiver margin clears the safety margin wins. Higher spreading factors
//! are not evaluated once a candidate qualifies. If nothing qualifies, SF12
//! is returned with a warning.

use crate::propagation::{PathLoss, PropagationModel};
use crate::{link_margin, received_power, receiver_sensitivity, LinkError, LoraPhyConfig};
use lorafit_common::{DiagnosticLog, Grid, Position, MAX_SPREADING_FACTOR, MIN_SPREADING_FACTOR};

/// Policy applied to per-SF worst margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPolicy {
    /// Minimum acceptable worst-case margin in dB.
    pub safety_margin_db: f64,
}

impl SelectionPolicy {
    /// Default safety margin.
    pub const DEFAULT_SAFETY_MARGIN_DB: f64 = 5.0;

    /// Create a policy with an explicit safety margin.
    pub fn new(safety_margin_db: f64) -> Self {
        Self { safety_margin_db }
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            safety_margin_db: Self::DEFAULT_SAFETY_MARGIN_DB,
        }
    }
}

/// Transmit side of the link budget, shared by all receivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkBudget {
    /// Carrier frequency in MHz.
    pub frequency_mhz: f64,
    /// Signal bandwidth in kHz.
    pub bandwidth_khz: f64,
    /// Transmit power in dBm.
    pub tx_power_dbm: f64,
    /// Combined transmitter + receiver antenna gain in dBi.
    pub antenna_gain_dbi: f64,
    /// Floor count for floor loss.
    pub floors: u32,
}

/// Margin of one receiver at one spreading factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkReport {
    /// 1-based receiver index.
    pub receiver: usize,
    /// Receiver position.
    pub position: Position,
    /// Path loss breakdown.
    pub path_loss: PathLoss,
    /// Received power in dBm.
    pub rx_power_dbm: f64,
    /// Margin over sensitivity in dB.
    pub margin_db: f64,
}

/// Result of evaluating one spreading factor.
#[derive(Debug, Clone, PartialEq)]
pub struct SfEvaluation {
    /// Spreading factor.
    pub spreading_factor: u8,
    /// Receiver sensitivity in dBm.
    pub sensitivity_dbm: f64,
    /// Lowest margin over all receivers.
    pub worst_margin_db: f64,
    /// 1-based index of the first receiver with the lowest margin.
    pub worst_receiver: usize,
    /// Per-receiver reports, in receiver order.
    pub links: Vec<LinkReport>,
}

/// Outcome of the search.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Chosen spreading factor.
    pub spreading_factor: u8,
    /// Worst margin at the chosen spreading factor.
    pub worst_margin_db: f64,
    /// Whether the worst margin clears the safety margin.
    pub meets_safety_margin: bool,
    /// Evaluations performed, in ascending SF order.
    pub evaluations: Vec<SfEvaluation>,
    /// Set when no spreading factor cleared the safety margin.
    pub warning: Option<String>,
}

/// Searches spreading factors for the cheapest one that serves every receiver.
#[derive(Debug, Clone)]
pub struct SpreadingFactorSelector<'a> {
    propagation: &'a PropagationModel,
    phy: &'a LoraPhyConfig,
    policy: SelectionPolicy,
}

impl<'a> SpreadingFactorSelector<'a> {
    /// Create a selector over the given models.
    pub fn new(propagation: &'a PropagationModel, phy: &'a LoraPhyConfig, policy: SelectionPolicy) -> Self {
        Self {
            propagation,
            phy,
            policy,
        }
    }

    /// The selection policy.
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Evaluate one spreading factor against precomputed path losses.
    pub fn evaluate(
        &self,
        spreading_factor: u8,
        receivers: &[Position],
        losses: &[PathLoss],
        budget: &LinkBudget,
    ) -> Result<SfEvaluation, LinkError> {
        let sensitivity_dbm = receiver_sensitivity(spreading_factor, budget.bandwidth_khz, self.phy);
        let mut worst_margin_db = f64::INFINITY;
        let mut worst_receiver = 0;
        let mut links = Vec::with_capacity(receivers.len());

        for (i, (position, path_loss)) in receivers.iter().zip(losses).enumerate() {
            let total = path_loss.total_db();
            let rx_power_dbm = received_power(budget.tx_power_dbm, budget.antenna_gain_dbi, total);
            let margin_db = link_margin(budget.tx_power_dbm, budget.antenna_gain_dbi, total, sensitivity_dbm);
            if !margin_db.is_finite() {
                return Err(LinkError::NonFinite {
                    quantity: "link margin",
                    receiver: i + 1,
                    spreading_factor,
                });
            }
            if margin_db < worst_margin_db {
                worst_margin_db = margin_db;
                worst_receiver = i + 1;
            }
            links.push(LinkReport {
                receiver: i + 1,
                position: *position,
                path_loss: *path_loss,
                rx_power_dbm,
                margin_db,
            });
        }

        Ok(SfEvaluation {
            spreading_factor,
            sensitivity_dbm,
            worst_margin_db,
            worst_receiver,
            links,
        })
    }

    /// Run the search, appending the trace to `log`.
    pub fn select(
        &self,
        grid: &Grid,
        transmitter: &Position,
        receivers: &[Position],
        budget: &LinkBudget,
        log: &mut DiagnosticLog,
    ) -> Result<Selection, LinkError> {
        if receivers.is_empty() {
            return Err(LinkError::NoReceivers);
        }
        validate_positive("frequency", budget.frequency_mhz)?;
        validate_positive("bandwidth", budget.bandwidth_khz)?;

        // Path loss does not depend on the spreading factor.
        let losses: Vec<PathLoss> = receivers
            .iter()
            .map(|rx| {
                self.propagation
                    .path_loss(grid, transmitter, rx, budget.frequency_mhz, budget.floors)
            })
            .collect();

        let threshold = self.policy.safety_margin_db;
        let mut evaluations = Vec::new();

        for sf in MIN_SPREADING_FACTOR..=MAX_SPREADING_FACTOR {
            let evaluation = self.evaluate(sf, receivers, &losses, budget)?;
            record_evaluation(log, &evaluation);

            let qualifies = evaluation.worst_margin_db >= threshold;
            let worst = evaluation.worst_margin_db;
            evaluations.push(evaluation);

            if qualifies {
                log.push(format!(
                    "Selected SF{} as the lowest spreading factor with a worst-case margin of {:.1} dB (>= {:.1} dB) for all receivers.",
                    sf, worst, threshold
                ));
                return Ok(Selection {
                    spreading_factor: sf,
                    worst_margin_db: worst,
                    meets_safety_margin: true,
                    evaluations,
                    warning: None,
                });
            }
        }

        let worst = evaluations
            .last()
            .map(|e| e.worst_margin_db)
            .unwrap_or(f64::NEG_INFINITY);
        let warning = format!(
            "Selected SF{} but the worst link margin ({:.1} dB) is below the recommended {:.1} dB. The most distant or obstructed receiver may be unreliable; consider moving the gateway.",
            MAX_SPREADING_FACTOR, worst, threshold
        );
        log.push(format!("Warning: {}", warning));

        Ok(Selection {
            spreading_factor: MAX_SPREADING_FACTOR,
            worst_margin_db: worst,
            meets_safety_margin: false,
            evaluations,
            warning: Some(warning),
        })
    }
}

fn validate_positive(name: &'static str, value: f64) -> Result<(), LinkError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LinkError::InvalidParameter { name, value })
    }
}

fn record_evaluation(log: &mut DiagnosticLog, evaluation: &SfEvaluation) {
    log.push(format!(
        "--- SF{} (sensitivity {:.1} dBm) ---",
        evaluation.spreading_factor, evaluation.sensitivity_dbm
    ));
    for link in &evaluation.links {
        let pl = &link.path_loss;
        log.push(format!(
            "  Receiver {} @ {}: distance={:.1} m, fspl={:.1} dB, wall={:.1} dB, floor={:.1} dB -> path loss={:.1} dB, rx={:.1} dBm, margin={:.1} dB",
            link.receiver,
            link.position,
            pl.distance_m,
            pl.fspl_db,
            pl.wall_loss_db,
            pl.floor_loss_db,
            pl.total_db(),
            link.rx_power_dbm,
            link.margin_db
        ));
    }
    log.push(format!(
        "  Worst margin at SF{}: {:.1} dB (receiver {})",
        evaluation.spreading_factor, evaluation.worst_margin_db, evaluation.worst_receiver
    ));
}
