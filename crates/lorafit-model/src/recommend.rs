//! Complete recommendations: parameters, display view and layout advice.

use crate::assembler::{ParameterAssembler, PlanTier};
use lorafit_common::{DiagnosticLog, EnvironmentDescriptor, LoRaParameterSet, ParameterDisplay};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spreading factor from which range becomes a concern.
const RANGE_CHALLENGE_SF: u8 = 11;
/// Footprint above which range becomes a concern (m²).
const RANGE_CHALLENGE_SIZE_SQM: f64 = 200.0;
/// Floor count above which range becomes a concern.
const RANGE_CHALLENGE_FLOORS: u32 = 2;

const GENERAL_TIPS: &[&str] = &[
    "Place gateway centrally, ideally on a middle floor.",
    "Avoid metal obstructions near gateway/nodes.",
];

/// Network topology requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    /// Two nodes talking directly.
    P2p,
    /// Several sensors reporting to one gateway.
    #[default]
    MultiNode,
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p2p" => Ok(NetworkType::P2p),
            "multi_node" => Ok(NetworkType::MultiNode),
            other => Err(format!(
                "unknown network type '{}' (expected p2p or multi_node)",
                other
            )),
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::P2p => f.write_str("p2p"),
            NetworkType::MultiNode => f.write_str("multi_node"),
        }
    }
}

fn default_region() -> String {
    "EU868".to_string()
}

/// One recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Region code.
    #[serde(default = "default_region")]
    pub region: String,
    /// JSON floor plan payload, if any.
    #[serde(default)]
    pub floorplan_data: Option<String>,
    /// Coarse environment description.
    #[serde(flatten)]
    pub environment: EnvironmentDescriptor,
    /// Requested topology.
    #[serde(default)]
    pub network_type: NetworkType,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            region: default_region(),
            floorplan_data: None,
            environment: EnvironmentDescriptor::default(),
            network_type: NetworkType::default(),
        }
    }
}

/// Everything returned for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Raw parameters for code generation.
    pub parameters: LoRaParameterSet,
    /// Formatted parameters for display.
    pub display: ParameterDisplay,
    /// Placement advice.
    pub layout_tips: Vec<String>,
    /// User-visible errors.
    pub errors: Vec<String>,
    /// Computation trace.
    pub diagnostics: DiagnosticLog,
    /// Path that produced the parameters.
    pub tier: PlanTier,
}

/// Run the assembler and attach layout advice.
pub fn recommend(assembler: &ParameterAssembler, request: &RecommendationRequest) -> Recommendation {
    let outcome = assembler.assemble_payload(
        &request.region,
        request.floorplan_data.as_deref(),
        &request.environment,
    );
    let layout_tips = layout_advice(
        outcome.parameters.spreading_factor,
        &request.environment,
        request.network_type,
    );

    Recommendation {
        display: outcome.parameters.display(),
        parameters: outcome.parameters,
        layout_tips,
        errors: outcome.errors,
        diagnostics: outcome.diagnostics,
        tier: outcome.tier,
    }
}

/// Placement tips for a selected spreading factor and environment.
pub fn layout_advice(
    spreading_factor: u8,
    environment: &EnvironmentDescriptor,
    network_type: NetworkType,
) -> Vec<String> {
    let mut tips: Vec<String> = GENERAL_TIPS.iter().map(|t| t.to_string()).collect();

    let size_sqm = environment.size_sqm_or_default();
    let floors = environment.floors_or_default();
    let wall_type = environment.wall_type_or_default();

    if spreading_factor >= RANGE_CHALLENGE_SF
        || size_sqm > RANGE_CHALLENGE_SIZE_SQM
        || floors > RANGE_CHALLENGE_FLOORS
        || wall_type == "concrete"
    {
        tips.push(format!(
            "Your environment (Size:{:.0}m², Floors:{}, Walls:{}, resulting SF:{}) suggests potential range challenges. Optimize gateway placement (high, central). A LoRa repeater might be needed if devices struggle.",
            size_sqm, floors, wall_type, spreading_factor
        ));
    }

    if network_type == NetworkType::P2p {
        tips.push("For P2P, minimize obstructions between nodes for best signal.".to_string());
    }

    tips
}
