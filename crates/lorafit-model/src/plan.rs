//! Floor plan payload parsing.

use lorafit_common::{FloorPlan, PlanError};

/// Parse a JSON floor plan payload.
///
/// A missing, blank or `null` payload means "no plan" and yields `Ok(None)`.
/// Anything else that does not parse into a rectangular plan is
/// [`PlanError::MalformedPlanData`].
pub fn parse_plan_payload(payload: Option<&str>) -> Result<Option<FloorPlan>, PlanError> {
    let payload = match payload.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(p) => p,
    };
    serde_json::from_str::<Option<FloorPlan>>(payload)
        .map_err(|e| PlanError::MalformedPlanData(e.to_string()))
}
