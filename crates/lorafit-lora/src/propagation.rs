//! Indoor propagation estimates over a floor plan grid.
//!
//! Path loss is free-space loss referenced to 1 m plus a wall term and a
//! per-floor term. The wall term is a heuristic scan, not a ray trace: it
//! walks the source column across the rows between the endpoints, then the
//! destination row across the columns between them, adding half of each
//! obstructing cell's attenuation. Cells on both scan lines (the corner) are
//! counted twice at half weight.

use lorafit_common::{CellType, Grid, Position};
use std::ops::RangeInclusive;
use tracing::debug;

/// Reference distance for free-space loss (meters).
pub const REFERENCE_DISTANCE_M: f64 = 1.0;

/// Free-space path loss constant for distance in meters and frequency in MHz.
pub const FSPL_CONSTANT_DB: f64 = 32.44;

/// Straight-line distance between two grid positions in meters.
///
/// Returns 0 if either position is absent.
pub fn distance(a: Option<&Position>, b: Option<&Position>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let dr = f64::from(a.row) - f64::from(b.row);
            let dc = f64::from(a.col) - f64::from(b.col);
            (dr * dr + dc * dc).sqrt()
        }
        _ => 0.0,
    }
}

/// Free-space path loss in dB.
///
/// Distances under 1 m are clamped to 1 m.
pub fn free_space_path_loss(distance_m: f64, frequency_mhz: f64) -> f64 {
    20.0 * distance_m.max(REFERENCE_DISTANCE_M).log10()
        + 20.0 * frequency_mhz.log10()
        + FSPL_CONSTANT_DB
}

/// Attenuation per obstruction type in dB.
#[derive(Debug, Clone, PartialEq)]
pub struct WallAttenuation {
    /// Drywall attenuation.
    pub drywall_db: f64,
    /// Brick attenuation.
    pub brick_db: f64,
    /// Concrete attenuation.
    pub concrete_db: f64,
}

impl WallAttenuation {
    /// Full attenuation of one cell. Non-wall cells attenuate nothing.
    pub fn for_cell(&self, cell: CellType) -> f64 {
        match cell {
            CellType::Drywall => self.drywall_db,
            CellType::Brick => self.brick_db,
            CellType::Concrete => self.concrete_db,
            CellType::Empty | CellType::Gateway | CellType::Sensor | CellType::Unknown => 0.0,
        }
    }
}

impl Default for WallAttenuation {
    fn default() -> Self {
        Self {
            drywall_db: 1.0,
            brick_db: 6.0,
            concrete_db: 29.0,
        }
    }
}

/// Breakdown of the loss on one transmitter/receiver path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLoss {
    /// Separation in meters (unclamped).
    pub distance_m: f64,
    /// Free-space component.
    pub fspl_db: f64,
    /// Wall heuristic component.
    pub wall_loss_db: f64,
    /// Floor component.
    pub floor_loss_db: f64,
}

impl PathLoss {
    /// Sum of all components.
    pub fn total_db(&self) -> f64 {
        self.fspl_db + self.wall_loss_db + self.floor_loss_db
    }
}

/// Propagation model with fixed attenuation tables.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationModel {
    attenuation: WallAttenuation,
    floor_loss_db: f64,
}

impl PropagationModel {
    /// Default loss per additional floor.
    pub const DEFAULT_FLOOR_LOSS_DB: f64 = 21.0;

    /// Create a model from attenuation tables.
    pub fn new(attenuation: WallAttenuation, floor_loss_db: f64) -> Self {
        Self {
            attenuation,
            floor_loss_db,
        }
    }

    /// The wall attenuation table.
    pub fn attenuation(&self) -> &WallAttenuation {
        &self.attenuation
    }

    /// Heuristic wall loss between two positions (see module docs).
    ///
    /// Out-of-bounds cells contribute nothing, so both scans are clamped to
    /// the grid.
    pub fn wall_loss(&self, grid: &Grid, from: &Position, to: &Position) -> f64 {
        let mut loss = 0.0;

        for row in clamped_span(from.row, to.row, grid.rows()) {
            if let Some(cell) = grid.get(row, from.col) {
                loss += self.half_weighted(cell);
            }
        }

        for col in clamped_span(from.col, to.col, grid.cols()) {
            if let Some(cell) = grid.get(to.row, col) {
                loss += self.half_weighted(cell);
            }
        }

        debug!("Estimated wall loss between {} and {}: {:.1} dB", from, to, loss);
        loss
    }

    fn half_weighted(&self, cell: CellType) -> f64 {
        if cell.is_obstruction() {
            self.attenuation.for_cell(cell) / 2.0
        } else {
            0.0
        }
    }

    /// Loss for `floors - 1` floor crossings. A count of 0 is treated as 1.
    pub fn floor_loss(&self, floors: u32) -> f64 {
        f64::from(floors.saturating_sub(1)) * self.floor_loss_db
    }

    /// Full loss breakdown for one path.
    pub fn path_loss(
        &self,
        grid: &Grid,
        from: &Position,
        to: &Position,
        frequency_mhz: f64,
        floors: u32,
    ) -> PathLoss {
        let distance_m = distance(Some(from), Some(to));
        PathLoss {
            distance_m,
            fspl_db: free_space_path_loss(distance_m, frequency_mhz),
            wall_loss_db: self.wall_loss(grid, from, to),
            floor_loss_db: self.floor_loss(floors),
        }
    }
}

/// Indices between `a` and `b` inclusive that fall inside `0..len`.
fn clamped_span(a: i32, b: i32, len: usize) -> RangeInclusive<i32> {
    let last = i32::try_from(len).unwrap_or(i32::MAX).saturating_sub(1);
    a.min(b).max(0)..=a.max(b).min(last)
}

impl Default for PropagationModel {
    fn default() -> Self {
        Self::new(WallAttenuation::default(), Self::DEFAULT_FLOOR_LOSS_DB)
    }
}
