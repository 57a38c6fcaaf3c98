//! # lorafit-common
//!
//! Common types for the lorafit LoRa parameter planner.
//!
//! This crate provides the data model shared by the planner crates:
//! - Floor plan representation ([`Grid`], [`CellType`], [`Position`], [`FloorPlan`])
//! - Coarse environment metadata ([`EnvironmentDescriptor`])
//! - Regional frequency plans ([`RegionProfile`])
//! - The recommended radio configuration ([`LoRaParameterSet`], [`ParameterDisplay`])
//! - The audit trail returned with every recommendation ([`DiagnosticLog`])
//! - The planner error taxonomy ([`PlanError`])

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Conditions the planner absorbs into a fallback parameter set.
///
/// The `Display` text of each variant is the string surfaced in the
/// outcome's error list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// No grid or no transmitter position on the plan.
    #[error("Floor plan data (grid or gateway position) is missing or invalid. Using basic estimation.")]
    MissingPlanInput,

    /// Transmitter placed but no receivers.
    #[error("No sensors placed on the floor plan. Cannot calculate specific link margins.")]
    NoReceiversInput,

    /// The plan payload could not be parsed. The detail is for logs only.
    #[error("Invalid floor plan data format.")]
    MalformedPlanData(String),

    /// Unexpected failure while computing link budgets.
    #[error("Internal error during parameter calculation: {0}")]
    InternalComputationFailure(String),

    /// Region code not in the region table.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),
}

// ============================================================================
// Spreading Factor Range
// ============================================================================

/// Lowest LoRa spreading factor considered by the planner.
pub const MIN_SPREADING_FACTOR: u8 = 7;

/// Highest LoRa spreading factor considered by the planner.
pub const MAX_SPREADING_FACTOR: u8 = 12;

/// Check whether a spreading factor is in the supported range.
pub fn is_valid_spreading_factor(sf: u8) -> bool {
    (MIN_SPREADING_FACTOR..=MAX_SPREADING_FACTOR).contains(&sf)
}

// ============================================================================
// Floor Plan Types
// ============================================================================

/// Contents of one floor plan cell (1 cell = 1 m²).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Open space.
    Empty,
    /// Drywall / plasterboard partition.
    Drywall,
    /// Brick wall.
    Brick,
    /// Concrete wall.
    Concrete,
    /// Marker for the gateway cell.
    Gateway,
    /// Marker for a sensor cell.
    Sensor,
    /// Any tag the planner does not know.
    #[serde(other)]
    Unknown,
}

impl CellType {
    /// Whether the cell is anything other than open space.
    pub fn is_obstruction(&self) -> bool {
        !matches!(self, CellType::Empty)
    }

    /// Lowercase tag used in plan payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Empty => "empty",
            CellType::Drywall => "drywall",
            CellType::Brick => "brick",
            CellType::Concrete => "concrete",
            CellType::Gateway => "gateway",
            CellType::Sensor => "sensor",
            CellType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rectangular obstruction grid.
///
/// Every row has the same number of columns; construction through
/// [`Grid::new`] or deserialization rejects ragged input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<CellType>>", into = "Vec<Vec<CellType>>")]
pub struct Grid {
    cells: Vec<Vec<CellType>>,
    cols: usize,
}

/// Error returned for grids whose rows differ in length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("grid row {row} has {found} columns, expected {expected}")]
pub struct RaggedGridError {
    /// Index of the offending row.
    pub row: usize,
    /// Column count of the first row.
    pub expected: usize,
    /// Column count of the offending row.
    pub found: usize,
}

impl Grid {
    /// Build a grid from rows of cells.
    pub fn new(cells: Vec<Vec<CellType>>) -> Result<Self, RaggedGridError> {
        let cols = cells.first().map(Vec::len).unwrap_or(0);
        if let Some((row, r)) = cells.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(RaggedGridError {
                row,
                expected: cols,
                found: r.len(),
            });
        }
        Ok(Grid { cells, cols })
    }

    /// Grid of `rows` x `cols` empty cells.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Grid {
            cells: vec![vec![CellType::Empty; cols]; rows],
            cols,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: i32, col: i32) -> Option<CellType> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Return a copy of this grid with one cell replaced.
    ///
    /// Out-of-bounds positions leave the grid unchanged.
    pub fn with_cell(mut self, row: usize, col: usize, cell: CellType) -> Self {
        if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
        self
    }
}

impl TryFrom<Vec<Vec<CellType>>> for Grid {
    type Error = RaggedGridError;

    fn try_from(cells: Vec<Vec<CellType>>) -> Result<Self, Self::Error> {
        Grid::new(cells)
    }
}

impl From<Grid> for Vec<Vec<CellType>> {
    fn from(grid: Grid) -> Self {
        grid.cells
    }
}

/// Grid coordinate; one cell is one meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl Position {
    /// Create a position.
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Floor plan submitted for a recommendation.
///
/// The payload keys follow the planner's web front end (`gateway`,
/// `sensors`); `transmitter` and `receivers` are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    /// Obstruction grid.
    #[serde(default)]
    pub grid: Option<Grid>,
    /// Transmitter (gateway) position.
    #[serde(default, rename = "gateway", alias = "transmitter")]
    pub transmitter: Option<Position>,
    /// Receiver (sensor) positions.
    #[serde(default, rename = "sensors", alias = "receivers")]
    pub receivers: Vec<Position>,
    /// Number of floors the signal has to cross plus one (default: 1).
    #[serde(default)]
    pub floors: Option<u32>,
}

impl FloorPlan {
    /// Floor count used for floor loss.
    pub fn floors(&self) -> u32 {
        self.floors.unwrap_or(1).max(1)
    }
}

/// Coarse environment metadata, used only when the floor plan is incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    /// Number of floors.
    #[serde(default)]
    pub floors: Option<u32>,
    /// Nominal internal wall type (e.g. "drywall", "brick", "concrete").
    #[serde(default)]
    pub wall_type: Option<String>,
    /// Floor area in square meters.
    #[serde(default, alias = "size")]
    pub size_sqm: Option<f64>,
}

impl EnvironmentDescriptor {
    /// Floors, defaulting to 1.
    pub fn floors_or_default(&self) -> u32 {
        self.floors.unwrap_or(1)
    }

    /// Wall type, defaulting to drywall.
    pub fn wall_type_or_default(&self) -> &str {
        self.wall_type.as_deref().unwrap_or("drywall")
    }

    /// Footprint, defaulting to 100 m².
    pub fn size_sqm_or_default(&self) -> f64 {
        self.size_sqm.unwrap_or(100.0)
    }
}

impl fmt::Display for EnvironmentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} floor(s), {} walls, {:.0} m²",
            self.floors_or_default(),
            self.wall_type_or_default(),
            self.size_sqm_or_default()
        )
    }
}

// ============================================================================
// Region Profiles
// ============================================================================

/// Regional frequency plan and default transmit power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionProfile {
    /// Region code, e.g. `EU868`.
    pub code: &'static str,
    /// Center frequency in MHz.
    pub frequency_mhz: f64,
    /// Default transmit power in dBm.
    pub default_tx_power_dbm: i8,
}

/// All supported regions.
pub const REGION_PROFILES: &[RegionProfile] = &[
    RegionProfile { code: "EU868", frequency_mhz: 868.0, default_tx_power_dbm: 14 },
    RegionProfile { code: "US915", frequency_mhz: 915.0, default_tx_power_dbm: 20 },
    RegionProfile { code: "AS923", frequency_mhz: 923.0, default_tx_power_dbm: 16 },
    RegionProfile { code: "AU915", frequency_mhz: 915.0, default_tx_power_dbm: 20 },
    RegionProfile { code: "KR920", frequency_mhz: 920.0, default_tx_power_dbm: 14 },
    RegionProfile { code: "IN865", frequency_mhz: 865.0, default_tx_power_dbm: 14 },
    RegionProfile { code: "RU864", frequency_mhz: 864.0, default_tx_power_dbm: 14 },
];

/// Profile used for unknown region codes (EU868).
pub const DEFAULT_REGION: RegionProfile = RegionProfile {
    code: "EU868",
    frequency_mhz: 868.0,
    default_tx_power_dbm: 14,
};

impl RegionProfile {
    /// Find the profile for a region code.
    pub fn lookup(code: &str) -> Option<&'static RegionProfile> {
        REGION_PROFILES.iter().find(|p| p.code == code)
    }

    /// Profile for a region code, or the default profile for unknown codes.
    pub fn resolve(code: &str) -> RegionProfile {
        Self::lookup(code).copied().unwrap_or(DEFAULT_REGION)
    }
}

// ============================================================================
// Parameter Set
// ============================================================================

/// Recommended LoRa configuration.
///
/// Coding rate and sync word are stored raw so code generators get exact
/// values; [`LoRaParameterSet::display`] produces the UI view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoRaParameterSet {
    /// Frequency in MHz.
    pub frequency_mhz: f64,
    /// Spreading factor (7-12).
    pub spreading_factor: u8,
    /// Signal bandwidth in kHz.
    pub bandwidth_khz: u32,
    /// Coding rate denominator (5-8, meaning 4/5 to 4/8).
    pub coding_rate_denominator: u8,
    /// Transmit power in dBm.
    pub tx_power_dbm: i8,
    /// Preamble length in symbols.
    pub preamble_length: u16,
    /// Raw sync word.
    pub sync_word: u8,
    /// Combined transmitter + receiver antenna gain in dBi.
    pub antenna_gain_dbi: f64,
    /// Worst link margin of the selected SF, if one was computed.
    pub worst_link_margin_db: Option<f64>,
    /// Fallback / failure status.
    pub error_message: Option<String>,
    /// Non-fatal warning.
    pub warning_message: Option<String>,
}

impl LoRaParameterSet {
    /// Coding rate formatted as `4/N`.
    pub fn coding_rate(&self) -> String {
        format!("4/{}", self.coding_rate_denominator)
    }

    /// Sync word formatted as lowercase hex with `0x` prefix.
    pub fn sync_word_hex(&self) -> String {
        format!("{:#x}", self.sync_word)
    }

    /// Error and warning text merged for display, error first.
    pub fn calculation_status(&self) -> Option<String> {
        match (&self.error_message, &self.warning_message) {
            (Some(e), Some(w)) => Some(format!("{} {}", e, w)),
            (Some(e), None) => Some(e.clone()),
            (None, Some(w)) => Some(w.clone()),
            (None, None) => None,
        }
    }

    /// Human-readable view for a UI layer.
    pub fn display(&self) -> ParameterDisplay {
        ParameterDisplay {
            frequency_mhz: self.frequency_mhz,
            spreading_factor: self.spreading_factor,
            signal_bandwidth_khz: self.bandwidth_khz,
            coding_rate: self.coding_rate(),
            tx_power_dbm: self.tx_power_dbm,
            preamble_length: self.preamble_length,
            sync_word: self.sync_word_hex(),
            antenna_gain_dbi: self.antenna_gain_dbi,
            worst_link_margin_db: self.worst_link_margin_db,
            calculation_status: self.calculation_status(),
        }
    }
}

/// Display-formatted parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDisplay {
    /// Frequency in MHz.
    pub frequency_mhz: f64,
    /// Spreading factor.
    pub spreading_factor: u8,
    /// Signal bandwidth in kHz.
    pub signal_bandwidth_khz: u32,
    /// Coding rate, e.g. `4/5`.
    pub coding_rate: String,
    /// Transmit power in dBm.
    pub tx_power_dbm: i8,
    /// Preamble length in symbols.
    pub preamble_length: u16,
    /// Sync word, e.g. `0x12`.
    pub sync_word: String,
    /// Combined antenna gain in dBi.
    pub antenna_gain_dbi: f64,
    /// Worst link margin, if computed.
    pub worst_link_margin_db: Option<f64>,
    /// Merged error/warning status.
    pub calculation_status: Option<String>,
}

// ============================================================================
// Diagnostic Log
// ============================================================================

/// Ordered, append-only trace of intermediate computations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticLog {
    entries: Vec<String>,
}

impl DiagnosticLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
    }

    /// All lines in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over lines.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }

    /// Consume the log, returning its lines.
    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a DiagnosticLog {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
