#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hexonia placement engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. The hex coordinate math lives in [`hex`] and the radius footprint
//! enumeration in [`footprint`]; both are pure and safe to call every frame.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod footprint;
pub mod hex;

pub use footprint::{hex_disk_len, Footprint};
pub use hex::{CubeCoord, HexLayout, LayoutError};

/// Location of a single hex cell expressed in offset (column, row) coordinates.
///
/// Odd rows are shifted half a hex to the right. A coordinate is only
/// addressable when it lies inside the grid dimensions; negative values are
/// representable so that world-space queries outside the grid stay lossless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: i32,
    row: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Reports whether the row is shifted by half a hex.
    #[must_use]
    pub const fn is_odd_row(&self) -> bool {
        (self.row & 1) == 1
    }

    /// Reports whether the coordinate lies inside `[0, columns) x [0, rows)`.
    #[must_use]
    pub fn is_within(&self, columns: u32, rows: u32) -> bool {
        let column_fits = u32::try_from(self.column).map_or(false, |column| column < columns);
        let row_fits = u32::try_from(self.row).map_or(false, |row| row < rows);
        column_fits && row_fits
    }

    /// Offsets the coordinate, returning `None` on integer overflow.
    #[must_use]
    pub fn checked_offset(&self, columns: i32, rows: i32) -> Option<Self> {
        Some(Self::new(
            self.column.checked_add(columns)?,
            self.row.checked_add(rows)?,
        ))
    }
}

/// Dimensions and world-space placement of a hex grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    columns: u32,
    rows: u32,
    hex: HexLayout,
}

impl GridLayout {
    /// Creates a new grid layout description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, hex: HexLayout) -> Self {
        Self { columns, rows, hex }
    }

    /// Number of columns (the grid `Width`).
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows (the grid `Height`).
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// World-space hex geometry used for coordinate conversion.
    #[must_use]
    pub const fn hex(&self) -> HexLayout {
        self.hex
    }

    /// Reports whether the coordinate lies inside the grid bounds.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.is_within(self.columns, self.rows)
    }

    /// Total number of cells covered by the bounding rectangle.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let cells = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    /// Computes the bounds-clipped footprint of `radius` around `center`.
    #[must_use]
    pub fn footprint(&self, center: GridCoord, radius: u32) -> Footprint {
        footprint::footprint(center, radius, self.columns, self.rows)
    }

    /// Enumerates the in-bounds neighbours of `coord`.
    #[must_use]
    pub fn neighbors(&self, coord: GridCoord) -> Vec<GridCoord> {
        hex::neighbors(coord, self.columns, self.rows)
    }
}

/// Occupancy state of a single addressable cell.
///
/// A building is only ever expected on soil; the placement engine enforces
/// that ordering when validating, but never retracts soil on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    has_soil: bool,
    has_building: bool,
}

impl Cell {
    /// Bare ground without soil or building.
    pub const EMPTY: Self = Self::new(false, false);

    /// Creates a cell with explicit flags.
    #[must_use]
    pub const fn new(has_soil: bool, has_building: bool) -> Self {
        Self {
            has_soil,
            has_building,
        }
    }

    /// Whether soil has been placed on the cell.
    #[must_use]
    pub const fn has_soil(&self) -> bool {
        self.has_soil
    }

    /// Whether a building occupies the cell.
    #[must_use]
    pub const fn has_building(&self) -> bool {
        self.has_building
    }

    /// Soil may only be placed on bare cells.
    #[must_use]
    pub const fn can_place_soil(&self) -> bool {
        !self.has_soil
    }

    /// Buildings require soil and an empty slot.
    #[must_use]
    pub const fn can_build(&self) -> bool {
        self.has_soil && !self.has_building
    }

    /// Returns a copy with the soil flag replaced.
    #[must_use]
    pub const fn with_soil(self, has_soil: bool) -> Self {
        Self { has_soil, ..self }
    }

    /// Returns a copy with the building flag replaced.
    #[must_use]
    pub const fn with_building(self, has_building: bool) -> Self {
        Self {
            has_building,
            ..self
        }
    }
}

/// Reasons a cell lookup can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum CellLookupError {
    /// The coordinate lies outside `[0, Width) x [0, Height)`.
    #[error("coordinate lies outside the grid bounds")]
    OutOfBounds,
    /// The coordinate is inside the bounds but not part of the grid shape.
    #[error("coordinate is not part of the active grid shape")]
    Inactive,
}

/// Which occupancy layer a placement request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementMode {
    /// Lay soil on bare ground.
    PlaceSoil,
    /// Construct a building on soiled ground.
    PlaceBuilding,
}

/// Reasons a footprint fails validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// Part of the footprint falls outside the grid bounds.
    #[error("footprint extends beyond the grid bounds")]
    OutOfBounds,
    /// Part of the footprint covers cells outside the grid shape.
    #[error("footprint covers cells outside the grid shape")]
    Inactive,
    /// Soil already covers a footprint cell.
    #[error("soil is already present")]
    SoilPresent,
    /// A footprint cell lacks the soil a building requires.
    #[error("soil is missing")]
    SoilMissing,
    /// A building already occupies a footprint cell.
    #[error("a building is already present")]
    BuildingPresent,
    /// Every structure identifier has been handed out.
    #[error("no structure identifiers are left")]
    StructureLimitReached,
}

impl From<CellLookupError> for PlacementError {
    fn from(error: CellLookupError) -> Self {
        match error {
            CellLookupError::OutOfBounds => Self::OutOfBounds,
            CellLookupError::Inactive => Self::Inactive,
        }
    }
}

/// Result of a placement request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    /// Whether the request passed validation and was committed.
    pub accepted: bool,
    /// Footprint evaluated for the request, center first.
    pub footprint: Footprint,
    /// Reason the request was rejected, if it was.
    pub rejection: Option<PlacementError>,
}

impl PlacementOutcome {
    /// Describes a committed placement.
    #[must_use]
    pub fn accepted(footprint: Footprint) -> Self {
        Self {
            accepted: true,
            footprint,
            rejection: None,
        }
    }

    /// Describes a rejected placement.
    #[must_use]
    pub fn rejected(footprint: Footprint, reason: PlacementError) -> Self {
        Self {
            accepted: false,
            footprint,
            rejection: Some(reason),
        }
    }
}

/// Stable identifier of a building descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(String);

impl BuildingId {
    /// Creates a new building identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BuildingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to the visual asset of a building. Never interpreted by the core.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef(String);

impl AssetRef {
    /// Wraps an adapter-defined asset key.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the asset key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Number of hex rings a building spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildingSize {
    /// Occupies only its center cell (hex size 1).
    Small,
    /// Occupies the center and its first ring (hex size 2).
    Medium,
    /// Occupies the center and two rings (hex size 3).
    Large,
}

impl BuildingSize {
    /// Converts an authored hex size in `1..=3`.
    pub fn from_hex_size(hex_size: u8) -> Result<Self, SizeError> {
        match hex_size {
            1 => Ok(Self::Small),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Large),
            other => Err(SizeError { hex_size: other }),
        }
    }

    /// Authored hex size in `1..=3`.
    #[must_use]
    pub const fn hex_size(self) -> u8 {
        match self {
            Self::Small => 1,
            Self::Medium => 2,
            Self::Large => 3,
        }
    }

    /// Footprint radius, `hex_size - 1`.
    #[must_use]
    pub const fn radius(self) -> u32 {
        self.hex_size() as u32 - 1
    }
}

/// Rejected hex size outside `1..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("hex size {hex_size} is not supported (expected 1, 2 or 3)")]
pub struct SizeError {
    /// Value that failed validation.
    pub hex_size: u8,
}

/// Resource cost attached to a building. Carried as data, never evaluated by the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingCost {
    /// Gold required.
    pub gold: u32,
    /// Wood required.
    pub wood: u32,
    /// Stone required.
    pub stone: u32,
}

/// Immutable descriptor of a placeable building.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingSpec {
    id: BuildingId,
    name: String,
    asset: AssetRef,
    size: BuildingSize,
    cost: BuildingCost,
}

impl BuildingSpec {
    /// Creates a new building descriptor.
    #[must_use]
    pub fn new(
        id: BuildingId,
        name: impl Into<String>,
        asset: AssetRef,
        size: BuildingSize,
        cost: BuildingCost,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            asset,
            size,
            cost,
        }
    }

    /// Identifier of the building.
    #[must_use]
    pub fn id(&self) -> &BuildingId {
        &self.id
    }

    /// Human-readable display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Visual asset reference used by adapters.
    #[must_use]
    pub fn asset(&self) -> &AssetRef {
        &self.asset
    }

    /// Number of rings the building spans.
    #[must_use]
    pub const fn size(&self) -> BuildingSize {
        self.size
    }

    /// Footprint radius derived from the size.
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.size.radius()
    }

    /// Opaque resource cost.
    #[must_use]
    pub const fn cost(&self) -> BuildingCost {
        self.cost
    }
}

/// Row-major boolean mask over grid cells (`rows[row][column]`).
///
/// Rows may be ragged; lookups outside the authored rows read as `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellMask {
    rows: Vec<Vec<bool>>,
}

impl CellMask {
    /// Creates a mask from explicit rows.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        Self { rows }
    }

    /// Parses text rows where `#`/`1` set a cell and `.`/`0` clear it.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, MaskError> {
        let mut parsed = Vec::with_capacity(rows.len());
        for (row, text) in rows.iter().enumerate() {
            let mut cells = Vec::new();
            for (column, symbol) in text.as_ref().chars().enumerate() {
                match symbol {
                    '#' | '1' => cells.push(true),
                    '.' | '0' => cells.push(false),
                    other => {
                        return Err(MaskError::InvalidSymbol {
                            row,
                            column,
                            symbol: other,
                        })
                    }
                }
            }
            parsed.push(cells);
        }
        Ok(Self { rows: parsed })
    }

    /// Authored rows in row-major order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Reads the flag for `coord`, treating anything outside the authored rows as unset.
    #[must_use]
    pub fn get(&self, coord: GridCoord) -> bool {
        let (Ok(row), Ok(column)) = (usize::try_from(coord.row()), usize::try_from(coord.column()))
        else {
            return false;
        };
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .unwrap_or(false)
    }

    /// Reports whether every row has exactly `columns` entries and there are `rows` rows.
    #[must_use]
    pub fn matches_dimensions(&self, columns: u32, rows: u32) -> bool {
        let row_count_matches = u32::try_from(self.rows.len()).map_or(false, |len| len == rows);
        row_count_matches
            && self
                .rows
                .iter()
                .all(|cells| u32::try_from(cells.len()).map_or(false, |len| len == columns))
    }
}

/// Errors raised while parsing a textual [`CellMask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MaskError {
    /// A row contained a character other than `#`, `1`, `.` or `0`.
    #[error("unexpected symbol {symbol:?} at row {row}, column {column}")]
    InvalidSymbol {
        /// Row containing the symbol.
        row: usize,
        /// Column containing the symbol.
        column: usize,
        /// Offending character.
        symbol: char,
    },
}

/// Declarative description of which cells form the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridShape {
    /// Every cell of the bounding rectangle.
    Rectangle,
    /// First half of the bottom row plus the entire left column.
    L,
    /// Entire top row plus the entire middle column.
    T,
    /// Entire middle row plus the entire middle column.
    Cross,
    /// Explicit per-cell mask that overrides the procedural shapes.
    Custom(CellMask),
}

/// Construction input for a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridBlueprint {
    /// Dimensions and world placement.
    pub layout: GridLayout,
    /// Active-cell shape.
    pub shape: GridShape,
    /// Cells that start with soil; unlisted cells start bare.
    pub soil: Option<CellMask>,
}

impl GridBlueprint {
    /// Creates a blueprint without initial soil.
    #[must_use]
    pub const fn new(layout: GridLayout, shape: GridShape) -> Self {
        Self {
            layout,
            shape,
            soil: None,
        }
    }

    /// Attaches an initial soil mask.
    #[must_use]
    pub fn with_soil(mut self, soil: CellMask) -> Self {
        self.soil = Some(soil);
        self
    }
}

/// Unique identifier assigned to a placed building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(u32);

impl StructureId {
    /// Creates a new structure identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a placed building used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSnapshot {
    /// Identifier allocated to the structure by the world.
    pub id: StructureId,
    /// Descriptor the structure was built from.
    pub building: BuildingId,
    /// Center cell of the structure.
    pub center: GridCoord,
    /// Cells covered by the structure.
    pub footprint: Footprint,
}

/// Read-only snapshot describing all placed buildings.
#[derive(Clone, Debug, Default)]
pub struct StructureView {
    snapshots: Vec<StructureSnapshot>,
}

impl StructureView {
    /// Creates a new structure view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<StructureSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &StructureSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<StructureSnapshot> {
        self.snapshots
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards every cell and structure and rebuilds the grid.
    ConfigureGrid {
        /// Construction input for the new grid.
        blueprint: GridBlueprint,
    },
    /// Requests a soil or building placement centered on a cell.
    Place {
        /// Center cell of the requested footprint.
        center: GridCoord,
        /// Building whose size defines the footprint.
        building: Arc<BuildingSpec>,
        /// Occupancy layer the request targets.
        mode: PlacementMode,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that the grid was rebuilt.
    GridConfigured {
        /// Number of columns in the new grid.
        columns: u32,
        /// Number of rows in the new grid.
        rows: u32,
        /// Number of cells that belong to the grid shape.
        active_cells: usize,
    },
    /// Confirms that soil covered a footprint.
    SoilPlaced {
        /// Center cell of the footprint.
        center: GridCoord,
        /// Cells that received soil.
        footprint: Footprint,
    },
    /// Confirms that a building was constructed.
    BuildingPlaced {
        /// Identifier allocated to the new structure.
        structure: StructureId,
        /// Descriptor the structure was built from.
        building: BuildingId,
        /// Center cell of the footprint.
        center: GridCoord,
        /// Cells now occupied by the building.
        footprint: Footprint,
    },
    /// Reports that a placement request failed validation.
    PlacementRejected {
        /// Occupancy layer the request targeted.
        mode: PlacementMode,
        /// Descriptor named by the request.
        building: BuildingId,
        /// Center cell provided in the request.
        center: GridCoord,
        /// First disqualifying reason found in footprint order.
        reason: PlacementError,
    },
}
