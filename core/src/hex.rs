//! Conversions between offset grid coordinates, cube coordinates and world space.
//!
//! The grid uses pointy-top hexes with odd rows shifted right by half a hex
//! width. Rows are `1.5 * cell_size` apart and columns `sqrt(3) * cell_size`
//! apart, where `cell_size` is the hex circumradius.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GridCoord;

const SQRT_3: f32 = 1.732_050_8;

/// Fractional axial coordinates are clamped to this magnitude before rounding
/// so that far-away world points cannot overflow the integer conversion.
const AXIAL_LIMIT: f32 = 1.0e8;

const EVEN_ROW_NEIGHBORS: [(i32, i32); 6] = [(1, 0), (0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)];
const ODD_ROW_NEIGHBORS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (0, 1), (1, 1)];

/// Cube coordinate triple with the invariant `x + y + z == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeCoord {
    x: i32,
    y: i32,
    z: i32,
}

impl CubeCoord {
    /// Builds a cube coordinate from its `x` and `z` axes, deriving `y`.
    #[must_use]
    pub const fn from_axial(x: i32, z: i32) -> Self {
        Self {
            x,
            y: x.wrapping_neg().wrapping_sub(z),
            z,
        }
    }

    /// Column-like axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Diagonal axis, always `-x - z`.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Row axis.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Rounds fractional axial coordinates to the nearest valid cube triple.
    ///
    /// All three axes are rounded independently and the axis with the largest
    /// rounding error is recomputed from the other two.
    #[must_use]
    pub fn round(x: f32, z: f32) -> Self {
        let fx = x.clamp(-AXIAL_LIMIT, AXIAL_LIMIT);
        let fz = z.clamp(-AXIAL_LIMIT, AXIAL_LIMIT);
        let fy = -fx - fz;

        let mut rx = fx.round();
        let mut ry = fy.round();
        let mut rz = fz.round();

        let x_diff = (rx - fx).abs();
        let y_diff = (ry - fy).abs();
        let z_diff = (rz - fz).abs();

        if x_diff > y_diff && x_diff > z_diff {
            rx = -ry - rz;
        } else if y_diff > z_diff {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }

        Self {
            x: rx as i32,
            y: ry as i32,
            z: rz as i32,
        }
    }

    /// Hex distance between two cube coordinates.
    #[must_use]
    pub fn distance(self, other: CubeCoord) -> u32 {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).abs();
        u32::try_from((dx + dy + dz) / 2).unwrap_or(u32::MAX)
    }
}

impl GridCoord {
    /// Converts the offset coordinate into cube space.
    #[must_use]
    pub const fn to_cube(self) -> CubeCoord {
        let row = self.row();
        let shift = row.wrapping_sub(row & 1) / 2;
        CubeCoord::from_axial(self.column().wrapping_sub(shift), row)
    }

    /// Projects a cube coordinate back onto the offset layout.
    #[must_use]
    pub const fn from_cube(cube: CubeCoord) -> Self {
        let z = cube.z();
        let shift = z.wrapping_sub(z & 1) / 2;
        Self::new(cube.x().wrapping_add(shift), z)
    }
}

/// World-space geometry of the hex grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexLayout {
    cell_size: f32,
    origin_offset: IVec2,
}

impl HexLayout {
    /// Unit-sized hexes anchored at the world origin.
    pub const UNIT: Self = Self {
        cell_size: 1.0,
        origin_offset: IVec2::ZERO,
    };

    /// Creates a layout with the given hex circumradius.
    ///
    /// `origin_offset` shifts the whole grid by whole hex steps: `x` in hex
    /// widths and `y` in row spacings.
    pub fn new(cell_size: f32, origin_offset: IVec2) -> Result<Self, LayoutError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(LayoutError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            cell_size,
            origin_offset,
        })
    }

    /// Hex circumradius in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid origin measured in whole hex steps.
    #[must_use]
    pub const fn origin_offset(&self) -> IVec2 {
        self.origin_offset
    }

    /// Horizontal distance between neighbouring hex centers in a row.
    #[must_use]
    pub fn hex_width(&self) -> f32 {
        SQRT_3 * self.cell_size
    }

    /// Point-to-point height of a single hex.
    #[must_use]
    pub fn hex_height(&self) -> f32 {
        2.0 * self.cell_size
    }

    /// Vertical distance between consecutive rows.
    #[must_use]
    pub fn vertical_spacing(&self) -> f32 {
        self.hex_height() * 0.75
    }

    /// World position of the `(0, 0)` cell center.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(
            self.origin_offset.x as f32 * self.hex_width(),
            self.origin_offset.y as f32 * self.vertical_spacing(),
        )
    }

    /// World position of the center of `coord`.
    #[must_use]
    pub fn grid_to_world(&self, coord: GridCoord) -> Vec2 {
        let shear = if coord.is_odd_row() { 0.5 } else { 0.0 };
        let x = (coord.column() as f32 + shear) * self.hex_width();
        let y = coord.row() as f32 * self.vertical_spacing();
        self.origin() + Vec2::new(x, y)
    }

    /// Grid coordinate of the hex containing `position`.
    ///
    /// Returns `None` for non-finite positions. The result is not clipped to
    /// any grid bounds.
    #[must_use]
    pub fn world_to_grid(&self, position: Vec2) -> Option<GridCoord> {
        if !position.is_finite() {
            return None;
        }

        let local = position - self.origin();
        let x = (SQRT_3 / 3.0 * local.x - local.y / 3.0) / self.cell_size;
        let z = (2.0 / 3.0 * local.y) / self.cell_size;
        Some(GridCoord::from_cube(CubeCoord::round(x, z)))
    }
}

/// Errors raised when describing hex geometry.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// The hex size must be a positive, finite number of world units.
    #[error("cell size must be positive and finite (received {cell_size})")]
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
}

/// Enumerates the in-bounds neighbours of `coord`.
///
/// The offset table depends on row parity because odd rows are shifted.
/// Neither active-shape membership nor occupancy is considered.
#[must_use]
pub fn neighbors(coord: GridCoord, columns: u32, rows: u32) -> Vec<GridCoord> {
    let table = if coord.is_odd_row() {
        &ODD_ROW_NEIGHBORS
    } else {
        &EVEN_ROW_NEIGHBORS
    };

    table
        .iter()
        .filter_map(|&(columns_delta, rows_delta)| coord.checked_offset(columns_delta, rows_delta))
        .filter(|neighbor| neighbor.is_within(columns, rows))
        .collect()
}
