//! Derives the active cell set from a declarative grid shape.

use std::collections::BTreeSet;

use hexonia_core::{CellMask, GridCoord, GridShape};

/// Produces the set of active cells for `shape` inside a `columns x rows` rectangle.
///
/// A custom mask overrides the procedural shapes. Mask cells beyond the
/// rectangle are ignored and missing cells read as inactive.
pub(crate) fn generate(shape: &GridShape, columns: u32, rows: u32) -> BTreeSet<GridCoord> {
    let width = i32::try_from(columns).unwrap_or(i32::MAX);
    let height = i32::try_from(rows).unwrap_or(i32::MAX);
    let mut cells = BTreeSet::new();
    if width == 0 || height == 0 {
        return cells;
    }

    match shape {
        GridShape::Rectangle => {
            for row in 0..height {
                insert_row(&mut cells, row, width);
            }
        }
        GridShape::L => {
            insert_row(&mut cells, 0, width / 2);
            for row in 0..height {
                let _ = cells.insert(GridCoord::new(0, row));
            }
        }
        GridShape::T => {
            insert_row(&mut cells, height - 1, width);
            for row in 0..height {
                let _ = cells.insert(GridCoord::new(width / 2, row));
            }
        }
        GridShape::Cross => {
            insert_row(&mut cells, height / 2, width);
            for row in 0..height {
                let _ = cells.insert(GridCoord::new(width / 2, row));
            }
        }
        GridShape::Custom(mask) => {
            warn_on_mismatch("shape", mask, columns, rows);
            for row in 0..height {
                for column in 0..width {
                    let coord = GridCoord::new(column, row);
                    if mask.get(coord) {
                        let _ = cells.insert(coord);
                    }
                }
            }
        }
    }

    cells
}

fn insert_row(cells: &mut BTreeSet<GridCoord>, row: i32, length: i32) {
    for column in 0..length {
        let _ = cells.insert(GridCoord::new(column, row));
    }
}

/// Logs when an authored mask does not exactly cover the grid; callers pad or truncate.
pub(crate) fn warn_on_mismatch(kind: &str, mask: &CellMask, columns: u32, rows: u32) {
    if !mask.matches_dimensions(columns, rows) {
        log::warn!(
            "{kind} mask does not match the {columns}x{rows} grid; \
             missing cells are cleared and extra cells ignored"
        );
    }
}
