//! All-or-nothing footprint validation and the matching mutations.
//!
//! Validation and mutation are separate passes: callers query validity as
//! often as they like (for previews) and only commit after a successful
//! check on the identical footprint. Committing never re-validates.

use hexonia_core::{hex_disk_len, Footprint, GridCoord, PlacementError, PlacementMode};

use crate::grid::GridState;

/// Checks every cell of `footprint` against the preconditions of `mode`.
///
/// A footprint that lost cells to clipping is rejected as out of bounds.
/// The first disqualifying cell, in footprint order, determines the error.
pub(crate) fn validate(
    grid: &GridState,
    footprint: &Footprint,
    radius: u32,
    mode: PlacementMode,
) -> Result<(), PlacementError> {
    if footprint.len() < hex_disk_len(radius) {
        return Err(PlacementError::OutOfBounds);
    }

    for coord in footprint.iter() {
        let cell = grid.lookup(coord)?;
        match mode {
            PlacementMode::PlaceSoil => {
                if cell.has_soil() {
                    return Err(PlacementError::SoilPresent);
                }
            }
            PlacementMode::PlaceBuilding => {
                if !cell.has_soil() {
                    return Err(PlacementError::SoilMissing);
                }
                if cell.has_building() {
                    return Err(PlacementError::BuildingPresent);
                }
            }
        }
    }

    Ok(())
}

/// Sets the flag selected by `mode` on every addressable footprint cell.
///
/// Returns the number of cells written. Prior cell state is not inspected.
pub(crate) fn commit(grid: &mut GridState, footprint: &Footprint, mode: PlacementMode) -> usize {
    footprint
        .iter()
        .filter(|coord| write(grid, *coord, mode))
        .count()
}

fn write(grid: &mut GridState, coord: GridCoord, mode: PlacementMode) -> bool {
    match mode {
        PlacementMode::PlaceSoil => grid.set_soil(coord, true),
        PlacementMode::PlaceBuilding => grid.set_building(coord, true),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use hexonia_core::{footprint::footprint, Cell, CellMask};

    use super::*;

    fn rectangle(columns: u32, rows: u32, soil: Option<&CellMask>) -> GridState {
        let mut active = BTreeSet::new();
        for row in 0..rows as i32 {
            for column in 0..columns as i32 {
                let _ = active.insert(GridCoord::new(column, row));
            }
        }
        GridState::new(columns, rows, &active, soil)
    }

    #[test]
    fn soil_validation_fails_on_any_soiled_cell() {
        let mut grid = rectangle(6, 6, None);
        let area = footprint(GridCoord::new(3, 3), 1, 6, 6);
        assert_eq!(validate(&grid, &area, 1, PlacementMode::PlaceSoil), Ok(()));

        let edge = area.as_slice()[area.len() - 1];
        assert!(grid.set_soil(edge, true));

        assert_eq!(
            validate(&grid, &area, 1, PlacementMode::PlaceSoil),
            Err(PlacementError::SoilPresent)
        );
    }

    #[test]
    fn building_validation_requires_soil_everywhere() {
        let mut grid = rectangle(6, 6, None);
        let area = footprint(GridCoord::new(2, 2), 1, 6, 6);
        assert_eq!(commit(&mut grid, &area, PlacementMode::PlaceSoil), 7);
        assert!(grid.set_soil(area.center(), false));

        assert_eq!(
            validate(&grid, &area, 1, PlacementMode::PlaceBuilding),
            Err(PlacementError::SoilMissing)
        );
    }

    #[test]
    fn clipped_footprints_are_out_of_bounds() {
        let grid = rectangle(6, 6, None);
        let area = footprint(GridCoord::new(0, 0), 1, 6, 6);

        assert_eq!(
            validate(&grid, &area, 1, PlacementMode::PlaceSoil),
            Err(PlacementError::OutOfBounds)
        );
    }

    #[test]
    fn commit_writes_unconditionally_and_skips_missing_cells() {
        let soil = CellMask::parse(&["#..", "...", "..."]).expect("valid mask");
        let mut grid = rectangle(3, 3, Some(&soil));
        let area = footprint(GridCoord::new(0, 0), 1, 3, 3);

        assert_eq!(commit(&mut grid, &area, PlacementMode::PlaceBuilding), 3);
        assert_eq!(grid.lookup(GridCoord::new(1, 0)), Ok(Cell::new(false, true)));
        assert_eq!(grid.lookup(GridCoord::new(0, 0)), Ok(Cell::new(true, true)));
    }
}
