//! Radius footprints on the offset hex grid.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::GridCoord;

/// Ordered, duplicate-free set of cells covered by a structure.
///
/// The center is always the first element, even when it lies outside the
/// grid; every other cell is guaranteed to be inside the bounds the
/// footprint was computed for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    center: GridCoord,
    cells: Vec<GridCoord>,
}

impl Footprint {
    /// Center cell of the footprint.
    #[must_use]
    pub fn center(&self) -> GridCoord {
        self.center
    }

    /// Number of cells in the footprint.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false` for computed footprints, which contain at least their center.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates the cells, center first.
    pub fn iter(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Borrows the cells, center first.
    #[must_use]
    pub fn as_slice(&self) -> &[GridCoord] {
        &self.cells
    }

    /// Reports whether `coord` belongs to the footprint.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.cells.contains(&coord)
    }

    /// Reports whether every cell of `self` also belongs to `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Footprint) -> bool {
        self.cells.iter().all(|cell| other.contains(*cell))
    }

    /// Consumes the footprint, yielding its cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<GridCoord> {
        self.cells
    }
}

/// Number of cells in an unclipped hex disk: `3 * r * (r + 1) + 1`.
#[must_use]
pub fn hex_disk_len(radius: u32) -> usize {
    let radius = u64::from(radius);
    let cells = radius
        .saturating_mul(radius.saturating_add(1))
        .saturating_mul(3)
        .saturating_add(1);
    usize::try_from(cells).unwrap_or(usize::MAX)
}

/// Computes the cells within `radius` hex steps of `center`, clipped to
/// `[0, columns) x [0, rows)`.
///
/// The disk is enumerated in cube space (`dx` outer, `dy` inner) and each
/// cell is projected back to offset coordinates. The result depends only on
/// the arguments.
///
/// Both loops are clamped to the offsets that can land inside the grid, so
/// the cost is bounded by the grid size rather than by `radius`.
#[must_use]
pub fn footprint(center: GridCoord, radius: u32, columns: u32, rows: u32) -> Footprint {
    let mut cells = vec![center];
    if radius == 0 || columns == 0 || rows == 0 {
        return Footprint { center, cells };
    }

    let mut seen = BTreeSet::from([center]);
    let cube = center.to_cube();
    let (cx, cz) = (i64::from(cube.x()), i64::from(cube.z()));
    let radius = i64::from(radius);
    let (columns, rows) = (i64::from(columns), i64::from(rows));

    // row z in [0, rows) shifts the column by z / 2, so x must lie in
    // [-(rows - 1) / 2, columns - 1] for the cell to be in bounds
    let low_dx = (-radius).max(-(rows - 1) / 2 - cx);
    let high_dx = radius.min(columns - 1 - cx);

    for dx in low_dx..=high_dx {
        // z = cz - dx - dy must lie in [0, rows)
        let low = (-radius)
            .max(-dx - radius)
            .max(cz - dx - (rows - 1));
        let high = radius.min(-dx + radius).min(cz - dx);
        for dy in low..=high {
            let dz = -dx - dy;
            let x = cx + dx;
            let z = cz + dz;

            let column = x + (z - (z & 1)) / 2;
            let row = z;
            if column < 0 || row < 0 || column >= columns || row >= rows {
                continue;
            }

            let (Ok(column), Ok(row)) = (i32::try_from(column), i32::try_from(row)) else {
                continue;
            };
            let coord = GridCoord::new(column, row);
            if seen.insert(coord) {
                cells.push(coord);
            }
        }
    }

    Footprint { center, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{neighbors, CubeCoord};

    #[test]
    fn radius_zero_is_only_the_center() {
        let found = footprint(GridCoord::new(5, 5), 0, 10, 10);

        assert_eq!(found.as_slice(), &[GridCoord::new(5, 5)]);
    }

    #[test]
    fn unclipped_disk_matches_closed_form_size() {
        for radius in 0..5 {
            for center in [GridCoord::new(15, 14), GridCoord::new(15, 15)] {
                let found = footprint(center, radius, 30, 30);
                assert_eq!(found.len(), hex_disk_len(radius), "radius {radius}");
            }
        }
        assert_eq!(hex_disk_len(1), 7);
        assert_eq!(hex_disk_len(2), 19);
    }

    #[test]
    fn center_is_first_and_cells_are_unique() {
        let found = footprint(GridCoord::new(3, 4), 2, 10, 10);

        assert_eq!(found.center(), GridCoord::new(3, 4));
        let unique: BTreeSet<_> = found.iter().collect();
        assert_eq!(unique.len(), found.len());
    }

    #[test]
    fn every_cell_lies_within_the_radius() {
        let center = GridCoord::new(6, 7);
        for radius in 0..4 {
            for cell in footprint(center, radius, 20, 20).iter() {
                assert!(center.to_cube().distance(cell.to_cube()) <= radius);
            }
        }
    }

    #[test]
    fn footprints_grow_monotonically_with_radius() {
        for center in [GridCoord::new(0, 0), GridCoord::new(4, 5), GridCoord::new(9, 9)] {
            for radius in 0..4 {
                let inner = footprint(center, radius, 10, 10);
                let outer = footprint(center, radius + 1, 10, 10);
                assert!(inner.is_subset_of(&outer), "{center:?} radius {radius}");
            }
        }
    }

    #[test]
    fn radius_one_matches_neighbors_on_both_row_parities() {
        for center in [
            GridCoord::new(4, 4),
            GridCoord::new(4, 5),
            GridCoord::new(0, 0),
            GridCoord::new(9, 9),
        ] {
            let ring: BTreeSet<_> = footprint(center, 1, 10, 10)
                .iter()
                .filter(|cell| *cell != center)
                .collect();
            let expected: BTreeSet<_> = neighbors(center, 10, 10).into_iter().collect();
            assert_eq!(ring, expected, "{center:?}");
        }
    }

    #[test]
    fn corner_footprint_is_clipped() {
        let found = footprint(GridCoord::new(0, 0), 1, 10, 10);

        assert_eq!(found.len(), neighbors(GridCoord::new(0, 0), 10, 10).len() + 1);
        assert!(found.len() < 7);
    }

    #[test]
    fn huge_radius_is_clipped_to_the_whole_grid() {
        for center in [GridCoord::new(5, 5), GridCoord::new(-40, 3), GridCoord::new(0, 9)] {
            let found = footprint(center, u32::MAX, 10, 10);
            let in_bounds = found.iter().filter(|cell| cell.is_within(10, 10)).count();

            assert_eq!(in_bounds, 100, "{center:?}");
            assert_eq!(found.center(), center);
        }
    }

    #[test]
    fn clamped_enumeration_keeps_disk_order() {
        let center = GridCoord::new(2, 3);
        let radius: i32 = 3;
        let cube = center.to_cube();
        let mut expected = vec![center];
        for dx in -radius..=radius {
            for dy in (-radius).max(-dx - radius)..=radius.min(-dx + radius) {
                let coord = GridCoord::from_cube(CubeCoord::from_axial(
                    cube.x() + dx,
                    cube.z() - dx - dy,
                ));
                if coord.is_within(6, 5) && !expected.contains(&coord) {
                    expected.push(coord);
                }
            }
        }

        assert_eq!(footprint(center, 3, 6, 5).into_vec(), expected);
    }

    #[test]
    fn out_of_bounds_center_is_kept_first() {
        let found = footprint(GridCoord::new(-1, 0), 1, 10, 10);

        assert_eq!(found.center(), GridCoord::new(-1, 0));
        assert!(found.iter().skip(1).all(|cell| cell.is_within(10, 10)));
        assert!(found.contains(GridCoord::new(0, 0)));
    }
}
