//! Dense per-cell occupancy storage.

use std::collections::BTreeSet;

use hexonia_core::{Cell, CellLookupError, CellMask, GridCoord};

/// Dense grid of cells indexed by `(column, row)`.
///
/// `None` marks a cell outside the active shape; such cells behave exactly
/// like coordinates outside the bounds, except for the reported error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GridState {
    columns: u32,
    rows: u32,
    cells: Vec<Option<Cell>>,
}

impl GridState {
    /// Builds the grid from its active cells, seeding soil from the optional mask.
    pub(crate) fn new(
        columns: u32,
        rows: u32,
        active: &BTreeSet<GridCoord>,
        soil: Option<&CellMask>,
    ) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut grid = Self {
            columns,
            rows,
            cells: vec![None; capacity],
        };

        for coord in active {
            let has_soil = soil.map_or(false, |mask| mask.get(*coord));
            if let Some(slot) = grid.index(*coord).and_then(|index| grid.cells.get_mut(index)) {
                *slot = Some(Cell::EMPTY.with_soil(has_soil));
            }
        }

        grid
    }

    /// Reads the cell at `coord`, distinguishing absent from inactive cells.
    pub(crate) fn lookup(&self, coord: GridCoord) -> Result<Cell, CellLookupError> {
        let index = self.index(coord).ok_or(CellLookupError::OutOfBounds)?;
        self.cells
            .get(index)
            .copied()
            .flatten()
            .ok_or(CellLookupError::Inactive)
    }

    /// Sets the soil flag; returns `false` when the cell is not addressable.
    pub(crate) fn set_soil(&mut self, coord: GridCoord, has_soil: bool) -> bool {
        self.update(coord, |cell| cell.with_soil(has_soil))
    }

    /// Sets the building flag; returns `false` when the cell is not addressable.
    pub(crate) fn set_building(&mut self, coord: GridCoord, has_building: bool) -> bool {
        self.update(coord, |cell| cell.with_building(has_building))
    }

    /// Iterates every coordinate of the bounding rectangle in row-major order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (GridCoord, Option<Cell>)> + '_ {
        let columns = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let column = i32::try_from(index % columns).unwrap_or(i32::MAX);
            let row = i32::try_from(index / columns).unwrap_or(i32::MAX);
            (GridCoord::new(column, row), *cell)
        })
    }

    /// Number of cells that belong to the active shape.
    pub(crate) fn active_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn update(&mut self, coord: GridCoord, change: impl FnOnce(Cell) -> Cell) -> bool {
        let Some(index) = self.index(coord) else {
            return false;
        };
        match self.cells.get_mut(index) {
            Some(Some(cell)) => {
                *cell = change(*cell);
                true
            }
            _ => false,
        }
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        if !coord.is_within(self.columns, self.rows) {
            return None;
        }
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(columns: u32, rows: u32) -> BTreeSet<GridCoord> {
        let mut cells = BTreeSet::new();
        for row in 0..rows as i32 {
            for column in 0..columns as i32 {
                let _ = cells.insert(GridCoord::new(column, row));
            }
        }
        cells
    }

    #[test]
    fn lookup_distinguishes_out_of_bounds_from_inactive() {
        let active = BTreeSet::from([GridCoord::new(0, 0)]);
        let grid = GridState::new(2, 2, &active, None);

        assert_eq!(grid.lookup(GridCoord::new(0, 0)), Ok(Cell::EMPTY));
        assert_eq!(
            grid.lookup(GridCoord::new(1, 1)),
            Err(CellLookupError::Inactive)
        );
        assert_eq!(
            grid.lookup(GridCoord::new(2, 0)),
            Err(CellLookupError::OutOfBounds)
        );
        assert_eq!(
            grid.lookup(GridCoord::new(0, -1)),
            Err(CellLookupError::OutOfBounds)
        );
    }

    #[test]
    fn soil_mask_only_seeds_active_cells() {
        let active = BTreeSet::from([GridCoord::new(0, 0), GridCoord::new(1, 0)]);
        let soil = CellMask::parse(&["#.", "##"]).expect("valid mask");
        let grid = GridState::new(2, 2, &active, Some(&soil));

        assert!(grid
            .lookup(GridCoord::new(0, 0))
            .expect("active")
            .has_soil());
        assert!(!grid
            .lookup(GridCoord::new(1, 0))
            .expect("active")
            .has_soil());
        assert_eq!(
            grid.lookup(GridCoord::new(0, 1)),
            Err(CellLookupError::Inactive)
        );
    }

    #[test]
    fn setters_ignore_unaddressable_cells() {
        let active = BTreeSet::from([GridCoord::new(0, 0)]);
        let mut grid = GridState::new(2, 1, &active, None);

        assert!(grid.set_soil(GridCoord::new(0, 0), true));
        assert!(!grid.set_soil(GridCoord::new(1, 0), true));
        assert!(!grid.set_building(GridCoord::new(5, 5), true));
        assert_eq!(grid.active_count(), 1);
    }

    #[test]
    fn iteration_is_row_major_over_the_bounding_rectangle() {
        let grid = GridState::new(3, 2, &full(3, 2), None);
        let coords: Vec<_> = grid.iter().map(|(coord, _)| coord).collect();

        assert_eq!(coords.len(), 6);
        assert_eq!(coords[0], GridCoord::new(0, 0));
        assert_eq!(coords[2], GridCoord::new(2, 0));
        assert_eq!(coords[3], GridCoord::new(0, 1));
        assert_eq!(grid.dimensions(), (3, 2));
    }
}
