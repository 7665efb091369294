#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative hex grid state for Hexonia.
//!
//! The world owns every cell and placed structure. Adapters and systems
//! mutate it exclusively through [`apply`] (or the equivalent direct
//! [`place`] call) and observe it through the read-only [`query`] module.

mod grid;
mod placement;
mod shape;
mod structures;

use hexonia_core::{
    BuildingSpec, Command, Event, Footprint, GridBlueprint, GridCoord, GridLayout, GridShape,
    HexLayout, PlacementError, PlacementMode, PlacementOutcome, StructureId,
};

use crate::{grid::GridState, structures::StructureRegistry};

const DEFAULT_GRID_COLUMNS: u32 = 10;
const DEFAULT_GRID_ROWS: u32 = 10;

/// Represents the authoritative grid and everything built on it.
#[derive(Debug)]
pub struct World {
    layout: GridLayout,
    grid: GridState,
    structures: StructureRegistry,
}

impl World {
    /// Creates a bare 10x10 rectangular grid of unit-sized hexes.
    #[must_use]
    pub fn new() -> Self {
        let layout = GridLayout::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, HexLayout::UNIT);
        Self::from_blueprint(&GridBlueprint::new(layout, GridShape::Rectangle))
    }

    /// Builds a world from a blueprint, seeding soil from its optional mask.
    #[must_use]
    pub fn from_blueprint(blueprint: &GridBlueprint) -> Self {
        let layout = blueprint.layout;
        let (columns, rows) = (layout.columns(), layout.rows());
        let active = shape::generate(&blueprint.shape, columns, rows);
        if let Some(soil) = &blueprint.soil {
            shape::warn_on_mismatch("soil", soil, columns, rows);
        }

        Self {
            layout,
            grid: GridState::new(columns, rows, &active, blueprint.soil.as_ref()),
            structures: StructureRegistry::new(),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

enum Placement {
    Soil(Footprint),
    Building(StructureId, Footprint),
    Rejected(Footprint, PlacementError),
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { blueprint } => {
            *world = World::from_blueprint(&blueprint);
            let (columns, rows) = world.grid.dimensions();
            let active_cells = world.grid.active_count();
            log::info!("configured {columns}x{rows} grid with {active_cells} active cells");
            out_events.push(Event::GridConfigured {
                columns,
                rows,
                active_cells,
            });
        }
        Command::Place {
            center,
            building,
            mode,
        } => {
            let event = match execute(world, center, &building, mode) {
                Placement::Soil(footprint) => Event::SoilPlaced { center, footprint },
                Placement::Building(structure, footprint) => Event::BuildingPlaced {
                    structure,
                    building: building.id().clone(),
                    center,
                    footprint,
                },
                Placement::Rejected(_, reason) => Event::PlacementRejected {
                    mode,
                    building: building.id().clone(),
                    center,
                    reason,
                },
            };
            out_events.push(event);
        }
    }
}

/// Validates and, when valid, commits a placement request in one step.
///
/// The whole footprint is checked before any cell is touched, so a rejected
/// request leaves the world unchanged.
pub fn place(
    world: &mut World,
    center: GridCoord,
    building: &BuildingSpec,
    mode: PlacementMode,
) -> PlacementOutcome {
    match execute(world, center, building, mode) {
        Placement::Soil(footprint) | Placement::Building(_, footprint) => {
            PlacementOutcome::accepted(footprint)
        }
        Placement::Rejected(footprint, reason) => PlacementOutcome::rejected(footprint, reason),
    }
}

/// Sets soil on every addressable cell of the footprint without validating it.
///
/// Callers must gate this behind [`query::can_place_soil`] on the identical
/// footprint with no intervening mutation. Prior cell state is overwritten.
pub fn commit_soil(world: &mut World, center: GridCoord, radius: u32) {
    let footprint = world.layout.footprint(center, radius);
    let written = placement::commit(&mut world.grid, &footprint, PlacementMode::PlaceSoil);
    log::debug!("committed soil around {center:?} (radius {radius}) on {written} cells");
}

/// Sets the building flag on every addressable cell of the footprint without validating it.
///
/// Callers must gate this behind [`query::can_place_building`] on the
/// identical footprint. No structure is recorded; use [`place`] or
/// [`apply`] for that.
pub fn commit_building(world: &mut World, center: GridCoord, radius: u32) {
    let footprint = world.layout.footprint(center, radius);
    let written = placement::commit(&mut world.grid, &footprint, PlacementMode::PlaceBuilding);
    log::debug!("committed building around {center:?} (radius {radius}) on {written} cells");
}

fn execute(
    world: &mut World,
    center: GridCoord,
    building: &BuildingSpec,
    mode: PlacementMode,
) -> Placement {
    let radius = building.radius();
    let footprint = world.layout.footprint(center, radius);

    let structure = placement::validate(&world.grid, &footprint, radius, mode).and_then(|()| {
        match mode {
            PlacementMode::PlaceSoil => Ok(None),
            // reserved before any cell is written so exhaustion leaves the grid untouched
            PlacementMode::PlaceBuilding => world
                .structures
                .allocate()
                .map(Some)
                .ok_or(PlacementError::StructureLimitReached),
        }
    });
    let structure = match structure {
        Ok(structure) => structure,
        Err(reason) => {
            log::debug!(
                "rejected {mode:?} of {} at {center:?}: {reason}",
                building.id()
            );
            return Placement::Rejected(footprint, reason);
        }
    };

    let written = placement::commit(&mut world.grid, &footprint, mode);
    log::debug!(
        "accepted {mode:?} of {} at {center:?} covering {written} cells",
        building.id()
    );

    match structure {
        None => Placement::Soil(footprint),
        Some(structure) => {
            world
                .structures
                .insert(structure, building.id().clone(), footprint.clone());
            Placement::Building(structure, footprint)
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use hexonia_core::{
        Cell, CellLookupError, Footprint, GridCoord, GridLayout, PlacementError, PlacementMode,
        StructureView,
    };

    use super::{placement, GridState, World};

    /// Dimensions and world placement of the grid.
    #[must_use]
    pub fn layout(world: &World) -> GridLayout {
        world.layout
    }

    /// Reads the cell at `coord`, reporting absent and inactive cells as errors.
    pub fn cell(world: &World, coord: GridCoord) -> Result<Cell, CellLookupError> {
        world.grid.lookup(coord)
    }

    /// Bounds-clipped footprint of `radius` around `center`.
    #[must_use]
    pub fn footprint(world: &World, center: GridCoord, radius: u32) -> Footprint {
        world.layout.footprint(center, radius)
    }

    /// Validates a footprint for `mode`, yielding the first failing reason in footprint order.
    pub fn validate_placement(
        world: &World,
        center: GridCoord,
        radius: u32,
        mode: PlacementMode,
    ) -> Result<(), PlacementError> {
        let footprint = world.layout.footprint(center, radius);
        placement::validate(&world.grid, &footprint, radius, mode)
    }

    /// Reports whether soil may cover the whole footprint.
    #[must_use]
    pub fn can_place_soil(world: &World, center: GridCoord, radius: u32) -> bool {
        validate_placement(world, center, radius, PlacementMode::PlaceSoil).is_ok()
    }

    /// Reports whether a building may occupy the whole footprint.
    #[must_use]
    pub fn can_place_building(world: &World, center: GridCoord, radius: u32) -> bool {
        validate_placement(world, center, radius, PlacementMode::PlaceBuilding).is_ok()
    }

    /// In-bounds neighbours of `coord`, ignoring the active shape.
    #[must_use]
    pub fn neighbors(world: &World, coord: GridCoord) -> Vec<GridCoord> {
        world.layout.neighbors(coord)
    }

    /// Snaps a world-space point to the nearest cell; the cell may lie outside the grid.
    #[must_use]
    pub fn world_to_grid(world: &World, position: Vec2) -> Option<GridCoord> {
        world.layout.hex().world_to_grid(position)
    }

    /// World-space center of `coord`.
    #[must_use]
    pub fn grid_to_world(world: &World, coord: GridCoord) -> Vec2 {
        world.layout.hex().grid_to_world(coord)
    }

    /// Exposes a read-only view of the dense cell storage.
    #[must_use]
    pub fn cell_view(world: &World) -> CellView<'_> {
        CellView { grid: &world.grid }
    }

    /// Captures every placed building ordered by identifier.
    #[must_use]
    pub fn structures(world: &World) -> StructureView {
        StructureView::from_snapshots(world.structures.snapshots())
    }

    /// Read-only view into the dense cell grid.
    #[derive(Clone, Copy, Debug)]
    pub struct CellView<'a> {
        grid: &'a GridState,
    }

    impl<'a> CellView<'a> {
        /// Iterates every coordinate of the bounding rectangle in row-major
        /// order; inactive cells yield `None`.
        pub fn iter(&self) -> impl Iterator<Item = (GridCoord, Option<Cell>)> + 'a {
            self.grid.iter()
        }

        /// Number of cells that belong to the grid shape.
        #[must_use]
        pub fn active_cells(&self) -> usize {
            self.grid.active_count()
        }

        /// Provides the dimensions of the underlying grid.
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            self.grid.dimensions()
        }
    }
}
