use std::collections::BTreeSet;

use glam::IVec2;
use hexonia_core::{
    hex_disk_len, AssetRef, BuildingCost, BuildingId, BuildingSize, BuildingSpec, Cell,
    CellLookupError, CellMask, GridBlueprint, GridCoord, GridLayout, GridShape, HexLayout,
    PlacementError, PlacementMode,
};
use hexonia_world::{self as world, query, World};

fn building(size: BuildingSize) -> BuildingSpec {
    BuildingSpec::new(
        BuildingId::new("test"),
        "Test",
        AssetRef::new("test"),
        size,
        BuildingCost {
            gold: 100,
            wood: 0,
            stone: 0,
        },
    )
}

fn rectangle(columns: u32, rows: u32) -> World {
    let layout = GridLayout::new(columns, rows, HexLayout::UNIT);
    World::from_blueprint(&GridBlueprint::new(layout, GridShape::Rectangle))
}

fn snapshot(world: &World) -> Vec<(GridCoord, Option<Cell>)> {
    query::cell_view(world).iter().collect()
}

#[test]
fn soil_then_building_on_a_single_cell() {
    let mut world = rectangle(10, 10);
    let center = GridCoord::new(5, 5);

    assert!(query::can_place_soil(&world, center, 0));
    world::commit_soil(&mut world, center, 0);
    assert!(!query::can_place_soil(&world, center, 0));

    assert!(query::can_place_building(&world, center, 0));
    world::commit_building(&mut world, center, 0);
    assert!(!query::can_place_building(&world, center, 0));

    assert_eq!(query::cell(&world, center), Ok(Cell::new(true, true)));
}

#[test]
fn corner_footprint_is_clipped_and_rejected() {
    let world = rectangle(10, 10);
    let corner = GridCoord::new(0, 0);

    let footprint = query::footprint(&world, corner, 1);
    assert_eq!(footprint.len(), query::neighbors(&world, corner).len() + 1);
    assert!(footprint.len() < 7);

    assert_eq!(
        query::validate_placement(&world, corner, 1, PlacementMode::PlaceSoil),
        Err(PlacementError::OutOfBounds)
    );
    assert!(!query::can_place_soil(&world, corner, 1));
}

#[test]
fn a_single_disqualifying_cell_rejects_the_whole_footprint() {
    let mut world = rectangle(10, 10);
    let center = GridCoord::new(4, 4);
    let footprint = query::footprint(&world, center, 2);
    assert_eq!(footprint.len(), hex_disk_len(2));

    let last = footprint.as_slice()[footprint.len() - 1];
    world::commit_soil(&mut world, last, 0);
    let before = snapshot(&world);

    let outcome = world::place(
        &mut world,
        center,
        &building(BuildingSize::Large),
        PlacementMode::PlaceSoil,
    );

    assert!(!outcome.accepted);
    assert_eq!(outcome.rejection, Some(PlacementError::SoilPresent));
    assert_eq!(outcome.footprint, footprint);
    assert_eq!(snapshot(&world), before, "rejected placement mutated the grid");
}

#[test]
fn buildings_require_soil_under_every_cell() {
    let mut world = rectangle(10, 10);
    let center = GridCoord::new(5, 4);
    let medium = building(BuildingSize::Medium);

    let small = building(BuildingSize::Small);
    assert!(world::place(&mut world, center, &small, PlacementMode::PlaceSoil).accepted);

    let outcome = world::place(&mut world, center, &medium, PlacementMode::PlaceBuilding);
    assert_eq!(outcome.rejection, Some(PlacementError::SoilMissing));
    assert!(query::structures(&world).into_vec().is_empty());

    for neighbor in query::neighbors(&world, center) {
        world::commit_soil(&mut world, neighbor, 0);
    }

    let outcome = world::place(&mut world, center, &medium, PlacementMode::PlaceBuilding);
    assert!(outcome.accepted);
    for cell in outcome.footprint.iter() {
        assert_eq!(query::cell(&world, cell), Ok(Cell::new(true, true)));
    }
}

#[test]
fn building_validity_on_soiled_ground_depends_only_on_buildings() {
    let mut world = rectangle(12, 12);
    let center = GridCoord::new(6, 6);
    world::commit_soil(&mut world, center, 2);

    let inner = query::footprint(&world, center, 1);
    assert!(inner.is_subset_of(&query::footprint(&world, center, 2)));
    assert!(query::can_place_building(&world, center, 1));

    let neighbor = inner.as_slice()[1];
    world::commit_building(&mut world, neighbor, 0);

    assert_eq!(
        query::validate_placement(&world, center, 1, PlacementMode::PlaceBuilding),
        Err(PlacementError::BuildingPresent)
    );
    assert!(query::can_place_building(&world, GridCoord::new(6, 8), 0));
}

#[test]
fn inactive_cells_behave_like_missing_cells() {
    let layout = GridLayout::new(5, 5, HexLayout::UNIT);
    let mut world = World::from_blueprint(&GridBlueprint::new(layout, GridShape::Cross));
    let hub = GridCoord::new(2, 2);

    assert_eq!(
        query::cell(&world, GridCoord::new(0, 0)),
        Err(CellLookupError::Inactive)
    );
    assert_eq!(
        query::cell(&world, GridCoord::new(7, 0)),
        Err(CellLookupError::OutOfBounds)
    );
    assert!(query::can_place_soil(&world, hub, 0));
    assert_eq!(
        query::validate_placement(&world, hub, 1, PlacementMode::PlaceSoil),
        Err(PlacementError::Inactive)
    );

    let before = snapshot(&world);
    world::commit_soil(&mut world, GridCoord::new(0, 0), 0);
    assert_eq!(snapshot(&world), before);
}

#[test]
fn out_of_bounds_centers_are_rejected() {
    let mut world = rectangle(10, 10);
    let outcome = world::place(
        &mut world,
        GridCoord::new(-3, 12),
        &building(BuildingSize::Small),
        PlacementMode::PlaceSoil,
    );

    assert!(!outcome.accepted);
    assert_eq!(outcome.rejection, Some(PlacementError::OutOfBounds));
    assert_eq!(outcome.footprint.center(), GridCoord::new(-3, 12));
}

#[test]
fn commit_without_validation_is_a_caller_contract_and_mutates_unconditionally() {
    let soil = CellMask::parse(&["....", ".#..", "....", "...."]).expect("valid mask");
    let layout = GridLayout::new(4, 4, HexLayout::UNIT);
    let mut world =
        World::from_blueprint(&GridBlueprint::new(layout, GridShape::Rectangle).with_soil(soil));
    let center = GridCoord::new(1, 1);

    assert!(!query::can_place_soil(&world, center, 1));
    world::commit_soil(&mut world, center, 1);

    for cell in query::footprint(&world, center, 1).iter() {
        assert_eq!(query::cell(&world, cell), Ok(Cell::new(true, false)));
    }
}

#[test]
fn world_points_snap_to_the_cell_they_fall_in() {
    let hex = HexLayout::new(0.5, IVec2::new(2, 3)).expect("valid layout");
    let layout = GridLayout::new(8, 8, hex);
    let world = World::from_blueprint(&GridBlueprint::new(layout, GridShape::Rectangle));

    let mut seen = BTreeSet::new();
    for (coord, _) in query::cell_view(&world).iter() {
        let center = query::grid_to_world(&world, coord);
        let nudged = center + glam::Vec2::new(0.1, -0.1);
        assert_eq!(query::world_to_grid(&world, center), Some(coord));
        assert_eq!(query::world_to_grid(&world, nudged), Some(coord));
        let _ = seen.insert(coord);
    }
    assert_eq!(seen.len(), 64);
}

#[test]
fn oversized_radius_is_rejected_without_walking_the_whole_disk() {
    let mut world = World::new();
    let center = GridCoord::new(5, 5);
    let before = snapshot(&world);

    assert_eq!(query::footprint(&world, center, 200_000).len(), 100);
    assert!(!query::can_place_soil(&world, center, 200_000));
    assert_eq!(
        query::validate_placement(&world, center, u32::MAX, PlacementMode::PlaceSoil),
        Err(PlacementError::OutOfBounds)
    );

    world::commit_soil(&mut world, center, u32::MAX);
    assert!(query::cell_view(&world)
        .iter()
        .all(|(_, cell)| cell.map_or(false, |cell| cell.has_soil())));
    assert_ne!(snapshot(&world), before);
}
