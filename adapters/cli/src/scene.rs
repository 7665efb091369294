//! Converts world snapshots into rendering descriptors.

use anyhow::{Context, Result};
use hexonia_rendering::{HologramPresentation, Scene, StructurePresentation, TilePresentation};
use hexonia_system_builder::PlacementPreview;
use hexonia_world::{query, World};

/// Captures every active tile, placed structure and the optional preview.
pub(crate) fn capture(world: &World, preview: Option<&PlacementPreview>) -> Result<Scene> {
    let layout = query::layout(world);
    let hex = layout.hex();

    let tiles = query::cell_view(world)
        .iter()
        .filter_map(|(coord, cell)| {
            cell.map(|cell| TilePresentation::new(coord, hex.grid_to_world(coord), cell))
        })
        .collect();

    let structures = query::structures(world)
        .into_vec()
        .into_iter()
        .map(|snapshot| StructurePresentation {
            id: snapshot.id,
            building: snapshot.building,
            position: hex.grid_to_world(snapshot.center),
            cells: snapshot
                .footprint
                .iter()
                .map(|cell| hex.grid_to_world(cell))
                .collect(),
        })
        .collect();

    let hologram = preview.map(|preview| {
        HologramPresentation::new(
            preview.building.id().clone(),
            preview.world_position,
            preview
                .footprint
                .iter()
                .map(|cell| hex.grid_to_world(cell))
                .collect(),
            preview.placeable,
        )
    });

    Scene::new(hex.cell_size(), tiles, structures, hologram).context("failed to assemble scene")
}
