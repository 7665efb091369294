#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder-mode system responsible for previews and placement commands.
//!
//! The system never touches the world directly: it converts the cursor into
//! a grid cell, evaluates the selected building's footprint through a
//! caller-supplied validation closure, and emits [`Command::Place`] only for
//! requests that validated.

use std::sync::Arc;

use glam::Vec2;
use hexonia_core::{
    AssetRef, BuildingCost, BuildingId, BuildingSize, BuildingSpec, Command, Footprint, GridCoord,
    GridLayout, PlacementMode,
};
use thiserror::Error;

const STANDARD_GOLD_COST: u32 = 100;

/// Errors raised while assembling or querying a [`BuildingCatalog`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A catalog must offer at least one building.
    #[error("building catalog is empty")]
    Empty,
    /// Two entries share the same identifier.
    #[error("building `{0}` is listed more than once")]
    DuplicateId(BuildingId),
    /// No entry carries the requested identifier.
    #[error("unknown building `{0}`")]
    UnknownBuilding(BuildingId),
}

/// Ordered, non-empty list of buildings available to the player.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingCatalog {
    entries: Vec<Arc<BuildingSpec>>,
}

impl BuildingCatalog {
    /// Creates a catalog, rejecting empty lists and duplicate identifiers.
    pub fn new(entries: Vec<BuildingSpec>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut shared: Vec<Arc<BuildingSpec>> = Vec::with_capacity(entries.len());
        for entry in entries {
            if shared.iter().any(|existing| existing.id() == entry.id()) {
                return Err(CatalogError::DuplicateId(entry.id().clone()));
            }
            shared.push(Arc::new(entry));
        }

        Ok(Self { entries: shared })
    }

    /// Small, medium and large buildings spanning one, two and three hex rings.
    #[must_use]
    pub fn standard() -> Self {
        let entries = [
            ("small", "Small Building", BuildingSize::Small),
            ("medium", "Medium Building", BuildingSize::Medium),
            ("large", "Large Building", BuildingSize::Large),
        ]
        .into_iter()
        .map(|(id, name, size)| {
            Arc::new(BuildingSpec::new(
                BuildingId::new(id),
                name,
                AssetRef::new(format!("buildings/{id}")),
                size,
                BuildingCost {
                    gold: STANDARD_GOLD_COST,
                    ..BuildingCost::default()
                },
            ))
        })
        .collect();

        Self { entries }
    }

    /// Number of buildings in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; catalogs cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retrieves the building at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<BuildingSpec>> {
        self.entries.get(index)
    }

    /// Position of the building carrying `id`.
    pub fn position(&self, id: &BuildingId) -> Result<usize, CatalogError> {
        self.entries
            .iter()
            .position(|entry| entry.id() == id)
            .ok_or_else(|| CatalogError::UnknownBuilding(id.clone()))
    }

    /// Iterates the buildings in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<BuildingSpec>> {
        self.entries.iter()
    }
}

impl Default for BuildingCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Advances the selection to the next catalog entry.
    pub cycle_building: bool,
    /// Held to preview building placement instead of soil.
    pub building_modifier: bool,
    /// Requests soil under the selected building's footprint.
    pub place_soil: bool,
    /// Requests construction of the selected building.
    pub place_building: bool,
    /// Cursor position in world space, if the cursor is over the scene.
    pub cursor_world: Option<Vec2>,
}

/// Declarative hologram describing a potential placement under the cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Building currently selected.
    pub building: Arc<BuildingSpec>,
    /// Cell the cursor snapped to.
    pub center: GridCoord,
    /// World-space center of the snapped cell.
    pub world_position: Vec2,
    /// Occupancy layer previewed.
    pub mode: PlacementMode,
    /// Cells the placement would cover, center first.
    pub footprint: Footprint,
    /// Whether the previewed placement would be accepted.
    pub placeable: bool,
}

/// Builder-mode system that translates cursor input into placement commands.
#[derive(Clone, Debug)]
pub struct Builder {
    catalog: BuildingCatalog,
    selected: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(BuildingCatalog::standard())
    }
}

impl Builder {
    /// Creates a builder with the first catalog entry selected.
    #[must_use]
    pub fn new(catalog: BuildingCatalog) -> Self {
        Self {
            catalog,
            selected: 0,
        }
    }

    /// Buildings the builder cycles through.
    #[must_use]
    pub fn catalog(&self) -> &BuildingCatalog {
        &self.catalog
    }

    /// Currently selected building.
    #[must_use]
    pub fn selected(&self) -> &Arc<BuildingSpec> {
        &self.catalog.entries[self.selected % self.catalog.entries.len()]
    }

    /// Selects the building carrying `id`.
    pub fn select(&mut self, id: &BuildingId) -> Result<(), CatalogError> {
        self.selected = self.catalog.position(id)?;
        log::info!("selected {}", describe(self.selected()));
        Ok(())
    }

    /// Processes one frame of input and returns the preview under the cursor.
    ///
    /// `validate` must mirror `query::validate_placement(world, center,
    /// radius, mode).is_ok()`; it is consulted for the preview and again
    /// before any command is emitted.
    pub fn handle<F>(
        &mut self,
        input: BuilderInput,
        layout: &GridLayout,
        mut validate: F,
        out: &mut Vec<Command>,
    ) -> Option<PlacementPreview>
    where
        F: FnMut(GridCoord, u32, PlacementMode) -> bool,
    {
        if input.cycle_building {
            self.selected = (self.selected + 1) % self.catalog.len();
            log::info!("selected {}", describe(self.selected()));
        }

        let center = input
            .cursor_world
            .and_then(|position| layout.hex().world_to_grid(position))?;
        let building = Arc::clone(self.selected());
        let radius = building.radius();

        for (requested, mode) in [
            (input.place_soil, PlacementMode::PlaceSoil),
            (input.place_building, PlacementMode::PlaceBuilding),
        ] {
            if requested && validate(center, radius, mode) {
                out.push(Command::Place {
                    center,
                    building: Arc::clone(&building),
                    mode,
                });
            }
        }

        let mode = if input.building_modifier {
            PlacementMode::PlaceBuilding
        } else {
            PlacementMode::PlaceSoil
        };

        Some(PlacementPreview {
            world_position: layout.hex().grid_to_world(center),
            footprint: layout.footprint(center, radius),
            placeable: validate(center, radius, mode),
            building,
            center,
            mode,
        })
    }
}

fn describe(building: &BuildingSpec) -> String {
    format!(
        "{} (hex size {})",
        building.name(),
        building.size().hex_size()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> BuildingSpec {
        BuildingSpec::new(
            BuildingId::new(id),
            id,
            AssetRef::new(id),
            BuildingSize::Small,
            BuildingCost::default(),
        )
    }

    #[test]
    fn standard_catalog_offers_three_sizes_at_equal_cost() {
        let catalog = BuildingCatalog::standard();
        let sizes: Vec<_> = catalog.iter().map(|entry| entry.size()).collect();

        assert_eq!(
            sizes,
            vec![BuildingSize::Small, BuildingSize::Medium, BuildingSize::Large]
        );
        assert!(catalog.iter().all(|entry| entry.cost().gold == 100));
        assert_eq!(catalog.position(&BuildingId::new("large")), Ok(2));
    }

    #[test]
    fn catalog_rejects_empty_and_duplicate_entries() {
        assert_eq!(BuildingCatalog::new(Vec::new()), Err(CatalogError::Empty));
        assert_eq!(
            BuildingCatalog::new(vec![entry("hut"), entry("hut")]),
            Err(CatalogError::DuplicateId(BuildingId::new("hut")))
        );
        assert_eq!(
            BuildingCatalog::standard().position(&BuildingId::new("castle")),
            Err(CatalogError::UnknownBuilding(BuildingId::new("castle")))
        );
    }

    #[test]
    fn selection_by_identifier() {
        let mut builder = Builder::default();
        builder
            .select(&BuildingId::new("medium"))
            .expect("medium is in the standard catalog");

        assert_eq!(builder.selected().size(), BuildingSize::Medium);
        assert!(builder.select(&BuildingId::new("castle")).is_err());
        assert_eq!(builder.selected().size(), BuildingSize::Medium);
    }
}
