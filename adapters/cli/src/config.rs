//! TOML grid files describing the grid, its buildings and a placement script.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use glam::{IVec2, Vec2};
use hexonia_core::{
    AssetRef, BuildingCost, BuildingId, BuildingSize, BuildingSpec, CellMask, GridBlueprint,
    GridCoord, GridLayout, GridShape, HexLayout, PlacementMode,
};
use hexonia_system_builder::BuildingCatalog;
use serde::Deserialize;

const SUPPORTED_GRID_FILE_VERSION: u32 = 1;

/// Fully validated contents of a grid file.
#[derive(Clone, Debug)]
pub(crate) struct Scenario {
    pub(crate) blueprint: GridBlueprint,
    pub(crate) catalog: BuildingCatalog,
    pub(crate) actions: Vec<Action>,
}

/// Scripted placement request.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Action {
    pub(crate) mode: PlacementMode,
    pub(crate) building: Option<BuildingId>,
    pub(crate) target: Target,
}

/// Where a scripted action points the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Target {
    Cell(GridCoord),
    World(Vec2),
}

pub(crate) fn load(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read grid file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid grid file {}", path.display()))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridFile {
    version: u32,
    grid: GridSection,
    #[serde(default)]
    buildings: Vec<BuildingEntry>,
    #[serde(default)]
    actions: Vec<ActionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    columns: u32,
    rows: u32,
    #[serde(default = "default_cell_size")]
    cell_size: f32,
    #[serde(default)]
    origin_offset: [i32; 2],
    #[serde(default)]
    shape: ShapeKind,
    custom_shape: Option<Vec<String>>,
    soil: Option<Vec<String>>,
}

fn default_cell_size() -> f32 {
    1.0
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ShapeKind {
    #[default]
    Rectangle,
    L,
    T,
    Cross,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildingEntry {
    id: String,
    name: String,
    asset: Option<String>,
    hex_size: u8,
    #[serde(default)]
    gold: u32,
    #[serde(default)]
    wood: u32,
    #[serde(default)]
    stone: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ActionEntry {
    kind: ActionKind,
    building: Option<String>,
    at: Option<[i32; 2]>,
    world: Option<[f32; 2]>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ActionKind {
    Soil,
    Building,
}

pub(crate) fn parse(contents: &str) -> Result<Scenario> {
    let file: GridFile = toml::from_str(contents).context("failed to parse grid file toml")?;
    if file.version != SUPPORTED_GRID_FILE_VERSION {
        bail!(
            "unsupported grid file version {}; expected {}",
            file.version,
            SUPPORTED_GRID_FILE_VERSION
        );
    }

    let blueprint = blueprint(&file.grid)?;
    let catalog = if file.buildings.is_empty() {
        BuildingCatalog::standard()
    } else {
        let entries = file
            .buildings
            .into_iter()
            .map(building)
            .collect::<Result<Vec<_>>>()?;
        BuildingCatalog::new(entries).context("invalid building catalog")?
    };

    let actions = file
        .actions
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            action(entry).with_context(|| format!("invalid action #{}", index + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    for action in &actions {
        if let Some(id) = &action.building {
            let _ = catalog.position(id)?;
        }
    }

    Ok(Scenario {
        blueprint,
        catalog,
        actions,
    })
}

fn blueprint(grid: &GridSection) -> Result<GridBlueprint> {
    let origin_offset = IVec2::from_array(grid.origin_offset);
    let hex = HexLayout::new(grid.cell_size, origin_offset).context("invalid [grid] layout")?;
    let layout = GridLayout::new(grid.columns, grid.rows, hex);

    let shape = match (&grid.custom_shape, &grid.shape) {
        (Some(rows), _) => {
            GridShape::Custom(CellMask::parse(rows).context("invalid [grid] custom_shape")?)
        }
        (None, ShapeKind::Rectangle) => GridShape::Rectangle,
        (None, ShapeKind::L) => GridShape::L,
        (None, ShapeKind::T) => GridShape::T,
        (None, ShapeKind::Cross) => GridShape::Cross,
    };

    let mut blueprint = GridBlueprint::new(layout, shape);
    if let Some(rows) = &grid.soil {
        blueprint = blueprint.with_soil(CellMask::parse(rows).context("invalid [grid] soil")?);
    }
    Ok(blueprint)
}

fn building(entry: BuildingEntry) -> Result<BuildingSpec> {
    let size = BuildingSize::from_hex_size(entry.hex_size)
        .with_context(|| format!("invalid building `{}`", entry.id))?;
    let asset = entry
        .asset
        .unwrap_or_else(|| format!("buildings/{}", entry.id));

    Ok(BuildingSpec::new(
        BuildingId::new(entry.id),
        entry.name,
        AssetRef::new(asset),
        size,
        BuildingCost {
            gold: entry.gold,
            wood: entry.wood,
            stone: entry.stone,
        },
    ))
}

fn action(entry: ActionEntry) -> Result<Action> {
    let target = match (entry.at, entry.world) {
        (Some([column, row]), None) => Target::Cell(GridCoord::new(column, row)),
        (None, Some(point)) => Target::World(Vec2::from_array(point)),
        (Some(_), Some(_)) => bail!("`at` and `world` are mutually exclusive"),
        (None, None) => bail!("either `at` or `world` is required"),
    };
    let mode = match entry.kind {
        ActionKind::Soil => PlacementMode::PlaceSoil,
        ActionKind::Building => PlacementMode::PlaceBuilding,
    };

    Ok(Action {
        mode,
        building: entry.building.map(BuildingId::new),
        target,
    })
}
