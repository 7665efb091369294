#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Hexonia adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use hexonia_core::{BuildingId, Cell, GridCoord, StructureId};
use std::{error::Error, fmt};

/// Opacity applied to placement holograms.
pub const DEFAULT_HOLOGRAM_ALPHA: f32 = 0.4;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Fully opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a copy with the alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Channels quantised to bytes, alpha included.
    #[must_use]
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha].map(|channel| {
            // clamped to 0..=255 before the cast
            (channel.clamp(0.0, 1.0) * 255.0).round() as u8
        })
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Visual state of a tile derived from its occupancy flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileAppearance {
    /// No soil and no building.
    Bare,
    /// Soil without a building.
    Soil,
    /// A building stands on the tile.
    Built,
}

impl TileAppearance {
    /// Selects the appearance for a cell; buildings take precedence over soil.
    #[must_use]
    pub const fn from_cell(cell: Cell) -> Self {
        if cell.has_building() {
            Self::Built
        } else if cell.has_soil() {
            Self::Soil
        } else {
            Self::Bare
        }
    }

    /// Fill color used for the tile.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Bare => Color::new(0.3, 0.3, 0.3, 0.5),
            Self::Soil => Color::WHITE,
            Self::Built => Color::new(0.5, 0.8, 0.5, 0.3),
        }
    }
}

/// Tint applied to a placement hologram: green when placeable, red otherwise.
#[must_use]
pub const fn hologram_tint(placeable: bool, alpha: f32) -> Color {
    if placeable {
        Color::new(0.0, 1.0, 0.0, alpha)
    } else {
        Color::new(1.0, 0.0, 0.0, alpha)
    }
}

/// Corners of a pointy-top hex of circumradius `size`, counter-clockwise
/// starting at -30 degrees.
#[must_use]
pub fn hex_corners(center: Vec2, size: f32) -> [Vec2; 6] {
    std::array::from_fn(|index| {
        let angle = (60.0 * index as f32 - 30.0).to_radians();
        center + Vec2::new(angle.cos(), angle.sin()) * size
    })
}

/// Describes a single active tile that adapters should draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Grid coordinate of the tile.
    pub coord: GridCoord,
    /// World-space center of the tile.
    pub center: Vec2,
    /// Occupancy-derived appearance.
    pub appearance: TileAppearance,
}

impl TilePresentation {
    /// Creates a tile descriptor from its cell state.
    #[must_use]
    pub const fn new(coord: GridCoord, center: Vec2, cell: Cell) -> Self {
        Self {
            coord,
            center,
            appearance: TileAppearance::from_cell(cell),
        }
    }
}

/// Describes a placed building that adapters instantiate at its center.
#[derive(Clone, Debug, PartialEq)]
pub struct StructurePresentation {
    /// Identifier allocated by the world.
    pub id: StructureId,
    /// Descriptor the structure was built from.
    pub building: BuildingId,
    /// World-space center of the structure.
    pub position: Vec2,
    /// World-space centers of every covered cell.
    pub cells: Vec<Vec2>,
}

/// Placement preview drawn under the cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct HologramPresentation {
    /// Building being previewed.
    pub building: BuildingId,
    /// World-space center of the snapped cell.
    pub position: Vec2,
    /// World-space centers of the previewed footprint.
    pub cells: Vec<Vec2>,
    /// Validity tint.
    pub tint: Color,
}

impl HologramPresentation {
    /// Creates a hologram tinted with [`DEFAULT_HOLOGRAM_ALPHA`].
    #[must_use]
    pub fn new(building: BuildingId, position: Vec2, cells: Vec<Vec2>, placeable: bool) -> Self {
        Self {
            building,
            position,
            cells,
            tint: hologram_tint(placeable, DEFAULT_HOLOGRAM_ALPHA),
        }
    }
}

/// Scene description combining tiles, structures and the optional hologram.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Hex circumradius in world units.
    pub cell_size: f32,
    /// Active tiles in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Placed buildings ordered by identifier.
    pub structures: Vec<StructurePresentation>,
    /// Preview under the cursor, if any.
    pub hologram: Option<HologramPresentation>,
}

impl Scene {
    /// Creates a new scene descriptor.
    ///
    /// Returns an error when `cell_size` is not a positive finite number.
    pub fn new(
        cell_size: f32,
        tiles: Vec<TilePresentation>,
        structures: Vec<StructurePresentation>,
        hologram: Option<HologramPresentation>,
    ) -> Result<Self, RenderingError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            cell_size,
            tiles,
            structures,
            hologram,
        })
    }

    /// Axis-aligned world-space bounds of every tile and hologram outline.
    ///
    /// Returns `None` for an empty scene.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let tile_centers = self.tiles.iter().map(|tile| tile.center);
        let hologram_centers = self
            .hologram
            .iter()
            .flat_map(|hologram| hologram.cells.iter().copied());

        tile_centers
            .chain(hologram_centers)
            .flat_map(|center| hex_corners(center, self.cell_size))
            .fold(None, |bounds, corner| match bounds {
                None => Some((corner, corner)),
                Some((min, max)) => Some((min.min(corner), max.max(corner))),
            })
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title attached to the rendered output.
    pub title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Hexonia scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Hexes must have a positive finite size.
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(
                    f,
                    "cell_size must be positive and finite (received {cell_size})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(left: Vec2, right: Vec2) -> bool {
        (left - right).length() < 1e-5
    }

    #[test]
    fn appearance_follows_occupancy_flags() {
        assert_eq!(TileAppearance::from_cell(Cell::EMPTY), TileAppearance::Bare);
        assert_eq!(
            TileAppearance::from_cell(Cell::new(true, false)),
            TileAppearance::Soil
        );
        assert_eq!(
            TileAppearance::from_cell(Cell::new(true, true)),
            TileAppearance::Built
        );
        assert_eq!(TileAppearance::Bare.color(), Color::new(0.3, 0.3, 0.3, 0.5));
        assert_eq!(TileAppearance::Soil.color(), Color::WHITE);
        assert_eq!(TileAppearance::Built.color().alpha, 0.3);
    }

    #[test]
    fn hologram_is_green_when_placeable_and_red_otherwise() {
        let valid = HologramPresentation::new(BuildingId::new("small"), Vec2::ZERO, Vec::new(), true);
        let invalid =
            HologramPresentation::new(BuildingId::new("small"), Vec2::ZERO, Vec::new(), false);

        assert_eq!(valid.tint, Color::new(0.0, 1.0, 0.0, DEFAULT_HOLOGRAM_ALPHA));
        assert_eq!(invalid.tint, Color::new(1.0, 0.0, 0.0, DEFAULT_HOLOGRAM_ALPHA));
    }

    #[test]
    fn hex_corners_are_pointy_top() {
        let corners = hex_corners(Vec2::new(1.0, 2.0), 2.0);
        let half_width = 3.0_f32.sqrt();

        assert!(approx(corners[0], Vec2::new(1.0 + half_width, 1.0)));
        assert!(approx(corners[1], Vec2::new(1.0 + half_width, 3.0)));
        assert!(approx(corners[2], Vec2::new(1.0, 4.0)));
        assert!(approx(corners[5], Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn scene_rejects_degenerate_cell_sizes_without_panicking() {
        for cell_size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let error = Scene::new(cell_size, Vec::new(), Vec::new(), None)
                .expect_err("degenerate cell size must be rejected");
            assert!(matches!(error, RenderingError::InvalidCellSize { .. }));
        }
    }

    #[test]
    fn scene_bounds_cover_every_tile_outline() {
        let tiles = vec![
            TilePresentation::new(GridCoord::new(0, 0), Vec2::ZERO, Cell::EMPTY),
            TilePresentation::new(GridCoord::new(1, 0), Vec2::new(10.0, 0.0), Cell::EMPTY),
        ];
        let scene = Scene::new(1.0, tiles, Vec::new(), None).expect("valid scene");
        let (min, max) = scene.bounds().expect("scene has tiles");

        assert!(approx(min, Vec2::new(-(3.0_f32.sqrt()) / 2.0, -1.0)));
        assert!(approx(max, Vec2::new(10.0 + 3.0_f32.sqrt() / 2.0, 1.0)));
        assert_eq!(
            Scene::new(1.0, Vec::new(), Vec::new(), None)
                .expect("valid scene")
                .bounds(),
            None
        );
    }

    #[test]
    fn colors_quantise_to_bytes() {
        assert_eq!(Color::WHITE.to_rgba_u8(), [255, 255, 255, 255]);
        assert_eq!(
            Color::from_rgb_u8(10, 20, 30).with_alpha(0.5).to_rgba_u8(),
            [10, 20, 30, 128]
        );
        assert_eq!(Color::new(0.0, 0.0, 0.0, 1.0).lighten(0.5).red, 0.5);
    }
}
