//! Rendering backend that writes scenes as standalone SVG documents.

use std::{fmt::Write as _, fs, path::PathBuf};

use anyhow::{Context, Result};
use glam::Vec2;
use hexonia_rendering::{hex_corners, Color, Presentation, RenderingBackend};

const MARGIN: f32 = 0.5;
const OUTLINE: Color = Color::new(0.1, 0.1, 0.1, 1.0);
const STRUCTURE_FILL: Color = Color::new(0.2, 0.45, 0.2, 1.0);
const HOLOGRAM_OUTLINE_LIGHTEN: f32 = 0.5;

/// Writes each presented frame to a file, replacing previous contents.
#[derive(Debug)]
pub(crate) struct SvgBackend {
    path: PathBuf,
}

impl SvgBackend {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RenderingBackend for SvgBackend {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        let document = document(presentation);
        fs::write(&self.path, document)
            .with_context(|| format!("failed to write svg to {}", self.path.display()))?;
        log::info!("wrote {}", self.path.display());
        Ok(())
    }
}

/// Serialises the presentation, mapping world space (y up) to SVG space (y down).
pub(crate) fn document(presentation: &Presentation) -> String {
    let scene = &presentation.scene;
    let margin = Vec2::splat(MARGIN * scene.cell_size);
    let (min, max) = scene.bounds().unwrap_or((Vec2::ZERO, Vec2::ZERO));
    let (min, max) = (min - margin, max + margin);
    let size = max - min;
    let project = |point: Vec2| Vec2::new(point.x - min.x, max.y - point.y);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {:.3} {:.3}">"#,
        size.x, size.y
    );
    let _ = writeln!(svg, "  <title>{}</title>", escape(&presentation.title));
    let _ = writeln!(
        svg,
        r#"  <rect width="100%" height="100%" {}/>"#,
        fill(presentation.clear_color)
    );

    let stroke_width = scene.cell_size * 0.05;
    for tile in &scene.tiles {
        let _ = writeln!(
            svg,
            r#"  <polygon class="tile" points="{}" {} stroke="{}" stroke-width="{stroke_width:.3}"/>"#,
            points(tile.center, scene.cell_size, project),
            fill(tile.appearance.color()),
            rgb(OUTLINE)
        );
    }

    for structure in &scene.structures {
        let center = project(structure.position);
        let _ = writeln!(
            svg,
            r#"  <circle class="structure" cx="{:.3}" cy="{:.3}" r="{:.3}" {}><title>{} #{}</title></circle>"#,
            center.x,
            center.y,
            scene.cell_size * 0.5,
            fill(STRUCTURE_FILL),
            escape(structure.building.as_str()),
            structure.id.get()
        );
    }

    if let Some(hologram) = &scene.hologram {
        let outline = hologram
            .tint
            .lighten(HOLOGRAM_OUTLINE_LIGHTEN)
            .with_alpha(1.0);
        for cell in &hologram.cells {
            let _ = writeln!(
                svg,
                r#"  <polygon class="hologram" points="{}" {} {} stroke-width="{stroke_width:.3}"/>"#,
                points(*cell, scene.cell_size, project),
                fill(hologram.tint),
                stroke(outline)
            );
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn points(center: Vec2, cell_size: f32, project: impl Fn(Vec2) -> Vec2) -> String {
    hex_corners(center, cell_size)
        .into_iter()
        .map(|corner| {
            let corner = project(corner);
            format!("{:.3},{:.3}", corner.x, corner.y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn rgb(color: Color) -> String {
    let [red, green, blue, _] = color.to_rgba_u8();
    format!("rgb({red},{green},{blue})")
}

fn fill(color: Color) -> String {
    format!(
        r#"fill="{}" fill-opacity="{:.2}""#,
        rgb(color),
        color.alpha.clamp(0.0, 1.0)
    )
}

fn stroke(color: Color) -> String {
    format!(
        r#"stroke="{}" stroke-opacity="{:.2}""#,
        rgb(color),
        color.alpha.clamp(0.0, 1.0)
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
