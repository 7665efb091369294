#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays scripted placements on a hex grid.

mod ascii;
mod config;
mod scene;
mod session;
mod svg;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec2;
use hexonia_core::{BuildingId, Event};
use hexonia_rendering::{Color, Presentation, RenderingBackend};

use crate::{session::Session, svg::SvgBackend};

const CLEAR_COLOR: Color = Color::from_rgb_u8(0x1e, 0x1e, 0x24);

#[derive(Debug, Parser)]
#[command(name = "hexonia", version, about = "Hex grid soil and building placement")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Replays the grid file's actions and prints the events and final map.
    Run {
        /// Path to the TOML grid file.
        config: PathBuf,
        /// Prints the events as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Replays the grid file's actions and writes an SVG rendering.
    Render {
        /// Path to the TOML grid file.
        config: PathBuf,
        /// Destination of the SVG document.
        #[arg(long, short)]
        out: PathBuf,
        /// World-space cursor `x,y` used to draw a placement hologram.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        cursor: Option<Vec2>,
        /// Previews building placement instead of soil.
        #[arg(long)]
        building_mode: bool,
        /// Building to preview; defaults to the last selection.
        #[arg(long)]
        building: Option<String>,
    },
}

/// Entry point for the Hexonia command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        CliCommand::Run { config, json } => run(&config, json),
        CliCommand::Render {
            config,
            out,
            cursor,
            building_mode,
            building,
        } => render(&config, out, cursor, building_mode, building.map(BuildingId::new)),
    }
}

fn run(path: &std::path::Path, json: bool) -> Result<()> {
    let scenario = config::load(path)?;
    let mut session = Session::new(&scenario);
    session.run(&scenario.actions)?;

    if json {
        let text =
            serde_json::to_string_pretty(session.events()).context("failed to encode events")?;
        println!("{text}");
    } else {
        for event in session.events() {
            println!("{}", describe(event));
        }
        print!("{}", ascii::render(session.world()));
    }
    Ok(())
}

fn render(
    path: &std::path::Path,
    out: PathBuf,
    cursor: Option<Vec2>,
    building_mode: bool,
    building: Option<BuildingId>,
) -> Result<()> {
    let scenario = config::load(path)?;
    let mut session = Session::new(&scenario);
    session.run(&scenario.actions)?;

    let preview = match cursor {
        Some(cursor) => session.preview(cursor, building.as_ref(), building_mode)?,
        None => None,
    };
    let scene = scene::capture(session.world(), preview.as_ref())?;
    let title = format!("hexonia: {}", path.display());

    SvgBackend::new(out).present(&Presentation::new(title, CLEAR_COLOR, scene))
}

fn parse_point(value: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, found `{value}`"))?;
    let parse = |component: &str| {
        component
            .trim()
            .parse::<f32>()
            .map_err(|error| format!("invalid coordinate `{component}`: {error}"))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}

fn describe(event: &Event) -> String {
    match event {
        Event::GridConfigured {
            columns,
            rows,
            active_cells,
        } => format!("grid {columns}x{rows} configured with {active_cells} active cells"),
        Event::SoilPlaced { center, footprint } => format!(
            "soil placed at ({}, {}) on {} cells",
            center.column(),
            center.row(),
            footprint.len()
        ),
        Event::BuildingPlaced {
            structure,
            building,
            center,
            footprint,
        } => format!(
            "{building} #{} built at ({}, {}) on {} cells",
            structure.get(),
            center.column(),
            center.row(),
            footprint.len()
        ),
        Event::PlacementRejected {
            mode,
            building,
            center,
            reason,
        } => format!(
            "{mode:?} of {building} at ({}, {}) rejected: {reason}",
            center.column(),
            center.row()
        ),
    }
}
