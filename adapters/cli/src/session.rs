//! Drives the builder and the world through a scripted scenario.

use anyhow::Result;
use glam::Vec2;
use hexonia_core::{BuildingId, Command, Event, PlacementMode};
use hexonia_system_builder::{Builder, BuilderInput, PlacementPreview};
use hexonia_world::{self as world, query, World};

use crate::config::{Action, Scenario, Target};

/// Owns the world, the builder and every event the world emitted so far.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    builder: Builder,
    events: Vec<Event>,
}

impl Session {
    /// Configures a fresh world from the scenario's blueprint.
    pub(crate) fn new(scenario: &Scenario) -> Self {
        let mut session = Self {
            world: World::new(),
            builder: Builder::new(scenario.catalog.clone()),
            events: Vec::new(),
        };
        world::apply(
            &mut session.world,
            Command::ConfigureGrid {
                blueprint: scenario.blueprint.clone(),
            },
            &mut session.events,
        );
        session
    }

    /// Performs every scripted action in order.
    pub(crate) fn run(&mut self, actions: &[Action]) -> Result<()> {
        for action in actions {
            self.perform(action)?;
        }
        Ok(())
    }

    /// Points the cursor at the action's target and presses the matching button.
    pub(crate) fn perform(&mut self, action: &Action) -> Result<()> {
        if let Some(id) = &action.building {
            self.builder.select(id)?;
        }

        let cursor = match action.target {
            Target::Cell(coord) => query::grid_to_world(&self.world, coord),
            Target::World(point) => point,
        };
        let input = BuilderInput {
            place_soil: action.mode == PlacementMode::PlaceSoil,
            place_building: action.mode == PlacementMode::PlaceBuilding,
            cursor_world: Some(cursor),
            ..BuilderInput::default()
        };

        let mut commands = Vec::new();
        let preview = self.frame(input, &mut commands);

        if commands.is_empty() {
            if let Some(preview) = preview {
                let reason = query::validate_placement(
                    &self.world,
                    preview.center,
                    preview.building.radius(),
                    action.mode,
                )
                .err()
                .map_or_else(|| "unknown".to_owned(), |reason| reason.to_string());
                log::warn!(
                    "skipped {:?} of {} at {:?}: {reason}",
                    action.mode,
                    preview.building.id(),
                    preview.center
                );
            } else {
                log::warn!("skipped {:?}: cursor {cursor} is not over the grid", action.mode);
            }
        }

        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }
        Ok(())
    }

    /// Previews the selected building under `cursor` without placing anything.
    pub(crate) fn preview(
        &mut self,
        cursor: Vec2,
        building: Option<&BuildingId>,
        building_mode: bool,
    ) -> Result<Option<PlacementPreview>> {
        if let Some(id) = building {
            self.builder.select(id)?;
        }

        let input = BuilderInput {
            building_modifier: building_mode,
            cursor_world: Some(cursor),
            ..BuilderInput::default()
        };
        let mut commands = Vec::new();
        Ok(self.frame(input, &mut commands))
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn events(&self) -> &[Event] {
        &self.events
    }

    fn frame(&mut self, input: BuilderInput, commands: &mut Vec<Command>) -> Option<PlacementPreview> {
        let layout = query::layout(&self.world);
        let world = &self.world;
        self.builder.handle(
            input,
            &layout,
            |center, radius, mode| query::validate_placement(world, center, radius, mode).is_ok(),
            commands,
        )
    }
}
