//! A simple player brain for headless runs: walk to the nearest consumable, keep away from ghosts.

use bevy_ecs::query::With;
use glam::IVec2;
use pathfinding::prelude::bfs;

use crate::constants::MapTile;
use crate::game::Game;
use crate::map::builder::{Maze, TraversalFlags};
use crate::map::direction::Direction;
use crate::map::pathfinding::walkable_neighbors;
use crate::systems::components::PlayerControlled;
use crate::systems::ghost::GhostMode;
use crate::systems::movement::TileStepper;

/// Tiles around a lethal ghost the autopilot refuses to path through.
const DANGER_RADIUS: i32 = 2;

/// The first step of a shortest path from `from` to the nearest pellet or power pellet.
///
/// Paths avoid every tile within [`DANGER_RADIUS`] of a tile in `threats`. Returns `None`
/// when nothing edible is reachable that way.
pub fn plan(maze: &Maze, from: IVec2, threats: &[IVec2]) -> Option<Direction> {
    let dangerous = |tile: IVec2| {
        threats
            .iter()
            .any(|threat| (tile - *threat).abs().max_element() <= DANGER_RADIUS)
    };
    let edible = |tile: &IVec2| matches!(maze.tile(*tile), Some(MapTile::Pellet | MapTile::PowerPellet));

    let path = bfs(
        &from,
        |tile| {
            walkable_neighbors(maze, *tile, TraversalFlags::empty())
                .into_iter()
                .map(|(_, next)| next)
                .filter(|next| !dangerous(*next))
                .collect::<Vec<_>>()
        },
        edible,
    )?;

    let next = *path.get(1)?;
    walkable_neighbors(maze, from, TraversalFlags::empty())
        .into_iter()
        .find(|(_, tile)| *tile == next)
        .map(|(dir, _)| dir)
}

/// Picks the player's next direction for the current state of `game`.
pub fn steer(game: &mut Game) -> Option<Direction> {
    let mut players = game.world.query_filtered::<&TileStepper, With<PlayerControlled>>();
    let mut ghosts = game.world.query::<(&GhostMode, &TileStepper)>();
    let world = &game.world;
    let maze = world.resource::<Maze>();

    let player = players.single(world).ok()?;
    let from = match player.direction {
        Some(dir) if !player.is_centered() => maze.neighbor(player.tile, dir)?,
        _ => player.tile,
    };
    let threats: Vec<IVec2> = ghosts
        .iter(world)
        .filter(|(mode, _)| mode.is_lethal() && !matches!(mode, GhostMode::InHouse))
        .map(|(_, stepper)| stepper.tile)
        .collect();

    plan(maze, from, &threats).or_else(|| plan(maze, from, &[]))
}
