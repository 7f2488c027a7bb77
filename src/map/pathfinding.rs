//! Breadth-first first-step search over walkable tiles.

use glam::IVec2;
use pathfinding::prelude::{bfs, bfs_reach};
use smallvec::SmallVec;
use tracing::trace;

use crate::map::builder::{Maze, TraversalFlags};
use crate::map::direction::Direction;

/// Walkable neighbours of `tile`, in canonical direction order, tunnel edge included.
pub fn walkable_neighbors(maze: &Maze, tile: IVec2, flags: TraversalFlags) -> SmallVec<[(Direction, IVec2); 4]> {
    Direction::DIRECTIONS
        .into_iter()
        .filter_map(|dir| maze.neighbor(tile, dir).map(|next| (dir, next)))
        .filter(|(_, next)| maze.is_walkable(*next, flags))
        .collect()
}

/// Returns the first direction to take from `start` toward `goal`.
///
/// Neighbours are explored up, left, down, right, so ties between equally short paths
/// resolve the same way every time. An unreachable goal is replaced by the visited tile
/// closest to it (squared Euclidean, earliest visited on ties). `forbidden` is skipped at
/// the start tile unless it is the only way out. Returns `None` when already at the goal
/// or when there is nowhere to go.
pub fn next_step(
    maze: &Maze,
    start: IVec2,
    goal: IVec2,
    flags: TraversalFlags,
    forbidden: Option<Direction>,
) -> Option<Direction> {
    if start == goal {
        return None;
    }

    let successors = |tile: &IVec2| -> SmallVec<[IVec2; 4]> {
        let options = walkable_neighbors(maze, *tile, flags);
        if *tile == start && options.len() > 1 {
            options
                .into_iter()
                .filter(|(dir, _)| Some(*dir) != forbidden)
                .map(|(_, next)| next)
                .collect()
        } else {
            options.into_iter().map(|(_, next)| next).collect()
        }
    };

    let path = match bfs(&start, successors, |tile| *tile == goal) {
        Some(path) => path,
        None => {
            let closest = bfs_reach(start, successors).min_by_key(|tile| (*tile - goal).length_squared())?;
            trace!(?start, ?goal, ?closest, "Goal unreachable, heading for closest tile");
            if closest == start {
                return None;
            }
            bfs(&start, successors, |tile| *tile == closest)?
        }
    };

    let second = *path.get(1)?;
    Direction::DIRECTIONS
        .into_iter()
        .find(|&dir| maze.neighbor(start, dir) == Some(second))
}
