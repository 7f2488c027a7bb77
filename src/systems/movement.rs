use bevy_ecs::component::Component;
use glam::{IVec2, Vec2};

use crate::constants::TILE_SIZE;
use crate::map::builder::{Maze, TraversalFlags};
use crate::map::direction::Direction;

/// What a steering callback wants done at a tile center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    /// Carry on with the current direction and buffer.
    Keep,
    /// Turn this way if the tile is walkable.
    Turn(Direction),
    /// Halt on this center.
    Stop,
}

/// Tile-to-tile motion shared by the player and every ghost.
///
/// An entity is either resting exactly on `tile`'s center (`progress == 0`) or in transit
/// from `tile` toward its neighbour in `direction`, `progress` pixels along the way.
/// Turns only commit at centers.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct TileStepper {
    /// The last tile center reached.
    pub tile: IVec2,
    pub direction: Option<Direction>,
    /// Desired turn, committed at the next center where it is walkable.
    pub buffered: Option<Direction>,
    /// The last committed direction, kept while stopped.
    pub facing: Direction,
    /// Pixels travelled from `tile`'s center toward the next tile.
    pub progress: f32,
    /// Tiles per second.
    pub speed: f32,
}

impl TileStepper {
    pub fn new(tile: IVec2, speed: f32) -> Self {
        Self {
            tile,
            direction: None,
            buffered: None,
            facing: Direction::Left,
            progress: 0.0,
            speed,
        }
    }

    /// Puts the entity back on a tile center, stopped.
    pub fn place(&mut self, tile: IVec2) {
        self.tile = tile;
        self.direction = None;
        self.buffered = None;
        self.progress = 0.0;
    }

    pub fn is_centered(&self) -> bool {
        self.progress == 0.0
    }

    pub fn set_buffered(&mut self, direction: Direction) {
        self.buffered = Some(direction);
    }

    /// The continuous position, for collision checks and rendering.
    pub fn position(&self, maze: &Maze) -> Vec2 {
        let offset = self
            .direction
            .map(|dir| dir.as_ivec2().as_vec2() * self.progress)
            .unwrap_or(Vec2::ZERO);
        maze.tile_center(self.tile) + offset
    }

    /// Turns around on the spot, mid-transit included.
    ///
    /// Mid-transit the entity swaps to the tile it was approaching so that it heads
    /// back toward the center it just left.
    pub fn reverse(&mut self, maze: &Maze) {
        let Some(dir) = self.direction else {
            return;
        };
        if self.is_centered() {
            let back = dir.opposite();
            if maze.neighbor(self.tile, back).is_some() {
                self.direction = Some(back);
                self.facing = back;
            }
            return;
        }
        if let Some(ahead) = maze.neighbor(self.tile, dir) {
            self.tile = ahead;
            self.progress = TILE_SIZE - self.progress;
            self.direction = Some(dir.opposite());
            self.facing = dir.opposite();
        }
    }

    /// Advances the entity, committing any buffered turn at tile centers.
    pub fn tick(&mut self, maze: &Maze, dt: f32, flags: TraversalFlags) -> Vec2 {
        self.tick_with(maze, dt, flags, |_| Steering::Keep)
    }

    /// Advances the entity, asking `steer` for a direction at every tile center reached.
    ///
    /// Movement is stepped one tile at a time so that walkability is re-checked at every
    /// center, however large `dt` is.
    pub fn tick_with<F>(&mut self, maze: &Maze, dt: f32, flags: TraversalFlags, mut steer: F) -> Vec2
    where
        F: FnMut(&TileStepper) -> Steering,
    {
        if self.direction.is_none() && self.progress != 0.0 {
            debug_assert!(false, "stepper at {:?} is off-center without a direction", self.tile);
            self.progress = 0.0;
        }

        let mut budget = (self.speed * TILE_SIZE * dt).max(0.0);
        loop {
            if self.is_centered() {
                match steer(self) {
                    Steering::Keep => {}
                    Steering::Turn(choice) => self.buffered = Some(choice),
                    Steering::Stop => {
                        self.direction = None;
                        self.buffered = None;
                        break;
                    }
                }
                self.commit_buffered(maze, flags);

                let Some(dir) = self.direction else {
                    break;
                };
                let ahead_open = maze.neighbor(self.tile, dir).is_some_and(|ahead| maze.is_walkable(ahead, flags));
                if !ahead_open {
                    self.direction = None;
                    break;
                }
            }

            let Some(dir) = self.direction else {
                break;
            };
            if budget <= 0.0 {
                break;
            }

            let to_center = TILE_SIZE - self.progress;
            if budget < to_center {
                self.progress += budget;
                if self.progress < TILE_SIZE {
                    break;
                }
                // Rounded onto the next center
                budget = 0.0;
            } else {
                budget -= to_center;
            }

            match maze.neighbor(self.tile, dir) {
                Some(next) => {
                    self.tile = next;
                    self.progress = 0.0;
                }
                None => {
                    self.progress = 0.0;
                    self.direction = None;
                    break;
                }
            }
        }

        self.position(maze)
    }

    fn commit_buffered(&mut self, maze: &Maze, flags: TraversalFlags) {
        let Some(wanted) = self.buffered else {
            return;
        };
        if maze.neighbor(self.tile, wanted).is_some_and(|next| maze.is_walkable(next, flags)) {
            self.direction = Some(wanted);
            self.facing = wanted;
            self.buffered = None;
        }
    }
}
