//! Read-only view of a running game, for renderers and tests.

use glam::{IVec2, Vec2};

use crate::constants::MapTile;
use crate::map::direction::Direction;
use crate::systems::ghost::{Ghost, GhostMode};
use crate::systems::state::GameStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Ghost(Ghost),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorSnapshot {
    pub kind: ActorKind,
    /// Pixel-space position.
    pub position: Vec2,
    pub tile: IVec2,
    pub direction: Option<Direction>,
    pub facing: Direction,
    /// `None` for the player.
    pub mode: Option<GhostMode>,
    /// Frightened and about to recover.
    pub flashing: bool,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    /// Row-major.
    pub tiles: Vec<MapTile>,
    pub remaining: usize,
    /// The player first, then ghosts in release order.
    pub actors: Vec<ActorSnapshot>,
    pub score: u32,
    pub high_score: u32,
    pub lives: u8,
    pub level: u32,
    pub stage: GameStage,
}

impl Snapshot {
    pub fn tile(&self, tile: IVec2) -> Option<MapTile> {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width || tile.y >= self.height {
            return None;
        }
        self.tiles.get((tile.y * self.width + tile.x) as usize).copied()
    }

    pub fn player(&self) -> Option<&ActorSnapshot> {
        self.actors.iter().find(|actor| actor.kind == ActorKind::Player)
    }

    pub fn ghost(&self, ghost: Ghost) -> Option<&ActorSnapshot> {
        self.actors.iter().find(|actor| actor.kind == ActorKind::Ghost(ghost))
    }

    /// The board as text, one row per line, using the layout legend with actors drawn on top.
    pub fn render_text(&self) -> String {
        let mut rows: Vec<Vec<char>> = (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| match self.tile(IVec2::new(x, y)) {
                        Some(MapTile::Wall) => '#',
                        Some(MapTile::Pellet) => '.',
                        Some(MapTile::PowerPellet) => 'o',
                        Some(MapTile::Gate) => '=',
                        Some(MapTile::HouseFloor) => '-',
                        Some(MapTile::Empty) | None => ' ',
                    })
                    .collect()
            })
            .collect();

        for actor in self.actors.iter().rev() {
            let glyph = match actor.kind {
                ActorKind::Player => 'X',
                ActorKind::Ghost(_) if matches!(actor.mode, Some(GhostMode::Eyes | GhostMode::EyesWait { .. })) => '"',
                ActorKind::Ghost(_) if actor.mode.is_some_and(|mode| mode.is_frightened()) => '~',
                ActorKind::Ghost(ghost) => ['B', 'P', 'I', 'C'][ghost.index()],
            };
            if let Some(cell) = rows
                .get_mut(actor.tile.y as usize)
                .and_then(|row| row.get_mut(actor.tile.x as usize))
            {
                *cell = glyph;
            }
        }

        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
