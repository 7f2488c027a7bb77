//! Maze construction and tile queries.

use crate::constants::{MapTile, BOARD_ORIGIN, RAW_BOARD, TILE_SIZE};
use crate::error::GameResult;
use crate::map::direction::Direction;
use crate::map::parser::{MapTileParser, ParsedMap};
use bevy_ecs::resource::Resource;
use bitflags::bitflags;
use glam::{IVec2, Vec2};
use tracing::debug;

bitflags! {
    /// Permissions an entity moves under.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TraversalFlags: u8 {
        /// Returning to the house after being eaten. Implies gate access.
        const EYES = 1 << 0;
        /// May cross the house gate.
        const GATE = 1 << 1;
    }
}

impl TraversalFlags {
    pub fn allows_gate(self) -> bool {
        self.intersects(TraversalFlags::EYES | TraversalFlags::GATE)
    }
}

/// Something the player can eat off the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumable {
    Pellet,
    PowerPellet,
}

impl Consumable {
    pub fn score_value(self, pellet: u32, power: u32) -> u32 {
        match self {
            Consumable::Pellet => pellet,
            Consumable::PowerPellet => power,
        }
    }
}

/// The maze: immutable walls plus a mutable set of consumables.
#[derive(Resource, Debug, Clone)]
pub struct Maze {
    width: i32,
    height: i32,
    tiles: Vec<MapTile>,
    /// Layout as loaded, used to restore consumables for a new level.
    pristine: Vec<MapTile>,
    tunnel_row: Option<i32>,
    gate: Vec<IVec2>,
    player_spawn: IVec2,
    ghost_spawns: [IVec2; 4],
    remaining: usize,
}

impl Maze {
    /// Builds the bundled default maze.
    pub fn default_board() -> GameResult<Maze> {
        Ok(Self::from_parsed(MapTileParser::parse_board(&RAW_BOARD)?))
    }

    /// Builds a maze from newline-separated board text.
    pub fn from_text(text: &str) -> GameResult<Maze> {
        Ok(Self::from_parsed(MapTileParser::parse_str(text)?))
    }

    pub fn from_parsed(parsed: ParsedMap) -> Maze {
        let remaining = count_consumables(&parsed.tiles);
        debug!(
            width = parsed.width,
            height = parsed.height,
            remaining,
            tunnel_row = ?parsed.tunnel_row,
            "Maze built"
        );
        Maze {
            width: parsed.width,
            height: parsed.height,
            pristine: parsed.tiles.clone(),
            tiles: parsed.tiles,
            tunnel_row: parsed.tunnel_row,
            gate: parsed.gate,
            player_spawn: parsed.player_spawn,
            ghost_spawns: parsed.ghost_spawns,
            remaining,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tunnel_row(&self) -> Option<i32> {
        self.tunnel_row
    }

    pub fn player_spawn(&self) -> IVec2 {
        self.player_spawn
    }

    /// Ghost spawn tiles in release order (Blinky, Pinky, Inky, Clyde).
    pub fn ghost_spawns(&self) -> [IVec2; 4] {
        self.ghost_spawns
    }

    pub fn in_bounds(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    /// Resolves a tile coordinate, wrapping columns on the tunnel row.
    ///
    /// Any column at or beyond either edge of the tunnel row resolves to the opposite
    /// edge column. Other out-of-bounds tiles resolve to `None`.
    pub fn wrap(&self, tile: IVec2) -> Option<IVec2> {
        if self.in_bounds(tile) {
            return Some(tile);
        }
        if Some(tile.y) == self.tunnel_row {
            if tile.x < 0 {
                return Some(IVec2::new(self.width - 1, tile.y));
            }
            if tile.x >= self.width {
                return Some(IVec2::new(0, tile.y));
            }
        }
        None
    }

    /// The tile one step from `tile` in `dir`, with tunnel wrap applied.
    pub fn neighbor(&self, tile: IVec2, dir: Direction) -> Option<IVec2> {
        self.wrap(tile + dir.as_ivec2())
    }

    /// Returns the tile at the given coordinate, or `None` outside the board.
    pub fn tile(&self, tile: IVec2) -> Option<MapTile> {
        self.index(tile).map(|i| self.tiles[i])
    }

    /// Row-major view over the current tiles.
    pub fn tiles(&self) -> &[MapTile] {
        &self.tiles
    }

    /// True iff the tile can be stood on under the given permissions.
    pub fn is_walkable(&self, tile: IVec2, flags: TraversalFlags) -> bool {
        let Some(tile) = self.wrap(tile) else {
            return false;
        };
        match self.tile(tile) {
            None | Some(MapTile::Wall) => false,
            Some(MapTile::Gate) => flags.allows_gate(),
            Some(_) => true,
        }
    }

    /// Clears a consumable from the tile and reports which kind it was.
    pub fn eat_at(&mut self, tile: IVec2) -> Option<Consumable> {
        let index = self.index(tile)?;
        let eaten = match self.tiles[index] {
            MapTile::Pellet => Consumable::Pellet,
            MapTile::PowerPellet => Consumable::PowerPellet,
            _ => return None,
        };
        self.tiles[index] = MapTile::Empty;
        self.remaining -= 1;
        Some(eaten)
    }

    pub fn remaining_consumables(&self) -> usize {
        self.remaining
    }

    /// Puts every pellet and power pellet back where the layout had it.
    pub fn restore_consumables(&mut self) {
        self.tiles.clone_from(&self.pristine);
        self.remaining = count_consumables(&self.tiles);
        debug!(remaining = self.remaining, "Consumables restored");
    }

    /// The row holding the house gate, if the board has one.
    pub fn gate_row(&self) -> Option<i32> {
        self.gate.first().map(|tile| tile.y)
    }

    /// The tile just above the middle of the gate, where leaving ghosts head.
    pub fn gate_exit(&self) -> Option<IVec2> {
        let middle = self.gate.get(self.gate.len() / 2)?;
        Some(IVec2::new(middle.x, middle.y - 1))
    }

    /// The pixel-space center of a tile.
    pub fn tile_center(&self, tile: IVec2) -> Vec2 {
        BOARD_ORIGIN + tile.as_vec2() * TILE_SIZE + Vec2::splat(TILE_SIZE / 2.0)
    }

    /// The tile containing a pixel-space point.
    pub fn tile_at(&self, position: Vec2) -> IVec2 {
        ((position - BOARD_ORIGIN) / TILE_SIZE).floor().as_ivec2()
    }

    fn index(&self, tile: IVec2) -> Option<usize> {
        self.in_bounds(tile).then(|| (tile.y * self.width + tile.x) as usize)
    }
}

fn count_consumables(tiles: &[MapTile]) -> usize {
    tiles
        .iter()
        .filter(|tile| matches!(tile, MapTile::Pellet | MapTile::PowerPellet))
        .count()
}
