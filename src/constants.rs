//! This module contains all the constants used by the engine.

use std::time::Duration;

use glam::{UVec2, Vec2};

/// One simulation frame at 60 Hz.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Largest slice of time a single schedule run may advance, in seconds.
pub const MAX_SUBSTEP: f32 = 1.0 / 60.0;
/// Longest span a single `tick` call will simulate, in seconds.
pub const MAX_TICK: f32 = 10.0;

/// The size of each cell, in pixels.
pub const CELL_SIZE: u32 = 8;
/// The size of the default game board, in cells.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(28, 31);

/// The offset of the game board from the top-left corner of the canvas, in cells.
pub const BOARD_CELL_OFFSET: UVec2 = UVec2::new(0, 3);
/// The offset of the game board from the top-left corner of the canvas, in pixels.
pub const BOARD_PIXEL_OFFSET: UVec2 = UVec2::new(BOARD_CELL_OFFSET.x * CELL_SIZE, BOARD_CELL_OFFSET.y * CELL_SIZE);

/// Tile size as a float, for continuous-space math.
pub const TILE_SIZE: f32 = CELL_SIZE as f32;
/// Board origin as a float vector.
pub const BOARD_ORIGIN: Vec2 = Vec2::new(BOARD_PIXEL_OFFSET.x as f32, BOARD_PIXEL_OFFSET.y as f32);

/// Movement speeds, in tiles per second.
pub mod speed {
    pub const PLAYER: f32 = 7.0;
    pub const GHOST: f32 = 6.5;
    pub const FRIGHTENED: f32 = 4.0;
    pub const EYES: f32 = 10.0;
    /// Added to the player speed for each level past the first.
    pub const PLAYER_PER_LEVEL: f32 = 0.25;
    /// Added to the ghost speed for each level past the first.
    pub const GHOST_PER_LEVEL: f32 = 0.2;
}

/// Countdowns, in seconds.
pub mod timing {
    pub const FRIGHTENED: f32 = 6.0;
    /// Frightened ghosts flash during the final stretch of their timer.
    pub const FRIGHTENED_FLASH: f32 = 2.0;
    /// Collisions are never fatal this soon after a power pellet.
    pub const POWER_GRACE: f32 = 0.30;
    /// Collisions are never fatal this soon after eating a ghost.
    pub const POST_EAT_GRACE: f32 = 0.25;
    /// A ghost leaving frightened mode stays harmless for this long.
    pub const RECOVERY_GRACE: f32 = 0.30;
    /// Time eyes spend in the house before the ghost is re-queued.
    pub const REVIVE_DELAY: f32 = 2.0;
    pub const RELEASE_INTERVAL: f32 = 1.0;
    pub const READY: f32 = 1.6;
    pub const DYING: f32 = 1.2;
    pub const LEVEL_CLEAR: f32 = 1.6;
}

/// Points awarded.
pub mod score {
    pub const PELLET: u32 = 10;
    pub const POWER_PELLET: u32 = 50;
    /// Chain values for ghosts eaten within one frightened window; the last entry repeats.
    pub const GHOST_CHAIN: [u32; 4] = [200, 400, 800, 1600];
}

pub const STARTING_LIVES: u8 = 3;

/// Player-ghost contact distance, in tiles.
pub const HIT_RADIUS_TILES: f32 = 0.6;

/// Clyde retreats to its corner when within this many tiles of the player.
pub const CLYDE_SHY_DISTANCE: i32 = 8;

/// An enum representing the different types of tiles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTile {
    /// Open floor with nothing on it.
    Empty,
    /// A wall tile.
    Wall,
    /// A regular pellet.
    Pellet,
    /// A power pellet.
    PowerPellet,
    /// The ghost house door, passable only while leaving or returning as eyes.
    Gate,
    /// Open floor inside the ghost house.
    HouseFloor,
}

/// The raw layout of the default game board.
///
/// Legend: `#` wall, `.` pellet, `o` power pellet, ` ` open, `T` tunnel mouth,
/// `=` house gate, `-` house floor, `X` player spawn, `B`/`P`/`I`/`C` ghost spawns.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###==### ##.#     ",
    "######.## #------# ##.######",
    "T     .   #-BPIC-#   .     T",
    "######.## #------# ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......X .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
