//! Maze parsing functionality for converting raw board layouts into structured data.

use crate::constants::MapTile;
use crate::error::ParseError;
use glam::IVec2;

/// Ghost spawn markers, in release order (Blinky, Pinky, Inky, Clyde).
pub const GHOST_MARKERS: [char; 4] = ['B', 'P', 'I', 'C'];
/// Player spawn marker.
pub const PLAYER_MARKER: char = 'X';
/// Tunnel mouth marker.
pub const TUNNEL_MARKER: char = 'T';

/// Represents the parsed data from a raw board layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMap {
    pub width: i32,
    pub height: i32,
    /// Row-major tile layout.
    pub tiles: Vec<MapTile>,
    /// The row that wraps horizontally, if the board has tunnel mouths.
    pub tunnel_row: Option<i32>,
    /// The positions of the house gate tiles, left to right, top to bottom.
    pub gate: Vec<IVec2>,
    pub player_spawn: IVec2,
    /// Ghost spawn tiles, indexed like [`GHOST_MARKERS`].
    pub ghost_spawns: [IVec2; 4],
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a map tile.
    ///
    /// Spawn and tunnel markers parse to the floor they stand on.
    pub fn parse_character(c: char) -> Option<MapTile> {
        match c {
            '#' => Some(MapTile::Wall),
            '.' => Some(MapTile::Pellet),
            'o' => Some(MapTile::PowerPellet),
            ' ' | TUNNEL_MARKER | PLAYER_MARKER => Some(MapTile::Empty),
            '=' => Some(MapTile::Gate),
            '-' => Some(MapTile::HouseFloor),
            c if GHOST_MARKERS.contains(&c) => Some(MapTile::HouseFloor),
            _ => None,
        }
    }

    /// Parses newline-separated board text. Trailing blank lines are ignored.
    pub fn parse_str(text: &str) -> Result<ParsedMap, ParseError> {
        let mut lines: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        Self::parse_board(&lines)
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty or not rectangular, contains unknown
    /// characters, lacks (or repeats) a spawn marker, or has tunnel markers that are
    /// not on both edges of exactly one row.
    pub fn parse_board<S: AsRef<str>>(raw_board: &[S]) -> Result<ParsedMap, ParseError> {
        let width = raw_board.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(ParseError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * raw_board.len());
        let mut gate = Vec::new();
        let mut tunnels = Vec::new();
        let mut player_spawn: Option<IVec2> = None;
        let mut ghost_spawns: [Option<IVec2>; 4] = [None; 4];

        for (y, line) in raw_board.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::NonRectangular {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character).ok_or(ParseError::UnknownCharacter {
                    character,
                    col: x,
                    row: y,
                })?;
                let position = IVec2::new(x as i32, y as i32);

                // Track special positions
                match character {
                    '=' => gate.push(position),
                    TUNNEL_MARKER => tunnels.push(position),
                    PLAYER_MARKER => {
                        if player_spawn.replace(position).is_some() {
                            return Err(ParseError::DuplicateSpawn(character));
                        }
                    }
                    c => {
                        if let Some(index) = GHOST_MARKERS.iter().position(|&m| m == c) {
                            if ghost_spawns[index].replace(position).is_some() {
                                return Err(ParseError::DuplicateSpawn(character));
                            }
                        }
                    }
                }

                tiles.push(tile);
            }
        }

        let player_spawn = player_spawn.ok_or(ParseError::MissingSpawn(PLAYER_MARKER))?;
        let mut spawns = [IVec2::ZERO; 4];
        for (index, spawn) in ghost_spawns.iter().enumerate() {
            spawns[index] = spawn.ok_or(ParseError::MissingSpawn(GHOST_MARKERS[index]))?;
        }

        let tunnel_row = Self::validate_tunnels(&tunnels, width as i32)?;

        Ok(ParsedMap {
            width: width as i32,
            height: raw_board.len() as i32,
            tiles,
            tunnel_row,
            gate,
            player_spawn,
            ghost_spawns: spawns,
        })
    }

    /// Tunnel mouths must come as a pair on the two edges of a single row.
    fn validate_tunnels(tunnels: &[IVec2], width: i32) -> Result<Option<i32>, ParseError> {
        match tunnels {
            [] => Ok(None),
            [a, b] if a.y == b.y && a.x == 0 && b.x == width - 1 => Ok(Some(a.y)),
            [_, _] => Err(ParseError::MisplacedTunnel(format!(
                "expected mouths at columns 0 and {} of one row",
                width - 1
            ))),
            _ => Err(ParseError::MisplacedTunnel(format!("found {} markers, expected 2", tunnels.len()))),
        }
    }
}
