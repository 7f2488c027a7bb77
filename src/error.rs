//! Centralized error types for the maze-chase engine.
//!
//! Everything that can fail at load time funnels into [`GameError`]. In-round
//! conditions (life loss, game over, level clear) are state transitions, not errors.

use std::io;

use bevy_ecs::event::Event;

/// Main error type for the engine.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for maze parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Maze definition is empty")]
    Empty,

    #[error("Row {row} has {found} columns, expected {expected}")]
    NonRectangular { row: usize, expected: usize, found: usize },

    #[error("Unknown character {character:?} at column {col}, row {row}")]
    UnknownCharacter { character: char, col: usize, row: usize },

    #[error("Missing spawn marker {0:?}")]
    MissingSpawn(char),

    #[error("Spawn marker {0:?} appears more than once")]
    DuplicateSpawn(char),

    #[error("Tunnel markers must sit on both edges of a single row: {0}")]
    MisplacedTunnel(String),
}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
