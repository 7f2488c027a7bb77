//! Maze-chase engine library crate.

pub mod autopilot;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod highscore;
pub mod logging;
pub mod map;
pub mod snapshot;
pub mod systems;
