use bevy_ecs::prelude::*;

use crate::map::builder::Consumable;
use crate::map::direction::Direction;

/// Intents delivered from outside the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Exit,
    MovePlayer(Direction),
    /// Leave the attract screen, skip the ready delay, or restart after game over.
    Start,
    TogglePause,
    /// Throw the session away and start again from level one.
    Restart,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
    /// The player entered a tile holding a consumable.
    ItemEaten(Consumable),
    GhostEaten { ghost: Entity, points: u32 },
    PlayerDied,
    LevelCleared,
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}
