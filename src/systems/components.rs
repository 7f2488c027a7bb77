use bevy_ecs::{component::Component, resource::Resource};
use glam::IVec2;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Marks the player entity and remembers the last tile it was credited for entering.
#[derive(Default, Component, Debug)]
pub struct PlayerControlled {
    pub last_tile: Option<IVec2>,
}

#[derive(Resource, Default)]
pub struct GlobalState {
    pub exit: bool,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResource(pub u32);

/// Best score seen, seeded from the score store at startup.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HighScore(pub u32);

/// The current level number, starting at 1.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level(pub u32);

impl Default for Level {
    fn default() -> Self {
        Self(1)
    }
}

/// Seconds advanced by the current schedule run.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DeltaTime(pub f32);

/// Ghosts eaten since the last power pellet.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChainCounter(pub usize);

/// Windows during which a player-ghost contact can never be fatal.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct GraceTimers {
    /// Started by a power pellet.
    pub power: f32,
    /// Started by eating a ghost.
    pub post_eat: f32,
}

impl GraceTimers {
    pub fn tick(&mut self, dt: f32) {
        self.power = (self.power - dt).max(0.0);
        self.post_eat = (self.post_eat - dt).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.power > 0.0 || self.post_eat > 0.0
    }
}

/// Randomness for frightened wandering.
#[derive(Resource, Debug)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self(SmallRng::seed_from_u64(seed))
    }
}
