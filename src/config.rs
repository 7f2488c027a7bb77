//! Simulation tuning and runner configuration.

use std::path::PathBuf;

use bevy_ecs::resource::Resource;
use figment::{providers::Env, Figment};
use serde::Deserialize;

use crate::constants::{score, speed, timing, CLYDE_SHY_DISTANCE, HIT_RADIUS_TILES, STARTING_LIVES};
use crate::error::{GameError, GameResult};
use crate::systems::state::{GlobalMode, SchedulePhase};

/// Every number and policy the round director and controllers consult.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Tuning {
    pub player_speed: f32,
    pub ghost_speed: f32,
    pub frightened_speed: f32,
    pub eyes_speed: f32,
    pub player_speed_per_level: f32,
    pub ghost_speed_per_level: f32,

    pub frightened_duration: f32,
    pub frightened_flash: f32,
    pub power_grace: f32,
    pub post_eat_grace: f32,
    pub recovery_grace: f32,
    pub revive_delay: f32,
    pub release_interval: f32,
    pub ready_duration: f32,
    pub dying_duration: f32,
    pub level_clear_duration: f32,

    pub pellet_score: u32,
    pub power_pellet_score: u32,
    pub ghost_chain: Vec<u32>,

    pub starting_lives: u8,
    /// Player-ghost contact distance, in tiles.
    pub hit_radius: f32,
    pub clyde_shy_distance: i32,

    pub schedule: Vec<SchedulePhase>,
    /// Freeze the scatter/chase countdown while any ghost is frightened.
    pub pause_schedule_while_frightened: bool,
    /// Turn scatter/chase ghosts around whenever the global mode flips.
    pub reverse_on_mode_change: bool,

    /// Seed for frightened wandering; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: speed::PLAYER,
            ghost_speed: speed::GHOST,
            frightened_speed: speed::FRIGHTENED,
            eyes_speed: speed::EYES,
            player_speed_per_level: speed::PLAYER_PER_LEVEL,
            ghost_speed_per_level: speed::GHOST_PER_LEVEL,
            frightened_duration: timing::FRIGHTENED,
            frightened_flash: timing::FRIGHTENED_FLASH,
            power_grace: timing::POWER_GRACE,
            post_eat_grace: timing::POST_EAT_GRACE,
            recovery_grace: timing::RECOVERY_GRACE,
            revive_delay: timing::REVIVE_DELAY,
            release_interval: timing::RELEASE_INTERVAL,
            ready_duration: timing::READY,
            dying_duration: timing::DYING,
            level_clear_duration: timing::LEVEL_CLEAR,
            pellet_score: score::PELLET,
            power_pellet_score: score::POWER_PELLET,
            ghost_chain: score::GHOST_CHAIN.to_vec(),
            starting_lives: STARTING_LIVES,
            hit_radius: HIT_RADIUS_TILES,
            clyde_shy_distance: CLYDE_SHY_DISTANCE,
            schedule: default_schedule(),
            pause_schedule_while_frightened: true,
            reverse_on_mode_change: true,
            seed: None,
        }
    }
}

impl Tuning {
    /// Player speed for a level, in tiles per second.
    pub fn player_speed_at(&self, level: u32) -> f32 {
        self.player_speed + level.saturating_sub(1) as f32 * self.player_speed_per_level
    }

    /// Ghost speed for a level, in tiles per second.
    pub fn ghost_speed_at(&self, level: u32) -> f32 {
        self.ghost_speed + level.saturating_sub(1) as f32 * self.ghost_speed_per_level
    }

    /// Rejects tunings the round director cannot run with.
    pub fn validate(&self) -> GameResult<()> {
        let speeds = [
            self.player_speed,
            self.ghost_speed,
            self.frightened_speed,
            self.eyes_speed,
        ];
        if speeds.iter().any(|speed| !speed.is_finite() || *speed <= 0.0) {
            return Err(GameError::Config(format!("speeds must be positive, got {speeds:?}")));
        }
        if self.ghost_chain.is_empty() {
            return Err(GameError::Config("ghost chain scores are empty".into()));
        }
        if self.schedule.is_empty() {
            return Err(GameError::Config("scatter/chase schedule is empty".into()));
        }
        if self.starting_lives == 0 {
            return Err(GameError::Config("starting lives must be at least one".into()));
        }
        Ok(())
    }

    /// Points for the `index`th ghost eaten in a chain; the last entry repeats.
    pub fn chain_score(&self, index: usize) -> u32 {
        self.ghost_chain
            .get(index.min(self.ghost_chain.len().saturating_sub(1)))
            .copied()
            .unwrap_or(0)
    }
}

/// Scatter 7, chase 20, scatter 7, chase 20, scatter 5, chase 20, scatter 5, chase forever.
pub fn default_schedule() -> Vec<SchedulePhase> {
    use GlobalMode::{Chase, Scatter};
    [
        (Scatter, Some(7.0)),
        (Chase, Some(20.0)),
        (Scatter, Some(7.0)),
        (Chase, Some(20.0)),
        (Scatter, Some(5.0)),
        (Chase, Some(20.0)),
        (Scatter, Some(5.0)),
        (Chase, None),
    ]
    .into_iter()
    .map(|(mode, seconds)| SchedulePhase { mode, seconds })
    .collect()
}

/// Runner configuration, loaded from `MAZECHASE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Maze file to load instead of the bundled board.
    #[serde(default)]
    pub maze_path: Option<PathBuf>,
    /// Where the best score is kept.
    #[serde(default = "default_score_file")]
    pub score_file: PathBuf,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Simulated seconds the headless runner plays for.
    #[serde(default = "default_demo_seconds")]
    pub demo_seconds: f32,
    #[serde(default = "default_true")]
    pub pause_schedule_while_frightened: bool,
    #[serde(default = "default_true")]
    pub reverse_on_mode_change: bool,
}

impl RunConfig {
    pub fn load() -> GameResult<Self> {
        Self::from_figment(Figment::new().merge(Env::prefixed("MAZECHASE_")))
    }

    pub fn from_figment(figment: Figment) -> GameResult<Self> {
        figment.extract().map_err(|e| GameError::Config(e.to_string()))
    }

    /// Default tuning with this configuration's policies and seed applied.
    pub fn tuning(&self) -> Tuning {
        Tuning {
            seed: self.seed,
            pause_schedule_while_frightened: self.pause_schedule_while_frightened,
            reverse_on_mode_change: self.reverse_on_mode_change,
            ..Tuning::default()
        }
    }
}

fn default_score_file() -> PathBuf {
    PathBuf::from("mazechase.score")
}

fn default_demo_seconds() -> f32 {
    120.0
}

fn default_true() -> bool {
    true
}
