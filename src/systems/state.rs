use std::collections::VecDeque;
use std::mem::discriminant;

use bevy_ecs::{
    event::EventWriter,
    observer::Trigger,
    query::Without,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
    world::World,
};
use strum_macros::AsRefStr;
use tracing::{debug, info};

use crate::config::Tuning;
use crate::events::{GameCommand, GameEvent};
use crate::map::builder::Maze;
use crate::map::direction::Direction;
use crate::systems::components::{
    ChainCounter, DeltaTime, GlobalState, GraceTimers, HighScore, Level, PlayerControlled, ScoreResource,
};
use crate::systems::ghost::{Ghost, GhostMode, HousePhase, Recovery};
use crate::systems::movement::TileStepper;

/// A resource to track the overall stage of the game from a high-level perspective.
#[derive(Resource, Debug, Default, PartialEq, Clone, Copy, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum GameStage {
    /// Waiting for the first start command.
    #[default]
    Attract,
    /// Actors placed, counting down to play.
    Ready { remaining: f32 },
    /// The main gameplay loop is active.
    Playing,
    Paused,
    /// The player was caught; actors reset when the countdown ends.
    Dying { remaining: f32 },
    /// Every consumable eaten; the next level loads when the countdown ends.
    LevelClear { remaining: f32 },
    /// No lives left.
    GameOver,
}

impl GameStage {
    pub fn is_playing(&self) -> bool {
        matches!(self, GameStage::Playing)
    }
}

/// A resource to store the number of player lives.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLives(pub u8);

impl Default for PlayerLives {
    fn default() -> Self {
        Self(crate::constants::STARTING_LIVES)
    }
}

/// The mode every active ghost follows outside of frightened time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum GlobalMode {
    Scatter,
    Chase,
}

/// One entry of the scatter/chase schedule; `None` lasts forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulePhase {
    pub mode: GlobalMode,
    pub seconds: Option<f32>,
}

/// The scatter/chase timetable and where the round currently is in it.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ModeSchedule {
    phases: Vec<SchedulePhase>,
    index: usize,
    remaining: Option<f32>,
}

impl ModeSchedule {
    pub fn new(phases: Vec<SchedulePhase>) -> Self {
        let remaining = phases.first().and_then(|phase| phase.seconds);
        Self {
            phases,
            index: 0,
            remaining,
        }
    }

    pub fn mode(&self) -> GlobalMode {
        self.phases.get(self.index).map_or(GlobalMode::Scatter, |phase| phase.mode)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Seconds left in the current phase; `None` once the schedule holds forever.
    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    /// Counts the current phase down, returning the new mode when it flips.
    pub fn tick(&mut self, dt: f32) -> Option<GlobalMode> {
        let remaining = self.remaining.as_mut()?;
        *remaining = (*remaining - dt).max(0.0);
        if *remaining > 0.0 {
            return None;
        }

        let previous = self.mode();
        if self.index + 1 >= self.phases.len() {
            self.remaining = None;
            return None;
        }
        self.index += 1;
        self.remaining = self.phases[self.index].seconds;

        let mode = self.mode();
        (mode != previous).then_some(mode)
    }
}

impl Default for ModeSchedule {
    fn default() -> Self {
        Self::new(crate::config::default_schedule())
    }
}

/// Ghosts waiting in the house, in the order they will be let out.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ReleaseQueue {
    pub waiting: VecDeque<Ghost>,
    /// Seconds until the next release is allowed.
    pub cooldown: f32,
}

impl Default for ReleaseQueue {
    fn default() -> Self {
        Self {
            waiting: Ghost::ALL.into_iter().collect(),
            cooldown: 0.0,
        }
    }
}

impl ReleaseQueue {
    pub fn enqueue(&mut self, ghost: Ghost) {
        if !self.waiting.contains(&ghost) {
            self.waiting.push_back(ghost);
        }
    }

    /// Advances the cooldown and hands out the next ghost once it is allowed to leave.
    ///
    /// Nothing is released while another ghost is still on its way out.
    pub fn tick(&mut self, dt: f32, interval: f32, any_leaving: bool) -> Option<Ghost> {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
            return None;
        }
        if any_leaving {
            return None;
        }
        let next = self.waiting.pop_front()?;
        self.cooldown = interval;
        Some(next)
    }
}

fn countdown(remaining: f32, dt: f32) -> Option<f32> {
    let remaining = (remaining - dt).max(0.0);
    (remaining > 0.0).then_some(remaining)
}

/// Advances the timed stages: ready, dying and level clear.
pub fn stage_system(
    delta_time: Res<DeltaTime>,
    tuning: Res<Tuning>,
    mut stage: ResMut<GameStage>,
    mut commands: Commands,
) {
    let dt = delta_time.0;
    let ready = GameStage::Ready {
        remaining: tuning.ready_duration,
    };

    let next = match *stage {
        GameStage::Ready { remaining } => match countdown(remaining, dt) {
            Some(remaining) => GameStage::Ready { remaining },
            None => GameStage::Playing,
        },
        GameStage::Dying { remaining } => match countdown(remaining, dt) {
            Some(remaining) => GameStage::Dying { remaining },
            None => {
                commands.queue(reset_actors);
                ready
            }
        },
        GameStage::LevelClear { remaining } => match countdown(remaining, dt) {
            Some(remaining) => GameStage::LevelClear { remaining },
            None => {
                commands.queue(advance_level);
                ready
            }
        },
        other => other,
    };

    if discriminant(&next) != discriminant(&*stage) {
        info!(from = (*stage).as_ref(), to = next.as_ref(), "Stage transition");
    }
    *stage = next;
}

/// Reacts to session commands: start, pause, restart and exit.
pub fn session_command_observer(
    trigger: Trigger<GameEvent>,
    tuning: Res<Tuning>,
    mut stage: ResMut<GameStage>,
    mut state: ResMut<GlobalState>,
    mut commands: Commands,
) {
    let GameEvent::Command(command) = *trigger.event() else {
        return;
    };
    let ready = GameStage::Ready {
        remaining: tuning.ready_duration,
    };

    let next = match (command, *stage) {
        (GameCommand::Exit, _) => {
            state.exit = true;
            return;
        }
        (GameCommand::Start, GameStage::Attract) => ready,
        (GameCommand::Start, GameStage::Ready { .. }) => GameStage::Playing,
        (GameCommand::Start, GameStage::GameOver) | (GameCommand::Restart, _) => {
            commands.queue(reset_session);
            ready
        }
        (GameCommand::TogglePause, GameStage::Playing) => GameStage::Paused,
        (GameCommand::TogglePause, GameStage::Paused) => GameStage::Playing,
        _ => return,
    };

    info!(command = ?command, from = (*stage).as_ref(), to = next.as_ref(), "Session command");
    *stage = next;
}

/// Advances the scatter/chase schedule and broadcasts flips to active ghosts.
pub fn mode_schedule_system(
    delta_time: Res<DeltaTime>,
    tuning: Res<Tuning>,
    maze: Res<Maze>,
    mut schedule: ResMut<ModeSchedule>,
    mut ghosts: Query<(&Ghost, &mut GhostMode, &mut TileStepper), Without<PlayerControlled>>,
) {
    if tuning.pause_schedule_while_frightened && ghosts.iter().any(|(_, mode, _)| mode.is_frightened()) {
        return;
    }

    let Some(mode) = schedule.tick(delta_time.0) else {
        return;
    };
    debug!(mode = mode.as_ref(), phase = schedule.index(), "Global mode changed");

    for (ghost, mut ghost_mode, mut stepper) in ghosts.iter_mut() {
        if !ghost_mode.is_active() {
            continue;
        }
        *ghost_mode = mode.into();
        if tuning.reverse_on_mode_change {
            stepper.reverse(&maze);
            debug!(ghost = ghost.as_ref(), direction = ?stepper.direction, "Ghost reversed on mode change");
        }
    }
}

/// Lets ghosts out of the house one at a time.
///
/// A frightened ghost can be released too; it keeps its mode and heads for the gate.
pub fn release_system(
    delta_time: Res<DeltaTime>,
    tuning: Res<Tuning>,
    mut queue: ResMut<ReleaseQueue>,
    mut ghosts: Query<(&Ghost, &mut GhostMode, &mut HousePhase)>,
) {
    let any_leaving = ghosts
        .iter()
        .any(|(_, mode, house)| *house == HousePhase::Exiting && mode.can_be_frightened());
    let Some(next) = queue.tick(delta_time.0, tuning.release_interval, any_leaving) else {
        return;
    };

    for (ghost, mut mode, mut house) in ghosts.iter_mut() {
        if *ghost != next || *house != HousePhase::Penned {
            continue;
        }
        let current = *mode;
        match current {
            GhostMode::InHouse => *mode = GhostMode::Leaving,
            GhostMode::Frightened { .. } => {}
            _ => continue,
        }
        *house = HousePhase::Exiting;
        debug!(ghost = ghost.as_ref(), mode = (*mode).as_ref(), "Ghost released");
    }
}

/// Fires the level-clear transition once the last consumable is gone.
pub fn level_complete_system(
    maze: Res<Maze>,
    tuning: Res<Tuning>,
    level: Res<Level>,
    mut stage: ResMut<GameStage>,
    mut events: EventWriter<GameEvent>,
) {
    if !stage.is_playing() || maze.remaining_consumables() > 0 {
        return;
    }
    info!(level = level.0, "Level cleared");
    *stage = GameStage::LevelClear {
        remaining: tuning.level_clear_duration,
    };
    events.write(GameEvent::LevelCleared);
}

pub fn high_score_system(score: Res<ScoreResource>, mut high_score: ResMut<HighScore>) {
    if score.0 > high_score.0 {
        high_score.0 = score.0;
    }
}

/// Puts the player and ghosts back at their spawns and restarts the round timers.
///
/// Score, lives and the remaining consumables are left alone.
pub fn reset_actors(world: &mut World) {
    let level = world.resource::<Level>().0;
    let tuning = world.resource::<Tuning>().clone();
    let (player_spawn, ghost_spawns) = {
        let maze = world.resource::<Maze>();
        (maze.player_spawn(), maze.ghost_spawns())
    };

    let mut players = world.query_filtered::<(&mut TileStepper, &mut PlayerControlled), Without<Ghost>>();
    for (mut stepper, mut controlled) in players.iter_mut(world) {
        stepper.place(player_spawn);
        stepper.facing = Direction::Left;
        stepper.speed = tuning.player_speed_at(level);
        controlled.last_tile = None;
    }

    let mut ghosts = world.query_filtered::<
        (&Ghost, &mut GhostMode, &mut HousePhase, &mut Recovery, &mut TileStepper),
        Without<PlayerControlled>,
    >();
    for (ghost, mut mode, mut house, mut recovery, mut stepper) in ghosts.iter_mut(world) {
        stepper.place(ghost_spawns[ghost.index()]);
        stepper.speed = tuning.ghost_speed_at(level);
        *mode = GhostMode::InHouse;
        *house = HousePhase::Penned;
        recovery.0 = 0.0;
    }

    world.insert_resource(ModeSchedule::new(tuning.schedule.clone()));
    world.insert_resource(ReleaseQueue::default());
    world.insert_resource(ChainCounter::default());
    world.insert_resource(GraceTimers::default());
    debug!(level, "Actors reset");
}

/// Moves on to the next level: fresh consumables, faster actors, same score.
pub fn advance_level(world: &mut World) {
    world.resource_mut::<Level>().0 += 1;
    world.resource_mut::<Maze>().restore_consumables();
    reset_actors(world);
    info!(level = world.resource::<Level>().0, "Level started");
}

/// Throws the session away: level one, full lives, zero score.
pub fn reset_session(world: &mut World) {
    let lives = world.resource::<Tuning>().starting_lives;
    world.insert_resource(ScoreResource(0));
    world.insert_resource(PlayerLives(lives));
    world.insert_resource(Level(1));
    world.resource_mut::<Maze>().restore_consumables();
    reset_actors(world);
    info!("Session reset");
}
