//! This module contains the main game logic and state.

use bevy_ecs::event::{EventCursor, EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::Res;
use bevy_ecs::world::World;
use strum::IntoEnumIterator;
use tracing::{debug, info, trace, warn};

use crate::config::Tuning;
use crate::constants::{MAX_SUBSTEP, MAX_TICK};
use crate::error::{GameError, GameResult};
use crate::events::{GameCommand, GameEvent};
use crate::formatter;
use crate::map::builder::Maze;
use crate::snapshot::{ActorKind, ActorSnapshot, Snapshot};
use crate::systems::collision::{collision_system, grace_timer_system};
use crate::systems::components::{
    ChainCounter, DeltaTime, GameRng, GlobalState, GraceTimers, HighScore, Level, PlayerControlled, ScoreResource,
};
use crate::systems::ghost::{ghost_movement_system, ghost_timer_system, Ghost, GhostMode, HousePhase, Recovery};
use crate::systems::item::item_system;
use crate::systems::movement::TileStepper;
use crate::systems::player::{player_control_system, player_movement_system};
use crate::systems::state::{
    high_score_system, level_complete_system, mode_schedule_system, release_system, reset_actors,
    session_command_observer, stage_system, GameStage, ModeSchedule, PlayerLives, ReleaseQueue,
};

/// Ordering of one simulation step.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum RoundSet {
    /// Stage countdowns and player intents; always runs.
    Session,
    /// Grace windows, the scatter/chase schedule, house releases and ghost timers.
    Timers,
    /// Player then ghost movement.
    Actors,
    /// Collisions and level completion.
    Resolution,
    Bookkeeping,
}

/// The `Game` struct owns the world and the schedule that advances it.
///
/// It is headless: input arrives through [`Game::command`] and output leaves through
/// [`Game::snapshot`] and [`Game::take_events`].
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    cursor: EventCursor<GameEvent>,
    log: Vec<GameEvent>,
}

impl Game {
    /// Builds a game in the attract stage with every actor on its spawn.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` when the tuning cannot drive a round.
    pub fn new(maze: Maze, tuning: Tuning, high_score: u32) -> GameResult<Game> {
        tuning.validate()?;

        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, maze, tuning, high_score);
        Self::spawn_actors(&mut world);
        Self::configure_schedule(&mut schedule);

        reset_actors(&mut world);
        info!(high_score, "Game ready");

        Ok(Game {
            world,
            schedule,
            cursor: EventCursor::default(),
            log: Vec::new(),
        })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);

        world.add_observer(session_command_observer);
    }

    fn insert_resources(world: &mut World, maze: Maze, tuning: Tuning, high_score: u32) {
        world.insert_resource(GameRng::new(tuning.seed));
        world.insert_resource(PlayerLives(tuning.starting_lives));
        world.insert_resource(ModeSchedule::new(tuning.schedule.clone()));
        world.insert_resource(tuning);
        world.insert_resource(maze);
        world.insert_resource(GlobalState { exit: false });
        world.insert_resource(ScoreResource(0));
        world.insert_resource(HighScore(high_score));
        world.insert_resource(Level::default());
        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(ChainCounter::default());
        world.insert_resource(GraceTimers::default());
        world.insert_resource(ReleaseQueue::default());
        world.insert_resource(GameStage::default());
    }

    fn spawn_actors(world: &mut World) {
        let (player_spawn, ghost_spawns) = {
            let maze = world.resource::<Maze>();
            (maze.player_spawn(), maze.ghost_spawns())
        };
        let (player_speed, ghost_speed) = {
            let tuning = world.resource::<Tuning>();
            (tuning.player_speed, tuning.ghost_speed)
        };

        let player = world
            .spawn((TileStepper::new(player_spawn, player_speed), PlayerControlled::default()))
            .id();
        trace!(entity = ?player, tile = ?player_spawn, "Spawned player");

        for ghost in Ghost::iter() {
            let tile = ghost_spawns[ghost.index()];
            let entity = world
                .spawn((
                    ghost,
                    GhostMode::InHouse,
                    HousePhase::Penned,
                    Recovery::default(),
                    TileStepper::new(tile, ghost_speed),
                ))
                .id();
            trace!(ghost = ghost.as_ref(), entity = ?entity, tile = ?tile, "Spawned ghost");
        }
    }

    fn configure_schedule(schedule: &mut Schedule) {
        let playing = |stage: Res<GameStage>| stage.is_playing();

        schedule
            .add_systems((
                (stage_system, player_control_system).chain().in_set(RoundSet::Session),
                (grace_timer_system, mode_schedule_system, release_system, ghost_timer_system)
                    .chain()
                    .in_set(RoundSet::Timers),
                (player_movement_system, item_system, ghost_movement_system)
                    .chain()
                    .in_set(RoundSet::Actors),
                (collision_system, level_complete_system)
                    .chain()
                    .in_set(RoundSet::Resolution),
                high_score_system.in_set(RoundSet::Bookkeeping),
            ))
            .configure_sets(
                (
                    RoundSet::Session,
                    RoundSet::Timers.run_if(playing),
                    RoundSet::Actors.run_if(playing),
                    RoundSet::Resolution.run_if(playing),
                    RoundSet::Bookkeeping,
                )
                    .chain(),
            );
    }

    /// Delivers an intent from outside the simulation.
    ///
    /// Direction intents are buffered for the next step; session commands apply at once.
    pub fn command(&mut self, command: GameCommand) {
        match command {
            GameCommand::MovePlayer(_) => {
                self.world.send_event(GameEvent::Command(command));
            }
            _ => {
                debug!(?command, "Session command received");
                self.world.trigger(GameEvent::Command(command));
                self.world.flush();
            }
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Large steps are split so that no single schedule run covers more than one frame, and
    /// capped at [`MAX_TICK`]. Non-finite steps are ignored. Returns `true` once an exit has
    /// been requested.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !dt.is_finite() {
            warn!(dt, "Ignoring non-finite time step");
            return self.world.resource::<GlobalState>().exit;
        }
        let mut remaining = dt.clamp(0.0, MAX_TICK);
        loop {
            let step = remaining.min(MAX_SUBSTEP);
            self.world.insert_resource(DeltaTime(step));
            self.schedule.run(&mut self.world);

            let events = self.world.resource::<Events<GameEvent>>();
            self.log.extend(
                self.cursor
                    .read(events)
                    .filter(|event| !matches!(event, GameEvent::Command(_)))
                    .copied(),
            );
            self.world.resource_mut::<Events<GameEvent>>().update();
            formatter::increment_tick();

            remaining -= step;
            if remaining <= f32::EPSILON {
                break;
            }
        }

        self.world.resource::<GlobalState>().exit
    }

    /// Outcome events (items, ghosts eaten, deaths, level clears) since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.log)
    }

    pub fn stage(&self) -> GameStage {
        *self.world.resource::<GameStage>()
    }

    pub fn score(&self) -> u32 {
        self.world.resource::<ScoreResource>().0
    }

    pub fn high_score(&self) -> u32 {
        self.world.resource::<HighScore>().0
    }

    pub fn lives(&self) -> u8 {
        self.world.resource::<PlayerLives>().0
    }

    pub fn level(&self) -> u32 {
        self.world.resource::<Level>().0
    }

    pub fn maze(&self) -> &Maze {
        self.world.resource::<Maze>()
    }

    /// A read-only copy of everything a renderer needs.
    pub fn snapshot(&mut self) -> Snapshot {
        let mut players = self.world.query_filtered::<&TileStepper, With<PlayerControlled>>();
        let mut ghosts = self.world.query::<(&Ghost, &GhostMode, &TileStepper)>();

        let world = &self.world;
        let maze = world.resource::<Maze>();
        let flash = world.resource::<Tuning>().frightened_flash;

        let mut actors: Vec<ActorSnapshot> = players
            .iter(world)
            .map(|stepper| ActorSnapshot {
                kind: ActorKind::Player,
                position: stepper.position(maze),
                tile: stepper.tile,
                direction: stepper.direction,
                facing: stepper.facing,
                mode: None,
                flashing: false,
            })
            .collect();

        let mut ghost_actors: Vec<(Ghost, ActorSnapshot)> = ghosts
            .iter(world)
            .map(|(ghost, mode, stepper)| {
                (
                    *ghost,
                    ActorSnapshot {
                        kind: ActorKind::Ghost(*ghost),
                        position: stepper.position(maze),
                        tile: stepper.tile,
                        direction: stepper.direction,
                        facing: stepper.facing,
                        mode: Some(*mode),
                        flashing: mode.is_flashing(flash),
                    },
                )
            })
            .collect();
        ghost_actors.sort_by_key(|(ghost, _)| ghost.index());
        actors.extend(ghost_actors.into_iter().map(|(_, actor)| actor));

        Snapshot {
            width: maze.width(),
            height: maze.height(),
            tiles: maze.tiles().to_vec(),
            remaining: maze.remaining_consumables(),
            actors,
            score: world.resource::<ScoreResource>().0,
            high_score: world.resource::<HighScore>().0,
            lives: world.resource::<PlayerLives>().0,
            level: world.resource::<Level>().0,
            stage: *world.resource::<GameStage>(),
        }
    }
}
