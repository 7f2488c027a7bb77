use bevy_ecs::component::Component;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res, ResMut};
use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;
use strum_macros::{AsRefStr, EnumIter};
use tracing::{debug, trace};

use crate::config::Tuning;
use crate::map::builder::{Maze, TraversalFlags};
use crate::map::direction::Direction;
use crate::map::pathfinding::{next_step, walkable_neighbors};
use crate::systems::components::{ChainCounter, DeltaTime, GameRng, Level, PlayerControlled};
use crate::systems::movement::{Steering, TileStepper};
use crate::systems::state::{GlobalMode, ModeSchedule, ReleaseQueue};

/// The four ghost personalities, in release order.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Ghost {
    /// Red. Hunts the player's tile directly.
    Blinky,
    /// Pink. Aims ahead of the player.
    Pinky,
    /// Cyan. Flanks using Blinky's position.
    Inky,
    /// Orange. Chases from afar, retreats up close.
    Clyde,
}

impl Ghost {
    pub const ALL: [Ghost; 4] = [Ghost::Blinky, Ghost::Pinky, Ghost::Inky, Ghost::Clyde];

    /// Index into spawn tables.
    pub const fn index(self) -> usize {
        match self {
            Ghost::Blinky => 0,
            Ghost::Pinky => 1,
            Ghost::Inky => 2,
            Ghost::Clyde => 3,
        }
    }

    /// The corner this ghost heads for while scattering.
    pub fn scatter_corner(self, maze: &Maze) -> IVec2 {
        let (w, h) = (maze.width(), maze.height());
        match self {
            Ghost::Blinky => IVec2::new(w - 2, 0),
            Ghost::Pinky => IVec2::new(1, 0),
            Ghost::Inky => IVec2::new(w - 2, h - 1),
            Ghost::Clyde => IVec2::new(1, h - 1),
        }
    }

    /// The tile this ghost chases, given where everyone is.
    pub fn chase_target(self, own_tile: IVec2, pursuit: &Pursuit, corner: IVec2, shy_distance: i32) -> IVec2 {
        let ahead = |tiles: i32| pursuit.player_tile + pursuit.player_facing.as_ivec2() * tiles;
        match self {
            Ghost::Blinky => pursuit.player_tile,
            Ghost::Pinky => ahead(4),
            Ghost::Inky => pursuit.blinky_tile + 2 * (ahead(2) - pursuit.blinky_tile),
            Ghost::Clyde => {
                if (own_tile - pursuit.player_tile).length_squared() > shy_distance * shy_distance {
                    pursuit.player_tile
                } else {
                    corner
                }
            }
        }
    }
}

/// What the ghosts know about the player when picking targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pursuit {
    pub player_tile: IVec2,
    pub player_facing: Direction,
    pub blinky_tile: IVec2,
}

/// The ghost state machine.
#[derive(Component, Debug, Clone, Copy, PartialEq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum GhostMode {
    /// Waiting in the house for release.
    InHouse,
    /// Heading out through the gate.
    Leaving,
    Scatter,
    Chase,
    Frightened { remaining: f32 },
    /// Eaten; returning to the house.
    Eyes,
    /// Back in the house, waiting to be revived.
    EyesWait { remaining: f32 },
}

impl GhostMode {
    /// Scatter or chase: the modes that follow the global schedule.
    pub fn is_active(&self) -> bool {
        matches!(self, GhostMode::Scatter | GhostMode::Chase)
    }

    pub fn is_frightened(&self) -> bool {
        matches!(self, GhostMode::Frightened { .. })
    }

    /// Whether touching the player in this mode costs a life.
    pub fn is_lethal(&self) -> bool {
        !matches!(
            self,
            GhostMode::Frightened { .. } | GhostMode::Eyes | GhostMode::EyesWait { .. }
        )
    }

    /// Whether a power pellet turns this ghost blue. Only eaten ghosts are exempt.
    pub fn can_be_frightened(&self) -> bool {
        !matches!(self, GhostMode::Eyes | GhostMode::EyesWait { .. })
    }

    pub fn traversal_flags(&self) -> TraversalFlags {
        match self {
            GhostMode::InHouse | GhostMode::Leaving => TraversalFlags::GATE,
            GhostMode::Eyes | GhostMode::EyesWait { .. } => TraversalFlags::EYES,
            _ => TraversalFlags::empty(),
        }
    }

    /// Movement speed in this mode, in tiles per second.
    pub fn speed(&self, tuning: &Tuning, level: u32) -> f32 {
        match self {
            GhostMode::Frightened { .. } => tuning.frightened_speed,
            GhostMode::Eyes | GhostMode::EyesWait { .. } => tuning.eyes_speed,
            _ => tuning.ghost_speed_at(level),
        }
    }

    /// Frightened and within the last `flash` seconds of the timer.
    pub fn is_flashing(&self, flash: f32) -> bool {
        matches!(self, GhostMode::Frightened { remaining } if *remaining <= flash)
    }
}

impl From<GlobalMode> for GhostMode {
    fn from(mode: GlobalMode) -> Self {
        match mode {
            GlobalMode::Scatter => GhostMode::Scatter,
            GlobalMode::Chase => GhostMode::Chase,
        }
    }
}

/// Where a ghost stands relative to the house, kept apart from its mode so that a
/// frightened ghost still knows whether it is penned or on its way out.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HousePhase {
    #[default]
    Penned,
    /// Released, heading for the gate exit.
    Exiting,
    Out,
}

impl HousePhase {
    /// The phase a ghost placed directly into `mode` would be in.
    pub fn for_mode(mode: GhostMode) -> Self {
        match mode {
            GhostMode::InHouse | GhostMode::EyesWait { .. } => HousePhase::Penned,
            GhostMode::Leaving => HousePhase::Exiting,
            _ => HousePhase::Out,
        }
    }

    /// The mode a ghost returns to when its frightened time runs out.
    pub fn settled_mode(self, global: GlobalMode) -> GhostMode {
        match self {
            HousePhase::Penned => GhostMode::InHouse,
            HousePhase::Exiting => GhostMode::Leaving,
            HousePhase::Out => global.into(),
        }
    }

    /// Movement permissions for a ghost in `mode`; anyone not yet out may use the gate.
    pub fn traversal_flags(self, mode: GhostMode) -> TraversalFlags {
        match self {
            HousePhase::Out => mode.traversal_flags(),
            _ => mode.traversal_flags() | TraversalFlags::GATE,
        }
    }
}

/// Seconds during which a ghost fresh out of frightened mode cannot hurt the player.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Recovery(pub f32);

/// Classic one-step lookahead: the non-reverse neighbour closest to `target`.
///
/// Distance is squared Euclidean; ties go up, left, down, right. The reverse is only taken
/// when nothing else is open.
pub fn choose_greedy(
    maze: &Maze,
    tile: IVec2,
    current: Option<Direction>,
    target: IVec2,
    flags: TraversalFlags,
) -> Option<Direction> {
    let reverse = current.map(Direction::opposite);
    let options = walkable_neighbors(maze, tile, flags);
    options
        .iter()
        .filter(|(dir, _)| Some(*dir) != reverse)
        .min_by_key(|(_, next)| (*next - target).length_squared())
        .map(|(dir, _)| *dir)
        .or_else(|| reverse.filter(|back| options.iter().any(|(dir, _)| dir == back)))
}

/// A random non-reverse neighbour, the reverse in a dead end, or a pathfinder step as a last resort.
pub fn choose_frightened<R: Rng + ?Sized>(
    maze: &Maze,
    tile: IVec2,
    current: Option<Direction>,
    fallback_goal: IVec2,
    rng: &mut R,
) -> Option<Direction> {
    let reverse = current.map(Direction::opposite);
    let forward: SmallVec<[Direction; 4]> = walkable_neighbors(maze, tile, TraversalFlags::empty())
        .into_iter()
        .map(|(dir, _)| dir)
        .filter(|dir| Some(*dir) != reverse)
        .collect();

    match forward.choose(rng) {
        Some(dir) => Some(*dir),
        None => next_step(maze, tile, fallback_goal, TraversalFlags::empty(), reverse),
    }
}

/// Counts down frightened and eyes-wait timers and recovery grace.
///
/// Frightened ghosts whose timer runs out go back to what their house phase implies (the
/// global mode once out), turn around, and stay harmless for the recovery grace. When the
/// last one expires the chain counter resets. Revived eyes go back into the release queue.
pub fn ghost_timer_system(
    delta_time: Res<DeltaTime>,
    tuning: Res<Tuning>,
    maze: Res<Maze>,
    schedule: Res<ModeSchedule>,
    mut chain: ResMut<ChainCounter>,
    mut release: ResMut<ReleaseQueue>,
    mut ghosts: Query<
        (&Ghost, &mut GhostMode, &HousePhase, &mut Recovery, &mut TileStepper),
        Without<PlayerControlled>,
    >,
) {
    let dt = delta_time.0;
    let mut expired = false;

    for (ghost, mut mode, house, mut recovery, mut stepper) in ghosts.iter_mut() {
        recovery.0 = (recovery.0 - dt).max(0.0);

        match *mode {
            GhostMode::Frightened { remaining } => {
                let remaining = (remaining - dt).max(0.0);
                if remaining > 0.0 {
                    *mode = GhostMode::Frightened { remaining };
                    continue;
                }
                *mode = house.settled_mode(schedule.mode());
                stepper.reverse(&maze);
                recovery.0 = tuning.recovery_grace;
                expired = true;
                debug!(ghost = ghost.as_ref(), mode = (*mode).as_ref(), "Frightened mode expired");
            }
            GhostMode::EyesWait { remaining } => {
                let remaining = (remaining - dt).max(0.0);
                if remaining > 0.0 {
                    *mode = GhostMode::EyesWait { remaining };
                    continue;
                }
                *mode = GhostMode::InHouse;
                release.enqueue(*ghost);
                debug!(ghost = ghost.as_ref(), "Ghost revived, queued for release");
            }
            _ => {}
        }
    }

    if expired && !ghosts.iter().any(|(_, mode, _, _, _)| mode.is_frightened()) {
        trace!(chain = chain.0, "Frightened window closed, chain reset");
        chain.0 = 0;
    }
}

/// Walks a released ghost toward the gate exit. Returns `true` once it is above the gate,
/// or straight away on a board without one.
fn step_out_of_house(stepper: &mut TileStepper, maze: &Maze, dt: f32, flags: TraversalFlags) -> bool {
    let (Some(exit), Some(gate_row)) = (maze.gate_exit(), maze.gate_row()) else {
        return true;
    };
    stepper.tick_with(maze, dt, flags, |s| match next_step(maze, s.tile, exit, flags, None) {
        Some(dir) => Steering::Turn(dir),
        None => Steering::Keep,
    });
    stepper.tile.y < gate_row
}

/// Steers every ghost that is out of the house.
///
/// Scatter and chase use greedy lookahead toward their target, frightened ghosts wander,
/// and leaving ghosts and eyes follow the pathfinder through the gate. A frightened ghost
/// still in the house stays put until released, then leaves like any other.
#[allow(clippy::type_complexity)]
pub fn ghost_movement_system(
    delta_time: Res<DeltaTime>,
    tuning: Res<Tuning>,
    level: Res<Level>,
    maze: Res<Maze>,
    schedule: Res<ModeSchedule>,
    mut rng: ResMut<GameRng>,
    player: Query<&TileStepper, (With<PlayerControlled>, Without<Ghost>)>,
    mut ghosts: Query<(&Ghost, &mut GhostMode, &mut HousePhase, &mut TileStepper), Without<PlayerControlled>>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    let blinky_tile = ghosts
        .iter()
        .find(|(ghost, _, _, _)| **ghost == Ghost::Blinky)
        .map(|(_, _, _, stepper)| stepper.tile)
        .unwrap_or(player.tile);
    let pursuit = Pursuit {
        player_tile: player.tile,
        player_facing: player.facing,
        blinky_tile,
    };
    let spawns = maze.ghost_spawns();
    let dt = delta_time.0;

    for (ghost, mut mode, mut house, mut stepper) in ghosts.iter_mut() {
        let flags = house.traversal_flags(*mode);
        stepper.speed = mode.speed(&tuning, level.0);
        let corner = ghost.scatter_corner(&maze);

        match *mode {
            GhostMode::InHouse | GhostMode::EyesWait { .. } => continue,
            GhostMode::Leaving => {
                if step_out_of_house(&mut stepper, &maze, dt, flags) {
                    *house = HousePhase::Out;
                    *mode = schedule.mode().into();
                    debug!(ghost = ghost.as_ref(), mode = (*mode).as_ref(), "Ghost left the house");
                }
            }
            GhostMode::Eyes => {
                let home = spawns[ghost.index()];
                stepper.tick_with(&maze, dt, flags, |s| {
                    if s.tile == home {
                        return Steering::Stop;
                    }
                    match next_step(&maze, s.tile, home, flags, None) {
                        Some(dir) => Steering::Turn(dir),
                        None => Steering::Keep,
                    }
                });
                if stepper.tile == home && stepper.is_centered() {
                    stepper.place(home);
                    *house = HousePhase::Penned;
                    *mode = GhostMode::EyesWait {
                        remaining: tuning.revive_delay,
                    };
                    debug!(ghost = ghost.as_ref(), "Eyes reached the house");
                }
            }
            GhostMode::Frightened { .. } if *house == HousePhase::Penned => continue,
            GhostMode::Frightened { .. } if *house == HousePhase::Exiting => {
                if step_out_of_house(&mut stepper, &maze, dt, flags) {
                    *house = HousePhase::Out;
                    debug!(ghost = ghost.as_ref(), "Frightened ghost left the house");
                }
            }
            GhostMode::Frightened { .. } => {
                let rng = &mut rng.0;
                stepper.tick_with(&maze, dt, flags, |s| {
                    match choose_frightened(&maze, s.tile, s.direction, corner, &mut *rng) {
                        Some(dir) => Steering::Turn(dir),
                        None => Steering::Keep,
                    }
                });
            }
            GhostMode::Scatter | GhostMode::Chase => {
                let chasing = *mode == GhostMode::Chase;
                let ghost = *ghost;
                let shy = tuning.clyde_shy_distance;
                stepper.tick_with(&maze, dt, flags, |s| {
                    let target = if chasing {
                        ghost.chase_target(s.tile, &pursuit, corner, shy)
                    } else {
                        corner
                    };
                    match choose_greedy(&maze, s.tile, s.direction, target, flags) {
                        Some(dir) => Steering::Turn(dir),
                        None => Steering::Keep,
                    }
                });
            }
        }
    }
}
