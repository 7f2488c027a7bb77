use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::{
    config::Tuning,
    constants::TILE_SIZE,
    events::GameEvent,
    map::builder::Maze,
    systems::{
        components::{ChainCounter, DeltaTime, GraceTimers, PlayerControlled, ScoreResource},
        ghost::{Ghost, GhostMode, Recovery},
        movement::TileStepper,
        state::{GameStage, PlayerLives},
    },
};

/// Counts the power and post-eat grace windows down.
pub fn grace_timer_system(delta_time: Res<DeltaTime>, mut grace: ResMut<GraceTimers>) {
    grace.tick(delta_time.0);
}

/// Resolves player-ghost contact.
///
/// Every frightened ghost within reach is eaten for the next chain value and turned into
/// eyes. Otherwise a lethal ghost in reach costs a life, unless a grace window is open or
/// that ghost is still recovering from frightened mode.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn collision_system(
    tuning: Res<Tuning>,
    maze: Res<Maze>,
    mut score: ResMut<ScoreResource>,
    mut chain: ResMut<ChainCounter>,
    mut grace: ResMut<GraceTimers>,
    mut lives: ResMut<PlayerLives>,
    mut stage: ResMut<GameStage>,
    mut events: EventWriter<GameEvent>,
    player: Query<&TileStepper, (With<PlayerControlled>, Without<Ghost>)>,
    mut ghosts: Query<(Entity, &Ghost, &mut GhostMode, &Recovery, &TileStepper), Without<PlayerControlled>>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    let player_position = player.position(&maze);
    let reach = tuning.hit_radius * TILE_SIZE;

    let mut ate_any = false;
    let mut caught = false;
    for (entity, ghost, mut mode, recovery, stepper) in ghosts.iter_mut() {
        if stepper.position(&maze).distance(player_position) >= reach {
            continue;
        }

        if mode.is_frightened() {
            let points = tuning.chain_score(chain.0);
            score.0 += points;
            chain.0 += 1;
            *mode = GhostMode::Eyes;
            ate_any = true;
            debug!(ghost = ghost.as_ref(), points, chain = chain.0, "Ghost eaten");
            events.write(GameEvent::GhostEaten { ghost: entity, points });
        } else if mode.is_lethal() && recovery.0 <= 0.0 {
            caught = true;
        }
    }

    if ate_any {
        grace.post_eat = tuning.post_eat_grace;
        return;
    }
    if !caught || grace.is_active() {
        return;
    }

    lives.0 = lives.0.saturating_sub(1);
    *stage = if lives.0 == 0 {
        GameStage::GameOver
    } else {
        GameStage::Dying {
            remaining: tuning.dying_duration,
        }
    };
    info!(lives = lives.0, score = score.0, stage = (*stage).as_ref(), "Player caught");
    events.write(GameEvent::PlayerDied);
}
