use bevy_ecs::{
    event::EventReader,
    query::Without,
    system::{Query, Res, ResMut},
};
use tracing::{debug, trace};

use crate::{
    config::Tuning,
    events::GameEvent,
    map::builder::{Consumable, Maze},
    systems::{
        components::{ChainCounter, GraceTimers, PlayerControlled, ScoreResource},
        ghost::{Ghost, GhostMode},
        movement::TileStepper,
    },
};

/// Awards points for eaten consumables and broadcasts power pellets to the ghosts.
///
/// A power pellet resets the chain, opens the power grace window and frightens every
/// ghost that has not been eaten, turning it around. Penned ghosts stay penned and
/// leaving ghosts keep heading out; only eyes are left alone.
pub fn item_system(
    mut events: EventReader<GameEvent>,
    tuning: Res<Tuning>,
    maze: Res<Maze>,
    mut score: ResMut<ScoreResource>,
    mut chain: ResMut<ChainCounter>,
    mut grace: ResMut<GraceTimers>,
    mut ghosts: Query<(&Ghost, &mut GhostMode, &mut TileStepper), Without<PlayerControlled>>,
) {
    for event in events.read() {
        let GameEvent::ItemEaten(item) = *event else {
            continue;
        };
        score.0 += item.score_value(tuning.pellet_score, tuning.power_pellet_score);

        if item != Consumable::PowerPellet {
            continue;
        }

        chain.0 = 0;
        grace.power = tuning.power_grace;
        for (ghost, mut mode, mut stepper) in ghosts.iter_mut() {
            if !mode.can_be_frightened() {
                continue;
            }
            *mode = GhostMode::Frightened {
                remaining: tuning.frightened_duration,
            };
            stepper.reverse(&maze);
            trace!(ghost = ghost.as_ref(), direction = ?stepper.direction, "Ghost frightened");
        }
        debug!(score = score.0, remaining = maze.remaining_consumables(), "Power pellet eaten");
    }
}
