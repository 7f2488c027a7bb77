use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    events::{GameCommand, GameEvent},
    map::{
        builder::{Consumable, Maze, TraversalFlags},
        direction::Direction,
    },
    systems::{
        components::{DeltaTime, PlayerControlled},
        ghost::Ghost,
        movement::{Steering, TileStepper},
    },
};

/// Buffers a turn for the stepper to take at the next tile center that allows it.
pub fn set_desired_direction(stepper: &mut TileStepper, direction: Direction) {
    stepper.set_buffered(direction);
}

/// Moves the player and eats whatever lies on every tile newly entered.
///
/// The first update after a reset counts as entering the spawn tile. Ghost contact is
/// not handled here.
pub fn update_player(
    stepper: &mut TileStepper,
    controlled: &mut PlayerControlled,
    maze: &mut Maze,
    dt: f32,
) -> SmallVec<[Consumable; 2]> {
    let mut entered: SmallVec<[_; 4]> = SmallVec::new();
    stepper.tick_with(maze, dt, TraversalFlags::empty(), |s| {
        if entered.last() != Some(&s.tile) {
            entered.push(s.tile);
        }
        Steering::Keep
    });

    let mut eaten = SmallVec::new();
    for tile in entered {
        if controlled.last_tile == Some(tile) {
            continue;
        }
        controlled.last_tile = Some(tile);
        if let Some(item) = maze.eat_at(tile) {
            eaten.push(item);
        }
    }
    eaten
}

/// Routes direction intents to the player.
pub fn player_control_system(
    mut events: EventReader<GameEvent>,
    mut players: Query<&mut TileStepper, (With<PlayerControlled>, Without<Ghost>)>,
) {
    for event in events.read() {
        if let GameEvent::Command(GameCommand::MovePlayer(direction)) = *event {
            for mut stepper in players.iter_mut() {
                set_desired_direction(&mut stepper, direction);
            }
        }
    }
}

pub fn player_movement_system(
    delta_time: Res<DeltaTime>,
    mut maze: ResMut<Maze>,
    mut players: Query<(&mut TileStepper, &mut PlayerControlled), Without<Ghost>>,
    mut events: EventWriter<GameEvent>,
) {
    for (mut stepper, mut controlled) in players.iter_mut() {
        for item in update_player(&mut stepper, &mut controlled, &mut maze, delta_time.0) {
            trace!(?item, tile = ?stepper.tile, "Consumable eaten");
            events.write(GameEvent::ItemEaten(item));
        }
    }
}
