use bevy_ecs::{event::Events, system::RunSystemOnce};
use glam::IVec2;
use mazechase::events::{GameCommand, GameEvent};
use mazechase::map::builder::{Consumable, Maze};
use mazechase::map::direction::Direction;
use mazechase::systems::{
    player_control_system, player_movement_system, set_desired_direction, update_player, DeltaTime, PlayerControlled,
    TileStepper,
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

#[test]
fn test_player_control_system_move_command() {
    let mut world = common::create_test_world(common::maze(&common::RING));
    let player = common::spawn_test_player(&mut world, IVec2::new(1, 1));

    common::send_game_event(&mut world, GameEvent::Command(GameCommand::MovePlayer(Direction::Down)));
    world
        .run_system_once(player_control_system)
        .expect("System should run successfully");

    assert_that(&common::stepper(&world, player).buffered).is_equal_to(Some(Direction::Down));
}

#[test]
fn test_player_control_system_ignores_other_commands() {
    let mut world = common::create_test_world(common::maze(&common::RING));
    let player = common::spawn_test_player(&mut world, IVec2::new(1, 1));

    common::send_game_event(&mut world, GameEvent::Command(GameCommand::TogglePause));
    world
        .run_system_once(player_control_system)
        .expect("System should run successfully");

    assert_that(&common::stepper(&world, player).buffered).is_none();
}

#[test]
fn test_update_player_eats_each_tile_entered() {
    let mut maze = common::maze(&common::RING);
    let mut stepper = TileStepper::new(IVec2::new(1, 1), 7.0);
    let mut controlled = PlayerControlled::default();
    set_desired_direction(&mut stepper, Direction::Right);

    // A single large step still visits every center on the way
    let eaten = update_player(&mut stepper, &mut controlled, &mut maze, 1.0);

    assert_that(&stepper.tile).is_equal_to(IVec2::new(5, 1));
    assert_eq!(eaten.to_vec(), vec![Consumable::Pellet; 4]);
    assert_that(&maze.remaining_consumables()).is_equal_to(7);
}

#[test]
fn test_update_player_does_not_double_count() {
    let mut maze = common::maze(&common::RING);
    let mut stepper = TileStepper::new(IVec2::new(2, 1), 7.0);
    let mut controlled = PlayerControlled::default();

    let first = update_player(&mut stepper, &mut controlled, &mut maze, 0.1);
    let second = update_player(&mut stepper, &mut controlled, &mut maze, 0.1);

    assert_that(&first.len()).is_equal_to(1);
    assert_that(&second.len()).is_equal_to(0);
    assert_that(&controlled.last_tile).is_equal_to(Some(IVec2::new(2, 1)));
}

#[test]
fn test_update_player_blocked_turn_keeps_going() {
    let mut maze = common::maze(&common::RING);
    let mut stepper = TileStepper::new(IVec2::new(1, 1), 1.0);
    let mut controlled = PlayerControlled::default();
    set_desired_direction(&mut stepper, Direction::Right);
    update_player(&mut stepper, &mut controlled, &mut maze, 0.5);

    // Up is a wall all along the top corridor
    set_desired_direction(&mut stepper, Direction::Up);
    update_player(&mut stepper, &mut controlled, &mut maze, 1.0);

    assert_that(&stepper.direction).is_equal_to(Some(Direction::Right));
    assert_that(&stepper.buffered).is_equal_to(Some(Direction::Up));
}

#[test]
fn test_player_movement_system_reports_items() {
    let mut world = common::create_test_world(common::maze(&common::RING));
    let player = common::spawn_test_player(&mut world, IVec2::new(1, 1));
    world
        .get_mut::<TileStepper>(player)
        .expect("player should have a stepper")
        .set_buffered(Direction::Down);
    world.insert_resource(DeltaTime(0.2));

    world
        .run_system_once(player_movement_system)
        .expect("System should run successfully");

    assert_that(&common::stepper(&world, player).tile).is_equal_to(IVec2::new(1, 2));
    let events = world.resource::<Events<GameEvent>>();
    let items: Vec<GameEvent> = events.iter_current_update_events().copied().collect();
    assert_eq!(items, vec![GameEvent::ItemEaten(Consumable::Pellet)]);
    assert_that(&world.resource::<Maze>().remaining_consumables()).is_equal_to(10);
}
