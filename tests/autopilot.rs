use glam::IVec2;
use mazechase::autopilot::{plan, steer};
use mazechase::events::GameCommand;
use mazechase::map::direction::Direction;
use speculoos::prelude::*;

mod common;

#[test]
fn test_plan_heads_for_nearest_pellet() {
    let maze = common::maze(&common::RING);

    assert_that(&plan(&maze, IVec2::new(1, 1), &[])).is_equal_to(Some(Direction::Down));
}

#[test]
fn test_plan_keeps_away_from_threats() {
    let maze = common::maze(&common::RING);

    assert_that(&plan(&maze, IVec2::new(1, 1), &[IVec2::new(1, 4)])).is_equal_to(Some(Direction::Right));
}

#[test]
fn test_plan_gives_up_when_cornered() {
    let maze = common::maze(&common::RING);

    assert_that(&plan(&maze, IVec2::new(1, 1), &[IVec2::new(2, 2)])).is_none();
}

#[test]
fn test_plan_with_nothing_left() {
    let mut maze = common::maze(&common::DEAD_END);
    for x in 1..6 {
        maze.eat_at(IVec2::new(x, 1));
    }

    assert_that(&plan(&maze, IVec2::new(1, 1), &[])).is_none();
}

#[test]
fn test_steer_drives_the_player() {
    let mut game = common::playing_game();

    let direction = steer(&mut game);
    assert_that(&direction).is_some();

    if let Some(direction) = direction {
        game.command(GameCommand::MovePlayer(direction));
    }
    game.tick(0.5);
    assert_that(&game.score()).is_greater_than(0);
}
