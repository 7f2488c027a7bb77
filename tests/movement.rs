use glam::{IVec2, Vec2};
use mazechase::constants::TILE_SIZE;
use mazechase::map::builder::TraversalFlags;
use mazechase::map::direction::Direction;
use mazechase::systems::movement::{Steering, TileStepper};
use speculoos::prelude::*;

mod common;

fn moving(tile: IVec2, direction: Direction, speed: f32) -> TileStepper {
    let mut stepper = TileStepper::new(tile, speed);
    stepper.direction = Some(direction);
    stepper.facing = direction;
    stepper
}

#[test]
fn test_stepper_starts_from_buffer() {
    let maze = common::maze(&common::RING);
    let mut stepper = TileStepper::new(IVec2::new(1, 1), 1.0);
    stepper.set_buffered(Direction::Right);

    let position = stepper.tick(&maze, 0.5, TraversalFlags::empty());

    assert_that(&stepper.tile).is_equal_to(IVec2::new(1, 1));
    assert_that(&stepper.direction).is_equal_to(Some(Direction::Right));
    assert_that(&stepper.progress).is_equal_to(TILE_SIZE / 2.0);
    assert_that(&position).is_equal_to(maze.tile_center(IVec2::new(1, 1)) + Vec2::new(4.0, 0.0));
}

#[test]
fn test_stepper_snaps_when_rounding_reaches_the_center() {
    let maze = common::maze(&common::RING);
    let mut stepper = moving(IVec2::new(1, 1), Direction::Right, 1.0);
    // One ulp short of a full tile; the next step is smaller than the gap but rounds onto it
    stepper.progress = f32::from_bits(TILE_SIZE.to_bits() - 1);

    stepper.tick(&maze, 3.75e-8, TraversalFlags::empty());

    assert_that(&stepper.tile).is_equal_to(IVec2::new(2, 1));
    assert_that(&stepper.progress).is_equal_to(0.0);
    assert_that(&stepper.is_centered()).is_true();
}

#[test]
fn test_stepper_progress_stays_below_a_tile() {
    let maze = common::maze(&common::RING);
    let mut stepper = moving(IVec2::new(1, 1), Direction::Right, 7.3);

    for _ in 0..120 {
        stepper.tick(&maze, 1.0 / 60.0, TraversalFlags::empty());
        assert_that(&stepper.progress).is_less_than(TILE_SIZE);
    }
}

#[test]
fn test_stepper_no_corner_cutting() {
    let maze = common::maze(&common::RING);
    let mut stepper = moving(IVec2::new(1, 1), Direction::Right, 1.0);
    stepper.progress = 4.0;
    stepper.set_buffered(Direction::Down);

    // Reaches (2, 1) with 2 px to spare; down is a wall there, so the turn stays buffered
    stepper.tick(&maze, 0.75, TraversalFlags::empty());

    assert_that(&stepper.tile).is_equal_to(IVec2::new(2, 1));
    assert_that(&stepper.direction).is_equal_to(Some(Direction::Right));
    assert_that(&stepper.buffered).is_equal_to(Some(Direction::Down));
    assert_that(&stepper.progress).is_equal_to(2.0);
}

#[test]
fn test_stepper_turns_at_corner() {
    let maze = common::maze(&common::RING);
    let mut stepper = moving(IVec2::new(4, 1), Direction::Right, 1.0);
    stepper.set_buffered(Direction::Down);

    stepper.tick(&maze, 1.5, TraversalFlags::empty());

    assert_that(&stepper.tile).is_equal_to(IVec2::new(5, 1));
    assert_that(&stepper.direction).is_equal_to(Some(Direction::Down));
    assert_that(&stepper.facing).is_equal_to(Direction::Down);
    assert_that(&stepper.buffered).is_none();
    assert_that(&stepper.progress).is_equal_to(4.0);
}

#[test]
fn test_stepper_stops_at_wall() {
    let maze = common::maze(&common::RING);
    let mut stepper = moving(IVec2::new(4, 3), Direction::Right, 2.0);

    stepper.tick(&maze, 1.0, TraversalFlags::empty());

    assert_that(&stepper.tile).is_equal_to(IVec2::new(5, 3));
    assert_that(&stepper.direction).is_none();
    assert_that(&stepper.facing).is_equal_to(Direction::Right);
    assert_that(&stepper.is_centered()).is_true();
}

#[test]
fn test_stepper_large_dt_never_passes_a_wall() {
    let maze = common::maze(&common::RING);
    let mut stepper = moving(IVec2::new(1, 1), Direction::Right, 10.0);

    stepper.tick(&maze, 10.0, TraversalFlags::empty());

    assert_that(&stepper.tile).is_equal_to(IVec2::new(5, 1));
    assert_that(&stepper.is_centered()).is_true();
    assert_that(&maze.is_walkable(stepper.tile, TraversalFlags::empty())).is_true();
}

#[test]
fn test_stepper_blocked_buffer_is_kept() {
    let maze = common::maze(&common::RING);
    let mut stepper = TileStepper::new(IVec2::new(1, 1), 1.0);
    stepper.set_buffered(Direction::Up);

    stepper.tick(&maze, 1.0, TraversalFlags::empty());

    assert_that(&stepper.tile).is_equal_to(IVec2::new(1, 1));
    assert_that(&stepper.direction).is_none();
    assert_that(&stepper.buffered).is_equal_to(Some(Direction::Up));
}

#[test]
fn test_stepper_tunnel_wrap() {
    let maze = common::maze(&common::TUNNEL);
    let mut stepper = moving(IVec2::new(6, 1), Direction::Right, 1.0);

    stepper.tick(&maze, 1.0, TraversalFlags::empty());
    assert_that(&stepper.tile).is_equal_to(IVec2::new(0, 1));

    stepper.tick(&maze, 1.0, TraversalFlags::empty());
    assert_that(&stepper.tile).is_equal_to(IVec2::new(1, 1));
    assert_that(&stepper.direction).is_equal_to(Some(Direction::Right));
}

#[test]
fn test_stepper_reverse_mid_transit_keeps_position() {
    let maze = common::maze(&common::RING);
    let mut stepper = moving(IVec2::new(1, 1), Direction::Right, 1.0);
    stepper.progress = 3.0;
    let before = stepper.position(&maze);

    stepper.reverse(&maze);

    assert_that(&stepper.tile).is_equal_to(IVec2::new(2, 1));
    assert_that(&stepper.direction).is_equal_to(Some(Direction::Left));
    assert_that(&stepper.progress).is_equal_to(5.0);
    assert_that(&stepper.position(&maze)).is_equal_to(before);
}

#[test]
fn test_stepper_reverse_at_center() {
    let maze = common::maze(&common::RING);
    let mut stepper = moving(IVec2::new(3, 1), Direction::Right, 1.0);

    stepper.reverse(&maze);

    assert_that(&stepper.tile).is_equal_to(IVec2::new(3, 1));
    assert_that(&stepper.direction).is_equal_to(Some(Direction::Left));
    assert_that(&stepper.facing).is_equal_to(Direction::Left);
}

#[test]
fn test_stepper_stop_steering_halts_on_center() {
    let maze = common::maze(&common::RING);
    let mut stepper = moving(IVec2::new(1, 1), Direction::Right, 1.0);
    let target = IVec2::new(3, 1);

    stepper.tick_with(&maze, 5.0, TraversalFlags::empty(), |s| {
        if s.tile == target {
            Steering::Stop
        } else {
            Steering::Keep
        }
    });

    assert_that(&stepper.tile).is_equal_to(target);
    assert_that(&stepper.direction).is_none();
    assert_that(&stepper.is_centered()).is_true();
}

#[test]
fn test_stepper_place_resets_motion() {
    let mut stepper = moving(IVec2::new(1, 1), Direction::Right, 1.0);
    stepper.progress = 2.0;
    stepper.set_buffered(Direction::Down);

    stepper.place(IVec2::new(5, 3));

    assert_that(&stepper.tile).is_equal_to(IVec2::new(5, 3));
    assert_that(&stepper.direction).is_none();
    assert_that(&stepper.buffered).is_none();
    assert_that(&stepper.is_centered()).is_true();
}
