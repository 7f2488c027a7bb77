use glam::{IVec2, Vec2};
use mazechase::constants::{MapTile, RAW_BOARD, TILE_SIZE};
use mazechase::map::builder::{Consumable, Maze, TraversalFlags};
use mazechase::map::direction::Direction;
use speculoos::prelude::*;

mod common;

fn default_maze() -> Maze {
    Maze::default_board().expect("bundled board should parse")
}

#[test]
fn test_remaining_counts_every_consumable() {
    let maze = default_maze();
    let expected: usize = RAW_BOARD
        .iter()
        .map(|row| row.chars().filter(|c| *c == '.' || *c == 'o').count())
        .sum();

    assert_that(&maze.remaining_consumables()).is_equal_to(expected);
}

#[test]
fn test_eat_at_clears_the_tile_once() {
    let mut maze = default_maze();
    let before = maze.remaining_consumables();

    assert_that(&maze.eat_at(IVec2::new(1, 3))).is_equal_to(Some(Consumable::PowerPellet));
    assert_that(&maze.eat_at(IVec2::new(1, 3))).is_none();
    assert_that(&maze.eat_at(IVec2::new(1, 1))).is_equal_to(Some(Consumable::Pellet));
    assert_that(&maze.eat_at(IVec2::new(0, 0))).is_none();
    assert_that(&maze.eat_at(IVec2::new(-1, 0))).is_none();

    assert_that(&maze.tile(IVec2::new(1, 3))).is_equal_to(Some(MapTile::Empty));
    assert_that(&maze.remaining_consumables()).is_equal_to(before - 2);
}

#[test]
fn test_restore_consumables() {
    let mut maze = default_maze();
    let before = maze.remaining_consumables();
    maze.eat_at(IVec2::new(1, 1));
    maze.eat_at(IVec2::new(26, 3));

    maze.restore_consumables();

    assert_that(&maze.remaining_consumables()).is_equal_to(before);
    assert_that(&maze.tile(IVec2::new(26, 3))).is_equal_to(Some(MapTile::PowerPellet));
}

#[test]
fn test_tunnel_wrap() {
    let maze = default_maze();

    assert_that(&maze.wrap(IVec2::new(-1, 14))).is_equal_to(Some(IVec2::new(27, 14)));
    assert_that(&maze.wrap(IVec2::new(28, 14))).is_equal_to(Some(IVec2::new(0, 14)));
    assert_that(&maze.neighbor(IVec2::new(0, 14), Direction::Left)).is_equal_to(Some(IVec2::new(27, 14)));
    assert_that(&maze.neighbor(IVec2::new(27, 14), Direction::Right)).is_equal_to(Some(IVec2::new(0, 14)));

    // Only the tunnel row wraps
    assert_that(&maze.wrap(IVec2::new(-1, 13))).is_none();
    assert_that(&maze.neighbor(IVec2::new(0, 0), Direction::Up)).is_none();
}

#[test]
fn test_gate_walkability() {
    let maze = default_maze();
    let gate = IVec2::new(13, 12);

    assert_that(&maze.tile(gate)).is_equal_to(Some(MapTile::Gate));
    assert_that(&maze.is_walkable(gate, TraversalFlags::empty())).is_false();
    assert_that(&maze.is_walkable(gate, TraversalFlags::GATE)).is_true();
    assert_that(&maze.is_walkable(gate, TraversalFlags::EYES)).is_true();
}

#[test]
fn test_walls_and_bounds_are_not_walkable() {
    let maze = default_maze();

    assert_that(&maze.is_walkable(IVec2::new(0, 0), TraversalFlags::all())).is_false();
    assert_that(&maze.is_walkable(IVec2::new(1, 1), TraversalFlags::empty())).is_true();
    assert_that(&maze.is_walkable(IVec2::new(5, 40), TraversalFlags::empty())).is_false();
    // The house floor is open; only the gate keeps the player out
    assert_that(&maze.is_walkable(IVec2::new(12, 14), TraversalFlags::empty())).is_true();
}

#[test]
fn test_gate_exit() {
    let maze = default_maze();

    assert_that(&maze.gate_row()).is_equal_to(Some(12));
    assert_that(&maze.gate_exit()).is_equal_to(Some(IVec2::new(14, 11)));
    assert_that(&maze.is_walkable(IVec2::new(14, 11), TraversalFlags::empty())).is_true();

    let ring = common::maze(&common::RING);
    assert_that(&ring.gate_exit()).is_none();
}

#[test]
fn test_tile_center_and_tile_at() {
    let maze = default_maze();

    assert_that(&maze.tile_center(IVec2::new(0, 0))).is_equal_to(Vec2::new(4.0, 28.0));

    for tile in [IVec2::new(0, 0), IVec2::new(13, 23), IVec2::new(27, 30)] {
        let center = maze.tile_center(tile);
        assert_that(&maze.tile_at(center)).is_equal_to(tile);
        assert_that(&maze.tile_at(center + Vec2::splat(TILE_SIZE / 2.0 - 0.01))).is_equal_to(tile);
    }
}

#[test]
fn test_spawns() {
    let maze = default_maze();

    assert_that(&maze.player_spawn()).is_equal_to(IVec2::new(13, 23));
    assert_that(&maze.ghost_spawns()[0]).is_equal_to(IVec2::new(12, 14));
    assert_that(&maze.tunnel_row()).is_equal_to(Some(14));
}

#[test]
fn test_from_text_reports_parse_errors() {
    let result = Maze::from_text("#####\n#X..#\n#####");
    assert_that(&result.is_err()).is_true();
}
