#![allow(dead_code)]

use bevy_ecs::{entity::Entity, event::EventRegistry, event::Events, world::World};
use glam::IVec2;
use mazechase::{
    config::Tuning,
    events::{GameCommand, GameEvent},
    game::Game,
    map::{builder::Maze, parser::MapTileParser},
    systems::{
        ChainCounter, DeltaTime, GameRng, GameStage, Ghost, GhostMode, GlobalState, GraceTimers, HighScore, HousePhase,
        Level, ModeSchedule, PlayerControlled, PlayerLives, Recovery, ReleaseQueue, ScoreResource, TileStepper,
    },
};

/// A ring corridor around a wall block, with the ghosts sealed away in the bottom row.
pub const RING: [&str; 7] = [
    "#######",
    "#X....#",
    "#.###.#",
    "#.....#",
    "#######",
    "#BPIC##",
    "#######",
];

/// A single dead-end corridor.
pub const DEAD_END: [&str; 5] = [
    "#######",
    "#X....#",
    "#######",
    "#BPIC##",
    "#######",
];

/// A horizontal tunnel that wraps at both edges.
pub const TUNNEL: [&str; 5] = [
    "#######",
    "T..X..T",
    "#######",
    "#BPIC##",
    "#######",
];

/// An open room, for tie-breaking checks.
pub const ROOM: [&str; 7] = [
    "#######",
    "#.....#",
    "#.....#",
    "#..X..#",
    "#######",
    "#BPIC##",
    "#######",
];

pub fn maze(rows: &[&str]) -> Maze {
    Maze::from_parsed(MapTileParser::parse_board(rows).expect("test maze should parse"))
}

/// A world holding every resource the round systems read, in the playing stage.
pub fn create_test_world(maze: Maze) -> World {
    let mut world = World::default();
    EventRegistry::register_event::<GameEvent>(&mut world);

    let tuning = Tuning {
        seed: Some(7),
        ..Tuning::default()
    };
    world.insert_resource(GameRng::new(tuning.seed));
    world.insert_resource(PlayerLives(tuning.starting_lives));
    world.insert_resource(ModeSchedule::new(tuning.schedule.clone()));
    world.insert_resource(tuning);
    world.insert_resource(maze);
    world.insert_resource(GlobalState { exit: false });
    world.insert_resource(ScoreResource(0));
    world.insert_resource(HighScore(0));
    world.insert_resource(Level::default());
    world.insert_resource(DeltaTime(1.0 / 60.0));
    world.insert_resource(ChainCounter::default());
    world.insert_resource(GraceTimers::default());
    world.insert_resource(ReleaseQueue {
        waiting: Default::default(),
        cooldown: 0.0,
    });
    world.insert_resource(GameStage::Playing);
    world
}

pub fn spawn_test_player(world: &mut World, tile: IVec2) -> Entity {
    world
        .spawn((TileStepper::new(tile, 7.0), PlayerControlled::default()))
        .id()
}

pub fn spawn_test_ghost(world: &mut World, ghost: Ghost, tile: IVec2, mode: GhostMode) -> Entity {
    world
        .spawn((ghost, mode, HousePhase::for_mode(mode), Recovery::default(), TileStepper::new(tile, 6.5)))
        .id()
}

pub fn send_game_event(world: &mut World, event: GameEvent) {
    let mut events = world.resource_mut::<Events<GameEvent>>();
    events.send(event);
}

pub fn ghost_mode(world: &World, entity: Entity) -> GhostMode {
    *world.get::<GhostMode>(entity).expect("ghost should have a mode")
}

pub fn stepper(world: &World, entity: Entity) -> TileStepper {
    world.get::<TileStepper>(entity).expect("entity should have a stepper").clone()
}

/// A game on the bundled board with a fixed seed.
pub fn new_game() -> Game {
    let tuning = Tuning {
        seed: Some(42),
        ..Tuning::default()
    };
    Game::new(Maze::default_board().expect("bundled board should parse"), tuning, 0).expect("game should build")
}

/// A game already past the ready countdown.
pub fn playing_game() -> Game {
    let mut game = new_game();
    game.command(GameCommand::Start);
    game.command(GameCommand::Start);
    assert_eq!(game.stage(), GameStage::Playing);
    game
}

/// Finds a ghost entity by personality.
pub fn find_ghost(world: &mut World, ghost: Ghost) -> Entity {
    let mut query = world.query::<(Entity, &Ghost)>();
    query
        .iter(world)
        .find(|(_, g)| **g == ghost)
        .map(|(entity, _)| entity)
        .expect("ghost should exist")
}

pub fn find_player(world: &mut World) -> Entity {
    let mut query = world.query::<(Entity, &PlayerControlled)>();
    query
        .iter(world)
        .map(|(entity, _)| entity)
        .next()
        .expect("player should exist")
}

pub fn house_phase(world: &World, entity: Entity) -> HousePhase {
    *world.get::<HousePhase>(entity).expect("ghost should have a house phase")
}
