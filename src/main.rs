use std::fs;

use anyhow::{Context, Result};
use mazechase::autopilot;
use mazechase::config::RunConfig;
use mazechase::constants::LOOP_TIME;
use mazechase::events::{GameCommand, GameEvent};
use mazechase::game::Game;
use mazechase::highscore::{FileScoreStore, ScoreStore};
use mazechase::logging::setup_logging;
use mazechase::map::builder::Maze;
use mazechase::systems::state::GameStage;
use thousands::Separable;
use tracing::{debug, info, warn};

/// Plays one headless session with the autopilot at the controls.
pub fn main() -> Result<()> {
    setup_logging();

    let config = RunConfig::load().context("Could not load configuration")?;
    debug!(?config, "Configuration loaded");

    let maze = match &config.maze_path {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("Could not read maze file {}", path.display()))?;
            Maze::from_text(&text).with_context(|| format!("Could not parse maze file {}", path.display()))?
        }
        None => Maze::default_board().context("Could not build the bundled maze")?,
    };

    let mut store = FileScoreStore::new(&config.score_file);
    let best = store.load().unwrap_or_else(|e| {
        warn!(error = %e, path = %store.path().display(), "Ignoring unreadable score file");
        0
    });

    let mut game = Game::new(maze, config.tuning(), best).context("Could not create game")?;
    game.command(GameCommand::Start);

    let dt = LOOP_TIME.as_secs_f32();
    let frames = (config.demo_seconds.max(0.0) / dt).ceil() as u64;
    info!(
        frames,
        loop_ms = %format!("{:.3}", dt * 1000.0),
        "Starting headless run"
    );

    for frame in 0..frames {
        if let Some(direction) = autopilot::steer(&mut game) {
            game.command(GameCommand::MovePlayer(direction));
        }
        if game.tick(dt) {
            info!(frame, "Exit requested");
            break;
        }

        for event in game.take_events() {
            match event {
                GameEvent::GhostEaten { points, .. } => debug!(points, frame, "Ghost eaten"),
                GameEvent::PlayerDied => info!(lives = game.lives(), frame, "Player died"),
                GameEvent::LevelCleared => info!(level = game.level(), frame, "Level cleared"),
                _ => {}
            }
        }

        if game.stage() == GameStage::GameOver {
            info!(frame, "Game over");
            break;
        }
    }

    let score = game.score();
    info!(
        score = %score.separate_with_commas(),
        level = game.level(),
        lives = game.lives(),
        "Session finished"
    );

    if store.submit(score).context("Could not save the best score")? {
        info!(score = %score.separate_with_commas(), "New high score");
    }

    Ok(())
}
