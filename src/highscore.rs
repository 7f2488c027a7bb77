//! Best-score persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GameError, GameResult};

/// Somewhere the best score survives between sessions.
pub trait ScoreStore {
    /// The stored best score; zero when nothing has been saved yet.
    fn load(&self) -> GameResult<u32>;

    fn save(&mut self, score: u32) -> GameResult<()>;

    /// Saves `score` only if it beats what is stored. Returns whether it did.
    ///
    /// A store that cannot be read counts as zero, so any positive score replaces it.
    fn submit(&mut self, score: u32) -> GameResult<bool> {
        let best = self.load().unwrap_or_else(|e| {
            warn!(error = %e, "Stored score is unreadable, replacing it");
            0
        });
        if score <= best {
            return Ok(false);
        }
        self.save(score)?;
        Ok(true)
    }
}

/// Keeps the score as a decimal number in a text file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> GameResult<u32> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No score file yet");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        text.trim().parse().map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Score file is corrupt");
            GameError::InvalidState(format!("score file {} is not a number: {e}", self.path.display()))
        })
    }

    fn save(&mut self, score: u32) -> GameResult<()> {
        fs::write(&self.path, format!("{score}\n"))?;
        debug!(path = %self.path.display(), score, "Score saved");
        Ok(())
    }
}

/// Holds the score in memory only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryScoreStore(pub u32);

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> GameResult<u32> {
        Ok(self.0)
    }

    fn save(&mut self, score: u32) -> GameResult<()> {
        self.0 = score;
        Ok(())
    }
}
