//! Public protocol structs exchanged with the presentation layer (serde ready).
//!
//! - `ViewEvent`: what the view reports (line clicks, level/language picks, buttons).
//! - `ViewUpdate`: what the session answers with (HUD snapshot plus feedback).
//! - `ProgressRecord`: the persisted `bh_progress` document.
//!
//! Keep this small and stable so the view and the engine can evolve independently.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{GameState, GameStatus, Language, INITIAL_LIVES};
use crate::logic::GuessOutcome;

/// Events the view can send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    LineClicked {
        line: usize,
    },
    LevelSelected {
        #[serde(rename = "levelId")]
        level_id: u32,
    },
    LanguageSelected {
        language: Language,
    },
    Retry,
    NextLevel,
    Restart,
}

/// Numbers the header/HUD shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hud {
    pub score: u32,
    pub streak: u32,
    pub lives: u32,
    pub status: GameStatus,
    pub language: Language,
    pub level_id: u32,
    pub completed: usize,
}

/// Reply to one `ViewEvent`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewUpdate {
    pub hud: Hud,
    /// The active level changed; the view reloads the editor.
    pub level_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GuessOutcome>,
    /// Terminal line to type out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// Informational notice (e.g. every level of the language done).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ViewUpdate {
    pub fn hud_only(hud: Hud) -> Self {
        Self { hud, level_changed: false, outcome: None, terminal: None, notice: None }
    }
}

fn default_lives() -> u32 {
    INITIAL_LIVES
}

/// Persisted progress. Absent fields fall back to a fresh session's values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub completed_levels: BTreeSet<u32>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default = "default_lives")]
    pub lives: u32,
}

impl ProgressRecord {
    pub fn capture(completed: &BTreeSet<u32>, state: &GameState) -> Self {
        Self {
            completed_levels: completed.clone(),
            score: state.score,
            streak: state.streak,
            lives: state.lives,
        }
    }
}
