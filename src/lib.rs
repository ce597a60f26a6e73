//! Bug Hunter · spot-the-bug game engine
//!
//! - Per-language bug template library and level generator
//! - Level catalog (hand-authored levels topped up with generated ones)
//! - Session state machine: scoring, lives, streaks, navigation
//! - Progress persistence behind a small store contract
//! - Cosmetic pacing (scan highlight, typewriter terminal, delayed dialog)
//!
//! Important env variables:
//!   BUGHUNTER_CONFIG_PATH : path to TOML config (session, storage, pacing, catalog seed, level bank)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

pub mod telemetry;
pub mod util;
pub mod domain;
pub mod config;
pub mod templates;
pub mod generator;
pub mod seeds;
pub mod catalog;
pub mod logic;
pub mod protocol;
pub mod store;
pub mod profile;
pub mod state;
pub mod pacing;

pub use catalog::{Catalog, GENERATED_ID_OFFSET, LEVEL_QUOTA};
pub use config::GameConfig;
pub use domain::{Difficulty, GameState, GameStatus, Language, Level, User};
pub use logic::GuessOutcome;
pub use protocol::{Hud, ProgressRecord, ViewEvent, ViewUpdate};
pub use state::{Advance, Session};
pub use store::{FileKv, KeyValueStore, LocalStore, MemoryKv, ProgressStore, StoreError};
