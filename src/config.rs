//! Loading game configuration (session defaults, storage, pacing and an
//! optional bank of extra hand-authored levels) from TOML.
//!
//! The file is located through `BUGHUNTER_CONFIG_PATH`. A missing or broken
//! file is logged and the defaults are used; configuration never aborts a
//! session.

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Language, Level, INITIAL_LIVES};

pub const CONFIG_PATH_ENV: &str = "BUGHUNTER_CONFIG_PATH";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub session: SessionCfg,
  #[serde(default)]
  pub storage: StorageCfg,
  #[serde(default)]
  pub pacing: PacingCfg,
  #[serde(default)]
  pub catalog: CatalogCfg,
  /// Extra hand-authored levels. Same fields as `Level` (`bugLine` or `bug_line`).
  #[serde(default)]
  pub levels: Vec<Level>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SessionCfg {
  #[serde(default)]
  pub initial_language: Language,
  #[serde(default = "default_initial_lives")]
  pub initial_lives: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageCfg {
  #[serde(default = "default_storage_dir")]
  pub dir: PathBuf,
}

/// Cosmetic delays. None of these gate a state transition.
#[derive(Clone, Debug, Deserialize)]
pub struct PacingCfg {
  #[serde(default = "default_scan_delay")]
  pub scan_delay_ms: u64,
  #[serde(default = "default_type_interval")]
  pub type_interval_ms: u64,
  #[serde(default = "default_modal_delay")]
  pub modal_delay_ms: u64,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogCfg {
  /// Fixed seed for generated levels; entropy when absent.
  #[serde(default)]
  pub seed: Option<u64>,
}

fn default_initial_lives() -> u32 { INITIAL_LIVES }
fn default_storage_dir() -> PathBuf { PathBuf::from(".bughunter") }
fn default_scan_delay() -> u64 { 600 }
fn default_type_interval() -> u64 { 15 }
fn default_modal_delay() -> u64 { 800 }

impl Default for SessionCfg {
  fn default() -> Self {
    Self { initial_language: Language::default(), initial_lives: default_initial_lives() }
  }
}

impl Default for StorageCfg {
  fn default() -> Self {
    Self { dir: default_storage_dir() }
  }
}

impl Default for PacingCfg {
  fn default() -> Self {
    Self {
      scan_delay_ms: default_scan_delay(),
      type_interval_ms: default_type_interval(),
      modal_delay_ms: default_modal_delay(),
    }
  }
}

impl PacingCfg {
  pub fn scan_delay(&self) -> Duration { Duration::from_millis(self.scan_delay_ms) }
  pub fn type_interval(&self) -> Duration { Duration::from_millis(self.type_interval_ms) }
  pub fn modal_delay(&self) -> Duration { Duration::from_millis(self.modal_delay_ms) }
}

impl GameConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str::<GameConfig>(s)
  }

  /// Config from `BUGHUNTER_CONFIG_PATH`, or defaults.
  pub fn load() -> Self {
    load_config_from_env().unwrap_or_default()
  }
}

/// Attempt to load `GameConfig` from BUGHUNTER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<GameConfig> {
  let path = std::env::var(CONFIG_PATH_ENV).ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match GameConfig::from_toml_str(&s) {
      Ok(cfg) => {
        info!(target: "bughunter", %path, bank_levels = cfg.levels.len(), "Loaded game config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "bughunter", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "bughunter", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Difficulty;

  #[test]
  fn empty_file_gives_defaults() {
    let cfg = GameConfig::from_toml_str("").unwrap();
    assert_eq!(cfg.session.initial_language, Language::Javascript);
    assert_eq!(cfg.session.initial_lives, 3);
    assert_eq!(cfg.pacing.modal_delay(), Duration::from_millis(800));
    assert_eq!(cfg.pacing.type_interval_ms, 15);
    assert_eq!(cfg.storage.dir, PathBuf::from(".bughunter"));
    assert!(cfg.catalog.seed.is_none());
    assert!(cfg.levels.is_empty());
  }

  #[test]
  fn parses_sections_and_level_bank() {
    let cfg = GameConfig::from_toml_str(
      r#"
[session]
initial_language = "rust"

[pacing]
scan_delay_ms = 0

[catalog]
seed = 7

[[levels]]
id = 200
language = "rust"
difficulty = "hard"
title = "Borrow Clash"
description = "Two mutable borrows."
code = "let mut v = vec![1];\nlet a = &mut v;\nlet b = &mut v;\na.push(2);"
bug_line = 3
solution = "drop the second borrow"
explanation = "Only one mutable borrow may be live at a time."
"#,
    )
    .unwrap();
    assert_eq!(cfg.session.initial_language, Language::Rust);
    assert_eq!(cfg.session.initial_lives, 3);
    assert_eq!(cfg.pacing.scan_delay(), Duration::ZERO);
    assert_eq!(cfg.pacing.type_interval_ms, 15);
    assert_eq!(cfg.catalog.seed, Some(7));
    assert_eq!(cfg.levels.len(), 1);
    assert_eq!(cfg.levels[0].bug_line, 3);
    assert_eq!(cfg.levels[0].difficulty, Difficulty::Hard);
    assert!(cfg.levels[0].validate().is_ok());
  }

  #[test]
  fn rejects_unknown_language() {
    assert!(GameConfig::from_toml_str("[session]\ninitial_language = \"cobol\"").is_err());
  }
}
