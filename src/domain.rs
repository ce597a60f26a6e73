//! Domain models: languages, difficulties, levels, game state and the signed-in user.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::line_count;

/// Languages a level can be written in. The set is closed: every lookup keyed
/// by language is an exhaustive `match`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  Javascript,
  Typescript,
  Python,
  Cpp,
  Java,
  Csharp,
  Rust,
  Go,
  Php,
  Kotlin,
  Scala,
  Swift,
  Ruby,
  Html,
  Css,
}

impl Language {
  /// Sidebar order.
  pub const ALL: [Language; 15] = [
    Language::Javascript,
    Language::Python,
    Language::Html,
    Language::Css,
    Language::Cpp,
    Language::Java,
    Language::Rust,
    Language::Go,
    Language::Swift,
    Language::Php,
    Language::Csharp,
    Language::Ruby,
    Language::Typescript,
    Language::Kotlin,
    Language::Scala,
  ];

  /// Stable lowercase key, identical to the serialized form.
  pub fn key(self) -> &'static str {
    match self {
      Language::Javascript => "javascript",
      Language::Typescript => "typescript",
      Language::Python => "python",
      Language::Cpp => "cpp",
      Language::Java => "java",
      Language::Csharp => "csharp",
      Language::Rust => "rust",
      Language::Go => "go",
      Language::Php => "php",
      Language::Kotlin => "kotlin",
      Language::Scala => "scala",
      Language::Swift => "swift",
      Language::Ruby => "ruby",
      Language::Html => "html",
      Language::Css => "css",
    }
  }

  /// Label shown on language buttons.
  pub fn label(self) -> String {
    match self {
      Language::Cpp => "C++".into(),
      Language::Csharp => "C#".into(),
      other => other.key().to_uppercase(),
    }
  }

  pub fn parse(s: &str) -> Option<Language> {
    let norm = s.trim().to_lowercase();
    Language::ALL.iter().copied().find(|l| l.key() == norm)
  }
}

impl Default for Language {
  fn default() -> Self { Language::Javascript }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

/// One playable exercise. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
  pub id: u32,
  pub language: Language,
  pub difficulty: Difficulty,
  pub title: String,
  pub description: String,
  pub code: String,
  /// 1-based line of `code` holding the defect.
  #[serde(alias = "bug_line")]
  pub bug_line: usize,
  pub solution: String,
  pub explanation: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
  #[error("level {id}: code is empty")]
  EmptyCode { id: u32 },
  #[error("level {id}: bug line {bug_line} is outside 1..={lines}")]
  BugLineOutOfRange { id: u32, bug_line: usize, lines: usize },
}

impl Level {
  pub fn line_count(&self) -> usize {
    line_count(&self.code)
  }

  /// Checks that `bug_line` points at a real line of `code`.
  pub fn validate(&self) -> Result<(), LevelError> {
    if self.code.is_empty() {
      return Err(LevelError::EmptyCode { id: self.id });
    }
    let lines = self.line_count();
    if self.bug_line == 0 || self.bug_line > lines {
      return Err(LevelError::BugLineOutOfRange { id: self.id, bug_line: self.bug_line, lines });
    }
    Ok(())
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
  Idle,
  Playing,
  Paused,
  Gameover,
  LevelComplete,
}

impl GameStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      GameStatus::Idle => "idle",
      GameStatus::Playing => "playing",
      GameStatus::Paused => "paused",
      GameStatus::Gameover => "gameover",
      GameStatus::LevelComplete => "level-complete",
    }
  }
}

pub const INITIAL_LIVES: u32 = 3;

/// Session-global HUD numbers plus the active level and status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
  pub score: u32,
  pub streak: u32,
  pub lives: u32,
  pub current_level_id: u32,
  pub game_status: GameStatus,
}

impl Default for GameState {
  fn default() -> Self {
    Self {
      score: 0,
      streak: 0,
      lives: INITIAL_LIVES,
      current_level_id: 1,
      game_status: GameStatus::Idle,
    }
  }
}

pub const AVATAR_IDS: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
  #[error("username must not be empty")]
  EmptyUsername,
  #[error("avatar {0} is not one of 1..=5")]
  AvatarOutOfRange(u8),
}

/// Signed-in player. `email` is empty when none was given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub username: String,
  #[serde(default)]
  pub email: String,
  pub avatar_id: u8,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub joined_at: DateTime<Utc>,
}

impl User {
  pub fn new(username: &str, email: Option<&str>, avatar_id: u8) -> Result<Self, UserError> {
    let username = username.trim();
    if username.is_empty() {
      return Err(UserError::EmptyUsername);
    }
    if !AVATAR_IDS.contains(&avatar_id) {
      return Err(UserError::AvatarOutOfRange(avatar_id));
    }
    Ok(Self {
      username: username.to_string(),
      email: email.map(|e| e.trim().to_string()).unwrap_or_default(),
      avatar_id,
      joined_at: Utc::now(),
    })
  }

  pub fn email(&self) -> Option<&str> {
    if self.email.is_empty() { None } else { Some(&self.email) }
  }
}
