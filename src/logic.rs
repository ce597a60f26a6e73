//! Scoring rules and feedback text shared by every entry point of the session.
//!
//! The rules are pure functions over `GameState` so they can be checked in
//! isolation; `state::Session` decides when they apply.

use serde::Serialize;

use crate::domain::{GameState, GameStatus, Level};

pub const BASE_POINTS: u32 = 100;
pub const STREAK_BONUS: u32 = 50;
pub const MISS_PENALTY: u32 = 50;

pub const TERMINAL_IDLE: &str = "System Ready... Waiting for input sequence.";
pub const TERMINAL_SUCCESS: &str = "BUG DETECTED! Patch applied successfully. System stabilizing...";
pub const TERMINAL_FAILURE: &str = "CRITICAL ERROR: Analysis failed. No anomaly detected at this vector.";
pub const SUCCESS_TITLE: &str = "Bug Squashed!";

/// Points for a correct guess, given the streak *before* this guess.
pub fn success_points(streak_before: u32) -> u32 {
  BASE_POINTS.saturating_add(STREAK_BONUS.saturating_mul(streak_before))
}

/// Correct guess: score the streak bonus, extend the streak, finish the level.
/// Returns the points awarded.
pub fn apply_success(state: &mut GameState) -> u32 {
  let points = success_points(state.streak);
  state.score = state.score.saturating_add(points);
  state.streak += 1;
  state.game_status = GameStatus::LevelComplete;
  points
}

/// Wrong guess: lose a life (floored at 0), drop the streak, lose points
/// (floored at 0). The level stays in play unless this used the last life.
pub fn apply_failure(state: &mut GameState) {
  state.lives = state.lives.saturating_sub(1);
  state.streak = 0;
  state.score = state.score.saturating_sub(MISS_PENALTY);
  state.game_status = if state.lives == 0 { GameStatus::Gameover } else { GameStatus::Playing };
}

/// Editor highlight for the selected line: green once the level is solved on
/// the bug line, red for a wrong pick, nothing otherwise.
pub fn selection_verdict(level: &Level, selected: Option<usize>, status: GameStatus) -> Option<bool> {
  let line = selected?;
  if status == GameStatus::LevelComplete && line == level.bug_line {
    Some(true)
  } else if line != level.bug_line {
    Some(false)
  } else {
    None
  }
}

/// Success dialog payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SuccessFeedback {
  pub title: String,
  pub explanation: String,
  pub solution: String,
}

impl SuccessFeedback {
  pub fn for_level(level: &Level) -> Self {
    Self {
      title: SUCCESS_TITLE.to_string(),
      explanation: level.explanation.clone(),
      solution: level.solution.clone(),
    }
  }
}

/// Result of one line click.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GuessOutcome {
  /// Not in `playing`; nothing changed.
  Ignored { status: GameStatus },
  Correct { points: u32, first_completion: bool, feedback: SuccessFeedback },
  Wrong { lives_left: u32, game_over: bool },
}

impl GuessOutcome {
  pub fn terminal_message(&self) -> Option<&'static str> {
    match self {
      GuessOutcome::Ignored { .. } => None,
      GuessOutcome::Correct { .. } => Some(TERMINAL_SUCCESS),
      GuessOutcome::Wrong { .. } => Some(TERMINAL_FAILURE),
    }
  }

  pub fn is_correct(&self) -> bool {
    matches!(self, GuessOutcome::Correct { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, Language};

  fn playing(score: u32, streak: u32, lives: u32) -> GameState {
    GameState { score, streak, lives, current_level_id: 1, game_status: GameStatus::Playing }
  }

  #[test]
  fn success_uses_streak_before_increment() {
    let mut s = playing(0, 2, 3);
    assert_eq!(apply_success(&mut s), 200);
    assert_eq!(s.score, 200);
    assert_eq!(s.streak, 3);
    assert_eq!(s.game_status, GameStatus::LevelComplete);
    assert_eq!(success_points(0), 100);
  }

  #[test]
  fn failure_floors_score_and_lives() {
    let mut s = playing(30, 4, 3);
    apply_failure(&mut s);
    assert_eq!((s.score, s.streak, s.lives), (0, 0, 2));
    assert_eq!(s.game_status, GameStatus::Playing);

    let mut s = playing(500, 0, 1);
    apply_failure(&mut s);
    assert_eq!((s.score, s.lives), (450, 0));
    assert_eq!(s.game_status, GameStatus::Gameover);

    apply_failure(&mut s);
    assert_eq!(s.lives, 0);
  }

  #[test]
  fn verdict_matches_editor_highlight() {
    let level = Level {
      id: 6,
      language: Language::Python,
      difficulty: Difficulty::Easy,
      title: "t".into(),
      description: "d".into(),
      code: "a\nb".into(),
      bug_line: 2,
      solution: "s".into(),
      explanation: "e".into(),
    };
    assert_eq!(selection_verdict(&level, None, GameStatus::Playing), None);
    assert_eq!(selection_verdict(&level, Some(1), GameStatus::Playing), Some(false));
    assert_eq!(selection_verdict(&level, Some(2), GameStatus::LevelComplete), Some(true));
    assert_eq!(selection_verdict(&level, Some(2), GameStatus::Playing), None);
  }

  #[test]
  fn outcome_messages() {
    let wrong = GuessOutcome::Wrong { lives_left: 2, game_over: false };
    assert_eq!(wrong.terminal_message(), Some(TERMINAL_FAILURE));
    assert!(!wrong.is_correct());
    assert_eq!(GuessOutcome::Ignored { status: GameStatus::Idle }.terminal_message(), None);
    let v = serde_json::to_value(&wrong).unwrap();
    assert_eq!(v["result"], "wrong");
    assert_eq!(v["lives_left"], 2);
  }
}
