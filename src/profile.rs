//! Profile page data: badges and level-checklist progress.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{GameState, Level, User};

const ON_FIRE_STREAK: u32 = 10;
const SENIOR_DEV_COMPLETED: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
  BugHunter,
  OnFire,
  SeniorDev,
}

impl Badge {
  pub fn label(self) -> &'static str {
    match self {
      Badge::BugHunter => "Bug Hunter",
      Badge::OnFire => "On Fire",
      Badge::SeniorDev => "Senior Dev",
    }
  }
}

/// Everyone is a Bug Hunter; the other badges need a streak above 10 or more
/// than 20 completed levels.
pub fn badges(streak: u32, completed: usize) -> Vec<Badge> {
  let mut out = vec![Badge::BugHunter];
  if streak > ON_FIRE_STREAK {
    out.push(Badge::OnFire);
  }
  if completed > SENIOR_DEV_COMPLETED {
    out.push(Badge::SeniorDev);
  }
  out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
  pub username: String,
  pub email: Option<String>,
  pub avatar_id: u8,
  pub joined_at: DateTime<Utc>,
  pub bugs_fixed: usize,
  pub score: u32,
  pub streak: u32,
  pub badges: Vec<Badge>,
}

impl ProfileSummary {
  pub fn build(user: &User, state: &GameState, completed: &BTreeSet<u32>) -> Self {
    Self {
      username: user.username.clone(),
      email: user.email().map(str::to_string),
      avatar_id: user.avatar_id,
      joined_at: user.joined_at,
      bugs_fixed: completed.len(),
      score: state.score,
      streak: state.streak,
      badges: badges(state.streak, completed.len()),
    }
  }
}

/// `(done, total)` for a language's level list.
pub fn checklist(levels: &[Level], completed: &BTreeSet<u32>) -> (usize, usize) {
  let done = levels.iter().filter(|l| completed.contains(&l.id)).count();
  (done, levels.len())
}
