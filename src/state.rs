//! Session state: the single owner of game progress for one signed-in player.
//!
//! This module owns:
//!   - the level catalog (built once per session)
//!   - the `GameState` (score, streak, lives, current level, status)
//!   - the completed-level set
//!   - per-level transient state (selected line)
//!   - the progress store and the signed-in user
//!
//! Every operation runs to completion synchronously. After each mutation the
//! progress is written to the store while a user is signed in; store failures
//! are logged and the in-memory state stays authoritative.

use std::collections::BTreeSet;

use tracing::{debug, error, info, instrument, warn};

use crate::catalog::Catalog;
use crate::config::{GameConfig, SessionCfg};
use crate::domain::{GameState, GameStatus, Language, Level, User};
use crate::logic::{apply_failure, apply_success, selection_verdict, GuessOutcome, SuccessFeedback};
use crate::profile::{checklist, ProfileSummary};
use crate::protocol::{Hud, ProgressRecord, ViewEvent, ViewUpdate};
use crate::store::{FileKv, LocalStore, ProgressStore};
use crate::util::{line_at, trunc_for_log};

pub const CATALOG_DONE_NOTICE: &str = "You've completed all levels for this language!";

/// Result of moving to the next level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    Moved { level_id: u32 },
    /// No level after the current one. Nothing changed.
    Exhausted { language: Language },
}

pub struct Session<S: ProgressStore> {
    catalog: Catalog,
    store: S,
    user: Option<User>,
    language: Language,
    state: GameState,
    completed: BTreeSet<u32>,
    selected_line: Option<usize>,
    initial_lives: u32,
}

impl<S: ProgressStore> Session<S> {
    /// Start a session: point at the first level of the initial language and,
    /// if the store remembers a user, sign them back in with their progress.
    #[instrument(level = "info", skip_all, fields(language = %cfg.initial_language))]
    pub fn start(catalog: Catalog, store: S, cfg: &SessionCfg) -> Self {
        let language = cfg.initial_language;
        let first_id = catalog.first(language).map(|l| l.id).unwrap_or_default();
        let state = GameState {
            lives: cfg.initial_lives,
            current_level_id: first_id,
            ..GameState::default()
        };

        let mut session = Self {
            catalog,
            store,
            user: None,
            language,
            state,
            completed: BTreeSet::new(),
            selected_line: None,
            initial_lives: cfg.initial_lives,
        };

        let remembered = match session.store.load_user() {
            Ok(user) => user,
            Err(e) => {
                warn!(target: "store", error = %e, "Could not read saved user; starting signed out.");
                None
            }
        };
        if let Some(user) = remembered {
            info!(target: "session", username = %user.username, "Restoring remembered user");
            session.begin(user);
        } else {
            info!(target: "session", "No saved user; session idle until sign-in");
        }
        session
    }

    /// Catalog from config, then `start`.
    pub fn from_config(cfg: &GameConfig, store: S) -> Self {
        Self::start(Catalog::from_config(cfg), store, &cfg.session)
    }

    // -------- identity --------

    /// Sign a user in (login or signup): remember them and restore their saved
    /// progress, then enter the current level.
    #[instrument(level = "info", skip(self, user), fields(username = %user.username))]
    pub fn sign_in(&mut self, user: User) {
        if let Err(e) = self.store.save_user(&user) {
            error!(target: "store", error = %e, "Failed to save user");
        }
        self.begin(user);
    }

    /// Forget the identity. Saved progress stays in the store.
    #[instrument(level = "info", skip(self))]
    pub fn sign_out(&mut self) {
        if let Err(e) = self.store.logout_user() {
            error!(target: "store", error = %e, "Failed to clear saved user");
        }
        if let Some(user) = self.user.take() {
            info!(target: "session", username = %user.username, "Signed out");
        }
        self.selected_line = None;
        self.state.game_status = GameStatus::Idle;
    }

    fn begin(&mut self, user: User) {
        self.user = Some(user);
        self.completed.clear();
        self.state.score = 0;
        self.state.streak = 0;
        self.state.lives = self.initial_lives;
        match self.store.load_progress() {
            Ok(Some(record)) => self.restore(record),
            Ok(None) => debug!(target: "session", "No saved progress; fresh state"),
            Err(e) => warn!(target: "store", error = %e, "Saved progress unreadable; treating as not yet persisted."),
        }
        self.enter_level(self.state.current_level_id);
    }

    fn restore(&mut self, record: ProgressRecord) {
        info!(target: "session", completed = record.completed_levels.len(), score = record.score, streak = record.streak, lives = record.lives, "Progress restored");
        self.completed = record.completed_levels;
        self.state.score = record.score;
        self.state.streak = record.streak;
        self.state.lives = record.lives;
    }

    // -------- navigation --------

    /// Make `id` the active level of the current language. Unknown ids are
    /// ignored (returns false). Score, streak and lives are untouched. Play
    /// starts only for a signed-in user.
    #[instrument(level = "debug", skip(self))]
    pub fn select_level(&mut self, id: u32) -> bool {
        if self.catalog.find(self.language, id).is_none() {
            warn!(target: "session", language = %self.language, id, "Level not in catalog; selection ignored");
            return false;
        }
        self.enter_level(id);
        self.persist();
        true
    }

    /// Switch language and jump to its first level. Session-global numbers carry over.
    #[instrument(level = "debug", skip(self))]
    pub fn change_language(&mut self, language: Language) {
        self.language = language;
        match self.catalog.first(language).map(|l| l.id) {
            Some(id) => self.enter_level(id),
            None => warn!(target: "session", %language, "Catalog has no levels for language"),
        }
        self.persist();
    }

    /// Next level in catalog order. At the end the session stays where it is.
    #[instrument(level = "debug", skip(self))]
    pub fn advance_level(&mut self) -> Advance {
        match self.catalog.next_after(self.language, self.state.current_level_id).map(|l| l.id) {
            Some(id) => {
                self.enter_level(id);
                self.persist();
                Advance::Moved { level_id: id }
            }
            None => {
                info!(target: "session", language = %self.language, level = self.state.current_level_id, "End of catalog");
                Advance::Exhausted { language: self.language }
            }
        }
    }

    /// Replay the current level: clear the selection, back to playing.
    pub fn retry(&mut self) {
        self.enter_level(self.state.current_level_id);
        self.persist();
    }

    /// Explicit session reset: refill lives and clear score and streak.
    /// Completed levels are kept.
    #[instrument(level = "info", skip(self))]
    pub fn restart(&mut self) {
        self.state.score = 0;
        self.state.streak = 0;
        self.state.lives = self.initial_lives;
        self.enter_level(self.state.current_level_id);
        self.persist();
    }

    pub fn pause(&mut self) {
        if self.state.game_status == GameStatus::Playing {
            self.state.game_status = GameStatus::Paused;
            self.persist();
        }
    }

    pub fn resume(&mut self) {
        if self.state.game_status == GameStatus::Paused {
            self.state.game_status = GameStatus::Playing;
            self.persist();
        }
    }

    /// Signed out, the level can still be browsed but play stays idle.
    fn enter_level(&mut self, id: u32) {
        self.state.current_level_id = id;
        self.selected_line = None;
        self.state.game_status = if self.user.is_some() { GameStatus::Playing } else { GameStatus::Idle };
        debug!(target: "session", language = %self.language, level = id, "Level entered");
    }

    // -------- scoring --------

    /// Click on a 1-based line of the current level. Only counts while playing.
    #[instrument(level = "debug", skip(self))]
    pub fn guess_line(&mut self, line: usize) -> GuessOutcome {
        if self.state.game_status != GameStatus::Playing {
            debug!(target: "session", status = self.state.game_status.as_str(), line, "Guess ignored outside playing");
            return GuessOutcome::Ignored { status: self.state.game_status };
        }
        let Some(level) = self.catalog.find(self.language, self.state.current_level_id) else {
            warn!(target: "session", level = self.state.current_level_id, "Current level missing from catalog; guess ignored");
            return GuessOutcome::Ignored { status: self.state.game_status };
        };
        let bug_line = level.bug_line;
        let feedback = SuccessFeedback::for_level(level);
        let clicked = line_at(&level.code, line).map(|t| trunc_for_log(t.trim(), 60)).unwrap_or_default();
        debug!(target: "session", level = level.id, line, %clicked, "Line clicked");

        self.selected_line = Some(line);
        let outcome = if line == bug_line {
            let points = apply_success(&mut self.state);
            let first_completion = self.completed.insert(self.state.current_level_id);
            info!(target: "session", level = self.state.current_level_id, points, streak = self.state.streak, score = self.state.score, "Bug found");
            GuessOutcome::Correct { points, first_completion, feedback }
        } else {
            apply_failure(&mut self.state);
            let game_over = self.state.game_status == GameStatus::Gameover;
            info!(target: "session", level = self.state.current_level_id, line, lives = self.state.lives, score = self.state.score, game_over, "Wrong line");
            GuessOutcome::Wrong { lives_left: self.state.lives, game_over }
        };
        self.persist();
        outcome
    }

    // -------- persistence --------

    fn persist(&mut self) {
        if self.user.is_none() {
            return;
        }
        if let Err(e) = self.store.save_progress(&self.completed, &self.state) {
            warn!(target: "store", error = %e, "Failed to save progress; keeping in-memory state");
        }
    }

    // -------- view dispatch --------

    /// Apply one view event and describe what the view should show next.
    #[instrument(level = "debug", skip(self))]
    pub fn handle(&mut self, event: ViewEvent) -> ViewUpdate {
        let before = self.state.current_level_id;
        let before_lang = self.language;
        let mut outcome = None;
        let mut notice = None;
        let mut reloaded = false;

        match event {
            ViewEvent::LineClicked { line } => outcome = Some(self.guess_line(line)),
            ViewEvent::LevelSelected { level_id } => reloaded = self.select_level(level_id),
            ViewEvent::LanguageSelected { language } => {
                self.change_language(language);
                reloaded = true;
            }
            ViewEvent::Retry => {
                self.retry();
                reloaded = true;
            }
            ViewEvent::NextLevel => match self.advance_level() {
                Advance::Moved { .. } => reloaded = true,
                Advance::Exhausted { .. } => notice = Some(CATALOG_DONE_NOTICE.to_string()),
            },
            ViewEvent::Restart => {
                self.restart();
                reloaded = true;
            }
        }

        let level_changed = reloaded || before != self.state.current_level_id || before_lang != self.language;
        let terminal = outcome.as_ref().and_then(|o| o.terminal_message()).map(str::to_string);
        ViewUpdate { hud: self.hud(), level_changed, outcome, terminal, notice }
    }

    // -------- read side --------

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.score,
            streak: self.state.streak,
            lives: self.state.lives,
            status: self.state.game_status,
            language: self.language,
            level_id: self.state.current_level_id,
            completed: self.completed.len(),
        }
    }

    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn completed(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    pub fn selected_line(&self) -> Option<usize> {
        self.selected_line
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.catalog.find(self.language, self.state.current_level_id)
    }

    /// Level list of the active language, in navigation order.
    pub fn levels(&self) -> &[Level] {
        self.catalog.levels_for(self.language)
    }

    /// Editor highlight for the selected line.
    pub fn verdict(&self) -> Option<bool> {
        let level = self.current_level()?;
        selection_verdict(level, self.selected_line, self.state.game_status)
    }

    /// `(done, total)` for the active language's checklist.
    pub fn checklist(&self) -> (usize, usize) {
        checklist(self.levels(), &self.completed)
    }

    pub fn profile(&self) -> Option<ProfileSummary> {
        let user = self.user.as_ref()?;
        Some(ProfileSummary::build(user, &self.state, &self.completed))
    }
}

impl Session<LocalStore<FileKv>> {
    /// Session over the configured storage directory.
    pub fn open(cfg: &GameConfig) -> Self {
        Self::from_config(cfg, LocalStore::from_config(&cfg.storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_levels;
    use crate::store::{KeyValueStore, LocalStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn python_session() -> Session<LocalStore<crate::store::MemoryKv>> {
        let catalog = Catalog::build(&seed_levels(), &mut StdRng::seed_from_u64(1));
        let cfg = SessionCfg { initial_language: Language::Python, initial_lives: 3 };
        let mut s = Session::start(catalog, LocalStore::in_memory(), &cfg);
        s.sign_in(User::new("tester", None, 1).unwrap());
        s
    }

    #[test]
    fn starts_idle_without_saved_user() {
        let catalog = Catalog::build(&seed_levels(), &mut StdRng::seed_from_u64(1));
        let s = Session::start(catalog, LocalStore::in_memory(), &SessionCfg::default());
        assert_eq!(s.game_state().game_status, GameStatus::Idle);
        assert_eq!(s.game_state().current_level_id, 1);
        assert!(s.user().is_none());
    }

    #[test]
    fn guesses_outside_playing_change_nothing() {
        let mut s = python_session();
        assert!(s.guess_line(2).is_correct());
        let snapshot = s.game_state().clone();
        assert_eq!(s.guess_line(1), GuessOutcome::Ignored { status: GameStatus::LevelComplete });
        assert_eq!(s.game_state(), &snapshot);

        s.retry();
        s.pause();
        assert_eq!(s.guess_line(1), GuessOutcome::Ignored { status: GameStatus::Paused });
        s.resume();
        assert_eq!(s.game_state().game_status, GameStatus::Playing);
    }

    #[test]
    fn handle_reports_exhaustion_as_notice() {
        let mut s = python_session();
        let last = s.levels().last().map(|l| l.id).unwrap();
        assert!(s.select_level(last));
        let before = s.hud();
        let update = s.handle(ViewEvent::NextLevel);
        assert_eq!(update.notice.as_deref(), Some(CATALOG_DONE_NOTICE));
        assert!(!update.level_changed);
        assert_eq!(update.hud, before);
    }

    #[test]
    fn signed_out_navigation_stays_idle() {
        let catalog = Catalog::build(&seed_levels(), &mut StdRng::seed_from_u64(1));
        let cfg = SessionCfg { initial_language: Language::Python, initial_lives: 3 };
        let mut s = Session::start(catalog, LocalStore::in_memory(), &cfg);
        assert!(s.select_level(7));
        s.change_language(Language::Css);
        s.retry();
        assert_eq!(s.game_state().game_status, GameStatus::Idle);
        assert_eq!(s.game_state().current_level_id, 71);
        assert_eq!(s.guess_line(1), GuessOutcome::Ignored { status: GameStatus::Idle });
    }

    #[test]
    fn sign_in_without_saved_progress_starts_fresh() {
        let mut s = python_session();
        assert!(s.guess_line(2).is_correct());
        s.sign_out();
        s.store.backend_mut().remove(crate::store::PROGRESS_KEY).unwrap();

        s.sign_in(User::new("second", None, 2).unwrap());
        let st = s.game_state();
        assert_eq!((st.score, st.streak, st.lives), (0, 0, 3));
        assert!(s.completed().is_empty());
        assert_eq!(st.game_status, GameStatus::Playing);
    }

    #[test]
    fn unknown_level_selection_is_ignored() {
        let mut s = python_session();
        assert!(!s.select_level(1));
        assert_eq!(s.game_state().current_level_id, 6);
    }
}
