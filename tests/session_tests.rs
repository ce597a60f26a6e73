use std::collections::BTreeSet;

use bughunter::config::SessionCfg;
use bughunter::logic::{TERMINAL_FAILURE, TERMINAL_SUCCESS};
use bughunter::profile::Badge;
use bughunter::seeds::seed_levels;
use bughunter::state::CATALOG_DONE_NOTICE;
use bughunter::store::PROGRESS_KEY;
use bughunter::{
    Advance, Catalog, GameState, GameStatus, GuessOutcome, KeyValueStore, Language, LocalStore, MemoryKv,
    ProgressRecord, ProgressStore, Session, StoreError, User, ViewEvent, GENERATED_ID_OFFSET,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn catalog() -> Catalog {
    Catalog::build(&seed_levels(), &mut StdRng::seed_from_u64(7))
}

fn cfg(language: Language) -> SessionCfg {
    SessionCfg { initial_language: language, initial_lives: 3 }
}

fn signed_in(language: Language) -> Session<LocalStore<MemoryKv>> {
    bughunter::telemetry::init_tracing();
    let mut s = Session::start(catalog(), LocalStore::in_memory(), &cfg(language));
    s.sign_in(User::new("neo", Some("neo@matrix.io"), 2).unwrap());
    s
}

fn wrong_line(s: &Session<LocalStore<MemoryKv>>) -> usize {
    let bug = s.current_level().unwrap().bug_line;
    if bug == 1 { 2 } else { 1 }
}

/// Store whose every call fails.
struct BrokenStore;

impl ProgressStore for BrokenStore {
    fn load_user(&self) -> Result<Option<User>, StoreError> {
        Err(StoreError::Backend("offline".into()))
    }
    fn save_user(&mut self, _: &User) -> Result<(), StoreError> {
        Err(StoreError::Backend("offline".into()))
    }
    fn logout_user(&mut self) -> Result<(), StoreError> {
        Err(StoreError::Backend("offline".into()))
    }
    fn load_progress(&self) -> Result<Option<ProgressRecord>, StoreError> {
        Err(StoreError::Backend("offline".into()))
    }
    fn save_progress(&mut self, _: &BTreeSet<u32>, _: &GameState) -> Result<(), StoreError> {
        Err(StoreError::Backend("offline".into()))
    }
}

#[test]
fn python_indentation_error_scores_100() {
    let mut s = signed_in(Language::Python);
    let level = s.current_level().unwrap();
    assert_eq!((level.id, level.title.as_str(), level.bug_line), (6, "Indentation Error", 2));

    let outcome = s.guess_line(2);
    match &outcome {
        GuessOutcome::Correct { points, first_completion, feedback } => {
            assert_eq!(*points, 100);
            assert!(*first_completion);
            assert_eq!(feedback.title, "Bug Squashed!");
        }
        other => panic!("expected a correct guess, got {other:?}"),
    }
    assert_eq!(outcome.terminal_message(), Some(TERMINAL_SUCCESS));
    assert_eq!(s.game_state().game_status, GameStatus::LevelComplete);
    assert_eq!(s.game_state().score, 100);
    assert_eq!(s.game_state().streak, 1);
    assert!(s.completed().contains(&6));
    assert_eq!(s.verdict(), Some(true));
}

#[test]
fn wrong_guess_on_fresh_session_floors_score() {
    let mut s = signed_in(Language::Javascript);
    let line = wrong_line(&s);
    let outcome = s.guess_line(line);
    assert_eq!(outcome, GuessOutcome::Wrong { lives_left: 2, game_over: false });
    let st = s.game_state();
    assert_eq!((st.lives, st.streak, st.score), (2, 0, 0));
    assert_eq!(st.game_status, GameStatus::Playing);
    assert_eq!(s.verdict(), Some(false));
}

#[test]
fn streak_bonus_counts_streak_before_guess() {
    let mut s = signed_in(Language::Javascript);
    let mut gained = Vec::new();
    for _ in 0..3 {
        let bug = s.current_level().unwrap().bug_line;
        let before = s.game_state().score;
        assert!(s.guess_line(bug).is_correct());
        gained.push(s.game_state().score - before);
        assert!(matches!(s.advance_level(), Advance::Moved { .. }));
    }
    assert_eq!(gained, vec![100, 150, 200]);

    let line = wrong_line(&s);
    s.guess_line(line);
    assert_eq!(s.game_state().streak, 0);
    assert_eq!(s.game_state().score, 450 - 50);
}

#[test]
fn replaying_a_completed_level_scores_but_does_not_duplicate() {
    let mut s = signed_in(Language::Python);
    assert!(s.guess_line(2).is_correct());
    s.retry();
    assert_eq!(s.game_state().game_status, GameStatus::Playing);
    match s.guess_line(2) {
        GuessOutcome::Correct { points, first_completion, .. } => {
            assert_eq!(points, 150);
            assert!(!first_completion);
        }
        other => panic!("expected a correct guess, got {other:?}"),
    }
    assert_eq!(s.completed().len(), 1);
    assert_eq!(s.game_state().score, 100 + 150);
}

#[test]
fn invariants_hold_over_long_guess_sequences() {
    let mut s = signed_in(Language::Rust);
    let mut lives_seen = s.game_state().lives;
    for i in 0..40usize {
        s.guess_line(i % 7 + 1);
        let st = s.game_state();
        assert!(st.lives <= lives_seen);
        assert!(st.lives <= 3);
        lives_seen = st.lives;
        if st.game_status == GameStatus::LevelComplete {
            s.advance_level();
        }
    }
}

#[test]
fn last_life_ends_in_gameover_until_restart() {
    let mut s = signed_in(Language::Javascript);
    for expected in [2, 1] {
        let line = wrong_line(&s);
        assert_eq!(s.guess_line(line), GuessOutcome::Wrong { lives_left: expected, game_over: false });
    }
    let line = wrong_line(&s);
    assert_eq!(s.guess_line(line), GuessOutcome::Wrong { lives_left: 0, game_over: true });
    assert_eq!(s.game_state().game_status, GameStatus::Gameover);

    let bug = s.current_level().unwrap().bug_line;
    assert_eq!(s.guess_line(bug), GuessOutcome::Ignored { status: GameStatus::Gameover });
    assert_eq!(s.game_state().score, 0);

    s.restart();
    let st = s.game_state();
    assert_eq!((st.lives, st.score, st.streak), (3, 0, 0));
    assert_eq!(st.game_status, GameStatus::Playing);
}

#[test]
fn select_level_is_idempotent_and_keeps_numbers() {
    let mut s = signed_in(Language::Javascript);
    let line = wrong_line(&s);
    s.guess_line(line);
    let numbers = (s.game_state().score, s.game_state().streak, s.game_state().lives);

    assert!(s.select_level(3));
    let once = (s.selected_line(), s.game_state().clone());
    assert!(s.select_level(3));
    let twice = (s.selected_line(), s.game_state().clone());
    assert_eq!(once, twice);
    assert_eq!(twice.0, None);
    assert_eq!(twice.1.game_status, GameStatus::Playing);
    assert_eq!((twice.1.score, twice.1.streak, twice.1.lives), numbers);
}

#[test]
fn language_change_keeps_session_numbers() {
    let mut s = signed_in(Language::Python);
    s.guess_line(2);
    s.change_language(Language::Css);
    assert_eq!(s.language(), Language::Css);
    assert_eq!(s.game_state().current_level_id, 71);
    assert_eq!(s.game_state().game_status, GameStatus::Playing);
    assert_eq!((s.game_state().score, s.game_state().streak), (100, 1));
    assert_eq!(s.selected_line(), None);

    s.change_language(Language::Kotlin);
    assert_eq!(s.game_state().current_level_id, GENERATED_ID_OFFSET);
}

#[test]
fn end_of_catalog_stops_without_change() {
    let mut s = signed_in(Language::Swift);
    let last = s.levels().last().unwrap().id;
    assert!(s.select_level(last));
    let before = s.game_state().clone();
    assert_eq!(s.advance_level(), Advance::Exhausted { language: Language::Swift });
    assert_eq!(s.game_state(), &before);

    let update = s.handle(ViewEvent::NextLevel);
    assert_eq!(update.notice.as_deref(), Some(CATALOG_DONE_NOTICE));
    assert_eq!(update.hud.level_id, last);
}

#[test]
fn view_events_drive_the_session() {
    let mut s = signed_in(Language::Python);
    let update = s.handle(ViewEvent::LineClicked { line: 1 });
    assert_eq!(update.terminal.as_deref(), Some(TERMINAL_FAILURE));
    assert!(!update.level_changed);
    assert_eq!(update.hud.lives, 2);

    let update = s.handle(ViewEvent::LineClicked { line: 2 });
    assert_eq!(update.terminal.as_deref(), Some(TERMINAL_SUCCESS));
    assert_eq!(update.hud.status, GameStatus::LevelComplete);

    let update = s.handle(ViewEvent::NextLevel);
    assert!(update.level_changed);
    assert_eq!(update.hud.level_id, 7);
    assert!(update.outcome.is_none());

    let update = s.handle(ViewEvent::LanguageSelected { language: Language::Html });
    assert_eq!(update.hud.level_id, 66);
    assert_eq!(update.hud.language, Language::Html);

    let update = s.handle(ViewEvent::LevelSelected { level_id: 9999 });
    assert!(!update.level_changed);
    assert_eq!(update.hud.level_id, 66);
}

#[test]
fn progress_is_saved_after_each_mutation() {
    let mut s = signed_in(Language::Python);
    s.guess_line(2);
    let raw = s.store().backend().get(PROGRESS_KEY).unwrap().unwrap();
    let rec: ProgressRecord = serde_json::from_str(&raw).unwrap();
    assert_eq!(rec.score, 100);
    assert_eq!(rec.completed_levels, BTreeSet::from([6]));
}

#[test]
fn no_play_and_nothing_saved_while_signed_out() {
    let mut s = Session::start(catalog(), LocalStore::in_memory(), &cfg(Language::Python));
    assert!(s.select_level(6));
    assert_eq!(s.guess_line(2), GuessOutcome::Ignored { status: GameStatus::Idle });
    assert_eq!(s.game_state().score, 0);
    assert!(s.store().backend().get(PROGRESS_KEY).unwrap().is_none());

    s.sign_in(User::new("switch", None, 1).unwrap());
    assert_eq!(s.game_state().game_status, GameStatus::Playing);
    assert!(s.guess_line(2).is_correct());
    assert_eq!(s.game_state().score, 100);
}

#[test]
fn sign_in_restores_saved_progress() {
    let mut store = LocalStore::in_memory();
    let user = User::new("trinity", None, 5).unwrap();
    store.save_user(&user).unwrap();
    let saved = GameState { score: 700, streak: 4, lives: 1, ..GameState::default() };
    store.save_progress(&BTreeSet::from([1, 2, 6]), &saved).unwrap();

    let s = Session::start(catalog(), store, &cfg(Language::Javascript));
    assert_eq!(s.user().map(|u| u.username.as_str()), Some("trinity"));
    let st = s.game_state();
    assert_eq!((st.score, st.streak, st.lives), (700, 4, 1));
    assert_eq!(st.game_status, GameStatus::Playing);
    assert_eq!(s.checklist(), (2, 50));
}

#[test]
fn sign_out_keeps_progress_in_store() {
    let mut s = signed_in(Language::Python);
    s.guess_line(2);
    s.sign_out();
    assert!(s.user().is_none());
    assert!(s.store().load_user().unwrap().is_none());
    assert_eq!(s.store().load_progress().unwrap().map(|p| p.score), Some(100));
    assert_eq!(s.game_state().game_status, GameStatus::Idle);
    assert_eq!(s.guess_line(2), GuessOutcome::Ignored { status: GameStatus::Idle });
}

#[test]
fn broken_store_never_breaks_the_game() {
    let mut s = Session::start(catalog(), BrokenStore, &cfg(Language::Python));
    assert!(s.user().is_none());
    s.sign_in(User::new("morpheus", None, 3).unwrap());
    assert_eq!(s.game_state().game_status, GameStatus::Playing);
    assert!(s.guess_line(2).is_correct());
    assert_eq!(s.game_state().score, 100);
    s.sign_out();
    assert!(s.user().is_none());
}

#[test]
fn profile_reports_badges() {
    let mut s = signed_in(Language::Python);
    s.guess_line(2);
    let profile = s.profile().unwrap();
    assert_eq!(profile.username, "neo");
    assert_eq!(profile.bugs_fixed, 1);
    assert_eq!(profile.badges, vec![Badge::BugHunter]);
}
