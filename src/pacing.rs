//! Cosmetic pacing for the view: scan highlight, typewriter terminal, delayed
//! success dialog.
//!
//! Nothing here gates game state. Each effect runs on a `SupersedingTimer`, so
//! a newer effect of the same kind cancels the pending one. Loading a level
//! cancels everything and starts the scan; a guess only types and, on success,
//! opens the dialog. Observers read the latest frame from `watch` channels,
//! including receivers subscribed after the fact.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::config::PacingCfg;
use crate::logic::{GuessOutcome, SuccessFeedback, TERMINAL_IDLE};
use crate::protocol::ViewUpdate;
use crate::util::trunc_for_log;

/// At most one pending task; scheduling again aborts the previous one.
#[derive(Debug, Default)]
pub struct SupersedingTimer {
    handle: Option<JoinHandle<()>>,
}

impl SupersedingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` after `delay`, replacing whatever was pending.
    pub fn schedule<F>(&mut self, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.run(async move {
            sleep(delay).await;
            f();
        });
    }

    /// Drive `fut` to completion unless superseded first.
    pub fn run<Fut>(&mut self, fut: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(fut));
    }

    pub fn cancel(&mut self) {
        if let Some(h) = self.handle.take() {
            h.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SupersedingTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Successive prefixes of `text`, one more character each.
pub fn typewriter_frames(text: &str) -> Vec<String> {
    text.char_indices()
        .map(|(i, c)| text[..i + c.len_utf8()].to_string())
        .collect()
}

/// Type `text` into `tx` one character per `interval`.
pub async fn reveal(text: String, interval: Duration, tx: watch::Sender<String>) {
    tx.send_replace(String::new());
    for frame in typewriter_frames(&text) {
        sleep(interval).await;
        tx.send_replace(frame);
    }
}

/// Turns `ViewUpdate`s into timed view effects.
pub struct Pacer {
    cfg: PacingCfg,
    scan_timer: SupersedingTimer,
    type_timer: SupersedingTimer,
    modal_timer: SupersedingTimer,
    terminal: watch::Sender<String>,
    scanning: watch::Sender<bool>,
    modal: watch::Sender<Option<SuccessFeedback>>,
}

impl Pacer {
    pub fn new(cfg: PacingCfg) -> Self {
        Self {
            cfg,
            scan_timer: SupersedingTimer::new(),
            type_timer: SupersedingTimer::new(),
            modal_timer: SupersedingTimer::new(),
            terminal: watch::channel(TERMINAL_IDLE.to_string()).0,
            scanning: watch::channel(false).0,
            modal: watch::channel(None).0,
        }
    }

    pub fn terminal(&self) -> watch::Receiver<String> {
        self.terminal.subscribe()
    }

    pub fn scanning(&self) -> watch::Receiver<bool> {
        self.scanning.subscribe()
    }

    pub fn modal(&self) -> watch::Receiver<Option<SuccessFeedback>> {
        self.modal.subscribe()
    }

    /// Must be called from inside a tokio runtime.
    pub fn apply(&mut self, update: &ViewUpdate) {
        if update.level_changed {
            self.reset();
            self.start_scan();
        }

        if let Some(outcome) = &update.outcome {
            if matches!(outcome, GuessOutcome::Ignored { .. }) {
                return;
            }
            if let Some(text) = &update.terminal {
                self.type_out(text.clone());
            }
            if let GuessOutcome::Correct { feedback, .. } = outcome {
                self.open_modal_later(feedback.clone());
            }
        }
    }

    /// Drop pending effects: idle terminal, closed dialog, no scan.
    pub fn reset(&mut self) {
        self.scan_timer.cancel();
        self.type_timer.cancel();
        self.modal_timer.cancel();
        self.scanning.send_replace(false);
        self.modal.send_replace(None);
        self.terminal.send_replace(TERMINAL_IDLE.to_string());
        trace!(target: "session", "Pacing reset");
    }

    fn start_scan(&mut self) {
        self.scanning.send_replace(true);
        let tx = self.scanning.clone();
        self.scan_timer.schedule(self.cfg.scan_delay(), move || {
            tx.send_replace(false);
        });
    }

    fn type_out(&mut self, text: String) {
        debug!(target: "session", text = %trunc_for_log(&text, 40), "Typing terminal line");
        let tx = self.terminal.clone();
        self.type_timer.run(reveal(text, self.cfg.type_interval(), tx));
    }

    fn open_modal_later(&mut self, feedback: SuccessFeedback) {
        let tx = self.modal.clone();
        self.modal_timer.schedule(self.cfg.modal_delay(), move || {
            tx.send_replace(Some(feedback));
        });
    }
}
