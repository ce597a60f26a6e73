//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! Behavior:
//! - LOG_LEVEL controls the filter (e.g. "debug" or detailed directives like
//!   "info,bughunter=debug,session=debug,catalog=info,store=info").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Notes:
//! - Targets are included in the output; the engine logs under `bughunter`,
//!   `catalog`, `session` and `store`.
//! - Safe to call more than once (tests, embedding apps): a subscriber that is
//!   already installed wins.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,bughunter=debug,session=debug,catalog=info,store=info";

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // JSON vs pretty are different subscriber types; install each on its own arm.
    let installed = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init(),
        _ => builder.try_init(),
    };
    if installed.is_err() {
        tracing::debug!(target: "bughunter", "Tracing subscriber already installed");
    }
}
