//! Minimal stderr logger for calibration drivers.
//!
//! Prints `[elapsed LEVEL target] message`, where `elapsed` is measured from
//! logger installation. Calibration phases are a few seconds long, so the
//! elapsed prefix makes it easy to line log records up with phase windows.
//!
//! Records from the `gaze_calib*` crates pass at the requested level;
//! everything else (dependencies, test harnesses) is capped at `warn`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Target prefix shared by every crate of the workspace.
const WORKSPACE_TARGET: &str = "gaze_calib";

/// Level filter applied to records with `target`.
fn level_for_target(target: &str, level: LevelFilter) -> LevelFilter {
    if target.starts_with(WORKSPACE_TARGET) {
        level
    } else {
        level.min(LevelFilter::Warn)
    }
}

struct SessionLogger {
    level: LevelFilter,
    started: Instant,
}

impl SessionLogger {
    fn format(&self, level: Level, target: &str, args: &std::fmt::Arguments<'_>) -> String {
        format!(
            "[{:8.3}s {:>5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            level,
            short_target(target),
            args
        )
    }
}

impl Log for SessionLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= level_for_target(metadata.target(), self.level)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record.level(), record.target(), record.args());
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Last path segment of a log target (`gaze_calib_session::controller` -> `controller`).
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

static LOGGER: OnceLock<SessionLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter for the
/// workspace crates.
///
/// Calling this more than once is a no-op after the first successful
/// initialization; the first level wins.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| SessionLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Map a CLI `--verbose` flag onto a level filter.
pub fn level_for_verbosity(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// `EnvFilter` directives equivalent to the stderr logger's filtering.
#[cfg(feature = "tracing")]
fn tracing_directives(level: LevelFilter) -> String {
    let workspace = level.as_str().to_ascii_lowercase();
    let others = level.min(LevelFilter::Warn).as_str().to_ascii_lowercase();
    format!("{others},{WORKSPACE_TARGET}={workspace}")
}

/// Install a `tracing` subscriber. `RUST_LOG` takes precedence over `level`;
/// `json` switches to one flattened JSON object per event.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing_directives(level)));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
