//! High-level facade crate for the `gaze-calib-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the core types and the calibration session,
//! - (feature `cli`) the `gaze-calib` binary that prints the target layout
//!   and replays recorded pupil traces through a session.
//!
//! ## Quickstart
//!
//! ```
//! use gaze_calib::{GazeTracker, ManualClock, PupilObservation, SessionParams};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tracker = GazeTracker::new(&SessionParams::default(), ManualClock::default())?;
//!
//! tracker.clock().set(Duration::from_millis(3500));
//! let out = tracker.step(PupilObservation::right(100.0, 100.0), false);
//! println!("draw target {:?} at {:?}", out.active_target, out.target_position);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `gaze_calib::core`: point types, the `PupilSource` seam, OLS regression, logging.
//! - `gaze_calib::session`: sequencer, sample collector, mapping fit, estimator,
//!   controller state machine, replay I/O.

pub use gaze_calib_core as core;
pub use gaze_calib_session as session;

pub use gaze_calib_core::{Eye, PupilObservation, PupilPoint, PupilSource, ScreenPoint};
pub use gaze_calib_session::{
    CalibrationController, CalibrationState, Clock, GazeEstimate, GazeTracker, ManualClock,
    MonotonicClock, ResetReason, SessionParams, SessionState, TickInput, TickOutput,
};

/// Install logging for a binary: the `tracing` subscriber (bridging `log`
/// records) when the `tracing` feature is on, the stderr logger otherwise.
#[cfg(feature = "tracing")]
pub fn init_logging(verbose: bool) {
    let _ = tracing_log::LogTracer::init_with_filter(gaze_calib_core::level_for_verbosity(verbose));
    gaze_calib_core::init_tracing(gaze_calib_core::level_for_verbosity(verbose), false);
}

/// Install logging for a binary: the `tracing` subscriber (bridging `log`
/// records) when the `tracing` feature is on, the stderr logger otherwise.
#[cfg(not(feature = "tracing"))]
pub fn init_logging(verbose: bool) {
    let _ = gaze_calib_core::init_with_level(gaze_calib_core::level_for_verbosity(verbose));
}
