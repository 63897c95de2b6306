//! Five-point gaze calibration session.
//!
//! A session shows five fixation targets one after another, each for a fixed
//! phase duration, records the pupil position seen while each target is
//! active, fits a pupil-to-screen mapping in a dedicated fit window, and then
//! turns every new pupil reading into a screen point until recalibrated.
//!
//! The crate is tick driven: an external driver owns the camera and the
//! display and calls [`CalibrationController::tick`] once per frame.
//!
//! ```
//! use std::time::Duration;
//! use gaze_calib_session::{CalibrationController, SessionParams, TickInput};
//! use gaze_calib_core::PupilObservation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = CalibrationController::new(&SessionParams::default())?;
//! let mut session = controller.start(Duration::ZERO);
//!
//! let out = controller.tick(
//!     &mut session,
//!     &TickInput::new(Duration::from_millis(3500), PupilObservation::right(100.0, 100.0)),
//! );
//! assert_eq!(out.active_target, Some(1));
//! # Ok(())
//! # }
//! ```

mod clock;
mod collector;
mod controller;
mod estimator;
mod fitter;
mod io;
mod layout;
mod replay;
mod sequencer;
mod tracker;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use collector::{Sample, SampleCollector};
pub use controller::{
    CalibrationController, CalibrationState, ResetReason, SessionConfigError, SessionParams,
    SessionState, TickInput, TickOutput,
};
pub use estimator::{predict_screen_point, GazeEstimate, GazeEstimator};
pub use fitter::{CalibrationFit, CalibrationModel, MappingFitter};
pub use io::{ReplayReport, ReplaySummary, SessionIoError, TraceEntry};
pub use layout::ScreenLayout;
pub use replay::replay_trace;
pub use sequencer::{
    CalibrationSequencer, CalibrationTarget, Phase, PhaseWindow, DEFAULT_PHASE_DURATION,
    TARGET_COUNT,
};
pub use tracker::GazeTracker;
