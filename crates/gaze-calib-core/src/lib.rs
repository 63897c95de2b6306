//! Core types and numerics for pupil-to-screen gaze calibration.
//!
//! This crate is intentionally small. It knows nothing about time, phases or
//! calibration sessions: it provides the point types shared by the workspace,
//! the [`PupilSource`] seam for external pupil detectors, and the ordinary
//! least-squares regression used to map pupil positions onto the display.

mod logger;
mod pupil;
mod regression;

pub use pupil::{Eye, PupilObservation, PupilPoint, PupilSource, ScreenPoint};
pub use regression::{
    FitDiagnostics, LinearModel, LinearRegression, RegressionError, RegressionFit,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_for_verbosity};
