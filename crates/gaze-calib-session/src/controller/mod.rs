//! Calibration state machine.
//!
//! This module wires together target sequencing, sample capture, the
//! mapping fit and live gaze estimation into one per-tick transition.

mod error;
mod params;
mod pipeline;
mod result;
mod state;

pub use error::{ResetReason, SessionConfigError};
pub use params::SessionParams;
pub use pipeline::CalibrationController;
pub use result::{TickInput, TickOutput};
pub use state::{CalibrationState, SessionState};
