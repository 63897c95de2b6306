//! JSON configuration, replay trace and report helpers.

use std::{fs, path::Path};

use gaze_calib_core::{PupilObservation, PupilPoint};
use serde::{Deserialize, Serialize};

use crate::controller::{CalibrationState, SessionParams, TickOutput};

#[derive(thiserror::Error, Debug)]
pub enum SessionIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] crate::controller::SessionConfigError),
    #[error("trace entry {index}: timestamp {t} is negative, non-finite or earlier than the previous entry")]
    InvalidTimestamp { index: usize, t: f64 },
}

impl SessionParams {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SessionIoError> {
        let raw = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&raw)?;
        params.validate()?;
        Ok(params)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// One recorded frame of a replay trace.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Frame timestamp in seconds.
    pub t: f64,
    #[serde(default)]
    pub left: Option<PupilPoint>,
    #[serde(default)]
    pub right: Option<PupilPoint>,
    #[serde(default)]
    pub recalibrate: bool,
}

impl TraceEntry {
    #[inline]
    pub fn observation(&self) -> PupilObservation {
        PupilObservation::new(self.left, self.right)
    }

    /// Load a trace (JSON array of entries) from disk.
    pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<Self>, SessionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub ticks: usize,
    pub fits: usize,
    pub resets: usize,
    pub final_state: CalibrationState,
}

/// Result of replaying a trace through a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub params: SessionParams,
    pub summary: ReplaySummary,
    pub ticks: Vec<TickOutput>,
}

impl ReplayReport {
    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SessionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionIoError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SessionIoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
