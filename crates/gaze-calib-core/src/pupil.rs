use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Pupil centre in camera-frame pixels.
pub type PupilPoint = Point2<f64>;

/// Integer display coordinates (pixels, origin top-left).
pub type ScreenPoint = Point2<i32>;

/// Which eye a reading belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Left,
    /// Calibration convention: the right pupil drives the mapping.
    #[default]
    Right,
}

/// Pupil positions reported by a detector for one video frame.
///
/// Either pupil may be absent (blink, face out of frame, detector miss).
/// Absence is never encoded as a coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PupilObservation {
    #[serde(default)]
    pub left: Option<PupilPoint>,
    #[serde(default)]
    pub right: Option<PupilPoint>,
}

impl PupilObservation {
    pub fn new(left: Option<PupilPoint>, right: Option<PupilPoint>) -> Self {
        Self { left, right }
    }

    /// Observation with only the right pupil resolved.
    pub fn right(x: f64, y: f64) -> Self {
        Self {
            left: None,
            right: Some(Point2::new(x, y)),
        }
    }

    /// Observation where neither pupil was found.
    pub fn absent() -> Self {
        Self::default()
    }

    #[inline]
    pub fn eye(&self, eye: Eye) -> Option<PupilPoint> {
        match eye {
            Eye::Left => self.left,
            Eye::Right => self.right,
        }
    }
}

/// External pupil detector.
///
/// Frame acquisition and pupil localisation live outside this workspace; a
/// driver wraps whatever detector it uses in this trait and feeds the result
/// into the calibration session.
pub trait PupilSource {
    type Frame: ?Sized;

    /// Locate both pupils in `frame`.
    fn locate(&mut self, frame: &Self::Frame) -> PupilObservation;
}
