//! Display geometry for the calibration targets.

use gaze_calib_core::ScreenPoint;
use serde::{Deserialize, Serialize};

use crate::controller::SessionConfigError;
use crate::sequencer::TARGET_COUNT;

/// Display size and the inset of the corner targets from the edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenLayout {
    pub width: i32,
    pub height: i32,
    pub margin: i32,
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            margin: 50,
        }
    }
}

impl ScreenLayout {
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        let fits = self.width > 0
            && self.height > 0
            && self.margin >= 0
            && self
                .margin
                .checked_mul(2)
                .is_some_and(|inset| inset <= self.width && inset <= self.height);
        if fits {
            Ok(())
        } else {
            Err(SessionConfigError::InvalidLayout {
                width: self.width,
                height: self.height,
                margin: self.margin,
            })
        }
    }

    /// Target positions in calibration order: top-left, top-right,
    /// bottom-right, bottom-left, centre.
    pub fn target_positions(&self) -> [ScreenPoint; TARGET_COUNT] {
        let (w, h, m) = (self.width, self.height, self.margin);
        [
            ScreenPoint::new(m, m),
            ScreenPoint::new(w - m, m),
            ScreenPoint::new(w - m, h - m),
            ScreenPoint::new(m, h - m),
            ScreenPoint::new(w / 2, h / 2),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_hd_window() {
        let positions = ScreenLayout::default().target_positions();
        assert_eq!(
            positions,
            [
                ScreenPoint::new(50, 50),
                ScreenPoint::new(1230, 50),
                ScreenPoint::new(1230, 670),
                ScreenPoint::new(50, 670),
                ScreenPoint::new(640, 360),
            ]
        );
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let layout = ScreenLayout {
            width: 100,
            height: 80,
            margin: 45,
        };
        assert!(matches!(
            layout.validate(),
            Err(SessionConfigError::InvalidLayout { margin: 45, .. })
        ));
        assert!(ScreenLayout::default().validate().is_ok());
    }

    #[test]
    fn huge_margin_is_rejected_without_overflow() {
        for margin in [i32::MAX, i32::MAX / 2 + 1, 2_000_000_000] {
            let layout = ScreenLayout {
                margin,
                ..ScreenLayout::default()
            };
            assert!(layout.validate().is_err(), "margin = {margin}");
        }

        let layout = ScreenLayout {
            width: i32::MAX,
            height: i32::MAX,
            margin: i32::MAX / 2,
        };
        assert!(layout.validate().is_ok());
    }
}
