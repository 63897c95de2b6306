use gaze_calib_core::PupilPoint;
use serde::{Deserialize, Serialize};

use crate::sequencer::{CalibrationTarget, TARGET_COUNT};

/// A calibration target paired with the pupil reading captured for it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub target: CalibrationTarget,
    pub pupil: Option<PupilPoint>,
}

/// Per-target pupil samples of the current calibration attempt.
///
/// Every tick inside a target's window overwrites that target's sample, so
/// the reading seen last before the window closed is the one kept. An
/// absent reading overwrites too: a sample is valid only if the pupil was
/// resolved at the end of the window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleCollector {
    pupils: [Option<PupilPoint>; TARGET_COUNT],
}

impl SampleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `reading` for the 1-based target `index`.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn record(&mut self, index: u8, reading: Option<PupilPoint>) -> bool {
        match usize::from(index)
            .checked_sub(1)
            .and_then(|i| self.pupils.get_mut(i))
        {
            Some(slot) => {
                *slot = reading;
                true
            }
            None => false,
        }
    }

    pub fn pupil(&self, index: u8) -> Option<PupilPoint> {
        let i = usize::from(index).checked_sub(1)?;
        self.pupils.get(i).copied().flatten()
    }

    /// 1-based indices of targets without a pupil sample.
    pub fn missing(&self) -> Vec<u8> {
        self.pupils
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(i, _)| i as u8 + 1)
            .collect()
    }

    /// All five samples, or `None` if any is absent.
    pub fn complete(&self) -> Option<[PupilPoint; TARGET_COUNT]> {
        let mut out = [PupilPoint::origin(); TARGET_COUNT];
        for (dst, src) in out.iter_mut().zip(&self.pupils) {
            *dst = (*src)?;
        }
        Some(out)
    }

    pub fn clear(&mut self) {
        self.pupils = [None; TARGET_COUNT];
    }

    /// Samples so far, paired with their targets.
    pub fn samples(&self, targets: &[CalibrationTarget; TARGET_COUNT]) -> [Sample; TARGET_COUNT] {
        std::array::from_fn(|i| Sample {
            target: targets[i],
            pupil: self.pupils[i],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalibrationSequencer, ScreenLayout, DEFAULT_PHASE_DURATION};

    fn p(x: f64, y: f64) -> Option<PupilPoint> {
        Some(PupilPoint::new(x, y))
    }

    #[test]
    fn last_reading_in_window_wins() {
        let mut c = SampleCollector::new();
        assert!(c.record(2, p(1.0, 1.0)));
        assert!(c.record(2, p(5.0, 6.0)));
        assert_eq!(c.pupil(2), p(5.0, 6.0));
    }

    #[test]
    fn absent_reading_overwrites() {
        let mut c = SampleCollector::new();
        c.record(3, p(1.0, 1.0));
        c.record(3, None);
        assert_eq!(c.pupil(3), None);
        assert!(c.missing().contains(&3));
    }

    #[test]
    fn complete_requires_all_five() {
        let mut c = SampleCollector::new();
        for k in 1..=4 {
            c.record(k, p(f64::from(k), 0.0));
        }
        assert!(c.complete().is_none());
        assert_eq!(c.missing(), vec![5]);

        c.record(5, p(5.0, 0.0));
        let all = c.complete().expect("complete");
        assert_eq!(all[4], PupilPoint::new(5.0, 0.0));
        assert!(c.missing().is_empty());
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut c = SampleCollector::new();
        assert!(!c.record(0, p(1.0, 1.0)));
        assert!(!c.record(6, p(1.0, 1.0)));
        assert_eq!(c.missing().len(), TARGET_COUNT);
    }

    #[test]
    fn clear_drops_everything_and_samples_pair_targets() {
        let seq = CalibrationSequencer::new(&ScreenLayout::default(), DEFAULT_PHASE_DURATION)
            .expect("sequencer");
        let mut c = SampleCollector::new();
        c.record(1, p(10.0, 20.0));

        let samples = c.samples(seq.targets());
        assert_eq!(samples[0].target.index, 1);
        assert_eq!(samples[0].pupil, p(10.0, 20.0));
        assert_eq!(samples[1].pupil, None);

        c.clear();
        assert_eq!(c, SampleCollector::new());
    }
}
