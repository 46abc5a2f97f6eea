//! Algorithm for locating local intensity maxima in a 1D trace by their
//! topographic prominence.
//!
use log::debug;

use thiserror::Error;

use crate::peak::DetectedPeak;
use crate::peak_statistics::prominence_of;

/// All the ways peak finding can fail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PeakFinderError {
    #[error("Found {found} peaks but at least {required} are required")]
    InsufficientPeaks { found: usize, required: usize },
}

/// A peak finder for 1D intensity traces.
///
/// A point qualifies as a peak when it strictly exceeds its left neighbor,
/// is at least as high as its right neighbor (a flat apex resolves to its
/// left edge), and clears both thresholds. The first and last samples of a
/// trace are never reported as peaks.
#[derive(Debug, Clone, Default)]
pub struct PeakFinder {
    /// Minimum topographic prominence a local maximum must clear to be reported
    pub prominence_threshold: f64,
    /// Minimum absolute intensity at the apex
    pub intensity_threshold: f64,
}

/// A builder for configuring [`PeakFinder`]
#[derive(Debug, Clone, Default)]
pub struct PeakFinderBuilder {
    prominence_threshold: f64,
    intensity_threshold: f64,
}

impl PeakFinderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prominence_threshold(&mut self, prominence_threshold: f64) -> &mut Self {
        self.prominence_threshold = prominence_threshold;
        self
    }

    pub fn intensity_threshold(&mut self, intensity_threshold: f64) -> &mut Self {
        self.intensity_threshold = intensity_threshold;
        self
    }

    pub fn build(self) -> PeakFinder {
        PeakFinder::new(self.prominence_threshold, self.intensity_threshold)
    }
}

impl From<PeakFinderBuilder> for PeakFinder {
    fn from(value: PeakFinderBuilder) -> Self {
        value.build()
    }
}

impl PeakFinder {
    /// Create a new peak finder
    pub fn new(prominence_threshold: f64, intensity_threshold: f64) -> Self {
        Self {
            prominence_threshold,
            intensity_threshold,
        }
    }

    fn is_apex(&self, prev: f64, cur: f64, next: f64) -> bool {
        (prev < cur) && (cur >= next)
    }

    /// Find peaks in `intensity_array`, pushing new peaks into
    /// `peak_accumulator` in apex order.
    ///
    /// Returns the number of peaks found.
    pub fn find_peaks(
        &self,
        intensity_array: &[f64],
        peak_accumulator: &mut Vec<DetectedPeak>,
    ) -> usize {
        let m = peak_accumulator.len();
        if intensity_array.len() < 3 {
            return 0;
        }

        for index in 1..intensity_array.len() - 1 {
            let current_intensity = intensity_array[index];
            let last_intensity = intensity_array[index - 1];
            let next_intensity = intensity_array[index + 1];

            if self.is_apex(last_intensity, current_intensity, next_intensity)
                && (current_intensity >= self.intensity_threshold)
            {
                let prominence = prominence_of(intensity_array, index);
                if prominence >= self.prominence_threshold {
                    peak_accumulator.push(DetectedPeak::new(index, current_intensity, prominence));
                }
            }
        }
        peak_accumulator.len() - m
    }

    /// Find the `count` most prominent peaks in `intensity_array`, returned
    /// in apex order.
    ///
    /// Where the raw peak count exceeds `count`, the lowest prominence peaks
    /// are discarded first, breaking ties in favor of the lower pixel index.
    /// Fails with [`PeakFinderError::InsufficientPeaks`] when the trace does
    /// not contain enough qualifying maxima, signalling that calibration
    /// cannot proceed on this input.
    pub fn n_most_prominent(
        &self,
        intensity_array: &[f64],
        count: usize,
    ) -> Result<Vec<DetectedPeak>, PeakFinderError> {
        let mut acc = Vec::new();
        let found = self.find_peaks(intensity_array, &mut acc);
        if found < count {
            return Err(PeakFinderError::InsufficientPeaks {
                found,
                required: count,
            });
        }
        debug!("Found {found} candidate peaks, keeping the {count} most prominent");
        acc.sort_by(|a, b| {
            b.prominence
                .total_cmp(&a.prominence)
                .then(a.index.cmp(&b.index))
        });
        acc.truncate(count);
        acc.sort_by_key(|peak| peak.index);
        Ok(acc)
    }
}

/// A convenience function that uses a default peak finder configuration to
/// find every local maximum in `intensity_array`.
pub fn find_peaks(intensity_array: &[f64]) -> Vec<DetectedPeak> {
    let finder = PeakFinder::default();
    let mut acc = Vec::new();
    finder.find_peaks(intensity_array, &mut acc);
    acc
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::synthetic_trace;
    use rstest::rstest;

    #[test]
    fn test_find_peaks_simple() {
        let trace = [0.0, 1.0, 4.0, 1.0, 0.5, 3.0, 0.5, 0.0];
        let peaks = find_peaks(&trace);
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].index, 2);
        assert_eq!(peaks[1].index, 5);
        assert!((peaks[0].prominence - 4.0).abs() < 1e-12);
        assert!((peaks[1].prominence - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_edges_never_peaks() {
        let trace = [5.0, 1.0, 0.0, 1.0, 7.0];
        assert!(find_peaks(&trace).is_empty());
    }

    #[test]
    fn test_plateau_resolves_to_left_edge() {
        let trace = [0.0, 2.0, 2.0, 0.0];
        let peaks = find_peaks(&trace);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].index, 1);
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::short(&[1.0, 2.0])]
    #[case::flat(&[1.0, 1.0, 1.0, 1.0])]
    fn test_degenerate_traces(#[case] trace: &[f64]) {
        assert!(find_peaks(trace).is_empty());
    }

    #[test]
    fn test_prominence_threshold_filters() {
        let trace = [0.0, 1.0, 4.0, 1.0, 0.5, 3.0, 0.5, 0.0];
        let finder = PeakFinder::new(3.0, 0.0);
        let mut acc = Vec::new();
        let count = finder.find_peaks(&trace, &mut acc);
        assert_eq!(count, 1);
        assert_eq!(acc[0].index, 2);
    }

    #[test]
    fn test_n_most_prominent_selects_and_reorders() {
        let trace = synthetic_trace(256, &[(40.0, 10.0), (120.0, 50.0), (200.0, 30.0)]);
        let finder = PeakFinder::default();
        let peaks = finder.n_most_prominent(&trace, 2).expect("enough peaks");
        assert_eq!(peaks.len(), 2);
        // The weakest peak at pixel 40 is dropped and the survivors come
        // back in apex order, not prominence order.
        assert_eq!(peaks[0].index, 120);
        assert_eq!(peaks[1].index, 200);
    }

    #[test]
    fn test_n_most_prominent_insufficient() {
        let trace = synthetic_trace(256, &[(40.0, 10.0), (120.0, 50.0)]);
        let finder = PeakFinder::default();
        let err = finder.n_most_prominent(&trace, 5).unwrap_err();
        assert_eq!(
            err,
            PeakFinderError::InsufficientPeaks {
                found: 2,
                required: 5
            }
        );
    }
}
