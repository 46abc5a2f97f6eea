use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// A [`DetectedPeak`] is a local intensity maximum located in a raw trace,
/// positioned by the pixel index of its apex along the sensor's dispersion
/// axis, with a `prominence` attribute measuring its height over the
/// surrounding baseline.
pub struct DetectedPeak {
    pub index: usize,
    pub intensity: f64,

    /// The height of this peak relative to the higher of the two lowest
    /// valleys separating it from the nearest higher terrain
    pub prominence: f64,
}

impl DetectedPeak {
    pub fn new(index: usize, intensity: f64, prominence: f64) -> Self {
        Self {
            index,
            intensity,
            prominence,
        }
    }
}

impl fmt::Display for DetectedPeak {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DetectedPeak({}, {}, {})",
            self.index, self.intensity, self.prominence
        )
    }
}
