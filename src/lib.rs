//! `ramansignal` is a library for loading Raman spectroscopy data from
//! heterogeneous laboratory instruments into a single in-memory spectrum
//! representation, and for calibrating the raw pixel-indexed output of the
//! OpenRAMAN spectrometer onto a physical Raman shift axis.
//!
//! The calibration is a two-step procedure driven by reference spectra
//! acquired alongside the sample: a rough pixel-to-wavelength fit against
//! the known emission lines of a neon lamp, then a fine wavenumber
//! correction against the known Raman bands of acetonitrile. See
//! [`crate::calibrate`] for the full pipeline and [`Calibrator`] for its
//! entry point.
//!
//! # Usage
//! ```
//! use ramansignal::PeakFinder;
//!
//! let mut trace = vec![0.0f64; 64];
//! for (i, y) in trace.iter_mut().enumerate() {
//!     *y = 50.0 * (-((i as f64 - 20.0).powi(2)) / 8.0).exp()
//!         + 30.0 * (-((i as f64 - 44.0).powi(2)) / 8.0).exp();
//! }
//! let finder = PeakFinder::default();
//! let mut acc = Vec::new();
//! let count = finder.find_peaks(&trace, &mut acc);
//! assert_eq!(count, 2);
//! assert_eq!(acc[0].index, 20);
//! ```
//!
//! Calibrating an OpenRAMAN acquisition from disk:
//! ```no_run
//! use ramansignal::{Calibrator, RamanSpectrum};
//!
//! let spectrum = RamanSpectrum::from_openraman_csvfiles(
//!     "sample.csv",
//!     "neon.csv",
//!     "acetonitrile.csv",
//!     &Calibrator::default(),
//! ).unwrap();
//! for (wavenumber, intensity) in spectrum.iter() {
//!     println!("{wavenumber}\t{intensity}");
//! }
//! ```
pub mod calibrate;
pub mod fit;
pub mod matching;
pub mod peak;
pub mod peak_finder;
pub mod peak_statistics;
pub mod readers;
pub mod reference;
pub mod smooth;
pub mod spectrum;

#[cfg(test)]
mod test_data;

pub use crate::calibrate::{
    raman_shift_cm1, CalibrationError, Calibrator, CalibratorBuilder, ExcitationCalibration,
    ShiftCurve,
};
pub use crate::matching::{match_peaks, PeakMatch, PeakMatchError};
pub use crate::peak::DetectedPeak;
pub use crate::peak_finder::{find_peaks, PeakFinder, PeakFinderBuilder, PeakFinderError};
pub use crate::spectrum::{RamanSpectrum, SpectrumError};
