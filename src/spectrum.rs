//! The unified in-memory representation for Raman spectra, regardless of
//! which instrument produced them.
use std::path::Path;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calibrate::{CalibrationError, Calibrator};
use crate::readers::{
    read_horiba_txt, read_openraman_csv, read_renishaw_csv, read_wasatch_csv, ReaderError,
};
use crate::smooth::{median_filter, MedianFilterError};

/// All the ways loading a spectrum can fail
#[derive(Debug, Error)]
pub enum SpectrumError {
    #[error(transparent)]
    Reader(#[from] ReaderError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// A calibrated Raman spectrum: paired wavenumber (cm⁻¹) and intensity
/// arrays of equal length.
///
/// The transformation methods all return a new spectrum rather than
/// mutating in place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RamanSpectrum {
    wavenumbers_cm1: Vec<f64>,
    intensities: Vec<f64>,
}

impl RamanSpectrum {
    pub fn new(wavenumbers_cm1: Vec<f64>, intensities: Vec<f64>) -> Self {
        debug_assert_eq!(wavenumbers_cm1.len(), intensities.len());
        Self {
            wavenumbers_cm1,
            intensities,
        }
    }

    /// Load and calibrate a spectrum from a CSV file output by the OpenRAMAN
    /// spectrometer, using companion neon and acetonitrile acquisitions.
    pub fn from_openraman_csvfiles<P: AsRef<Path>>(
        sample_path: P,
        neon_path: P,
        acetonitrile_path: P,
        calibrator: &Calibrator,
    ) -> Result<Self, SpectrumError> {
        let sample = read_openraman_csv(sample_path)?;
        let neon = read_openraman_csv(neon_path)?;
        let acetonitrile = read_openraman_csv(acetonitrile_path)?;
        Ok(calibrator.calibrate(&sample, &neon, &acetonitrile)?)
    }

    /// Load a spectrum from a TXT file output by the Horiba MacroRam
    pub fn from_horiba_txtfile<P: AsRef<Path>>(path: P) -> Result<Self, SpectrumError> {
        let (wavenumbers_cm1, intensities) = read_horiba_txt(path)?;
        Ok(Self::new(wavenumbers_cm1, intensities))
    }

    /// Load a spectrum from a CSV file output by a Renishaw instrument
    pub fn from_renishaw_csvfile<P: AsRef<Path>>(path: P) -> Result<Self, SpectrumError> {
        let (wavenumbers_cm1, intensities) = read_renishaw_csv(path)?;
        Ok(Self::new(wavenumbers_cm1, intensities))
    }

    /// Load a spectrum from a CSV file exported by Wasatch ENLIGHTEN
    pub fn from_wasatch_csvfile<P: AsRef<Path>>(path: P) -> Result<Self, SpectrumError> {
        let (wavenumbers_cm1, intensities) = read_wasatch_csv(path)?;
        Ok(Self::new(wavenumbers_cm1, intensities))
    }

    pub fn len(&self) -> usize {
        self.wavenumbers_cm1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavenumbers_cm1.is_empty()
    }

    pub fn wavenumbers_cm1(&self) -> &[f64] {
        &self.wavenumbers_cm1
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavenumbers_cm1
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }

    /// Clip the spectrum to the open interval
    /// (`min_wavenumber_cm1`, `max_wavenumber_cm1`)
    pub fn between(&self, min_wavenumber_cm1: f64, max_wavenumber_cm1: f64) -> RamanSpectrum {
        let (wavenumbers_cm1, intensities) = self
            .iter()
            .filter(|(w, _)| *w > min_wavenumber_cm1 && *w < max_wavenumber_cm1)
            .unzip();
        RamanSpectrum::new(wavenumbers_cm1, intensities)
    }

    /// Scale intensities onto [0, 1] with min-max normalization
    pub fn normalize(&self) -> RamanSpectrum {
        RamanSpectrum::new(
            self.wavenumbers_cm1.clone(),
            crate::smooth::normalize_minmax(&self.intensities),
        )
    }

    /// Scale intensities to zero mean and unit standard deviation
    pub fn standardize(&self) -> RamanSpectrum {
        let n = self.intensities.len() as f64;
        let mean = self.intensities.iter().sum::<f64>() / n;
        let variance = self
            .intensities
            .iter()
            .map(|y| (y - mean).powi(2))
            .sum::<f64>()
            / n;
        let std = variance.sqrt();
        let scaled = self.intensities.iter().map(|y| (y - mean) / std).collect();
        RamanSpectrum::new(self.wavenumbers_cm1.clone(), scaled)
    }

    /// Smooth intensities with a median filter of width `kernel_size`
    pub fn smooth(&self, kernel_size: usize) -> Result<RamanSpectrum, MedianFilterError> {
        let smoothed = median_filter(&self.intensities, kernel_size)?;
        Ok(RamanSpectrum::new(self.wavenumbers_cm1.clone(), smoothed))
    }
}
