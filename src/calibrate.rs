//! The two-step calibration procedure for the OpenRAMAN spectrometer.
//!
//! The instrument reports intensity against raw sensor pixel index, so a
//! physical axis has to be reconstructed from reference spectra acquired
//! alongside the sample:
//!
//! 1. *Excitation* (rough) calibration matches peaks in a broadband neon
//!    lamp spectrum against the known emission wavelengths in
//!    [`crate::reference::NEON_LINES_NM`] and fits a polynomial mapping
//!    pixel index to wavelength.
//! 2. *Emission* (fine) calibration converts that wavelength axis to Raman
//!    shift relative to the excitation laser line, then corrects it with a
//!    second fit against the acetonitrile bands in
//!    [`crate::reference::ACETONITRILE_LINES_CM1`].
//!
//! [`Calibrator`] sequences the two stages and applies the composed curve
//! to a sample trace. Every stage fails fast: the first error aborts the
//! run and is surfaced unchanged to the caller.
use log::{debug, warn};

use thiserror::Error;

use crate::fit::{polyfit, FitError, Polynomial};
use crate::matching::{match_peaks, PeakMatch, PeakMatchError};
use crate::peak_finder::{PeakFinder, PeakFinderError};
use crate::peak_statistics::refine_apex;
use crate::reference::{ACETONITRILE_LINES_CM1, NEON_LINES_NM};
use crate::smooth::{median_filter, normalize_minmax, MedianFilterError};
use crate::spectrum::RamanSpectrum;

/// Wavelength of the diode laser the OpenRAMAN is currently equipped with
pub const DEFAULT_EXCITATION_WAVELENGTH_NM: f64 = 532.0;

/// Median filter kernel applied to calibration traces before peak finding
pub const DEFAULT_KERNEL_SIZE: usize = 5;

/// Ceiling on the sum of squared residuals of the rough fit, in nm²
pub const DEFAULT_ROUGH_RESIDUAL_THRESHOLD: f64 = 10.0;

/// Ceiling on the sum of squared residuals of the fine fit, in (cm⁻¹)²
pub const DEFAULT_FINE_RESIDUAL_THRESHOLD: f64 = 100.0;

/// All the ways calibration can fail
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalibrationError {
    #[error(transparent)]
    PeakFinding(#[from] PeakFinderError),
    #[error(transparent)]
    Matching(#[from] PeakMatchError),
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error(transparent)]
    Filter(#[from] MedianFilterError),
    #[error(
        "Sum of squared residuals during {stage} calibration exceeds the specified threshold \
         ({residual:.3e} > {threshold:.3e})"
    )]
    ResidualTooLarge {
        stage: &'static str,
        residual: f64,
        threshold: f64,
    },
    #[error(
        "Trace lengths are inconsistent: sample {sample}, neon {neon}, acetonitrile {acetonitrile}"
    )]
    ShapeMismatch {
        sample: usize,
        neon: usize,
        acetonitrile: usize,
    },
}

/// Raman shift (cm⁻¹) of scattered light at `emission_nm` relative to an
/// excitation laser line at `excitation_nm`.
///
/// The Raman shift is the energy difference between the incident and the
/// inelastically scattered light, expressed as a wavenumber difference:
///
/// > shift = 10⁷ × (1/λ_excitation − 1/λ_emission)
pub fn raman_shift_cm1(emission_nm: f64, excitation_nm: f64) -> f64 {
    (1.0 / excitation_nm - 1.0 / emission_nm) * 1e7
}

/// The pixel index → wavelength mapping produced by the rough calibration
/// step, valid over the full pixel domain of the input trace.
///
/// Extrapolation beyond the outermost matched peaks is permitted but its
/// accuracy is not guaranteed.
#[derive(Debug, Clone)]
pub struct ExcitationCalibration {
    curve: Polynomial,
    residual: f64,
}

impl ExcitationCalibration {
    /// Fit a polynomial of `degree` through the matched neon peaks,
    /// minimizing the squared error between predicted and canonical
    /// wavelength at the matched pixel indices.
    pub fn fit(
        matches: &[PeakMatch],
        degree: usize,
        residual_threshold: f64,
    ) -> Result<Self, CalibrationError> {
        let pixels: Vec<f64> = matches.iter().map(|m| m.peak.index as f64).collect();
        let wavelengths: Vec<f64> = matches.iter().map(|m| m.line.position).collect();
        let fit = polyfit(&pixels, &wavelengths, degree)?;
        if fit.residual > residual_threshold {
            warn!(
                "Rough calibration rejected: residual {:.3e} over threshold {:.3e}",
                fit.residual, residual_threshold
            );
            return Err(CalibrationError::ResidualTooLarge {
                stage: "rough",
                residual: fit.residual,
                threshold: residual_threshold,
            });
        }
        debug!(
            "Rough calibration over {} matches, residual {:.3e} nm²",
            matches.len(),
            fit.residual
        );
        Ok(Self {
            curve: fit.polynomial,
            residual: fit.residual,
        })
    }

    /// Construct a calibration from an already known pixel → wavelength
    /// polynomial, e.g. a factory characterization of the spectrometer.
    pub fn from_curve(curve: Polynomial) -> Self {
        Self {
            curve,
            residual: 0.0,
        }
    }

    /// Predicted wavelength (nm) at a (possibly fractional) pixel position
    pub fn wavelength_at(&self, pixel: f64) -> f64 {
        self.curve.eval(pixel)
    }

    pub fn curve(&self) -> &Polynomial {
        &self.curve
    }

    /// Sum of squared residuals of the fit, in nm²
    pub fn residual(&self) -> f64 {
        self.residual
    }
}

/// The composed pixel index → Raman shift mapping produced by the fine
/// calibration step.
///
/// Evaluation applies, in order: the excitation polynomial, the wavenumber
/// conversion relative to the laser line, and the fitted correction
/// polynomial. The curve owns its parts and is immutable once fit.
#[derive(Debug, Clone)]
pub struct ShiftCurve {
    excitation: ExcitationCalibration,
    excitation_wavelength_nm: f64,
    correction: Polynomial,
    residual: f64,
}

impl ShiftCurve {
    /// Fit the fine correction through the matched acetonitrile peaks.
    ///
    /// Each matched peak's pixel index is mapped through the excitation
    /// curve to an observed wavelength, converted to an observed Raman
    /// shift, and regressed against the canonical band position.
    pub fn fit(
        excitation: ExcitationCalibration,
        excitation_wavelength_nm: f64,
        matches: &[PeakMatch],
        degree: usize,
        residual_threshold: f64,
    ) -> Result<Self, CalibrationError> {
        let pixels: Vec<f64> = matches.iter().map(|m| m.peak.index as f64).collect();
        let canonical: Vec<f64> = matches.iter().map(|m| m.line.position).collect();
        Self::fit_at_pixels(
            excitation,
            excitation_wavelength_nm,
            &pixels,
            &canonical,
            degree,
            residual_threshold,
        )
    }

    /// Like [`ShiftCurve::fit`], but over explicit (possibly fractional)
    /// pixel positions, which is how sub-pixel refined apexes enter the fit.
    pub fn fit_at_pixels(
        excitation: ExcitationCalibration,
        excitation_wavelength_nm: f64,
        pixels: &[f64],
        canonical_shifts_cm1: &[f64],
        degree: usize,
        residual_threshold: f64,
    ) -> Result<Self, CalibrationError> {
        let observed: Vec<f64> = pixels
            .iter()
            .map(|pixel| {
                raman_shift_cm1(excitation.wavelength_at(*pixel), excitation_wavelength_nm)
            })
            .collect();
        let fit = polyfit(&observed, canonical_shifts_cm1, degree)?;
        if fit.residual > residual_threshold {
            warn!(
                "Fine calibration rejected: residual {:.3e} over threshold {:.3e}",
                fit.residual, residual_threshold
            );
            return Err(CalibrationError::ResidualTooLarge {
                stage: "fine",
                residual: fit.residual,
                threshold: residual_threshold,
            });
        }
        debug!(
            "Fine calibration over {} matches, residual {:.3e} (cm⁻¹)²",
            pixels.len(),
            fit.residual
        );
        Ok(Self {
            excitation,
            excitation_wavelength_nm,
            correction: fit.polynomial,
            residual: fit.residual,
        })
    }

    /// The observed Raman shift at `pixel` before the fine correction
    pub fn uncorrected_shift_at(&self, pixel: f64) -> f64 {
        raman_shift_cm1(
            self.excitation.wavelength_at(pixel),
            self.excitation_wavelength_nm,
        )
    }

    /// The calibrated Raman shift (cm⁻¹) at a (possibly fractional) pixel
    pub fn shift_at(&self, pixel: f64) -> f64 {
        self.correction.eval(self.uncorrected_shift_at(pixel))
    }

    /// Evaluate the curve over the pixel domain `0..len`
    pub fn shift_axis(&self, len: usize) -> Vec<f64> {
        (0..len).map(|pixel| self.shift_at(pixel as f64)).collect()
    }

    pub fn excitation(&self) -> &ExcitationCalibration {
        &self.excitation
    }

    pub fn correction(&self) -> &Polynomial {
        &self.correction
    }

    /// Sum of squared residuals of the correction fit, in (cm⁻¹)²
    pub fn residual(&self) -> f64 {
        self.residual
    }
}

/// Sequences the two calibration stages and applies the composed curve to
/// a sample trace.
///
/// This is the only component aware of stage ordering. It is a straight
/// line sequence, not a retryable state machine: any stage failure aborts
/// the whole pipeline.
#[derive(Debug, Clone)]
pub struct Calibrator {
    /// Wavelength (nm) of the excitation light source
    pub excitation_wavelength_nm: f64,
    /// Median filter kernel applied to both calibration traces. Set to 1 to
    /// skip smoothing; must be odd.
    pub kernel_size: usize,
    pub rough_residual_threshold: f64,
    pub fine_residual_threshold: f64,
    /// Degree of the pixel → wavelength fit
    pub excitation_degree: usize,
    /// Degree of the fine correction fit; 0 reduces it to a pure offset
    pub correction_degree: usize,
    /// Refine acetonitrile apex positions to sub-pixel precision before the
    /// fine fit
    pub refine_peaks: bool,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            excitation_wavelength_nm: DEFAULT_EXCITATION_WAVELENGTH_NM,
            kernel_size: DEFAULT_KERNEL_SIZE,
            rough_residual_threshold: DEFAULT_ROUGH_RESIDUAL_THRESHOLD,
            fine_residual_threshold: DEFAULT_FINE_RESIDUAL_THRESHOLD,
            excitation_degree: 1,
            correction_degree: 1,
            refine_peaks: false,
        }
    }
}

/// A builder for configuring [`Calibrator`]
#[derive(Debug, Clone)]
pub struct CalibratorBuilder {
    inner: Calibrator,
}

impl Default for CalibratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibratorBuilder {
    pub fn new() -> Self {
        Self {
            inner: Calibrator::default(),
        }
    }

    pub fn excitation_wavelength_nm(&mut self, excitation_wavelength_nm: f64) -> &mut Self {
        self.inner.excitation_wavelength_nm = excitation_wavelength_nm;
        self
    }

    pub fn kernel_size(&mut self, kernel_size: usize) -> &mut Self {
        self.inner.kernel_size = kernel_size;
        self
    }

    pub fn rough_residual_threshold(&mut self, rough_residual_threshold: f64) -> &mut Self {
        self.inner.rough_residual_threshold = rough_residual_threshold;
        self
    }

    pub fn fine_residual_threshold(&mut self, fine_residual_threshold: f64) -> &mut Self {
        self.inner.fine_residual_threshold = fine_residual_threshold;
        self
    }

    pub fn excitation_degree(&mut self, excitation_degree: usize) -> &mut Self {
        self.inner.excitation_degree = excitation_degree;
        self
    }

    pub fn correction_degree(&mut self, correction_degree: usize) -> &mut Self {
        self.inner.correction_degree = correction_degree;
        self
    }

    pub fn refine_peaks(&mut self, refine_peaks: bool) -> &mut Self {
        self.inner.refine_peaks = refine_peaks;
        self
    }

    pub fn build(self) -> Calibrator {
        self.inner
    }
}

impl From<CalibratorBuilder> for Calibrator {
    fn from(value: CalibratorBuilder) -> Self {
        value.build()
    }
}

impl Calibrator {
    /// Calibrate `sample` using companion `neon` and `acetonitrile` traces
    /// acquired on the same sensor configuration.
    ///
    /// All three traces must share one pixel domain; the check happens
    /// before any peak finding or fitting. On success the sample's
    /// intensities are returned attached to the calibrated wavenumber axis.
    pub fn calibrate(
        &self,
        sample: &[f64],
        neon: &[f64],
        acetonitrile: &[f64],
    ) -> Result<RamanSpectrum, CalibrationError> {
        if sample.len() != neon.len() || sample.len() != acetonitrile.len() {
            return Err(CalibrationError::ShapeMismatch {
                sample: sample.len(),
                neon: neon.len(),
                acetonitrile: acetonitrile.len(),
            });
        }
        let curve = self.fit_shift_curve(neon, acetonitrile)?;
        let wavenumbers_cm1 = curve.shift_axis(sample.len());
        Ok(RamanSpectrum::new(wavenumbers_cm1, sample.to_vec()))
    }

    /// Run both calibration stages, returning the composed curve without
    /// applying it to a sample.
    pub fn fit_shift_curve(
        &self,
        neon: &[f64],
        acetonitrile: &[f64],
    ) -> Result<ShiftCurve, CalibrationError> {
        let excitation = self.fit_excitation(neon)?;
        self.fit_emission(excitation, acetonitrile)
    }

    /// Rough calibration: peaks in the neon trace against the neon line
    /// table.
    pub fn fit_excitation(&self, neon: &[f64]) -> Result<ExcitationCalibration, CalibrationError> {
        let trace = self.precondition(neon)?;
        let peaks = PeakFinder::default().n_most_prominent(&trace, NEON_LINES_NM.len())?;
        let matches = match_peaks(&peaks, &NEON_LINES_NM)?;
        ExcitationCalibration::fit(
            &matches,
            self.excitation_degree,
            self.rough_residual_threshold,
        )
    }

    /// Fine calibration: peaks in the acetonitrile trace against the
    /// acetonitrile band table, composed with `excitation`.
    pub fn fit_emission(
        &self,
        excitation: ExcitationCalibration,
        acetonitrile: &[f64],
    ) -> Result<ShiftCurve, CalibrationError> {
        let trace = self.precondition(acetonitrile)?;
        let peaks = PeakFinder::default().n_most_prominent(&trace, ACETONITRILE_LINES_CM1.len())?;
        let matches = match_peaks(&peaks, &ACETONITRILE_LINES_CM1)?;
        if self.refine_peaks {
            let pixels: Vec<f64> = matches
                .iter()
                .map(|m| refine_apex(&trace, m.peak.index))
                .collect();
            let canonical: Vec<f64> = matches.iter().map(|m| m.line.position).collect();
            ShiftCurve::fit_at_pixels(
                excitation,
                self.excitation_wavelength_nm,
                &pixels,
                &canonical,
                self.correction_degree,
                self.fine_residual_threshold,
            )
        } else {
            ShiftCurve::fit(
                excitation,
                self.excitation_wavelength_nm,
                &matches,
                self.correction_degree,
                self.fine_residual_threshold,
            )
        }
    }

    fn precondition(&self, trace: &[f64]) -> Result<Vec<f64>, CalibrationError> {
        let filtered = median_filter(trace, self.kernel_size)?;
        Ok(normalize_minmax(&filtered))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::matching::PeakMatch;
    use crate::peak::DetectedPeak;
    use crate::reference::ReferenceLine;
    use crate::test_data::{
        linear_map, synthetic_acetonitrile_trace, synthetic_neon_trace, NM_AT_ZERO, NM_PER_PIXEL,
        TRACE_LEN,
    };

    #[test]
    fn test_raman_shift_reference_values() {
        // Cross-checked against a published Raman shift calculator for a
        // 785 nm excitation source.
        let shifts: Vec<f64> = [800.0, 850.0, 900.0]
            .iter()
            .map(|nm| raman_shift_cm1(*nm, 785.0))
            .collect();
        let expected = [238.85, 974.15, 1627.74];
        for (calculated, expected) in shifts.iter().zip(expected.iter()) {
            assert!(
                (calculated - expected).abs() / expected < 1e-4,
                "{calculated} != {expected}"
            );
        }
    }

    fn matches_on_linear_map(pixels: &[usize], slope: f64, intercept: f64) -> Vec<PeakMatch> {
        pixels
            .iter()
            .map(|p| {
                PeakMatch::new(
                    DetectedPeak::new(*p, 1.0, 1.0),
                    ReferenceLine::new("synthetic", intercept + slope * *p as f64),
                )
            })
            .collect()
    }

    #[test]
    fn test_excitation_fit_round_trip() {
        // Peaks placed exactly on a linear pixel -> wavelength map must be
        // recovered with near-zero residual.
        let matches = matches_on_linear_map(&[100, 400, 700, 1000, 1300], 0.06, 550.0);
        let calibration = ExcitationCalibration::fit(&matches, 1, 1e-6).unwrap();
        assert!(calibration.residual() < 1e-9);
        assert!((calibration.wavelength_at(550.0) - (550.0 + 0.06 * 550.0)).abs() < 1e-6);
    }

    #[test]
    fn test_excitation_fit_underdetermined() {
        let matches = matches_on_linear_map(&[100, 200], 0.06, 550.0);
        let err = ExcitationCalibration::fit(&matches, 2, 10.0).unwrap_err();
        assert!(matches!(err, CalibrationError::Fit(_)));
    }

    #[test]
    fn test_excitation_fit_residual_threshold() {
        let mut matches = matches_on_linear_map(&[100, 400, 700, 1000, 1300], 0.06, 550.0);
        // Perturb one canonical wavelength so a linear fit cannot absorb it.
        matches[2].line.position += 5.0;
        let err = ExcitationCalibration::fit(&matches, 1, 1e-3).unwrap_err();
        assert!(matches!(
            err,
            CalibrationError::ResidualTooLarge { stage: "rough", .. }
        ));
    }

    #[test]
    fn test_degree_two_fit_predicts_interior_pixel() {
        // Six neon-like peaks whose pixel positions follow a linear map of
        // the reference wavelengths. A quadratic fit through them must
        // agree with linear interpolation at an interior pixel to within
        // half a nanometer.
        let wavelengths = [540.1, 576.4, 640.2, 659.9, 692.9, 703.2];
        let slope: f64 = (703.2 - 540.1) / 500.0;
        let pixels: Vec<usize> = wavelengths
            .iter()
            .map(|nm| (100.0 + (nm - 540.1) / slope).round() as usize)
            .collect();
        let matches: Vec<PeakMatch> = pixels
            .iter()
            .zip(wavelengths.iter())
            .map(|(p, nm)| {
                PeakMatch::new(
                    DetectedPeak::new(*p, 1.0, 1.0),
                    ReferenceLine::new("synthetic", *nm),
                )
            })
            .collect();
        let calibration = ExcitationCalibration::fit(&matches, 2, 10.0).unwrap();
        let expected = 540.1 + slope * 250.0;
        assert!(
            (calibration.wavelength_at(350.0) - expected).abs() < 0.5,
            "predicted {} expected {}",
            calibration.wavelength_at(350.0),
            expected
        );
    }

    #[test]
    fn test_emission_observed_shift_single_band() {
        // With a perfect excitation curve and a 532 nm laser, a peak placed
        // at the pixel whose wavelength corresponds to a 2253 cm⁻¹ shift
        // must come back within 1 cm⁻¹ of 2253 before any correction.
        let laser = 532.0;
        let target_nm = 1.0 / (1.0 / laser - 2253.0 * 1e-7);
        let pixel = 900.0;
        // Anchor a linear curve so the target wavelength falls exactly on
        // the chosen pixel.
        let excitation =
            ExcitationCalibration::from_curve(Polynomial::new(vec![target_nm - 0.06 * pixel, 0.06]));
        let curve = ShiftCurve::fit_at_pixels(
            excitation,
            laser,
            &[pixel],
            &[2253.0],
            0,
            DEFAULT_FINE_RESIDUAL_THRESHOLD,
        )
        .unwrap();
        assert!((curve.uncorrected_shift_at(pixel) - 2253.0).abs() < 1.0);
        assert!((curve.shift_at(pixel) - 2253.0).abs() < 1.0);
    }

    #[test]
    fn test_emission_residual_threshold() {
        let excitation = ExcitationCalibration::from_curve(Polynomial::new(vec![550.0, 0.06]));
        let err = ShiftCurve::fit_at_pixels(
            excitation,
            532.0,
            &[100.0, 500.0, 900.0],
            // Canonical values scattered far from any line through the
            // observed shifts.
            &[900.0, 2500.0, 1200.0],
            1,
            1.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CalibrationError::ResidualTooLarge { stage: "fine", .. }
        ));
    }

    #[test]
    fn test_shape_mismatch_rejected_before_fitting() {
        let calibrator = Calibrator::default();
        let err = calibrator
            .calibrate(&vec![0.0; 100], &vec![0.0; 200], &vec![0.0; 100])
            .unwrap_err();
        assert_eq!(
            err,
            CalibrationError::ShapeMismatch {
                sample: 100,
                neon: 200,
                acetonitrile: 100
            }
        );
    }

    #[test]
    fn test_insufficient_peaks_never_degrades() {
        // A featureless neon trace must produce a typed error, not a
        // silently degraded axis.
        let calibrator = Calibrator::default();
        let flat = vec![1.0; TRACE_LEN];
        let aceto = synthetic_acetonitrile_trace();
        let err = calibrator
            .calibrate(&vec![0.0; TRACE_LEN], &flat, &aceto)
            .unwrap_err();
        assert!(matches!(
            err,
            CalibrationError::PeakFinding(PeakFinderError::InsufficientPeaks { .. })
        ));
    }

    #[test_log::test]
    fn test_end_to_end_pipeline() {
        let neon = synthetic_neon_trace();
        let aceto = synthetic_acetonitrile_trace();
        let sample = vec![1.0; TRACE_LEN];

        let calibrator = Calibrator::default();
        let spectrum = calibrator.calibrate(&sample, &neon, &aceto).unwrap();
        assert_eq!(spectrum.len(), TRACE_LEN);

        // The recovered axis must place each acetonitrile band within a few
        // wavenumbers of its canonical position.
        let curve = calibrator.fit_shift_curve(&neon, &aceto).unwrap();
        for line in ACETONITRILE_LINES_CM1.iter() {
            let true_nm = 1.0 / (1.0 / DEFAULT_EXCITATION_WAVELENGTH_NM - line.position * 1e-7);
            let pixel = (true_nm - NM_AT_ZERO) / NM_PER_PIXEL;
            let recovered = curve.shift_at(pixel.round());
            assert!(
                (recovered - line.position).abs() < 4.0,
                "{}: recovered {recovered}",
                line.label
            );
        }
    }

    #[test]
    fn test_pipeline_idempotent() {
        let neon = synthetic_neon_trace();
        let aceto = synthetic_acetonitrile_trace();
        let sample: Vec<f64> = (0..TRACE_LEN).map(|i| (i % 17) as f64).collect();

        let calibrator = Calibrator::default();
        let first = calibrator.calibrate(&sample, &neon, &aceto).unwrap();
        let second = calibrator.calibrate(&sample, &neon, &aceto).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_axis_monotonic() {
        let neon = synthetic_neon_trace();
        let aceto = synthetic_acetonitrile_trace();
        let curve = Calibrator::default()
            .fit_shift_curve(&neon, &aceto)
            .unwrap();
        let axis = curve.shift_axis(TRACE_LEN);
        assert!(axis.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_pipeline_with_refined_peaks() {
        let neon = synthetic_neon_trace();
        let aceto = synthetic_acetonitrile_trace();
        let mut calibrator = Calibrator::default();
        calibrator.refine_peaks = true;
        let curve = calibrator.fit_shift_curve(&neon, &aceto).unwrap();
        for line in ACETONITRILE_LINES_CM1.iter() {
            let true_nm = 1.0 / (1.0 / DEFAULT_EXCITATION_WAVELENGTH_NM - line.position * 1e-7);
            let pixel = (true_nm - NM_AT_ZERO) / NM_PER_PIXEL;
            let recovered = curve.shift_at(pixel.round());
            assert!(
                (recovered - line.position).abs() < 4.0,
                "{}: recovered {recovered}",
                line.label
            );
        }
    }

    #[test]
    fn test_builder_defaults_and_overrides() {
        let calibrator = CalibratorBuilder::new().build();
        assert_eq!(
            calibrator.excitation_wavelength_nm,
            DEFAULT_EXCITATION_WAVELENGTH_NM
        );
        assert_eq!(calibrator.kernel_size, DEFAULT_KERNEL_SIZE);

        let mut builder = CalibratorBuilder::new();
        builder
            .excitation_wavelength_nm(785.0)
            .kernel_size(3)
            .excitation_degree(2)
            .correction_degree(0)
            .refine_peaks(true);
        let calibrator = builder.build();
        assert_eq!(calibrator.excitation_wavelength_nm, 785.0);
        assert_eq!(calibrator.kernel_size, 3);
        assert_eq!(calibrator.excitation_degree, 2);
        assert_eq!(calibrator.correction_degree, 0);
        assert!(calibrator.refine_peaks);
    }

    #[test]
    fn test_rough_threshold_failure_surfaces_from_pipeline() {
        let neon = synthetic_neon_trace();
        let aceto = synthetic_acetonitrile_trace();
        let mut calibrator = Calibrator::default();
        calibrator.rough_residual_threshold = 1e-12;
        let err = calibrator
            .calibrate(&vec![0.0; TRACE_LEN], &neon, &aceto)
            .unwrap_err();
        assert!(matches!(
            err,
            CalibrationError::ResidualTooLarge { stage: "rough", .. }
        ));
    }

    #[test]
    fn test_linear_map_helper_consistency() {
        // The synthetic trace generators and the assertions above rely on
        // the same pixel -> nm mapping.
        assert!((linear_map(0.0) - NM_AT_ZERO).abs() < 1e-12);
        assert!((linear_map(100.0) - (NM_AT_ZERO + 100.0 * NM_PER_PIXEL)).abs() < 1e-12);
    }
}
