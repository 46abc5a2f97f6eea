//! Static catalogs of reference line positions used to calibrate the
//! OpenRAMAN spectrometer.
//!
//! The neon table lists emission wavelengths visible in the instrument's
//! spectral window and drives the rough pixel-to-wavelength calibration. The
//! acetonitrile table lists the Raman bands of the standard sample used for
//! the fine wavenumber correction. Both tables are sorted ascending by
//! position, and that ordering is load-bearing: the peak matcher pairs
//! detected peaks with lines by rank.
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A known spectral line from a reference material.
///
/// `position` is a wavelength in nanometers for emission lines, or a Raman
/// shift in cm⁻¹ for Raman bands. The static label keeps the type `Copy`,
/// which is also why only serialization is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ReferenceLine {
    pub label: &'static str,
    pub position: f64,
}

impl ReferenceLine {
    pub const fn new(label: &'static str, position: f64) -> Self {
        Self { label, position }
    }
}

impl fmt::Display for ReferenceLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} @ {}", self.label, self.position)
    }
}

/// Neon emission lines (nm) within the OpenRAMAN spectral window.
pub const NEON_LINES_NM: [ReferenceLine; 15] = [
    ReferenceLine::new("Ne I 585", 585.249),
    ReferenceLine::new("Ne I 588", 588.189),
    ReferenceLine::new("Ne I 594", 594.483),
    ReferenceLine::new("Ne I 607", 607.434),
    ReferenceLine::new("Ne I 609", 609.616),
    ReferenceLine::new("Ne I 614", 614.306),
    ReferenceLine::new("Ne I 616", 616.359),
    ReferenceLine::new("Ne I 621", 621.728),
    ReferenceLine::new("Ne I 626", 626.649),
    ReferenceLine::new("Ne I 630", 630.479),
    ReferenceLine::new("Ne I 633", 633.443),
    ReferenceLine::new("Ne I 638", 638.299),
    ReferenceLine::new("Ne I 640", 640.225),
    ReferenceLine::new("Ne I 650", 650.653),
    ReferenceLine::new("Ne I 653", 653.288),
];

/// Raman bands of liquid acetonitrile (cm⁻¹).
pub const ACETONITRILE_LINES_CM1: [ReferenceLine; 5] = [
    ReferenceLine::new("C-C stretch", 918.0),
    ReferenceLine::new("CH3 deformation", 1376.0),
    ReferenceLine::new("C#N stretch", 2249.0),
    ReferenceLine::new("CH3 symmetric stretch", 2942.0),
    ReferenceLine::new("CH3 asymmetric stretch", 2999.0),
];
