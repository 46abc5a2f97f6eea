//! Preconditioning filters applied to calibration traces before peak
//! finding.
use num_traits::Float;

use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MedianFilterError {
    #[error("The kernel size must be an odd number, received {0}")]
    KernelSizeNotOdd(usize),
    #[error(
        "The kernel must be no longer than the data, received {0} kernel with {1} data points"
    )]
    KernelSizeTooLong(usize, usize),
}

/// Apply a sliding-window median filter of width `kernel_size`.
///
/// The window is zero padded beyond the trace boundaries, matching the
/// behavior of `scipy.signal.medfilt`. A kernel size of 1 returns the data
/// unchanged.
pub fn median_filter<F: Float>(data: &[F], kernel_size: usize) -> Result<Vec<F>, MedianFilterError> {
    if kernel_size % 2 == 0 {
        return Err(MedianFilterError::KernelSizeNotOdd(kernel_size));
    }
    if kernel_size > data.len() {
        return Err(MedianFilterError::KernelSizeTooLong(
            kernel_size,
            data.len(),
        ));
    }
    if kernel_size == 1 {
        return Ok(data.to_vec());
    }

    let half = kernel_size / 2;
    let n = data.len();
    let mut window = Vec::with_capacity(kernel_size);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        window.clear();
        for j in (i as isize - half as isize)..=(i as isize + half as isize) {
            if j < 0 || j as usize >= n {
                window.push(F::zero());
            } else {
                window.push(data[j as usize]);
            }
        }
        window.sort_by(|a, b| a.partial_cmp(b).unwrap());
        out.push(window[half]);
    }
    Ok(out)
}

/// Rescale a trace onto the unit interval with min-max normalization.
///
/// A flat trace maps to all zeros rather than dividing by zero.
pub fn normalize_minmax<F: Float>(data: &[F]) -> Vec<F> {
    let mut max = -F::infinity();
    let mut min = F::infinity();
    for v in data.iter() {
        if *v > max {
            max = *v;
        }
        if *v < min {
            min = *v;
        }
    }
    let span = max - min;
    if !(span > F::zero()) {
        return vec![F::zero(); data.len()];
    }
    data.iter().map(|v| (*v - min) / span).collect()
}
