//! Least-squares polynomial fitting on top of nalgebra's SVD solver.
use nalgebra::{DMatrix, DVector};

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// All the ways a least-squares fit can fail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FitError {
    #[error("A degree {degree} fit requires at least {required} points, received {actual}")]
    Underdetermined {
        degree: usize,
        required: usize,
        actual: usize,
    },
    #[error("The x and y arrays do not match in length")]
    LengthMismatch,
    #[error("Failed to solve for coefficients: {0}")]
    FailedToSolveCoefficients(&'static str),
}

/// A polynomial in ascending powers of x, immutable once fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate the polynomial at `x` by Horner's rule
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + c)
    }

    pub fn eval_over(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|x| self.eval(*x)).collect()
    }
}

impl AsRef<[f64]> for Polynomial {
    fn as_ref(&self) -> &[f64] {
        &self.coefficients
    }
}

/// The outcome of [`polyfit`]: the fitted polynomial together with the sum
/// of squared residuals at the fitted points.
#[derive(Debug, Clone)]
pub struct PolynomialFit {
    pub polynomial: Polynomial,
    pub residual: f64,
}

/// Fit a polynomial of `degree` to the points `(xs, ys)` minimizing the
/// squared error, returning the coefficients and the residual sum.
///
/// The system is solved through an SVD of the Vandermonde matrix, so nearly
/// rank-deficient inputs degrade gracefully instead of blowing up.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Result<PolynomialFit, FitError> {
    if xs.len() != ys.len() {
        return Err(FitError::LengthMismatch);
    }
    let nc = degree + 1;
    let nr = xs.len();
    if nr < nc {
        return Err(FitError::Underdetermined {
            degree,
            required: nc,
            actual: nr,
        });
    }

    // Initialize system of equations for the polynomial
    let mut system = DMatrix::<f64>::zeros(nr, nc);
    xs.iter().enumerate().for_each(|(row_i, x)| {
        system[(row_i, 0)] = 1.0;
        (1..nc).for_each(|col_j| system[(row_i, col_j)] = x.powi(col_j as i32));
    });

    let beta = DVector::from_row_slice(ys);
    let decomp = nalgebra::linalg::SVD::new(system, true, true);

    // Solve system of equations for polynomial coefficients
    let coefficients: Vec<f64> = match decomp.solve(&beta, 1e-18) {
        Ok(val) => val.data.into(),
        Err(e) => return Err(FitError::FailedToSolveCoefficients(e)),
    };

    let polynomial = Polynomial::new(coefficients);
    let residual = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| {
            let err = y - polynomial.eval(*x);
            err * err
        })
        .sum();
    Ok(PolynomialFit {
        polynomial,
        residual,
    })
}
