use num_traits::{Float, FromPrimitive};

use log::warn;

pub fn _isclose<T>(x: T, y: T, rtol: T, atol: T) -> bool
where
    T: Float,
{
    (x - y).abs() <= (atol + rtol * y.abs())
}

pub fn isclose<T>(x: T, y: T) -> bool
where
    T: Float + FromPrimitive,
{
    _isclose(x, y, T::from_f64(1e-5).unwrap(), T::from_f64(1e-8).unwrap())
}

pub fn aboutzero<T>(x: T) -> bool
where
    T: Float + FromPrimitive,
{
    isclose(x, T::zero())
}

/// Compute the topographic prominence of the local maximum at `index`.
///
/// Walks outward from the apex in both directions until the trace rises above
/// the apex intensity or the trace ends, tracking the lowest point seen on
/// each side. The prominence is the apex intensity minus the higher of the
/// two bases.
///
/// Assumes `index` is a local maximum. Interior points that are not maxima
/// produce a prominence of zero or less and are filtered out by the caller.
pub fn prominence_of(intensity_array: &[f64], index: usize) -> f64 {
    let apex = intensity_array[index];

    let mut left_base = apex;
    let mut i = index;
    while i > 0 {
        i -= 1;
        if intensity_array[i] > apex {
            break;
        }
        if intensity_array[i] < left_base {
            left_base = intensity_array[i];
        }
    }

    let mut right_base = apex;
    let mut i = index;
    while i + 1 < intensity_array.len() {
        i += 1;
        if intensity_array[i] > apex {
            break;
        }
        if intensity_array[i] < right_base {
            right_base = intensity_array[i];
        }
    }

    apex - left_base.max(right_base)
}

/// Refine an integer apex position to sub-pixel precision with a parabolic
/// fit through the apex and its two neighbors.
///
/// Uses the closed form vertex of the parabola through three evenly spaced
/// points,
///
/// > x* = i + (y₋₁ - y₊₁) / (2(y₋₁ - 2yᵢ + y₊₁))
///
/// Returns the apex index unchanged when the peak sits at the trace edge,
/// when the three points are degenerate, or when the interpolated position
/// falls outside the three point window, since the fit cannot be trusted
/// there.
pub fn refine_apex(intensity_array: &[f64], index: usize) -> f64 {
    let n = intensity_array.len();
    if index == 0 || index + 1 >= n {
        warn!("Peak index {index} is at the edge of the trace and cannot be interpolated");
        return index as f64;
    }

    let y_prev = intensity_array[index - 1];
    let y_apex = intensity_array[index];
    let y_next = intensity_array[index + 1];

    let denominator = y_prev - 2.0 * y_apex + y_next;
    if aboutzero(denominator) {
        return index as f64;
    }

    let refined = index as f64 + (y_prev - y_next) / (2.0 * denominator);
    if refined < (index - 1) as f64 || refined > (index + 1) as f64 {
        warn!("Parabolic interpolation of peak at {index} is out of bounds, keeping the apex");
        return index as f64;
    }
    refined
}
