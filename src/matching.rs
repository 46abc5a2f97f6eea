//! Pair detected peaks with reference lines by ordinal rank.
//!
//! This is deliberately a nearest-rank matcher, not an assignment solver:
//! both sequences are sorted ascending by position, and the k-th surviving
//! peak is paired with the k-th reference line. When more peaks than lines
//! are supplied, the lowest prominence peaks are discarded first, breaking
//! ties in favor of keeping the lower pixel index.
use log::debug;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::peak::DetectedPeak;
use crate::reference::ReferenceLine;

/// All the ways rank matching can fail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PeakMatchError {
    #[error("Cannot build a one-to-one assignment of {peaks} peaks onto {lines} reference lines")]
    CountMismatch { peaks: usize, lines: usize },
}

/// A pairing of one [`DetectedPeak`] with one [`ReferenceLine`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PeakMatch {
    pub peak: DetectedPeak,
    pub line: ReferenceLine,
}

impl PeakMatch {
    pub fn new(peak: DetectedPeak, line: ReferenceLine) -> Self {
        Self { peak, line }
    }
}

/// Pair `peaks` with `lines` one-to-one by rank, preserving the relative
/// ordering of both sequences.
///
/// `peaks` must be sorted by apex index and `lines` by canonical position,
/// which is how [`crate::peak_finder::PeakFinder`] and the tables in
/// [`crate::reference`] already produce them. Fails with
/// [`PeakMatchError::CountMismatch`] when fewer peaks than lines are
/// supplied; surplus peaks are dropped lowest-prominence-first.
pub fn match_peaks(
    peaks: &[DetectedPeak],
    lines: &[ReferenceLine],
) -> Result<Vec<PeakMatch>, PeakMatchError> {
    if peaks.len() < lines.len() {
        return Err(PeakMatchError::CountMismatch {
            peaks: peaks.len(),
            lines: lines.len(),
        });
    }
    debug_assert!(peaks.windows(2).all(|w| w[0].index < w[1].index));
    debug_assert!(lines.windows(2).all(|w| w[0].position <= w[1].position));

    let mut selected = peaks.to_vec();
    if selected.len() > lines.len() {
        debug!(
            "Dropping the {} least prominent of {} peaks to match {} reference lines",
            selected.len() - lines.len(),
            selected.len(),
            lines.len()
        );
        selected.sort_by(|a, b| {
            b.prominence
                .total_cmp(&a.prominence)
                .then(a.index.cmp(&b.index))
        });
        selected.truncate(lines.len());
        selected.sort_by_key(|peak| peak.index);
    }

    Ok(selected
        .into_iter()
        .zip(lines.iter().copied())
        .map(|(peak, line)| PeakMatch::new(peak, line))
        .collect())
}
