//! Text line detection.
//!
//! Lines are found from a coverage heatmap: for every pixel row, the summed
//! width of all boxes covering that row. Each excursion of the heatmap above
//! its standard deviation yields one line at its highest row, and lines that
//! end up too close together are collapsed into the stronger one.

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use super::params::RecognitionParams;
use crate::error::{RecognitionError, Result};
use crate::utils::{HasBBox, mean, standard_deviation};

/// Detected text lines as strictly ascending pixel rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineSet {
    positions: Vec<usize>,
}

impl LineSet {
    /// Builds a line set, rejecting positions that are not strictly ascending.
    pub fn new(positions: Vec<usize>) -> Result<Self> {
        if let Some(index) = positions.iter().tuple_windows().position(|(a, b)| a >= b) {
            return Err(RecognitionError::UnorderedLines { index: index + 1 });
        }
        Ok(Self { positions })
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Builds the coverage heatmap of a set of boxes.
///
/// The heatmap has one entry per row down to the lowest box bottom edge.
pub fn build_heatmap<B: HasBBox>(boxes: &[B]) -> Vec<f64> {
    let height = boxes.iter().map(|b| b.bottom()).max().unwrap_or(0) as usize;
    let mut heatmap = vec![0.0; height];

    for b in boxes {
        let width = f64::from(b.width());
        for row in &mut heatmap[b.y() as usize..b.bottom() as usize] {
            *row += width;
        }
    }

    heatmap
}

/// Finds one peak per excursion of the heatmap.
///
/// Hysteresis uses the heatmap's standard deviation: a peak search starts
/// once the value rises that far above the last valley and ends once it
/// drops that far below the running peak. Within a search the position
/// follows the first row of the highest value.
///
/// A search only starts on a strict rise and only ends on a strict fall, so
/// a flat heatmap (zero deviation) is a single excursion at its first row.
pub fn find_peaks(heatmap: &[f64]) -> Vec<usize> {
    let Some(threshold) = standard_deviation(heatmap) else {
        return Vec::new();
    };

    let mut peaks: Vec<usize> = Vec::new();
    let mut seeking_peak = false;
    let mut peak = 0.0;
    let mut valley = 0.0;

    for (i, &value) in heatmap.iter().enumerate() {
        if seeking_peak {
            if value < peak && value <= (peak - threshold).max(0.0) {
                seeking_peak = false;
                valley = value;
            }

            if value > peak {
                peak = value;
                if let Some(last) = peaks.last_mut() {
                    *last = i;
                }
            }
        } else {
            if value > valley && value >= valley + threshold {
                seeking_peak = true;
                peak = value;
                peaks.push(i);
            }

            if value < valley {
                valley = value;
            }
        }
    }

    peaks
}

/// Collapses adjacent lines closer than `threshold`.
///
/// Of each offending pair the line with the lower heatmap value is dropped;
/// on a tie the upper line goes. Repeats until every gap exceeds
/// `threshold`.
pub fn collapse_lines(mut lines: Vec<usize>, heatmap: &[f64], threshold: f64) -> Vec<usize> {
    while let Some(i) = lines
        .iter()
        .tuple_windows()
        .position(|(a, b)| (b - a) as f64 <= threshold)
    {
        if heatmap[lines[i + 1]] < heatmap[lines[i]] {
            lines.remove(i + 1);
        } else {
            lines.remove(i);
        }
    }
    lines
}

/// Extracts line positions from a heatmap.
///
/// `mean_height` is the mean height of the boxes that built the heatmap; the
/// collapse threshold is
/// `min(line_distance_ratio * mean line distance, line_height_ratio * mean_height)`,
/// where the first line's distance is measured from row 0.
pub fn detect_lines(params: &RecognitionParams, heatmap: &[f64], mean_height: f64) -> LineSet {
    let peaks = find_peaks(heatmap);

    let distances = std::iter::once(0)
        .chain(peaks.iter().copied())
        .tuple_windows()
        .map(|(a, b)| (b - a) as f64);
    let Some(mean_distance) = mean(distances) else {
        return LineSet::default();
    };

    let threshold = (mean_distance * params.line_distance_ratio)
        .min(mean_height * params.line_height_ratio);
    let found = peaks.len();
    let positions = collapse_lines(peaks, heatmap, threshold);

    debug!(
        found,
        kept = positions.len(),
        threshold,
        "detected text lines"
    );
    debug_assert!(positions.is_sorted_by(|a, b| a < b));
    LineSet { positions }
}

/// Finds the text lines of a set of boxes.
pub fn find_lines<B: HasBBox>(params: &RecognitionParams, boxes: &[B]) -> LineSet {
    let Some(mean_height) = mean(boxes.iter().map(|b| f64::from(b.height()))) else {
        return LineSet::default();
    };
    let heatmap = build_heatmap(boxes);
    detect_lines(params, &heatmap, mean_height)
}
