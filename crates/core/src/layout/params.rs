//! Recognition parameters.
//!
//! Contains RecognitionParams for the tuned thresholds of every stage and
//! Region for restricting recognition to part of the image.

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;
use crate::utils::HasBBox;

/// Parameters for layout analysis and text assembly.
///
/// Ratios are relative to a statistic of the surrounding boxes (mean or
/// median over the page or over a single line), as noted per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionParams {
    /// Boxes more elongated than this in either direction are dropped.
    pub max_aspect_ratio: f64,

    /// Side of the square bitmap handed to the classifier. A box is only
    /// valid if it does not vanish when scaled down to this size.
    pub normalized_size: u32,

    /// Boxes with area at or below this fraction of the mean area are noise.
    pub noise_area_ratio: f64,

    /// A box smaller than this fraction of the median (merging) or mean
    /// (text assembly) area may be a dot.
    pub dot_area_ratio: f64,

    /// Maximum height/width ratio for a dot during merging.
    pub dot_merge_aspect: f64,

    /// Maximum ratio in either direction for a dot during text assembly.
    pub dot_text_aspect: f64,

    /// A merge candidate whose width and height are both below this fraction
    /// of the medians is too small to carry a dot.
    pub candidate_size_ratio: f64,

    /// Vertical merge reach, relative to the dot's own height.
    pub merge_height_factor: f64,

    /// Vertical merge reach, relative to the median height. The larger of the
    /// two reaches applies.
    pub merge_median_height_factor: f64,

    /// Horizontal slack around a candidate, relative to the dot's width.
    pub merge_width_factor: f64,

    /// In the per-line pass, how far below a candidate's top edge a dot may
    /// sit, relative to the candidate's height.
    pub grouped_overlap_ratio: f64,

    /// Lines closer than this fraction of the mean line distance collapse.
    pub line_distance_ratio: f64,

    /// Lines closer than this fraction of the mean box height collapse.
    pub line_height_ratio: f64,

    /// Multiplier applied to the expected gap before a word space is inserted.
    pub space_factor: f64,

    /// Glyphs smaller than this fraction of the line's mean area are read as
    /// finals when a final form exists.
    pub final_area_ratio: f64,
}

impl Default for RecognitionParams {
    fn default() -> Self {
        Self {
            max_aspect_ratio: 25.0,
            normalized_size: 42,
            noise_area_ratio: 0.01,
            dot_area_ratio: 1.0 / 8.0,
            dot_merge_aspect: 3.0,
            dot_text_aspect: 2.5,
            candidate_size_ratio: 0.5,
            merge_height_factor: 3.0,
            merge_median_height_factor: 0.7,
            merge_width_factor: 1.25,
            grouped_overlap_ratio: 0.25,
            line_distance_ratio: 0.25,
            line_height_ratio: 0.75,
            space_factor: 1.5,
            final_area_ratio: 0.7,
        }
    }
}

impl RecognitionParams {
    /// Checks that every ratio is a positive finite number.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.normalized_size == 0 {
            return Err(ParamsError::ZeroNormalizedSize);
        }

        let ratios = [
            ("max_aspect_ratio", self.max_aspect_ratio),
            ("noise_area_ratio", self.noise_area_ratio),
            ("dot_area_ratio", self.dot_area_ratio),
            ("dot_merge_aspect", self.dot_merge_aspect),
            ("dot_text_aspect", self.dot_text_aspect),
            ("candidate_size_ratio", self.candidate_size_ratio),
            ("merge_height_factor", self.merge_height_factor),
            ("merge_median_height_factor", self.merge_median_height_factor),
            ("merge_width_factor", self.merge_width_factor),
            ("grouped_overlap_ratio", self.grouped_overlap_ratio),
            ("line_distance_ratio", self.line_distance_ratio),
            ("line_height_ratio", self.line_height_ratio),
            ("space_factor", self.space_factor),
            ("final_area_ratio", self.final_area_ratio),
        ];

        for (name, value) in ratios {
            if !(value.is_finite() && value > 0.0) {
                return Err(ParamsError::NotPositive { name, value });
            }
        }

        Ok(())
    }
}

/// A user-selected region of interest in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl HasBBox for Region {
    fn x(&self) -> u32 {
        self.x
    }
    fn y(&self) -> u32 {
        self.y
    }
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
}
