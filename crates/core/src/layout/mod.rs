//! Layout analysis for glyph candidate boxes.
//!
//! This module contains:
//! - Glyph box types and merge geometry (GlyphBox, Normalization)
//! - Recognition parameters (RecognitionParams, Region)
//! - The box filter, both dot-merge passes, line detection and line grouping

pub mod filter;
pub mod glyph_box;
pub mod grouping;
pub mod lines;
pub mod merge;
pub mod params;

pub use filter::filter_boxes;
pub use glyph_box::{GlyphBox, Handles, Normalization, is_valid, is_valid_size, merged_rect};
pub use grouping::{group_by_line, nearest_line};
pub use lines::{LineSet, build_heatmap, collapse_lines, detect_lines, find_lines, find_peaks};
pub use merge::{MedianStats, merge_dots, merge_grouped_dots, sort_boxes};
pub use params::{RecognitionParams, Region};
