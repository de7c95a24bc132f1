//! Shared fixtures for integration tests.

#![allow(dead_code)]

use syllabics_core::{GlyphBox, LabelSet};

/// Labels of the test classifier.
pub const LABELS: [&str; 11] = ["ᐁ", "ᐃ", "ᐊ", "ᐘ", "ᑲ", "ᒥ", "ᓇ", "ᓯ", "ᐟ", "ᑊ", "ᐤ"];

pub fn labels() -> LabelSet {
    LabelSet::new(LABELS)
}

/// A detected glyph: rectangle plus the label the test classifier gives it.
/// Dots get `"-"`; they never reach the classifier.
pub type Detection = ((u32, u32, u32, u32), &'static str);

/// Builds boxes whose handle is their index in `detections`.
pub fn boxes(detections: &[Detection]) -> Vec<GlyphBox<u32>> {
    detections
        .iter()
        .enumerate()
        .map(|(i, &(rect, _))| GlyphBox::new(rect, i as u32))
        .collect()
}

/// One-hot scores for `label`.
pub fn one_hot(label: &str) -> Result<Vec<f32>, String> {
    let labels = labels();
    let index = labels
        .index_of(label)
        .ok_or_else(|| format!("no class {label:?}"))?;
    let mut scores = vec![0.0; labels.len()];
    scores[index] = 1.0;
    Ok(scores)
}

/// A classifier that predicts the label of a box's first handle, one-hot.
///
/// Merged boxes keep the absorbing glyph's handle first, so they predict
/// that glyph's label.
pub fn replay_classifier(
    detections: &[Detection],
) -> impl FnMut(&GlyphBox<u32>) -> Result<Vec<f32>, String> + '_ {
    move |glyph: &GlyphBox<u32>| {
        let handle = glyph.handles()[0] as usize;
        let (_, label) = detections[handle];
        one_hot(label).map_err(|e| format!("{e} for handle {handle}"))
    }
}
