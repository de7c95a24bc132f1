//! High-level recognition API.
//!
//! Provides the staged pipeline from raw candidate boxes to corrected text:
//! - `Recognizer::layout()` - filter, merge dots, find lines, group by line
//! - `Recognizer::assemble()` - classify and assemble the grouped boxes
//! - `Recognizer::recognize()` - both stages plus diacritic correction
//! - `recognize_text()` - one-shot recognition with default parameters
//!
//! Each stage owns its input and hands its output to the next, so a caller
//! can stop between stages.

use serde::Serialize;
use tracing::debug;

use crate::classify::{GlyphClassifier, LabelSet};
use crate::error::Result;
use crate::layout::{
    GlyphBox, LineSet, RecognitionParams, Region, filter_boxes, find_lines, group_by_line,
    merge_dots, merge_grouped_dots,
};
use crate::text::{GlyphToken, assemble_lines, fix_diacritics, render};

/// Boxes grouped by detected text line, ready for classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout<H> {
    /// Line positions; empty when no line was detected.
    pub lines: LineSet,
    /// One group per line, ordered left to right. A single group holds
    /// every box when no line was detected.
    pub groups: Vec<Vec<GlyphBox<H>>>,
}

impl<H> Layout<H> {
    pub fn box_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

/// Runs the recognition pipeline with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Recognizer<'a> {
    pub(crate) params: RecognitionParams,
    pub(crate) labels: &'a LabelSet,
    pub(crate) region: Option<Region>,
}

impl<'a> Recognizer<'a> {
    /// Creates a recognizer with default parameters and no region.
    pub fn new(labels: &'a LabelSet) -> Self {
        Self {
            params: RecognitionParams::default(),
            labels,
            region: None,
        }
    }

    pub fn params(&self) -> &RecognitionParams {
        &self.params
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Lays out raw candidate boxes.
    ///
    /// Returns `None` when no box survives filtering; the run then has no
    /// text. Line detection works on the filtered boxes before any dot is
    /// merged.
    pub fn layout<H>(&self, boxes: Vec<GlyphBox<H>>) -> Option<Layout<H>> {
        let filtered = filter_boxes(&self.params, boxes, self.region.as_ref());
        if filtered.is_empty() {
            debug!("nothing to recognise");
            return None;
        }

        let lines = find_lines(&self.params, &filtered);
        let merged = merge_dots(&self.params, filtered);
        let mut groups = group_by_line(merged, &lines);
        merge_grouped_dots(&self.params, &mut groups);

        Some(Layout { lines, groups })
    }

    /// Classifies and assembles a layout into tokens.
    pub fn assemble_tokens<H, C>(
        &self,
        layout: &Layout<H>,
        classifier: &mut C,
    ) -> Result<Vec<GlyphToken>>
    where
        C: GlyphClassifier<H>,
    {
        assemble_lines(&self.params, self.labels, &layout.groups, classifier)
    }

    /// Classifies and assembles a layout into uncorrected text.
    pub fn assemble<H, C>(&self, layout: &Layout<H>, classifier: &mut C) -> Result<String>
    where
        C: GlyphClassifier<H>,
    {
        Ok(render(&self.assemble_tokens(layout, classifier)?))
    }

    /// Recognises the text formed by `boxes`.
    pub fn recognize<H, C>(&self, boxes: Vec<GlyphBox<H>>, classifier: &mut C) -> Result<String>
    where
        C: GlyphClassifier<H>,
    {
        let Some(layout) = self.layout(boxes) else {
            return Ok(String::new());
        };
        let text = self.assemble(&layout, classifier)?;
        Ok(fix_diacritics(&text))
    }
}

/// Recognises text with default parameters over the whole image.
pub fn recognize_text<H, C>(
    boxes: Vec<GlyphBox<H>>,
    labels: &LabelSet,
    classifier: &mut C,
) -> Result<String>
where
    C: GlyphClassifier<H>,
{
    Recognizer::new(labels).recognize(boxes, classifier)
}
