//! Classification seam.
//!
//! Glyph classification itself is done by an external model. The core hands
//! each non-dot glyph box to a [`GlyphClassifier`], gets back one score per
//! class and resolves the best class through a [`LabelSet`].

use std::fmt::Display;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{RecognitionError, Result};
use crate::layout::GlyphBox;

/// A glyph classifier for boxes carrying handles of type `H`.
///
/// Implementations crop the box from the source image, mask it to the
/// shapes its handles describe, threshold it and scale it into the square
/// given by [`GlyphBox::normalization`] before running their model.
pub trait GlyphClassifier<H> {
    type Error: Display;

    /// Returns one score per class of the label set.
    fn predict(&mut self, glyph: &GlyphBox<H>) -> std::result::Result<Vec<f32>, Self::Error>;
}

impl<H, E, F> GlyphClassifier<H> for F
where
    F: FnMut(&GlyphBox<H>) -> std::result::Result<Vec<f32>, E>,
    E: Display,
{
    type Error = E;

    fn predict(&mut self, glyph: &GlyphBox<H>) -> std::result::Result<Vec<f32>, E> {
        self(glyph)
    }
}

/// Index of the highest score; the first one wins ties.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let (&first, rest) = scores.split_first()?;
    let mut best = (0, first);
    for (i, &score) in rest.iter().enumerate() {
        if score > best.1 {
            best = (i + 1, score);
        }
    }
    Some(best.0)
}

/// The best class of a prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction<'a> {
    pub label: &'a str,
    pub confidence: f32,
}

/// Ordered class labels of a classifier, one glyph per class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a JSON array of labels.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Index of `label`, if it is one of the classes.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Resolves the best class of `scores`.
    pub fn resolve(&self, scores: &[f32]) -> Result<Prediction<'_>> {
        let index = argmax(scores).ok_or(RecognitionError::EmptyPrediction)?;
        let label = self
            .get(index)
            .ok_or(RecognitionError::LabelOutOfRange {
                index,
                len: self.len(),
            })?;
        Ok(Prediction {
            label,
            confidence: scores[index],
        })
    }
}
