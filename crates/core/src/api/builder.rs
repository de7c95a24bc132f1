//! Builder pattern for configuring recognition.
//!
//! # Example
//! ```ignore
//! use syllabics_core::api::RecognizerBuilder;
//!
//! let recognizer = RecognizerBuilder::new(&labels)
//!     .region(Region::new(0, 0, 640, 480))
//!     .space_factor(2.0)
//!     .build()?;
//! let text = recognizer.recognize(boxes, &mut classifier)?;
//! ```

use crate::classify::LabelSet;
use crate::error::Result;
use crate::layout::{RecognitionParams, Region};

use super::high_level::Recognizer;

/// A builder for a [`Recognizer`].
///
/// Parameters are validated once, in [`RecognizerBuilder::build`].
#[derive(Debug, Clone)]
pub struct RecognizerBuilder<'a> {
    labels: &'a LabelSet,
    params: RecognitionParams,
    region: Option<Region>,
}

impl<'a> RecognizerBuilder<'a> {
    pub fn new(labels: &'a LabelSet) -> Self {
        Self {
            labels,
            params: RecognitionParams::default(),
            region: None,
        }
    }

    /// Replaces all parameters.
    pub fn params(mut self, params: RecognitionParams) -> Self {
        self.params = params;
        self
    }

    /// Restricts recognition to boxes fully inside `region`.
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Restricts recognition to `region` if one is given.
    pub fn maybe_region(mut self, region: Option<Region>) -> Self {
        self.region = region;
        self
    }

    /// Sets the word-space multiplier.
    pub fn space_factor(mut self, factor: f64) -> Self {
        self.params.space_factor = factor;
        self
    }

    /// Sets the area ratio below which syllabics are read as finals.
    pub fn final_area_ratio(mut self, ratio: f64) -> Self {
        self.params.final_area_ratio = ratio;
        self
    }

    pub fn build(self) -> Result<Recognizer<'a>> {
        self.params.validate()?;
        Ok(Recognizer {
            params: self.params,
            labels: self.labels,
            region: self.region,
        })
    }
}
