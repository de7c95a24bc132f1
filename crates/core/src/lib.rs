//! syllabics - text reconstruction for Canadian Aboriginal syllabics.
//!
//! Turns unordered glyph candidate boxes from image segmentation, together
//! with per-glyph predictions from an external classifier, into lines of
//! text with dot diacritics and finals resolved.

pub mod api;
pub mod classify;
pub mod error;
pub mod layout;
pub mod text;
pub mod utils;

pub use api::high_level;

pub use api::{Layout, Recognizer, RecognizerBuilder, recognize_text};
pub use classify::{GlyphClassifier, LabelSet, Prediction};
pub use error::{ParamsError, RecognitionError, Result};
pub use layout::{GlyphBox, RecognitionParams, Region};
pub use text::fix_diacritics;
