//! Recognition API.
//!
//! # Example
//!
//! ```ignore
//! use syllabics_core::api::recognize_text;
//!
//! let labels = LabelSet::from_json(&std::fs::read_to_string("classes.json")?)?;
//! let text = recognize_text(boxes, &labels, &mut classifier)?;
//! ```

pub mod builder;
pub mod high_level;

pub use builder::RecognizerBuilder;
pub use high_level::{Layout, Recognizer, recognize_text};
