//! Text reconstruction from grouped glyph boxes.
//!
//! This module contains:
//! - Glyph tables (finals, dotted forms)
//! - Text assembly with word spacing and final-form substitution
//! - Diacritic correction of the assembled text

pub mod assemble;
pub mod diacritics;
pub mod tables;

pub use assemble::{
    Glyph, GlyphToken, LINE_BREAK, LineMetrics, WORD_SPACE, assemble_lines, mean_gap, render,
};
pub use diacritics::{attach_dots, fix_diacritics};
