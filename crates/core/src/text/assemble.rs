//! Text assembly from grouped, classified glyph boxes.
//!
//! Each line is read left to right. Word spaces are inferred from the
//! horizontal gaps between boxes, dot-sized boxes are written as a dot for
//! the diacritic pass to resolve, and undersized syllabics are read as
//! their final form.

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use super::tables::{DOT, final_form};
use crate::classify::{GlyphClassifier, LabelSet};
use crate::error::{RecognitionError, Result};
use crate::layout::{GlyphBox, RecognitionParams};
use crate::utils::{HasBBox, mean, median};

/// Separator between inferred words.
pub const WORD_SPACE: &str = "  ";

/// Separator between lines.
pub const LINE_BREAK: char = '\n';

/// Per-line statistics driving dot detection and spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub mean_area: f64,
    pub median_width: f64,
    /// `None` when the line has a single box.
    pub mean_gap: Option<f64>,
    /// A gap wider than this starts a new word.
    pub space_threshold: f64,
}

impl LineMetrics {
    /// Returns `None` for an empty line.
    pub fn new<B: HasBBox>(params: &RecognitionParams, line: &[B]) -> Option<Self> {
        let mean_area = mean(line.iter().map(HasBBox::area))?;
        let median_width = median(line.iter().map(|b| f64::from(b.width())))?;
        let mean_gap = mean_gap(params, line);
        let space_threshold = (median_width / 2.0).max(mean_gap.unwrap_or(0.0)) * params.space_factor;
        Some(Self {
            mean_area,
            median_width,
            mean_gap,
            space_threshold,
        })
    }

    /// Dot-sized and roughly square, relative to this line.
    pub fn is_dot<B: HasBBox>(&self, params: &RecognitionParams, b: &B) -> bool {
        let (w, h) = (f64::from(b.width()), f64::from(b.height()));
        b.area() < self.mean_area * params.dot_area_ratio
            && h < params.dot_text_aspect * w
            && w < params.dot_text_aspect * h
    }
}

fn gap_between<A: HasBBox, B: HasBBox>(left: &A, right: &B) -> f64 {
    (i64::from(right.x()) - i64::from(left.right())).max(0) as f64
}

/// Mean horizontal gap between consecutive boxes of a line.
///
/// A dot contributes the larger of its gaps to either neighbour and the
/// box after it is skipped: the dot belongs to one of the two, so only one
/// real gap is present.
pub fn mean_gap<B: HasBBox>(params: &RecognitionParams, line: &[B]) -> Option<f64> {
    let mean_area = mean(line.iter().map(HasBBox::area))?;
    let dot_area = mean_area * params.dot_area_ratio;
    let aspect = params.dot_text_aspect;

    let mut total = 0.0;
    let mut count = 0usize;
    let mut i = 1;
    while i < line.len() {
        let (prev, b) = (&line[i - 1], &line[i]);
        let (w, h) = (f64::from(b.width()), f64::from(b.height()));
        let is_dot = b.area() < dot_area && h < aspect * w && w < aspect * h;

        if is_dot {
            let prev_gap = gap_between(prev, b);
            let next_gap = line.get(i + 1).map_or(0.0, |next| gap_between(b, next));
            total += prev_gap.max(next_gap);
            i += 1;
        } else {
            total += gap_between(prev, b);
        }

        count += 1;
        i += 1;
    }

    (count > 0).then(|| total / count as f64)
}

/// One recognised glyph with the geometry that decided its form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Glyph {
    pub symbol: String,
    pub area: f64,
    pub line_mean_area: f64,
}

/// Assembled output before diacritic correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GlyphToken {
    Glyph(Glyph),
    WordSpace,
    LineBreak,
}

/// Reads every line into a token stream.
///
/// Lines are separated by line breaks once any output exists, so leading
/// empty lines vanish while later ones still add a break.
pub fn assemble_lines<H, C>(
    params: &RecognitionParams,
    labels: &LabelSet,
    groups: &[Vec<GlyphBox<H>>],
    classifier: &mut C,
) -> Result<Vec<GlyphToken>>
where
    C: GlyphClassifier<H>,
{
    let mut tokens = Vec::new();
    let mut classified = 0usize;

    for line in groups {
        if !tokens.is_empty() {
            tokens.push(GlyphToken::LineBreak);
        }

        let Some(metrics) = LineMetrics::new(params, line) else {
            continue;
        };

        let mut prev_right: Option<u32> = None;
        for b in line {
            if let Some(right) = prev_right {
                if f64::from(b.x()) - f64::from(right) > metrics.space_threshold {
                    tokens.push(GlyphToken::WordSpace);
                }
            }
            prev_right = Some(b.right());

            let symbol = if metrics.is_dot(params, b) {
                DOT.to_string()
            } else {
                classified += 1;
                let scores = classifier
                    .predict(b)
                    .map_err(|e| RecognitionError::Classifier(e.to_string()))?;
                let label = labels.resolve(&scores)?.label;
                read_glyph(params, label, b.area(), metrics.mean_area)
            };

            tokens.push(GlyphToken::Glyph(Glyph {
                symbol,
                area: b.area(),
                line_mean_area: metrics.mean_area,
            }));
        }
    }

    debug!(lines = groups.len(), classified, "assembled text");
    Ok(tokens)
}

/// Picks the final form for undersized syllabics that have one.
fn read_glyph(params: &RecognitionParams, label: &str, area: f64, line_mean_area: f64) -> String {
    if area < line_mean_area * params.final_area_ratio {
        if let Some(reduced) = label.chars().exactly_one().ok().and_then(final_form) {
            return reduced.to_string();
        }
    }
    label.to_string()
}

/// Renders a token stream as text.
pub fn render(tokens: &[GlyphToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            GlyphToken::Glyph(glyph) => out.push_str(&glyph.symbol),
            GlyphToken::WordSpace => out.push_str(WORD_SPACE),
            GlyphToken::LineBreak => out.push(LINE_BREAK),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Region;

    fn row(xs: &[u32], width: u32, height: u32) -> Vec<Region> {
        xs.iter().map(|&x| Region::new(x, 0, width, height)).collect()
    }

    #[test]
    fn test_mean_gap_constant_spacing() {
        let params = RecognitionParams::default();
        let line = row(&[0, 27, 54], 20, 20);
        assert_eq!(mean_gap(&params, &line), Some(7.0));
    }

    #[test]
    fn test_mean_gap_single_box() {
        let params = RecognitionParams::default();
        assert_eq!(mean_gap(&params, &row(&[0], 20, 20)), None);
        assert_eq!(mean_gap::<Region>(&params, &[]), None);
    }

    #[test]
    fn test_mean_gap_dot_takes_larger_side_and_skips_next() {
        let params = RecognitionParams::default();
        let line = vec![
            Region::new(0, 0, 40, 40),
            Region::new(44, 0, 6, 6),
            Region::new(60, 0, 40, 40),
            Region::new(110, 0, 40, 40),
        ];
        // Dot gaps are 4 and 10; the glyph after the dot is skipped
        assert_eq!(mean_gap(&params, &line), Some(10.0));
    }

    #[test]
    fn test_space_threshold_uses_half_median_width() {
        let params = RecognitionParams::default();
        let metrics = LineMetrics::new(&params, &row(&[0, 42], 40, 40)).unwrap();
        assert_eq!(metrics.mean_gap, Some(2.0));
        assert_eq!(metrics.space_threshold, 30.0);
    }

    #[test]
    fn test_read_glyph_final_form() {
        let params = RecognitionParams::default();
        assert_eq!(read_glyph(&params, "ᑲ", 600.0, 1000.0), "ᒃ");
        assert_eq!(read_glyph(&params, "ᑲ", 700.0, 1000.0), "ᑲ");
        assert_eq!(read_glyph(&params, "ᐊ", 100.0, 1000.0), "ᐊ");
    }

    #[test]
    fn test_render_tokens() {
        let glyph = |s: &str| {
            GlyphToken::Glyph(Glyph {
                symbol: s.to_string(),
                area: 1.0,
                line_mean_area: 1.0,
            })
        };
        let tokens = [
            glyph("ᐊ"),
            GlyphToken::WordSpace,
            glyph("ᑲ"),
            GlyphToken::LineBreak,
            glyph("ᒥ"),
        ];
        assert_eq!(render(&tokens), "ᐊ  ᑲ\nᒥ");
    }
}
