//! Dot-to-glyph merging.
//!
//! Syllabics carry small dot diacritics that segmentation detects as
//! separate boxes. Two passes fold them back into the glyph they belong to:
//!
//! - `merge_dots()` scans the whole page top to bottom, only looking ahead
//!   and only within a vertical reach of the dot.
//! - `merge_grouped_dots()` runs once boxes are grouped by line and looks at
//!   every other box on the line, catching dots the first pass missed.
//!
//! Both passes mutate their working set in place and depend on re-scanning
//! after every merge, so neither may be parallelised.

use std::cmp::Ordering;

use tracing::{debug, trace};

use super::glyph_box::{GlyphBox, is_valid_size, merged_rect};
use super::params::RecognitionParams;
use crate::utils::{HasBBox, median};

/// Medians of a set of boxes, the reference scale for dot detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianStats {
    pub area: f64,
    pub width: f64,
    pub height: f64,
}

impl MedianStats {
    /// Returns `None` for an empty set.
    pub fn from_boxes<B: HasBBox>(boxes: &[B]) -> Option<Self> {
        Some(Self {
            area: median(boxes.iter().map(HasBBox::area))?,
            width: median(boxes.iter().map(|b| f64::from(b.width())))?,
            height: median(boxes.iter().map(|b| f64::from(b.height())))?,
        })
    }

    /// Small and not too tall: may be a dot above or beside a glyph.
    pub fn is_dot<B: HasBBox>(&self, params: &RecognitionParams, b: &B) -> bool {
        b.area() < self.area * params.dot_area_ratio
            && f64::from(b.height()) < params.dot_merge_aspect * f64::from(b.width())
    }

    /// Both sides well below the median: too small to carry a dot.
    pub fn is_too_small<B: HasBBox>(&self, params: &RecognitionParams, b: &B) -> bool {
        f64::from(b.width()) < self.width * params.candidate_size_ratio
            && f64::from(b.height()) < self.height * params.candidate_size_ratio
    }
}

/// Orders boxes top to bottom, then left to right. The sort is stable.
pub fn sort_boxes<B: HasBBox>(boxes: &mut [B]) {
    boxes.sort_by(|a, b| match a.y().cmp(&b.y()) {
        Ordering::Equal => a.x().cmp(&b.x()),
        ord => ord,
    });
}

fn merge_is_valid<A: HasBBox, B: HasBBox>(params: &RecognitionParams, a: &A, b: &B) -> bool {
    let (_, _, width, height) = merged_rect(a, b);
    is_valid_size(width, height, params.normalized_size)
}

/// First pass: merges dots into the next suitable glyph below them.
///
/// Boxes are sorted by (y, x) first. For each dot, later boxes are scanned
/// until one lies further below than the vertical reach
/// `max(merge_height_factor * dot height, merge_median_height_factor * median height)`.
/// The first candidate that is not too small, spans the dot horizontally
/// (with `merge_width_factor * dot width` of slack) and yields a valid
/// merged box absorbs the dot. Unmatched dots are kept as they are.
pub fn merge_dots<H>(params: &RecognitionParams, mut boxes: Vec<GlyphBox<H>>) -> Vec<GlyphBox<H>> {
    sort_boxes(&mut boxes);
    let Some(stats) = MedianStats::from_boxes(&boxes) else {
        return boxes;
    };

    let total = boxes.len();
    let mut slots: Vec<Option<GlyphBox<H>>> = boxes.into_iter().map(Some).collect();
    let mut merges = 0usize;

    for i in 0..slots.len() {
        let Some(dot) = slots[i].as_ref() else {
            continue;
        };
        if !stats.is_dot(params, dot) {
            continue;
        }

        let Some(j) = find_partner_below(params, &stats, dot, &slots, i) else {
            continue;
        };

        let dot = slots[i].take();
        if let (Some(dot), Some(partner)) = (dot, slots[j].as_mut()) {
            trace!(dot = ?dot.rect(), partner = ?partner.rect(), "merging dot");
            partner.absorb(dot);
            merges += 1;
        }
    }

    let merged: Vec<_> = slots.into_iter().flatten().collect();
    debug!(total, merges, kept = merged.len(), "sequential dot merge");
    merged
}

fn find_partner_below<H>(
    params: &RecognitionParams,
    stats: &MedianStats,
    dot: &GlyphBox<H>,
    slots: &[Option<GlyphBox<H>>],
    index: usize,
) -> Option<usize> {
    let y_threshold = (f64::from(dot.height()) * params.merge_height_factor)
        .max(stats.height * params.merge_median_height_factor);
    let x_threshold = f64::from(dot.width()) * params.merge_width_factor;
    let dot_bottom = i64::from(dot.bottom());

    for (j, slot) in slots.iter().enumerate().skip(index + 1) {
        let Some(candidate) = slot else {
            continue;
        };
        if stats.is_too_small(params, candidate) {
            continue;
        }

        // Sorted by y: stop once candidates start out of reach
        if (i64::from(candidate.y()) - dot_bottom) as f64 > y_threshold {
            break;
        }

        if dot.is_within_x(candidate, x_threshold) && merge_is_valid(params, dot, candidate) {
            return Some(j);
        }
    }

    None
}

/// Second pass: merges dots within each line, without a vertical reach.
///
/// Every other box on the line is a candidate unless the dot sits lower than
/// `grouped_overlap_ratio` of the candidate's height below its top edge.
/// After a merge the dot is removed and the same position is examined
/// again. Lines never exchange boxes.
pub fn merge_grouped_dots<H>(params: &RecognitionParams, groups: &mut [Vec<GlyphBox<H>>]) {
    let mut merges = 0usize;

    for line in groups.iter_mut() {
        let Some(stats) = MedianStats::from_boxes(line) else {
            continue;
        };

        let mut i = 0;
        while i < line.len() {
            if stats.is_dot(params, &line[i]) {
                if let Some(j) = find_partner_in_line(params, &stats, line, i) {
                    let dot = line.remove(i);
                    let j = if j > i { j - 1 } else { j };
                    trace!(dot = ?dot.rect(), partner = ?line[j].rect(), "merging dot in line");
                    line[j].absorb(dot);
                    merges += 1;
                    continue;
                }
            }
            i += 1;
        }
    }

    debug!(lines = groups.len(), merges, "grouped dot merge");
}

fn find_partner_in_line<H>(
    params: &RecognitionParams,
    stats: &MedianStats,
    line: &[GlyphBox<H>],
    index: usize,
) -> Option<usize> {
    let dot = &line[index];
    let x_threshold = f64::from(dot.width()) * params.merge_width_factor;
    let dot_bottom = i64::from(dot.bottom());

    line.iter().enumerate().position(|(j, candidate)| {
        if j == index {
            return false;
        }

        // The dot may not reach below the top part of the candidate
        let gap = (i64::from(candidate.y()) - dot_bottom) as f64;
        if gap < -f64::from(candidate.height()) * params.grouped_overlap_ratio {
            return false;
        }

        !stats.is_too_small(params, candidate)
            && dot.is_within_x(candidate, x_threshold)
            && merge_is_valid(params, dot, candidate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(rect: (u32, u32, u32, u32), id: u32) -> GlyphBox<u32> {
        GlyphBox::new(rect, id)
    }

    fn row_of_glyphs(count: u32, y: u32, first_id: u32) -> Vec<GlyphBox<u32>> {
        (0..count)
            .map(|i| glyph((10 + i * 50, y, 40, 40), first_id + i))
            .collect()
    }

    #[test]
    fn test_sort_boxes_by_y_then_x() {
        let mut boxes = vec![
            glyph((50, 10, 5, 5), 0),
            glyph((0, 20, 5, 5), 1),
            glyph((10, 10, 5, 5), 2),
        ];
        sort_boxes(&mut boxes);
        let ids: Vec<_> = boxes.iter().map(|b| b.handles()[0]).collect();
        assert_eq!(ids, vec![2, 0, 1]);
    }

    #[test]
    fn test_dot_above_glyph_is_merged() {
        let mut boxes = row_of_glyphs(3, 20, 0);
        boxes.push(glyph((26, 8, 8, 8), 9));

        let merged = merge_dots(&RecognitionParams::default(), boxes);

        assert_eq!(merged.len(), 3);
        let dotted = merged.iter().find(|b| b.handles().contains(&9)).unwrap();
        assert_eq!(dotted.rect(), (10, 8, 40, 52));
        assert_eq!(dotted.handles(), &[0, 9]);
    }

    #[test]
    fn test_dot_beyond_vertical_reach_is_kept() {
        let mut boxes = row_of_glyphs(3, 100, 0);
        // Bottom at 16, reach is max(24, 28) = 28, glyph top at 100
        boxes.push(glyph((26, 8, 8, 8), 9));

        let merged = merge_dots(&RecognitionParams::default(), boxes);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_dot_outside_horizontal_slack_is_kept() {
        let mut boxes = row_of_glyphs(3, 20, 0);
        // Slack is 10px: the first glyph widens to 0..60, which holds 52..60
        boxes.push(glyph((52, 8, 8, 8), 9));
        let merged = merge_dots(&RecognitionParams::default(), boxes);
        assert_eq!(merged.len(), 3);

        let mut boxes = row_of_glyphs(3, 20, 0);
        boxes.push(glyph((170, 8, 8, 8), 9));
        let merged = merge_dots(&RecognitionParams::default(), boxes);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_dot_does_not_merge_into_earlier_box() {
        // The glyph sorts before the dot, and the first pass only looks ahead
        let mut boxes = row_of_glyphs(3, 10, 0);
        boxes.push(glyph((54, 26, 8, 8), 9));
        let merged = merge_dots(&RecognitionParams::default(), boxes);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_grouped_merge_catches_dot_beside_top() {
        let params = RecognitionParams::default();
        let mut line = row_of_glyphs(3, 20, 0);
        // Dot to the left of the second glyph, level with its top edge
        line.insert(1, glyph((52, 16, 8, 8), 9));
        let mut groups = vec![line];

        merge_grouped_dots(&params, &mut groups);

        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[0][0].handles(), &[0, 9]);
    }

    #[test]
    fn test_grouped_merge_rejects_dot_low_beside_glyph() {
        let params = RecognitionParams::default();
        let mut line = row_of_glyphs(3, 10, 0);
        line.insert(1, glyph((54, 26, 8, 8), 9));
        let mut groups = vec![line];

        merge_grouped_dots(&params, &mut groups);
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn test_grouped_merge_skips_empty_lines() {
        let mut groups: Vec<Vec<GlyphBox<u32>>> = vec![Vec::new(), row_of_glyphs(2, 0, 0)];
        merge_grouped_dots(&RecognitionParams::default(), &mut groups);
        assert!(groups[0].is_empty());
        assert_eq!(groups[1].len(), 2);
    }
}
