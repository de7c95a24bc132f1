//! Box-to-line grouping.

use tracing::debug;

use super::glyph_box::GlyphBox;
use super::lines::LineSet;
use crate::utils::HasBBox;

/// Index of the line nearest to row `mid`.
///
/// Relies on the strictly ascending order `LineSet` guarantees: distance to
/// `mid` falls and then rises along the list, so the scan stops at the first
/// increase. Equidistant lines resolve to the lower one on the page.
pub fn nearest_line(lines: &LineSet, mid: f64) -> Option<usize> {
    let positions = lines.positions();
    let first = *positions.first()?;

    let mut best = 0;
    let mut best_distance = (first as f64 - mid).abs();
    for (i, &line) in positions.iter().enumerate().skip(1) {
        let distance = (line as f64 - mid).abs();
        if distance > best_distance {
            break;
        }
        best = i;
        best_distance = distance;
    }

    Some(best)
}

/// Assigns every box to its nearest line, then orders each line left to
/// right by horizontal centre.
///
/// Without lines, all boxes form a single group in their given order.
pub fn group_by_line<H>(boxes: Vec<GlyphBox<H>>, lines: &LineSet) -> Vec<Vec<GlyphBox<H>>> {
    if lines.is_empty() {
        return vec![boxes];
    }

    let mut groups: Vec<Vec<GlyphBox<H>>> = (0..lines.len()).map(|_| Vec::new()).collect();
    for b in boxes {
        if let Some(line) = nearest_line(lines, b.center_y()) {
            groups[line].push(b);
        }
    }

    for group in &mut groups {
        group.sort_by(|a, b| a.center_x().total_cmp(&b.center_x()));
    }

    debug!(
        lines = groups.len(),
        empty = groups.iter().filter(|g| g.is_empty()).count(),
        "grouped boxes by line"
    );
    groups
}
