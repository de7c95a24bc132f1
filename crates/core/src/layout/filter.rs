//! Candidate box filtering.

use tracing::debug;

use super::glyph_box::{GlyphBox, is_valid};
use super::params::{RecognitionParams, Region};
use crate::utils::{HasBBox, mean};

/// Drops implausible, out-of-region and noise-sized candidates.
///
/// Boxes more elongated than `max_aspect_ratio`, boxes that vanish under
/// normalisation and boxes outside `region` go first; then anything whose
/// area does not exceed `noise_area_ratio` of the survivors' mean area.
/// Dropped boxes release their handles. An empty result means the run has
/// nothing to recognise.
pub fn filter_boxes<H>(
    params: &RecognitionParams,
    boxes: Vec<GlyphBox<H>>,
    region: Option<&Region>,
) -> Vec<GlyphBox<H>> {
    let total = boxes.len();
    let max_aspect = params.max_aspect_ratio;

    let plausible: Vec<_> = boxes
        .into_iter()
        .filter(|b| {
            let (w, h) = (f64::from(b.width()), f64::from(b.height()));
            h <= max_aspect * w && w <= max_aspect * h
        })
        .filter(|b| region.is_none_or(|r| r.contains(b)))
        .filter(|b| is_valid(b, params.normalized_size))
        .collect();

    let Some(mean_area) = mean(plausible.iter().map(HasBBox::area)) else {
        debug!(total, "no plausible candidate boxes");
        return plausible;
    };

    let noise_floor = mean_area * params.noise_area_ratio;
    let filtered: Vec<_> = plausible
        .into_iter()
        .filter(|b| b.area() > noise_floor)
        .collect();

    debug!(
        total,
        kept = filtered.len(),
        mean_area,
        "filtered candidate boxes"
    );
    filtered
}
