//! Glyph candidate boxes.
//!
//! A `GlyphBox` is a pixel rectangle plus the detection handles (contours)
//! it owns. Merging two boxes consumes both and moves every handle into the
//! result, so a handle is never owned by two live boxes.

use serde::Serialize;
use smallvec::SmallVec;

use crate::utils::{HasBBox, Rect};

/// Handles owned by one box. Most boxes own one contour, dotted glyphs two.
pub type Handles<H> = SmallVec<[H; 2]>;

/// Candidate glyph rectangle with its owned detection handles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphBox<H> {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    handles: Handles<H>,
}

impl<H> GlyphBox<H> {
    /// Creates a box owning a single detection handle.
    pub fn new(rect: Rect, handle: H) -> Self {
        let mut handles = Handles::new();
        handles.push(handle);
        Self::with_handles(rect, handles)
    }

    pub fn with_handles(rect: Rect, handles: Handles<H>) -> Self {
        let (x, y, width, height) = rect;
        Self {
            x,
            y,
            width,
            height,
            handles,
        }
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    pub fn into_handles(self) -> Handles<H> {
        self.handles
    }

    /// Merges two boxes into the smallest box containing both.
    ///
    /// Both operands are consumed; the result owns `self`'s handles followed
    /// by `other`'s.
    pub fn merge(mut self, other: Self) -> Self {
        self.absorb(other);
        self
    }

    /// In-place form of [`GlyphBox::merge`]: grows this box to cover `other`
    /// and takes over its handles.
    pub fn absorb(&mut self, other: Self) {
        (self.x, self.y, self.width, self.height) = merged_rect(&*self, &other);
        self.handles.extend(other.handles);
    }

    /// Returns true if this box fits inside `candidate`'s horizontal span
    /// widened by `threshold` on both sides.
    pub fn is_within_x<B: HasBBox>(&self, candidate: &B, threshold: f64) -> bool {
        let start = f64::from(candidate.x()) - threshold;
        let end = f64::from(candidate.right()) + threshold;
        start <= f64::from(self.x) && end >= f64::from(self.right())
    }

    /// Geometry for scaling this box into a `size`×`size` square bitmap.
    pub fn normalization(&self, size: u32) -> Normalization {
        Normalization::new(self.width, self.height, size)
    }
}

impl<H> HasBBox for GlyphBox<H> {
    fn x(&self) -> u32 {
        self.x
    }
    fn y(&self) -> u32 {
        self.y
    }
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
}

/// The smallest rectangle containing both boxes.
pub fn merged_rect<A: HasBBox, B: HasBBox>(a: &A, b: &B) -> Rect {
    let x = a.x().min(b.x());
    let y = a.y().min(b.y());
    let width = a.right().max(b.right()) - x;
    let height = a.bottom().max(b.bottom()) - y;
    (x, y, width, height)
}

/// A box is valid if neither side vanishes when the box is scaled so that
/// its larger side equals `size`.
pub fn is_valid_size(width: u32, height: u32, size: u32) -> bool {
    let size = f64::from(size);
    let (w, h) = (f64::from(width), f64::from(height));
    let scale = (size / w).min(size / h);
    w * scale >= 1.0 && h * scale >= 1.0
}

pub fn is_valid<B: HasBBox>(b: &B, size: u32) -> bool {
    is_valid_size(b.width(), b.height(), size)
}

/// Scale and padding that map a box onto a square classifier input.
///
/// The box is scaled uniformly so its larger side fills the square, then
/// centred with the odd pixel of padding going to the bottom/right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Normalization {
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    pub pad_top: u32,
    pub pad_bottom: u32,
    pub pad_left: u32,
    pub pad_right: u32,
}

impl Normalization {
    pub fn new(width: u32, height: u32, size: u32) -> Self {
        let scale = (f64::from(size) / f64::from(width)).min(f64::from(size) / f64::from(height));
        let scaled_w = ((f64::from(width) * scale).floor() as u32).min(size);
        let scaled_h = ((f64::from(height) * scale).floor() as u32).min(size);
        let pad_top = (size - scaled_h) / 2;
        let pad_left = (size - scaled_w) / 2;
        Self {
            scale,
            width: scaled_w,
            height: scaled_h,
            pad_top,
            pad_bottom: size - scaled_h - pad_top,
            pad_left,
            pad_right: size - scaled_w - pad_left,
        }
    }
}
