//! Miscellaneous routines shared by the layout and text stages.
//!
//! Provides:
//! - The `HasBBox` trait for pixel-aligned rectangles
//! - Aggregate statistics (mean, median, population standard deviation)
//!   that return `None` on empty input instead of dividing by zero

use itertools::Itertools;

/// A rectangle as (x, y, width, height) in image pixels, y growing downwards.
pub type Rect = (u32, u32, u32, u32);

/// Trait for objects that have an axis-aligned pixel bounding box.
pub trait HasBBox {
    fn x(&self) -> u32;
    fn y(&self) -> u32;
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn rect(&self) -> Rect {
        (self.x(), self.y(), self.width(), self.height())
    }

    /// Exclusive right edge.
    fn right(&self) -> u32 {
        self.x() + self.width()
    }

    /// Exclusive bottom edge.
    fn bottom(&self) -> u32 {
        self.y() + self.height()
    }

    fn area(&self) -> f64 {
        f64::from(self.width()) * f64::from(self.height())
    }

    fn center_x(&self) -> f64 {
        f64::from(self.x()) + f64::from(self.width()) / 2.0
    }

    fn center_y(&self) -> f64 {
        f64::from(self.y()) + f64::from(self.height()) / 2.0
    }

    /// Returns true if `other` lies entirely inside this rectangle, edges included.
    fn contains<B: HasBBox + ?Sized>(&self, other: &B) -> bool {
        other.x() >= self.x()
            && other.right() <= self.right()
            && other.y() >= self.y()
            && other.bottom() <= self.bottom()
    }
}

/// Arithmetic mean, or `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Median, averaging the two middle values for even lengths.
pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let sorted = values
        .into_iter()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect::<Vec<_>>();
    if sorted.is_empty() {
        return None;
    }

    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[middle - 1] + sorted[middle]) / 2.0)
    } else {
        Some(sorted[middle])
    }
}

/// Population standard deviation.
pub fn standard_deviation(values: &[f64]) -> Option<f64> {
    let m = mean(values.iter().copied())?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}
