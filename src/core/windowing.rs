use crate::core::Point;

/// Returns points whose `x` is strictly greater than `min_x`.
///
/// Realtime scrolling uses this to drop samples that left the visible window.
#[must_use]
pub fn points_after(points: &[Point], min_x: f64) -> Vec<Point> {
    points
        .iter()
        .filter(|point| point.x > min_x)
        .cloned()
        .collect()
}
