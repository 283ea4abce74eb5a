//! Shape sizing from how much of the output around a point is still unpainted.
use crate::canvas::Surface;
use crate::color::Background;

/// Fraction of the window around `center` still equal to the background.
/// The window spans `radius` on each side and is clamped to the surface.
pub fn empty_ratio(
    surface: &impl Surface,
    background: Background,
    center: [i64; 2],
    radius: u32,
) -> f32 {
    let radius = radius as i64;
    let clamp_x = |v: i64| v.clamp(0, surface.width() as i64) as u32;
    let clamp_y = |v: i64| v.clamp(0, surface.height() as i64) as u32;

    let (x0, x1) = (clamp_x(center[0] - radius), clamp_x(center[0] + radius));
    let (y0, y1) = (clamp_y(center[1] - radius), clamp_y(center[1] + radius));

    let total = (x1 - x0) as u64 * (y1 - y0) as u64;
    if total == 0 {
        return 0.0;
    }

    let empty = (y0..y1)
        .flat_map(|y| (x0..x1).map(move |x| [x, y]))
        .filter(|&point| surface.color_at(point) == background.color())
        .count();

    empty as f32 / total as f32
}

/// Emptier areas get bigger shapes, fuller areas shrink toward the minimum.
/// Bounds scale with the smaller side of the surface. The minimum wins over
/// the maximum on surfaces too small to hold both.
pub fn size_for_empty_ratio(ratio: f32, width: u32, height: u32) -> f32 {
    let min_side = width.min(height) as f32;
    let base = min_side * 0.1;
    let max = min_side * 0.6;
    let min = (base * 0.5).max(1.0);

    if ratio > 0.5 {
        (base * (1.0 + ratio)).min(max).max(min)
    } else {
        (base * (1.0 - (1.0 - ratio) * 0.5)).max(min)
    }
}

/// Shape size in output pixels for a brush dab at `center`.
pub fn adaptive_size(
    surface: &impl Surface,
    background: Background,
    center: [i64; 2],
    radius: u32,
) -> f32 {
    let ratio = empty_ratio(surface, background, center, radius);
    size_for_empty_ratio(ratio, surface.width(), surface.height())
}
