//! Watermark placement and compositing.
//!
//! A watermark goes either at a fixed fractional point or at the candidate
//! point where it contrasts most with what lies underneath. Contrast is the
//! absolute difference between the watermark's own average brightness and
//! the average brightness of the base region it would cover.
//!
//! Brightness is perceptual luma, `0.299 R + 0.587 G + 0.114 B`, averaged over
//! fully opaque pixels only (alpha 255). Anything with transparency, down to
//! an anti-aliased edge, is left out. A region with no opaque pixel averages
//! to `0.0`.

use super::calculations::{Dimensions, Rect, covered_rect, watermark_offset};
use super::params::{Placement, Point};
use image::{Rgba, RgbaImage, imageops};

fn dimensions(pixels: &RgbaImage) -> Dimensions {
    Dimensions {
        width: pixels.width(),
        height: pixels.height(),
    }
}

/// Perceptual luma of a pixel, or `None` unless it is fully opaque.
pub fn luma(pixel: &Rgba<u8>) -> Option<f64> {
    let [r, g, b, a] = pixel.0;
    if a != u8::MAX {
        return None;
    }
    Some(0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b))
}

/// Average luma of the opaque pixels in `rect`.
pub fn region_brightness(pixels: &RgbaImage, rect: Rect) -> f64 {
    let mut total = 0.0;
    let mut count = 0u64;
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            if let Some(l) = luma(pixels.get_pixel(x, y)) {
                total += l;
                count += 1;
            }
        }
    }
    if count == 0 { 0.0 } else { total / count as f64 }
}

/// Average luma of every opaque pixel in the image.
pub fn brightness(pixels: &RgbaImage) -> f64 {
    region_brightness(
        pixels,
        Rect {
            x: 0,
            y: 0,
            width: pixels.width(),
            height: pixels.height(),
        },
    )
}

/// Pixel offset of `mark`'s top-left corner when placed at `point` on `base`.
pub fn offset_at(base: &RgbaImage, mark: &RgbaImage, point: Point) -> (i64, i64) {
    watermark_offset(dimensions(base), dimensions(mark), point.x, point.y)
}

/// The candidate with the highest contrast; the first one wins a tie.
///
/// Returns the default centre point for an empty list.
pub fn best_point(base: &RgbaImage, mark: &RgbaImage, candidates: &[Point]) -> Point {
    let mark_brightness = brightness(mark);
    let mut best: Option<(usize, f64)> = None;

    for (index, &point) in candidates.iter().enumerate() {
        let offset = offset_at(base, mark, point);
        let region = covered_rect(dimensions(base), dimensions(mark), offset)
            .map_or(0.0, |rect| region_brightness(base, rect));
        let contrast = (region - mark_brightness).abs();
        if best.is_none_or(|(_, c)| contrast > c) {
            best = Some((index, contrast));
        }
    }

    match best {
        Some((index, contrast)) => {
            tracing::debug!(index, contrast, mark_brightness, "picked watermark position");
            candidates[index]
        }
        None => Point::default(),
    }
}

/// Resolve a placement to the point the watermark will actually go.
pub fn resolve(base: &RgbaImage, mark: &RgbaImage, placement: &Placement) -> Point {
    match placement {
        Placement::At(point) => *point,
        Placement::BestOf(candidates) => best_point(base, mark, candidates),
    }
}

/// Blend `mark` onto `base` in place. Parts falling outside `base` are clipped.
pub fn stamp(base: &mut RgbaImage, mark: &RgbaImage, placement: &Placement) {
    let point = resolve(base, mark, placement);
    let (x, y) = offset_at(base, mark, point);
    imageops::overlay(base, mark, x, y);
}

/// Blend `mark` onto a copy of `base`.
pub fn composite(base: &RgbaImage, mark: &RgbaImage, placement: &Placement) -> RgbaImage {
    let mut out = base.clone();
    stamp(&mut out, mark, placement);
    out
}
