//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or pixels:
//! resize/crop planning, watermark placement offsets and the rectangle a
//! watermark would cover.
//!
//! Integer outputs always use floor division. A floored dimension that would
//! reach zero is raised to one pixel, so a plan never asks for an empty image.

use super::params::Method;

/// Width and height of an image or canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Result of [`plan_resize`]: the canvas to allocate and the part of the
/// source that gets scaled onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub target: Dimensions,
    pub source: Rect,
}

fn floor_dim(value: f64) -> u32 {
    (value.floor() as u32).max(1)
}

/// Plan a resize of a `source` image against requested bounds.
///
/// A missing bound is unbounded. Returns `None` when neither bound is given.
///
/// - [`Method::Fit`]: keep the whole source and its aspect ratio; the result
///   never exceeds the requested bounds nor the source size.
/// - [`Method::Crop`]: the result is exactly `min(requested, source)` on both
///   axes; the source is centre-cropped to that aspect ratio first.
///
/// # Examples
/// ```
/// # use imgpipe::imaging::{plan_resize, Method};
/// // 200x100 fit into 100x100 → 100x50
/// let plan = plan_resize((200, 100), Some(100), Some(100), Method::Fit).unwrap();
/// assert_eq!((plan.target.width, plan.target.height), (100, 50));
/// ```
pub fn plan_resize(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
    method: Method,
) -> Option<ResizePlan> {
    if width.is_none() && height.is_none() {
        return None;
    }

    let (src_w, src_h) = source;
    let req_w = width.map_or(f64::INFINITY, f64::from);
    let req_h = height.map_or(f64::INFINITY, f64::from);
    let source_ratio = src_w as f64 / src_h as f64;
    let requested_ratio = req_w / req_h;

    let plan = match method {
        Method::Fit => {
            let target = if source_ratio >= requested_ratio {
                let w = req_w.min(src_w as f64);
                Dimensions {
                    width: floor_dim(w),
                    height: floor_dim(w / source_ratio),
                }
            } else {
                let h = req_h.min(src_h as f64);
                Dimensions {
                    width: floor_dim(h * source_ratio),
                    height: floor_dim(h),
                }
            };
            ResizePlan {
                target,
                source: Rect {
                    x: 0,
                    y: 0,
                    width: src_w,
                    height: src_h,
                },
            }
        }
        Method::Crop => {
            let target = Dimensions {
                width: floor_dim(req_w.min(src_w as f64)),
                height: floor_dim(req_h.min(src_h as f64)),
            };
            ResizePlan {
                target,
                source: crop_rect(source, target),
            }
        }
    };

    Some(plan)
}

/// Largest centred rectangle of `source` with the aspect ratio of `target`.
pub fn crop_rect(source: (u32, u32), target: Dimensions) -> Rect {
    let (src_w, src_h) = source;
    let source_ratio = src_w as f64 / src_h as f64;
    let target_ratio = target.width as f64 / target.height as f64;

    if source_ratio >= target_ratio {
        // Source is wider: keep full height, trim the sides
        let width = floor_dim(src_h as f64 * target_ratio).min(src_w);
        Rect {
            x: (src_w - width) / 2,
            y: 0,
            width,
            height: src_h,
        }
    } else {
        // Source is taller: keep full width, trim top and bottom
        let height = floor_dim(src_w as f64 / target_ratio).min(src_h);
        Rect {
            x: 0,
            y: (src_h - height) / 2,
            width: src_w,
            height,
        }
    }
}

/// Top-left offset of a `mark` placed at fractional point `(x, y)` on `base`.
///
/// `(0, 0)` is flush top-left, `(1, 1)` flush bottom-right. The offset is
/// negative when the mark is larger than the base on that axis.
pub fn watermark_offset(base: Dimensions, mark: Dimensions, x: f64, y: f64) -> (i64, i64) {
    let dx = (base.width as f64 - mark.width as f64) * x;
    let dy = (base.height as f64 - mark.height as f64) * y;
    (dx.round() as i64, dy.round() as i64)
}

/// The part of `base` covered by `mark` at `offset`, or `None` if they do
/// not overlap.
pub fn covered_rect(base: Dimensions, mark: Dimensions, offset: (i64, i64)) -> Option<Rect> {
    let (ox, oy) = offset;
    let x1 = ox.max(0);
    let y1 = oy.max(0);
    let x2 = (ox + mark.width as i64).min(base.width as i64);
    let y2 = (oy + mark.height as i64).min(base.height as i64);
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(Rect {
        x: x1 as u32,
        y: y1 as u32,
        width: (x2 - x1) as u32,
        height: (y2 - y1) as u32,
    })
}
