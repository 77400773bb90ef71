use image::{Rgba, RgbaImage, imageops};

pub const DEFAULT_EDGE_TOLERANCE: u8 = 30;
pub const DEFAULT_EDGE_SCAN_DEPTH: u32 = 10;
pub const DEFAULT_LIGHT_THRESHOLD: u32 = 200;

/// Tuning for divider-line detection along sprite edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartEdgeParams {
    /// Max per-channel difference from the line's first pixel
    pub tolerance: u8,
    /// How many lines inward each side is inspected
    pub max_depth: u32,
    /// Average RGB a line must exceed to count as light
    pub light_threshold: u32,
}

impl Default for SmartEdgeParams {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_EDGE_TOLERANCE,
            max_depth: DEFAULT_EDGE_SCAN_DEPTH,
            light_threshold: DEFAULT_LIGHT_THRESHOLD,
        }
    }
}

/// Remove a fixed number of pixels from every side.
///
/// Each side is clamped to half the dimension; if nothing would be left the
/// image is returned as is.
pub fn crop_edges(img: RgbaImage, amount: u32) -> RgbaImage {
    if amount == 0 {
        return img;
    }

    let (w, h) = img.dimensions();
    let left = amount.min(w / 2);
    let top = amount.min(h / 2);
    let right = w.saturating_sub(amount);
    let bottom = h.saturating_sub(amount);

    if right > left && bottom > top {
        imageops::crop_imm(&img, left, top, right - left, bottom - top).to_image()
    } else {
        img
    }
}

/// Strip light, uniform divider lines (typical grid separators) from the
/// sprite edges. Scanning on each side stops at the first line that is not
/// a divider.
pub fn trim_light_edges(img: RgbaImage, params: &SmartEdgeParams) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img;
    }

    let row_is_divider = |y: u32| is_divider((0..w).map(|x| img.get_pixel(x, y)), params);
    let col_is_divider = |x: u32| is_divider((0..h).map(|y| img.get_pixel(x, y)), params);

    let depth_y = params.max_depth.min(h);
    let depth_x = params.max_depth.min(w);

    let top = count(0..depth_y, row_is_divider);
    let bottom = count((0..depth_y).map(|i| h - 1 - i), row_is_divider);
    let left = count(0..depth_x, col_is_divider);
    let right = count((0..depth_x).map(|i| w - 1 - i), col_is_divider);

    let x1 = w - right;
    let y1 = h - bottom;
    if x1 > left && y1 > top {
        imageops::crop_imm(&img, left, top, x1 - left, y1 - top).to_image()
    } else {
        img
    }
}

/// Number of leading lines that satisfy `pred`
fn count(lines: impl Iterator<Item = u32>, pred: impl Fn(u32) -> bool) -> u32 {
    let mut n = 0;
    for line in lines {
        if !pred(line) {
            break;
        }
        n += 1;
    }
    n
}

fn is_divider<'a>(mut pixels: impl Iterator<Item = &'a Rgba<u8>>, params: &SmartEdgeParams) -> bool {
    let Some(first) = pixels.next() else {
        return false;
    };

    let sum: u32 = first.0[..3].iter().map(|&c| u32::from(c)).sum();
    if sum <= params.light_threshold * 3 {
        return false;
    }

    pixels.all(|p| (0..3).all(|i| p[i].abs_diff(first[i]) <= params.tolerance))
}
