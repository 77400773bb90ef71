use std::collections::VecDeque;

use image::{Rgba, RgbaImage};
use log::debug;

use crate::sprite::{VisitGrid, corner_pixels, neighbours, rgb_distance};

pub const DEFAULT_BACKGROUND_TOLERANCE: u8 = 30;

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Clear the solid background that surrounds a sprite.
///
/// The top-left corner is the candidate color and at least two corners must
/// agree with it. Only pixels connected to the image border are cleared, so
/// background-colored areas enclosed by the sprite survive.
pub fn remove_edge_background(mut img: RgbaImage, tolerance: u8) -> RgbaImage {
    let Some(corners) = corner_pixels(&img) else {
        return img;
    };

    let bg = [corners[0][0], corners[0][1], corners[0][2]];
    let agreeing = corners
        .iter()
        .filter(|c| rgb_distance(c, bg) < u32::from(tolerance) * 3)
        .count();
    if agreeing < 2 {
        debug!("No consistent background color in corners, leaving sprite untouched");
        return img;
    }

    let matches = |p: &Rgba<u8>| (0..3).all(|i| p[i].abs_diff(bg[i]) <= tolerance);

    let (w, h) = img.dimensions();
    let mut visited = VisitGrid::new(w, h);
    let mut queue = VecDeque::new();

    let rows = (0..w).flat_map(|x| [(x, 0), (x, h - 1)]);
    let cols = (0..h).flat_map(|y| [(0, y), (w - 1, y)]);
    for (x, y) in rows.chain(cols) {
        if !visited.is_set(x, y) && matches(img.get_pixel(x, y)) {
            visited.set(x, y);
            queue.push_back((x, y));
        }
    }

    let mut cleared = 0u64;
    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in neighbours(x, y, w, h) {
            if !visited.is_set(nx, ny) && matches(img.get_pixel(nx, ny)) {
                visited.set(nx, ny);
                queue.push_back((nx, ny));
            }
        }
        img.put_pixel(x, y, CLEAR);
        cleared += 1;
    }

    debug!("Cleared {} background pixels", cleared);
    img
}
