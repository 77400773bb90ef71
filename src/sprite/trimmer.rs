use image::RgbaImage;

/// Bounding box `(x, y, width, height)` of all pixels with non-zero alpha
pub fn alpha_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let (width, height) = image.dimensions();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    // Fully transparent (or empty) image
    if max_x < min_x || max_y < min_y {
        return None;
    }

    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Trim transparent borders from an image.
///
/// A fully transparent image is returned unchanged.
pub fn trim_transparent(image: RgbaImage) -> RgbaImage {
    match alpha_bounds(&image) {
        Some((x, y, w, h)) if (w, h) != image.dimensions() => {
            image::imageops::crop_imm(&image, x, y, w, h).to_image()
        }
        _ => image,
    }
}
