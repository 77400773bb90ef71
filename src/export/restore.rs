use image::{RgbaImage, imageops};

use crate::cli::OffsetOrigin;
use crate::sprite::SpriteRect;

/// Put a trimmed sprite back onto its original untrimmed canvas.
///
/// Sprites without a recorded source size are returned unchanged. With
/// [`OffsetOrigin::Bottom`] the vertical offset is measured from the bottom
/// edge of the source canvas.
pub fn restore_source_canvas(img: RgbaImage, sprite: &SpriteRect, origin: OffsetOrigin) -> RgbaImage {
    if !sprite.has_source_size() {
        return img;
    }

    let x = i64::from(sprite.off_x.max(0));
    let y = match origin {
        OffsetOrigin::Top => i64::from(sprite.off_y.max(0)),
        OffsetOrigin::Bottom => (i64::from(sprite.source_h)
            - i64::from(sprite.off_y)
            - i64::from(sprite.height))
        .max(0),
    };

    let mut canvas = RgbaImage::new(sprite.source_w, sprite.source_h);
    imageops::replace(&mut canvas, &img, x, y);
    canvas
}
