use image::{Rgba, RgbaImage};

use crate::sprite::SpriteRect;

const OUTLINE_WIDTH: u32 = 2;

const PALETTE: [Rgba<u8>; 6] = [
    Rgba([255, 0, 0, 255]),
    Rgba([0, 255, 0, 255]),
    Rgba([0, 0, 255, 255]),
    Rgba([255, 255, 0, 255]),
    Rgba([255, 0, 255, 255]),
    Rgba([0, 255, 255, 255]),
];

/// Copy of the sheet with every sprite rectangle outlined
pub fn render_preview(sheet: &RgbaImage, sprites: &[SpriteRect]) -> RgbaImage {
    let mut preview = sheet.clone();
    for (i, sprite) in sprites.iter().enumerate() {
        draw_outline(&mut preview, sprite, PALETTE[i % PALETTE.len()]);
    }
    preview
}

fn draw_outline(img: &mut RgbaImage, rect: &SpriteRect, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    if rect.is_empty() || rect.x >= w || rect.y >= h {
        return;
    }

    let x0 = rect.x;
    let y0 = rect.y;
    let x1 = rect.x.saturating_add(rect.width - 1);
    let y1 = rect.y.saturating_add(rect.height - 1);

    for y in y0..=y1.min(h - 1) {
        for x in x0..=x1.min(w - 1) {
            let on_edge = x - x0 < OUTLINE_WIDTH
                || x1 - x < OUTLINE_WIDTH
                || y - y0 < OUTLINE_WIDTH
                || y1 - y < OUTLINE_WIDTH;
            if on_edge {
                img.put_pixel(x, y, color);
            }
        }
    }
}
