use image::{RgbaImage, imageops, imageops::FilterType};

use crate::cli::{OffsetOrigin, ResizeKind};

/// How exported sprites are resized
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ResizeMode {
    #[default]
    None,
    /// Multiply both dimensions by a factor
    Scale(f64),
    /// Fixed width, height follows the aspect ratio
    Width(u32),
    /// Fixed height, width follows the aspect ratio
    Height(u32),
    /// Exact size, aspect ratio ignored
    Custom { width: u32, height: u32 },
    /// Downscale to fit, then pad with transparency to exactly this size
    Fit { width: u32, height: u32 },
}

impl ResizeMode {
    /// Assemble a mode from the flat option set used by the CLI and config file
    pub fn from_parts(kind: ResizeKind, scale: f64, width: u32, height: u32) -> Self {
        match kind {
            ResizeKind::None => ResizeMode::None,
            ResizeKind::Scale => ResizeMode::Scale(scale),
            ResizeKind::Width => ResizeMode::Width(width),
            ResizeKind::Height => ResizeMode::Height(height),
            ResizeKind::Custom => ResizeMode::Custom { width, height },
            ResizeKind::Fit => ResizeMode::Fit { width, height },
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, ResizeMode::None)
    }
}

/// Resize a sprite according to `mode`.
///
/// Parameters that make no sense for the mode (zero targets, non-positive
/// scale) leave the image untouched.
pub fn resize_sprite(img: RgbaImage, mode: ResizeMode, origin: OffsetOrigin) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img;
    }

    let (new_width, new_height) = match mode {
        ResizeMode::Scale(scale) if scale > 0.0 => (scaled(w, scale), scaled(h, scale)),
        ResizeMode::Width(target) if target > 0 => {
            (target, scaled(h, f64::from(target) / f64::from(w)))
        }
        ResizeMode::Height(target) if target > 0 => {
            (scaled(w, f64::from(target) / f64::from(h)), target)
        }
        ResizeMode::Custom { width, height } if width > 0 && height > 0 => (width, height),
        ResizeMode::Fit { width, height } if width > 0 && height > 0 => {
            return fit_to_canvas(img, width, height, origin);
        }
        _ => return img,
    };

    imageops::resize(
        &img,
        new_width.max(1),
        new_height.max(1),
        FilterType::Lanczos3,
    )
}

/// Scale down (never up) to fit inside `target_w` x `target_h`, then pad
/// with transparency. Content is left aligned; vertical alignment follows
/// the offset origin.
fn fit_to_canvas(img: RgbaImage, target_w: u32, target_h: u32, origin: OffsetOrigin) -> RgbaImage {
    let (w, h) = img.dimensions();
    let ratio = (f64::from(target_w) / f64::from(w))
        .min(f64::from(target_h) / f64::from(h))
        .min(1.0);

    let new_width = scaled(w, ratio).clamp(1, target_w);
    let new_height = scaled(h, ratio).clamp(1, target_h);

    let resized = if (new_width, new_height) == (w, h) {
        img
    } else {
        imageops::resize(&img, new_width, new_height, FilterType::Lanczos3)
    };

    if resized.dimensions() == (target_w, target_h) {
        return resized;
    }

    let paste_y = match origin {
        OffsetOrigin::Top => 0,
        OffsetOrigin::Bottom => target_h - new_height,
    };

    let mut canvas = RgbaImage::new(target_w, target_h);
    imageops::replace(&mut canvas, &resized, 0, i64::from(paste_y));
    canvas
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "scaled sprite dimensions are non-negative and far below u32::MAX"
)]
fn scaled(len: u32, ratio: f64) -> u32 {
    (f64::from(len) * ratio).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255]))
    }

    #[test]
    fn test_fit_pads_to_target_top() {
        let out = resize_sprite(
            solid(72, 55),
            ResizeMode::Fit {
                width: 75,
                height: 75,
            },
            OffsetOrigin::Top,
        );

        assert_eq!(out.dimensions(), (75, 75));
        assert_eq!(out.get_pixel(0, 0)[3], 255);
        assert_eq!(out.get_pixel(0, 74)[3], 0);
    }

    #[test]
    fn test_fit_pads_to_target_bottom() {
        let out = resize_sprite(
            solid(72, 55),
            ResizeMode::Fit {
                width: 75,
                height: 75,
            },
            OffsetOrigin::Bottom,
        );

        assert_eq!(out.dimensions(), (75, 75));
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(0, 74)[3], 255);
    }

    #[test]
    fn test_fit_downscales_preserving_aspect() {
        let out = resize_sprite(
            solid(200, 100),
            ResizeMode::Fit {
                width: 50,
                height: 50,
            },
            OffsetOrigin::Top,
        );

        assert_eq!(out.dimensions(), (50, 50));
        // 200x100 becomes 50x25 in the top half
        assert_eq!(out.get_pixel(10, 10)[3], 255);
        assert_eq!(out.get_pixel(10, 40)[3], 0);
    }

    #[test]
    fn test_scale_floors_dimensions() {
        let out = resize_sprite(solid(10, 7), ResizeMode::Scale(0.5), OffsetOrigin::Top);
        assert_eq!(out.dimensions(), (5, 3));
    }

    #[test]
    fn test_width_and_height_preserve_aspect() {
        let out = resize_sprite(solid(40, 20), ResizeMode::Width(20), OffsetOrigin::Top);
        assert_eq!(out.dimensions(), (20, 10));

        let out = resize_sprite(solid(40, 20), ResizeMode::Height(40), OffsetOrigin::Top);
        assert_eq!(out.dimensions(), (80, 40));
    }

    #[test]
    fn test_custom_ignores_aspect() {
        let out = resize_sprite(
            solid(40, 20),
            ResizeMode::Custom {
                width: 7,
                height: 9,
            },
            OffsetOrigin::Top,
        );
        assert_eq!(out.dimensions(), (7, 9));
    }

    #[test]
    fn test_minimum_size_is_one() {
        let out = resize_sprite(solid(3, 3), ResizeMode::Scale(0.1), OffsetOrigin::Top);
        assert_eq!(out.dimensions(), (1, 1));
    }

    #[test]
    fn test_invalid_parameters_leave_image() {
        let out = resize_sprite(solid(4, 4), ResizeMode::Scale(0.0), OffsetOrigin::Top);
        assert_eq!(out.dimensions(), (4, 4));

        let out = resize_sprite(
            solid(4, 4),
            ResizeMode::Fit {
                width: 0,
                height: 8,
            },
            OffsetOrigin::Top,
        );
        assert_eq!(out.dimensions(), (4, 4));
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(
            ResizeMode::from_parts(ResizeKind::Fit, 1.0, 64, 32),
            ResizeMode::Fit {
                width: 64,
                height: 32
            }
        );
        assert!(!ResizeMode::from_parts(ResizeKind::None, 2.0, 1, 1).is_active());
    }
}
