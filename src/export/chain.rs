use image::RgbaImage;
use log::warn;

use super::background::remove_edge_background;
use super::edges::{SmartEdgeParams, crop_edges, trim_light_edges};
use super::options::ExportOptions;
use super::restore::restore_source_canvas;
use crate::cli::OffsetOrigin;
use crate::sprite::{PixelBuffer, ResizeMode, SpriteRect, resize_sprite, trim_transparent};

/// Per-sprite transforms with every flag resolved up front.
///
/// Built once per export call. When restoring is active all cropping steps
/// are switched off so sprites land on their source canvas untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformChain {
    pub edge_crop: u32,
    pub smart_edge: Option<SmartEdgeParams>,
    /// Tolerance for background removal, `None` when disabled
    pub remove_bg: Option<u8>,
    pub trim: bool,
    pub restore: bool,
    pub origin: OffsetOrigin,
    pub resize: ResizeMode,
}

impl TransformChain {
    pub fn resolve(options: &ExportOptions, registry_restore: bool, default_origin: OffsetOrigin) -> Self {
        let restore = options.restore_source.unwrap_or(registry_restore);
        let origin = options.offset_origin.unwrap_or(default_origin);

        let crops_requested = options.trim
            || options.edge_crop > 0
            || options.smart_edge_detect
            || options.remove_bg;
        if restore && crops_requested {
            warn!("Restoring source size; trim, edge crop and background removal are ignored");
        }

        let cropping = !restore;
        Self {
            edge_crop: if cropping { options.edge_crop } else { 0 },
            smart_edge: (cropping && options.smart_edge_detect).then_some(options.smart_edge),
            remove_bg: (cropping && options.remove_bg).then_some(options.background_tolerance),
            trim: cropping && options.trim,
            restore,
            origin,
            resize: options.resize,
        }
    }

    /// Cut one sprite out of the sheet and run it through every enabled step
    pub fn apply(&self, sheet: &PixelBuffer, sprite: &SpriteRect) -> RgbaImage {
        let mut img = sheet.crop(sprite.x, sprite.y, sprite.width, sprite.height);

        if self.edge_crop > 0 {
            img = crop_edges(img, self.edge_crop);
        }
        if let Some(params) = &self.smart_edge {
            img = trim_light_edges(img, params);
        }
        if let Some(tolerance) = self.remove_bg {
            img = remove_edge_background(img, tolerance);
        }
        if self.trim {
            img = trim_transparent(img);
        }
        if self.restore {
            img = restore_source_canvas(img, sprite, self.origin);
        }
        if self.resize.is_active() {
            img = resize_sprite(img, self.resize, self.origin);
        }

        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sheet() -> PixelBuffer {
        // Opaque 4x4 block at (2, 2) on a transparent 10x10 sheet
        let img = RgbaImage::from_fn(10, 10, |x, y| {
            if (2..6).contains(&x) && (2..6).contains(&y) {
                Rgba([10, 20, 30, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        PixelBuffer::from_image(img)
    }

    #[test]
    fn test_restore_disables_cropping() {
        let options = ExportOptions::new("out").trim(true).edge_crop(2).remove_bg(true);
        let chain = TransformChain::resolve(&options, true, OffsetOrigin::Top);

        assert!(chain.restore);
        assert!(!chain.trim);
        assert_eq!(chain.edge_crop, 0);
        assert_eq!(chain.remove_bg, None);
    }

    #[test]
    fn test_override_beats_registry_flag() {
        let options = ExportOptions::new("out")
            .trim(true)
            .restore_source(Some(false))
            .offset_origin(Some(OffsetOrigin::Bottom));
        let chain = TransformChain::resolve(&options, true, OffsetOrigin::Top);

        assert!(!chain.restore);
        assert!(chain.trim);
        assert_eq!(chain.origin, OffsetOrigin::Bottom);
    }

    #[test]
    fn test_trim_then_resize() {
        let options = ExportOptions::new("out")
            .trim(true)
            .resize(ResizeMode::Scale(2.0));
        let chain = TransformChain::resolve(&options, false, OffsetOrigin::Top);

        let out = chain.apply(&sheet(), &SpriteRect::new(0, 0, 10, 10, "a"));
        assert_eq!(out.dimensions(), (8, 8));
    }

    #[test]
    fn test_plain_crop() {
        let chain = TransformChain::resolve(&ExportOptions::new("out"), false, OffsetOrigin::Top);
        let out = chain.apply(&sheet(), &SpriteRect::new(1, 1, 6, 3, "a"));
        assert_eq!(out.dimensions(), (6, 3));
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(1, 1)[3], 255);
    }
}
