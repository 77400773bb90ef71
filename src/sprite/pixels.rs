use std::path::Path;

use anyhow::Result;
use image::{ImageReader, Rgba, RgbaImage, imageops};
use log::info;

use super::rect::MAX_SPRITE_PIXELS;
use crate::error::SplitError;

/// Decoded RGBA pixels of one loaded sheet
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Decode an image file into RGBA
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SplitError::ImageNotFound(path.to_path_buf()).into());
        }

        let image = ImageReader::open(path)
            .map_err(|e| SplitError::ImageLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })?
            .with_guessed_format()
            .map_err(|e| SplitError::ImageLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })?
            .decode()
            .map_err(|e| SplitError::ImageLoad {
                path: path.to_path_buf(),
                source: e,
            })?
            .into_rgba8();

        info!(
            "Loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(Self { image })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Copy a region out of the sheet.
    ///
    /// Parts of the region that fall outside the sheet come back transparent,
    /// so rectangles read from untrusted data files never panic. A region
    /// larger than [`MAX_SPRITE_PIXELS`] is cut down to its overlap with
    /// the sheet instead of being padded.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
        let (sheet_w, sheet_h) = self.image.dimensions();
        let inside_w = width.min(sheet_w.saturating_sub(x));
        let inside_h = height.min(sheet_h.saturating_sub(y));

        let padded_area = u64::from(width) * u64::from(height);
        if (inside_w == width && inside_h == height) || padded_area > MAX_SPRITE_PIXELS {
            return imageops::crop_imm(&self.image, x, y, inside_w, inside_h).to_image();
        }

        let mut out = RgbaImage::new(width, height);
        if inside_w > 0 && inside_h > 0 {
            let inside = imageops::crop_imm(&self.image, x, y, inside_w, inside_h).to_image();
            imageops::replace(&mut out, &inside, 0, 0);
        }
        out
    }
}

/// Corner pixels in the order top-left, top-right, bottom-left, bottom-right
pub(crate) fn corner_pixels(image: &RgbaImage) -> Option<[Rgba<u8>; 4]> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    Some([
        *image.get_pixel(0, 0),
        *image.get_pixel(w - 1, 0),
        *image.get_pixel(0, h - 1),
        *image.get_pixel(w - 1, h - 1),
    ])
}

/// Sum of absolute RGB channel differences, alpha ignored
pub(crate) fn rgb_distance(pixel: &Rgba<u8>, color: [u8; 3]) -> u32 {
    (0..3)
        .map(|i| u32::from(pixel[i].abs_diff(color[i])))
        .sum()
}

/// Flat visited-flag grid addressed by `y * width + x`
pub(crate) struct VisitGrid {
    width: usize,
    cells: Vec<bool>,
}

impl VisitGrid {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let width = width as usize;
        Self {
            width,
            cells: vec![false; width * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width + x as usize
    }

    pub(crate) fn is_set(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)]
    }

    pub(crate) fn set(&mut self, x: u32, y: u32) {
        let i = self.index(x, y);
        self.cells[i] = true;
    }
}

/// 4-connected neighbours of `(x, y)` that lie inside a `width` x `height` grid
pub(crate) fn neighbours(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let right = (x + 1 < width).then(|| (x + 1, y));
    let left = x.checked_sub(1).map(|nx| (nx, y));
    let down = (y + 1 < height).then(|| (x, y + 1));
    let up = y.checked_sub(1).map(|ny| (x, ny));
    [right, left, down, up].into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_crop_inside() {
        let sheet = PixelBuffer::from_image(checker(10, 10));
        let tile = sheet.crop(2, 3, 4, 5);
        assert_eq!(tile.dimensions(), (4, 5));
        assert_eq!(*tile.get_pixel(0, 0), Rgba([2, 3, 0, 255]));
        assert_eq!(*tile.get_pixel(3, 4), Rgba([5, 7, 0, 255]));
    }

    #[test]
    fn test_crop_out_of_bounds_is_transparent() {
        let sheet = PixelBuffer::from_image(checker(10, 10));
        let tile = sheet.crop(8, 8, 4, 4);
        assert_eq!(tile.dimensions(), (4, 4));
        assert_eq!(*tile.get_pixel(1, 1), Rgba([9, 9, 0, 255]));
        assert_eq!(tile.get_pixel(2, 2)[3], 0);

        let outside = sheet.crop(20, 20, 3, 3);
        assert!(outside.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_crop_oversized_region_clamps_to_sheet() {
        let sheet = PixelBuffer::from_image(checker(10, 10));
        let tile = sheet.crop(6, 7, u32::MAX, u32::MAX);
        assert_eq!(tile.dimensions(), (4, 3));
        assert_eq!(*tile.get_pixel(0, 0), Rgba([6, 7, 0, 255]));
    }

    #[test]
    fn test_open_missing_file() {
        let err = PixelBuffer::open(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SplitError>(),
            Some(SplitError::ImageNotFound(_))
        ));
    }

    #[test]
    fn test_neighbours_at_corner() {
        let mut found: Vec<_> = neighbours(0, 0, 3, 3).collect();
        found.sort_unstable();
        assert_eq!(found, vec![(0, 1), (1, 0)]);
        assert_eq!(neighbours(1, 1, 3, 3).count(), 4);
    }
}
