use anyhow::Result;
use image::{Rgba, RgbaImage};
use log::{debug, info};

use super::{Discovery, RectDiscovery};
use crate::sprite::{
    PixelBuffer, SpriteRect, VisitGrid, corner_pixels, default_sprite_name, neighbours,
    rgb_distance,
};

/// Per-channel tolerance used when matching an inferred background color
pub const DEFAULT_COLOR_TOLERANCE: u32 = 30;

/// Components whose fill ratio is at or below this are treated as noise
pub const DEFAULT_MIN_DENSITY: f64 = 0.01;

/// Automatic detection of sprites separated by background.
///
/// The background is either transparency or a solid color inferred from the
/// sheet corners. Every 4-connected foreground component becomes one sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionDetector {
    pub min_width: u32,
    pub min_height: u32,
    /// Pixels with alpha at or below this are background
    pub alpha_threshold: u8,
    pub color_tolerance: u32,
    pub min_density: f64,
}

impl Default for RegionDetector {
    fn default() -> Self {
        Self {
            min_width: 1,
            min_height: 1,
            alpha_threshold: 0,
            color_tolerance: DEFAULT_COLOR_TOLERANCE,
            min_density: DEFAULT_MIN_DENSITY,
        }
    }
}

/// What counts as background on a particular sheet
#[derive(Debug, Clone, Copy)]
struct Background {
    alpha_threshold: u8,
    color: Option<[u8; 3]>,
    tolerance: u32,
}

impl Background {
    fn contains(&self, pixel: &Rgba<u8>) -> bool {
        if pixel[3] <= self.alpha_threshold {
            return true;
        }
        match self.color {
            Some(bg) => rgb_distance(pixel, bg) < self.tolerance.saturating_mul(3),
            None => false,
        }
    }
}

/// Bounding box and pixel count of one connected component
struct Component {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    filled: u64,
}

impl Component {
    fn new(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            filled: 0,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.filled += 1;
    }

    fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    #[expect(clippy::cast_precision_loss, reason = "pixel counts fit comfortably in f64")]
    fn density(&self) -> f64 {
        let area = u64::from(self.width()) * u64::from(self.height());
        self.filled as f64 / area as f64
    }
}

impl RegionDetector {
    pub fn new(min_width: u32, min_height: u32, alpha_threshold: u8) -> Self {
        Self {
            min_width,
            min_height,
            alpha_threshold,
            ..Self::default()
        }
    }

    pub fn color_tolerance(mut self, tolerance: u32) -> Self {
        self.color_tolerance = tolerance;
        self
    }

    pub fn min_density(mut self, density: f64) -> Self {
        self.min_density = density;
        self
    }

    /// Find all foreground regions, sorted top-to-bottom then left-to-right
    pub fn detect(&self, image: &RgbaImage) -> Vec<SpriteRect> {
        let Some(background) = self.infer_background(image) else {
            return Vec::new();
        };

        let (width, height) = image.dimensions();
        let mut visited = VisitGrid::new(width, height);
        let mut stack = Vec::new();
        let mut sprites = Vec::new();
        let mut rejected = 0usize;

        for y in 0..height {
            for x in 0..width {
                if visited.is_set(x, y) || background.contains(image.get_pixel(x, y)) {
                    continue;
                }

                let mut component = Component::new(x, y);
                visited.set(x, y);
                stack.push((x, y));

                while let Some((cx, cy)) = stack.pop() {
                    component.include(cx, cy);
                    for (nx, ny) in neighbours(cx, cy, width, height) {
                        if !visited.is_set(nx, ny) && !background.contains(image.get_pixel(nx, ny))
                        {
                            visited.set(nx, ny);
                            stack.push((nx, ny));
                        }
                    }
                }

                if self.accepts(&component) {
                    sprites.push(SpriteRect::new(
                        component.min_x,
                        component.min_y,
                        component.width(),
                        component.height(),
                        String::new(),
                    ));
                } else {
                    rejected += 1;
                }
            }
        }

        sprites.sort_by_key(|s| (s.y, s.x));
        for (i, sprite) in sprites.iter_mut().enumerate() {
            sprite.name = default_sprite_name(i);
        }

        debug!("Rejected {} components below size or density limits", rejected);
        info!("Detected {} sprites", sprites.len());

        sprites
    }

    fn accepts(&self, component: &Component) -> bool {
        component.width() >= self.min_width
            && component.height() >= self.min_height
            && component.density() > self.min_density
    }

    /// Decide between a transparent and a solid-color background from the corners.
    ///
    /// Returns `None` only for an empty image.
    fn infer_background(&self, image: &RgbaImage) -> Option<Background> {
        let corners = corner_pixels(image)?;
        let mut background = Background {
            alpha_threshold: self.alpha_threshold,
            color: None,
            tolerance: self.color_tolerance,
        };

        if corners.iter().any(|c| c[3] <= self.alpha_threshold) {
            debug!("Transparent background");
            return Some(background);
        }

        // Coarse buckets absorb slight corner noise; ties go to the first corner
        let bucket = |c: &Rgba<u8>| [c[0] / 10, c[1] / 10, c[2] / 10];
        let mut best: Option<([u8; 3], usize)> = None;
        for corner in &corners {
            let key = bucket(corner);
            let count = corners.iter().filter(|c| bucket(*c) == key).count();
            if best.is_none_or(|(_, n)| count > n) {
                best = Some((key, count));
            }
        }

        background.color = best.and_then(|(key, _)| {
            corners
                .iter()
                .find(|c| bucket(*c) == key)
                .map(|c| [c[0], c[1], c[2]])
        });
        debug!("Solid background {:?}", background.color);

        Some(background)
    }
}

impl RectDiscovery for RegionDetector {
    fn label(&self) -> &'static str {
        "rect"
    }

    fn discover(&self, sheet: &PixelBuffer) -> Result<Discovery> {
        Ok(Discovery::new(self.detect(sheet.image())))
    }
}
