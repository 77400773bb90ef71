use serde::{Deserialize, Serialize};

/// Largest sprite or source canvas, in pixels, that export will allocate
pub const MAX_SPRITE_PIXELS: u64 = 1 << 28;

/// A named sprite region within the sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRect {
    /// Left edge in sheet pixels
    pub x: u32,
    /// Top edge in sheet pixels
    pub y: u32,
    /// Region width
    pub width: u32,
    /// Region height
    pub height: u32,
    /// Display label, also used for output filenames
    pub name: String,
    /// Horizontal offset of the region inside its source canvas
    pub off_x: i32,
    /// Vertical offset of the region inside its source canvas
    pub off_y: i32,
    /// Source canvas width (0 when unknown)
    pub source_w: u32,
    /// Source canvas height (0 when unknown)
    pub source_h: u32,
}

impl SpriteRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach source-canvas metadata used by restore mode
    pub fn with_source(mut self, off_x: i32, off_y: i32, source_w: u32, source_h: u32) -> Self {
        self.off_x = off_x;
        self.off_y = off_y;
        self.source_w = source_w;
        self.source_h = source_h;
        self
    }

    /// True when the original canvas size is known
    pub fn has_source_size(&self) -> bool {
        self.source_w > 0 && self.source_h > 0
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn source_area(&self) -> u64 {
        u64::from(self.source_w) * u64::from(self.source_h)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if this region overlaps another
    pub fn intersects(&self, other: &SpriteRect) -> bool {
        let (ax, ay) = (u64::from(self.x), u64::from(self.y));
        let (bx, by) = (u64::from(other.x), u64::from(other.y));
        ax < bx + u64::from(other.width)
            && ax + u64::from(self.width) > bx
            && ay < by + u64::from(other.height)
            && ay + u64::from(self.height) > by
    }
}
