//! Strategies that turn a loaded sheet into an ordered list of sprite rectangles.

mod datafile;
mod grid;
mod region;

pub use datafile::{DataFileParser, parse_data_file, parse_document, resolve_image_path};
pub use grid::{GridLayout, GridTiler};
pub use region::{DEFAULT_COLOR_TOLERANCE, DEFAULT_MIN_DENSITY, RegionDetector};

use anyhow::Result;

use crate::sprite::{PixelBuffer, SpriteRect};

/// Output of one discovery run
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Rectangles in output order
    pub sprites: Vec<SpriteRect>,
    /// Whether the sprites carry source-canvas data worth restoring
    pub restore_source: bool,
}

impl Discovery {
    pub fn new(sprites: Vec<SpriteRect>) -> Self {
        Self {
            sprites,
            restore_source: false,
        }
    }
}

/// A rectangle discovery strategy
pub trait RectDiscovery {
    /// Short label used in logs
    fn label(&self) -> &'static str;

    fn discover(&self, sheet: &PixelBuffer) -> Result<Discovery>;
}
