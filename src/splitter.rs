use std::path::{Path, PathBuf};

use anyhow::Result;
use image::RgbaImage;
use log::info;

use crate::cli::{OffsetOrigin, OutputFormat};
use crate::discovery::{DataFileParser, GridTiler, RectDiscovery, RegionDetector};
use crate::error::SplitError;
use crate::export::{ExportOptions, export_sprites};
use crate::output::{render_preview, save_sprite_image, write_data_file};
use crate::sprite::{PixelBuffer, SpriteRect, SpriteRegistry};

/// One loaded sheet together with the sprites discovered on it.
///
/// Loading a new image clears the registry; every discovery run replaces it
/// wholesale, and a failed run leaves it as it was.
#[derive(Debug, Default)]
pub struct SpriteSplitter {
    image_path: Option<PathBuf>,
    sheet: Option<PixelBuffer>,
    registry: SpriteRegistry,
    offset_origin: OffsetOrigin,
}

impl SpriteSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a splitter with `path` already loaded
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut splitter = Self::new();
        splitter.load_image(path)?;
        Ok(splitter)
    }

    /// Create a splitter around an in-memory sheet
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            sheet: Some(PixelBuffer::from_image(image)),
            ..Self::default()
        }
    }

    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let sheet = PixelBuffer::open(path)?;
        self.sheet = Some(sheet);
        self.image_path = Some(path.to_path_buf());
        self.registry.clear();
        Ok(())
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn sheet(&self) -> Option<&PixelBuffer> {
        self.sheet.as_ref()
    }

    pub fn sprites(&self) -> &SpriteRegistry {
        &self.registry
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteRegistry {
        &mut self.registry
    }

    pub fn offset_origin(&self) -> OffsetOrigin {
        self.offset_origin
    }

    /// Origin used when export options do not pick one
    pub fn set_offset_origin(&mut self, origin: OffsetOrigin) {
        self.offset_origin = origin;
    }

    /// Run a discovery strategy and replace the registry with its result
    pub fn split(&mut self, strategy: &dyn RectDiscovery) -> Result<&[SpriteRect]> {
        let sheet = self.loaded_sheet()?;
        info!("Splitting with {} mode", strategy.label());

        let discovery = strategy.discover(sheet)?;
        self.registry
            .replace(discovery.sprites, discovery.restore_source);

        Ok(self.registry.as_slice())
    }

    pub fn split_by_grid(&mut self, tiler: &GridTiler) -> Result<&[SpriteRect]> {
        self.split(tiler)
    }

    pub fn split_by_rectangle(&mut self, detector: &RegionDetector) -> Result<&[SpriteRect]> {
        self.split(detector)
    }

    pub fn split_by_data_file(&mut self, path: impl Into<PathBuf>) -> Result<&[SpriteRect]> {
        self.split(&DataFileParser::new(path))
    }

    /// Export every registered sprite; returns the written files
    pub fn save_sprites(&self, options: &ExportOptions) -> Result<Vec<PathBuf>> {
        let sheet = self.loaded_sheet()?;
        export_sprites(sheet, &self.registry, options, self.offset_origin)
    }

    /// Persist the registry as a data file at `path`
    pub fn export_data_file(&self, path: &Path) -> Result<()> {
        let sheet = self.loaded_sheet()?;
        if self.registry.is_empty() {
            return Err(SplitError::NoSpritesToExport.into());
        }

        let image_name = self
            .image_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        write_data_file(
            path,
            &image_name,
            (sheet.width(), sheet.height()),
            self.registry.as_slice(),
        )?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    /// Render the sheet with every sprite outlined, optionally saving it as PNG
    pub fn preview(&self, output: Option<&Path>) -> Result<RgbaImage> {
        let sheet = self.loaded_sheet()?;
        if self.registry.is_empty() {
            return Err(SplitError::NoSpritesToExport.into());
        }
        let preview = render_preview(sheet.image(), self.registry.as_slice());

        if let Some(path) = output {
            save_sprite_image(&preview, path, OutputFormat::Png, None)?;
            info!("Wrote {}", path.display());
        }

        Ok(preview)
    }

    fn loaded_sheet(&self) -> Result<&PixelBuffer> {
        self.sheet
            .as_ref()
            .ok_or_else(|| SplitError::NoImageLoaded.into())
    }
}
