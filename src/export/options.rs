use std::path::PathBuf;

use super::background::DEFAULT_BACKGROUND_TOLERANCE;
use super::edges::SmartEdgeParams;
use crate::cli::{CompressionLevel, OffsetOrigin, OutputFormat};
use crate::sprite::{DEFAULT_TEMPLATE, ResizeMode};

/// Settings for one export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub name_template: String,
    pub format: OutputFormat,
    pub trim: bool,
    /// Pixels removed from every side before any other transform
    pub edge_crop: u32,
    pub smart_edge_detect: bool,
    pub remove_bg: bool,
    pub resize: ResizeMode,
    /// `None` uses the registry's restore flag
    pub restore_source: Option<bool>,
    /// `None` uses the splitter's default origin
    pub offset_origin: Option<OffsetOrigin>,
    /// oxipng pass for PNG output
    pub compress: Option<CompressionLevel>,
    pub smart_edge: SmartEdgeParams,
    pub background_tolerance: u8,
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            name_template: DEFAULT_TEMPLATE.to_string(),
            format: OutputFormat::default(),
            trim: false,
            edge_crop: 0,
            smart_edge_detect: false,
            remove_bg: false,
            resize: ResizeMode::None,
            restore_source: None,
            offset_origin: None,
            compress: None,
            smart_edge: SmartEdgeParams::default(),
            background_tolerance: DEFAULT_BACKGROUND_TOLERANCE,
        }
    }

    pub fn name_template(mut self, template: impl Into<String>) -> Self {
        self.name_template = template.into();
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn trim(mut self, enabled: bool) -> Self {
        self.trim = enabled;
        self
    }

    pub fn edge_crop(mut self, pixels: u32) -> Self {
        self.edge_crop = pixels;
        self
    }

    pub fn smart_edge_detect(mut self, enabled: bool) -> Self {
        self.smart_edge_detect = enabled;
        self
    }

    pub fn remove_bg(mut self, enabled: bool) -> Self {
        self.remove_bg = enabled;
        self
    }

    pub fn resize(mut self, mode: ResizeMode) -> Self {
        self.resize = mode;
        self
    }

    pub fn restore_source(mut self, restore: Option<bool>) -> Self {
        self.restore_source = restore;
        self
    }

    pub fn offset_origin(mut self, origin: Option<OffsetOrigin>) -> Self {
        self.offset_origin = origin;
        self
    }

    pub fn compress(mut self, level: Option<CompressionLevel>) -> Self {
        self.compress = level;
        self
    }
}
