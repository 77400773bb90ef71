use serde::{Deserialize, Serialize};

use crate::cli::{CompressionLevel, OffsetOrigin, OutputFormat};
use crate::sprite::ResizeMode;

/// Configuration for resizing exported sprites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ResizeConfig {
    Scale { scale: f64 },
    Width { width: u32 },
    Height { height: u32 },
    Custom { width: u32, height: u32 },
    Fit { width: u32, height: u32 },
}

impl ResizeConfig {
    pub fn to_mode(self) -> ResizeMode {
        match self {
            ResizeConfig::Scale { scale } => ResizeMode::Scale(scale),
            ResizeConfig::Width { width } => ResizeMode::Width(width),
            ResizeConfig::Height { height } => ResizeMode::Height(height),
            ResizeConfig::Custom { width, height } => ResizeMode::Custom { width, height },
            ResizeConfig::Fit { width, height } => ResizeMode::Fit { width, height },
        }
    }
}

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

impl CompressConfig {
    pub fn to_level(&self) -> CompressionLevel {
        match self {
            CompressConfig::Level(n) => CompressionLevel::Level((*n).min(6)),
            CompressConfig::Max(_) => CompressionLevel::Max,
        }
    }
}

/// Grid mode settings. Cell size wins over counts when both are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub cell_width: Option<u32>,
    pub cell_height: Option<u32>,
    pub padding: u32,
    pub margin: u32,
}

/// Automatic detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RectConfig {
    pub min_width: u32,
    pub min_height: u32,
    pub alpha_threshold: u8,
    pub tolerance: u32,
    pub min_density: f64,
}

impl Default for RectConfig {
    fn default() -> Self {
        Self {
            min_width: 1,
            min_height: 1,
            alpha_threshold: 0,
            tolerance: crate::discovery::DEFAULT_COLOR_TOLERANCE,
            min_density: crate::discovery::DEFAULT_MIN_DENSITY,
        }
    }
}

/// Sheetcut configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetcutConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input sheet paths or glob patterns
    pub input: Vec<String>,
    /// Output directory for sprite files
    pub output_dir: String,
    /// Data file for data mode
    pub data_file: Option<String>,
    pub grid: GridConfig,
    pub rect: RectConfig,
    /// File name template for exported sprites
    pub template: String,
    pub format: OutputFormat,
    /// Crop sprites to their non-transparent pixels
    pub trim: bool,
    /// Pixels removed from every side
    pub edge_crop: u32,
    /// Strip light divider lines from sprite edges
    pub smart_edge: bool,
    /// Clear border-connected background
    pub remove_bg: bool,
    /// Resize configuration (optional)
    pub resize: Option<ResizeConfig>,
    /// Restore override; unset follows the data file
    pub restore_source: Option<bool>,
    pub offset_origin: OffsetOrigin,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Write a preview image next to the sprites
    pub preview: bool,
    /// Endpoint queried for newer releases
    pub update_url: Option<String>,
}

impl Default for SheetcutConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: ".".to_string(),
            data_file: None,
            grid: GridConfig::default(),
            rect: RectConfig::default(),
            template: crate::sprite::DEFAULT_TEMPLATE.to_string(),
            format: OutputFormat::Png,
            trim: false,
            edge_crop: 0,
            smart_edge: false,
            remove_bg: false,
            resize: None,
            restore_source: None,
            offset_origin: OffsetOrigin::Top,
            compress: None,
            preview: false,
            update_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SheetcutConfig = serde_json::from_str(
            r#"{
                "input": ["sheets/*.png"],
                "format": "jpeg",
                "grid": {"columns": 4, "rows": 2},
                "resize": {"mode": "fit", "width": 64, "height": 64},
                "compress": "max"
            }"#,
        )
        .unwrap();

        assert_eq!(config.output_dir, ".");
        assert_eq!(config.format, OutputFormat::Jpg);
        assert_eq!(config.grid.columns, Some(4));
        assert_eq!(config.grid.padding, 0);
        assert_eq!(config.rect.min_density, crate::discovery::DEFAULT_MIN_DENSITY);
        assert_eq!(
            config.resize.map(ResizeConfig::to_mode),
            Some(ResizeMode::Fit {
                width: 64,
                height: 64
            })
        );
        assert_eq!(
            config.compress.as_ref().map(CompressConfig::to_level),
            Some(CompressionLevel::Max)
        );
    }

    #[test]
    fn test_scale_resize_config() {
        let resize: ResizeConfig = serde_json::from_str(r#"{"mode": "scale", "scale": 0.5}"#).unwrap();
        assert_eq!(resize.to_mode(), ResizeMode::Scale(0.5));
    }
}
