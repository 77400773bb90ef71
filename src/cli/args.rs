use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sheetcut")]
#[command(version, about = "Sprite sheet splitter", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Cut the sheet into a fixed grid of cells
    Grid(GridArgs),
    /// Detect sprites separated by transparent or solid background
    Rect(RectArgs),
    /// Cut the sheet using rectangles from a JSON data file
    Data(DataArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Grid(args) => &args.common,
            Command::Rect(args) => &args.common,
            Command::Data(args) => &args.common,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GridArgs {
    /// Number of columns
    #[arg(short = 'x', long)]
    pub columns: Option<u32>,

    /// Number of rows
    #[arg(short = 'y', long)]
    pub rows: Option<u32>,

    /// Cell width in pixels (takes precedence over columns/rows)
    #[arg(long, requires = "cell_height")]
    pub cell_width: Option<u32>,

    /// Cell height in pixels
    #[arg(long, requires = "cell_width")]
    pub cell_height: Option<u32>,

    /// Gap between cells in pixels [default: 0]
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Border around the whole grid in pixels [default: 0]
    #[arg(short, long)]
    pub margin: Option<u32>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RectArgs {
    /// Smallest accepted sprite width [default: 1]
    #[arg(long)]
    pub min_width: Option<u32>,

    /// Smallest accepted sprite height [default: 1]
    #[arg(long)]
    pub min_height: Option<u32>,

    /// Pixels with alpha at or below this are background [default: 0]
    #[arg(long)]
    pub alpha_threshold: Option<u8>,

    /// Per-channel tolerance when matching a solid background color [default: 30]
    #[arg(long)]
    pub tolerance: Option<u32>,

    /// Minimum filled fraction of the bounding box [default: 0.01]
    #[arg(long)]
    pub min_density: Option<f64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// JSON data file describing the sprite rectangles
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Input sprite sheets
    pub input: Vec<PathBuf>,

    /// Load settings from a .sheetcut config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for sprite files [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File name template: {name} {index} {x} {y} {width} {height} [default: {name}]
    #[arg(short = 'n', long)]
    pub template: Option<String>,

    /// Output image format [default: png]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Crop each sprite to its non-transparent pixels
    #[arg(short, long)]
    pub trim: bool,

    /// Remove N pixels from every side of each sprite [default: 0]
    #[arg(long, value_name = "PIXELS")]
    pub edge_crop: Option<u32>,

    /// Strip light, uniform divider lines from sprite edges
    #[arg(long)]
    pub smart_edge: bool,

    /// Clear solid background connected to the sprite border
    #[arg(long)]
    pub remove_bg: bool,

    /// Resize mode [default: none]
    #[arg(long, value_enum)]
    pub resize: Option<ResizeKind>,

    /// Scale factor for --resize scale
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f64>,

    /// Target width for --resize width|custom|fit
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Target height for --resize height|custom|fit
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Restore trimmed sprites onto their source canvas
    #[arg(long, conflicts_with = "no_restore")]
    pub restore: bool,

    /// Never restore source canvases, even when the data file has them
    #[arg(long)]
    pub no_restore: bool,

    /// Which edge vertical offsets are measured from [default: top]
    #[arg(long, value_enum)]
    pub offset_origin: Option<OffsetOrigin>,

    /// Also write a <sheet>_preview.png with every sprite outlined
    #[arg(long)]
    pub preview: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Check this URL for a newer release while splitting
    #[cfg(feature = "update-check")]
    #[arg(long, value_name = "URL")]
    pub update_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Restore override requested on the command line, if any
    pub fn restore_override(&self) -> Option<bool> {
        if self.restore {
            Some(true)
        } else if self.no_restore {
            Some(false)
        } else {
            None
        }
    }
}

/// Encoded format of exported sprites
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    /// JPEG, flattened onto white
    #[value(alias = "jpeg")]
    #[serde(alias = "jpeg")]
    Jpg,
    Webp,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }
}

/// Edge that vertical offsets and fit alignment are anchored to
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetOrigin {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeKind {
    #[default]
    None,
    /// Multiply both sides by --scale
    Scale,
    /// Fix the width, keep the aspect ratio
    Width,
    /// Fix the height, keep the aspect ratio
    Height,
    /// Exact --width x --height
    Custom,
    /// Shrink into a --width x --height canvas
    Fit,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_grid_command() {
        let cli = CliArgs::try_parse_from([
            "sheetcut", "grid", "sheet.png", "-x", "4", "-y", "2", "--trim", "-f", "jpeg",
        ])
        .unwrap();

        let Command::Grid(args) = &cli.command else {
            panic!("expected grid command");
        };
        assert_eq!(args.columns, Some(4));
        assert_eq!(args.rows, Some(2));
        assert!(args.common.trim);
        assert_eq!(args.common.format, Some(OutputFormat::Jpg));
        assert_eq!(cli.command.common().input, vec![PathBuf::from("sheet.png")]);
    }

    #[test]
    fn test_restore_flags_conflict() {
        assert!(
            CliArgs::try_parse_from(["sheetcut", "data", "--restore", "--no-restore"]).is_err()
        );

        let cli = CliArgs::try_parse_from(["sheetcut", "data", "-d", "a.json", "--no-restore"])
            .unwrap();
        assert_eq!(cli.command.common().restore_override(), Some(false));
    }

    #[test]
    fn test_compression_level_parse() {
        assert_eq!("max".parse::<CompressionLevel>(), Ok(CompressionLevel::Max));
        assert_eq!("4".parse::<CompressionLevel>(), Ok(CompressionLevel::Level(4)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_format_serde_names() {
        let format: OutputFormat = serde_json::from_str("\"jpeg\"").unwrap();
        assert_eq!(format, OutputFormat::Jpg);
        assert_eq!(serde_json::to_string(&OutputFormat::Webp).unwrap(), "\"webp\"");
        assert_eq!(OutputFormat::Jpg.extension(), "jpg");
    }
}
