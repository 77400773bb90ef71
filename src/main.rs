use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use sheetcut::cli::{CliArgs, Command, CommonArgs, CompressionLevel, OffsetOrigin, OutputFormat};
use sheetcut::config::{CompressConfig, GridConfig, LoadedConfig, RectConfig, ResizeConfig};
use sheetcut::discovery::{DataFileParser, GridTiler, RectDiscovery, RegionDetector, resolve_image_path};
use sheetcut::export::ExportOptions;
use sheetcut::sprite::ResizeMode;
use sheetcut::SpriteSplitter;

const DATA_FILE_NAME: &str = "_sprites.json";
const PREVIEW_FILE_NAME: &str = "_preview.png";

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();
    let merged = merge_config_with_args(&cli.command)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Sheetcut sprite splitter v{}", env!("CARGO_PKG_VERSION"));

    #[cfg(feature = "update-check")]
    let update_check = merged
        .update_url
        .as_deref()
        .map(sheetcut::update::UpdateCheck::spawn);
    #[cfg(not(feature = "update-check"))]
    if merged.update_url.is_some() {
        log::warn!("Built without update-check support; ignoring update_url");
    }

    let strategy = build_strategy(&cli.command, &merged)?;
    let sheets = resolve_sheets(&merged)?;
    let per_sheet_dirs = sheets.len() > 1;

    for sheet in &sheets {
        split_sheet(sheet, strategy.as_ref(), &merged, per_sheet_dirs)
            .with_context(|| format!("failed to split {}", sheet.display()))?;
    }

    #[cfg(feature = "update-check")]
    if let Some(check) = update_check {
        if let Some(release) = check.wait(std::time::Duration::from_secs(1)) {
            info!(
                "Sheetcut {} is available (running {})",
                release.version,
                sheetcut::update::CURRENT_VERSION
            );
        }
    }

    info!("Done!");

    Ok(())
}

/// Load, split and export one sheet.
///
/// A sheet that yields no sprites is an error, so a batch stops at the
/// first empty sheet instead of leaving behind an empty data file.
fn split_sheet(
    path: &Path,
    strategy: &dyn RectDiscovery,
    merged: &MergedConfig,
    own_dir: bool,
) -> Result<()> {
    let mut splitter = SpriteSplitter::open(path)?;
    splitter.set_offset_origin(merged.offset_origin);

    splitter.split(strategy)?;

    let output_dir = if own_dir {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sheet".to_string());
        merged.output.join(stem)
    } else {
        merged.output.clone()
    };

    let written = splitter.save_sprites(&merged.export_options(output_dir.clone()))?;
    info!("Saved {} sprites from {}", written.len(), path.display());

    splitter.export_data_file(&output_dir.join(DATA_FILE_NAME))?;

    if merged.preview {
        splitter.preview(Some(&output_dir.join(PREVIEW_FILE_NAME)))?;
    }

    Ok(())
}

fn build_strategy(command: &Command, merged: &MergedConfig) -> Result<Box<dyn RectDiscovery>> {
    let strategy: Box<dyn RectDiscovery> = match command {
        Command::Grid(_) => {
            let grid = &merged.grid;
            let sized = grid.cell_width.is_some_and(|w| w > 0)
                && grid.cell_height.is_some_and(|h| h > 0);
            let counted = grid.columns.is_some() && grid.rows.is_some();
            if !sized && !counted {
                bail!("grid mode needs --columns and --rows, or --cell-width and --cell-height");
            }

            Box::new(GridTiler {
                columns: grid.columns.unwrap_or(0),
                rows: grid.rows.unwrap_or(0),
                sprite_width: grid.cell_width.unwrap_or(0),
                sprite_height: grid.cell_height.unwrap_or(0),
                padding: grid.padding,
                margin: grid.margin,
            })
        }
        Command::Rect(_) => {
            let rect = &merged.rect;
            Box::new(
                RegionDetector::new(rect.min_width, rect.min_height, rect.alpha_threshold)
                    .color_tolerance(rect.tolerance)
                    .min_density(rect.min_density),
            )
        }
        Command::Data(_) => {
            let Some(data_file) = &merged.data_file else {
                bail!("data mode needs --data or a data_file entry in the config");
            };
            Box::new(DataFileParser::new(data_file.clone()))
        }
    };

    Ok(strategy)
}

/// Input sheets, falling back to the image named inside the data file
fn resolve_sheets(merged: &MergedConfig) -> Result<Vec<PathBuf>> {
    if !merged.input.is_empty() {
        return Ok(merged.input.clone());
    }

    if let Some(image) = merged.data_file.as_deref().and_then(resolve_image_path) {
        info!("Using sheet {} named in the data file", image.display());
        return Ok(vec![image]);
    }

    bail!("no input sheets given")
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    output: PathBuf,
    data_file: Option<PathBuf>,
    grid: GridConfig,
    rect: RectConfig,
    template: String,
    format: OutputFormat,
    trim: bool,
    edge_crop: u32,
    smart_edge: bool,
    remove_bg: bool,
    resize: ResizeMode,
    restore: Option<bool>,
    offset_origin: OffsetOrigin,
    compress: Option<CompressionLevel>,
    preview: bool,
    verbose: bool,
    update_url: Option<String>,
}

impl MergedConfig {
    fn export_options(&self, output_dir: PathBuf) -> ExportOptions {
        ExportOptions::new(output_dir)
            .name_template(self.template.clone())
            .format(self.format)
            .trim(self.trim)
            .edge_crop(self.edge_crop)
            .smart_edge_detect(self.smart_edge)
            .remove_bg(self.remove_bg)
            .resize(self.resize)
            .restore_source(self.restore)
            .offset_origin(Some(self.offset_origin))
            .compress(self.compress)
    }
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(command: &Command) -> Result<MergedConfig> {
    let args = command.common();

    let loaded = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };
    let config = loaded.as_ref().map(|lc| &lc.config);

    // Input sheets: CLI args override config
    let input = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded {
        lc.resolve_inputs()
            .context("failed to resolve input files from config")?
    } else {
        Vec::new()
    };

    // Output directory: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let data_file = match command {
        Command::Data(data) if data.data.is_some() => data.data.clone(),
        _ => loaded.as_ref().and_then(LoadedConfig::resolve_data_file),
    };

    let mut grid = config.map(|c| c.grid.clone()).unwrap_or_default();
    if let Command::Grid(g) = command {
        grid.columns = g.columns.or(grid.columns);
        grid.rows = g.rows.or(grid.rows);
        grid.cell_width = g.cell_width.or(grid.cell_width);
        grid.cell_height = g.cell_height.or(grid.cell_height);
        grid.padding = g.padding.unwrap_or(grid.padding);
        grid.margin = g.margin.unwrap_or(grid.margin);
    }

    let mut rect = config.map(|c| c.rect.clone()).unwrap_or_default();
    if let Command::Rect(r) = command {
        rect.min_width = r.min_width.unwrap_or(rect.min_width);
        rect.min_height = r.min_height.unwrap_or(rect.min_height);
        rect.alpha_threshold = r.alpha_threshold.unwrap_or(rect.alpha_threshold);
        rect.tolerance = r.tolerance.unwrap_or(rect.tolerance);
        rect.min_density = r.min_density.unwrap_or(rect.min_density);
    }

    let template = args
        .template
        .clone()
        .or_else(|| config.map(|c| c.template.clone()))
        .unwrap_or_else(|| sheetcut::sprite::DEFAULT_TEMPLATE.to_string());

    let format = args
        .format
        .or_else(|| config.map(|c| c.format))
        .unwrap_or_default();

    let edge_crop = args
        .edge_crop
        .or_else(|| config.map(|c| c.edge_crop))
        .unwrap_or(0);

    // Boolean flags: CLI presence sets them to true, otherwise use config
    let trim = args.trim || config.is_some_and(|c| c.trim);
    let smart_edge = args.smart_edge || config.is_some_and(|c| c.smart_edge);
    let remove_bg = args.remove_bg || config.is_some_and(|c| c.remove_bg);
    let preview = args.preview || config.is_some_and(|c| c.preview);

    let restore = args
        .restore_override()
        .or_else(|| config.and_then(|c| c.restore_source));

    let offset_origin = args
        .offset_origin
        .or_else(|| config.map(|c| c.offset_origin))
        .unwrap_or_default();

    // Resize: CLI mode overrides config
    let resize = if let Some(kind) = args.resize {
        ResizeMode::from_parts(
            kind,
            args.scale.unwrap_or(1.0),
            args.width.unwrap_or(0),
            args.height.unwrap_or(0),
        )
    } else {
        config
            .and_then(|c| c.resize)
            .map(ResizeConfig::to_mode)
            .unwrap_or_default()
    };

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else {
        config
            .and_then(|c| c.compress.as_ref())
            .map(CompressConfig::to_level)
    };

    Ok(MergedConfig {
        input,
        output,
        data_file,
        grid,
        rect,
        template,
        format,
        trim,
        edge_crop,
        smart_edge,
        remove_bg,
        resize,
        restore,
        offset_origin,
        compress,
        preview,
        // Verbose is CLI-only
        verbose: args.verbose,
        update_url: update_url(args, config.and_then(|c| c.update_url.clone())),
    })
}

#[cfg(feature = "update-check")]
fn update_url(args: &CommonArgs, configured: Option<String>) -> Option<String> {
    args.update_url.clone().or(configured)
}

#[cfg(not(feature = "update-check"))]
fn update_url(_args: &CommonArgs, configured: Option<String>) -> Option<String> {
    configured
}
