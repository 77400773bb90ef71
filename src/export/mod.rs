mod background;
mod chain;
mod edges;
mod options;
mod restore;

pub use background::{DEFAULT_BACKGROUND_TOLERANCE, remove_edge_background};
pub use chain::TransformChain;
pub use edges::{
    DEFAULT_EDGE_SCAN_DEPTH, DEFAULT_EDGE_TOLERANCE, DEFAULT_LIGHT_THRESHOLD, SmartEdgeParams,
    crop_edges, trim_light_edges,
};
pub use options::ExportOptions;
pub use restore::restore_source_canvas;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use log::{debug, info, warn};

use crate::cli::OffsetOrigin;
use crate::error::SplitError;
use crate::output::save_sprite_image;
use crate::sprite::{MAX_SPRITE_PIXELS, PixelBuffer, SpriteRegistry, output_filename};

/// Write every sprite in the registry to `options.output_dir`.
///
/// Returns the written paths in registry order. Zero-area sprites and
/// regions too large to allocate are skipped with a warning.
pub fn export_sprites(
    sheet: &PixelBuffer,
    registry: &SpriteRegistry,
    options: &ExportOptions,
    default_origin: OffsetOrigin,
) -> Result<Vec<PathBuf>> {
    if registry.is_empty() {
        return Err(SplitError::NoSpritesToExport.into());
    }

    fs::create_dir_all(&options.output_dir).map_err(|e| SplitError::OutputWrite {
        path: options.output_dir.clone(),
        source: e,
    })?;

    let chain = TransformChain::resolve(options, registry.restore_source(), default_origin);
    debug!("Transform chain: {:?}", chain);
    info!(
        "Exporting {} sprites to {}",
        registry.len(),
        options.output_dir.display()
    );

    let extension = options.format.extension();
    let mut written = Vec::with_capacity(registry.len());

    for (index, sprite) in registry.iter().enumerate() {
        if sprite.is_empty() {
            warn!("Skipping '{}': zero-size region", sprite.name);
            continue;
        }
        if sprite.area() > MAX_SPRITE_PIXELS
            || (chain.restore && sprite.source_area() > MAX_SPRITE_PIXELS)
        {
            warn!(
                "Skipping '{}': {}x{} region (source {}x{}) is too large",
                sprite.name, sprite.width, sprite.height, sprite.source_w, sprite.source_h
            );
            continue;
        }

        let image = chain.apply(sheet, sprite);
        let path = options
            .output_dir
            .join(output_filename(&options.name_template, sprite, index, extension));

        save_sprite_image(&image, &path, options.format, options.compress)?;
        debug!("Saved {}", path.display());
        written.push(path);
    }

    info!("Saved {} sprites", written.len());
    Ok(written)
}
