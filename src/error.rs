use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Image file not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Invalid split parameters: {0}")]
    InvalidParameters(String),

    #[error("Data file not found: {0}")]
    DataFileNotFound(PathBuf),

    #[error("Failed to parse data file '{path}': {source}")]
    DataFileParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported data file schema: {0}")]
    UnsupportedSchema(PathBuf),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("No sprites to export; run a split first")]
    NoSpritesToExport,

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },
}
