pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod output;
mod splitter;
pub mod sprite;
pub mod update;

pub use cli::{CliArgs, Command, CommonArgs, OffsetOrigin, OutputFormat};
pub use discovery::{DataFileParser, GridTiler, RectDiscovery, RegionDetector};
pub use error::SplitError;
pub use export::ExportOptions;
pub use splitter::SpriteSplitter;
pub use sprite::{PixelBuffer, SpriteRect, SpriteRegistry};
