mod args;

pub use args::{
    CliArgs, Command, CommonArgs, CompressionLevel, DataArgs, GridArgs, OffsetOrigin,
    OutputFormat, RectArgs, ResizeKind,
};
