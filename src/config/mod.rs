mod load;
mod types;

pub use load::LoadedConfig;
pub use types::{CompressConfig, GridConfig, RectConfig, ResizeConfig, SheetcutConfig};
