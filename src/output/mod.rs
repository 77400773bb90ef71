mod format;
mod json;
mod preview;

pub use format::{JPEG_QUALITY, flatten_on_white, save_sprite_image};
pub use json::write_data_file;
pub use preview::render_preview;
