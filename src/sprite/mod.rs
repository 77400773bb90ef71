mod naming;
mod pixels;
mod rect;
mod registry;
mod resizer;
mod trimmer;

pub use naming::{DEFAULT_TEMPLATE, default_sprite_name, output_filename, render_template};
pub use pixels::PixelBuffer;
pub(crate) use pixels::{VisitGrid, corner_pixels, neighbours, rgb_distance};
pub use rect::{MAX_SPRITE_PIXELS, SpriteRect};
pub use registry::SpriteRegistry;
pub use resizer::{ResizeMode, resize_sprite};
pub use trimmer::{alpha_bounds, trim_transparent};
