//! Debug visualization of synthesized terrain as RGBA images.

mod image;
mod renderers;

pub use image::DebugImage;
pub use renderers::{height_to_color, render_biome_debug, render_heightmap_debug};
