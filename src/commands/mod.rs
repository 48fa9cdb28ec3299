mod convert;
mod image_ids;
mod render;

pub use convert::run_convert;
pub use image_ids::run_image_ids;
pub use render::run_render;
