// VIEW: Rendering and graphics
pub mod render;
pub mod gpu_init;
pub mod texture;

pub use render::{BoxRenderer, BoxInstance, Material, scene_instances};
pub use gpu_init::GpuContext;
pub use texture::SurfaceImages;
