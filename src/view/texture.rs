use std::path::Path;

use image::RgbaImage;
use tracing::info;
use wgpu::util::DeviceExt;

use crate::config::GameConfig;
use crate::error::AppError;

/// Decode an image file into 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, AppError> {
    let img = image::open(path)
        .map_err(|source| AppError::Image { path: path.to_path_buf(), source })?
        .to_rgba8();
    info!(path = %path.display(), width = img.width(), height = img.height(), "loaded image");
    Ok(img)
}

/// Decoded floor and wall pictures, ready to hand to the box renderer.
pub struct SurfaceImages {
    pub floor: RgbaImage,
    pub wall: RgbaImage,
}

impl SurfaceImages {
    pub fn load(config: &GameConfig) -> Result<Self, AppError> {
        Ok(Self {
            floor: load_rgba(&config.floor_texture)?,
            wall: load_rgba(&config.wall_texture)?,
        })
    }
}

/// A sampled 2D texture living on the GPU.
pub struct GpuTexture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    pub fn from_rgba(device: &wgpu::Device, queue: &wgpu::Queue, img: &RgbaImage, label: &str) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: img.width().max(1),
                    height: img.height().max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img.as_raw(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { _texture: texture, view }
    }
}

/// Tiling sampler for the room surfaces.
pub fn create_surface_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("surface_sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_image_error_names_the_file() {
        match load_rgba(Path::new("nowhere/floor.jpg")) {
            Err(AppError::Image { path, .. }) => assert_eq!(path, PathBuf::from("nowhere/floor.jpg")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("loading a missing image must fail"),
        }
    }

    #[test]
    fn surface_images_fail_on_first_missing_file() {
        let config = GameConfig {
            floor_texture: PathBuf::from("nowhere/floor.jpg"),
            wall_texture: PathBuf::from("nowhere/wall.jpg"),
            ..GameConfig::default()
        };
        let err = SurfaceImages::load(&config).err().expect("floor is missing");
        assert!(err.to_string().contains("floor.jpg"), "{err}");
    }
}
