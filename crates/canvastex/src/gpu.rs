use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::error::{CanvasError, Result};
use crate::surface::Surface;
use crate::texture::{CanvasTexture, FilterMode, WrapMode};

pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

type SamplingModes = (WrapMode, WrapMode, FilterMode, FilterMode);

fn sampling_modes(texture: &CanvasTexture) -> SamplingModes {
    (
        texture.wrap_s,
        texture.wrap_t,
        texture.mag_filter,
        texture.min_filter,
    )
}

/// GPU copy of a canvas surface plus the sampler matching its texture modes.
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    sampling: SamplingModes,
}

impl GpuTexture {
    /// Creates the texture, uploads the current pixels and clears the dirty
    /// flag.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &mut CanvasTexture,
        surface: &Surface,
    ) -> Result<Self> {
        check_dimensions(texture, surface)?;
        if surface.is_empty() {
            return Err(CanvasError::Gpu(format!(
                "'{}' has an empty {}x{} surface",
                texture.label(),
                surface.width(),
                surface.height()
            )));
        }

        let gpu_texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(texture.label()),
                size: extent(surface),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TEXTURE_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            surface.as_bytes(),
        );
        let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&texture.sampler_descriptor());

        texture.mark_uploaded();
        tracing::debug!(
            label = texture.label(),
            width = surface.width(),
            height = surface.height(),
            version = texture.version(),
            "created canvas gpu texture"
        );

        Ok(Self {
            texture: gpu_texture,
            view,
            sampler,
            sampling: sampling_modes(texture),
        })
    }

    /// Re-uploads the surface when the texture is flagged dirty and rebuilds
    /// the sampler if the wrap or filter modes changed. Returns whether pixels
    /// were written.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &mut CanvasTexture,
        surface: &Surface,
    ) -> Result<bool> {
        let modes = sampling_modes(texture);
        if modes != self.sampling {
            self.sampler = device.create_sampler(&texture.sampler_descriptor());
            self.sampling = modes;
            tracing::debug!(label = texture.label(), ?modes, "rebuilt canvas sampler");
        }

        if !texture.needs_update() {
            return Ok(false);
        }
        check_dimensions(texture, surface)?;

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            surface.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(surface.bytes_per_row()),
                rows_per_image: Some(surface.height()),
            },
            extent(surface),
        );
        texture.mark_uploaded();
        tracing::trace!(
            label = texture.label(),
            version = texture.version(),
            "uploaded canvas texture"
        );
        Ok(true)
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

/// Requests an adapter and device without a presentation surface.
pub fn request_headless_device() -> Result<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::LowPower,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .map_err(|err| CanvasError::Device(err.to_string()))?;

    let info = adapter.get_info();
    tracing::debug!(
        name = %info.name,
        backend = ?info.backend,
        device_type = ?info.device_type,
        "selected headless GPU adapter"
    );

    pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("canvastex device"),
        ..Default::default()
    }))
    .map_err(|err| CanvasError::Device(err.to_string()))
}

fn extent(surface: &Surface) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: surface.width(),
        height: surface.height(),
        depth_or_array_layers: 1,
    }
}

fn check_dimensions(texture: &CanvasTexture, surface: &Surface) -> Result<()> {
    if texture.width() != surface.width() || texture.height() != surface.height() {
        return Err(CanvasError::Gpu(format!(
            "'{}' expects {}x{} pixels but the surface is {}x{}",
            texture.label(),
            texture.width(),
            texture.height(),
            surface.width(),
            surface.height()
        )));
    }
    Ok(())
}
