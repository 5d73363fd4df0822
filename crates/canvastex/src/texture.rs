use crate::surface::SurfaceInfo;

/// Sampling behaviour outside the `[0, 1]` coordinate range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Tile the texture.
    #[default]
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

impl WrapMode {
    pub fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// Texel interpolation when the texture is magnified or minified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// No interpolation; keeps hard pixel edges.
    Nearest,
    Linear,
}

impl FilterMode {
    pub fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// GPU-facing description of a canvas surface.
///
/// The texture never copies pixels itself; it records how the surface should
/// be sampled and whether the surface changed since the last upload. The
/// render side reads `needs_update` and clears it once it has re-uploaded
/// (see [`crate::gpu::GpuTexture::sync`]).
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasTexture {
    label: String,
    info: SurfaceInfo,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    needs_update: bool,
    version: u64,
    uploaded_version: Option<u64>,
}

impl CanvasTexture {
    /// Repeat wrapping on both axes, nearest magnification, linear
    /// minification.
    pub fn new(label: impl Into<String>, info: SurfaceInfo) -> Self {
        Self {
            label: label.into(),
            info,
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Linear,
            needs_update: false,
            version: 0,
            uploaded_version: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn info(&self) -> SurfaceInfo {
        self.info
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Number of times the texture has been marked dirty.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version most recently pushed to the GPU, if any.
    pub fn uploaded_version(&self) -> Option<u64> {
        self.uploaded_version
    }

    /// Flags the surface contents for re-upload on the next render pass,
    /// whether or not the pixels actually changed.
    pub fn mark_needs_update(&mut self) {
        self.needs_update = true;
        self.version += 1;
    }

    pub(crate) fn mark_uploaded(&mut self) {
        self.needs_update = false;
        self.uploaded_version = Some(self.version);
    }

    pub fn sampler_descriptor(&self) -> wgpu::SamplerDescriptor<'_> {
        wgpu::SamplerDescriptor {
            label: Some(self.label.as_str()),
            address_mode_u: self.wrap_s.to_wgpu(),
            address_mode_v: self.wrap_t.to_wgpu(),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.mag_filter.to_wgpu(),
            min_filter: self.min_filter.to_wgpu(),
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture() -> CanvasTexture {
        CanvasTexture::new(
            "test",
            SurfaceInfo {
                width: 8,
                height: 4,
            },
        )
    }

    #[test]
    fn new_texture_repeats_with_nearest_magnification() {
        let texture = texture();
        assert_eq!(texture.wrap_s, WrapMode::Repeat);
        assert_eq!(texture.wrap_t, WrapMode::Repeat);
        assert_eq!(texture.mag_filter, FilterMode::Nearest);
        assert!(!texture.needs_update());
        assert_eq!(texture.version(), 0);
        assert_eq!((texture.width(), texture.height()), (8, 4));
    }

    #[test]
    fn marking_dirty_bumps_version() {
        let mut texture = texture();
        texture.mark_needs_update();
        texture.mark_needs_update();
        assert!(texture.needs_update());
        assert_eq!(texture.version(), 2);

        texture.mark_uploaded();
        assert!(!texture.needs_update());
        assert_eq!(texture.uploaded_version(), Some(2));
    }

    #[test]
    fn sampler_descriptor_mirrors_modes() {
        let texture = texture();
        let descriptor = texture.sampler_descriptor();
        assert_eq!(descriptor.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(descriptor.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(descriptor.mag_filter, wgpu::FilterMode::Nearest);
        assert_eq!(descriptor.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(descriptor.label, Some("test"));
    }
}
