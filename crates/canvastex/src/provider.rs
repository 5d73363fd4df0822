use std::fmt;

use crate::config::{CanvasConfig, DEFAULT_HEIGHT, DEFAULT_LABEL, DEFAULT_WIDTH};
use crate::context::{Context2d, ContextState};
use crate::error::{CanvasError, Result};
use crate::gpu::GpuTexture;
use crate::host::{DebugSurfaceHost, ElementId, SurfaceStyle};
use crate::render::{DefaultFill, DrawFn, SurfaceRenderer};
use crate::surface::{Surface, SurfaceInfo};
use crate::texture::CanvasTexture;

/// Options accepted by [`create`].
///
/// Defaults: 64x64, hidden, no draw callback (solid white), no debug host.
pub struct CanvasTextureOptions {
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub label: String,
    draw: Option<Box<dyn SurfaceRenderer>>,
    host: Option<Box<dyn DebugSurfaceHost>>,
}

impl Default for CanvasTextureOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            visible: false,
            label: DEFAULT_LABEL.to_string(),
            draw: None,
            host: None,
        }
    }
}

impl CanvasTextureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            visible: config.visible,
            label: config.label.clone(),
            ..Self::default()
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Draw callback invoked on every update with the surface dimensions and
    /// its drawing context.
    pub fn draw<F>(self, draw: F) -> Self
    where
        F: FnMut(SurfaceInfo, &mut Context2d<'_>) -> anyhow::Result<()> + 'static,
    {
        self.renderer(DrawFn(draw))
    }

    pub fn renderer(mut self, renderer: impl SurfaceRenderer + 'static) -> Self {
        self.draw = Some(Box::new(renderer));
        self
    }

    /// Host that receives the surface when `visible` is set.
    pub fn host(mut self, host: impl DebugSurfaceHost + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }
}

impl fmt::Debug for CanvasTextureOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasTextureOptions")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("visible", &self.visible)
            .field("label", &self.label)
            .field("draw", &self.draw.is_some())
            .field("host", &self.host.is_some())
            .finish()
    }
}

/// A drawable surface bound to a texture for a 3D scene.
///
/// The texture only reflects the surface as of the last [`update`]. Pixels
/// changed through [`surface_mut`] or [`context`] stay invisible to the GPU
/// until the next update marks the texture dirty.
///
/// [`update`]: CanvasTextureHandle::update
/// [`surface_mut`]: CanvasTextureHandle::surface_mut
/// [`context`]: CanvasTextureHandle::context
pub struct CanvasTextureHandle {
    surface: Surface,
    context: ContextState,
    texture: CanvasTexture,
    style: SurfaceStyle,
    renderer: Box<dyn SurfaceRenderer>,
    host: Option<Box<dyn DebugSurfaceHost>>,
    element: Option<ElementId>,
    gpu: Option<GpuTexture>,
    renders: u64,
}

/// Builds a surface, its context and texture, and renders it once so the
/// handle is ready to sample.
pub fn create(options: CanvasTextureOptions) -> Result<CanvasTextureHandle> {
    let CanvasTextureOptions {
        width,
        height,
        visible,
        label,
        draw,
        mut host,
    } = options;

    let surface = Surface::new(width, height);
    let style = SurfaceStyle::overlay(visible);

    let element = if visible {
        match host.as_mut() {
            Some(host) => Some(host.attach(&label, &style, &surface).map_err(|source| {
                CanvasError::Host {
                    label: label.clone(),
                    source,
                }
            })?),
            None => {
                tracing::warn!(
                    label = %label,
                    "visible canvas requested without a debug host; keeping it off-screen"
                );
                None
            }
        }
    } else {
        None
    };

    let mut handle = CanvasTextureHandle {
        texture: CanvasTexture::new(label, surface.info()),
        surface,
        context: ContextState::default(),
        style,
        renderer: draw
            .unwrap_or_else(|| Box::new(DefaultFill::default()) as Box<dyn SurfaceRenderer>),
        host,
        element,
        gpu: None,
        renders: 0,
    };

    tracing::debug!(
        label = handle.texture.label(),
        width,
        height,
        visible,
        attached = handle.element.is_some(),
        "created canvas texture"
    );

    handle.update()?;
    Ok(handle)
}

impl CanvasTextureHandle {
    /// Runs the renderer over the whole surface, marks the texture for
    /// re-upload and refreshes the debug host. A failed renderer leaves the
    /// texture flags untouched.
    pub fn update(&mut self) -> Result<()> {
        let info = self.surface.info();
        let mut ctx = Context2d::new(&mut self.surface, &mut self.context);
        self.renderer
            .render(info, &mut ctx)
            .map_err(|source| CanvasError::Draw {
                label: self.texture.label().to_string(),
                source,
            })?;

        self.texture.mark_needs_update();
        self.renders += 1;

        if let (Some(host), Some(id)) = (self.host.as_mut(), self.element) {
            host.refresh(id, &self.surface)
                .map_err(|source| CanvasError::Host {
                    label: self.texture.label().to_string(),
                    source,
                })?;
        }

        tracing::trace!(
            label = self.texture.label(),
            version = self.texture.version(),
            renders = self.renders,
            "updated canvas texture"
        );
        Ok(())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Direct pixel access. Does not mark the texture dirty.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Drawing context bound to this handle's surface. Drawing through it
    /// does not mark the texture dirty.
    pub fn context(&mut self) -> Context2d<'_> {
        Context2d::new(&mut self.surface, &mut self.context)
    }

    pub fn texture(&self) -> &CanvasTexture {
        &self.texture
    }

    pub fn texture_mut(&mut self) -> &mut CanvasTexture {
        &mut self.texture
    }

    pub fn style(&self) -> &SurfaceStyle {
        &self.style
    }

    /// Debug element the surface is attached to, if visible.
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Number of completed renders, including the one run by [`create`].
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Pushes the surface to the GPU, creating the texture on first use.
    /// Returns whether pixels were written.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<bool> {
        match self.gpu.as_mut() {
            Some(gpu) => gpu.sync(device, queue, &mut self.texture, &self.surface),
            None => {
                let gpu = GpuTexture::new(device, queue, &mut self.texture, &self.surface)?;
                self.gpu = Some(gpu);
                Ok(true)
            }
        }
    }

    pub fn gpu_texture(&self) -> Option<&GpuTexture> {
        self.gpu.as_ref()
    }

    /// Detaches the surface from the debug host and releases the GPU
    /// texture.
    pub fn dispose(mut self) -> Result<()> {
        self.gpu = None;
        self.detach()
    }

    fn detach(&mut self) -> Result<()> {
        let Some(id) = self.element.take() else {
            return Ok(());
        };
        let Some(host) = self.host.as_mut() else {
            return Ok(());
        };
        host.detach(id).map_err(|source| CanvasError::Host {
            label: self.texture.label().to_string(),
            source,
        })?;
        tracing::debug!(label = self.texture.label(), element = %id, "detached canvas");
        Ok(())
    }
}

impl Drop for CanvasTextureHandle {
    fn drop(&mut self) {
        if let Err(error) = self.detach() {
            tracing::warn!(%error, "failed to detach canvas on drop");
        }
    }
}

impl fmt::Debug for CanvasTextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasTextureHandle")
            .field("texture", &self.texture)
            .field("style", &self.style)
            .field("element", &self.element)
            .field("renders", &self.renders)
            .field("gpu", &self.gpu.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::color::Color;
    use crate::host::{DebugDocument, DisplayMode};
    use crate::texture::{FilterMode, WrapMode};

    #[test]
    fn surface_has_requested_dimensions() {
        for (width, height) in [(1, 1), (16, 48), (64, 64), (300, 7)] {
            let handle = create(CanvasTextureOptions::new().size(width, height)).unwrap();
            assert_eq!(handle.surface().width(), width);
            assert_eq!(handle.surface().height(), height);
            assert_eq!(handle.texture().width(), width);
            assert_eq!(handle.texture().height(), height);
        }
    }

    #[test]
    fn defaults_to_white_64_square() {
        let mut handle = create(CanvasTextureOptions::default()).unwrap();
        assert_eq!(handle.surface().width(), 64);
        assert_eq!(handle.surface().height(), 64);
        assert!(handle.surface().is_filled_with(Color::WHITE));
        assert_eq!(handle.context().fill_style(), Color::WHITE);
        assert_eq!(handle.render_count(), 1);
        assert!(handle.texture().needs_update());
    }

    #[test]
    fn visible_surface_is_attached_immediately() {
        let document = DebugDocument::new();
        let handle = create(
            CanvasTextureOptions::new()
                .visible(true)
                .label("debug grid")
                .host(document.clone()),
        )
        .unwrap();

        let id = handle.element().unwrap();
        let element = document.element(id).unwrap();
        assert_eq!(element.label, "debug grid");
        assert_eq!(element.style.display, DisplayMode::Block);
        assert_eq!(element.style.z_index, 10);
        assert!(element.content.is_filled_with(Color::WHITE));
    }

    #[test]
    fn hidden_surface_stays_out_of_document_but_drawable() {
        let document = DebugDocument::new();
        let mut handle = create(CanvasTextureOptions::new().host(document.clone())).unwrap();
        assert!(document.is_empty());
        assert_eq!(handle.element(), None);
        assert_eq!(handle.style().display, DisplayMode::None);

        handle.context().fill_all(Color::BLACK);
        assert!(handle.surface().is_filled_with(Color::BLACK));
    }

    #[test]
    fn visible_without_host_stays_off_screen() {
        let handle = create(CanvasTextureOptions::new().visible(true)).unwrap();
        assert_eq!(handle.element(), None);
        assert_eq!(handle.style().display, DisplayMode::Block);
    }

    #[test]
    fn update_runs_draw_callback_each_time() {
        let calls = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&calls);
        let mut handle = create(CanvasTextureOptions::new().size(4, 4).draw(move |_, ctx| {
            counter.set(counter.get() + 1);
            let shade = (counter.get() * 10) as u8;
            ctx.fill_all(Color::rgb(shade, 0, 0));
            Ok(())
        }))
        .unwrap();
        assert_eq!(calls.get(), 1);

        for _ in 0..5 {
            handle.update().unwrap();
        }
        assert_eq!(calls.get(), 6);
        assert_eq!(handle.render_count(), 6);
        assert!(handle.surface().is_filled_with(Color::rgb(60, 0, 0)));
    }

    #[test]
    fn update_always_flags_reupload() {
        let mut handle = create(CanvasTextureOptions::new().size(2, 2)).unwrap();
        handle.texture_mut().mark_uploaded();
        assert!(!handle.texture().needs_update());

        handle.update().unwrap();
        assert!(handle.texture().needs_update());
        assert_eq!(handle.texture().version(), 2);
    }

    #[test]
    fn direct_mutation_does_not_flag_reupload() {
        let mut handle = create(CanvasTextureOptions::new().size(2, 2)).unwrap();
        handle.texture_mut().mark_uploaded();

        handle.surface_mut().set_pixel(0, 0, Color::BLACK);
        handle.context().fill_rect(0.0, 0.0, 1.0, 1.0);
        assert!(!handle.texture().needs_update());
        assert_eq!(handle.texture().version(), 1);
    }

    #[test]
    fn sampling_modes_ignore_options() {
        let document = DebugDocument::new();
        let variants = [
            CanvasTextureOptions::new(),
            CanvasTextureOptions::new().size(8, 2).visible(true),
            CanvasTextureOptions::new()
                .visible(true)
                .host(document.clone())
                .draw(|_, _| Ok(())),
        ];
        for options in variants {
            let handle = create(options).unwrap();
            let texture = handle.texture();
            assert_eq!(texture.wrap_s, WrapMode::Repeat);
            assert_eq!(texture.wrap_t, WrapMode::Repeat);
            assert_eq!(texture.mag_filter, FilterMode::Nearest);
        }
    }

    #[test]
    fn red_draw_callback_is_reapplied() {
        let mut handle = create(CanvasTextureOptions::new().size(32, 32).draw(|_, ctx| {
            ctx.set_fill_style_str("red");
            ctx.fill_rect(0.0, 0.0, 32.0, 32.0);
            Ok(())
        }))
        .unwrap();
        let red = Color::rgb(255, 0, 0);
        assert!(handle.surface().is_filled_with(red));

        handle.surface_mut().set_pixel(3, 3, Color::BLACK);
        handle.update().unwrap();
        assert!(handle.surface().is_filled_with(red));
        assert_eq!(handle.render_count(), 2);
    }

    #[test]
    fn draw_failure_propagates_without_flagging() {
        let fail = Rc::new(Cell::new(false));
        let trigger = Rc::clone(&fail);
        let mut handle = create(CanvasTextureOptions::new().draw(move |_, _| {
            if trigger.get() {
                anyhow::bail!("palette exhausted");
            }
            Ok(())
        }))
        .unwrap();
        handle.texture_mut().mark_uploaded();

        fail.set(true);
        let err = handle.update().unwrap_err();
        assert!(matches!(err, CanvasError::Draw { ref label, .. } if label == "canvas texture"));
        assert!(!handle.texture().needs_update());
        assert_eq!(handle.texture().version(), 1);
        assert_eq!(handle.render_count(), 1);
    }

    #[test]
    fn draw_failure_at_creation_fails_create_and_detaches() {
        let document = DebugDocument::new();
        let result = create(
            CanvasTextureOptions::new()
                .visible(true)
                .host(document.clone())
                .draw(|_, _| anyhow::bail!("no context")),
        );
        assert!(matches!(result, Err(CanvasError::Draw { .. })));
        assert!(document.is_empty());
    }

    #[test]
    fn update_refreshes_debug_element() {
        let document = DebugDocument::new();
        let mut handle = create(
            CanvasTextureOptions::new()
                .size(2, 2)
                .visible(true)
                .host(document.clone()),
        )
        .unwrap();
        handle.update().unwrap();

        let element = document.element(handle.element().unwrap()).unwrap();
        assert_eq!(element.refreshes, 2);
    }

    #[test]
    fn dispose_detaches_from_document() {
        let document = DebugDocument::new();
        let handle = create(
            CanvasTextureOptions::new()
                .visible(true)
                .host(document.clone()),
        )
        .unwrap();
        assert_eq!(document.len(), 1);

        handle.dispose().unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn drop_detaches_from_document() {
        let document = DebugDocument::new();
        {
            let _handle = create(
                CanvasTextureOptions::new()
                    .visible(true)
                    .host(document.clone()),
            )
            .unwrap();
            assert_eq!(document.len(), 1);
        }
        assert!(document.is_empty());
    }

    #[test]
    fn from_config_carries_fields() {
        let config = CanvasConfig {
            width: 12,
            height: 3,
            visible: true,
            label: "stripes".into(),
        };
        let options = CanvasTextureOptions::from_config(&config);
        assert_eq!((options.width, options.height), (12, 3));
        assert!(options.visible);
        assert_eq!(options.label, "stripes");
    }

    #[test]
    fn zero_sized_surface_is_constructed() {
        let handle = create(CanvasTextureOptions::new().size(0, 0)).unwrap();
        assert!(handle.surface().is_empty());
        assert!(handle.texture().needs_update());
    }
}
