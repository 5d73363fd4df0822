//! Procedurally drawn canvas textures.
//!
//! A canvas texture pairs a CPU-side RGBA surface with a texture description
//! a 3D renderer can sample. The flow is:
//!
//! ```text
//!   create(options) ──▶ Surface + Context2d ──▶ update()
//!                                                  │ renderer paints pixels
//!                                                  ▼
//!                        CanvasTexture.needs_update = true
//!                                                  │ upload(device, queue)
//!                                                  ▼
//!                                     GpuTexture (wgpu texture + sampler)
//! ```
//!
//! Textures repeat on both axes and magnify with nearest filtering so
//! hand-drawn pixel patterns stay crisp when tiled across geometry. The
//! texture is never synchronised implicitly: it reflects the surface as of the
//! last `update()`.
//!
//! Surfaces can also be mirrored to a [`DebugSurfaceHost`] while developing
//! (`visible = true`); the handle detaches itself on `dispose()` or drop.

mod color;
mod config;
mod context;
mod error;
pub mod gpu;
mod host;
mod provider;
mod render;
mod surface;
mod texture;

pub use color::{Color, ParseColorError};
pub use config::{CanvasConfig, DEFAULT_HEIGHT, DEFAULT_LABEL, DEFAULT_WIDTH};
pub use context::{Context2d, ContextState};
pub use error::{CanvasError, Result};
pub use gpu::GpuTexture;
pub use host::{
    DebugDocument, DebugElement, DebugSurfaceHost, DisplayMode, ElementId, SnapshotHost,
    SurfaceStyle, OVERLAY_Z_INDEX,
};
pub use provider::{create, CanvasTextureHandle, CanvasTextureOptions};
pub use render::{DefaultFill, DrawFn, SurfaceRenderer};
pub use surface::{Surface, SurfaceInfo};
pub use texture::{CanvasTexture, FilterMode, WrapMode};
