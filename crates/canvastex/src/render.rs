use crate::color::Color;
use crate::context::Context2d;
use crate::surface::SurfaceInfo;

/// Strategy that paints a surface on every update.
///
/// The renderer owns all pixel content: nothing is cleared between updates,
/// so a renderer that wants a fresh frame must paint every pixel.
pub trait SurfaceRenderer {
    fn render(&mut self, surface: SurfaceInfo, ctx: &mut Context2d<'_>) -> anyhow::Result<()>;
}

impl<R> SurfaceRenderer for Box<R>
where
    R: SurfaceRenderer + ?Sized,
{
    fn render(&mut self, surface: SurfaceInfo, ctx: &mut Context2d<'_>) -> anyhow::Result<()> {
        (**self).render(surface, ctx)
    }
}

/// Solid fill used when no draw callback is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFill {
    pub color: Color,
}

impl Default for DefaultFill {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
        }
    }
}

impl SurfaceRenderer for DefaultFill {
    fn render(&mut self, _surface: SurfaceInfo, ctx: &mut Context2d<'_>) -> anyhow::Result<()> {
        ctx.fill_all(self.color);
        Ok(())
    }
}

/// Adapts a closure into a [`SurfaceRenderer`].
pub struct DrawFn<F>(pub F);

impl<F> SurfaceRenderer for DrawFn<F>
where
    F: FnMut(SurfaceInfo, &mut Context2d<'_>) -> anyhow::Result<()>,
{
    fn render(&mut self, surface: SurfaceInfo, ctx: &mut Context2d<'_>) -> anyhow::Result<()> {
        (self.0)(surface, ctx)
    }
}
