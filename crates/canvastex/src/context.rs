use image::Rgba;

use crate::color::Color;
use crate::surface::{Surface, SurfaceInfo};

/// Persistent drawing state of a 2D context.
///
/// Lives next to its surface inside the handle so style changes made during
/// one `update()` are still in effect on the next, like a browser canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextState {
    fill_style: Color,
    global_alpha: f32,
}

impl Default for ContextState {
    fn default() -> Self {
        Self {
            fill_style: Color::BLACK,
            global_alpha: 1.0,
        }
    }
}

/// Immediate-mode 2D drawing context bound to exactly one [`Surface`].
pub struct Context2d<'a> {
    surface: &'a mut Surface,
    state: &'a mut ContextState,
}

impl<'a> Context2d<'a> {
    pub fn new(surface: &'a mut Surface, state: &'a mut ContextState) -> Self {
        Self { surface, state }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn info(&self) -> SurfaceInfo {
        self.surface.info()
    }

    pub fn surface(&self) -> &Surface {
        &*self.surface
    }

    pub fn fill_style(&self) -> Color {
        self.state.fill_style
    }

    pub fn set_fill_style(&mut self, color: Color) {
        self.state.fill_style = color;
    }

    /// Parses a CSS color string. Unparsable input keeps the previous style.
    pub fn set_fill_style_str(&mut self, style: &str) {
        match style.parse::<Color>() {
            Ok(color) => self.state.fill_style = color,
            Err(error) => {
                tracing::warn!(
                    style,
                    %error,
                    previous = %self.state.fill_style,
                    "ignoring unparsable fill style"
                );
            }
        }
    }

    pub fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    /// Sets the alpha applied to every fill. Non-finite values are ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Fills the rectangle with the current fill style (source-over).
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let color = self.state.fill_style.scale_alpha(self.state.global_alpha);
        self.paint_rect(x, y, width, height, |dst| color.over(dst));
    }

    /// Resets the rectangle to transparent black.
    pub fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.paint_rect(x, y, width, height, |_| Color::TRANSPARENT);
    }

    /// Outlines the rectangle with bands `line_width` wide, centred on its
    /// edges. Corners are painted once.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32) {
        if !line_width.is_finite() || line_width <= 0.0 {
            return;
        }
        let (x, y, width, height) = normalize(x, y, width, height);
        let half = line_width / 2.0;
        let outer_width = width + line_width;

        self.fill_rect(x - half, y - half, outer_width, line_width);
        self.fill_rect(x - half, y + height - half, outer_width, line_width);

        let inner_height = height - line_width;
        if inner_height > 0.0 {
            self.fill_rect(x - half, y + half, line_width, inner_height);
            self.fill_rect(x + width - half, y + half, line_width, inner_height);
        }
    }

    /// Fills the whole surface with `color`, leaving the fill style set to it.
    pub fn fill_all(&mut self, color: Color) {
        self.set_fill_style(color);
        let (width, height) = (self.width() as f32, self.height() as f32);
        self.fill_rect(0.0, 0.0, width, height);
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.surface.set_pixel(x, y, color);
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.surface.pixel(x, y)
    }

    fn paint_rect<F>(&mut self, x: f32, y: f32, width: f32, height: f32, mut shade: F)
    where
        F: FnMut(Color) -> Color,
    {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return;
        }
        let (x, y, width, height) = normalize(x, y, width, height);
        let Some((x0, x1)) = span(x, width, self.width()) else {
            return;
        };
        let Some((y0, y1)) = span(y, height, self.height()) else {
            return;
        };

        let pixels = self.surface.pixels_mut();
        for py in y0..y1 {
            for px in x0..x1 {
                let pixel = pixels.get_pixel_mut(px, py);
                let next = shade(Color::from_array(pixel.0));
                *pixel = Rgba(next.to_array());
            }
        }
    }
}

fn normalize(x: f32, y: f32, width: f32, height: f32) -> (f32, f32, f32, f32) {
    let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
    let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
    (x, y, width, height)
}

/// Pixel range whose centres fall inside `[start, start + length)`, clipped
/// to `[0, limit)`.
fn span(start: f32, length: f32, limit: u32) -> Option<(u32, u32)> {
    let begin = (start - 0.5).ceil().max(0.0);
    let end = (start + length - 0.5).ceil().min(limit as f32);
    if end <= begin {
        return None;
    }
    Some((begin as u32, end as u32))
}
