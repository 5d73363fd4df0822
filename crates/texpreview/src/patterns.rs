use canvastex::{Color, Context2d, DefaultFill, SurfaceInfo, SurfaceRenderer};

use crate::cli::PatternKind;

const INK: Color = Color::rgb(32, 32, 48);
const PAPER: Color = Color::rgb(236, 232, 220);

pub fn renderer_for(kind: PatternKind, cell: u32) -> Box<dyn SurfaceRenderer> {
    let cell = cell.max(1);
    match kind {
        PatternKind::White => Box::new(DefaultFill::default()),
        PatternKind::Checker => Box::new(Checker { cell, frame: 0 }),
        PatternKind::Gradient => Box::new(Gradient { frame: 0 }),
        PatternKind::Stripes => Box::new(Stripes { cell, frame: 0 }),
    }
}

/// Alternating cells; the phase flips on every frame.
struct Checker {
    cell: u32,
    frame: u32,
}

impl SurfaceRenderer for Checker {
    fn render(&mut self, surface: SurfaceInfo, ctx: &mut Context2d<'_>) -> anyhow::Result<()> {
        let phase = self.frame % 2;
        for row in 0..surface.height.div_ceil(self.cell) {
            for col in 0..surface.width.div_ceil(self.cell) {
                let color = if (row + col + phase) % 2 == 0 { INK } else { PAPER };
                ctx.set_fill_style(color);
                ctx.fill_rect(
                    (col * self.cell) as f32,
                    (row * self.cell) as f32,
                    self.cell as f32,
                    self.cell as f32,
                );
            }
        }
        self.frame = self.frame.wrapping_add(1);
        Ok(())
    }
}

/// Horizontal ramp whose hue rotates with the frame counter.
struct Gradient {
    frame: u32,
}

impl SurfaceRenderer for Gradient {
    fn render(&mut self, surface: SurfaceInfo, ctx: &mut Context2d<'_>) -> anyhow::Result<()> {
        let span = surface.width.max(1) as f32;
        let shift = (self.frame.wrapping_mul(16) % 256) as u8;
        for x in 0..surface.width {
            let t = x as f32 / span;
            let level = (t * 255.0).round() as u8;
            ctx.set_fill_style(Color::rgb(
                level,
                level.wrapping_add(shift),
                255 - level,
            ));
            ctx.fill_rect(x as f32, 0.0, 1.0, surface.height as f32);
        }
        self.frame = self.frame.wrapping_add(1);
        Ok(())
    }
}

/// Vertical bands that scroll one pixel per frame, tiling seamlessly when the
/// width is a multiple of twice the cell size.
struct Stripes {
    cell: u32,
    frame: u32,
}

impl SurfaceRenderer for Stripes {
    fn render(&mut self, surface: SurfaceInfo, ctx: &mut Context2d<'_>) -> anyhow::Result<()> {
        ctx.fill_all(PAPER);
        ctx.set_fill_style(INK);
        let period = self.cell.saturating_mul(2);
        let offset = self.frame % period;
        let mut x = offset as i64 - period as i64;
        while x < surface.width as i64 {
            ctx.fill_rect(x as f32, 0.0, self.cell as f32, surface.height as f32);
            x += period as i64;
        }
        self.frame = self.frame.wrapping_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use canvastex::{create, CanvasTextureOptions};

    use super::*;

    fn render(kind: PatternKind, width: u32, height: u32, updates: u32) -> canvastex::Surface {
        let mut handle = create(
            CanvasTextureOptions::new()
                .size(width, height)
                .renderer(renderer_for(kind, 2)),
        )
        .unwrap();
        for _ in 0..updates {
            handle.update().unwrap();
        }
        handle.surface().clone()
    }

    #[test]
    fn checker_alternates_and_flips_phase() {
        let first = render(PatternKind::Checker, 4, 4, 0);
        assert_eq!(first.pixel(0, 0), Some(INK));
        assert_eq!(first.pixel(2, 0), Some(PAPER));
        assert_eq!(first.pixel(2, 2), Some(INK));

        let second = render(PatternKind::Checker, 4, 4, 1);
        assert_eq!(second.pixel(0, 0), Some(PAPER));
    }

    #[test]
    fn white_matches_default_fill() {
        let surface = render(PatternKind::White, 3, 3, 2);
        assert!(surface.is_filled_with(Color::WHITE));
    }

    #[test]
    fn stripes_scroll_by_one_pixel() {
        let first = render(PatternKind::Stripes, 8, 1, 0);
        assert_eq!(first.pixel(0, 0), Some(INK));
        assert_eq!(first.pixel(2, 0), Some(PAPER));

        let second = render(PatternKind::Stripes, 8, 1, 1);
        assert_eq!(second.pixel(0, 0), Some(PAPER));
        assert_eq!(second.pixel(1, 0), Some(INK));
    }

    #[test]
    fn stripes_survive_oversized_cells() {
        use crate::cli::MAX_CELL;

        for cell in [MAX_CELL, 1 << 31, u32::MAX] {
            let mut handle = create(
                CanvasTextureOptions::new()
                    .size(4, 4)
                    .renderer(renderer_for(PatternKind::Stripes, cell)),
            )
            .unwrap();
            handle.update().unwrap();
            assert_eq!(handle.render_count(), 2);
        }
    }

    #[test]
    fn gradient_covers_every_pixel() {
        let surface = render(PatternKind::Gradient, 16, 4, 0);
        assert!(surface.image().pixels().all(|pixel| pixel.0[3] == 255));
        assert_ne!(surface.pixel(0, 0), surface.pixel(15, 0));
    }
}
