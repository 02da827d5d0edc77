use cairo::{Context, Format, ImageSurface};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, RenderFrame, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub frames_presented: usize,
    pub pixels_uploaded: usize,
}

/// Optional extension trait for renderers that can present into an external
/// Cairo context (for example a GTK `DrawingArea` draw callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame<'_>,
    ) -> ChartResult<()>;
}

/// Presents composited chart frames through Cairo.
///
/// Two modes are supported:
/// - offscreen presentation into an owned image surface through `Renderer::render`
/// - in-place presentation on an external context through `CairoContextRenderer`
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::Backend(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame<'_>,
    ) -> ChartResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        let color = self.clear_color;
        context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let Some(image) = frame.surface.cairo_surface() else {
            return Err(ChartError::InvalidViewport {
                width: frame.surface.logical_width(),
                height: frame.surface.logical_height(),
            });
        };
        let scale = 1.0 / frame.surface.dpr();
        context
            .save()
            .map_err(|err| map_backend_error("failed to save context", err))?;
        context.scale(scale, scale);
        context
            .set_source_surface(image, 0.0, 0.0)
            .map_err(|err| map_backend_error("failed to set frame source", err))?;
        let painted = context.paint();
        context
            .restore()
            .map_err(|err| map_backend_error("failed to restore context", err))?;
        painted.map_err(|err| map_backend_error("failed to paint frame", err))?;

        self.last_stats.frames_presented += 1;
        self.last_stats.pixels_uploaded =
            frame.surface.device_width() as usize * frame.surface.device_height() as usize;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame<'_>,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
