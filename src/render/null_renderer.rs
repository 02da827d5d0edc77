use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates every frame and records what it was handed, so tests
/// can assert on composite passes without a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_presented: usize,
    pub last_layer_count: usize,
    pub last_painted_pixels: usize,
    pub last_scroll_x: f64,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> ChartResult<()> {
        frame.validate()?;
        self.frames_presented += 1;
        self.last_layer_count = frame.layer_count;
        self.last_painted_pixels = frame.surface.painted_pixel_count();
        self.last_scroll_x = frame.scroll.x;
        Ok(())
    }
}
