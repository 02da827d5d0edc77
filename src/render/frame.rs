use crate::core::ScrollOffset;
use crate::error::{ChartError, ChartResult};
use crate::render::RasterSurface;

/// Composited view handed to a presentation backend after each pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub surface: &'a RasterSurface,
    pub scroll: ScrollOffset,
    pub layer_count: usize,
}

impl<'a> RenderFrame<'a> {
    #[must_use]
    pub fn new(surface: &'a RasterSurface, scroll: ScrollOffset, layer_count: usize) -> Self {
        Self {
            surface,
            scroll,
            layer_count,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.surface.is_empty() {
            return Err(ChartError::InvalidViewport {
                width: self.surface.logical_width(),
                height: self.surface.logical_height(),
            });
        }
        if !self.scroll.x.is_finite() || !self.scroll.y.is_finite() {
            return Err(ChartError::InvalidData(
                "scroll offset must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}
