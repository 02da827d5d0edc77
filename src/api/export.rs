use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::ScatterChart;

impl<R: Renderer> ScatterChart<R> {
    /// Encodes the last composited frame as PNG at device resolution.
    pub fn to_png_bytes(&self) -> ChartResult<Vec<u8>> {
        let surface = self.viewport.view_surface();
        let image = surface
            .cairo_surface()
            .ok_or(ChartError::InvalidViewport {
                width: surface.logical_width(),
                height: surface.logical_height(),
            })?;
        let mut bytes = Vec::new();
        image
            .write_to_png(&mut bytes)
            .map_err(|err| ChartError::Backend(format!("png encoding failed: {err}")))?;
        debug!(
            width = surface.device_width(),
            height = surface.device_height(),
            bytes = bytes.len(),
            "chart exported as png"
        );
        Ok(bytes)
    }
}
