mod cairo_backend;
mod frame;
mod layer;
mod null_renderer;
mod primitives;
mod surface;
mod text;
mod viewport;

pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
pub use frame::RenderFrame;
pub use layer::{LAYER_DEFAULT_PRIORITY, Layer, LayerOptions, SharedLayer};
pub use null_renderer::NullRenderer;
pub use primitives::{
    AreaPrimitive, CirclePrimitive, Color, LinePrimitive, RectPrimitive, TextHAlign,
    TextPrimitive, TextVAlign,
};
pub use surface::RasterSurface;
pub use text::FontSpec;
pub use viewport::{ResizeCallback, ResizeEvent, Viewport};

use crate::error::ChartResult;

/// Contract implemented by any presentation backend.
///
/// Backends receive the composited view after every viewport pass, so the
/// layer machinery stays independent of the host's windowing toolkit.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> ChartResult<()>;
}

