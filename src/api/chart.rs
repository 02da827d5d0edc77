use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::axis::{GridAxis, XAxis, YAxis};
use crate::core::{Coord, Padding, Ratio, ScrollOffset, SurfaceSize};
use crate::data::DataManager;
use crate::error::ChartResult;
use crate::interaction::Guide;
use crate::render::{CairoContextRenderer, RenderFrame, Renderer, SharedLayer, Viewport};

use super::{BackgroundOption, DataOption, DataStyle, Legend, PointOption, RealtimeSession, RenderOption};

/// Options the chart keeps after construction; axis, grid and guide state
/// live in their components.
#[derive(Debug, Clone)]
pub(super) struct ChartSettings {
    pub(super) data: Vec<DataOption>,
    pub(super) background: BackgroundOption,
    pub(super) point: PointOption,
    pub(super) render: RenderOption,
}

/// Layered scatter chart facade consumed by host applications.
///
/// Owns every layer, the data manager, the guide and the realtime session;
/// the viewport only keeps weak references for compositing.
pub struct ScatterChart<R: Renderer> {
    pub(super) renderer: R,
    pub(super) viewport: Viewport,
    pub(super) size: SurfaceSize,
    pub(super) settings: ChartSettings,
    pub(super) container_padding: Padding,
    pub(super) padding: Padding,
    pub(super) ratio: Ratio,
    pub(super) x_axis: XAxis,
    pub(super) y_axis: YAxis,
    pub(super) grid: GridAxis,
    pub(super) data_manager: Box<dyn DataManager>,
    pub(super) data_styles: IndexMap<String, DataStyle>,
    pub(super) data_layers: IndexMap<String, SharedLayer>,
    /// Last drawn in-range point per legend, joined by `area` shapes.
    pub(super) area_anchors: HashMap<String, Coord>,
    pub(super) guide: Option<Guide>,
    pub(super) legend: Option<Legend>,
    pub(super) realtime: Option<RealtimeSession>,
}

impl<R: Renderer> fmt::Debug for ScatterChart<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatterChart")
            .field("size", &self.size)
            .field("padding", &self.padding)
            .field("ratio", &self.ratio)
            .field("mode", &self.data_manager.mode())
            .field("legends", &self.data_layers.keys().collect::<Vec<_>>())
            .field("realtime", &self.realtime)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> ScatterChart<R> {
    /// Current horizontal offset applied to scrolling layers.
    #[must_use]
    pub fn scroll_offset(&self) -> ScrollOffset {
        self.realtime
            .as_ref()
            .map_or(ScrollOffset::default(), |session| {
                ScrollOffset::new(session.scroll_x(), 0.0)
            })
    }

    /// Repaints the background, composites every visible layer and hands the
    /// result to the renderer.
    pub(super) fn shoot(&mut self) -> ChartResult<()> {
        let scroll = self.scroll_offset();
        self.viewport.clear();
        self.viewport
            .fill_background(self.settings.background.color);
        let composited = self.viewport.render(scroll);
        let frame = RenderFrame::new(self.viewport.view_surface(), scroll, composited);
        self.renderer.render(&frame)
    }

    /// Presents the current composited view on an external cairo context.
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        let scroll = self.scroll_offset();
        let frame = RenderFrame::new(
            self.viewport.view_surface(),
            scroll,
            self.viewport.layer_ids().len(),
        );
        self.renderer.render_on_cairo_context(context, &frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
