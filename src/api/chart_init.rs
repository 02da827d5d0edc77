use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::axis::{AxisLayer, GridAxis, XAxis, YAxis};
use crate::core::Ratio;
use crate::error::ChartResult;
use crate::interaction::{Guide, GuideOption};
use crate::render::{LAYER_DEFAULT_PRIORITY, Layer, LayerOptions, Renderer, SharedLayer, Viewport};

use super::chart::ChartSettings;
use super::data_render::resolve_data_styles;
use super::{CONTAINER_PADDING, Legend, LegendOption, ScatterChart, ScatterChartOption};

impl<R: Renderer> ScatterChart<R> {
    /// Builds the chart and paints its first frame.
    ///
    /// Stages run in dependency order: size, viewport, options, data manager,
    /// axes, layout padding, ratios, guide, data layers, legend.
    pub fn new(renderer: R, option: ScatterChartOption) -> ChartResult<Self> {
        option.validate()?;
        let size = option.resolved_size()?;
        let (width, height, dpr) = (size.width, size.height, option.dpr);
        let mut viewport = Viewport::new(width, height, dpr);

        let settings = ChartSettings {
            data: option.data.clone(),
            background: option.background,
            point: option.point,
            render: option.render,
        };
        let data_manager = option.mode.create_manager(option.light_bucket_width);

        let container_padding = CONTAINER_PADDING.merged(&option.padding);
        let y_axis = YAxis::new(
            option.axis.y.clone(),
            container_padding,
            settings.background.color,
            width,
            height,
            dpr,
        )?;
        let x_axis = XAxis::new(option.axis.x.clone(), container_padding, width, height, dpr)?;
        let grid = GridAxis::new(option.grid, container_padding, width, height, dpr);
        viewport
            .add_layer(y_axis.axis().layer())
            .add_layer(x_axis.axis().layer())
            .add_layers(grid.layers());

        let mut chart = Self {
            renderer,
            viewport,
            size,
            settings,
            container_padding,
            padding: container_padding,
            ratio: Ratio::default(),
            x_axis,
            y_axis,
            grid,
            data_manager,
            data_styles: IndexMap::new(),
            data_layers: IndexMap::new(),
            area_anchors: HashMap::new(),
            guide: None,
            legend: None,
            realtime: None,
        };

        chart.update_padding();
        chart.update_ratio()?;
        chart.set_guide(option.guide);
        chart.set_data_layers();
        chart.set_legend(option.legend);
        chart.render_grid();
        chart.shoot()?;

        debug!(
            width,
            height,
            dpr,
            mode = ?chart.data_manager.mode(),
            series = chart.data_layers.len(),
            "scatter chart created"
        );
        Ok(chart)
    }

    fn set_guide(&mut self, option: GuideOption) {
        if option.hidden {
            return;
        }
        let guide = Guide::new(
            option,
            self.guide_layout(),
            self.size.width,
            self.size.height,
            self.viewport.dpr(),
        );
        self.viewport.add_layer(guide.layer());
        self.guide = Some(guide);
    }

    fn set_data_layers(&mut self) {
        self.data_styles = resolve_data_styles(&self.settings.data, &self.settings.point);
        let declared: Vec<(String, i32)> = self
            .settings
            .data
            .iter()
            .map(|data| (data.kind.clone(), data.priority.unwrap_or(LAYER_DEFAULT_PRIORITY)))
            .collect();
        for (legend, priority) in declared {
            self.create_data_layer(&legend, priority);
        }
    }

    fn set_legend(&mut self, option: LegendOption) {
        if option.hidden {
            return;
        }
        self.legend = Some(Legend::new(option, &self.data_styles));
    }

    /// Creates the layer of one legend, sized like the other data layers.
    pub(super) fn create_data_layer(&mut self, legend: &str, priority: i32) -> SharedLayer {
        if let Some(layer) = self.data_layers.get(legend) {
            return layer.clone();
        }
        let options = LayerOptions::sized(self.data_layer_width(), self.size.height, self.viewport.dpr())
            .priority(priority);
        let layer = Layer::new(legend, options).into_shared();
        self.viewport.add_layer(&layer);
        self.data_layers.insert(legend.to_owned(), layer.clone());
        layer
    }

    /// Data layers span the whole realtime window while scrolling.
    pub(super) fn data_layer_width(&self) -> f64 {
        self.realtime
            .as_ref()
            .map_or(self.size.width, |session| session.realtime_width())
    }
}
