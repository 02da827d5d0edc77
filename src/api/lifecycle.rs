use tracing::{debug, warn};

use crate::axis::{AxisLayer, GridAxis, XAxis, YAxis};
use crate::core::{Padding, Ratio, SurfaceSize};
use crate::data::DataManager;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{Guide, GuideEvent};
use crate::render::{Renderer, SharedLayer, Viewport};

use super::{
    AxisPair, ChartEventKind, ChartOptionPatch, DataStyle, EffectiveChartOption, Legend,
    LegendClickEvent, ScatterChart,
};

impl<R: Renderer> ScatterChart<R> {
    /// Resizes every layer, recomputes the layout and redraws all data.
    ///
    /// A running realtime session is stopped first.
    pub fn resize(&mut self, width: f64, height: f64) -> ChartResult<()> {
        self.resize_to(Some(width), Some(height))
    }

    /// Like [`Self::resize`], with each missing side falling back to the
    /// current container size. `resize_to(None, None)` re-runs the layout
    /// at the current size.
    pub fn resize_to(&mut self, width: Option<f64>, height: Option<f64>) -> ChartResult<()> {
        let width = width.unwrap_or(self.size.width);
        let height = height.unwrap_or(self.size.height);
        let size = SurfaceSize::new(width, height).validate()?;
        self.stop_realtime()?;
        self.size = size;
        self.viewport.set_size(width, height);
        self.x_axis.set_size(width, height);
        self.y_axis.set_size(width, height);
        self.grid.set_size(width, width, height);
        if let Some(guide) = self.guide.as_mut() {
            guide.set_size(width, height);
        }
        self.relayout()?;
        debug!(width, height, "chart resized");
        self.render_all_data()
    }

    /// Applies axis and render option updates, then redraws all data.
    ///
    /// Both axis patches are validated before anything changes.
    pub fn set_option(&mut self, patch: ChartOptionPatch) -> ChartResult<()> {
        let base_x = self
            .realtime
            .as_ref()
            .map_or_else(|| self.x_axis.axis().option(), |session| session.base_x_axis());
        if let Some(x) = patch.axis.x.as_ref() {
            base_x.merged(x, "x")?;
        }
        if let Some(y) = patch.axis.y.as_ref() {
            self.y_axis.axis().option().merged(y, "y")?;
        }

        self.stop_realtime()?;
        if let Some(render) = patch.render.as_ref() {
            self.settings.render = self.settings.render.merged(render);
        }
        if let Some(x) = patch.axis.x.as_ref() {
            self.x_axis.set_option(x)?;
        }
        if let Some(y) = patch.axis.y.as_ref() {
            self.y_axis.set_option(y)?;
        }
        self.relayout()?;
        debug!(
            x_min = self.x_axis.axis().min(),
            x_max = self.x_axis.axis().max(),
            y_min = self.y_axis.axis().min(),
            y_max = self.y_axis.axis().max(),
            "chart option updated"
        );
        self.render_all_data()
    }

    /// Configuration currently in effect.
    #[must_use]
    pub fn get_option(&self) -> EffectiveChartOption {
        EffectiveChartOption {
            axis: AxisPair {
                x: self.x_axis.axis().option().clone(),
                y: self.y_axis.axis().option().clone(),
            },
            data: self.settings.data.clone(),
            legend: self.legend.as_ref().map(Legend::option),
            guide: self.guide.as_ref().map(Guide::option),
            background: self.settings.background,
            grid: self.grid.option(),
            padding: self.padding,
            point: self.settings.point,
            render: self.settings.render,
            mode: self.data_manager.mode(),
            size: self.size,
        }
    }

    /// Drops all data and blanks the data layers and guide overlay.
    pub fn clear(&mut self) -> ChartResult<()> {
        self.data_manager.reset();
        self.clear_data_layers();
        if let Some(legend) = self.legend.as_mut() {
            for key in self.data_layers.keys() {
                legend.set_count(key, 0);
            }
        }
        if let Some(guide) = self.guide.as_mut() {
            guide.clear();
        }
        debug!("chart cleared");
        self.shoot()
    }

    /// Stops realtime, detaches every handler and layer, and hands the
    /// renderer back to the host.
    pub fn destroy(mut self) -> R {
        if let Err(err) = self.stop_realtime() {
            warn!(error = %err, "failed to stop realtime during destroy");
        }
        if let Some(guide) = self.guide.as_mut() {
            guide.destroy();
        }
        if let Some(legend) = self.legend.as_mut() {
            legend.destroy();
        }
        self.viewport.destroy();
        self.data_layers.clear();
        debug!("chart destroyed");
        self.renderer
    }

    /// Flips one legend entry; see [`Self::set_legend_checked`].
    pub fn toggle_legend(&mut self, key: &str) -> ChartResult<LegendClickEvent> {
        let checked = self
            .legend
            .as_ref()
            .ok_or(ChartError::EventTargetUnavailable(ChartEventKind::ClickLegend))?
            .entry(key)
            .map(|entry| !entry.checked)
            .ok_or_else(|| ChartError::UnknownLegend(key.to_owned()))?;
        self.set_legend_checked(key, checked)
    }

    /// Shows or hides the legend's data layer, recomposites and emits the
    /// `ClickLegend` event.
    pub fn set_legend_checked(&mut self, key: &str, checked: bool) -> ChartResult<LegendClickEvent> {
        let legend = self
            .legend
            .as_mut()
            .ok_or(ChartError::EventTargetUnavailable(ChartEventKind::ClickLegend))?;
        let event = legend.set_checked(key, checked)?;
        let layer = self
            .data_layers
            .get(key)
            .ok_or_else(|| ChartError::LayerNotFound(key.to_owned()))?;
        if checked {
            layer.borrow_mut().show();
        } else {
            layer.borrow_mut().hide();
        }
        self.shoot()?;
        if let Some(legend) = self.legend.as_mut() {
            legend.emit(&event);
        }
        debug!(legend = key, checked, "legend toggled");
        Ok(event)
    }

    /// Badge count of `key`, `None` without a legend or for unknown keys.
    #[must_use]
    pub fn legend_count(&self, key: &str) -> Option<usize> {
        self.legend.as_ref().and_then(|legend| legend.count(key))
    }

    pub fn show_layer(&mut self, id: &str) -> ChartResult<()> {
        self.viewport.show(id)?;
        self.shoot()
    }

    pub fn hide_layer(&mut self, id: &str) -> ChartResult<()> {
        self.viewport.hide(id)?;
        self.shoot()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if let Some(guide) = self.guide.as_mut() {
            guide.pointer_down(x, y);
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> ChartResult<()> {
        let Some(guide) = self.guide.as_mut() else {
            return Ok(());
        };
        guide.pointer_move(x, y);
        self.shoot()
    }

    /// Completes a click or drag gesture; handlers run before this returns.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> ChartResult<Option<GuideEvent>> {
        let Some(guide) = self.guide.as_mut() else {
            return Ok(None);
        };
        let event = guide.pointer_up(x, y);
        self.shoot()?;
        Ok(event)
    }

    pub fn pointer_leave(&mut self) -> ChartResult<()> {
        let Some(guide) = self.guide.as_mut() else {
            return Ok(());
        };
        guide.pointer_leave();
        self.shoot()
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.size.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Layout padding around the plot area.
    #[must_use]
    pub fn padding(&self) -> Padding {
        self.padding
    }

    #[must_use]
    pub fn ratio(&self) -> Ratio {
        self.ratio
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn x_axis(&self) -> &XAxis {
        &self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> &YAxis {
        &self.y_axis
    }

    #[must_use]
    pub fn grid(&self) -> &GridAxis {
        &self.grid
    }

    #[must_use]
    pub fn guide(&self) -> Option<&Guide> {
        self.guide.as_ref()
    }

    #[must_use]
    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    #[must_use]
    pub fn data_manager(&self) -> &dyn DataManager {
        self.data_manager.as_ref()
    }

    #[must_use]
    pub fn data_layer(&self, legend: &str) -> Option<&SharedLayer> {
        self.data_layers.get(legend)
    }

    #[must_use]
    pub fn data_style(&self, legend: &str) -> Option<&DataStyle> {
        self.data_styles.get(legend)
    }

    /// Legend keys in creation order.
    #[must_use]
    pub fn legend_keys(&self) -> Vec<String> {
        self.data_layers.keys().cloned().collect()
    }
}
