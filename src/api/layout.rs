use tracing::trace;

use crate::axis::{Axis, AxisLayer};
use crate::core::{CoordinateMapper, Padding, PlotGeometry};
use crate::error::ChartResult;
use crate::interaction::GuideLayout;
use crate::render::Renderer;

use super::ScatterChart;

/// Padding that fits tick labels, tick marks and axis padding around the plot.
///
/// Half of the widest x label may overhang either end of the x axis, so it
/// is reserved on the right and competes with the y labels on the left.
#[must_use]
pub fn resolve_layout_padding(container: Padding, x_axis: &Axis, y_axis: &Axis) -> Padding {
    let x_tick = x_axis.tick();
    let y_tick = y_axis.tick();
    let x_label_width = x_axis.longest_tick_width();
    let x_label_height = x_axis.longest_tick_height();
    let y_label_width = y_axis.longest_tick_width();

    Padding {
        top: container.top,
        right: container.right + x_label_width / 2.0 + x_tick.padding.right,
        bottom: x_label_height
            + x_tick.padding.top
            + x_tick.padding.bottom
            + x_tick.width
            + container.bottom,
        left: f64::max(x_label_width / 2.0, y_label_width)
            + y_tick.padding.left
            + y_tick.padding.right
            + y_tick.width
            + container.left,
    }
}

impl<R: Renderer> ScatterChart<R> {
    /// Recomputes the layout padding and pushes it into the axes and grid.
    pub(super) fn update_padding(&mut self) {
        let padding = resolve_layout_padding(
            self.container_padding,
            self.x_axis.axis(),
            self.y_axis.axis(),
        );
        self.padding = padding;
        self.x_axis.set_padding(padding);
        self.y_axis.set_padding(padding);
        self.grid.set_padding(padding);
        trace!(?padding, "layout padding updated");
    }

    /// Recomputes pixel-per-unit ratios from the viewport width.
    pub(super) fn update_ratio(&mut self) -> ChartResult<()> {
        let x = self.x_axis.axis();
        let y = self.y_axis.axis();
        self.ratio = self
            .plot_geometry()
            .ratio((x.min(), x.max()), (y.min(), y.max()))?;
        trace!(ratio_x = self.ratio.x, ratio_y = self.ratio.y, "ratio updated");
        Ok(())
    }

    /// Plot geometry of the visible viewport.
    #[must_use]
    pub fn plot_geometry(&self) -> PlotGeometry {
        PlotGeometry {
            width: self.size.width,
            height: self.size.height,
            padding: self.padding,
            inner_x: self.x_axis.axis().inner_padding(),
            inner_y: self.y_axis.axis().inner_padding(),
        }
    }

    /// Mapping used to rasterize data; anchored at the current x axis minimum.
    #[must_use]
    pub fn data_mapper(&self) -> CoordinateMapper {
        let y = self.y_axis.axis();
        CoordinateMapper {
            geometry: self.plot_geometry(),
            x_min: self.x_axis.axis().min(),
            y_min: y.min(),
            y_max: y.max(),
            ratio: self.ratio,
        }
    }

    pub(super) fn guide_layout(&self) -> GuideLayout {
        GuideLayout {
            padding: self.padding,
            ratio: self.ratio,
            x_axis: self.x_axis.axis().option().clone(),
            y_axis: self.y_axis.axis().option().clone(),
        }
    }

    pub(super) fn sync_guide(&mut self) {
        let layout = self.guide_layout();
        if let Some(guide) = self.guide.as_mut() {
            guide.set_layout(layout);
        }
    }

    pub(super) fn render_grid(&mut self) {
        self.grid.render(&self.x_axis, &self.y_axis);
    }

    /// Full layout pass after an axis or size change.
    pub(super) fn relayout(&mut self) -> ChartResult<()> {
        self.update_padding();
        self.update_ratio()?;
        self.render_grid();
        self.sync_guide();
        Ok(())
    }
}
