use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::axis::AxisLayer;
use crate::core::{Coord, CoordinateMapper, Point};
use crate::data::CountRange;
use crate::error::{ChartError, ChartResult};
use crate::render::{AreaPrimitive, CirclePrimitive, LAYER_DEFAULT_PRIORITY, Renderer};

use super::{
    DataOption, DataShape, DataStyle, PointOption, RenderOption, RenderOptionPatch, ScatterChart,
    palette_color,
};

/// Resolves colors, radius and shape of every declared series.
///
/// Undeclared colors come from the palette by declaration index.
#[must_use]
pub fn resolve_data_styles(data: &[DataOption], point: &PointOption) -> IndexMap<String, DataStyle> {
    data.iter()
        .enumerate()
        .map(|(index, option)| {
            let base = option.color.unwrap_or_else(|| palette_color(index));
            let opacity = option.opacity.unwrap_or(point.opacity);
            let style = DataStyle {
                shape: option.shape.unwrap_or_default(),
                color: base.with_alpha(opacity),
                legend_color: base,
                radius: option.radius.unwrap_or(point.radius),
            };
            (option.kind.clone(), style)
        })
        .collect()
}

/// Pixel position of `point` when it falls inside the drawable window.
///
/// With `draw_out_of_range` only the y floor is enforced and higher values
/// are pinned to the y ceiling.
fn visible_coord(point: &Point, mapper: &CoordinateMapper, x_max: f64, option: RenderOption) -> Option<Coord> {
    if point.x < mapper.x_min || point.x > x_max || point.y < mapper.y_min {
        return None;
    }
    if point.y > mapper.y_max {
        return option
            .draw_out_of_range
            .then(|| Coord::new(point.x, mapper.y_max));
    }
    Some(point.coord())
}

impl<R: Renderer> ScatterChart<R> {
    /// Draws `points` with the chart's default render options.
    pub fn render(&mut self, points: &[Point]) -> ChartResult<()> {
        self.render_with(points, RenderOptionPatch::default())
    }

    /// Draws `points` with `patch` merged over the chart's render options.
    ///
    /// Without `append` every data layer is cleared and the data manager
    /// starts over; realtime sessions always accumulate.
    pub fn render_with(&mut self, points: &[Point], patch: RenderOptionPatch) -> ChartResult<()> {
        if let Some(point) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ChartError::InvalidData(format!(
                "point coordinates must be finite, got ({}, {})",
                point.x, point.y
            )));
        }
        let mut option = self.settings.render.merged(&patch);
        if self.realtime.is_some() {
            option.append = true;
        } else if !option.append {
            self.clear_data_layers();
        }

        self.data_manager.add_data(points, option.append);
        self.draw_points(points, option);
        self.refresh_full_range_counts(option);
        debug!(
            points = points.len(),
            append = option.append,
            legends = self.data_layers.len(),
            "data rendered"
        );
        self.shoot()
    }

    /// Redraws everything the data manager holds at the current scale.
    pub(super) fn render_all_data(&mut self) -> ChartResult<()> {
        self.clear_data_layers();
        let points = self.data_manager.all_data();
        let option = self.settings.render;
        self.draw_points(&points, option);
        self.refresh_full_range_counts(option);
        self.shoot()
    }

    pub(super) fn clear_data_layers(&mut self) {
        for layer in self.data_layers.values() {
            layer.borrow_mut().clear();
        }
        self.area_anchors.clear();
    }

    fn draw_points(&mut self, points: &[Point], option: RenderOption) {
        let mapper = self.data_mapper();
        let x_max = self.x_axis_max();
        for point in points {
            let legend = point.legend();
            let style = match self.data_styles.get(legend) {
                Some(style) => *style,
                None => match self.add_data_type(legend) {
                    Some(style) => style,
                    None => continue,
                },
            };
            if point.hidden {
                continue;
            }
            let Some(coord) = visible_coord(point, &mapper, x_max, option) else {
                trace!(x = point.x, y = point.y, legend, "point outside axis range");
                continue;
            };
            let Some(layer) = self.data_layers.get(legend) else {
                continue;
            };
            let (px, py) = mapper.data_to_pixel(coord);
            let mut layer = layer.borrow_mut();
            match style.shape {
                DataShape::Point => {
                    layer
                        .surface_mut()
                        .fill_circle(&CirclePrimitive::new(px, py, style.radius, style.color));
                }
                DataShape::Area => {
                    if let Some(anchor) = self.area_anchors.get(legend) {
                        let (ax, ay) = mapper.data_to_pixel(*anchor);
                        layer.surface_mut().fill_area(&AreaPrimitive::new(
                            ax,
                            ay,
                            px,
                            py,
                            mapper.baseline(),
                            style.color,
                        ));
                    }
                    self.area_anchors.insert(legend.to_owned(), coord);
                }
            }
        }
    }

    /// Registers a legend first seen in the data: style, layer and legend entry.
    fn add_data_type(&mut self, legend: &str) -> Option<DataStyle> {
        self.settings.data.push(DataOption::new(legend));
        self.data_styles = resolve_data_styles(&self.settings.data, &self.settings.point);
        self.create_data_layer(legend, LAYER_DEFAULT_PRIORITY);
        if let Some(model) = self.legend.as_mut() {
            model.sync(&self.data_styles);
        }
        debug!(legend, "data type added");
        self.data_styles.get(legend).copied()
    }

    /// Counts every legend over the full axis window.
    fn refresh_full_range_counts(&mut self, option: RenderOption) {
        let x = self.x_axis.axis();
        let y = self.y_axis.axis();
        let range = CountRange::new(Coord::new(x.min(), y.min()), Coord::new(x.max(), y.max()))
            .include_above_max_y(option.draw_out_of_range);
        self.refresh_counts(&range);
    }

    pub(super) fn refresh_counts(&mut self, range: &CountRange) {
        let Some(legend) = self.legend.as_mut() else {
            return;
        };
        for key in self.data_layers.keys() {
            legend.set_count(key, self.data_manager.count(key, range));
        }
    }

    fn x_axis_max(&self) -> f64 {
        self.x_axis.axis().max()
    }
}
