use crate::core::Padding;
use crate::error::ChartResult;
use crate::render::{
    Color, LayerOptions, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive, TextVAlign,
};

use super::base::spaced_positions;
use super::{Axis, AxisLayer, AxisOption};

pub const Y_AXIS_PRIORITY: i32 = -2;

/// Vertical axis, fixed to the viewport.
///
/// Paints opaque bands over the label gutters so scrolling layers behind it
/// are occluded.
#[derive(Debug)]
pub struct YAxis {
    axis: Axis,
    background: Color,
}

impl YAxis {
    pub fn new(
        option: AxisOption,
        padding: Padding,
        background: Color,
        width: f64,
        height: f64,
        dpr: f64,
    ) -> ChartResult<Self> {
        let layer = LayerOptions::sized(width, height, dpr)
            .fixed(true)
            .priority(Y_AXIS_PRIORITY);
        let mut axis = Self {
            axis: Axis::new("y", option, padding, layer)?,
            background,
        };
        axis.render();
        Ok(axis)
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
        self.render();
    }
}

impl AxisLayer for YAxis {
    fn axis(&self) -> &Axis {
        &self.axis
    }

    fn axis_mut(&mut self) -> &mut Axis {
        &mut self.axis
    }

    /// Top to bottom, i.e. from `max` down to `min`.
    fn tick_positions(&self) -> Vec<f64> {
        let padding = self.axis.padding();
        let inner = self.axis.inner_padding();
        spaced_positions(
            padding.top + inner,
            self.axis.height() - padding.bottom - inner,
            self.axis.tick().count,
        )
    }

    fn render(&mut self) {
        let positions = self.tick_positions();
        let mut labels = self.axis.option().tick_texts();
        labels.reverse();
        let padding = self.axis.padding();
        let inner = self.axis.inner_padding();
        let tick = self.axis.tick().clone();
        let stroke_color = self.axis.option().stroke_color;
        let width = self.axis.width();
        let end_y = self.axis.height() - padding.bottom - inner;
        let band_height = end_y + inner + tick.width;
        let font = self.axis.font();
        let background = self.background;

        let mut layer = self.axis.layer().borrow_mut();
        layer.clear();
        let surface = layer.surface_mut();
        surface.fill_rect(&RectPrimitive::new(0.0, 0.0, padding.left, band_height, background));
        surface.fill_rect(&RectPrimitive::new(
            width - padding.right,
            0.0,
            padding.right,
            band_height,
            background,
        ));
        surface.fill_rect(&RectPrimitive::new(0.0, 0.0, width, padding.top, background));

        let start_x = padding.left;
        for (y, label) in positions.into_iter().zip(labels) {
            surface.fill_text(
                &TextPrimitive::new(
                    label,
                    start_x - tick.padding.right - tick.width,
                    y,
                    font.clone(),
                    tick.color,
                    TextHAlign::Right,
                )
                .with_v_align(TextVAlign::Middle),
            );
            surface.stroke_line(&LinePrimitive::new(
                start_x - tick.width,
                y,
                start_x,
                y,
                1.0,
                tick.stroke_color,
            ));
        }
        surface.stroke_line(&LinePrimitive::new(
            start_x,
            padding.top,
            start_x,
            end_y + inner,
            1.0,
            stroke_color,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::YAxis;
    use crate::axis::{AxisLayer, AxisOption};
    use crate::core::Padding;
    use crate::render::Color;

    fn y_axis() -> YAxis {
        YAxis::new(
            AxisOption::with_range(0.0, 10.0),
            Padding::uniform(20.0),
            Color::rgb(0.0, 1.0, 0.0),
            200.0,
            140.0,
            1.0,
        )
        .expect("valid axis")
    }

    #[test]
    fn y_axis_is_fixed_and_ticks_run_top_down() {
        let axis = y_axis();
        assert!(axis.axis().layer().borrow().is_fixed());
        assert_eq!(axis.tick_positions(), vec![30.0, 50.0, 70.0, 90.0, 110.0]);
    }

    #[test]
    fn gutters_are_opaque_background() {
        let axis = y_axis();
        let layer = axis.axis().layer().borrow();
        assert_eq!(layer.surface().pixel(1, 1), [0, 255, 0, 255]);
        assert_eq!(layer.surface().pixel(195, 60), [0, 255, 0, 255]);
        assert_eq!(layer.surface().pixel(100, 60), [0; 4]);
    }
}
