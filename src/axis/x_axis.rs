use crate::core::Padding;
use crate::error::ChartResult;
use crate::render::{LayerOptions, LinePrimitive, TextHAlign, TextPrimitive, TextVAlign};

use super::base::spaced_positions;
use super::{Axis, AxisLayer, AxisOption};

pub const X_AXIS_PRIORITY: i32 = -1;

/// Horizontal axis; scrolls with the data layers in realtime mode.
#[derive(Debug)]
pub struct XAxis {
    axis: Axis,
}

impl XAxis {
    pub fn new(
        option: AxisOption,
        padding: Padding,
        width: f64,
        height: f64,
        dpr: f64,
    ) -> ChartResult<Self> {
        let layer = LayerOptions::sized(width, height, dpr).priority(X_AXIS_PRIORITY);
        let mut axis = Self {
            axis: Axis::new("x", option, padding, layer)?,
        };
        axis.render();
        Ok(axis)
    }
}

impl AxisLayer for XAxis {
    fn axis(&self) -> &Axis {
        &self.axis
    }

    fn axis_mut(&mut self) -> &mut Axis {
        &mut self.axis
    }

    fn tick_positions(&self) -> Vec<f64> {
        let padding = self.axis.padding();
        let inner = self.axis.inner_padding();
        spaced_positions(
            padding.left + inner,
            self.axis.width() - padding.right - inner,
            self.axis.tick().count,
        )
    }

    fn render(&mut self) {
        let positions = self.tick_positions();
        let labels = self.axis.option().tick_texts();
        let padding = self.axis.padding();
        let tick = self.axis.tick().clone();
        let stroke_color = self.axis.option().stroke_color;
        let width = self.axis.width();
        let baseline = self.axis.height() - padding.bottom;
        let font = self.axis.font();

        let mut layer = self.axis.layer().borrow_mut();
        layer.clear();
        let surface = layer.surface_mut();
        for (x, label) in positions.into_iter().zip(labels) {
            surface.fill_text(
                &TextPrimitive::new(
                    label,
                    x,
                    baseline + tick.width + tick.padding.top,
                    font.clone(),
                    tick.color,
                    TextHAlign::Center,
                )
                .with_v_align(TextVAlign::Top),
            );
            surface.stroke_line(&LinePrimitive::new(
                x,
                baseline,
                x,
                baseline + tick.width,
                1.0,
                tick.stroke_color,
            ));
        }
        surface.stroke_line(&LinePrimitive::new(
            padding.left,
            baseline,
            width - padding.right,
            baseline,
            1.0,
            stroke_color,
        ));
    }
}
