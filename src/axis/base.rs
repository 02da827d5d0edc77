use crate::core::Padding;
use crate::error::ChartResult;
use crate::render::{FontSpec, Layer, LayerOptions, SharedLayer};

use super::{AxisOption, AxisOptionPatch, TickOption};

/// Surface, range and tick state shared by the x and y axes.
#[derive(Debug)]
pub struct Axis {
    name: &'static str,
    option: AxisOption,
    padding: Padding,
    layer: SharedLayer,
}

impl Axis {
    pub fn new(
        name: &'static str,
        option: AxisOption,
        padding: Padding,
        layer: LayerOptions,
    ) -> ChartResult<Self> {
        option.validate(name)?;
        let axis = Self {
            name,
            option,
            padding,
            layer: Layer::new(format!("axis:{name}"), layer).into_shared(),
        };
        axis.apply_font();
        Ok(axis)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn option(&self) -> &AxisOption {
        &self.option
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.option.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.option.max
    }

    #[must_use]
    pub fn inner_padding(&self) -> f64 {
        self.option.inner_padding
    }

    #[must_use]
    pub fn tick(&self) -> &TickOption {
        &self.option.tick
    }

    /// Applies a partial update. On error the axis is left untouched.
    pub fn set_option(&mut self, patch: &AxisOptionPatch) -> ChartResult<()> {
        self.option = self.option.merged(patch, self.name)?;
        self.apply_font();
        Ok(())
    }

    #[must_use]
    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.layer.borrow_mut().resize(width, height);
        self.apply_font();
    }

    #[must_use]
    pub fn layer(&self) -> &SharedLayer {
        &self.layer
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.layer.borrow().width()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.layer.borrow().height()
    }

    #[must_use]
    pub fn font(&self) -> FontSpec {
        self.layer.borrow().surface().font().clone()
    }

    #[must_use]
    pub fn text_width(&self, text: &str) -> f64 {
        self.layer.borrow().measure_text(text)
    }

    #[must_use]
    pub fn text_height(&self, text: &str) -> f64 {
        self.layer.borrow().measure_text_height(text)
    }

    /// Widest formatted tick label.
    #[must_use]
    pub fn longest_tick_width(&self) -> f64 {
        self.option
            .tick_texts()
            .iter()
            .map(|text| self.text_width(text))
            .fold(0.0, f64::max)
    }

    /// Tallest formatted tick label; multi-line labels sum their lines.
    #[must_use]
    pub fn longest_tick_height(&self) -> f64 {
        self.option
            .tick_texts()
            .iter()
            .map(|text| self.text_height(text))
            .fold(0.0, f64::max)
    }

    fn apply_font(&self) {
        if let Some(font) = FontSpec::from_css_font(&self.option.tick.font) {
            self.layer.borrow_mut().surface_mut().set_font(font);
        }
    }
}

/// Shared behavior of axes that rasterize ticks and labels into their own layer.
pub trait AxisLayer {
    fn axis(&self) -> &Axis;

    fn axis_mut(&mut self) -> &mut Axis;

    /// Clears the layer and redraws ticks, labels and the axis line.
    fn render(&mut self);

    /// Pixel positions of every tick along this axis' direction.
    fn tick_positions(&self) -> Vec<f64>;

    fn set_option(&mut self, patch: &AxisOptionPatch) -> ChartResult<()> {
        self.axis_mut().set_option(patch)?;
        self.render();
        Ok(())
    }

    fn set_padding(&mut self, padding: Padding) {
        self.axis_mut().set_padding(padding);
        self.render();
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.axis_mut().set_size(width, height);
        self.render();
    }
}

/// `count` evenly spaced positions from `start` to `end` inclusive.
#[must_use]
pub(crate) fn spaced_positions(start: f64, end: f64, count: usize) -> Vec<f64> {
    let count = count.max(2);
    let gap = (end - start) / (count - 1) as f64;
    (0..count).map(|i| start + gap * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::{Axis, spaced_positions};
    use crate::axis::{AxisOption, AxisOptionPatch, TickOptionPatch};
    use crate::core::Padding;
    use crate::render::LayerOptions;

    fn axis() -> Axis {
        Axis::new(
            "x",
            AxisOption::with_range(0.0, 1000.0),
            Padding::uniform(20.0),
            LayerOptions::sized(200.0, 100.0, 1.0),
        )
        .expect("valid axis")
    }

    #[test]
    fn tick_font_string_sets_measurement_size() {
        let mut axis = axis();
        let before = axis.longest_tick_width();
        axis.set_option(&AxisOptionPatch {
            tick: Some(TickOptionPatch {
                font: Some("22px monospace".to_owned()),
                ..TickOptionPatch::default()
            }),
            ..AxisOptionPatch::default()
        })
        .expect("valid patch");
        assert!(axis.longest_tick_width() > before * 1.5);
        assert_eq!(axis.font().size_px, 22.0);
        assert_eq!(axis.font().family, "monospace");
    }

    #[test]
    fn failed_update_keeps_previous_option() {
        let mut axis = axis();
        assert!(axis.set_option(&AxisOptionPatch::range(10.0, 0.0)).is_err());
        assert_eq!((axis.min(), axis.max()), (0.0, 1000.0));
    }

    #[test]
    fn positions_are_evenly_spaced() {
        assert_eq!(spaced_positions(10.0, 50.0, 5), vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    }
}
