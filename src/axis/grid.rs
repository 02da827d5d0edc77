use serde::{Deserialize, Serialize};

use crate::core::Padding;
use crate::render::{Color, Layer, LayerOptions, LinePrimitive, SharedLayer};

use super::{AxisLayer, COLOR_GRID, XAxis, YAxis};

pub const GRID_PRIORITY: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOption {
    pub hidden: bool,
    pub stroke_color: Color,
}

impl Default for GridOption {
    fn default() -> Self {
        Self {
            hidden: false,
            stroke_color: COLOR_GRID,
        }
    }
}

/// Grid lines at the x and y tick positions.
///
/// Vertical lines live on a scrolling layer so they follow the x axis;
/// horizontal lines live on a fixed layer like the y axis.
#[derive(Debug)]
pub struct GridAxis {
    option: GridOption,
    padding: Padding,
    vertical: SharedLayer,
    horizontal: SharedLayer,
}

impl GridAxis {
    #[must_use]
    pub fn new(option: GridOption, padding: Padding, width: f64, height: f64, dpr: f64) -> Self {
        let base = LayerOptions::sized(width, height, dpr).priority(GRID_PRIORITY);
        let grid = Self {
            option,
            padding,
            vertical: Layer::new("grid:x", base).into_shared(),
            horizontal: Layer::new("grid:y", base.fixed(true)).into_shared(),
        };
        grid.apply_visibility();
        grid
    }

    #[must_use]
    pub fn option(&self) -> GridOption {
        self.option
    }

    #[must_use]
    pub fn layers(&self) -> [&SharedLayer; 2] {
        [&self.vertical, &self.horizontal]
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    /// Resizes the scrolling layer to `scroll_width` and the fixed one to `view_width`.
    pub fn set_size(&mut self, scroll_width: f64, view_width: f64, height: f64) {
        self.vertical.borrow_mut().resize(scroll_width, height);
        self.horizontal.borrow_mut().resize(view_width, height);
    }

    pub fn render(&mut self, x_axis: &XAxis, y_axis: &YAxis) {
        let padding = self.padding;
        let color = self.option.stroke_color;

        let mut vertical = self.vertical.borrow_mut();
        vertical.clear();
        let bottom = vertical.height() - padding.bottom;
        for x in x_axis.tick_positions() {
            vertical
                .surface_mut()
                .stroke_line(&LinePrimitive::new(x, padding.top, x, bottom, 1.0, color));
        }

        let mut horizontal = self.horizontal.borrow_mut();
        horizontal.clear();
        let right = horizontal.width() - padding.right;
        for y in y_axis.tick_positions() {
            horizontal
                .surface_mut()
                .stroke_line(&LinePrimitive::new(padding.left, y, right, y, 1.0, color));
        }
    }

    fn apply_visibility(&self) {
        for layer in self.layers() {
            if self.option.hidden {
                layer.borrow_mut().hide();
            } else {
                layer.borrow_mut().show();
            }
        }
    }
}
