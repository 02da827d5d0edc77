use serde::{Deserialize, Serialize};

use crate::core::{Coord, Padding};
use crate::error::{ChartError, ChartResult};

/// Pixels per data unit on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    pub x: f64,
    pub y: f64,
}

impl Default for Ratio {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// Resolved layout of the plot area inside one pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub inner_x: f64,
    pub inner_y: f64,
}

impl PlotGeometry {
    /// Horizontal pixel span between the first and last x tick.
    #[must_use]
    pub fn pane_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right - self.inner_x * 2.0
    }

    /// Vertical pixel span between the first and last y tick.
    #[must_use]
    pub fn pane_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom - self.inner_y * 2.0
    }

    /// Computes pixel-per-unit ratios for the given data ranges.
    pub fn ratio(&self, x_range: (f64, f64), y_range: (f64, f64)) -> ChartResult<Ratio> {
        let x_span = x_range.1 - x_range.0;
        let y_span = y_range.1 - y_range.0;
        if !x_span.is_finite() || x_span <= 0.0 || !y_span.is_finite() || y_span <= 0.0 {
            return Err(ChartError::InvalidData(
                "axis ranges must be finite with max > min".to_owned(),
            ));
        }
        Ok(Ratio {
            x: self.pane_width() / x_span,
            y: self.pane_height() / y_span,
        })
    }
}

/// Linear data <-> pixel mapping shared by data layers and the guide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub geometry: PlotGeometry,
    pub x_min: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub ratio: Ratio,
}

impl CoordinateMapper {
    #[must_use]
    pub fn x_to_pixel(&self, x: f64) -> f64 {
        self.ratio.x * (x - self.x_min) + self.geometry.padding.left + self.geometry.inner_x
    }

    #[must_use]
    pub fn y_to_pixel(&self, y: f64) -> f64 {
        self.baseline() - self.ratio.y * (y - self.y_min)
    }

    /// Pixel row of `y_min`, the floor of filled areas.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.geometry.height - self.geometry.padding.bottom - self.geometry.inner_y
    }

    #[must_use]
    pub fn data_to_pixel(&self, coord: Coord) -> (f64, f64) {
        (self.x_to_pixel(coord.x), self.y_to_pixel(coord.y))
    }

    #[must_use]
    pub fn pixel_to_x(&self, px: f64) -> f64 {
        (px - self.geometry.padding.left - self.geometry.inner_x) / self.ratio.x + self.x_min
    }

    #[must_use]
    pub fn pixel_to_y(&self, py: f64) -> f64 {
        self.y_max - (py - self.geometry.padding.top - self.geometry.inner_y) / self.ratio.y
    }

    #[must_use]
    pub fn pixel_to_data(&self, px: f64, py: f64) -> Coord {
        Coord::new(self.pixel_to_x(px), self.pixel_to_y(py))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{CoordinateMapper, PlotGeometry};
    use crate::core::{Coord, Padding};

    fn geometry() -> PlotGeometry {
        PlotGeometry {
            width: 640.0,
            height: 320.0,
            padding: Padding {
                top: 20.0,
                right: 30.0,
                bottom: 40.0,
                left: 50.0,
            },
            inner_x: 10.0,
            inner_y: 10.0,
        }
    }

    #[test]
    fn ratio_divides_pane_span_by_data_span() {
        let ratio = geometry().ratio((0.0, 100.0), (0.0, 10.0)).expect("valid");
        assert_relative_eq!(ratio.x, 540.0 / 100.0);
        assert_relative_eq!(ratio.y, 240.0 / 10.0);
    }

    #[test]
    fn degenerate_range_is_rejected() {
        assert!(geometry().ratio((5.0, 5.0), (0.0, 1.0)).is_err());
        assert!(geometry().ratio((0.0, 1.0), (2.0, 1.0)).is_err());
    }

    #[test]
    fn axis_endpoints_land_on_inner_padding_edges() {
        let geometry = geometry();
        let mapper = CoordinateMapper {
            geometry,
            x_min: 0.0,
            y_min: 0.0,
            y_max: 10.0,
            ratio: geometry.ratio((0.0, 100.0), (0.0, 10.0)).expect("valid"),
        };
        let (x0, y0) = mapper.data_to_pixel(Coord::new(0.0, 0.0));
        let (x1, y1) = mapper.data_to_pixel(Coord::new(100.0, 10.0));
        assert_relative_eq!(x0, 60.0);
        assert_relative_eq!(x1, 600.0);
        assert_relative_eq!(y0, 270.0);
        assert_relative_eq!(y1, 30.0);

        let back = mapper.pixel_to_data(x1, y1);
        assert_relative_eq!(back.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(back.y, 10.0, epsilon = 1e-9);
    }
}
