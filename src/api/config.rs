use serde::{Deserialize, Serialize};

use crate::axis::{AxisOption, AxisOptionPatch, GridOption};
use crate::core::{Padding, PaddingPatch, SurfaceSize};
use crate::data::{DataMode, LIGHT_BUCKET_WIDTH};
use crate::error::{ChartError, ChartResult};
use crate::interaction::GuideOption;
use crate::render::Color;

pub const CONTAINER_WIDTH: f64 = 800.0;
pub const CONTAINER_HEIGHT: f64 = 400.0;
pub const CONTAINER_PADDING: Padding = Padding::uniform(20.0);
pub const POINT_RADIUS: f64 = 3.0;
pub const COLOR_BACKGROUND: Color = Color::WHITE;

/// Colors assigned to series without an explicit color, by declaration order.
const PALETTE: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

#[must_use]
pub fn palette_color(index: usize) -> Color {
    let (red, green, blue) = PALETTE[index % PALETTE.len()];
    Color::rgb8(red, green, blue)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataShape {
    #[default]
    Point,
    Area,
}

/// Declared series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataOption {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: Option<Color>,
    pub opacity: Option<f64>,
    pub radius: Option<f64>,
    pub shape: Option<DataShape>,
    pub priority: Option<i32>,
}

impl DataOption {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_shape(mut self, shape: DataShape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Resolved per-legend drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataStyle {
    pub shape: DataShape,
    /// Fill color with the series opacity applied.
    pub color: Color,
    /// Opaque color shown by the legend.
    pub legend_color: Color,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOption {
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundOption {
    pub color: Color,
}

impl Default for BackgroundOption {
    fn default() -> Self {
        Self {
            color: COLOR_BACKGROUND,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointOption {
    pub radius: f64,
    pub opacity: f64,
}

impl Default for PointOption {
    fn default() -> Self {
        Self {
            radius: POINT_RADIUS,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOption {
    pub append: bool,
    /// Draws points above the y ceiling clamped to it.
    pub draw_out_of_range: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptionPatch {
    pub append: Option<bool>,
    pub draw_out_of_range: Option<bool>,
}

impl RenderOptionPatch {
    #[must_use]
    pub fn append() -> Self {
        Self {
            append: Some(true),
            ..Self::default()
        }
    }
}

impl RenderOption {
    #[must_use]
    pub fn merged(self, patch: &RenderOptionPatch) -> Self {
        Self {
            append: patch.append.unwrap_or(self.append),
            draw_out_of_range: patch.draw_out_of_range.unwrap_or(self.draw_out_of_range),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisPair {
    pub x: AxisOption,
    pub y: AxisOption,
}

/// Chart construction options.
///
/// This type is serializable so host applications can keep chart setup in
/// JSON next to the rest of their configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterChartOption {
    pub axis: AxisPair,
    #[serde(default)]
    pub data: Vec<DataOption>,
    #[serde(default)]
    pub legend: LegendOption,
    #[serde(default)]
    pub guide: GuideOption,
    #[serde(default)]
    pub background: BackgroundOption,
    #[serde(default)]
    pub grid: GridOption,
    #[serde(default)]
    pub padding: PaddingPatch,
    #[serde(default)]
    pub point: PointOption,
    #[serde(default)]
    pub render: RenderOption,
    #[serde(default)]
    pub mode: DataMode,
    /// Logical size; `None` uses the 800x400 container default.
    #[serde(default)]
    pub size: Option<SurfaceSize>,
    #[serde(default = "default_dpr")]
    pub dpr: f64,
    #[serde(default = "default_light_bucket_width")]
    pub light_bucket_width: f64,
}

fn default_dpr() -> f64 {
    1.0
}

fn default_light_bucket_width() -> f64 {
    LIGHT_BUCKET_WIDTH
}

impl ScatterChartOption {
    #[must_use]
    pub fn new(x: AxisOption, y: AxisOption) -> Self {
        Self {
            axis: AxisPair { x, y },
            data: Vec::new(),
            legend: LegendOption::default(),
            guide: GuideOption::default(),
            background: BackgroundOption::default(),
            grid: GridOption::default(),
            padding: PaddingPatch::default(),
            point: PointOption::default(),
            render: RenderOption::default(),
            mode: DataMode::default(),
            size: None,
            dpr: default_dpr(),
            light_bucket_width: default_light_bucket_width(),
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(SurfaceSize::new(width, height));
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<DataOption>) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: DataMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart option json: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart option json: {e}"))
        })
    }

    /// Resolved logical size.
    pub fn resolved_size(&self) -> ChartResult<SurfaceSize> {
        self.size
            .unwrap_or(SurfaceSize::new(CONTAINER_WIDTH, CONTAINER_HEIGHT))
            .validate()
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.axis.x.validate("x")?;
        self.axis.y.validate("y")?;
        CONTAINER_PADDING.merged(&self.padding).validate("container")?;
        if !self.dpr.is_finite() || self.dpr <= 0.0 {
            return Err(ChartError::InvalidData(
                "device pixel ratio must be finite and > 0".to_owned(),
            ));
        }
        for option in &self.data {
            if let Some(color) = option.color {
                color.validate()?;
            }
        }
        Ok(())
    }
}

/// Runtime update accepted by `ScatterChart::set_option`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptionPatch {
    pub axis: AxisPatchPair,
    pub render: Option<RenderOptionPatch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisPatchPair {
    pub x: Option<AxisOptionPatch>,
    pub y: Option<AxisOptionPatch>,
}

/// Fully resolved configuration currently in effect.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveChartOption {
    pub axis: AxisPair,
    pub data: Vec<DataOption>,
    pub legend: Option<LegendOption>,
    pub guide: Option<GuideOption>,
    pub background: BackgroundOption,
    pub grid: GridOption,
    pub padding: Padding,
    pub point: PointOption,
    pub render: RenderOption,
    pub mode: DataMode,
    pub size: SurfaceSize,
}
