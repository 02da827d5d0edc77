use std::fmt::{self, Write as _};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{Padding, PaddingPatch, unix_millis_to_datetime};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

pub const AXIS_INNER_PADDING: f64 = 10.0;
pub const AXIS_TICK_WIDTH: f64 = 6.0;
pub const AXIS_DEFAULT_TICK_COUNT: usize = 5;
pub const TEXT_PADDING: f64 = 3.0;

pub const COLOR_TEXT: Color = Color::rgb(0.2, 0.2, 0.2);
pub const COLOR_STROKE: Color = Color::rgb(0.8, 0.8, 0.8);
pub const COLOR_GRID: Color = Color::rgb(0.93, 0.93, 0.93);

pub type TickFormatterFn = Arc<dyn Fn(f64) -> String + Send + Sync + 'static>;

/// Tick label formatter shared between an axis and the guide readout.
#[derive(Clone)]
pub struct TickFormatter(TickFormatterFn);

impl TickFormatter {
    #[must_use]
    pub fn new(format: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(format))
    }

    /// Plain `Display` of the value.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|value| value.to_string())
    }

    /// Formats millisecond UTC timestamps with a `chrono` format string.
    ///
    /// `\n` in `pattern` yields multi-line labels.
    #[must_use]
    pub fn utc_time(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self::new(move |millis| {
            let Ok(time) = unix_millis_to_datetime(millis) else {
                return millis.to_string();
            };
            let mut label = String::new();
            match write!(label, "{}", time.format(&pattern)) {
                Ok(()) => label,
                Err(_) => millis.to_string(),
            }
        })
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl Default for TickFormatter {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for TickFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TickFormatter(..)")
    }
}

impl<F> From<F> for TickFormatter
where
    F: Fn(f64) -> String + Send + Sync + 'static,
{
    fn from(format: F) -> Self {
        Self::new(format)
    }
}

/// Fully resolved tick configuration of one axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickOption {
    pub count: usize,
    pub width: f64,
    #[serde(skip)]
    pub format: TickFormatter,
    pub padding: Padding,
    /// CSS-like font string, e.g. `"12px sans-serif"`; empty keeps the layer font.
    pub font: String,
    pub color: Color,
    pub stroke_color: Color,
}

impl Default for TickOption {
    fn default() -> Self {
        Self {
            count: AXIS_DEFAULT_TICK_COUNT,
            width: AXIS_TICK_WIDTH,
            format: TickFormatter::default(),
            padding: Padding::uniform(TEXT_PADDING),
            font: String::new(),
            color: COLOR_TEXT,
            stroke_color: COLOR_STROKE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickOptionPatch {
    pub count: Option<usize>,
    pub width: Option<f64>,
    #[serde(skip)]
    pub format: Option<TickFormatter>,
    pub padding: Option<PaddingPatch>,
    pub font: Option<String>,
    pub color: Option<Color>,
    pub stroke_color: Option<Color>,
}

impl TickOption {
    #[must_use]
    pub fn merged(&self, patch: &TickOptionPatch) -> Self {
        Self {
            count: patch.count.unwrap_or(self.count),
            width: patch.width.unwrap_or(self.width),
            format: patch.format.clone().unwrap_or_else(|| self.format.clone()),
            padding: patch
                .padding
                .as_ref()
                .map_or(self.padding, |padding| self.padding.merged(padding)),
            font: patch.font.clone().unwrap_or_else(|| self.font.clone()),
            color: patch.color.unwrap_or(self.color),
            stroke_color: patch.stroke_color.unwrap_or(self.stroke_color),
        }
    }
}

/// Fully resolved axis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOption {
    pub min: f64,
    pub max: f64,
    pub tick: TickOption,
    /// Inner padding keeping the first and last tick off the plot edge.
    #[serde(alias = "padding")]
    pub inner_padding: f64,
    pub stroke_color: Color,
}

impl Default for AxisOption {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            tick: TickOption::default(),
            inner_padding: AXIS_INNER_PADDING,
            stroke_color: COLOR_STROKE,
        }
    }
}

/// Partial axis update; tick fields merge independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptionPatch {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub tick: Option<TickOptionPatch>,
    #[serde(alias = "padding")]
    pub inner_padding: Option<f64>,
    pub stroke_color: Option<Color>,
}

impl AxisOptionPatch {
    #[must_use]
    pub fn range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tick_count(count: usize) -> Self {
        Self {
            tick: Some(TickOptionPatch {
                count: Some(count),
                ..TickOptionPatch::default()
            }),
            ..Self::default()
        }
    }
}

impl AxisOption {
    #[must_use]
    pub fn with_range(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    /// Returns a new option with `patch` applied, failing on degenerate results.
    pub fn merged(&self, patch: &AxisOptionPatch, axis: &'static str) -> ChartResult<Self> {
        let merged = Self {
            min: patch.min.unwrap_or(self.min),
            max: patch.max.unwrap_or(self.max),
            tick: patch
                .tick
                .as_ref()
                .map_or_else(|| self.tick.clone(), |tick| self.tick.merged(tick)),
            inner_padding: patch.inner_padding.unwrap_or(self.inner_padding),
            stroke_color: patch.stroke_color.unwrap_or(self.stroke_color),
        };
        merged.validate(axis)?;
        Ok(merged)
    }

    pub fn validate(&self, axis: &'static str) -> ChartResult<()> {
        let invalid = |reason: String| ChartError::InvalidAxis { axis, reason };
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid("range bounds must be finite".to_owned()));
        }
        if self.max <= self.min {
            return Err(invalid(format!(
                "max ({}) must be greater than min ({})",
                self.max, self.min
            )));
        }
        if self.tick.count < 2 {
            return Err(invalid(format!(
                "tick count must be >= 2, got {}",
                self.tick.count
            )));
        }
        if !self.tick.width.is_finite() || self.tick.width < 0.0 {
            return Err(invalid("tick width must be finite and >= 0".to_owned()));
        }
        if !self.inner_padding.is_finite() || self.inner_padding < 0.0 {
            return Err(invalid("inner padding must be finite and >= 0".to_owned()));
        }
        self.tick
            .padding
            .validate("tick")
            .map_err(|err| invalid(err.to_string()))?;
        Ok(())
    }

    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `count` evenly spaced values including both endpoints.
    #[must_use]
    pub fn tick_values(&self) -> Vec<f64> {
        let count = self.tick.count.max(2);
        let gap = self.span() / (count - 1) as f64;
        (0..count).map(|i| self.min + gap * i as f64).collect()
    }

    #[must_use]
    pub fn tick_texts(&self) -> Vec<String> {
        self.tick_values()
            .into_iter()
            .map(|value| self.tick.format.format(value))
            .collect()
    }
}
