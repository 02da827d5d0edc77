//! Accumulated point storage grouped by legend.
//!
//! The variant is picked once from the chart `mode` option and never
//! switched for the lifetime of a chart.

mod default_manager;
mod light_manager;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Coord, Point};

pub use default_manager::DefaultDataManager;
pub use light_manager::{LIGHT_BUCKET_WIDTH, LightDataManager};

/// Storage strategy selector; `"light"` picks [`LightDataManager`], anything
/// else the default one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataMode {
    #[default]
    Default,
    Light,
}

impl From<String> for DataMode {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("light") {
            Self::Light
        } else {
            Self::Default
        }
    }
}

impl From<DataMode> for String {
    fn from(mode: DataMode) -> Self {
        match mode {
            DataMode::Default => "default".to_owned(),
            DataMode::Light => "light".to_owned(),
        }
    }
}

impl DataMode {
    #[must_use]
    pub fn create_manager(self, light_bucket_width: f64) -> Box<dyn DataManager> {
        match self {
            Self::Default => Box::new(DefaultDataManager::default()),
            Self::Light => Box::new(LightDataManager::new(light_bucket_width)),
        }
    }
}

/// Inclusive data-space bounds for legend counting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: Coord,
    pub max: Coord,
    /// Drops the upper y bound, matching out-of-range drawing.
    pub include_above_max_y: bool,
}

impl CountRange {
    #[must_use]
    pub const fn new(min: Coord, max: Coord) -> Self {
        Self {
            min,
            max,
            include_above_max_y: false,
        }
    }

    #[must_use]
    pub const fn include_above_max_y(mut self, include: bool) -> Self {
        self.include_above_max_y = include;
        self
    }

    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        let in_x = point.x >= self.min.x && point.x <= self.max.x;
        let in_y = if self.include_above_max_y {
            point.y >= self.min.y
        } else {
            point.y >= self.min.y && point.y <= self.max.y
        };
        in_x && in_y
    }
}

/// Contract shared by every storage variant.
pub trait DataManager: fmt::Debug {
    fn mode(&self) -> DataMode;

    /// Ingests `points`; without `append` all prior state is discarded first.
    fn add_data(&mut self, points: &[Point], append: bool);

    /// Stored points of one legend; empty for unknown legends and for
    /// variants that do not keep points.
    fn data_by_legend(&self, legend: &str) -> &[Point];

    /// Every stored point in legend order.
    fn all_data(&self) -> Vec<Point>;

    /// Number of points of `legend` inside `range`; 0 for unknown legends.
    fn count(&self, legend: &str, range: &CountRange) -> usize;

    fn legend_keys(&self) -> Vec<String>;

    fn set_data_by_legend(&mut self, legend: &str, points: Vec<Point>);

    fn reset(&mut self);
}
