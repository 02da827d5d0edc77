use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::core::Point;

use super::{CountRange, DataManager, DataMode};

/// Default bucket width: one second of millisecond timestamps.
pub const LIGHT_BUCKET_WIDTH: f64 = 1000.0;

/// Folds points into per-legend time buckets and keeps only the counts.
///
/// Range arguments are ignored when counting and no points are retained.
#[derive(Debug, Clone)]
pub struct LightDataManager {
    bucket_width: f64,
    counts: IndexMap<String, BTreeMap<i64, usize>>,
}

impl Default for LightDataManager {
    fn default() -> Self {
        Self::new(LIGHT_BUCKET_WIDTH)
    }
}

impl LightDataManager {
    #[must_use]
    pub fn new(bucket_width: f64) -> Self {
        let bucket_width = if bucket_width.is_finite() && bucket_width > 0.0 {
            bucket_width
        } else {
            warn!(bucket_width, "invalid light bucket width, using default");
            LIGHT_BUCKET_WIDTH
        };
        Self {
            bucket_width,
            counts: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn bucket_width(&self) -> f64 {
        self.bucket_width
    }

    /// Per-bucket counts of one legend, keyed by `floor(x / bucket_width)`.
    #[must_use]
    pub fn buckets(&self, legend: &str) -> Option<&BTreeMap<i64, usize>> {
        self.counts.get(legend)
    }

    fn bucket_of(&self, x: f64) -> i64 {
        (x / self.bucket_width).floor() as i64
    }
}

impl DataManager for LightDataManager {
    fn mode(&self) -> DataMode {
        DataMode::Light
    }

    fn add_data(&mut self, points: &[Point], append: bool) {
        if !append {
            self.reset();
        }
        for point in points {
            if !point.x.is_finite() {
                continue;
            }
            let bucket = self.bucket_of(point.x);
            *self
                .counts
                .entry(point.legend().to_owned())
                .or_default()
                .entry(bucket)
                .or_default() += 1;
        }
        trace!(
            added = points.len(),
            append,
            legends = self.counts.len(),
            "light data manager ingest"
        );
    }

    fn data_by_legend(&self, _legend: &str) -> &[Point] {
        &[]
    }

    fn all_data(&self) -> Vec<Point> {
        Vec::new()
    }

    fn count(&self, legend: &str, _range: &CountRange) -> usize {
        self.counts
            .get(legend)
            .map_or(0, |buckets| buckets.values().sum())
    }

    fn legend_keys(&self) -> Vec<String> {
        self.counts.keys().cloned().collect()
    }

    fn set_data_by_legend(&mut self, _legend: &str, _points: Vec<Point>) {}

    fn reset(&mut self) {
        self.counts.clear();
    }
}
