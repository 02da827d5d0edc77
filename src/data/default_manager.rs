use indexmap::IndexMap;
use tracing::trace;

use crate::core::Point;

use super::{CountRange, DataManager, DataMode};

/// Keeps every point, grouped by legend in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct DefaultDataManager {
    data_by_legend: IndexMap<String, Vec<Point>>,
}

impl DataManager for DefaultDataManager {
    fn mode(&self) -> DataMode {
        DataMode::Default
    }

    fn add_data(&mut self, points: &[Point], append: bool) {
        if !append {
            self.reset();
        }
        for point in points {
            self.data_by_legend
                .entry(point.legend().to_owned())
                .or_default()
                .push(point.clone());
        }
        trace!(
            added = points.len(),
            append,
            legends = self.data_by_legend.len(),
            "default data manager ingest"
        );
    }

    fn data_by_legend(&self, legend: &str) -> &[Point] {
        self.data_by_legend
            .get(legend)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn all_data(&self) -> Vec<Point> {
        self.data_by_legend.values().flatten().cloned().collect()
    }

    fn count(&self, legend: &str, range: &CountRange) -> usize {
        self.data_by_legend(legend)
            .iter()
            .filter(|point| range.contains(point))
            .count()
    }

    fn legend_keys(&self) -> Vec<String> {
        self.data_by_legend.keys().cloned().collect()
    }

    fn set_data_by_legend(&mut self, legend: &str, points: Vec<Point>) {
        self.data_by_legend.insert(legend.to_owned(), points);
    }

    fn reset(&mut self) {
        self.data_by_legend.clear();
    }
}
