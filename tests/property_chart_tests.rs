use std::collections::BTreeSet;

use proptest::prelude::*;
use scatter_chart::api::{RenderOptionPatch, ScatterChart, ScatterChartOption};
use scatter_chart::axis::AxisOption;
use scatter_chart::core::{Point, UNKNOWN_LEGEND};
use scatter_chart::render::NullRenderer;

fn chart(x_max: f64, y_max: f64) -> ScatterChart<NullRenderer> {
    let option = ScatterChartOption::new(
        AxisOption::with_range(0.0, x_max),
        AxisOption::with_range(0.0, y_max),
    )
    .with_size(320.0, 200.0);
    ScatterChart::new(NullRenderer::default(), option).expect("chart init")
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (
        -50.0f64..150.0,
        -5.0f64..15.0,
        prop::option::of(prop::sample::select(vec!["a", "b", "c"])),
    )
        .prop_map(|(x, y, kind)| match kind {
            Some(kind) => Point::typed(x, y, kind),
            None => Point::new(x, y),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn non_append_render_keeps_exactly_the_input_legends(
        first in prop::collection::vec(point_strategy(), 0..12),
        second in prop::collection::vec(point_strategy(), 0..12),
    ) {
        let mut chart = chart(100.0, 10.0);
        chart.render(&first).expect("first render");
        chart.render(&second).expect("second render");

        let expected: BTreeSet<String> = second.iter().map(|p| p.legend().to_owned()).collect();
        let actual: BTreeSet<String> = chart.data_manager().legend_keys().into_iter().collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(chart.data_manager().all_data().len(), second.len());
    }

    #[test]
    fn appended_batches_accumulate(
        batches in prop::collection::vec(prop::collection::vec(point_strategy(), 0..8), 1..5),
    ) {
        let mut chart = chart(100.0, 10.0);
        for batch in &batches {
            chart.render_with(batch, RenderOptionPatch::append()).expect("append");
        }
        let total: usize = batches.iter().map(Vec::len).sum();
        prop_assert_eq!(chart.data_manager().all_data().len(), total);
    }

    #[test]
    fn legend_counts_match_in_range_points(
        points in prop::collection::vec(point_strategy(), 1..16),
    ) {
        let mut chart = chart(100.0, 10.0);
        chart.render(&points).expect("render");
        for key in ["a", "b", "c", UNKNOWN_LEGEND] {
            let expected = points
                .iter()
                .filter(|p| p.legend() == key)
                .filter(|p| (0.0..=100.0).contains(&p.x) && (0.0..=10.0).contains(&p.y))
                .count();
            if let Some(count) = chart.legend_count(key) {
                prop_assert_eq!(count, expected);
            } else {
                prop_assert_eq!(expected, 0);
            }
        }
    }

    #[test]
    fn guide_inverts_the_data_mapping(
        x_max in 1.0f64..1_000_000.0,
        y_max in 1.0f64..1_000_000.0,
        x_factor in 0.0f64..=1.0,
        y_factor in 0.0f64..=1.0,
    ) {
        let chart = chart(x_max, y_max);
        let (x, y) = (x_max * x_factor, y_max * y_factor);
        let mapper = chart.data_mapper();
        let guide = chart.guide().expect("guide enabled");

        let coord = guide.pixel_to_data(mapper.x_to_pixel(x), mapper.y_to_pixel(y));
        prop_assert!((coord.x - x).abs() <= 1e-6 * x_max.max(1.0));
        prop_assert!((coord.y - y).abs() <= 1e-6 * y_max.max(1.0));
    }
}
