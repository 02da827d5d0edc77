use approx::assert_relative_eq;
use scatter_chart::api::{
    AxisPatchPair, ChartOptionPatch, RenderOptionPatch, ScatterChart, ScatterChartOption,
};
use scatter_chart::axis::{AxisLayer, AxisOption, AxisOptionPatch};
use scatter_chart::core::Point;
use scatter_chart::data::DataMode;
use scatter_chart::error::ChartError;
use scatter_chart::render::NullRenderer;

fn chart() -> ScatterChart<NullRenderer> {
    let option = ScatterChartOption::new(
        AxisOption::with_range(0.0, 100.0),
        AxisOption::with_range(0.0, 10.0),
    );
    ScatterChart::new(NullRenderer::default(), option).expect("chart init")
}

#[test]
fn resizing_back_restores_the_ratio() {
    let mut chart = chart();
    chart.render(&[Point::typed(10.0, 5.0, "a")]).expect("render");
    let ratio = chart.ratio();

    chart.resize(500.0, 250.0).expect("shrink");
    assert!(chart.ratio().x < ratio.x);
    assert_eq!(chart.viewport().width(), 500.0);
    let layer = chart.data_layer("a").expect("layer survives resize");
    assert_relative_eq!(layer.borrow().width(), 500.0);
    assert!(layer.borrow().surface().painted_pixel_count() > 0);

    chart.resize(800.0, 400.0).expect("grow");
    assert_relative_eq!(chart.ratio().x, ratio.x, epsilon = 1e-12);
    assert_relative_eq!(chart.ratio().y, ratio.y, epsilon = 1e-12);
}

#[test]
fn repeated_resize_yields_identical_ratios() {
    let mut chart = chart();
    chart.resize(700.0, 350.0).expect("first resize");
    let first = chart.ratio();
    chart.resize(700.0, 350.0).expect("second resize");
    assert_eq!(chart.ratio(), first);
}

#[test]
fn missing_resize_sides_keep_the_current_size() {
    let mut chart = chart();
    chart.resize_to(Some(640.0), None).expect("width only");
    assert_eq!((chart.width(), chart.height()), (640.0, 400.0));

    chart.resize_to(None, Some(300.0)).expect("height only");
    assert_eq!((chart.width(), chart.height()), (640.0, 300.0));

    let ratio = chart.ratio();
    chart.resize_to(None, None).expect("relayout in place");
    assert_eq!(chart.ratio(), ratio);
    assert_eq!(chart.viewport().width(), 640.0);
}

#[test]
fn zero_size_is_rejected() {
    let mut chart = chart();
    assert!(matches!(
        chart.resize(0.0, 100.0),
        Err(ChartError::InvalidViewport { .. })
    ));
    assert_eq!(chart.width(), 800.0);
}

#[test]
fn set_option_rescales_and_redraws() {
    let mut chart = chart();
    chart.render(&[Point::typed(150.0, 5.0, "a")]).expect("render");
    assert_eq!(chart.legend_count("a"), Some(0));

    chart
        .set_option(ChartOptionPatch {
            axis: AxisPatchPair {
                x: Some(AxisOptionPatch::range(100.0, 200.0)),
                y: None,
            },
            render: None,
        })
        .expect("valid patch");
    assert_eq!(chart.legend_count("a"), Some(1));
    let effective = chart.get_option();
    assert_eq!((effective.axis.x.min, effective.axis.x.max), (100.0, 200.0));
    assert_eq!(chart.guide().expect("guide").layout().x_axis.min, 100.0);
}

#[test]
fn invalid_patch_leaves_the_chart_untouched() {
    let mut chart = chart();
    let ratio = chart.ratio();
    let err = chart
        .set_option(ChartOptionPatch {
            axis: AxisPatchPair {
                x: Some(AxisOptionPatch::range(0.0, 50.0)),
                y: Some(AxisOptionPatch::range(10.0, 0.0)),
            },
            render: Some(RenderOptionPatch::append()),
        })
        .expect_err("inverted y range");
    assert!(matches!(err, ChartError::InvalidAxis { axis: "y", .. }));
    assert_eq!(chart.x_axis().axis().max(), 100.0);
    assert_eq!(chart.ratio(), ratio);
    assert!(!chart.get_option().render.append);
}

#[test]
fn tick_count_below_two_is_a_configuration_error() {
    let mut chart = chart();
    let err = chart
        .set_option(ChartOptionPatch {
            axis: AxisPatchPair {
                x: Some(AxisOptionPatch::tick_count(1)),
                y: None,
            },
            render: None,
        })
        .expect_err("one tick");
    assert!(matches!(err, ChartError::InvalidAxis { axis: "x", .. }));
}

#[test]
fn get_option_reports_resolved_defaults() {
    let chart = chart();
    let option = chart.get_option();
    assert_eq!(option.size.width, 800.0);
    assert_eq!(option.mode, DataMode::Default);
    assert!(option.legend.is_some());
    assert!(option.guide.is_some());
    assert!(option.padding.left > 20.0);
    assert_eq!(option.padding.top, 20.0);
    assert!(serde_json::to_string(&option).is_ok());
}

#[test]
fn clear_drops_data_and_counts() {
    let mut chart = chart();
    chart.render(&[Point::typed(10.0, 5.0, "a")]).expect("render");
    chart.clear().expect("clear");
    assert!(chart.data_manager().all_data().is_empty());
    assert_eq!(chart.legend_count("a"), Some(0));
    let layer = chart.data_layer("a").expect("layer kept");
    assert_eq!(layer.borrow().surface().painted_pixel_count(), 0);
}

#[test]
fn destroy_detaches_layers_and_returns_the_renderer() {
    let mut chart = chart();
    chart.render(&[Point::typed(10.0, 5.0, "a")]).expect("render");
    chart.start_realtime(1_000.0).expect("start");
    let renderer = chart.destroy();
    assert!(renderer.frames_presented >= 3);
}

#[test]
fn light_mode_counts_without_storing_points() {
    let option = ScatterChartOption::new(
        AxisOption::with_range(0.0, 10_000.0),
        AxisOption::with_range(0.0, 10.0),
    )
    .with_mode(DataMode::Light);
    let mut chart = ScatterChart::new(NullRenderer::default(), option).expect("chart init");
    chart
        .render(&[
            Point::typed(100.0, 5.0, "a"),
            Point::typed(200.0, 5.0, "a"),
            Point::typed(1_500.0, 5.0, "a"),
        ])
        .expect("render");
    chart
        .render_with(&[Point::typed(300.0, 5.0, "a")], RenderOptionPatch::append())
        .expect("append");

    assert_eq!(chart.legend_count("a"), Some(4));
    assert!(chart.data_manager().all_data().is_empty());
    assert_eq!(chart.get_option().mode, DataMode::Light);
}

#[test]
fn json_configuration_builds_a_chart() {
    let option = ScatterChartOption::from_json_str(
        r##"{
            "axis": {
                "x": {"min": 0, "max": 60000, "tick": {"count": 7}},
                "y": {"min": 0, "max": 100}
            },
            "data": [
                {"type": "ok", "color": "#2ca02c"},
                {"type": "fail", "color": "#d62728", "shape": "area"}
            ],
            "guide": {"hidden": true},
            "size": {"width": 640, "height": 320}
        }"##,
    )
    .expect("valid json");
    let chart = ScatterChart::new(NullRenderer::default(), option).expect("chart init");

    assert_eq!(chart.width(), 640.0);
    assert!(chart.guide().is_none());
    assert_eq!(chart.x_axis().axis().tick().count, 7);
    assert_eq!(chart.legend_keys(), vec!["ok".to_owned(), "fail".to_owned()]);
    assert_eq!(
        chart.legend().expect("legend").entries()[1].color.to_hex(),
        "#d62728"
    );
}
