use scatter_chart::api::{
    DataOption, DataShape, RenderOptionPatch, ScatterChart, ScatterChartOption,
};
use scatter_chart::axis::AxisOption;
use scatter_chart::core::{Point, UNKNOWN_LEGEND};
use scatter_chart::error::ChartError;
use scatter_chart::render::{Color, NullRenderer};

fn chart_with(option: ScatterChartOption) -> ScatterChart<NullRenderer> {
    ScatterChart::new(NullRenderer::default(), option).expect("chart init")
}

fn chart() -> ScatterChart<NullRenderer> {
    chart_with(ScatterChartOption::new(
        AxisOption::with_range(0.0, 100.0),
        AxisOption::with_range(0.0, 10.0),
    ))
}

#[test]
fn construction_presents_a_first_frame() {
    let chart = chart();
    assert_eq!(chart.renderer().frames_presented, 1);
    assert_eq!(chart.width(), 800.0);
    assert_eq!(chart.height(), 400.0);
    let ids = chart.viewport().layer_ids();
    assert_eq!(ids.first().map(String::as_str), Some("grid:y"));
    assert_eq!(ids.last().map(String::as_str), Some("guide"));
}

#[test]
fn legend_count_follows_non_append_renders() {
    let mut chart = chart();

    chart.render(&[Point::typed(10.0, 5.0, "a")]).expect("render");
    assert_eq!(chart.legend_count("a"), Some(1));

    chart.render(&[Point::typed(10.0, 5.0, "a")]).expect("render");
    assert_eq!(chart.legend_count("a"), Some(1));

    chart
        .render(&[Point::typed(10.0, 5.0, "a"), Point::typed(200.0, 5.0, "a")])
        .expect("render");
    assert_eq!(chart.legend_count("a"), Some(1));
    assert_eq!(chart.data_manager().data_by_legend("a").len(), 2);
}

#[test]
fn append_accumulates_points() {
    let mut chart = chart();
    chart.render(&[Point::typed(10.0, 5.0, "a")]).expect("render");
    chart
        .render_with(&[Point::typed(20.0, 5.0, "a")], RenderOptionPatch::append())
        .expect("append");
    assert_eq!(chart.legend_count("a"), Some(2));
    assert_eq!(chart.data_manager().all_data().len(), 2);
}

#[test]
fn unseen_legends_get_a_layer_and_style() {
    let mut chart = chart();
    chart
        .render(&[Point::typed(10.0, 5.0, "ok"), Point::new(20.0, 5.0)])
        .expect("render");

    assert!(chart.data_layer("ok").is_some());
    assert!(chart.data_layer(UNKNOWN_LEGEND).is_some());
    assert!(chart.data_style("ok").is_some());
    assert_eq!(chart.legend_keys(), vec!["ok".to_owned(), UNKNOWN_LEGEND.to_owned()]);
    assert!(chart.viewport().layer_ids().contains(&"ok".to_owned()));
}

#[test]
fn hidden_points_are_stored_but_not_drawn() {
    let mut chart = chart();
    chart
        .render(&[Point::typed(10.0, 5.0, "a").with_hidden(true)])
        .expect("render");
    let layer = chart.data_layer("a").expect("layer created");
    assert_eq!(layer.borrow().surface().painted_pixel_count(), 0);
    assert_eq!(chart.data_manager().data_by_legend("a").len(), 1);
}

#[test]
fn out_of_range_points_are_clamped_when_requested() {
    let mut chart = chart();
    let high = [Point::typed(50.0, 25.0, "a")];

    chart.render(&high).expect("render");
    let layer = chart.data_layer("a").expect("layer").clone();
    assert_eq!(layer.borrow().surface().painted_pixel_count(), 0);
    assert_eq!(chart.legend_count("a"), Some(0));

    chart
        .render_with(
            &high,
            RenderOptionPatch {
                draw_out_of_range: Some(true),
                ..RenderOptionPatch::default()
            },
        )
        .expect("render");
    let mapper = chart.data_mapper();
    let (px, py) = (mapper.x_to_pixel(50.0), mapper.y_to_pixel(10.0));
    assert!(layer.borrow().surface().pixel(px as u32, py as u32)[3] > 0);
    assert_eq!(chart.legend_count("a"), Some(1));
}

#[test]
fn area_series_fill_down_to_the_baseline() {
    let option = ScatterChartOption::new(
        AxisOption::with_range(0.0, 100.0),
        AxisOption::with_range(0.0, 10.0),
    )
    .with_data(vec![
        DataOption::new("load")
            .with_color(Color::rgb(0.0, 0.5, 0.0))
            .with_shape(DataShape::Area),
    ]);
    let mut chart = chart_with(option);
    chart
        .render(&[Point::typed(10.0, 5.0, "load"), Point::typed(30.0, 5.0, "load")])
        .expect("render");

    let mapper = chart.data_mapper();
    let x = mapper.x_to_pixel(20.0) as u32;
    let y = (mapper.baseline() - 2.0) as u32;
    let layer = chart.data_layer("load").expect("declared layer");
    assert!(layer.borrow().surface().pixel(x, y)[3] > 0);
    let above = (mapper.y_to_pixel(5.0) - 5.0) as u32;
    assert_eq!(layer.borrow().surface().pixel(x, above)[3], 0);
}

#[test]
fn single_area_point_draws_nothing() {
    let option = ScatterChartOption::new(
        AxisOption::with_range(0.0, 100.0),
        AxisOption::with_range(0.0, 10.0),
    )
    .with_data(vec![DataOption::new("load").with_shape(DataShape::Area)]);
    let mut chart = chart_with(option);
    chart.render(&[Point::typed(10.0, 5.0, "load")]).expect("render");
    let layer = chart.data_layer("load").expect("declared layer");
    assert_eq!(layer.borrow().surface().painted_pixel_count(), 0);
}

#[test]
fn non_finite_points_are_rejected_before_ingestion() {
    let mut chart = chart();
    let err = chart
        .render(&[Point::typed(f64::NAN, 5.0, "a")])
        .expect_err("nan x");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert!(chart.data_manager().legend_keys().is_empty());
}

#[test]
fn degenerate_axis_fails_construction() {
    let option = ScatterChartOption::new(
        AxisOption::with_range(10.0, 10.0),
        AxisOption::with_range(0.0, 10.0),
    );
    let err = ScatterChart::new(NullRenderer::default(), option).expect_err("max == min");
    assert!(matches!(err, ChartError::InvalidAxis { axis: "x", .. }));
}
