use approx::assert_relative_eq;
use scatter_chart::api::{REALTIME_MULTIPLE, ScatterChart, ScatterChartOption};
use scatter_chart::axis::{AxisLayer, AxisOption};
use scatter_chart::core::{Coord, Point};
use scatter_chart::error::ChartError;
use scatter_chart::render::NullRenderer;

fn chart() -> ScatterChart<NullRenderer> {
    let option = ScatterChartOption::new(
        AxisOption::with_range(0.0, 100.0),
        AxisOption::with_range(0.0, 10.0),
    );
    ScatterChart::new(NullRenderer::default(), option).expect("chart init")
}

fn x_range(chart: &ScatterChart<NullRenderer>) -> (f64, f64) {
    let axis = chart.x_axis().axis();
    (axis.min(), axis.max())
}

/// Mean column of saturated pixels in the rows around `row`; grid, axes
/// and background are all neutral gray.
fn series_column(chart: &ScatterChart<NullRenderer>, row: f64) -> Option<f64> {
    let view = chart.viewport().view_surface();
    let rows = (row - 6.0).max(0.0) as u32..(row + 6.0) as u32;
    let (mut sum, mut count) = (0.0, 0usize);
    for y in rows {
        for x in 0..view.device_width() {
            let [red, green, blue, alpha] = view.pixel(x, y);
            let high = red.max(green).max(blue);
            let low = red.min(green).min(blue);
            if alpha > 0 && high - low > 40 {
                sum += f64::from(x);
                count += 1;
            }
        }
    }
    (count > 0).then(|| sum / count as f64)
}

#[test]
fn start_widens_the_window_and_layers() {
    let mut chart = chart();
    let ratio = chart.ratio();
    chart.start_realtime(1_000.0).expect("start");

    assert!(chart.is_realtime());
    let (min, max) = x_range(&chart);
    assert_relative_eq!(min, 0.0);
    assert_relative_eq!(max, 300.0);
    assert_eq!(chart.x_axis().axis().tick().count, 5 * REALTIME_MULTIPLE - 2);

    let session = chart.realtime_session().expect("session");
    assert!(session.is_frame_requested());
    assert!(session.realtime_width() > chart.width() * 2.0);
    assert_relative_eq!(chart.x_axis().axis().width(), session.realtime_width());
    assert_eq!(chart.ratio(), ratio);
}

#[test]
fn starting_twice_and_stopping_twice_are_no_ops() {
    let mut chart = chart();
    chart.start_realtime(1_000.0).expect("start");
    chart.advance_frame(0.0).expect("frame");
    chart.advance_frame(100.0).expect("frame");
    let scroll = chart.scroll_offset().x;

    chart.start_realtime(500.0).expect("second start");
    assert_relative_eq!(chart.scroll_offset().x, scroll);
    assert_relative_eq!(chart.realtime_session().expect("session").duration_ms(), 1_000.0);

    chart.stop_realtime().expect("stop");
    chart.stop_realtime().expect("second stop");
    assert!(!chart.is_realtime());
    assert!(!chart.advance_frame(200.0).expect("no session"));
}

#[test]
fn window_span_survives_rolls_and_stop_restores_the_base_window() {
    let mut chart = chart();
    chart.start_realtime(1_000.0).expect("start");

    let mut rolls = 0;
    let mut last_min = 0.0;
    for frame in 0..120 {
        let timestamp = f64::from(frame) * 100.0;
        chart
            .render_with(
                &[Point::typed(last_min + 50.0, 5.0, "cpu")],
                scatter_chart::api::RenderOptionPatch::append(),
            )
            .expect("stream");
        assert!(chart.advance_frame(timestamp).expect("frame"));

        let (min, max) = x_range(&chart);
        assert_relative_eq!(max - min, 300.0, epsilon = 1e-9);
        if min > last_min {
            rolls += 1;
            last_min = min;
        }
    }
    assert!(rolls >= 10);
    let session = chart.realtime_session().expect("session");
    assert_relative_eq!(session.max_x() - session.min_x(), 300.0, epsilon = 1e-9);

    chart.stop_realtime().expect("stop");
    assert_eq!(x_range(&chart), (0.0, 100.0));
    assert_eq!(chart.x_axis().axis().tick().count, 5);
    assert_relative_eq!(chart.x_axis().axis().width(), chart.width());
    assert_eq!(chart.scroll_offset().x, 0.0);
}

#[test]
fn decimation_drops_points_left_of_the_window() {
    let mut chart = chart();
    chart
        .render(&[Point::typed(1.0, 5.0, "cpu"), Point::typed(90.0, 5.0, "cpu")])
        .expect("render");
    chart.start_realtime(1_000.0).expect("start");

    // 15 frames at 50ms scroll 0.7 of a window.
    for frame in 0..15 {
        chart.advance_frame(f64::from(frame) * 50.0).expect("frame");
    }
    let kept = chart.data_manager().data_by_legend("cpu");
    assert_eq!(kept.len(), 1);
    assert_relative_eq!(kept[0].x, 90.0);
    assert_eq!(chart.legend_count("cpu"), Some(1));
}

#[test]
fn invalid_frame_timestamp_aborts_and_restores() {
    let mut chart = chart();
    chart.start_realtime(1_000.0).expect("start");
    chart.advance_frame(0.0).expect("frame");

    let err = chart.advance_frame(f64::NAN).expect_err("nan timestamp");
    assert!(matches!(err, ChartError::RealtimeAborted(_)));
    assert!(!chart.is_realtime());
    assert_eq!(x_range(&chart), (0.0, 100.0));
}

#[test]
fn resize_stops_a_running_session() {
    let mut chart = chart();
    chart.start_realtime(1_000.0).expect("start");
    chart.resize(600.0, 300.0).expect("resize");
    assert!(!chart.is_realtime());
    assert_eq!(x_range(&chart), (0.0, 100.0));
}

#[test]
fn invalid_duration_is_rejected() {
    let mut chart = chart();
    assert!(matches!(
        chart.start_realtime(0.0),
        Err(ChartError::InvalidData(_))
    ));
    assert!(!chart.is_realtime());
}

#[test]
fn drawn_points_keep_screen_continuity_across_a_roll() {
    let mut chart = chart();
    let (_, row) = chart.data_mapper().data_to_pixel(Coord::new(0.0, 5.0));
    chart.start_realtime(1_000.0).expect("start");
    chart.render(&[Point::typed(160.0, 5.0, "cpu")]).expect("render");
    let ratio_x = chart.ratio().x;

    // The composite of frame k shows the scroll left by frame k - 1, so the
    // offset is read before each frame and the column after it.
    let mut samples = Vec::new();
    let mut rolled = false;
    for frame in 0..=15 {
        let session = chart.realtime_session().expect("session");
        let continuous = session.scroll_x() - session.min_x() * ratio_x;
        let min_before = session.min_x();
        chart.advance_frame(f64::from(frame) * 100.0).expect("frame");
        rolled |= chart.realtime_session().expect("session").min_x() > min_before;
        if frame >= 8 {
            let column = series_column(&chart, row).expect("point on screen");
            samples.push((continuous, column));
        }
    }
    assert!(rolled, "the window never rolled");

    for pair in samples.windows(2) {
        let (scroll_a, column_a) = pair[0];
        let (scroll_b, column_b) = pair[1];
        assert!(scroll_b < scroll_a);
        assert!(
            ((column_b - column_a) - (scroll_b - scroll_a)).abs() <= 1.0,
            "screen moved {} while the scroll moved {}",
            column_b - column_a,
            scroll_b - scroll_a
        );
    }
}
