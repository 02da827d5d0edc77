use tracing::{debug, trace, warn};

use crate::axis::{AxisLayer, AxisOption, AxisOptionPatch, TickOptionPatch};
use crate::core::{Coord, points_after};
use crate::data::CountRange;
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::ScatterChart;

/// Width of the realtime axis window, in visible windows.
pub const REALTIME_MULTIPLE: usize = 3;
/// Frames between data pruning and legend count refreshes.
pub const REALTIME_DECIMATION_FRAMES: u32 = 15;

/// Per-chart state of one realtime scroll, created by `start_realtime` and
/// discarded by `stop_realtime`.
#[derive(Debug, Clone)]
pub struct RealtimeSession {
    duration_ms: f64,
    frame_requested: bool,
    last_timestamp: Option<f64>,
    cycle: u32,
    scroll_x: f64,
    min_x: f64,
    max_x: f64,
    realtime_width: f64,
    pane_width: f64,
    inner_x: f64,
    /// x axis as configured before the session started.
    base_x_axis: AxisOption,
}

impl RealtimeSession {
    /// Milliseconds one visible window takes to scroll by.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    #[must_use]
    pub fn is_frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Horizontal offset of scrolling layers; negative while moving left.
    #[must_use]
    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    /// Logical width of the scrolling layers.
    #[must_use]
    pub fn realtime_width(&self) -> f64 {
        self.realtime_width
    }

    #[must_use]
    pub fn base_x_axis(&self) -> &AxisOption {
        &self.base_x_axis
    }

    /// Frames since the last decimation pass.
    #[must_use]
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Advances the clock and scroll offset; returns whether a decimation
    /// pass is due.
    fn tick(&mut self, timestamp_ms: f64) -> bool {
        let elapsed = self
            .last_timestamp
            .map_or(0.0, |last| (timestamp_ms - last).max(0.0));
        self.last_timestamp = Some(timestamp_ms);
        self.scroll_x -= self.pane_width / self.duration_ms * elapsed;
        self.cycle += 1;
        if self.cycle >= REALTIME_DECIMATION_FRAMES {
            self.cycle = 0;
            return true;
        }
        false
    }

    fn needs_roll(&self) -> bool {
        self.scroll_x + self.inner_x < -self.pane_width
    }

    /// Moves the window one visible span forward and rewinds the offset.
    fn roll(&mut self) {
        let step = (self.max_x - self.min_x) / REALTIME_MULTIPLE as f64;
        self.min_x += step;
        self.max_x += step;
        self.scroll_x += self.pane_width;
    }
}

fn axis_window(min: f64, max: f64, tick_count: usize) -> AxisOptionPatch {
    AxisOptionPatch {
        tick: Some(TickOptionPatch {
            count: Some(tick_count),
            ..TickOptionPatch::default()
        }),
        ..AxisOptionPatch::range(min, max)
    }
}

impl<R: Renderer> ScatterChart<R> {
    #[must_use]
    pub fn is_realtime(&self) -> bool {
        self.realtime.is_some()
    }

    #[must_use]
    pub fn realtime_session(&self) -> Option<&RealtimeSession> {
        self.realtime.as_ref()
    }

    /// Widens the x axis to `REALTIME_MULTIPLE` windows and requests the
    /// first frame. A running session is left untouched.
    pub fn start_realtime(&mut self, duration_ms: f64) -> ChartResult<()> {
        if self.realtime.is_some() {
            return Ok(());
        }
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "realtime duration must be finite and > 0, got {duration_ms}"
            )));
        }

        let base_x_axis = self.x_axis.axis().option().clone();
        let geometry = self.plot_geometry();
        let pane_width = geometry.pane_width();
        let inner_x = geometry.inner_x;
        let multiple = REALTIME_MULTIPLE as f64;
        let realtime_width = self.size.width * multiple
            - (geometry.padding.left + geometry.padding.right + inner_x * 2.0) * (multiple - 1.0);
        let min_x = base_x_axis.min;
        let max_x = base_x_axis.min + base_x_axis.span() * multiple;
        let tick_count = base_x_axis.tick.count * REALTIME_MULTIPLE - (REALTIME_MULTIPLE - 1);

        self.x_axis
            .set_option(&axis_window(min_x, max_x, tick_count))?;
        let height = self.size.height;
        self.x_axis.set_size(realtime_width, height);
        self.grid.set_size(realtime_width, self.size.width, height);
        for layer in self.data_layers.values() {
            layer.borrow_mut().resize(realtime_width, height);
        }
        self.render_grid();

        let session = RealtimeSession {
            duration_ms,
            frame_requested: true,
            last_timestamp: None,
            cycle: 0,
            scroll_x: -inner_x,
            min_x,
            max_x,
            realtime_width,
            pane_width,
            inner_x,
            base_x_axis,
        };
        let guide_min_x = session.scroll_x.abs() / self.ratio.x + min_x;
        self.realtime = Some(session);
        if let Some(guide) = self.guide.as_mut() {
            guide.update_min_x(guide_min_x);
        }
        debug!(duration_ms, min_x, max_x, realtime_width, "realtime started");
        self.render_all_data()
    }

    /// Cancels the pending frame and restores the pre-realtime x axis.
    /// Does nothing when no session is running.
    pub fn stop_realtime(&mut self) -> ChartResult<()> {
        let Some(session) = self.realtime.take() else {
            return Ok(());
        };
        debug!(min_x = session.min_x, max_x = session.max_x, "realtime stopped");
        self.restore_after_realtime(&session)
    }

    /// Runs one realtime frame at host time `timestamp_ms`.
    ///
    /// Returns whether another frame is requested. A failing frame ends the
    /// session, restores the regular axis and reports `RealtimeAborted`.
    pub fn advance_frame(&mut self, timestamp_ms: f64) -> ChartResult<bool> {
        let Some(session) = self.realtime.as_ref() else {
            return Ok(false);
        };
        if !session.frame_requested {
            return Ok(false);
        }
        match self.run_frame(timestamp_ms) {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!(error = %err, "realtime frame failed, stopping");
                if let Some(session) = self.realtime.take() {
                    if let Err(restore) = self.restore_after_realtime(&session) {
                        warn!(error = %restore, "failed to restore chart after realtime abort");
                    }
                }
                Err(ChartError::RealtimeAborted(err.to_string()))
            }
        }
    }

    fn run_frame(&mut self, timestamp_ms: f64) -> ChartResult<()> {
        if !timestamp_ms.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "frame timestamp must be finite, got {timestamp_ms}"
            )));
        }
        self.shoot()?;

        let Some(session) = self.realtime.as_mut() else {
            return Ok(());
        };
        session.frame_requested = false;
        let decimate = session.tick(timestamp_ms);
        trace!(scroll_x = session.scroll_x, cycle = session.cycle, "realtime frame");

        if decimate {
            self.decimate_realtime();
        }
        while self
            .realtime
            .as_ref()
            .is_some_and(RealtimeSession::needs_roll)
        {
            self.roll_window()?;
        }
        if let Some(session) = self.realtime.as_mut() {
            session.frame_requested = true;
        }
        Ok(())
    }

    /// Drops points left of the visible window, recounts the visible window
    /// and moves the guide's x reference.
    fn decimate_realtime(&mut self) {
        let Some(session) = self.realtime.as_ref() else {
            return;
        };
        let ratio_x = self.ratio.x;
        let cutoff = (session.scroll_x + session.inner_x).abs() / ratio_x + session.min_x;
        let window = (session.max_x - session.min_x) / REALTIME_MULTIPLE as f64;
        let guide_min_x = session.scroll_x.abs() / ratio_x + session.min_x;

        for legend in self.data_manager.legend_keys() {
            let kept = points_after(self.data_manager.data_by_legend(&legend), cutoff);
            self.data_manager.set_data_by_legend(&legend, kept);
        }

        let y = self.y_axis.axis();
        let range = CountRange::new(Coord::new(cutoff, y.min()), Coord::new(cutoff + window, y.max()))
            .include_above_max_y(self.settings.render.draw_out_of_range);
        self.refresh_counts(&range);

        if let Some(guide) = self.guide.as_mut() {
            guide.update_min_x(guide_min_x);
        }
        trace!(cutoff, guide_min_x, "realtime decimation");
    }

    fn roll_window(&mut self) -> ChartResult<()> {
        let Some(session) = self.realtime.as_mut() else {
            return Ok(());
        };
        session.roll();
        let (min_x, max_x) = (session.min_x, session.max_x);
        let shift = session.pane_width;
        let start_x = session.inner_x + self.padding.left;

        self.x_axis.set_option(&AxisOptionPatch::range(min_x, max_x))?;
        for layer in self.data_layers.values() {
            let mut layer = layer.borrow_mut();
            if !layer.is_fixed() {
                layer.swap_buffer(shift, start_x)?;
            }
        }
        debug!(min_x, max_x, "realtime window rolled");
        Ok(())
    }

    fn restore_after_realtime(&mut self, session: &RealtimeSession) -> ChartResult<()> {
        let base = &session.base_x_axis;
        self.x_axis
            .set_option(&axis_window(base.min, base.max, base.tick.count))?;
        let (width, height) = (self.size.width, self.size.height);
        self.x_axis.set_size(width, height);
        self.grid.set_size(width, width, height);
        for layer in self.data_layers.values() {
            layer.borrow_mut().resize(width, height);
        }
        self.relayout()?;
        self.render_all_data()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{REALTIME_DECIMATION_FRAMES, RealtimeSession};
    use crate::axis::AxisOption;

    fn session() -> RealtimeSession {
        RealtimeSession {
            duration_ms: 1000.0,
            frame_requested: true,
            last_timestamp: None,
            cycle: 0,
            scroll_x: -10.0,
            min_x: 0.0,
            max_x: 300.0,
            realtime_width: 1200.0,
            pane_width: 400.0,
            inner_x: 10.0,
            base_x_axis: AxisOption::with_range(0.0, 100.0),
        }
    }

    #[test]
    fn first_frame_does_not_move() {
        let mut session = session();
        session.tick(5_000.0);
        assert_relative_eq!(session.scroll_x(), -10.0);
        session.tick(5_500.0);
        assert_relative_eq!(session.scroll_x(), -210.0);
    }

    #[test]
    fn decimation_fires_every_fifteen_frames() {
        let mut session = session();
        let due: Vec<bool> = (0..30).map(|i| session.tick(f64::from(i))).collect();
        assert_eq!(due.iter().filter(|due| **due).count(), 2);
        assert!(due[REALTIME_DECIMATION_FRAMES as usize - 1]);
        assert_eq!(session.cycle(), 0);
    }

    #[test]
    fn roll_keeps_window_span() {
        let mut session = session();
        session.tick(0.0);
        session.tick(1_100.0);
        assert!(session.needs_roll());
        session.roll();
        assert_relative_eq!(session.min_x(), 100.0);
        assert_relative_eq!(session.max_x() - session.min_x(), 300.0);
        assert_relative_eq!(session.scroll_x(), -50.0);
        assert!(!session.needs_roll());
    }

    #[test]
    fn backwards_clock_does_not_scroll_right() {
        let mut session = session();
        session.tick(1_000.0);
        session.tick(900.0);
        assert_relative_eq!(session.scroll_x(), -10.0);
    }
}
