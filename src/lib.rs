//! scatter-chart: layered raster scatter/area chart engine.
//!
//! Content is drawn onto offscreen layers (axes, grid, one layer per legend,
//! guide overlay) and composited into one visible surface per frame. A
//! realtime mode scrolls the plot indefinitely by rolling the x window and
//! shifting already rendered pixels instead of redrawing them.

pub mod api;
pub mod axis;
pub mod core;
pub mod data;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartEventHandler, ChartEventKind, ScatterChart, ScatterChartOption};
pub use core::{Coord, Point};
pub use error::{ChartError, ChartResult};
