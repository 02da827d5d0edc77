mod chart;
mod chart_init;
mod config;
mod data_render;
mod events;
#[cfg(feature = "png-export")]
mod export;
mod layout;
mod legend;
mod lifecycle;
mod realtime;

pub use chart::ScatterChart;
pub use config::{
    AxisPair, AxisPatchPair, BackgroundOption, COLOR_BACKGROUND, CONTAINER_HEIGHT,
    CONTAINER_PADDING, CONTAINER_WIDTH, ChartOptionPatch, DataOption, DataShape, DataStyle,
    EffectiveChartOption, LegendOption, POINT_RADIUS, PointOption, RenderOption,
    RenderOptionPatch, ScatterChartOption, palette_color,
};
pub use data_render::resolve_data_styles;
pub use events::{ChartEventHandler, ChartEventKind};
pub use layout::resolve_layout_padding;
pub use legend::{Legend, LegendClickEvent, LegendEntry, LegendHandler};
pub use realtime::{REALTIME_DECIMATION_FRAMES, REALTIME_MULTIPLE, RealtimeSession};
