use thiserror::Error;

use crate::api::ChartEventKind;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid {axis} axis option: {reason}")]
    InvalidAxis { axis: &'static str, reason: String },

    #[error("no layer with id `{0}`")]
    LayerNotFound(String),

    #[error("no legend with key `{0}`")]
    UnknownLegend(String),

    #[error("no component accepts `{0:?}` events on this chart")]
    EventTargetUnavailable(ChartEventKind),

    #[error("realtime loop stopped: {0}")]
    RealtimeAborted(String),

    #[error("backend error: {0}")]
    Backend(String),
}
