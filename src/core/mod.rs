pub mod primitives;
pub mod scale;
pub mod types;
pub mod windowing;

pub use primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
pub use scale::{CoordinateMapper, PlotGeometry, Ratio};
pub use types::{Coord, Padding, PaddingPatch, Point, ScrollOffset, SurfaceSize, UNKNOWN_LEGEND};
pub use windowing::points_after;
