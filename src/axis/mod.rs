mod base;
mod grid;
mod option;
mod x_axis;
mod y_axis;

pub use base::{Axis, AxisLayer};
pub use grid::{GRID_PRIORITY, GridAxis, GridOption};
pub use option::{
    AXIS_DEFAULT_TICK_COUNT, AXIS_INNER_PADDING, AXIS_TICK_WIDTH, AxisOption, AxisOptionPatch,
    COLOR_GRID, COLOR_STROKE, COLOR_TEXT, TEXT_PADDING, TickFormatter, TickFormatterFn, TickOption,
    TickOptionPatch,
};
pub use x_axis::{X_AXIS_PRIORITY, XAxis};
pub use y_axis::{Y_AXIS_PRIORITY, YAxis};
