mod guide;

use serde::{Deserialize, Serialize};

use crate::core::Coord;

pub use guide::{GUIDE_PRIORITY, Guide, GuideDragOption, GuideLayout, GuideOption};

pub type ClickHandler = Box<dyn FnMut(Coord)>;
pub type DragEndHandler = Box<dyn FnMut(DragSelection)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerMode {
    Idle,
    MouseDown,
    Dragging,
}

/// Data-space rectangle emitted when a drag ends.
///
/// `(x1, y1)` is the bottom-left corner and `(x2, y2)` the top-right one,
/// so `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSelection {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl DragSelection {
    /// Orders two data-space corners into the emitted convention.
    #[must_use]
    pub fn normalized(start: Coord, end: Coord) -> Self {
        Self {
            x1: start.x.min(end.x),
            y1: start.y.min(end.y),
            x2: start.x.max(end.x),
            y2: start.y.max(end.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GuideEvent {
    Click(Coord),
    DragEnd(DragSelection),
}

/// Pointer gesture tracking: `Idle -> MouseDown -> (Dragging | click)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    mode: PointerMode,
    drag_start_x: f64,
    drag_start_y: f64,
    cursor_x: f64,
    cursor_y: f64,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            mode: PointerMode::Idle,
            drag_start_x: 0.0,
            drag_start_y: 0.0,
            cursor_x: 0.0,
            cursor_y: 0.0,
        }
    }
}

/// Gesture completed by a pointer release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRelease {
    Click { x: f64, y: f64 },
    DragEnd { start: (f64, f64), end: (f64, f64) },
    None,
}

impl PointerState {
    #[must_use]
    pub fn mode(self) -> PointerMode {
        self.mode
    }

    #[must_use]
    pub fn cursor(self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    #[must_use]
    pub fn drag_start(self) -> (f64, f64) {
        (self.drag_start_x, self.drag_start_y)
    }

    pub fn on_pointer_down(&mut self, x: f64, y: f64) {
        self.mode = PointerMode::MouseDown;
        self.drag_start_x = x;
        self.drag_start_y = y;
        self.cursor_x = x;
        self.cursor_y = y;
    }

    /// Returns `true` while a drag rectangle should be shown.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.cursor_x = x;
        self.cursor_y = y;
        if self.mode == PointerMode::MouseDown {
            self.mode = PointerMode::Dragging;
        }
        self.mode == PointerMode::Dragging
    }

    pub fn on_pointer_up(&mut self, x: f64, y: f64) -> PointerRelease {
        self.cursor_x = x;
        self.cursor_y = y;
        let release = match self.mode {
            PointerMode::Dragging => PointerRelease::DragEnd {
                start: (self.drag_start_x, self.drag_start_y),
                end: (x, y),
            },
            PointerMode::MouseDown => PointerRelease::Click { x, y },
            PointerMode::Idle => PointerRelease::None,
        };
        self.mode = PointerMode::Idle;
        release
    }

    pub fn on_pointer_leave(&mut self) {
        self.mode = PointerMode::Idle;
    }
}
