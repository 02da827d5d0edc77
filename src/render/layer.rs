use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ChartResult;
use crate::render::RasterSurface;

pub const LAYER_DEFAULT_PRIORITY: i32 = 0;

/// Layer handle shared between its owner and the viewport's stacking list.
pub type SharedLayer = Rc<RefCell<Layer>>;

/// Construction options for a [`Layer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerOptions {
    pub width: f64,
    pub height: f64,
    pub display: bool,
    pub fixed: bool,
    pub priority: i32,
    pub dpr: f64,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            display: true,
            fixed: false,
            priority: LAYER_DEFAULT_PRIORITY,
            dpr: 1.0,
        }
    }
}

impl LayerOptions {
    #[must_use]
    pub fn sized(width: f64, height: f64, dpr: f64) -> Self {
        Self {
            width,
            height,
            dpr,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Offscreen raster surface with stacking attributes.
///
/// Higher priority layers are composited first, i.e. further back. Fixed
/// layers ignore the viewport scroll offset.
#[derive(Debug)]
pub struct Layer {
    id: String,
    surface: RasterSurface,
    display: bool,
    fixed: bool,
    priority: i32,
}

impl Layer {
    #[must_use]
    pub fn new(id: impl Into<String>, options: LayerOptions) -> Self {
        Self {
            id: id.into(),
            surface: RasterSurface::new(options.width, options.height, options.dpr),
            display: options.display,
            fixed: options.fixed,
            priority: options.priority,
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedLayer {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    #[must_use]
    pub fn is_displayed(&self) -> bool {
        self.display
    }

    pub fn show(&mut self) {
        self.display = true;
    }

    pub fn hide(&mut self) {
        self.display = false;
    }

    /// Clears and reallocates the surface; callers must redraw afterwards.
    pub fn resize(&mut self, width: f64, height: f64) {
        let dpr = self.surface.dpr();
        self.resize_with_dpr(width, height, dpr);
    }

    pub fn resize_with_dpr(&mut self, width: f64, height: f64, dpr: f64) {
        self.surface.resize(width, height, dpr);
    }

    pub fn clear(&mut self) {
        self.surface.clear();
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.surface.logical_width()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.surface.logical_height()
    }

    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.surface.dpr()
    }

    #[must_use]
    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut RasterSurface {
        &mut self.surface
    }

    /// Rewinds already drawn content by `shift_width` logical pixels, keeping
    /// everything right of `start_x + shift_width` and re-placing it at `start_x`.
    pub fn swap_buffer(&mut self, shift_width: f64, start_x: f64) -> ChartResult<()> {
        self.surface.swap_buffer(shift_width, start_x)
    }

    #[must_use]
    pub fn measure_text(&self, text: &str) -> f64 {
        self.surface.measure_text(text)
    }

    #[must_use]
    pub fn measure_text_height(&self, text: &str) -> f64 {
        self.surface.measure_text_height(text)
    }
}
