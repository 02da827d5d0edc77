use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::ScrollOffset;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Layer, LayerOptions, RasterSurface, RectPrimitive, SharedLayer};

/// Payload of the viewport `resize` event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    pub width: f64,
    pub height: f64,
}

pub type ResizeCallback = Box<dyn FnMut(ResizeEvent)>;

struct StackEntry {
    layer: Weak<RefCell<Layer>>,
    sequence: u64,
}

/// Visible surface plus the ordered, non-owning list of content layers.
///
/// Layers are owned elsewhere; a layer dropped by its owner simply stops
/// being composited.
pub struct Viewport {
    view: Layer,
    layers: Vec<StackEntry>,
    next_sequence: u64,
    resize_callback: Option<ResizeCallback>,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("layers", &self.layer_ids())
            .field("has_resize_callback", &self.resize_callback.is_some())
            .finish()
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self {
            view: Layer::new("viewport", LayerOptions::sized(width, height, dpr)),
            layers: Vec::new(),
            next_sequence: 0,
            resize_callback: None,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.view.width()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.view.height()
    }

    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.view.dpr()
    }

    #[must_use]
    pub fn view_surface(&self) -> &RasterSurface {
        self.view.surface()
    }

    /// Inserts one layer and restores descending-priority order.
    ///
    /// Among equal priorities the later insertion is composited first.
    pub fn add_layer(&mut self, layer: &SharedLayer) -> &mut Self {
        self.layers.push(StackEntry {
            layer: Rc::downgrade(layer),
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
        self.sort_layers();
        self
    }

    pub fn add_layers<'a>(&mut self, layers: impl IntoIterator<Item = &'a SharedLayer>) -> &mut Self {
        for layer in layers {
            self.layers.push(StackEntry {
                layer: Rc::downgrade(layer),
                sequence: self.next_sequence,
            });
            self.next_sequence += 1;
        }
        self.sort_layers();
        self
    }

    /// Ids of live layers in compositing order.
    #[must_use]
    pub fn layer_ids(&self) -> Vec<String> {
        self.layers
            .iter()
            .filter_map(|entry| entry.layer.upgrade())
            .map(|layer| layer.borrow().id().to_owned())
            .collect()
    }

    /// Composites every displayed layer onto the visible surface.
    ///
    /// Fixed layers land at the origin; the others are sampled from
    /// `(-scroll_x, scroll_y)`. Returns the number of composited layers.
    pub fn render(&mut self, scroll: ScrollOffset) -> usize {
        let mut composited = 0;
        for entry in &self.layers {
            let Some(layer) = entry.layer.upgrade() else {
                continue;
            };
            let Ok(layer) = layer.try_borrow() else {
                warn!("skipping layer that is borrowed during composite");
                continue;
            };
            if !layer.is_displayed() {
                continue;
            }
            if layer.is_fixed() {
                self.view
                    .surface_mut()
                    .draw_surface(layer.surface(), 0.0, 0.0, 0.0, 0.0);
            } else {
                self.view.surface_mut().draw_surface(
                    layer.surface(),
                    -scroll.x,
                    scroll.y,
                    0.0,
                    scroll.y,
                );
            }
            composited += 1;
        }
        trace!(composited, scroll_x = scroll.x, "viewport composite");
        composited
    }

    pub fn show(&mut self, id: &str) -> ChartResult<()> {
        self.with_layer(id, Layer::show)
    }

    pub fn hide(&mut self, id: &str) -> ChartResult<()> {
        self.with_layer(id, Layer::hide)
    }

    /// Resizes the visible surface and every live layer.
    pub fn set_size(&mut self, width: f64, height: f64) -> &mut Self {
        self.view.resize(width, height);
        for entry in &self.layers {
            if let Some(layer) = entry.layer.upgrade() {
                layer.borrow_mut().resize(width, height);
            }
        }
        self.layers.retain(|entry| entry.layer.strong_count() > 0);
        if let Some(callback) = self.resize_callback.as_mut() {
            callback(ResizeEvent { width, height });
        }
        self
    }

    pub fn clear(&mut self) {
        self.view.clear();
    }

    pub fn fill_background(&mut self, color: Color) {
        let (width, height) = (self.width(), self.height());
        self.view
            .surface_mut()
            .fill_rect(&RectPrimitive::new(0.0, 0.0, width, height, color));
    }

    pub fn on_resize(&mut self, callback: ResizeCallback) {
        self.resize_callback = Some(callback);
    }

    pub fn off_resize(&mut self) {
        self.resize_callback = None;
    }

    /// Forgets every layer and the resize listener.
    pub fn destroy(&mut self) {
        self.layers.clear();
        self.resize_callback = None;
        self.view.resize(0.0, 0.0);
    }

    fn with_layer(&mut self, id: &str, apply: impl Fn(&mut Layer)) -> ChartResult<()> {
        let layer = self
            .layers
            .iter()
            .filter_map(|entry| entry.layer.upgrade())
            .find(|layer| layer.borrow().id() == id)
            .ok_or_else(|| ChartError::LayerNotFound(id.to_owned()))?;
        apply(&mut *layer.borrow_mut());
        Ok(())
    }

    fn sort_layers(&mut self) {
        let priority = |entry: &StackEntry| {
            entry
                .layer
                .upgrade()
                .map_or(i32::MIN, |layer| layer.borrow().priority())
        };
        self.layers.sort_by(|a, b| {
            priority(b)
                .cmp(&priority(a))
                .then_with(|| b.sequence.cmp(&a.sequence))
        });
    }
}
