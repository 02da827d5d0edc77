use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::axis::{AxisOption, COLOR_STROKE};
use crate::core::{Coord, CoordinateMapper, Padding, PlotGeometry, Ratio};
use crate::render::{
    Color, FontSpec, Layer, LayerOptions, LinePrimitive, RectPrimitive, SharedLayer, TextHAlign,
    TextPrimitive, TextVAlign,
};

use super::{
    ClickHandler, DragEndHandler, DragSelection, GuideEvent, PointerMode, PointerRelease,
    PointerState,
};

pub const GUIDE_PRIORITY: i32 = -10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideDragOption {
    pub background_color: Color,
    pub stroke_color: Color,
}

impl Default for GuideDragOption {
    fn default() -> Self {
        Self {
            background_color: Color::rgba(0.0, 0.47, 1.0, 0.15),
            stroke_color: Color::rgb(0.0, 0.47, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideOption {
    pub hidden: bool,
    pub color: Color,
    pub background_color: Color,
    pub stroke_color: Color,
    pub drag: GuideDragOption,
}

impl Default for GuideOption {
    fn default() -> Self {
        Self {
            hidden: false,
            color: Color::WHITE,
            background_color: Color::rgb(0.27, 0.27, 0.27),
            stroke_color: COLOR_STROKE,
            drag: GuideDragOption::default(),
        }
    }
}

/// Layout snapshot the guide converts pointer positions with.
///
/// The chart pushes a fresh copy after every layout pass; realtime mode only
/// moves `x_axis.min` forward.
#[derive(Debug, Clone)]
pub struct GuideLayout {
    pub padding: Padding,
    pub ratio: Ratio,
    pub x_axis: AxisOption,
    pub y_axis: AxisOption,
}

/// Interactive overlay: drag rectangle, coordinate readout, click/drag events.
pub struct Guide {
    option: GuideOption,
    layer: SharedLayer,
    layout: GuideLayout,
    pointer: PointerState,
    readout: Option<Coord>,
    click_handler: Option<ClickHandler>,
    drag_end_handler: Option<DragEndHandler>,
}

impl fmt::Debug for Guide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guide")
            .field("option", &self.option)
            .field("layout", &self.layout)
            .field("pointer", &self.pointer)
            .field("readout", &self.readout)
            .field("has_click_handler", &self.click_handler.is_some())
            .field("has_drag_end_handler", &self.drag_end_handler.is_some())
            .finish()
    }
}

impl Guide {
    #[must_use]
    pub fn new(option: GuideOption, layout: GuideLayout, width: f64, height: f64, dpr: f64) -> Self {
        let layer = LayerOptions::sized(width, height, dpr)
            .fixed(true)
            .priority(GUIDE_PRIORITY);
        Self {
            option,
            layer: Layer::new("guide", layer).into_shared(),
            layout,
            pointer: PointerState::default(),
            readout: None,
            click_handler: None,
            drag_end_handler: None,
        }
    }

    #[must_use]
    pub fn option(&self) -> GuideOption {
        self.option
    }

    #[must_use]
    pub fn layer(&self) -> &SharedLayer {
        &self.layer
    }

    #[must_use]
    pub fn layout(&self) -> &GuideLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: GuideLayout) {
        self.layout = layout;
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.layer.borrow_mut().resize(width, height);
    }

    /// Moves the x reference used for conversion while realtime scrolling.
    pub fn update_min_x(&mut self, min_x: f64) {
        self.layout.x_axis.min = min_x;
    }

    #[must_use]
    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer.mode()
    }

    /// Last converted pointer position, `None` outside the plot interior.
    #[must_use]
    pub fn readout(&self) -> Option<Coord> {
        self.readout
    }

    pub fn on_click(&mut self, handler: ClickHandler) {
        self.click_handler = Some(handler);
    }

    pub fn off_click(&mut self) {
        self.click_handler = None;
    }

    pub fn on_drag_end(&mut self, handler: DragEndHandler) {
        self.drag_end_handler = Some(handler);
    }

    pub fn off_drag_end(&mut self) {
        self.drag_end_handler = None;
    }

    #[must_use]
    pub fn mapper(&self) -> CoordinateMapper {
        let layer = self.layer.borrow();
        CoordinateMapper {
            geometry: PlotGeometry {
                width: layer.width(),
                height: layer.height(),
                padding: self.layout.padding,
                inner_x: self.layout.x_axis.inner_padding,
                inner_y: self.layout.y_axis.inner_padding,
            },
            x_min: self.layout.x_axis.min,
            y_min: self.layout.y_axis.min,
            y_max: self.layout.y_axis.max,
            ratio: self.layout.ratio,
        }
    }

    #[must_use]
    pub fn pixel_to_data(&self, x: f64, y: f64) -> Coord {
        self.mapper().pixel_to_data(x, y)
    }

    /// Whether `(x, y)` lies inside the padded plot interior.
    #[must_use]
    pub fn is_in_valid_area(&self, x: f64, y: f64) -> bool {
        let geometry = self.mapper().geometry;
        let padding = geometry.padding;
        x >= padding.left + geometry.inner_x
            && x <= geometry.width - padding.right - geometry.inner_x
            && y >= padding.top + geometry.inner_y
            && y <= geometry.height - padding.bottom - geometry.inner_y
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointer.on_pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.clear();
        self.draw_readout(x, y);
        if self.pointer.on_pointer_move(x, y) {
            let (start_x, start_y) = self.pointer.drag_start();
            let drag = self.option.drag;
            self.layer.borrow_mut().surface_mut().fill_rect(
                &RectPrimitive::new(start_x, start_y, x - start_x, y - start_y, drag.background_color)
                    .with_border(1.0, drag.stroke_color),
            );
        }
    }

    /// Completes the current gesture and dispatches it to the registered handler.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<GuideEvent> {
        self.clear();
        let event = match self.pointer.on_pointer_up(x, y) {
            PointerRelease::DragEnd { start, end } => {
                self.draw_readout(x, y);
                let start = self.pixel_to_data(start.0, start.1);
                let end = self.pixel_to_data(end.0, end.1);
                Some(GuideEvent::DragEnd(DragSelection::normalized(start, end)))
            }
            PointerRelease::Click { x, y } => Some(GuideEvent::Click(self.pixel_to_data(x, y))),
            PointerRelease::None => None,
        };
        match event {
            Some(GuideEvent::DragEnd(selection)) => {
                trace!(?selection, "guide drag end");
                if let Some(handler) = self.drag_end_handler.as_mut() {
                    handler(selection);
                }
            }
            Some(GuideEvent::Click(coord)) => {
                trace!(x = coord.x, y = coord.y, "guide click");
                if let Some(handler) = self.click_handler.as_mut() {
                    handler(coord);
                }
            }
            None => {}
        }
        event
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.on_pointer_leave();
        self.readout = None;
        self.clear();
    }

    pub fn clear(&mut self) {
        self.layer.borrow_mut().clear();
    }

    /// Drops handlers and releases the overlay surface.
    pub fn destroy(&mut self) {
        self.click_handler = None;
        self.drag_end_handler = None;
        self.pointer.on_pointer_leave();
        self.readout = None;
        self.layer.borrow_mut().resize(0.0, 0.0);
    }

    fn draw_readout(&mut self, x: f64, y: f64) {
        if !self.is_in_valid_area(x, y) {
            self.readout = None;
            return;
        }
        let coord = self.pixel_to_data(x, y);
        self.readout = Some(coord);

        let GuideLayout {
            padding,
            x_axis,
            y_axis,
            ..
        } = &self.layout;
        let option = self.option;
        let x_tick = &x_axis.tick;
        let y_tick = &y_axis.tick;
        let x_text = x_tick.format.format(coord.x);
        let y_text = y_tick.format.format(coord.y);

        let mut layer = self.layer.borrow_mut();
        let height = layer.height();
        let x_font = FontSpec::from_css_font(&x_tick.font)
            .unwrap_or_else(|| layer.surface().font().clone());
        let y_font = FontSpec::from_css_font(&y_tick.font)
            .unwrap_or_else(|| layer.surface().font().clone());
        let (x_text_width, x_text_height) = layer.surface().measure_text_with(&x_text, &x_font);
        let (y_text_width, y_text_height) = layer.surface().measure_text_with(&y_text, &y_font);
        let x_box_width = x_text_width + x_tick.padding.left + x_tick.padding.right;
        let x_box_height = x_text_height + x_tick.padding.top + x_tick.padding.bottom;
        let y_box_width = y_text_width + y_tick.padding.left + y_tick.padding.right;
        let y_box_height = y_text_height + y_tick.padding.top + y_tick.padding.bottom;
        let plot_bottom = height - padding.bottom;
        let surface = layer.surface_mut();

        surface.fill_rect(&RectPrimitive::new(
            x - x_box_width / 2.0,
            plot_bottom + x_tick.width,
            x_box_width,
            x_box_height,
            option.background_color,
        ));
        surface.stroke_line(&LinePrimitive::new(
            x,
            plot_bottom,
            x,
            plot_bottom + x_tick.width,
            1.0,
            option.stroke_color,
        ));
        surface.fill_text(
            &TextPrimitive::new(
                x_text,
                x,
                plot_bottom + x_tick.width + x_tick.padding.top,
                x_font,
                option.color,
                TextHAlign::Center,
            )
            .with_v_align(TextVAlign::Top),
        );

        surface.fill_rect(&RectPrimitive::new(
            padding.left - y_tick.width - y_box_width,
            y - y_box_height / 2.0,
            y_box_width,
            y_box_height,
            option.background_color,
        ));
        surface.stroke_line(&LinePrimitive::new(
            padding.left - y_tick.width,
            y,
            padding.left,
            y,
            1.0,
            option.stroke_color,
        ));
        surface.fill_text(
            &TextPrimitive::new(
                y_text,
                padding.left - y_tick.width - y_tick.padding.right,
                y,
                y_font,
                option.color,
                TextHAlign::Right,
            )
            .with_v_align(TextVAlign::Middle),
        );
    }
}
