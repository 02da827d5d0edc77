use std::f64::consts::TAU;
use std::fmt;

use cairo::{Context, FillRule, Filter, Format, ImageSurface, LineCap, Operator};
use pango::Alignment;
use tracing::{error, warn};

use crate::error::{ChartError, ChartResult};
use crate::render::{
    AreaPrimitive, CirclePrimitive, Color, FontSpec, LinePrimitive, RectPrimitive, TextHAlign,
    TextPrimitive, TextVAlign,
};

/// Largest edge cairo accepts for an image surface.
const MAX_DEVICE_EXTENT: u32 = 32_767;

/// Cairo ARGB32 image surface addressed in logical pixels.
///
/// Drawing methods take logical coordinates and the device pixel ratio is
/// applied through the context transform. The logical size is kept exactly
/// as requested; the backing store is rounded up to whole device pixels.
/// A surface with a zero dimension ignores all drawing.
pub struct RasterSurface {
    /// `None` while either device dimension is zero.
    surface: Option<ImageSurface>,
    width: f64,
    height: f64,
    dpr: f64,
    font: FontSpec,
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dpr", &self.dpr)
            .field("device_width", &self.device_width())
            .field("device_height", &self.device_height())
            .field("font", &self.font)
            .finish()
    }
}

impl RasterSurface {
    #[must_use]
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        let dpr = sanitize_dpr(dpr);
        let (width, height) = (sanitize_extent(width), sanitize_extent(height));
        Self {
            surface: create_image(width, height, dpr),
            width,
            height,
            dpr,
            font: FontSpec::default(),
        }
    }

    /// Reallocates the backing store; no pixel content survives.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.dpr = sanitize_dpr(dpr);
        self.width = sanitize_extent(width);
        self.height = sanitize_extent(height);
        self.surface = create_image(self.width, self.height, self.dpr);
    }

    #[must_use]
    pub fn device_width(&self) -> u32 {
        self.surface
            .as_ref()
            .map_or(0, |surface| u32::try_from(surface.width()).unwrap_or(0))
    }

    #[must_use]
    pub fn device_height(&self) -> u32 {
        self.surface
            .as_ref()
            .map_or(0, |surface| u32::try_from(surface.height()).unwrap_or(0))
    }

    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    #[must_use]
    pub fn logical_width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn logical_height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.device_width() == 0 || self.device_height() == 0
    }

    /// Backing cairo surface, e.g. to paint it onto a host context.
    #[must_use]
    pub fn cairo_surface(&self) -> Option<&ImageSurface> {
        self.surface.as_ref()
    }

    /// Straight-alpha RGBA of one device pixel; transparent black outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.device_width() || y >= self.device_height() {
            return [0; 4];
        }
        let stride = self.stride();
        let mut rgba = [0; 4];
        self.read_data(|data| {
            let index = y as usize * stride + x as usize * 4;
            if let Some(bytes) = data.get(index..index + 4) {
                rgba = unpremultiply(bytes);
            }
        });
        rgba
    }

    /// Whole surface as tightly packed straight-alpha RGBA rows.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        let (width, height) = (self.device_width() as usize, self.device_height() as usize);
        let stride = self.stride();
        let mut rgba = Vec::with_capacity(width * height * 4);
        self.read_data(|data| {
            for row in data.chunks(stride).take(height) {
                for px in row[..width * 4].chunks_exact(4) {
                    rgba.extend_from_slice(&unpremultiply(px));
                }
            }
        });
        rgba
    }

    /// Number of pixels with non-zero alpha.
    #[must_use]
    pub fn painted_pixel_count(&self) -> usize {
        let width = self.device_width() as usize;
        let stride = self.stride();
        let mut painted = 0;
        self.read_data(|data| {
            painted = data
                .chunks(stride)
                .flat_map(|row| row[..width * 4].chunks_exact(4))
                .filter(|px| argb(px) >> 24 != 0)
                .count();
        });
        painted
    }

    #[must_use]
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    /// Logical width of the widest line of `text` in the surface font.
    #[must_use]
    pub fn measure_text(&self, text: &str) -> f64 {
        self.measure_text_with(text, &self.font).0
    }

    /// Logical height of all lines of `text` in the surface font.
    #[must_use]
    pub fn measure_text_height(&self, text: &str) -> f64 {
        self.measure_text_with(text, &self.font).1
    }

    pub fn clear(&mut self) {
        self.draw("clear", |context| {
            context.set_operator(Operator::Clear);
            context.paint()
        });
    }

    pub fn fill_rect(&mut self, rect: &RectPrimitive) {
        if rect.validate().is_err() {
            return;
        }
        self.draw("rect", |context| {
            context.rectangle(rect.x, rect.y, rect.width, rect.height);
            apply_color(context, rect.fill_color);
            if rect.border_width > 0.0 {
                context.fill_preserve()?;
                apply_color(context, rect.border_color);
                context.set_line_width(rect.border_width);
                context.stroke()
            } else {
                context.fill()
            }
        });
    }

    /// Strokes a segment with butt caps.
    ///
    /// Axis-aligned segments of odd device width are moved to the pixel
    /// center, so a 1px line at `c` covers exactly device row/column `c`.
    pub fn stroke_line(&mut self, line: &LinePrimitive) {
        if line.validate().is_err() {
            return;
        }
        let dpr = self.dpr;
        let (mut x1, mut y1, mut x2, mut y2) = (line.x1, line.y1, line.x2, line.y2);
        if y1 == y2 {
            y1 = snap_to_pixel(y1, line.stroke_width, dpr);
            y2 = y1;
        }
        if x1 == x2 {
            x1 = snap_to_pixel(x1, line.stroke_width, dpr);
            x2 = x1;
        }
        self.draw("line", |context| {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            context.set_line_cap(LineCap::Butt);
            context.move_to(x1, y1);
            context.line_to(x2, y2);
            context.stroke()
        });
    }

    pub fn fill_circle(&mut self, circle: &CirclePrimitive) {
        if !circle.radius.is_finite()
            || circle.radius <= 0.0
            || !circle.cx.is_finite()
            || !circle.cy.is_finite()
        {
            return;
        }
        self.draw("circle", |context| {
            context.new_path();
            context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
            apply_color(context, circle.fill_color);
            context.fill()
        });
    }

    pub fn fill_area(&mut self, area: &AreaPrimitive) {
        self.fill_polygon(&area.polygon(), area.fill_color);
    }

    /// Even-odd fill of a closed polygon.
    pub fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color) {
        if points.len() < 3 || points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return;
        }
        self.draw("polygon", |context| {
            context.set_fill_rule(FillRule::EvenOdd);
            context.move_to(points[0].0, points[0].1);
            for &(x, y) in &points[1..] {
                context.line_to(x, y);
            }
            context.close_path();
            apply_color(context, color);
            context.fill()
        });
    }

    /// Lays out `text` with Pango and paints it at the aligned anchor.
    pub fn fill_text(&mut self, text: &TextPrimitive) {
        if text.validate().is_err() || text.text.is_empty() {
            return;
        }
        self.draw("text", |context| {
            let layout = pangocairo::functions::create_layout(context);
            layout.set_font_description(Some(&text.font.to_pango()));
            layout.set_alignment(match text.h_align {
                TextHAlign::Left => Alignment::Left,
                TextHAlign::Center => Alignment::Center,
                TextHAlign::Right => Alignment::Right,
            });
            layout.set_text(&text.text);

            let (width, height) = layout.size();
            let width = pango_units(width);
            let height = pango_units(height);
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - width / 2.0,
                TextHAlign::Right => text.x - width,
            };
            let y = match text.v_align {
                TextVAlign::Top => text.y,
                TextVAlign::Middle => text.y - height / 2.0,
                TextVAlign::Bottom => text.y - height,
                TextVAlign::Baseline => text.y - pango_units(layout.baseline()),
            };
            apply_color(context, text.color);
            context.move_to(x, y);
            pangocairo::functions::show_layout(context, &layout);
            Ok(())
        });
    }

    /// Shifts content left so the part right of `start_x + shift_width` lands at `start_x`.
    ///
    /// Everything else is cleared. Arguments are logical pixels.
    pub fn swap_buffer(&mut self, shift_width: f64, start_x: f64) -> ChartResult<()> {
        if !shift_width.is_finite() || !start_x.is_finite() || shift_width < 0.0 || start_x < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "buffer swap needs finite non-negative offsets (shift={shift_width}, start={start_x})"
            )));
        }
        let Some(current) = self.surface.as_ref() else {
            return Ok(());
        };
        let source_x = ((start_x + shift_width) * self.dpr).round();
        let target_x = (start_x * self.dpr).round();
        let (width, height) = (current.width(), current.height());
        let shifted = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to allocate swap buffer", err))?;
        {
            let context = Context::new(&shifted)
                .map_err(|err| map_backend_error("failed to create swap context", err))?;
            context.rectangle(target_x, 0.0, f64::from(width) - target_x, f64::from(height));
            context.clip();
            context
                .set_source_surface(current, target_x - source_x, 0.0)
                .map_err(|err| map_backend_error("failed to set swap source", err))?;
            context
                .paint()
                .map_err(|err| map_backend_error("failed to copy swap buffer", err))?;
        }
        self.surface = Some(shifted);
        Ok(())
    }

    /// Source-over composites `source` so that its logical point
    /// `(source_x, source_y)` lands on this surface's logical point `(dest_x, dest_y)`.
    ///
    /// Rows above `dest_y` are left untouched. Offsets snap to whole device
    /// pixels so scrolled content is never resampled.
    pub fn draw_surface(
        &mut self,
        source: &Self,
        source_x: f64,
        source_y: f64,
        dest_x: f64,
        dest_y: f64,
    ) {
        let Some(source_surface) = source.surface.as_ref() else {
            return;
        };
        let dpr = self.dpr;
        let offset_x = ((dest_x - source_x) * dpr).round();
        let offset_y = ((dest_y - source_y) * dpr).round();
        let ratio = dpr / source.dpr;
        let (width, height) = (
            f64::from(self.device_width()),
            f64::from(self.device_height()),
        );
        self.draw_device("composite", |context| {
            context.rectangle(0.0, (dest_y * dpr).round(), width, height);
            context.clip();
            context.translate(offset_x, offset_y);
            context.scale(ratio, ratio);
            context.set_source_surface(source_surface, 0.0, 0.0)?;
            context.source().set_filter(Filter::Nearest);
            context.paint()
        });
    }

    /// Logical `(width, height)` of `text` laid out in `font`.
    ///
    /// An empty surface measures on a scratch pixel.
    #[must_use]
    pub fn measure_text_with(&self, text: &str, font: &FontSpec) -> (f64, f64) {
        let context = match &self.surface {
            Some(surface) => Context::new(surface),
            None => ImageSurface::create(Format::ARgb32, 1, 1)
                .and_then(|scratch| Context::new(&scratch)),
        };
        let context = match context {
            Ok(context) => context,
            Err(err) => {
                warn!(%err, "cannot create measuring context");
                return (0.0, 0.0);
            }
        };
        let layout = pangocairo::functions::create_layout(&context);
        layout.set_font_description(Some(&font.to_pango()));
        layout.set_text(text);
        let (width, height) = layout.size();
        (pango_units(width), pango_units(height))
    }

    /// Runs `paint` on a fresh context scaled to logical units.
    fn draw(&self, op: &'static str, paint: impl FnOnce(&Context) -> Result<(), cairo::Error>) {
        let dpr = self.dpr;
        self.draw_device(op, |context| {
            context.scale(dpr, dpr);
            paint(context)
        });
    }

    fn draw_device(
        &self,
        op: &'static str,
        paint: impl FnOnce(&Context) -> Result<(), cairo::Error>,
    ) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let result = Context::new(surface).and_then(|context| paint(&context));
        if let Err(err) = result {
            warn!(op, %err, "cairo drawing failed");
        }
    }

    fn stride(&self) -> usize {
        self.surface
            .as_ref()
            .map_or(0, |surface| usize::try_from(surface.stride()).unwrap_or(0))
    }

    fn read_data(&self, read: impl FnOnce(&[u8])) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        if let Err(err) = surface.with_data(read) {
            warn!(%err, "cannot read surface pixels");
        }
    }
}

/// Allocates the backing store; zero-sized or unallocatable surfaces stay empty.
fn create_image(width: f64, height: f64, dpr: f64) -> Option<ImageSurface> {
    let device_width = device_extent(width, dpr);
    let device_height = device_extent(height, dpr);
    if device_width == 0 || device_height == 0 {
        return None;
    }
    ImageSurface::create(Format::ARgb32, device_width, device_height)
        .map_err(|err| error!(%err, device_width, device_height, "cannot allocate surface"))
        .ok()
}

fn sanitize_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 }
}

fn sanitize_extent(logical: f64) -> f64 {
    if logical.is_finite() && logical > 0.0 { logical } else { 0.0 }
}

/// Device pixels needed to hold `logical`, rounded up and capped to cairo's limit.
fn device_extent(logical: f64, dpr: f64) -> i32 {
    let device = (logical * dpr - 1e-9).ceil().max(0.0);
    if device > f64::from(MAX_DEVICE_EXTENT) {
        warn!(logical, dpr, "surface clamped to the cairo size limit");
        return MAX_DEVICE_EXTENT as i32;
    }
    device as i32
}

fn snap_to_pixel(value: f64, stroke_width: f64, dpr: f64) -> f64 {
    let device = (value * dpr).round();
    if (stroke_width * dpr).round() as i64 % 2 == 1 {
        (device + 0.5) / dpr
    } else {
        device / dpr
    }
}

fn pango_units(value: i32) -> f64 {
    f64::from(value) / f64::from(pango::SCALE)
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn argb(px: &[u8]) -> u32 {
    u32::from_ne_bytes([px[0], px[1], px[2], px[3]])
}

/// Cairo's native-endian premultiplied ARGB32 to straight RGBA.
fn unpremultiply(px: &[u8]) -> [u8; 4] {
    let value = argb(px);
    let alpha = value >> 24;
    if alpha == 0 {
        return [0; 4];
    }
    let channel = |shift: u32| (((value >> shift) & 0xff) * 255 + alpha / 2) / alpha;
    [
        channel(16).min(255) as u8,
        channel(8).min(255) as u8,
        channel(0).min(255) as u8,
        alpha as u8,
    ]
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::RasterSurface;
    use crate::render::{
        AreaPrimitive, CirclePrimitive, Color, FontSpec, LinePrimitive, RectPrimitive,
        TextHAlign, TextPrimitive,
    };

    const RED: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn device_size_scales_with_pixel_ratio() {
        let surface = RasterSurface::new(10.0, 4.0, 2.0);
        assert_eq!((surface.device_width(), surface.device_height()), (20, 8));
        assert_eq!(surface.logical_width(), 10.0);
        assert_eq!(surface.to_rgba8().len(), 20 * 8 * 4);
    }

    #[test]
    fn fractional_logical_size_is_kept_and_backing_store_rounds_up() {
        let mut surface = RasterSurface::new(2190.6, 40.2, 1.0);
        assert_eq!(surface.logical_width(), 2190.6);
        assert_eq!(surface.logical_height(), 40.2);
        assert_eq!((surface.device_width(), surface.device_height()), (2191, 41));

        surface.resize(10.5, 3.0, 2.0);
        assert_eq!(surface.logical_width(), 10.5);
        assert_eq!(surface.device_width(), 21);
    }

    #[test]
    fn zero_sized_surface_ignores_drawing() {
        let mut surface = RasterSurface::new(0.0, 10.0, 1.0);
        surface.fill_rect(&RectPrimitive::new(0.0, 0.0, 5.0, 5.0, Color::BLACK));
        surface.fill_circle(&CirclePrimitive::new(1.0, 1.0, 3.0, Color::BLACK));
        assert!(surface.swap_buffer(2.0, 0.0).is_ok());
        assert!(surface.is_empty());
        assert_eq!(surface.painted_pixel_count(), 0);
    }

    #[test]
    fn rect_fill_uses_logical_coordinates() {
        let mut surface = RasterSurface::new(10.0, 10.0, 2.0);
        surface.fill_rect(&RectPrimitive::new(1.0, 1.0, 2.0, 2.0, Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(surface.painted_pixel_count(), 16);
        assert_eq!(surface.pixel(2, 2), RED);
        assert_eq!(surface.pixel(1, 1), [0; 4]);
    }

    #[test]
    fn circle_and_area_paint_inside_their_shape() {
        let mut surface = RasterSurface::new(40.0, 40.0, 1.0);
        surface.fill_circle(&CirclePrimitive::new(10.0, 10.0, 3.0, Color::BLACK));
        assert_eq!(surface.pixel(10, 10)[3], 255);
        assert_eq!(surface.pixel(15, 10)[3], 0);

        surface.fill_area(&AreaPrimitive::new(20.0, 20.0, 30.0, 25.0, 35.0, Color::BLACK));
        assert_eq!(surface.pixel(25, 30)[3], 255);
        assert_eq!(surface.pixel(25, 19)[3], 0);
    }

    #[test]
    fn one_pixel_lines_land_on_their_own_row_and_column() {
        let mut surface = RasterSurface::new(20.0, 20.0, 1.0);
        surface.stroke_line(&LinePrimitive::new(0.0, 10.0, 20.0, 10.0, 1.0, Color::BLACK));
        assert_eq!(surface.pixel(5, 10)[3], 255);
        assert_eq!(surface.pixel(5, 9)[3], 0);
        assert_eq!(surface.pixel(5, 11)[3], 0);

        surface.clear();
        surface.stroke_line(&LinePrimitive::new(7.0, 0.0, 7.0, 20.0, 1.0, Color::BLACK));
        assert_eq!(surface.pixel(7, 4)[3], 255);
        assert_eq!(surface.pixel(6, 4)[3], 0);
        assert_eq!(surface.pixel(8, 4)[3], 0);
    }

    #[test]
    fn even_width_lines_straddle_the_coordinate() {
        let mut surface = RasterSurface::new(20.0, 20.0, 1.0);
        surface.stroke_line(&LinePrimitive::new(0.0, 10.0, 20.0, 10.0, 2.0, Color::BLACK));
        assert_eq!(surface.pixel(5, 9)[3], 255);
        assert_eq!(surface.pixel(5, 10)[3], 255);
        assert_eq!(surface.pixel(5, 11)[3], 0);
    }

    #[test]
    fn text_is_measured_and_painted_by_pango() {
        let mut surface = RasterSurface::new(120.0, 40.0, 1.0);
        let small = surface.measure_text("1000");
        assert!(small > 0.0);
        assert!(surface.measure_text_height("1\n2") > surface.measure_text_height("1"));

        surface.set_font(FontSpec::with_size(22.0));
        assert!(surface.measure_text("1000") > small * 1.5);

        surface.fill_text(&TextPrimitive::new(
            "10",
            2.0,
            30.0,
            FontSpec::with_size(12.0),
            Color::BLACK,
            TextHAlign::Left,
        ));
        assert!(surface.painted_pixel_count() > 0);
    }

    #[test]
    fn swap_buffer_moves_right_part_to_start() {
        let mut surface = RasterSurface::new(30.0, 2.0, 1.0);
        surface.fill_rect(&RectPrimitive::new(25.0, 0.0, 1.0, 2.0, Color::rgb(1.0, 0.0, 0.0)));
        surface.fill_rect(&RectPrimitive::new(3.0, 0.0, 1.0, 2.0, Color::BLACK));
        surface.swap_buffer(10.0, 5.0).expect("swap");
        assert_eq!(surface.pixel(15, 0), RED);
        assert_eq!(surface.pixel(25, 0), [0; 4]);
        assert_eq!(surface.pixel(3, 0), [0; 4]);
        assert!(surface.swap_buffer(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn draw_surface_applies_source_offset() {
        let mut layer = RasterSurface::new(20.0, 4.0, 1.0);
        layer.fill_rect(&RectPrimitive::new(12.0, 0.0, 1.0, 4.0, Color::rgb(1.0, 0.0, 0.0)));
        let mut view = RasterSurface::new(10.0, 4.0, 1.0);
        view.draw_surface(&layer, 5.0, 0.0, 0.0, 0.0);
        assert_eq!(view.pixel(7, 1), RED);
        assert_eq!(view.painted_pixel_count(), 4);
    }

    #[test]
    fn translucent_fill_blends_over_existing_pixels() {
        let mut surface = RasterSurface::new(2.0, 2.0, 1.0);
        surface.fill_rect(&RectPrimitive::new(0.0, 0.0, 2.0, 2.0, Color::WHITE));
        surface.fill_rect(&RectPrimitive::new(
            0.0,
            0.0,
            2.0,
            2.0,
            Color::rgba(0.0, 0.0, 0.0, 0.5),
        ));
        let [red, _, _, alpha] = surface.pixel(0, 0);
        assert_eq!(alpha, 255);
        assert!((126..=129).contains(&red));
    }
}
