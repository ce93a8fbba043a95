use crate::{
    domain::color::{Rgb, Rgba},
    engine::bitmap::CloudBitmap,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Destination rectangle in surface pixels. May extend past the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The shared drawing canvas every layer paints into.
///
/// Coordinates are in surface pixels with the origin at the top-left. The
/// render loop clears the surface once per frame; layers never clear it
/// themselves.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self);
    /// Blits `bitmap` stretched to `dest`, its coverage tinted with `tint`.
    fn draw_bitmap(&mut self, bitmap: &CloudBitmap, dest: DrawRect, opacity: f32, tint: Rgb);
    fn stroke_line(&mut self, from: Point, to: Point, line_width: f32, color: Rgba);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba);
    /// Composites `color` over the whole surface.
    fn fill(&mut self, color: Rgba);
}
