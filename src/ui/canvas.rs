#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

//! Terminal-backed [`Surface`].
//!
//! Each terminal cell is 8×16 virtual pixels and holds two raster pixels
//! drawn with an upper half block, so one raster pixel is 8×8 virtual
//! pixels. The canvas keeps a premultiplied RGBA layer that is composited
//! over the sky when the frame is rendered.

use crate::{
    domain::color::{Rgb, Rgba},
    engine::{
        bitmap::CloudBitmap,
        surface::{DrawRect, Point, Surface},
    },
};

pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;
pub const RASTER_PX: f32 = 8.0;

/// Primitives thinner than a raster pixel still leave a faint trace.
const MIN_COVERAGE: f32 = 0.35;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LayerPixel {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl LayerPixel {
    fn blend(&mut self, rgb: Rgb, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let keep = 1.0 - alpha;
        self.r = f32::from(rgb.0) * alpha + self.r * keep;
        self.g = f32::from(rgb.1) * alpha + self.g * keep;
        self.b = f32::from(rgb.2) * alpha + self.b * keep;
        self.a = alpha + self.a * keep;
    }

    fn over(self, base: Rgb) -> Rgb {
        let keep = 1.0 - self.a;
        let channel = |layer: f32, under: u8| {
            (layer + f32::from(under) * keep).round().clamp(0.0, 255.0) as u8
        };
        Rgb(
            channel(self.r, base.0),
            channel(self.g, base.1),
            channel(self.b, base.2),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct CellCanvas {
    cols: u16,
    rows: u16,
    layer: Vec<LayerPixel>,
    scratch: Vec<usize>,
}

impl CellCanvas {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut canvas = Self::default();
        canvas.resize(cols, rows);
        canvas
    }

    /// Returns true when the size changed.
    pub fn resize(&mut self, cols: u16, rows: u16) -> bool {
        if cols == self.cols && rows == self.rows {
            return false;
        }
        self.cols = cols;
        self.rows = rows;
        self.layer = vec![LayerPixel::default(); self.raster_width() * self.raster_height()];
        true
    }

    #[must_use]
    pub fn cols(&self) -> u16 {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    #[must_use]
    pub fn raster_width(&self) -> usize {
        usize::from(self.cols)
    }

    #[must_use]
    pub fn raster_height(&self) -> usize {
        usize::from(self.rows) * 2
    }

    /// Layer opacity at a raster pixel, mostly for inspection in tests.
    #[must_use]
    pub fn coverage_at(&self, x: usize, y: usize) -> f32 {
        self.index(x as i64, y as i64)
            .map_or(0.0, |idx| self.layer[idx].a)
    }

    /// Composites the layer at raster pixel `(x, y)` over `base`.
    #[must_use]
    pub fn composite(&self, x: usize, y: usize, base: Rgb) -> Rgb {
        self.index(x as i64, y as i64)
            .map_or(base, |idx| self.layer[idx].over(base))
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let (w, h) = (self.raster_width() as i64, self.raster_height() as i64);
        ((0..w).contains(&x) && (0..h).contains(&y)).then(|| (y * w + x) as usize)
    }

    fn blend_at(&mut self, x: i64, y: i64, rgb: Rgb, alpha: f32) {
        if let Some(idx) = self.index(x, y) {
            self.layer[idx].blend(rgb, alpha);
        }
    }

    fn raster_range(start: f32, end: f32, limit: usize) -> std::ops::Range<i64> {
        let lo = (start / RASTER_PX).floor().max(0.0) as i64;
        let hi = (end / RASTER_PX).ceil().min(limit as f32) as i64;
        lo..hi.max(lo)
    }
}

impl Surface for CellCanvas {
    fn width(&self) -> f32 {
        f32::from(self.cols) * CELL_WIDTH_PX
    }

    fn height(&self) -> f32 {
        f32::from(self.rows) * CELL_HEIGHT_PX
    }

    fn clear(&mut self) {
        self.layer.fill(LayerPixel::default());
    }

    fn draw_bitmap(&mut self, bitmap: &CloudBitmap, dest: DrawRect, opacity: f32, tint: Rgb) {
        if dest.width <= 0.0 || dest.height <= 0.0 || opacity <= 0.0 {
            return;
        }
        let xs = Self::raster_range(dest.x, dest.x + dest.width, self.raster_width());
        let ys = Self::raster_range(dest.y, dest.y + dest.height, self.raster_height());
        for py in ys {
            let top = py as f32 * RASTER_PX;
            let v0 = (top - dest.y) / dest.height;
            let v1 = (top + RASTER_PX - dest.y) / dest.height;
            for px in xs.clone() {
                let left = px as f32 * RASTER_PX;
                let u0 = (left - dest.x) / dest.width;
                let u1 = (left + RASTER_PX - dest.x) / dest.width;
                let coverage = bitmap.sample_area(u0, v0, u1, v1);
                if coverage > 0.0 {
                    self.blend_at(px, py, tint, opacity * coverage);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, line_width: f32, color: Rgba) {
        let alpha = color.alpha * (line_width / RASTER_PX).clamp(MIN_COVERAGE, 1.0);
        let (fx, fy) = (from.x / RASTER_PX, from.y / RASTER_PX);
        let (tx, ty) = (to.x / RASTER_PX, to.y / RASTER_PX);
        let steps = ((tx - fx).abs().max((ty - fy).abs()) * 2.0).ceil().max(1.0) as usize;

        let mut touched = std::mem::take(&mut self.scratch);
        touched.clear();
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = (fx + (tx - fx) * t).floor() as i64;
            let y = (fy + (ty - fy) * t).floor() as i64;
            if let Some(idx) = self.index(x, y) {
                touched.push(idx);
            }
        }
        touched.sort_unstable();
        touched.dedup();
        for &idx in &touched {
            self.layer[idx].blend(color.rgb, alpha);
        }
        self.scratch = touched;
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        let r = radius / RASTER_PX;
        let (cx, cy) = (center.x / RASTER_PX, center.y / RASTER_PX);
        if r < 0.5 {
            let alpha = color.alpha * (2.0 * r).clamp(MIN_COVERAGE, 1.0);
            self.blend_at(cx.floor() as i64, cy.floor() as i64, color.rgb, alpha);
            return;
        }
        for py in (cy - r).floor() as i64..=(cy + r).ceil() as i64 {
            for px in (cx - r).floor() as i64..=(cx + r).ceil() as i64 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.blend_at(px, py, color.rgb, color.alpha);
                }
            }
        }
    }

    fn fill(&mut self, color: Rgba) {
        for pixel in &mut self.layer {
            pixel.blend(color.rgb, color.alpha);
        }
    }
}
