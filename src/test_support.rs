use crate::{
    domain::color::{Rgb, Rgba},
    engine::{
        bitmap::CloudBitmap,
        surface::{DrawRect, Point, Surface},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawOp {
    Clear,
    Bitmap {
        dest: DrawRect,
        opacity: f32,
        tint: Rgb,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    Fill(Rgba),
}

/// Surface that records draw calls instead of rasterising them.
#[derive(Debug)]
pub(crate) struct RecordingSurface {
    width: f32,
    height: f32,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub(crate) fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn draw_bitmap(&mut self, _bitmap: &CloudBitmap, dest: DrawRect, opacity: f32, tint: Rgb) {
        self.ops.push(DrawOp::Bitmap {
            dest,
            opacity,
            tint,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, line_width: f32, color: Rgba) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            width: line_width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Fill(color));
    }
}

pub(crate) fn test_cli(args: &[&str]) -> crate::cli::Cli {
    use clap::Parser;

    crate::cli::Cli::parse_from(std::iter::once("weather-backdrop").chain(args.iter().copied()))
}
