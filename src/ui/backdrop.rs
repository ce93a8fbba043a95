#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

//! Paints the sky behind the animated layer and composites both into
//! half-block cells.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::{
    domain::{
        atmosphere::AtmosphereState,
        color::{Rgb, lerp_color},
    },
    ui::{
        canvas::CellCanvas,
        palette::{ColorCapability, quantize},
    },
};

/// Where the haze band starts, as a fraction of the height.
const HAZE_START: f32 = 0.65;
const SKYLINE_MAX_HEIGHT: f32 = 0.22;
const BLOCK_WIDTH: usize = 4;
const WINDOW_LIGHT: Rgb = Rgb(255, 196, 110);
const SNOW: Rgb = Rgb(235, 240, 245);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyRaster {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl SkyRaster {
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Rgb::BLACK
        }
    }
}

/// Paints gradient, haze and, when `skyline_seed` is set, a city skyline at
/// raster resolution. Brightness and contrast apply to the whole picture.
#[must_use]
pub fn paint_sky(
    atmosphere: &AtmosphereState,
    skyline_seed: Option<u64>,
    width: usize,
    height: usize,
) -> SkyRaster {
    let skyline = skyline_seed.map(|seed| Skyline::new(seed, width, height));
    let haze_strength = atmosphere.haze_alpha * atmosphere.haze_opacity;

    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        let t = gradient_ratio(y, height);
        let mut row = if t < 0.5 {
            lerp_color(atmosphere.sky_top, atmosphere.sky_mid, t * 2.0)
        } else {
            lerp_color(atmosphere.sky_mid, atmosphere.sky_bottom, (t - 0.5) * 2.0)
        };
        if t > HAZE_START {
            let depth = (t - HAZE_START) / (1.0 - HAZE_START);
            row = lerp_color(row, atmosphere.haze_color, depth * haze_strength);
        }

        for x in 0..width {
            let base = skyline
                .as_ref()
                .and_then(|skyline| skyline.pixel(x, y, atmosphere))
                .unwrap_or(row);
            pixels.push(
                base.scaled(atmosphere.brightness)
                    .contrasted(atmosphere.contrast),
            );
        }
    }

    SkyRaster {
        width,
        height,
        pixels,
    }
}

fn gradient_ratio(y: usize, height: usize) -> f32 {
    if height <= 1 {
        0.0
    } else {
        y as f32 / (height - 1) as f32
    }
}

struct Skyline {
    seed: u64,
    height: usize,
    roofs: Vec<usize>,
}

impl Skyline {
    fn new(seed: u64, width: usize, height: usize) -> Self {
        let max = height as f32 * SKYLINE_MAX_HEIGHT;
        let blocks = width.div_ceil(BLOCK_WIDTH);
        let roofs = (0..blocks)
            .map(|block| {
                let u = unit(mix(seed, block as u64, 0));
                let tall = (max * (0.3 + 0.7 * u)).round() as usize;
                height.saturating_sub(tall)
            })
            .collect();
        Self {
            seed,
            height,
            roofs,
        }
    }

    fn pixel(&self, x: usize, y: usize, atmosphere: &AtmosphereState) -> Option<Rgb> {
        let roof = *self.roofs.get(x / BLOCK_WIDTH)?;
        if y < roof || y >= self.height {
            return None;
        }
        let wall = atmosphere.sky_bottom.scaled(0.25);
        if y == roof {
            return Some(if atmosphere.snow_cover {
                SNOW
            } else {
                wall
            });
        }
        let column = x % BLOCK_WIDTH;
        let floor = y - roof;
        let window = (column == 1 || column == 2) && floor % 2 == 0;
        if window && mix(self.seed, x as u64, y as u64) % 10 < 4 {
            return Some(lerp_color(wall, WINDOW_LIGHT, atmosphere.light_opacity));
        }
        Some(wall)
    }
}

fn mix(seed: u64, a: u64, b: u64) -> u64 {
    let mut z = seed
        .wrapping_add(a.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(b.wrapping_mul(0xC2B2_AE3D_27D4_EB4F));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn unit(value: u64) -> f32 {
    (value >> 40) as f32 / (1u64 << 24) as f32
}

/// Stable skyline seed for a location prefix.
#[must_use]
pub fn skyline_seed(prefix: &str) -> u64 {
    prefix
        .bytes()
        .fold(0xCBF2_9CE4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01B3)
        })
}

/// Sky plus animated layer, two raster pixels per cell.
pub struct Backdrop<'a> {
    pub sky: &'a SkyRaster,
    pub layer: &'a CellCanvas,
    pub capability: ColorCapability,
}

impl Widget for Backdrop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let (x, upper_y) = (usize::from(col), usize::from(row) * 2);
                let upper = self.layer.composite(x, upper_y, self.sky.pixel(x, upper_y));
                let lower = self
                    .layer
                    .composite(x, upper_y + 1, self.sky.pixel(x, upper_y + 1));
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('▀')
                        .set_fg(quantize(upper, self.capability))
                        .set_bg(quantize(lower, self.capability));
                }
            }
        }
    }
}
