#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use std::path::{Path, PathBuf};

use thiserror::Error;

pub const PROCEDURAL_WIDTH: u32 = 256;
pub const PROCEDURAL_HEIGHT: u32 = 128;

/// Soft puffs making up the built-in cloud, as `(cx, cy, radius)` in a space
/// where the bitmap spans `0..2` horizontally and `0..1` vertically.
const PUFFS: [(f32, f32, f32); 6] = [
    (0.55, 0.62, 0.28),
    (0.95, 0.45, 0.38),
    (1.40, 0.58, 0.30),
    (0.80, 0.70, 0.25),
    (1.20, 0.72, 0.25),
    (1.65, 0.70, 0.18),
];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to decode cloud asset {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cloud asset {} has no pixels", path.display())]
    Empty { path: PathBuf },
    #[error("coverage buffer holds {actual} samples, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Single-channel cloud sprite. Each sample is the opacity of the cloud at
/// that pixel; colour comes from the tint at draw time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudBitmap {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl CloudBitmap {
    pub fn new(width: u32, height: u32, coverage: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize;
        if coverage.len() != expected || expected == 0 {
            return Err(AssetError::SizeMismatch {
                expected,
                actual: coverage.len(),
            });
        }
        Ok(Self {
            width,
            height,
            coverage,
        })
    }

    /// The built-in cloud used when no asset is supplied or it fails to load.
    #[must_use]
    pub fn procedural() -> Self {
        let (w, h) = (PROCEDURAL_WIDTH, PROCEDURAL_HEIGHT);
        let aspect = w as f32 / h as f32;
        let mut coverage = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                let nx = (x as f32 + 0.5) / w as f32 * aspect;
                let ny = (y as f32 + 0.5) / h as f32;
                let density: f32 = PUFFS
                    .iter()
                    .map(|&(cx, cy, r)| {
                        let d = ((nx - cx).powi(2) + (ny - cy).powi(2)).sqrt() / r;
                        if d >= 1.0 { 0.0 } else { (1.0 - d * d).powi(2) }
                    })
                    .sum();
                coverage.push((density.min(1.0) * 255.0).round() as u8);
            }
        }
        Self {
            width: w,
            height: h,
            coverage,
        }
    }

    /// Decodes an image file. Opacity is the pixel alpha weighted by its
    /// luminance, so dark backgrounds in opaque assets drop out.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let image = image::open(path).map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image.to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(AssetError::Empty {
                path: path.to_path_buf(),
            });
        }
        let coverage = rgba
            .pixels()
            .map(|pixel| {
                let [r, g, b, a] = pixel.0;
                let luma = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
                (luma * u32::from(a) / 255) as u8
            })
            .collect();
        Self::new(rgba.width(), rgba.height(), coverage)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-neighbour lookup with `u`, `v` in `0.0..1.0`. Outside reads 0.
    #[must_use]
    pub fn sample(&self, u: f32, v: f32) -> u8 {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return 0;
        }
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        self.coverage[(y * self.width + x) as usize]
    }

    /// Mean coverage over a `u`/`v` window, for cells wider than one texel.
    #[must_use]
    pub fn sample_area(&self, u0: f32, v0: f32, u1: f32, v1: f32) -> f32 {
        const STEPS: u8 = 3;
        let mut total = 0.0;
        for iy in 0..STEPS {
            for ix in 0..STEPS {
                let u = lerp_step(u0, u1, ix, STEPS);
                let v = lerp_step(v0, v1, iy, STEPS);
                total += f32::from(self.sample(u, v));
            }
        }
        total / (f32::from(STEPS * STEPS) * 255.0)
    }
}

fn lerp_step(a: f32, b: f32, i: u8, steps: u8) -> f32 {
    a + (b - a) * ((f32::from(i) + 0.5) / f32::from(steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_cloud_is_opaque_in_the_middle_and_clear_at_the_edges() {
        let bitmap = CloudBitmap::procedural();
        assert_eq!(bitmap.width(), PROCEDURAL_WIDTH);
        assert_eq!(bitmap.height(), PROCEDURAL_HEIGHT);
        assert!(bitmap.sample(0.47, 0.5) > 200);
        assert_eq!(bitmap.sample(0.0, 0.0), 0);
        assert_eq!(bitmap.sample(0.99, 0.02), 0);
    }

    #[test]
    fn procedural_cloud_is_deterministic() {
        assert_eq!(CloudBitmap::procedural(), CloudBitmap::procedural());
    }

    #[test]
    fn sampling_outside_the_unit_square_is_transparent() {
        let bitmap = CloudBitmap::new(2, 1, vec![255, 255]).expect("bitmap");
        assert_eq!(bitmap.sample(-0.1, 0.5), 0);
        assert_eq!(bitmap.sample(0.5, 1.0), 0);
        assert_eq!(bitmap.sample(0.75, 0.5), 255);
    }

    #[test]
    fn area_sample_averages_texels() {
        let bitmap = CloudBitmap::new(2, 1, vec![0, 255]).expect("bitmap");
        let mean = bitmap.sample_area(0.0, 0.0, 1.0, 1.0);
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean {mean}");
    }

    #[test]
    fn rejects_mismatched_buffers() {
        let err = CloudBitmap::new(4, 4, vec![0; 3]).unwrap_err();
        assert!(matches!(
            err,
            AssetError::SizeMismatch {
                expected: 16,
                actual: 3
            }
        ));
    }

    #[test]
    fn loads_png_and_weights_alpha_by_luminance() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cloud.png");
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 0, 255]));
        img.save(&path).expect("save png");

        let bitmap = CloudBitmap::load(&path).expect("load");
        assert_eq!((bitmap.width(), bitmap.height()), (2, 1));
        assert_eq!(bitmap.sample(0.25, 0.5), 255);
        assert_eq!(bitmap.sample(0.75, 0.5), 0);
    }

    #[test]
    fn missing_asset_reports_decode_error() {
        let err = CloudBitmap::load(Path::new("/nonexistent/cloud.png")).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }
}
