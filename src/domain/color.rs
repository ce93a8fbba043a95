#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);

    #[must_use]
    pub fn channels(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }

    /// Multiplies every channel by `factor`, saturating at white.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        let scale = |v: u8| (f32::from(v) * factor).round().clamp(0.0, 255.0) as u8;
        Self(scale(self.0), scale(self.1), scale(self.2))
    }

    /// Pushes channels away from mid-grey, like a CSS `contrast()` filter.
    #[must_use]
    pub fn contrasted(self, amount: f32) -> Self {
        let adjust =
            |v: u8| ((f32::from(v) - 127.5) * amount + 127.5).round().clamp(0.0, 255.0) as u8;
        Self(adjust(self.0), adjust(self.1), adjust(self.2))
    }
}

/// A colour with straight (non-premultiplied) opacity in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    #[must_use]
    pub const fn new(rgb: Rgb, alpha: f32) -> Self {
        Self { rgb, alpha }
    }
}

#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Channelwise [`lerp`], rounded to the nearest integer.
///
/// `t` is deliberately left unclamped; callers clamp whatever drives it.
#[must_use]
pub fn lerp_color(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let channel = |x: u8, y: u8| lerp(f32::from(x), f32::from(y), t).round().clamp(0.0, 255.0) as u8;
    Rgb(channel(a.0, b.0), channel(a.1, b.1), channel(a.2, b.2))
}
