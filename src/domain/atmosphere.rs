//! Solar altitude + weather code → the colours the whole scene is painted
//! with.

#![allow(clippy::cast_possible_truncation)]

use chrono::{DateTime, Utc};

use crate::domain::{
    color::{Rgb, lerp, lerp_color},
    location::Location,
    solar::solar_altitude_deg,
    weather::{classify_sky_override, has_snow_cover, is_storm_code},
};

pub const MIN_ALTITUDE_DEG: f32 = -18.0;
pub const MAX_ALTITUDE_DEG: f32 = 20.0;
pub const HAZE_ALPHA: f32 = 0.5;
pub const BASE_CONTRAST: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereKeyframe {
    pub angle: f32,
    pub sky_top: Rgb,
    pub sky_mid: Rgb,
    pub sky_bottom: Rgb,
    pub haze_color: Rgb,
    pub haze_opacity: f32,
    pub cloud_tint: Rgb,
    pub light_opacity: f32,
    pub base_brightness: f32,
    pub dark_ui: bool,
}

/// Keyframes ordered by ascending solar altitude: astronomical night,
/// civil twilight, horizon, golden hour, full day.
pub const ATMOSPHERE_PALETTE: [AtmosphereKeyframe; 5] = [
    AtmosphereKeyframe {
        angle: -18.0,
        sky_top: Rgb(15, 32, 39),
        sky_mid: Rgb(23, 45, 53),
        sky_bottom: Rgb(32, 58, 67),
        haze_color: Rgb(32, 58, 67),
        haze_opacity: 0.3,
        cloud_tint: Rgb(20, 40, 50),
        light_opacity: 1.0,
        base_brightness: 0.5,
        dark_ui: true,
    },
    AtmosphereKeyframe {
        angle: -6.0,
        sky_top: Rgb(25, 50, 70),
        sky_mid: Rgb(35, 65, 85),
        sky_bottom: Rgb(45, 80, 100),
        haze_color: Rgb(53, 92, 125),
        haze_opacity: 0.5,
        cloud_tint: Rgb(100, 110, 120),
        light_opacity: 0.8,
        base_brightness: 0.7,
        dark_ui: true,
    },
    AtmosphereKeyframe {
        angle: 0.0,
        sky_top: Rgb(53, 92, 125),
        sky_mid: Rgb(122, 100, 128),
        sky_bottom: Rgb(192, 108, 132),
        haze_color: Rgb(192, 108, 132),
        haze_opacity: 0.6,
        cloud_tint: Rgb(220, 200, 205),
        light_opacity: 0.4,
        base_brightness: 0.8,
        dark_ui: false,
    },
    AtmosphereKeyframe {
        angle: 6.0,
        sky_top: Rgb(60, 100, 140),
        sky_mid: Rgb(130, 160, 180),
        sky_bottom: Rgb(200, 220, 225),
        haze_color: Rgb(196, 224, 229),
        haze_opacity: 0.5,
        cloud_tint: Rgb(245, 245, 250),
        light_opacity: 0.0,
        base_brightness: 1.0,
        dark_ui: false,
    },
    AtmosphereKeyframe {
        angle: 20.0,
        sky_top: Rgb(74, 114, 158),
        sky_mid: Rgb(135, 169, 194),
        sky_bottom: Rgb(196, 224, 229),
        haze_color: Rgb(255, 255, 255),
        haze_opacity: 0.4,
        cloud_tint: Rgb(255, 255, 255),
        light_opacity: 0.0,
        base_brightness: 1.05,
        dark_ui: false,
    },
];

/// Everything the presentation layer needs to paint the sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereState {
    pub sky_top: Rgb,
    pub sky_mid: Rgb,
    pub sky_bottom: Rgb,
    pub haze_color: Rgb,
    pub haze_alpha: f32,
    pub haze_opacity: f32,
    pub cloud_tint: Rgb,
    pub light_opacity: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub dark_ui: bool,
    pub snow_cover: bool,
    pub weather_mix: f32,
    pub solar_altitude_deg: f32,
}

impl Default for AtmosphereState {
    fn default() -> Self {
        compute_atmosphere(MAX_ALTITUDE_DEG, 0)
    }
}

/// The keyframe pair enclosing `angle` plus the position between them.
///
/// `angle` must already be clamped to the palette range.
fn bracket(angle: f32) -> (&'static AtmosphereKeyframe, &'static AtmosphereKeyframe, f32) {
    let (low, high) = ATMOSPHERE_PALETTE
        .windows(2)
        .find(|pair| angle >= pair[0].angle && angle <= pair[1].angle)
        .map_or(
            (&ATMOSPHERE_PALETTE[0], &ATMOSPHERE_PALETTE[4]),
            |pair| (&pair[0], &pair[1]),
        );
    let t = (angle - low.angle) / (high.angle - low.angle);
    (low, high, t)
}

#[must_use]
pub fn compute_atmosphere(solar_altitude_deg: f32, weather_code: u8) -> AtmosphereState {
    let angle = solar_altitude_deg.clamp(MIN_ALTITUDE_DEG, MAX_ALTITUDE_DEG);
    let (low, high, t) = bracket(angle);

    let mut sky_top = lerp_color(low.sky_top, high.sky_top, t);
    let mut sky_mid = lerp_color(low.sky_mid, high.sky_mid, t);
    let mut sky_bottom = lerp_color(low.sky_bottom, high.sky_bottom, t);
    let mut cloud_tint = lerp_color(low.cloud_tint, high.cloud_tint, t);
    let mut haze_opacity = lerp(low.haze_opacity, high.haze_opacity, t);
    let mut brightness = lerp(low.base_brightness, high.base_brightness, t);
    let light_opacity = lerp(low.light_opacity, high.light_opacity, t);

    let mut weather_mix = 0.0;
    if let Some(target) = classify_sky_override(weather_code).target() {
        weather_mix = target.mix;
        // Lower bands take less of the override so the horizon keeps a hint of the sun.
        sky_top = lerp_color(sky_top, target.sky, target.mix);
        sky_mid = lerp_color(sky_mid, target.sky, target.mix * 0.8);
        sky_bottom = lerp_color(sky_bottom, target.sky, target.mix * 0.6);
        if let Some(tint) = target.cloud_tint {
            cloud_tint = tint;
        }
        if let Some(opacity) = target.haze_opacity {
            haze_opacity = opacity;
        }
    }
    if weather_mix > 0.5 {
        brightness *= 0.7;
    }

    let dark_by_sun = (high.dark_ui && t > 0.5) || (low.dark_ui && t < 0.5);

    AtmosphereState {
        sky_top,
        sky_mid,
        sky_bottom,
        haze_color: sky_bottom,
        haze_alpha: HAZE_ALPHA,
        haze_opacity,
        cloud_tint,
        light_opacity,
        brightness,
        contrast: BASE_CONTRAST,
        dark_ui: dark_by_sun || is_storm_code(weather_code),
        snow_cover: has_snow_cover(weather_code),
        weather_mix,
        solar_altitude_deg,
    }
}

/// [`compute_atmosphere`] for a place and instant.
#[must_use]
pub fn atmosphere_at(at: DateTime<Utc>, location: &Location, weather_code: u8) -> AtmosphereState {
    let altitude = solar_altitude_deg(at, location.latitude, location.longitude);
    compute_atmosphere(altitude as f32, weather_code)
}
