//! Weather-code classification tables.
//!
//! Every lookup here is a total function over `u8`: rules are scanned in
//! order and the first match wins, with an explicit fallback when nothing
//! matches.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::domain::color::Rgb;

/// The conditions that drive every derived visual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub weather_code: u8,
    pub wind_speed_kmh: f32,
    pub wind_direction_deg: f32,
    pub temperature_c: f32,
    pub is_day: bool,
}

impl WeatherSnapshot {
    /// Synthetic conditions used when weather is forced from the debug surface.
    #[must_use]
    pub fn forced(code: u8, wind_speed_kmh: f32, wind_direction_deg: f32) -> Self {
        Self {
            weather_code: code,
            wind_speed_kmh,
            wind_direction_deg,
            temperature_c: 15.0,
            is_day: true,
        }
    }
}

pub const STORM_CODES: [u8; 3] = [95, 96, 99];
const SNOW_COVER_CODES: [u8; 6] = [71, 73, 75, 77, 85, 86];

#[must_use]
pub fn is_storm_code(code: u8) -> bool {
    STORM_CODES.contains(&code)
}

/// Whether the ground should be drawn snow-covered.
#[must_use]
pub fn has_snow_cover(code: u8) -> bool {
    SNOW_COVER_CODES.contains(&code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecipKind {
    None,
    Drizzle,
    Rain,
    Snow,
    Hail,
}

impl PrecipKind {
    #[must_use]
    pub fn base_count(self) -> usize {
        match self {
            Self::None => 0,
            Self::Rain => 600,
            Self::Drizzle => 1000,
            Self::Snow => 250,
            Self::Hail => 400,
        }
    }

    #[must_use]
    pub fn is_streak(self) -> bool {
        matches!(self, Self::Rain | Self::Drizzle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipProfile {
    pub kind: PrecipKind,
    pub intensity: f32,
}

impl PrecipProfile {
    pub const NONE: Self = Self {
        kind: PrecipKind::None,
        intensity: 0.0,
    };

    /// Pool size for this profile, rounded to the nearest particle so that
    /// float noise in `base × intensity` never adds or drops one.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    #[must_use]
    pub fn target_count(self) -> usize {
        (self.kind.base_count() as f32 * self.intensity.max(0.0)).round() as usize
    }
}

struct PrecipRule {
    codes: RangeInclusive<u8>,
    profile: PrecipProfile,
}

const fn precip(codes: RangeInclusive<u8>, kind: PrecipKind, intensity: f32) -> PrecipRule {
    PrecipRule {
        codes,
        profile: PrecipProfile { kind, intensity },
    }
}

// Hail codes 96/99 must precede the open-ended thunderstorm rule.
const PRECIP_RULES: &[PrecipRule] = &[
    precip(51..=55, PrecipKind::Drizzle, 0.5),
    precip(61..=65, PrecipKind::Rain, 0.8),
    precip(80..=82, PrecipKind::Rain, 1.2),
    precip(71..=75, PrecipKind::Snow, 0.8),
    precip(85..=86, PrecipKind::Snow, 1.2),
    precip(77..=77, PrecipKind::Hail, 1.0),
    precip(96..=96, PrecipKind::Hail, 1.0),
    precip(99..=99, PrecipKind::Hail, 1.0),
    precip(95..=u8::MAX, PrecipKind::Rain, 1.5),
];

#[must_use]
pub fn classify_precipitation(code: u8) -> PrecipProfile {
    PRECIP_RULES
        .iter()
        .find_map(|rule| rule.codes.contains(&code).then_some(rule.profile))
        .unwrap_or(PrecipProfile::NONE)
}

/// Target cloud population for a weather code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudDensity {
    pub target_count: usize,
    pub scale_min: f32,
    pub scale_max: f32,
    pub foggy: bool,
}

const fn density(target_count: usize, scale_min: f32, scale_max: f32) -> CloudDensity {
    CloudDensity {
        target_count,
        scale_min,
        scale_max,
        foggy: false,
    }
}

const CLEAR_DENSITY: CloudDensity = density(0, 1.0, 2.0);
const FOG_DENSITY: CloudDensity = CloudDensity {
    foggy: true,
    ..CLEAR_DENSITY
};
const DEFAULT_DENSITY: CloudDensity = density(4, 1.0, 2.0);

const DENSITY_RULES: &[(&[u8], CloudDensity)] = &[
    (&[0], CLEAR_DENSITY),
    (&[1], density(3, 0.5, 1.0)),
    (&[2], density(5, 0.8, 1.5)),
    (&[3, 51, 61, 63, 65, 71, 80, 81, 82], density(8, 1.5, 2.5)),
    (&[45, 48], FOG_DENSITY),
    (&STORM_CODES, density(12, 2.0, 3.5)),
];

#[must_use]
pub fn cloud_density(code: u8) -> CloudDensity {
    DENSITY_RULES
        .iter()
        .find_map(|(codes, density)| codes.contains(&code).then_some(*density))
        .unwrap_or(DEFAULT_DENSITY)
}

/// How strongly bad weather repaints the solar sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyOverride {
    Storm,
    OvercastPrecip,
    Fog,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideTarget {
    pub sky: Rgb,
    pub mix: f32,
    pub cloud_tint: Option<Rgb>,
    pub haze_opacity: Option<f32>,
}

impl SkyOverride {
    #[must_use]
    pub fn target(self) -> Option<OverrideTarget> {
        match self {
            Self::Storm => Some(OverrideTarget {
                sky: Rgb(40, 35, 60),
                mix: 0.85,
                cloud_tint: Some(Rgb(30, 30, 40)),
                haze_opacity: None,
            }),
            Self::OvercastPrecip => Some(OverrideTarget {
                sky: Rgb(100, 115, 125),
                mix: 0.8,
                cloud_tint: Some(Rgb(180, 190, 200)),
                haze_opacity: Some(0.8),
            }),
            Self::Fog => Some(OverrideTarget {
                sky: Rgb(180, 190, 200),
                mix: 0.9,
                cloud_tint: None,
                haze_opacity: Some(1.0),
            }),
            Self::None => None,
        }
    }
}

// Showers (80-86) are absent on purpose: they keep the sun-driven palette.
const OVERRIDE_RULES: &[(&[u8], SkyOverride)] = &[
    (&STORM_CODES, SkyOverride::Storm),
    (
        &[3, 51, 53, 55, 61, 63, 65, 66, 67, 71, 73, 75, 77],
        SkyOverride::OvercastPrecip,
    ),
    (&[45, 48], SkyOverride::Fog),
];

#[must_use]
pub fn classify_sky_override(code: u8) -> SkyOverride {
    OVERRIDE_RULES
        .iter()
        .find_map(|(codes, class)| codes.contains(&code).then_some(*class))
        .unwrap_or(SkyOverride::None)
}

/// Groups of codes the debug surface steps through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCategory {
    Clouds,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Showers,
    Storm,
}

impl DebugCategory {
    pub const ALL: [Self; 7] = [
        Self::Clouds,
        Self::Fog,
        Self::Drizzle,
        Self::Rain,
        Self::Snow,
        Self::Showers,
        Self::Storm,
    ];

    #[must_use]
    pub fn codes(self) -> &'static [u8] {
        match self {
            Self::Clouds => &[0, 1, 2, 3],
            Self::Fog => &[45, 48],
            Self::Drizzle => &[51, 53, 55, 56, 57],
            Self::Rain => &[61, 63, 65, 66, 67],
            Self::Snow => &[71, 73, 75, 77],
            Self::Showers => &[80, 81, 82, 85, 86],
            Self::Storm => &STORM_CODES,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Clouds => "Sky",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Showers => "Showers",
            Self::Storm => "Storms",
        }
    }

    /// Code that follows `current` in this category, wrapping around.
    #[must_use]
    pub fn next_code(self, current: Option<u8>) -> u8 {
        let codes = self.codes();
        let next = current
            .and_then(|code| codes.iter().position(|c| *c == code))
            .map_or(0, |idx| (idx + 1) % codes.len());
        codes[next]
    }
}

const WEATHER_LABELS: &[(u8, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (56, "Light freezing drizzle"),
    (57, "Dense freezing drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (66, "Light freezing rain"),
    (67, "Heavy freezing rain"),
    (71, "Slight snowfall"),
    (73, "Moderate snowfall"),
    (75, "Heavy snowfall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm + light hail"),
    (99, "Thunderstorm + heavy hail"),
];

#[must_use]
pub fn weather_label(code: u8) -> &'static str {
    WEATHER_LABELS
        .iter()
        .find_map(|(candidate, label)| (*candidate == code).then_some(*label))
        .unwrap_or("Variable")
}

#[must_use]
pub fn weather_icon(code: u8, is_day: bool) -> &'static str {
    match code {
        0 if is_day => "☀",
        0 => "☾",
        1 if is_day => "🌤",
        1..=3 => "☁",
        45 | 48 => "≡",
        51..=57 | 61..=67 => "☂",
        71..=77 => "❄",
        80..=82 => "☔",
        85 | 86 => "❆",
        95..=u8::MAX => "⚡",
        _ => "·",
    }
}
