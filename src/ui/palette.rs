#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use ratatui::style::Color;

use crate::{cli::ColorArg, domain::color::Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

#[must_use]
pub fn detect_color_capability(mode: ColorArg) -> ColorCapability {
    let term = std::env::var("TERM").ok();
    let colorterm = std::env::var("COLORTERM").ok();
    let no_color = std::env::var("NO_COLOR").ok();
    detect_color_capability_from(
        mode,
        term.as_deref(),
        colorterm.as_deref(),
        no_color.as_deref(),
    )
}

/// `--color always` still honours what the terminal advertises; it only
/// ignores `NO_COLOR`.
#[must_use]
pub fn detect_color_capability_from(
    mode: ColorArg,
    term: Option<&str>,
    colorterm: Option<&str>,
    no_color: Option<&str>,
) -> ColorCapability {
    let term = term.unwrap_or_default().to_lowercase();
    let colorterm = colorterm.unwrap_or_default().to_lowercase();

    let forced_basic = mode == ColorArg::Never
        || (mode == ColorArg::Auto && no_color.is_some_and(|value| !value.is_empty()))
        || term == "dumb";
    if forced_basic {
        return ColorCapability::Basic16;
    }
    if advertises_truecolor(&colorterm) || advertises_truecolor(&term) {
        return ColorCapability::TrueColor;
    }
    if term.contains("256color") {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

fn advertises_truecolor(value: &str) -> bool {
    value.contains("truecolor") || value.contains("24bit") || value.ends_with("direct")
}

/// Maps a raster colour onto what the terminal can show.
#[must_use]
pub fn quantize(rgb: Rgb, capability: ColorCapability) -> Color {
    let Rgb(r, g, b) = rgb;
    match capability {
        ColorCapability::TrueColor => Color::Rgb(r, g, b),
        ColorCapability::Xterm256 => {
            let level = |v: u8| (f32::from(v) / 255.0 * 5.0).round() as u8;
            Color::Indexed(16 + 36 * level(r) + 6 * level(g) + level(b))
        }
        ColorCapability::Basic16 => nearest_basic16(rgb),
    }
}

// (upper hue bound, dim, bright)
const HUE_BANDS: [(f32, Color, Color); 6] = [
    (30.0, Color::Red, Color::LightRed),
    (90.0, Color::Yellow, Color::LightYellow),
    (150.0, Color::Green, Color::LightGreen),
    (210.0, Color::Cyan, Color::LightCyan),
    (270.0, Color::Blue, Color::LightBlue),
    (330.0, Color::Magenta, Color::LightMagenta),
];

fn nearest_basic16(rgb: Rgb) -> Color {
    let [r, g, b] = rgb.channels().map(|v| f32::from(v) / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let light = (max + min) / 2.0;

    if delta < 0.08 {
        return match light {
            l if l < 0.20 => Color::Black,
            l if l < 0.40 => Color::DarkGray,
            l if l < 0.72 => Color::Gray,
            _ => Color::White,
        };
    }

    let hue = if (max - r).abs() < f32::EPSILON {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if (max - g).abs() < f32::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let bright = light >= 0.55;
    let (_, dim, lit) = HUE_BANDS
        .iter()
        .find(|(upper, _, _)| hue < *upper)
        .copied()
        .unwrap_or(HUE_BANDS[0]);
    if bright { lit } else { dim }
}
