#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::{
    app::state::AppState,
    domain::{
        color::Rgb,
        weather::{weather_icon, weather_label},
    },
    ui::palette::quantize,
};

const LIGHT_TEXT: Rgb = Rgb(236, 240, 244);
const DARK_TEXT: Rgb = Rgb(24, 30, 42);
const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Eight-point compass name for a bearing.
#[must_use]
pub fn compass_point(degrees: f32) -> &'static str {
    let sector = (degrees.rem_euclid(360.0) / 45.0).round() as usize % COMPASS.len();
    COMPASS[sector]
}

#[must_use]
pub fn hud_lines(state: &AppState) -> Vec<Line<'static>> {
    let text = Style::default().fg(quantize(
        if state.atmosphere.dark_ui {
            LIGHT_TEXT
        } else {
            DARK_TEXT
        },
        state.color_capability,
    ));

    let mut lines = vec![Line::from(Span::styled(
        state.city().name.clone(),
        text.add_modifier(Modifier::BOLD),
    ))];

    match state.applied_weather {
        Some(weather) => {
            let code = weather.weather_code;
            lines.push(Line::from(Span::styled(
                format!(
                    "{} {:.0}°C  {}",
                    weather_icon(code, weather.is_day),
                    weather.temperature_c,
                    weather_label(code)
                ),
                text,
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "wind {:.0} km/h {}",
                    weather.wind_speed_kmh,
                    compass_point(weather.wind_direction_deg)
                ),
                text,
            )));
            if state.debug.is_forcing() {
                lines.push(Line::from(Span::styled(
                    "forced",
                    text.add_modifier(Modifier::ITALIC),
                )));
            }
        }
        None if state.last_error.is_some() => {
            lines.push(Line::from(Span::styled("weather unavailable", text)));
        }
        None => lines.push(Line::from(Span::styled("fetching weather…", text))),
    }
    lines
}

/// Draws the HUD text straight into the buffer so the backdrop keeps its
/// colours around the glyphs.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines = hud_lines(state);
    let width = area.width.saturating_sub(4);
    let buf = frame.buffer_mut();
    for (row, line) in lines.iter().enumerate() {
        let y = area.y + 1 + row as u16;
        if y >= area.bottom() {
            break;
        }
        buf.set_line(area.x + 2, y, line, width);
    }
}
