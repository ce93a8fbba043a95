#![allow(clippy::cast_possible_truncation)]

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    app::state::AppState,
    domain::weather::{DebugCategory, weather_label},
    engine::particles::ParticleEngine,
};

const PANEL_WIDTH: u16 = 38;

fn row(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<8}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn clock(hours: f32) -> String {
    #[allow(clippy::cast_sign_loss)]
    let minutes = (hours * 60.0).round() as u32 % (24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn precipitation(particles: &ParticleEngine) -> String {
    if particles.particles.is_empty() {
        "none".to_string()
    } else {
        format!(
            "{} {:?} x{:.1}",
            particles.particles.len(),
            particles.kind(),
            particles.intensity()
        )
    }
}

#[must_use]
pub fn panel_lines(state: &AppState) -> Vec<Line<'static>> {
    let debug = &state.debug;
    let clouds = &state.scene.clouds;

    let mode = match debug.forced_code {
        Some(code) => format!("forced {code} {}", weather_label(code)),
        None => format!("live {}", state.active_code()),
    };
    let time = debug
        .simulated_hours
        .map_or_else(|| "live".to_string(), |hours| format!("{} (sim)", clock(hours)));

    let categories = DebugCategory::ALL
        .iter()
        .enumerate()
        .map(|(idx, category)| format!("{}{}", idx + 1, &category.label()[..1]))
        .collect::<Vec<_>>()
        .join(" ");

    vec![
        row("mode", mode),
        row("time", time),
        row("sun", format!("{:.1}°", state.atmosphere.solar_altitude_deg)),
        row(
            "wind",
            format!(
                "{:.0} km/h @ {:.0}°",
                debug.wind_speed_kmh, debug.wind_direction_deg
            ),
        ),
        row(
            "clouds",
            format!(
                "{}/{}  fog {}",
                clouds.active_count(),
                clouds.density().target_count,
                clouds.fog_alpha()
            ),
        ),
        row("precip", precipitation(&state.scene.particles)),
        row("flashes", state.strikes.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            format!("{categories}  0 live"),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(
            "[ ] time  - + wind  , . dir",
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(
            "n p city  r refresh  d hide  q quit",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ]
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines = panel_lines(state);
    let width = PANEL_WIDTH.min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let panel = Rect {
        x: area.right().saturating_sub(width),
        y: area.bottom().saturating_sub(height),
        width,
        height,
    };

    frame.render_widget(Clear, panel);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(Color::White).bg(Color::Black))
            .block(Block::default().borders(Borders::ALL).title(" debug ")),
        panel,
    );
}
