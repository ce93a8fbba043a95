#![allow(dead_code)]

use clap::Parser;
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
use weather_backdrop::{
    app::state::AppState, cli::Cli, domain::weather::WeatherSnapshot, ui,
    ui::palette::ColorCapability,
};

/// Nothing listens here, so fetches fail fast instead of reaching the network.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("weather-backdrop").chain(args.iter().copied()))
}

pub fn offline_cli(args: &[&str]) -> Cli {
    let mut all = vec!["--forecast-url", UNREACHABLE, "--seed", "7"];
    all.extend_from_slice(args);
    cli(&all)
}

pub fn snapshot(weather_code: u8) -> WeatherSnapshot {
    WeatherSnapshot {
        weather_code,
        wind_speed_kmh: 18.0,
        wind_direction_deg: 225.0,
        temperature_c: 7.0,
        is_day: true,
    }
}

pub fn state_with(args: &[&str], width: u16, height: u16) -> AppState {
    let mut state = AppState::new(&offline_cli(args));
    state.color_capability = ColorCapability::TrueColor;
    state.resize(width, height);
    state
}

pub fn render_buffer(state: &AppState, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal
        .draw(|frame| ui::render(frame, state))
        .expect("draw");
    terminal.backend().buffer().clone()
}

/// Overlay text only: half-block backdrop cells read as blanks and blank
/// rows are dropped.
pub fn render_text(state: &AppState, width: u16, height: u16) -> String {
    let buffer = render_buffer(state, width, height);
    let mut lines = Vec::new();
    for y in 0..height {
        let mut line = String::new();
        for x in 0..width {
            line.push_str(buffer[(x, y)].symbol());
        }
        let line = line.replace('▀', " ");
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    lines.join("\n")
}
