pub mod backdrop;
pub mod canvas;
pub mod debug_panel;
pub mod hud;
pub mod palette;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::{
    app::state::AppState,
    resilience::freshness::FreshnessState,
    ui::backdrop::{Backdrop, paint_sky, skyline_seed},
};

/// Below this the backdrop is drawn alone.
const MIN_OVERLAY_WIDTH: u16 = 24;
const MIN_OVERLAY_HEIGHT: u16 = 6;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let sky = paint_sky(
        &state.atmosphere,
        Some(skyline_seed(&state.city().prefix)),
        usize::from(area.width),
        usize::from(area.height) * 2,
    );
    frame.render_widget(
        Backdrop {
            sky: &sky,
            layer: &state.canvas,
            capability: state.color_capability,
        },
        area,
    );

    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    hud::render(frame, area, state);
    render_status_badge(frame, area, state);
    if state.debug_panel_open {
        debug_panel::render(frame, area, state);
    }
}

fn render_status_badge(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.debug.is_forcing() {
        return;
    }
    let label = match state.refresh_meta.state {
        FreshnessState::Fresh => None,
        FreshnessState::Stale => Some(("⚠ stale", Color::Yellow)),
        FreshnessState::Offline => Some(("⚠ offline", Color::LightRed)),
    };

    if let Some((text, color)) = label {
        #[allow(clippy::cast_possible_truncation)]
        let width = (text.chars().count() as u16 + 2).min(area.width);
        let badge_area = Rect {
            x: area.right().saturating_sub(width + 1),
            y: area.y,
            width,
            height: 1,
        };
        let badge = Paragraph::new(Line::from(text)).style(
            Style::default()
                .fg(color)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(badge, badge_area);
    }
}
