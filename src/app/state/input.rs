use super::*;

const TIME_STEP_MINUTES: i32 = 15;
const WIND_SPEED_STEP: f32 = 5.0;
const WIND_DIRECTION_STEP: f32 = 15.0;

impl AppState {
    pub(super) async fn handle_input(
        &mut self,
        event: Event,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, tx).await?,
            Event::Resize(cols, rows) => self.resize(cols, rows),
            _ => {}
        }
        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                tx.send(AppEvent::Quit).await?;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                tx.send(AppEvent::Quit).await?;
            }
            KeyCode::Char('r') => self.start_fetch(tx),
            KeyCode::Char('d') => self.debug_panel_open = !self.debug_panel_open,
            KeyCode::Char('n') => self.change_city(1, tx),
            KeyCode::Char('p') => self.change_city(-1, tx),
            KeyCode::Char('0') => self.reset_debug(tx),
            KeyCode::Char(digit @ '1'..='7') => {
                let idx = (digit as usize) - ('1' as usize);
                self.cycle_category(DebugCategory::ALL[idx]);
            }
            KeyCode::Char('[') => self.shift_simulated_time(-TIME_STEP_MINUTES),
            KeyCode::Char(']') => self.shift_simulated_time(TIME_STEP_MINUTES),
            KeyCode::Char('-') => {
                self.set_debug_wind_speed(self.debug.wind_speed_kmh - WIND_SPEED_STEP);
            }
            KeyCode::Char('+' | '=') => {
                self.set_debug_wind_speed(self.debug.wind_speed_kmh + WIND_SPEED_STEP);
            }
            KeyCode::Char(',') => {
                self.set_debug_wind_direction(self.debug.wind_direction_deg - WIND_DIRECTION_STEP);
            }
            KeyCode::Char('.') => {
                self.set_debug_wind_direction(self.debug.wind_direction_deg + WIND_DIRECTION_STEP);
            }
            _ => {}
        }
        Ok(())
    }
}
