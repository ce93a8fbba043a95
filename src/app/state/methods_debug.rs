use super::*;

/// Simulated time starts here the first time the clock keys are used.
const SIMULATION_START_HOURS: f32 = 12.0;
const MAX_DEBUG_WIND_KMH: f32 = 120.0;

impl AppState {
    /// Drives the visuals from a synthetic snapshot until [`Self::reset_debug`].
    pub fn force_weather(&mut self, code: u8) {
        self.debug.forced_code = Some(code);
        info!(code, label = weather_label(code), "weather forced");
        self.apply_weather_data(WeatherSnapshot::forced(
            code,
            self.debug.wind_speed_kmh,
            self.debug.wind_direction_deg,
        ));
    }

    /// Back to live weather and the real clock.
    pub fn reset_debug(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let was_forcing = self.debug.is_forcing();
        self.debug.forced_code = None;
        self.debug.simulated_hours = None;
        info!("debug overrides cleared");

        match self.live_weather {
            Some(live) if was_forcing => self.apply_weather_data(live),
            _ => self.refresh_atmosphere(),
        }
        self.start_fetch(tx);
    }

    pub fn set_simulated_time(&mut self, hours: Option<f32>) {
        self.debug.simulated_hours = hours.map(|h| h.rem_euclid(24.0));
        self.refresh_atmosphere();
    }

    pub fn shift_simulated_time(&mut self, minutes: i32) {
        let current = self.debug.simulated_hours.unwrap_or(SIMULATION_START_HOURS);
        #[allow(clippy::cast_precision_loss)]
        let shifted = current + minutes as f32 / 60.0;
        self.set_simulated_time(Some(shifted));
    }

    /// Wind used by forced weather; re-applies the forced code so the change
    /// is visible at once.
    pub fn set_debug_wind_speed(&mut self, kmh: f32) {
        self.debug.wind_speed_kmh = kmh.clamp(0.0, MAX_DEBUG_WIND_KMH);
        self.reforce();
    }

    pub fn set_debug_wind_direction(&mut self, degrees: f32) {
        self.debug.wind_direction_deg = degrees.rem_euclid(360.0);
        self.reforce();
    }

    pub fn cycle_category(&mut self, category: DebugCategory) {
        let code = category.next_code(self.debug.forced_code);
        self.force_weather(code);
    }

    /// Steps through the city list; `step` is usually ±1.
    pub fn change_city(&mut self, step: isize, tx: &mpsc::Sender<AppEvent>) {
        let len = self.cities.len();
        if len < 2 {
            return;
        }
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let next = (self.city_index as isize + step).rem_euclid(len as isize) as usize;
        self.city_index = next;
        self.live_weather = None;
        info!(city = %self.city().name, "city changed");

        self.refresh_atmosphere();
        // A fetch still running belongs to the old city; its result is dropped.
        self.fetch_in_flight = false;
        if !self.debug.is_forcing() {
            self.start_fetch(tx);
        }
    }

    fn reforce(&mut self) {
        if let Some(code) = self.debug.forced_code {
            self.force_weather(code);
        }
    }
}
