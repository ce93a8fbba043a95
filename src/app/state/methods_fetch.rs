use super::*;

impl AppState {
    /// Spawns a fetch for the current city unless one is already running or
    /// the weather is forced.
    pub(crate) fn start_fetch(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.fetch_in_flight || self.debug.is_forcing() {
            return;
        }
        self.fetch_in_flight = true;
        self.refresh_meta.mark_attempt(Utc::now());

        let client = self.client.clone();
        let location = self.city().clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let prefix = location.prefix.clone();
            let event = match client.fetch_current(&location).await {
                Ok(snapshot) => AppEvent::WeatherFetched { prefix, snapshot },
                Err(err) => AppEvent::FetchFailed {
                    prefix,
                    error: format!("{:#}", anyhow::Error::from(err)),
                },
            };
            let _ = tx.send(event).await;
        });
    }

    pub(super) fn handle_weather_fetched(&mut self, prefix: &str, snapshot: WeatherSnapshot) {
        if prefix != self.city().prefix {
            debug!(prefix, "discarding weather for a previous city");
            return;
        }
        self.fetch_in_flight = false;
        if self.debug.is_forcing() {
            debug!(code = snapshot.weather_code, "discarding live weather while forced");
            return;
        }

        self.refresh_meta.mark_success(Utc::now());
        self.backoff.reset();
        self.last_error = None;
        self.live_weather = Some(snapshot);
        self.apply_weather_data(snapshot);
    }

    pub(super) fn handle_fetch_failed(
        &mut self,
        prefix: &str,
        error: String,
        tx: &mpsc::Sender<AppEvent>,
    ) {
        if prefix != self.city().prefix {
            return;
        }
        self.fetch_in_flight = false;
        warn!(city = %self.city().name, %error, "weather fetch failed");
        self.last_error = Some(error);
        self.refresh_meta.mark_failure();
        self.refresh_meta
            .reevaluate(Utc::now(), self.settings.refresh_interval);

        let delay = self.backoff.next_delay();
        debug!(delay_secs = delay.as_secs(), "retry scheduled");
        schedule_retry(tx.clone(), delay);
    }
}
