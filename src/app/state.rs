use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    app::{
        events::{
            AppEvent, schedule_retry, start_atmosphere_task, start_frame_task, start_refresh_task,
        },
        settings::{RuntimeSettings, resolve_cities},
    },
    cli::Cli,
    data::forecast::ForecastClient,
    domain::{
        atmosphere::{AtmosphereState, atmosphere_at},
        location::{Location, default_cities},
        solar::effective_instant,
        weather::{DebugCategory, WeatherSnapshot, weather_label},
    },
    engine::{bitmap::CloudBitmap, scene::Scene, surface::Surface},
    resilience::{backoff::RetryBackoff, freshness::RefreshMetadata},
    ui::{
        canvas::CellCanvas,
        palette::{ColorCapability, detect_color_capability},
    },
};

mod input;
mod methods_debug;
mod methods_fetch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Loading,
    Ready,
    Quit,
}

/// Manual overrides from the debug keys or startup flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugOverrides {
    pub forced_code: Option<u8>,
    /// Hours past local midnight, `0.0..24.0`.
    pub simulated_hours: Option<f32>,
    pub wind_speed_kmh: f32,
    pub wind_direction_deg: f32,
}

impl DebugOverrides {
    pub const DEFAULT_WIND_SPEED_KMH: f32 = 10.0;
    pub const DEFAULT_WIND_DIRECTION_DEG: f32 = 270.0;

    #[must_use]
    pub fn is_forcing(&self) -> bool {
        self.forced_code.is_some()
    }
}

impl Default for DebugOverrides {
    fn default() -> Self {
        Self {
            forced_code: None,
            simulated_hours: None,
            wind_speed_kmh: Self::DEFAULT_WIND_SPEED_KMH,
            wind_direction_deg: Self::DEFAULT_WIND_DIRECTION_DEG,
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub settings: RuntimeSettings,
    pub cities: Vec<Location>,
    pub city_index: usize,
    /// Last snapshot from the feed for the current city.
    pub live_weather: Option<WeatherSnapshot>,
    /// The snapshot currently driving the visuals, live or forced.
    pub applied_weather: Option<WeatherSnapshot>,
    pub atmosphere: AtmosphereState,
    pub debug: DebugOverrides,
    pub debug_panel_open: bool,
    pub scene: Scene,
    pub canvas: CellCanvas,
    pub refresh_meta: RefreshMetadata,
    pub backoff: RetryBackoff,
    pub fetch_in_flight: bool,
    pub last_error: Option<String>,
    pub color_capability: ColorCapability,
    pub last_frame_at: Instant,
    pub frame_tick: u64,
    pub strikes: u64,
    client: ForecastClient,
    rng: StdRng,
}

impl AppState {
    pub fn new(cli: &Cli) -> Self {
        let settings = RuntimeSettings::from_cli(cli);
        let client = settings
            .forecast_url
            .as_deref()
            .map_or_else(ForecastClient::new, ForecastClient::with_base_url);
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let debug = DebugOverrides {
            simulated_hours: cli.sim_time,
            wind_speed_kmh: cli.wind_speed,
            wind_direction_deg: cli.wind_dir,
            ..DebugOverrides::default()
        };

        let mut state = Self {
            mode: AppMode::Loading,
            running: true,
            color_capability: detect_color_capability(settings.color),
            scene: Scene::new(settings.no_flash),
            settings,
            cities: default_cities(),
            city_index: 0,
            live_weather: None,
            applied_weather: None,
            atmosphere: AtmosphereState::default(),
            debug,
            debug_panel_open: false,
            canvas: CellCanvas::default(),
            refresh_meta: RefreshMetadata::default(),
            backoff: RetryBackoff::default(),
            fetch_in_flight: false,
            last_error: None,
            last_frame_at: Instant::now(),
            frame_tick: 0,
            strikes: 0,
            client,
            rng,
        };
        state.refresh_atmosphere();
        state
    }

    #[must_use]
    pub fn city(&self) -> &Location {
        &self.cities[self.city_index]
    }

    /// Weather code the visuals currently follow; clear sky until data lands.
    #[must_use]
    pub fn active_code(&self) -> u8 {
        self.applied_weather.map_or(0, |weather| weather.weather_code)
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                cli.validate()?;
                let (cities, index) = resolve_cities(cli).context("resolving start city failed")?;
                self.cities = cities;
                self.city_index = index;
                info!(city = %self.city().name, "starting backdrop");

                start_frame_task(tx.clone(), self.settings.fps);
                start_refresh_task(tx.clone(), self.settings.refresh_interval);
                start_atmosphere_task(tx.clone(), self.settings.atmosphere_interval);
                self.start_cloud_asset_load(tx);

                match cli.force_weather {
                    Some(code) => self.force_weather(code),
                    None => self.refresh_atmosphere(),
                }
                self.start_fetch(tx);
            }
            AppEvent::TickFrame => {
                let now = Instant::now();
                let delta = now.duration_since(self.last_frame_at);
                self.last_frame_at = now;
                self.frame_tick = self.frame_tick.saturating_add(1);

                let code = self.active_code();
                let report = self.scene.frame(
                    &mut self.canvas,
                    code,
                    self.atmosphere.cloud_tint,
                    delta,
                    &mut self.rng,
                );
                if report.struck {
                    self.strikes = self.strikes.saturating_add(1);
                }
            }
            AppEvent::TickRefresh => self.start_fetch(tx),
            AppEvent::TickAtmosphere => {
                self.refresh_atmosphere();
                if self.refresh_meta.last_attempt.is_some() {
                    self.refresh_meta
                        .reevaluate(Utc::now(), self.settings.refresh_interval);
                }
            }
            AppEvent::Input(event) => self.handle_input(event, tx).await?,
            AppEvent::WeatherFetched { prefix, snapshot } => {
                self.handle_weather_fetched(&prefix, snapshot);
            }
            AppEvent::FetchFailed { prefix, error } => {
                self.handle_fetch_failed(&prefix, error, tx);
            }
            AppEvent::CloudAssetLoaded(result) => {
                let bitmap = result.unwrap_or_else(|err| {
                    warn!(error = %err, "cloud asset unusable, using procedural clouds");
                    Arc::new(CloudBitmap::procedural())
                });
                debug!(
                    width = bitmap.width(),
                    height = bitmap.height(),
                    "cloud bitmap ready"
                );
                self.scene.clouds.set_bitmap(bitmap);
                self.prefill_clouds();
            }
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
            }
        }

        Ok(())
    }

    /// Pushes a snapshot into every derived visual: particles, cloud density
    /// and wind, then the sky.
    pub fn apply_weather_data(&mut self, snapshot: WeatherSnapshot) {
        self.scene.configure(
            snapshot.weather_code,
            snapshot.wind_speed_kmh,
            snapshot.wind_direction_deg,
            &mut self.rng,
        );
        self.applied_weather = Some(snapshot);
        if self.mode == AppMode::Loading {
            self.mode = AppMode::Ready;
        }
        self.refresh_atmosphere();
        info!(
            code = snapshot.weather_code,
            label = weather_label(snapshot.weather_code),
            wind_kmh = snapshot.wind_speed_kmh,
            "weather applied"
        );
    }

    pub fn refresh_atmosphere(&mut self) {
        let at = effective_instant(Utc::now(), self.debug.simulated_hours);
        self.atmosphere = atmosphere_at(at, self.city(), self.active_code());
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if self.canvas.resize(cols, rows) {
            self.scene.resize(self.canvas.width(), self.canvas.height());
            self.prefill_clouds();
        }
    }

    fn prefill_clouds(&mut self) {
        if self.canvas.cols() > 0 && self.canvas.rows() > 0 {
            self.scene.clouds.prefill(&mut self.rng);
        }
    }

    fn start_cloud_asset_load(&self, tx: &mpsc::Sender<AppEvent>) {
        let path = self.settings.cloud_asset.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = match path {
                Some(path) => {
                    match tokio::task::spawn_blocking(move || CloudBitmap::load(&path)).await {
                        Ok(result) => result,
                        Err(err) => {
                            warn!(error = %err, "cloud asset loader stopped");
                            Ok(CloudBitmap::procedural())
                        }
                    }
                }
                None => Ok(CloudBitmap::procedural()),
            };
            let _ = tx.send(AppEvent::CloudAssetLoaded(result.map(Arc::new))).await;
        });
    }
}
