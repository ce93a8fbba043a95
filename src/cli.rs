#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "weather-backdrop",
    version,
    about = "Weather-reactive animated sky for the terminal"
)]
pub struct Cli {
    /// Starting city, by prefix or name (default: the first preset)
    #[arg(long)]
    pub city: Option<String>,

    /// JSON file replacing the built-in city list
    #[arg(long)]
    pub cities: Option<PathBuf>,

    /// Direct latitude (requires --lon)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Direct longitude (requires --lat)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Target FPS (15..60)
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Weather refresh interval in seconds
    #[arg(long, default_value_t = 600)]
    pub refresh_interval: u64,

    /// Sky colour refresh interval in seconds
    #[arg(long, default_value_t = 60)]
    pub atmosphere_interval: u64,

    /// Start with this WMO weather code forced
    #[arg(long)]
    pub force_weather: Option<u8>,

    /// Simulated time of day, `HH:MM` or decimal hours
    #[arg(long, value_parser = parse_sim_time)]
    pub sim_time: Option<f32>,

    /// Wind speed (km/h) used while weather is forced
    #[arg(long, default_value_t = 10.0)]
    pub wind_speed: f32,

    /// Wind direction (degrees) used while weather is forced
    #[arg(long, default_value_t = 270.0)]
    pub wind_dir: f32,

    /// PNG or WebP cloud sprite; luminance times alpha is the cloud mask
    #[arg(long)]
    pub cloud_asset: Option<PathBuf>,

    /// Disable lightning flash
    #[arg(long)]
    pub no_flash: bool,

    /// Color output policy
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, conflicts_with = "no_color")]
    pub color: ColorArg,

    /// Alias for --color never
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Forecast API base URL
    #[arg(long)]
    pub forecast_url: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Seed for the animation RNG
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            (Some(lat), Some(lon))
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) =>
            {
                anyhow::bail!("--lat must be within ±90 and --lon within ±180")
            }
            _ => {}
        }
        if !(0.0..=120.0).contains(&self.wind_speed) {
            anyhow::bail!("--wind-speed must be between 0 and 120 km/h");
        }
        if !(0.0..360.0).contains(&self.wind_dir) {
            anyhow::bail!("--wind-dir must be in 0..360 degrees");
        }
        if self.refresh_interval < 10 {
            anyhow::bail!("--refresh-interval must be at least 10 seconds");
        }
        if self.atmosphere_interval == 0 {
            anyhow::bail!("--atmosphere-interval must be positive");
        }
        Ok(())
    }

    #[must_use]
    pub fn effective_color_mode(&self) -> ColorArg {
        if self.no_color {
            ColorArg::Never
        } else {
            self.color
        }
    }
}

fn parse_sim_time(raw: &str) -> Result<f32, String> {
    let raw = raw.trim();
    let hours = if let Some((h, m)) = raw.split_once(':') {
        let h: u8 = h.parse().map_err(|_| format!("invalid hour in `{raw}`"))?;
        let m: u8 = m.parse().map_err(|_| format!("invalid minute in `{raw}`"))?;
        if h > 23 || m > 59 {
            return Err(format!("`{raw}` is not a time of day"));
        }
        f32::from(h) + f32::from(m) / 60.0
    } else {
        raw.parse::<f32>()
            .map_err(|_| format!("expected HH:MM or hours, got `{raw}`"))?
    };
    if (0.0..24.0).contains(&hours) {
        Ok(hours)
    } else {
        Err(format!("`{raw}` is outside 0..24 hours"))
    }
}
