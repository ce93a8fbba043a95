use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;

use crate::{
    cli::{Cli, ColorArg},
    domain::location::{Location, default_cities},
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("reading city list {} failed", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("city list {} is not valid JSON", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("city list {} is empty", path.display())]
    Empty { path: PathBuf },
    #[error("city list {} repeats prefix `{prefix}`", path.display())]
    DuplicatePrefix { path: PathBuf, prefix: String },
    #[error("no city matches `{0}`")]
    UnknownCity(String),
}

/// Knobs fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub fps: u8,
    pub refresh_interval: Duration,
    pub atmosphere_interval: Duration,
    pub no_flash: bool,
    pub color: ColorArg,
    pub cloud_asset: Option<PathBuf>,
    pub forecast_url: Option<String>,
    pub seed: Option<u64>,
}

impl RuntimeSettings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            fps: cli.fps,
            refresh_interval: Duration::from_secs(cli.refresh_interval),
            atmosphere_interval: Duration::from_secs(cli.atmosphere_interval),
            no_flash: cli.no_flash,
            color: cli.effective_color_mode(),
            cloud_asset: cli.cloud_asset.clone(),
            forecast_url: cli.forecast_url.clone(),
            seed: cli.seed,
        }
    }
}

pub fn load_cities(path: &Path) -> Result<Vec<Location>, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cities: Vec<Location> =
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if cities.is_empty() {
        return Err(SettingsError::Empty {
            path: path.to_path_buf(),
        });
    }
    let mut seen = HashSet::new();
    if let Some(city) = cities.iter().find(|city| !seen.insert(city.prefix.as_str())) {
        return Err(SettingsError::DuplicatePrefix {
            path: path.to_path_buf(),
            prefix: city.prefix.clone(),
        });
    }
    Ok(cities)
}

/// The city list and the index to start on.
///
/// Explicit coordinates are appended as an extra entry and selected;
/// otherwise `--city` picks by prefix or name.
pub fn resolve_cities(cli: &Cli) -> Result<(Vec<Location>, usize), SettingsError> {
    let mut cities = match &cli.cities {
        Some(path) => load_cities(path)?,
        None => default_cities(),
    };

    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        let index = cities.len();
        cities.push(Location::from_coords(lat, lon));
        return Ok((cities, index));
    }

    let index = match cli.city.as_deref() {
        Some(query) => cities
            .iter()
            .position(|city| city.matches(query))
            .ok_or_else(|| SettingsError::UnknownCity(query.to_string()))?,
        None => 0,
    };
    Ok((cities, index))
}
