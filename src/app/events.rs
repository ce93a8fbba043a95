use std::{sync::Arc, time::Duration};

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use rand::Rng;
use tokio::{
    sync::mpsc::Sender,
    time::{interval, sleep},
};

use crate::{
    domain::weather::WeatherSnapshot,
    engine::bitmap::{AssetError, CloudBitmap},
};

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TickFrame,
    TickRefresh,
    TickAtmosphere,
    Input(Event),
    /// A fetch finished for the city identified by `prefix`.
    WeatherFetched {
        prefix: String,
        snapshot: WeatherSnapshot,
    },
    FetchFailed {
        prefix: String,
        error: String,
    },
    CloudAssetLoaded(Result<Arc<CloudBitmap>, AssetError>),
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

pub fn start_frame_task(tx: Sender<AppEvent>, fps: u8) {
    let fps = fps.max(15);
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(1000_u64 / u64::from(fps)));
        loop {
            ticker.tick().await;
            if tx.send(AppEvent::TickFrame).await.is_err() {
                break;
            }
        }
    });
}

/// Weather refresh ticks; each wait is jittered by ±10 %.
pub fn start_refresh_task(tx: Sender<AppEvent>, period: Duration) {
    tokio::spawn(async move {
        let base = period.max(Duration::from_secs(10));
        loop {
            let wait = {
                let mut rng = rand::rng();
                let jitter = rng.random_range(-0.1f32..0.1f32);
                base.mul_f32(1.0 + jitter).max(Duration::from_secs(1))
            };
            sleep(wait).await;
            if tx.send(AppEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    });
}

pub fn start_atmosphere_task(tx: Sender<AppEvent>, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = interval(period.max(Duration::from_secs(1)));
        // The first tick fires immediately; bootstrap already computed the sky.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if tx.send(AppEvent::TickAtmosphere).await.is_err() {
                break;
            }
        }
    });
}

pub fn schedule_retry(tx: Sender<AppEvent>, delay: Duration) {
    tokio::spawn(async move {
        sleep(delay.max(Duration::from_secs(1))).await;
        let _ = tx.send(AppEvent::TickRefresh).await;
    });
}
