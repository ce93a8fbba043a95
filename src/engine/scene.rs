use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::{
    domain::{
        color::{Rgb, Rgba},
        weather::is_storm_code,
    },
    engine::{
        clouds::CloudSystem,
        lightning::{FlashPulse, LightningGate},
        particles::ParticleEngine,
        surface::Surface,
    },
};

pub const FLASH_OVERLAY: Rgba = Rgba::new(Rgb::WHITE, 0.75);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub struck: bool,
    pub flash_lit: bool,
}

/// Every animated layer, stepped together once per frame.
#[derive(Debug)]
pub struct Scene {
    pub clouds: CloudSystem,
    pub particles: ParticleEngine,
    lightning: LightningGate,
    flash: Option<FlashPulse>,
    no_flash: bool,
}

impl Scene {
    #[must_use]
    pub fn new(no_flash: bool) -> Self {
        Self {
            clouds: CloudSystem::new(),
            particles: ParticleEngine::new(),
            lightning: LightningGate::default(),
            flash: None,
            no_flash,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        debug!(width, height, "scene resized");
        self.clouds.resize(width, height);
        self.particles.resize(width, height);
    }

    /// Pushes new conditions into the cloud and particle layers.
    pub fn configure<R: Rng>(
        &mut self,
        weather_code: u8,
        wind_speed_kmh: f32,
        wind_direction_deg: f32,
        rng: &mut R,
    ) {
        self.particles.configure(weather_code, wind_speed_kmh, wind_direction_deg, rng);
        self.clouds.set_density(weather_code);
        self.clouds.set_wind(wind_speed_kmh, wind_direction_deg);
    }

    /// Clears the surface, then clouds, precipitation, and lightning in that
    /// order. `dt` only paces the flash pulse; motion is per frame.
    pub fn frame<S: Surface + ?Sized, R: Rng>(
        &mut self,
        surface: &mut S,
        weather_code: u8,
        cloud_tint: Rgb,
        dt: Duration,
        rng: &mut R,
    ) -> FrameReport {
        surface.clear();

        self.clouds.update(rng);
        self.clouds.draw(surface, cloud_tint);

        self.particles.update_and_draw(surface, rng);

        if let Some(flash) = &mut self.flash {
            flash.advance(dt);
        }
        if self.flash.is_some_and(|flash| flash.is_finished()) {
            self.flash = None;
        }

        let struck = self.lightning.tick(is_storm_code(weather_code), rng);
        if struck {
            let pulse = FlashPulse::strike(rng);
            info!(weather_code, rebound = pulse.has_rebound(), "lightning strike");
            self.flash = Some(pulse);
        }

        let flash_lit = self.flash_active();
        if flash_lit {
            surface.fill(FLASH_OVERLAY);
        }
        FrameReport { struck, flash_lit }
    }

    #[must_use]
    pub fn flash_active(&self) -> bool {
        !self.no_flash && self.flash.is_some_and(|flash| flash.is_lit())
    }
}
