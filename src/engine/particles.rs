use rand::Rng;

use crate::{
    domain::{
        color::{Rgb, Rgba},
        weather::{PrecipKind, PrecipProfile, classify_precipitation},
    },
    engine::surface::{Point, Surface},
};

pub const RAIN_COLOR: Rgba = Rgba::new(Rgb(174, 194, 224), 0.5);
pub const ICE_COLOR: Rgba = Rgba::new(Rgb::WHITE, 0.8);
pub const RESPAWN_Y: f32 = -20.0;
/// Horizontal pixels per frame for each km/h of wind.
pub const DRIFT_PER_KMH: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Depth in `0.5..1.0`; nearer particles fall faster and draw larger.
    pub z: f32,
    pub len: f32,
}

#[derive(Debug)]
pub struct ParticleEngine {
    profile: PrecipProfile,
    wind_x: f32,
    width: f32,
    height: f32,
    pub particles: Vec<Particle>,
}

impl Default for ParticleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            profile: PrecipProfile::NONE,
            wind_x: 0.0,
            width: 0.0,
            height: 0.0,
            particles: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    #[must_use]
    pub fn kind(&self) -> PrecipKind {
        self.profile.kind
    }

    #[must_use]
    pub fn intensity(&self) -> f32 {
        self.profile.intensity
    }

    #[must_use]
    pub fn wind_x(&self) -> f32 {
        self.wind_x
    }

    /// Reclassifies the weather and grows or shrinks the pool to match.
    /// Existing particles keep their positions.
    pub fn configure<R: Rng>(
        &mut self,
        weather_code: u8,
        wind_speed_kmh: f32,
        wind_direction_deg: f32,
        rng: &mut R,
    ) {
        self.profile = classify_precipitation(weather_code);
        self.wind_x = -wind_direction_deg.to_radians().sin() * wind_speed_kmh * DRIFT_PER_KMH;

        let target = self.profile.target_count();
        if self.particles.len() > target {
            self.particles.truncate(target);
        }
        while self.particles.len() < target {
            let particle = self.spawn(rng);
            self.particles.push(particle);
        }
    }

    fn spawn<R: Rng>(&self, rng: &mut R) -> Particle {
        Particle {
            x: rng.random::<f32>() * self.width,
            y: rng.random::<f32>() * self.height,
            z: 0.5 + rng.random::<f32>() * 0.5,
            len: 10.0 + rng.random::<f32>() * 20.0,
        }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        if self.profile.kind == PrecipKind::None {
            return;
        }
        let (width, height, wind_x) = (self.width, self.height, self.wind_x);
        let profile = self.profile;
        for p in &mut self.particles {
            p.y += fall_speed(profile, p.z);
            p.x += wind_x * p.z;
            if p.y > height {
                p.y = RESPAWN_Y;
                p.x = rng.random::<f32>() * width;
            }
            if p.x > width {
                p.x = 0.0;
            }
            if p.x < 0.0 {
                p.x = width;
            }
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self.profile.kind {
            PrecipKind::None => {}
            PrecipKind::Drizzle | PrecipKind::Rain => {
                let line_width = if self.profile.kind == PrecipKind::Drizzle {
                    0.5
                } else {
                    1.5
                };
                for p in &self.particles {
                    surface.stroke_line(
                        Point::new(p.x, p.y),
                        Point::new(p.x + self.wind_x * 0.2, p.y + p.len),
                        line_width,
                        RAIN_COLOR,
                    );
                }
            }
            PrecipKind::Snow | PrecipKind::Hail => {
                let radius = if self.profile.kind == PrecipKind::Hail {
                    3.0
                } else {
                    2.0
                };
                for p in &self.particles {
                    surface.fill_circle(Point::new(p.x, p.y), radius * p.z, ICE_COLOR);
                }
            }
        }
    }

    pub fn update_and_draw<S: Surface + ?Sized, R: Rng>(&mut self, surface: &mut S, rng: &mut R) {
        if self.profile.kind == PrecipKind::None {
            return;
        }
        self.update(rng);
        self.draw(surface);
    }
}

fn fall_speed(profile: PrecipProfile, z: f32) -> f32 {
    if profile.kind.is_streak() {
        15.0 * z + profile.intensity * 5.0
    } else {
        2.0 * z + profile.intensity
    }
}
