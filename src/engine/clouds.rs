#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;

use rand::Rng;

use crate::{
    domain::{
        color::Rgb,
        weather::{CloudDensity, cloud_density},
    },
    engine::{
        bitmap::CloudBitmap,
        surface::{DrawRect, Surface},
    },
};

pub const FADE_STEP: u8 = 2;
pub const SPAWN_CHANCE: f64 = 0.02;
pub const CULL_MARGIN: f32 = 500.0;
pub const MAX_FOG_ALPHA: u8 = 200;
pub const FOG_OVERSIZE: f32 = 1.5;
pub const MIN_DRIFT_SPEED: f32 = 0.3;
pub const DRIFT_PER_KMH: f32 = 0.05;

const DEFAULT_DRIFT_SPEED: f32 = 2.0;
const DEFAULT_DIRECTION_DEG: f32 = 270.0;
const DEFAULT_DENSITY: CloudDensity = CloudDensity {
    target_count: 10,
    scale_min: 1.0,
    scale_max: 2.0,
    foggy: false,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CloudSprite {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub speed_factor: f32,
    pub alpha: u8,
    pub max_alpha: u8,
    pub dying: bool,
}

impl CloudSprite {
    fn ease_alpha(&mut self) {
        self.alpha = if self.dying {
            self.alpha.saturating_sub(FADE_STEP)
        } else {
            self.alpha.saturating_add(FADE_STEP).min(self.max_alpha)
        };
    }
}

/// Where a freshly created sprite is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Anywhere inside the viewport, for the initial fill.
    OnScreen,
    /// Just outside the edge the wind blows from.
    Upwind,
}

/// Drifting cloud population plus the full-screen fog layer.
///
/// Nothing spawns, moves, or draws until a bitmap is installed.
#[derive(Debug)]
pub struct CloudSystem {
    bitmap: Option<Arc<CloudBitmap>>,
    clouds: Vec<CloudSprite>,
    width: f32,
    height: f32,
    drift_speed: f32,
    direction_deg: f32,
    velocity: (f32, f32),
    density: CloudDensity,
    fog_alpha: u8,
}

impl Default for CloudSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CloudSystem {
    #[must_use]
    pub fn new() -> Self {
        let mut system = Self {
            bitmap: None,
            clouds: Vec::new(),
            width: 0.0,
            height: 0.0,
            drift_speed: DEFAULT_DRIFT_SPEED,
            direction_deg: DEFAULT_DIRECTION_DEG,
            velocity: (0.0, 0.0),
            density: DEFAULT_DENSITY,
            fog_alpha: 0,
        };
        system.update_velocity();
        system
    }

    pub fn set_bitmap(&mut self, bitmap: Arc<CloudBitmap>) {
        self.bitmap = Some(bitmap);
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.bitmap.is_some()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Wind blowing *from* `direction_deg` pushes sprites toward the
    /// opposite bearing: 270 moves them right, 0 moves them down.
    pub fn set_wind(&mut self, speed_kmh: f32, direction_deg: f32) {
        self.drift_speed = (speed_kmh * DRIFT_PER_KMH).max(MIN_DRIFT_SPEED);
        self.direction_deg = direction_deg;
        self.update_velocity();
    }

    pub fn set_density(&mut self, weather_code: u8) {
        self.density = cloud_density(weather_code);
    }

    fn update_velocity(&mut self) {
        let theta = self.direction_deg.to_radians();
        self.velocity = (-theta.sin() * self.drift_speed, theta.cos() * self.drift_speed);
    }

    #[must_use]
    pub fn velocity(&self) -> (f32, f32) {
        self.velocity
    }

    #[must_use]
    pub fn drift_speed(&self) -> f32 {
        self.drift_speed
    }

    #[must_use]
    pub fn density(&self) -> CloudDensity {
        self.density
    }

    #[must_use]
    pub fn clouds(&self) -> &[CloudSprite] {
        &self.clouds
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.clouds.iter().filter(|cloud| !cloud.dying).count()
    }

    #[must_use]
    pub fn fog_alpha(&self) -> u8 {
        self.fog_alpha
    }

    pub fn create_cloud<R: Rng>(
        &self,
        rng: &mut R,
        placement: Placement,
    ) -> Option<CloudSprite> {
        let bitmap = self.bitmap.as_ref()?;
        let CloudDensity {
            scale_min,
            scale_max,
            ..
        } = self.density;
        let scale = rng.random::<f32>() * (scale_max - scale_min) + scale_min;
        let w = bitmap.width() as f32 * scale;
        let h = bitmap.height() as f32 * scale;

        let (x, y) = match placement {
            Placement::OnScreen => (
                rng.random::<f32>() * self.width - w / 2.0,
                rng.random::<f32>() * self.height - h / 2.0,
            ),
            Placement::Upwind => self.upwind_position(rng, w, h),
        };

        let alpha_base: u8 = if scale_min > 2.0 { 220 } else { 180 };
        Some(CloudSprite {
            x,
            y,
            scale,
            speed_factor: rng.random::<f32>() * 0.4 + 0.6,
            alpha: 0,
            max_alpha: rng.random_range(0..50) + (alpha_base - 50),
            dying: false,
        })
    }

    fn upwind_position<R: Rng>(&self, rng: &mut R, w: f32, h: f32) -> (f32, f32) {
        let (vx, vy) = self.velocity;
        if vx.abs() > vy.abs() {
            let x = if vx > 0.0 { -w } else { self.width };
            (x, rng.random::<f32>() * self.height - h / 2.0)
        } else {
            let y = if vy > 0.0 { -h } else { self.height };
            (rng.random::<f32>() * self.width - w / 2.0, y)
        }
    }

    /// Fills the population up to the target with on-screen sprites so the
    /// sky is not empty while the first upwind spawns drift in.
    pub fn prefill<R: Rng>(&mut self, rng: &mut R) {
        while self.active_count() < self.density.target_count {
            let Some(cloud) = self.create_cloud(rng, Placement::OnScreen) else {
                return;
            };
            self.clouds.push(cloud);
        }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        let Some(bitmap) = self.bitmap.clone() else {
            return;
        };

        self.ease_fog();

        let active = self.active_count();
        let target = self.density.target_count;
        if active < target {
            if rng.random_bool(SPAWN_CHANCE)
                && let Some(cloud) = self.create_cloud(rng, Placement::Upwind)
            {
                self.clouds.push(cloud);
            }
        } else if active > target
            && let Some(cloud) = self.clouds.iter_mut().find(|cloud| !cloud.dying)
        {
            cloud.dying = true;
        }

        let (vx, vy) = self.velocity;
        let (bw, bh) = (bitmap.width() as f32, bitmap.height() as f32);
        let (width, height) = (self.width, self.height);
        self.clouds.retain_mut(|cloud| {
            cloud.x += vx * cloud.speed_factor;
            cloud.y += vy * cloud.speed_factor;
            cloud.ease_alpha();
            if cloud.dying && cloud.alpha == 0 {
                return false;
            }
            let (w, h) = (bw * cloud.scale, bh * cloud.scale);
            let gone = (vx > 0.0 && cloud.x > width + CULL_MARGIN)
                || (vx < 0.0 && cloud.x + w < -CULL_MARGIN)
                || (vy > 0.0 && cloud.y > height + CULL_MARGIN)
                || (vy < 0.0 && cloud.y + h < -CULL_MARGIN);
            !gone
        });
    }

    fn ease_fog(&mut self) {
        self.fog_alpha = if self.density.foggy {
            self.fog_alpha.saturating_add(FADE_STEP).min(MAX_FOG_ALPHA)
        } else {
            self.fog_alpha.saturating_sub(FADE_STEP)
        };
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, tint: Rgb) {
        let Some(bitmap) = self.bitmap.as_deref() else {
            return;
        };
        let (bw, bh) = (bitmap.width() as f32, bitmap.height() as f32);

        for cloud in self.clouds.iter().filter(|cloud| cloud.alpha > 0) {
            let dest = DrawRect {
                x: cloud.x,
                y: cloud.y,
                width: bw * cloud.scale,
                height: bh * cloud.scale,
            };
            surface.draw_bitmap(bitmap, dest, f32::from(cloud.alpha) / 255.0, tint);
        }

        if self.fog_alpha > 0 {
            let scale = (self.width / bw).max(self.height / bh) * FOG_OVERSIZE;
            let (w, h) = (bw * scale, bh * scale);
            let dest = DrawRect {
                x: (self.width - w) / 2.0,
                y: (self.height - h) / 2.0,
                width: w,
                height: h,
            };
            surface.draw_bitmap(bitmap, dest, f32::from(self.fog_alpha) / 255.0, tint);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::test_support::{DrawOp, RecordingSurface};

    fn loaded_system() -> CloudSystem {
        let mut system = CloudSystem::new();
        system.resize(1280.0, 720.0);
        system.set_bitmap(Arc::new(
            CloudBitmap::new(100, 50, vec![255; 5000]).expect("bitmap"),
        ));
        system
    }

    fn sprite(x: f32, y: f32) -> CloudSprite {
        CloudSprite {
            x,
            y,
            scale: 1.0,
            speed_factor: 1.0,
            alpha: 100,
            max_alpha: 150,
            dying: false,
        }
    }

    #[test]
    fn defaults_drift_right_at_two_pixels() {
        let system = CloudSystem::new();
        let (vx, vy) = system.velocity();
        assert!((vx - 2.0).abs() < 1e-5);
        assert!(vy.abs() < 1e-5);
        assert_eq!(system.density().target_count, 10);
        assert!(!system.is_loaded());
    }

    #[test]
    fn wind_direction_maps_to_downwind_velocity() {
        let mut system = CloudSystem::new();
        system.set_wind(100.0, 0.0);
        let (vx, vy) = system.velocity();
        assert!(vx.abs() < 1e-5);
        assert!((vy - 5.0).abs() < 1e-5);

        system.set_wind(40.0, 90.0);
        let (vx, vy) = system.velocity();
        assert!((vx + 2.0).abs() < 1e-5);
        assert!(vy.abs() < 1e-5);
    }

    #[test]
    fn calm_wind_keeps_minimum_drift() {
        let mut system = CloudSystem::new();
        system.set_wind(0.0, 270.0);
        assert!((system.drift_speed() - MIN_DRIFT_SPEED).abs() < f32::EPSILON);
        let (vx, _) = system.velocity();
        assert!((vx - MIN_DRIFT_SPEED).abs() < 1e-5);
    }

    #[test]
    fn nothing_happens_before_a_bitmap_is_loaded() {
        let mut system = CloudSystem::new();
        system.resize(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(system.create_cloud(&mut rng, Placement::OnScreen).is_none());
        system.prefill(&mut rng);
        for _ in 0..500 {
            system.update(&mut rng);
        }
        assert!(system.clouds().is_empty());

        let mut surface = RecordingSurface::new(800.0, 600.0);
        system.draw(&mut surface, Rgb::WHITE);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn created_clouds_respect_density_ranges() {
        let mut system = loaded_system();
        let mut rng = StdRng::seed_from_u64(7);
        for code in [0, 3, 45] {
            system.set_density(code);
            let density = system.density();
            let alpha_base: u8 = if density.scale_min > 2.0 { 220 } else { 180 };
            for _ in 0..200 {
                let cloud = system
                    .create_cloud(&mut rng, Placement::OnScreen)
                    .expect("bitmap loaded");
                assert!(cloud.scale >= density.scale_min && cloud.scale <= density.scale_max);
                assert!((0.6..=1.0).contains(&cloud.speed_factor));
                assert!(cloud.max_alpha >= alpha_base - 50 && cloud.max_alpha < alpha_base);
                assert_eq!(cloud.alpha, 0);
                assert!(!cloud.dying);
            }
        }
    }

    #[test]
    fn upwind_spawns_sit_just_outside_the_windward_edge() {
        let mut system = loaded_system();
        let mut rng = StdRng::seed_from_u64(3);

        system.set_wind(40.0, 270.0);
        let cloud = system.create_cloud(&mut rng, Placement::Upwind).expect("cloud");
        assert!((cloud.x + 100.0 * cloud.scale).abs() < 1e-3);

        system.set_wind(40.0, 90.0);
        let cloud = system.create_cloud(&mut rng, Placement::Upwind).expect("cloud");
        assert!((cloud.x - 1280.0).abs() < 1e-3);

        system.set_wind(40.0, 0.0);
        let cloud = system.create_cloud(&mut rng, Placement::Upwind).expect("cloud");
        assert!((cloud.y + 50.0 * cloud.scale).abs() < 1e-3);

        system.set_wind(40.0, 180.0);
        let cloud = system.create_cloud(&mut rng, Placement::Upwind).expect("cloud");
        assert!((cloud.y - 720.0).abs() < 1e-3);
    }

    #[test]
    fn prefill_reaches_target_on_screen() {
        let mut system = loaded_system();
        system.set_density(3);
        let mut rng = StdRng::seed_from_u64(11);
        system.prefill(&mut rng);
        assert_eq!(system.active_count(), 8);
        for cloud in system.clouds() {
            let w = 100.0 * cloud.scale;
            let h = 50.0 * cloud.scale;
            assert!(cloud.x >= -w / 2.0 && cloud.x <= 1280.0 - w / 2.0);
            assert!(cloud.y >= -h / 2.0 && cloud.y <= 720.0 - h / 2.0);
        }
    }

    #[test]
    fn alpha_eases_up_to_its_ceiling() {
        let mut system = loaded_system();
        system.set_density(3);
        system.clouds.push(CloudSprite {
            alpha: 0,
            max_alpha: 5,
            ..sprite(100.0, 100.0)
        });
        let mut rng = StdRng::seed_from_u64(5);

        system.update(&mut rng);
        assert_eq!(system.clouds()[0].alpha, 2);
        system.update(&mut rng);
        assert_eq!(system.clouds()[0].alpha, 4);
        system.update(&mut rng);
        assert_eq!(system.clouds()[0].alpha, 5);
        system.update(&mut rng);
        assert_eq!(system.clouds()[0].alpha, 5);
    }

    #[test]
    fn surplus_clouds_fade_one_per_frame_down_to_target() {
        let mut system = loaded_system();
        system.set_density(1);
        for i in 0..4 {
            system.clouds.push(sprite(100.0 * i as f32, 100.0));
        }
        let mut rng = StdRng::seed_from_u64(9);

        system.update(&mut rng);
        assert_eq!(system.clouds().iter().filter(|c| c.dying).count(), 1);
        assert!(system.clouds()[0].dying);
        assert_eq!(system.clouds()[0].alpha, 98);

        system.update(&mut rng);
        assert_eq!(system.clouds().iter().filter(|c| c.dying).count(), 1);
        assert_eq!(system.active_count(), 3);
    }

    #[test]
    fn dying_clouds_are_removed_once_transparent() {
        let mut system = loaded_system();
        system.set_density(0);
        system.clouds.push(CloudSprite {
            alpha: 4,
            dying: true,
            ..sprite(200.0, 200.0)
        });
        let mut rng = StdRng::seed_from_u64(2);

        system.update(&mut rng);
        assert_eq!(system.clouds().len(), 1);
        system.update(&mut rng);
        assert!(system.clouds().is_empty());
    }

    #[test]
    fn sprites_past_the_downwind_margin_are_culled() {
        let mut system = loaded_system();
        system.set_density(3);
        system.set_wind(40.0, 270.0);
        system.clouds.push(sprite(1280.0 + CULL_MARGIN - 1.0, 100.0));
        system.clouds.push(sprite(-CULL_MARGIN - 100.0, 100.0));
        system.clouds.push(CloudSprite {
            dying: true,
            ..sprite(1280.0 + CULL_MARGIN + 10.0, 100.0)
        });
        let mut rng = StdRng::seed_from_u64(4);

        system.update(&mut rng);
        let remaining = system.clouds();
        assert!(remaining.iter().all(|c| c.x <= 1280.0 + CULL_MARGIN));
        assert!(remaining.iter().any(|c| (c.x + CULL_MARGIN + 98.0).abs() < 1e-3));
    }

    #[test]
    fn spawning_never_overshoots_target() {
        let mut system = loaded_system();
        system.set_density(2);
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..2000 {
            system.update(&mut rng);
            assert!(system.active_count() <= 5);
        }
        assert!(system.active_count() > 0);
    }

    #[test]
    fn fog_fades_in_and_out() {
        let mut system = loaded_system();
        let mut rng = StdRng::seed_from_u64(6);
        system.set_density(45);
        for _ in 0..150 {
            system.update(&mut rng);
        }
        assert_eq!(system.fog_alpha(), MAX_FOG_ALPHA);

        system.set_density(0);
        system.update(&mut rng);
        assert_eq!(system.fog_alpha(), MAX_FOG_ALPHA - FADE_STEP);
        for _ in 0..150 {
            system.update(&mut rng);
        }
        assert_eq!(system.fog_alpha(), 0);
    }

    #[test]
    fn draw_skips_invisible_sprites_and_adds_oversized_fog() {
        let mut system = loaded_system();
        system.clouds.push(sprite(10.0, 20.0));
        system.clouds.push(CloudSprite {
            alpha: 0,
            ..sprite(50.0, 50.0)
        });
        system.fog_alpha = 100;

        let mut surface = RecordingSurface::new(1280.0, 720.0);
        system.draw(&mut surface, Rgb(10, 20, 30));

        assert_eq!(surface.ops.len(), 2);
        let DrawOp::Bitmap { dest, opacity, tint } = &surface.ops[0] else {
            panic!("expected bitmap, got {:?}", surface.ops[0]);
        };
        assert_eq!(*tint, Rgb(10, 20, 30));
        assert!((dest.x - 10.0).abs() < f32::EPSILON);
        assert!((dest.width - 100.0).abs() < f32::EPSILON);
        assert!((opacity - 100.0 / 255.0).abs() < 1e-6);

        let DrawOp::Bitmap { dest, .. } = &surface.ops[1] else {
            panic!("expected fog bitmap");
        };
        // Height is the limiting axis: 720 / 50 > 1280 / 100.
        assert!((dest.width - 100.0 * 14.4 * FOG_OVERSIZE).abs() < 1e-2);
        assert!((dest.x + (dest.width - 1280.0) / 2.0).abs() < 1e-2);
    }
}
