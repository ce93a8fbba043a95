use std::{sync::Arc, time::Duration};

use chrono::{TimeDelta, Utc};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use weather_backdrop::{
    domain::{atmosphere::compute_atmosphere, weather::classify_precipitation},
    engine::{
        bitmap::CloudBitmap,
        clouds::{CloudSystem, MAX_FOG_ALPHA},
        particles::{ParticleEngine, RESPAWN_Y},
    },
    resilience::freshness::{FreshnessState, evaluate_freshness},
    ui::backdrop::paint_sky,
};

proptest! {
    #[test]
    fn particles_stay_inside_the_wrap_bounds(
        code in any::<u8>(),
        wind_speed in 0.0f32..120.0,
        wind_dir in 0.0f32..360.0,
        width in 50.0f32..2000.0,
        height in 50.0f32..1000.0,
        frames in 1usize..60,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut engine = ParticleEngine::new();
        engine.resize(width, height);
        engine.configure(code, wind_speed, wind_dir, &mut rng);
        prop_assert_eq!(
            engine.particles.len(),
            classify_precipitation(code).target_count()
        );

        for _ in 0..frames {
            engine.update(&mut rng);
        }
        for particle in &engine.particles {
            prop_assert!((0.0..=width).contains(&particle.x));
            prop_assert!((RESPAWN_Y..=height).contains(&particle.y));
        }
    }

    #[test]
    fn cloud_fades_never_overshoot(
        codes in prop::collection::vec(any::<u8>(), 1..6),
        wind_speed in 0.0f32..120.0,
        wind_dir in 0.0f32..360.0,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut clouds = CloudSystem::new();
        clouds.set_bitmap(Arc::new(CloudBitmap::procedural()));
        clouds.resize(640.0, 384.0);
        clouds.set_wind(wind_speed, wind_dir);

        for code in codes {
            clouds.set_density(code);
            clouds.prefill(&mut rng);
            for _ in 0..40 {
                clouds.update(&mut rng);
                prop_assert!(clouds.fog_alpha() <= MAX_FOG_ALPHA);
                for cloud in clouds.clouds() {
                    prop_assert!(cloud.alpha <= cloud.max_alpha);
                }
            }
        }
    }

    #[test]
    fn sky_raster_matches_requested_size(
        altitude in -90.0f32..90.0,
        code in any::<u8>(),
        width in 0usize..64,
        height in 0usize..64,
        seed in prop::option::of(any::<u64>()),
    ) {
        let atmosphere = compute_atmosphere(altitude, code);
        let sky = paint_sky(&atmosphere, seed, width, height);
        prop_assert_eq!(sky.width(), width);
        prop_assert_eq!(sky.height(), height);
    }

    #[test]
    fn three_failures_are_always_offline(
        failures in 3u32..50,
        age_secs in 0i64..100_000,
        interval_secs in 10u64..3600,
    ) {
        let now = Utc::now();
        let last_success = Some(now - TimeDelta::seconds(age_secs));
        prop_assert_eq!(
            evaluate_freshness(now, last_success, failures, Duration::from_secs(interval_secs)),
            FreshnessState::Offline
        );
    }
}
