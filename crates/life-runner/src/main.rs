//! Runs the parallel life engine once and logs the outcome.
//!
//! Configuration comes from environment variables:
//! - `GRID_SIZE` - grid side length (default 50)
//! - `WORKERS` - worker thread count (default: available parallelism)
//! - `GENERATIONS` - generations to advance (default 30)
//! - `LIVE_PROBABILITY` - initial live probability (default 0.3)
//! - `SEED` - RNG seed (default: random)

use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Instant;

use life_engine::{SimConfig, run};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("life_runner=info".parse()?)
                .add_directive("life_engine=info".parse()?),
        )
        .init();

    let size = env_or("GRID_SIZE", 50);
    // One band per worker, so never default to more workers than rows.
    let default_workers = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
        .min(size)
        .max(1);

    let config = SimConfig {
        size,
        workers: env_or("WORKERS", default_workers),
        generations: env_or("GENERATIONS", 30),
        live_probability: env_or("LIVE_PROBABILITY", 0.3),
    };
    let seed: u64 = env_or("SEED", rand::random());

    info!(?config, seed, "configured");

    let mut rng = SmallRng::seed_from_u64(seed);
    let started = Instant::now();
    let grid = run(&config, &mut rng)?;

    info!(
        live = grid.live_count(),
        cells = config.size * config.size,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulation complete"
    );
    Ok(())
}
