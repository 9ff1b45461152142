//! First-person grid raycaster.
//!
//! Controls  W/S = forward/back  A/D = strafe  mouse = look  Esc = quit
//!
//! ```bash
//! cargo run --release -- --map maps/demo.map [--config gridcast.toml]
//! ```

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;

use gridcast::{
    Config,
    engine::{Game, Scheduler},
    platform::Platform,
    renderer::Surface,
    world::{demo_map, load_map},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Map file (digits 0/1/2, one row per line); built-in map if omitted
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// TOML configuration; defaults if omitted
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    width: usize,

    /// Initial window height
    #[arg(long, default_value_t = 800)]
    height: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    // ─────────── config & map ───────
    let cfg = match &opts.config {
        Some(path) => {
            log::debug!("config from {}", path.display());
            Config::from_file(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => Config::default(),
    };
    let map = match &opts.map {
        Some(path) => load_map(path, cfg.tile_size)
            .with_context(|| format!("loading map {}", path.display()))?,
        None => demo_map(cfg.tile_size).context("built-in map")?,
    };
    log::info!(
        "map {}×{}, spawn tile {:?}",
        map.width(),
        map.height(),
        map.spawn_tile()
    );

    // ─────────── window & game ───────
    let mut platform = Platform::open("gridcast", opts.width, opts.height, &cfg)?;
    let mut game = Game::new(&cfg, map, platform.viewport());
    log::info!(
        "viewport {}×{}, {} rays, {:?} tick",
        game.screen().w,
        game.screen().h,
        game.ray_count(),
        cfg.tick()
    );

    let mut sched = Scheduler::new(Instant::now());
    sched.schedule_tick(Duration::ZERO);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO; // cumulated tick time
    let mut acc_ticks = 0usize; // ticks in the current window
    let mut acc_redraws = 0usize;
    let mut last_print = Instant::now();

    while platform.is_open() {
        platform.poll(&mut sched);
        sched.advance(Instant::now());

        let mut dirty = false;
        while let Some(ev) = sched.pop() {
            let t0 = Instant::now();
            if let Some(outcome) = game.dispatch(ev, &mut platform, &mut sched) {
                acc_time += t0.elapsed();
                acc_ticks += 1;
                if outcome.redrew() {
                    acc_redraws += 1;
                    dirty = true;
                }
            }
        }

        if dirty {
            platform.present()?;
        } else {
            platform.update();
        }

        if last_print.elapsed() >= Duration::from_secs(3) && acc_ticks > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_ticks as f64;
            let rate = acc_ticks as f64 / last_print.elapsed().as_secs_f64();
            log::info!("avg tick: {avg_ms:.3} ms  ({rate:.1} ticks/s, {acc_redraws} redraws)");
            acc_time = Duration::ZERO;
            acc_ticks = 0;
            acc_redraws = 0;
            last_print = Instant::now();
        }

        // sleep until the next tick, but keep input responsive
        let wait = sched
            .next_deadline()
            .map(|t| t.saturating_duration_since(Instant::now()))
            .unwrap_or(cfg.tick())
            .min(Duration::from_millis(4));
        thread::sleep(wait);
    }
    Ok(())
}
