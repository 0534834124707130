//! Headless entry point: ingest the configured datasets, then either run
//! the terminal timelapse or regenerate cleaned mirror files.
//!
//! The playback loop here is the stand-in for a renderer: it owns the
//! clock, measures per-frame deltas and feeds them to the player, which
//! never advances on its own.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tracing::info;

use fl_core::TimelapsePlayer;
use fl_data::{export, DataStore, PlayerSettings, SessionConfig};

/// Frame pacing for the terminal loop, roughly 60 fps.
const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let config_path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => bail!("usage: firelapse <config.json> [clean <out-dir>]"),
    };

    let config = SessionConfig::from_path(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    let store = DataStore::load(&config.datasets).context("ingesting datasets")?;
    info!(
        events = store.event_count(),
        dates = store.date_count(),
        "ingestion complete"
    );

    match args.next().as_deref() {
        Some("clean") => {
            let out_dir = match args.next() {
                Some(dir) => PathBuf::from(dir),
                None => bail!("usage: firelapse <config.json> clean <out-dir>"),
            };
            clean(&store, &out_dir)
        }
        Some(other) => bail!("unknown command '{}'", other),
        None => run_playback(store, &config.player),
    }
}

/// Write the four cleaned mirror files into `out_dir`.
fn clean(store: &DataStore, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    export::export_all(store, out_dir).context("exporting cleaned datasets")?;
    Ok(())
}

/// Drive the player frame by frame until it auto-pauses at the end of the
/// data, printing the cursor label and visible-fire count on every frame
/// that advanced.
fn run_playback(store: DataStore, settings: &PlayerSettings) -> Result<()> {
    let store = Arc::new(store);
    let mut player = TimelapsePlayer::new(store, settings)?;
    info!(
        start = %player.current_date_label(),
        speed = player.speed(),
        "starting timelapse"
    );

    let mut previous = Instant::now();
    loop {
        std::thread::sleep(FRAME);
        let now = Instant::now();
        let delta_ms = now.duration_since(previous).as_secs_f64() * 1000.0;
        previous = now;

        if player.tick(delta_ms) {
            println!(
                "{}  {:>6} fires visible",
                player.current_date_label(),
                player.current_window().len()
            );
        }
        if !player.is_playing() {
            break;
        }
    }

    info!(end = %player.current_date_label(), "timelapse finished");
    Ok(())
}
