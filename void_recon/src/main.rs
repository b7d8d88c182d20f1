//! void_recon: interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hand_intent::GesturePolicy;
use void_recon::app::run;
use void_recon::config::AppConfig;
use void_world::{ControlMode, Difficulty};

#[derive(Parser, Debug)]
#[command(name = "void_recon", version, about = "Hands-free target gallery")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// one-hand or two-hands
    #[arg(short, long)]
    mode: Option<ControlMode>,

    /// pinch, gun or tap
    #[arg(short, long)]
    style: Option<GesturePolicy>,

    /// Seed for target placement (repeatable rounds)
    #[arg(long)]
    seed: Option<u64>,

    /// Countdown before a round starts, seconds
    #[arg(long)]
    countdown: Option<f32>,

    /// Start with sound cues off
    #[arg(long)]
    no_sound: bool,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "void_recon=debug,hand_intent=debug,void_world=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .init();

    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(d) = cli.difficulty { cfg.difficulty = d; }
    if let Some(m) = cli.mode       { cfg.mode = m; }
    if let Some(s) = cli.style      { cfg.style = s; }
    if let Some(c) = cli.countdown  { cfg.countdown_secs = c; }
    if cli.seed.is_some()           { cfg.seed = cli.seed; }
    if cli.no_sound                 { cfg.sound.enabled = false; }
    let cfg = cfg.validate().context("invalid configuration")?;

    #[cfg(feature = "leap")]
    info!("hand source: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    info!("hand source: mouse simulation (build with --features leap for hardware)");
    info!(difficulty = %cfg.difficulty, mode = %cfg.mode, style = %cfg.style, "starting");

    run(cfg)?;
    Ok(())
}
