//! Train a policy against the grid redirected-walking environment.
//!
//! ```text
//! rdw-train --config sim.json --episodes 50 --trajectory steps.jsonl
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use rdw::config::SimConfig;
use rdw::env::{Env, GridEnvironment};
use rdw::learner::RandomPolicy;
use rdw::strategy::{
    CurvatureRedirector, NullRedirector, PlanningRedirector, Redirector, TurnResetter,
};
use rdw::train::{Pacing, TrainConfig, train};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RedirectorKind {
    /// Curvature gain steered by the policy's actions.
    Curvature,
    /// Background planner steering toward the room center.
    Planning,
    /// No redirection.
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rdw-train")]
#[command(about = "Run a policy against the grid redirected-walking environment")]
struct Args {
    /// Simulation config (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of episodes to run.
    #[arg(long, default_value = "10")]
    episodes: u64,

    /// Wait between ticks and use wall-clock time.
    #[arg(long)]
    paced: bool,

    /// Write every step as a JSON line to this file.
    #[arg(long)]
    trajectory: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "curvature")]
    redirector: RedirectorKind,

    /// Seed for the environment and the policy. Overrides the config.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(args.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    if args.seed.is_some() {
        config.grid.seed = args.seed;
    }

    let redirector: Box<dyn Redirector> = match args.redirector {
        RedirectorKind::Curvature => {
            Box::new(CurvatureRedirector::new(config.redirector.curvature_radius))
        }
        RedirectorKind::Planning => Box::new(PlanningRedirector::spawn(
            config.redirector.curvature_radius,
            Duration::from_millis(config.redirector.planning_interval_ms),
        )?),
        RedirectorKind::Null => Box::new(NullRedirector),
    };
    let resetter = TurnResetter::new(
        config.resetter.boundary_buffer,
        config.resetter.turn_angle,
    );

    let pacing = if args.paced {
        Pacing::Paced
    } else {
        Pacing::Deterministic
    };
    let cfg = TrainConfig::from_config(&config, args.episodes, pacing);

    let mut env = GridEnvironment::with_strategies(config, redirector, Box::new(resetter))?;
    let mut policy = RandomPolicy::new(env.parameters(), env.config().grid.seed);

    let mut trajectory = Vec::new();
    let recording = args.trajectory.is_some().then_some(&mut trajectory);
    let stats = train(&mut env, &mut policy, &cfg, recording).await?;
    env.close()?;

    if let Some(path) = &args.trajectory {
        let file = File::create(path)
            .with_context(|| format!("creating trajectory file {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for step in &trajectory {
            serde_json::to_writer(&mut out, step)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        info!(steps = trajectory.len(), path = %path.display(), "trajectory written");
    }

    info!(
        episodes = stats.total_episodes,
        steps = stats.total_steps,
        truncated = stats.truncated,
        out_of_bounds = stats.out_of_bounds,
        external = stats.external,
        mean_reward = stats.mean_reward(),
        elapsed = ?stats.training_time,
        "done"
    );
    Ok(())
}
