// Episode runner: observe, act, reward, and reset when an episode ends.
use crate::config::SimConfig;
use crate::env::{Env, EnvError, EpisodeEnd, Step, StepInfo};
use crate::learner::{LearnerError, Policy};
pub use crate::time::Pacing;
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum TrainError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Learner(#[from] LearnerError),

    #[error("failed to record step: {0}")]
    Record(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub max_episodes: u64,
    pub pacing: Pacing,
    /// Sleep after every tick when paced.
    pub wait_interval: Duration,
}

impl TrainConfig {
    /// Wait interval from the grid section of `config`.
    pub fn from_config(config: &SimConfig, max_episodes: u64, pacing: Pacing) -> Self {
        Self {
            max_episodes,
            pacing,
            wait_interval: config.grid.wait_interval(),
        }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::from_config(&SimConfig::default(), 10, Pacing::Deterministic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub reward: f32,
    pub steps: u64,
    pub end: EpisodeEnd,
}

#[derive(Debug, Default)]
pub struct TrainingStats {
    pub total_steps: u64,
    pub total_episodes: u64,
    pub training_time: Duration,
    pub episodes: Vec<EpisodeSummary>,
    pub truncated: u64,
    pub out_of_bounds: u64,
    pub external: u64,
}

impl TrainingStats {
    fn record(&mut self, summary: EpisodeSummary) {
        self.total_steps += summary.steps;
        self.total_episodes += 1;
        match summary.end {
            EpisodeEnd::Truncated => self.truncated += 1,
            EpisodeEnd::OutOfBounds => self.out_of_bounds += 1,
            EpisodeEnd::External => self.external += 1,
        }
        self.episodes.push(summary);
    }

    pub fn mean_reward(&self) -> f32 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes.iter().map(|e| e.reward).sum::<f32>() / self.episodes.len() as f32
    }
}

/// Run one episode starting from `obs`, the observation of the current frame.
///
/// Returns the episode summary and the first observation of the next episode,
/// since the environment is reset as soon as this one ends.
pub async fn run_episode<E, P>(
    env: &mut E,
    policy: &mut P,
    mut obs: E::Obs,
    cfg: &TrainConfig,
    mut trajectory: Option<&mut Vec<Step<E::Obs, usize>>>,
) -> Result<(EpisodeSummary, E::Obs), TrainError>
where
    E: Env<Act = usize, Info = StepInfo>,
    E::Obs: Sync,
    P: Policy<E::Obs>,
{
    let mut reward = 0.0;
    let mut steps = 0;
    loop {
        let act = policy.select_action(&obs).await?;
        let (next_obs, rew, done, info) = env.step(act)?;
        policy.receive_reward(rew, &next_obs, done).await?;
        reward += rew;
        steps += 1;

        if let Some(trajectory) = trajectory.as_deref_mut() {
            trajectory.push(Step {
                obs: obs.clone(),
                act,
                rew,
                done,
                info: serde_json::to_value(info)?,
            });
        }

        if cfg.pacing == Pacing::Paced {
            tokio::time::sleep(cfg.wait_interval).await;
        }

        if done {
            // The environment always reports a cause when done is set.
            let end = info.end.unwrap_or(EpisodeEnd::External);
            let next = env.reset()?;
            return Ok((EpisodeSummary { reward, steps, end }, next));
        }
        obs = next_obs;
    }
}

/// Run `cfg.max_episodes` episodes. Steps are appended to `trajectory` when given.
///
/// The first episode is the one the environment is in; reset it first if its
/// last episode has ended. The environment is left reset for the next one.
pub async fn train<E, P>(
    env: &mut E,
    policy: &mut P,
    cfg: &TrainConfig,
    mut trajectory: Option<&mut Vec<Step<E::Obs, usize>>>,
) -> Result<TrainingStats, TrainError>
where
    E: Env<Act = usize, Info = StepInfo>,
    E::Obs: Sync,
    P: Policy<E::Obs>,
{
    let start = Instant::now();
    let mut stats = TrainingStats::default();
    env.set_pacing(cfg.pacing);
    let mut obs = env.observe();

    info!(
        env = %env.parameters().env_name,
        episodes = cfg.max_episodes,
        pacing = ?cfg.pacing,
        "training started"
    );
    for episode in 0..cfg.max_episodes {
        let (summary, next) =
            run_episode(env, policy, obs, cfg, trajectory.as_deref_mut()).await?;
        debug!(episode, reward = summary.reward, steps = summary.steps, end = ?summary.end);
        stats.record(summary);
        obs = next;
    }
    stats.training_time = start.elapsed();
    info!(
        episodes = stats.total_episodes,
        steps = stats.total_steps,
        mean_reward = stats.mean_reward(),
        "training finished"
    );
    Ok(stats)
}
