use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::errors::EnvError;
use super::traits::Env;
use super::types::{EnvironmentParameters, EpisodeEnd, EpisodeState, SpaceKind, StepInfo};
use super::walker::SimulatedUser;
use crate::config::SimConfig;
use crate::control::RedirectionManager;
use crate::geometry::RoomGeometry;
use crate::math::{Vec2, from_degrees};
use crate::strategy::{CurvatureRedirector, Redirector, Resetter, Steering, TurnResetter};
use crate::time::{Clock, Pacing};

/// Grid cell of a room-relative position on a `grid_size` x `grid_size` grid
/// spanning the room, row-major from the `(-w/2, -d/2)` corner.
///
/// Positions on or past the far walls land in the last row/column, positions
/// outside the room in the nearest edge cell.
pub fn grid_cell(real: Vec2, geometry: &RoomGeometry, grid_size: usize) -> usize {
    let n = grid_size as f32;
    let nx = (real.x + geometry.width() / 2.0) / geometry.width() * n;
    let ny = (real.y + geometry.depth() / 2.0) / geometry.depth() * n;
    let last = grid_size.saturating_sub(1) as f32;
    let cx = nx.floor().clamp(0.0, last) as usize;
    let cy = ny.floor().clamp(0.0, last) as usize;
    grid_size * cy + cx
}

/// The redirection loop as an episodic MDP.
///
/// Observation is the grid cell of the user's physical position, actions are
/// [`Steering`] indices forwarded to the redirector, and the reward penalizes
/// steering effort and, far more heavily, being in a reset.
pub struct GridEnvironment {
    config: SimConfig,
    params: EnvironmentParameters,
    manager: RedirectionManager,
    user: SimulatedUser,
    clock: Clock,
    rng: StdRng,
    episode: EpisodeState,
    episodes: u64,
    terminal_signal: bool,
    needs_reset: bool,
    closed: bool,
}

impl GridEnvironment {
    /// Curvature redirection with a 2:1 turn resetter, as configured.
    pub fn new(config: SimConfig) -> Result<Self, EnvError> {
        let redirector = CurvatureRedirector::new(config.redirector.curvature_radius);
        let resetter = TurnResetter::new(
            config.resetter.boundary_buffer,
            config.resetter.turn_angle,
        );
        Self::with_strategies(config, Box::new(redirector), Box::new(resetter))
    }

    pub fn with_strategies(
        config: SimConfig,
        redirector: Box<dyn Redirector>,
        resetter: Box<dyn Resetter>,
    ) -> Result<Self, EnvError> {
        config.validate()?;
        let geometry = RoomGeometry::new(config.room.width, config.room.depth).ok_or_else(|| {
            crate::config::ConfigError::Invalid("room dimensions must be positive".into())
        })?;

        let grid_size = config.grid.grid_size;
        let params = EnvironmentParameters {
            env_name: "GridRW".to_string(),
            observation_size: 0,
            state_size: grid_size * grid_size,
            action_size: Steering::ALL.len(),
            action_names: Steering::ALL.iter().map(|s| s.name().to_string()).collect(),
            state_space: SpaceKind::Discrete,
            action_space: SpaceKind::Discrete,
            max_steps: config.grid.max_steps,
            num_agents: 1,
        };

        let rng = match config.grid.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut env = Self {
            manager: RedirectionManager::new(geometry, redirector, resetter),
            user: SimulatedUser::new(config.walker.clone()),
            clock: Clock::from_config(&config.time),
            params,
            rng,
            config,
            episode: EpisodeState::default(),
            episodes: 0,
            terminal_signal: false,
            needs_reset: false,
            closed: false,
        };
        env.reset()?;
        info!(
            env = %env.params.env_name,
            states = env.params.state_size,
            actions = env.params.action_size,
            "environment created"
        );
        Ok(env)
    }

    pub fn manager(&self) -> &RedirectionManager {
        &self.manager
    }

    /// For the host: external reset triggers, strategy swaps, room resizes.
    pub fn manager_mut(&mut self) -> &mut RedirectionManager {
        &mut self.manager
    }

    pub fn user(&self) -> &SimulatedUser {
        &self.user
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn episode(&self) -> &EpisodeState {
        &self.episode
    }

    /// Episodes started so far, including the current one.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// End the current episode on the next step.
    pub fn signal_terminal(&mut self) {
        self.terminal_signal = true;
    }

    /// Discretized observation of the current frame.
    pub fn collect_state(&self) -> usize {
        grid_cell(
            self.manager.current().real_pose.position,
            self.manager.geometry(),
            self.config.grid.grid_size,
        )
    }

    /// Reward for `steering` given the loop's state after the tick. Adds it to
    /// the episode total.
    pub fn middle_step(&mut self, steering: Steering) -> f32 {
        let reward = self.config.rewards.reward(steering, self.manager.in_reset());
        self.episode.cumulative_reward += reward;
        reward
    }

    /// Half-extents of the area episode start positions are drawn from.
    pub fn placement_range(&self) -> Vec2 {
        let margin = self.config.grid.placement_margin;
        let half = self.manager.geometry().half_extents();
        Vec2::new((half.x - margin).max(0.0), (half.y - margin).max(0.0))
    }

    fn episode_end(&self) -> Option<EpisodeEnd> {
        if self.terminal_signal {
            Some(EpisodeEnd::External)
        } else if self.config.grid.terminate_on_reset && self.manager.in_reset() {
            Some(EpisodeEnd::OutOfBounds)
        } else if self.episode.step_count >= self.config.grid.max_steps {
            Some(EpisodeEnd::Truncated)
        } else {
            None
        }
    }
}

impl Env for GridEnvironment {
    type Obs = usize;
    type Act = usize;
    type Info = StepInfo;

    fn parameters(&self) -> &EnvironmentParameters {
        &self.params
    }

    fn reset(&mut self) -> Result<Self::Obs, EnvError> {
        if self.closed {
            return Err(EnvError::Closed);
        }
        if self.manager.in_reset() {
            debug!("abandoning reset in progress for new episode");
            self.manager.on_reset_end();
        }

        self.episode = EpisodeState::default();
        self.terminal_signal = false;
        self.needs_reset = false;

        let range = self.placement_range();
        let x = if range.x > 0.0 { self.rng.gen_range(-range.x..=range.x) } else { 0.0 };
        let y = if range.y > 0.0 { self.rng.gen_range(-range.y..=range.y) } else { 0.0 };
        let heading = self.rng.gen_range(-180.0f32..180.0);
        self.user.place(Vec2::new(x, y), from_degrees(heading));
        self.manager.set_steering(Steering::None);
        self.manager
            .resync(&self.user.head(self.manager.room_transform()));

        self.episodes += 1;
        debug!(episode = self.episodes, x, y, heading, "episode started");
        Ok(self.collect_state())
    }

    fn step(&mut self, act: Self::Act) -> Result<(Self::Obs, f32, bool, Self::Info), EnvError> {
        if self.closed {
            return Err(EnvError::Closed);
        }
        if self.needs_reset {
            return Err(EnvError::NeedsReset);
        }
        let steering = Steering::from_index(act).ok_or(EnvError::InvalidAction {
            index: act,
            action_size: self.params.action_size,
        })?;

        self.manager.set_steering(steering);
        let dt = self.clock.advance();
        self.user.advance(
            self.manager.room_transform(),
            dt,
            self.manager.in_reset(),
            &mut self.rng,
        );
        let raw = self.user.head(self.manager.room_transform());
        self.manager.tick(&raw, dt);

        let reward = self.middle_step(steering);
        self.episode.step_count += 1;

        let end = self.episode_end();
        if let Some(end) = end {
            self.needs_reset = true;
            info!(
                episode = self.episodes,
                steps = self.episode.step_count,
                reward = self.episode.cumulative_reward,
                ?end,
                "episode ended"
            );
        }

        let info = StepInfo {
            episode: self.episode,
            in_reset: self.manager.in_reset(),
            end,
        };
        Ok((self.collect_state(), reward, end.is_some(), info))
    }

    fn observe(&self) -> Self::Obs {
        self.collect_state()
    }

    fn set_pacing(&mut self, pacing: Pacing) {
        let paced = pacing == Pacing::Paced;
        if paced == self.clock.is_fixed() {
            self.clock = Clock::for_pacing(pacing, &self.config.time);
            debug!(?pacing, "clock switched");
        }
    }

    fn close(&mut self) -> Result<(), EnvError> {
        if self.closed {
            return Ok(());
        }
        self.manager.update_redirector(None);
        self.manager.update_resetter(None);
        self.closed = true;
        debug!(episodes = self.episodes, "environment closed");
        Ok(())
    }
}
