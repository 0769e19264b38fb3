use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::errors::LearnerError;
use super::traits::Policy;
use crate::env::EnvironmentParameters;

/// Uniform random actions. Baseline and smoke-test policy.
#[derive(Debug)]
pub struct RandomPolicy {
    action_size: usize,
    rng: StdRng,
    episode_return: f32,
    returns: Vec<f32>,
}

impl RandomPolicy {
    pub fn new(params: &EnvironmentParameters, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            action_size: params.action_size,
            rng,
            episode_return: 0.0,
            returns: Vec::new(),
        }
    }

    /// Undiscounted return of every finished episode, oldest first.
    pub fn returns(&self) -> &[f32] {
        &self.returns
    }
}

#[async_trait]
impl<O: Sync> Policy<O> for RandomPolicy {
    async fn select_action(&mut self, _obs: &O) -> Result<usize, LearnerError> {
        if self.action_size == 0 {
            return Err(LearnerError::InvalidAction {
                action: 0,
                action_size: 0,
            });
        }
        Ok(self.rng.gen_range(0..self.action_size))
    }

    async fn receive_reward(
        &mut self,
        reward: f32,
        _next_obs: &O,
        done: bool,
    ) -> Result<(), LearnerError> {
        self.episode_return += reward;
        if done {
            self.returns.push(self.episode_return);
            self.episode_return = 0.0;
        }
        Ok(())
    }
}
