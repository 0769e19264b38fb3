use super::errors::LearnerError;
use async_trait::async_trait;

/// Decision side of the interaction loop: picks an action for an
/// observation and is told the outcome.
#[async_trait]
pub trait Policy<O: Sync>: Send {
    async fn select_action(&mut self, obs: &O) -> Result<usize, LearnerError>;

    /// Outcome of the last selected action. `done` marks the end of an episode.
    async fn receive_reward(&mut self, reward: f32, next_obs: &O, done: bool)
    -> Result<(), LearnerError>;
}
