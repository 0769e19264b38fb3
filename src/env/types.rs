use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceKind {
    Discrete,
    Continuous,
}

/// Declarative description of an environment, fixed once it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentParameters {
    pub env_name: String,
    /// Number of continuous observation features (zero for purely discrete states).
    pub observation_size: usize,
    /// Number of discrete states.
    pub state_size: usize,
    pub action_size: usize,
    pub action_names: Vec<String>,
    pub state_space: SpaceKind,
    pub action_space: SpaceKind,
    pub max_steps: u64,
    pub num_agents: usize,
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeEnd {
    /// Hit the step limit. Not a failure.
    Truncated,
    /// A reset started while the environment terminates on resets.
    OutOfBounds,
    /// The host signaled a terminal condition.
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EpisodeState {
    pub step_count: u64,
    pub cumulative_reward: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub episode: EpisodeState,
    pub in_reset: bool,
    pub end: Option<EpisodeEnd>,
}

/// One recorded transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step<O, A> {
    pub obs: O,
    pub act: A,
    pub rew: f32,
    pub done: bool,
    pub info: serde_json::Value, // Keep it simple for now
}
