use thiserror::Error;

#[derive(Error, Debug)]
pub enum LearnerError {
    #[error("action {action} outside 0..{action_size}")]
    InvalidAction { action: usize, action_size: usize },

    #[error("Learner error: {0}")]
    LearnerError(#[from] Box<dyn std::error::Error + Send + Sync>),
}
