use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no tokio runtime available to spawn the planner")]
    NoRuntime,

    #[error("planner task canceled")]
    Canceled,

    #[error("planner task panicked: {0}")]
    Panicked(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            Error::Canceled
        } else {
            Error::Panicked(err.to_string())
        }
    }
}
