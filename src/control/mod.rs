mod errors;
mod manager;
mod types;

pub use errors::ControlError;
pub use manager::RedirectionManager;
pub use types::{Mode, TickReport, TriggerOutcome, TriggerSource};
