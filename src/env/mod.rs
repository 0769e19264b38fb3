mod errors;
mod grid;
mod traits;
mod types;
mod walker;

pub use errors::EnvError;
pub use grid::{GridEnvironment, grid_cell};
pub use traits::Env;
pub use types::{EnvironmentParameters, EpisodeEnd, EpisodeState, SpaceKind, Step, StepInfo};
pub use walker::SimulatedUser;
