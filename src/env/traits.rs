use super::types::EnvironmentParameters;
use crate::env::errors::EnvError;
use crate::time::Pacing;

/// An episodic environment driven one action at a time.
pub trait Env: Send {
    type Obs: Send + Clone + 'static;
    type Act: Send + Clone + 'static;
    type Info: Send + Clone + 'static;

    /// Static description used by policies to size themselves.
    fn parameters(&self) -> &EnvironmentParameters;

    fn reset(&mut self) -> Result<Self::Obs, EnvError>;
    fn step(&mut self, act: Self::Act) -> Result<(Self::Obs, f32, bool, Self::Info), EnvError>;
    fn close(&mut self) -> Result<(), EnvError>;

    /// Current observation, without stepping.
    fn observe(&self) -> Self::Obs;

    /// Called by runners before they start ticking. Environments with their own
    /// time source switch it to match.
    fn set_pacing(&mut self, _pacing: Pacing) {}
}
