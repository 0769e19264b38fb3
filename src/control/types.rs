use serde::{Deserialize, Serialize};

use crate::strategy::PoseAdjustment;
use crate::tracking::Delta;

/// Which strategy family owns the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Redirecting,
    Resetting,
}

/// Where a reset request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerSource {
    /// Host signal, e.g. a boundary trip-wire.
    External,
    /// The loop's own per-tick boundary check.
    SafetyNet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerOutcome {
    Entered,
    /// Already resetting; the trigger was ignored.
    AlreadyResetting,
    /// The resetter said no reset is needed.
    Declined,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickReport {
    /// Strategy family that was driven this tick.
    pub mode: Mode,
    pub delta: Delta,
    pub adjustment: PoseAdjustment,
    /// Outcome of the safety-net check, if it fired.
    pub safety_net: Option<TriggerOutcome>,
    pub reset_ended: bool,
}
