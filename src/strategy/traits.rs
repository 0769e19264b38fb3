use serde::{Deserialize, Serialize};

use crate::geometry::RoomGeometry;
use crate::math::Vec2;
use crate::tracking::{Delta, FrameState};

/// Everything a strategy may read during one tick.
///
/// Built by the control loop and handed out by reference; strategies never see
/// the loop's mutable state directly.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub current: &'a FrameState,
    pub previous: &'a FrameState,
    pub delta: Delta,
    pub geometry: &'a RoomGeometry,
    /// Seconds since the previous tick.
    pub dt: f32,
}

/// What a strategy asks the loop to do to the room this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseAdjustment {
    /// World-space offset applied to the room origin.
    pub translation: Vec2,
    /// Degrees, counterclockwise positive, applied about the user's head.
    pub rotation: f32,
}

impl PoseAdjustment {
    pub const NONE: PoseAdjustment = PoseAdjustment {
        translation: Vec2::ZERO,
        rotation: 0.0,
    };

    pub fn rotation(degrees: f32) -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation: degrees,
        }
    }

    pub fn is_none(&self) -> bool {
        self.rotation == 0.0 && self.translation == Vec2::ZERO
    }
}

/// Discrete steering command, which doubles as the RL action space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Steering {
    #[default]
    None,
    SmallLeft,
    LargeLeft,
    SmallRight,
    LargeRight,
}

impl Steering {
    pub const ALL: [Steering; 5] = [
        Steering::None,
        Steering::SmallLeft,
        Steering::LargeLeft,
        Steering::SmallRight,
        Steering::LargeRight,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Steering::None => "None",
            Steering::SmallLeft => "SmallLeft",
            Steering::LargeLeft => "LargeLeft",
            Steering::SmallRight => "SmallRight",
            Steering::LargeRight => "LargeRight",
        }
    }

    /// Signed strength: positive turns left (counterclockwise), large is twice small.
    pub fn strength(self) -> f32 {
        match self {
            Steering::None => 0.0,
            Steering::SmallLeft => 0.5,
            Steering::LargeLeft => 1.0,
            Steering::SmallRight => -0.5,
            Steering::LargeRight => -1.0,
        }
    }
}

/// A redirection strategy, driven every tick the loop is not resetting.
pub trait Redirector: Send {
    fn name(&self) -> &str;

    /// Bind to the current room. Called on install and after every resize.
    fn initialize(&mut self, geometry: &RoomGeometry);

    fn apply_redirection(&mut self, ctx: &TickContext<'_>) -> PoseAdjustment;

    /// Stop background work. Called when a reset begins.
    fn pause(&mut self) {}

    /// Restart background work. Called when a reset ends.
    fn resume(&mut self) {}

    fn is_paused(&self) -> bool {
        false
    }

    /// Steering command chosen by an outer controller (e.g. a learned policy).
    fn set_steering(&mut self, _steering: Steering) {}

    /// Tear down before the loop drops this instance.
    fn release(&mut self) {}
}

/// A reset strategy, driven every tick the loop is resetting.
pub trait Resetter: Send {
    fn name(&self) -> &str;

    fn initialize(&mut self, geometry: &RoomGeometry);

    /// This strategy's own, possibly stricter, out-of-bounds test.
    fn is_user_out_of_bounds(&self, ctx: &TickContext<'_>) -> bool;

    /// Gate on entering a reset after a boundary event.
    fn is_reset_required(&self, ctx: &TickContext<'_>) -> bool;

    fn initialize_reset(&mut self, ctx: &TickContext<'_>);

    fn apply_resetting(&mut self, ctx: &TickContext<'_>) -> PoseAdjustment;

    /// True once the maneuver has completed; the loop then ends the reset.
    fn reset_finished(&self) -> bool {
        false
    }

    fn finalize_reset(&mut self);

    fn release(&mut self) {}
}
