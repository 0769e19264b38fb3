use super::traits::{PoseAdjustment, Redirector, Steering, TickContext};
use crate::geometry::RoomGeometry;

/// Curvature gain driven by an external steering command.
///
/// Walking `d` meters under full-strength steering rotates the room by
/// `d / radius` radians, so a user walking a straight virtual line walks a
/// circle of `radius` meters in the room.
#[derive(Debug, Clone)]
pub struct CurvatureRedirector {
    curvature_radius: f32,
    steering: Steering,
}

impl CurvatureRedirector {
    pub fn new(curvature_radius: f32) -> Self {
        Self {
            curvature_radius,
            steering: Steering::None,
        }
    }

    pub fn steering(&self) -> Steering {
        self.steering
    }
}

/// Injected rotation in degrees for `distance` meters walked at `strength`.
pub(crate) fn curvature_rotation(distance: f32, strength: f32, radius: f32) -> f32 {
    strength * (distance / radius).to_degrees()
}

impl Redirector for CurvatureRedirector {
    fn name(&self) -> &str {
        "curvature"
    }

    fn initialize(&mut self, _geometry: &RoomGeometry) {
        self.steering = Steering::None;
    }

    fn apply_redirection(&mut self, ctx: &TickContext<'_>) -> PoseAdjustment {
        let distance = ctx.delta.position.length();
        PoseAdjustment::rotation(curvature_rotation(
            distance,
            self.steering.strength(),
            self.curvature_radius,
        ))
    }

    fn set_steering(&mut self, steering: Steering) {
        self.steering = steering;
    }
}
