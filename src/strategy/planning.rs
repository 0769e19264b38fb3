use std::time::Duration;

use tracing::debug;

use super::curvature::curvature_rotation;
use super::traits::{PoseAdjustment, Redirector, Steering, TickContext};
use crate::geometry::RoomGeometry;
use crate::math::{Vec2, signed_angle};
use crate::runtime::{self, PlannerHandle, spawn_planner};
use crate::tracking::Pose;

/// Curvature redirection whose steering is planned on a background task.
///
/// The planner steers the user's physical heading toward the room center. Its
/// output is only read while the planner is running; during a reset the loop
/// pauses it and this redirector is not driven at all.
#[derive(Debug)]
pub struct PlanningRedirector {
    curvature_radius: f32,
    planner: PlannerHandle<Pose, Steering>,
    last_plan: Steering,
}

impl PlanningRedirector {
    /// Needs a tokio runtime to host the planner.
    pub fn spawn(curvature_radius: f32, period: Duration) -> Result<Self, runtime::Error> {
        let planner = spawn_planner(period, plan_toward_center)?;
        debug!(planner = %planner.id(), "planning redirector started");
        Ok(Self {
            curvature_radius,
            planner,
            last_plan: Steering::None,
        })
    }

    pub fn last_plan(&self) -> Steering {
        self.last_plan
    }
}

/// Steer left or right toward the room center, harder the further off it points.
pub fn plan_toward_center(real: &Pose) -> Steering {
    let to_center = Vec2::ZERO - real.position;
    if to_center.length() < 0.5 {
        return Steering::None;
    }
    let off = signed_angle(real.direction, to_center);
    match off {
        a if a.abs() < 10.0 => Steering::None,
        a if a.abs() < 45.0 && a > 0.0 => Steering::SmallLeft,
        a if a.abs() < 45.0 => Steering::SmallRight,
        a if a > 0.0 => Steering::LargeLeft,
        _ => Steering::LargeRight,
    }
}

impl Redirector for PlanningRedirector {
    fn name(&self) -> &str {
        "planning"
    }

    fn initialize(&mut self, _geometry: &RoomGeometry) {
        self.last_plan = Steering::None;
    }

    fn apply_redirection(&mut self, ctx: &TickContext<'_>) -> PoseAdjustment {
        self.planner.submit(ctx.current.real_pose);
        self.last_plan = self.planner.latest().unwrap_or(Steering::None);
        PoseAdjustment::rotation(curvature_rotation(
            ctx.delta.position.length(),
            self.last_plan.strength(),
            self.curvature_radius,
        ))
    }

    fn pause(&mut self) {
        self.planner.pause();
        self.last_plan = Steering::None;
    }

    fn resume(&mut self) {
        self.planner.resume();
    }

    fn is_paused(&self) -> bool {
        self.planner.is_paused()
    }

    fn release(&mut self) {
        self.planner.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::from_degrees;

    fn pose(position: Vec2, direction: Vec2) -> Pose {
        Pose {
            position,
            direction,
        }
    }

    #[test]
    fn plans_turn_toward_center() {
        let at = Vec2::new(3.0, 0.0);
        assert_eq!(plan_toward_center(&pose(at, -Vec2::X)), Steering::None);
        // facing +y at (3, 0): center is to the left
        assert_eq!(
            plan_toward_center(&pose(at, Vec2::new(0.0, 1.0))),
            Steering::LargeLeft
        );
        assert_eq!(
            plan_toward_center(&pose(at, Vec2::new(0.0, -1.0))),
            Steering::LargeRight
        );
        assert_eq!(
            plan_toward_center(&pose(at, from_degrees(160.0))),
            Steering::SmallLeft
        );
        assert_eq!(plan_toward_center(&pose(Vec2::ZERO, Vec2::X)), Steering::None);
    }

    #[tokio::test]
    async fn pause_is_forwarded_to_planner() {
        let mut r = PlanningRedirector::spawn(7.5, Duration::from_millis(1)).unwrap();
        assert!(!r.is_paused());
        r.pause();
        assert!(r.is_paused());
        r.resume();
        assert!(!r.is_paused());
        r.release();
    }
}
