use tracing::debug;

use super::traits::{PoseAdjustment, Resetter, TickContext};
use crate::geometry::{RoomGeometry, is_out_of_bounds};
use crate::math::Vec2;

/// 2:1 turn reset.
///
/// The user turns in place by `turn_angle` degrees while the room is rotated by
/// the same amount in the same direction, so they face back into the room while
/// their virtual heading sweeps a full `2 * turn_angle`.
#[derive(Debug, Clone)]
pub struct TurnResetter {
    boundary_buffer: f32,
    turn_angle: f32,
    /// Room shrunk by the buffer; the trigger area.
    bounds: Option<RoomGeometry>,
    turned: f32,
    active: bool,
}

impl TurnResetter {
    pub fn new(boundary_buffer: f32, turn_angle: f32) -> Self {
        Self {
            boundary_buffer,
            turn_angle,
            bounds: None,
            turned: 0.0,
            active: false,
        }
    }

    /// Trigger area from the last `initialize`.
    pub fn bounds(&self) -> Option<&RoomGeometry> {
        self.bounds.as_ref()
    }

    pub fn turned(&self) -> f32 {
        self.turned
    }
}

impl Resetter for TurnResetter {
    fn name(&self) -> &str {
        "turn"
    }

    fn initialize(&mut self, geometry: &RoomGeometry) {
        self.bounds = geometry
            .shrunk(self.boundary_buffer)
            .or_else(|| Some(geometry.clone()));
        debug!(
            width = geometry.width(),
            depth = geometry.depth(),
            buffer = self.boundary_buffer,
            "turn resetter bound to room"
        );
    }

    fn is_user_out_of_bounds(&self, ctx: &TickContext<'_>) -> bool {
        let bounds = self.bounds.as_ref().unwrap_or(ctx.geometry);
        is_out_of_bounds(ctx.current.real_pose.position, bounds)
    }

    /// Only when the user is walking outward; someone already facing back
    /// into the room can simply keep going.
    fn is_reset_required(&self, ctx: &TickContext<'_>) -> bool {
        let real = &ctx.current.real_pose;
        let to_center = Vec2::ZERO - real.position;
        real.direction.dot(to_center) < 0.0
    }

    fn initialize_reset(&mut self, _ctx: &TickContext<'_>) {
        self.turned = 0.0;
        self.active = true;
    }

    fn apply_resetting(&mut self, ctx: &TickContext<'_>) -> PoseAdjustment {
        if !self.active {
            return PoseAdjustment::NONE;
        }
        // The user's own turn this tick, in the room frame.
        let remaining = self.turn_angle - self.turned;
        let turn = ctx.delta.direction.clamp(-remaining, remaining);
        self.turned += turn.abs();
        PoseAdjustment::rotation(turn)
    }

    fn reset_finished(&self) -> bool {
        self.active && self.turned >= self.turn_angle
    }

    fn finalize_reset(&mut self) {
        self.active = false;
        self.turned = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{Delta, FrameState, Pose};

    fn frame(position: Vec2, direction: Vec2) -> FrameState {
        let pose = Pose {
            position,
            direction,
        };
        FrameState {
            virtual_pose: pose,
            real_pose: pose,
        }
    }

    fn ctx<'a>(
        frame: &'a FrameState,
        geometry: &'a RoomGeometry,
        turn: f32,
    ) -> TickContext<'a> {
        TickContext {
            current: frame,
            previous: frame,
            delta: Delta {
                position: Vec2::ZERO,
                direction: turn,
            },
            geometry,
            dt: 1.0 / 60.0,
        }
    }

    #[test]
    fn buffer_makes_bounds_stricter() {
        let geometry = RoomGeometry::new(10.0, 10.0).unwrap();
        let mut r = TurnResetter::new(0.5, 180.0);
        assert!(r.bounds().is_none());
        r.initialize(&geometry);
        assert_eq!(r.bounds().map(|b| b.width()), Some(9.0));
        let near_wall = frame(Vec2::new(4.7, 0.0), Vec2::X);
        assert!(r.is_user_out_of_bounds(&ctx(&near_wall, &geometry, 0.0)));
        let inside = frame(Vec2::new(4.4, 0.0), Vec2::X);
        assert!(!r.is_user_out_of_bounds(&ctx(&inside, &geometry, 0.0)));
    }

    #[test]
    fn reset_only_required_when_facing_out() {
        let geometry = RoomGeometry::new(10.0, 10.0).unwrap();
        let r = TurnResetter::new(0.5, 180.0);
        let outward = frame(Vec2::new(4.8, 0.0), Vec2::X);
        assert!(r.is_reset_required(&ctx(&outward, &geometry, 0.0)));
        let inward = frame(Vec2::new(4.8, 0.0), -Vec2::X);
        assert!(!r.is_reset_required(&ctx(&inward, &geometry, 0.0)));
    }

    #[test]
    fn turn_completes_after_turn_angle() {
        let geometry = RoomGeometry::new(10.0, 10.0).unwrap();
        let frame = frame(Vec2::new(4.8, 0.0), Vec2::X);
        let mut r = TurnResetter::new(0.5, 180.0);
        r.initialize(&geometry);
        r.initialize_reset(&ctx(&frame, &geometry, 0.0));

        let mut injected = 0.0;
        for _ in 0..3 {
            assert!(!r.reset_finished());
            injected += r.apply_resetting(&ctx(&frame, &geometry, 50.0)).rotation;
        }
        assert!(!r.reset_finished());
        assert!((r.turned() - 150.0).abs() < 1e-4);
        // last step is capped at what is left
        injected += r.apply_resetting(&ctx(&frame, &geometry, 50.0)).rotation;
        assert!((injected - 180.0).abs() < 1e-4);
        assert!(r.reset_finished());

        r.finalize_reset();
        assert_eq!(r.turned(), 0.0);
        assert!(!r.reset_finished());
        assert!(r.apply_resetting(&ctx(&frame, &geometry, 50.0)).is_none());
    }
}
