use rand::Rng;

use crate::config::WalkerConfig;
use crate::geometry::RoomTransform;
use crate::math::{Vec2, from_degrees, rotate_degrees, signed_angle};
use crate::tracking::{Pose, RawPose};

/// Autopilot user standing in for a tracked person.
///
/// Owns the physical (room-frame) pose. Walks toward random virtual waypoints,
/// turning at most `angular_speed` per second, and turns in place while the
/// loop is resetting.
#[derive(Debug, Clone)]
pub struct SimulatedUser {
    config: WalkerConfig,
    real: Pose,
    waypoint: Option<Vec2>,
}

impl SimulatedUser {
    pub fn new(config: WalkerConfig) -> Self {
        Self {
            config,
            real: Pose::default(),
            waypoint: None,
        }
    }

    pub fn real(&self) -> &Pose {
        &self.real
    }

    /// Current virtual target, if one has been picked.
    pub fn waypoint(&self) -> Option<Vec2> {
        self.waypoint
    }

    pub fn set_waypoint(&mut self, waypoint: Vec2) {
        self.waypoint = Some(waypoint);
    }

    /// Teleport to a room position; the next waypoint is picked fresh.
    pub fn place(&mut self, position: Vec2, direction: Vec2) {
        self.real = Pose {
            position,
            direction: direction.normalize_or(Vec2::X),
        };
        self.waypoint = None;
    }

    /// Head pose in world coordinates under `room`.
    pub fn head(&self, room: &RoomTransform) -> RawPose {
        RawPose::on_ground(
            room.to_world_point(self.real.position),
            room.to_world_direction(self.real.direction),
        )
    }

    pub fn advance<R: Rng>(
        &mut self,
        room: &RoomTransform,
        dt: f32,
        resetting: bool,
        rng: &mut R,
    ) {
        let max_turn = self.config.angular_speed * dt;
        if resetting {
            self.turn(max_turn);
            return;
        }

        let position = room.to_world_point(self.real.position);
        let heading = room.to_world_direction(self.real.direction);

        let waypoint = match self.waypoint {
            Some(w) if w.distance(position) > self.config.waypoint_reach_distance => w,
            _ => {
                let w = self.pick_waypoint(position, heading, rng);
                self.waypoint = Some(w);
                w
            }
        };

        let desired = (waypoint - position).normalize_or(heading);
        let off = signed_angle(heading, desired);
        let turn = off.clamp(-max_turn, max_turn);
        self.turn(turn);

        // Walk once roughly facing the target.
        if (off - turn).abs() < 90.0 {
            let step = self.config.speed * dt;
            self.real.position += self.real.direction * step;
        }
    }

    fn turn(&mut self, degrees: f32) {
        self.real.direction =
            rotate_degrees(self.real.direction, degrees).normalize_or(self.real.direction);
    }

    fn pick_waypoint<R: Rng>(&self, position: Vec2, heading: Vec2, rng: &mut R) -> Vec2 {
        let base = signed_angle(Vec2::X, heading);
        let angle = base + rng.gen_range(-90.0f32..=90.0);
        let distance =
            rng.gen_range(self.config.waypoint_min_distance..=self.config.waypoint_max_distance);
        position + from_degrees(angle) * distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ground;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn walks_straight_toward_waypoint() {
        let mut user = SimulatedUser::new(WalkerConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let room = RoomTransform::default();
        user.place(Vec2::ZERO, Vec2::X);
        user.set_waypoint(Vec2::new(10.0, 0.0));
        for _ in 0..60 {
            user.advance(&room, 1.0 / 60.0, false, &mut rng);
        }
        assert!((user.real().position - Vec2::new(1.0, 0.0)).length() < 1e-3);
        assert_eq!(user.waypoint(), Some(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn turns_in_place_while_resetting() {
        let mut user = SimulatedUser::new(WalkerConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        user.place(Vec2::new(1.0, 1.0), Vec2::X);
        user.advance(&RoomTransform::default(), 0.5, true, &mut rng);
        assert_eq!(user.real().position, Vec2::new(1.0, 1.0));
        let turned = signed_angle(Vec2::X, user.real().direction);
        assert!((turned - 45.0).abs() < 1e-3);
    }

    #[test]
    fn picks_waypoint_within_configured_distance() {
        let config = WalkerConfig::default();
        let mut user = SimulatedUser::new(config.clone());
        let mut rng = StdRng::seed_from_u64(9);
        user.place(Vec2::ZERO, Vec2::X);
        user.advance(&RoomTransform::default(), 1.0 / 60.0, false, &mut rng);
        let d = user.waypoint().unwrap().length();
        assert!(d >= config.waypoint_min_distance - 1e-3);
        assert!(d <= config.waypoint_max_distance + 1e-3);
    }

    #[test]
    fn head_is_expressed_in_world_frame() {
        let mut user = SimulatedUser::new(WalkerConfig::default());
        user.place(Vec2::new(1.0, 0.0), Vec2::X);
        let room = RoomTransform {
            origin: Vec2::new(5.0, 5.0),
            yaw: 90.0,
        };
        let head = user.head(&room);
        assert!((ground(head.position) - Vec2::new(5.0, 6.0)).length() < 1e-5);
        assert!((ground(head.forward) - Vec2::new(0.0, 1.0)).length() < 1e-5);
    }
}
