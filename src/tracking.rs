use serde::{Deserialize, Serialize};

use crate::geometry::RoomTransform;
use crate::math::{Vec2, Vec3, ground, lift, signed_angle};

/// Raw head transform as reported by the host, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl RawPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    /// Head at ground position `position` looking along `direction`.
    pub fn on_ground(position: Vec2, direction: Vec2) -> Self {
        Self {
            position: lift(position, 0.0),
            forward: lift(direction, 0.0),
        }
    }
}

/// Ground-projected position and unit heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    pub direction: Vec2,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            direction: Vec2::X,
        }
    }
}

/// The user's pose in both frames, captured once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameState {
    /// World pose, as the user perceives it.
    pub virtual_pose: Pose,
    /// Room-relative pose, used for boundary checks.
    pub real_pose: Pose,
}

/// Change of the virtual pose between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    pub position: Vec2,
    /// Degrees, counterclockwise positive.
    pub direction: f32,
}

impl Delta {
    pub fn between(previous: &FrameState, current: &FrameState) -> Self {
        Self {
            position: current.virtual_pose.position - previous.virtual_pose.position,
            direction: signed_angle(
                previous.virtual_pose.direction,
                current.virtual_pose.direction,
            ),
        }
    }
}

/// Flattens raw head transforms into [`FrameState`]s.
///
/// A forward vector with no horizontal component (looking straight up or down)
/// keeps the last direction seen, so headings stay unit length.
#[derive(Debug, Clone)]
pub struct PoseTracker {
    last_direction: Vec2,
}

impl PoseTracker {
    pub fn new() -> Self {
        Self {
            last_direction: Vec2::X,
        }
    }

    pub fn capture(&mut self, raw: &RawPose, room: &RoomTransform) -> FrameState {
        let position = ground(raw.position);
        let direction = ground(raw.forward).normalize_or(self.last_direction);
        self.last_direction = direction;

        FrameState {
            virtual_pose: Pose {
                position,
                direction,
            },
            real_pose: Pose {
                position: room.to_room_point(position),
                direction: room
                    .to_room_direction(direction)
                    .normalize_or(Vec2::X),
            },
        }
    }
}

impl Default for PoseTracker {
    fn default() -> Self {
        Self::new()
    }
}
