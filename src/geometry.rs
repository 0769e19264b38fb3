use serde::{Deserialize, Serialize};

use crate::math::{Vec2, rotate_about, rotate_degrees, wrap_degrees};

/// The tracked space: a `width` x `depth` rectangle centered at the room origin.
///
/// Corners are ordered `(+w/2, +d/2)`, `(+w/2, -d/2)`, `(-w/2, -d/2)`, `(-w/2, +d/2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomGeometry {
    width: f32,
    depth: f32,
    corners: [Vec2; 4],
}

impl RoomGeometry {
    /// Returns `None` unless both sides are finite and positive.
    pub fn new(width: f32, depth: f32) -> Option<Self> {
        if !(width.is_finite() && depth.is_finite() && width > 0.0 && depth > 0.0) {
            return None;
        }
        let (hx, hz) = (width / 2.0, depth / 2.0);
        Some(Self {
            width,
            depth,
            corners: [
                Vec2::new(hx, hz),
                Vec2::new(hx, -hz),
                Vec2::new(-hx, -hz),
                Vec2::new(-hx, hz),
            ],
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn corners(&self) -> &[Vec2; 4] {
        &self.corners
    }

    /// Half extents along x and y.
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.depth / 2.0)
    }

    /// The same room shrunk by `margin` on every side, if anything is left.
    pub fn shrunk(&self, margin: f32) -> Option<Self> {
        Self::new(self.width - 2.0 * margin, self.depth - 2.0 * margin)
    }
}

/// Point-in-polygon test of a room-relative position against the room corners.
///
/// Points on an edge count as inside.
pub fn is_out_of_bounds(real_position: Vec2, geometry: &RoomGeometry) -> bool {
    !contains(geometry.corners(), real_position)
}

fn contains(polygon: &[Vec2], p: Vec2) -> bool {
    let n = polygon.len();
    let mut inside = false;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];

        // on-edge check
        let ab = b - a;
        let ap = p - a;
        if ab.perp_dot(ap).abs() <= 1e-6 && ap.dot(ab) >= 0.0 && ap.dot(ab) <= ab.dot(ab) {
            return true;
        }

        if (a.y > p.y) != (b.y > p.y) {
            let x_at = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_at {
                inside = !inside;
            }
        }
    }
    inside
}

/// Rigid transform placing the room (real) frame inside the world (virtual) frame.
///
/// `world = rotate(real, yaw) + origin`. Redirection works by nudging this transform.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomTransform {
    pub origin: Vec2,
    /// Degrees, counterclockwise positive.
    pub yaw: f32,
}

impl RoomTransform {
    pub fn to_world_point(&self, real: Vec2) -> Vec2 {
        rotate_degrees(real, self.yaw) + self.origin
    }

    pub fn to_world_direction(&self, real: Vec2) -> Vec2 {
        rotate_degrees(real, self.yaw)
    }

    pub fn to_room_point(&self, world: Vec2) -> Vec2 {
        rotate_degrees(world - self.origin, -self.yaw)
    }

    pub fn to_room_direction(&self, world: Vec2) -> Vec2 {
        rotate_degrees(world, -self.yaw)
    }

    /// Rotate the whole room about a world-space pivot.
    pub fn rotate_around(&mut self, pivot: Vec2, degrees: f32) {
        self.origin = rotate_about(self.origin, pivot, degrees);
        self.yaw = wrap_degrees(self.yaw + degrees);
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.origin += offset;
    }
}
