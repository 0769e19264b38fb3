// Ground-plane helpers on top of glam. The loop works in degrees,
// counterclockwise positive; glam works in radians.

pub use glam::{Vec2, Vec3};

/// Unit vector pointing `degrees` counterclockwise from +x.
pub fn from_degrees(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Rotate `v` counterclockwise by `degrees`.
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    from_degrees(degrees).rotate(v)
}

/// Rotate `point` counterclockwise by `degrees` around `pivot`.
pub fn rotate_about(point: Vec2, pivot: Vec2, degrees: f32) -> Vec2 {
    pivot + rotate_degrees(point - pivot, degrees)
}

/// Project a `y`-up vector onto the ground plane.
pub fn ground(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Lift a ground-plane vector back into 3D at height `y`.
pub fn lift(v: Vec2, y: f32) -> Vec3 {
    Vec3::new(v.x, y, v.y)
}

/// Signed angle in degrees that rotates `from` onto `to`, counterclockwise positive,
/// in `(-180, 180]`.
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    let angle = from.perp_dot(to).atan2(from.dot(to)).to_degrees();
    if angle <= -180.0 { angle + 360.0 } else { angle }
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    let mut a = degrees % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn signed_angle_is_counterclockwise_positive() {
        assert!(close(signed_angle(Vec2::X, Vec2::Y), 90.0));
        assert!(close(signed_angle(Vec2::Y, Vec2::X), -90.0));
        assert!(close(signed_angle(Vec2::X, Vec2::NEG_X), 180.0));
    }

    #[test]
    fn rotate_about_keeps_pivot_fixed() {
        let pivot = Vec2::new(1.0, 1.0);
        let p = rotate_about(Vec2::new(2.0, 1.0), pivot, 90.0);
        assert!(close(p.x, 1.0) && close(p.y, 2.0));
        assert!(rotate_about(pivot, pivot, 33.0).distance(pivot) < 1e-6);
    }

    #[test]
    fn degrees_match_headings() {
        let v = from_degrees(90.0);
        assert!(close(v.x, 0.0) && close(v.y, 1.0));
        assert!(close(signed_angle(Vec2::X, rotate_degrees(Vec2::X, -30.0)), -30.0));
    }

    #[test]
    fn ground_drops_height() {
        let v = Vec3::new(1.0, 1.7, 2.0);
        assert_eq!(ground(v), Vec2::new(1.0, 2.0));
        assert_eq!(lift(ground(v), 1.7), v);
    }

    #[test]
    fn wrap_degrees_range() {
        assert!(close(wrap_degrees(270.0), -90.0));
        assert!(close(wrap_degrees(-180.0), 180.0));
        assert!(close(wrap_degrees(540.0), 180.0));
    }
}
