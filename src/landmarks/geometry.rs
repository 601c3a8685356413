use super::types::Landmark;
use serde::{Deserialize, Serialize};

/// A 2D point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

pub fn midpoint(a: &Landmark, b: &Landmark) -> Landmark {
    let visibility = match (a.visibility, b.visibility) {
        (Some(va), Some(vb)) => Some(va.min(vb)),
        _ => None,
    };
    Landmark {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
        z: (a.z + b.z) / 2.0,
        visibility,
    }
}

pub fn distance_2d(a: &Landmark, b: &Landmark) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

pub fn distance_3d(a: &Landmark, b: &Landmark) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Project a normalized landmark onto a `width` x `height` image.
pub fn to_pixel(landmark: &Landmark, width: u32, height: u32) -> (f64, f64) {
    (landmark.x * width as f64, landmark.y * height as f64)
}

/// Absolute deviation of the line `a -> b` from horizontal, in [0, 90] degrees.
pub fn tilt_from_horizontal(a: &Point, b: &Point) -> f64 {
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dy.atan2(dx).to_degrees()
}

/// Absolute deviation of the line `a -> b` from vertical, in [0, 90] degrees.
pub fn tilt_from_vertical(a: &Point, b: &Point) -> f64 {
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dx.atan2(dy).to_degrees()
}

/// Interior angle at `vertex`, in [0, 180] degrees. Degenerate arms report 180.
pub fn joint_angle(a: &Point, vertex: &Point, c: &Point) -> f64 {
    let (ax, ay) = (a.x - vertex.x, a.y - vertex.y);
    let (cx, cy) = (c.x - vertex.x, c.y - vertex.y);
    let norms = ax.hypot(ay) * cx.hypot(cy);
    if norms == 0.0 {
        return 180.0;
    }
    let cos = ((ax * cx + ay * cy) / norms).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_and_distances() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.6, 0.8, 0.0);
        let mid = midpoint(&a, &b);
        assert!((mid.x - 0.3).abs() < 1e-12);
        assert!((distance_2d(&a, &b) - 1.0).abs() < 1e-12);

        let c = Landmark::new(1.0, 2.0, 2.0);
        assert!((distance_3d(&a, &c) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn pixel_projection_scales_by_dimensions() {
        let l = Landmark::new(0.25, 0.5, 0.0);
        assert_eq!(to_pixel(&l, 200, 100), (50.0, 50.0));
    }

    #[test]
    fn tilt_and_joint_angles() {
        let origin = Point::new(0.0, 0.0);
        assert!((tilt_from_horizontal(&origin, &Point::new(1.0, 1.0)) - 45.0).abs() < 1e-9);
        assert!(tilt_from_vertical(&origin, &Point::new(0.0, 5.0)).abs() < 1e-9);

        let straight = joint_angle(&Point::new(0.0, 0.0), &Point::new(0.0, 1.0), &Point::new(0.0, 2.0));
        assert!((straight - 180.0).abs() < 1e-9);
        let right = joint_angle(&Point::new(1.0, 0.0), &origin, &Point::new(0.0, 1.0));
        assert!((right - 90.0).abs() < 1e-9);
    }
}
