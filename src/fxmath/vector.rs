//! 2D/3D vector types built on `fx`, plus a float64-native `Vec3F` for
//! collision paths where exact determinism is not required (spec §3).

use super::scalar::{abs, div, from_int, mul, mul_div, sqrt, fx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Vec2 {
    pub x: fx,
    pub y: fx,
}

impl Vec2 {
    pub fn new(x: fx, y: fx) -> Self {
        Vec2 { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    pub x: fx,
    pub y: fx,
    pub z: fx,
}

impl Vec3 {
    pub fn new(x: fx, y: fx, z: fx) -> Self {
        Vec3 { x, y, z }
    }
}

/// Float64-native 3D vector for the collision paths (§4.2) that trade
/// exact bit-for-bit determinism for speed.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Vec3F {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3F {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3F { x, y, z }
    }

    pub fn zero() -> Self {
        Vec3F::new(0.0, 0.0, 0.0)
    }

    pub fn sub(self, o: Vec3F) -> Vec3F {
        Vec3F::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }

    pub fn add(self, o: Vec3F) -> Vec3F {
        Vec3F::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }

    pub fn scale(self, s: f64) -> Vec3F {
        Vec3F::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn dot(self, o: Vec3F) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
}

/// `Magnitude(dx,dy) = sqrt(dx^2 + dy^2)`.
pub fn magnitude(dx: fx, dy: fx) -> fx {
    sqrt(magnitude_sq(dx, dy))
}

pub fn magnitude_sq(dx: fx, dy: fx) -> fx {
    mul(dx, dx) + mul(dy, dy)
}

/// Returns a unit vector (magnitude ≈ `SCALE`) in the direction of
/// `(dx,dy)`. On zero input, returns `(0,0)`.
pub fn normalize_2d(dx: fx, dy: fx) -> (fx, fx) {
    let m = magnitude(dx, dy);
    if m == 0 {
        return (0, 0);
    }
    (div(dx, m), div(dy, m))
}

pub fn perpendicular(x: fx, y: fx) -> (fx, fx) {
    (-y, x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(normalize_2d(0, 0), (0, 0));
    }

    #[test]
    fn normalize_has_near_unit_magnitude() {
        let (nx, ny) = normalize_2d(from_int(3), from_int(4));
        let m = magnitude(nx, ny);
        let scale = from_int(1);
        let tolerance = mul_div(scale, from_int(1), from_int(1024)); // 2^-10
        assert!(abs(m - scale) <= tolerance, "m={m} scale={scale}");
    }

    #[test]
    fn perpendicular_rotates_90_degrees() {
        assert_eq!(perpendicular(from_int(1), from_int(0)), (0, from_int(1)));
    }
}
