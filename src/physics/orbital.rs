//! Orbital mechanics helpers (spec §4.2): circular-orbit insertion,
//! centripetal attraction, and radial-only damping.

use super::kinetic::Kinetic;
use crate::fxmath::{div, fx, magnitude, mul, normalize_2d, perpendicular, sqrt, SCALE};

/// `sqrt(attraction * radius)`, the speed of a circular orbit at
/// `radius` under the given attraction strength.
pub fn orbital_velocity(attraction: fx, radius: fx) -> fx {
    if attraction <= 0 || radius <= 0 {
        return 0;
    }
    sqrt(mul(attraction, radius))
}

/// A tangential velocity perpendicular to the radius vector from
/// `center` to `pos`, with magnitude `orbital_velocity(attraction, r)`.
pub fn orbital_insert(center: (fx, fx), pos: (fx, fx), attraction: fx) -> (fx, fx) {
    let rx = pos.0 - center.0;
    let ry = pos.1 - center.1;
    let radius = magnitude(rx, ry);
    if radius == 0 {
        return (0, 0);
    }
    let (nx, ny) = normalize_2d(rx, ry);
    let (tx, ty) = perpendicular(nx, ny);
    let speed = orbital_velocity(attraction, radius);
    (mul(tx, speed), mul(ty, speed))
}

/// Centripetal acceleration toward `center`, magnitude
/// `attraction / radius^2`.
pub fn orbital_attraction(center: (fx, fx), pos: (fx, fx), attraction: fx) -> (fx, fx) {
    let rx = pos.0 - center.0;
    let ry = pos.1 - center.1;
    let radius = magnitude(rx, ry);
    if radius == 0 {
        return (0, 0);
    }
    let (nx, ny) = normalize_2d(rx, ry);
    let accel_mag = div(attraction, mul(radius, radius));
    (mul(-nx, accel_mag), mul(-ny, accel_mag))
}

/// Damps only the radial component of `k`'s velocity relative to
/// `center`, leaving the tangential component untouched — this
/// converges an elliptical orbit toward a circular one over time.
/// `damp_factor` is a fraction in `[0, SCALE]` removed from the radial
/// speed each call.
pub fn orbital_damp(center: (fx, fx), k: &mut Kinetic, damp_factor: fx) {
    let rx = k.precise_x - center.0;
    let ry = k.precise_y - center.1;
    let radius = magnitude(rx, ry);
    if radius == 0 {
        return;
    }
    let (nx, ny) = normalize_2d(rx, ry);
    let vr = mul(k.vel_x, nx) + mul(k.vel_y, ny);
    let new_vr = mul(vr, SCALE - damp_factor);
    let delta = new_vr - vr;
    k.vel_x += mul(delta, nx);
    k.vel_y += mul(delta, ny);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fxmath::from_int;

    #[test]
    fn orbital_velocity_matches_sqrt_formula() {
        let attraction = from_int(4);
        let radius = from_int(9);
        let v = orbital_velocity(attraction, radius);
        let got = crate::fxmath::to_float(v);
        assert!((got - 6.0).abs() < 1e-2, "got={got}");
    }

    #[test]
    fn orbital_insert_velocity_is_perpendicular_to_radius() {
        let center = (0, 0);
        let pos = (from_int(10), 0);
        let (vx, vy) = orbital_insert(center, pos, from_int(4));
        assert_eq!(vx, 0, "tangential velocity at (r,0) must be purely vertical");
        assert!(vy != 0);
    }

    #[test]
    fn orbital_damp_reduces_radial_component_only() {
        let center = (0, 0);
        let mut k = Kinetic::new(from_int(10), 0);
        k.vel_x = from_int(5); // purely radial
        k.vel_y = from_int(2); // purely tangential
        orbital_damp(center, &mut k, from_int(1) / 2);
        assert!(k.vel_x < from_int(5), "radial component should shrink");
        let diff = (k.vel_y - from_int(2)).abs();
        assert!(diff < from_int(1) / 1000, "tangential component should be preserved");
    }
}
