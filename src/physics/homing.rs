//! Homing acceleration and arrival/settle behavior (spec §4.2).

use super::kinetic::Kinetic;
use crate::fxmath::{clamp, div, from_float, fx, magnitude, mul, normalize_2d, SCALE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HomingProfile {
    pub base_speed: fx,
    pub homing_accel: fx,
    pub drag: fx,
    pub arrival_radius: fx,
    pub arrival_drag_boost: fx,
    pub dead_zone: fx,
}

/// Half a cell per second, the settle-speed threshold from spec §4.2.
fn settle_speed_threshold() -> fx {
    from_float(0.5)
}

/// Accelerates `k` toward `target`, applying arrival slowdown and drag.
/// Returns `true` if the entity settled onto the target this call (in
/// which case `k`'s position is snapped exactly and velocity zeroed).
pub fn apply_homing(
    k: &mut Kinetic,
    target: (fx, fx),
    profile: &HomingProfile,
    dt: fx,
    apply_drag: bool,
) -> bool {
    let dx = target.0 - k.precise_x;
    let dy = target.1 - k.precise_y;
    let dist = magnitude(dx, dy);

    if dist < profile.dead_zone && k.speed() < settle_speed_threshold() {
        k.precise_x = target.0;
        k.precise_y = target.1;
        k.vel_x = 0;
        k.vel_y = 0;
        return true;
    }

    let within_arrival = profile.arrival_radius > 0 && dist < profile.arrival_radius;
    let ratio = if within_arrival {
        div(dist, profile.arrival_radius)
    } else {
        SCALE
    };

    let eff_accel = if within_arrival {
        mul(profile.homing_accel, ratio)
    } else {
        profile.homing_accel
    };

    let eff_drag = if within_arrival && profile.arrival_drag_boost > 0 {
        mul(profile.drag, SCALE + mul(profile.arrival_drag_boost, SCALE - ratio))
    } else {
        profile.drag
    };

    let (dir_x, dir_y) = normalize_2d(dx, dy);
    k.vel_x += mul(mul(dir_x, eff_accel), dt);
    k.vel_y += mul(mul(dir_y, eff_accel), dt);

    if apply_drag {
        let speed = k.speed();
        if speed > profile.base_speed {
            let excess = speed - profile.base_speed;
            let drag_factor = clamp(mul(eff_drag, dt), 0, SCALE);
            let mut new_speed = speed - mul(excess, drag_factor);
            if new_speed < profile.base_speed {
                new_speed = profile.base_speed;
            }
            let (nx, ny) = normalize_2d(k.vel_x, k.vel_y);
            k.vel_x = mul(nx, new_speed);
            k.vel_y = mul(ny, new_speed);
        }
    }

    false
}
