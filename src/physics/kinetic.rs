//! `Kinetic`: the position+velocity pair every moving entity carries.

use crate::fxmath::{div, fx, magnitude, mul};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Kinetic {
    pub precise_x: fx,
    pub precise_y: fx,
    pub vel_x: fx,
    pub vel_y: fx,
}

impl Kinetic {
    pub fn new(x: fx, y: fx) -> Self {
        Kinetic {
            precise_x: x,
            precise_y: y,
            vel_x: 0,
            vel_y: 0,
        }
    }

    pub fn speed(&self) -> fx {
        magnitude(self.vel_x, self.vel_y)
    }
}

/// Clamps the 2D velocity magnitude to `max_speed`, scaling both
/// components proportionally if the magnitude is exceeded. A
/// `max_speed <= 0` is treated as "no cap" (silent no-op), matching
/// the physics failure semantics in spec §4.2.
pub fn cap_speed(k: &mut Kinetic, max_speed: fx) {
    if max_speed <= 0 {
        return;
    }
    let speed = k.speed();
    if speed <= max_speed {
        return;
    }
    let scale = div(max_speed, speed);
    k.vel_x = mul(k.vel_x, scale);
    k.vel_y = mul(k.vel_y, scale);
}
