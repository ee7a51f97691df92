//! Q32.32 fixed-point scalar arithmetic.
//!
//! `fx` is a 64-bit signed integer whose high 32 bits are the integer
//! part and whose low 32 bits are the fractional part. All operations
//! are pure, allocation-free, and deterministic across platforms —
//! no operation here depends on host floating-point rounding.

/// A Q32.32 fixed-point value.
#[allow(non_camel_case_types)]
pub type fx = i64;

/// One whole unit in fixed-point, i.e. `1 << 32`.
pub const SCALE: fx = 1i64 << 32;

pub fn from_float(f: f64) -> fx {
    (f * SCALE as f64) as fx
}

pub fn from_int(i: i64) -> fx {
    i << 32
}

pub fn to_float(x: fx) -> f64 {
    x as f64 / SCALE as f64
}

/// Truncates toward zero (unlike `>>`, which floors for negative values).
pub fn to_int(x: fx) -> i64 {
    x / SCALE
}

/// `Mul(a,b) = (a*b) >> 32`, computed in a 128-bit intermediate so the
/// shift doesn't truncate the high bits of the product.
pub fn mul(a: fx, b: fx) -> fx {
    (((a as i128) * (b as i128)) >> 32) as fx
}

/// `Div(a,b) = (a << 32) / b`. Fails silently on divide-by-zero,
/// returning 0 — callers must guard if they need to distinguish a
/// degenerate division from a legitimate zero result.
pub fn div(a: fx, b: fx) -> fx {
    if b == 0 {
        return 0;
    }
    (((a as i128) << 32) / (b as i128)) as fx
}

/// `(a*b)/c`, computed entirely in a 128-bit intermediate to avoid
/// overflow in the product before the division.
pub fn mul_div(a: fx, b: fx, c: fx) -> fx {
    if c == 0 {
        return 0;
    }
    (((a as i128) * (b as i128)) / (c as i128)) as fx
}

pub fn abs(x: fx) -> fx {
    x.abs()
}

pub fn clamp(x: fx, lo: fx, hi: fx) -> fx {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Integer square root via Newton's method in 128-bit, then scaled back
/// into Q32.32. Negative input returns 0.
pub fn sqrt(x: fx) -> fx {
    if x <= 0 {
        return 0;
    }
    // sqrt(x / SCALE) * SCALE == sqrt(x * SCALE), avoiding float entirely.
    let v = (x as i128) << 32;
    let mut lo: i128 = 0;
    let mut hi: i128 = 1i128 << 63;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if mid.checked_mul(mid).map(|sq| sq <= v).unwrap_or(false) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo as fx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_agrees_with_float_within_tolerance() {
        for &(a, b) in &[(3.5, 2.0), (-4.25, 1.5), (100.0, 0.001), (-7.0, -3.0)] {
            let fa = from_float(a);
            let fb = from_float(b);
            let got = to_float(mul(fa, fb));
            let want = a * b;
            let rel = if want.abs() > 1e-9 {
                ((got - want) / want).abs()
            } else {
                (got - want).abs()
            };
            assert!(rel < 2f64.powi(-15), "a={a} b={b} got={got} want={want}");
        }
    }

    #[test]
    fn div_by_zero_is_silent_zero() {
        assert_eq!(div(from_int(5), 0), 0);
    }

    #[test]
    fn sqrt_of_negative_is_zero() {
        assert_eq!(sqrt(from_int(-4)), 0);
    }

    #[test]
    fn sqrt_of_perfect_square() {
        let got = to_float(sqrt(from_int(16)));
        assert!((got - 4.0).abs() < 1e-4, "got={got}");
    }

    #[test]
    fn to_int_truncates_toward_zero() {
        assert_eq!(to_int(from_float(3.9)), 3);
        assert_eq!(to_int(from_float(-3.9)), -3);
    }
}
