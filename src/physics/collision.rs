//! Collision-impulse profiles (spec §4.2): parameterized 2D impulses
//! for gameplay "hit reactions", plus the 3D elastic sphere collision
//! and overlap separation used by free-flying projectiles/bodies.

use super::kinetic::Kinetic;
use crate::fxmath::{fx, mul, normalize_2d, rad_to_rot, rotate_vector, FastRand, Vec3F, SCALE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CollisionMode {
    Additive,
    Override,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CollisionProfile {
    pub mass_ratio: fx,
    pub impulse_min: fx,
    pub impulse_max: fx,
    /// Angle variance, in radians expressed as fx.
    pub angle_variance: fx,
    pub mode: CollisionMode,
    pub immunity_duration: fx,
    pub offset_influence: fx,
}

fn random_unit_fraction(rng: &mut FastRand) -> fx {
    rng.float()
}

fn random_signed_unit(rng: &mut FastRand) -> fx {
    let t = random_unit_fraction(rng);
    t + t - SCALE
}

fn sample_impulse_vector(dir_x: fx, dir_y: fx, profile: &CollisionProfile, rng: &mut FastRand) -> (fx, fx) {
    let (mut dx, mut dy) = (dir_x, dir_y);
    if dx == 0 && dy == 0 {
        dx = SCALE;
        dy = 0;
    }
    let (nx, ny) = normalize_2d(dx, dy);

    let (nx, ny) = if profile.angle_variance > 0 {
        let random_radians = mul(random_signed_unit(rng), profile.angle_variance);
        let rot = mul(random_radians, rad_to_rot());
        rotate_vector(nx, ny, rot)
    } else {
        (nx, ny)
    };

    let frac = random_unit_fraction(rng);
    let mag = profile.impulse_min + mul(frac, profile.impulse_max - profile.impulse_min);
    let scaled_mag = mul(mag, profile.mass_ratio);
    (mul(nx, scaled_mag), mul(ny, scaled_mag))
}

fn apply_impulse(k: &mut Kinetic, impulse: (fx, fx), mode: CollisionMode) {
    match mode {
        CollisionMode::Additive => {
            k.vel_x += impulse.0;
            k.vel_y += impulse.1;
        }
        CollisionMode::Override => {
            k.vel_x = impulse.0;
            k.vel_y = impulse.1;
        }
    }
}

/// Applies a collision-impulse to `k` along `(dir_x, dir_y)`, per the
/// profile's magnitude range, mass ratio, angle variance and mode.
pub fn apply_collision(
    k: &mut Kinetic,
    dir_x: fx,
    dir_y: fx,
    profile: &CollisionProfile,
    rng: &mut FastRand,
) {
    let impulse = sample_impulse_vector(dir_x, dir_y, profile, rng);
    apply_impulse(k, impulse, profile.mode);
}

/// Like `apply_collision`, but blends the impact direction with the
/// direction pointing away from `hit_point` before sampling, weighted
/// by `profile.offset_influence` (a fraction in `[0, SCALE]`).
pub fn apply_offset_collision(
    k: &mut Kinetic,
    dir_x: fx,
    dir_y: fx,
    hit_point: (fx, fx),
    profile: &CollisionProfile,
    rng: &mut FastRand,
) {
    let push_x = k.precise_x - hit_point.0;
    let push_y = k.precise_y - hit_point.1;
    let (push_nx, push_ny) = normalize_2d(push_x, push_y);
    let (dir_nx, dir_ny) = normalize_2d(dir_x, dir_y);

    let influence = profile.offset_influence;
    let blended_x = mul(dir_nx, SCALE - influence) + mul(push_nx, influence);
    let blended_y = mul(dir_ny, SCALE - influence) + mul(push_ny, influence);
    let (renorm_x, renorm_y) = normalize_2d(blended_x, blended_y);

    let impulse = sample_impulse_vector(renorm_x, renorm_y, profile, rng);
    apply_impulse(k, impulse, profile.mode);
}

/// Resolves an elastic collision in place between two spheres given by
/// position/velocity/mass. Returns `true` if an impulse was applied
/// (the spheres were approaching along the contact normal). Tolerates
/// zero-distance input by returning `false` without producing NaN.
pub fn elastic_collision_3d_in_place(
    pos_a: Vec3F,
    vel_a: &mut Vec3F,
    mass_a: f64,
    pos_b: Vec3F,
    vel_b: &mut Vec3F,
    mass_b: f64,
    restitution: f64,
) -> bool {
    if mass_a <= 0.0 || mass_b <= 0.0 {
        return false;
    }
    let delta = pos_b.sub(pos_a);
    let dist = delta.length();
    if dist <= 0.0 {
        return false;
    }
    let normal = delta.scale(1.0 / dist);

    let v_rel = vel_a.sub(*vel_b);
    let vn = v_rel.dot(normal);
    if vn <= 0.0 {
        return false;
    }

    let inv_mass_sum = 1.0 / mass_a + 1.0 / mass_b;
    let j = (1.0 + restitution) * vn / inv_mass_sum;

    *vel_a = vel_a.sub(normal.scale(j / mass_a));
    *vel_b = vel_b.add(normal.scale(j / mass_b));
    true
}

/// Pushes two overlapping spheres apart by their mass-weighted share of
/// the overlap, plus a small margin so they don't remain exactly
/// touching. Returns `true` if a correction was applied.
pub fn separate_overlap_3d(
    pos_a: &mut Vec3F,
    mass_a: f64,
    radius_a: f64,
    pos_b: &mut Vec3F,
    mass_b: f64,
    radius_b: f64,
) -> bool {
    const MARGIN: f64 = 1e-4;
    if mass_a <= 0.0 || mass_b <= 0.0 {
        return false;
    }
    let delta = pos_b.sub(*pos_a);
    let dist = delta.length();
    let min_dist = radius_a + radius_b;
    if dist >= min_dist {
        return false;
    }
    let normal = if dist > 0.0 {
        delta.scale(1.0 / dist)
    } else {
        Vec3F::new(1.0, 0.0, 0.0)
    };
    let overlap = min_dist - dist + MARGIN;
    let total_mass = mass_a + mass_b;
    let share_a = mass_b / total_mass;
    let share_b = mass_a / total_mass;
    *pos_a = pos_a.sub(normal.scale(overlap * share_a));
    *pos_b = pos_b.add(normal.scale(overlap * share_b));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fxmath::from_int;

    #[test]
    fn elastic_collision_conserves_momentum() {
        let pos_a = Vec3F::new(0.0, 0.0, 0.0);
        let pos_b = Vec3F::new(2.0, 0.0, 0.0);
        let mut vel_a = Vec3F::new(5.0, 0.0, 0.0);
        let mut vel_b = Vec3F::new(-3.0, 0.0, 0.0);
        let mass_a = 1.0;
        let mass_b = 2.0;
        let restitution = 0.8;

        let momentum_before = vel_a.x * mass_a + vel_b.x * mass_b;
        let applied = elastic_collision_3d_in_place(
            pos_a, &mut vel_a, mass_a, pos_b, &mut vel_b, mass_b, restitution,
        );
        assert!(applied);
        let momentum_after = vel_a.x * mass_a + vel_b.x * mass_b;
        assert!((momentum_before - momentum_after).abs() < 1e-9);

        // Values derived from the specified impulse formula:
        // j = (1+e)*vrel / (1/ma + 1/mb); v_a -= j/ma; v_b += j/mb.
        assert!((vel_a.x - (-4.6)).abs() < 1e-6, "vel_a.x={}", vel_a.x);
        assert!((vel_b.x - 1.8).abs() < 1e-6, "vel_b.x={}", vel_b.x);
    }

    #[test]
    fn elastic_collision_is_non_increasing_energy() {
        let pos_a = Vec3F::new(0.0, 0.0, 0.0);
        let pos_b = Vec3F::new(1.0, 0.0, 0.0);
        let mut vel_a = Vec3F::new(2.0, 0.0, 0.0);
        let mut vel_b = Vec3F::new(0.0, 0.0, 0.0);
        let ke_before = 0.5 * 1.0 * vel_a.dot(vel_a) + 0.5 * 1.0 * vel_b.dot(vel_b);
        elastic_collision_3d_in_place(pos_a, &mut vel_a, 1.0, pos_b, &mut vel_b, 1.0, 1.0);
        let ke_after = 0.5 * 1.0 * vel_a.dot(vel_a) + 0.5 * 1.0 * vel_b.dot(vel_b);
        assert!(ke_after <= ke_before + 1e-9);
    }

    #[test]
    fn elastic_collision_zero_distance_returns_false() {
        let pos_a = Vec3F::zero();
        let pos_b = Vec3F::zero();
        let mut vel_a = Vec3F::new(1.0, 0.0, 0.0);
        let mut vel_b = Vec3F::zero();
        let applied =
            elastic_collision_3d_in_place(pos_a, &mut vel_a, 1.0, pos_b, &mut vel_b, 1.0, 1.0);
        assert!(!applied);
        assert!(!vel_a.x.is_nan());
    }

    #[test]
    fn separate_overlap_pushes_apart() {
        let mut pos_a = Vec3F::new(0.0, 0.0, 0.0);
        let mut pos_b = Vec3F::new(0.5, 0.0, 0.0);
        let applied = separate_overlap_3d(&mut pos_a, 1.0, 1.0, &mut pos_b, 1.0, 1.0);
        assert!(applied);
        assert!(pos_b.x - pos_a.x > 0.5);
    }

    #[test]
    fn apply_collision_additive_changes_velocity() {
        let mut k = Kinetic::new(0, 0);
        let profile = CollisionProfile {
            mass_ratio: from_int(1),
            impulse_min: from_int(2),
            impulse_max: from_int(4),
            angle_variance: 0,
            mode: CollisionMode::Additive,
            immunity_duration: 0,
            offset_influence: 0,
        };
        let mut rng = FastRand::new(1);
        apply_collision(&mut k, from_int(1), 0, &profile, &mut rng);
        assert!(k.vel_x > 0);
        assert_eq!(k.vel_y, 0);
    }
}
