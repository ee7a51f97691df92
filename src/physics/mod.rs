//! Integration, bounded motion, collisions, homing, and orbital
//! behaviors, built entirely on `fxmath`. Functions here never
//! allocate, never panic on numeric edge cases, and never produce NaN
//! (spec §4.2's failure semantics); callers passing invalid tuning
//! (negative radii, zero mass) get a silent no-op rather than an error.

pub mod collision;
pub mod homing;
pub mod integrate;
pub mod kinetic;
pub mod orbital;

pub use collision::{
    apply_collision, apply_offset_collision, elastic_collision_3d_in_place, separate_overlap_3d,
    CollisionMode, CollisionProfile,
};
pub use homing::{apply_homing, HomingProfile};
pub use integrate::{integrate_with_bounce, ScreenBounds};
pub use kinetic::{cap_speed, Kinetic};
pub use orbital::{orbital_attraction, orbital_damp, orbital_insert, orbital_velocity};
