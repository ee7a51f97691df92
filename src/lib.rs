// arcterm
// deterministic fixed-point physics, ECS and terminal compositor core

//! arcterm is the deterministic core of a real-time, terminal-based action
//! game engine: fixed-point math (`fxmath`), physics primitives (`physics`),
//! a cell-grid terminal renderer (`render`), an entity-component-system
//! substrate (`ecs`), and the tick/frame runtime that composes them
//! (`runtime`).
//!
//! Everything outside these five layers — gameplay rules, content loading,
//! audio, networking — lives in a consuming binary, not in this crate.

pub mod config;
pub mod ecs;
pub mod error;
pub mod fxmath;
pub mod log;
pub mod physics;
pub mod render;
pub mod runtime;

pub use config::Config;
pub use error::GameError;
