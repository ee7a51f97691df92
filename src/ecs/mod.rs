//! Entity-component substrate: generation-indexed entities, statically
//! dispatched component columns, a bounded lock-poor event queue, a
//! cache-aligned spatial grid, and priority-scheduled systems
//! (spec §4.4, Design Note §9).

pub mod component;
pub mod entity;
pub mod event;
pub mod spatial;
pub mod system;
pub mod world;

pub use component::ComponentColumn;
pub use entity::Entity;
pub use event::{Event, EventPayload, EventQueue};
pub use spatial::SpatialGrid;
pub use system::{System, SystemRegistry};
pub use world::World;
