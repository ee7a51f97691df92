//! `World`: owns entities, components, the event queue, and the
//! spatial grid; ties them together for systems to operate on each
//! tick (spec §4.4).

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::component::ComponentColumn;
use super::entity::Entity;
use super::event::{Event, EventQueue};
use super::spatial::SpatialGrid;
use crate::config::Config;

const EVENT_QUEUE_CAPACITY: usize = 2048;

struct EntityAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
}

impl EntityAllocator {
    fn new() -> Self {
        EntityAllocator {
            generations: Vec::new(),
            free: Vec::new(),
        }
    }

    fn create(&mut self) -> Entity {
        if let Some(index) = self.free.pop() {
            let generation = self.generations[index as usize];
            return Entity::new(index, generation);
        }
        let index = self.generations.len() as u32;
        self.generations.push(0);
        Entity::new(index, 0)
    }

    fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let idx = entity.index() as usize;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free.push(entity.index());
        true
    }

    fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index() as usize)
            .map(|g| *g == entity.generation())
            .unwrap_or(false)
    }
}

/// Owns all entities, components, the event queue, and the spatial
/// grid for one running simulation.
pub struct World {
    config: Config,
    allocator: EntityAllocator,
    columns: HashMap<TypeId, Box<dyn Any>>,
    events: EventQueue,
    tick_snapshot: Vec<Event>,
    spatial: SpatialGrid,
    frame: u64,
}

impl World {
    pub fn new(config: Config) -> Self {
        let spatial = SpatialGrid::new(config.screen_width, config.screen_height);
        World {
            config,
            allocator: EntityAllocator::new(),
            columns: HashMap::new(),
            events: EventQueue::new(EVENT_QUEUE_CAPACITY),
            tick_snapshot: Vec::new(),
            spatial,
            frame: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn create(&mut self) -> Entity {
        self.allocator.create()
    }

    /// Destroys `entity`, bumping its generation so any stale handles
    /// to it stop resolving, and drops its components from every
    /// registered column.
    pub fn destroy(&mut self, entity: Entity) {
        if self.allocator.destroy(entity) {
            for column in self.columns.values_mut() {
                if let Some(column) = column.downcast_mut::<AnyColumn>() {
                    (column.remove)(column.storage.as_mut(), entity);
                }
            }
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    fn column_mut<T: 'static>(&mut self) -> &mut ComponentColumn<T> {
        let type_id = TypeId::of::<T>();
        let entry = self
            .columns
            .entry(type_id)
            .or_insert_with(|| Box::new(AnyColumn::new::<T>()));
        entry
            .downcast_mut::<AnyColumn>()
            .expect("component column type mismatch")
            .storage
            .downcast_mut::<ComponentColumn<T>>()
            .expect("component column type mismatch")
    }

    fn column<T: 'static>(&self) -> Option<&ComponentColumn<T>> {
        let type_id = TypeId::of::<T>();
        self.columns
            .get(&type_id)?
            .downcast_ref::<AnyColumn>()?
            .storage
            .downcast_ref::<ComponentColumn<T>>()
    }

    pub fn add<T: 'static>(&mut self, entity: Entity, component: T) {
        self.column_mut::<T>().insert(entity, component);
    }

    pub fn remove<T: 'static>(&mut self, entity: Entity) -> Option<T> {
        self.column_mut::<T>().remove(entity)
    }

    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        self.column::<T>()?.get(entity)
    }

    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        self.column_mut::<T>().get_mut(entity)
    }

    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.column::<T>().map(|c| c.has(entity)).unwrap_or(false)
    }

    pub fn query<T: 'static>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.column::<T>().into_iter().flat_map(|c| c.iter())
    }

    pub fn query2<A: 'static, B: 'static>(&self) -> impl Iterator<Item = (Entity, &A, &B)> + '_ {
        let b = self.column::<B>();
        self.column::<A>()
            .into_iter()
            .flat_map(|ca| ca.iter())
            .filter_map(move |(e, a)| b.and_then(|cb| cb.get(e)).map(|b| (e, a, b)))
    }

    pub fn push_event(&self, event: Event) {
        self.events.push(event);
    }

    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    /// Current tick's consumed events, snapshotted by the most recent
    /// `refresh_tick_snapshot` call.
    pub fn tick_events(&self) -> &[Event] {
        &self.tick_snapshot
    }

    pub fn spatial(&self) -> &SpatialGrid {
        &self.spatial
    }

    pub fn spatial_mut(&mut self) -> &mut SpatialGrid {
        &mut self.spatial
    }

    /// Rebuilds the spatial grid for a new screen size, discarding any
    /// buckets from the previous tick (the next physics tick's insert
    /// pass repopulates it).
    pub fn resize_spatial(&mut self, width: u16, height: u16) {
        self.spatial = SpatialGrid::new(width, height);
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Drains the event queue and advances the frame counter once per
    /// tick. Called exactly once by `SystemRegistry::tick` before
    /// running systems.
    pub fn refresh_tick_snapshot(&mut self) {
        self.tick_snapshot = self.events.consume();
        self.frame += 1;
    }
}

/// Type-erased wrapper so a single `HashMap<TypeId, _>` can hold
/// `ComponentColumn<T>` for every `T`, without virtual dispatch on the
/// actual component access methods (those stay on the concrete,
/// monomorphized `ComponentColumn<T>`, per Design Note §9).
struct AnyColumn {
    storage: Box<dyn Any>,
    remove: fn(&mut dyn Any, Entity),
}

impl AnyColumn {
    fn new<T: 'static>() -> Self {
        AnyColumn {
            storage: Box::new(ComponentColumn::<T>::new()),
            remove: |storage, entity| {
                if let Some(column) = storage.downcast_mut::<ComponentColumn<T>>() {
                    column.remove(entity);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_world() -> World {
        World::new(Config::new(80, 25))
    }

    #[test]
    fn create_gives_unique_entities() {
        let mut world = test_world();
        let a = world.create();
        let b = world.create();
        assert_ne!(a, b);
    }

    #[test]
    fn destroy_invalidates_stale_handle() {
        let mut world = test_world();
        let a = world.create();
        world.add(a, 10i32);
        world.destroy(a);
        assert!(!world.is_alive(a));
        assert_eq!(world.get::<i32>(a), None);
    }

    #[test]
    fn recycled_index_gets_new_generation() {
        let mut world = test_world();
        let a = world.create();
        world.destroy(a);
        let b = world.create();
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(!world.is_alive(a));
        assert!(world.is_alive(b));
    }

    #[test]
    fn add_get_remove_component() {
        let mut world = test_world();
        let a = world.create();
        world.add(a, 7i32);
        assert_eq!(world.get::<i32>(a), Some(&7));
        assert!(world.has::<i32>(a));
        assert_eq!(world.remove::<i32>(a), Some(7));
        assert!(!world.has::<i32>(a));
    }

    #[test]
    fn query2_joins_two_components() {
        let mut world = test_world();
        let a = world.create();
        let b = world.create();
        world.add(a, 1i32);
        world.add(a, "a");
        world.add(b, 2i32);
        let joined: Vec<_> = world.query2::<i32, &str>().collect();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].0, a);
    }

    #[test]
    fn refresh_tick_snapshot_drains_events_and_advances_frame() {
        use super::super::event::{EventPayload};
        let mut world = test_world();
        world.push_event(Event {
            kind: 1,
            frame: 0,
            payload: EventPayload::Int(42),
        });
        assert_eq!(world.frame(), 0);
        world.refresh_tick_snapshot();
        assert_eq!(world.frame(), 1);
        assert_eq!(world.tick_events().len(), 1);
        world.refresh_tick_snapshot();
        assert!(world.tick_events().is_empty());
    }
}
