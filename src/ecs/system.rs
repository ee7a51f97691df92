//! Priority-ordered system scheduling (spec §4.4). `System` is a
//! small (one method), low-frequency interface — a trait object is
//! acceptable per Design Note §9, unlike component access which stays
//! statically dispatched.

use super::world::World;
use crate::fxmath::fx;

pub trait System {
    fn name(&self) -> &str;
    fn priority(&self) -> i32;
    fn update(&mut self, world: &mut World, dt: fx);
}

struct Entry {
    system: Box<dyn System>,
    registration_order: usize,
}

#[derive(Default)]
pub struct SystemRegistry {
    entries: Vec<Entry>,
    next_order: usize,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a system. Ties in priority are broken by registration
    /// order (the order `register` was called).
    pub fn register(&mut self, system: Box<dyn System>) {
        let registration_order = self.next_order;
        self.next_order += 1;
        self.entries.push(Entry {
            system,
            registration_order,
        });
        self.entries.sort_by(|a, b| {
            a.system
                .priority()
                .cmp(&b.system.priority())
                .then(a.registration_order.cmp(&b.registration_order))
        });
    }

    /// Consumes the event queue once, snapshots it onto `world`, then
    /// runs every registered system in priority order. A system at
    /// priority P observes all mutations made by systems at priority
    /// < P during the same tick; events pushed during the tick are not
    /// visible to later systems unless they explicitly re-peek the
    /// snapshot — they are consumed at the top of the next tick.
    pub fn tick(&mut self, world: &mut World, dt: fx) {
        world.refresh_tick_snapshot();
        for entry in &mut self.entries {
            entry.system.update(world, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::{Arc, Mutex};

    struct SetFlag(Arc<Mutex<i32>>, i32);
    impl System for SetFlag {
        fn name(&self) -> &str {
            "set_flag"
        }
        fn priority(&self) -> i32 {
            self.1
        }
        fn update(&mut self, _world: &mut World, _dt: fx) {
            *self.0.lock().unwrap() = 1;
        }
    }

    struct ReadFlagIntoResult {
        flag: Arc<Mutex<i32>>,
        result: Arc<Mutex<i32>>,
        priority: i32,
    }
    impl System for ReadFlagIntoResult {
        fn name(&self) -> &str {
            "read_flag"
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn update(&mut self, _world: &mut World, _dt: fx) {
            *self.result.lock().unwrap() = *self.flag.lock().unwrap();
        }
    }

    #[test]
    fn priority_ordering_a_before_b() {
        let flag = Arc::new(Mutex::new(0));
        let result = Arc::new(Mutex::new(0));

        let mut world = World::new(Config::new(80, 25));
        let mut reg = SystemRegistry::new();
        reg.register(Box::new(SetFlag(flag.clone(), 10)));
        reg.register(Box::new(ReadFlagIntoResult {
            flag: flag.clone(),
            result: result.clone(),
            priority: 20,
        }));
        reg.tick(&mut world, 0);
        assert_eq!(*result.lock().unwrap(), 1);
    }

    #[test]
    fn priority_reversed_changes_outcome() {
        let flag = Arc::new(Mutex::new(0));
        let result = Arc::new(Mutex::new(0));

        let mut world = World::new(Config::new(80, 25));
        let mut reg = SystemRegistry::new();
        reg.register(Box::new(ReadFlagIntoResult {
            flag: flag.clone(),
            result: result.clone(),
            priority: 10,
        }));
        reg.register(Box::new(SetFlag(flag.clone(), 20)));
        reg.tick(&mut world, 0);
        assert_eq!(*result.lock().unwrap(), 0);
    }
}
