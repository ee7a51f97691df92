//! The tick/frame runtime (spec §5), grounded in the teacher's
//! `Game::run` main loop: poll input with a timeout bounded by the
//! next scheduled tick, run the simulation tick at a fixed rate, and
//! composite+flush a render frame at its own (independent) rate, all
//! on the same thread.

use std::time::{Duration, Instant};

use log::{error, info};

use crate::config::Config;
use crate::ecs::{SystemRegistry, World};
use crate::error::Result;
use crate::fxmath::scalar::to_float;
use crate::render::adapter::{Adapter, KeyCode, TermEvent};
use crate::render::buffer::RenderBuffer;

fn dt_to_duration(dt: crate::fxmath::fx) -> Duration {
    Duration::from_secs_f64(to_float(dt).max(0.0))
}

/// Ties the ECS scheduler, a render buffer, and a terminal adapter
/// together and drives them at the rates named in `Config`.
pub struct Runtime<A: Adapter> {
    config: Config,
    world: World,
    systems: SystemRegistry,
    buffer: RenderBuffer,
    adapter: A,
    quit: bool,
}

impl<A: Adapter> Runtime<A> {
    pub fn new(config: Config, adapter: A) -> Self {
        let world = World::new(config);
        let buffer = RenderBuffer::new(config.screen_width, config.screen_height);
        Runtime {
            config,
            world,
            systems: SystemRegistry::new(),
            buffer,
            adapter,
            quit: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn systems_mut(&mut self) -> &mut SystemRegistry {
        &mut self.systems
    }

    pub fn buffer_mut(&mut self) -> &mut RenderBuffer {
        &mut self.buffer
    }

    /// Requests the run loop stop after the current iteration.
    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Runs until `request_quit` is called, the adapter reports the
    /// terminal closed, or Escape is pressed. `compositor` is invoked
    /// once per render frame to paint `self.buffer` from world state
    /// before it is flushed to the terminal.
    ///
    /// A panic inside the loop body is caught so the adapter can
    /// restore the terminal (`fini`) before the panic is re-raised;
    /// otherwise a panicking game would leave the user's terminal in
    /// raw/alt-screen mode.
    pub fn run(&mut self, mut compositor: impl FnMut(&mut World, &mut RenderBuffer)) -> Result<()> {
        self.adapter.init()?;
        info!("runtime started");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.run_inner(&mut compositor)
        }));

        match result {
            Ok(r) => {
                self.adapter.fini();
                r
            }
            Err(payload) => {
                error!("runtime panicked, restoring terminal before re-raising");
                self.adapter.fini();
                std::panic::resume_unwind(payload);
            }
        }
    }

    fn run_inner(&mut self, compositor: &mut impl FnMut(&mut World, &mut RenderBuffer)) -> Result<()> {
        let tick_period = dt_to_duration(self.config.tick_dt);
        let frame_period = dt_to_duration(self.config.frame_dt);

        let mut last_tick = Instant::now();
        let mut last_frame = Instant::now();

        while !self.quit {
            let next_tick_in = tick_period
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);
            let next_frame_in = frame_period
                .checked_sub(last_frame.elapsed())
                .unwrap_or(Duration::ZERO);
            let poll_timeout = next_tick_in.min(next_frame_in).min(Duration::from_millis(16));

            if let Some(event) = self.adapter.poll_event() {
                self.handle_event(event);
            }
            if poll_timeout > Duration::ZERO {
                std::thread::sleep(poll_timeout);
            }

            if last_tick.elapsed() >= tick_period {
                self.systems.tick(&mut self.world, self.config.tick_dt);
                last_tick = Instant::now();
            }

            if last_frame.elapsed() >= frame_period {
                compositor(&mut self.world, &mut self.buffer);
                self.adapter.flush(&self.buffer)?;
                last_frame = Instant::now();
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: TermEvent) {
        match event {
            TermEvent::Key(KeyCode::Escape) | TermEvent::Closed => self.quit = true,
            TermEvent::Resize { width, height } => {
                self.buffer.resize(width, height);
                self.world.resize_spatial(width, height);
            }
            TermEvent::Key(KeyCode::None) | TermEvent::Key(_) | TermEvent::Error => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::adapter::Capability;

    struct FakeAdapter {
        events: std::collections::VecDeque<TermEvent>,
        flushes: u32,
    }

    impl Adapter for FakeAdapter {
        fn init(&mut self) -> Result<()> {
            Ok(())
        }
        fn fini(&mut self) {}
        fn flush(&mut self, _buf: &RenderBuffer) -> Result<()> {
            self.flushes += 1;
            Ok(())
        }
        fn poll_event(&mut self) -> Option<TermEvent> {
            Some(self.events.pop_front().unwrap_or(TermEvent::Key(KeyCode::None)))
        }
        fn capability(&self) -> Capability {
            Capability::TrueColor
        }
    }

    #[test]
    fn escape_key_stops_the_loop() {
        let mut events = std::collections::VecDeque::new();
        for _ in 0..5 {
            events.push_back(TermEvent::Key(KeyCode::None));
        }
        events.push_back(TermEvent::Key(KeyCode::Escape));
        let adapter = FakeAdapter { events, flushes: 0 };

        let mut config = Config::new(10, 5);
        config.tick_dt = crate::fxmath::scalar::from_int(0);
        config.frame_dt = crate::fxmath::scalar::from_int(0);
        let mut runtime = Runtime::new(config, adapter);
        runtime.run(|_world, _buf| {}).unwrap();
        assert!(runtime.quit);
    }
}
