//! Bounded, lock-poor event queue (spec §4.4), using the published-flag
//! pattern Design Note §9 calls for: a per-slot flag set AFTER the slot
//! write and read BEFORE the slot load, avoiding the source engine's
//! known torn-read bug in its lock-free ring design.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use log::warn;

/// True for 1, 2, 4, 8, ... — used to rate-limit the overflow warning
/// to once per doubling of the drop count instead of once per drop.
fn is_power_of_two(n: u64) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// A bounded-size tagged record pushed by one system and consumed by
/// the scheduler once per tick.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub kind: u32,
    pub frame: u64,
    pub payload: EventPayload,
}

/// A small, fixed-size payload. Variants stay within a few words so
/// the whole `Event` fits in a fixed record, per spec §3.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum EventPayload {
    None,
    Int(i64),
    Pair(i64, i64),
    Fixed(crate::fxmath::fx),
}

pub struct EventQueue {
    capacity: usize,
    mask: u64,
    tail: AtomicU64,
    head: AtomicU64,
    published: Vec<AtomicBool>,
    slots: Vec<Mutex<Option<Event>>>,
    dropped: AtomicU64,
    consuming: AtomicBool,
}

impl EventQueue {
    /// `capacity` must be a power of two (the mask-based indexing in
    /// spec §4.4 relies on it); panics otherwise, since this is a
    /// construction-time programmer error, not a runtime degeneracy.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity.is_power_of_two(), "EventQueue capacity must be a power of two");
        let mut published = Vec::with_capacity(capacity);
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            published.push(AtomicBool::new(false));
            slots.push(Mutex::new(None));
        }
        EventQueue {
            capacity,
            mask: (capacity - 1) as u64,
            tail: AtomicU64::new(0),
            head: AtomicU64::new(0),
            published,
            slots,
            dropped: AtomicU64::new(0),
            consuming: AtomicBool::new(false),
        }
    }

    /// Claims the next slot and writes `event`. Any number of producers
    /// may call this concurrently; it never blocks. If the ring is
    /// full, the oldest unconsumed event is overwritten and `dropped`
    /// is incremented.
    pub fn push(&self, event: Event) {
        let pos = self.tail.fetch_add(1, Ordering::AcqRel);
        let idx = (pos & self.mask) as usize;
        if self.published[idx].load(Ordering::Acquire) {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            if is_power_of_two(dropped) {
                warn!("EventQueue overflow: {dropped} events dropped so far (capacity {})", self.capacity);
            }
        }
        *self.slots[idx].lock().unwrap() = Some(event);
        self.published[idx].store(true, Ordering::Release);
    }

    /// Drains every event pushed since the last `consume`, in program
    /// order per producer, oldest-first. Must be called by a single
    /// designated consumer; a concurrent call panics (the single-
    /// consumer requirement is a runtime assertion, per spec §4.4).
    pub fn consume(&self) -> Vec<Event> {
        if self.consuming.swap(true, Ordering::AcqRel) {
            panic!("EventQueue::consume called concurrently by more than one consumer");
        }

        let tail_snapshot = self.tail.load(Ordering::Acquire);
        let mut head = self.head.load(Ordering::Acquire);
        if tail_snapshot.saturating_sub(head) > self.capacity as u64 {
            head = tail_snapshot - self.capacity as u64;
        }

        let mut out = Vec::with_capacity((tail_snapshot - head) as usize);
        while head < tail_snapshot {
            let idx = (head & self.mask) as usize;
            if let Some(event) = self.slots[idx].lock().unwrap().take() {
                out.push(event);
            }
            self.published[idx].store(false, Ordering::Release);
            head += 1;
        }
        self.head.store(head, Ordering::Release);

        self.consuming.store(false, Ordering::Release);
        out
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
