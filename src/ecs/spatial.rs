//! Cache-line-aligned spatial grid for O(1) cell-level entity queries
//! (spec §4.4). Bucket capacity (31 entities + a count, padded to 256
//! bytes) is intentional and preserved exactly, per Design Note §9.

use log::warn;

use super::entity::Entity;

const BUCKET_CAPACITY: usize = 31;

/// True for 1, 2, 4, 8, ... — used to rate-limit the overflow warning
/// to once per doubling of the overflow count instead of once per
/// dropped insert.
fn is_power_of_two(n: u64) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

#[repr(C)]
struct Bucket {
    entities: [Entity; BUCKET_CAPACITY],
    count: u8,
    _pad: [u8; 7],
}

impl Default for Bucket {
    fn default() -> Self {
        Bucket {
            entities: [Entity::new(0, 0); BUCKET_CAPACITY],
            count: 0,
            _pad: [0; 7],
        }
    }
}

pub struct SpatialGrid {
    width: u16,
    height: u16,
    buckets: Vec<Bucket>,
    overflowed: u64,
}

impl SpatialGrid {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        let mut buckets = Vec::with_capacity(len);
        buckets.resize_with(len, Bucket::default);
        SpatialGrid {
            width,
            height,
            buckets,
            overflowed: 0,
        }
    }

    fn index(&self, cell_x: i64, cell_y: i64) -> Option<usize> {
        if cell_x < 0 || cell_y < 0 || cell_x >= self.width as i64 || cell_y >= self.height as i64 {
            return None;
        }
        Some(cell_y as usize * self.width as usize + cell_x as usize)
    }

    /// Clears all buckets; called at the start of each physics tick
    /// before the spatial-insert pass of each system rebuilds it.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.count = 0;
        }
    }

    /// Inserts `entity` into the bucket at `(cell_x, cell_y)`. Out of
    /// range coordinates, or a bucket already at capacity, are silent
    /// no-ops (the latter increments the overflow diagnostic counter).
    pub fn insert(&mut self, entity: Entity, cell_x: i64, cell_y: i64) {
        let Some(idx) = self.index(cell_x, cell_y) else {
            return;
        };
        let bucket = &mut self.buckets[idx];
        if bucket.count as usize >= BUCKET_CAPACITY {
            self.overflowed += 1;
            if is_power_of_two(self.overflowed) {
                warn!(
                    "SpatialGrid bucket ({cell_x}, {cell_y}) overflowed: {} entities dropped so far",
                    self.overflowed
                );
            }
            return;
        }
        bucket.entities[bucket.count as usize] = entity;
        bucket.count += 1;
    }

    pub fn query(&self, cell_x: i64, cell_y: i64) -> &[Entity] {
        match self.index(cell_x, cell_y) {
            Some(idx) => {
                let bucket = &self.buckets[idx];
                &bucket.entities[..bucket.count as usize]
            }
            None => &[],
        }
    }

    pub fn overflowed(&self) -> u64 {
        self.overflowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_is_exactly_256_bytes() {
        assert_eq!(std::mem::size_of::<Bucket>(), 256);
    }

    #[test]
    fn insert_and_query_round_trip() {
        let mut grid = SpatialGrid::new(10, 10);
        let e = Entity::new(5, 0);
        grid.insert(e, 3, 4);
        assert_eq!(grid.query(3, 4), &[e]);
        assert_eq!(grid.query(0, 0), &[] as &[Entity]);
    }

    #[test]
    fn overflow_beyond_31_increments_counter() {
        let mut grid = SpatialGrid::new(4, 4);
        for i in 0..40u32 {
            grid.insert(Entity::new(i, 0), 1, 1);
        }
        assert_eq!(grid.query(1, 1).len(), 31);
        assert_eq!(grid.overflowed(), 9);
    }

    #[test]
    fn clear_resets_counts() {
        let mut grid = SpatialGrid::new(4, 4);
        grid.insert(Entity::new(1, 0), 0, 0);
        grid.clear();
        assert!(grid.query(0, 0).is_empty());
    }

    #[test]
    fn out_of_bounds_insert_is_noop() {
        let mut grid = SpatialGrid::new(4, 4);
        grid.insert(Entity::new(1, 0), -1, 0);
        grid.insert(Entity::new(1, 0), 10, 10);
        // no panic, nothing queryable out of range
        assert!(grid.query(-1, 0).is_empty());
    }
}
