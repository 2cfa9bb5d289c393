//! Free-list object pools for hot-path entity recycling
//!
//! Entities are never allocated during steady-state play: a spawn acquires a
//! previously-released instance and resets it. The free list has a hard
//! ceiling so a population spike cannot pin memory forever.

/// A type-segregated free-list recycler.
///
/// An instance is owned either by a live collection or by this pool's free
/// list, never both. The only producer of releases is the end-of-step
/// compaction pass in the registry.
#[derive(Debug)]
pub struct ObjectPool<T> {
    free: Vec<T>,
    max_free: usize,
}

impl<T: Default> ObjectPool<T> {
    /// Create a pool whose free list holds at most `max_free` instances.
    pub fn new(max_free: usize) -> Self {
        Self {
            free: Vec::new(),
            max_free,
        }
    }

    /// Reuse a freed instance, or construct a fresh one on demand.
    pub fn acquire(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    /// Return a dead instance for reuse. Dropped outright once the free
    /// list is at its ceiling.
    pub fn release(&mut self, instance: T) {
        if self.free.len() < self.max_free {
            self.free.push(instance);
        }
    }

    /// Number of instances currently parked in the free list.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

/// Implemented by every pooled entity so compaction can filter the live list.
pub trait Recyclable: Default {
    fn is_dead(&self) -> bool;
}

/// Order-preserving in-place filter: dead entries go back to the pool, live
/// entries keep their relative order (draw order matters for layering).
pub fn compact<T: Recyclable>(list: &mut Vec<T>, pool: &mut ObjectPool<T>) {
    let mut write = 0;
    for read in 0..list.len() {
        if !list[read].is_dead() {
            list.swap(write, read);
            write += 1;
        }
    }
    for dead in list.drain(write..) {
        pool.release(dead);
    }
}
