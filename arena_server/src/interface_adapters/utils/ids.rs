use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out process-unique, never-reused identifiers.
///
/// Ids start at 1 so that 0 never appears on the wire as a real entity.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
