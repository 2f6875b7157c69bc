//! Print Surface Pool
//!
//! A print surface is an ESC/POS builder plus an encode buffer, both
//! pre-allocated. Surfaces are reused across station jobs instead of
//! being rebuilt per ticket.
//!
//! The pool is advisory: `acquire` never waits. When no idle surface is
//! available a fresh one is created, and on release a surface is kept only
//! while the idle list is below `max_idle`. Only the idle list is locked;
//! rendering and printing happen outside the lock.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crab_printer::EscPosBuilder;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

/// Exclusive rendering handle
pub struct PrintSurface {
    id: u64,
    builder: EscPosBuilder,
    output: Vec<u8>,
}

impl PrintSurface {
    fn new(id: u64, width: usize) -> Self {
        Self {
            id,
            builder: EscPosBuilder::new(width),
            output: Vec::with_capacity(4096),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn builder(&mut self) -> &mut EscPosBuilder {
        &mut self.builder
    }

    /// Encode the current document into the surface's output buffer
    pub fn encode(&mut self) -> &[u8] {
        self.output.clear();
        self.builder.encode_into(&mut self.output);
        &self.output
    }

    /// True when no document content is left over
    pub fn is_clean(&self) -> bool {
        self.builder.is_empty() && self.output.is_empty()
    }

    fn reset(&mut self, width: usize) {
        self.builder.clear();
        self.builder.set_width(width);
        self.output.clear();
    }
}

/// Pool counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub idle: usize,
    pub created: u64,
    pub reused: u64,
    pub discarded: u64,
}

struct PoolInner {
    idle: Mutex<Vec<PrintSurface>>,
    max_idle: usize,
    width: usize,
    next_id: AtomicU64,
    created: AtomicU64,
    reused: AtomicU64,
    discarded: AtomicU64,
}

impl PoolInner {
    fn release(&self, mut surface: PrintSurface) {
        surface.reset(self.width);
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(surface);
        } else {
            drop(idle);
            self.discarded.fetch_add(1, Ordering::Relaxed);
            debug!(surface_id = surface.id, "Print pool full, surface discarded");
        }
    }
}

/// 打印面板池
#[derive(Clone)]
pub struct PrintSurfacePool {
    inner: Arc<PoolInner>,
}

impl PrintSurfacePool {
    /// `max_idle` is the number of surfaces kept for reuse, `width` the
    /// paper width in characters
    pub fn new(max_idle: usize, width: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(Vec::with_capacity(max_idle)),
                max_idle,
                width,
                next_id: AtomicU64::new(1),
                created: AtomicU64::new(0),
                reused: AtomicU64::new(0),
                discarded: AtomicU64::new(0),
            }),
        }
    }

    /// Take an idle surface or create a new one. Never blocks on capacity.
    pub fn acquire(&self) -> PooledSurface {
        let reused = self.inner.idle.lock().pop();
        let surface = match reused {
            Some(surface) => {
                self.inner.reused.fetch_add(1, Ordering::Relaxed);
                surface
            }
            None => {
                let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
                self.inner.created.fetch_add(1, Ordering::Relaxed);
                debug!(surface_id = id, "Print pool grew");
                PrintSurface::new(id, self.inner.width)
            }
        };
        PooledSurface {
            surface: Some(surface),
            pool: Arc::clone(&self.inner),
        }
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle: self.inner.idle.lock().len(),
            created: self.inner.created.load(Ordering::Relaxed),
            reused: self.inner.reused.load(Ordering::Relaxed),
            discarded: self.inner.discarded.load(Ordering::Relaxed),
        }
    }
}

/// Surface on loan from the pool
///
/// Returned to the pool when dropped, on every exit path of the job that
/// holds it. Ownership makes double release and use-after-release
/// impossible.
pub struct PooledSurface {
    surface: Option<PrintSurface>,
    pool: Arc<PoolInner>,
}

impl Deref for PooledSurface {
    type Target = PrintSurface;

    fn deref(&self) -> &PrintSurface {
        // Only None inside Drop
        self.surface.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for PooledSurface {
    fn deref_mut(&mut self) -> &mut PrintSurface {
        self.surface.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledSurface {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.take() {
            self.pool.release(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_acquire_creates_when_empty() {
        let pool = PrintSurfacePool::new(3, 48);
        let a = pool.acquire();
        let b = pool.acquire();
        assert_ne!(a.id(), b.id());

        let stats = pool.stats();
        assert_eq!(stats.created, 2);
        assert_eq!(stats.reused, 0);
        assert_eq!(stats.idle, 0);
    }

    #[test]
    fn test_release_returns_clean_surface() {
        let pool = PrintSurfacePool::new(3, 48);
        let first_id = {
            let mut s = pool.acquire();
            s.builder().line("Paneer Tikka");
            assert!(!s.encode().is_empty());
            s.id()
        };
        assert_eq!(pool.stats().idle, 1);

        let s = pool.acquire();
        assert_eq!(s.id(), first_id);
        assert!(s.is_clean());
        assert_eq!(pool.stats().reused, 1);
    }

    #[test]
    fn test_exhausted_pool_never_blocks_and_discards_overflow() {
        let pool = PrintSurfacePool::new(2, 32);
        let held: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        let ids: HashSet<u64> = held.iter().map(|s| s.id()).collect();
        assert_eq!(ids.len(), 5);

        drop(held);
        let stats = pool.stats();
        assert_eq!(stats.idle, 2);
        assert_eq!(stats.created, 5);
        assert_eq!(stats.discarded, 3);
    }

    #[test]
    fn test_zero_capacity_pool_still_serves() {
        let pool = PrintSurfacePool::new(0, 48);
        drop(pool.acquire());
        drop(pool.acquire());
        let stats = pool.stats();
        assert_eq!(stats.created, 2);
        assert_eq!(stats.discarded, 2);
        assert_eq!(stats.idle, 0);
    }

    #[test]
    fn test_released_surface_gets_pool_width() {
        let pool = PrintSurfacePool::new(1, 32);
        {
            let mut s = pool.acquire();
            s.builder().set_width(48);
        }
        let mut s = pool.acquire();
        assert_eq!(s.builder().width(), 32);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let pool = PrintSurfacePool::new(3, 48);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let pool = pool.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        let mut s = pool.acquire();
                        s.builder().line("x");
                        let _ = s.encode();
                    }
                });
            }
        });
        let stats = pool.stats();
        assert!(stats.idle <= 3);
        assert_eq!(stats.created + stats.reused, 400);
        assert_eq!(stats.created, stats.idle as u64 + stats.discarded);
    }
}
