//! Minimal synchronization primitives for the engine's shared caches.
//!
//! The caches hold their locks only for single map operations, so a
//! busy-waiting lock built on a compare-and-swap flag beats a kernel
//! mutex; contention is rare (one interactive thread, one occasional
//! background scan).

mod backoff;
mod spin_lock;

pub use backoff::Backoff;
pub use spin_lock::{SpinLock, SpinLockGuard};
