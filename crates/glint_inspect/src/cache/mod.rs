//! Process-wide resolution caches.
//!
//! Both caches are additive between [`clear`](MemberCache::clear)
//! checkpoints and guarded by a [`SpinLock`](crate::sync::SpinLock); the
//! critical sections are single map operations. They are owned by an
//! [`Engine`](crate::engine::Engine), whose `reset` is the hook for "the
//! set of introspectable types changed".

mod container_cache;
mod member_cache;

pub use container_cache::{ContainerCache, ContainerKind, ContainerProfile};
pub use member_cache::{MemberCache, MemberKind, MemberRoute};
