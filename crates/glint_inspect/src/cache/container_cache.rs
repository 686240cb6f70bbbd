use core::sync::atomic::{AtomicUsize, Ordering};

use crate::Inspect;
use crate::ops::InspectRef;
use crate::shape::TypeShape;
use crate::sync::SpinLock;
use crate::util::TypeIdMap;

// -----------------------------------------------------------------------------
// ContainerProfile

/// The indexed-access capability a concrete container type offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    /// Fixed-length random access.
    Array,
    /// Growable random access, the "generic list" capability.
    Sequence,
    /// Forward-only iteration; no indexed-assignment capability.
    Iterable,
}

/// Capability profile of one concrete container type, discovered once and
/// cached by [`TypeId`](core::any::TypeId). Immutable after creation.
#[derive(Clone, Copy, Debug)]
pub struct ContainerProfile {
    kind: ContainerKind,
    element: TypeShape,
}

impl ContainerProfile {
    /// Returns the container's capability kind.
    #[inline]
    pub const fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Returns the element type's shape.
    #[inline]
    pub const fn element(&self) -> TypeShape {
        self.element
    }
}

// -----------------------------------------------------------------------------
// ContainerCache

/// Per-concrete-type container capability cache.
///
/// Capability discovery is the expensive half of indexed mutation, and
/// containers of the same concrete type recur constantly during
/// interactive editing. The first call for a new concrete type probes
/// the value and stores a [`ContainerProfile`]; repeat calls are a map
/// hit. [`discoveries`](Self::discoveries) counts the probe side so tests
/// can observe the split.
pub struct ContainerCache {
    map: SpinLock<TypeIdMap<ContainerProfile>>,
    discoveries: AtomicUsize,
}

impl ContainerCache {
    /// Creates an empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self {
            map: SpinLock::new(TypeIdMap::new()),
            discoveries: AtomicUsize::new(0),
        }
    }

    /// Returns the capability profile of `value`'s concrete type, or
    /// `None` if it is not a container at all.
    pub fn profile(&self, value: &dyn Inspect) -> Option<ContainerProfile> {
        let id = value.ty_id();
        if let Some(profile) = self.map.lock().get(&id) {
            return Some(*profile);
        }

        let profile = match value.inspect_ref() {
            InspectRef::Array(array) => ContainerProfile {
                kind: ContainerKind::Array,
                element: array.element_shape(),
            },
            InspectRef::Sequence(seq) => ContainerProfile {
                kind: ContainerKind::Sequence,
                element: seq.element_shape(),
            },
            InspectRef::Iterable(iter) => ContainerProfile {
                kind: ContainerKind::Iterable,
                element: iter.element_shape(),
            },
            _ => return None,
        };

        self.discoveries.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            container = value.shape().name(),
            kind = ?profile.kind,
            "discovered container capability",
        );
        self.map.lock().insert(id, profile);
        Some(profile)
    }

    /// Returns how many concrete container types have been discovered
    /// since the last [`clear`](Self::clear).
    ///
    /// A repeat call on another instance of an already-seen concrete type
    /// must not bump this counter.
    #[inline]
    pub fn discoveries(&self) -> usize {
        self.discoveries.load(Ordering::Relaxed)
    }

    /// Drops every cached profile and resets the discovery counter.
    pub fn clear(&self) {
        self.map.lock().clear();
        self.discoveries.store(0, Ordering::Relaxed);
    }
}

impl Default for ContainerCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
