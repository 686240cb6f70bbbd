//! The type-universe scan.
//!
//! Enumerating every introspectable type and building the name→type lookup
//! tables is potentially expensive, so it runs once on a dedicated worker
//! thread. Consumers that need the result before proceeding call
//! [`ensure_complete`](TypeScan::ensure_complete): if the scan has not
//! started it runs inline; if it is in flight the calling thread blocks on
//! a condition variable until the index is published. Any new
//! [`request`](TypeScan::request) cancels and supersedes a prior in-flight
//! scan.
//!
//! Entries come from `#[derive(Inspect)]`'s compile-time submissions
//! (feature `auto_register`) plus any runtime
//! [`register`](TypeScan::register) calls.

use alloc::sync::Arc;
use core::any::TypeId;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::schema::StructSchema;
use crate::shape::TypeShape;
use crate::sync::SpinLock;
use crate::util::{FixedHashState, HashMap, HashSet, TypeIdMap};

// -----------------------------------------------------------------------------
// TypeEntry

/// One introspectable type, as registered for the scan.
#[derive(Clone, Copy)]
pub struct TypeEntry {
    shape: fn() -> TypeShape,
    schema: Option<fn() -> &'static StructSchema>,
}

impl TypeEntry {
    /// Creates an entry for a leaf type.
    #[inline]
    pub const fn new(shape: fn() -> TypeShape) -> Self {
        Self {
            shape,
            schema: None,
        }
    }

    /// Creates an entry for a struct type carrying its member table.
    #[inline]
    pub const fn with_schema(
        shape: fn() -> TypeShape,
        schema: fn() -> &'static StructSchema,
    ) -> Self {
        Self {
            shape,
            schema: Some(schema),
        }
    }

    /// Returns the entry's type shape.
    #[inline]
    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }

    /// Returns the entry's member table, if it is a struct.
    #[inline]
    pub fn schema(&self) -> Option<&'static StructSchema> {
        self.schema.map(|schema| schema())
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(TypeEntry);

// -----------------------------------------------------------------------------
// TypeIndex

/// The scan's product: lookup tables over every registered type.
///
/// Names index both the full type path and the trailing identifier; a
/// short name claimed by more than one type becomes ambiguous and stops
/// resolving (the full path still does).
pub struct TypeIndex {
    by_path: HashMap<&'static str, TypeId>,
    by_name: HashMap<&'static str, TypeId>,
    ambiguous: HashSet<&'static str>,
    shapes: TypeIdMap<TypeShape>,
    schemas: TypeIdMap<&'static StructSchema>,
}

impl TypeIndex {
    fn empty() -> Self {
        Self {
            by_path: HashMap::with_hasher(FixedHashState),
            by_name: HashMap::with_hasher(FixedHashState),
            ambiguous: HashSet::with_hasher(FixedHashState),
            shapes: TypeIdMap::new(),
            schemas: TypeIdMap::new(),
        }
    }

    fn build(entries: &[TypeEntry], cancel: &AtomicBool) -> Option<Self> {
        let mut index = Self::empty();
        for entry in entries {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            index.insert(entry);
        }
        Some(index)
    }

    fn insert(&mut self, entry: &TypeEntry) {
        let shape = entry.shape();
        if self.shapes.contains(&shape.id()) {
            return;
        }

        let short = shape.short_name();
        if !self.ambiguous.contains(short) {
            if self.by_name.contains_key(short) {
                self.by_name.remove(short);
                self.ambiguous.insert(short);
            } else {
                self.by_name.insert(short, shape.id());
            }
        }

        self.by_path.insert(shape.name(), shape.id());
        self.shapes.insert(shape.id(), shape);
        if let Some(schema) = entry.schema() {
            self.schemas.insert(shape.id(), schema);
        }
    }

    /// Looks a type up by full path or, failing that, by trailing
    /// identifier (unless that identifier is ambiguous).
    pub fn shape_named(&self, name: &str) -> Option<TypeShape> {
        let id = self
            .by_path
            .get(name)
            .or_else(|| self.by_name.get(name))?;
        self.shapes.get(id).copied()
    }

    /// Returns `true` if the short name is claimed by more than one type.
    #[inline]
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous.contains(name)
    }

    /// Returns the shape registered for `id`.
    #[inline]
    pub fn shape_of(&self, id: TypeId) -> Option<TypeShape> {
        self.shapes.get(&id).copied()
    }

    /// Returns the member table registered for `id`.
    #[inline]
    pub fn schema_of(&self, id: TypeId) -> Option<&'static StructSchema> {
        self.schemas.get(&id).copied()
    }

    /// Returns the number of indexed types.
    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if nothing is indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

// -----------------------------------------------------------------------------
// TypeScan

enum ScanState {
    Idle,
    Running { cancel: Arc<AtomicBool> },
    Ready(Arc<TypeIndex>),
}

struct ScanShared {
    state: Mutex<ScanState>,
    done: Condvar,
    extras: SpinLock<Vec<TypeEntry>>,
}

/// Coordinator for the one-shot background build of the [`TypeIndex`].
pub struct TypeScan {
    shared: Arc<ScanShared>,
}

impl TypeScan {
    /// Creates an idle scan.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(ScanShared {
                state: Mutex::new(ScanState::Idle),
                done: Condvar::new(),
                extras: SpinLock::new(Vec::new()),
            }),
        }
    }

    /// Registers an entry at runtime and invalidates any built index.
    ///
    /// With the `auto_register` feature, derived types register
    /// themselves; this exists for feature-off builds and for types
    /// implemented by hand.
    pub fn register(&self, entry: TypeEntry) {
        self.shared.extras.lock().push(entry);
        self.invalidate();
    }

    /// Starts (or restarts) the scan on a dedicated worker thread.
    ///
    /// A prior in-flight scan is cancelled and superseded.
    pub fn request(&self) {
        let cancel = Arc::new(AtomicBool::new(false));
        {
            let mut state = lock(&self.shared.state);
            if let ScanState::Running { cancel: prior } = &*state {
                prior.store(true, Ordering::Relaxed);
                tracing::debug!("superseding in-flight type scan");
            }
            *state = ScanState::Running {
                cancel: Arc::clone(&cancel),
            };
        }

        let spawned = std::thread::Builder::new().name("glint-type-scan".into()).spawn({
            let shared = Arc::clone(&self.shared);
            let cancel = Arc::clone(&cancel);
            move || run_scan(&shared, &cancel)
        });
        if let Err(err) = spawned {
            tracing::warn!(%err, "failed to spawn scan worker; scanning inline");
            run_scan(&self.shared, &cancel);
        }
    }

    /// Returns the index, building it if necessary.
    ///
    /// Not started: the scan runs inline on the calling thread. In
    /// flight: the calling thread blocks until the worker publishes.
    /// The consuming call sites are infrequent (editor window open, first
    /// use after a reload), so blocking is acceptable.
    pub fn ensure_complete(&self) -> Arc<TypeIndex> {
        let mut state = lock(&self.shared.state);
        loop {
            match &*state {
                ScanState::Ready(index) => return Arc::clone(index),
                ScanState::Running { .. } => {
                    state = wait(&self.shared.done, state);
                }
                ScanState::Idle => {
                    // Mark running so peers block instead of duplicating,
                    // then build inline.
                    let cancel = Arc::new(AtomicBool::new(false));
                    *state = ScanState::Running {
                        cancel: Arc::clone(&cancel),
                    };
                    drop(state);
                    run_scan(&self.shared, &cancel);
                    state = lock(&self.shared.state);
                }
            }
        }
    }

    /// Returns the index if a completed scan has published one.
    pub fn get(&self) -> Option<Arc<TypeIndex>> {
        match &*lock(&self.shared.state) {
            ScanState::Ready(index) => Some(Arc::clone(index)),
            _ => None,
        }
    }

    /// Drops any built index and cancels an in-flight scan.
    pub fn invalidate(&self) {
        {
            let mut state = lock(&self.shared.state);
            if let ScanState::Running { cancel } = &*state {
                cancel.store(true, Ordering::Relaxed);
            }
            *state = ScanState::Idle;
        }
        // Wake waiters so they fall back to scanning inline.
        self.shared.done.notify_all();
    }
}

impl Default for TypeScan {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

fn collect_entries(shared: &ScanShared) -> Vec<TypeEntry> {
    let mut entries: Vec<TypeEntry> = Vec::new();
    #[cfg(feature = "auto_register")]
    entries.extend(inventory::iter::<TypeEntry>.into_iter().copied());
    entries.extend(shared.extras.lock().iter().copied());
    entries
}

fn run_scan(shared: &ScanShared, cancel: &Arc<AtomicBool>) {
    tracing::debug!("type scan started");
    let entries = collect_entries(shared);
    let built = TypeIndex::build(&entries, cancel);

    let mut state = lock(&shared.state);
    let current = match &*state {
        ScanState::Running { cancel: current } => {
            Arc::ptr_eq(current, cancel) && !cancel.load(Ordering::Relaxed)
        }
        _ => false,
    };
    if !current {
        tracing::debug!("type scan superseded");
        return;
    }
    match built {
        Some(index) => {
            tracing::debug!(types = index.len(), "type scan complete");
            *state = ScanState::Ready(Arc::new(index));
        }
        None => {
            *state = ScanState::Idle;
        }
    }
    drop(state);
    shared.done.notify_all();
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn wait<'a>(
    condvar: &Condvar,
    guard: MutexGuard<'a, ScanState>,
) -> MutexGuard<'a, ScanState> {
    condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
}
