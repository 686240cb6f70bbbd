//! The engine context: caches, scan, and the resolution API surface.

use std::sync::OnceLock;

use crate::cache::{ContainerCache, MemberCache};
use crate::error::AccessError;
use crate::marshal;
use crate::mutate::set_element_impl;
use crate::path::FieldPath;
use crate::scan::TypeScan;
use crate::walk::{self, ErrorScope, Fault, MutateOp, PathNode, Resolved};
use crate::{FromInspect, Inspect};

// -----------------------------------------------------------------------------
// Engine

/// The accessor engine: an explicit context owning all process-wide
/// mutable state (the member cache, the container capability cache, and
/// the type-universe scan).
///
/// Most programs use one [`Engine::global`]; embedders that reload user
/// code call [`reset`](Engine::reset) at the reload checkpoint and let
/// the caches rebuild lazily.
///
/// # Examples
///
/// ```
/// use glint_inspect::{derive::Inspect, engine::Engine};
///
/// #[derive(Inspect, Clone)]
/// struct Stats {
///     hp: u32,
/// }
///
/// #[derive(Inspect, Clone)]
/// struct Unit {
///     stats: Stats,
/// }
///
/// let engine = Engine::new();
/// let mut unit = Unit { stats: Stats { hp: 7 } };
///
/// let hp: u32 = engine.get_value(&unit, "stats.hp").unwrap();
/// assert_eq!(hp, 7);
///
/// engine.set_at(&mut unit, "stats.hp", Box::new(12_u32)).unwrap();
/// assert_eq!(unit.stats.hp, 12);
/// ```
pub struct Engine {
    members: MemberCache,
    containers: ContainerCache,
    types: TypeScan,
}

impl Engine {
    /// Creates a fresh engine with empty caches.
    pub fn new() -> Self {
        Self {
            members: MemberCache::new(),
            containers: ContainerCache::new(),
            types: TypeScan::new(),
        }
    }

    /// Returns the process-wide shared engine.
    pub fn global() -> &'static Engine {
        static GLOBAL: OnceLock<Engine> = OnceLock::new();
        GLOBAL.get_or_init(Engine::new)
    }

    /// Returns the member cache.
    #[inline]
    pub fn members(&self) -> &MemberCache {
        &self.members
    }

    /// Returns the container capability cache.
    #[inline]
    pub fn containers(&self) -> &ContainerCache {
        &self.containers
    }

    /// Returns the type-universe scan.
    #[inline]
    pub fn types(&self) -> &TypeScan {
        &self.types
    }

    /// Drops all cached state and invalidates the type index.
    ///
    /// Call this whenever the set of introspectable types changes (the
    /// host reloaded user code); everything rebuilds lazily afterwards.
    pub fn reset(&self) {
        tracing::debug!("resetting accessor caches");
        self.members.clear();
        self.containers.clear();
        self.types.invalidate();
    }

    // -------------------------------------------------------------------------
    // Resolution surface

    /// Resolves `path` against `root` and returns the leaf value.
    pub fn resolve<'r>(
        &self,
        root: &'r dyn Inspect,
        path: &str,
    ) -> Result<Resolved<'r>, AccessError> {
        let parsed = FieldPath::parse(path)?;
        self.resolve_parsed(root, &parsed, 0)
    }

    /// Resolves `path` against `root`, stopping `depth_from_end` segments
    /// short of the leaf (1 yields the leaf's parent).
    pub fn resolve_at<'r>(
        &self,
        root: &'r dyn Inspect,
        path: &str,
        depth_from_end: usize,
    ) -> Result<Resolved<'r>, AccessError> {
        let parsed = FieldPath::parse(path)?;
        self.resolve_parsed(root, &parsed, depth_from_end)
    }

    /// [`resolve_at`](Self::resolve_at) over an already-parsed path.
    pub fn resolve_parsed<'r>(
        &self,
        root: &'r dyn Inspect,
        path: &FieldPath<'_>,
        depth_from_end: usize,
    ) -> Result<Resolved<'r>, AccessError> {
        let mut nodes = walk::walk_nodes(self, root, path, depth_from_end)
            .map_err(|fault| walk::into_error(fault, ErrorScope::Path(path)))?;
        match nodes.pop() {
            Some(node) => Ok(node.into_value()),
            // The node list always holds at least the root node.
            None => Err(AccessError::DepthOutOfRange {
                depth: depth_from_end,
                len: path.len(),
            }),
        }
    }

    /// Non-throwing [`resolve`](Self::resolve): any failure (parse error,
    /// missing member, null intermediate) is discarded in favor of `None`.
    pub fn try_resolve<'r>(&self, root: &'r dyn Inspect, path: &str) -> Option<Resolved<'r>> {
        let parsed = FieldPath::parse(path).ok()?;
        let mut nodes = walk::walk_nodes(self, root, &parsed, 0).ok()?;
        nodes.pop().map(PathNode::into_value)
    }

    /// Walks `path` from `root` and returns the full node list: node 0 is
    /// the root, the last node is the target, and the second-to-last node
    /// is the target's container.
    pub fn walk<'p, 'r>(
        &self,
        root: &'r dyn Inspect,
        path: &'p FieldPath<'_>,
        depth_from_end: usize,
    ) -> Result<Vec<PathNode<'p, 'r>>, AccessError> {
        walk::walk_nodes(self, root, path, depth_from_end)
            .map_err(|fault| walk::into_error(fault, ErrorScope::Path(path)))
    }

    // -------------------------------------------------------------------------
    // Mutation surface

    /// Replaces the value at `path` with `value`.
    ///
    /// The leaf member (or container element) is assigned outright; the
    /// value's type must match the leaf's declared type exactly.
    pub fn set_at(
        &self,
        root: &mut dyn Inspect,
        path: &str,
        value: Box<dyn Inspect>,
    ) -> Result<(), AccessError> {
        let parsed = FieldPath::parse(path)?;
        walk::mutate_in(self, root, parsed.segments(), 0, MutateOp::Replace(value))
            .map_err(|fault| walk::into_error(fault, ErrorScope::Path(&parsed)))
    }

    /// Non-throwing [`set_at`](Self::set_at).
    pub fn try_set_at(&self, root: &mut dyn Inspect, path: &str, value: Box<dyn Inspect>) -> bool {
        let Ok(parsed) = FieldPath::parse(path) else {
            return false;
        };
        walk::mutate_in(self, root, parsed.segments(), 0, MutateOp::Replace(value)).is_ok()
    }

    /// Replaces the element of `container` at `index`; the
    /// indexed-container mutator surface, usable without a path.
    pub fn set_element(
        &self,
        container: &mut dyn Inspect,
        index: usize,
        value: Box<dyn Inspect>,
    ) -> Result<(), AccessError> {
        let label = container.shape().short_name();
        set_element_impl(self, container, index, value, 0)
            .map_err(|fault| walk::into_error(fault, ErrorScope::Plain(label)))
    }

    // -------------------------------------------------------------------------
    // Typed marshaling surface

    /// Resolves `path` and reads the leaf as `T` through the marshaler.
    pub fn get_value<T: FromInspect>(
        &self,
        root: &dyn Inspect,
        path: &str,
    ) -> Result<T, AccessError> {
        let parsed = FieldPath::parse(path)?;
        let leaf = self.resolve_parsed(root, &parsed, 0)?;
        marshal::get_value(leaf.get())
    }

    /// Non-throwing [`get_value`](Self::get_value).
    pub fn try_get_value<T: FromInspect>(&self, root: &dyn Inspect, path: &str) -> Option<T> {
        let leaf = self.try_resolve(root, path)?;
        T::from_inspect(leaf.get())
    }

    /// Resolves `path` and writes `value` into the leaf through the
    /// marshaler (exact match fast path, canonical scalar fallback).
    pub fn set_value<T: Inspect>(
        &self,
        root: &mut dyn Inspect,
        path: &str,
        value: T,
    ) -> Result<(), AccessError> {
        let parsed = FieldPath::parse(path)?;
        let mut pending = Some(value);
        let mut apply = |leaf: &mut dyn Inspect| -> Result<(), Fault> {
            match pending.take() {
                Some(value) => marshal::set_value_fault(leaf, value),
                // The op runs exactly once per descent.
                None => Err(Fault::Mismatch {
                    expected: leaf.shape(),
                    found: leaf.shape(),
                }),
            }
        };
        walk::mutate_in(self, root, parsed.segments(), 0, MutateOp::Apply(&mut apply))
            .map_err(|fault| walk::into_error(fault, ErrorScope::Path(&parsed)))
    }

    /// Non-throwing [`set_value`](Self::set_value).
    pub fn try_set_value<T: Inspect>(&self, root: &mut dyn Inspect, path: &str, value: T) -> bool {
        let Ok(parsed) = FieldPath::parse(path) else {
            return false;
        };
        let mut pending = Some(value);
        let mut apply = |leaf: &mut dyn Inspect| -> Result<(), Fault> {
            match pending.take() {
                Some(value) => marshal::set_value_fault(leaf, value),
                None => Err(Fault::Mismatch {
                    expected: leaf.shape(),
                    found: leaf.shape(),
                }),
            }
        };
        walk::mutate_in(self, root, parsed.segments(), 0, MutateOp::Apply(&mut apply)).is_ok()
    }
}

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
