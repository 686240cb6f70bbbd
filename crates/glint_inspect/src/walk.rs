//! The object graph walker: segments in, path nodes out.
//!
//! Reads walk by shared borrows, producing one [`PathNode`] per plain
//! segment and two per indexed segment (the member that yields the
//! container, then the element). Writes descend separately by `&mut`
//! chaining; a property met mid-path switches to read-modify-write.
//!
//! Internally every failure is a cheap [`Fault`] carrying indices and
//! shapes only; the throwing API boundary turns faults into rich
//! [`AccessError`]s with rendered path prefixes, while the `try_`
//! variants simply drop them. That keeps the per-frame failure paths of
//! redraw loops allocation-free.

use crate::Inspect;
use crate::cache::{MemberKind, MemberRoute};
use crate::engine::Engine;
use crate::error::AccessError;
use crate::mutate::set_element_impl;
use crate::ops::{InspectMut, InspectRef, Members};
use crate::path::{FieldPath, Segment};
use crate::shape::{InspectKind, TypeShape};

// -----------------------------------------------------------------------------
// Resolved

/// A resolved value: borrowed out of the graph, or owned when it was
/// produced by a property getter somewhere along the way.
pub enum Resolved<'r> {
    /// A reference into the object graph.
    Borrowed(&'r dyn Inspect),
    /// A value produced by a property getter (or cloned past one).
    Owned(Box<dyn Inspect>),
}

impl<'r> Resolved<'r> {
    /// Returns the value.
    #[inline]
    pub fn get(&self) -> &dyn Inspect {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => &**value,
        }
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Inspect>(&self) -> Option<&T> {
        self.get().downcast_ref::<T>()
    }

    /// Converts into an owned boxed value, cloning if borrowed.
    #[inline]
    pub fn into_owned(self) -> Box<dyn Inspect> {
        match self {
            Self::Borrowed(value) => value.clone_boxed(),
            Self::Owned(value) => value,
        }
    }

    /// Returns `true` if this value still borrows from the graph.
    #[inline]
    pub const fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    // Stores one copy, keeps walking with the other.
    fn split(&mut self) -> Resolved<'r> {
        match self {
            Self::Borrowed(value) => Self::Borrowed(*value),
            Self::Owned(value) => Self::Owned(value.clone_boxed()),
        }
    }
}

impl core::fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Borrowed(value) => write!(f, "Borrowed({value:?})"),
            Self::Owned(value) => write!(f, "Owned({value:?})"),
        }
    }
}

// -----------------------------------------------------------------------------
// PathNode

/// One step of a completed walk: the value reached, plus how it was
/// reached (the member route, or the container index).
///
/// The list's last node carries the resolved leaf; the second-to-last
/// node carries the leaf's container. Node lists never outlive the
/// resolution call that produced them.
pub struct PathNode<'p, 'r> {
    name: &'p str,
    route: Option<MemberRoute>,
    index: Option<usize>,
    value: Resolved<'r>,
}

impl<'p, 'r> PathNode<'p, 'r> {
    /// Returns the segment name that produced this node. Empty for the
    /// root node and for pure-index steps.
    #[inline]
    pub fn name(&self) -> &'p str {
        self.name
    }

    /// Returns the member route used to reach this node, if it was
    /// reached through a member. Element nodes have no route; their name
    /// axis was consumed by the member that produced the container.
    #[inline]
    pub fn route(&self) -> Option<&MemberRoute> {
        self.route.as_ref()
    }

    /// Returns the container index, if this node is an element access.
    #[inline]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns the value at this step.
    #[inline]
    pub fn value(&self) -> &dyn Inspect {
        self.value.get()
    }

    /// Returns the resolved value wrapper at this step.
    #[inline]
    pub fn resolved(&self) -> &Resolved<'r> {
        &self.value
    }

    /// Consumes the node, returning its value.
    #[inline]
    pub fn into_value(self) -> Resolved<'r> {
        self.value
    }
}

impl core::fmt::Debug for PathNode<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PathNode")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Faults

/// Allocation-free failure record, resolved into an [`AccessError`] only
/// at the throwing API boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Fault {
    MemberNotFound { seg: usize, owner: TypeShape },
    IndexOutOfRange { seg: usize, index: usize, len: usize },
    NullIntermediate { seg: usize },
    NotIndexable { found: TypeShape },
    Mismatch { expected: TypeShape, found: TypeShape },
    Unsupported { container: TypeShape, element: TypeShape },
    Depth { depth: usize, len: usize },
}

/// Where a fault happened, for error rendering.
pub(crate) enum ErrorScope<'s, 'p> {
    /// A fault during a path walk; prefixes render from the path.
    Path(&'s FieldPath<'p>),
    /// A fault outside any path (facade and mutator surfaces).
    Plain(&'s str),
}

impl ErrorScope<'_, '_> {
    fn prefix(&self, count: usize) -> String {
        match self {
            Self::Path(path) => path.prefix(count),
            Self::Plain(label) => (*label).to_owned(),
        }
    }

    fn segment_name(&self, seg: usize) -> String {
        match self {
            Self::Path(path) => path
                .segments()
                .get(seg)
                .map(|s| s.name().to_owned())
                .unwrap_or_default(),
            Self::Plain(label) => (*label).to_owned(),
        }
    }
}

pub(crate) fn into_error(fault: Fault, scope: ErrorScope<'_, '_>) -> AccessError {
    match fault {
        Fault::MemberNotFound { seg, owner } => AccessError::MemberNotFound {
            path: scope.prefix(seg + 1),
            owner: owner.name(),
            member: scope.segment_name(seg),
        },
        Fault::IndexOutOfRange { seg, index, len } => AccessError::IndexOutOfRange {
            path: scope.prefix(seg + 1),
            index,
            len,
        },
        Fault::NullIntermediate { seg } => AccessError::NullIntermediate {
            path: scope.prefix(seg),
        },
        Fault::NotIndexable { found } => AccessError::TypeMismatch {
            expected: "an indexable container",
            found: found.name(),
        },
        Fault::Mismatch { expected, found } => AccessError::TypeMismatch {
            expected: expected.name(),
            found: found.name(),
        },
        Fault::Unsupported { container, element } => AccessError::UnsupportedMutation {
            container: container.name(),
            element: element.name(),
        },
        Fault::Depth { depth, len } => AccessError::DepthOutOfRange { depth, len },
    }
}

// -----------------------------------------------------------------------------
// Shared-borrow walk

/// Walks `path` from `root`, truncating `depth_from_end` segments, and
/// returns the node list. Node 0 is the root.
pub(crate) fn walk_nodes<'p, 'r>(
    engine: &Engine,
    root: &'r dyn Inspect,
    path: &'p FieldPath<'_>,
    depth_from_end: usize,
) -> Result<Vec<PathNode<'p, 'r>>, Fault> {
    let total = path.len();
    if depth_from_end > total {
        return Err(Fault::Depth {
            depth: depth_from_end,
            len: total,
        });
    }
    let take = total - depth_from_end;

    let mut nodes: Vec<PathNode<'p, 'r>> = Vec::with_capacity(take * 2 + 1);
    nodes.push(PathNode {
        name: "",
        route: None,
        index: None,
        value: Resolved::Borrowed(root),
    });
    let mut cur = Resolved::Borrowed(root);

    for (si, seg) in path.segments()[..take].iter().enumerate() {
        cur = unwrap_nullable(cur, si)?;

        let mut route_for_node = None;
        if !seg.name().is_empty() {
            let (route, value) = read_member(engine, &cur, seg.name(), si)?;
            route_for_node = Some(route);
            cur = value;
        }

        match seg.index() {
            None => {
                let stored = cur.split();
                nodes.push(PathNode {
                    name: seg.name(),
                    route: route_for_node,
                    index: None,
                    value: stored,
                });
            }
            Some(index) => {
                if !seg.name().is_empty() {
                    let stored = cur.split();
                    nodes.push(PathNode {
                        name: seg.name(),
                        route: route_for_node,
                        index: None,
                        value: stored,
                    });
                }
                cur = unwrap_nullable(cur, si)?;
                cur = index_into(cur, index, si)?;
                let stored = cur.split();
                nodes.push(PathNode {
                    name: seg.name(),
                    route: None,
                    index: Some(index),
                    value: stored,
                });
            }
        }
    }

    Ok(nodes)
}

/// Descends through nullable wrappers; an empty one is a null
/// intermediate.
fn unwrap_nullable<'r>(cur: Resolved<'r>, seg: usize) -> Result<Resolved<'r>, Fault> {
    match cur {
        Resolved::Borrowed(mut value) => {
            while let InspectRef::Nullable(nullable) = value.inspect_ref() {
                value = nullable
                    .get()
                    .ok_or(Fault::NullIntermediate { seg })?;
            }
            Ok(Resolved::Borrowed(value))
        }
        Resolved::Owned(mut value) => loop {
            let inner = match value.inspect_ref() {
                InspectRef::Nullable(nullable) => Some(
                    nullable
                        .get()
                        .ok_or(Fault::NullIntermediate { seg })?
                        .clone_boxed(),
                ),
                _ => None,
            };
            match inner {
                Some(next) => value = next,
                None => return Ok(Resolved::Owned(value)),
            }
        },
    }
}

fn read_member<'r>(
    engine: &Engine,
    cur: &Resolved<'r>,
    name: &str,
    seg: usize,
) -> Result<(MemberRoute, Resolved<'r>), Fault> {
    match cur {
        Resolved::Borrowed(value) => {
            let InspectRef::Struct(members) = value.inspect_ref() else {
                return Err(Fault::MemberNotFound {
                    seg,
                    owner: value.shape(),
                });
            };
            let route = engine
                .members()
                .resolve(value.shape(), members.schema(), name, true)
                .ok_or(Fault::MemberNotFound {
                    seg,
                    owner: value.shape(),
                })?;
            let member = read_route(&route, members, seg)?;
            Ok((route, member))
        }
        Resolved::Owned(value) => {
            let InspectRef::Struct(members) = value.inspect_ref() else {
                return Err(Fault::MemberNotFound {
                    seg,
                    owner: value.shape(),
                });
            };
            let route = engine
                .members()
                .resolve(value.shape(), members.schema(), name, true)
                .ok_or(Fault::MemberNotFound {
                    seg,
                    owner: value.shape(),
                })?;
            // The source dies with this call; everything becomes owned.
            let member = match read_route(&route, members, seg)? {
                Resolved::Borrowed(v) => v.clone_boxed(),
                Resolved::Owned(v) => v,
            };
            Ok((route, Resolved::Owned(member)))
        }
    }
}

/// Reads the member a route points at, starting from `members`.
///
/// Fields come back borrowed; properties come back owned.
pub(crate) fn read_route<'r>(
    route: &MemberRoute,
    members: &'r dyn Members,
    seg: usize,
) -> Result<Resolved<'r>, Fault> {
    let mut cur = members;
    for &hop in route.hops() {
        let owner = cur.shape();
        let field = cur
            .field(hop)
            .ok_or(Fault::MemberNotFound { seg, owner })?;
        cur = match field.inspect_ref() {
            InspectRef::Struct(m) => m,
            _ => return Err(Fault::MemberNotFound { seg, owner }),
        };
    }
    let owner = cur.shape();
    match route.member() {
        MemberKind::Field(index) => cur
            .field(index)
            .map(Resolved::Borrowed)
            .ok_or(Fault::MemberNotFound { seg, owner }),
        MemberKind::Property(index) => cur
            .get_property(index)
            .map(Resolved::Owned)
            .ok_or(Fault::MemberNotFound { seg, owner }),
    }
}

/// Indexes into a container value by position.
pub(crate) fn index_value<'r>(
    container: &'r dyn Inspect,
    index: usize,
    seg: usize,
) -> Result<&'r dyn Inspect, Fault> {
    match container.inspect_ref() {
        InspectRef::Array(array) => array.get(index).ok_or(Fault::IndexOutOfRange {
            seg,
            index,
            len: array.len(),
        }),
        InspectRef::Sequence(sequence) => sequence.get(index).ok_or(Fault::IndexOutOfRange {
            seg,
            index,
            len: sequence.len(),
        }),
        InspectRef::Iterable(iterable) => match iterable.nth(index) {
            Some(value) => Ok(value),
            // O(n) count; only paid on the failure path.
            None => Err(Fault::IndexOutOfRange {
                seg,
                index,
                len: iterable.items().count(),
            }),
        },
        _ => Err(Fault::NotIndexable {
            found: container.shape(),
        }),
    }
}

fn index_into<'r>(cur: Resolved<'r>, index: usize, seg: usize) -> Result<Resolved<'r>, Fault> {
    match cur {
        Resolved::Borrowed(container) => {
            index_value(container, index, seg).map(Resolved::Borrowed)
        }
        Resolved::Owned(container) => {
            let element = index_value(&*container, index, seg)?.clone_boxed();
            Ok(Resolved::Owned(element))
        }
    }
}

// -----------------------------------------------------------------------------
// Mutable descent

/// What to do once the mutable descent reaches the leaf.
pub(crate) enum MutateOp<'v> {
    /// Replace the value at the path outright.
    Replace(Box<dyn Inspect>),
    /// Run an in-place operation on the leaf (the marshaler's write).
    Apply(&'v mut dyn FnMut(&mut dyn Inspect) -> Result<(), Fault>),
}

fn apply_leaf(leaf: &mut dyn Inspect, op: MutateOp<'_>) -> Result<(), Fault> {
    match op {
        MutateOp::Replace(value) => {
            let expected = leaf.shape();
            leaf.assign(value).map_err(|rejected| Fault::Mismatch {
                expected,
                found: rejected.shape(),
            })
        }
        MutateOp::Apply(f) => f(leaf),
    }
}

/// Applies `op` at the location `segs` addresses below `cur`.
///
/// `seg_base` is the index of `segs[0]` in the full path, for fault
/// context. With an empty `segs`, `op` applies to `cur` itself.
pub(crate) fn mutate_in(
    engine: &Engine,
    cur: &mut dyn Inspect,
    segs: &[Segment<'_>],
    seg_base: usize,
    op: MutateOp<'_>,
) -> Result<(), Fault> {
    let cur = unwrap_nullable_mut(cur, seg_base)?;
    let Some((seg, rest)) = segs.split_first() else {
        return apply_leaf(cur, op);
    };
    let is_last = rest.is_empty();

    // Pure-index segment (nested containers): index the current value.
    if seg.name().is_empty() {
        let Some(index) = seg.index() else {
            return Err(Fault::MemberNotFound {
                seg: seg_base,
                owner: cur.shape(),
            });
        };
        return mutate_element(engine, cur, index, rest, seg_base, is_last, op);
    }

    let owner_shape = cur.shape();
    let route = {
        let InspectRef::Struct(members) = cur.inspect_ref() else {
            return Err(Fault::MemberNotFound {
                seg: seg_base,
                owner: owner_shape,
            });
        };
        engine
            .members()
            .resolve(owner_shape, members.schema(), seg.name(), true)
    }
    .ok_or(Fault::MemberNotFound {
        seg: seg_base,
        owner: owner_shape,
    })?;

    match route.member() {
        MemberKind::Field(_) => {
            let member = follow_field_mut(&route, cur, seg_base)?;
            match seg.index() {
                None => {
                    if is_last {
                        apply_leaf(member, op)
                    } else {
                        mutate_in(engine, member, rest, seg_base + 1, op)
                    }
                }
                Some(index) => {
                    let container = unwrap_nullable_mut(member, seg_base)?;
                    mutate_element(engine, container, index, rest, seg_base, is_last, op)
                }
            }
        }
        MemberKind::Property(pi) => {
            let (declared, writable) = {
                let InspectRef::Struct(members) = cur.inspect_ref() else {
                    return Err(Fault::MemberNotFound {
                        seg: seg_base,
                        owner: owner_shape,
                    });
                };
                let schema = members.schema();
                (route.declared(schema), route.writable(schema))
            };
            if !writable {
                return Err(Fault::Unsupported {
                    container: owner_shape,
                    element: declared,
                });
            }
            let owner = follow_members_mut(&route, cur, seg_base)?;

            // Plain leaf property: a replacement sets straight through,
            // an in-place op goes read-modify-write.
            if is_last && seg.index().is_none() {
                return match op {
                    MutateOp::Replace(value) => {
                        owner
                            .set_property(pi, value)
                            .map_err(|rejected| Fault::Mismatch {
                                expected: declared,
                                found: rejected.shape(),
                            })
                    }
                    MutateOp::Apply(f) => {
                        let mut tmp = owner.get_property(pi).ok_or(Fault::MemberNotFound {
                            seg: seg_base,
                            owner: owner_shape,
                        })?;
                        f(&mut *tmp)?;
                        owner
                            .set_property(pi, tmp)
                            .map_err(|rejected| Fault::Mismatch {
                                expected: declared,
                                found: rejected.shape(),
                            })
                    }
                };
            }

            // Read-modify-write through the property value.
            let mut tmp = owner.get_property(pi).ok_or(Fault::MemberNotFound {
                seg: seg_base,
                owner: owner_shape,
            })?;
            match seg.index() {
                None => mutate_in(engine, &mut *tmp, rest, seg_base + 1, op)?,
                Some(index) => {
                    let container = unwrap_nullable_mut(&mut *tmp, seg_base)?;
                    mutate_element(engine, container, index, rest, seg_base, is_last, op)?;
                }
            }
            owner
                .set_property(pi, tmp)
                .map_err(|rejected| Fault::Mismatch {
                    expected: declared,
                    found: rejected.shape(),
                })
        }
    }
}

fn mutate_element(
    engine: &Engine,
    container: &mut dyn Inspect,
    index: usize,
    rest: &[Segment<'_>],
    seg_base: usize,
    is_last: bool,
    op: MutateOp<'_>,
) -> Result<(), Fault> {
    if is_last {
        return match op {
            MutateOp::Replace(value) => set_element_impl(engine, container, index, value, seg_base),
            MutateOp::Apply(f) => {
                let element = element_mut(container, index, seg_base)?;
                f(element)
            }
        };
    }
    let element = element_mut(container, index, seg_base)?;
    mutate_in(engine, element, rest, seg_base + 1, op)
}

fn unwrap_nullable_mut<'m>(
    mut cur: &'m mut dyn Inspect,
    seg: usize,
) -> Result<&'m mut dyn Inspect, Fault> {
    loop {
        if cur.kind() != InspectKind::Nullable {
            return Ok(cur);
        }
        cur = match cur.inspect_mut() {
            InspectMut::Nullable(nullable) => nullable
                .get_mut()
                .ok_or(Fault::NullIntermediate { seg })?,
            _ => return Err(Fault::NullIntermediate { seg }),
        };
    }
}

/// Returns the element at `index` mutably. Bounds are probed first so the
/// fault can name the container's length.
pub(crate) fn element_mut<'m>(
    container: &'m mut dyn Inspect,
    index: usize,
    seg: usize,
) -> Result<&'m mut dyn Inspect, Fault> {
    let len = match container.inspect_ref() {
        InspectRef::Array(array) => array.len(),
        InspectRef::Sequence(sequence) => sequence.len(),
        InspectRef::Iterable(iterable) => iterable.items().count(),
        _ => {
            return Err(Fault::NotIndexable {
                found: container.shape(),
            });
        }
    };
    if index >= len {
        return Err(Fault::IndexOutOfRange { seg, index, len });
    }
    let element = match container.inspect_mut() {
        InspectMut::Array(array) => array.get_mut(index),
        InspectMut::Sequence(sequence) => sequence.get_mut(index),
        InspectMut::Iterable(iterable) => iterable.nth_mut(index),
        _ => None,
    };
    element.ok_or(Fault::IndexOutOfRange { seg, index, len })
}

/// Follows a field route to its terminal `&mut`.
pub(crate) fn follow_field_mut<'m>(
    route: &MemberRoute,
    cur: &'m mut dyn Inspect,
    seg: usize,
) -> Result<&'m mut dyn Inspect, Fault> {
    let MemberKind::Field(index) = route.member() else {
        return Err(Fault::MemberNotFound {
            seg,
            owner: cur.shape(),
        });
    };
    let owner = follow_members_mut(route, cur, seg)?;
    let owner_shape = owner.shape();
    owner.field_mut(index).ok_or(Fault::MemberNotFound {
        seg,
        owner: owner_shape,
    })
}

/// Follows a route's base hops to the `&mut` members view owning the
/// terminal member.
pub(crate) fn follow_members_mut<'m>(
    route: &MemberRoute,
    cur: &'m mut dyn Inspect,
    seg: usize,
) -> Result<&'m mut dyn Members, Fault> {
    let shape = cur.shape();
    let mut members: &'m mut dyn Members = match cur.inspect_mut() {
        InspectMut::Struct(m) => m,
        _ => return Err(Fault::MemberNotFound { seg, owner: shape }),
    };
    for &hop in route.hops() {
        let owner_shape = members.shape();
        let field = members.field_mut(hop).ok_or(Fault::MemberNotFound {
            seg,
            owner: owner_shape,
        })?;
        members = match field.inspect_mut() {
            InspectMut::Struct(m) => m,
            _ => {
                return Err(Fault::MemberNotFound {
                    seg,
                    owner: owner_shape,
                });
            }
        };
    }
    Ok(members)
}
