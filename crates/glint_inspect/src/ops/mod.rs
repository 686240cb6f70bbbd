//! Kind-specific operation traits and the casting enums that reach them.
//!
//! Every [`Inspect`] value casts, through [`Inspect::inspect_ref`] and
//! [`Inspect::inspect_mut`], to exactly one of the closed set of kind views:
//!
//! - [`Members`]: named-member containers (structs), with fields,
//!   properties, and an optional base link forming an inheritance chain.
//! - [`Array`]: fixed-length random access.
//! - [`Sequence`]: growable random access.
//! - [`Iterable`]: forward-only access, the documented O(index) fallback.
//! - [`Nullable`]: optional values the walker descends transparently.
//! - plain [`Inspect`] for terminal leaves.

use crate::Inspect;
use crate::shape::InspectKind;

// -----------------------------------------------------------------------------
// Modules

mod array;
mod iterable;
mod members;
mod nullable;
mod sequence;

// -----------------------------------------------------------------------------
// Exports

pub use array::{Array, ArrayItemIter};
pub use iterable::Iterable;
pub use members::{Members, Structured};
pub use nullable::Nullable;
pub use sequence::{Sequence, SequenceItemIter};

// -----------------------------------------------------------------------------
// InspectRef

/// An immutable, kind-specific view of an [`Inspect`] value.
pub enum InspectRef<'a> {
    Struct(&'a dyn Members),
    Array(&'a dyn Array),
    Sequence(&'a dyn Sequence),
    Iterable(&'a dyn Iterable),
    Nullable(&'a dyn Nullable),
    Leaf(&'a dyn Inspect),
}

impl InspectRef<'_> {
    /// Returns the [`InspectKind`] of this view.
    #[inline]
    pub fn kind(&self) -> InspectKind {
        match self {
            Self::Struct(_) => InspectKind::Struct,
            Self::Array(_) => InspectKind::Array,
            Self::Sequence(_) => InspectKind::Sequence,
            Self::Iterable(_) => InspectKind::Iterable,
            Self::Nullable(_) => InspectKind::Nullable,
            Self::Leaf(_) => InspectKind::Leaf,
        }
    }

    /// Returns the struct view, if this is one.
    #[inline]
    pub fn as_struct(&self) -> Option<&dyn Members> {
        match self {
            Self::Struct(value) => Some(*value),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// InspectMut

/// A mutable, kind-specific view of an [`Inspect`] value.
pub enum InspectMut<'a> {
    Struct(&'a mut dyn Members),
    Array(&'a mut dyn Array),
    Sequence(&'a mut dyn Sequence),
    Iterable(&'a mut dyn Iterable),
    Nullable(&'a mut dyn Nullable),
    Leaf(&'a mut dyn Inspect),
}

impl InspectMut<'_> {
    /// Returns the [`InspectKind`] of this view.
    #[inline]
    pub fn kind(&self) -> InspectKind {
        match self {
            Self::Struct(_) => InspectKind::Struct,
            Self::Array(_) => InspectKind::Array,
            Self::Sequence(_) => InspectKind::Sequence,
            Self::Iterable(_) => InspectKind::Iterable,
            Self::Nullable(_) => InspectKind::Nullable,
            Self::Leaf(_) => InspectKind::Leaf,
        }
    }
}
