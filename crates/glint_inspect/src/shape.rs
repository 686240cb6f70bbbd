//! Lightweight runtime type identity.

use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypeShape

/// Identity of an introspectable type: its [`TypeId`] plus a display name.
///
/// A `TypeShape` is a plain `Copy` value built on demand; it is what the
/// engine reports from declared-type queries and embeds in error messages.
///
/// # Examples
///
/// ```
/// use glint_inspect::shape::TypeShape;
///
/// let shape = TypeShape::of::<u32>();
/// assert!(shape.is::<u32>());
/// assert!(!shape.is::<i32>());
/// assert_eq!(shape.name(), "u32");
/// ```
#[derive(Clone, Copy, Debug, Eq)]
pub struct TypeShape {
    id: TypeId,
    name: &'static str,
}

impl TypeShape {
    /// Returns the shape of `T`.
    #[inline]
    pub fn of<T: ?Sized + Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the described type.
    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type name, as produced by [`core::any::type_name`].
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the trailing identifier of [`name`](Self::name).
    ///
    /// Generic arguments are kept: `alloc::vec::Vec<i32>` becomes `Vec<i32>`.
    pub fn short_name(&self) -> &'static str {
        let head = match self.name.find('<') {
            Some(lt) => &self.name[..lt],
            None => self.name,
        };
        match head.rfind("::") {
            Some(sep) => &self.name[sep + 2..],
            None => self.name,
        }
    }

    /// Check if the given type matches this shape.
    #[inline]
    pub fn is<T: ?Sized + Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeShape {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // Two shapes with the same id always carry the same name.
        self.id == other.id
    }
}

impl Hash for TypeShape {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeShape {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// -----------------------------------------------------------------------------
// InspectKind

/// A pure enumeration of the shapes a value can take under inspection.
///
/// Every [`Inspect`](crate::Inspect) value reports exactly one kind, which
/// determines the [`InspectRef`](crate::ops::InspectRef) variant it casts to.
///
/// # Examples
///
/// ```
/// use glint_inspect::{Inspect, shape::InspectKind};
///
/// assert_eq!(10_i32.kind(), InspectKind::Leaf);
/// assert_eq!(vec![1, 2, 3].kind(), InspectKind::Sequence);
/// assert_eq!(Some(1_u8).kind(), InspectKind::Nullable);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InspectKind {
    /// A named-member container (struct with fields and properties).
    Struct,
    /// A fixed-length random-access container (`[T; N]`).
    Array,
    /// A growable random-access container (`Vec<T>`, `VecDeque<T>`).
    Sequence,
    /// A forward-only container with no random access (`LinkedList<T>`).
    Iterable,
    /// An optional value (`Option<T>`); `None` acts as a null intermediate.
    Nullable,
    /// A terminal value with no addressable children.
    Leaf,
}

impl fmt::Display for InspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Struct => "struct",
            Self::Array => "array",
            Self::Sequence => "sequence",
            Self::Iterable => "iterable",
            Self::Nullable => "nullable",
            Self::Leaf => "leaf",
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeShape;

    #[test]
    fn short_name_strips_modules() {
        assert_eq!(TypeShape::of::<String>().short_name(), "String");
        assert_eq!(TypeShape::of::<u8>().short_name(), "u8");
        assert_eq!(TypeShape::of::<Vec<i32>>().short_name(), "Vec<i32>");
    }

    #[test]
    fn equality_is_by_id() {
        assert_eq!(TypeShape::of::<u32>(), TypeShape::of::<u32>());
        assert_ne!(TypeShape::of::<u32>(), TypeShape::of::<i32>());
    }
}
