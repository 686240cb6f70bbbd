use crate::Inspect;
use crate::shape::TypeShape;

// -----------------------------------------------------------------------------
// Nullable

/// A trait for type-erased optional values.
///
/// Implemented for `Option<T>`. The object graph walker descends through
/// nullable values transparently; an empty one met before the final path
/// segment is the null-intermediate condition (an error in the throwing
/// variants, a `false`/`None` result in the `try_` variants).
///
/// # Examples
///
/// ```
/// use glint_inspect::{Inspect, ops::Nullable};
///
/// let some: &dyn Nullable = &Some(5_i32);
/// let none: &dyn Nullable = &Option::<i32>::None;
///
/// assert!(some.get().is_some());
/// assert!(none.get().is_none());
/// ```
pub trait Nullable: Inspect {
    /// Returns the shape of the inner type.
    fn inner_shape(&self) -> TypeShape;

    /// Returns the inner value, if present.
    fn get(&self) -> Option<&dyn Inspect>;

    /// Returns the inner value mutably, if present.
    fn get_mut(&mut self) -> Option<&mut dyn Inspect>;

    /// Returns `true` if a value is present.
    #[inline]
    fn is_present(&self) -> bool {
        self.get().is_some()
    }
}
