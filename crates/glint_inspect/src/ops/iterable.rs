use crate::Inspect;
use crate::shape::TypeShape;

// -----------------------------------------------------------------------------
// Iterable

/// A trait for type-erased forward-only sequences.
///
/// This is the documented fallback for containers with no random-access
/// capability (`LinkedList<T>`): positional access advances a fresh
/// iterator `index + 1` times and therefore costs O(index) per call, with
/// no upper bound on the index a caller may request. Containers that can
/// do better implement [`Sequence`](crate::ops::Sequence) instead.
///
/// Forward-only containers offer no indexed-assignment capability; the
/// indexed-container mutator rejects them. Mutating *through* an element
/// (a field of the element) via [`nth_mut`](Iterable::nth_mut) is fine.
pub trait Iterable: Inspect {
    /// Returns the shape of the element type.
    fn element_shape(&self) -> TypeShape;

    /// Returns the element at position `index` by advancing an iterator.
    ///
    /// O(index). Returns `None` if the sequence runs out first.
    fn nth(&self, index: usize) -> Option<&dyn Inspect>;

    /// Mutable variant of [`nth`](Iterable::nth). O(index).
    fn nth_mut(&mut self, index: usize) -> Option<&mut dyn Inspect>;

    /// Returns a forward iterator over the elements.
    fn items(&self) -> Box<dyn Iterator<Item = &dyn Inspect> + '_>;
}
