use alloc::collections::{LinkedList, VecDeque};

use crate::ops::{Array, ArrayItemIter, InspectMut, InspectRef};
use crate::ops::{Iterable, Sequence, SequenceItemIter};
use crate::shape::{InspectKind, TypeShape};
use crate::{FromInspect, Inspect};

// -----------------------------------------------------------------------------
// Vec

impl<T: Inspect + Clone> Inspect for Vec<T> {
    #[inline]
    fn shape(&self) -> TypeShape {
        TypeShape::of::<Self>()
    }

    #[inline]
    fn kind(&self) -> InspectKind {
        InspectKind::Sequence
    }

    #[inline]
    fn inspect_ref(&self) -> InspectRef<'_> {
        InspectRef::Sequence(self)
    }

    #[inline]
    fn inspect_mut(&mut self) -> InspectMut<'_> {
        InspectMut::Sequence(self)
    }

    #[inline]
    fn clone_boxed(&self) -> Box<dyn Inspect> {
        Box::new(self.clone())
    }

    fn assign(&mut self, value: Box<dyn Inspect>) -> Result<(), Box<dyn Inspect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }
}

impl<T: Inspect + Clone> Sequence for Vec<T> {
    #[inline]
    fn element_shape(&self) -> TypeShape {
        TypeShape::of::<T>()
    }

    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Inspect> {
        self.as_slice().get(index).map(|value| value as &dyn Inspect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Inspect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|value| value as &mut dyn Inspect)
    }

    fn set(&mut self, index: usize, value: Box<dyn Inspect>) -> Result<(), Box<dyn Inspect>> {
        if index >= self.as_slice().len() {
            return Err(value);
        }
        self[index] = value.take::<T>()?;
        Ok(())
    }

    #[inline]
    fn iter(&self) -> SequenceItemIter<'_> {
        SequenceItemIter::new(self)
    }
}

impl<T: Inspect + Clone> FromInspect for Vec<T> {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        value.downcast_ref::<Self>().cloned()
    }
}

// -----------------------------------------------------------------------------
// VecDeque

impl<T: Inspect + Clone> Inspect for VecDeque<T> {
    #[inline]
    fn shape(&self) -> TypeShape {
        TypeShape::of::<Self>()
    }

    #[inline]
    fn kind(&self) -> InspectKind {
        InspectKind::Sequence
    }

    #[inline]
    fn inspect_ref(&self) -> InspectRef<'_> {
        InspectRef::Sequence(self)
    }

    #[inline]
    fn inspect_mut(&mut self) -> InspectMut<'_> {
        InspectMut::Sequence(self)
    }

    #[inline]
    fn clone_boxed(&self) -> Box<dyn Inspect> {
        Box::new(self.clone())
    }

    fn assign(&mut self, value: Box<dyn Inspect>) -> Result<(), Box<dyn Inspect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }
}

impl<T: Inspect + Clone> Sequence for VecDeque<T> {
    #[inline]
    fn element_shape(&self) -> TypeShape {
        TypeShape::of::<T>()
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Inspect> {
        VecDeque::get(self, index).map(|value| value as &dyn Inspect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Inspect> {
        VecDeque::get_mut(self, index).map(|value| value as &mut dyn Inspect)
    }

    fn set(&mut self, index: usize, value: Box<dyn Inspect>) -> Result<(), Box<dyn Inspect>> {
        if index >= VecDeque::len(self) {
            return Err(value);
        }
        self[index] = value.take::<T>()?;
        Ok(())
    }

    #[inline]
    fn iter(&self) -> SequenceItemIter<'_> {
        SequenceItemIter::new(self)
    }
}

impl<T: Inspect + Clone> FromInspect for VecDeque<T> {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        value.downcast_ref::<Self>().cloned()
    }
}

// -----------------------------------------------------------------------------
// Fixed arrays

impl<T: Inspect + Clone, const N: usize> Inspect for [T; N] {
    #[inline]
    fn shape(&self) -> TypeShape {
        TypeShape::of::<Self>()
    }

    #[inline]
    fn kind(&self) -> InspectKind {
        InspectKind::Array
    }

    #[inline]
    fn inspect_ref(&self) -> InspectRef<'_> {
        InspectRef::Array(self)
    }

    #[inline]
    fn inspect_mut(&mut self) -> InspectMut<'_> {
        InspectMut::Array(self)
    }

    #[inline]
    fn clone_boxed(&self) -> Box<dyn Inspect> {
        Box::new(self.clone())
    }

    fn assign(&mut self, value: Box<dyn Inspect>) -> Result<(), Box<dyn Inspect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }
}

impl<T: Inspect + Clone, const N: usize> Array for [T; N] {
    #[inline]
    fn element_shape(&self) -> TypeShape {
        TypeShape::of::<T>()
    }

    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Inspect> {
        self.as_slice().get(index).map(|value| value as &dyn Inspect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Inspect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|value| value as &mut dyn Inspect)
    }

    fn set(&mut self, index: usize, value: Box<dyn Inspect>) -> Result<(), Box<dyn Inspect>> {
        if index >= N {
            return Err(value);
        }
        self[index] = value.take::<T>()?;
        Ok(())
    }

    #[inline]
    fn iter(&self) -> ArrayItemIter<'_> {
        ArrayItemIter::new(self)
    }
}

impl<T: Inspect + Clone, const N: usize> FromInspect for [T; N] {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        value.downcast_ref::<Self>().cloned()
    }
}

// -----------------------------------------------------------------------------
// LinkedList
//
// The deliberate forward-only container: no random access, positional
// operations advance an iterator from the front.

impl<T: Inspect + Clone> Inspect for LinkedList<T> {
    #[inline]
    fn shape(&self) -> TypeShape {
        TypeShape::of::<Self>()
    }

    #[inline]
    fn kind(&self) -> InspectKind {
        InspectKind::Iterable
    }

    #[inline]
    fn inspect_ref(&self) -> InspectRef<'_> {
        InspectRef::Iterable(self)
    }

    #[inline]
    fn inspect_mut(&mut self) -> InspectMut<'_> {
        InspectMut::Iterable(self)
    }

    #[inline]
    fn clone_boxed(&self) -> Box<dyn Inspect> {
        Box::new(self.clone())
    }

    fn assign(&mut self, value: Box<dyn Inspect>) -> Result<(), Box<dyn Inspect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }
}

impl<T: Inspect + Clone> Iterable for LinkedList<T> {
    #[inline]
    fn element_shape(&self) -> TypeShape {
        TypeShape::of::<T>()
    }

    fn nth(&self, index: usize) -> Option<&dyn Inspect> {
        self.iter().nth(index).map(|value| value as &dyn Inspect)
    }

    fn nth_mut(&mut self, index: usize) -> Option<&mut dyn Inspect> {
        self.iter_mut()
            .nth(index)
            .map(|value| value as &mut dyn Inspect)
    }

    fn items(&self) -> Box<dyn Iterator<Item = &dyn Inspect> + '_> {
        Box::new(self.iter().map(|value| value as &dyn Inspect))
    }
}

impl<T: Inspect + Clone> FromInspect for LinkedList<T> {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        value.downcast_ref::<Self>().cloned()
    }
}
