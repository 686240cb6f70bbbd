use crate::ops::{InspectMut, InspectRef, Nullable};
use crate::shape::{InspectKind, TypeShape};
use crate::{FromInspect, Inspect};

impl<T: Inspect + Clone> Inspect for Option<T> {
    #[inline]
    fn shape(&self) -> TypeShape {
        TypeShape::of::<Self>()
    }

    #[inline]
    fn kind(&self) -> InspectKind {
        InspectKind::Nullable
    }

    #[inline]
    fn inspect_ref(&self) -> InspectRef<'_> {
        InspectRef::Nullable(self)
    }

    #[inline]
    fn inspect_mut(&mut self) -> InspectMut<'_> {
        InspectMut::Nullable(self)
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

impl<T: Inspect + Clone> Nullable for Option<T> {
    #[inline]
    fn inner_shape(&self) -> TypeShape {
        TypeShape::of::<T>()
    }

    #[inline]
    fn get(&self) -> Option<&dyn Inspect> {
        self.as_ref().map(|value| value as &dyn Inspect)
    }

    #[inline]
    fn get_mut(&mut self) -> Option<&mut dyn Inspect> {
        self.as_mut().map(|value| value as &mut dyn Inspect)
    }
}

impl<T: Inspect + Clone> FromInspect for Option<T> {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        value.downcast_ref::<Self>().cloned()
    }
}
