use crate::scalar::Scalar;
use crate::{FromInspect, Inspect};

/// The [`Inspect`] methods every leaf type shares.
macro_rules! impl_leaf_common {
    () => {
        #[inline]
        fn shape(&self) -> $crate::shape::TypeShape {
            $crate::shape::TypeShape::of::<Self>()
        }

        #[inline]
        fn kind(&self) -> $crate::shape::InspectKind {
            $crate::shape::InspectKind::Leaf
        }

        #[inline]
        fn inspect_ref(&self) -> $crate::ops::InspectRef<'_> {
            $crate::ops::InspectRef::Leaf(self)
        }

        #[inline]
        fn inspect_mut(&mut self) -> $crate::ops::InspectMut<'_> {
            $crate::ops::InspectMut::Leaf(self)
        }

        #[inline]
        fn clone_boxed(&self) -> Box<dyn $crate::Inspect> {
            Box::new(self.clone())
        }

        fn assign(&mut self, value: Box<dyn $crate::Inspect>) -> Result<(), Box<dyn $crate::Inspect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }
    };
}

pub(crate) use impl_leaf_common;

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_signed {
    ($($ty:ty),* $(,)?) => {$(
        impl Inspect for $ty {
            impl_leaf_common!();

            #[inline]
            fn as_scalar(&self) -> Option<Scalar> {
                Some(Scalar::I64(*self as i64))
            }

            fn set_scalar(&mut self, value: Scalar) -> Result<(), Scalar> {
                match value.to_i64().and_then(|v| <$ty>::try_from(v).ok()) {
                    Some(v) => {
                        *self = v;
                        Ok(())
                    }
                    None => Err(value),
                }
            }
        }

        impl FromInspect for $ty {
            fn from_inspect(value: &dyn Inspect) -> Option<Self> {
                if let Some(v) = value.downcast_ref::<Self>() {
                    return Some(*v);
                }
                value.as_scalar()?.to_i64().and_then(|v| <$ty>::try_from(v).ok())
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),* $(,)?) => {$(
        impl Inspect for $ty {
            impl_leaf_common!();

            #[inline]
            fn as_scalar(&self) -> Option<Scalar> {
                // Zero-extension; an unsigned value never sign-extends.
                Some(Scalar::U64(*self as u64))
            }

            fn set_scalar(&mut self, value: Scalar) -> Result<(), Scalar> {
                match value.to_u64().and_then(|v| <$ty>::try_from(v).ok()) {
                    Some(v) => {
                        *self = v;
                        Ok(())
                    }
                    None => Err(value),
                }
            }
        }

        impl FromInspect for $ty {
            fn from_inspect(value: &dyn Inspect) -> Option<Self> {
                if let Some(v) = value.downcast_ref::<Self>() {
                    return Some(*v);
                }
                value.as_scalar()?.to_u64().and_then(|v| <$ty>::try_from(v).ok())
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Floats

impl Inspect for f32 {
    impl_leaf_common!();

    #[inline]
    fn as_scalar(&self) -> Option<Scalar> {
        Some(Scalar::F64(f64::from(*self)))
    }

    fn set_scalar(&mut self, value: Scalar) -> Result<(), Scalar> {
        match value.to_f32() {
            Some(v) => {
                *self = v;
                Ok(())
            }
            None => Err(value),
        }
    }
}

impl FromInspect for f32 {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        if let Some(v) = value.downcast_ref::<Self>() {
            return Some(*v);
        }
        value.as_scalar()?.to_f32()
    }
}

impl Inspect for f64 {
    impl_leaf_common!();

    #[inline]
    fn as_scalar(&self) -> Option<Scalar> {
        Some(Scalar::F64(*self))
    }

    fn set_scalar(&mut self, value: Scalar) -> Result<(), Scalar> {
        match value.to_f64() {
            Some(v) => {
                *self = v;
                Ok(())
            }
            None => Err(value),
        }
    }
}

impl FromInspect for f64 {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        if let Some(v) = value.downcast_ref::<Self>() {
            return Some(*v);
        }
        value.as_scalar()?.to_f64()
    }
}

// -----------------------------------------------------------------------------
// Bool / char

impl Inspect for bool {
    impl_leaf_common!();

    #[inline]
    fn as_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Bool(*self))
    }

    fn set_scalar(&mut self, value: Scalar) -> Result<(), Scalar> {
        match value.to_bool() {
            Some(v) => {
                *self = v;
                Ok(())
            }
            None => Err(value),
        }
    }
}

impl FromInspect for bool {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        if let Some(v) = value.downcast_ref::<Self>() {
            return Some(*v);
        }
        value.as_scalar()?.to_bool()
    }
}

impl Inspect for char {
    impl_leaf_common!();

    #[inline]
    fn as_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Char(*self))
    }

    fn set_scalar(&mut self, value: Scalar) -> Result<(), Scalar> {
        match value.to_char() {
            Some(v) => {
                *self = v;
                Ok(())
            }
            None => Err(value),
        }
    }
}

impl FromInspect for char {
    fn from_inspect(value: &dyn Inspect) -> Option<Self> {
        if let Some(v) = value.downcast_ref::<Self>() {
            return Some(*v);
        }
        value.as_scalar()?.to_char()
    }
}
