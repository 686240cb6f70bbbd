use core::any::{Any, TypeId};
use core::fmt;

use crate::ops::{InspectMut, InspectRef};
use crate::scalar::Scalar;
use crate::shape::{InspectKind, TypeShape};

// -----------------------------------------------------------------------------
// Inspect

/// The foundational trait for dynamic access into an object graph.
///
/// This trait enables the engine to read and write data without compile-time
/// type information. It's strongly recommended to use
/// [the derive macro](crate::derive::Inspect) rather than implementing it by
/// hand; the derive also implements [`Members`] (for structs) and wires up
/// the descriptor tables the member cache consumes.
///
/// # Type Identification
///
/// While `Inspect` supports [`Any`], note that [`Any::type_id`] on a
/// `Box<dyn Inspect>` returns the container's type id, not the inner
/// value's. Use [`Inspect::ty_id`] instead:
///
/// ```
/// use glint_inspect::Inspect;
/// use core::any::{Any, TypeId};
///
/// let x: Box<dyn Inspect> = Box::new(32_i32);
///
/// assert!((*x).type_id() == TypeId::of::<i32>());
/// assert!(x.ty_id() == TypeId::of::<i32>()); // preferred
/// ```
///
/// # Kind Casting
///
/// Use [`inspect_ref`] and [`inspect_mut`] to cast to the kind-specific
/// traits ([`Members`], [`Sequence`], ...):
///
/// ```
/// use glint_inspect::{Inspect, ops::InspectRef};
///
/// let vec = vec![1, 2, 3];
/// let InspectRef::Sequence(seq) = vec.inspect_ref() else { unreachable!() };
/// assert_eq!(seq.len(), 3);
/// ```
///
/// Use `downcast_ref`, `downcast_mut`, and `take` for concrete conversion:
///
/// ```
/// use glint_inspect::Inspect;
///
/// let x: Box<dyn Inspect> = Box::new(10_i32);
/// assert_eq!(x.downcast_ref::<i32>(), Some(&10));
/// ```
///
/// # Scalar hooks
///
/// Primitive leaves (and derived fieldless enums) also expose their value
/// through the canonical [`Scalar`] carrier via [`as_scalar`] and
/// [`set_scalar`]; this is the marshaler's generic tier. The default
/// implementations report "not a scalar".
///
/// [`Members`]: crate::ops::Members
/// [`Sequence`]: crate::ops::Sequence
/// [`inspect_ref`]: Inspect::inspect_ref
/// [`inspect_mut`]: Inspect::inspect_mut
/// [`as_scalar`]: Inspect::as_scalar
/// [`set_scalar`]: Inspect::set_scalar
pub trait Inspect: Any + Send + Sync {
    /// Returns the [`TypeShape`] of the underlying type.
    fn shape(&self) -> TypeShape;

    /// Returns the [`TypeId`] of the underlying type.
    ///
    /// Unlike [`Any::type_id`] called through a box, this always describes
    /// the inner value.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns the [kind](InspectKind) of the underlying type.
    fn kind(&self) -> InspectKind;

    /// Casts to an immutable kind-specific view.
    fn inspect_ref(&self) -> InspectRef<'_>;

    /// Casts to a mutable kind-specific view.
    fn inspect_mut(&mut self) -> InspectMut<'_>;

    /// Clones the value behind the trait object.
    fn clone_boxed(&self) -> Box<dyn Inspect>;

    /// Performs a type-checked assignment of a boxed value to this value.
    ///
    /// Returns the value unchanged if its type differs from `Self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use glint_inspect::Inspect;
    ///
    /// let mut x = 1_i32;
    /// x.assign(Box::new(7_i32)).unwrap();
    /// assert_eq!(x, 7);
    ///
    /// assert!(x.assign(Box::new(String::from("seven"))).is_err());
    /// ```
    fn assign(&mut self, value: Box<dyn Inspect>) -> Result<(), Box<dyn Inspect>>;

    /// Captures the value into the canonical [`Scalar`] carrier.
    ///
    /// Returns `None` for non-scalar values.
    #[inline]
    fn as_scalar(&self) -> Option<Scalar> {
        None
    }

    /// Stores a canonical [`Scalar`] into this value, narrowing exactly.
    ///
    /// Returns the scalar unchanged if this value is not a scalar or the
    /// narrowing would not reproduce the original bit pattern.
    #[inline]
    fn set_scalar(&mut self, value: Scalar) -> Result<(), Scalar> {
        Err(value)
    }

    /// Casts this type to a fully-erased value.
    #[inline(always)]
    fn as_inspect(&self) -> &dyn Inspect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this type to a mutable, fully-erased value.
    #[inline(always)]
    fn as_inspect_mut(&mut self) -> &mut dyn Inspect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this type to a boxed, fully-erased value.
    #[inline(always)]
    fn into_boxed_inspect(self) -> Box<dyn Inspect>
    where
        Self: Sized,
    {
        Box::new(self)
    }
}

impl dyn Inspect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn downcast<T: Any>(self: Box<dyn Inspect>) -> Result<Box<T>, Box<dyn Inspect>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait
    /// object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use glint_inspect::Inspect;
    ///
    /// let x: Box<dyn Inspect> = Box::new(10_i32);
    /// assert_eq!(x.take::<i32>().unwrap(), 10);
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Inspect>) -> Result<T, Box<dyn Inspect>> {
        self.downcast::<T>().map(|boxed| *boxed)
    }
}

impl fmt::Debug for dyn Inspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.kind(), self.shape().short_name())
    }
}

// -----------------------------------------------------------------------------
// FromInspect

/// Typed extraction out of an erased value.
///
/// This is the read half of the value marshaler: the implementation first
/// tries an exact representation match (a plain downcast), then any
/// cheaper-to-widen route the type supports: primitives fall back to the
/// canonical [`Scalar`] conversion, so a `u8` field can be read as `i64`
/// without sign-extension mistakes.
///
/// # Examples
///
/// ```
/// use glint_inspect::{FromInspect, Inspect};
///
/// let field = 200_u8;
/// let wide = i64::from_inspect(&field).unwrap();
/// assert_eq!(wide, 200); // zero-extended, not -56
/// ```
pub trait FromInspect: Inspect + Sized {
    /// Constructs `Self` from an erased value, or `None` if the value's
    /// shape is incompatible.
    fn from_inspect(value: &dyn Inspect) -> Option<Self>;
}
