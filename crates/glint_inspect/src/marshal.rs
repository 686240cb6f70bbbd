//! The typed value marshaler.
//!
//! Two tiers move values in and out of resolved leaves:
//!
//! 1. **Fast path**: the requested static type matches the leaf's exact
//!    representation; a plain downcast moves the bits. This covers
//!    primitives by width and the known composite value shapes
//!    ([`Vec3`](crate::values::Vec3), [`Color`](crate::values::Color),
//!    ...), as well as reference-like shapes (`String`,
//!    [`Curve`](crate::values::Curve)).
//! 2. **Generic path**: the leaf and the request are both scalar-capable
//!    but differently shaped; the value routes through the canonical
//!    [`Scalar`](crate::scalar::Scalar) carrier with exact widening and
//!    narrowing (unsigned never sign-extends, out-of-range narrowing is
//!    rejected). Derived fieldless enums participate through their
//!    underlying integer.
//!
//! Anything else is a [`TypeMismatch`](crate::error::AccessError) and is
//! never auto-corrected.

use crate::error::AccessError;
use crate::shape::TypeShape;
use crate::walk::Fault;
use crate::{FromInspect, Inspect};

/// Reads the value of a resolved leaf as `T`.
///
/// # Examples
///
/// ```
/// use glint_inspect::marshal;
///
/// let leaf = 200_u8;
/// assert_eq!(marshal::get_value::<u8>(&leaf).unwrap(), 200);
/// // Widening reads go through canonical storage: zero-extended.
/// assert_eq!(marshal::get_value::<i64>(&leaf).unwrap(), 200);
/// // Mismatched shapes are not auto-corrected.
/// assert!(marshal::get_value::<String>(&leaf).is_err());
/// ```
pub fn get_value<T: FromInspect>(leaf: &dyn Inspect) -> Result<T, AccessError> {
    T::from_inspect(leaf).ok_or(AccessError::TypeMismatch {
        expected: TypeShape::of::<T>().name(),
        found: leaf.shape().name(),
    })
}

/// Writes `value` into a resolved leaf as `T`.
///
/// # Examples
///
/// ```
/// use glint_inspect::marshal;
///
/// let mut leaf = 0_u8;
/// marshal::set_value(&mut leaf, 255_i64).unwrap();
/// assert_eq!(leaf, u8::MAX);
///
/// // Out-of-range narrowing is rejected, not truncated.
/// assert!(marshal::set_value(&mut leaf, 256_i64).is_err());
/// ```
pub fn set_value<T: Inspect>(leaf: &mut dyn Inspect, value: T) -> Result<(), AccessError> {
    let label = leaf.shape().name();
    set_value_fault(leaf, value)
        .map_err(|fault| crate::walk::into_error(fault, crate::walk::ErrorScope::Plain(label)))
}

pub(crate) fn set_value_fault<T: Inspect>(leaf: &mut dyn Inspect, value: T) -> Result<(), Fault> {
    let expected = leaf.shape();
    // Fast path: exact representation.
    if leaf.ty_id() == value.ty_id() {
        return leaf.assign(Box::new(value)).map_err(|rejected| Fault::Mismatch {
            expected,
            found: rejected.shape(),
        });
    }
    // Generic path: canonical scalar storage.
    let found = value.shape();
    let Some(scalar) = value.as_scalar() else {
        return Err(Fault::Mismatch { expected, found });
    };
    leaf.set_scalar(scalar)
        .map_err(|_| Fault::Mismatch { expected, found })
}
