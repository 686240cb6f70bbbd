//! Canonical storage for leaf numeric values.
//!
//! The marshaler's generic tier moves numbers through a widened canonical
//! representation. Signed integers widen into [`Scalar::I64`] (sign-extended),
//! unsigned integers widen into [`Scalar::U64`] (zero-extended, never
//! sign-extended), and every narrowing conversion is exact: a value that fits
//! the target width reproduces the original bit pattern, and one that does
//! not is rejected rather than truncated.

use core::fmt;

// -----------------------------------------------------------------------------
// Scalar

/// A widened canonical value for a primitive leaf.
///
/// # Examples
///
/// ```
/// use glint_inspect::scalar::Scalar;
///
/// // Unsigned values are zero-extended.
/// let s = Scalar::U64(u8::MAX as u64);
/// assert_eq!(s.to_u64(), Some(255));
/// assert_eq!(s.to_i64(), Some(255)); // not -1
///
/// // Narrowing is exact-or-nothing.
/// assert_eq!(Scalar::I64(300).to_i64().and_then(|v| i8::try_from(v).ok()), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    /// A signed integer, sign-extended to 64 bits.
    I64(i64),
    /// An unsigned integer, zero-extended to 64 bits.
    U64(u64),
    /// A floating point number, widened to 64 bits.
    F64(f64),
    /// A boolean.
    Bool(bool),
    /// A unicode scalar value.
    Char(char),
}

impl Scalar {
    /// Converts to a signed 64-bit integer, if the value is an integer that
    /// fits.
    #[inline]
    pub fn to_i64(self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(v),
            Self::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Converts to an unsigned 64-bit integer, if the value is a
    /// non-negative integer.
    #[inline]
    pub fn to_u64(self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(v),
            Self::I64(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Converts to a 64-bit float. Integers do not convert; the engine keeps
    /// integer and floating representations distinct.
    #[inline]
    pub fn to_f64(self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Converts to a 32-bit float when the narrowing round-trips exactly.
    #[inline]
    pub fn to_f32(self) -> Option<f32> {
        match self {
            Self::F64(v) => {
                let narrowed = v as f32;
                // NaN payloads are not preserved; any NaN narrows to NaN.
                if f64::from(narrowed) == v || (v.is_nan() && narrowed.is_nan()) {
                    Some(narrowed)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Converts to a boolean.
    #[inline]
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Converts to a character.
    #[inline]
    pub fn to_char(self) -> Option<char> {
        match self {
            Self::Char(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I64(v) => fmt::Display::fmt(v, f),
            Self::U64(v) => fmt::Display::fmt(v, f),
            Self::F64(v) => fmt::Display::fmt(v, f),
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => fmt::Display::fmt(v, f),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Scalar;

    #[test]
    fn unsigned_is_never_sign_extended() {
        assert_eq!(Scalar::U64(u8::MAX as u64).to_i64(), Some(255));
        assert_eq!(Scalar::U64(u16::MAX as u64).to_i64(), Some(65535));
        assert_eq!(Scalar::U64(u64::MAX).to_i64(), None);
    }

    #[test]
    fn signed_round_trips_through_wide_storage() {
        assert_eq!(Scalar::I64(i8::MIN as i64).to_i64(), Some(-128));
        assert_eq!(Scalar::I64(-1).to_u64(), None);
        assert_eq!(Scalar::I64(0).to_u64(), Some(0));
    }

    #[test]
    fn float_narrowing_is_exact() {
        assert_eq!(Scalar::F64(1.5).to_f32(), Some(1.5));
        assert_eq!(Scalar::F64(0.1).to_f32(), None);
        assert!(Scalar::F64(f64::NAN).to_f32().unwrap().is_nan());
    }

    #[test]
    fn kinds_do_not_cross() {
        assert_eq!(Scalar::F64(1.0).to_i64(), None);
        assert_eq!(Scalar::I64(1).to_f64(), None);
        assert_eq!(Scalar::Bool(true).to_i64(), None);
    }
}
