//! Error types for path parsing and graph access.

use alloc::borrow::Cow;
use core::fmt;

// -----------------------------------------------------------------------------
// SyntaxError

/// A path string that could not be parsed.
///
/// This is a caller bug, never a retryable condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte position in `path` where parsing failed.
    pub offset: usize,
    /// The path that the error occurred in.
    pub path: String,
    /// The underlying error.
    pub error: Cow<'static, str>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid path `{}` at offset {}: {}",
            self.path, self.offset, self.error,
        )
    }
}

impl core::error::Error for SyntaxError {}

// -----------------------------------------------------------------------------
// AccessError

/// An error returned from a failed resolution or mutation.
///
/// Every engine operation has a throwing variant returning this type and a
/// non-throwing `try_` variant that discards the reason in favor of a
/// boolean/`Option` signal; callers that need the reason must use the
/// throwing variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The path text is malformed. See [`SyntaxError`] for details.
    Syntax(SyntaxError),
    /// A member name was not found anywhere in the owner's base chain.
    MemberNotFound {
        /// The path prefix that resolved the owner.
        path: String,
        /// Type the lookup started from.
        owner: &'static str,
        /// The name that failed to resolve.
        member: String,
    },
    /// A container was too short for the requested index.
    IndexOutOfRange {
        /// The path prefix naming the container access.
        path: String,
        /// The requested index.
        index: usize,
        /// The container's length at the time of access.
        len: usize,
    },
    /// The walk hit an empty value before reaching the target.
    NullIntermediate {
        /// The path prefix that produced the empty value.
        path: String,
    },
    /// The resolved shape is incompatible with the requested static type.
    TypeMismatch {
        /// The type the caller asked for or the slot stores.
        expected: &'static str,
        /// The type actually present.
        found: &'static str,
    },
    /// The container type offers no writable indexed-assignment capability.
    UnsupportedMutation {
        /// The container (or owner) type probed for the capability.
        container: &'static str,
        /// The element (or member) type the caller tried to store.
        element: &'static str,
    },
    /// A requested ancestor depth exceeds the path length.
    DepthOutOfRange {
        /// The requested `depth_from_end`.
        depth: usize,
        /// The number of segments in the path.
        len: usize,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(err) => fmt::Display::fmt(err, f),
            Self::MemberNotFound {
                path,
                owner,
                member,
            } => write!(
                f,
                "`{owner}` has no member named `{member}` anywhere in its base chain (at `{path}`)",
            ),
            Self::IndexOutOfRange { path, index, len } => write!(
                f,
                "index {index} is out of range for `{path}` (valid range 0..{len})",
            ),
            Self::NullIntermediate { path } => {
                write!(f, "`{path}` is empty; the walk cannot continue")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected `{expected}`, found `{found}`")
            }
            Self::UnsupportedMutation { container, element } => write!(
                f,
                "`{container}` offers no writable indexed assignment for `{element}`",
            ),
            Self::DepthOutOfRange { depth, len } => write!(
                f,
                "ancestor depth {depth} exceeds the path length ({len} segments)",
            ),
        }
    }
}

impl core::error::Error for AccessError {}

impl From<SyntaxError> for AccessError {
    #[inline]
    fn from(value: SyntaxError) -> Self {
        Self::Syntax(value)
    }
}
