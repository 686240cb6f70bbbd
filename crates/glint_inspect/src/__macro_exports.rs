//! Re-exports consumed by the code `#[derive(Inspect)]` generates.
//!
//! Not part of the public API; paths and contents may change without
//! notice.

pub use alloc::boxed::Box;

pub use crate::ops::{InspectMut, InspectRef, Members, Structured};
pub use crate::scalar::Scalar;
pub use crate::scan::TypeEntry;
pub use crate::schema::{BaseLink, FieldSchema, PropertySchema, StructSchema};
pub use crate::shape::{InspectKind, TypeShape};
pub use crate::{FromInspect, Inspect};

#[cfg(feature = "auto_register")]
pub use inventory;
