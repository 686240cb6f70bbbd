#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits `glint_inspect::` paths; this alias makes them
// resolve inside the crate itself (the value shapes dogfood the derive).
extern crate self as glint_inspect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod inspect;
mod mutate;

pub mod cache;
pub mod engine;
pub mod error;
pub mod marshal;
pub mod ops;
pub mod path;
pub mod scalar;
pub mod scan;
pub mod schema;
pub mod shape;
pub mod slot;
pub mod sync;
pub mod util;
pub mod values;
pub mod walk;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use glint_inspect_derive as derive;
pub use inspect::{FromInspect, Inspect};
