//! [`Inspect`](crate::Inspect) implementations for primitives and std
//! containers.

mod containers;
mod option;
mod scalars;
mod string;

pub(crate) use scalars::impl_leaf_common;
