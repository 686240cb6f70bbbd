//! The indexed-container mutator.
//!
//! Replaces one element of a container by position. Capability discovery
//! (is this concrete type an array, a sequence, or forward-only?) is the
//! expensive half and goes through the engine's
//! [`ContainerCache`](crate::cache::ContainerCache); repeat calls on
//! containers of an already-seen concrete type dispatch straight off the
//! cached profile.

use crate::Inspect;
use crate::cache::ContainerKind;
use crate::engine::Engine;
use crate::ops::{InspectMut, InspectRef};
use crate::walk::Fault;

/// Replaces the element of `container` at `index` with `value`.
///
/// - Random-access containers store directly; a bounds violation is an
///   index fault naming the allowed range.
/// - Forward-only containers (and non-containers) offer no indexed
///   assignment and fail with an unsupported-mutation fault naming the
///   container and element types.
pub(crate) fn set_element_impl(
    engine: &Engine,
    container: &mut dyn Inspect,
    index: usize,
    value: Box<dyn Inspect>,
    seg: usize,
) -> Result<(), Fault> {
    let container_shape = container.shape();
    let Some(profile) = engine.containers().profile(container) else {
        return Err(Fault::Unsupported {
            container: container_shape,
            element: value.shape(),
        });
    };

    match profile.kind() {
        ContainerKind::Array | ContainerKind::Sequence => {
            let len = match container.inspect_ref() {
                InspectRef::Array(array) => array.len(),
                InspectRef::Sequence(sequence) => sequence.len(),
                _ => 0,
            };
            if index >= len {
                return Err(Fault::IndexOutOfRange { seg, index, len });
            }
            if value.ty_id() != profile.element().id() {
                return Err(Fault::Mismatch {
                    expected: profile.element(),
                    found: value.shape(),
                });
            }
            let stored = match container.inspect_mut() {
                InspectMut::Array(array) => array.set(index, value),
                InspectMut::Sequence(sequence) => sequence.set(index, value),
                _ => Err(value),
            };
            stored.map_err(|rejected| Fault::Mismatch {
                expected: profile.element(),
                found: rejected.shape(),
            })
        }
        ContainerKind::Iterable => Err(Fault::Unsupported {
            container: container_shape,
            element: value.shape(),
        }),
    }
}
