//! The accessor facade: a small copyable value addressing one storage
//! location ("member of object" or "index of container") without the
//! caller dealing in path nodes.

use core::marker::PhantomData;

use crate::cache::{MemberKind, MemberRoute};
use crate::engine::Engine;
use crate::error::AccessError;
use crate::marshal;
use crate::mutate::set_element_impl;
use crate::ops::InspectRef;
use crate::shape::TypeShape;
use crate::walk::{
    ErrorScope, Fault, Resolved, follow_field_mut, follow_members_mut, index_value, into_error,
    read_route,
};
use crate::{FromInspect, Inspect};

// -----------------------------------------------------------------------------
// Slot

#[derive(Clone, Debug, PartialEq)]
enum SlotTarget {
    Member(MemberRoute),
    Element(usize),
    MemberElement(MemberRoute, usize),
}

/// A resolved storage location: the member (and/or element position) of a
/// source value, with its declared type captured at construction.
///
/// A `Slot` does not own its source; every access takes the source
/// explicitly, and passing a source of a different concrete type than the
/// one the slot was built from is a type mismatch. Equality covers the
/// source type, the member identity, and the index.
///
/// # Examples
///
/// ```
/// use glint_inspect::{derive::Inspect, engine::Engine, slot::Slot};
///
/// #[derive(Inspect, Clone)]
/// struct Stats {
///     hp: u32,
/// }
///
/// let engine = Engine::new();
/// let mut stats = Stats { hp: 7 };
///
/// let slot = Slot::member(&engine, &stats, "hp").unwrap();
/// assert!(slot.declared().is::<u32>());
///
/// slot.set(&engine, &mut stats, Box::new(12_u32)).unwrap();
/// assert_eq!(slot.get(&stats).unwrap().downcast_ref::<u32>(), Some(&12));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    owner: TypeShape,
    declared: TypeShape,
    target: SlotTarget,
}

impl Slot {
    /// Builds a slot addressing the member `name` of `source`.
    ///
    /// Resolution goes through the engine's member cache (base chain,
    /// shadowing, property case-insensitivity included).
    pub fn member(engine: &Engine, source: &dyn Inspect, name: &str) -> Result<Self, AccessError> {
        let (route, declared) = resolve_member(engine, source, name)?;
        Ok(Self {
            owner: source.shape(),
            declared,
            target: SlotTarget::Member(route),
        })
    }

    /// Builds a slot addressing the element of `container` at `index`.
    ///
    /// The declared type is the **element** type, not the container type.
    pub fn element(
        engine: &Engine,
        container: &dyn Inspect,
        index: usize,
    ) -> Result<Self, AccessError> {
        let owner = container.shape();
        let profile =
            engine
                .containers()
                .profile(container)
                .ok_or(AccessError::TypeMismatch {
                    expected: "an indexable container",
                    found: owner.name(),
                })?;
        Ok(Self {
            owner,
            declared: profile.element(),
            target: SlotTarget::Element(index),
        })
    }

    /// Builds a slot addressing element `index` of the container stored in
    /// member `name` of `source`.
    ///
    /// Random-access containers index directly; forward-only containers
    /// fall back to iteration on every access.
    pub fn member_element(
        engine: &Engine,
        source: &dyn Inspect,
        name: &str,
        index: usize,
    ) -> Result<Self, AccessError> {
        let (route, _) = resolve_member(engine, source, name)?;

        // Probe the member's current value to profile the container.
        let scope = ErrorScope::Plain(name);
        let InspectRef::Struct(members) = source.inspect_ref() else {
            return Err(AccessError::MemberNotFound {
                path: name.to_owned(),
                owner: source.shape().name(),
                member: name.to_owned(),
            });
        };
        let value = read_route(&route, members, 0).map_err(|fault| into_error(fault, scope))?;
        let container = value.get();
        let profile =
            engine
                .containers()
                .profile(container)
                .ok_or(AccessError::TypeMismatch {
                    expected: "an indexable container",
                    found: container.shape().name(),
                })?;

        Ok(Self {
            owner: source.shape(),
            declared: profile.element(),
            target: SlotTarget::MemberElement(route, index),
        })
    }

    /// Returns the declared type of the addressed location. For indexed
    /// targets this is the element type; callers use it to validate
    /// assignments before calling [`set`](Self::set).
    #[inline]
    pub const fn declared(&self) -> TypeShape {
        self.declared
    }

    /// Reads the addressed value out of `source`.
    pub fn get<'r>(&self, source: &'r dyn Inspect) -> Result<Resolved<'r>, AccessError> {
        self.get_fault(source)
            .map_err(|fault| into_error(fault, ErrorScope::Plain(self.owner.short_name())))
    }

    /// Writes `value` into the addressed location of `source`.
    pub fn set(
        &self,
        engine: &Engine,
        source: &mut dyn Inspect,
        value: Box<dyn Inspect>,
    ) -> Result<(), AccessError> {
        self.set_fault(engine, source, value)
            .map_err(|fault| into_error(fault, ErrorScope::Plain(self.owner.short_name())))
    }

    fn check_source(&self, source: &dyn Inspect) -> Result<(), Fault> {
        if source.ty_id() == self.owner.id() {
            Ok(())
        } else {
            Err(Fault::Mismatch {
                expected: self.owner,
                found: source.shape(),
            })
        }
    }

    fn get_fault<'r>(&self, source: &'r dyn Inspect) -> Result<Resolved<'r>, Fault> {
        self.check_source(source)?;
        match &self.target {
            SlotTarget::Member(route) => {
                let members = as_members(source)?;
                read_route(route, members, 0)
            }
            SlotTarget::Element(index) => {
                index_value(source, *index, 0).map(Resolved::Borrowed)
            }
            SlotTarget::MemberElement(route, index) => {
                let members = as_members(source)?;
                match read_route(route, members, 0)? {
                    Resolved::Borrowed(container) => {
                        index_value(container, *index, 0).map(Resolved::Borrowed)
                    }
                    Resolved::Owned(container) => {
                        let element = index_value(&*container, *index, 0)?.clone_boxed();
                        Ok(Resolved::Owned(element))
                    }
                }
            }
        }
    }

    fn set_fault(
        &self,
        engine: &Engine,
        source: &mut dyn Inspect,
        value: Box<dyn Inspect>,
    ) -> Result<(), Fault> {
        self.check_source(source)?;
        let owner_shape = self.owner;
        match &self.target {
            SlotTarget::Member(route) => match route.member() {
                MemberKind::Field(_) => {
                    let member = follow_field_mut(route, source, 0)?;
                    let expected = member.shape();
                    member.assign(value).map_err(|rejected| Fault::Mismatch {
                        expected,
                        found: rejected.shape(),
                    })
                }
                MemberKind::Property(pi) => {
                    let (declared, writable) = property_facts(route, source)?;
                    if !writable {
                        return Err(Fault::Unsupported {
                            container: owner_shape,
                            element: declared,
                        });
                    }
                    let owner = follow_members_mut(route, source, 0)?;
                    owner
                        .set_property(pi, value)
                        .map_err(|rejected| Fault::Mismatch {
                            expected: declared,
                            found: rejected.shape(),
                        })
                }
            },
            SlotTarget::Element(index) => set_element_impl(engine, source, *index, value, 0),
            SlotTarget::MemberElement(route, index) => match route.member() {
                MemberKind::Field(_) => {
                    let container = follow_field_mut(route, source, 0)?;
                    set_element_impl(engine, container, *index, value, 0)
                }
                MemberKind::Property(pi) => {
                    let (declared, writable) = property_facts(route, source)?;
                    if !writable {
                        return Err(Fault::Unsupported {
                            container: owner_shape,
                            element: declared,
                        });
                    }
                    let owner = follow_members_mut(route, source, 0)?;
                    let mut tmp = owner.get_property(pi).ok_or(Fault::MemberNotFound {
                        seg: 0,
                        owner: owner_shape,
                    })?;
                    set_element_impl(engine, &mut *tmp, *index, value, 0)?;
                    owner
                        .set_property(pi, tmp)
                        .map_err(|rejected| Fault::Mismatch {
                            expected: declared,
                            found: rejected.shape(),
                        })
                }
            },
        }
    }
}

fn as_members(source: &dyn Inspect) -> Result<&dyn crate::ops::Members, Fault> {
    match source.inspect_ref() {
        InspectRef::Struct(members) => Ok(members),
        _ => Err(Fault::MemberNotFound {
            seg: 0,
            owner: source.shape(),
        }),
    }
}

fn property_facts(route: &MemberRoute, source: &dyn Inspect) -> Result<(TypeShape, bool), Fault> {
    let members = as_members(source)?;
    let schema = members.schema();
    Ok((route.declared(schema), route.writable(schema)))
}

fn resolve_member(
    engine: &Engine,
    source: &dyn Inspect,
    name: &str,
) -> Result<(MemberRoute, TypeShape), AccessError> {
    let owner = source.shape();
    let not_found = || AccessError::MemberNotFound {
        path: name.to_owned(),
        owner: owner.name(),
        member: name.to_owned(),
    };
    let InspectRef::Struct(members) = source.inspect_ref() else {
        return Err(not_found());
    };
    let schema = members.schema();
    let route = engine
        .members()
        .resolve(owner, schema, name, false)
        .ok_or_else(not_found)?;
    let declared = route.declared(schema);
    Ok((route, declared))
}

// -----------------------------------------------------------------------------
// TypedSlot

/// A compile-time-typed wrapper over [`Slot`].
///
/// Construction validates that the slot's declared type is `T`, failing
/// fast with a descriptive error rather than deferring the mismatch to
/// first use.
///
/// # Examples
///
/// ```
/// use glint_inspect::{derive::Inspect, engine::Engine, slot::{Slot, TypedSlot}};
///
/// #[derive(Inspect, Clone)]
/// struct Stats {
///     hp: u32,
/// }
///
/// let engine = Engine::new();
/// let mut stats = Stats { hp: 7 };
/// let slot = Slot::member(&engine, &stats, "hp").unwrap();
///
/// // Wrong type: rejected at construction, not at first use.
/// assert!(TypedSlot::<f32>::new(slot.clone()).is_err());
///
/// let typed = TypedSlot::<u32>::new(slot).unwrap();
/// typed.set(&engine, &mut stats, 9).unwrap();
/// assert_eq!(typed.get(&stats).unwrap(), 9);
/// ```
pub struct TypedSlot<T: FromInspect> {
    slot: Slot,
    marker: PhantomData<fn() -> T>,
}

impl<T: FromInspect> TypedSlot<T> {
    /// Wraps `slot`, validating that its declared type is `T`.
    pub fn new(slot: Slot) -> Result<Self, AccessError> {
        if slot.declared().is::<T>() {
            Ok(Self {
                slot,
                marker: PhantomData,
            })
        } else {
            Err(AccessError::TypeMismatch {
                expected: TypeShape::of::<T>().name(),
                found: slot.declared().name(),
            })
        }
    }

    /// Reads the addressed value out of `source` as `T`.
    pub fn get(&self, source: &dyn Inspect) -> Result<T, AccessError> {
        let value = self.slot.get(source)?;
        marshal::get_value::<T>(value.get())
    }

    /// Writes `value` into the addressed location of `source`.
    pub fn set(&self, engine: &Engine, source: &mut dyn Inspect, value: T) -> Result<(), AccessError> {
        self.slot.set(engine, source, Box::new(value))
    }

    /// Returns the untyped slot.
    #[inline]
    pub fn slot(&self) -> &Slot {
        &self.slot
    }
}

impl<T: FromInspect> Clone for TypedSlot<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: FromInspect> PartialEq for TypedSlot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot
    }
}

impl<T: FromInspect> core::fmt::Debug for TypedSlot<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypedSlot").field("slot", &self.slot).finish()
    }
}
