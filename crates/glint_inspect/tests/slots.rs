//! The accessor facade: slots and typed slots.

use std::collections::LinkedList;

use glint_inspect::derive::Inspect;
use glint_inspect::engine::Engine;
use glint_inspect::error::AccessError;
use glint_inspect::slot::{Slot, TypedSlot};

#[derive(Inspect, Clone, Debug, PartialEq)]
struct Stats {
    hp: u32,
    mp: u32,
}

#[derive(Inspect, Clone)]
struct Unit {
    stats: Stats,
    items: Vec<u32>,
    trail: LinkedList<u32>,
}

fn unit() -> Unit {
    let mut trail = LinkedList::new();
    trail.extend([7_u32, 8, 9]);
    Unit {
        stats: Stats { hp: 10, mp: 4 },
        items: vec![1, 2, 3],
        trail,
    }
}

#[test]
fn member_slots_read_and_write() {
    let engine = Engine::new();
    let mut unit = unit();

    let slot = Slot::member(&engine, &unit.stats, "hp").unwrap();
    assert!(slot.declared().is::<u32>());

    assert_eq!(
        slot.get(&unit.stats).unwrap().downcast_ref::<u32>(),
        Some(&10),
    );
    slot.set(&engine, &mut unit.stats, Box::new(11_u32)).unwrap();
    assert_eq!(unit.stats.hp, 11);
}

#[test]
fn member_slots_fail_fast_on_unknown_names() {
    let engine = Engine::new();
    let unit = unit();

    assert!(matches!(
        Slot::member(&engine, &unit.stats, "armor"),
        Err(AccessError::MemberNotFound { .. }),
    ));
}

#[test]
fn element_slots_declare_the_element_type() {
    let engine = Engine::new();
    let mut unit = unit();

    let slot = Slot::element(&engine, &unit.items, 1).unwrap();
    // Element type, not the container type.
    assert!(slot.declared().is::<u32>());

    assert_eq!(slot.get(&unit.items).unwrap().downcast_ref::<u32>(), Some(&2));
    slot.set(&engine, &mut unit.items, Box::new(20_u32)).unwrap();
    assert_eq!(unit.items, [1, 20, 3]);

    let oob = Slot::element(&engine, &unit.items, 10).unwrap();
    assert!(matches!(
        oob.get(&unit.items),
        Err(AccessError::IndexOutOfRange { .. }),
    ));
}

#[test]
fn member_element_slots_resolve_both_axes() {
    let engine = Engine::new();
    let mut unit = unit();

    let slot = Slot::member_element(&engine, &unit, "items", 2).unwrap();
    assert!(slot.declared().is::<u32>());
    assert_eq!(slot.get(&unit).unwrap().downcast_ref::<u32>(), Some(&3));

    slot.set(&engine, &mut unit, Box::new(30_u32)).unwrap();
    assert_eq!(unit.items, [1, 2, 30]);
}

#[test]
fn member_element_slots_fall_back_to_iteration() {
    let engine = Engine::new();
    let mut unit = unit();

    let slot = Slot::member_element(&engine, &unit, "trail", 2).unwrap();
    assert_eq!(slot.get(&unit).unwrap().downcast_ref::<u32>(), Some(&9));

    // Forward-only containers offer no indexed assignment.
    assert!(matches!(
        slot.set(&engine, &mut unit, Box::new(0_u32)),
        Err(AccessError::UnsupportedMutation { .. }),
    ));
}

#[test]
fn slots_compare_by_location() {
    let engine = Engine::new();
    let unit = unit();

    let a = Slot::member(&engine, &unit.stats, "hp").unwrap();
    let b = Slot::member(&engine, &unit.stats, "hp").unwrap();
    let c = Slot::member(&engine, &unit.stats, "mp").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);

    let d = Slot::member_element(&engine, &unit, "items", 1).unwrap();
    let e = Slot::member_element(&engine, &unit, "items", 2).unwrap();
    assert_ne!(d, e);
}

#[test]
fn slots_reject_foreign_sources() {
    let engine = Engine::new();
    let unit = unit();

    let slot = Slot::member(&engine, &unit.stats, "hp").unwrap();
    let other = 5_u32;
    assert!(matches!(
        slot.get(&other),
        Err(AccessError::TypeMismatch { .. }),
    ));
}

#[test]
fn typed_slots_validate_at_construction() {
    let engine = Engine::new();
    let mut unit = unit();
    let slot = Slot::member(&engine, &unit.stats, "hp").unwrap();

    // The declared type is u32; asking for f32 fails fast.
    let err = TypedSlot::<f32>::new(slot.clone()).unwrap_err();
    assert!(matches!(err, AccessError::TypeMismatch { .. }));

    let typed = TypedSlot::<u32>::new(slot).unwrap();
    typed.set(&engine, &mut unit.stats, 42).unwrap();
    assert_eq!(typed.get(&unit.stats).unwrap(), 42);
}

#[test]
fn typed_slots_widen_reads_through_the_marshaler() {
    let engine = Engine::new();
    let unit = unit();

    let slot = Slot::member_element(&engine, &unit, "items", 0).unwrap();
    let typed = TypedSlot::<u32>::new(slot).unwrap();
    assert_eq!(typed.get(&unit).unwrap(), 1);
}
