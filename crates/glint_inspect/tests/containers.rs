//! Indexed-container mutation, capability discovery, and the
//! forward-only fallback.

use std::collections::LinkedList;

use glint_inspect::derive::Inspect;
use glint_inspect::engine::Engine;
use glint_inspect::error::AccessError;

#[derive(Inspect, Clone, Debug, PartialEq)]
struct Marker {
    id: u32,
}

#[derive(Inspect, Clone)]
struct Board {
    markers: Vec<Marker>,
    trail: LinkedList<Marker>,
}

fn board() -> Board {
    let mut trail = LinkedList::new();
    trail.push_back(Marker { id: 100 });
    trail.push_back(Marker { id: 101 });
    trail.push_back(Marker { id: 102 });
    Board {
        markers: vec![Marker { id: 0 }, Marker { id: 1 }, Marker { id: 2 }],
        trail,
    }
}

#[test]
fn discovery_happens_once_per_concrete_type() {
    let engine = Engine::new();
    assert_eq!(engine.containers().discoveries(), 0);

    let mut first = board();
    engine
        .set_element(&mut first.markers, 0, Box::new(Marker { id: 7 }))
        .unwrap();
    let after_first = engine.containers().discoveries();
    assert_eq!(after_first, 1);

    // Another instance of the same concrete container type: no new
    // discovery, same mutation result.
    let mut second = board();
    engine
        .set_element(&mut second.markers, 0, Box::new(Marker { id: 7 }))
        .unwrap();
    assert_eq!(engine.containers().discoveries(), after_first);
    assert_eq!(first.markers[0], second.markers[0]);

    // A different concrete type discovers again.
    let mut other = vec![1_u8, 2, 3];
    engine.set_element(&mut other, 1, Box::new(9_u8)).unwrap();
    assert_eq!(engine.containers().discoveries(), after_first + 1);

    engine.reset();
    assert_eq!(engine.containers().discoveries(), 0);
}

#[test]
fn element_mutation_checks_bounds_and_types() {
    let engine = Engine::new();
    let mut board = board();

    let err = engine
        .set_element(&mut board.markers, 3, Box::new(Marker { id: 9 }))
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::IndexOutOfRange { index: 3, len: 3, .. },
    ));

    let err = engine
        .set_element(&mut board.markers, 0, Box::new(9_u32))
        .unwrap_err();
    assert!(matches!(err, AccessError::TypeMismatch { .. }));
}

#[test]
fn forward_only_containers_read_by_iteration() {
    let engine = Engine::new();
    let board = board();

    // O(index) fallback: advance an iterator index + 1 times.
    assert_eq!(
        engine
            .get_value::<u32>(&board, "trail.Container.data[2].id")
            .unwrap(),
        102,
    );

    let err = engine
        .resolve(&board, "trail.Container.data[5]")
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::IndexOutOfRange { index: 5, len: 3, .. },
    ));
}

#[test]
fn forward_only_containers_reject_element_replacement() {
    let engine = Engine::new();
    let mut board = board();

    let err = engine
        .set_element(&mut board.trail, 1, Box::new(Marker { id: 9 }))
        .unwrap_err();
    match err {
        AccessError::UnsupportedMutation { container, element } => {
            assert!(container.contains("LinkedList"));
            assert!(element.ends_with("Marker"));
        }
        other => panic!("expected UnsupportedMutation, got {other:?}"),
    }

    let err = engine
        .set_at(
            &mut board,
            "trail.Container.data[1]",
            Box::new(Marker { id: 9 }),
        )
        .unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMutation { .. }));
}

#[test]
fn mutating_through_a_forward_only_element_is_allowed() {
    let engine = Engine::new();
    let mut board = board();

    // Replacing the element is unsupported, but writing a field of the
    // element goes through `nth_mut`.
    engine
        .set_value(&mut board, "trail.Container.data[1].id", 500_u32)
        .unwrap();
    let ids: Vec<u32> = board.trail.iter().map(|m| m.id).collect();
    assert_eq!(ids, [100, 500, 102]);
}

#[test]
fn non_containers_cannot_be_indexed() {
    let engine = Engine::new();
    let mut value = 5_u32;

    let err = engine
        .set_element(&mut value, 0, Box::new(1_u32))
        .unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMutation { .. }));
}
