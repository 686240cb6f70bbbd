//! The type-universe scan: background builds, blocking completion,
//! supersession.

use core::any::TypeId;
use std::time::Duration;

use glint_inspect::derive::Inspect;
use glint_inspect::scan::{TypeEntry, TypeScan};
use glint_inspect::shape::TypeShape;

#[derive(Inspect, Clone)]
struct ScanFixture {
    value: u32,
}

mod first {
    use glint_inspect::derive::Inspect;

    #[derive(Inspect, Clone)]
    pub struct Duplicate {
        pub a: u32,
    }
}

mod second {
    use glint_inspect::derive::Inspect;

    #[derive(Inspect, Clone)]
    pub struct Duplicate {
        pub b: u32,
    }
}

#[test]
fn ensure_complete_runs_inline_when_idle() {
    let scan = TypeScan::new();
    assert!(scan.get().is_none());

    let index = scan.ensure_complete();
    assert!(!index.is_empty());
    assert!(scan.get().is_some());
}

#[test]
fn derived_types_are_registered_automatically() {
    let scan = TypeScan::new();
    let index = scan.ensure_complete();

    let shape = index.shape_named("ScanFixture").unwrap();
    assert!(shape.is::<ScanFixture>());

    // Full paths always resolve; struct entries carry their schema.
    let by_path = index.shape_named(shape.name()).unwrap();
    assert_eq!(by_path, shape);
    let schema = index.schema_of(TypeId::of::<ScanFixture>()).unwrap();
    assert_eq!(schema.field_index("value"), Some(0));

    // The crate's own value shapes are registered too.
    assert!(index.shape_named("Vec3").is_some());
}

#[test]
fn duplicate_short_names_become_ambiguous() {
    let scan = TypeScan::new();
    let index = scan.ensure_complete();

    assert!(index.is_ambiguous("Duplicate"));
    assert!(index.shape_named("Duplicate").is_none());

    // Full paths still disambiguate.
    let full = TypeShape::of::<first::Duplicate>();
    assert_eq!(index.shape_named(full.name()), Some(full));
}

#[test]
fn background_requests_publish_for_blockers() {
    let scan = TypeScan::new();
    scan.request();

    // Blocks until the worker publishes, however the race falls.
    let index = scan.ensure_complete();
    assert!(!index.is_empty());
}

#[test]
fn new_requests_supersede_inflight_scans() {
    let scan = TypeScan::new();
    scan.request();
    scan.request();
    scan.request();

    let index = scan.ensure_complete();
    assert!(!index.is_empty());

    // The published index is stable afterwards.
    let again = scan.ensure_complete();
    assert_eq!(index.len(), again.len());
}

#[test]
fn invalidate_forces_a_rebuild() {
    let scan = TypeScan::new();
    let before = scan.ensure_complete();

    scan.invalidate();
    assert!(scan.get().is_none());

    let after = scan.ensure_complete();
    assert_eq!(before.len(), after.len());
}

#[test]
fn runtime_registration_feeds_the_index() {
    struct Handmade;

    let scan = TypeScan::new();
    scan.register(TypeEntry::new(TypeShape::of::<Handmade>));

    let index = scan.ensure_complete();
    assert!(index.shape_of(TypeId::of::<Handmade>()).is_some());
}

#[test]
fn blocked_consumers_see_a_superseding_scan_through() {
    let scan = TypeScan::new();
    scan.request();
    std::thread::sleep(Duration::from_millis(1));
    scan.request();

    let index = scan.ensure_complete();
    assert!(!index.is_empty());
}
