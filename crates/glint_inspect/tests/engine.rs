//! Path resolution and mutation through the engine surface.

use glint_inspect::derive::Inspect;
use glint_inspect::engine::Engine;
use glint_inspect::error::AccessError;

#[derive(Inspect, Clone, Debug, PartialEq)]
struct Stats {
    hp: u32,
    mp: u32,
}

#[derive(Inspect, Clone)]
struct Unit {
    stats: Stats,
    items: Vec<u32>,
    tags: [u32; 3],
    grid: Vec<Vec<u32>>,
    home: Option<Stats>,
}

fn unit() -> Unit {
    Unit {
        stats: Stats { hp: 7, mp: 3 },
        items: vec![1, 2, 3, 4],
        tags: [10, 20, 30],
        grid: vec![vec![0, 1], vec![2, 3, 4]],
        home: Some(Stats { hp: 1, mp: 1 }),
    }
}

#[test]
fn resolve_and_set_nested_member() {
    let engine = Engine::new();
    let mut unit = unit();

    assert_eq!(engine.get_value::<u32>(&unit, "stats.hp").unwrap(), 7);

    engine.set_at(&mut unit, "stats.hp", Box::new(12_u32)).unwrap();
    assert_eq!(engine.get_value::<u32>(&unit, "stats.hp").unwrap(), 12);
    assert_eq!(unit.stats.hp, 12);
}

#[test]
fn indexed_element_reads_and_writes() {
    let engine = Engine::new();
    let mut unit = unit();

    assert_eq!(
        engine
            .get_value::<u32>(&unit, "items.Container.data[2]")
            .unwrap(),
        3,
    );

    engine
        .set_at(&mut unit, "items.Container.data[2]", Box::new(9_u32))
        .unwrap();
    assert_eq!(unit.items, [1, 2, 9, 4]);
}

#[test]
fn array_elements_resolve_like_list_elements() {
    let engine = Engine::new();
    let mut unit = unit();

    assert_eq!(
        engine
            .get_value::<u32>(&unit, "tags.Container.data[1]")
            .unwrap(),
        20,
    );
    engine
        .set_at(&mut unit, "tags.Container.data[1]", Box::new(99_u32))
        .unwrap();
    assert_eq!(unit.tags, [10, 99, 30]);
}

#[test]
fn out_of_range_index_names_the_prefix() {
    let engine = Engine::new();
    let unit = unit();

    let err = engine.resolve(&unit, "items.Container.data[10]").unwrap_err();
    match err {
        AccessError::IndexOutOfRange { path, index, len } => {
            assert_eq!(path, "items.Container.data[10]");
            assert_eq!(index, 10);
            assert_eq!(len, 4);
        }
        other => panic!("expected IndexOutOfRange, got {other:?}"),
    }

    let mut unit = self::unit();
    let err = engine
        .set_at(&mut unit, "items.Container.data[10]", Box::new(0_u32))
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::IndexOutOfRange { index: 10, len: 4, .. },
    ));
}

#[test]
fn nested_containers_chain_indices() {
    let engine = Engine::new();
    let mut unit = unit();

    assert_eq!(
        engine
            .get_value::<u32>(&unit, "grid.Container.data[1].Container.data[2]")
            .unwrap(),
        4,
    );
    engine
        .set_at(
            &mut unit,
            "grid.Container.data[1].Container.data[0]",
            Box::new(7_u32),
        )
        .unwrap();
    assert_eq!(unit.grid[1], [7, 3, 4]);
}

#[test]
fn null_intermediate_throws_or_signals() {
    let engine = Engine::new();
    let mut unit = unit();
    unit.home = None;

    let err = engine.resolve(&unit, "home.hp").unwrap_err();
    assert!(matches!(err, AccessError::NullIntermediate { .. }));

    assert!(engine.try_resolve(&unit, "home.hp").is_none());
    assert!(!engine.try_set_at(&mut unit, "home.hp", Box::new(2_u32)));

    // With a value present the same path works, descending transparently.
    unit.home = Some(Stats { hp: 5, mp: 0 });
    assert_eq!(engine.get_value::<u32>(&unit, "home.hp").unwrap(), 5);
    engine.set_at(&mut unit, "home.hp", Box::new(6_u32)).unwrap();
    assert_eq!(unit.home, Some(Stats { hp: 6, mp: 0 }));
}

#[test]
fn depth_from_end_yields_ancestors() {
    let engine = Engine::new();
    let unit = unit();

    let parent = engine.resolve_at(&unit, "stats.hp", 1).unwrap();
    assert_eq!(
        parent.downcast_ref::<Stats>(),
        Some(&Stats { hp: 7, mp: 3 }),
    );

    // Depth equal to the path length yields the root itself.
    let root = engine.resolve_at(&unit, "stats.hp", 2).unwrap();
    assert!(root.downcast_ref::<Unit>().is_some());

    let err = engine.resolve_at(&unit, "stats.hp", 3).unwrap_err();
    assert!(matches!(
        err,
        AccessError::DepthOutOfRange { depth: 3, len: 2 },
    ));
}

#[test]
fn walk_reports_one_node_per_step() {
    let engine = Engine::new();
    let unit = unit();
    let path = glint_inspect::path::FieldPath::parse("items.Container.data[2]").unwrap();

    let nodes = engine.walk(&unit, &path, 0).unwrap();
    // Root, the member that yields the container, the element.
    assert_eq!(nodes.len(), 3);
    assert!(nodes[0].route().is_none());
    assert!(nodes[1].route().is_some());
    assert_eq!(nodes[1].index(), None);
    assert!(nodes[1].value().is::<Vec<u32>>());
    assert!(nodes[2].route().is_none());
    assert_eq!(nodes[2].index(), Some(2));
    assert_eq!(nodes[2].value().downcast_ref::<u32>(), Some(&3));
}

#[test]
fn missing_members_name_the_owner() {
    let engine = Engine::new();
    let unit = unit();

    let err = engine.resolve(&unit, "stats.armor").unwrap_err();
    match err {
        AccessError::MemberNotFound { owner, member, .. } => {
            assert!(owner.ends_with("Stats"));
            assert_eq!(member, "armor");
        }
        other => panic!("expected MemberNotFound, got {other:?}"),
    }
}

#[test]
fn syntax_errors_are_reported_up_front() {
    let engine = Engine::new();
    let unit = unit();

    assert!(matches!(
        engine.resolve(&unit, "items.Container.data[x]"),
        Err(AccessError::Syntax(_)),
    ));
    assert!(engine.try_resolve(&unit, "").is_none());
}

#[test]
fn set_at_rejects_mismatched_leaf_types() {
    let engine = Engine::new();
    let mut unit = unit();

    let err = engine
        .set_at(&mut unit, "stats.hp", Box::new("twelve".to_string()))
        .unwrap_err();
    assert!(matches!(err, AccessError::TypeMismatch { .. }));
    assert_eq!(unit.stats.hp, 7);
}

#[test]
fn resolving_repeatedly_is_cache_transparent() {
    let engine = Engine::new();
    let mut unit = unit();

    // Cold, warm, and post-reset resolutions behave identically.
    for _ in 0..2 {
        assert_eq!(engine.get_value::<u32>(&unit, "stats.mp").unwrap(), 3);
        engine.set_value(&mut unit, "stats.mp", 3_u32).unwrap();
    }
    assert!(!engine.members().is_empty());
    engine.reset();
    assert!(engine.members().is_empty());
    assert_eq!(engine.get_value::<u32>(&unit, "stats.mp").unwrap(), 3);
}
