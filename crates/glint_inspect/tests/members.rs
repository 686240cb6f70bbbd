//! Member resolution semantics: base chains, shadowing, and properties.

use glint_inspect::derive::Inspect;
use glint_inspect::engine::Engine;
use glint_inspect::error::AccessError;

#[derive(Inspect, Clone, Debug, PartialEq)]
struct Actor {
    name: String,
    hp: u32,
}

#[derive(Inspect, Clone)]
struct Player {
    #[inspect(base)]
    actor: Actor,
    // Shadows `Actor::hp`.
    hp: i64,
    #[inspect(skip)]
    scratch: u64,
}

fn player() -> Player {
    Player {
        actor: Actor {
            name: "koru".into(),
            hp: 100,
        },
        hp: -5,
        scratch: 0,
    }
}

#[test]
fn subtype_members_shadow_base_members() {
    let engine = Engine::new();
    let player = player();

    // `hp` resolves to Player's own field, not Actor's.
    assert_eq!(engine.get_value::<i64>(&player, "hp").unwrap(), -5);

    // Resolving against the base type directly still finds Actor's.
    assert_eq!(engine.get_value::<u32>(&player.actor, "hp").unwrap(), 100);
}

#[test]
fn base_members_resolve_through_the_chain() {
    let engine = Engine::new();
    let mut player = player();

    assert_eq!(
        engine.get_value::<String>(&player, "name").unwrap(),
        "koru",
    );

    engine
        .set_at(&mut player, "name", Box::new("miro".to_string()))
        .unwrap();
    assert_eq!(player.actor.name, "miro");
}

#[test]
fn skipped_fields_are_not_members() {
    let engine = Engine::new();
    let player = player();

    assert!(matches!(
        engine.resolve(&player, "scratch"),
        Err(AccessError::MemberNotFound { .. }),
    ));
}

// -----------------------------------------------------------------------------
// Properties

#[derive(Inspect, Clone)]
#[inspect(property(name = "ratio", ty = "f32", get = "Self::ratio", set = "Self::set_ratio"))]
#[inspect(property(name = "label", ty = "String", get = "Self::label"))]
struct Health {
    hp: u32,
    max: u32,
}

impl Health {
    fn ratio(&self) -> f32 {
        self.hp as f32 / self.max as f32
    }

    fn set_ratio(&mut self, ratio: f32) {
        self.hp = (self.max as f32 * ratio) as u32;
    }

    fn label(&self) -> String {
        format!("{}/{}", self.hp, self.max)
    }
}

#[test]
fn properties_read_and_write_through_accessors() {
    let engine = Engine::new();
    let mut health = Health { hp: 25, max: 100 };

    assert_eq!(engine.get_value::<f32>(&health, "ratio").unwrap(), 0.25);

    engine.set_value(&mut health, "ratio", 0.5_f32).unwrap();
    assert_eq!(health.hp, 50);

    assert_eq!(engine.get_value::<String>(&health, "label").unwrap(), "50/100");
}

#[test]
fn read_only_properties_reject_writes() {
    let engine = Engine::new();
    let mut health = Health { hp: 25, max: 100 };

    let err = engine
        .set_at(&mut health, "label", Box::new("x".to_string()))
        .unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMutation { .. }));
}

#[test]
fn property_names_match_case_insensitively_fields_do_not() {
    let engine = Engine::new();
    let health = Health { hp: 25, max: 100 };

    // The convenience applies to properties...
    assert_eq!(engine.get_value::<f32>(&health, "RATIO").unwrap(), 0.25);

    // ...but never to fields.
    assert!(matches!(
        engine.resolve(&health, "HP"),
        Err(AccessError::MemberNotFound { .. }),
    ));
}

// -----------------------------------------------------------------------------
// Properties mid-path (read-modify-write)

#[derive(Inspect, Clone, Debug, PartialEq)]
struct Stats {
    hp: u32,
    mp: u32,
}

#[derive(Inspect, Clone)]
#[inspect(property(name = "stats", ty = "Stats", get = "Self::stats", set = "Self::set_stats"))]
struct Proxy {
    inner: Stats,
}

impl Proxy {
    fn stats(&self) -> Stats {
        self.inner.clone()
    }

    fn set_stats(&mut self, stats: Stats) {
        self.inner = stats;
    }
}

#[test]
fn walking_through_a_property_reads_its_product() {
    let engine = Engine::new();
    let proxy = Proxy {
        inner: Stats { hp: 9, mp: 2 },
    };

    assert_eq!(engine.get_value::<u32>(&proxy, "stats.hp").unwrap(), 9);
}

#[test]
fn writing_through_a_property_goes_read_modify_write() {
    let engine = Engine::new();
    let mut proxy = Proxy {
        inner: Stats { hp: 9, mp: 2 },
    };

    engine.set_value(&mut proxy, "stats.hp", 40_u32).unwrap();
    assert_eq!(proxy.inner, Stats { hp: 40, mp: 2 });
}
