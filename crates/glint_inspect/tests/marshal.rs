//! Value marshaling: round trips, canonical numeric semantics, enums.

use glint_inspect::derive::Inspect;
use glint_inspect::engine::Engine;
use glint_inspect::error::AccessError;
use glint_inspect::marshal::{get_value, set_value};
use glint_inspect::values::{Bounds, Color, Curve, CurveKey, Mask, Rect, Vec2, Vec3, Vec4};
use glint_inspect::{FromInspect, Inspect};

fn round_trip<T>(initial: T, value: T)
where
    T: Inspect + FromInspect + Clone + PartialEq + core::fmt::Debug,
{
    let mut leaf = initial;
    set_value(&mut leaf, value.clone()).unwrap();
    assert_eq!(get_value::<T>(&leaf).unwrap(), value);
}

#[test]
fn primitives_round_trip_exactly() {
    round_trip(0_u8, u8::MAX);
    round_trip(0_u16, u16::MAX);
    round_trip(0_u32, u32::MAX);
    round_trip(0_u64, u64::MAX);
    round_trip(0_i8, i8::MIN);
    round_trip(0_i16, i16::MIN);
    round_trip(0_i32, i32::MIN);
    round_trip(0_i64, i64::MIN);
    round_trip(0_usize, usize::MAX);
    round_trip(0_isize, isize::MIN);
    round_trip(0.0_f32, -1.5_f32);
    round_trip(0.0_f64, 1.0e300_f64);
    round_trip(false, true);
    round_trip('a', 'ß');
    round_trip(String::new(), "hello".to_string());
}

#[test]
fn composite_shapes_round_trip_exactly() {
    round_trip(Vec2::default(), Vec2::new(1.0, 2.0));
    round_trip(Vec3::default(), Vec3::new(1.0, 2.0, 3.0));
    round_trip(Vec4::default(), Vec4::new(1.0, 2.0, 3.0, 4.0));
    round_trip(Color::default(), Color::new(0.1, 0.2, 0.3, 1.0));
    round_trip(Rect::default(), Rect::new(0.0, 0.0, 64.0, 32.0));
    round_trip(
        Bounds::default(),
        Bounds::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.5, 0.5)),
    );
    round_trip(Mask::default(), Mask::new(0b1010));
    round_trip(
        Curve::default(),
        Curve::new(vec![CurveKey::new(0.0, 1.0), CurveKey::new(1.0, 2.0)]),
    );
}

#[test]
fn unsigned_values_widen_without_sign_extension() {
    let leaf = u8::MAX;
    assert_eq!(get_value::<i64>(&leaf).unwrap(), 255);
    assert_eq!(get_value::<u64>(&leaf).unwrap(), 255);

    let leaf = u16::MAX;
    assert_eq!(get_value::<i64>(&leaf).unwrap(), 65535);
}

#[test]
fn signed_values_widen_with_sign_extension() {
    let leaf = i8::MIN;
    assert_eq!(get_value::<i64>(&leaf).unwrap(), -128);
    // A negative value has no unsigned reading.
    assert!(get_value::<u64>(&leaf).is_err());
}

#[test]
fn narrowing_is_exact_or_rejected() {
    let mut leaf = 0_u8;
    set_value(&mut leaf, 255_i64).unwrap();
    assert_eq!(leaf, u8::MAX);

    assert!(set_value(&mut leaf, 256_i64).is_err());
    assert!(set_value(&mut leaf, -1_i64).is_err());
    assert_eq!(leaf, u8::MAX);

    let mut leaf = 0_i8;
    set_value(&mut leaf, -128_i64).unwrap();
    assert_eq!(leaf, i8::MIN);
    assert!(set_value(&mut leaf, 128_i64).is_err());
}

#[test]
fn integers_and_floats_do_not_cross() {
    let leaf = 4_i32;
    assert!(get_value::<f32>(&leaf).is_err());

    let mut leaf = 0.0_f32;
    assert!(set_value(&mut leaf, 4_i32).is_err());
}

#[test]
fn float_width_conversions_are_lossless_only() {
    let leaf = 1.5_f32;
    assert_eq!(get_value::<f64>(&leaf).unwrap(), 1.5);

    let mut leaf = 0.0_f32;
    set_value(&mut leaf, 2.5_f64).unwrap();
    assert_eq!(leaf, 2.5);
    // 0.1 has no exact f32 representation.
    assert!(set_value(&mut leaf, 0.1_f64).is_err());
}

#[test]
fn mismatches_are_never_auto_corrected() {
    let leaf = "seven".to_string();
    let err = get_value::<u32>(&leaf).unwrap_err();
    assert!(matches!(err, AccessError::TypeMismatch { .. }));

    let mut leaf = Vec2::new(1.0, 2.0);
    assert!(set_value(&mut leaf, Vec3::new(1.0, 2.0, 3.0)).is_err());
    assert_eq!(leaf, Vec2::new(1.0, 2.0));
}

// -----------------------------------------------------------------------------
// Enums

#[derive(Inspect, Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
enum BlendMode {
    Normal,
    Add = 5,
    Multiply,
}

#[test]
fn enums_route_through_their_underlying_integer() {
    let leaf = BlendMode::Add;
    assert_eq!(get_value::<u8>(&leaf).unwrap(), 5);
    assert_eq!(get_value::<i64>(&leaf).unwrap(), 5);

    let mut leaf = BlendMode::Normal;
    set_value(&mut leaf, 6_u8).unwrap();
    assert_eq!(leaf, BlendMode::Multiply);

    // Reading an integer leaf as the enum goes the other way.
    let raw = 5_u8;
    assert_eq!(get_value::<BlendMode>(&raw).unwrap(), BlendMode::Add);
}

#[test]
fn unnamed_enum_values_are_rejected() {
    let mut leaf = BlendMode::Normal;
    assert!(set_value(&mut leaf, 9_u8).is_err());
    assert_eq!(leaf, BlendMode::Normal);

    let raw = 9_u8;
    assert!(get_value::<BlendMode>(&raw).is_err());
}

#[derive(Inspect, Clone, Copy, Debug, PartialEq)]
#[repr(i16)]
enum Bias {
    Negative = -3,
    Zero = 0,
    Positive = 3,
}

#[test]
fn signed_enum_discriminants_keep_their_sign() {
    let leaf = Bias::Negative;
    assert_eq!(get_value::<i64>(&leaf).unwrap(), -3);
    assert!(get_value::<u64>(&leaf).is_err());

    let mut leaf = Bias::Zero;
    set_value(&mut leaf, -3_i64).unwrap();
    assert_eq!(leaf, Bias::Negative);
}

// -----------------------------------------------------------------------------
// Through the engine

#[derive(Inspect, Clone)]
struct Material {
    tint: Color,
    fade: Curve,
    blend: BlendMode,
}

#[test]
fn engine_marshaling_composes_with_paths() {
    let engine = Engine::new();
    let mut material = Material {
        tint: Color::WHITE,
        fade: Curve::new(vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 1.0)]),
        blend: BlendMode::Normal,
    };

    engine.set_value(&mut material, "tint.a", 0.5_f32).unwrap();
    assert_eq!(material.tint.a, 0.5);

    assert_eq!(
        engine
            .get_value::<f32>(&material, "fade.keys.Container.data[1].value")
            .unwrap(),
        1.0,
    );

    engine.set_value(&mut material, "blend", 5_u8).unwrap();
    assert_eq!(material.blend, BlendMode::Add);
    assert_eq!(engine.get_value::<u8>(&material, "blend").unwrap(), 5);
}
