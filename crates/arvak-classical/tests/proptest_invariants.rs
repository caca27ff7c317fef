//! Property-based tests for cast and index resolution.

use arvak_classical::{
    Angle, AngleNarrowing, IndexSpec, ScalarType, ScalarValue, cast, resolve_index,
    resolve_index_set,
};
use proptest::prelude::*;

fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// A width and an arbitrary raw bit pattern that fits it.
fn arb_word() -> impl Strategy<Value = (u32, u64)> {
    (1_u32..=64).prop_flat_map(|width| (Just(width), any::<u64>().prop_map(move |v| v & mask(width))))
}

proptest! {
    #[test]
    fn uint_int_uint_roundtrip((width, raw) in arb_word()) {
        let x = ScalarValue::uint(raw, width).unwrap();
        let through_int = cast(&x, ScalarType::Int(width)).unwrap();
        prop_assert_eq!(cast(&through_int, ScalarType::UInt(width)).unwrap(), x);
    }

    #[test]
    fn int_uint_int_roundtrip((width, raw) in arb_word()) {
        let y = cast(&ScalarValue::uint(raw, width).unwrap(), ScalarType::Int(width)).unwrap();
        let through_uint = cast(&y, ScalarType::UInt(width)).unwrap();
        prop_assert_eq!(cast(&through_uint, ScalarType::Int(width)).unwrap(), y);
    }

    #[test]
    fn angle_bit_roundtrip((width, raw) in arb_word()) {
        let a = ScalarValue::Angle(Angle::from_raw(raw, width).unwrap());
        let bits = cast(&a, ScalarType::Bit(width)).unwrap();
        prop_assert_eq!(cast(&bits, ScalarType::Angle(width)).unwrap(), a);
    }

    #[test]
    fn bool_to_float_is_zero_or_one(b in any::<bool>()) {
        let value = cast(&ScalarValue::Bool(b), ScalarType::Float(64)).unwrap();
        let expected = if b { 1.0 } else { 0.0 };
        prop_assert_eq!(value, ScalarValue::Float { value: expected, width: 64 });
    }

    #[test]
    fn negative_index_counts_from_end(length in 1_usize..1000, offset in 1_usize..1000) {
        let k = offset.min(length);
        prop_assert_eq!(resolve_index(-(k as i64), length).unwrap(), length - k);
        prop_assert!(resolve_index(-(length as i64) - 1, length).is_err());
        prop_assert!(resolve_index(length as i64, length).is_err());
    }

    #[test]
    fn ranges_stay_in_bounds(
        length in 1_usize..64,
        start in -64_i64..64,
        step in prop_oneof![-5_i64..=-1, 1_i64..=5, Just(i64::MAX), Just(i64::MIN), Just(i64::MAX - 1)],
        stop in -80_i64..80,
    ) {
        if let Ok(positions) = resolve_index_set(&IndexSpec::range(start, step, stop), length) {
            prop_assert!(positions.iter().all(|&p| p < length));
        }
    }

    #[test]
    fn angle_widening_then_narrowing_is_identity(
        (width, raw) in (1_u32..=32).prop_flat_map(|w| (Just(w), any::<u64>().prop_map(move |v| v & mask(w)))),
        extra in 1_u32..=32,
    ) {
        let a = Angle::from_raw(raw, width).unwrap();
        let wide = a.resize(width + extra, AngleNarrowing::Truncate).unwrap();
        for narrowing in [AngleNarrowing::Round, AngleNarrowing::Truncate] {
            prop_assert_eq!(wide.resize(width, narrowing).unwrap(), a);
        }
    }
}
