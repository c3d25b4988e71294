//! Property tests: round-trip behavior over generated entities and
//! temporal values.

use chrono::{TimeZone, Utc};
use flatrow::prelude::*;
use flatrow::temporal::Temporal;
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq, Record, TableEntity)]
#[entity(partition_key = "pk", row_key = "rk")]
struct Scalars {
    pk: String,
    rk: String,
    flag: bool,
    small: i32,
    big: Option<i64>,
    ratio: f64,
    name: String,
    amount: Decimal,
}

fn scalars_strategy() -> impl Strategy<Value = Scalars> {
    (
        "[a-z]{1,8}",
        "[a-z0-9]{1,8}",
        any::<bool>(),
        any::<i32>(),
        proptest::option::of(any::<i64>()),
        any::<i32>(),
        "[ -~]{0,16}",
        (any::<i64>(), 0u32..10),
    )
        .prop_map(|(pk, rk, flag, small, big, ratio, name, (mantissa, scale))| Scalars {
            pk,
            rk,
            flag,
            small,
            big,
            ratio: f64::from(ratio),
            name,
            amount: Decimal::new(mantissa, scale),
        })
}

proptest! {
    #[test]
    fn scalar_entities_round_trip(entity in scalars_strategy()) {
        let codec = EntityCodec::new();

        let row = codec.encode_row(&entity).unwrap();
        let decoded: Scalars = codec.decode_row(&row).unwrap();

        prop_assert_eq!(decoded, entity);
    }

    #[test]
    fn the_bag_never_carries_identity_columns(entity in scalars_strategy()) {
        let codec = EntityCodec::new();
        let map = codec.encode(&entity).unwrap();

        prop_assert!(!map.contains_key("pk"));
        prop_assert!(!map.contains_key("rk"));
        prop_assert!(!map.contains_key(PARTITION_KEY));
        prop_assert!(!map.contains_key(ROW_KEY));
    }

    #[test]
    fn instant_canonical_text_round_trips(
        secs in 0_i64..4_102_444_800,
        nanos in 0_u32..1_000_000_000,
    ) {
        let utc = Utc.timestamp_opt(secs, nanos).unwrap();
        let registry = PatternRegistry::new();

        let text = registry.format(&Temporal::Instant(utc)).unwrap();
        let parsed = registry.parse(&text, TemporalKind::Instant).unwrap();

        prop_assert_eq!(parsed, Temporal::Instant(utc));
    }

    #[test]
    fn decimal_storage_text_is_lossless(mantissa in any::<i64>(), scale in 0_u32..15) {
        let codec = EntityCodec::new();
        let entity = Scalars {
            pk: "p".to_string(),
            rk: "r".to_string(),
            flag: false,
            small: 0,
            big: None,
            ratio: 0.0,
            name: String::new(),
            amount: Decimal::new(mantissa, scale),
        };

        let map = codec.encode(&entity).unwrap();
        let decoded: Scalars = codec.decode(&map).unwrap();

        prop_assert_eq!(decoded.amount, entity.amount);
    }
}
