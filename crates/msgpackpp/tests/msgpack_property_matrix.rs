use msgpackpp::{pack, Value};
use proptest::prelude::*;

/// Size of the smallest integer format per the canonical priority table.
fn canonical_int_len(i: i64) -> usize {
    match i {
        0..=127 | -32..=-1 => 1,
        128..=255 | -128..=-33 => 2,
        256..=65_535 | -32_768..=-129 => 3,
        65_536..=4_294_967_295 | -2_147_483_648..=-32_769 => 5,
        _ => 9,
    }
}

fn header_len(n: usize, fix_max: usize) -> usize {
    if n <= fix_max {
        1
    } else if n <= 0xffff {
        3
    } else {
        5
    }
}

/// str and bin headers have an 8-bit length form; only str has a fix form.
fn sized_header_len(n: usize, has_fix: bool) -> usize {
    if has_fix && n <= 31 {
        1
    } else if n <= 0xff {
        2
    } else if n <= 0xffff {
        3
    } else {
        5
    }
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-300i64..300).prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        ".{0,40}".prop_map(Value::Str),
        proptest::collection::vec(any::<u8>(), 0..40).prop_map(Value::Bytes),
    ];
    leaf.prop_recursive(4, 64, 20, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..20).prop_map(Value::Array),
            proptest::collection::vec((inner.clone(), inner), 0..20).prop_map(Value::Map),
        ]
    })
}

/// Expected encoded size computed independently of the encoder.
fn expected_len(value: &Value) -> usize {
    match value {
        Value::Nil | Value::Bool(_) => 1,
        Value::Int(i) => canonical_int_len(*i),
        Value::Float(_) => 9,
        Value::Str(s) => sized_header_len(s.len(), true) + s.len(),
        Value::Bytes(b) => sized_header_len(b.len(), false) + b.len(),
        Value::Array(items) => {
            header_len(items.len(), 15) + items.iter().map(expected_len).sum::<usize>()
        }
        Value::Map(pairs) => {
            header_len(pairs.len(), 15)
                + pairs
                    .iter()
                    .map(|(k, v)| expected_len(k) + expected_len(v))
                    .sum::<usize>()
        }
    }
}

proptest! {
    #[test]
    fn integers_use_minimal_format(i in any::<i64>()) {
        let out = pack(&Value::Int(i)).unwrap();
        prop_assert_eq!(out.len(), canonical_int_len(i));
        let tag = out[0];
        let decoded = match tag {
            0x00..=0x7f => i64::from(tag),
            0xe0..=0xff => i64::from(tag as i8),
            0xcc => i64::from(out[1]),
            0xcd => i64::from(u16::from_be_bytes([out[1], out[2]])),
            0xce => i64::from(u32::from_be_bytes(out[1..5].try_into().unwrap())),
            0xcf => u64::from_be_bytes(out[1..9].try_into().unwrap()) as i64,
            0xd0 => i64::from(out[1] as i8),
            0xd1 => i64::from(i16::from_be_bytes([out[1], out[2]])),
            0xd2 => i64::from(i32::from_be_bytes(out[1..5].try_into().unwrap())),
            0xd3 => i64::from_be_bytes(out[1..9].try_into().unwrap()),
            other => return Err(TestCaseError::fail(format!("unexpected tag {other:#04x}"))),
        };
        prop_assert_eq!(decoded, i);
        if i >= 0 {
            prop_assert!(!(0xd0..=0xd3).contains(&tag), "signed format for {}", i);
        }
    }

    #[test]
    fn floats_are_float64_bit_exact(f in any::<f64>()) {
        let out = pack(&Value::Float(f)).unwrap();
        prop_assert_eq!(out[0], 0xcb);
        prop_assert_eq!(&out[1..], &f.to_bits().to_be_bytes()[..]);
    }

    #[test]
    fn encoded_length_matches_headers_and_elements(value in arb_value()) {
        let out = pack(&value).unwrap();
        prop_assert_eq!(out.len(), expected_len(&value));
    }

    #[test]
    fn packing_is_deterministic(value in arb_value()) {
        let first = pack(&value).unwrap();
        let second = pack(&value.clone()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn array_header_carries_element_count(items in proptest::collection::vec(any::<i64>(), 0..40)) {
        let out = pack(&Value::Array(items.iter().copied().map(Value::Int).collect())).unwrap();
        let count = if items.len() <= 15 {
            prop_assert_eq!(out[0] & 0xf0, 0x90);
            usize::from(out[0] & 0x0f)
        } else {
            prop_assert_eq!(out[0], 0xdc);
            usize::from(u16::from_be_bytes([out[1], out[2]]))
        };
        prop_assert_eq!(count, items.len());
    }
}
