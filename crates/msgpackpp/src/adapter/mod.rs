//! Host adapter: maps Rust values into [`Value`] before packing.
//!
//! Out-of-range numbers are rejected here with [`PackError::Range`] and
//! unmappable kinds go through the configured [`UnsupportedPolicy`]
//! (see [`PackOptions::unsupported`]). Nesting is bounded while the value
//! is built, by `max_depth` or [`ADAPTER_MAX_DEPTH`].
//!
//! [`UnsupportedPolicy`]: crate::UnsupportedPolicy

mod serializer;

use serde::Serialize;

use crate::msgpack::{pack_with, PackError, PackOptions};
use crate::Value;

pub use serializer::{ValueSerializer, ADAPTER_MAX_DEPTH};

/// Maps `value` into a [`Value`] with default options.
pub fn to_value<T>(value: &T) -> Result<Value, PackError>
where
    T: ?Sized + Serialize,
{
    to_value_with(value, &PackOptions::default())
}

pub fn to_value_with<T>(value: &T, options: &PackOptions) -> Result<Value, PackError>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer::new(options))
}

/// Maps `value` into a [`Value`] and packs it.
///
/// ```
/// let bytes = msgpackpp::to_vec(&(1u8, "a")).unwrap();
/// assert_eq!(bytes, [0x92, 0x01, 0xa1, b'a']);
/// ```
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>, PackError>
where
    T: ?Sized + Serialize,
{
    to_vec_with(value, &PackOptions::default())
}

pub fn to_vec_with<T>(value: &T, options: &PackOptions) -> Result<Vec<u8>, PackError>
where
    T: ?Sized + Serialize,
{
    let value = to_value_with(value, options)?;
    pack_with(&value, options)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgpack::{Path, PathSegment, UnsupportedPolicy};
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: Option<f32>,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(u32),
        Rect { w: u32, h: u32 },
        Pair(u8, u8),
    }

    #[derive(Serialize)]
    struct Scene {
        name: &'static str,
        shapes: Vec<Shape>,
    }

    struct Blob(&'static [u8]);

    /// A sequence nested `n` levels deep, produced lazily.
    struct Deep(usize);

    impl Serialize for Deep {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            use serde::ser::SerializeSeq;

            let mut seq = serializer.serialize_seq(Some(1))?;
            if self.0 > 1 {
                seq.serialize_element(&Deep(self.0 - 1))?;
            }
            seq.end()
        }
    }

    impl Serialize for Blob {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.0)
        }
    }

    #[test]
    fn struct_maps_to_ordered_str_keys() {
        let value = to_value(&Point { x: -3, y: None }).unwrap();
        assert_eq!(
            value,
            Value::Map(vec![
                (Value::from("x"), Value::Int(-3)),
                (Value::from("y"), Value::Nil),
            ])
        );
    }

    #[test]
    fn scalars_and_sequences() {
        assert_eq!(to_value(&'é').unwrap(), Value::from("é"));
        assert_eq!(to_value(&()).unwrap(), Value::Nil);
        assert_eq!(to_value(&1.5f32).unwrap(), Value::Float(1.5));
        assert_eq!(to_value(&Blob(b"\x00\x01")).unwrap(), Value::Bytes(vec![0, 1]));
        assert_eq!(
            to_value(&(true, [1u16, 2])).unwrap(),
            Value::Array(vec![
                Value::Bool(true),
                Value::Array(vec![Value::Int(1), Value::Int(2)]),
            ])
        );
        assert_eq!(to_value(&Shape::Empty).unwrap(), Value::from("Empty"));
    }

    #[test]
    fn non_string_map_keys() {
        let map: BTreeMap<i32, bool> = [(1, false), (0, true)].into_iter().collect();
        assert_eq!(
            to_value(&map).unwrap(),
            Value::Map(vec![
                (Value::Int(0), Value::Bool(true)),
                (Value::Int(1), Value::Bool(false)),
            ])
        );
    }

    #[test]
    fn wide_integers() {
        assert_eq!(to_value(&(i64::MAX as u64)).unwrap(), Value::Int(i64::MAX));
        assert_eq!(to_value(&-5i128).unwrap(), Value::Int(-5));
        assert_eq!(
            to_value(&u64::MAX).unwrap_err(),
            PackError::Range {
                value: u64::MAX.to_string(),
                path: Path::root(),
            }
        );
        assert!(matches!(
            to_value(&(i128::from(i64::MIN) - 1)).unwrap_err(),
            PackError::Range { .. }
        ));
        let err = to_value(&vec![0u128, u128::MAX]).unwrap_err();
        assert_eq!(err.path(), Path::from(vec![PathSegment::Index(1)]));
    }

    #[test]
    fn data_variants_are_unsupported() {
        let scene = Scene {
            name: "s",
            shapes: vec![Shape::Empty, Shape::Rect { w: 1, h: 2 }],
        };
        let err = to_value(&scene).unwrap_err();
        assert_eq!(
            err,
            PackError::UnsupportedType {
                kind: "struct variant Shape::Rect".into(),
                path: Path::from(vec![PathSegment::Field("shapes"), PathSegment::Index(1)]),
            }
        );
        assert_eq!(err.to_string(), "unsupported type struct variant Shape::Rect at $.shapes[1]");

        assert!(matches!(
            to_value(&Shape::Circle(1)).unwrap_err(),
            PackError::UnsupportedType { ref kind, .. } if kind == "newtype variant Shape::Circle"
        ));
        assert!(matches!(
            to_value(&Shape::Pair(1, 2)).unwrap_err(),
            PackError::UnsupportedType { ref kind, .. } if kind == "tuple variant Shape::Pair"
        ));
    }

    #[test]
    fn nil_policy_substitutes_nil() {
        let options = PackOptions::default().with_unsupported(UnsupportedPolicy::Nil);
        let shapes = vec![
            Shape::Circle(1),
            Shape::Rect { w: 1, h: 2 },
            Shape::Pair(1, 2),
            Shape::Empty,
        ];
        assert_eq!(
            to_value_with(&shapes, &options).unwrap(),
            Value::Array(vec![Value::Nil, Value::Nil, Value::Nil, Value::from("Empty")])
        );
        assert_eq!(
            to_vec_with(&Shape::Circle(9), &options).unwrap(),
            [0xc0]
        );
    }

    #[test]
    fn nil_policy_does_not_hide_range_errors() {
        let options = PackOptions::default().with_unsupported(UnsupportedPolicy::Nil);
        assert!(matches!(
            to_value_with(&u64::MAX, &options),
            Err(PackError::Range { .. })
        ));
    }

    #[test]
    fn value_serializes_to_itself() {
        let value = Value::Map(vec![
            (Value::Int(1), Value::Bytes(vec![1, 2])),
            (Value::from("k"), Value::Array(vec![Value::Float(0.25), Value::Nil])),
        ]);
        assert_eq!(to_value(&value).unwrap(), value);
    }

    #[test]
    fn to_vec_applies_depth_limit() {
        let options = PackOptions::default().with_max_depth(1);
        let err = to_vec_with(&vec![vec![1u8]], &options).unwrap_err();
        assert_eq!(
            err,
            PackError::DepthExceeded {
                limit: 1,
                path: Path::from(vec![PathSegment::Index(0)]),
            }
        );
    }

    #[test]
    fn deep_input_stops_at_depth_limit() {
        let options = PackOptions::default().with_max_depth(8);
        let err = to_vec_with(&Deep(1_000_000), &options).unwrap_err();
        assert_eq!(
            err,
            PackError::DepthExceeded {
                limit: 8,
                path: Path::from(vec![PathSegment::Index(0); 8]),
            }
        );
        assert_eq!(to_vec_with(&Deep(8), &options).unwrap().len(), 8);
    }

    #[test]
    fn deep_input_is_bounded_without_a_limit() {
        let err = to_vec(&Deep(1_000_000)).unwrap_err();
        assert!(matches!(
            err,
            PackError::DepthExceeded { limit: ADAPTER_MAX_DEPTH, .. }
        ));
        assert_eq!(err.path().segments().len(), ADAPTER_MAX_DEPTH);
        assert!(to_value(&Deep(ADAPTER_MAX_DEPTH)).is_ok());
    }

    #[test]
    fn struct_and_map_depth_count_like_arrays() {
        let options = PackOptions::default().with_max_depth(1);
        let nested: BTreeMap<&str, Point> = [("p", Point { x: 1, y: None })].into_iter().collect();
        assert_eq!(
            to_value_with(&nested, &options).unwrap_err(),
            PackError::DepthExceeded {
                limit: 1,
                path: Path::from(vec![PathSegment::MapValue(0)]),
            }
        );
        assert!(to_value_with(&Point { x: 1, y: None }, &options).is_ok());
    }
}
