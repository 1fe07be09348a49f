//! msgpackpp - canonical MessagePack encoder.
//!
//! Values are built as a [`Value`] (directly, through [`to_value`] from any
//! `serde::Serialize` type, or from a `serde_json::Value`) and encoded with
//! [`pack`]. Integers always use the smallest format that can hold them,
//! floats are always float64, and arrays and maps keep producer order.
//!
//! ```
//! use msgpackpp::{pack, Value};
//!
//! let value = Value::Map(vec![(Value::Int(0), Value::Int(0))]);
//! assert_eq!(pack(&value).unwrap(), [0x81, 0x00, 0x00]);
//! ```
//!
//! Maps are encoded in the order the producer supplies their pairs. Building
//! a map from an unordered collection such as `HashMap` makes the output
//! order vary between runs; use ordered pairs when byte-stable output
//! matters.

mod value;

pub mod adapter;
pub mod cli;
pub mod msgpack;

pub use adapter::{
    to_value, to_value_with, to_vec, to_vec_with, ValueSerializer, ADAPTER_MAX_DEPTH,
};
pub use msgpack::{
    pack, pack_with, MsgPackEncoder, PackError, PackOptions, Path, PathSegment,
    UnsupportedPolicy,
};
pub use value::{Value, ValueKind};
