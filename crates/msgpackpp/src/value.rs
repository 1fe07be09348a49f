//! [`Value`] - the closed set of kinds the encoder accepts.

use std::fmt;

use crate::msgpack::PackError;
use crate::msgpack::Path;

/// A value ready to be packed.
///
/// The set of kinds is closed: host values are mapped into it by the adapter
/// layer ([`crate::to_value`], `TryFrom<serde_json::Value>`), which is also
/// where unmappable kinds are rejected.
///
/// Dropping a value never recurses, so arbitrarily deep values are safe to
/// build, pack and drop. The derived `Clone`, `PartialEq` and `Debug` do
/// recurse.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// MessagePack nil
    #[default]
    Nil,
    /// Boolean value
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// IEEE-754 double
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered sequence
    Array(Vec<Value>),
    /// Ordered key-value pairs. Keys are not deduplicated.
    Map(Vec<(Value, Value)>),
}

/// Kind tag of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Array,
    Map,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::Bytes => "bytes",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Map(_))
    }

    fn has_nested_containers(&self) -> bool {
        match self {
            Value::Array(items) => items.iter().any(Value::is_container),
            Value::Map(pairs) => pairs
                .iter()
                .any(|(k, v)| k.is_container() || v.is_container()),
            _ => false,
        }
    }

    /// Moves the children of a container onto `out`, leaving it empty.
    fn take_children(&mut self, out: &mut Vec<Value>) {
        match self {
            Value::Array(items) => out.append(items),
            Value::Map(pairs) => out.extend(pairs.drain(..).flat_map(|(k, v)| [k, v])),
            _ => {}
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        if !self.has_nested_containers() {
            return;
        }
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut value) = pending.pop() {
            value.take_children(&mut pending);
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl TryFrom<u64> for Value {
    type Error = PackError;

    fn try_from(v: u64) -> Result<Self, Self::Error> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| PackError::Range {
                value: v.to_string(),
                path: Path::root(),
            })
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(v: Vec<(Value, Value)>) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = PackError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    // Positive and above i64::MAX.
                    return Value::try_from(u);
                } else {
                    match n.as_f64() {
                        Some(f) => Value::Float(f),
                        None => {
                            return Err(PackError::Range {
                                value: n.to_string(),
                                path: Path::root(),
                            })
                        }
                    }
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => Value::Array(
                arr.into_iter()
                    .enumerate()
                    .map(|(i, item)| Value::try_from(item).map_err(|e| e.at_index(i)))
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .enumerate()
                    .map(|(i, (k, v))| {
                        Value::try_from(v)
                            .map(|v| (Value::Str(k), v))
                            .map_err(|e| e.at_map_value(i))
                    })
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}
