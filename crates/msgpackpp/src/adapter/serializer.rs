//! `serde::Serializer` that builds a [`Value`].

use serde::ser::{self, Serialize};
use tracing::warn;

use crate::msgpack::{PackError, PackOptions, Path, PathSegment, UnsupportedPolicy};
use crate::Value;

/// Nesting limit the adapter applies when [`PackOptions::max_depth`] is unset.
///
/// Serde drives serialization through native recursion, so unlike the
/// encoder the adapter always needs a bound.
pub const ADAPTER_MAX_DEPTH: usize = 256;

/// Maps any `Serialize` type into a [`Value`].
///
/// Enum variants carrying data have no MessagePack mapping and go through
/// the configured [`UnsupportedPolicy`]. Containers nested deeper than
/// `max_depth` (or [`ADAPTER_MAX_DEPTH`] when unset) fail with
/// [`PackError::DepthExceeded`] before their contents are visited.
#[derive(Clone, Copy)]
pub struct ValueSerializer<'o> {
    options: &'o PackOptions,
    /// Containers enclosing the value being serialized.
    depth: usize,
}

impl<'o> ValueSerializer<'o> {
    pub fn new(options: &'o PackOptions) -> Self {
        Self { options, depth: 0 }
    }

    fn nested(options: &'o PackOptions, depth: usize) -> Self {
        Self { options, depth }
    }

    /// Depth of a container opened here; the root container is depth 1.
    fn open_container(self) -> Result<usize, PackError> {
        let depth = self.depth + 1;
        let limit = self.options.max_depth.unwrap_or(ADAPTER_MAX_DEPTH);
        if depth > limit {
            return Err(PackError::DepthExceeded {
                limit,
                path: Path::root(),
            });
        }
        Ok(depth)
    }

    fn unsupported(self, kind: String) -> Result<Value, PackError> {
        match self.options.unsupported {
            UnsupportedPolicy::Fail => Err(PackError::UnsupportedType {
                kind,
                path: Path::root(),
            }),
            UnsupportedPolicy::Nil => {
                warn!(%kind, "no MessagePack mapping, substituting nil");
                Ok(Value::Nil)
            }
        }
    }
}

fn range<T: ToString>(value: T) -> PackError {
    PackError::Range {
        value: value.to_string(),
        path: Path::root(),
    }
}

impl<'o> ser::Serializer for ValueSerializer<'o> {
    type Ok = Value;
    type Error = PackError;

    type SerializeSeq = SerializeVec<'o>;
    type SerializeTuple = SerializeVec<'o>;
    type SerializeTupleStruct = SerializeVec<'o>;
    type SerializeTupleVariant = SkipVariant;
    type SerializeMap = SerializeMap<'o>;
    type SerializeStruct = SerializeStruct<'o>;
    type SerializeStructVariant = SkipVariant;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<Value, PackError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, PackError> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, PackError> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, PackError> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, PackError> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, PackError> {
        i64::try_from(v).map(Value::Int).map_err(|_| range(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, PackError> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, PackError> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, PackError> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, PackError> {
        i64::try_from(v).map(Value::Int).map_err(|_| range(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, PackError> {
        i64::try_from(v).map(Value::Int).map_err(|_| range(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, PackError> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, PackError> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, PackError> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, PackError> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, PackError> {
        Ok(Value::from(v))
    }

    fn serialize_none(self) -> Result<Value, PackError> {
        Ok(Value::Nil)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, PackError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, PackError> {
        Ok(Value::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, PackError> {
        Ok(Value::Nil)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, PackError> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value, PackError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Value, PackError>
    where
        T: ?Sized + Serialize,
    {
        self.unsupported(format!("newtype variant {name}::{variant}"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec<'o>, PackError> {
        let depth = self.open_container()?;
        Ok(SerializeVec {
            options: self.options,
            depth,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec<'o>, PackError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec<'o>, PackError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SkipVariant, PackError> {
        self.unsupported(format!("tuple variant {name}::{variant}"))
            .map(|_| SkipVariant)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap<'o>, PackError> {
        let depth = self.open_container()?;
        Ok(SerializeMap {
            options: self.options,
            depth,
            pairs: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeStruct<'o>, PackError> {
        let depth = self.open_container()?;
        Ok(SerializeStruct {
            options: self.options,
            depth,
            pairs: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SkipVariant, PackError> {
        self.unsupported(format!("struct variant {name}::{variant}"))
            .map(|_| SkipVariant)
    }
}

pub struct SerializeVec<'o> {
    options: &'o PackOptions,
    depth: usize,
    items: Vec<Value>,
}

impl SerializeVec<'_> {
    fn push<T>(&mut self, value: &T) -> Result<(), PackError>
    where
        T: ?Sized + Serialize,
    {
        let index = self.items.len();
        let item = value
            .serialize(ValueSerializer::nested(self.options, self.depth))
            .map_err(|e| e.at_index(index))?;
        self.items.push(item);
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeVec<'_> {
    type Ok = Value;
    type Error = PackError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), PackError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, PackError> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec<'_> {
    type Ok = Value;
    type Error = PackError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), PackError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, PackError> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTupleStruct for SerializeVec<'_> {
    type Ok = Value;
    type Error = PackError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), PackError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, PackError> {
        Ok(Value::Array(self.items))
    }
}

pub struct SerializeMap<'o> {
    options: &'o PackOptions,
    depth: usize,
    pairs: Vec<(Value, Value)>,
    pending_key: Option<Value>,
}

impl ser::SerializeMap for SerializeMap<'_> {
    type Ok = Value;
    type Error = PackError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), PackError>
    where
        T: ?Sized + Serialize,
    {
        let index = self.pairs.len();
        let key = key
            .serialize(ValueSerializer::nested(self.options, self.depth))
            .map_err(|e| e.at_map_key(index))?;
        self.pending_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), PackError>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| PackError::Custom("map value serialized before its key".into()))?;
        let index = self.pairs.len();
        let value = value
            .serialize(ValueSerializer::nested(self.options, self.depth))
            .map_err(|e| e.at_map_value(index))?;
        self.pairs.push((key, value));
        Ok(())
    }

    fn end(self) -> Result<Value, PackError> {
        Ok(Value::Map(self.pairs))
    }
}

pub struct SerializeStruct<'o> {
    options: &'o PackOptions,
    depth: usize,
    pairs: Vec<(Value, Value)>,
}

impl ser::SerializeStruct for SerializeStruct<'_> {
    type Ok = Value;
    type Error = PackError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), PackError>
    where
        T: ?Sized + Serialize,
    {
        let value = value
            .serialize(ValueSerializer::nested(self.options, self.depth))
            .map_err(|e| e.within(PathSegment::Field(key)))?;
        self.pairs.push((Value::from(key), value));
        Ok(())
    }

    fn end(self) -> Result<Value, PackError> {
        Ok(Value::Map(self.pairs))
    }
}

/// Swallows the fields of a variant that was replaced by nil.
pub struct SkipVariant;

impl ser::SerializeTupleVariant for SkipVariant {
    type Ok = Value;
    type Error = PackError;

    fn serialize_field<T>(&mut self, _value: &T) -> Result<(), PackError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<Value, PackError> {
        Ok(Value::Nil)
    }
}

impl ser::SerializeStructVariant for SkipVariant {
    type Ok = Value;
    type Error = PackError;

    fn serialize_field<T>(&mut self, _key: &'static str, _value: &T) -> Result<(), PackError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<Value, PackError> {
        Ok(Value::Nil)
    }
}
