//! `MsgPackEncoder` - canonical MessagePack encoder.
//!
//! Integers always take the smallest format that holds them, floats are
//! always float64, and nested containers are walked with an explicit work
//! stack so native stack usage does not depend on input depth.

use msgpackpp_buffers::Writer;
use tracing::{debug, trace};

use super::constants::*;
use super::{PackError, PackOptions, Path, PathSegment};
use crate::{Value, ValueKind};

/// An open container whose children are still being written.
enum Frame<'a> {
    Array {
        items: &'a [Value],
        next: usize,
    },
    Map {
        pairs: &'a [(Value, Value)],
        next: usize,
        value_pending: bool,
    },
}

impl<'a> Frame<'a> {
    /// Next child in wire order: array items in turn, map pairs as key then value.
    fn next_child(&mut self) -> Option<&'a Value> {
        match self {
            Frame::Array { items, next } => {
                let items: &'a [Value] = *items;
                let item = items.get(*next)?;
                *next += 1;
                Some(item)
            }
            Frame::Map {
                pairs,
                next,
                value_pending,
            } => {
                let pairs: &'a [(Value, Value)] = *pairs;
                let (key, value) = pairs.get(*next)?;
                if *value_pending {
                    *value_pending = false;
                    *next += 1;
                    Some(value)
                } else {
                    *value_pending = true;
                    Some(key)
                }
            }
        }
    }

    /// Segment leading to the child last returned by `next_child`.
    fn segment(&self) -> PathSegment {
        match *self {
            Frame::Array { next, .. } => PathSegment::Index(next.saturating_sub(1)),
            Frame::Map {
                next,
                value_pending: true,
                ..
            } => PathSegment::MapKey(next),
            Frame::Map {
                next,
                value_pending: false,
                ..
            } => PathSegment::MapValue(next.saturating_sub(1)),
        }
    }
}

pub struct MsgPackEncoder {
    pub writer: Writer,
    max_depth: Option<usize>,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self::with_options(&PackOptions::default())
    }

    pub fn with_options(options: &PackOptions) -> Self {
        Self {
            writer: Writer::with_alloc_size(options.initial_capacity),
            max_depth: options.max_depth,
        }
    }

    /// Encodes `value` and hands back the bytes.
    ///
    /// On error nothing written during this call is kept.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, PackError> {
        self.writer.reset();
        match self.write_any(value) {
            Ok(()) => {
                let out = self.writer.flush();
                trace!(kind = %value.kind(), len = out.len(), "encoded value");
                Ok(out)
            }
            Err(err) => {
                self.writer.reset();
                debug!(%err, "encode failed");
                Err(err)
            }
        }
    }

    /// Appends `value` to the writer.
    ///
    /// A failed call may leave a partial value in the writer; [`encode`](Self::encode)
    /// discards it.
    pub fn write_any(&mut self, value: &Value) -> Result<(), PackError> {
        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut pending = Some(value);
        loop {
            if let Some(value) = pending.take() {
                if let Err(err) = self.dispatch(value, &mut stack) {
                    let prefix = stack.iter().map(Frame::segment).collect();
                    return Err(err.rooted_at(prefix));
                }
            }
            let Some(frame) = stack.last_mut() else {
                return Ok(());
            };
            match frame.next_child() {
                Some(child) => pending = Some(child),
                None => {
                    stack.pop();
                }
            }
        }
    }

    /// Writes a scalar, or the header of a container and opens a frame for
    /// its children.
    fn dispatch<'a>(
        &mut self,
        value: &'a Value,
        stack: &mut Vec<Frame<'a>>,
    ) -> Result<(), PackError> {
        match value {
            Value::Nil => self.write_null(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Int(i) => self.write_integer(*i),
            Value::Float(f) => self.write_float(*f),
            Value::Str(s) => self.write_str(s)?,
            Value::Bytes(b) => self.write_bin(b)?,
            Value::Array(items) => {
                self.check_depth(stack.len() + 1)?;
                self.write_arr_hdr(items.len())?;
                if !items.is_empty() {
                    stack.push(Frame::Array { items, next: 0 });
                }
            }
            Value::Map(pairs) => {
                self.check_depth(stack.len() + 1)?;
                self.write_obj_hdr(pairs.len())?;
                if !pairs.is_empty() {
                    stack.push(Frame::Map {
                        pairs,
                        next: 0,
                        value_pending: false,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<(), PackError> {
        match self.max_depth {
            Some(limit) if depth > limit => Err(PackError::DepthExceeded {
                limit,
                path: Path::root(),
            }),
            _ => Ok(()),
        }
    }

    pub fn write_null(&mut self) {
        self.writer.u8(MsgPackMarker::Nil as u8);
    }

    pub fn write_boolean(&mut self, b: bool) {
        let marker = if b {
            MsgPackMarker::True
        } else {
            MsgPackMarker::False
        };
        self.writer.u8(marker as u8);
    }

    /// Always float64, even when the value fits a float32 exactly.
    pub fn write_float(&mut self, float: f64) {
        self.writer.u8f64(FLOAT64, float);
    }

    /// Writes `int` in the smallest integer format that holds it.
    ///
    /// Non-negative values use the unsigned family, negative values the
    /// signed family.
    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_u_integer(int as u64);
        } else {
            self.write_n_integer(int);
        }
    }

    /// Encode a non-negative integer.
    pub fn write_u_integer(&mut self, uint: u64) {
        let writer = &mut self.writer;
        if uint <= POSITIVE_FIXINT_MAX as u64 {
            writer.u8(uint as u8);
        } else if uint <= 0xff {
            writer.u8u8(UINT8, uint as u8);
        } else if uint <= 0xffff {
            writer.u8u16(UINT16, uint as u16);
        } else if uint <= 0xffff_ffff {
            writer.u8u32(UINT32, uint as u32);
        } else {
            writer.u8u64(UINT64, uint);
        }
    }

    /// Encode a negative integer.
    fn write_n_integer(&mut self, int: i64) {
        debug_assert!(int < 0);
        let writer = &mut self.writer;
        if int >= NEGATIVE_FIXINT_MIN {
            // negative fixint: 0xe0..=0xff is the two's complement byte itself
            writer.i8(int as i8);
        } else if int >= i64::from(i8::MIN) {
            writer.u8u8(INT8, int as i8 as u8);
        } else if int >= i64::from(i16::MIN) {
            writer.u8u16(INT16, int as i16 as u16);
        } else if int >= i64::from(i32::MIN) {
            writer.u8u32(INT32, int as i32 as u32);
        } else {
            writer.u8u64(INT64, int as u64);
        }
    }

    pub fn write_str_hdr(&mut self, length: usize) -> Result<(), PackError> {
        if length <= FIXSTR_MAX_LEN {
            self.writer.u8(FIXSTR | length as u8);
        } else if length <= 0xff {
            self.writer.u8u8(STR8, length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(STR16, length as u16);
        } else if length <= MAX_LEN {
            self.writer.u8u32(STR32, length as u32);
        } else {
            return Err(overflow(ValueKind::Str, length));
        }
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), PackError> {
        self.write_str_hdr(s.len())?;
        self.writer.utf8(s);
        Ok(())
    }

    pub fn write_bin_hdr(&mut self, length: usize) -> Result<(), PackError> {
        if length <= 0xff {
            self.writer.u8u8(BIN8, length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(BIN16, length as u16);
        } else if length <= MAX_LEN {
            self.writer.u8u32(BIN32, length as u32);
        } else {
            return Err(overflow(ValueKind::Bytes, length));
        }
        Ok(())
    }

    pub fn write_bin(&mut self, buf: &[u8]) -> Result<(), PackError> {
        self.write_bin_hdr(buf.len())?;
        self.writer.buf(buf);
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<(), PackError> {
        if length <= FIXARRAY_MAX_LEN {
            self.writer.u8(FIXARRAY | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(ARRAY16, length as u16);
        } else if length <= MAX_LEN {
            self.writer.u8u32(ARRAY32, length as u32);
        } else {
            return Err(overflow(ValueKind::Array, length));
        }
        Ok(())
    }

    pub fn write_obj_hdr(&mut self, length: usize) -> Result<(), PackError> {
        if length <= FIXMAP_MAX_LEN {
            self.writer.u8(FIXMAP | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(MAP16, length as u16);
        } else if length <= MAX_LEN {
            self.writer.u8u32(MAP32, length as u32);
        } else {
            return Err(overflow(ValueKind::Map, length));
        }
        Ok(())
    }
}

fn overflow(kind: ValueKind, len: usize) -> PackError {
    PackError::ContainerOverflow {
        kind,
        len,
        path: Path::root(),
    }
}
