//! One-shot packing helpers.

use crate::Value;

use super::{MsgPackEncoder, PackError, PackOptions};

/// Encodes `value` with default options.
///
/// ```
/// use msgpackpp::{pack, Value};
///
/// assert_eq!(pack(&Value::Int(128)).unwrap(), [0xcc, 0x80]);
/// ```
pub fn pack(value: &Value) -> Result<Vec<u8>, PackError> {
    pack_with(value, &PackOptions::default())
}

/// Encodes `value` with the given options.
pub fn pack_with(value: &Value, options: &PackOptions) -> Result<Vec<u8>, PackError> {
    MsgPackEncoder::with_options(options).encode(value)
}
