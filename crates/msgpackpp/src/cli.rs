//! Core logic behind the `msgpack-pack` binary: JSON in, MessagePack out.

use std::fmt::Write as _;

use thiserror::Error;

use crate::msgpack::{pack_with, PackError, PackOptions};
use crate::Value;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Pack(#[from] PackError),
}

/// Encode a JSON document to MessagePack bytes.
///
/// Object keys keep their document order.
pub fn pack_json(json: &str, options: &PackOptions) -> Result<Vec<u8>, CliError> {
    let json: serde_json::Value = serde_json::from_str(json)?;
    let value = Value::try_from(json)?;
    Ok(pack_with(&value, options)?)
}

/// Lowercase hex rendering, two digits per byte, no separators.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}
