//! MessagePack encoder family.

pub mod constants;
pub mod encoder;
pub mod error;
pub mod options;
pub mod util;

pub use constants::MsgPackMarker;
pub use encoder::MsgPackEncoder;
pub use error::{PackError, Path, PathSegment};
pub use options::{PackOptions, UnsupportedPolicy};
pub use util::{pack, pack_with};
