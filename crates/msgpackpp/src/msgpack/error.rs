//! MessagePack encoder error type.

use std::fmt;

use thiserror::Error;

use crate::ValueKind;

/// One step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Array element.
    Index(usize),
    /// Key of the n-th map pair.
    MapKey(usize),
    /// Value of the n-th map pair.
    MapValue(usize),
    /// Named struct field.
    Field(&'static str),
}

/// Location of a value inside the input graph, outermost step first.
///
/// Renders as `$` for the root, e.g. `$[2]{0:value}.name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Index(i) => write!(f, "[{i}]")?,
                PathSegment::MapKey(i) => write!(f, "{{{i}:key}}")?,
                PathSegment::MapValue(i) => write!(f, "{{{i}:value}}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
            }
        }
        Ok(())
    }
}

/// Error type for packing operations.
///
/// Every variant aborts the current call; no partial output is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackError {
    #[error("unsupported type {kind} at {path}")]
    UnsupportedType { kind: String, path: Path },
    #[error("number {value} at {path} is outside the encodable range")]
    Range { value: String, path: Path },
    #[error("{kind} of length {len} at {path} exceeds the 32-bit length limit")]
    ContainerOverflow {
        kind: ValueKind,
        len: usize,
        path: Path,
    },
    #[error("nesting depth limit {limit} exceeded at {path}")]
    DepthExceeded { limit: usize, path: Path },
    #[error("{0}")]
    Custom(String),
}

impl PackError {
    /// Location of the offending value. [`PackError::Custom`] has none.
    pub fn path(&self) -> Path {
        match self {
            PackError::UnsupportedType { path, .. }
            | PackError::Range { path, .. }
            | PackError::ContainerOverflow { path, .. }
            | PackError::DepthExceeded { path, .. } => path.clone(),
            PackError::Custom(_) => Path::root(),
        }
    }

    fn path_mut(&mut self) -> Option<&mut Path> {
        match self {
            PackError::UnsupportedType { path, .. }
            | PackError::Range { path, .. }
            | PackError::ContainerOverflow { path, .. }
            | PackError::DepthExceeded { path, .. } => Some(path),
            PackError::Custom(_) => None,
        }
    }

    /// Re-roots the error one level up, below `segment` of the parent.
    pub fn within(mut self, segment: PathSegment) -> Self {
        if let Some(path) = self.path_mut() {
            path.prepend(segment);
        }
        self
    }

    /// Places the error's path below `prefix`, given outermost segment first.
    pub(crate) fn rooted_at(mut self, mut prefix: Vec<PathSegment>) -> Self {
        if let Some(path) = self.path_mut() {
            prefix.append(&mut path.0);
            path.0 = prefix;
        }
        self
    }

    pub(crate) fn at_index(self, index: usize) -> Self {
        self.within(PathSegment::Index(index))
    }

    pub(crate) fn at_map_key(self, index: usize) -> Self {
        self.within(PathSegment::MapKey(index))
    }

    pub(crate) fn at_map_value(self, index: usize) -> Self {
        self.within(PathSegment::MapValue(index))
    }
}

impl serde::ser::Error for PackError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        PackError::Custom(msg.to_string())
    }
}
