//! Encoder and adapter configuration.

/// What the adapter does with a host value that has no MessagePack mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Fail with [`PackError::UnsupportedType`](super::PackError::UnsupportedType).
    #[default]
    Fail,
    /// Substitute nil and log a warning. Opt-in only.
    Nil,
}

/// Options shared by [`pack_with`](super::pack_with) and
/// [`to_value_with`](crate::to_value_with).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOptions {
    /// Deepest container nesting accepted; the root container is depth 1.
    /// `None` means unbounded.
    pub max_depth: Option<usize>,
    pub unsupported: UnsupportedPolicy,
    /// Initial output buffer allocation in bytes.
    pub initial_capacity: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            unsupported: UnsupportedPolicy::Fail,
            initial_capacity: 256,
        }
    }
}

impl PackOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_unsupported(mut self, unsupported: UnsupportedPolicy) -> Self {
        self.unsupported = unsupported;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}
