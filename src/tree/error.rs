//! Errors returned by tree queries

use crate::core::model::Version;

use super::registry::Handle;

/// Why a tree query failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Not minted by this registry, or its node is gone
    #[error("invalid handle {0:?}")]
    InvalidHandle(Handle),

    /// The node was filtered out or did not exist when handles were minted
    #[error("node '{0}' is not part of the projection")]
    NotProjected(String),

    /// A projected group holds no objects
    #[error("group '{0}' has no objects")]
    EmptyGroup(String),

    /// Column index out of range
    #[error("column {0} does not exist")]
    InvalidColumn(usize),

    /// Write to anything but an object's name
    #[error("column {column} of {handle:?} is read-only")]
    ReadOnly { handle: Handle, column: usize },

    /// Queried with another document, or one whose structure changed since
    /// the projection was built
    #[error("projection built from {built} but queried with {current}")]
    Stale { built: Version, current: Version },
}
