//! Errors raised by the landmark geometry operations.

use std::fmt;

use thiserror::Error;

/// What kind of index was out of range in [`GeometryError::IndexOutOfRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Index of a detected hand in a detection result.
    Hand,
    /// Landmark identifier (0 to 20).
    Landmark,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Hand => f.write_str("hand"),
            IndexKind::Landmark => f.write_str("landmark"),
        }
    }
}

/// Caller-input errors of the geometry operations.
///
/// A frame without any detected hand is *not* an error; extraction returns an empty
/// [`HandPosition`][crate::hand::geometry::HandPosition] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The operation needs the landmarks of a hand, but the last extraction produced none (or
    /// there was no extraction or detection at all).
    #[error("`{operation}` requires landmarks from a preceding non-empty extraction")]
    StalePrecondition { operation: &'static str },

    /// A hand index or landmark identifier does not exist in the current data.
    #[error("{kind} index {index} is out of range (valid range is 0..{len})")]
    IndexOutOfRange {
        kind: IndexKind,
        index: usize,
        len: usize,
    },
}

impl GeometryError {
    pub(crate) fn stale(operation: &'static str) -> Self {
        Self::StalePrecondition { operation }
    }

    pub(crate) fn hand_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            kind: IndexKind::Hand,
            index,
            len,
        }
    }

    pub(crate) fn landmark_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            kind: IndexKind::Landmark,
            index,
            len,
        }
    }

    /// Returns `true` if this is an [`GeometryError::IndexOutOfRange`] error.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Returns `true` if this is a [`GeometryError::StalePrecondition`] error.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StalePrecondition { .. })
    }
}
