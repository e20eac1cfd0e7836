//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Errors raised by the association-list maps.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("delimiter must not be empty")]
    EmptyDelimiter,

    #[error("delimiter {delim:?} contains '{reserved}', which escaped text may contain")]
    ReservedDelimiter { delim: String, reserved: char },

    #[error("unterminated placeholder starting at byte {position}")]
    UnterminatedPlaceholder { position: usize },

    #[error("invalid placeholder: {{{placeholder}}}")]
    InvalidPlaceholder { placeholder: String },

    #[error("placeholder {{{index}}} out of range: {len} argument(s) given")]
    PlaceholderOutOfRange { index: usize, len: usize },
}

/// Result type for map operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors raised by tree linkage and navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("child index {index} out of range: node has {len} child(ren)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("adding {child} under {parent} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },

    #[error("invalid outline at line {line}: {reason}")]
    InvalidOutline { line: usize, reason: String },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
