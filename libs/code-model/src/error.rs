//! # Code Model Errors
//!
//! Error types for tree mutation, conversion and the JSON cache format.

use crate::nodes::NodeId;
use thiserror::Error;

/// Misuse of the tree mutation API. Every check runs before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    /// Child index past the end of the children list.
    #[error("index {index} out of bounds for {node} with {len} nested elements")]
    IndexOutOfBounds { node: NodeId, index: usize, len: usize },

    /// The id does not belong to this tree.
    #[error("{0} is not a node of this tree")]
    ForeignNode(NodeId),

    /// The node variant cannot hold nested elements.
    #[error("{node} ({kind}) cannot hold nested elements")]
    LeafNode { node: NodeId, kind: &'static str },

    /// The node already has an owner.
    #[error("{0} is already nested elsewhere")]
    AlreadyNested(NodeId),

    /// The node to replace is not a direct child.
    #[error("{child} is not nested in {parent}")]
    NotNested { parent: NodeId, child: NodeId },

    /// Nesting would make a node its own ancestor.
    #[error("nesting {child} under {parent} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },

    /// A code attribute points at something that is not code.
    #[error("{node} ({kind}) is not code")]
    NotCode { node: NodeId, kind: &'static str },
}

/// Failure while converting a raw parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Code merging was asked to merge nothing. Well-formed input never does this.
    #[error("empty code range while converting `{kind}`")]
    EmptyCodeRange { kind: String },

    /// `convert_file` was handed something other than a translation unit root.
    #[error("expected a `unit` root, found `{kind}`")]
    UnexpectedRoot { kind: String },

    /// Internal tree construction failed.
    #[error(transparent)]
    Ast(#[from] AstError),
}

/// Failure while reading or writing the JSON cache format.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(serde_json::Error),

    #[error("unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("node id {0} appears more than once")]
    DuplicateId(u32),

    #[error("node {from} refers to unknown node id {target}")]
    UnresolvedReference { from: u32, target: u32 },

    #[error("node id {0} is used as code but is not a code node")]
    InvalidCode(u32),

    #[error("invalid tree structure: {0}")]
    Structure(String),
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            FormatError::Io(err.into())
        } else {
            FormatError::Json(err)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
