//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent structural problems in graph or tree input.
/// Mount-point precondition failures are not errors: graft/prune report them
/// through their return value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("graph has no nodes: cannot determine a root")]
    EmptyGraph,

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("edge references unknown node: {from} -> {to}")]
    DanglingEdge { from: String, to: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
