//! Error types for maze construction, decoding and search.

use std::io;

use thiserror::Error;

use crate::grid::Point;

/// Errors raised while assembling a [`crate::Grid`] from raw cell data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("maze must contain at least one cell")]
    Empty,

    #[error("maze row {row} has {found} column(s), expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("maze has {found} row(s), declared {expected}")]
    RowCountMismatch { found: usize, expected: usize },
}

/// Errors raised while decoding the textual maze description.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("input ended after {found} line(s); expected a size line, the maze rows and an endpoint line")]
    TooShort { found: usize },

    #[error("size line {line:?} must be two non-negative integers")]
    BadSizeLine { line: String },

    #[error("maze row {row} is missing from the input")]
    MissingRow { row: usize },

    #[error("maze row {row} must be exactly {expected} non-negative integers")]
    BadRow { row: usize, expected: usize },

    #[error("endpoint line {line:?} must be four non-negative integers")]
    BadEndpoints { line: String },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Errors raised by path search and reconstruction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("{0} lies outside the maze")]
    OutOfBounds(Point),

    #[error("endpoint {0} is a wall")]
    BlockedEndpoint(Point),

    #[error("no route from {start} to {goal}")]
    NoRoute { start: Point, goal: Point },

    /// Backtracking hit a node with no recorded predecessor before reaching
    /// the start. Indicates a defect in the search itself, never normal input.
    #[error("route backtracking hit a node that was never reached")]
    BrokenTrail,
}
