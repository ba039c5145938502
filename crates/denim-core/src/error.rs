//! Error types for the simulation.

use crate::types::ActorKind;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Unhandled actor variant: {0}")]
    UnhandledActor(ActorKind),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Extent of a grid region, used to report shape mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// One cell
    Cell,
    /// A single row or column of the given length
    Line(usize),
    /// A rectangle of `rows` by `cols`
    Block { rows: usize, cols: usize },
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Cell => f.write_str("1 (single cell)"),
            Extent::Line(len) => write!(f, "{}", len),
            Extent::Block { rows, cols } => write!(f, "{}x{}", rows, cols),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("could not fill a region of size {expected} with data of size {actual}")]
    Mismatch { expected: Extent, actual: Extent },

    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },

    #[error("grid dimensions must be non-negative, got {rows}x{cols}")]
    NegativeDims { rows: i64, cols: i64 },
}

/// Axis an index was resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    X,
    Y,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridAxis::X => f.write_str("x"),
            GridAxis::Y => f.write_str("y"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{axis} index {index} resolves to {resolved}, outside [{lo}, {hi})")]
pub struct IndexError {
    pub axis: GridAxis,
    pub index: isize,
    pub resolved: isize,
    pub lo: usize,
    pub hi: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_names_both_sizes() {
        let err = ShapeError::Mismatch {
            expected: Extent::Block { rows: 2, cols: 3 },
            actual: Extent::Block { rows: 3, cols: 2 },
        };
        let message = err.to_string();
        assert!(message.contains("2x3"));
        assert!(message.contains("3x2"));
    }

    #[test]
    fn test_index_error_converts() {
        let err: Error = IndexError {
            axis: GridAxis::Y,
            index: 5,
            resolved: 5,
            lo: 0,
            hi: 3,
        }
        .into();
        assert!(matches!(err, Error::Index(_)));
        assert!(err.to_string().contains("[0, 3)"));
    }
}
