//! Core types and utilities for the Denim grid evolution simulator.

pub mod types;
pub mod config;
pub mod error;
pub mod ids;

pub use error::{Error, Extent, GridAxis, IndexError, Result, ShapeError};
pub use types::*;
pub use config::*;
pub use ids::{IdAllocator, SequentialIds};
