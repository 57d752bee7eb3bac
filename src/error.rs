//! Error handling for codec operations
//!
//! This module re-exports the error types used throughout the crate.
//! The error enum is built with thiserror and classifies every failure into
//! configuration, corruption, stream-boundary or I/O errors.

pub use crate::common::ErrorKind;
pub use crate::common::Result;
pub use crate::common::RetroLzError;
