//! Shared types for embedgen.
//!
//! This crate defines the resources, encoding styles, placements,
//! declarations and error types used across all pipeline stages.

mod error;
pub mod model;

pub use error::{
    Diagnostic, Diagnostics, EmbedError, ErrorCategory, ErrorCode, Severity, MAX_WARNINGS,
};
pub use model::{Declaration, EncodingStyle, OutputUnit, Placement, Resource};

/// Result type used throughout embedgen.
pub type Result<T> = std::result::Result<T, EmbedError>;
