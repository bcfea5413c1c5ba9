//! Unified error types for optreport.
//!
//! Only I/O-class failures are represented here. Malformed report data is
//! never an error: it surfaces as [`crate::report::ExtractWarning`] values.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
