//! Error enum and result alias.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for optreport operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error while assembling the .xlsx package
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// The spreadsheet builder was called with no records
    #[error("refusing to build a spreadsheet from an empty record sequence")]
    EmptyRecords,

    /// The batch input folder does not exist
    #[error("input folder does not exist: {}", .0.display())]
    InputDirMissing(PathBuf),

    /// The finished temporary file could not be moved over the destination
    #[error("failed to persist output file: {0}")]
    Persist(String),
}

/// Result type for optreport operations.
pub type Result<T> = std::result::Result<T, Error>;
