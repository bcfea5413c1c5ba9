//! Open Packaging Conventions (OPC) writing support.
//!
//! An OPC package is a ZIP archive of parts plus `[Content_Types].xml` and
//! relationship (`.rels`) parts tying them together. This module assembles
//! packages in memory and writes them to disk atomically.

pub mod constants;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use pkgwriter::{Package, PackageWriter, Part};
pub use rel::{Relationship, Relationships};
