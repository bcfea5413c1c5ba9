//! Package writer for OPC packages.
//!
//! This module serializes a [`Package`] to a ZIP archive, writing the
//! `[Content_Types].xml`, the package relationships and every part with its
//! own relationships.

use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::rel::Relationships;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A part of an OPC package.
#[derive(Debug, Clone)]
pub struct Part {
    /// Absolute part name, e.g. `/xl/workbook.xml`
    partname: String,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl Part {
    pub fn new(partname: impl Into<String>, content_type: &str, blob: Vec<u8>) -> Self {
        Self {
            partname: partname.into(),
            content_type: content_type.to_string(),
            blob,
            rels: Relationships::new(),
        }
    }

    /// Attach the relationships whose source is this part.
    pub fn with_rels(mut self, rels: Relationships) -> Self {
        self.rels = rels;
        self
    }

    #[inline]
    pub fn partname(&self) -> &str {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// ZIP member name: the part name without its leading slash.
    #[inline]
    pub fn membername(&self) -> &str {
        self.partname.trim_start_matches('/')
    }

    /// ZIP member name of this part's `.rels` part.
    ///
    /// `/xl/workbook.xml` maps to `xl/_rels/workbook.xml.rels`.
    pub fn rels_membername(&self) -> String {
        let member = self.membername();
        match member.rfind('/') {
            Some(slash) => format!("{}/_rels/{}.rels", &member[..slash], &member[slash + 1..]),
            None => format!("_rels/{}.rels", member),
        }
    }
}

/// An in-memory OPC package.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
    rels: Relationships,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Add a package-level relationship (stored in `_rels/.rels`).
    pub fn relate_to(&mut self, target: &str, reltype: &str) -> String {
        self.rels.relate_to(target, reltype)
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }
}

/// Package writer that serializes an OPC package to a ZIP file.
pub struct PackageWriter;

impl PackageWriter {
    /// Write an OPC package to a file.
    ///
    /// The archive is assembled in memory and written to a temporary file
    /// next to `path`, which is then renamed over `path`. Either the complete
    /// package ends up at `path` or nothing does.
    pub fn write<P: AsRef<Path>>(path: P, package: &Package) -> Result<()> {
        let path = path.as_ref();
        let bytes = Self::to_bytes(package)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::Builder::new()
            .prefix(".optreport-")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        Ok(())
    }

    /// Serialize an OPC package to bytes.
    pub fn to_bytes(package: &Package) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // Write [Content_Types].xml
        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(Self::content_types_xml(package).as_bytes())?;

        // Write package-level relationships (_rels/.rels)
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(package.rels().to_xml().as_bytes())?;

        // Write all parts and their relationships
        for part in package.parts() {
            zip.start_file(part.membername(), options)?;
            zip.write_all(part.blob())?;

            if !part.rels().is_empty() {
                zip.start_file(part.rels_membername(), options)?;
                zip.write_all(part.rels().to_xml().as_bytes())?;
            }
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Generate the XML for `[Content_Types].xml`.
    ///
    /// `rels` and `xml` get Default entries; every part gets an Override.
    fn content_types_xml(package: &Package) -> String {
        let overrides: BTreeMap<&str, &str> = package
            .parts()
            .iter()
            .map(|part| (part.partname(), part.content_type()))
            .collect();

        let mut xml = String::with_capacity(512 + overrides.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push_str(&format!(
            r#"<Default Extension="rels" ContentType="{}"/>"#,
            ct::OPC_RELATIONSHIPS
        ));
        xml.push_str(&format!(r#"<Default Extension="xml" ContentType="{}"/>"#, ct::XML));

        for (partname, content_type) in overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}
