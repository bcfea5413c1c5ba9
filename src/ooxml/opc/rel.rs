//! Relationship collections (`.rels` parts).

use crate::common::xml::escape_xml;

/// A single internal relationship from a source part to a target part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    target: String,
}

impl Relationship {
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Ordered collection of relationships with sequential `rIdN` identifiers.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship to `target` and return its new rId.
    ///
    /// `target` is relative to the source part (e.g. `"worksheets/sheet1.xml"`
    /// from `xl/workbook.xml`).
    pub fn relate_to(&mut self, target: &str, reltype: &str) -> String {
        let r_id = format!("rId{}", self.rels.len() + 1);
        self.rels.push(Relationship {
            r_id: r_id.clone(),
            reltype: reltype.to_string(),
            target: target.to_string(),
        });
        r_id
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize relationships to XML format.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for rel in &self.rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target())
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut rels = Relationships::new();
        assert_eq!(rels.relate_to("worksheets/sheet1.xml", "ws"), "rId1");
        assert_eq!(rels.relate_to("styles.xml", "st"), "rId2");
        assert_eq!(rels.len(), 2);

        let xml = rels.to_xml();
        assert!(xml.contains(r#"<Relationship Id="rId2" Type="st" Target="styles.xml"/>"#));
    }
}
