// Generic managed-object representation and XML codec.
//
// The APIC models everything as a tree of classed elements whose
// attributes are flat strings. This module deliberately avoids a
// per-class type registry: one generic `Mo` with an ordered attribute
// map covers queries, commits, and the login exchange alike.

use std::collections::BTreeMap;
use std::io::Cursor;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::error::Error;

/// A managed object: class name, attributes, children.
///
/// Serializes to the APIC's XML wire form (`<fvTenant name="t1" .../>`)
/// and parses back from `imdata` query responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mo {
    class: String,
    attrs: BTreeMap<String, String>,
    children: Vec<Mo>,
}

impl Mo {
    /// Create an empty managed object of the given class.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Mo) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    pub fn add_child(&mut self, child: Mo) {
        self.children.push(child);
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn children(&self) -> &[Mo] {
        &self.children
    }

    /// Iterate over direct children of a given class.
    pub fn children_of_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Mo> {
        self.children.iter().filter(move |c| c.class == class)
    }

    /// The `dn` attribute, if present.
    pub fn dn(&self) -> Option<&str> {
        self.attr("dn")
    }

    // ── XML serialization ────────────────────────────────────────────

    /// Serialize this object (and its subtree) to its XML wire form.
    pub fn to_xml(&self) -> Result<String, Error> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        self.write_into(&mut writer)?;
        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| Error::Xml {
            message: format!("serialized XML is not UTF-8: {e}"),
            body: String::new(),
        })
    }

    fn write_into(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<(), Error> {
        let mut elem = BytesStart::new(self.class.as_str());
        for (key, value) in &self.attrs {
            elem.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(elem)).map_err(xml_err)?;
        } else {
            writer.write_event(Event::Start(elem)).map_err(xml_err)?;
            for child in &self.children {
                child.write_into(writer)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(self.class.as_str())))
                .map_err(xml_err)?;
        }
        Ok(())
    }

    // ── XML parsing ──────────────────────────────────────────────────

    /// Parse an XML document into its root managed object.
    ///
    /// Query responses come back as an `<imdata>` root whose children are
    /// the matched objects; text content is ignored (the APIC never uses it).
    pub fn parse_document(xml: &str) -> Result<Mo, Error> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Mo> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| Error::Xml {
                message: e.to_string(),
                body: xml.to_string(),
            })?;

            match event {
                Event::Start(ref e) => {
                    stack.push(element_to_mo(e, xml)?);
                }
                Event::Empty(ref e) => {
                    let mo = element_to_mo(e, xml)?;
                    match stack.last_mut() {
                        Some(parent) => parent.add_child(mo),
                        // A bare self-closing root element is a valid document.
                        None => return Ok(mo),
                    }
                }
                Event::End(_) => {
                    let mo = stack.pop().ok_or_else(|| Error::Xml {
                        message: "unbalanced closing tag".into(),
                        body: xml.to_string(),
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.add_child(mo),
                        None => return Ok(mo),
                    }
                }
                Event::Eof => {
                    return Err(Error::Xml {
                        message: "document contains no root element".into(),
                        body: xml.to_string(),
                    });
                }
                // Whitespace, comments, declarations.
                _ => {}
            }
            buf.clear();
        }
    }
}

fn element_to_mo(elem: &BytesStart<'_>, body: &str) -> Result<Mo, Error> {
    let class = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut mo = Mo::new(class);
    for attr in elem.attributes() {
        let attr = attr.map_err(|e| Error::Xml {
            message: e.to_string(),
            body: body.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml {
                message: e.to_string(),
                body: body.to_string(),
            })?
            .into_owned();
        mo.set_attr(key, value);
    }
    Ok(mo)
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::Xml {
        message: e.to_string(),
        body: String::new(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn serializes_empty_element_with_sorted_attrs() {
        let mo = Mo::new("fvTenant")
            .with_attr("name", "t1")
            .with_attr("descr", "lab tenant");
        assert_eq!(mo.to_xml().unwrap(), r#"<fvTenant descr="lab tenant" name="t1"/>"#);
    }

    #[test]
    fn serializes_nested_children() {
        let mo = Mo::new("fvBD")
            .with_attr("name", "bd1")
            .with_child(Mo::new("fvSubnet").with_attr("ip", "10.1.100.1/24"))
            .with_child(Mo::new("fvRsCtx").with_attr("tnFvCtxName", "ctx1"));
        assert_eq!(
            mo.to_xml().unwrap(),
            r#"<fvBD name="bd1"><fvSubnet ip="10.1.100.1/24"/><fvRsCtx tnFvCtxName="ctx1"/></fvBD>"#
        );
    }

    #[test]
    fn escapes_attribute_values() {
        let mo = Mo::new("fvTenant").with_attr("descr", r#"a "quoted" <value>"#);
        let xml = mo.to_xml().unwrap();
        assert!(xml.contains("&quot;quoted&quot;"));
        assert!(xml.contains("&lt;value&gt;"));
    }

    #[test]
    fn parses_imdata_envelope() {
        let xml = r#"<imdata totalCount="1">
            <fvCtx dn="uni/tn-t1/ctx-c1" name="c1" descr="old"/>
        </imdata>"#;
        let root = Mo::parse_document(xml).unwrap();
        assert_eq!(root.class(), "imdata");
        assert_eq!(root.attr("totalCount"), Some("1"));
        assert_eq!(root.children().len(), 1);
        let ctx = &root.children()[0];
        assert_eq!(ctx.class(), "fvCtx");
        assert_eq!(ctx.dn(), Some("uni/tn-t1/ctx-c1"));
        assert_eq!(ctx.attr("descr"), Some("old"));
    }

    #[test]
    fn parses_nested_subtree() {
        let xml = r#"<imdata totalCount="1">
            <vzSubj name="s1">
                <vzRsSubjFiltAtt tnVzFilterName="web"/>
                <vzRsSubjFiltAtt tnVzFilterName="icmp"/>
            </vzSubj>
        </imdata>"#;
        let root = Mo::parse_document(xml).unwrap();
        let subj = &root.children()[0];
        let filters: Vec<_> = subj
            .children_of_class("vzRsSubjFiltAtt")
            .filter_map(|c| c.attr("tnVzFilterName"))
            .collect();
        assert_eq!(filters, vec!["web", "icmp"]);
    }

    #[test]
    fn unescapes_attribute_values() {
        let xml = r#"<fvTenant descr="a &quot;quoted&quot; value"/>"#;
        let mo = Mo::parse_document(xml).unwrap();
        assert_eq!(mo.attr("descr"), Some(r#"a "quoted" value"#));
    }

    #[test]
    fn rejects_empty_document() {
        assert!(Mo::parse_document("   ").is_err());
    }
}
