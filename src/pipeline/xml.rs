//! Per-row XML documents.
//!
//! Every header becomes one child element of a fixed root. The document is
//! indented by the writer while it is built, so cell text is never touched by
//! any formatting pass.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::warn;

use crate::common::Result;
use crate::common::xml::{escape_text, is_valid_element_name};

/// Root element used when no other tag is configured.
pub const DEFAULT_ROOT_TAG: &str = "csv";

/// Element whose text has its commas removed.
const TITLE_ELEMENT: &str = "Title";

/// Element name for a header: every whitespace run becomes `_`.
pub fn element_name(header: &str) -> String {
    let mut name = String::with_capacity(header.len());
    let mut in_whitespace = false;
    for c in header.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                name.push('_');
            }
            in_whitespace = true;
        } else {
            name.push(c);
            in_whitespace = false;
        }
    }
    name
}

#[derive(Debug, Clone)]
struct ElementSlot {
    column: usize,
    name: String,
    strip_commas: bool,
}

/// Builds XML records for rows of one header layout.
#[derive(Debug, Clone)]
pub struct XmlRecordBuilder {
    root_tag: String,
    slots: Vec<ElementSlot>,
}

impl XmlRecordBuilder {
    /// Prepare element names for `headers`.
    ///
    /// Empty headers produce no element. Headers that do not form a valid XML
    /// name even after whitespace substitution are left out of every record
    /// and reported once here.
    pub fn new<S: AsRef<str>>(headers: &[S], root_tag: &str) -> Self {
        let mut slots = Vec::with_capacity(headers.len());
        for (column, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            if header.is_empty() {
                continue;
            }
            let name = element_name(header);
            if !is_valid_element_name(&name) {
                warn!(column, header, "header is not a valid XML element name, column left out of records");
                continue;
            }
            slots.push(ElementSlot {
                column,
                strip_commas: name == TITLE_ELEMENT,
                name,
            });
        }
        Self {
            root_tag: root_tag.to_string(),
            slots,
        }
    }

    /// Element names in output order.
    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    /// Build the document for `row`.
    ///
    /// Missing trailing cells become empty elements.
    pub fn build<S: AsRef<str>>(&self, row: &[S]) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new(self.root_tag.as_str())))?;

        for slot in &self.slots {
            let raw = row.get(slot.column).map(AsRef::as_ref).unwrap_or("").trim();
            let value = if slot.strip_commas {
                raw.replace(',', "")
            } else {
                raw.to_string()
            };

            if value.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(slot.name.as_str())))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new(slot.name.as_str())))?;
                writer.write_event(Event::Text(BytesText::from_escaped(escape_text(&value))))?;
                writer.write_event(Event::End(BytesEnd::new(slot.name.as_str())))?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new(self.root_tag.as_str())))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| crate::common::Error::Xml(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_name() {
        assert_eq!(element_name("Wi_Number"), "Wi_Number");
        assert_eq!(element_name("Paper  Code"), "Paper_Code");
        assert_eq!(element_name("Trim\tHeight mm"), "Trim_Height_mm");
    }

    #[test]
    fn test_document_layout() {
        let builder = XmlRecordBuilder::new(&["Wi_Number", "Title", "Cut_Off"], DEFAULT_ROOT_TAG);
        let xml = builder.build(&["  W1 ", "Foo, Bar, Baz", ""]).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <csv>\n\
             \x20 <Wi_Number>W1</Wi_Number>\n\
             \x20 <Title>Foo Bar Baz</Title>\n\
             \x20 <Cut_Off/>\n\
             </csv>"
        );
    }

    #[test]
    fn test_short_row_renders_empty_elements() {
        let builder = XmlRecordBuilder::new(&["Wi_Number", "Title", "Paper_Code"], "csv");
        let xml = builder.build(&["W1"]).unwrap();
        assert!(xml.contains("<Title/>"));
        assert!(xml.contains("<Paper_Code/>"));
    }

    #[test]
    fn test_tag_like_content_is_preserved() {
        let builder = XmlRecordBuilder::new(&["Imposition"], "csv");
        let xml = builder.build(&["<a><b> & 2><3"]).unwrap();
        assert!(xml.contains("<Imposition>&lt;a&gt;&lt;b&gt; &amp; 2&gt;&lt;3</Imposition>"));
        assert_eq!(xml.lines().count(), 4);
    }

    #[test]
    fn test_commas_kept_outside_title() {
        let builder = XmlRecordBuilder::new(&["Paper Code"], "csv");
        let xml = builder.build(&["80gsm, bond"]).unwrap();
        assert!(xml.contains("<Paper_Code>80gsm, bond</Paper_Code>"));
    }

    #[test]
    fn test_invalid_and_empty_headers_are_skipped() {
        let builder = XmlRecordBuilder::new(&["Wi_Number", "", "2nd Route", "Title"], "csv");
        let names: Vec<&str> = builder.element_names().collect();
        assert_eq!(names, vec!["Wi_Number", "Title"]);

        let xml = builder.build(&["W1", "x", "y", "T"]).unwrap();
        assert!(xml.contains("<Title>T</Title>"));
        assert!(!xml.contains(">x<"));
    }

    #[test]
    fn test_xml_prefixed_header_is_kept() {
        let builder = XmlRecordBuilder::new(&["Wi_Number", "XML_Ref"], "csv");
        let xml = builder.build(&["W1", "R1"]).unwrap();
        assert!(xml.contains("<XML_Ref>R1</XML_Ref>"));
    }

    #[test]
    fn test_custom_root_tag() {
        let builder = XmlRecordBuilder::new(&["Wi_Number"], "workInstruction");
        let xml = builder.build(&["W9"]).unwrap();
        assert!(xml.contains("<workInstruction>"));
        assert!(xml.ends_with("</workInstruction>"));
    }
}
