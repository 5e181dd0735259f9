//! Support for the Android `strings.xml` resource format.
//!
//! Only flat `<string>` resources are produced: nested objects, arrays and
//! non-string scalars of a catalog have no representation in a resource file
//! and are left out. Keys without a translation (null) are kept as empty
//! `<string>` elements.
//!
//! Each value is entity-decoded and escaped with Android rules (see
//! [`crate::sanitize`]). Values that contain HTML-like tags are written as CDATA
//! so the markup reaches the app untouched, and values with more than one
//! `%s`/`%d` placeholder get `formatted="false"`.

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::{
    error::Error,
    normalize::coalesce,
    sanitize::{cdata_sections, contains_markup, has_multiple_placeholders, sanitize},
    traits::Parser,
    types::Catalog,
};

const INDENT_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub strings: Vec<StringResource>,
}

impl Format {
    /// Finds a resource by its `name` attribute.
    pub fn get(&self, name: &str) -> Option<&StringResource> {
        self.strings.iter().find(|sr| sr.name == name)
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut resources = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, formatted) = parse_attributes(e)?;
                    let body = parse_body(&mut xml_reader)?;
                    resources.push(StringResource {
                        name,
                        body,
                        formatted,
                    });
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, formatted) = parse_attributes(e)?;
                    resources.push(StringResource {
                        name,
                        body: Body::Text(String::new()),
                        formatted,
                    });
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(Format { strings: resources })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(writer, b' ', INDENT_WIDTH);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;

        for sr in &self.strings {
            let mut elem = BytesStart::new("string");
            elem.push_attribute(("name", sr.name.as_str()));
            if let Some(formatted) = sr.formatted {
                elem.push_attribute(("formatted", if formatted { "true" } else { "false" }));
            }

            xml_writer.write_event(Event::Start(elem))?;
            match &sr.body {
                // Quotes stay as-is so the Android escapes (\' and \") remain readable.
                Body::Text(text) => {
                    xml_writer.write_event(Event::Text(BytesText::from_escaped(
                        partial_escape(text.as_str()),
                    )))?;
                }
                Body::Markup(markup) => {
                    for section in cdata_sections(markup) {
                        xml_writer.write_event(Event::CData(BytesCData::new(section)))?;
                    }
                }
            }
            xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

impl From<&Catalog> for Format {
    fn from(value: &Catalog) -> Self {
        let strings = value
            .iter()
            .filter_map(|(key, entry)| match coalesce(entry) {
                Some(text) => Some(StringResource::from_value(key, text)),
                None => {
                    tracing::debug!(key, "skipping non-string value in resource document");
                    None
                }
            })
            .collect();
        Self { strings }
    }
}

/// Body of a `<string>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Plain text node (XML-escaped on write).
    Text(String),
    /// Raw markup kept verbatim in a CDATA section.
    Markup(String),
}

impl Body {
    pub fn as_str(&self) -> &str {
        match self {
            Body::Text(text) | Body::Markup(text) => text,
        }
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, Body::Markup(_))
    }
}

/// One `<string>` element of the resource document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    pub body: Body,
    /// `Some(false)` disables positional reordering of placeholders;
    /// `None` leaves the attribute out.
    pub formatted: Option<bool>,
}

impl StringResource {
    /// Builds a resource from a raw catalog value: decode, escape, classify.
    pub fn from_value(name: &str, raw: &str) -> Self {
        let escaped = sanitize(raw);
        let formatted = has_multiple_placeholders(&escaped).then_some(false);
        let body = if contains_markup(&escaped) {
            Body::Markup(escaped)
        } else {
            Body::Text(escaped)
        };

        StringResource {
            name: name.to_string(),
            body,
            formatted,
        }
    }

    /// The (escaped) text of the resource.
    pub fn value(&self) -> &str {
        self.body.as_str()
    }
}

fn parse_attributes(e: &BytesStart) -> Result<(String, Option<bool>), Error> {
    let mut name = None;
    let mut formatted = None;

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => name = Some(attr.unescape_value()?.to_string()),
            b"formatted" => {
                let v = attr.unescape_value()?.to_string();
                formatted = Some(v == "true");
            }
            _ => {}
        }
    }
    let name =
        name.ok_or_else(|| Error::InvalidResource("string tag missing 'name'".to_string()))?;
    Ok((name, formatted))
}

fn parse_body<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<Body, Error> {
    let mut buf = Vec::new();
    let mut value = String::new();
    let mut saw_cdata = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                value.push_str(&e.unescape().map_err(Error::XmlParse)?);
            }
            Ok(Event::CData(e)) => {
                saw_cdata = true;
                let raw = String::from_utf8(e.into_inner().into_owned())
                    .map_err(|e| Error::InvalidResource(e.to_string()))?;
                value.push_str(&raw);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"string" => break,
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }

    Ok(if saw_cdata {
        Body::Markup(value)
    } else {
        Body::Text(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(json: &str) -> String {
        let catalog = Catalog::from_str(json).unwrap();
        Format::from(&catalog).render().unwrap()
    }

    #[test]
    fn test_write_document_layout() {
        let out = render(r#"{"hello": "Hello", "bye": "Bye"}"#);
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <resources>\n  \
             <string name=\"hello\">Hello</string>\n  \
             <string name=\"bye\">Bye</string>\n\
             </resources>\n"
        );
    }

    #[test]
    fn test_null_becomes_empty_entry() {
        let out = render(r#"{"a": "hi", "b": null}"#);
        assert!(out.contains(r#"<string name="b"></string>"#));
        assert!(!out.contains("null"));
    }

    #[test]
    fn test_non_string_values_are_filtered() {
        let format = Format::from(
            &Catalog::from_str(r#"{"a": "x", "nested": {"b": "y"}, "list": ["z"], "n": 1}"#)
                .unwrap(),
        );
        let names: Vec<_> = format.strings.iter().map(|sr| sr.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_markup_is_written_as_cdata() {
        let out = render(r#"{"greet": "Hello <b>World</b>"}"#);
        assert!(out.contains(r#"<string name="greet"><![CDATA[Hello <b>World</b>]]></string>"#));
        assert!(!out.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_encoded_markup_is_decoded_then_cdata() {
        let out = render(r#"{"t": "&lt;tag&gt;"}"#);
        assert!(out.contains("<![CDATA[<tag>]]>"));
        assert!(!out.contains("&amp;lt;"));
    }

    #[test]
    fn test_markup_with_quotes_keeps_escapes_in_cdata() {
        let sr = StringResource::from_value("k", "Tap <b>\"Save\"</b>");
        assert_eq!(sr.body, Body::Markup("Tap <b>\\\"Save\\\"</b>".to_string()));
    }

    #[test]
    fn test_plain_text_escaping() {
        let out = render(r#"{"t": "It's a \"test\"\nline2"}"#);
        assert!(out.contains(r#"<string name="t">It\'s a \"test\"\nline2</string>"#));
    }

    #[test]
    fn test_ampersand_and_angle_brackets_are_xml_escaped() {
        let out = render(r#"{"t": "a < b & c"}"#);
        assert!(out.contains(r#"<string name="t">a &lt; b &amp; c</string>"#));
    }

    #[test]
    fn test_formatted_attribute() {
        let out = render(r#"{"two": "%s and %s", "one": "%s only"}"#);
        assert!(out.contains(r#"<string name="two" formatted="false">%s and %s</string>"#));
        assert!(out.contains(r#"<string name="one">%s only</string>"#));
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let out = render(r#"{"t": "<i>a]]>b</i>"}"#);
        assert!(out.contains("<![CDATA[<i>a]]]]><![CDATA[>b</i>]]>"));
        let reread = Format::from_str(&out).unwrap();
        assert_eq!(reread.strings[0].value(), "<i>a]]>b</i>");
    }

    #[test]
    fn test_empty_catalog_document() {
        let out = render("{}");
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<resources>\n</resources>\n"
        );
    }

    #[test]
    fn test_read_back_written_document() {
        let catalog = Catalog::from_str(
            r#"{"a": "It's", "b": null, "c": "<b>x</b>", "d": "%d of %d", "e": "x & y"}"#,
        )
        .unwrap();
        let written = Format::from(&catalog);
        let reread = Format::from_str(&written.render().unwrap()).unwrap();
        assert_eq!(reread, written);
    }

    #[test]
    fn test_parse_handwritten_resources() {
        let xml = r#"
        <resources>
            <string name="hello">Hello</string>
            <string name="fmt" formatted="false">%s %s</string>
            <string name="empty"/>
        </resources>
        "#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.strings.len(), 3);
        assert_eq!(format.get("hello").unwrap().value(), "Hello");
        assert_eq!(format.get("fmt").unwrap().formatted, Some(false));
        assert_eq!(format.get("empty").unwrap().value(), "");
        assert_eq!(format.get("empty").unwrap().formatted, None);
    }

    #[test]
    fn test_missing_name_attribute() {
        let xml = r#"
        <resources>
            <string>No name attr</string>
        </resources>
        "#;
        let result = Format::from_str(xml);
        assert!(result.is_err());
        let err = format!("{:?}", result.unwrap_err());
        assert!(err.contains("missing 'name'"));
    }
}
