//! XML serialization of [`Document`] trees.
//!
//! Without `beautify` the output is the standard serialization of the tree:
//! text is escaped (`&`, `<`, `>`), attribute values additionally escape `"`,
//! and childless elements are written as `<name/>`.
//!
//! With `beautify` every element that contains child elements puts each child on
//! its own indented line and whitespace-only text between them is dropped.
//! Elements named in `mixed_content_elements` are the exception: they are
//! indented like any other element, but their whole subtree is written on one
//! line exactly as it is, so inline markup inside a sentence is not reformatted.

use quick_xml::escape::partial_escape;

use crate::{
    dom::{Document, Element, Node},
    error::Error,
};

pub const DEFAULT_INDENT_STRING: &str = "  ";

/// Options for [`serialize_to_string`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SerializerOptions {
    /// Pretty print the document.
    pub beautify: bool,
    /// Indentation used per level when beautifying. Must be whitespace only.
    /// Defaults to two spaces.
    pub indent_string: Option<String>,
    /// Names of elements whose content must be kept on one line.
    pub mixed_content_elements: Vec<String>,
}

impl SerializerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables/disables pretty printing.
    pub fn with_beautify(mut self, beautify: bool) -> Self {
        self.beautify = beautify;
        self
    }

    /// Sets the indentation string.
    pub fn with_indent_string(mut self, indent_string: impl Into<String>) -> Self {
        self.indent_string = Some(indent_string.into());
        self
    }

    /// Sets the elements that contain mixed content.
    pub fn with_mixed_content_elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mixed_content_elements = elements.into_iter().map(Into::into).collect();
        self
    }

    fn indent(&self) -> Result<&str, Error> {
        match self.indent_string.as_deref() {
            None => Ok(DEFAULT_INDENT_STRING),
            Some(indent) if indent.chars().all(char::is_whitespace) => Ok(indent),
            Some(indent) => Err(Error::InvalidIndent(indent.to_string())),
        }
    }
}

/// Serializes a whole document.
///
/// Fails only when `options.indent_string` contains non-whitespace characters.
pub fn serialize_to_string(document: &Document, options: &SerializerOptions) -> Result<String, Error> {
    let mut writer = XmlWriter::new(options)?;
    writer.write_document(document);
    Ok(writer.out)
}

/// Serializes a single element (including its own tags).
pub fn serialize_element(element: &Element, options: &SerializerOptions) -> Result<String, Error> {
    let mut writer = XmlWriter::new(options)?;
    writer.write_element(element, 0, false);
    Ok(writer.out)
}

/// Plain serialization of a document.
pub fn to_xml_string(document: &Document) -> String {
    let mut writer = XmlWriter::plain();
    writer.write_document(document);
    writer.out
}

/// Plain serialization of an element's children.
pub(crate) fn serialize_children(element: &Element) -> String {
    let mut writer = XmlWriter::plain();
    for child in &element.children {
        writer.write_node(child, 0, false);
    }
    writer.out
}

struct XmlWriter<'a> {
    beautify: bool,
    indent: &'a str,
    mixed_content_elements: &'a [String],
    out: String,
}

impl<'a> XmlWriter<'a> {
    fn new(options: &'a SerializerOptions) -> Result<Self, Error> {
        Ok(XmlWriter {
            beautify: options.beautify,
            indent: options.indent()?,
            mixed_content_elements: &options.mixed_content_elements,
            out: String::new(),
        })
    }

    fn plain() -> Self {
        XmlWriter {
            beautify: false,
            indent: DEFAULT_INDENT_STRING,
            mixed_content_elements: &[],
            out: String::new(),
        }
    }

    fn write_document(&mut self, document: &Document) {
        if !self.beautify {
            for node in &document.children {
                self.write_node(node, 0, false);
            }
            return;
        }
        let mut first = true;
        for node in document.children.iter().filter(|n| !n.is_whitespace_text()) {
            if !first {
                self.out.push('\n');
            }
            first = false;
            self.write_node(node, 0, false);
        }
    }

    fn write_node(&mut self, node: &Node, depth: usize, in_mixed_content: bool) {
        match node {
            Node::Element(element) => self.write_element(element, depth, in_mixed_content),
            Node::Text(text) => self.out.push_str(&partial_escape(text.as_str())),
            Node::CData(text) => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(text);
                self.out.push_str("]]>");
            }
            Node::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
            Node::ProcessingInstruction(content) => {
                self.out.push_str("<?");
                self.out.push_str(content);
                self.out.push_str("?>");
            }
            Node::DocType(content) => {
                self.out.push_str("<!DOCTYPE ");
                self.out.push_str(content);
                self.out.push('>');
            }
        }
    }

    fn write_element(&mut self, element: &Element, depth: usize, in_mixed_content: bool) {
        self.out.push('<');
        self.out.push_str(&element.name);
        for attr in &element.attributes {
            self.out.push(' ');
            self.out.push_str(&attr.name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attribute(&attr.value));
            self.out.push('"');
        }
        if element.children.is_empty() {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');

        let mixed = in_mixed_content || self.is_mixed_content(element);
        let only_text = element
            .children
            .iter()
            .all(|child| matches!(child, Node::Text(_) | Node::CData(_)));

        if self.beautify && !mixed && !only_text {
            for child in &element.children {
                match child {
                    Node::Text(text) => {
                        let text = text.trim();
                        if text.is_empty() {
                            continue;
                        }
                        self.new_line(depth + 1);
                        self.out.push_str(&partial_escape(text));
                    }
                    other => {
                        self.new_line(depth + 1);
                        self.write_node(other, depth + 1, false);
                    }
                }
            }
            self.new_line(depth);
        } else {
            for child in &element.children {
                self.write_node(child, depth + 1, mixed);
            }
        }

        self.out.push_str("</");
        self.out.push_str(&element.name);
        self.out.push('>');
    }

    fn is_mixed_content(&self, element: &Element) -> bool {
        self.mixed_content_elements
            .iter()
            .any(|name| *name == element.name || *name == element.local_name())
    }

    fn new_line(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(self.indent);
        }
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn doc(xml: &str) -> Document {
        Document::parse(xml).unwrap()
    }

    #[test]
    fn test_plain_serialization_is_unchanged() {
        let xml = indoc! {r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
              <!-- comment -->
              <file source-language="en">
                <source>a &lt; b &amp; <x id="INTERPOLATION" equiv-text="{{&quot;x&quot;}}"/></source>
              </file>
            </xliff>
        "#};
        let result = serialize_to_string(&doc(xml), &SerializerOptions::new()).unwrap();
        assert_eq!(result, xml);
    }

    #[test]
    fn test_empty_elements_are_self_closing() {
        let result = to_xml_string(&doc("<x><y></y></x>"));
        assert_eq!(result, "<x><y/></x>");
    }

    #[test]
    fn test_beautify_default_indent() {
        let options = SerializerOptions::new().with_beautify(true);
        let result = serialize_to_string(
            &doc(r#"<x a="1" b="&amp;"><y>a simple pcdata element</y></x>"#),
            &options,
        )
        .unwrap();
        assert_eq!(
            result,
            "<x a=\"1\" b=\"&amp;\">\n  <y>a simple pcdata element</y>\n</x>"
        );
    }

    #[test]
    fn test_beautify_tab_indent() {
        let options = SerializerOptions::new()
            .with_beautify(true)
            .with_indent_string("\t");
        let result = serialize_to_string(
            &doc(r#"<x a="1" b="&amp;"><y>a simple pcdata element</y></x>"#),
            &options,
        )
        .unwrap();
        assert_eq!(
            result,
            "<x a=\"1\" b=\"&amp;\">\n\t<y>a simple pcdata element</y>\n</x>"
        );
    }

    #[test]
    fn test_beautify_rejects_non_white_indent() {
        let options = SerializerOptions::new()
            .with_beautify(true)
            .with_indent_string("\tx");
        let err = serialize_to_string(&doc("<x><y/></x>"), &options).unwrap_err();
        assert!(matches!(err, Error::InvalidIndent(indent) if indent == "\tx"));
    }

    #[test]
    fn test_beautify_keeps_mixed_content_on_one_line() {
        let options = SerializerOptions::new()
            .with_beautify(true)
            .with_mixed_content_elements(["y"]);
        let result = serialize_to_string(
            &doc("<x><y>a <b><it>mixed</it> content</b> element</y></x>"),
            &options,
        )
        .unwrap();
        assert_eq!(
            result,
            "<x>\n  <y>a <b><it>mixed</it> content</b> element</y>\n</x>"
        );
    }

    #[test]
    fn test_beautify_without_mixed_content_breaks_inline_markup() {
        let options = SerializerOptions::new().with_beautify(true);
        let result = serialize_to_string(
            &doc("<x><y>a <b>bold</b> element</y></x>"),
            &options,
        )
        .unwrap();
        assert_eq!(
            result,
            "<x>\n  <y>\n    a\n    <b>bold</b>\n    element\n  </y>\n</x>"
        );
    }

    #[test]
    fn test_beautify_drops_whitespace_between_elements() {
        let xml = "<?xml version=\"1.0\"?>\n<x>\n\n   <y/>\n\n\n<z>1</z></x>\n";
        let options = SerializerOptions::new().with_beautify(true);
        let result = serialize_to_string(&doc(xml), &options).unwrap();
        assert_eq!(result, "<?xml version=\"1.0\"?>\n<x>\n  <y/>\n  <z>1</z>\n</x>");
    }

    #[test]
    fn test_serialize_element_and_children() {
        let element = Element::new("target")
            .with_attribute("state", "new")
            .with_text("Tom & Jerry");
        assert_eq!(
            serialize_element(&element, &SerializerOptions::new()).unwrap(),
            "<target state=\"new\">Tom &amp; Jerry</target>"
        );
        assert_eq!(serialize_children(&element), "Tom &amp; Jerry");
    }
}
