//! Conversion between native XML message content and [`ParsedMessage`].
//!
//! [`MessageParser`] owns the format independent part of the conversion: the
//! depth first walk over an element, ICU detection, parsing of normalized
//! strings and the assembly of native XML from parts. Everything that depends
//! on the markup conventions of a file format is delegated to a
//! [`FormatMessageCodec`].

use std::{fmt::Debug, sync::Arc};

use log::debug;

use crate::{
    codecs::{XliffMessageCodec, Xliff2MessageCodec, XmbMessageCodec},
    dom::{Document, Element, Node},
    error::Error,
    icu_message::IcuMessage,
    icu_tokenizer::{self, is_icu_message_start},
    normalized::{self, NormalizedToken},
    parsed_message::ParsedMessage,
    parts::{DisplayFormat, ParsedMessagePart},
};

/// Name of the synthetic element that wraps message content.
pub const FRAGMENT_ROOT: &str = "dummy";

/// Native markup of a start tag part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRepresentation {
    /// A standalone marker; the end tag produces its own marker.
    Marker(Node),
    /// An element that encloses the tagged content. It is closed by the
    /// matching end tag.
    Container(Element),
}

/// Markup conventions of one file format.
///
/// `id` arguments are the running number of the part within the message,
/// counting start tags, empty tags, placeholders and ICU references.
pub trait FormatMessageCodec: Send + Sync {
    fn name(&self) -> &'static str;

    /// Handles an element found while walking message content. Returns whether
    /// the walker should descend into the element's children.
    fn process_start_element(&self, element: &Element, message: &mut ParsedMessage) -> Result<bool, Error>;

    /// Called after the children of an element were visited (or skipped).
    fn process_end_element(&self, element: &Element, message: &mut ParsedMessage) -> Result<(), Error>;

    /// The part of a message element that is message content. Formats that
    /// keep metadata children inside the message element strip them here.
    fn message_content(&self, element: &Element) -> Element {
        element.clone()
    }

    /// Full ICU message text if the content of `element` is an ICU message.
    fn icu_message_text(&self, element: &Element) -> Result<Option<String>, Error> {
        match element.children.first().and_then(Node::as_text) {
            Some(text) if is_icu_message_start(text) => Ok(Some(element.inner_xml())),
            _ => Ok(None),
        }
    }

    fn create_xml_representation_of_start_tag_part(
        &self,
        tag_name: &str,
        id_counter: usize,
        id: usize,
    ) -> TagRepresentation;

    /// `None` when the end tag is expressed by closing a container.
    fn create_xml_representation_of_end_tag_part(&self, tag_name: &str) -> Option<Node>;

    fn create_xml_representation_of_empty_tag_part(
        &self,
        tag_name: &str,
        id_counter: usize,
        id: usize,
    ) -> Node;

    fn create_xml_representation_of_placeholder_part(
        &self,
        index: usize,
        disp: Option<&str>,
        id: usize,
    ) -> Node;

    fn create_xml_representation_of_icu_message_ref_part(
        &self,
        index: usize,
        disp: Option<&str>,
        id: usize,
    ) -> Node;
}

/// Parser for the messages of one file format.
///
/// Cloning is cheap, the codec is shared.
#[derive(Clone)]
pub struct MessageParser {
    codec: Arc<dyn FormatMessageCodec>,
}

impl Debug for MessageParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageParser")
            .field("codec", &self.codec.name())
            .finish()
    }
}

impl MessageParser {
    pub fn new<C: FormatMessageCodec + 'static>(codec: C) -> Self {
        MessageParser {
            codec: Arc::new(codec),
        }
    }

    /// XLIFF 1.2, `<x id="..."/>` markers.
    pub fn xliff() -> Self {
        Self::new(XliffMessageCodec)
    }

    /// XLIFF 2.0, `<ph/>` markers and `<pc>` containers.
    pub fn xliff2() -> Self {
        Self::new(Xliff2MessageCodec)
    }

    /// XMB, `<ph name="..."><ex>...</ex></ph>` markers.
    pub fn xmb() -> Self {
        Self::new(XmbMessageCodec::xmb())
    }

    /// XTB, `<ph name="..."/>` markers.
    pub fn xtb() -> Self {
        Self::new(XmbMessageCodec::xtb())
    }

    pub fn codec(&self) -> &dyn FormatMessageCodec {
        self.codec.as_ref()
    }

    /// Parses the content of `element`.
    pub fn create_normalized_message_from_xml(
        &self,
        element: &Element,
        source_message: Option<&ParsedMessage>,
    ) -> Result<ParsedMessage, Error> {
        let content = self.codec.message_content(element);
        let mut message = ParsedMessage::new(self.clone(), source_message);
        match self.codec.icu_message_text(&content)? {
            Some(text) => message.add_icu_message(&text)?,
            None => self.process_children(&content, &mut message)?,
        }
        message.ensure_all_tags_closed()?;
        message.set_xml_representation(content);
        debug!(
            "{}: parsed message with {} parts",
            self.codec.name(),
            message.parts().len()
        );
        Ok(message)
    }

    /// Parses native markup such as `Hello <x id="INTERPOLATION"/>`.
    pub fn create_normalized_message_from_xml_string(
        &self,
        xml: &str,
        source_message: Option<&ParsedMessage>,
    ) -> Result<ParsedMessage, Error> {
        let element = Document::parse_fragment(xml, FRAGMENT_ROOT)?;
        self.create_normalized_message_from_xml(&element, source_message)
    }

    fn process_children(&self, element: &Element, message: &mut ParsedMessage) -> Result<(), Error> {
        for child in &element.children {
            match child {
                Node::Text(text) | Node::CData(text) => message.add_text(text)?,
                Node::Element(child) => {
                    if self.codec.process_start_element(child, message)? {
                        self.process_children(child, message)?;
                    }
                    self.codec.process_end_element(child, message)?;
                }
                Node::Comment(_) | Node::ProcessingInstruction(_) | Node::DocType(_) => {}
            }
        }
        Ok(())
    }

    /// Parses a normalized string (`{{n}}` placeholders, literal tags).
    ///
    /// A bare `{{n}}` is a placeholder unless the source message has an ICU
    /// message reference n and no placeholder n. `disp` hints are taken over
    /// from the source message.
    pub fn parse_normalized_string(
        &self,
        normalized_string: &str,
        source_message: Option<&ParsedMessage>,
    ) -> Result<ParsedMessage, Error> {
        let mut message = ParsedMessage::new(self.clone(), source_message);
        for token in normalized::tokenize(normalized_string)? {
            match token {
                NormalizedToken::Text(text) => message.add_text(&text)?,
                NormalizedToken::StartTag {
                    tag_name,
                    id_counter,
                } => message.add_start_tag(&tag_name, id_counter)?,
                NormalizedToken::EndTag { tag_name } => message.add_end_tag(&tag_name)?,
                NormalizedToken::EmptyTag {
                    tag_name,
                    id_counter,
                } => message.add_empty_tag(&tag_name, id_counter)?,
                NormalizedToken::Placeholder(index) => match source_message {
                    Some(source)
                        if source.has_icu_message_ref(index) && !source.has_placeholder(index) =>
                    {
                        message.add_icu_message_ref(index, icu_message_ref_disp(source_message, index))?
                    }
                    _ => message.add_placeholder(index, placeholder_disp(source_message, index))?,
                },
                NormalizedToken::IcuMessageRef(index) => {
                    message.add_icu_message_ref(index, icu_message_ref_disp(source_message, index))?
                }
            }
        }
        message.ensure_all_tags_closed()?;
        let xml = self.create_xml_representation(&message);
        message.set_xml_representation(xml);
        Ok(message)
    }

    /// Parses an ICU message given in native markup into a message whose only
    /// part is that ICU message.
    pub fn parse_icu_message(
        &self,
        icu_message_string: &str,
        source_message: Option<&ParsedMessage>,
    ) -> Result<ParsedMessage, Error> {
        let mut message = ParsedMessage::new(self.clone(), source_message);
        message.add_icu_message(icu_message_string)?;
        Ok(message)
    }

    pub(crate) fn parse_icu_message_text(&self, text: &str) -> Result<IcuMessage, Error> {
        let syntax = icu_tokenizer::parse(text)?;
        let mut icu_message = IcuMessage::new(self.clone(), syntax.is_plural);
        for (category, body) in syntax.categories {
            let message = self.create_normalized_message_from_xml_string(&body, None)?;
            icu_message.add_category(category, message)?;
        }
        Ok(icu_message)
    }

    /// Re-expresses a message parsed by another parser in this parser's
    /// dialect. Placeholder `disp` hints are kept.
    pub fn convert_message(&self, message: &ParsedMessage) -> Result<ParsedMessage, Error> {
        match message.icu_message() {
            Some(icu_message) => {
                let mut converted = IcuMessage::new(self.clone(), icu_message.is_plural_message());
                for category in icu_message.categories() {
                    converted.add_category(category.category(), self.convert_message(category.message())?)?;
                }
                self.parse_icu_message(&converted.as_native_string(), None)
            }
            None => self.parse_normalized_string(
                &message.as_display_string(DisplayFormat::Default),
                Some(message),
            ),
        }
    }

    /// Builds the native markup of `message` below a synthetic root element.
    ///
    /// Unbalanced parts do not fail here: containers still open at the end are
    /// closed, end tags without an open container are dropped.
    pub fn create_xml_representation(&self, message: &ParsedMessage) -> Element {
        let mut stack: Vec<(Element, bool)> = vec![(Element::new(FRAGMENT_ROOT), false)];
        let mut id = 0;

        for part in message.parts() {
            match part {
                ParsedMessagePart::Text { content } => {
                    append(&mut stack, Node::text(content.as_str()));
                }
                ParsedMessagePart::StartTag {
                    tag_name,
                    id_counter,
                } => {
                    match self
                        .codec
                        .create_xml_representation_of_start_tag_part(tag_name, *id_counter, id)
                    {
                        TagRepresentation::Marker(node) => append(&mut stack, node),
                        TagRepresentation::Container(element) => stack.push((element, true)),
                    }
                    id += 1;
                }
                ParsedMessagePart::EndTag { tag_name } => {
                    let container_open = stack.len() > 1 && stack.last().is_some_and(|(_, c)| *c);
                    if container_open {
                        fold_top(&mut stack);
                    } else if let Some(node) =
                        self.codec.create_xml_representation_of_end_tag_part(tag_name)
                    {
                        append(&mut stack, node);
                    }
                }
                ParsedMessagePart::EmptyTag {
                    tag_name,
                    id_counter,
                } => {
                    let node = self
                        .codec
                        .create_xml_representation_of_empty_tag_part(tag_name, *id_counter, id);
                    append(&mut stack, node);
                    id += 1;
                }
                ParsedMessagePart::Placeholder { index, disp } => {
                    let node = self.codec.create_xml_representation_of_placeholder_part(
                        *index,
                        disp.as_deref(),
                        id,
                    );
                    append(&mut stack, node);
                    id += 1;
                }
                ParsedMessagePart::IcuMessageRef { index, disp } => {
                    let node = self.codec.create_xml_representation_of_icu_message_ref_part(
                        *index,
                        disp.as_deref(),
                        id,
                    );
                    append(&mut stack, node);
                    id += 1;
                }
                ParsedMessagePart::IcuMessage(icu_message) => {
                    let native = icu_message.as_native_string();
                    match Document::parse_fragment(&native, FRAGMENT_ROOT) {
                        Ok(fragment) => {
                            for node in fragment.children {
                                append(&mut stack, node);
                            }
                        }
                        Err(_) => append(&mut stack, Node::text(native)),
                    }
                }
            }
        }

        while stack.len() > 1 {
            fold_top(&mut stack);
        }
        stack
            .pop()
            .map(|(element, _)| element)
            .unwrap_or_else(|| Element::new(FRAGMENT_ROOT))
    }
}

fn append(stack: &mut [(Element, bool)], node: Node) {
    if let Some((top, _)) = stack.last_mut() {
        top.append_child(node);
    }
}

fn fold_top(stack: &mut Vec<(Element, bool)>) {
    if stack.len() < 2 {
        return;
    }
    if let Some((element, _)) = stack.pop() {
        append(stack, Node::Element(element));
    }
}

fn placeholder_disp(source_message: Option<&ParsedMessage>, index: usize) -> Option<String> {
    source_message
        .and_then(|source| source.placeholder_disp(index))
        .map(str::to_string)
}

fn icu_message_ref_disp(source_message: Option<&ParsedMessage>, index: usize) -> Option<String> {
    source_message
        .and_then(|source| source.icu_message_ref_disp(index))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_debug_names_codec() {
        assert_eq!(
            format!("{:?}", MessageParser::xliff2()),
            "MessageParser { codec: \"xliff2\" }"
        );
        assert_eq!(MessageParser::xtb().codec().name(), "xtb");
    }

    #[test]
    fn test_unknown_elements_become_literal_tags() {
        let message = MessageParser::xliff()
            .create_normalized_message_from_xml_string("a <span class=\"c\">b</span> c", None)
            .unwrap();
        assert_eq!(message.to_string(), "a <span>b</span> c");
    }

    #[test]
    fn test_comments_are_ignored() {
        let message = MessageParser::xliff()
            .create_normalized_message_from_xml_string("a<!-- note --> b", None)
            .unwrap();
        assert_eq!(message.to_string(), "a b");
        assert_eq!(message.parts().len(), 1);
    }

    #[test]
    fn test_unclosed_literal_tag_in_fragment_is_an_xml_error() {
        assert!(
            MessageParser::xliff()
                .create_normalized_message_from_xml_string("a <b>b", None)
                .is_err()
        );
    }

    #[test]
    fn test_bare_placeholder_becomes_icu_ref_when_source_has_one() {
        let parser = MessageParser::xliff();
        let source = parser
            .create_normalized_message_from_xml_string(
                "<x id=\"ICU\" equiv-text=\"{count}\"/> and <x id=\"INTERPOLATION_1\"/>",
                None,
            )
            .unwrap();
        let translated = parser
            .parse_normalized_string("{{1}} und {{0}}", Some(&source))
            .unwrap();
        assert_eq!(translated.to_string(), "{{1}} und <ICU-Message-Ref_0/>");
        assert_eq!(
            translated.as_native_string(),
            "<x id=\"INTERPOLATION_1\"/> und <x id=\"ICU\" equiv-text=\"{count}\"/>"
        );
    }

    #[test]
    fn test_normalized_string_errors() {
        let parser = MessageParser::xliff();
        assert!(matches!(
            parser.parse_normalized_string("<b>x</i>", None),
            Err(Error::UnbalancedTag { .. })
        ));
        assert!(matches!(
            parser.parse_normalized_string("{{99999999999999999999999}}", None),
            Err(Error::NormalizedSyntax(_))
        ));
    }

    #[test]
    fn test_create_xml_representation_of_unbalanced_parts() {
        let parser = MessageParser::xliff2();
        let mut message = ParsedMessage::new(parser.clone(), None);
        message.add_start_tag("b", 0).unwrap();
        message.add_text("open").unwrap();
        let element = parser.create_xml_representation(&message);
        assert_eq!(element.name, FRAGMENT_ROOT);
        assert_eq!(
            element.inner_xml(),
            "<pc id=\"0\" equivStart=\"START_BOLD_TEXT\" equivEnd=\"CLOSE_BOLD_TEXT\" type=\"fmt\" dispStart=\"&lt;b&gt;\" dispEnd=\"&lt;/b&gt;\">open</pc>"
        );
    }

    #[test]
    fn test_parse_icu_message() {
        let parser = MessageParser::xliff();
        let message = parser
            .parse_icu_message("{VAR_SELECT, select, a {x <x id=\"INTERPOLATION\"/>} b {y}}", None)
            .unwrap();
        let icu = message.icu_message().unwrap();
        assert!(icu.is_select_message());
        assert_eq!(
            icu.categories()[0].message().as_display_string(DisplayFormat::Default),
            "x {{0}}"
        );
        assert!(parser.parse_icu_message("not icu", None).is_err());
    }
}
