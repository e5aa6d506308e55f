//! Format independent representation of one translatable message.

use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

use log::debug;

use crate::{
    dom::Element,
    error::Error,
    icu_message::{IcuMessage, IcuMessageTranslation},
    message_parser::MessageParser,
    parts::{DisplayFormat, ParsedMessagePart},
    validation::{self, ValidationErrors},
};

/// An ordered sequence of [`ParsedMessagePart`]s.
///
/// A message either consists of exactly one ICU message part, or of any number
/// of the other part kinds with properly nested tags. Both rules are enforced
/// when parts are added.
///
/// Equality compares the parts only.
///
/// A translation keeps its source message. The source's own history is shared,
/// not copied.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    parser: MessageParser,
    source_message: Option<Arc<ParsedMessage>>,
    parts: Vec<ParsedMessagePart>,
    xml_representation: Option<Element>,
    open_tags: Vec<String>,
}

impl PartialEq for ParsedMessage {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl ParsedMessage {
    pub fn new(parser: MessageParser, source_message: Option<&ParsedMessage>) -> Self {
        ParsedMessage {
            parser,
            source_message: source_message.map(|message| Arc::new(message.clone())),
            parts: Vec::new(),
            xml_representation: None,
            open_tags: Vec::new(),
        }
    }

    pub fn parser(&self) -> &MessageParser {
        &self.parser
    }

    /// The message this one is a translation of.
    pub fn source_message(&self) -> Option<&ParsedMessage> {
        self.source_message.as_deref()
    }

    pub fn parts(&self) -> &[ParsedMessagePart] {
        &self.parts
    }

    /// Native element backing this message, if it was parsed from or rendered
    /// to XML.
    pub fn xml_representation(&self) -> Option<&Element> {
        self.xml_representation.as_ref()
    }

    pub(crate) fn set_xml_representation(&mut self, element: Element) {
        self.xml_representation = Some(element);
    }

    /// Appends text, merging it into a preceding text part.
    pub fn add_text(&mut self, text: &str) -> Result<(), Error> {
        if text.is_empty() {
            return Ok(());
        }
        self.ensure_no_icu_message()?;
        if let Some(ParsedMessagePart::Text { content }) = self.parts.last_mut() {
            content.push_str(text);
        } else {
            self.parts.push(ParsedMessagePart::text(text));
        }
        Ok(())
    }

    pub fn add_start_tag(&mut self, tag_name: &str, id_counter: usize) -> Result<(), Error> {
        self.ensure_no_icu_message()?;
        self.parts
            .push(ParsedMessagePart::start_tag(tag_name, id_counter)?);
        self.open_tags.push(tag_name.to_string());
        Ok(())
    }

    /// Appends an end tag. Fails if it does not close the innermost open tag.
    pub fn add_end_tag(&mut self, tag_name: &str) -> Result<(), Error> {
        self.ensure_no_icu_message()?;
        let part = ParsedMessagePart::end_tag(tag_name)?;
        match self.open_tags.last().cloned() {
            Some(open) if open == tag_name => {
                self.open_tags.pop();
                self.parts.push(part);
                Ok(())
            }
            open => Err(Error::UnbalancedTag {
                tag: tag_name.to_string(),
                open: open.unwrap_or_else(|| "nothing".to_string()),
                native: self.parser.create_xml_representation(self).inner_xml(),
            }),
        }
    }

    pub fn add_empty_tag(&mut self, tag_name: &str, id_counter: usize) -> Result<(), Error> {
        self.ensure_no_icu_message()?;
        self.parts
            .push(ParsedMessagePart::empty_tag(tag_name, id_counter)?);
        Ok(())
    }

    pub fn add_placeholder(&mut self, index: usize, disp: Option<String>) -> Result<(), Error> {
        self.ensure_no_icu_message()?;
        self.parts.push(ParsedMessagePart::placeholder(index, disp));
        Ok(())
    }

    pub fn add_icu_message_ref(&mut self, index: usize, disp: Option<String>) -> Result<(), Error> {
        self.ensure_no_icu_message()?;
        self.parts.push(ParsedMessagePart::icu_message_ref(index, disp));
        Ok(())
    }

    /// Parses `text` as an ICU message and makes it the only part of this
    /// message.
    pub fn add_icu_message(&mut self, text: &str) -> Result<(), Error> {
        if !self.parts.is_empty() {
            return Err(Error::InvalidStructure(
                "an ICU message must be the only content of a message".to_string(),
            ));
        }
        let icu_message = self.parser.parse_icu_message_text(text)?;
        self.parts.push(ParsedMessagePart::IcuMessage(icu_message));
        Ok(())
    }

    fn ensure_no_icu_message(&self) -> Result<(), Error> {
        if self.is_icu_message() {
            return Err(Error::InvalidStructure(
                "cannot add content to an ICU message".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn ensure_all_tags_closed(&self) -> Result<(), Error> {
        match self.open_tags.last() {
            Some(open) => Err(Error::UnclosedTag(open.clone())),
            None => Ok(()),
        }
    }

    /// Content in the markup of the native format.
    pub fn as_native_string(&self) -> String {
        if let Some(icu_message) = self.icu_message() {
            return icu_message.as_native_string();
        }
        match &self.xml_representation {
            Some(element) => element.inner_xml(),
            None => self.parser.create_xml_representation(self).inner_xml(),
        }
    }

    pub fn as_display_string(&self, format: DisplayFormat) -> String {
        self.parts
            .iter()
            .map(|part| part.as_display_string(format))
            .collect()
    }

    pub fn is_icu_message(&self) -> bool {
        self.icu_message().is_some()
    }

    pub fn icu_message(&self) -> Option<&IcuMessage> {
        match self.parts.as_slice() {
            [ParsedMessagePart::IcuMessage(icu_message)] => Some(icu_message),
            _ => None,
        }
    }

    pub fn contains_icu_message_ref(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, ParsedMessagePart::IcuMessageRef { .. }))
    }

    /// Translates the message with a normalized string such as
    /// `Hallo {{0}}, <b>willkommen</b>`.
    pub fn translate(&self, normalized_string: &str) -> Result<ParsedMessage, Error> {
        if self.is_icu_message() {
            return Err(Error::invalid_operation(
                "this is an ICU message, use translate_icu_message",
            ));
        }
        debug!("translating \"{}\"", self.as_display_string(DisplayFormat::Default));
        self.parser.parse_normalized_string(normalized_string, Some(self))
    }

    pub fn translate_icu_message(
        &self,
        translation: &IcuMessageTranslation,
    ) -> Result<ParsedMessage, Error> {
        let icu_message = self.icu_message().ok_or_else(|| {
            Error::invalid_operation("this is not an ICU message, use translate")
        })?;
        let translated = icu_message.translate(translation)?;
        self.parser
            .parse_icu_message(&translated.as_native_string(), Some(self))
    }

    /// Translates the message with content already in native markup.
    pub fn translate_native_string(&self, native_string: &str) -> Result<ParsedMessage, Error> {
        self.parser
            .create_normalized_message_from_xml_string(native_string, Some(self))
    }

    /// Errors of this translation compared to its source message.
    /// `None` when there is no source message or nothing was found.
    pub fn validate(&self) -> Option<ValidationErrors> {
        validation::errors(self, self.source_message.as_deref()?)
    }

    /// Like [`ParsedMessage::validate`] for findings that are only warnings.
    pub fn validate_warnings(&self) -> Option<ValidationErrors> {
        validation::warnings(self, self.source_message.as_deref()?)
    }

    pub fn placeholder_disp(&self, index: usize) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            ParsedMessagePart::Placeholder { index: i, disp } if *i == index => disp.as_deref(),
            _ => None,
        })
    }

    pub fn icu_message_ref_disp(&self, index: usize) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            ParsedMessagePart::IcuMessageRef { index: i, disp } if *i == index => disp.as_deref(),
            _ => None,
        })
    }

    pub fn has_placeholder(&self, index: usize) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, ParsedMessagePart::Placeholder { index: i, .. } if *i == index))
    }

    pub fn has_icu_message_ref(&self, index: usize) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, ParsedMessagePart::IcuMessageRef { index: i, .. } if *i == index))
    }
}

impl Display for ParsedMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_display_string(DisplayFormat::Default))
    }
}
