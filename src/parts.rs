//! The atoms a normalized message is made of.

use std::fmt::{Display, Formatter};

use crate::{error::Error, icu_message::IcuMessage};

/// Selects how parts are rendered by `as_display_string`.
///
/// Placeholders render as `{{index}}` in `Default`. ICU references do not:
/// they render as `<ICU-Message-Ref_n/>` there, so placeholder n and ICU
/// reference n stay distinguishable. Only `NgxTranslate` shows an ICU
/// reference as `{{index}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayFormat {
    /// `{{n}}` placeholders, `<ICU-Message-Ref_n/>` ICU references, literal tags.
    /// This is the syntax accepted by `ParsedMessage::translate`.
    #[default]
    Default,
    /// ngx-translate flavour: placeholders are shown by their original
    /// expression (`disp`) when known, ICU references as `{{n}}`.
    NgxTranslate,
}

/// One content atom of a [`crate::ParsedMessage`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMessagePart {
    Text {
        content: String,
    },
    StartTag {
        tag_name: String,
        /// Disambiguates repeated tags of the same name; 0 for the first one.
        id_counter: usize,
    },
    EndTag {
        tag_name: String,
    },
    /// Self closing inline tag such as `<img/>` or `<br/>`.
    EmptyTag {
        tag_name: String,
        id_counter: usize,
    },
    Placeholder {
        index: usize,
        /// Human readable hint from the extraction template, e.g. `{{name}}`.
        disp: Option<String>,
    },
    IcuMessageRef {
        index: usize,
        disp: Option<String>,
    },
    IcuMessage(IcuMessage),
}

/// Discriminant of [`ParsedMessagePart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Text,
    StartTag,
    EndTag,
    EmptyTag,
    Placeholder,
    IcuMessageRef,
    IcuMessage,
}

impl ParsedMessagePart {
    pub fn text(content: impl Into<String>) -> Self {
        ParsedMessagePart::Text {
            content: content.into(),
        }
    }

    pub fn start_tag(tag_name: impl Into<String>, id_counter: usize) -> Result<Self, Error> {
        Ok(ParsedMessagePart::StartTag {
            tag_name: checked_tag_name(tag_name.into())?,
            id_counter,
        })
    }

    pub fn end_tag(tag_name: impl Into<String>) -> Result<Self, Error> {
        Ok(ParsedMessagePart::EndTag {
            tag_name: checked_tag_name(tag_name.into())?,
        })
    }

    pub fn empty_tag(tag_name: impl Into<String>, id_counter: usize) -> Result<Self, Error> {
        Ok(ParsedMessagePart::EmptyTag {
            tag_name: checked_tag_name(tag_name.into())?,
            id_counter,
        })
    }

    pub fn placeholder(index: usize, disp: Option<String>) -> Self {
        ParsedMessagePart::Placeholder { index, disp }
    }

    pub fn icu_message_ref(index: usize, disp: Option<String>) -> Self {
        ParsedMessagePart::IcuMessageRef { index, disp }
    }

    pub fn kind(&self) -> PartKind {
        match self {
            ParsedMessagePart::Text { .. } => PartKind::Text,
            ParsedMessagePart::StartTag { .. } => PartKind::StartTag,
            ParsedMessagePart::EndTag { .. } => PartKind::EndTag,
            ParsedMessagePart::EmptyTag { .. } => PartKind::EmptyTag,
            ParsedMessagePart::Placeholder { .. } => PartKind::Placeholder,
            ParsedMessagePart::IcuMessageRef { .. } => PartKind::IcuMessageRef,
            ParsedMessagePart::IcuMessage(_) => PartKind::IcuMessage,
        }
    }

    pub fn as_display_string(&self, format: DisplayFormat) -> String {
        match self {
            ParsedMessagePart::Text { content } => content.clone(),
            ParsedMessagePart::StartTag {
                tag_name,
                id_counter,
            } => format!("<{tag_name}{}>", id_attribute(*id_counter)),
            ParsedMessagePart::EndTag { tag_name } => format!("</{tag_name}>"),
            ParsedMessagePart::EmptyTag {
                tag_name,
                id_counter,
            } => format!("<{tag_name}{}/>", id_attribute(*id_counter)),
            ParsedMessagePart::Placeholder { index, disp } => match (format, disp) {
                (DisplayFormat::NgxTranslate, Some(disp)) => disp.clone(),
                _ => format!("{{{{{index}}}}}"),
            },
            ParsedMessagePart::IcuMessageRef { index, .. } => match format {
                DisplayFormat::Default => format!("<ICU-Message-Ref_{index}/>"),
                DisplayFormat::NgxTranslate => format!("{{{{{index}}}}}"),
            },
            ParsedMessagePart::IcuMessage(message) => message.as_display_string(format),
        }
    }
}

impl Display for ParsedMessagePart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_display_string(DisplayFormat::Default))
    }
}

fn id_attribute(id_counter: usize) -> String {
    if id_counter == 0 {
        String::new()
    } else {
        format!(" id=\"{id_counter}\"")
    }
}

fn checked_tag_name(tag_name: String) -> Result<String, Error> {
    if tag_name.trim().is_empty() {
        Err(Error::InvalidStructure("tag name must not be empty".to_string()))
    } else {
        Ok(tag_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_display() {
        assert_eq!(
            ParsedMessagePart::text("a < b").as_display_string(DisplayFormat::Default),
            "a < b"
        );
    }

    #[test]
    fn test_tag_display() {
        let start = ParsedMessagePart::start_tag("b", 0).unwrap();
        assert_eq!(start.to_string(), "<b>");
        let start = ParsedMessagePart::start_tag("b", 2).unwrap();
        assert_eq!(start.to_string(), "<b id=\"2\">");
        assert_eq!(ParsedMessagePart::end_tag("b").unwrap().to_string(), "</b>");
        assert_eq!(
            ParsedMessagePart::empty_tag("img", 0).unwrap().to_string(),
            "<img/>"
        );
        assert_eq!(
            ParsedMessagePart::empty_tag("img", 1).unwrap().to_string(),
            "<img id=\"1\"/>"
        );
    }

    #[test]
    fn test_empty_tag_name_is_rejected() {
        assert!(ParsedMessagePart::start_tag("", 0).is_err());
        assert!(ParsedMessagePart::end_tag(" ").is_err());
        assert!(ParsedMessagePart::empty_tag("", 3).is_err());
    }

    #[test]
    fn test_placeholder_display() {
        let placeholder = ParsedMessagePart::placeholder(3, Some("{{name}}".to_string()));
        assert_eq!(placeholder.as_display_string(DisplayFormat::Default), "{{3}}");
        assert_eq!(
            placeholder.as_display_string(DisplayFormat::NgxTranslate),
            "{{name}}"
        );
        let placeholder = ParsedMessagePart::placeholder(0, None);
        assert_eq!(
            placeholder.as_display_string(DisplayFormat::NgxTranslate),
            "{{0}}"
        );
    }

    #[test]
    fn test_icu_message_ref_display() {
        let icu_ref = ParsedMessagePart::icu_message_ref(1, None);
        assert_eq!(
            icu_ref.as_display_string(DisplayFormat::Default),
            "<ICU-Message-Ref_1/>"
        );
        assert_eq!(
            icu_ref.as_display_string(DisplayFormat::NgxTranslate),
            "{{1}}"
        );
        assert_eq!(icu_ref.kind(), PartKind::IcuMessageRef);
    }
}
