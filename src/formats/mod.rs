pub mod xliff;
pub mod xliff2;
pub mod xmb;
pub mod xtb;

use std::{fmt::Display, str::FromStr};

// Reexporting the formats for easier access
pub use xliff::Format as XliffFormat;
pub use xliff2::Format as Xliff2Format;
pub use xmb::Format as XmbFormat;
pub use xtb::Format as XtbFormat;

use crate::{
    dom::{Document, Element, Node},
    error::Error,
    message_parser::{FRAGMENT_ROOT, MessageParser},
    parsed_message::ParsedMessage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    Xliff,
    Xliff2,
    Xmb,
    Xtb,
}

impl FormatType {
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Xliff | FormatType::Xliff2 => "xlf",
            FormatType::Xmb => "xmb",
            FormatType::Xtb => "xtb",
        }
    }

    pub fn message_parser(&self) -> MessageParser {
        match self {
            FormatType::Xliff => MessageParser::xliff(),
            FormatType::Xliff2 => MessageParser::xliff2(),
            FormatType::Xmb => MessageParser::xmb(),
            FormatType::Xtb => MessageParser::xtb(),
        }
    }

    /// Elements whose content is a message and must not be reformatted.
    pub fn mixed_content_elements(&self) -> &'static [&'static str] {
        match self {
            FormatType::Xliff | FormatType::Xliff2 => &["source", "target", "note"],
            FormatType::Xmb => &["msg"],
            FormatType::Xtb => &["translation"],
        }
    }
}

impl Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormatType::Xliff => "xlf",
            FormatType::Xliff2 => "xlf2",
            FormatType::Xmb => "xmb",
            FormatType::Xtb => "xtb",
        };
        f.write_str(name)
    }
}

impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlf" | "xliff" | "xliff1.2" => Ok(FormatType::Xliff),
            "xlf2" | "xliff2" | "xliff2.0" => Ok(FormatType::Xliff2),
            "xmb" => Ok(FormatType::Xmb),
            "xtb" => Ok(FormatType::Xtb),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Fails unless the document root has the expected local name.
pub(crate) fn check_root(document: &Document, expected: &str) -> Result<(), Error> {
    match document.root() {
        Some(root) if root.local_name() == expected => Ok(()),
        Some(root) => Err(Error::InvalidResource(format!(
            "expected root element <{expected}>, found <{}>",
            root.name
        ))),
        None => Err(Error::InvalidResource("document has no root element".to_string())),
    }
}

pub(crate) fn root_mut(document: &mut Document) -> Result<&mut Element, Error> {
    document
        .root_mut()
        .ok_or_else(|| Error::InvalidResource("document has no root element".to_string()))
}

/// Native content nodes of `message` in the dialect of `parser`. Messages of
/// another dialect are converted first.
pub(crate) fn message_nodes(message: &ParsedMessage, parser: &MessageParser) -> Result<Vec<Node>, Error> {
    let native = if message.parser().codec().name() == parser.codec().name() {
        message.as_native_string()
    } else {
        parser.convert_message(message)?.as_native_string()
    };
    Ok(Document::parse_fragment(&native, FRAGMENT_ROOT)?.children)
}

/// Inserts `element` directly after the first child named `sibling` (or at
/// the end), indented like that sibling.
pub(crate) fn insert_after(parent: &mut Element, sibling: &str, element: Element) {
    let Some(position) = parent.position_of_child_element(sibling) else {
        parent.append_child(element);
        return;
    };
    let indentation = position
        .checked_sub(1)
        .map(|i| parent.children[i].clone())
        .filter(Node::is_whitespace_text);
    parent.insert_child(position + 1, element);
    if let Some(indentation) = indentation {
        parent.insert_child(position + 1, indentation);
    }
}
