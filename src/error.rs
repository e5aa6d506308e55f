//! All error types for the i18ncodec crate.
//!
//! Structural problems (unbalanced tags, malformed grammar, bad options) are
//! returned as errors immediately. Advisory findings of message validation are
//! not errors; see [`crate::validation`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("malformed XML: {0}")]
    MalformedXml(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("unexpected close tag `{tag}` (currently open is {open}, native xml is \"{native}\")")]
    UnbalancedTag {
        tag: String,
        open: String,
        native: String,
    },

    #[error("tag `{0}` is still open at the end of the message")]
    UnclosedTag(String),

    #[error("invalid message structure: {0}")]
    InvalidStructure(String),

    #[error("syntax error in normalized message: {0}")]
    NormalizedSyntax(String),

    #[error("syntax error in ICU message: {0}")]
    IcuSyntax(String),

    #[error("invalid plural category \"{category}\", allowed are =<n> and {allowed}")]
    InvalidPluralCategory { category: String, allowed: String },

    #[error("adding a new category not allowed for select messages (\"{0}\" is not part of message)")]
    NewSelectCategory(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("indentString must not contain non white characters (got \"{0}\")")]
    InvalidIndent(String),
}

impl Error {
    /// Creates an error for an operation that is not allowed on the receiver.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation(message.into())
    }

    /// Creates an error for a feature this crate deliberately does not implement.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::Unsupported(message.into())
    }

    pub(crate) fn malformed_xml(message: impl Into<String>) -> Self {
        Error::MalformedXml(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unknown_format_error() {
        let error = Error::UnknownFormat("po".to_string());
        assert_eq!(error.to_string(), "unknown format `po`");
    }

    #[test]
    fn test_unbalanced_tag_error_names_both_tags() {
        let error = Error::UnbalancedTag {
            tag: "i".to_string(),
            open: "b".to_string(),
            native: "<x id=\"START_BOLD_TEXT\"/>hello".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("`i`"));
        assert!(display.contains("currently open is b"));
        assert!(display.contains("START_BOLD_TEXT"));
    }

    #[test]
    fn test_invalid_plural_category_error() {
        let error = Error::InvalidPluralCategory {
            category: "weird".to_string(),
            allowed: "zero, one, two, few, many, other".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid plural category \"weird\", allowed are =<n> and zero, one, two, few, many, other"
        );
    }

    #[test]
    fn test_new_select_category_error() {
        let error = Error::NewSelectCategory("foo".to_string());
        assert!(error.to_string().contains("\"foo\" is not part of message"));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_helper_constructors() {
        assert_eq!(
            Error::invalid_operation("translate on ICU message").to_string(),
            "invalid operation: translate on ICU message"
        );
        assert_eq!(
            Error::unsupported("nested ICU").to_string(),
            "unsupported: nested ICU"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidIndent("\tx".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidIndent"));
    }
}
