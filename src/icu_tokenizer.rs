//! Grammar of ICU plural and select messages.
//!
//! ```text
//! message  := '{' variable ',' ('plural' | 'select') ',' [offset] choice+ '}'
//! offset   := 'offset:' digits            (plural only)
//! choice   := selector '{' body '}'
//! ```
//!
//! A body is kept as raw native text. While looking for the closing brace of a
//! body, nested `{...}` groups are balanced, XML markup (`<x id="..."/>`) is
//! skipped as a whole, and apostrophe quoting is honoured: `''` is a literal
//! apostrophe and `'{...}'` is a literal brace group.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::Error, icu_message::is_valid_plural_category};

lazy_static! {
    static ref ICU_MESSAGE_START_REGEX: Regex =
        Regex::new(r"^\s*\{\s*[\w.$-]+\s*,\s*(plural|select)\s*,").unwrap();
}

/// Tests whether `text` begins an ICU plural or select message.
pub fn is_icu_message_start(text: &str) -> bool {
    ICU_MESSAGE_START_REGEX.is_match(text)
}

/// The syntactic structure of one ICU message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcuMessageSyntax {
    pub variable: String,
    pub is_plural: bool,
    pub offset: Option<u32>,
    /// (selector, raw body) in source order.
    pub categories: Vec<(String, String)>,
}

/// Parses a complete ICU message; trailing text other than whitespace is an error.
pub fn parse(text: &str) -> Result<IcuMessageSyntax, Error> {
    let mut scanner = Scanner::new(text);

    scanner.skip_whitespace();
    scanner.expect('{')?;
    scanner.skip_whitespace();
    let variable = scanner.identifier();
    if variable.is_empty() {
        return Err(scanner.error("missing variable name"));
    }
    scanner.skip_whitespace();
    scanner.expect(',')?;
    scanner.skip_whitespace();
    let is_plural = match scanner.identifier() {
        "plural" => true,
        "select" => false,
        other => {
            return Err(scanner.error(&format!("unsupported message type \"{other}\"")));
        }
    };
    scanner.skip_whitespace();
    scanner.expect(',')?;

    let mut offset = None;
    let mut categories: Vec<(String, String)> = Vec::new();
    loop {
        scanner.skip_whitespace();
        match scanner.peek() {
            None => return Err(scanner.error("unterminated ICU message")),
            Some('}') => {
                scanner.bump();
                break;
            }
            _ => {}
        }

        if is_plural && scanner.rest().starts_with("offset:") {
            scanner.pos += "offset:".len();
            scanner.skip_whitespace();
            let digits = scanner.take_while(|c| c.is_ascii_digit());
            offset = Some(
                digits
                    .parse()
                    .map_err(|_| scanner.error("offset must be a number"))?,
            );
            continue;
        }

        let selector = scanner.take_while(|c| !c.is_whitespace() && c != '{' && c != '}');
        if selector.is_empty() {
            return Err(scanner.error("missing category name"));
        }
        if is_plural && !is_valid_plural_category(selector) {
            return Err(scanner.error(&format!("invalid plural category \"{selector}\"")));
        }
        if categories.iter().any(|(existing, _)| existing == selector) {
            return Err(scanner.error(&format!("duplicate category \"{selector}\"")));
        }
        scanner.skip_whitespace();
        scanner.expect('{')?;
        let body = scanner.body()?;
        categories.push((selector.to_string(), body.to_string()));
    }

    scanner.skip_whitespace();
    if scanner.peek().is_some() {
        return Err(scanner.error("unexpected text after end of ICU message"));
    }
    if categories.is_empty() {
        return Err(scanner.error("ICU message without categories"));
    }

    Ok(IcuMessageSyntax {
        variable: variable.to_string(),
        is_plural,
        offset,
        categories,
    })
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    fn identifier(&mut self) -> &'a str {
        self.take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '-'))
    }

    fn expect(&mut self, expected: char) -> Result<(), Error> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error(&format!("expected '{expected}' but found '{c}'"))),
            None => Err(self.error(&format!("expected '{expected}' but found end of text"))),
        }
    }

    /// Reads up to the brace closing the current body; the opening brace has
    /// already been consumed.
    fn body(&mut self) -> Result<&'a str, Error> {
        let start = self.pos;
        let mut depth = 1usize;
        loop {
            let c = self
                .bump()
                .ok_or_else(|| self.error("unterminated category message"))?;
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&self.input[start..self.pos - 1]);
                    }
                }
                '\'' => match self.peek() {
                    Some('\'') => {
                        self.bump();
                    }
                    Some('{') | Some('}') => {
                        while let Some(quoted) = self.bump() {
                            if quoted == '\'' {
                                break;
                            }
                        }
                    }
                    _ => {}
                },
                '<' => self.skip_markup()?,
                _ => {}
            }
        }
    }

    fn skip_markup(&mut self) -> Result<(), Error> {
        let mut quote: Option<char> = None;
        while let Some(c) = self.bump() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None => match c {
                    '"' | '\'' => quote = Some(c),
                    '>' => return Ok(()),
                    _ => {}
                },
            }
        }
        Err(self.error("unterminated markup"))
    }

    fn error(&self, message: &str) -> Error {
        Error::IcuSyntax(format!(
            "{message} at position {} in \"{}\"",
            self.pos, self.input
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_icu_message_start() {
        assert!(is_icu_message_start("{VAR_PLURAL, plural, =0 {none}}"));
        assert!(is_icu_message_start("  {count,select,male {he}}"));
        assert!(is_icu_message_start("{ VAR_SELECT , select , a {b}}"));
        assert!(!is_icu_message_start("{count} items"));
        assert!(!is_icu_message_start("Hello {VAR_PLURAL, plural, =0 {x}}"));
        assert!(!is_icu_message_start("{{0}}"));
    }

    #[test]
    fn test_parse_plural() {
        let syntax =
            parse("{VAR_PLURAL, plural, =0 {just now} =1 {one minute ago} other {<x id=\"INTERPOLATION\"/> minutes ago} }")
                .unwrap();
        assert_eq!(syntax.variable, "VAR_PLURAL");
        assert!(syntax.is_plural);
        assert_eq!(syntax.categories.len(), 3);
        assert_eq!(syntax.categories[0], ("=0".to_string(), "just now".to_string()));
        assert_eq!(
            syntax.categories[2].1,
            "<x id=\"INTERPOLATION\"/> minutes ago"
        );
    }

    #[test]
    fn test_parse_select_with_nested_message() {
        let syntax = parse(
            "{gender, select, male {he {VAR_PLURAL, plural, =1 {one} other {many}}} female {she} other {they}}",
        )
        .unwrap();
        assert!(!syntax.is_plural);
        assert_eq!(
            syntax.categories[0].1,
            "he {VAR_PLURAL, plural, =1 {one} other {many}}"
        );
        assert_eq!(syntax.categories[2].0, "other");
    }

    #[test]
    fn test_parse_offset_and_quotes() {
        let syntax = parse("{n, plural, offset:1 one {it''s '{x}'} other {# items}}").unwrap();
        assert_eq!(syntax.offset, Some(1));
        assert_eq!(syntax.categories[0].1, "it''s '{x}'");
    }

    #[test]
    fn test_markup_braces_are_not_counted() {
        let syntax =
            parse("{VAR_SELECT, select, a {<x id=\"INTERPOLATION\" equiv-text=\"{{ a }\"/>}}").unwrap();
        assert_eq!(
            syntax.categories[0].1,
            "<x id=\"INTERPOLATION\" equiv-text=\"{{ a }\"/>"
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("VAR_PLURAL, plural, =0 {a}}").is_err());
        assert!(parse("{VAR, choice, a {b}}").is_err());
        assert!(parse("{VAR_PLURAL, plural, =0 {a}").is_err());
        assert!(parse("{VAR_PLURAL, plural, =0 {a}} trailing").is_err());
        assert!(parse("{VAR_PLURAL, plural, }").is_err());
        assert!(parse("{VAR_PLURAL, plural, weird {a}}").is_err());
        assert!(parse("{VAR_SELECT, select, a {x} a {y}}").is_err());
        assert!(parse("{VAR_SELECT, select, a {x <b}}").is_err());
    }
}
