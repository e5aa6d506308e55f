//! Tokenizer for normalized strings, the editable rendering of a message.
//!
//! The syntax is the one produced by `DisplayFormat::Default`:
//! `{{n}}` placeholders, `<ICU-Message-Ref_n/>` references and literal
//! `<tag>`, `<tag id="n">`, `</tag>`, `<tag/>` markup. Everything else is text,
//! taken verbatim: a `<` that does not form a tag and a `{{` that does not
//! form a numeric placeholder are just characters.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

lazy_static! {
    static ref TOKEN_REGEX: Regex = Regex::new(concat!(
        r"\{\{\s*(?P<placeholder>\d+)\s*\}\}",
        r"|<ICU-Message-Ref_(?P<icuref>\d+)\s*/>",
        r#"|<(?P<close>/)?(?P<tag>[a-zA-Z][a-zA-Z0-9_-]*)(?:\s+id="(?P<id>\d+)")?\s*(?P<empty>/)?>"#,
    ))
    .unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NormalizedToken {
    Text(String),
    /// `{{n}}`. May also denote an ICU message reference; the caller decides
    /// with the help of the source message.
    Placeholder(usize),
    IcuMessageRef(usize),
    StartTag { tag_name: String, id_counter: usize },
    EndTag { tag_name: String },
    EmptyTag { tag_name: String, id_counter: usize },
}

pub(crate) fn tokenize(text: &str) -> Result<Vec<NormalizedToken>, Error> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in TOKEN_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut tokens, &text[last..whole.start()]);
        last = whole.end();

        let token = if let Some(index) = caps.name("placeholder") {
            NormalizedToken::Placeholder(parse_index(index.as_str())?)
        } else if let Some(index) = caps.name("icuref") {
            NormalizedToken::IcuMessageRef(parse_index(index.as_str())?)
        } else {
            let tag_name = caps
                .name("tag")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let id_counter = match caps.name("id") {
                Some(id) => parse_index(id.as_str())?,
                None => 0,
            };
            if caps.name("close").is_some() {
                NormalizedToken::EndTag { tag_name }
            } else if caps.name("empty").is_some() {
                NormalizedToken::EmptyTag {
                    tag_name,
                    id_counter,
                }
            } else {
                NormalizedToken::StartTag {
                    tag_name,
                    id_counter,
                }
            }
        };
        tokens.push(token);
    }
    push_text(&mut tokens, &text[last..]);

    Ok(tokens)
}

fn push_text(tokens: &mut Vec<NormalizedToken>, text: &str) {
    if !text.is_empty() {
        tokens.push(NormalizedToken::Text(text.to_string()));
    }
}

fn parse_index(digits: &str) -> Result<usize, Error> {
    digits
        .parse()
        .map_err(|_| Error::NormalizedSyntax(format!("index {digits} is out of range")))
}
