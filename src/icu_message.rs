//! ICU plural and select messages.
//!
//! An [`IcuMessage`] is an ordered list of (category label, sub message) pairs.
//! Sub messages are ordinary [`ParsedMessage`]s in the dialect of the parser
//! that produced the ICU message.

use std::{
    collections::HashSet,
    fmt::{Display, Formatter},
    str::FromStr,
};

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error, icu_tokenizer::is_icu_message_start, message_parser::MessageParser,
    parsed_message::ParsedMessage, parts::DisplayFormat,
};

lazy_static! {
    static ref EXACT_VALUE_REGEX: Regex = Regex::new(r"^=\d+$").unwrap();
}

/// CLDR plural keyword categories.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(PluralCategory::Zero),
            "one" => Ok(PluralCategory::One),
            "two" => Ok(PluralCategory::Two),
            "few" => Ok(PluralCategory::Few),
            "many" => Ok(PluralCategory::Many),
            "other" => Ok(PluralCategory::Other),
            _ => Err(format!("Unknown plural category: {}", s)),
        }
    }
}

impl Display for PluralCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `=<digits>` or one of the CLDR keywords.
pub fn is_valid_plural_category(category: &str) -> bool {
    EXACT_VALUE_REGEX.is_match(category) || category.parse::<PluralCategory>().is_ok()
}

pub fn check_valid_plural_category(category: &str) -> Result<(), Error> {
    if is_valid_plural_category(category) {
        return Ok(());
    }
    Err(Error::InvalidPluralCategory {
        category: category.to_string(),
        allowed: PluralCategory::ALL
            .iter()
            .map(PluralCategory::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// One branch of an ICU message.
#[derive(Debug, Clone, PartialEq)]
pub struct IcuMessageCategory {
    category: String,
    message: ParsedMessage,
}

impl IcuMessageCategory {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn message(&self) -> &ParsedMessage {
        &self.message
    }

    /// The keyword category, `None` for exact value categories and select labels.
    pub fn plural_category(&self) -> Option<PluralCategory> {
        self.category.parse().ok()
    }

    /// `Some(n)` for an `=n` category.
    pub fn exact_value(&self) -> Option<u64> {
        self.category.strip_prefix('=')?.parse().ok()
    }
}

#[derive(Debug, Clone)]
pub struct IcuMessage {
    parser: MessageParser,
    is_plural: bool,
    categories: Vec<IcuMessageCategory>,
}

impl PartialEq for IcuMessage {
    fn eq(&self, other: &Self) -> bool {
        self.is_plural == other.is_plural && self.categories == other.categories
    }
}

impl IcuMessage {
    pub fn new(parser: MessageParser, is_plural: bool) -> Self {
        IcuMessage {
            parser,
            is_plural,
            categories: Vec::new(),
        }
    }

    /// Appends a category. Labels are unique; plural labels must be valid.
    pub fn add_category(
        &mut self,
        category: impl Into<String>,
        message: ParsedMessage,
    ) -> Result<(), Error> {
        let category = category.into();
        if self.is_plural {
            check_valid_plural_category(&category)?;
        }
        if self.category(&category).is_some() {
            return Err(Error::InvalidStructure(format!(
                "duplicate ICU category \"{category}\""
            )));
        }
        self.categories.push(IcuMessageCategory { category, message });
        Ok(())
    }

    pub fn categories(&self) -> &[IcuMessageCategory] {
        &self.categories
    }

    pub fn category(&self, category: &str) -> Option<&IcuMessageCategory> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn is_plural_message(&self) -> bool {
        self.is_plural
    }

    pub fn is_select_message(&self) -> bool {
        !self.is_plural
    }

    /// `{VAR_PLURAL, plural, =0 {...} other {...}}`. The variable name of the
    /// extracted message is not kept; each kind uses its fixed name.
    pub fn as_native_string(&self) -> String {
        self.render(|message| message.as_native_string())
    }

    pub fn as_display_string(&self, format: DisplayFormat) -> String {
        self.render(|message| message.as_display_string(format))
    }

    fn render<F: Fn(&ParsedMessage) -> String>(&self, content: F) -> String {
        let (variable, kind) = if self.is_plural {
            ("VAR_PLURAL", "plural")
        } else {
            ("VAR_SELECT", "select")
        };
        let choices: String = self
            .categories
            .iter()
            .map(|c| format!(" {} {{{}}}", c.category, content(&c.message)))
            .collect();
        format!("{{{variable}, {kind},{choices}}}")
    }

    /// Builds a translated copy. Categories without an entry in `translation`
    /// keep their original message. New categories are only accepted for
    /// plural messages and must be valid plural categories.
    pub fn translate(&self, translation: &IcuMessageTranslation) -> Result<IcuMessage, Error> {
        let mut translated = IcuMessage::new(self.parser.clone(), self.is_plural);
        let mut consumed: HashSet<&str> = HashSet::new();

        for category in &self.categories {
            let message = match translation.get(&category.category) {
                None => category.message.clone(),
                Some(entry) => {
                    consumed.insert(&category.category);
                    self.translate_category(&category.category, entry, Some(&category.message))?
                }
            };
            translated.add_category(category.category.clone(), message)?;
        }

        for (category, entry) in translation.iter() {
            if consumed.contains(category.as_str()) {
                continue;
            }
            if !self.is_plural {
                return Err(Error::NewSelectCategory(category.clone()));
            }
            check_valid_plural_category(category)?;
            let message = self.translate_category(category, entry, None)?;
            translated.add_category(category.clone(), message)?;
        }

        Ok(translated)
    }

    fn translate_category(
        &self,
        category: &str,
        entry: &IcuCategoryTranslation,
        original: Option<&ParsedMessage>,
    ) -> Result<ParsedMessage, Error> {
        match entry {
            IcuCategoryTranslation::Text(text) if is_icu_message_start(text) => {
                Err(Error::unsupported(format!(
                    "embedded ICU message in translation of category \"{category}\""
                )))
            }
            IcuCategoryTranslation::Text(text) => {
                self.parser.parse_normalized_string(text, original)
            }
            IcuCategoryTranslation::Nested(_) => Err(Error::unsupported(format!(
                "translation of embedded ICU message in category \"{category}\""
            ))),
        }
    }
}

/// Translation of an ICU message: category label → translated text.
///
/// Deserializes from a JSON object such as `{"=0": "none", "other": "many"}`;
/// insertion order is kept so new plural categories are appended in the
/// order they were given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IcuMessageTranslation(IndexMap<String, IcuCategoryTranslation>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IcuCategoryTranslation {
    /// Normalized string of the category message.
    Text(String),
    /// Translation of an ICU message embedded in the category. Not supported
    /// by [`IcuMessage::translate`].
    Nested(IcuMessageTranslation),
}

impl IcuMessageTranslation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(category, IcuCategoryTranslation::Text(text.into()));
        self
    }

    pub fn with_nested(mut self, category: impl Into<String>, nested: IcuMessageTranslation) -> Self {
        self.insert(category, IcuCategoryTranslation::Nested(nested));
        self
    }

    pub fn insert(&mut self, category: impl Into<String>, translation: IcuCategoryTranslation) {
        self.0.insert(category.into(), translation);
    }

    pub fn get(&self, category: &str) -> Option<&IcuCategoryTranslation> {
        self.0.get(category)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, IcuCategoryTranslation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IcuMessageTranslation {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut translation = IcuMessageTranslation::new();
        for (category, text) in iter {
            translation.insert(category, IcuCategoryTranslation::Text(text.into()));
        }
        translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plural_message() -> IcuMessage {
        let parser = MessageParser::xliff();
        parser
            .parse_icu_message(
                "{VAR_PLURAL, plural, =0 {nothing} =1 {one <x id=\"START_BOLD_TEXT\" ctype=\"x-b\"/>item<x id=\"CLOSE_BOLD_TEXT\" ctype=\"x-b\"/>} other {many}}",
                None,
            )
            .unwrap()
            .icu_message()
            .cloned()
            .unwrap()
    }

    fn select_message() -> IcuMessage {
        let parser = MessageParser::xliff();
        parser
            .parse_icu_message(
                "{VAR_SELECT, select, male {he} female {she} other {they}}",
                None,
            )
            .unwrap()
            .icu_message()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_plural_category_parsing() {
        assert_eq!("few".parse::<PluralCategory>(), Ok(PluralCategory::Few));
        assert!("Few".parse::<PluralCategory>().is_err());
        assert_eq!(PluralCategory::Many.to_string(), "many");
        assert!(is_valid_plural_category("=12"));
        assert!(is_valid_plural_category("other"));
        assert!(!is_valid_plural_category("=x"));
        assert!(!is_valid_plural_category("weird"));
    }

    #[test]
    fn test_check_valid_plural_category_lists_allowed() {
        let err = check_valid_plural_category("weird").unwrap_err();
        assert!(matches!(
            &err,
            Error::InvalidPluralCategory { category, allowed }
                if category == "weird" && allowed == "zero, one, two, few, many, other"
        ));
    }

    #[test]
    fn test_native_and_display_string() {
        let message = plural_message();
        assert!(message.is_plural_message());
        assert_eq!(message.categories().len(), 3);
        assert_eq!(
            message.as_native_string(),
            "{VAR_PLURAL, plural, =0 {nothing} =1 {one <x id=\"START_BOLD_TEXT\" ctype=\"x-b\"/>item<x id=\"CLOSE_BOLD_TEXT\" ctype=\"x-b\"/>} other {many}}"
        );
        assert_eq!(
            message.as_display_string(DisplayFormat::Default),
            "{VAR_PLURAL, plural, =0 {nothing} =1 {one <b>item</b>} other {many}}"
        );
        assert_eq!(message.categories()[0].exact_value(), Some(0));
        assert_eq!(
            message.categories()[2].plural_category(),
            Some(PluralCategory::Other)
        );
    }

    #[test]
    fn test_translate_keeps_untranslated_categories() {
        let message = plural_message();
        let translated = message
            .translate(&IcuMessageTranslation::new().with("other", "viele"))
            .unwrap();
        assert_eq!(translated.categories().len(), 3);
        assert_eq!(translated.categories()[0], message.categories()[0]);
        assert_eq!(translated.categories()[1], message.categories()[1]);
        assert_eq!(
            translated.categories()[2].message().as_display_string(DisplayFormat::Default),
            "viele"
        );
    }

    #[test]
    fn test_translate_adds_plural_category() {
        let message = plural_message();
        let translated = message
            .translate(&IcuMessageTranslation::new().with("=2", "two"))
            .unwrap();
        assert_eq!(translated.categories().len(), 4);
        assert_eq!(translated.categories()[3].category(), "=2");

        let err = message
            .translate(&IcuMessageTranslation::new().with("weird", "x"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPluralCategory { .. }));
    }

    #[test]
    fn test_translate_select_rejects_new_category() {
        let message = select_message();
        let err = message
            .translate(&IcuMessageTranslation::new().with("foo", "X"))
            .unwrap_err();
        assert!(matches!(err, Error::NewSelectCategory(category) if category == "foo"));

        let translated = message
            .translate(&IcuMessageTranslation::new().with("female", "sie"))
            .unwrap();
        assert_eq!(
            translated.as_native_string(),
            "{VAR_SELECT, select, male {he} female {sie} other {they}}"
        );
    }

    #[test]
    fn test_translate_nested_is_unsupported() {
        let message = select_message();
        let nested = IcuMessageTranslation::new().with("other", "x");
        let err = message
            .translate(&IcuMessageTranslation::new().with_nested("male", nested))
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));

        let err = message
            .translate(
                &IcuMessageTranslation::new().with("male", "{VAR_PLURAL, plural, other {x}}"),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_translation_from_json() {
        let translation =
            IcuMessageTranslation::from_json_str(r#"{"=0": "keiner", "other": {"male": "x"}}"#)
                .unwrap();
        assert_eq!(translation.len(), 2);
        assert_eq!(
            translation.get("=0"),
            Some(&IcuCategoryTranslation::Text("keiner".to_string()))
        );
        assert!(matches!(
            translation.get("other"),
            Some(IcuCategoryTranslation::Nested(_))
        ));
        let keys: Vec<&String> = translation.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["=0", "other"]);
    }

    #[test]
    fn test_translation_from_iterator() {
        let translation: IcuMessageTranslation = [("one", "eins"), ("other", "viele")]
            .into_iter()
            .collect();
        assert_eq!(translation.len(), 2);
        assert!(!translation.is_empty());
    }

    #[test]
    fn test_duplicate_category_is_rejected() {
        let parser = MessageParser::xliff();
        let mut message = IcuMessage::new(parser.clone(), false);
        let part = parser.parse_normalized_string("a", None).unwrap();
        message.add_category("a", part.clone()).unwrap();
        assert!(message.add_category("a", part).is_err());
    }
}
