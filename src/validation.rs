//! Comparison of a translated message against the message it was translated
//! from.
//!
//! Added placeholders and ICU message references are errors, a translation
//! containing them cannot be rendered. Removed placeholders and added or removed
//! tags are warnings: dropping decorative markup can be a legitimate choice
//! of the translator.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

use crate::{parsed_message::ParsedMessage, parts::ParsedMessagePart};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationCheck {
    PlaceholderAdded,
    PlaceholderRemoved,
    IcuMessageRefAdded,
    IcuMessageRefRemoved,
    TagAdded,
    TagRemoved,
}

impl ValidationCheck {
    pub fn name(&self) -> &'static str {
        match self {
            ValidationCheck::PlaceholderAdded => "placeholderAdded",
            ValidationCheck::PlaceholderRemoved => "placeholderRemoved",
            ValidationCheck::IcuMessageRefAdded => "icuMessageRefAdded",
            ValidationCheck::IcuMessageRefRemoved => "icuMessageRefRemoved",
            ValidationCheck::TagAdded => "tagAdded",
            ValidationCheck::TagRemoved => "tagRemoved",
        }
    }
}

impl Display for ValidationCheck {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Findings of one validation run, keyed by check. Serializes as a plain
/// object, e.g. `{"placeholderAdded": "added placeholder 2, ..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<ValidationCheck, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, check: ValidationCheck, message: impl Into<String>) {
        self.0.insert(check, message.into());
    }

    pub fn get(&self, check: ValidationCheck) -> Option<&str> {
        self.0.get(&check).map(String::as_str)
    }

    pub fn contains(&self, check: ValidationCheck) -> bool {
        self.0.contains_key(&check)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ValidationCheck, &str)> {
        self.0.iter().map(|(check, message)| (*check, message.as_str()))
    }

    fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let lines: Vec<String> = self
            .iter()
            .map(|(check, message)| format!("{check}: {message}"))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

/// Placeholders, ICU references and tags used anywhere in a message,
/// including all categories of an ICU message.
#[derive(Debug, Default)]
struct MessageContent {
    placeholders: BTreeSet<usize>,
    icu_message_refs: BTreeSet<usize>,
    tags: BTreeSet<String>,
}

impl MessageContent {
    fn of(message: &ParsedMessage) -> Self {
        let mut content = MessageContent::default();
        content.collect(message);
        content
    }

    fn collect(&mut self, message: &ParsedMessage) {
        for part in message.parts() {
            match part {
                ParsedMessagePart::Placeholder { index, .. } => {
                    self.placeholders.insert(*index);
                }
                ParsedMessagePart::IcuMessageRef { index, .. } => {
                    self.icu_message_refs.insert(*index);
                }
                ParsedMessagePart::StartTag { tag_name, .. }
                | ParsedMessagePart::EmptyTag { tag_name, .. } => {
                    self.tags.insert(tag_name.clone());
                }
                ParsedMessagePart::IcuMessage(icu) => {
                    for category in icu.categories() {
                        self.collect(category.message());
                    }
                }
                ParsedMessagePart::Text { .. } | ParsedMessagePart::EndTag { .. } => {}
            }
        }
    }
}

pub(crate) fn errors(translation: &ParsedMessage, source: &ParsedMessage) -> Option<ValidationErrors> {
    let translated = MessageContent::of(translation);
    let original = MessageContent::of(source);
    let mut errors = ValidationErrors::new();

    let added = difference(&translated.placeholders, &original.placeholders);
    if !added.is_empty() {
        errors.insert(ValidationCheck::PlaceholderAdded, added_message("placeholder", &added));
    }
    let removed = difference(&original.icu_message_refs, &translated.icu_message_refs);
    if !removed.is_empty() {
        errors.insert(
            ValidationCheck::IcuMessageRefRemoved,
            removed_message("ICU message reference", &removed),
        );
    }
    let added = difference(&translated.icu_message_refs, &original.icu_message_refs);
    if !added.is_empty() {
        errors.insert(
            ValidationCheck::IcuMessageRefAdded,
            added_message("ICU message reference", &added),
        );
    }

    errors.into_option()
}

pub(crate) fn warnings(translation: &ParsedMessage, source: &ParsedMessage) -> Option<ValidationErrors> {
    let translated = MessageContent::of(translation);
    let original = MessageContent::of(source);
    let mut warnings = ValidationErrors::new();

    let removed = difference(&original.placeholders, &translated.placeholders);
    if !removed.is_empty() {
        warnings.insert(
            ValidationCheck::PlaceholderRemoved,
            removed_message("placeholder", &removed),
        );
    }
    let removed = tag_difference(&original.tags, &translated.tags);
    if !removed.is_empty() {
        warnings.insert(ValidationCheck::TagRemoved, removed_message("tag", &removed));
    }
    let added = tag_difference(&translated.tags, &original.tags);
    if !added.is_empty() {
        warnings.insert(ValidationCheck::TagAdded, added_message("tag", &added));
    }

    warnings.into_option()
}

fn difference(left: &BTreeSet<usize>, right: &BTreeSet<usize>) -> Vec<String> {
    left.difference(right).map(usize::to_string).collect()
}

fn tag_difference(left: &BTreeSet<String>, right: &BTreeSet<String>) -> Vec<String> {
    left.difference(right).map(|tag| format!("<{tag}>")).collect()
}

fn added_message(kind: &str, items: &[String]) -> String {
    if items.len() == 1 {
        format!("added {kind} {}, which is not in original message", items[0])
    } else {
        format!(
            "added {kind}s {}, which are not in original message",
            items.join(", ")
        )
    }
}

fn removed_message(kind: &str, items: &[String]) -> String {
    let plural = if items.len() == 1 { "" } else { "s" };
    format!("removed {kind}{plural} {} from original message", items.join(", "))
}
