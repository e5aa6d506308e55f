//! Format independent view of the translation units of a file.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::Error, parsed_message::ParsedMessage, parts::DisplayFormat};

/// A single translatable message of a file together with its translation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransUnit {
    /// Unique message identifier (`trans-unit@id`, `unit@id`, `msg@id`).
    pub id: String,

    pub source: ParsedMessage,

    /// The translation, parsed with `source` as its source message so that
    /// [`ParsedMessage::validate`] works on it.
    pub target: Option<ParsedMessage>,

    /// Translation state, `None` for formats without states (XMB/XTB).
    pub state: Option<TranslationState>,

    /// Description for translators.
    pub description: Option<String>,

    /// Meaning used to disambiguate equal source texts.
    pub meaning: Option<String>,

    /// Locations of the message in the application sources.
    pub source_references: Vec<SourceReference>,
}

impl TransUnit {
    pub fn is_translated(&self) -> bool {
        self.target.is_some() && self.state != Some(TranslationState::New)
    }

    /// Translates the source with a normalized string.
    pub fn translate(&self, normalized_string: &str) -> Result<ParsedMessage, Error> {
        self.source.translate(normalized_string)
    }
}

impl Display for TransUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TransUnit {{ id: {}, source: {}, target: {}, state: {:?} }}",
            self.id,
            self.source.as_display_string(DisplayFormat::Default),
            self.target
                .as_ref()
                .map(|t| t.as_display_string(DisplayFormat::Default))
                .unwrap_or_default(),
            self.state
        )
    }
}

/// State of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationState {
    /// Not translated yet (or a copy of the source).
    New,

    /// Translated, not reviewed.
    Translated,

    /// Reviewed and final.
    Final,
}

impl TranslationState {
    /// Maps an XLIFF 1.2 `target@state` value.
    pub fn from_xliff_state(state: &str) -> Option<Self> {
        match state {
            "new" | "needs-translation" | "needs-adaptation" | "needs-l10n" => {
                Some(TranslationState::New)
            }
            "translated"
            | "needs-review-translation"
            | "needs-review-adaptation"
            | "needs-review-l10n" => Some(TranslationState::Translated),
            "final" | "signed-off" => Some(TranslationState::Final),
            _ => None,
        }
    }

    pub fn xliff_state(&self) -> &'static str {
        match self {
            TranslationState::New => "new",
            TranslationState::Translated => "translated",
            TranslationState::Final => "final",
        }
    }

    /// Maps an XLIFF 2.0 `segment@state` value.
    pub fn from_xliff2_state(state: &str) -> Option<Self> {
        match state {
            "initial" => Some(TranslationState::New),
            "translated" | "reviewed" => Some(TranslationState::Translated),
            "final" => Some(TranslationState::Final),
            _ => None,
        }
    }

    pub fn xliff2_state(&self) -> &'static str {
        match self {
            TranslationState::New => "initial",
            TranslationState::Translated => "translated",
            TranslationState::Final => "final",
        }
    }
}

impl FromStr for TranslationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEW" => Ok(TranslationState::New),
            "TRANSLATED" => Ok(TranslationState::Translated),
            "FINAL" => Ok(TranslationState::Final),
            _ => Err(format!("Unknown translation state: {}", s)),
        }
    }
}

impl Display for TranslationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TranslationState::New => "new",
            TranslationState::Translated => "translated",
            TranslationState::Final => "final",
        };
        f.write_str(name)
    }
}

/// `file:line` location of a message in the application sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SourceReference {
    pub source_file: String,
    pub line_number: usize,
}

impl Display for SourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source_file, self.line_number)
    }
}

impl FromStr for SourceReference {
    type Err = String;

    /// Accepts `file:line` and the XLIFF 2.0 range form `file:line,endline`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (file, lines) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| format!("Invalid source reference: {}", s))?;
        let line = lines.split(',').next().unwrap_or(lines).trim();
        let line_number = line
            .parse()
            .map_err(|_| format!("Invalid line number in source reference: {}", s))?;
        Ok(SourceReference {
            source_file: file.to_string(),
            line_number,
        })
    }
}
