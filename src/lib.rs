//! Translation message interchange for XLIFF 1.2, XLIFF 2.0 and XMB/XTB files.
//!
//! Messages are read into a format independent [`ParsedMessage`] made of text,
//! placeholders, tags and ICU plural/select messages. A message can be shown
//! to translators as a normalized string such as `Hello {{0}}, <b>welcome</b>`,
//! translated with such a string and written back as the native markup of any
//! of the supported formats.
//!
//! ```no_run
//! use i18ncodec::{TranslationFile, TranslationMessagesFile, TranslationState};
//!
//! let mut file = TranslationFile::read_from("messages.de.xlf", None)?;
//! for unit in file.trans_units()? {
//!     let translation = unit.translate(&unit.source.to_string())?;
//!     file.set_translation(&unit.id, &translation, TranslationState::New)?;
//! }
//! file.write_to("messages.de.xlf", true)?;
//! # Ok::<(), i18ncodec::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod codec;
pub mod codecs;
pub mod dom;
pub mod error;
pub mod formats;
pub mod icu_message;
pub mod icu_tokenizer;
pub mod message_parser;
mod normalized;
pub mod parsed_message;
pub mod parts;
pub mod serializer;
pub mod tag_mapping;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export most used types for easy consumption
pub use crate::{
    codec::{TranslationFile, infer_format_from_content, infer_format_from_path},
    error::Error,
    formats::FormatType,
    icu_message::{
        IcuCategoryTranslation, IcuMessage, IcuMessageCategory, IcuMessageTranslation,
        PluralCategory,
    },
    message_parser::{FormatMessageCodec, MessageParser},
    parsed_message::ParsedMessage,
    parts::{DisplayFormat, ParsedMessagePart},
    serializer::SerializerOptions,
    traits::{FileFormat, TranslationMessagesFile},
    types::{SourceReference, TransUnit, TranslationState},
    validation::{ValidationCheck, ValidationErrors},
};
