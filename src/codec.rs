//! Format independent access to translation files.
//!
//! [`TranslationFile`] wraps the four supported file formats. The format of a
//! file is taken from the caller, the file extension (`.xmb`, `.xtb`) or, for
//! everything else, from the root element of the content.

use std::path::Path;

use log::debug;
use quick_xml::{Reader, events::Event};
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    formats::*,
    parsed_message::ParsedMessage,
    serializer::SerializerOptions,
    traits::{FileFormat, TranslationMessagesFile},
    types::{TransUnit, TranslationState},
};

/// A translation file of any supported format.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationFile {
    Xliff(XliffFormat),
    Xliff2(Xliff2Format),
    Xmb(XmbFormat),
    Xtb(XtbFormat),
}

impl TranslationFile {
    /// Parses `content` as a file of the given format.
    pub fn from_str_with_type(content: &str, format_type: FormatType) -> Result<Self, Error> {
        Ok(match format_type {
            FormatType::Xliff => TranslationFile::Xliff(XliffFormat::from_xml_str(content)?),
            FormatType::Xliff2 => TranslationFile::Xliff2(Xliff2Format::from_xml_str(content)?),
            FormatType::Xmb => TranslationFile::Xmb(XmbFormat::from_xml_str(content)?),
            FormatType::Xtb => TranslationFile::Xtb(XtbFormat::from_xml_str(content)?),
        })
    }

    /// Parses `content`, detecting the format from its root element.
    pub fn from_content(content: &str) -> Result<Self, Error> {
        let format_type = infer_format_from_content(content)?;
        Self::from_str_with_type(content, format_type)
    }

    /// Reads a file. Without an explicit `format_type` the format is inferred
    /// from the extension, then from the content.
    pub fn read_from<P: AsRef<Path>>(path: P, format_type: Option<FormatType>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let format_type = match format_type.or_else(|| infer_format_from_path(path)) {
            Some(format_type) => format_type,
            None => infer_format_from_content(&content)?,
        };
        debug!("reading {} as {format_type}", path.display());
        Self::from_str_with_type(&content, format_type)
    }

    /// Attaches the XMB master of an XTB file.
    pub fn with_master(self, master: XmbFormat) -> Result<Self, Error> {
        match self {
            TranslationFile::Xtb(format) => Ok(TranslationFile::Xtb(format.with_master(master))),
            other => Err(Error::invalid_operation(format!(
                "only XTB files have a master file, not {}",
                other.format_type()
            ))),
        }
    }

    /// The target language as a language identifier, if it is a valid one.
    pub fn target_language_identifier(&self) -> Option<LanguageIdentifier> {
        self.target_language()?.parse().ok()
    }

    /// A new file for translating the messages of this one into `language`.
    ///
    /// XLIFF files are copied, an XMB file produces an XTB bundle, an XTB file
    /// produces another bundle for its master.
    pub fn create_translation_file_for_language(
        &self,
        language: &str,
        copy_content: bool,
    ) -> Result<TranslationFile, Error> {
        language.parse::<LanguageIdentifier>().map_err(|e| {
            Error::InvalidResource(format!("invalid language code \"{language}\": {e}"))
        })?;
        Ok(match self {
            TranslationFile::Xliff(format) => TranslationFile::Xliff(
                format.create_translation_file_for_language(language, copy_content)?,
            ),
            TranslationFile::Xliff2(format) => TranslationFile::Xliff2(
                format.create_translation_file_for_language(language, copy_content)?,
            ),
            TranslationFile::Xmb(format) => TranslationFile::Xtb(
                format.create_translation_file_for_language(language, copy_content)?,
            ),
            TranslationFile::Xtb(format) => {
                let master = format.master().ok_or_else(|| {
                    Error::InvalidResource(
                        "an XTB file needs its XMB master file to create a new bundle".to_string(),
                    )
                })?;
                TranslationFile::Xtb(master.create_translation_file_for_language(language, copy_content)?)
            }
        })
    }

    pub fn to_string_with_options(&self, options: &SerializerOptions) -> Result<String, Error> {
        match self {
            TranslationFile::Xliff(format) => format.to_string_with_options(options),
            TranslationFile::Xliff2(format) => format.to_string_with_options(options),
            TranslationFile::Xmb(format) => format.to_string_with_options(options),
            TranslationFile::Xtb(format) => format.to_string_with_options(options),
        }
    }

    /// Writes the file, pretty printed when `beautify` is set.
    pub fn write_to<P: AsRef<Path>>(&self, path: P, beautify: bool) -> Result<(), Error> {
        let options = if beautify {
            self.beautify_options()
        } else {
            SerializerOptions::new()
        };
        std::fs::write(path, self.to_string_with_options(&options)?)?;
        Ok(())
    }

    fn messages_file(&self) -> &dyn TranslationMessagesFile {
        match self {
            TranslationFile::Xliff(format) => format,
            TranslationFile::Xliff2(format) => format,
            TranslationFile::Xmb(format) => format,
            TranslationFile::Xtb(format) => format,
        }
    }

    fn messages_file_mut(&mut self) -> &mut dyn TranslationMessagesFile {
        match self {
            TranslationFile::Xliff(format) => format,
            TranslationFile::Xliff2(format) => format,
            TranslationFile::Xmb(format) => format,
            TranslationFile::Xtb(format) => format,
        }
    }
}

impl TranslationMessagesFile for TranslationFile {
    fn format_type(&self) -> FormatType {
        match self {
            TranslationFile::Xliff(_) => FormatType::Xliff,
            TranslationFile::Xliff2(_) => FormatType::Xliff2,
            TranslationFile::Xmb(_) => FormatType::Xmb,
            TranslationFile::Xtb(_) => FormatType::Xtb,
        }
    }

    fn source_language(&self) -> Option<String> {
        self.messages_file().source_language()
    }

    fn target_language(&self) -> Option<String> {
        self.messages_file().target_language()
    }

    fn set_target_language(&mut self, language: &str) -> Result<(), Error> {
        self.messages_file_mut().set_target_language(language)
    }

    fn trans_units(&self) -> Result<Vec<TransUnit>, Error> {
        self.messages_file().trans_units()
    }

    fn set_translation(
        &mut self,
        id: &str,
        message: &ParsedMessage,
        state: TranslationState,
    ) -> Result<(), Error> {
        self.messages_file_mut().set_translation(id, message, state)
    }

    fn remove_trans_unit(&mut self, id: &str) -> Result<bool, Error> {
        self.messages_file_mut().remove_trans_unit(id)
    }
}

/// Detects the format from the root element: `xliff` (version `2.0` or
/// `1.2`), `messagebundle` or `translationbundle`.
pub fn infer_format_from_content(content: &str) -> Result<FormatType, Error> {
    let mut reader = Reader::from_str(content);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return match e.local_name().as_ref() {
                    b"xliff" => {
                        let version = e
                            .try_get_attribute("version")
                            .map_err(|err| Error::malformed_xml(err.to_string()))?
                            .map(|attr| attr.unescape_value().map(|v| v.into_owned()))
                            .transpose()?;
                        match version.as_deref() {
                            Some(v) if v.starts_with('2') => Ok(FormatType::Xliff2),
                            _ => Ok(FormatType::Xliff),
                        }
                    }
                    b"messagebundle" => Ok(FormatType::Xmb),
                    b"translationbundle" => Ok(FormatType::Xtb),
                    other => Err(Error::UnknownFormat(String::from_utf8_lossy(other).into_owned())),
                };
            }
            Event::Eof => {
                return Err(Error::UnknownFormat("document without root element".to_string()));
            }
            _ => {}
        }
    }
}

/// Format implied by the file extension. `.xlf` files may be either XLIFF
/// version and give `None`.
pub fn infer_format_from_path<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    match path.as_ref().extension().and_then(|s| s.to_str()) {
        Some("xmb") => Some(FormatType::Xmb),
        Some("xtb") => Some(FormatType::Xtb),
        _ => None,
    }
}
