use std::io::{BufRead, Read, Write};

use crate::{
    dom::Document,
    error::Error,
    formats::FormatType,
    message_parser::MessageParser,
    parsed_message::ParsedMessage,
    serializer::{self, SerializerOptions},
    types::{TransUnit, TranslationState},
};

/// Reading and writing of a whole file.
pub trait FileFormat: Sized {
    /// Parse from the complete file content.
    fn from_xml_str(content: &str) -> Result<Self, Error>;

    /// Parse from any reader.
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_xml_str(&content)
    }

    /// Parse from file path.
    fn read_from<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(Error::Io)?;
        let reader = std::io::BufReader::new(file);
        Self::from_reader(reader)
    }

    fn document(&self) -> &Document;

    fn to_string_with_options(&self, options: &SerializerOptions) -> Result<String, Error> {
        serializer::serialize_to_string(self.document(), options)
    }

    /// Write to any writer (file, memory, etc.) without reformatting.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.document().to_xml_string().as_bytes())?;
        Ok(())
    }

    /// Write to file path.
    fn write_to<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Error> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        self.to_writer(writer)
    }
}

/// Access to the translation units of a file.
pub trait TranslationMessagesFile {
    fn format_type(&self) -> FormatType;

    /// Parser for the messages of this file.
    fn message_parser(&self) -> MessageParser {
        self.format_type().message_parser()
    }

    fn source_language(&self) -> Option<String>;

    fn target_language(&self) -> Option<String>;

    fn set_target_language(&mut self, language: &str) -> Result<(), Error>;

    fn trans_units(&self) -> Result<Vec<TransUnit>, Error>;

    fn trans_unit(&self, id: &str) -> Result<Option<TransUnit>, Error> {
        Ok(self.trans_units()?.into_iter().find(|unit| unit.id == id))
    }

    fn number_of_trans_units(&self) -> Result<usize, Error> {
        Ok(self.trans_units()?.len())
    }

    fn number_of_untranslated_trans_units(&self) -> Result<usize, Error> {
        Ok(self
            .trans_units()?
            .iter()
            .filter(|unit| !unit.is_translated())
            .count())
    }

    /// Writes `message` as the translation of trans-unit `id`.
    fn set_translation(
        &mut self,
        id: &str,
        message: &ParsedMessage,
        state: TranslationState,
    ) -> Result<(), Error>;

    /// Returns whether a trans-unit with that id existed.
    fn remove_trans_unit(&mut self, id: &str) -> Result<bool, Error>;

    /// Options that pretty print the file without touching message content.
    fn beautify_options(&self) -> SerializerOptions {
        SerializerOptions::new()
            .with_beautify(true)
            .with_mixed_content_elements(self.format_type().mixed_content_elements().iter().copied())
    }
}
