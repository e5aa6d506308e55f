//! XLIFF 2.0 files.
//!
//! ```xml
//! <xliff version="2.0" xmlns="urn:oasis:names:tc:xliff:document:2.0" srcLang="en" trgLang="de">
//!   <file id="ngi18n" original="ng.template">
//!     <unit id="greeting">
//!       <notes>
//!         <note category="description">Greeting</note>
//!         <note category="location">app/app.component.html:3</note>
//!       </notes>
//!       <segment state="translated">
//!         <source>Hello <ph id="0" equiv="INTERPOLATION" disp="{{ name }}"/></source>
//!         <target>Hallo <ph id="0" equiv="INTERPOLATION" disp="{{ name }}"/></target>
//!       </segment>
//!     </unit>
//!   </file>
//! </xliff>
//! ```
//!
//! Languages live on the root element, the translation state on `segment`.

use log::{debug, warn};

use crate::{
    dom::{Document, Element},
    error::Error,
    formats::{FormatType, check_root, insert_after, message_nodes, root_mut},
    parsed_message::ParsedMessage,
    traits::{FileFormat, TranslationMessagesFile},
    types::{TransUnit, TranslationState},
};

const VERSION: &str = "2.0";
const UNIT: &str = "unit";
const SEGMENT: &str = "segment";

#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    document: Document,
}

impl FileFormat for Format {
    fn from_xml_str(content: &str) -> Result<Self, Error> {
        let document = Document::parse(content)?;
        check_root(&document, "xliff")?;
        match document.root().and_then(|root| root.attribute("version")) {
            Some(VERSION) => Ok(Format { document }),
            version => Err(Error::InvalidResource(format!(
                "expected XLIFF version {VERSION}, found {}",
                version.unwrap_or("none")
            ))),
        }
    }

    fn document(&self) -> &Document {
        &self.document
    }
}

impl Format {
    fn root_attribute(&self, name: &str) -> Option<String> {
        self.document
            .root()?
            .attribute(name)
            .map(str::to_string)
    }

    fn unit_element_mut(&mut self, id: &str) -> Result<&mut Element, Error> {
        root_mut(&mut self.document)?
            .find_descendant_mut(&|e: &Element| e.local_name() == UNIT && e.attribute("id") == Some(id))
            .ok_or_else(|| Error::InvalidResource(format!("no unit with id \"{id}\"")))
    }

    /// A copy of this file for translation into `language`. With
    /// `copy_content` every target is a copy of its source in state
    /// `initial`, otherwise targets and states are removed.
    pub fn create_translation_file_for_language(
        &self,
        language: &str,
        copy_content: bool,
    ) -> Result<Format, Error> {
        let mut translation = self.clone();
        translation.set_target_language(language)?;
        for segment in root_mut(&mut translation.document)?.elements_by_tag_name_mut(SEGMENT) {
            segment.remove_descendant(&|e: &Element| e.local_name() == "target");
            if !copy_content {
                segment.remove_attribute("state");
                continue;
            }
            let Some(source) = segment.child_element("source") else {
                continue;
            };
            let mut target = Element::new("target");
            target.children = source.children.clone();
            insert_after(segment, "source", target);
            segment.set_attribute("state", TranslationState::New.xliff2_state());
        }
        debug!("created XLIFF 2.0 translation file for {language}");
        Ok(translation)
    }
}

impl TranslationMessagesFile for Format {
    fn format_type(&self) -> FormatType {
        FormatType::Xliff2
    }

    fn source_language(&self) -> Option<String> {
        self.root_attribute("srcLang")
    }

    fn target_language(&self) -> Option<String> {
        self.root_attribute("trgLang")
    }

    fn set_target_language(&mut self, language: &str) -> Result<(), Error> {
        root_mut(&mut self.document)?.set_attribute("trgLang", language);
        Ok(())
    }

    fn trans_units(&self) -> Result<Vec<TransUnit>, Error> {
        let parser = self.message_parser();
        let Some(root) = self.document.root() else {
            return Ok(Vec::new());
        };
        let mut units = Vec::new();
        for element in root.elements_by_tag_name(UNIT) {
            let Some(id) = element.attribute("id") else {
                warn!("skipping XLIFF 2.0 unit without id");
                continue;
            };
            let Some(segment) = element.child_element(SEGMENT) else {
                warn!("skipping XLIFF 2.0 unit \"{id}\" without segment");
                continue;
            };
            let Some(source_element) = segment.child_element("source") else {
                warn!("skipping XLIFF 2.0 unit \"{id}\" without source");
                continue;
            };
            let source = parser.create_normalized_message_from_xml(source_element, None)?;
            let target = segment
                .child_element("target")
                .map(|target| parser.create_normalized_message_from_xml(target, Some(&source)))
                .transpose()?;
            let state = segment
                .attribute("state")
                .and_then(TranslationState::from_xliff2_state);
            let notes = notes(element);
            let note = |category: &str| {
                notes
                    .iter()
                    .find(|(c, _)| c == category)
                    .map(|(_, text)| text.clone())
            };
            units.push(TransUnit {
                id: id.to_string(),
                source,
                target,
                state,
                description: note("description"),
                meaning: note("meaning"),
                source_references: notes
                    .iter()
                    .filter(|(category, _)| category == "location")
                    .filter_map(|(_, location)| location.parse().ok())
                    .collect(),
            });
        }
        Ok(units)
    }

    fn set_translation(
        &mut self,
        id: &str,
        message: &ParsedMessage,
        state: TranslationState,
    ) -> Result<(), Error> {
        let content = message_nodes(message, &self.message_parser())?;
        let segment = self
            .unit_element_mut(id)?
            .child_element_mut(SEGMENT)
            .ok_or_else(|| Error::InvalidResource(format!("unit \"{id}\" has no segment")))?;
        match segment.child_element_mut("target") {
            Some(target) => target.children = content,
            None => {
                let mut target = Element::new("target");
                target.children = content;
                insert_after(segment, "source", target);
            }
        }
        segment.set_attribute("state", state.xliff2_state());
        Ok(())
    }

    fn remove_trans_unit(&mut self, id: &str) -> Result<bool, Error> {
        Ok(root_mut(&mut self.document)?
            .remove_descendant(&|e: &Element| e.local_name() == UNIT && e.attribute("id") == Some(id)))
    }
}

/// `(category, text)` of the notes of a unit.
fn notes(unit: &Element) -> Vec<(String, String)> {
    unit.child_element("notes")
        .into_iter()
        .flat_map(|notes| notes.child_elements())
        .filter(|e| e.local_name() == "note")
        .filter_map(|note| {
            let category = note.attribute("category")?;
            Some((category.to_string(), note.text_content()))
        })
        .collect()
}
