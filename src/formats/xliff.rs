//! XLIFF 1.2 files as written by the Angular extraction tools.
//!
//! ```xml
//! <xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
//!   <file source-language="en" datatype="plaintext" original="ng2.template">
//!     <body>
//!       <trans-unit id="greeting" datatype="html">
//!         <source>Hello <x id="INTERPOLATION" equiv-text="{{ name }}"/></source>
//!         <target state="translated">Hallo <x id="INTERPOLATION" equiv-text="{{ name }}"/></target>
//!         <context-group purpose="location">
//!           <context context-type="sourcefile">app/app.component.html</context>
//!           <context context-type="linenumber">3</context>
//!         </context-group>
//!         <note priority="1" from="description">Greeting</note>
//!       </trans-unit>
//!     </body>
//!   </file>
//! </xliff>
//! ```

use log::{debug, warn};

use crate::{
    dom::{Document, Element},
    error::Error,
    formats::{FormatType, check_root, insert_after, message_nodes, root_mut},
    parsed_message::ParsedMessage,
    traits::{FileFormat, TranslationMessagesFile},
    types::{SourceReference, TransUnit, TranslationState},
};

const VERSION: &str = "1.2";
const TRANS_UNIT: &str = "trans-unit";

#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    document: Document,
}

impl FileFormat for Format {
    fn from_xml_str(content: &str) -> Result<Self, Error> {
        let document = Document::parse(content)?;
        check_root(&document, "xliff")?;
        match document.root().and_then(|root| root.attribute("version")) {
            Some(VERSION) => {}
            version => {
                return Err(Error::InvalidResource(format!(
                    "expected XLIFF version {VERSION}, found {}",
                    version.unwrap_or("none")
                )));
            }
        }
        Ok(Format { document })
    }

    fn document(&self) -> &Document {
        &self.document
    }
}

impl Format {
    fn root(&self) -> Option<&Element> {
        self.document.root()
    }

    fn file_attribute(&self, name: &str) -> Option<String> {
        self.root()?
            .child_element("file")?
            .attribute(name)
            .map(str::to_string)
    }

    fn trans_unit_element_mut(&mut self, id: &str) -> Result<&mut Element, Error> {
        root_mut(&mut self.document)?
            .find_descendant_mut(&|e: &Element| {
                e.local_name() == TRANS_UNIT && e.attribute("id") == Some(id)
            })
            .ok_or_else(|| Error::InvalidResource(format!("no trans-unit with id \"{id}\"")))
    }

    /// A copy of this file for translation into `language`. With
    /// `copy_content` every target is a copy of its source in state `new`,
    /// otherwise targets are removed.
    pub fn create_translation_file_for_language(
        &self,
        language: &str,
        copy_content: bool,
    ) -> Result<Format, Error> {
        let mut translation = self.clone();
        translation.set_target_language(language)?;
        for unit in root_mut(&mut translation.document)?.elements_by_tag_name_mut(TRANS_UNIT) {
            unit.remove_descendant(&|e: &Element| e.local_name() == "target");
            if !copy_content {
                continue;
            }
            let Some(source) = unit.child_element("source") else {
                continue;
            };
            let mut target = Element::new("target").with_attribute("state", TranslationState::New.xliff_state());
            target.children = source.children.clone();
            insert_after(unit, "source", target);
        }
        debug!("created XLIFF 1.2 translation file for {language}");
        Ok(translation)
    }
}

impl TranslationMessagesFile for Format {
    fn format_type(&self) -> FormatType {
        FormatType::Xliff
    }

    fn source_language(&self) -> Option<String> {
        self.file_attribute("source-language")
    }

    fn target_language(&self) -> Option<String> {
        self.file_attribute("target-language")
    }

    fn set_target_language(&mut self, language: &str) -> Result<(), Error> {
        for file in root_mut(&mut self.document)?.child_elements_mut() {
            if file.local_name() == "file" {
                file.set_attribute("target-language", language);
            }
        }
        Ok(())
    }

    fn trans_units(&self) -> Result<Vec<TransUnit>, Error> {
        let parser = self.message_parser();
        let Some(root) = self.root() else {
            return Ok(Vec::new());
        };
        let mut units = Vec::new();
        for element in root.elements_by_tag_name(TRANS_UNIT) {
            let Some(id) = element.attribute("id") else {
                warn!("skipping XLIFF trans-unit without id");
                continue;
            };
            let Some(source_element) = element.child_element("source") else {
                warn!("skipping XLIFF trans-unit \"{id}\" without source");
                continue;
            };
            let source = parser.create_normalized_message_from_xml(source_element, None)?;
            let target_element = element.child_element("target");
            let target = target_element
                .map(|target| parser.create_normalized_message_from_xml(target, Some(&source)))
                .transpose()?;
            let state = target_element
                .and_then(|target| target.attribute("state"))
                .and_then(TranslationState::from_xliff_state);
            units.push(TransUnit {
                id: id.to_string(),
                source,
                target,
                state,
                description: note(element, "description"),
                meaning: note(element, "meaning"),
                source_references: source_references(element),
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
        let unit = self.trans_unit_element_mut(id)?;
        match unit.child_element_mut("target") {
            Some(target) => {
                target.children = content;
                target.set_attribute("state", state.xliff_state());
            }
            None => {
                let mut target = Element::new("target").with_attribute("state", state.xliff_state());
                target.children = content;
                insert_after(unit, "source", target);
            }
        }
        Ok(())
    }

    fn remove_trans_unit(&mut self, id: &str) -> Result<bool, Error> {
        Ok(root_mut(&mut self.document)?.remove_descendant(&|e: &Element| {
            e.local_name() == TRANS_UNIT && e.attribute("id") == Some(id)
        }))
    }
}

fn note(unit: &Element, from: &str) -> Option<String> {
    unit.child_elements()
        .find(|e| e.local_name() == "note" && e.attribute("from") == Some(from))
        .map(Element::text_content)
}

fn source_references(unit: &Element) -> Vec<SourceReference> {
    unit.child_elements()
        .filter(|e| e.local_name() == "context-group" && e.attribute("purpose") == Some("location"))
        .filter_map(|group| {
            let context = |context_type: &str| {
                group
                    .child_elements()
                    .find(|e| e.attribute("context-type") == Some(context_type))
                    .map(Element::text_content)
            };
            Some(SourceReference {
                source_file: context("sourcefile")?,
                line_number: context("linenumber")?.trim().parse().ok()?,
            })
        })
        .collect()
}
