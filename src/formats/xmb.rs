//! XMB master files. They hold the source messages only; translations live
//! in XTB files that refer to the master by message id.
//!
//! ```xml
//! <messagebundle>
//!   <msg id="4ca9bc1f" desc="Greeting"><source>app/app.component.html:3</source>Hello <ph name="INTERPOLATION"><ex>{{ name }}</ex></ph>!</msg>
//! </messagebundle>
//! ```

use log::{debug, warn};

use crate::{
    dom::{Document, Element, Node},
    error::Error,
    formats::{FormatType, XtbFormat, check_root, message_nodes, root_mut},
    message_parser::MessageParser,
    parsed_message::ParsedMessage,
    traits::{FileFormat, TranslationMessagesFile},
    types::{SourceReference, TransUnit, TranslationState},
};

const MSG: &str = "msg";

#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    document: Document,
}

impl FileFormat for Format {
    fn from_xml_str(content: &str) -> Result<Self, Error> {
        let document = Document::parse(content)?;
        check_root(&document, "messagebundle")?;
        Ok(Format { document })
    }

    fn document(&self) -> &Document {
        &self.document
    }
}

impl Format {
    /// A new XTB bundle for `language` with this file as its master. With
    /// `copy_content` every message gets a translation that is a copy of its
    /// source, otherwise the bundle is empty.
    pub fn create_translation_file_for_language(
        &self,
        language: &str,
        copy_content: bool,
    ) -> Result<XtbFormat, Error> {
        let parser = MessageParser::xtb();
        let mut bundle = Element::new("translationbundle").with_attribute("lang", language);
        if copy_content {
            for unit in self.trans_units()? {
                let mut translation =
                    Element::new("translation").with_attribute("id", unit.id.as_str());
                translation.children = message_nodes(&unit.source, &parser)?;
                bundle.append_child(Node::text("\n  "));
                bundle.append_child(translation);
            }
        }
        if bundle.has_child_elements() {
            bundle.append_child(Node::text("\n"));
        }
        let document = Document {
            children: vec![
                Node::ProcessingInstruction("xml version=\"1.0\" encoding=\"UTF-8\"".to_string()),
                Node::text("\n"),
                bundle.into(),
                Node::text("\n"),
            ],
        };
        debug!("created XTB translation file for {language}");
        Ok(XtbFormat::new(document).with_master(self.clone()))
    }
}

impl TranslationMessagesFile for Format {
    fn format_type(&self) -> FormatType {
        FormatType::Xmb
    }

    fn source_language(&self) -> Option<String> {
        None
    }

    fn target_language(&self) -> Option<String> {
        None
    }

    fn set_target_language(&mut self, _language: &str) -> Result<(), Error> {
        Err(Error::unsupported("an XMB master file has no target language"))
    }

    fn trans_units(&self) -> Result<Vec<TransUnit>, Error> {
        let parser = self.message_parser();
        let Some(root) = self.document.root() else {
            return Ok(Vec::new());
        };
        let mut units = Vec::new();
        for msg in root.elements_by_tag_name(MSG) {
            let Some(id) = msg.attribute("id") else {
                warn!("skipping XMB msg without id");
                continue;
            };
            units.push(TransUnit {
                id: id.to_string(),
                source: parser.create_normalized_message_from_xml(msg, None)?,
                target: None,
                state: None,
                description: msg.attribute("desc").map(str::to_string),
                meaning: msg.attribute("meaning").map(str::to_string),
                source_references: msg
                    .child_elements()
                    .filter(|e| e.local_name() == "source")
                    .filter_map(|source| source.text_content().parse::<SourceReference>().ok())
                    .collect(),
            });
        }
        Ok(units)
    }

    fn set_translation(
        &mut self,
        id: &str,
        _message: &ParsedMessage,
        _state: TranslationState,
    ) -> Result<(), Error> {
        Err(Error::unsupported(format!(
            "cannot translate \"{id}\" in an XMB master file, translations belong into an XTB file"
        )))
    }

    fn remove_trans_unit(&mut self, id: &str) -> Result<bool, Error> {
        Ok(root_mut(&mut self.document)?
            .remove_descendant(&|e: &Element| e.local_name() == MSG && e.attribute("id") == Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::DisplayFormat;
    use indoc::indoc;

    const XMB: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <!DOCTYPE messagebundle>
        <messagebundle>
          <msg id="greeting" desc="Greeting" meaning="welcome"><source>app/app.component.html:3</source>Hello <ph name="INTERPOLATION"><ex>{{ name }}</ex></ph>!</msg>
          <msg id="bold"><source>app/app.component.html:5</source><ph name="START_BOLD_TEXT"><ex>&lt;b&gt;</ex></ph>Bold<ph name="CLOSE_BOLD_TEXT"><ex>&lt;/b&gt;</ex></ph></msg>
        </messagebundle>
    "#};

    #[test]
    fn test_read_messages() {
        let format = Format::from_xml_str(XMB).unwrap();
        let units = format.trans_units().unwrap();
        assert_eq!(units.len(), 2);

        let greeting = &units[0];
        assert_eq!(greeting.source.to_string(), "Hello {{0}}!");
        assert_eq!(
            greeting.source.as_native_string(),
            "Hello <ph name=\"INTERPOLATION\"><ex>{{ name }}</ex></ph>!"
        );
        assert_eq!(
            greeting.source.as_display_string(DisplayFormat::NgxTranslate),
            "Hello {{ name }}!"
        );
        assert_eq!(greeting.description.as_deref(), Some("Greeting"));
        assert_eq!(greeting.meaning.as_deref(), Some("welcome"));
        assert_eq!(greeting.source_references[0].to_string(), "app/app.component.html:3");
        assert!(greeting.target.is_none());
        assert_eq!(units[1].source.to_string(), "<b>Bold</b>");
        assert_eq!(format.number_of_untranslated_trans_units().unwrap(), 2);
    }

    #[test]
    fn test_master_file_cannot_be_translated() {
        let mut format = Format::from_xml_str(XMB).unwrap();
        let unit = format.trans_unit("greeting").unwrap().unwrap();
        let translation = unit.translate("Hallo {{0}}!").unwrap();
        assert!(matches!(
            format.set_translation("greeting", &translation, TranslationState::Translated),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(format.set_target_language("de"), Err(Error::Unsupported(_))));
        assert!(matches!(
            Format::from_xml_str("<translationbundle/>"),
            Err(Error::InvalidResource(_))
        ));
    }

    #[test]
    fn test_create_xtb_for_language() {
        let format = Format::from_xml_str(XMB).unwrap();
        let xtb = format.create_translation_file_for_language("de", true).unwrap();
        let mut out = Vec::new();
        xtb.to_writer(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            indoc! {r#"
                <?xml version="1.0" encoding="UTF-8"?>
                <translationbundle lang="de">
                  <translation id="greeting">Hello <ph name="INTERPOLATION"/>!</translation>
                  <translation id="bold"><ph name="START_BOLD_TEXT"/>Bold<ph name="CLOSE_BOLD_TEXT"/></translation>
                </translationbundle>
            "#}
        );
        assert_eq!(xtb.target_language().as_deref(), Some("de"));
        let units = xtb.trans_units().unwrap();
        assert_eq!(units[0].target.as_ref().unwrap().to_string(), "Hello {{0}}!");

        let empty = format.create_translation_file_for_language("fr", false).unwrap();
        assert_eq!(empty.number_of_untranslated_trans_units().unwrap(), 2);
    }
}
