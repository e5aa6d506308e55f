//! XTB translation bundles.
//!
//! ```xml
//! <translationbundle lang="de">
//!   <translation id="4ca9bc1f">Hallo <ph name="INTERPOLATION"/>!</translation>
//! </translationbundle>
//! ```
//!
//! An XTB file only holds translations. Sources, descriptions and meanings
//! come from the XMB master file, see [`Format::with_master`].

use log::debug;

use crate::{
    dom::{Document, Element, Node},
    error::Error,
    formats::{FormatType, XmbFormat, check_root, message_nodes, root_mut},
    parsed_message::ParsedMessage,
    traits::{FileFormat, TranslationMessagesFile},
    types::{TransUnit, TranslationState},
};

const TRANSLATION: &str = "translation";

#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    document: Document,
    master: Option<XmbFormat>,
}

impl FileFormat for Format {
    fn from_xml_str(content: &str) -> Result<Self, Error> {
        let document = Document::parse(content)?;
        check_root(&document, "translationbundle")?;
        Ok(Format::new(document))
    }

    fn document(&self) -> &Document {
        &self.document
    }
}

impl Format {
    pub(crate) fn new(document: Document) -> Self {
        Format {
            document,
            master: None,
        }
    }

    /// Attaches the XMB file holding the source messages.
    pub fn with_master(mut self, master: XmbFormat) -> Self {
        self.master = Some(master);
        self
    }

    pub fn master(&self) -> Option<&XmbFormat> {
        self.master.as_ref()
    }

    fn master_or_error(&self) -> Result<&XmbFormat, Error> {
        self.master.as_ref().ok_or_else(|| {
            Error::InvalidResource("an XTB file needs its XMB master file to read sources".to_string())
        })
    }

    fn translation_element(&self, id: &str) -> Option<&Element> {
        self.document
            .root()?
            .child_elements()
            .find(|e| e.local_name() == TRANSLATION && e.attribute("id") == Some(id))
    }
}

impl TranslationMessagesFile for Format {
    fn format_type(&self) -> FormatType {
        FormatType::Xtb
    }

    fn source_language(&self) -> Option<String> {
        None
    }

    fn target_language(&self) -> Option<String> {
        self.document
            .root()?
            .attribute("lang")
            .map(str::to_string)
    }

    fn set_target_language(&mut self, language: &str) -> Result<(), Error> {
        root_mut(&mut self.document)?.set_attribute("lang", language);
        Ok(())
    }

    /// Units of the master file, each with the translation of this bundle
    /// (if any) as its target.
    fn trans_units(&self) -> Result<Vec<TransUnit>, Error> {
        let parser = self.message_parser();
        let mut units = self.master_or_error()?.trans_units()?;
        for unit in &mut units {
            unit.target = self
                .translation_element(&unit.id)
                .map(|translation| parser.create_normalized_message_from_xml(translation, Some(&unit.source)))
                .transpose()?;
        }
        Ok(units)
    }

    fn set_translation(
        &mut self,
        id: &str,
        message: &ParsedMessage,
        state: TranslationState,
    ) -> Result<(), Error> {
        if let Some(master) = &self.master {
            if master.trans_unit(id)?.is_none() {
                return Err(Error::InvalidResource(format!(
                    "no msg with id \"{id}\" in XMB master file"
                )));
            }
        }
        debug!("xtb: storing translation of \"{id}\" (state {state} is not recorded)");
        let content = message_nodes(message, &self.message_parser())?;
        let root = root_mut(&mut self.document)?;
        let existing = root
            .child_elements_mut()
            .find(|e| e.local_name() == TRANSLATION && e.attribute("id") == Some(id));
        match existing {
            Some(translation) => translation.children = content,
            None => {
                let mut translation = Element::new(TRANSLATION).with_attribute("id", id);
                translation.children = content;
                append_translation(root, translation);
            }
        }
        Ok(())
    }

    fn remove_trans_unit(&mut self, id: &str) -> Result<bool, Error> {
        Ok(root_mut(&mut self.document)?.remove_descendant(&|e: &Element| {
            e.local_name() == TRANSLATION && e.attribute("id") == Some(id)
        }))
    }
}

/// Appends `translation` as the last child element, on its own line when the
/// bundle is indented.
fn append_translation(bundle: &mut Element, translation: Element) {
    let position = match bundle.children.last() {
        Some(node) if node.is_whitespace_text() => bundle.children.len() - 1,
        _ => bundle.children.len(),
    };
    let indentation = bundle
        .children
        .iter()
        .find(|node| node.is_whitespace_text())
        .cloned()
        .unwrap_or_else(|| Node::text("\n  "));
    let closing = position == bundle.children.len();
    bundle.insert_child(position, translation);
    bundle.insert_child(position, indentation);
    if closing {
        bundle.append_child(Node::text("\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_parser::MessageParser;
    use indoc::indoc;

    const XMB: &str = indoc! {r#"
        <messagebundle>
          <msg id="greeting" desc="Greeting"><source>app.html:3</source>Hello <ph name="INTERPOLATION"><ex>{{ name }}</ex></ph>!</msg>
          <msg id="bye"><source>app.html:4</source>Bye</msg>
        </messagebundle>
    "#};

    const XTB: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <translationbundle lang="de">
          <translation id="greeting">Hallo <ph name="INTERPOLATION"/>!</translation>
        </translationbundle>
    "#};

    fn bundle() -> Format {
        Format::from_xml_str(XTB)
            .unwrap()
            .with_master(XmbFormat::from_xml_str(XMB).unwrap())
    }

    #[test]
    fn test_units_come_from_master() {
        let format = bundle();
        assert_eq!(format.target_language().as_deref(), Some("de"));
        let units = format.trans_units().unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].description.as_deref(), Some("Greeting"));
        let target = units[0].target.as_ref().unwrap();
        assert_eq!(target.to_string(), "Hallo {{0}}!");
        assert!(target.validate().is_none());
        assert!(units[1].target.is_none());
        assert_eq!(format.number_of_untranslated_trans_units().unwrap(), 1);
    }

    #[test]
    fn test_units_need_master() {
        let format = Format::from_xml_str(XTB).unwrap();
        assert!(format.master().is_none());
        assert!(matches!(format.trans_units(), Err(Error::InvalidResource(_))));
    }

    #[test]
    fn test_set_translation_appends_translation() {
        let mut format = bundle();
        let unit = format.trans_unit("bye").unwrap().unwrap();
        let translation = unit.translate("Tschüss").unwrap();
        format
            .set_translation("bye", &translation, TranslationState::Translated)
            .unwrap();

        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            indoc! {r#"
                <?xml version="1.0" encoding="UTF-8"?>
                <translationbundle lang="de">
                  <translation id="greeting">Hallo <ph name="INTERPOLATION"/>!</translation>
                  <translation id="bye">Tschüss</translation>
                </translationbundle>
            "#}
        );
        assert!(matches!(
            format.set_translation("unknown", &translation, TranslationState::Translated),
            Err(Error::InvalidResource(_))
        ));
    }

    #[test]
    fn test_set_translation_replaces_and_converts_xmb_message() {
        let mut format = bundle();
        let message = MessageParser::xmb()
            .create_normalized_message_from_xml_string(
                "Servus <ph name=\"INTERPOLATION\"><ex>{{ name }}</ex></ph>",
                None,
            )
            .unwrap();
        format
            .set_translation("greeting", &message, TranslationState::Final)
            .unwrap();
        let unit = format.trans_unit("greeting").unwrap().unwrap();
        assert_eq!(unit.target.unwrap().as_native_string(), "Servus <ph name=\"INTERPOLATION\"/>");
    }

    #[test]
    fn test_append_to_empty_bundle() {
        let mut format = Format::from_xml_str("<translationbundle lang=\"fr\"/>").unwrap();
        let message = MessageParser::xtb().parse_normalized_string("Salut", None).unwrap();
        format
            .set_translation("bye", &message, TranslationState::Translated)
            .unwrap();
        assert_eq!(
            format.document().to_xml_string(),
            "<translationbundle lang=\"fr\">\n  <translation id=\"bye\">Salut</translation>\n</translationbundle>"
        );
        assert!(format.remove_trans_unit("bye").unwrap());
    }
}
