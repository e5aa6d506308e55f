//! XMB and XTB: placeholders and tags are `<ph name="..."/>` markers. XMB
//! markers carry an example of the original expression in an `<ex>` child,
//! XTB markers are empty.
//!
//! ```xml
//! <msg id="..."><source>app.html:3</source>Hello <ph name="INTERPOLATION"><ex>{{ name }}</ex></ph></msg>
//! ```

use log::warn;

use crate::{
    codecs::{add_named_marker, end_literal_tag, start_literal_tag},
    dom::{Element, Node},
    error::Error,
    icu_tokenizer::is_icu_message_start,
    message_parser::{FormatMessageCodec, TagRepresentation},
    parsed_message::ParsedMessage,
    tag_mapping,
};

const PLACEHOLDER: &str = "ph";
const EXAMPLE: &str = "ex";
/// Location of the message in the sources; not part of the content.
const SOURCE_LOCATION: &str = "source";

#[derive(Debug, Clone, Copy)]
pub struct XmbMessageCodec {
    with_examples: bool,
}

impl XmbMessageCodec {
    pub fn xmb() -> Self {
        XmbMessageCodec {
            with_examples: true,
        }
    }

    pub fn xtb() -> Self {
        XmbMessageCodec {
            with_examples: false,
        }
    }

    fn marker(&self, name: String, example: Option<String>) -> Node {
        let mut element = Element::new(PLACEHOLDER).with_attribute("name", name.as_str());
        if self.with_examples {
            element.append_child(Element::new(EXAMPLE).with_text(example.unwrap_or(name)));
        }
        element.into()
    }
}

impl FormatMessageCodec for XmbMessageCodec {
    fn name(&self) -> &'static str {
        if self.with_examples { "xmb" } else { "xtb" }
    }

    fn process_start_element(&self, element: &Element, message: &mut ParsedMessage) -> Result<bool, Error> {
        match element.local_name() {
            PLACEHOLDER => {
                match element.attribute("name") {
                    Some(name) => {
                        let disp = element
                            .child_element(EXAMPLE)
                            .map(Element::text_content)
                            .filter(|example| example != name);
                        add_named_marker(self.name(), name, disp, message)?;
                    }
                    None => warn!("{}: ignoring <ph> without name", self.name()),
                }
                Ok(false)
            }
            _ => start_literal_tag(element, message),
        }
    }

    fn process_end_element(&self, element: &Element, message: &mut ParsedMessage) -> Result<(), Error> {
        match element.local_name() {
            PLACEHOLDER => Ok(()),
            _ => end_literal_tag(element, message),
        }
    }

    fn message_content(&self, element: &Element) -> Element {
        let mut content = element.clone();
        content.remove_child_elements(SOURCE_LOCATION);
        content
    }

    fn icu_message_text(&self, content: &Element) -> Result<Option<String>, Error> {
        let starts_icu = content
            .children
            .iter()
            .find(|node| !node.is_whitespace_text())
            .and_then(Node::as_text)
            .is_some_and(is_icu_message_start);
        if starts_icu {
            Ok(Some(content.inner_xml().trim().to_string()))
        } else {
            Ok(None)
        }
    }

    fn create_xml_representation_of_start_tag_part(
        &self,
        tag_name: &str,
        id_counter: usize,
        _id: usize,
    ) -> TagRepresentation {
        TagRepresentation::Marker(self.marker(
            tag_mapping::start_tag_placeholder_name(tag_name, id_counter),
            Some(tag_mapping::start_tag_display(tag_name)),
        ))
    }

    fn create_xml_representation_of_end_tag_part(&self, tag_name: &str) -> Option<Node> {
        Some(self.marker(
            tag_mapping::close_tag_placeholder_name(tag_name),
            Some(tag_mapping::close_tag_display(tag_name)),
        ))
    }

    fn create_xml_representation_of_empty_tag_part(
        &self,
        tag_name: &str,
        id_counter: usize,
        _id: usize,
    ) -> Node {
        self.marker(
            tag_mapping::empty_tag_placeholder_name(tag_name, id_counter),
            Some(tag_mapping::empty_tag_display(tag_name)),
        )
    }

    fn create_xml_representation_of_placeholder_part(
        &self,
        index: usize,
        disp: Option<&str>,
        _id: usize,
    ) -> Node {
        self.marker(tag_mapping::placeholder_name(index), disp.map(str::to_string))
    }

    fn create_xml_representation_of_icu_message_ref_part(
        &self,
        index: usize,
        disp: Option<&str>,
        _id: usize,
    ) -> Node {
        self.marker(tag_mapping::icu_message_ref_name(index), disp.map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use crate::message_parser::MessageParser;

    #[test]
    fn test_parse_xmb_markers_and_skip_source() {
        let message = MessageParser::xmb()
            .create_normalized_message_from_xml_string(
                "<source>app.html:3</source>Hello <ph name=\"INTERPOLATION\"><ex>{{ name }}</ex></ph>, <ph name=\"START_BOLD_TEXT\"><ex>&lt;b&gt;</ex></ph>x<ph name=\"CLOSE_BOLD_TEXT\"><ex>&lt;/b&gt;</ex></ph>",
                None,
            )
            .unwrap();
        assert_eq!(message.to_string(), "Hello {{0}}, <b>x</b>");
        assert_eq!(message.placeholder_disp(0), Some("{{ name }}"));
        assert!(message.as_native_string().starts_with("Hello <ph name=\"INTERPOLATION\">"));
    }

    #[test]
    fn test_example_equal_to_name_is_no_disp() {
        let message = MessageParser::xtb()
            .create_normalized_message_from_xml_string(
                "<ph name=\"INTERPOLATION\"><ex>INTERPOLATION</ex></ph><ph name=\"INTERPOLATION_1\"/>",
                None,
            )
            .unwrap();
        assert_eq!(message.placeholder_disp(0), None);
        assert_eq!(message.to_string(), "{{0}}{{1}}");
    }

    #[test]
    fn test_icu_after_source_location() {
        let message = MessageParser::xmb()
            .create_normalized_message_from_xml_string(
                "<source>a.html:1</source>\n{VAR_PLURAL, plural, =0 {none} other {<ph name=\"INTERPOLATION\"><ex>n</ex></ph> items}}",
                None,
            )
            .unwrap();
        let icu = message.icu_message().unwrap();
        assert_eq!(icu.categories().len(), 2);
        assert_eq!(icu.categories()[1].message().to_string(), "{{0}} items");
    }

    #[test]
    fn test_render_xmb_and_xtb() {
        let xmb = MessageParser::xmb()
            .parse_normalized_string("<b>x</b>{{0}}", None)
            .unwrap();
        assert_eq!(
            xmb.as_native_string(),
            "<ph name=\"START_BOLD_TEXT\"><ex>&lt;b&gt;</ex></ph>x<ph name=\"CLOSE_BOLD_TEXT\"><ex>&lt;/b&gt;</ex></ph><ph name=\"INTERPOLATION\"><ex>INTERPOLATION</ex></ph>"
        );
        let xtb = MessageParser::xtb()
            .parse_normalized_string("<b>x</b>{{0}}", None)
            .unwrap();
        assert_eq!(
            xtb.as_native_string(),
            "<ph name=\"START_BOLD_TEXT\"/>x<ph name=\"CLOSE_BOLD_TEXT\"/><ph name=\"INTERPOLATION\"/>"
        );
    }
}
