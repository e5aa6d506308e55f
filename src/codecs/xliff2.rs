//! XLIFF 2.0: placeholders and void tags are `<ph/>` markers, paired tags are
//! `<pc>` containers around the tagged content.
//!
//! ```xml
//! Hello <ph id="0" equiv="INTERPOLATION" disp="{{ name }}"/>,
//! <pc id="1" equivStart="START_BOLD_TEXT" equivEnd="CLOSE_BOLD_TEXT" type="fmt" dispStart="&lt;b&gt;" dispEnd="&lt;/b&gt;">welcome</pc>
//! ```

use log::warn;

use crate::{
    codecs::{add_named_marker, end_literal_tag, start_literal_tag},
    dom::{Element, Node},
    error::Error,
    message_parser::{FormatMessageCodec, TagRepresentation},
    parsed_message::ParsedMessage,
    tag_mapping,
};

const PLACEHOLDER: &str = "ph";
const CONTAINER: &str = "pc";

#[derive(Debug, Clone, Copy, Default)]
pub struct Xliff2MessageCodec;

impl Xliff2MessageCodec {
    /// Tag name and id counter of a `<pc>` element.
    fn container_tag(element: &Element) -> (String, usize) {
        match element.attribute("equivStart") {
            Some(equiv) => match tag_mapping::tag_name_from_start_tag_placeholder_name(equiv) {
                Some(tag) => (tag, tag_mapping::id_counter_from_placeholder_name(equiv)),
                None => {
                    warn!("xliff2: unknown equivStart \"{equiv}\", keeping <pc> as literal tag");
                    (CONTAINER.to_string(), 0)
                }
            },
            None => (CONTAINER.to_string(), 0),
        }
    }
}

impl FormatMessageCodec for Xliff2MessageCodec {
    fn name(&self) -> &'static str {
        "xliff2"
    }

    fn process_start_element(&self, element: &Element, message: &mut ParsedMessage) -> Result<bool, Error> {
        match element.local_name() {
            PLACEHOLDER => {
                match element.attribute("equiv") {
                    Some(equiv) => {
                        let disp = element.attribute("disp").map(str::to_string);
                        add_named_marker(self.name(), equiv, disp, message)?;
                    }
                    None => warn!("xliff2: ignoring <ph/> without equiv"),
                }
                Ok(false)
            }
            CONTAINER => {
                let (tag, id_counter) = Self::container_tag(element);
                message.add_start_tag(&tag, id_counter)?;
                Ok(true)
            }
            _ => start_literal_tag(element, message),
        }
    }

    fn process_end_element(&self, element: &Element, message: &mut ParsedMessage) -> Result<(), Error> {
        match element.local_name() {
            PLACEHOLDER => Ok(()),
            CONTAINER => message.add_end_tag(&Self::container_tag(element).0),
            _ => end_literal_tag(element, message),
        }
    }

    fn create_xml_representation_of_start_tag_part(
        &self,
        tag_name: &str,
        id_counter: usize,
        id: usize,
    ) -> TagRepresentation {
        TagRepresentation::Container(
            Element::new(CONTAINER)
                .with_attribute("id", id.to_string())
                .with_attribute(
                    "equivStart",
                    tag_mapping::start_tag_placeholder_name(tag_name, id_counter),
                )
                .with_attribute("equivEnd", tag_mapping::close_tag_placeholder_name(tag_name))
                .with_attribute("type", tag_mapping::xliff2_type_for_tag(tag_name))
                .with_attribute("dispStart", tag_mapping::start_tag_display(tag_name))
                .with_attribute("dispEnd", tag_mapping::close_tag_display(tag_name)),
        )
    }

    fn create_xml_representation_of_end_tag_part(&self, _tag_name: &str) -> Option<Node> {
        None
    }

    fn create_xml_representation_of_empty_tag_part(
        &self,
        tag_name: &str,
        id_counter: usize,
        id: usize,
    ) -> Node {
        Element::new(PLACEHOLDER)
            .with_attribute("id", id.to_string())
            .with_attribute(
                "equiv",
                tag_mapping::empty_tag_placeholder_name(tag_name, id_counter),
            )
            .with_attribute("type", tag_mapping::xliff2_type_for_tag(tag_name))
            .with_attribute("disp", tag_mapping::empty_tag_display(tag_name))
            .into()
    }

    fn create_xml_representation_of_placeholder_part(
        &self,
        index: usize,
        disp: Option<&str>,
        id: usize,
    ) -> Node {
        placeholder(id, tag_mapping::placeholder_name(index), disp)
    }

    fn create_xml_representation_of_icu_message_ref_part(
        &self,
        index: usize,
        disp: Option<&str>,
        id: usize,
    ) -> Node {
        placeholder(id, tag_mapping::icu_message_ref_name(index), disp)
    }
}

fn placeholder(id: usize, equiv: String, disp: Option<&str>) -> Node {
    let mut element = Element::new(PLACEHOLDER)
        .with_attribute("id", id.to_string())
        .with_attribute("equiv", equiv);
    if let Some(disp) = disp {
        element.set_attribute("disp", disp);
    }
    element.into()
}

#[cfg(test)]
mod tests {
    use crate::{message_parser::MessageParser, parts::DisplayFormat};

    #[test]
    fn test_parse_nested_containers() {
        let message = MessageParser::xliff2()
            .create_normalized_message_from_xml_string(
                "<pc id=\"0\" equivStart=\"START_BOLD_TEXT\" equivEnd=\"CLOSE_BOLD_TEXT\" type=\"fmt\">a <pc id=\"1\" equivStart=\"START_ITALIC_TEXT\" equivEnd=\"CLOSE_ITALIC_TEXT\">b</pc></pc><ph id=\"2\" equiv=\"TAG_IMG\" type=\"image\" disp=\"&lt;img/&gt;\"/><ph id=\"3\" equiv=\"INTERPOLATION\" disp=\"{{ x }}\"/>",
                None,
            )
            .unwrap();
        assert_eq!(
            message.as_display_string(DisplayFormat::Default),
            "<b>a <i>b</i></b><img/>{{0}}"
        );
        assert_eq!(message.placeholder_disp(0), Some("{{ x }}"));
    }

    #[test]
    fn test_pc_without_equiv_is_literal() {
        let message = MessageParser::xliff2()
            .create_normalized_message_from_xml_string("<pc id=\"0\">x</pc>", None)
            .unwrap();
        assert_eq!(message.to_string(), "<pc>x</pc>");
    }

    #[test]
    fn test_render_parts_with_sequential_ids() {
        let parser = MessageParser::xliff2();
        let message = parser
            .parse_normalized_string("<b>a <i>b</i></b>{{0}}<br/>", None)
            .unwrap();
        assert_eq!(
            message.as_native_string(),
            concat!(
                "<pc id=\"0\" equivStart=\"START_BOLD_TEXT\" equivEnd=\"CLOSE_BOLD_TEXT\" type=\"fmt\" dispStart=\"&lt;b&gt;\" dispEnd=\"&lt;/b&gt;\">a ",
                "<pc id=\"1\" equivStart=\"START_ITALIC_TEXT\" equivEnd=\"CLOSE_ITALIC_TEXT\" type=\"fmt\" dispStart=\"&lt;i&gt;\" dispEnd=\"&lt;/i&gt;\">b</pc></pc>",
                "<ph id=\"2\" equiv=\"INTERPOLATION\"/>",
                "<ph id=\"3\" equiv=\"LINE_BREAK\" type=\"fmt\" disp=\"&lt;br/&gt;\"/>"
            )
        );
        let reparsed = parser
            .create_normalized_message_from_xml_string(&message.as_native_string(), None)
            .unwrap();
        assert_eq!(reparsed, message);
    }
}
