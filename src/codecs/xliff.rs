//! XLIFF 1.2: every placeholder and tag is an `<x id="..."/>` marker.
//!
//! ```xml
//! Hello <x id="INTERPOLATION" equiv-text="{{ name }}"/>,
//! <x id="START_BOLD_TEXT" ctype="x-b" equiv-text="&lt;b&gt;"/>welcome<x id="CLOSE_BOLD_TEXT" ctype="x-b" equiv-text="&lt;/b&gt;"/>
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

const MARKER: &str = "x";

#[derive(Debug, Clone, Copy, Default)]
pub struct XliffMessageCodec;

impl FormatMessageCodec for XliffMessageCodec {
    fn name(&self) -> &'static str {
        "xliff"
    }

    fn process_start_element(&self, element: &Element, message: &mut ParsedMessage) -> Result<bool, Error> {
        if element.local_name() != MARKER {
            return start_literal_tag(element, message);
        }
        let Some(id) = element.attribute("id") else {
            warn!("xliff: ignoring <x/> without id");
            return Ok(false);
        };
        let disp = element.attribute("equiv-text").map(str::to_string);
        add_named_marker(self.name(), id, disp, message)?;
        Ok(false)
    }

    fn process_end_element(&self, element: &Element, message: &mut ParsedMessage) -> Result<(), Error> {
        if element.local_name() == MARKER {
            return Ok(());
        }
        end_literal_tag(element, message)
    }

    fn create_xml_representation_of_start_tag_part(
        &self,
        tag_name: &str,
        id_counter: usize,
        _id: usize,
    ) -> TagRepresentation {
        TagRepresentation::Marker(tag_marker(
            tag_mapping::start_tag_placeholder_name(tag_name, id_counter),
            tag_name,
            tag_mapping::start_tag_display(tag_name),
        ))
    }

    fn create_xml_representation_of_end_tag_part(&self, tag_name: &str) -> Option<Node> {
        Some(tag_marker(
            tag_mapping::close_tag_placeholder_name(tag_name),
            tag_name,
            tag_mapping::close_tag_display(tag_name),
        ))
    }

    fn create_xml_representation_of_empty_tag_part(
        &self,
        tag_name: &str,
        id_counter: usize,
        _id: usize,
    ) -> Node {
        tag_marker(
            tag_mapping::empty_tag_placeholder_name(tag_name, id_counter),
            tag_name,
            tag_mapping::empty_tag_display(tag_name),
        )
    }

    fn create_xml_representation_of_placeholder_part(
        &self,
        index: usize,
        disp: Option<&str>,
        _id: usize,
    ) -> Node {
        named_marker(tag_mapping::placeholder_name(index), disp)
    }

    fn create_xml_representation_of_icu_message_ref_part(
        &self,
        index: usize,
        disp: Option<&str>,
        _id: usize,
    ) -> Node {
        named_marker(tag_mapping::icu_message_ref_name(index), disp)
    }
}

fn tag_marker(id: String, tag_name: &str, display: String) -> Node {
    Element::new(MARKER)
        .with_attribute("id", id)
        .with_attribute("ctype", tag_mapping::ctype_for_tag(tag_name))
        .with_attribute("equiv-text", display)
        .into()
}

fn named_marker(id: String, disp: Option<&str>) -> Node {
    let mut marker = Element::new(MARKER).with_attribute("id", id);
    if let Some(disp) = disp {
        marker.set_attribute("equiv-text", disp);
    }
    marker.into()
}

#[cfg(test)]
mod tests {
    use crate::{message_parser::MessageParser, parts::DisplayFormat};

    fn parse(xml: &str) -> crate::ParsedMessage {
        MessageParser::xliff()
            .create_normalized_message_from_xml_string(xml, None)
            .unwrap()
    }

    #[test]
    fn test_parse_markers() {
        let message = parse(
            "<x id=\"START_BOLD_TEXT\" ctype=\"x-b\"/>a<x id=\"CLOSE_BOLD_TEXT\" ctype=\"x-b\"/><x id=\"LINE_BREAK\" ctype=\"lb\"/><x id=\"START_BOLD_TEXT_1\" ctype=\"x-b\"/>b<x id=\"CLOSE_BOLD_TEXT\" ctype=\"x-b\"/><x id=\"TAG_IMG\" ctype=\"image\"/><x id=\"INTERPOLATION_2\"/><x id=\"ICU_1\"/>",
        );
        assert_eq!(
            message.as_display_string(DisplayFormat::Default),
            "<b>a</b><br/><b id=\"1\">b</b><img/>{{2}}<ICU-Message-Ref_1/>"
        );
    }

    #[test]
    fn test_unknown_marker_is_skipped() {
        let message = parse("a<x id=\"SOMETHING\"/>b<x/>");
        assert_eq!(message.to_string(), "ab");
    }

    #[test]
    fn test_render_parts() {
        let parser = MessageParser::xliff();
        let message = parser
            .parse_normalized_string("<b>a</b><br/>{{0}}<ICU-Message-Ref_0/>", None)
            .unwrap();
        assert_eq!(
            message.as_native_string(),
            "<x id=\"START_BOLD_TEXT\" ctype=\"x-b\" equiv-text=\"&lt;b&gt;\"/>a<x id=\"CLOSE_BOLD_TEXT\" ctype=\"x-b\" equiv-text=\"&lt;/b&gt;\"/><x id=\"LINE_BREAK\" ctype=\"lb\" equiv-text=\"&lt;br/&gt;\"/><x id=\"INTERPOLATION\"/><x id=\"ICU\"/>"
        );
        let reparsed = parser
            .create_normalized_message_from_xml_string(&message.as_native_string(), None)
            .unwrap();
        assert_eq!(reparsed, message);
    }
}
