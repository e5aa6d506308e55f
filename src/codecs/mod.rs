//! Markup conventions of the supported file formats.

pub mod xliff;
pub mod xliff2;
pub mod xmb;

pub use xliff::XliffMessageCodec;
pub use xliff2::Xliff2MessageCodec;
pub use xmb::XmbMessageCodec;

use log::warn;

use crate::{dom::Element, error::Error, parsed_message::ParsedMessage, tag_mapping};

/// Adds the part denoted by a placeholder name such as `INTERPOLATION_1`,
/// `ICU`, `START_BOLD_TEXT`, `CLOSE_LINK` or `TAG_IMG`.
/// Unknown names are logged and skipped.
pub(crate) fn add_named_marker(
    codec: &str,
    name: &str,
    disp: Option<String>,
    message: &mut ParsedMessage,
) -> Result<(), Error> {
    if let Some(index) = tag_mapping::placeholder_index(name) {
        message.add_placeholder(index, disp)
    } else if let Some(index) = tag_mapping::icu_message_ref_index(name) {
        message.add_icu_message_ref(index, disp)
    } else if let Some(tag) = tag_mapping::tag_name_from_start_tag_placeholder_name(name) {
        message.add_start_tag(&tag, tag_mapping::id_counter_from_placeholder_name(name))
    } else if let Some(tag) = tag_mapping::tag_name_from_close_tag_placeholder_name(name) {
        message.add_end_tag(&tag)
    } else if let Some(tag) = tag_mapping::tag_name_from_empty_tag_placeholder_name(name) {
        message.add_empty_tag(&tag, tag_mapping::id_counter_from_placeholder_name(name))
    } else {
        warn!("{codec}: ignoring unknown placeholder \"{name}\"");
        Ok(())
    }
}

/// Inline markup the format does not know is kept as a literal tag.
pub(crate) fn start_literal_tag(element: &Element, message: &mut ParsedMessage) -> Result<bool, Error> {
    message.add_start_tag(element.local_name(), 0)?;
    Ok(true)
}

pub(crate) fn end_literal_tag(element: &Element, message: &mut ParsedMessage) -> Result<(), Error> {
    message.add_end_tag(element.local_name())
}
