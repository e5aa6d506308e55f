//! Mapping between normalized tag names (`b`, `img`, ...) and the placeholder
//! name vocabulary of the native formats (`START_BOLD_TEXT`, `CLOSE_BOLD_TEXT`,
//! `TAG_IMG`, `LINE_BREAK`, `INTERPOLATION_1`, `ICU`, ...).
//!
//! Repeated tags of the same name inside one message carry a numeric suffix:
//! `START_BOLD_TEXT` (id counter 0), `START_BOLD_TEXT_1` (id counter 1), ...

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

const PLACEHOLDER_PREFIX: &str = "INTERPOLATION";
const ICU_MESSAGE_REF_PREFIX: &str = "ICU";
const START_TAG_PREFIX: &str = "START_";
const CLOSE_TAG_PREFIX: &str = "CLOSE_";
const TAG_PREFIX: &str = "TAG_";

lazy_static! {
    /// Upper case tag name → placeholder base name.
    static ref TAG_TO_PLACEHOLDER_NAMES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("A", "LINK");
        m.insert("B", "BOLD_TEXT");
        m.insert("BR", "LINE_BREAK");
        m.insert("EM", "EMPHASISED_TEXT");
        m.insert("H1", "HEADING_LEVEL1");
        m.insert("H2", "HEADING_LEVEL2");
        m.insert("H3", "HEADING_LEVEL3");
        m.insert("H4", "HEADING_LEVEL4");
        m.insert("H5", "HEADING_LEVEL5");
        m.insert("H6", "HEADING_LEVEL6");
        m.insert("HR", "HORIZONTAL_RULE");
        m.insert("I", "ITALIC_TEXT");
        m.insert("LI", "LIST_ITEM");
        m.insert("LINK", "MEDIA_LINK");
        m.insert("OL", "ORDERED_LIST");
        m.insert("P", "PARAGRAPH");
        m.insert("Q", "QUOTATION");
        m.insert("S", "STRIKETHROUGH_TEXT");
        m.insert("SMALL", "SMALL_TEXT");
        m.insert("SUB", "SUBSTRIPT");
        m.insert("SUP", "SUPERSCRIPT");
        m.insert("TBODY", "TABLE_BODY");
        m.insert("TD", "TABLE_CELL");
        m.insert("TFOOT", "TABLE_FOOTER");
        m.insert("TH", "TABLE_HEADER_CELL");
        m.insert("THEAD", "TABLE_HEADER");
        m.insert("TR", "TABLE_ROW");
        m.insert("TT", "MONOSPACED_TEXT");
        m.insert("U", "UNDERLINED_TEXT");
        m.insert("UL", "UNORDERED_LIST");
        m
    };

    static ref PLACEHOLDER_NAMES_TO_TAG: HashMap<&'static str, &'static str> = TAG_TO_PLACEHOLDER_NAMES
        .iter()
        .map(|(tag, name)| (*name, *tag))
        .collect();

    static ref ID_SUFFIX_REGEX: Regex = Regex::new(r"^(.+?)_(\d+)$").unwrap();
}

/// Native name of placeholder `index`: `INTERPOLATION`, `INTERPOLATION_1`, ...
pub fn placeholder_name(index: usize) -> String {
    with_id_suffix(PLACEHOLDER_PREFIX, index)
}

/// Native name of ICU message reference `index`: `ICU`, `ICU_1`, ...
pub fn icu_message_ref_name(index: usize) -> String {
    with_id_suffix(ICU_MESSAGE_REF_PREFIX, index)
}

/// Inverse of [`placeholder_name`].
pub fn placeholder_index(name: &str) -> Option<usize> {
    prefixed_index(name, PLACEHOLDER_PREFIX)
}

/// Inverse of [`icu_message_ref_name`].
pub fn icu_message_ref_index(name: &str) -> Option<usize> {
    prefixed_index(name, ICU_MESSAGE_REF_PREFIX)
}

pub fn start_tag_placeholder_name(tag: &str, id_counter: usize) -> String {
    with_id_suffix(&format!("{START_TAG_PREFIX}{}", base_name(tag)), id_counter)
}

pub fn close_tag_placeholder_name(tag: &str) -> String {
    format!("{CLOSE_TAG_PREFIX}{}", base_name(tag))
}

pub fn empty_tag_placeholder_name(tag: &str, id_counter: usize) -> String {
    with_id_suffix(&base_name(tag), id_counter)
}

pub fn is_start_tag_placeholder_name(name: &str) -> bool {
    tag_name_from_start_tag_placeholder_name(name).is_some()
}

pub fn is_close_tag_placeholder_name(name: &str) -> bool {
    tag_name_from_close_tag_placeholder_name(name).is_some()
}

pub fn is_empty_tag_placeholder_name(name: &str) -> bool {
    tag_name_from_empty_tag_placeholder_name(name).is_some()
}

/// `START_BOLD_TEXT_1` → `b`, `START_TAG_DIV` → `div`.
pub fn tag_name_from_start_tag_placeholder_name(name: &str) -> Option<String> {
    let rest = name.strip_prefix(START_TAG_PREFIX)?;
    tag_name_from_base(strip_id_suffix(rest))
}

/// `CLOSE_BOLD_TEXT` → `b`.
pub fn tag_name_from_close_tag_placeholder_name(name: &str) -> Option<String> {
    let rest = name.strip_prefix(CLOSE_TAG_PREFIX)?;
    tag_name_from_base(strip_id_suffix(rest))
}

/// `TAG_IMG_1` → `img`, `LINE_BREAK` → `br`.
pub fn tag_name_from_empty_tag_placeholder_name(name: &str) -> Option<String> {
    if name.starts_with(START_TAG_PREFIX)
        || name.starts_with(CLOSE_TAG_PREFIX)
        || placeholder_index(name).is_some()
        || icu_message_ref_index(name).is_some()
    {
        return None;
    }
    tag_name_from_base(strip_id_suffix(name))
}

/// Numeric suffix of a placeholder name, 0 when there is none.
pub fn id_counter_from_placeholder_name(name: &str) -> usize {
    ID_SUFFIX_REGEX
        .captures(name)
        .and_then(|caps| caps[2].parse().ok())
        .unwrap_or(0)
}

/// XLIFF 1.2 `ctype` attribute for an inline tag.
pub fn ctype_for_tag(tag: &str) -> String {
    match tag.to_ascii_lowercase().as_str() {
        "br" => "lb".to_string(),
        "img" => "image".to_string(),
        other => format!("x-{other}"),
    }
}

/// XLIFF 2.0 `type` attribute for an inline tag.
pub fn xliff2_type_for_tag(tag: &str) -> &'static str {
    match tag.to_ascii_lowercase().as_str() {
        "br" | "b" | "i" | "u" => "fmt",
        "img" => "image",
        "a" => "link",
        _ => "other",
    }
}

/// Literal markup of a start tag as shown to humans, e.g. `<b>`.
pub fn start_tag_display(tag: &str) -> String {
    format!("<{tag}>")
}

pub fn close_tag_display(tag: &str) -> String {
    format!("</{tag}>")
}

pub fn empty_tag_display(tag: &str) -> String {
    format!("<{tag}/>")
}

fn base_name(tag: &str) -> String {
    let upper = tag.to_ascii_uppercase();
    match TAG_TO_PLACEHOLDER_NAMES.get(upper.as_str()) {
        Some(name) => name.to_string(),
        None => format!("{TAG_PREFIX}{upper}"),
    }
}

fn tag_name_from_base(base: &str) -> Option<String> {
    if let Some(tag) = PLACEHOLDER_NAMES_TO_TAG.get(base) {
        return Some(tag.to_ascii_lowercase());
    }
    base.strip_prefix(TAG_PREFIX)
        .filter(|tag| !tag.is_empty())
        .map(str::to_ascii_lowercase)
}

fn strip_id_suffix(name: &str) -> &str {
    match ID_SUFFIX_REGEX.captures(name) {
        Some(caps) => caps.get(1).map_or(name, |m| m.as_str()),
        None => name,
    }
}

fn with_id_suffix(base: &str, id: usize) -> String {
    if id == 0 {
        base.to_string()
    } else {
        format!("{base}_{id}")
    }
}

fn prefixed_index(name: &str, prefix: &str) -> Option<usize> {
    let rest = name.strip_prefix(prefix)?;
    if rest.is_empty() {
        return Some(0);
    }
    rest.strip_prefix('_')?.parse().ok()
}
