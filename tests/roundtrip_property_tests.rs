use i18ncodec::{DisplayFormat, MessageParser};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Segment {
    Text(String),
    Placeholder(usize),
    Bold(String),
    Span(String),
    LineBreak,
}

impl Segment {
    fn normalized(&self) -> String {
        match self {
            Segment::Text(text) => text.clone(),
            Segment::Placeholder(index) => format!("{{{{{index}}}}}"),
            Segment::Bold(text) => format!("<b>{text}</b>"),
            Segment::Span(text) => format!("<span>{text}</span>"),
            Segment::LineBreak => "<br/>".to_string(),
        }
    }
}

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 \\.!\\?<{]{1,12}").expect("valid text regex")
}

fn segment_strategy() -> impl Strategy<Value = Segment> {
    prop_oneof![
        text_strategy().prop_map(Segment::Text),
        (0usize..4).prop_map(Segment::Placeholder),
        text_strategy().prop_map(Segment::Bold),
        text_strategy().prop_map(Segment::Span),
        Just(Segment::LineBreak),
    ]
}

fn normalized_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..8)
        .prop_map(|segments| segments.iter().map(Segment::normalized).collect())
}

fn parsers() -> Vec<MessageParser> {
    vec![
        MessageParser::xliff(),
        MessageParser::xliff2(),
        MessageParser::xmb(),
        MessageParser::xtb(),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn normalized_string_survives_native_round_trip(normalized in normalized_strategy()) {
        for parser in parsers() {
            let message = parser
                .parse_normalized_string(&normalized, None)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(message.as_display_string(DisplayFormat::Default), normalized.clone());

            let native = message.as_native_string();
            let reparsed = parser
                .create_normalized_message_from_xml_string(&native, None)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(reparsed.as_display_string(DisplayFormat::Default), normalized.clone());
            prop_assert_eq!(reparsed.as_native_string(), native);
        }
    }

    #[test]
    fn identity_translation_is_valid(normalized in normalized_strategy()) {
        let source = MessageParser::xliff()
            .parse_normalized_string(&normalized, None)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let translated = source
            .translate(&source.to_string())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(translated.to_string(), source.to_string());
        prop_assert!(translated.validate().is_none());
        prop_assert!(translated.validate_warnings().is_none());
    }

    #[test]
    fn conversion_between_dialects_keeps_message(normalized in normalized_strategy()) {
        let parsers = parsers();
        for from in &parsers {
            let message = from
                .parse_normalized_string(&normalized, None)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            for to in &parsers {
                let converted = to
                    .convert_message(&message)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(converted.to_string(), normalized.clone());
                prop_assert_eq!(converted.parser().codec().name(), to.codec().name());
            }
        }
    }
}
