use gemba_core::{
    language_name, ErrorAnnotation, MqmErrors, ParsedAnswer, Segment, Severity, SeverityWeights,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use test_case::test_case;

#[test_case(Severity::Critical, -25 ; "critical")]
#[test_case(Severity::Major, -5 ; "major")]
#[test_case(Severity::Minor, -1 ; "minor")]
fn test_mqm_weights(severity: Severity, expected: i64) {
    assert_eq!(SeverityWeights::MQM.weight(severity), expected);
}

#[test]
fn test_mqm_errors_serialize_by_tier() {
    let mut errors = MqmErrors::new();
    errors.push(ErrorAnnotation::new(
        "accuracy/mistranslation",
        "wrong word",
        Severity::Major,
    ));

    let value = serde_json::to_value(&errors).unwrap();

    assert_eq!(value["critical"], json!([]));
    assert_eq!(value["major"][0]["category"], "accuracy/mistranslation");
    assert_eq!(value["major"][0]["severity"], "major");
}

#[test]
fn test_parsed_answer_untagged_serialization() {
    assert_eq!(serde_json::to_value(ParsedAnswer::Score(-6)).unwrap(), json!(-6));
    assert_eq!(serde_json::to_value(ParsedAnswer::Class(2)).unwrap(), json!(2));
    assert_eq!(
        serde_json::to_value(ParsedAnswer::Text("spans".into())).unwrap(),
        json!("spans")
    );
}

#[test]
fn test_parsed_answer_accessors() {
    assert_eq!(ParsedAnswer::Score(5).as_score(), Some(5));
    assert_eq!(ParsedAnswer::Score(5).as_class(), None);
    assert_eq!(ParsedAnswer::Class(1).as_class(), Some(1));
    assert!(ParsedAnswer::Errors(MqmErrors::new()).as_errors().is_some());
    assert_eq!(ParsedAnswer::Text("x".into()).as_text(), Some("x"));
}

#[test]
fn test_segment_context_omits_absent_fields() {
    let segment = Segment::new("English", "German", "a", "b");
    let context = segment.to_context();

    assert_eq!(context["source_seg"], "a");
    assert!(context.get("reference_seg").is_none());
    assert!(context.get("error_spans").is_none());

    let context = segment.with_reference("r").with_error_spans("none").to_context();
    assert_eq!(context["reference_seg"], "r");
    assert_eq!(context["error_spans"], "none");
}

#[test]
fn test_language_names() {
    assert_eq!(language_name("de"), "German");
    assert_eq!(language_name("ru"), "Russian");
    assert_eq!(language_name("Japanese"), "Japanese");
}

proptest! {
    #[test]
    fn test_score_is_weighted_count(critical in 0usize..5, major in 0usize..10, minor in 0usize..20) {
        let mut errors = MqmErrors::new();
        for _ in 0..critical {
            errors.push(ErrorAnnotation::new("c", "d", Severity::Critical));
        }
        for _ in 0..major {
            errors.push(ErrorAnnotation::new("c", "d", Severity::Major));
        }
        for _ in 0..minor {
            errors.push(ErrorAnnotation::new("c", "d", Severity::Minor));
        }

        let expected = -25 * critical as i64 - 5 * major as i64 - (minor as i64);
        prop_assert_eq!(errors.score(), expected);
        prop_assert!(errors.score() <= 0);
    }
}
