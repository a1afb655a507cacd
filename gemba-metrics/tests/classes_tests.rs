use gemba_core::{AnswerParser, CoreError};
use gemba_metrics::parsers::{parse_classes, ClassList};
use gemba_metrics::protocols::templates::CLASS_LABELS;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

#[fixture]
fn classes() -> ClassList {
    ClassList::new(CLASS_LABELS).unwrap()
}

#[rstest]
#[case("Perfect translation", Some(4))]
#[case("Class: most meaning preserved, minor issues", Some(3))]
#[case("SOME MEANING PRESERVED AND UNDERSTANDABLE", Some(2))]
#[case("Some meaning preserved, but not understandable.", Some(1))]
#[case("No meaning preserved", Some(0))]
#[case("It is a perfect translation, though no meaning preserved in places", None)]
#[case("Excellent work", None)]
#[case("", None)]
fn test_select_class(classes: ClassList, #[case] answer: &str, #[case] expected: Option<usize>) {
    assert_eq!(classes.parse(answer), expected);
    assert_eq!(parse_classes(answer, &CLASS_LABELS), expected);
}

#[test]
fn test_index_follows_list_order() {
    let classes = ClassList::new(["bad", "okay", "great"]).unwrap();
    assert_eq!(classes.parse("great!"), Some(2));

    let reversed = ClassList::new(["great", "okay", "bad"]).unwrap();
    assert_eq!(reversed.parse("great!"), Some(0));
}

#[test]
fn test_overlapping_labels_rejected() {
    let err = ClassList::new(["good", "Very Good"]).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn test_deserialize_validates() {
    let ok: ClassList = serde_json::from_str(r#"["poor", "fine"]"#).unwrap();
    assert_eq!(ok.labels(), &["poor".to_string(), "fine".to_string()]);

    assert!(serde_json::from_str::<ClassList>(r#"["fine", "mostly fine"]"#).is_err());
    assert!(serde_json::from_str::<ClassList>("[]").is_err());
}

#[test]
fn test_serializes_as_plain_list() {
    let classes = ClassList::new(["poor", "fine"]).unwrap();
    assert_eq!(
        serde_json::to_value(&classes).unwrap(),
        serde_json::json!(["poor", "fine"])
    );
}
