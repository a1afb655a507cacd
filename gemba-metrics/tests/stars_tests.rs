use gemba_core::AnswerParser;
use gemba_metrics::parsers::{validate_stars, StarRatingParser};
use proptest::prelude::*;
use test_case::test_case;

#[test_case("***" => Some(3); "asterisk glyphs")]
#[test_case("★★★★" => Some(4); "star glyphs")]
#[test_case("five stars" => Some(5); "word form")]
#[test_case("Four stars." => Some(4); "capitalised word form")]
#[test_case("3 stars" => Some(3); "digit form")]
#[test_case("**3 stars**" => Some(3); "bold wrapper is not a glyph count")]
#[test_case("Stars: 2" => Some(2); "bare number")]
#[test_case("1 star" => Some(1); "singular")]
#[test_case("10 stars" => None; "out of range")]
#[test_case("0" => None; "zero is out of range")]
#[test_case("4 stars ★★★" => None; "glyphs disagree with digits")]
#[test_case("three stars out of five" => None; "two word forms disagree")]
#[test_case("" => None; "empty")]
#[test_case("a decent translation" => None; "no signal")]
fn test_validate_stars(answer: &str) -> Option<i64> {
    validate_stars(answer)
}

#[test]
fn test_word_match_is_space_delimited() {
    // "someone" must not read as "one".
    assert_eq!(validate_stars("someone said ★★"), Some(2));
}

#[test]
fn test_newlines_are_word_boundaries() {
    assert_eq!(validate_stars("Rating:\nfive\nstars"), Some(5));
}

#[test]
fn test_parser_trait() {
    assert_eq!(StarRatingParser.parse("★★★★★"), Some(5));
    assert_eq!(StarRatingParser.parse("six stars"), None);
}

proptest! {
    #[test]
    fn prop_glyph_count_is_rating(n in 1usize..=5) {
        prop_assert_eq!(validate_stars(&"★".repeat(n)), Some(n as i64));
    }

    #[test]
    fn prop_result_always_in_range(answer in ".{0,48}") {
        if let Some(stars) = validate_stars(&answer) {
            prop_assert!((1..=5).contains(&stars));
        }
    }
}
