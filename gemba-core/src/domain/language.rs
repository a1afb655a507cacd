/// Language codes with a known display name.
pub const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("de", "German"),
    ("zh", "Chinese"),
    ("ru", "Russian"),
];

/// Full language name for a known code; anything else is returned unchanged.
pub fn language_name(code: &str) -> &str {
    LANGUAGE_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code.trim()))
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("ZH"), "Chinese");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(language_name("Czech"), "Czech");
        assert_eq!(language_name("cs"), "cs");
    }
}
