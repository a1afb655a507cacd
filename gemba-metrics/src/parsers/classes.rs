use gemba_core::{AnswerParser, CoreError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Index of the single class label found in `answer`, matched
/// case-insensitively as a substring.
///
/// Two or more distinct labels make the answer ambiguous and yield `None`.
pub fn parse_classes<S: AsRef<str>>(answer: &str, classes: &[S]) -> Option<usize> {
    let answer_lower = answer.to_lowercase();
    let mut found = None;

    for (index, class) in classes.iter().enumerate() {
        if answer_lower.contains(&class.as_ref().to_lowercase()) {
            if found.is_some() {
                warn!(answer = %answer, "Two classes found in answer");
                return None;
            }
            found = Some(index);
        }
    }

    found
}

/// Ordered, mutually exclusive class labels. Position defines the index
/// returned by [`parse_classes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ClassList(Vec<String>);

impl ClassList {
    /// Rejects empty lists and any label contained (case-insensitively) in
    /// another, since such a pair could never be selected unambiguously.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(CoreError::Validation("Class list is empty".to_string()));
        }

        let lowered: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
        for (i, a) in lowered.iter().enumerate() {
            if a.trim().is_empty() {
                return Err(CoreError::Validation(format!("Class {} is blank", i)));
            }
            for (j, b) in lowered.iter().enumerate() {
                if i != j && b.contains(a.as_str()) {
                    return Err(CoreError::Validation(format!(
                        "Class \"{}\" is contained in class \"{}\"",
                        labels[i], labels[j]
                    )));
                }
            }
        }

        Ok(Self(labels))
    }

    pub(crate) fn from_static(labels: &[&str]) -> Self {
        Self(labels.iter().map(|l| l.to_string()).collect())
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for ClassList {
    type Error = CoreError;

    fn try_from(labels: Vec<String>) -> Result<Self> {
        Self::new(labels)
    }
}

impl From<ClassList> for Vec<String> {
    fn from(classes: ClassList) -> Self {
        classes.0
    }
}

impl AnswerParser for ClassList {
    type Output = usize;

    fn parse(&self, answer: &str) -> Option<usize> {
        parse_classes(answer, &self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_overlapping_labels() {
        let err = ClassList::new(["good", "very good"]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_rejects_case_insensitive_overlap() {
        assert!(ClassList::new(["Bad", "not bad at all"]).is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(ClassList::new(Vec::<String>::new()).is_err());
        assert!(ClassList::new(["ok", "  "]).is_err());
    }

    #[test]
    fn test_accepts_disjoint_labels() {
        let classes = ClassList::new(["poor", "fair", "excellent"]).unwrap();
        assert_eq!(classes.len(), 3);
        assert_eq!(classes.label(2), Some("excellent"));
        assert_eq!(classes.parse("I'd call it FAIR."), Some(1));
    }
}
