use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// MQM severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

impl Severity {
    /// Tiers in the order they appear in an annotation block.
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Major, Severity::Minor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Major => "major",
            Severity::Minor => "minor",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "major" => Ok(Severity::Major),
            "minor" => Ok(Severity::Minor),
            other => Err(CoreError::Validation(format!("Unknown severity: {}", other))),
        }
    }
}

/// Penalty applied per annotation of each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub critical: i64,
    pub major: i64,
    pub minor: i64,
}

impl SeverityWeights {
    /// The standard MQM weighting.
    pub const MQM: SeverityWeights = SeverityWeights {
        critical: -25,
        major: -5,
        minor: -1,
    };

    pub fn weight(&self, severity: Severity) -> i64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
        }
    }
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self::MQM
    }
}

/// One categorized translation error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorAnnotation {
    pub category: String,
    pub description: String,
    pub severity: Severity,
}

impl ErrorAnnotation {
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            category: category.into(),
            description: description.into(),
            severity,
        }
    }
}

/// Annotations grouped by severity, in extraction order within each tier.
///
/// Duplicate `(category, description)` pairs are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqmErrors {
    #[serde(default)]
    pub critical: Vec<ErrorAnnotation>,
    #[serde(default)]
    pub major: Vec<ErrorAnnotation>,
    #[serde(default)]
    pub minor: Vec<ErrorAnnotation>,
}

impl MqmErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files the annotation under its own severity.
    pub fn push(&mut self, annotation: ErrorAnnotation) {
        match annotation.severity {
            Severity::Critical => self.critical.push(annotation),
            Severity::Major => self.major.push(annotation),
            Severity::Minor => self.minor.push(annotation),
        }
    }

    pub fn get(&self, severity: Severity) -> &[ErrorAnnotation] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::Major => &self.major,
            Severity::Minor => &self.minor,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorAnnotation> {
        self.critical
            .iter()
            .chain(self.major.iter())
            .chain(self.minor.iter())
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.major.len() + self.minor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the standard MQM weights; 0 for an empty set.
    pub fn score(&self) -> i64 {
        self.score_with(&SeverityWeights::MQM)
    }

    pub fn score_with(&self, weights: &SeverityWeights) -> i64 {
        self.iter().map(|a| weights.weight(a.severity)).sum()
    }
}

impl FromIterator<ErrorAnnotation> for MqmErrors {
    fn from_iter<I: IntoIterator<Item = ErrorAnnotation>>(iter: I) -> Self {
        let mut errors = MqmErrors::new();
        for annotation in iter {
            errors.push(annotation);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_routes_by_severity() {
        let mut errors = MqmErrors::new();
        errors.push(ErrorAnnotation::new("accuracy/omission", "x", Severity::Critical));
        errors.push(ErrorAnnotation::new("fluency/grammar", "y", Severity::Minor));

        assert_eq!(errors.critical.len(), 1);
        assert!(errors.major.is_empty());
        assert_eq!(errors.get(Severity::Minor)[0].description, "y");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(MqmErrors::new().score(), 0);
    }

    #[test]
    fn test_weights_sum() {
        let errors: MqmErrors = vec![
            ErrorAnnotation::new("a", "1", Severity::Critical),
            ErrorAnnotation::new("b", "2", Severity::Major),
            ErrorAnnotation::new("c", "3", Severity::Minor),
            ErrorAnnotation::new("c", "3", Severity::Minor),
        ]
        .into_iter()
        .collect();

        assert_eq!(errors.score(), -25 - 5 - 1 - 1);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("Major".parse::<Severity>().unwrap(), Severity::Major);
        assert!("blocker".parse::<Severity>().is_err());
    }
}
