//! Sensitive column detection.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//! 1. the column name contains a sensitive keyword
//! 2. a sampled value matches a content pattern
//! 3. the unique/row ratio exceeds the cardinality threshold

use super::config::ClassifierConfig;
use super::models::{ColumnClassification, SensitivityReason};
use super::patterns::{ContentPattern, ContentPatterns};
use crate::{Column, Dataset};

/// Decides whether columns hold sensitive data.
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    config: ClassifierConfig,
    keywords: Vec<String>,
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl ColumnClassifier {
    /// Creates a new classifier.
    pub fn new(config: ClassifierConfig) -> Self {
        let keywords = config
            .keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { config, keywords }
    }

    /// Returns the classifier configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies a single column.
    pub fn classify(&self, column: &Column) -> ColumnClassification {
        let name = column.name();

        if let Some(keyword) = self.matching_keyword(name) {
            return ColumnClassification::sensitive(
                name,
                SensitivityReason::NameKeyword {
                    keyword: keyword.to_string(),
                },
            );
        }

        if let Some(pattern) = self.sniff_content(column) {
            return ColumnClassification::sensitive(
                name,
                SensitivityReason::ContentPattern { pattern },
            );
        }

        if let Some(ratio) = self.cardinality_ratio(column)
            && ratio > self.config.cardinality_threshold
        {
            return ColumnClassification::sensitive(
                name,
                SensitivityReason::HighCardinality { ratio },
            );
        }

        ColumnClassification::clear(name)
    }

    /// Returns true if the column is sensitive.
    pub fn is_sensitive(&self, column: &Column) -> bool {
        self.classify(column).is_sensitive
    }

    /// Classifies every column in dataset order.
    pub fn classify_dataset(&self, dataset: &Dataset) -> Vec<ColumnClassification> {
        dataset.columns().iter().map(|c| self.classify(c)).collect()
    }

    fn matching_keyword(&self, name: &str) -> Option<&str> {
        let lowered = name.to_lowercase();
        self.keywords
            .iter()
            .find(|keyword| lowered.contains(keyword.as_str()))
            .map(String::as_str)
    }

    fn sniff_content(&self, column: &Column) -> Option<ContentPattern> {
        let patterns = ContentPatterns::instance();
        column
            .non_null()
            .take(self.config.sample_size)
            .filter_map(crate::CellValue::to_text)
            .find_map(|value| patterns.find_match(&value))
    }

    /// Unique/row ratio, or `None` when the rule does not apply.
    fn cardinality_ratio(&self, column: &Column) -> Option<f64> {
        if column.is_empty() {
            return None;
        }
        if !self.config.cardinality_applies_to_numeric && column.dtype().is_numeric() {
            return None;
        }
        Some(column.unique_count() as f64 / column.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellValue;

    fn column(name: &str, values: &[&str]) -> Column {
        Column::from_values(name, values.iter().copied())
    }

    #[test]
    fn test_name_keyword_wins() {
        let classifier = ColumnClassifier::default();
        let result = classifier.classify(&column("Customer_Email", &["x", "x"]));
        assert!(result.is_sensitive);
        assert_eq!(
            result.matched_reason,
            Some(SensitivityReason::NameKeyword {
                keyword: "email".to_string()
            })
        );
    }

    #[test]
    fn test_accented_keyword() {
        let classifier = ColumnClassifier::default();
        let result = classifier.classify(&column("TÉLÉPHONE", &["x", "x"]));
        assert!(result.is_sensitive);
    }

    #[test]
    fn test_content_pattern() {
        let classifier = ColumnClassifier::default();
        let result = classifier.classify(&column("contact", &["n/a", "n/a", "bob@corp.io"]));
        assert_eq!(
            result.matched_reason,
            Some(SensitivityReason::ContentPattern {
                pattern: ContentPattern::Email
            })
        );
    }

    #[test]
    fn test_content_sample_is_capped() {
        let mut values = vec!["same"; 5];
        values.push("late@corp.io");
        let classifier = ColumnClassifier::new(ClassifierConfig::new().with_sample_size(5));
        assert!(!classifier.is_sensitive(&column("notes", &values)));

        let classifier = ColumnClassifier::new(ClassifierConfig::new().with_sample_size(6));
        assert!(classifier.is_sensitive(&column("notes", &values)));
    }

    #[test]
    fn test_high_cardinality() {
        let classifier = ColumnClassifier::default();
        let result = classifier.classify(&column("name", &["Alice", "Bob"]));
        assert_eq!(
            result.matched_reason,
            Some(SensitivityReason::HighCardinality { ratio: 1.0 })
        );
    }

    #[test]
    fn test_low_cardinality_is_clear() {
        let classifier = ColumnClassifier::default();
        let result = classifier.classify(&column("status", &["open", "open", "closed"]));
        assert!(!result.is_sensitive);
        assert!(result.matched_reason.is_none());
    }

    #[test]
    fn test_numeric_columns_skip_cardinality_by_default() {
        let age = Column::from_values("age", [30_i64, 42]);
        assert!(!ColumnClassifier::default().is_sensitive(&age));

        let strict = ColumnClassifier::new(
            ClassifierConfig::new().with_cardinality_applies_to_numeric(true),
        );
        assert!(strict.is_sensitive(&age));
    }

    #[test]
    fn test_all_null_column_is_never_flagged() {
        let classifier = ColumnClassifier::default();
        let empty = Column::new("notes", vec![CellValue::Null; 4]);
        assert!(!classifier.is_sensitive(&empty));

        let no_rows = Column::new("notes", vec![]);
        assert!(!classifier.is_sensitive(&no_rows));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let dataset = Dataset::new(vec![
            column("email", &["a@x.com", "b@y.com"]),
            column("city", &["Paris", "Paris"]),
        ])
        .unwrap();
        let classifier = ColumnClassifier::default();
        assert_eq!(
            classifier.classify_dataset(&dataset),
            classifier.classify_dataset(&dataset)
        );
    }
}
