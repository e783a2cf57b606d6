//! Privacy report surfaced to API consumers.

use serde::{Deserialize, Serialize};

use super::models::AnonymizationReport;
use crate::Dataset;

/// Organisation-level constants stamped onto every privacy report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyPolicy {
    /// Days the uploaded data is kept
    pub data_retention_days: u32,
    /// Compliance status label
    pub compliance_status: String,
    /// Declared purpose of processing
    pub data_processing_purpose: String,
    /// Party responsible for the data
    pub data_controller: String,
}

impl Default for PrivacyPolicy {
    fn default() -> Self {
        Self {
            data_retention_days: 30,
            compliance_status: "compliant".to_string(),
            data_processing_purpose: "automated_data_analysis".to_string(),
            data_controller: "tablemask".to_string(),
        }
    }
}

impl PrivacyPolicy {
    /// Creates a new policy with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the retention period.
    pub fn with_data_retention_days(mut self, days: u32) -> Self {
        self.data_retention_days = days;
        self
    }

    /// Builder method to set the data controller.
    pub fn with_data_controller(mut self, controller: impl Into<String>) -> Self {
        self.data_controller = controller.into();
        self
    }

    /// Builder method to set the processing purpose.
    pub fn with_data_processing_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.data_processing_purpose = purpose.into();
        self
    }
}

/// Privacy summary of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyReport {
    /// Whether the anonymizer ran
    pub anonymization_applied: bool,
    /// Empty when anonymization was not applied
    pub sensitive_columns_detected: Vec<String>,
    /// Copied from the policy
    pub data_retention_days: u32,
    /// Copied from the policy
    pub compliance_status: String,
    /// Copied from the policy
    pub data_processing_purpose: String,
    /// Copied from the policy
    pub data_controller: String,
    /// Rows in the input dataset
    pub total_rows: usize,
    /// Columns in the input dataset
    pub total_columns: usize,
    /// Full anonymization report, when anonymization ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymization_details: Option<AnonymizationReport>,
}

impl PrivacyReport {
    /// Builds the report for `dataset`, with or without an anonymization
    /// run.
    pub fn build(
        dataset: &Dataset,
        anonymization: Option<AnonymizationReport>,
        policy: &PrivacyPolicy,
    ) -> Self {
        let sensitive_columns_detected = anonymization
            .as_ref()
            .map(|r| r.sensitive_columns_detected.clone())
            .unwrap_or_default();

        Self {
            anonymization_applied: anonymization.is_some(),
            sensitive_columns_detected,
            data_retention_days: policy.data_retention_days,
            compliance_status: policy.compliance_status.clone(),
            data_processing_purpose: policy.data_processing_purpose.clone(),
            data_controller: policy.data_controller.clone(),
            total_rows: dataset.row_count(),
            total_columns: dataset.column_count(),
            anonymization_details: anonymization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Anonymizer, Column};

    #[test]
    fn test_report_without_anonymization() {
        let dataset = Dataset::new(vec![Column::from_values("email", ["a@x.com"])]).unwrap();
        let report = PrivacyReport::build(&dataset, None, &PrivacyPolicy::default());

        assert!(!report.anonymization_applied);
        assert!(report.sensitive_columns_detected.is_empty());
        assert_eq!(report.data_retention_days, 30);
        assert_eq!(report.compliance_status, "compliant");
        assert_eq!(report.total_rows, 1);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("anonymization_details").is_none());
    }

    #[test]
    fn test_report_with_anonymization() {
        let dataset = Dataset::new(vec![Column::from_values("email", ["a@x.com"])]).unwrap();
        let (_, details) = Anonymizer::default().anonymize(&dataset).unwrap();
        let policy = PrivacyPolicy::new().with_data_controller("Acme");
        let report = PrivacyReport::build(&dataset, Some(details), &policy);

        assert!(report.anonymization_applied);
        assert_eq!(report.sensitive_columns_detected, vec!["email"]);
        assert_eq!(report.data_controller, "Acme");

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("a@x.com"));
    }
}
