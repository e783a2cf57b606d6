//! Anonymization orchestrator.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info};

use super::classifier::ColumnClassifier;
use super::config::{ClassifierConfig, MaskingConfig};
use super::loss::estimate_data_loss;
use super::masking::{IdMapping, Masker};
use super::models::{AnonymizationReport, ColumnMasking, MaskingMethod};
use crate::{CellValue, Dataset, Result, TableMaskError};

/// Classifies and masks every column of a dataset.
///
/// Anonymizers hold configuration only. Per-run state lives in the
/// [`IdMapping`] and the report being built, so one instance can serve
/// concurrent callers.
///
/// # Example
/// ```rust
/// use tablemask_core::{Anonymizer, CellValue, Column, Dataset};
///
/// let dataset = Dataset::new(vec![
///     Column::from_values("email", ["a@x.com", "b@y.com"]),
///     Column::from_values("age", [30_i64, 42]),
/// ])?;
///
/// let (masked, report) = Anonymizer::default().anonymize(&dataset)?;
/// assert_eq!(report.sensitive_columns_detected, vec!["email"]);
/// assert_eq!(masked.column("email").unwrap().values()[0], CellValue::text("*@*.com"));
/// # Ok::<(), tablemask_core::TableMaskError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Anonymizer {
    classifier: ColumnClassifier,
    masker: Masker,
}

impl Anonymizer {
    /// Creates a new anonymizer.
    pub fn new(classifier_config: ClassifierConfig, masking_config: MaskingConfig) -> Self {
        Self {
            classifier: ColumnClassifier::new(classifier_config),
            masker: Masker::new(masking_config),
        }
    }

    /// Returns the column classifier.
    pub fn classifier(&self) -> &ColumnClassifier {
        &self.classifier
    }

    /// Anonymizes a copy of `dataset` with a fresh identifier mapping.
    ///
    /// The input is never modified. Any column failure aborts the whole run
    /// and no partial report is returned.
    pub fn anonymize(&self, dataset: &Dataset) -> Result<(Dataset, AnonymizationReport)> {
        let mut mapping = IdMapping::new();
        self.anonymize_with_mapping(dataset, &mut mapping)
    }

    /// Anonymizes a copy of `dataset` using a caller-owned mapping, so
    /// identifiers stay stable across runs that share it.
    pub fn anonymize_with_mapping(
        &self,
        dataset: &Dataset,
        mapping: &mut IdMapping,
    ) -> Result<(Dataset, AnonymizationReport)> {
        let start = Instant::now();
        let mut working = dataset.clone();

        let mut columns_processed = 0usize;
        let mut sensitive_columns_detected = Vec::new();
        let mut anonymization_methods = BTreeMap::new();
        let mut data_loss_estimate = 0.0;

        for (index, column) in dataset.columns().iter().enumerate() {
            columns_processed += 1;

            let classification = self.classifier.classify(column);
            let Some(reason) = classification.matched_reason else {
                continue;
            };

            let method = MaskingMethod::for_column(column.name());
            let masked = self.masker.mask_column(method, column.values(), mapping);
            check_shape(column.name(), column.values(), &masked)?;

            let data_loss = estimate_data_loss(column.values(), &masked);
            working.replace_values(index, masked)?;

            debug!(
                column = column.name(),
                method = method.as_str(),
                reason = reason.kind(),
                data_loss,
                "masked sensitive column"
            );

            data_loss_estimate += data_loss;
            sensitive_columns_detected.push(column.name().to_string());
            anonymization_methods.insert(
                column.name().to_string(),
                ColumnMasking {
                    method,
                    data_loss,
                    reason,
                },
            );
        }

        let report = AnonymizationReport {
            columns_processed,
            columns_anonymized: sensitive_columns_detected.len(),
            sensitive_columns_detected,
            anonymization_methods,
            data_loss_estimate,
            processing_time: start.elapsed().as_secs_f64(),
        };

        info!(
            columns_processed = report.columns_processed,
            columns_anonymized = report.columns_anonymized,
            data_loss_estimate = report.data_loss_estimate,
            "anonymization_completed"
        );

        Ok((working, report))
    }
}

/// Verifies a masked column kept its length and null positions.
fn check_shape(column: &str, original: &[CellValue], masked: &[CellValue]) -> Result<()> {
    if original.len() != masked.len() {
        return Err(TableMaskError::anonymization(
            column,
            format!(
                "masking produced {} values for {} rows",
                masked.len(),
                original.len()
            ),
        ));
    }
    if let Some(row) = original
        .iter()
        .zip(masked)
        .position(|(o, m)| o.is_null() != m.is_null())
    {
        return Err(TableMaskError::anonymization(
            column,
            format!("null position changed at row {}", row + 1),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;

    fn sample_dataset() -> Dataset {
        Dataset::new(vec![
            Column::from_values("email", [Some("a@x.com"), None, Some("b@y.com")]),
            Column::from_values("age", [30_i64, 42, 42]),
            Column::from_values("status", ["open", "open", "closed"]),
            Column::from_values("customer_id", ["c1", "c2", "c1"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_report_counts() {
        let (_, report) = Anonymizer::default().anonymize(&sample_dataset()).unwrap();

        assert_eq!(report.columns_processed, 4);
        assert_eq!(report.columns_anonymized, 2);
        assert_eq!(report.sensitive_columns_detected, vec!["email", "customer_id"]);
        assert_eq!(
            report.anonymization_methods["customer_id"].method,
            MaskingMethod::IdMapping
        );
        assert!(report.processing_time >= 0.0);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let dataset = sample_dataset();
        let before = dataset.clone();
        let (masked, _) = Anonymizer::default().anonymize(&dataset).unwrap();

        assert_eq!(dataset, before);
        assert_ne!(masked, before);
        assert_eq!(masked.column("status"), before.column("status"));
        assert_eq!(masked.column("age"), before.column("age"));
    }

    #[test]
    fn test_nulls_preserved() {
        let (masked, _) = Anonymizer::default().anonymize(&sample_dataset()).unwrap();
        assert_eq!(masked.column("email").unwrap().values()[1], CellValue::Null);
    }

    #[test]
    fn test_data_loss_is_summed() {
        let (_, report) = Anonymizer::default().anonymize(&sample_dataset()).unwrap();
        let sum: f64 = report
            .anonymization_methods
            .values()
            .map(|m| m.data_loss)
            .sum();
        assert!((report.data_loss_estimate - sum).abs() < 1e-12);
    }

    #[test]
    fn test_shared_mapping_is_stable_across_runs() {
        let anonymizer = Anonymizer::default();
        let mut mapping = IdMapping::new();
        let (first, _) = anonymizer
            .anonymize_with_mapping(&sample_dataset(), &mut mapping)
            .unwrap();
        let (second, _) = anonymizer
            .anonymize_with_mapping(&sample_dataset(), &mut mapping)
            .unwrap();
        assert_eq!(first.column("customer_id"), second.column("customer_id"));
    }

    #[test]
    fn test_check_shape_rejects_moved_nulls() {
        let err = check_shape(
            "email",
            &[CellValue::Null, CellValue::text("a")],
            &[CellValue::text("x"), CellValue::text("y")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("null position changed at row 1"));
    }

    #[test]
    fn test_empty_dataset() {
        let (masked, report) = Anonymizer::default()
            .anonymize(&Dataset::default())
            .unwrap();
        assert_eq!(masked.column_count(), 0);
        assert_eq!(report.columns_processed, 0);
        assert_eq!(report.data_loss_estimate, 0.0);
    }
}
