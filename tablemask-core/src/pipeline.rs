//! End-to-end analysis pipeline.
//!
//! One run assigns an analysis id, optionally anonymizes the dataset,
//! profiles the original or the anonymized frame, and builds the privacy
//! report. Runs share no mutable state, so a pipeline can be used from
//! several threads at once.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::ingest::{CleaningConfig, IngestConfig, clean_dataset, read_csv_bytes};
use crate::privacy::{Anonymizer, ClassifierConfig, MaskingConfig, PrivacyPolicy, PrivacyReport};
use crate::profile::{DataProfiler, DataSummary, ProfileConfig};
use crate::{Dataset, Result, TableMaskError};

/// Which frame the profiler sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStage {
    /// Profile the data before masking; the summary then carries raw values
    Original,
    /// Profile the masked output
    #[default]
    Anonymized,
}

/// Pipeline configuration.
///
/// Loaded from JSON by the CLI; every field is optional there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Mask sensitive columns
    pub anonymize: bool,
    /// Frame handed to the profiler
    pub profile_stage: ProfileStage,
    /// Run the cleaning pass on CSV input
    pub clean: bool,
    /// CSV reading settings
    pub ingest: IngestConfig,
    /// Cleaning pass settings
    pub cleaning: CleaningConfig,
    /// Sensitive column detection settings
    pub classifier: ClassifierConfig,
    /// Masking settings, including the hash salt
    pub masking: MaskingConfig,
    /// Profiling settings
    pub profile: ProfileConfig,
    /// Constants reported in the privacy report
    pub policy: PrivacyPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            anonymize: true,
            profile_stage: ProfileStage::Anonymized,
            clean: true,
            ingest: IngestConfig::default(),
            cleaning: CleaningConfig::default(),
            classifier: ClassifierConfig::default(),
            masking: MaskingConfig::default(),
            profile: ProfileConfig::default(),
            policy: PrivacyPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new pipeline config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to enable/disable anonymization.
    pub fn with_anonymize(mut self, anonymize: bool) -> Self {
        self.anonymize = anonymize;
        self
    }

    /// Builder method to choose the profiled frame.
    pub fn with_profile_stage(mut self, stage: ProfileStage) -> Self {
        self.profile_stage = stage;
        self
    }

    /// Builder method to enable/disable the cleaning pass.
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Builder method to set the classifier config.
    pub fn with_classifier(mut self, config: ClassifierConfig) -> Self {
        self.classifier = config;
        self
    }

    /// Builder method to set the masking config.
    pub fn with_masking(mut self, config: MaskingConfig) -> Self {
        self.masking = config;
        self
    }

    /// Builder method to set the profile config.
    pub fn with_profile(mut self, config: ProfileConfig) -> Self {
        self.profile = config;
        self
    }

    /// Builder method to set the privacy policy.
    pub fn with_policy(mut self, policy: PrivacyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parses a JSON configuration; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| TableMaskError::serialization("Failed to parse pipeline config", e))
    }

    /// Validates every sub-configuration.
    pub fn validate(&self) -> Result<()> {
        self.classifier
            .validate()
            .map_err(|e| TableMaskError::configuration(e.to_string()))?;
        self.masking
            .validate()
            .map_err(|e| TableMaskError::configuration(e.to_string()))?;
        self.profile
            .validate()
            .map_err(|e| TableMaskError::configuration(e.to_string()))?;
        Ok(())
    }
}

/// Result of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    /// Unique id of this run
    pub analysis_id: Uuid,
    /// When the run finished
    pub created_at: DateTime<Utc>,
    /// Wall-clock seconds for the whole run
    pub processing_time: f64,
    /// Profile of the frame selected by `profile_stage`
    pub data_summary: DataSummary,
    /// Privacy report for the run
    pub privacy_report: PrivacyReport,
    /// The anonymized dataset, or an untouched copy when anonymization is off
    #[serde(skip)]
    pub dataset: Dataset,
}

/// Runs anonymization and profiling over datasets.
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: PipelineConfig,
    anonymizer: Anonymizer,
    profiler: DataProfiler,
}

impl AnalysisPipeline {
    /// Creates a pipeline after validating the configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            anonymizer: Anonymizer::new(config.classifier.clone(), config.masking.clone()),
            profiler: DataProfiler::new(config.profile.clone()),
            config,
        })
    }

    /// Creates a pipeline with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(PipelineConfig::default())
    }

    /// Returns a reference to the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parses CSV bytes, cleans them if configured, and runs the analysis.
    pub fn run_csv_bytes(&self, bytes: &[u8]) -> Result<AnalysisOutcome> {
        let dataset = read_csv_bytes(bytes, &self.config.ingest)?;
        let dataset = if self.config.clean {
            clean_dataset(&dataset, &self.config.cleaning)?
        } else {
            dataset
        };
        self.run(&dataset)
    }

    /// Runs one analysis over `dataset`.
    ///
    /// Anonymization failures abort the run. Profiling failures only drop
    /// the affected column's statistics.
    pub fn run(&self, dataset: &Dataset) -> Result<AnalysisOutcome> {
        let start = Instant::now();
        let analysis_id = Uuid::new_v4();
        info!(
            %analysis_id,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            anonymize = self.config.anonymize,
            "analysis started"
        );

        let (output, anonymization) = if self.config.anonymize {
            match self.anonymizer.anonymize(dataset) {
                Ok((masked, report)) => (masked, Some(report)),
                Err(e) => {
                    error!(%analysis_id, error = %e, "anonymization failed");
                    return Err(e);
                }
            }
        } else {
            (dataset.clone(), None)
        };

        let profiled = match self.config.profile_stage {
            ProfileStage::Original => dataset,
            ProfileStage::Anonymized => &output,
        };
        let data_summary = self.profiler.profile(profiled);

        let privacy_report = PrivacyReport::build(dataset, anonymization, &self.config.policy);

        let outcome = AnalysisOutcome {
            analysis_id,
            created_at: Utc::now(),
            processing_time: start.elapsed().as_secs_f64(),
            data_summary,
            privacy_report,
            dataset: output,
        };

        info!(
            %analysis_id,
            anonymization_applied = outcome.privacy_report.anonymization_applied,
            sensitive_columns = outcome.privacy_report.sensitive_columns_detected.len(),
            processing_time = outcome.processing_time,
            "analysis completed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CellValue, Column};

    fn create_dataset() -> Dataset {
        Dataset::new(vec![
            Column::from_values("email", ["a@x.com", "b@y.com"]),
            Column::from_values("age", [30_i64, 42]),
            Column::from_values("name", ["Alice", "Bob"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.anonymize);
        assert_eq!(config.profile_stage, ProfileStage::Anonymized);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config =
            PipelineConfig::new().with_masking(MaskingConfig::new().with_hash_salt(""));
        let err = AnalysisPipeline::new(config).unwrap_err();
        assert!(matches!(err, TableMaskError::Configuration { .. }));
        assert!(err.to_string().contains("hash_salt"));
    }

    #[test]
    fn test_profile_stage_selects_frame() {
        let dataset = create_dataset();

        let original = AnalysisPipeline::new(
            PipelineConfig::new().with_profile_stage(ProfileStage::Original),
        )
        .unwrap()
        .run(&dataset)
        .unwrap();
        assert_eq!(
            original.data_summary.sample_data["email"][0],
            CellValue::text("a@x.com")
        );

        let anonymized = AnalysisPipeline::with_defaults().unwrap().run(&dataset).unwrap();
        assert_eq!(
            anonymized.data_summary.sample_data["email"][0],
            CellValue::text("*@*.com")
        );
    }

    #[test]
    fn test_outcome_serialization_skips_dataset() {
        let outcome = AnalysisPipeline::with_defaults()
            .unwrap()
            .run(&create_dataset())
            .unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("dataset").is_none());
        assert!(json.get("analysis_id").is_some());
        assert_eq!(json["privacy_report"]["anonymization_applied"], true);
    }

    #[test]
    fn test_default_outcome_carries_no_raw_values() {
        let outcome = AnalysisPipeline::with_defaults()
            .unwrap()
            .run(&create_dataset())
            .unwrap();
        let json = serde_json::to_string(&outcome).unwrap();

        for raw in ["a@x.com", "b@y.com", "Alice", "Bob"] {
            assert!(!json.contains(raw), "outcome exposes {raw}");
        }
        assert!(json.contains("\"age\""));
    }

    #[test]
    fn test_config_roundtrip_from_partial_json() {
        let config =
            PipelineConfig::from_json(r#"{"anonymize": false, "profile_stage": "original"}"#)
                .unwrap();
        assert!(!config.anonymize);
        assert_eq!(config.profile_stage, ProfileStage::Original);
        assert_eq!(config.masking.hash_length, 8);
    }

    #[test]
    fn test_config_parse_error() {
        let err = PipelineConfig::from_json("{\"anonymize\": 1}").unwrap_err();
        assert!(matches!(err, TableMaskError::Serialization { .. }));
    }

    #[test]
    fn test_run_csv_bytes_cleans_input() {
        let pipeline = AnalysisPipeline::with_defaults().unwrap();
        let outcome = pipeline
            .run_csv_bytes(b"Customer Email,Age\na@x.com,30\n,\nb@y.com,42\n")
            .unwrap();
        assert_eq!(outcome.data_summary.shape.rows, 2);
        assert_eq!(
            outcome.privacy_report.sensitive_columns_detected,
            vec!["customer_email"]
        );
    }
}
