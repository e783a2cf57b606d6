//! Classification and masking configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column-name keywords that mark a column as sensitive.
///
/// Matched as case-insensitive substrings, so `id` also flags `user_id`.
pub const DEFAULT_SENSITIVE_KEYWORDS: [&str; 31] = [
    "email",
    "mail",
    "phone",
    "téléphone",
    "tel",
    "mobile",
    "ssn",
    "social",
    "security",
    "numéro",
    "number",
    "credit",
    "card",
    "carte",
    "iban",
    "account",
    "compte",
    "address",
    "adresse",
    "postal",
    "zip",
    "code",
    "ip",
    "mac",
    "id",
    "identifier",
    "identifiant",
    "password",
    "mot_de_passe",
    "secret",
    "token",
];

/// Salt mixed into every generic hash unless overridden.
pub const DEFAULT_HASH_SALT: &str = "tablemask-anon-v1";

/// Length of a SHA-256 digest in hex characters.
const MAX_HASH_LENGTH: usize = 64;

/// Validation errors for privacy configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    /// Cardinality threshold outside `[0, 1]`
    #[error("cardinality_threshold must be between 0.0 and 1.0, got {0}")]
    InvalidCardinalityThreshold(f64),
    /// Content sample size of zero
    #[error("sample_size must be at least 1")]
    EmptySample,
    /// Empty hash salt
    #[error("hash_salt must not be empty")]
    EmptyHashSalt,
    /// Hash length outside `1..=64`
    #[error("hash_length must be between 1 and 64, got {0}")]
    InvalidHashLength(usize),
    /// Alphanumeric mask character
    #[error("mask_char must not be alphanumeric, got '{0}'")]
    InvalidMaskChar(char),
}

/// Sensitive-column detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Column-name keywords, matched case-insensitively as substrings
    pub keywords: Vec<String>,
    /// Number of non-null values sniffed by the content patterns
    pub sample_size: usize,
    /// A column whose unique/row ratio exceeds this is flagged
    pub cardinality_threshold: f64,
    /// Apply the cardinality rule to numeric columns as well
    pub cardinality_applies_to_numeric: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_SENSITIVE_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            sample_size: 100,
            cardinality_threshold: 0.9,
            cardinality_applies_to_numeric: false,
        }
    }
}

impl ClassifierConfig {
    /// Creates a new classifier config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to replace the keyword list.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the content sample size (at least 1).
    pub fn with_sample_size(mut self, size: usize) -> Self {
        if size == 0 {
            tracing::warn!("sample_size 0 raised to 1");
        }
        self.sample_size = size.max(1);
        self
    }

    /// Builder method to set the cardinality threshold.
    pub fn with_cardinality_threshold(mut self, threshold: f64) -> Self {
        if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(
                "cardinality_threshold {} clamped to valid range [0.0, 1.0]",
                threshold
            );
        }
        self.cardinality_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Builder method to include numeric columns in the cardinality rule.
    pub fn with_cardinality_applies_to_numeric(mut self, enabled: bool) -> Self {
        self.cardinality_applies_to_numeric = enabled;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.cardinality_threshold) {
            return Err(ConfigValidationError::InvalidCardinalityThreshold(
                self.cardinality_threshold,
            ));
        }
        if self.sample_size == 0 {
            return Err(ConfigValidationError::EmptySample);
        }
        Ok(())
    }
}

/// Masking settings.
///
/// The salt is never serialized and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingConfig {
    /// Salt prepended to values before hashing
    #[serde(skip_serializing)]
    pub hash_salt: String,
    /// Character substituted for hidden characters
    pub mask_char: char,
    /// Number of hex characters kept from the digest
    pub hash_length: usize,
}

impl std::fmt::Debug for MaskingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskingConfig")
            .field("hash_salt", &"<redacted>")
            .field("mask_char", &self.mask_char)
            .field("hash_length", &self.hash_length)
            .finish()
    }
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            hash_salt: DEFAULT_HASH_SALT.to_string(),
            mask_char: '*',
            hash_length: 8,
        }
    }
}

impl MaskingConfig {
    /// Creates a new masking config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the hash salt.
    pub fn with_hash_salt(mut self, salt: impl Into<String>) -> Self {
        self.hash_salt = salt.into();
        self
    }

    /// Builder method to set the mask character.
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Builder method to set the digest length, clamped to 1..=64.
    pub fn with_hash_length(mut self, length: usize) -> Self {
        if !(1..=MAX_HASH_LENGTH).contains(&length) {
            tracing::warn!(
                "hash_length {} clamped to valid range [1, {}]",
                length,
                MAX_HASH_LENGTH
            );
        }
        self.hash_length = length.clamp(1, MAX_HASH_LENGTH);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.hash_salt.is_empty() {
            return Err(ConfigValidationError::EmptyHashSalt);
        }
        if !(1..=MAX_HASH_LENGTH).contains(&self.hash_length) {
            return Err(ConfigValidationError::InvalidHashLength(self.hash_length));
        }
        if self.mask_char.is_alphanumeric() {
            return Err(ConfigValidationError::InvalidMaskChar(self.mask_char));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.sample_size, 100);
        assert_eq!(config.cardinality_threshold, 0.9);
        assert!(!config.cardinality_applies_to_numeric);
        assert!(config.keywords.iter().any(|k| k == "téléphone"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_classifier_builder_clamps() {
        let config = ClassifierConfig::new()
            .with_cardinality_threshold(1.7)
            .with_sample_size(0);
        assert_eq!(config.cardinality_threshold, 1.0);
        assert_eq!(config.sample_size, 1);
    }

    #[test]
    fn test_classifier_validation_rejects_out_of_range() {
        let config = ClassifierConfig {
            cardinality_threshold: -0.1,
            ..ClassifierConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidCardinalityThreshold(-0.1))
        );
    }

    #[test]
    fn test_masking_validation() {
        assert!(MaskingConfig::default().validate().is_ok());
        assert_eq!(
            MaskingConfig::new().with_hash_salt("").validate(),
            Err(ConfigValidationError::EmptyHashSalt)
        );
        assert_eq!(
            MaskingConfig::new().with_mask_char('x').validate(),
            Err(ConfigValidationError::InvalidMaskChar('x'))
        );
        assert_eq!(MaskingConfig::new().with_hash_length(500).hash_length, 64);
    }

    #[test]
    fn test_salt_is_not_exposed() {
        let config = MaskingConfig::new().with_hash_salt("pepper-123");
        assert!(!format!("{:?}", config).contains("pepper-123"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("pepper-123"));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{"sample_size": 25}"#).unwrap();
        assert_eq!(config.sample_size, 25);
        assert_eq!(config.keywords.len(), DEFAULT_SENSITIVE_KEYWORDS.len());
    }
}
