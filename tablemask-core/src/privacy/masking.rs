//! Column-type specific masking transforms.
//!
//! The transform for a sensitive column is picked from its name by walking
//! [`METHOD_TABLE`] in order. Every transform passes missing values through
//! untouched and stringifies everything else.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::config::MaskingConfig;
use super::models::MaskingMethod;
use crate::CellValue;

/// Priority-ordered name keywords for each masking method.
///
/// Columns matching none of these fall back to
/// [`MaskingMethod::HashAnonymization`].
pub const METHOD_TABLE: [(MaskingMethod, &[&str]); 7] = [
    (MaskingMethod::EmailMasking, &["email", "mail"]),
    (
        MaskingMethod::PhoneMasking,
        &["phone", "téléphone", "tel", "mobile"],
    ),
    (MaskingMethod::SsnMasking, &["ssn", "social", "security"]),
    (
        MaskingMethod::FinancialMasking,
        &["credit", "card", "carte", "iban"],
    ),
    (
        MaskingMethod::AddressMasking,
        &["address", "adresse", "postal", "zip"],
    ),
    (MaskingMethod::NetworkMasking, &["ip", "mac"]),
    (MaskingMethod::IdMapping, &["id", "identifier", "identifiant"]),
];

impl MaskingMethod {
    /// Picks the masking method for a column name.
    pub fn for_column(name: &str) -> Self {
        let lowered = name.to_lowercase();
        METHOD_TABLE
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map_or(MaskingMethod::HashAnonymization, |(method, _)| *method)
    }
}

/// Run-scoped pseudonym table for identifier columns.
///
/// Each distinct identifier gets the next `ID_NNNNNN` token the first time
/// it is seen. Original identifiers are zeroized when the mapping is
/// dropped, and `Debug` only shows the entry count.
#[derive(Default)]
pub struct IdMapping {
    tokens: HashMap<String, String>,
}

impl IdMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the token for `original`, allocating one if needed.
    pub fn token_for(&mut self, original: &str) -> String {
        if let Some(token) = self.tokens.get(original) {
            return token.clone();
        }
        let token = format!("ID_{:06}", self.tokens.len() + 1);
        self.tokens.insert(original.to_string(), token.clone());
        token
    }

    /// Looks up an existing token without allocating.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.tokens.get(original).map(String::as_str)
    }

    /// Number of distinct identifiers mapped so far.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when no identifier has been mapped.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl std::fmt::Debug for IdMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdMapping")
            .field("entries", &self.tokens.len())
            .finish()
    }
}

impl Drop for IdMapping {
    fn drop(&mut self) {
        for (mut original, _) in self.tokens.drain() {
            original.zeroize();
        }
    }
}

/// Applies masking transforms.
#[derive(Debug, Clone, Default)]
pub struct Masker {
    config: MaskingConfig,
}

impl Masker {
    /// Creates a new masker.
    pub fn new(config: MaskingConfig) -> Self {
        Self { config }
    }

    /// Masks a column. Output has the same length with nulls in the same
    /// positions; every other cell becomes text.
    pub fn mask_column(
        &self,
        method: MaskingMethod,
        values: &[CellValue],
        mapping: &mut IdMapping,
    ) -> Vec<CellValue> {
        values
            .iter()
            .map(|value| match value.to_text() {
                Some(text) => CellValue::Text(self.mask_value(method, &text, mapping)),
                None => value.clone(),
            })
            .collect()
    }

    /// Masks a single stringified value.
    pub fn mask_value(&self, method: MaskingMethod, value: &str, mapping: &mut IdMapping) -> String {
        match method {
            MaskingMethod::EmailMasking => self.mask_email(value),
            MaskingMethod::PhoneMasking => self.mask_digits(value, 2, 2),
            MaskingMethod::SsnMasking => self.mask_digits(value, 3, 3),
            MaskingMethod::FinancialMasking => self.mask_digits(value, 4, 4),
            MaskingMethod::AddressMasking => self.mask_address(value),
            MaskingMethod::NetworkMasking => self.mask_network(value),
            MaskingMethod::IdMapping => mapping.token_for(value),
            MaskingMethod::HashAnonymization => self.hash(value),
        }
    }

    /// Salted SHA-256 of `value`, truncated to the configured hex length.
    pub fn hash(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.config.hash_salt.as_bytes());
        hasher.update(value.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(self.config.hash_length);
        digest
    }

    fn mask_run(&self, len: usize) -> String {
        std::iter::repeat_n(self.config.mask_char, len).collect()
    }

    /// `jdoe@mail.example.com` becomes `j**e@****.example.com`.
    fn mask_email(&self, value: &str) -> String {
        let Some((user, domain)) = value.split_once('@') else {
            return self.hash(value);
        };

        let user_chars: Vec<char> = user.chars().collect();
        let masked_user = match user_chars.as_slice() {
            [first, middle @ .., last] if user_chars.len() > 2 => {
                format!("{}{}{}", first, self.mask_run(middle.len()), last)
            }
            _ => self.mask_run(user_chars.len()),
        };

        let masked_domain = match domain.split_once('.') {
            Some((first, rest)) => format!("{}.{}", self.mask_run(first.chars().count()), rest),
            None => self.mask_run(domain.chars().count()),
        };

        format!("{}@{}", masked_user, masked_domain)
    }

    /// Keeps `head` leading and `tail` trailing digits, masking the rest.
    /// Values with too few digits are fully masked; values without any
    /// digit are hashed.
    fn mask_digits(&self, value: &str, head: usize, tail: usize) -> String {
        let digits: Vec<char> = value.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return self.hash(value);
        }
        if digits.len() < head + tail {
            return self.mask_run(digits.len());
        }

        let prefix: String = digits[..head].iter().collect();
        let suffix: String = digits[digits.len() - tail..].iter().collect();
        format!(
            "{}{}{}",
            prefix,
            self.mask_run(digits.len() - head - tail),
            suffix
        )
    }

    /// Keeps only the last comma-separated part (usually the city).
    fn mask_address(&self, value: &str) -> String {
        match value.rsplit_once(',') {
            Some((_, last)) => format!("{}, {}", self.mask_run(3), last.trim()),
            None => self.hash(value),
        }
    }

    /// Keeps the network half of IPv4 and the vendor half of MAC addresses.
    fn mask_network(&self, value: &str) -> String {
        let m = self.config.mask_char;
        if value.contains('.') {
            let parts: Vec<&str> = value.split('.').collect();
            if let [a, b, _, _] = parts.as_slice() {
                return format!("{a}.{b}.{m}.{m}");
            }
        } else if value.contains(':') {
            let parts: Vec<&str> = value.split(':').collect();
            if let [a, b, _, _, _, _] = parts.as_slice() {
                return format!("{a}:{b}:{m}:{m}:{m}:{m}");
            }
        }
        self.hash(value)
    }
}
