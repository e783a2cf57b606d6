//! Pre-compiled content patterns used to sniff sensitive values.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A kind of sensitive value recognised from its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentPattern {
    /// Email address
    Email,
    /// French national phone number
    PhoneFr,
    /// E.164 international phone number
    PhoneIntl,
    /// French social security number (15 digits)
    SsnFr,
    /// 13 to 19 digits, optionally grouped by spaces or dashes
    CreditCard,
    /// International bank account number
    Iban,
    /// French postal code (5 digits)
    PostalCode,
    /// Dotted-quad IPv4 address
    Ipv4,
    /// Colon or dash separated MAC address
    MacAddress,
}

impl ContentPattern {
    /// All patterns, in evaluation order.
    pub const ALL: [ContentPattern; 9] = [
        ContentPattern::Email,
        ContentPattern::PhoneFr,
        ContentPattern::PhoneIntl,
        ContentPattern::SsnFr,
        ContentPattern::CreditCard,
        ContentPattern::Iban,
        ContentPattern::PostalCode,
        ContentPattern::Ipv4,
        ContentPattern::MacAddress,
    ];

    /// Returns the pattern name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentPattern::Email => "email",
            ContentPattern::PhoneFr => "phone_fr",
            ContentPattern::PhoneIntl => "phone_intl",
            ContentPattern::SsnFr => "ssn_fr",
            ContentPattern::CreditCard => "credit_card",
            ContentPattern::Iban => "iban",
            ContentPattern::PostalCode => "postal_code",
            ContentPattern::Ipv4 => "ipv4",
            ContentPattern::MacAddress => "mac_address",
        }
    }

    fn source(self) -> &'static str {
        match self {
            ContentPattern::Email => r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            ContentPattern::PhoneFr => r"(?:\+33|\b0)[1-9]\d{8}\b",
            ContentPattern::PhoneIntl => r"\+[1-9]\d{1,14}\b",
            ContentPattern::SsnFr => r"\b\d{15}\b",
            ContentPattern::CreditCard => r"\b(?:\d[ -]?){12,18}\d\b",
            ContentPattern::Iban => r"\b[A-Z]{2}\d{2}[A-Z0-9]{4}\d{7}[A-Z0-9]{0,16}\b",
            ContentPattern::PostalCode => r"\b\d{5}\b",
            ContentPattern::Ipv4 => r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b",
            ContentPattern::MacAddress => r"\b(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}\b",
        }
    }
}

impl std::fmt::Display for ContentPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-compiled content patterns to avoid repeated compilation.
///
/// Uses `OnceLock` for thread-safe lazy initialization.
pub struct ContentPatterns {
    patterns: Vec<(ContentPattern, Regex)>,
}

impl ContentPatterns {
    /// Gets the singleton instance of pre-compiled patterns.
    pub fn instance() -> &'static Self {
        static PATTERNS: OnceLock<ContentPatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::compile)
    }

    /// Compiles all patterns. Sources are literals exercised by the tests.
    #[allow(clippy::expect_used)]
    fn compile() -> Self {
        let patterns = ContentPattern::ALL
            .iter()
            .map(|kind| {
                let regex = Regex::new(kind.source()).expect("Invalid content pattern");
                (*kind, regex)
            })
            .collect();
        Self { patterns }
    }

    /// Returns the first pattern matching anywhere in `value`.
    pub fn find_match(&self, value: &str) -> Option<ContentPattern> {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(value))
            .map(|(kind, _)| *kind)
    }

    /// Returns true if `value` matches the given pattern.
    pub fn matches(&self, kind: ContentPattern, value: &str) -> bool {
        self.patterns
            .iter()
            .any(|(k, regex)| *k == kind && regex.is_match(value))
    }
}
