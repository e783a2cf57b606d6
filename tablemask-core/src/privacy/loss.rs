//! Information-loss heuristic for masked columns.

use crate::CellValue;
use crate::models::distinct_count;

const CARDINALITY_WEIGHT: f64 = 0.7;
const LENGTH_WEIGHT: f64 = 0.3;

/// Estimates how much information masking destroyed, in `[0, 1]`.
///
/// `0.7 * (1 - unique(masked)/unique(original)) + 0.3 * (1 - mean_len(masked)/mean_len(original))`
///
/// Unique counts and mean lengths are taken over non-null values. An empty
/// or all-null original scores 0.0, and a zero original mean length drops
/// the length term. Masking can lengthen short values (hashing a two-letter
/// value yields eight characters), so the raw score is clamped.
pub fn estimate_data_loss(original: &[CellValue], masked: &[CellValue]) -> f64 {
    if original.is_empty() {
        return 0.0;
    }

    let original_unique = distinct_count(original);
    if original_unique == 0 {
        return 0.0;
    }
    let masked_unique = distinct_count(masked);
    let cardinality_loss = 1.0 - masked_unique as f64 / original_unique as f64;

    let original_len = mean_text_len(original);
    let length_loss = if original_len == 0.0 {
        0.0
    } else {
        1.0 - mean_text_len(masked) / original_len
    };

    (CARDINALITY_WEIGHT * cardinality_loss + LENGTH_WEIGHT * length_loss).clamp(0.0, 1.0)
}

fn mean_text_len(values: &[CellValue]) -> f64 {
    let (total, count) = values
        .iter()
        .filter_map(CellValue::to_text)
        .fold((0usize, 0usize), |(total, count), text| {
            (total + text.chars().count(), count + 1)
        });
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::text(*v)).collect()
    }

    #[test]
    fn test_identical_columns_lose_nothing() {
        let column = cells(&["same", "same", "same"]);
        assert_eq!(estimate_data_loss(&column, &column), 0.0);
    }

    #[test]
    fn test_empty_and_all_null_originals() {
        assert_eq!(estimate_data_loss(&[], &[]), 0.0);
        let nulls = vec![CellValue::Null; 3];
        assert_eq!(estimate_data_loss(&nulls, &cells(&["a", "b", "c"])), 0.0);
    }

    #[test]
    fn test_weighted_formula() {
        // unique 2 -> 1, mean length 4 -> 2
        let original = cells(&["abcd", "efgh"]);
        let masked = cells(&["**", "**"]);
        let loss = estimate_data_loss(&original, &masked);
        assert!((loss - (0.7 * 0.5 + 0.3 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_bounded_for_email_and_phone_columns() {
        let emails = cells(&["alice@example.com", "bob@example.com", "carol@test.org"]);
        let masked_emails = cells(&["a***e@*******.com", "b*b@*******.com", "c***l@****.org"]);
        let loss = estimate_data_loss(&emails, &masked_emails);
        assert!((0.0..=1.0).contains(&loss));

        let phones = cells(&["0612345678", "0698765432"]);
        let masked_phones = cells(&["06******78", "06******32"]);
        let loss = estimate_data_loss(&phones, &masked_phones);
        assert!((0.0..=1.0).contains(&loss));
    }

    #[test]
    fn test_lengthening_is_clamped_at_zero() {
        let original = cells(&["a", "b"]);
        let masked = cells(&["0cc175b9", "92eb5ffe"]);
        assert_eq!(estimate_data_loss(&original, &masked), 0.0);
    }
}
